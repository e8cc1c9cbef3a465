pub use fakeapi_core::{FakeApi, ListenerConfig};
pub mod dispatcher;
pub mod server;

pub use dispatcher::{Dispatched, RequestDispatcher};
pub use server::{signal_shutdown, FakeApiServer};
