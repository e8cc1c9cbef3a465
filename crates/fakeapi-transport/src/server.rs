use crate::dispatcher::RequestDispatcher;
use fakeapi_core::{FakeApi, FakeApiError, ListenerConfig};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use socket2::{Domain, Protocol, Socket, Type};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// HTTP/1.1 listener answering every request from a shared [`FakeApi`].
pub struct FakeApiServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    dispatcher: Arc<RequestDispatcher>,
}

impl FakeApiServer {
    /// Binds `config.host:config.port` (port 0 picks a free one).
    ///
    /// Without an explicit prefix, URLs are formed as `http://<host>:<bound port>`.
    pub async fn bind(api: Arc<FakeApi>, config: ListenerConfig) -> Result<Self, FakeApiError> {
        let addr = tokio::net::lookup_host((config.host.as_str(), config.port))
            .await?
            .next()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::AddrNotAvailable,
                    format!("{} does not resolve", config.host),
                )
            })?;

        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
        socket.set_reuse_address(true)?;
        socket.set_nonblocking(true)?;
        socket.bind(&addr.into())?;
        socket.listen(1024)?;

        let listener = TcpListener::from_std(std::net::TcpListener::from(socket))?;
        let local_addr = listener.local_addr()?;

        let prefix = ListenerConfig {
            port: local_addr.port(),
            ..config
        }
        .http_prefix();

        Ok(Self {
            listener,
            local_addr,
            dispatcher: Arc::new(RequestDispatcher::new(api, prefix)),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn prefix(&self) -> &str {
        self.dispatcher.prefix()
    }

    /// Serves until the process ends.
    pub async fn serve(self) -> Result<(), FakeApiError> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Serves until `shutdown` completes. Connections already accepted run to
    /// completion on their own tasks.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<(), FakeApiError>
    where
        F: Future<Output = ()>,
    {
        tracing::info!("Starting http server : http://{}", self.local_addr);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => self.spawn_connection(stream, peer),
                        Err(e) => tracing::error!("fakeapi: accept failed on {}: {}", self.local_addr, e),
                    }
                }
                _ = &mut shutdown => {
                    tracing::info!("Stopping http server");
                    return Ok(());
                }
            }
        }
    }

    fn spawn_connection(&self, stream: tokio::net::TcpStream, peer: SocketAddr) {
        let dispatcher = Arc::clone(&self.dispatcher);
        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = service_fn(move |req| Arc::clone(&dispatcher).handle(req, peer));
            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                tracing::debug!("fakeapi: connection from {} closed: {}", peer, e);
            }
        });
    }
}

/// Shutdown future for [`FakeApiServer::serve_with_shutdown`] completing when
/// `signal` does. A signal that fails to install is logged and stops the
/// server right away.
pub async fn signal_shutdown<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!("fakeapi: cannot listen for shutdown signal, stopping: {}", e);
    }
}
