use clap::Parser;
use fakeapi_core::{ConfigSource, FakeApi, ListenerConfig};
use fakeapi_transport::{signal_shutdown, FakeApiServer};
use std::path::PathBuf;
use std::sync::Arc;

/// Serve a fakeapi url config over HTTP.
#[derive(Debug, Parser)]
#[command(name = "fakeapi", version)]
struct Args {
    /// HTTP server address
    #[arg(short = 's', long = "server")]
    server: Option<String>,

    /// HTTP server port
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,

    /// HTTP prefix (http://server:port)
    #[arg(short = 'P', long = "prefix")]
    prefix: Option<String>,

    /// Listener settings (TOML); command-line flags take precedence
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Json file for FakeAPI, `-` reads standard input
    #[arg(default_value = ConfigSource::STDIN_SENTINEL)]
    jsonfile: String,
}

impl Args {
    fn listener_config(&self) -> Result<ListenerConfig, fakeapi_core::FakeApiError> {
        let mut config = match &self.config {
            Some(path) => ListenerConfig::from_file(path)?,
            None => ListenerConfig::default(),
        };
        if let Some(server) = &self.server {
            config.host = server.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if self.prefix.is_some() {
            config.prefix = self.prefix.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let listener = args.listener_config()?;

    let api = Arc::new(FakeApi::default());
    api.load_config(&ConfigSource::from_arg(&args.jsonfile))?;
    tracing::info!("fakeapi: {} url config entries loaded", api.config().len());

    let server = FakeApiServer::bind(api, listener).await?;
    server
        .serve_with_shutdown(signal_shutdown(tokio::signal::ctrl_c()))
        .await?;
    Ok(())
}
