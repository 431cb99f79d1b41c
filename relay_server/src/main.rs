use relay_server::{serve, Relay, RelayError, ServerConfig};
use tokio::net::TcpListener;
use tracing::info;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<(), RelayError> {
    // Optional .env for local runs
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = ServerConfig::from_env();
    let listener = TcpListener::bind(config.addr()).await?;
    info!(addr = %config.addr(), "relay listening");

    tokio::select! {
        result = serve(listener, Relay::shared()) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
            Ok(())
        }
    }
}
