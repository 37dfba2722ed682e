use mock_server::Credentials;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let credentials = Credentials::new(
        std::env::var("MOCK_AUTH_TOKEN").unwrap_or_else(|_| "mock-token".to_string()),
        std::env::var("MOCK_ORGANIZATION_ID").unwrap_or_else(|_| "1".to_string()),
    );

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, organization_id = %credentials.organization_id, "mock productive api listening");
    mock_server::run(listener, credentials).await
}
