use serde_json::json;
use ssapi_client::prelude::*;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    setup_logger();

    // Credentials and base URL come from SSAPI_* variables or .env
    let client = HttpClient::new(Config::new()).await?;
    let session = client.get_session().await;
    info!("Token expires at: {:?}", session.expires_at);

    match client.send_request("/ping", "GET", None).await {
        Ok(pong) => info!("Ping: {}", pong),
        Err(e) => error!("Ping failed: {e}"),
    }

    let clients = client
        .send_request("/clients", "GET", Some(json!({"page": 1, "limit": 5})))
        .await?;
    info!("Clients: {}", serde_json::to_string_pretty(&clients)?);

    Ok(())
}
