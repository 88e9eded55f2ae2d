use std::time::Duration;

use tracing::{debug, info, warn};

pub const INTERVAL: Duration = Duration::from_secs(120);

/// Ping the uptime monitor forever. Failures are logged and the next tick
/// tries again.
pub async fn run(client: reqwest::Client, url: String) {
    info!("Heartbeat enabled, pinging every {}s", INTERVAL.as_secs());

    let mut ticker = tokio::time::interval(INTERVAL);
    loop {
        ticker.tick().await;
        match ping(&client, &url).await {
            Ok(()) => debug!("Heartbeat sent"),
            Err(e) => warn!("Heartbeat failed: {}", e),
        }
    }
}

async fn ping(client: &reqwest::Client, url: &str) -> Result<(), reqwest::Error> {
    client.get(url).send().await?.error_for_status()?;
    Ok(())
}
