//! Clock synchronization against a device with a known ip

use chrono::Local;
use gatelink::{DeviceController, LocalOptions};

#[tokio::main]
async fn main() -> gatelink::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let ip = std::env::var("DEVICE_IP").unwrap_or_else(|_| "192.168.1.100".to_string());

    let mut controller = DeviceController::local(LocalOptions {
        device_ip: Some(ip.parse().expect("DEVICE_IP must be a dotted quad")),
        ..Default::default()
    })
    .await?;

    let now = Local::now().naive_local();
    println!("Setting device clock to {}...", now);
    controller.set_date(now).await?;
    println!("✓ Sent");

    Ok(())
}
