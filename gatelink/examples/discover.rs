//! Broadcast discovery example: find a device by serial, open door 1

use gatelink::{CallbackTarget, DeviceController, LocalOptions};

#[tokio::main]
async fn main() -> gatelink::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // Change to your device serial and callback server address
    let serial: u32 = std::env::var("DEVICE_SERIAL")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(423188757);
    let callback_ip = std::env::var("CALLBACK_IP").unwrap_or_else(|_| "192.168.1.2".to_string());

    println!("Searching for device {}...", serial);

    let mut controller = DeviceController::local(LocalOptions {
        serial: Some(serial),
        callback: Some(CallbackTarget::new(
            callback_ip.parse().expect("CALLBACK_IP must be a dotted quad"),
            9000,
        )),
        ..Default::default()
    })
    .await?;

    match controller.device_ip() {
        Some(ip) => println!("✓ Device found at {}", ip),
        None => println!("✗ No matching reply; commands will broadcast"),
    }

    println!("Opening door 1...");
    controller.open_door(1).await?;
    println!("✓ Done");

    Ok(())
}
