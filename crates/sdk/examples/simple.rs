//! Simple SDK Example
//!
//! Demonstrates basic usage of the Waitline SDK.
//!
//! # Usage
//!
//! 1. Start the daemon:
//!    ```bash
//!    cargo run --package waitline-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --example simple
//!    ```

use waitline_sdk::{CreateQueueRequest, JoinRequest, WaitlineClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Waitline SDK - Simple Example");
    println!("==============================\n");

    // 1. Connect to daemon
    println!("1. Connecting to daemon...");
    let client = WaitlineClient::connect("http://127.0.0.1:9641").await?;
    println!("   ✓ Connected\n");

    // 2. Create a queue expiring in one hour
    println!("2. Creating a queue...");
    let expires_at = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_millis() as i64
        + 60 * 60 * 1000;

    let queue = client
        .create_queue(CreateQueueRequest {
            owner_id: "example-owner".to_string(),
            name: "Flu Shot Clinic".to_string(),
            organization: "Community Health".to_string(),
            capacity: 20,
            expires_at,
            description: "Walk-in flu shots".to_string(),
        })
        .await?;

    println!("   ✓ Queue created:");
    println!("     - Token: {}", queue.token);
    if let Some(url) = &queue.join_url {
        println!("     - Join URL: {}", url);
    }
    println!();

    // 3. Join as a participant
    println!("3. Joining the queue...");
    let join = client
        .join(JoinRequest {
            token: queue.token.clone(),
            name: "Alice".to_string(),
            phone: "555-0101".to_string(),
        })
        .await?;

    println!("   ✓ Joined:");
    println!("     - Position: {}", join.position);
    println!("     - Estimated wait: {} min\n", join.estimated_wait_minutes);

    // 4. Check public info for that phone
    println!("4. Checking queue info...");
    let info = client
        .queue_info(queue.token.clone(), Some("555-0101".to_string()))
        .await?;

    println!("   ✓ Queue: {}", info.queue.name);
    println!(
        "     - Size: {}/{}",
        info.queue.current_size, info.queue.queue_size
    );
    println!("     - Enrolled: {}\n", info.is_in_queue);

    // 5. Clean up
    println!("5. Deleting the queue...");
    let deleted = client.delete_queue("example-owner", queue.token).await?;
    if deleted.deleted {
        println!("   ✓ Queue deleted");
    }

    println!("\n✓ Example completed successfully!");

    Ok(())
}
