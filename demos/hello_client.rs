//! Sends a single message to an A2A agent and prints the resulting task.
//!
//! Run against the `echo_agent` example:
//!
//! ```text
//! cargo run --example echo_agent --features server &
//! cargo run --example hello_client --features client
//! ```

use a2a_core::client::{A2AClient, SendMessageResponse};
use a2a_core::error::A2AResult;

#[tokio::main]
async fn main() -> A2AResult<()> {
    tracing_subscriber::fmt::init();

    let client = A2AClient::from_url("http://127.0.0.1:8080").await?;

    let response = client.send_text("Hello, agent!").await?;
    match response {
        SendMessageResponse::Task(task) => {
            println!("task {} is {:?}", task.id, task.status.state);
            if let Some(message) = task.history.last() {
                println!("agent replied: {}", message.text());
            }
        }
    }

    client.close()?;
    Ok(())
}
