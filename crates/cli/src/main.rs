//! Waitline CLI - Command-line interface for the Waitline Queue Engine

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9641";

#[derive(Parser)]
#[command(name = "waitline")]
#[command(about = "Waitline Queue Engine CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "WAITLINE_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new queue
    Create {
        /// Owner identifier
        #[arg(short, long)]
        owner: String,

        /// Queue name
        #[arg(short, long)]
        name: String,

        /// Organization name
        #[arg(long)]
        organization: String,

        /// Maximum number of participants
        #[arg(short, long)]
        capacity: i64,

        /// Expiry as epoch milliseconds
        #[arg(short, long)]
        expires_at: i64,

        /// Queue description
        #[arg(short, long)]
        description: String,
    },

    /// Join a queue by its public token
    Join {
        /// Queue token
        token: String,

        /// Your name
        #[arg(short, long)]
        name: String,

        /// Your phone number
        #[arg(short, long)]
        phone: String,
    },

    /// Show public queue information
    Info {
        /// Queue token
        token: String,

        /// Report enrollment for this phone number
        #[arg(short, long)]
        phone: Option<String>,
    },

    /// List queues for an owner
    List {
        /// Owner identifier
        #[arg(short, long)]
        owner: String,
    },

    /// Show one owned queue with its participants
    Get {
        /// Owner identifier
        #[arg(short, long)]
        owner: String,

        /// Queue token
        token: String,
    },

    /// Update a queue's details
    Update {
        /// Owner identifier
        #[arg(short, long)]
        owner: String,

        /// Queue token
        token: String,

        /// Queue name
        #[arg(short, long)]
        name: String,

        /// Organization name
        #[arg(long)]
        organization: String,

        /// Maximum number of participants
        #[arg(short, long)]
        capacity: i64,

        /// Expiry as epoch milliseconds
        #[arg(short, long)]
        expires_at: i64,

        /// New description (unchanged when omitted)
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Apply an action to a participant (current, skip, served, remove)
    Participant {
        /// Owner identifier
        #[arg(short, long)]
        owner: String,

        /// Queue token
        token: String,

        /// Participant ID
        participant_id: String,

        /// Action to apply
        #[arg(short, long)]
        action: String,
    },

    /// Delete a queue and all its participants
    Delete {
        /// Owner identifier
        #[arg(short, long)]
        owner: String,

        /// Queue token
        token: String,
    },

    /// Show engine status
    Status,

    /// Run maintenance operations
    Maintenance {
        /// Force VACUUM even if not needed
        #[arg(long)]
        force_vacuum: bool,
    },
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize, Tabled)]
struct JoinResult {
    position: i64,
    estimated_wait_minutes: i64,
    queue_size: i64,
    current_size: i64,
}

#[derive(Tabled)]
struct QueueRow {
    token: String,
    name: String,
    organization: String,
    size: String,
    expires_at: i64,
}

#[derive(Tabled)]
struct ParticipantRow {
    position: i64,
    name: String,
    phone: String,
    status: String,
    wait_min: i64,
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

fn queue_rows(queues: &[serde_json::Value]) -> Vec<QueueRow> {
    queues
        .iter()
        .map(|q| QueueRow {
            token: q["token"].as_str().unwrap_or("").to_string(),
            name: q["name"].as_str().unwrap_or("").to_string(),
            organization: q["organization"].as_str().unwrap_or("").to_string(),
            size: format!(
                "{}/{}",
                q["current_size"].as_i64().unwrap_or(0),
                q["capacity"].as_i64().unwrap_or(0)
            ),
            expires_at: q["expires_at"].as_i64().unwrap_or(0),
        })
        .collect()
}

fn participant_rows(participants: &[serde_json::Value]) -> Vec<ParticipantRow> {
    participants
        .iter()
        .map(|p| ParticipantRow {
            position: p["position"].as_i64().unwrap_or(0),
            name: p["name"].as_str().unwrap_or("").to_string(),
            phone: p["phone"].as_str().unwrap_or("").to_string(),
            status: p["status"].as_str().unwrap_or("").to_string(),
            wait_min: p["estimated_wait_minutes"].as_i64().unwrap_or(0),
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Create {
            owner,
            name,
            organization,
            capacity,
            expires_at,
            description,
        } => {
            let params = json!({
                "owner_id": owner,
                "name": name,
                "organization": organization,
                "capacity": capacity,
                "expires_at": expires_at,
                "description": description,
            });

            let result = call_rpc(&cli.rpc_url, "owner.create.v1", params).await?;

            println!("{}", "✓ Queue created successfully".green().bold());
            println!();
            println!("  {} {}", "Token:".bold(), result["token"]);
            if let Some(url) = result["join_url"].as_str() {
                println!("  {} {}", "Join URL:".bold(), url);
            }
        }

        Commands::Join { token, name, phone } => {
            let params = json!({
                "token": token,
                "name": name,
                "phone": phone,
            });

            let result = call_rpc(&cli.rpc_url, "queue.join.v1", params).await?;
            let join_result: JoinResult = serde_json::from_value(result)?;

            println!("{}", "✓ Joined queue successfully".green().bold());
            println!();

            let table = Table::new(vec![join_result]).to_string();
            println!("{}", table);
        }

        Commands::Info { token, phone } => {
            let params = json!({
                "token": token,
                "phone": phone,
            });

            let result = call_rpc(&cli.rpc_url, "queue.info.v1", params).await?;
            let queue = &result["queue"];

            println!("{}", queue["name"].as_str().unwrap_or("").cyan().bold());
            println!("  {} {}", "Organization:".bold(), queue["organization"]);
            println!(
                "  {} {}/{}",
                "Size:".bold(),
                queue["current_size"],
                queue["queue_size"]
            );
            if queue["is_full"].as_bool().unwrap_or(false) {
                println!("  {} {}", "Status:".bold(), "FULL".red());
            }
            if result["is_in_queue"].as_bool().unwrap_or(false) {
                println!();
                println!(
                    "  You are in this queue at position {} (~{} min wait)",
                    result["position"], result["estimated_wait_minutes"]
                );
            }
        }

        Commands::List { owner } => {
            let params = json!({ "owner_id": owner });

            let result = call_rpc(&cli.rpc_url, "owner.list.v1", params).await?;
            let queues = result["queues"].as_array().cloned().unwrap_or_default();

            if queues.is_empty() {
                println!("{}", "No queues found".yellow());
            } else {
                let table = Table::new(queue_rows(&queues)).to_string();
                println!("{}", table);
            }
        }

        Commands::Update {
            owner,
            token,
            name,
            organization,
            capacity,
            expires_at,
            description,
        } => {
            let params = json!({
                "owner_id": owner,
                "token": token,
                "name": name,
                "organization": organization,
                "capacity": capacity,
                "expires_at": expires_at,
                "description": description,
            });

            call_rpc(&cli.rpc_url, "owner.update.v1", params).await?;

            println!("{}", format!("✓ Queue {} updated", token).green().bold());
        }

        Commands::Get { owner, token } => {
            let params = json!({
                "owner_id": owner,
                "token": token,
            });

            let result = call_rpc(&cli.rpc_url, "owner.get.v1", params).await?;

            println!("{}", result["name"].as_str().unwrap_or("").cyan().bold());
            println!(
                "  {} {}/{}",
                "Size:".bold(),
                result["current_size"],
                result["capacity"]
            );
            println!();

            let participants = result["participants"].as_array().cloned().unwrap_or_default();
            if participants.is_empty() {
                println!("{}", "No participants yet".yellow());
            } else {
                let table = Table::new(participant_rows(&participants)).to_string();
                println!("{}", table);
            }
        }

        Commands::Participant {
            owner,
            token,
            participant_id,
            action,
        } => {
            let params = json!({
                "owner_id": owner,
                "token": token,
                "participant_id": participant_id,
                "action": action,
            });

            call_rpc(&cli.rpc_url, "owner.participant.v1", params).await?;

            println!(
                "{}",
                format!("✓ Participant {} marked as {}", participant_id, action)
                    .green()
                    .bold()
            );
        }

        Commands::Delete { owner, token } => {
            let params = json!({
                "owner_id": owner,
                "token": token,
            });

            call_rpc(&cli.rpc_url, "owner.delete.v1", params).await?;

            println!("{}", format!("✓ Queue {} deleted", token).green().bold());
        }

        Commands::Status => {
            println!("{}", "Engine Status".cyan().bold());
            println!();

            match call_rpc(&cli.rpc_url, "admin.stats.v1", json!({})).await {
                Ok(stats) => {
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!();
                    println!("  {} {}", "Total Queues:".bold(), stats["total_queues"]);
                    println!("  {} {}", "Active:".bold(), stats["active_queues"]);
                    println!(
                        "  {} {}",
                        "Participants:".bold(),
                        stats["total_participants"]
                    );
                    println!(
                        "  {} {}",
                        "Waiting:".bold(),
                        stats["waiting_participants"]
                    );
                    println!();
                    let db_mb =
                        stats["db_size_bytes"].as_i64().unwrap_or(0) as f64 / (1024.0 * 1024.0);
                    println!("  {} {:.2} MB", "DB Size:".bold(), db_mb);
                    println!("  {} {} seconds", "Uptime:".bold(), stats["uptime_seconds"]);
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }

        Commands::Maintenance { force_vacuum } => {
            println!("{}", "Running maintenance...".cyan().bold());
            println!();

            if force_vacuum {
                println!("  {} Force VACUUM enabled", "•".bold());
            }

            let params = json!({ "force_vacuum": force_vacuum });

            match call_rpc(&cli.rpc_url, "admin.maintenance.v1", params).await {
                Ok(result) => {
                    println!("  ✓ Maintenance completed");
                    println!();
                    if result["vacuum_run"].as_bool().unwrap_or(false) {
                        println!("  {} VACUUM executed", "✓".green());
                    } else {
                        println!("  ○ VACUUM skipped (not needed)");
                    }
                    println!(
                        "  {} {} expired queues deleted",
                        "✓".green(),
                        result["queues_deleted"]
                    );
                    println!();
                    let size_before_mb =
                        result["db_size_before"].as_i64().unwrap_or(0) as f64 / (1024.0 * 1024.0);
                    let size_after_mb =
                        result["db_size_after"].as_i64().unwrap_or(0) as f64 / (1024.0 * 1024.0);
                    println!(
                        "  {} {:.2} MB → {:.2} MB",
                        "DB Size:".bold(),
                        size_before_mb,
                        size_after_mb
                    );
                }
                Err(e) => {
                    println!("  {} Maintenance failed: {}", "✗".red(), e);
                }
            }
        }
    }

    Ok(())
}
