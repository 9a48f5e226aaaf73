use clap::{Parser, Subcommand};
use serde_json::{Map, Value};

use sqlew_connector::{create_backend, resolve_project, ApiError, CloudConfig, ToolBackend};

#[derive(Parser)]
#[command(name = "sqlew-connector", version, about = "Diagnostics for the sqlew SaaS connector")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Probe the API health endpoint
    Health,
    /// Resolve a project name to its id
    Resolve { project_name: String },
    /// Call a tool action remotely
    Call {
        tool: String,
        action: String,
        /// JSON object with the action parameters
        #[arg(long, default_value = "{}")]
        params: String,
    },
}

async fn run(cli: Cli) -> Result<Value, ApiError> {
    let mut config = CloudConfig::from_env()?;
    match cli.command {
        Command::Health => {
            let health = create_backend(config)?.health_check().await;
            Ok(serde_json::to_value(health).unwrap_or(Value::Null))
        }
        Command::Resolve { project_name } => {
            let project_id = resolve_project(&config.api_key, &project_name).await?;
            Ok(serde_json::json!({"project_name": project_name, "project_id": project_id}))
        }
        Command::Call {
            tool,
            action,
            params,
        } => {
            let params: Map<String, Value> = serde_json::from_str(&params).map_err(|err| {
                ApiError::internal(format!("--params must be a JSON object: {}", err), 0)
            })?;
            if config.needs_project_resolution() {
                if let Some(name) = config.project_name.clone() {
                    config.project_id = Some(resolve_project(&config.api_key, &name).await?);
                }
            }
            create_backend(config)?.execute(&tool, &action, params).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(output) => println!("{}", output),
        Err(err) => {
            let rendered = serde_json::to_string(&err).unwrap_or_else(|_| err.to_string());
            eprintln!("sqlew-connector: {}", rendered);
            std::process::exit(1);
        }
    }
}
