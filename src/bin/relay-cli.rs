use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Command-line client for the LLM relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3001")]
    url: String,

    /// Bearer token from `relay-cli token`; the relay exchanges its own key when omitted.
    #[arg(short, long)]
    token: Option<String>,

    /// Model host base URL; the relay's default when omitted.
    #[arg(short, long)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check relay liveness
    Health,
    /// Fetch a bearer token
    Token,
    /// Generate a list of items
    List {
        prompt: String,
        #[arg(short, long, default_value_t = 5)]
        count: usize,
    },
    /// Generate a table
    Table {
        prompt: String,
        #[arg(short, long, default_value_t = 5)]
        rows: usize,
        #[arg(short, long, default_value_t = 4)]
        cols: usize,
    },
    /// Send an analytics event
    Track {
        event: String,
        /// Event properties as a JSON object
        #[arg(short, long, default_value = "{}")]
        properties: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
        Commands::Token => client.post(format!("{}/token", base)).send().await?,
        Commands::List { prompt, count } => {
            let body = json!({
                "endpoint": cli.endpoint,
                "accessToken": cli.token,
                "prompt": prompt,
                "count": count,
            });
            client.post(format!("{}/generate", base)).json(&body).send().await?
        }
        Commands::Table { prompt, rows, cols } => {
            let body = json!({
                "endpoint": cli.endpoint,
                "accessToken": cli.token,
                "prompt": prompt,
                "rows": rows,
                "cols": cols,
            });
            client.post(format!("{}/generateTable", base)).json(&body).send().await?
        }
        Commands::Track { event, properties } => {
            let properties: Value = serde_json::from_str(&properties)?;
            let body = json!({
                "event": event,
                "anonymousId": uuid::Uuid::new_v4().to_string(),
                "properties": properties,
            });
            client.post(format!("{}/track", base)).json(&body).send().await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
