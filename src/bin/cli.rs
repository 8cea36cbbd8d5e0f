//! Stellar Forge CLI
//!
//! Command-line client for the waitlist API:
//! - Sign up and check status
//! - List, inspect, mark ready and remove entries (admin)
//! - Check server health
//! - Generate a config file

use clap::{Parser, Subcommand};
use reqwest::{RequestBuilder, Response, StatusCode};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use stellar_forge::api::dto::{EntryListResponse, StatusResponse};
use stellar_forge::api::ADMIN_CODE_HEADER;
use stellar_forge::store::WaitlistEntry;

#[derive(Parser)]
#[command(name = "stellar-forge-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Manage the Stellar Forge waitlist")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8090", global = true)]
    pub api_url: String,

    /// Admin code for dashboard operations
    #[arg(long, env = "STELLAR_FORGE_ADMIN_CODE", global = true, hide_env_values = true)]
    pub admin_code: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Join the waitlist
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Why you are interested
        #[arg(long, default_value = "")]
        reason: String,
    },

    /// Show the status for an email
    Status { email: String },

    /// List all entries (admin)
    List,

    /// Show one entry (admin)
    Show { id: String },

    /// Mark an entry ready (admin)
    Ready { id: String },

    /// Remove an entry (admin)
    Remove {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show server health
    Health,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let api = ApiClient::new(&cli.api_url, cli.admin_code.clone());
    let json = cli.format == "json";

    match cli.command {
        Commands::Signup {
            name,
            email,
            reason,
        } => {
            let body = serde_json::json!({
                "name": name,
                "email": email,
                "reason": reason,
            });
            let response = api.post("/waitlist").json(&body).send().await?;
            let entry: WaitlistEntry = expect_success(response).await?.json().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else {
                println!("Joined the waitlist as {} ({})", entry.email, entry.id);
            }
        }

        Commands::Status { email } => {
            let response = api
                .get("/waitlist/status")
                .query(&[("email", email.as_str())])
                .send()
                .await?;
            let status: StatusResponse = expect_success(response).await?.json().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                match status.status {
                    Some(s) => println!("{}: {}", status.email, s),
                    None => println!("{}: not on the waitlist", status.email),
                }
            }
        }

        Commands::List => {
            let response = api.admin_get("/admin/waitlist")?.send().await?;
            let list: EntryListResponse = expect_success(response).await?.json().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else if list.entries.is_empty() {
                println!("No entries yet.");
            } else {
                print_table(&list.entries);
                println!();
                println!("{} entries", list.total);
            }
        }

        Commands::Show { id } => {
            let response = api
                .admin_get(&format!("/admin/waitlist/{}", id))?
                .send()
                .await?;
            let entry: WaitlistEntry = expect_success(response).await?.json().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else {
                print_details(&entry);
            }
        }

        Commands::Ready { id } => {
            let response = api
                .admin_post(&format!("/admin/waitlist/{}/ready", id))?
                .send()
                .await?;
            let entry: WaitlistEntry = expect_success(response).await?.json().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else {
                println!("{} is {}", entry.email, entry.status);
            }
        }

        Commands::Remove { id, yes } => {
            if !yes && !confirm(&format!("Remove entry {}?", id))? {
                println!("Cancelled.");
                return Ok(());
            }

            let response = api
                .admin_delete(&format!("/admin/waitlist/{}", id))?
                .send()
                .await?;
            expect_success(response).await?;
            println!("Removed {}", id);
        }

        Commands::Health => {
            let response = api.client.get(format!("{}/health", api.base)).send().await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;

                    if json {
                        println!("{}", serde_json::to_string_pretty(&health)?);
                        return Ok(());
                    }

                    println!("Stellar Forge v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!(
                        "API Status: {}",
                        health["status"].as_str().unwrap_or("unknown")
                    );

                    if let Some(entries) = health.get("entries") {
                        println!();
                        println!("Waitlist:");
                        println!("  Total: {}", entries["total"].as_u64().unwrap_or(0));
                        println!("  Pending: {}", entries["pending"].as_u64().unwrap_or(0));
                        println!("  Ready: {}", entries["ready"].as_u64().unwrap_or(0));
                    }

                    if let Some(conns) = health["websocket_connections"].as_u64() {
                        println!();
                        println!("Live connections: {}", conns);
                    }

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    eprintln!("API returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Cannot connect to Stellar Forge API at {}", api.base);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the server is running:");
                    eprintln!("  cargo run --bin stellar-forge");
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { output } => {
            let config = stellar_forge::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Thin wrapper over reqwest that knows the API prefix and admin header
struct ApiClient {
    client: reqwest::Client,
    base: String,
    admin_code: Option<String>,
}

impl ApiClient {
    fn new(base: &str, admin_code: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: base.trim_end_matches('/').to_string(),
            admin_code,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base, path)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    fn admin(&self, builder: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        match self.admin_code.as_deref() {
            Some(code) if !code.is_empty() => Ok(builder.header(ADMIN_CODE_HEADER, code)),
            _ => anyhow::bail!("admin code required (--admin-code or STELLAR_FORGE_ADMIN_CODE)"),
        }
    }

    fn admin_get(&self, path: &str) -> anyhow::Result<RequestBuilder> {
        self.admin(self.get(path))
    }

    fn admin_post(&self, path: &str) -> anyhow::Result<RequestBuilder> {
        self.admin(self.post(path))
    }

    fn admin_delete(&self, path: &str) -> anyhow::Result<RequestBuilder> {
        self.admin(self.client.delete(self.url(path)))
    }
}

/// Turn a non-2xx response into an error carrying the server's message
async fn expect_success(response: Response) -> anyhow::Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body: serde_json::Value = response.json().await.unwrap_or_default();
    let message = body["error"]["message"].as_str().unwrap_or("no details");

    match status {
        StatusCode::UNAUTHORIZED => anyhow::bail!("Unauthorized: check the admin code"),
        StatusCode::NOT_FOUND => anyhow::bail!("Not found: {}", message),
        _ => anyhow::bail!("Request failed ({}): {}", status, message),
    }
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}

fn print_table(entries: &[WaitlistEntry]) {
    println!(
        "{:<36}  {:<20}  {:<28}  {:<8}  {}",
        "ID", "Name", "Email", "Status", "Joined"
    );
    println!("{}", "-".repeat(110));

    for entry in entries {
        println!(
            "{:<36}  {:<20}  {:<28}  {:<8}  {}",
            entry.id,
            truncate(&entry.name, 20),
            truncate(&entry.email, 28),
            entry.status,
            entry.created_at.format("%Y-%m-%d %H:%M")
        );
    }
}

fn print_details(entry: &WaitlistEntry) {
    println!("ID:      {}", entry.id);
    println!("Name:    {}", entry.name);
    println!("Email:   {}", entry.email);
    println!("Status:  {}", entry.status);
    println!("Joined:  {}", entry.created_at.to_rfc3339());
    println!();
    println!("Reason:");
    if entry.reason.is_empty() {
        println!("  (none given)");
    } else {
        for line in entry.reason.lines() {
            println!("  {}", line);
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
