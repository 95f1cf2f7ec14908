use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::ExitCode;

use mortgage_leads::content::Scanner;

#[derive(Parser)]
#[command(name = "leads-cli")]
#[command(about = "Management CLI for the mortgage lead service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080", env = "LEADS_URL")]
    url: String,

    #[arg(short, long, default_value = "", env = "LEADS_ADMIN_KEY")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service status
    Status,
    /// List stored leads, newest first
    Leads {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Lead count and rate-limit state
    Stats,
    /// Send a test lead through the public endpoint
    Submit {
        #[arg(long, default_value = "Test Lead")]
        name: String,
        #[arg(long, default_value = "test@example.com")]
        email: String,
        #[arg(long, default_value = "416-555-0100")]
        phone: String,
        #[arg(long)]
        loan_amount: Option<f64>,
        #[arg(long, default_value = "leads-cli")]
        source: String,
    },
    /// Scan Markdown content for compliance problems
    CheckContent {
        /// Directory of .md / .mdx posts
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    let ok = match cli.command {
        Commands::Status => {
            let res = client
                .get(format!("{}/admin/status", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?
        }
        Commands::Leads { limit } => {
            let res = client
                .get(format!("{}/admin/leads", cli.url))
                .query(&[("limit", limit)])
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?
        }
        Commands::Stats => {
            let res = client
                .get(format!("{}/admin/stats", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?
        }
        Commands::Submit {
            name,
            email,
            phone,
            loan_amount,
            source,
        } => {
            let res = client
                .post(format!("{}/api/leads", cli.url))
                .json(&json!({
                    "name": name,
                    "email": email,
                    "phone": phone,
                    "loanAmount": loan_amount,
                    "source": source,
                }))
                .send()
                .await?;
            print_response(res).await?
        }
        Commands::CheckContent { dir } => check_content(&dir)?,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn check_content(dir: &std::path::Path) -> Result<bool, Box<dyn std::error::Error>> {
    let report = Scanner::default().scan_directory(dir)?;

    for finding in &report.findings {
        println!(
            "{}:{}: {}[{}] {}",
            finding.path.display(),
            finding.line,
            finding.severity,
            finding.rule,
            finding.message
        );
        if !finding.excerpt.is_empty() {
            println!("    {}", finding.excerpt);
        }
    }
    println!(
        "{} files scanned, {} errors, {} warnings",
        report.files_scanned,
        report.error_count(),
        report.warning_count()
    );

    Ok(!report.has_errors())
}

async fn print_response(res: reqwest::Response) -> Result<bool, Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(false);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(true)
}
