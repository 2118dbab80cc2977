use clap::{Parser, Subcommand};
use reqwest::Url;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "arma-cli")]
#[command(about = "Query CLI for the arma-api service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List classes, optionally for one mod and/or type
    Classes {
        #[arg(short, long = "mod")]
        mod_name: Option<String>,
        #[arg(short = 't', long = "type")]
        item_type: Option<String>,
        #[arg(short, long, default_value_t = 0)]
        page: i64,
        #[arg(short, long, default_value_t = -1, allow_negative_numbers = true)]
        size: i64,
    },
    /// Search every mod by count/weight or free text
    Search {
        term: String,
        #[arg(short, long, default_value_t = 0)]
        page: i64,
        #[arg(short, long, default_value_t = -1, allow_negative_numbers = true)]
        size: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let request = match cli.command {
        Commands::Classes { mod_name, item_type, page, size } => {
            let mut segments = vec!["classes".to_string()];
            segments.extend(mod_name);
            let mut query = vec![("page", page.to_string()), ("size", size.to_string())];
            if let Some(t) = item_type {
                query.push(("type", t));
            }
            client.get(endpoint(&cli.url, &segments)?).query(&query)
        }
        Commands::Search { term, page, size } => {
            let segments = ["classes".to_string(), "search".to_string(), term];
            client
                .get(endpoint(&cli.url, &segments)?)
                .query(&[("page", page.to_string()), ("size", size.to_string())])
        }
    };

    print_response(request.send().await?).await
}

/// Append percent-encoded path segments to the base URL.
fn endpoint(base: &str, segments: &[String]) -> Result<Url, Box<dyn std::error::Error>> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| format!("{base} cannot be used as a base URL"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        eprintln!("Response: {}", text);
        return Ok(());
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
