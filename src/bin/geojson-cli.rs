use clap::{Parser, Subcommand};
use reqwest::Url;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "geojson-cli")]
#[command(about = "Client for the GeoJSON proxy", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a FeatureCollection and follow Next-Page links
    Fetch {
        /// Proxy URL, e.g. http://localhost:8080/resource/erm2-nwe9.json?$limit=100
        url: Url,

        /// Maximum number of pages to fetch
        #[arg(short, long, default_value_t = 1)]
        pages: u32,

        /// Print every feature title
        #[arg(short, long)]
        titles: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Fetch { url, pages, titles } => {
            let mut next = Some(url);
            let mut page = 0;
            while let Some(url) = next.take() {
                if page == pages {
                    println!("Stopping after {} page(s); more available at {}", pages, url);
                    break;
                }
                page += 1;
                next = fetch_page(&client, url, page, titles).await?;
            }
        }
    }

    Ok(())
}

async fn fetch_page(
    client: &reqwest::Client,
    url: Url,
    page: u32,
    titles: bool,
) -> Result<Option<Url>, Box<dyn std::error::Error>> {
    let res = client.get(url.clone()).send().await?;
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: proxy returned status {} for {}", status, url);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(None);
    }

    let next = res
        .headers()
        .get("next-page")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<Url>().ok());

    let json: Value = res.json().await?;
    let features = json["features"].as_array().map(Vec::as_slice).unwrap_or_default();
    println!("Page {}: {} feature(s) from {}", page, features.len(), url);
    if titles {
        for feature in features {
            if let Some(title) = feature["properties"]["title"].as_str() {
                println!("  {}", title);
            }
        }
    }
    match &next {
        Some(next) => println!("Next-Page: {}", next),
        None => println!("No further pages"),
    }
    Ok(next)
}
