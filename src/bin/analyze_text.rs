//! Utility to analyze a meal description from the command line
//!
//! Usage: analyze_text [--no-usda] [TEXT...]
//! Reads the text from stdin when no TEXT is given.

use std::io::Read;

use tracing_subscriber::EnvFilter;

use nta::analyzer::Analyzer;
use nta::config::NtaConfig;
use nta::models::AnalysisRequest;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nta=warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let mut include_usda = true;
    let mut words = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--no-usda" => include_usda = false,
            "-h" | "--help" => {
                eprintln!("Usage: analyze_text [--no-usda] [TEXT...]");
                return Ok(());
            }
            _ => words.push(arg),
        }
    }

    let text = if words.is_empty() {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer.trim().to_string()
    } else {
        words.join(" ")
    };

    let config = NtaConfig::from_env()?;
    let analyzer = Analyzer::from_config(&config)?;

    let mut request = AnalysisRequest::new(text);
    if !include_usda {
        request = request.without_external();
    }

    let analysis = analyzer.analyze(&request).await;
    println!("{}", serde_json::to_string_pretty(&analysis)?);

    if !analysis.success {
        std::process::exit(1);
    }
    Ok(())
}
