//! weather-lookup CLI entry point
//!
//! Weather by position or place name - CLI + proxy server

use weather_lookup::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }
}
