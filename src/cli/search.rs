//! Search command handler
//!
//! One-shot place lookup, or an interactive autocomplete loop over stdin.

use crate::config::{Config, Requirement};
use crate::error::Result;
use crate::geo::{format_location_name, is_searchable, GeoBackend, Geocoder, GeocodingFeature};
use crate::search::{SearchPhase, SearchSession, SearchView};
use clap::Args;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Place to search for; reads queries from stdin when omitted
    pub query: Option<String>,

    /// Maximum number of results
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    let mut config = Config::load()?;
    config.require(Requirement::Client)?;
    if let Some(limit) = args.limit {
        config.search.limit = limit;
    }

    let geocoder = Geocoder::from_config(&config)?;

    match args.query {
        Some(query) => search_once(&geocoder, &query, config.search.limit).await,
        None => interactive(geocoder, &config).await,
    }
}

async fn search_once(geocoder: &Geocoder, query: &str, limit: usize) -> Result<()> {
    if !is_searchable(query) {
        println!("Type at least two characters to search.");
        return Ok(());
    }

    let features = geocoder.search(query, limit).await?;
    print_results(&features);
    Ok(())
}

/// Feed each stdin line to a search session and print what it publishes
async fn interactive(geocoder: Geocoder, config: &Config) -> Result<()> {
    let session = SearchSession::from_config(Arc::new(geocoder), config);
    let mut updates = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut reading = true;

    eprintln!("Type a place name per line; end with Ctrl-D.");

    loop {
        tokio::select! {
            line = lines.next_line(), if reading => match line? {
                Some(line) => session.input(&line),
                None => {
                    reading = false;
                    if session.view().phase == SearchPhase::Idle {
                        break;
                    }
                }
            },
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = updates.borrow_and_update().clone();
                if view.phase == SearchPhase::Idle {
                    print_view(&view);
                    if !reading {
                        break;
                    }
                }
            }
        }
    }

    session.close();
    Ok(())
}

fn print_view(view: &SearchView) {
    if !is_searchable(&view.query) {
        return;
    }

    println!("{}:", view.query.trim());
    match &view.error {
        Some(message) => println!("  {}", message),
        None => print_results(&view.results),
    }
}

fn print_results(features: &[GeocodingFeature]) {
    if features.is_empty() {
        println!("  No matches.");
        return;
    }

    for feature in features {
        let p = &feature.properties;
        println!("  {}  ({:.4}, {:.4})", format_location_name(p), p.lat, p.lon);
    }
}
