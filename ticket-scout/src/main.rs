use std::io::{self, Write as _};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

use ticket_scout::domain::AvailabilityEntry;
use ticket_scout::inventory::{InventoryClient, InventoryConfig};
use ticket_scout::route::{CachedRouteClient, RouteCacheConfig, RouteClient, RouteConfig};
use ticket_scout::search::{ExtensionOutcome, OpportunitySearch, SearchConfig, classify};
use ticket_scout::stations::{
    Station, StationCache, StationDirectory, StationsClient, StationsConfig, load_directory,
};
use ticket_scout::transport::{HttpTransport, TransportConfig};

/// Most fuzzy matches shown before asking for a narrower keyword.
const MAX_MATCHES: usize = 20;

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout is the interactive surface.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ticket_scout=info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    println!("Ticket scout: finds still-on-sale longer segments for sold-out trains.");
    println!();

    let transport =
        HttpTransport::new(TransportConfig::default()).expect("Failed to build HTTP client");

    println!("Loading station directory...");
    let stations_client = StationsClient::new(transport.clone(), StationsConfig::default());
    let station_cache = StationCache::default();
    let directory = Arc::new(
        load_directory(&stations_client, &station_cache)
            .await
            .expect("Failed to load the station directory"),
    );
    println!("Loaded {} stations.", directory.len());

    let inventory = InventoryClient::new(
        transport.clone(),
        directory.clone(),
        InventoryConfig::default(),
    );
    inventory
        .init()
        .await
        .expect("Failed to reach the booking page");
    if let Some(endpoint) = inventory.active_endpoint().await {
        println!("Query endpoint: {endpoint}");
    }
    println!();

    let routes = CachedRouteClient::new(
        RouteClient::new(transport, RouteConfig::default()),
        &RouteCacheConfig::default(),
    );
    let search_config = SearchConfig::default();

    loop {
        let Some(origin) = prompt_station(&directory, "Origin") else {
            break;
        };
        let Some(destination) = prompt_station(&directory, "Destination") else {
            break;
        };
        let Some(date) = prompt_date() else {
            break;
        };

        run_search(
            &inventory,
            &routes,
            &directory,
            &search_config,
            &origin,
            &destination,
            date,
        )
        .await;

        match prompt("Search again? (y/n): ") {
            Some(answer) if answer.eq_ignore_ascii_case("y") => continue,
            _ => break,
        }
    }

    println!(
        "Done. {} availability requests issued.",
        inventory.requests_issued().await
    );
}

/// One availability query plus the opportunity probe for its sold-out
/// extendable trains.
async fn run_search(
    inventory: &InventoryClient<HttpTransport>,
    routes: &CachedRouteClient<HttpTransport>,
    directory: &StationDirectory,
    config: &SearchConfig,
    origin: &Station,
    destination: &Station,
    date: NaiveDate,
) {
    println!();
    println!(
        "{} -> {} on {}",
        origin.name,
        destination.name,
        date.format("%Y-%m-%d")
    );

    let entries = inventory
        .query_availability(&origin.code, &destination.code, date)
        .await;
    if entries.is_empty() {
        println!("No trains found (or the service stayed throttled).");
        return;
    }

    print_entries(&entries);

    let classified = classify(entries);
    println!(
        "{} with seats, {} sold out but extendable, {} sold-out dead ends.",
        classified.available.len(),
        classified.extendable.len(),
        classified.dead_end.len()
    );

    let mut opportunities = Vec::new();
    if !classified.extendable.is_empty() {
        println!();
        println!(
            "Probing {} sold-out trains for longer segments...",
            classified.extendable.len()
        );

        let search = OpportunitySearch::new(inventory, routes, directory, config);
        let total = classified.extendable.len();

        for (idx, train) in classified.extendable.iter().enumerate() {
            println!("[{}/{}] {}", idx + 1, total, train.train_code);
            match search
                .analyze_train(&origin.code, &destination.name, train, date)
                .await
            {
                ExtensionOutcome::Found(opportunity) => {
                    println!(
                        "  buy to {} ({})",
                        opportunity.buy_to,
                        opportunity.extended.seat_summary()
                    );
                    opportunities.push(opportunity);
                }
                ExtensionOutcome::RouteUnavailable => println!("  route unavailable"),
                ExtensionOutcome::NoStopsBeyond => {
                    println!("  no stops beyond {}", destination.name)
                }
                ExtensionOutcome::Exhausted { sampled } => {
                    println!("  nothing on sale ({sampled} interior stops sampled)")
                }
            }
        }

        println!();
        if opportunities.is_empty() {
            println!("No buy-long opportunities found.");
        } else {
            println!("Opportunities:");
            for opportunity in &opportunities {
                println!(
                    "  {} dep {}: buy {} -> {} [{}], alight at {}",
                    opportunity.original.train_code,
                    opportunity.original.depart_time,
                    opportunity.extended.from_name,
                    opportunity.buy_to,
                    opportunity.extended.seat_summary(),
                    opportunity.original.to_name
                );
            }
        }
    }

    println!(
        "Summary: {} bookable as queried, {} buy-long options, {} requests issued.",
        classified.available.len(),
        opportunities.len(),
        inventory.requests_issued().await
    );
}

fn print_entries(entries: &[AvailabilityEntry]) {
    println!();
    for entry in entries {
        let marker = if entry.has_seats() { ' ' } else { 'x' };
        println!(
            "  {} {:<6} {} {} -> {} {}  ({})  {}",
            marker,
            entry.train_code,
            entry.depart_time,
            entry.from_name,
            entry.to_name,
            entry.arrive_time,
            entry.duration,
            entry.seat_summary(),
        );
    }
    println!();
}

/// Read one trimmed line; `None` on EOF or an explicit quit.
fn prompt(message: &str) -> Option<String> {
    print!("{message}");
    io::stdout().flush().ok()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line).ok()? == 0 {
        return None;
    }

    let trimmed = line.trim().to_string();
    if trimmed.eq_ignore_ascii_case("q") {
        return None;
    }
    Some(trimmed)
}

/// Resolve a station interactively: exact name first, then fuzzy matches
/// with a numbered pick when the keyword is ambiguous.
fn prompt_station(directory: &StationDirectory, label: &str) -> Option<Station> {
    loop {
        let keyword = prompt(&format!("{label} station (name or pinyin, q to quit): "))?;
        if keyword.is_empty() {
            continue;
        }

        if let Some(station) = directory.lookup_by_name(&keyword) {
            return Some(station.clone());
        }

        let matches = directory.fuzzy_search(&keyword);
        match matches.len() {
            0 => println!("No station matches '{keyword}'."),
            1 => {
                let station = matches[0].clone();
                println!("Using {} ({})", station.name, station.code);
                return Some(station);
            }
            _ => {
                println!("Multiple matches:");
                for (idx, station) in matches.iter().take(MAX_MATCHES).enumerate() {
                    println!("  {:>2}. {} ({})", idx + 1, station.name, station.code);
                }
                if matches.len() > MAX_MATCHES {
                    println!(
                        "  ... and {} more; refine the keyword",
                        matches.len() - MAX_MATCHES
                    );
                }

                let choice = prompt("Pick a number (blank to search again): ")?;
                if let Ok(idx) = choice.parse::<usize>() {
                    if (1..=matches.len().min(MAX_MATCHES)).contains(&idx) {
                        return Some(matches[idx - 1].clone());
                    }
                }
            }
        }
    }
}

fn prompt_date() -> Option<NaiveDate> {
    loop {
        let input = prompt("Travel date (YYYY-MM-DD, q to quit): ")?;
        match NaiveDate::parse_from_str(&input, "%Y-%m-%d") {
            Ok(date) => return Some(date),
            Err(_) => println!("Could not parse '{input}' as YYYY-MM-DD."),
        }
    }
}
