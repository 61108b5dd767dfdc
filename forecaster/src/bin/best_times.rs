//! Best Times - interactive console report
//!
//! Prompts for a user id, how many slots to show and whether to print local
//! time, then lists the cheapest upcoming hours for every catalog item.
//!
//! Environment variables: see `Config` (MIN_PERCENT, MAX_PERCENT, BASE_PRICE,
//! TOP_K, SHOP_CLOSES, ITEMS_PATH, DISPLAY_TZ).

use chrono::Utc;
use std::io::{self, BufRead, Write};

use shop_forecaster::catalog::Catalog;
use shop_forecaster::config::Config;
use shop_forecaster::services::best_times::find_best_times;
use shop_forecaster::services::presentation::{format_candidate, DisplayZone};

fn prompt(input: &mut impl BufRead, message: &str) -> io::Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let catalog = match Catalog::load(&config.items_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let user_id = prompt(&mut input, "Enter your User ID: ")?;
    if user_id.is_empty() {
        log::error!("A user id is required");
        std::process::exit(1);
    }

    let top_k = match prompt(&mut input, "How many best times would you like to see?: ")?.parse() {
        Ok(count) => count,
        Err(_) => {
            log::warn!("Using default of {} best times", config.top_k);
            config.top_k
        }
    };

    let zone = match prompt(&mut input, "Print local time? (true/false): ")?.as_str() {
        "true" => DisplayZone::Local,
        _ => config.display_zone,
    };

    let now = Utc::now();
    if now >= config.shop_closes {
        log::warn!("The shop closed at {}", config.shop_closes);
    }

    println!("\nBest times to buy: ");
    for item in catalog.items() {
        let best = find_best_times(
            &user_id,
            &item.id,
            now,
            &config.shop_closes,
            config.base_price,
            &config.band,
            top_k,
        );

        println!("Item: {}", item.name);
        for candidate in &best {
            println!(
                "\t- {}",
                format_candidate(candidate, config.base_price, &now, &zone)
            );
        }
        println!();
    }

    Ok(())
}
