/// OW Career — Observer
///
/// What it does:
///   1. Takes the player list (CLI args or CAREER_PLAYERS)
///   2. Detects platform (pc/psn/xbl) and, for pc, region (us/eu)
///   3. Fetches and parses every career profile concurrently
///   4. Prints level, rank and AllHeroes "Game" stats, events go to ./logs/
///
/// Run:
///   cargo run --bin career-observer -- "SirDoombox#2603" "VeLo InFerno"

use anyhow::{Context, Result};
use career_scraper::{CareerScraper, Player, PlayerCollection, ScraperConfig, ALL_HEROES};
use dotenv::dotenv;
use logger::{EventLogger, PlatformResolvedEvent, ProfileRefreshedEvent, now_iso};
use std::env;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_PLAYERS: &str = "SirDoombox#2603,VeLo InFerno,Rolingachu";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let started = Instant::now();
    let config = ScraperConfig::from_env();
    let log_dir = env::var("CAREER_LOG_DIR").unwrap_or_else(|_| "logs".to_string());
    let event_log = EventLogger::new(log_dir);

    info!("=== OW Career Observer ===");
    info!("Base URL: {}", config.base_url);

    let scraper = CareerScraper::new(&config).context("Failed to build career scraper")?;

    let mut players = PlayerCollection::new();
    for name in player_names() {
        match Player::from_username(&name) {
            Ok(player) => players.push(player),
            Err(e) => warn!("Skipping {}: {}", name, e),
        }
    }
    info!("Players: {}", players.len());

    let platforms = players.detect_platforms(&scraper).await;
    for (player, result) in players.iter().zip(platforms) {
        if let Err(e) = result {
            warn!("Platform detection failed for {}: {}", player.username(), e);
        }
    }
    let regions = players.detect_regions(&scraper).await;
    for (player, result) in players.iter().zip(regions) {
        if let Err(e) = result {
            warn!("Region detection failed for {}: {}", player.username(), e);
        }
    }

    for player in &players {
        let _ = event_log.log(&PlatformResolvedEvent {
            ts:       now_iso(),
            event:    "PLATFORM_RESOLVED",
            username: player.username().to_string(),
            platform: player.platform().to_string(),
            region:   player.region().to_string(),
        });
    }

    let results = players.update_all(&scraper).await;

    for (player, result) in players.iter().zip(results) {
        let snapshot = player.snapshot();
        let _ = event_log.log(&ProfileRefreshedEvent {
            ts:                 now_iso(),
            event:              "PROFILE_REFRESHED",
            username:           player.username().to_string(),
            platform:           player.platform().to_string(),
            region:             player.region().to_string(),
            ok:                 result.is_ok(),
            player_level:       snapshot.map(|s| s.player_level),
            competitive_rank:   snapshot.map(|s| s.competitive_rank),
            casual_heroes:      snapshot.map_or(0, |s| s.casual.heroes.len()),
            competitive_heroes: snapshot.map_or(0, |s| s.competitive.heroes.len()),
            message:            result.as_ref().err().map(|e| e.to_string()).unwrap_or_else(|| "ok".to_string()),
        });

        match result {
            Ok(()) => print_player(player),
            Err(e) => warn!("{} not refreshed: {}", player.username(), e),
        }
    }

    info!("Operation completed in {:?}", started.elapsed());
    Ok(())
}

fn player_names() -> Vec<String> {
    let args: Vec<String> = env::args().skip(1).collect();
    if !args.is_empty() {
        return args;
    }
    env::var("CAREER_PLAYERS")
        .unwrap_or_else(|_| DEFAULT_PLAYERS.to_string())
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn print_player(player: &Player) {
    let Some(snapshot) = player.snapshot() else { return };

    println!(
        "{} | Platform: {} | Level: {} | Rank: {}",
        player.username(), player.platform(), snapshot.player_level, snapshot.competitive_rank
    );
    println!("{}", snapshot.portrait_url);
    println!("---------------------------");
    for (title, mode) in [("Casual Stats", &snapshot.casual), ("Competitive Stats", &snapshot.competitive)] {
        println!("{title}:");
        if let Some(game) = mode.heroes.bucket(ALL_HEROES, "Game") {
            for (label, value) in game.iter() {
                println!("{label}: {value}");
            }
        }
        println!("---------------------------");
    }
    println!();
}
