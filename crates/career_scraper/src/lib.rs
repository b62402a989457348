//! Career profile scraper.
//!
//! Pulls a player's public career page, picks the right stat tables out of
//! the many look-alike ones, and turns them into typed records:
//! rank/level, miscellaneous stats and per-hero stat buckets for both modes.
//!
//! Profile URL (each segment percent-encoded):
//!
//! ```text
//! pc:      <base>/pc/<us|eu>/<Name-1234>
//! console: <base>/<psn|xbl>/<username>
//! ```

pub mod client;
pub mod collection;
pub mod config;
pub mod error;
pub mod heroes;
pub mod identity;
pub mod player;
pub mod probe;
pub mod profile;
pub mod stats;
pub mod table;
pub mod value;

pub use client::{CareerClient, HttpCareerClient, ReplayClient};
pub use collection::PlayerCollection;
pub use config::ScraperConfig;
pub use error::{CareerError, Result};
pub use heroes::{HeroRoster, HeroStatsAggregator, HeroStatsCollection, Mode, StatBucket, ALL_HEROES};
pub use identity::{Identity, Platform, Region, ResolutionState};
pub use player::{CareerScraper, Player, PlayerSnapshot};
pub use probe::EndpointProber;
pub use profile::{ModeStats, ProfilePage, ProfileParser};
pub use stats::{MiscellaneousStats, RecordBuilder, StatMapper, StatRecord};
pub use table::{StatRow, TableExtractor};
pub use value::parse_value;
