//! Player profile orchestration.
//!
//! A [`Player`] moves from `Unresolved` through `PlatformKnown` to `Ready`
//! via platform/region detection, and only a `Ready` player can refresh.
//! A refresh builds a complete [`PlayerSnapshot`] off to the side and
//! installs it only once everything parsed; a failed refresh leaves the
//! previous snapshot in place.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::client::{CareerClient, HttpCareerClient};
use crate::config::ScraperConfig;
use crate::error::{CareerError, Result};
use crate::heroes::HeroRoster;
use crate::identity::{Identity, Platform, Region, ResolutionState};
use crate::probe::EndpointProber;
use crate::profile::{ModeStats, ProfileParser};

/// Shared, read-only scraping context: network client, base URL, parser.
pub struct CareerScraper {
    client: Arc<dyn CareerClient>,
    base_url: String,
    parser: ProfileParser,
}

impl CareerScraper {
    /// reqwest client, roster from `roster_path` when set.
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let roster = match &config.roster_path {
            Some(path) => HeroRoster::from_path(path)?,
            None => HeroRoster::default(),
        };
        info!("hero roster {} ({} heroes)", roster.version, roster.heroes.len());
        Self::with_client(Arc::new(HttpCareerClient::new(config)), &config.base_url, roster)
    }

    pub fn with_client(client: Arc<dyn CareerClient>, base_url: &str, roster: HeroRoster) -> Result<Self> {
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            parser: ProfileParser::new(roster)?,
        })
    }

    pub fn client(&self) -> &dyn CareerClient {
        self.client.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn parser(&self) -> &ProfileParser {
        &self.parser
    }

    pub fn prober(&self) -> EndpointProber<'_> {
        EndpointProber::new(self.client.as_ref(), &self.base_url)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub identity: Identity,
    pub profile_url: String,
    pub player_level: u16,
    pub competitive_rank: u16,
    pub portrait_url: String,
    pub casual: ModeStats,
    pub competitive: ModeStats,
    pub last_refreshed: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Player {
    identity: Identity,
    snapshot: Option<PlayerSnapshot>,
}

impl Player {
    /// See [`Identity::new`] for how platform and region are settled.
    pub fn new(username: impl Into<String>, platform: Platform, region: Region) -> Result<Self> {
        Ok(Self { identity: Identity::new(username, platform, region)?, snapshot: None })
    }

    /// Battletag or console name, platform and region left to detection.
    pub fn from_username(username: impl Into<String>) -> Result<Self> {
        Self::new(username, Platform::Unknown, Region::Unknown)
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn username(&self) -> &str {
        &self.identity.username
    }

    pub fn platform(&self) -> Platform {
        self.identity.platform
    }

    pub fn region(&self) -> Region {
        self.identity.region
    }

    pub fn state(&self) -> ResolutionState {
        self.identity.state()
    }

    pub fn profile_url(&self, base_url: &str) -> Option<String> {
        self.identity.profile_url(base_url)
    }

    /// Last successful refresh.
    pub fn snapshot(&self) -> Option<&PlayerSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.snapshot.as_ref().map(|s| s.last_refreshed)
    }

    /// No request once the platform is known.
    pub async fn detect_platform(&mut self, scraper: &CareerScraper) -> Result<Platform> {
        if self.identity.platform.is_known() {
            return Ok(self.identity.platform);
        }
        let platform = scraper.prober().resolve_platform(&self.identity.username).await?;
        self.identity.platform = platform;
        Ok(platform)
    }

    /// pc only; console players and already known regions issue no request.
    pub async fn detect_region(&mut self, scraper: &CareerScraper) -> Result<Region> {
        if self.identity.platform != Platform::Pc || self.identity.region.is_known() {
            return Ok(self.identity.region);
        }
        let region = scraper.prober().resolve_region(&self.identity).await?;
        self.identity.region = region;
        Ok(region)
    }

    fn ready_url(&self, base_url: &str) -> Result<String> {
        if self.identity.platform == Platform::Pc && !self.identity.region.is_known() {
            return Err(CareerError::RegionUndefined);
        }
        if !self.identity.platform.is_known() {
            return Err(CareerError::PlatformUndefined);
        }
        self.identity.profile_url(base_url).ok_or(CareerError::ProfileUrlUndefined)
    }

    /// Fetch and parse the profile, replacing the snapshot on success only.
    pub async fn update_stats(&mut self, scraper: &CareerScraper) -> Result<&PlayerSnapshot> {
        let url = self.ready_url(scraper.base_url())?;
        debug!("fetching profile {}", url);

        let html = scraper.client().fetch_page(&url).await?;
        let page = scraper.parser().parse(&html)?;

        let snapshot = PlayerSnapshot {
            identity: self.identity.clone(),
            profile_url: url,
            player_level: page.player_level,
            competitive_rank: page.competitive_rank,
            portrait_url: page.portrait_url,
            casual: page.casual,
            competitive: page.competitive,
            last_refreshed: Utc::now(),
        };

        info!(
            "{} refreshed: level {} rank {} ({} casual / {} competitive heroes)",
            self.identity.username,
            snapshot.player_level,
            snapshot.competitive_rank,
            snapshot.casual.heroes.len(),
            snapshot.competitive.heroes.len()
        );

        Ok(self.snapshot.insert(snapshot))
    }

    /// [`Player::update_stats`] bounded by `deadline`.
    pub async fn update_stats_within(&mut self, scraper: &CareerScraper, deadline: Duration) -> Result<&PlayerSnapshot> {
        let url = self.ready_url(scraper.base_url())?;
        match tokio::time::timeout(deadline, self.update_stats(scraper)).await {
            Ok(result) => result,
            Err(_) => Err(CareerError::Timeout { url }),
        }
    }
}
