//! Platform / region discovery by probing candidate profile URLs.
//!
//! Candidates are tried in a fixed order and the first success status wins.
//! All candidates failing is not an error, the result is simply `Unknown`.

use tracing::{debug, info, warn};

use crate::client::CareerClient;
use crate::error::Result;
use crate::identity::{is_battletag, Identity, Platform, Region};

pub const PLATFORM_PROBE_ORDER: [Platform; 2] = [Platform::Psn, Platform::Xbl];
pub const REGION_PROBE_ORDER: [Region; 2] = [Region::Us, Region::Eu];

pub struct EndpointProber<'a> {
    client: &'a dyn CareerClient,
    base_url: &'a str,
}

impl<'a> EndpointProber<'a> {
    pub fn new(client: &'a dyn CareerClient, base_url: &'a str) -> Self {
        Self { client, base_url }
    }

    /// Battletags are pc without touching the network.
    pub async fn resolve_platform(&self, username: &str) -> Result<Platform> {
        if is_battletag(username) {
            return Ok(Platform::Pc);
        }

        for platform in PLATFORM_PROBE_ORDER {
            let candidate = Identity {
                username: username.to_string(),
                platform,
                region: Region::Unknown,
            };
            if self.probe(&candidate).await? {
                info!("{} resolved to platform {}", username, platform);
                return Ok(platform);
            }
        }

        warn!("no platform profile found for {}", username);
        Ok(Platform::Unknown)
    }

    /// Only meaningful for pc identities, anything else is `Unknown` with no request.
    pub async fn resolve_region(&self, identity: &Identity) -> Result<Region> {
        if identity.platform != Platform::Pc {
            return Ok(Region::Unknown);
        }

        for region in REGION_PROBE_ORDER {
            let candidate = Identity { region, ..identity.clone() };
            if self.probe(&candidate).await? {
                info!("{} resolved to region {}", identity.username, region);
                return Ok(region);
            }
        }

        warn!("no regional profile found for {}", identity.username);
        Ok(Region::Unknown)
    }

    async fn probe(&self, candidate: &Identity) -> Result<bool> {
        let Some(url) = candidate.profile_url(self.base_url) else {
            return Ok(false);
        };
        let ok = self.client.probe(&url).await?;
        debug!("probe {} -> {}", url, if ok { "hit" } else { "miss" });
        Ok(ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ReplayClient;

    const BASE: &str = "http://career.test";

    #[tokio::test]
    async fn battletag_needs_no_probe() {
        let client = ReplayClient::new();
        let prober = EndpointProber::new(&client, BASE);

        assert_eq!(prober.resolve_platform("Player#1234").await.unwrap(), Platform::Pc);
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn later_candidate_wins_when_earlier_fails() {
        let client = ReplayClient::new()
            .with_status("http://career.test/psn/ConsoleUser", 404)
            .with_page("http://career.test/xbl/ConsoleUser", "ok");
        let prober = EndpointProber::new(&client, BASE);

        assert_eq!(prober.resolve_platform("ConsoleUser").await.unwrap(), Platform::Xbl);
        assert_eq!(
            client.requests(),
            vec!["http://career.test/psn/ConsoleUser", "http://career.test/xbl/ConsoleUser"]
        );
    }

    #[tokio::test]
    async fn first_success_stops_probing() {
        let client = ReplayClient::new()
            .with_page("http://career.test/psn/ConsoleUser", "ok")
            .with_page("http://career.test/xbl/ConsoleUser", "ok");
        let prober = EndpointProber::new(&client, BASE);

        assert_eq!(prober.resolve_platform("ConsoleUser").await.unwrap(), Platform::Psn);
        assert_eq!(client.requests().len(), 1);
    }

    #[tokio::test]
    async fn all_failures_resolve_to_unknown() {
        let client = ReplayClient::new();
        let prober = EndpointProber::new(&client, BASE);

        assert_eq!(prober.resolve_platform("Nobody").await.unwrap(), Platform::Unknown);
        assert_eq!(client.requests().len(), 2);
    }

    #[tokio::test]
    async fn region_probes_us_then_eu() {
        let client = ReplayClient::new().with_page("http://career.test/pc/eu/Player-1234", "ok");
        let prober = EndpointProber::new(&client, BASE);
        let identity = Identity::new("Player#1234", Platform::Pc, Region::Unknown).unwrap();

        assert_eq!(prober.resolve_region(&identity).await.unwrap(), Region::Eu);
        assert_eq!(
            client.requests(),
            vec!["http://career.test/pc/us/Player-1234", "http://career.test/pc/eu/Player-1234"]
        );
    }

    #[tokio::test]
    async fn console_identity_has_no_region() {
        let client = ReplayClient::new();
        let prober = EndpointProber::new(&client, BASE);
        let identity = Identity::new("ConsoleUser", Platform::Psn, Region::Unknown).unwrap();

        assert_eq!(prober.resolve_region(&identity).await.unwrap(), Region::Unknown);
        assert!(client.requests().is_empty());
    }
}
