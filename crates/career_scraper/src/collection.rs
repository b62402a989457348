//! Batch operations over many players.
//!
//! Players share nothing but the read-only [`CareerScraper`], so every batch
//! step runs all players concurrently and reports one result per player,
//! in insertion order.

use futures_util::future::join_all;
use tracing::info;

use crate::error::Result;
use crate::identity::{Platform, Region};
use crate::player::{CareerScraper, Player};

#[derive(Debug, Clone, Default)]
pub struct PlayerCollection {
    players: Vec<Player>,
}

impl PlayerCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, player: Player) {
        self.players.push(player);
    }

    pub fn get(&self, username: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.username() == username)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Player> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub async fn detect_platforms(&mut self, scraper: &CareerScraper) -> Vec<Result<Platform>> {
        join_all(self.players.iter_mut().map(|p| p.detect_platform(scraper))).await
    }

    pub async fn detect_regions(&mut self, scraper: &CareerScraper) -> Vec<Result<Region>> {
        join_all(self.players.iter_mut().map(|p| p.detect_region(scraper))).await
    }

    pub async fn update_all(&mut self, scraper: &CareerScraper) -> Vec<Result<()>> {
        let results: Vec<Result<()>> = join_all(
            self.players
                .iter_mut()
                .map(|p| async move { p.update_stats(scraper).await.map(|_| ()) }),
        )
        .await;

        let ok = results.iter().filter(|r| r.is_ok()).count();
        info!("refreshed {}/{} players", ok, results.len());
        results
    }
}

impl FromIterator<Player> for PlayerCollection {
    fn from_iter<I: IntoIterator<Item = Player>>(iter: I) -> Self {
        Self { players: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a PlayerCollection {
    type Item = &'a Player;
    type IntoIter = std::slice::Iter<'a, Player>;

    fn into_iter(self) -> Self::IntoIter {
        self.players.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ReplayClient;
    use crate::error::CareerError;
    use crate::heroes::HeroRoster;
    use std::sync::Arc;

    const PAGE: &str = r#"<img class="player-portrait" src="p.png"><div class="player-level"><div>5</div></div>"#;

    #[tokio::test]
    async fn batch_resolves_and_refreshes_each_player_independently() {
        let client = Arc::new(
            ReplayClient::new()
                .with_page("http://career.test/pc/us/Tag-1", PAGE)
                .with_page("http://career.test/psn/Console", PAGE),
        );
        let scraper =
            CareerScraper::with_client(client.clone(), "http://career.test", HeroRoster::default()).unwrap();

        let mut players: PlayerCollection = ["Tag#1", "Console", "Ghost"]
            .into_iter()
            .map(|name| Player::from_username(name).unwrap())
            .collect();

        let platforms = players.detect_platforms(&scraper).await;
        let platforms: Vec<Platform> = platforms.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(platforms, vec![Platform::Pc, Platform::Psn, Platform::Unknown]);

        let regions: Vec<Region> = players
            .detect_regions(&scraper)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(regions, vec![Region::Us, Region::Unknown, Region::Unknown]);

        let results = players.update_all(&scraper).await;
        assert!(results[0].is_ok());
        assert!(results[1].is_ok());
        assert!(matches!(results[2], Err(CareerError::PlatformUndefined)));

        assert_eq!(players.get("Tag#1").and_then(|p| p.snapshot()).map(|s| s.player_level), Some(5));
        assert!(players.get("Ghost").and_then(|p| p.snapshot()).is_none());
    }
}
