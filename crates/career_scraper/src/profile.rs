//! Whole-page parse of a career profile.

use scraper::{Html, Selector};
use tracing::debug;

use crate::error::{CareerError, Result};
use crate::heroes::{HeroRoster, HeroStatsAggregator, HeroStatsCollection, Mode, ALL_HEROES};
use crate::stats::{MiscellaneousStats, StatMapper, MISCELLANEOUS_TITLE};
use crate::table::{element_text, selector};

const PORTRAIT_SELECTOR: &str = ".player-portrait";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModeStats {
    pub heroes: HeroStatsCollection,
    /// `None` when the AllHeroes block has no Miscellaneous table.
    pub miscellaneous: Option<MiscellaneousStats>,
}

/// Everything read off one profile page.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePage {
    pub player_level: u16,
    pub competitive_rank: u16,
    pub portrait_url: String,
    pub casual: ModeStats,
    pub competitive: ModeStats,
}

pub struct ProfileParser {
    aggregator: HeroStatsAggregator,
    misc_mapper: StatMapper<MiscellaneousStats>,
    level: Selector,
    rank: Selector,
    portrait: Selector,
}

impl ProfileParser {
    pub fn new(roster: HeroRoster) -> Result<Self> {
        Ok(Self {
            aggregator: HeroStatsAggregator::new(roster)?,
            misc_mapper: StatMapper::new()?,
            level: selector("div.player-level div")?,
            rank: selector("div.competitive-rank div")?,
            portrait: selector(PORTRAIT_SELECTOR)?,
        })
    }

    pub fn aggregator(&self) -> &HeroStatsAggregator {
        &self.aggregator
    }

    pub fn parse(&self, html: &str) -> Result<ProfilePage> {
        self.parse_document(&Html::parse_document(html))
    }

    /// Level and rank default to 0; a missing portrait fails the whole parse.
    pub fn parse_document(&self, document: &Html) -> Result<ProfilePage> {
        let player_level = self.read_u16(document, &self.level);
        let competitive_rank = self.read_u16(document, &self.rank);

        let portrait_url = document
            .select(&self.portrait)
            .next()
            .and_then(|e| e.value().attr("src"))
            .map(|src| src.trim().to_string())
            .ok_or(CareerError::StructuralParseFailure { element: PORTRAIT_SELECTOR })?;

        let casual = self.mode_stats(document, Mode::Casual);
        let competitive = self.mode_stats(document, Mode::Competitive);

        debug!(
            "parsed profile: level={} rank={} casual_heroes={} competitive_heroes={}",
            player_level,
            competitive_rank,
            casual.heroes.len(),
            competitive.heroes.len()
        );

        Ok(ProfilePage { player_level, competitive_rank, portrait_url, casual, competitive })
    }

    fn read_u16(&self, document: &Html, selector: &Selector) -> u16 {
        document
            .select(selector)
            .next()
            .and_then(|e| element_text(e).parse::<u16>().ok())
            .unwrap_or(0)
    }

    fn mode_stats(&self, document: &Html, mode: Mode) -> ModeStats {
        let heroes = self.aggregator.collect(document, mode);
        let miscellaneous = self
            .aggregator
            .hero_block(document, mode, ALL_HEROES)
            .and_then(|block| self.aggregator.extractor().find_table(block, MISCELLANEOUS_TITLE))
            .map(|rows| MiscellaneousStats::from_rows(&self.misc_mapper, &rows));

        ModeStats { heroes, miscellaneous }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ProfileParser {
        ProfileParser::new(HeroRoster::default()).unwrap()
    }

    const PAGE: &str = r#"<html><body>
        <img class="player-portrait" src=" https://cdn.test/portrait.png ">
        <div class="player-level"><div>57</div></div>
        <div class="competitive-rank"><div>2,431</div></div>
        <div id="quickplay">
          <div data-category-id="0x02E00000FFFFFFFF">
            <table class="data-table"><thead><tr><th>Miscellaneous</th></tr></thead><tbody>
              <tr><td>Defensive Assists</td><td>150</td></tr>
              <tr><td>Unknown Stat</td><td>7</td></tr>
            </tbody></table>
          </div>
        </div>
        </body></html>"#;

    #[test]
    fn reads_scalars_portrait_and_miscellaneous() {
        let page = parser().parse(PAGE).unwrap();

        assert_eq!(page.player_level, 57);
        assert_eq!(page.competitive_rank, 0, "non-numeric rank falls back to 0");
        assert_eq!(page.portrait_url, "https://cdn.test/portrait.png");

        let misc = page.casual.miscellaneous.unwrap();
        assert_eq!(misc, MiscellaneousStats { defensive_assists: 150.0, ..Default::default() });
        assert!(page.competitive.miscellaneous.is_none());
        assert!(page.competitive.heroes.is_empty());
    }

    #[test]
    fn missing_portrait_is_structural_failure() {
        let err = parser()
            .parse(r#"<div class="player-level"><div>5</div></div>"#)
            .unwrap_err();
        assert!(matches!(err, CareerError::StructuralParseFailure { element: ".player-portrait" }));
    }

    #[test]
    fn missing_level_and_rank_default_to_zero() {
        let page = parser().parse(r#"<img class="player-portrait" src="p.png">"#).unwrap();
        assert_eq!(page.player_level, 0);
        assert_eq!(page.competitive_rank, 0);
    }
}
