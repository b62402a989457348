//! Per-hero stat collection for one game mode.
//!
//! Page layout:
//!
//! ```text
//! <div id="quickplay">                                  mode container
//!   <div data-category-id="0x02E00000FFFFFFFF">         hero block (AllHeroes)
//!     <table class="data-table"><thead>Game</thead>...  category table
//! ```
//!
//! Which heroes and categories exist is configuration ([`HeroRoster`]), not
//! something read off the page. Combinations the page does not have are
//! left out of the collection entirely. A category with a configured label
//! list only keeps rows carrying one of those labels.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use tracing::debug;

use crate::error::{CareerError, Result};
use crate::table::{selector, TableExtractor};
use crate::value::parse_value;

pub const ALL_HEROES: &str = "AllHeroes";
pub const ALL_HEROES_CATEGORY_ID: &str = "0x02E00000FFFFFFFF";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Casual,
    Competitive,
}

impl Mode {
    pub fn container_selector(self) -> &'static str {
        match self {
            Mode::Casual => "#quickplay",
            Mode::Competitive => "#competitive",
        }
    }
}

// ── Roster ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HeroDef {
    pub name: String,
    pub category_id: String,
}

impl HeroDef {
    fn new(name: &str, category_id: &str) -> Self {
        Self { name: name.to_string(), category_id: category_id.to_string() }
    }
}

/// Heroes and stat categories to look for. The synthetic AllHeroes entry is
/// implicit and always comes first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HeroRoster {
    pub version: String,
    #[serde(default = "default_all_heroes_id")]
    pub all_heroes_id: String,
    pub heroes: Vec<HeroDef>,
    pub categories: Vec<String>,
    /// Category → accepted row labels. Categories not listed accept any label.
    #[serde(default)]
    pub labels: HashMap<String, Vec<String>>,
}

fn default_all_heroes_id() -> String {
    ALL_HEROES_CATEGORY_ID.to_string()
}

impl Default for HeroRoster {
    fn default() -> Self {
        let heroes = [
            ("Reaper", "0x02E0000000000002"),
            ("Tracer", "0x02E0000000000003"),
            ("Mercy", "0x02E0000000000004"),
            ("Hanzo", "0x02E0000000000005"),
            ("Torbjorn", "0x02E0000000000006"),
            ("Reinhardt", "0x02E0000000000007"),
            ("Pharah", "0x02E0000000000008"),
            ("Winston", "0x02E0000000000009"),
            ("Widowmaker", "0x02E000000000000A"),
            ("Bastion", "0x02E0000000000015"),
            ("Symmetra", "0x02E0000000000016"),
            ("Zenyatta", "0x02E0000000000020"),
            ("Genji", "0x02E0000000000029"),
            ("Roadhog", "0x02E0000000000040"),
            ("McCree", "0x02E0000000000042"),
            ("Junkrat", "0x02E0000000000065"),
            ("Zarya", "0x02E0000000000068"),
            ("Soldier76", "0x02E000000000006E"),
            ("Lucio", "0x02E0000000000079"),
            ("DVa", "0x02E000000000007A"),
            ("Mei", "0x02E00000000000DD"),
            ("Sombra", "0x02E000000000012E"),
            ("Ana", "0x02E000000000013B"),
            ("Orisa", "0x02E000000000013E"),
        ];
        let categories = [
            "Hero Specific", "Combat", "Assists", "Best", "Average", "Deaths",
            "Match Awards", "Game", "Miscellaneous",
        ];

        Self {
            version: "2017.03".to_string(),
            all_heroes_id: default_all_heroes_id(),
            heroes: heroes.iter().map(|(name, id)| HeroDef::new(name, id)).collect(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            labels: HashMap::new(),
        }
    }
}

impl HeroRoster {
    pub fn from_json(json: &str) -> Result<Self> {
        let roster: Self = serde_json::from_str(json)?;
        roster.validate()?;
        Ok(roster)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(CareerError::Roster("no stat categories configured".to_string()));
        }

        let mut names = HashSet::new();
        let mut ids = HashSet::new();
        for hero in self.entries() {
            if !ids.insert(hero.category_id.clone()) {
                return Err(CareerError::Roster(format!("category id '{}' listed twice", hero.category_id)));
            }
            if !names.insert(hero.name.clone()) {
                return Err(CareerError::Roster(format!("hero '{}' listed twice", hero.name)));
            }
        }

        let mut categories = HashSet::new();
        for category in &self.categories {
            if !categories.insert(category.as_str()) {
                return Err(CareerError::Roster(format!("category '{category}' listed twice")));
            }
        }

        for (category, labels) in &self.labels {
            if !categories.contains(category.as_str()) {
                return Err(CareerError::Roster(format!("labels given for unknown category '{category}'")));
            }
            let mut seen = HashSet::new();
            for label in labels {
                if !seen.insert(label.as_str()) {
                    return Err(CareerError::Roster(format!("label '{label}' listed twice in '{category}'")));
                }
            }
        }
        Ok(())
    }

    /// `None` when the category accepts any label.
    pub fn labels_for(&self, category: &str) -> Option<&[String]> {
        self.labels.get(category).map(Vec::as_slice)
    }

    /// AllHeroes first, then the roster in order.
    pub fn entries(&self) -> impl Iterator<Item = HeroDef> + '_ {
        std::iter::once(HeroDef::new(ALL_HEROES, &self.all_heroes_id)).chain(self.heroes.iter().cloned())
    }
}

// ── Collection ────────────────────────────────────────────────────────────────

/// Label → value pairs of one stat category, labels unique.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatBucket {
    pub name: String,
    stats: Vec<(String, f64)>,
}

impl StatBucket {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), stats: Vec::new() }
    }

    /// A repeated label overwrites in place.
    pub fn insert(&mut self, label: impl Into<String>, value: f64) {
        let label = label.into();
        match self.stats.iter_mut().find(|(l, _)| *l == label) {
            Some(slot) => slot.1 = value,
            None => self.stats.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.stats.iter().find(|(l, _)| l == label).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.stats.iter().map(|(l, v)| (l.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

/// Hero → category buckets, in roster order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeroStatsCollection {
    heroes: Vec<(String, Vec<StatBucket>)>,
}

impl HeroStatsCollection {
    pub fn get(&self, hero: &str) -> Option<&[StatBucket]> {
        self.heroes
            .iter()
            .find(|(name, _)| name == hero)
            .map(|(_, buckets)| buckets.as_slice())
    }

    pub fn bucket(&self, hero: &str, category: &str) -> Option<&StatBucket> {
        self.get(hero)?.iter().find(|b| b.name == category)
    }

    pub fn hero_names(&self) -> impl Iterator<Item = &str> {
        self.heroes.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[StatBucket])> {
        self.heroes.iter().map(|(name, buckets)| (name.as_str(), buckets.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.heroes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty()
    }
}

// ── Aggregator ────────────────────────────────────────────────────────────────

struct HeroScope {
    name: String,
    selector: Selector,
}

pub struct HeroStatsAggregator {
    roster: HeroRoster,
    heroes: Vec<HeroScope>,
    vocabulary: HashMap<String, HashSet<String>>,
    casual: Selector,
    competitive: Selector,
    extractor: TableExtractor,
}

impl HeroStatsAggregator {
    pub fn new(roster: HeroRoster) -> Result<Self> {
        roster.validate()?;

        let heroes = roster
            .entries()
            .map(|hero| -> Result<HeroScope> {
                let selector = selector(&format!("[data-category-id=\"{}\"]", hero.category_id))?;
                Ok(HeroScope { name: hero.name, selector })
            })
            .collect::<Result<Vec<_>>>()?;

        let vocabulary = roster
            .labels
            .iter()
            .map(|(category, labels)| (category.clone(), labels.iter().cloned().collect()))
            .collect();

        Ok(Self {
            roster,
            heroes,
            vocabulary,
            casual: selector(Mode::Casual.container_selector())?,
            competitive: selector(Mode::Competitive.container_selector())?,
            extractor: TableExtractor::new()?,
        })
    }

    pub fn roster(&self) -> &HeroRoster {
        &self.roster
    }

    pub fn extractor(&self) -> &TableExtractor {
        &self.extractor
    }

    fn mode_container<'a>(&self, document: &'a Html, mode: Mode) -> Option<ElementRef<'a>> {
        let selector = match mode {
            Mode::Casual => &self.casual,
            Mode::Competitive => &self.competitive,
        };
        document.select(selector).next()
    }

    /// The block holding one hero's tables for `mode`.
    pub fn hero_block<'a>(&self, document: &'a Html, mode: Mode, hero: &str) -> Option<ElementRef<'a>> {
        let scope = self.heroes.iter().find(|h| h.name == hero)?;
        self.mode_container(document, mode)?.select(&scope.selector).next()
    }

    pub fn collect(&self, document: &Html, mode: Mode) -> HeroStatsCollection {
        let mut collection = HeroStatsCollection::default();
        let Some(container) = self.mode_container(document, mode) else {
            debug!("{:?}: no mode container on page", mode);
            return collection;
        };

        for hero in &self.heroes {
            let Some(block) = container.select(&hero.selector).next() else {
                continue;
            };

            let buckets: Vec<StatBucket> = self
                .roster
                .categories
                .iter()
                .filter_map(|category| {
                    let rows = self.extractor.find_table(block, category)?;
                    let accepted = self.vocabulary.get(category);
                    let mut bucket = StatBucket::new(category.as_str());
                    for row in rows {
                        if accepted.is_some_and(|labels| !labels.contains(&row.label)) {
                            debug!("{}/{}: dropping unknown label '{}'", hero.name, category, row.label);
                            continue;
                        }
                        bucket.insert(row.label, parse_value(&row.value));
                    }
                    Some(bucket)
                })
                .collect();

            if !buckets.is_empty() {
                collection.heroes.push((hero.name.clone(), buckets));
            }
        }

        debug!("{:?}: collected stats for {} heroes", mode, collection.len());
        collection
    }
}
