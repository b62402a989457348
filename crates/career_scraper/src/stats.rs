//! Label → field mapping for fixed-shape stat records.
//!
//! Each record declares its label vocabulary as a static table. Rows are fed
//! through a [`StatMapper`] into a [`RecordBuilder`], which remembers exactly
//! which fields were seen, and the record is materialized at the end.
//! Labels not in the table are dropped.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use scraper::Html;

use crate::client::CareerClient;
use crate::error::{CareerError, Result};
use crate::table::{StatRow, TableExtractor};
use crate::value::parse_value;

pub trait StatRecord: Sized {
    type Field: Copy + Eq + Hash + Debug + 'static;

    /// Labels exactly as the site prints them.
    const LABELS: &'static [(&'static str, Self::Field)];

    fn from_values(values: &HashMap<Self::Field, f64>) -> Self;
}

pub struct StatMapper<R: StatRecord> {
    labels: HashMap<&'static str, R::Field>,
    _record: PhantomData<fn() -> R>,
}

impl<R: StatRecord> StatMapper<R> {
    /// Builds the lookup, rejecting a label table that maps a label twice.
    pub fn new() -> Result<Self> {
        let mut labels = HashMap::with_capacity(R::LABELS.len());
        for (label, field) in R::LABELS {
            if labels.insert(*label, *field).is_some() {
                return Err(CareerError::DuplicateLabel { label: label.to_string() });
            }
        }
        Ok(Self { labels, _record: PhantomData })
    }

    pub fn field(&self, label: &str) -> Option<R::Field> {
        self.labels.get(label).copied()
    }

    /// Returns `false` for an unknown label, in which case nothing changes.
    pub fn apply(&self, builder: &mut RecordBuilder<R>, label: &str, value: f64) -> bool {
        match self.field(label) {
            Some(field) => {
                builder.set(field, value);
                true
            }
            None => false,
        }
    }

    pub fn apply_rows<'a>(&self, builder: &mut RecordBuilder<R>, rows: impl IntoIterator<Item = &'a StatRow>) {
        for row in rows {
            self.apply(builder, &row.label, parse_value(&row.value));
        }
    }
}

pub struct RecordBuilder<R: StatRecord> {
    values: HashMap<R::Field, f64>,
}

impl<R: StatRecord> Default for RecordBuilder<R> {
    fn default() -> Self {
        Self { values: HashMap::new() }
    }
}

impl<R: StatRecord> RecordBuilder<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins.
    pub fn set(&mut self, field: R::Field, value: f64) {
        self.values.insert(field, value);
    }

    pub fn get(&self, field: R::Field) -> Option<f64> {
        self.values.get(&field).copied()
    }

    pub fn is_set(&self, field: R::Field) -> bool {
        self.values.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn build(&self) -> R {
        R::from_values(&self.values)
    }
}

// ── Miscellaneous ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MiscField {
    MostMeleeFinalBlows,
    DefensiveAssists,
    DefensiveAssistsAverage,
    OffensiveAssists,
    OffensiveAssistsAverage,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MiscellaneousStats {
    pub most_melee_final_blows: f64,
    pub defensive_assists: f64,
    pub defensive_assists_average: f64,
    pub offensive_assists: f64,
    pub offensive_assists_average: f64,
}

pub const MISCELLANEOUS_TITLE: &str = "Miscellaneous";

impl StatRecord for MiscellaneousStats {
    type Field = MiscField;

    const LABELS: &'static [(&'static str, MiscField)] = &[
        ("Melee Final Blows - Most in Game", MiscField::MostMeleeFinalBlows),
        ("Defensive Assists", MiscField::DefensiveAssists),
        ("Defensive Assists - Average", MiscField::DefensiveAssistsAverage),
        ("Offensive Assists", MiscField::OffensiveAssists),
        ("Offensive Assists - Average", MiscField::OffensiveAssistsAverage),
    ];

    fn from_values(values: &HashMap<MiscField, f64>) -> Self {
        let get = |field| values.get(&field).copied().unwrap_or_default();
        Self {
            most_melee_final_blows: get(MiscField::MostMeleeFinalBlows),
            defensive_assists: get(MiscField::DefensiveAssists),
            defensive_assists_average: get(MiscField::DefensiveAssistsAverage),
            offensive_assists: get(MiscField::OffensiveAssists),
            offensive_assists_average: get(MiscField::OffensiveAssistsAverage),
        }
    }
}

impl MiscellaneousStats {
    pub fn from_rows(mapper: &StatMapper<Self>, rows: &[StatRow]) -> Self {
        let mut builder = RecordBuilder::new();
        mapper.apply_rows(&mut builder, rows);
        builder.build()
    }

    /// First "Miscellaneous" table anywhere in the document.
    pub fn from_document(document: &Html) -> Result<Option<Self>> {
        let extractor = TableExtractor::new()?;
        let mapper = StatMapper::new()?;
        Ok(extractor
            .find_in_document(document, MISCELLANEOUS_TITLE)
            .map(|rows| Self::from_rows(&mapper, &rows)))
    }

    pub async fn load_from_url(client: &dyn CareerClient, url: &str) -> Result<Option<Self>> {
        let html = client.fetch_page(url).await?;
        Self::from_document(&Html::parse_document(&html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_table_has_no_duplicates() {
        assert!(StatMapper::<MiscellaneousStats>::new().is_ok());
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        struct Only;
        struct Broken;
        impl StatRecord for Broken {
            type Field = Only;
            const LABELS: &'static [(&'static str, Only)] = &[("Kills", Only), ("Kills", Only)];
            fn from_values(_: &HashMap<Only, f64>) -> Self {
                Broken
            }
        }

        match StatMapper::<Broken>::new() {
            Err(CareerError::DuplicateLabel { label }) => assert_eq!(label, "Kills"),
            other => panic!("expected duplicate label error, got ok={}", other.is_ok()),
        }
    }

    #[test]
    fn unknown_label_is_a_no_op() {
        let mapper = StatMapper::<MiscellaneousStats>::new().unwrap();
        let mut builder = RecordBuilder::new();
        mapper.apply(&mut builder, "Defensive Assists", 3.0);

        assert!(!mapper.apply(&mut builder, "Unknown Stat", 7.0));
        assert!(!mapper.apply(&mut builder, "defensive assists", 9.0));
        assert_eq!(builder.len(), 1);
        assert_eq!(builder.get(MiscField::DefensiveAssists), Some(3.0));
    }

    #[test]
    fn repeated_label_keeps_last_value() {
        let mapper = StatMapper::<MiscellaneousStats>::new().unwrap();
        let mut builder = RecordBuilder::new();
        mapper.apply(&mut builder, "Offensive Assists", 10.0);
        mapper.apply(&mut builder, "Offensive Assists", 4.0);

        assert_eq!(builder.build().offensive_assists, 4.0);
    }

    #[test]
    fn rows_populate_only_recognized_fields() {
        let mapper = StatMapper::<MiscellaneousStats>::new().unwrap();
        let rows = vec![
            StatRow::new("Defensive Assists", "150"),
            StatRow::new("Unknown Stat", "7"),
        ];
        let stats = MiscellaneousStats::from_rows(&mapper, &rows);

        assert_eq!(
            stats,
            MiscellaneousStats { defensive_assists: 150.0, ..Default::default() }
        );
    }

    #[test]
    fn from_document_reads_miscellaneous_table() {
        let html = Html::parse_document(
            r#"<table class="data-table"><thead><tr><th>Miscellaneous</th></tr></thead>
               <tbody>
                 <tr><td>Melee Final Blows - Most in Game</td><td>3</td></tr>
                 <tr><td>Defensive Assists - Average</td><td>1.25</td></tr>
                 <tr><td>Offensive Assists</td><td>1,024</td></tr>
               </tbody></table>"#,
        );
        let stats = MiscellaneousStats::from_document(&html).unwrap().unwrap();

        assert_eq!(stats.most_melee_final_blows, 3.0);
        assert_eq!(stats.defensive_assists_average, 1.25);
        assert_eq!(stats.offensive_assists, 1024.0);
        assert_eq!(stats.defensive_assists, 0.0);
    }

    #[test]
    fn from_document_without_table_is_none() {
        let html = Html::parse_document("<div>nothing</div>");
        assert_eq!(MiscellaneousStats::from_document(&html).unwrap(), None);
    }
}
