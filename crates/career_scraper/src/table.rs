//! Stat table lookup.
//!
//! A career page carries dozens of near-identical `table.data-table`
//! elements. The only thing telling them apart is the heading text inside
//! `thead` ("Miscellaneous", "Best", "Average", ...), scoped by whichever
//! mode/hero block the caller narrowed down to.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{CareerError, Result};

/// Parse a CSS selector, mapping the error instead of panicking.
pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| CareerError::InvalidSelector(css.to_string()))
}

pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// One body row of a stat table, both cells trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRow {
    pub label: String,
    pub value: String,
}

impl StatRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self { label: label.into(), value: value.into() }
    }
}

pub struct TableExtractor {
    table: Selector,
    heading: Selector,
    row: Selector,
    cell: Selector,
}

impl TableExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            table: selector("table.data-table")?,
            heading: selector("thead")?,
            row: selector("tbody > tr")?,
            cell: selector("td")?,
        })
    }

    /// Rows of the first table under `scope` whose heading is exactly `title`.
    ///
    /// `None` means the player has no data for that section. Rows that do not
    /// have exactly two cells are skipped.
    pub fn find_table(&self, scope: ElementRef<'_>, title: &str) -> Option<Vec<StatRow>> {
        let table = scope.select(&self.table).find(|table| {
            table
                .select(&self.heading)
                .next()
                .map(|heading| element_text(heading) == title)
                .unwrap_or(false)
        })?;

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for row in table.select(&self.row) {
            let cells: Vec<String> = row.select(&self.cell).map(element_text).collect();
            match <[String; 2]>::try_from(cells) {
                Ok([label, value]) => rows.push(StatRow { label, value }),
                Err(_) => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!("table '{}': skipped {} malformed rows", title, skipped);
        }
        Some(rows)
    }

    pub fn find_in_document(&self, document: &Html, title: &str) -> Option<Vec<StatRow>> {
        self.find_table(document.root_element(), title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(title: &str, rows: &str) -> String {
        format!(
            r#"<table class="data-table"><thead><tr><th><span>{title}</span></th></tr></thead><tbody>{rows}</tbody></table>"#
        )
    }

    fn doc(body: &str) -> Html {
        Html::parse_document(&format!("<html><body>{body}</body></html>"))
    }

    #[test]
    fn picks_table_by_exact_heading() {
        let html = doc(&format!(
            "{}{}",
            table("Best", "<tr><td>Eliminations - Most in Game</td><td>41</td></tr>"),
            table("Average", "<tr><td>Eliminations - Average</td><td>17.3</td></tr>"),
        ));
        let extractor = TableExtractor::new().unwrap();

        let rows = extractor.find_in_document(&html, "Average").unwrap();
        assert_eq!(rows, vec![StatRow::new("Eliminations - Average", "17.3")]);
    }

    #[test]
    fn heading_match_is_case_sensitive_and_not_partial() {
        let html = doc(&table("Miscellaneous", "<tr><td>Defensive Assists</td><td>5</td></tr>"));
        let extractor = TableExtractor::new().unwrap();

        assert!(extractor.find_in_document(&html, "miscellaneous").is_none());
        assert!(extractor.find_in_document(&html, "Misc").is_none());
        assert!(extractor.find_in_document(&html, "Miscellaneous").is_some());
    }

    #[test]
    fn missing_section_is_not_found() {
        let html = doc("<p>no tables at all</p>");
        let extractor = TableExtractor::new().unwrap();
        assert!(extractor.find_in_document(&html, "Game").is_none());
    }

    #[test]
    fn first_matching_table_wins() {
        let html = doc(&format!(
            "{}{}",
            table("Game", "<tr><td>Games Won</td><td>1</td></tr>"),
            table("Game", "<tr><td>Games Won</td><td>2</td></tr>"),
        ));
        let extractor = TableExtractor::new().unwrap();
        let rows = extractor.find_in_document(&html, "Game").unwrap();
        assert_eq!(rows[0].value, "1");
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let html = doc(&table(
            "Game",
            "<tr><td>Games Won</td><td>12</td></tr>\
             <tr><td>orphan</td></tr>\
             <tr><td>a</td><td>b</td><td>c</td></tr>\
             <tr><td> Time Played </td><td> 5 hours </td></tr>",
        ));
        let extractor = TableExtractor::new().unwrap();
        let rows = extractor.find_in_document(&html, "Game").unwrap();
        assert_eq!(
            rows,
            vec![StatRow::new("Games Won", "12"), StatRow::new("Time Played", "5 hours")]
        );
    }
}
