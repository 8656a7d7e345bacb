use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::record::FilmRow;

/// The accumulated scrape output. Rows stay in crawl order.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Dataset {
    rows: Vec<FilmRow>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: FilmRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[FilmRow] {
        &self.rows
    }

    /// Rows that carry their IMDb enrichment. The cross-site consumers
    /// (blended ranking, plots) work on these only.
    pub fn complete(&self) -> impl Iterator<Item = &FilmRow> {
        self.rows.iter().filter(|row| row.imdb.is_some())
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let json =
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse dataset in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FilmRecord, RatingEnrichment};

    fn sample_row(title: &str, enriched: bool) -> FilmRow {
        FilmRow {
            film: FilmRecord {
                title: title.to_string(),
                title_en: String::new(),
                year: 2000,
                poster_url: String::new(),
                genres: vec!["Drama".to_string()],
                countries: vec!["USA".to_string()],
                runtime_min: 90,
                director: String::new(),
                url: format!("https://www.csfd.cz/film/{}/", title),
                rating_pct: 75.0,
                rating_count: 500,
            },
            imdb: enriched.then(|| RatingEnrichment {
                rating: 7.0,
                votes_by_star: [10; 10],
                gender_diff: 0.1,
                origin_diff: -0.2,
            }),
        }
    }

    #[test]
    fn complete_filters_unenriched_rows() {
        let mut dataset = Dataset::new();
        dataset.push(sample_row("a", true));
        dataset.push(sample_row("b", false));
        dataset.push(sample_row("c", true));

        let titles: Vec<&str> = dataset
            .complete()
            .map(|row| row.film.title.as_str())
            .collect();
        assert_eq!(titles, ["a", "c"]);
    }

    #[test]
    fn json_round_trip_preserves_rows() {
        let mut dataset = Dataset::new();
        dataset.push(sample_row("a", true));
        dataset.push(sample_row("b", false));

        let json = serde_json::to_string(&dataset).unwrap();
        let back: Dataset = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 2);
        assert!(back.rows()[0].imdb.is_some());
        assert!(back.rows()[1].imdb.is_none());
    }
}
