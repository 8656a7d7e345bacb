use std::cmp::Ordering;
use std::ops::Range;

use crate::dataset::Dataset;
use crate::error::WeightError;
use crate::record::FilmRow;

/// Filters and weighting for a ranked listing. Year and runtime ranges are
/// half-open (`from` inclusive, `to` exclusive); the defaults are wide enough
/// to pass everything through.
#[derive(Debug, Clone)]
pub struct RankOptions {
    pub top: Option<usize>,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub years: Range<i32>,
    pub runtime: Range<u32>,
    pub director: Option<String>,
    /// Share of the ČSFD rating in the blend, 0 (pure IMDb) to 1 (pure ČSFD).
    pub weight: f64,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            top: None,
            genre: None,
            country: None,
            years: 0..2100,
            runtime: 0..50_000,
            director: None,
            weight: 1.0,
        }
    }
}

/// Blend of the two averages on the ČSFD percent scale. Absent when the row
/// has no IMDb enrichment.
pub fn blended_rating(row: &FilmRow, weight: f64) -> Option<f64> {
    row.imdb
        .as_ref()
        .map(|imdb| weight * row.film.rating_pct + (1.0 - weight) * 10.0 * imdb.rating)
}

/// Filter the dataset and sort descending by blended rating. Rows without
/// enrichment sort after every enriched row whatever the weight; ties keep
/// crawl order. `top` truncates after sorting.
pub fn rank<'a>(
    dataset: &'a Dataset,
    options: &RankOptions,
) -> Result<Vec<&'a FilmRow>, WeightError> {
    if !(0.0..=1.0).contains(&options.weight) {
        return Err(WeightError(options.weight));
    }

    let mut rows: Vec<&FilmRow> = dataset
        .rows()
        .iter()
        .filter(|row| matches_filters(row, options))
        .collect();

    rows.sort_by(|a, b| {
        let a_score = blended_rating(a, options.weight);
        let b_score = blended_rating(b, options.weight);
        match (a_score, b_score) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });

    if let Some(top) = options.top {
        rows.truncate(top);
    }
    Ok(rows)
}

fn matches_filters(row: &FilmRow, options: &RankOptions) -> bool {
    let film = &row.film;
    if let Some(genre) = &options.genre {
        if !list_contains(&film.genres, genre) {
            return false;
        }
    }
    if let Some(country) = &options.country {
        if !list_contains(&film.countries, country) {
            return false;
        }
    }
    if !options.years.contains(&film.year) {
        return false;
    }
    if !options.runtime.contains(&film.runtime_min) {
        return false;
    }
    if let Some(director) = &options.director {
        if !contains_ci(&film.director, director) {
            return false;
        }
    }
    true
}

fn list_contains(values: &[String], needle: &str) -> bool {
    values.iter().any(|value| contains_ci(value, needle))
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FilmRecord, RatingEnrichment};

    fn row(title: &str, rating_pct: f64, imdb_rating: Option<f64>) -> FilmRow {
        FilmRow {
            film: FilmRecord {
                title: title.to_string(),
                title_en: String::new(),
                year: 2000,
                poster_url: String::new(),
                genres: vec!["Drama".to_string()],
                countries: vec!["USA".to_string()],
                runtime_min: 100,
                director: "Jane Doe".to_string(),
                url: String::new(),
                rating_pct,
                rating_count: 1000,
            },
            imdb: imdb_rating.map(|rating| RatingEnrichment {
                rating,
                votes_by_star: [0; 10],
                gender_diff: 0.0,
                origin_diff: 0.0,
            }),
        }
    }

    fn titles(rows: &[&FilmRow]) -> Vec<String> {
        rows.iter().map(|r| r.film.title.clone()).collect()
    }

    #[test]
    fn weight_outside_unit_interval_is_rejected() {
        let dataset = Dataset::new();
        let options = RankOptions {
            weight: 1.5,
            ..Default::default()
        };
        assert!(rank(&dataset, &options).is_err());

        let options = RankOptions {
            weight: -0.1,
            ..Default::default()
        };
        assert!(rank(&dataset, &options).is_err());
    }

    #[test]
    fn genre_filter_and_descending_sort() {
        let mut dataset = Dataset::new();
        let mut comedy = row("b", 95.0, Some(9.0));
        comedy.film.genres = vec!["Komedie".to_string()];
        dataset.push(row("a", 80.0, Some(7.0)));
        dataset.push(comedy);
        dataset.push(row("c", 90.0, Some(8.5)));

        let options = RankOptions {
            genre: Some("drama".to_string()),
            ..Default::default()
        };
        let ranked = rank(&dataset, &options).unwrap();
        assert_eq!(titles(&ranked), ["c", "a"]);
    }

    #[test]
    fn weight_blends_both_scales() {
        let mut dataset = Dataset::new();
        // Pure ČSFD prefers "a"; pure IMDb prefers "b".
        dataset.push(row("a", 90.0, Some(6.0)));
        dataset.push(row("b", 70.0, Some(9.0)));

        let csfd_only = RankOptions {
            weight: 1.0,
            ..Default::default()
        };
        assert_eq!(titles(&rank(&dataset, &csfd_only).unwrap()), ["a", "b"]);

        let imdb_only = RankOptions {
            weight: 0.0,
            ..Default::default()
        };
        assert_eq!(titles(&rank(&dataset, &imdb_only).unwrap()), ["b", "a"]);
    }

    #[test]
    fn unenriched_rows_sink_regardless_of_weight() {
        let mut dataset = Dataset::new();
        dataset.push(row("plain", 99.0, None));
        dataset.push(row("poor", 10.0, Some(1.0)));

        for weight in [0.0, 0.5, 1.0] {
            let options = RankOptions {
                weight,
                ..Default::default()
            };
            assert_eq!(titles(&rank(&dataset, &options).unwrap()), ["poor", "plain"]);
        }
    }

    #[test]
    fn year_range_is_half_open() {
        let mut dataset = Dataset::new();
        let mut older = row("older", 80.0, Some(7.0));
        older.film.year = 1999;
        let mut newer = row("newer", 80.0, Some(7.0));
        newer.film.year = 2000;
        dataset.push(older);
        dataset.push(newer);

        let options = RankOptions {
            years: 1999..2000,
            ..Default::default()
        };
        assert_eq!(titles(&rank(&dataset, &options).unwrap()), ["older"]);
    }

    #[test]
    fn runtime_range_is_half_open() {
        let mut dataset = Dataset::new();
        let mut short = row("short", 80.0, None);
        short.film.runtime_min = 90;
        let mut long = row("long", 80.0, None);
        long.film.runtime_min = 150;
        dataset.push(short);
        dataset.push(long);

        let options = RankOptions {
            runtime: 90..150,
            ..Default::default()
        };
        assert_eq!(titles(&rank(&dataset, &options).unwrap()), ["short"]);
    }

    #[test]
    fn top_truncates_after_sorting() {
        let mut dataset = Dataset::new();
        dataset.push(row("low", 50.0, Some(5.0)));
        dataset.push(row("high", 95.0, Some(9.5)));
        dataset.push(row("mid", 75.0, Some(7.5)));

        let options = RankOptions {
            top: Some(2),
            ..Default::default()
        };
        assert_eq!(titles(&rank(&dataset, &options).unwrap()), ["high", "mid"]);
    }

    #[test]
    fn director_filter_is_case_insensitive_substring() {
        let mut dataset = Dataset::new();
        let mut scott = row("alien", 89.0, None);
        scott.film.director = "Ridley Scott".to_string();
        dataset.push(scott);
        dataset.push(row("other", 80.0, None));

        let options = RankOptions {
            director: Some("ridley".to_string()),
            ..Default::default()
        };
        assert_eq!(titles(&rank(&dataset, &options).unwrap()), ["alien"]);
    }
}
