//! Plot specifications over the scraped dataset. Everything here is pure
//! data shaping over the complete (IMDb-enriched) rows; rendering them as
//! terminal summaries or JSON is the CLI's job.

use serde::Serialize;

use crate::dataset::Dataset;
use crate::record::{FilmRecord, FilmRow};

/// ČSFD genre labels and their English display names, one bar each in the
/// gender-gap chart.
pub const GENRE_LABELS: [(&str, &str); 24] = [
    ("Akční", "Action"),
    ("Krimi", "Crime"),
    ("Rodinný", "Family"),
    ("Sci-Fi", "Sci-Fi"),
    ("Mysteriózní", "Mystery"),
    ("Drama", "Drama"),
    ("Fantasy", "Fantasy"),
    ("Dobrodružný", "Adventure"),
    ("Thriller", "Thriller"),
    ("Válečný", "War"),
    ("Životopisný", "Biography"),
    ("Horor", "Horror"),
    ("Komedie", "Comedy"),
    ("Sportovní", "Sport"),
    ("Hudební", "Music"),
    ("Western", "Western"),
    ("Psychologický", "Psychological"),
    ("Road movie", "Road Movie"),
    ("Historický", "History"),
    ("Romantický", "Romance"),
    ("Muzikál", "Musical"),
    ("Taneční", "Dance"),
    ("Poetický", "Poetic"),
    ("Pohádka", "Fairytale"),
];

pub const HISTOGRAM_BINS: usize = 15;

/// One film in the cross-site scatter: x = IMDb average, y = ČSFD percent,
/// year as the colour key.
#[derive(Debug, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub year: i32,
}

#[derive(Debug, Serialize)]
pub struct ScatterSpec {
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Serialize)]
pub struct GenreBar {
    pub genre: &'static str,
    /// Mean male-minus-female rating difference of the films carrying the
    /// genre; absent when no complete row does.
    pub mean_gender_diff: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct BarSpec {
    pub bars: Vec<GenreBar>,
}

/// Equal-width bins over the series' own min..max; a value sitting exactly on
/// max falls into the last bin. An empty series keeps all counts at zero.
#[derive(Debug, Serialize)]
pub struct Histogram {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub counts: Vec<u64>,
}

/// The two rating series of one panel, both on the percent scale.
#[derive(Debug, Serialize)]
pub struct RatingHistograms {
    pub imdb: Histogram,
    pub csfd: Histogram,
}

#[derive(Debug, Serialize)]
pub struct HistogramPair {
    pub local: RatingHistograms,
    pub abroad: RatingHistograms,
}

#[derive(Debug, Serialize)]
pub struct RegressionPoint {
    pub x: f64,
    pub y: f64,
}

/// Least-squares line through (rating discrepancy, origin difference) points.
#[derive(Debug, Serialize)]
pub struct RegressionSpec {
    pub points: Vec<RegressionPoint>,
    pub slope: f64,
    pub intercept: f64,
}

/// ČSFD percent against IMDb average for every complete row.
pub fn rating_scatter(dataset: &Dataset) -> ScatterSpec {
    let points = dataset
        .complete()
        .filter_map(|row| {
            row.imdb.as_ref().map(|imdb| ScatterPoint {
                x: imdb.rating,
                y: row.film.rating_pct,
                year: row.film.year,
            })
        })
        .collect();
    ScatterSpec { points }
}

/// Mean gender difference per genre. Membership is exact: a film counts for
/// "Akční" only when its genre list carries that label.
pub fn genre_gender_gap(dataset: &Dataset) -> BarSpec {
    let complete: Vec<&FilmRow> = dataset.complete().collect();
    let bars = GENRE_LABELS
        .iter()
        .map(|&(czech, english)| {
            let diffs: Vec<f64> = complete
                .iter()
                .filter(|row| row.film.genres.iter().any(|genre| genre == czech))
                .filter_map(|row| row.imdb.as_ref().map(|imdb| imdb.gender_diff))
                .collect();
            GenreBar {
                genre: english,
                mean_gender_diff: mean(&diffs),
            }
        })
        .collect();
    BarSpec { bars }
}

/// Rating distributions split into local (Czech/Czechoslovak) films and the
/// rest. IMDb averages are scaled by ten onto the ČSFD percent scale.
pub fn origin_histograms(dataset: &Dataset) -> HistogramPair {
    let (local, abroad): (Vec<&FilmRow>, Vec<&FilmRow>) =
        dataset.complete().partition(|row| is_local(&row.film));
    HistogramPair {
        local: panel(&local),
        abroad: panel(&abroad),
    }
}

/// Does the rating discrepancy between the sites track how differently US and
/// non-US voters score a film? `None` below two points.
pub fn rating_discrepancy_regression(dataset: &Dataset) -> Option<RegressionSpec> {
    let points: Vec<RegressionPoint> = dataset
        .complete()
        .filter_map(|row| {
            row.imdb.as_ref().map(|imdb| RegressionPoint {
                x: row.film.rating_pct - 10.0 * imdb.rating,
                y: imdb.origin_diff,
            })
        })
        .collect();
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.y).sum::<f64>() / n;
    let sxx: f64 = points.iter().map(|p| (p.x - mean_x).powi(2)).sum();
    let sxy: f64 = points.iter().map(|p| (p.x - mean_x) * (p.y - mean_y)).sum();

    // Degenerate x (all points share one discrepancy) gets a flat line
    // through the mean.
    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    let intercept = mean_y - slope * mean_x;

    Some(RegressionSpec {
        points,
        slope,
        intercept,
    })
}

fn is_local(film: &FilmRecord) -> bool {
    film.countries
        .iter()
        .any(|country| country == "Česko" || country == "Československo")
}

fn panel(rows: &[&FilmRow]) -> RatingHistograms {
    let imdb: Vec<f64> = rows
        .iter()
        .filter_map(|row| row.imdb.as_ref().map(|i| i.rating * 10.0))
        .collect();
    let csfd: Vec<f64> = rows.iter().map(|row| row.film.rating_pct).collect();
    RatingHistograms {
        imdb: histogram("IMDb", &imdb),
        csfd: histogram("CSFD", &csfd),
    }
}

fn histogram(label: &'static str, values: &[f64]) -> Histogram {
    let mut counts = vec![0u64; HISTOGRAM_BINS];
    let Some(min) = values.iter().copied().reduce(f64::min) else {
        return Histogram {
            label,
            min: 0.0,
            max: 0.0,
            counts,
        };
    };
    let max = values.iter().copied().fold(min, f64::max);
    let width = (max - min) / HISTOGRAM_BINS as f64;

    for &value in values {
        let bin = if width > 0.0 {
            (((value - min) / width) as usize).min(HISTOGRAM_BINS - 1)
        } else {
            0
        };
        counts[bin] += 1;
    }

    Histogram {
        label,
        min,
        max,
        counts,
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

// ── Tests ──
