use serde::{Deserialize, Serialize};

/// One film as read off its ČSFD detail page. Values are final once the
/// extractor returns; nothing mutates a record afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilmRecord {
    pub title: String,
    /// English release title; empty when the page carries no usable flag.
    pub title_en: String,
    pub year: i32,
    pub poster_url: String,
    pub genres: Vec<String>,
    pub countries: Vec<String>,
    pub runtime_min: u32,
    pub director: String,
    /// The detail page this record came from.
    pub url: String,
    /// ČSFD average in percent (0-100).
    pub rating_pct: f64,
    pub rating_count: u64,
}

impl FilmRecord {
    /// Title to search IMDb with. The English one when the page had it,
    /// otherwise the canonical (transliterated later by the linker).
    pub fn lookup_title(&self) -> &str {
        if self.title_en.is_empty() {
            &self.title
        } else {
            &self.title_en
        }
    }
}

/// IMDb-side numbers for one film. A row carries all of them or none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingEnrichment {
    /// IMDb average on the 0-10 scale.
    pub rating: f64,
    /// Vote counts per star, index 0 = 1★ up to index 9 = 10★.
    pub votes_by_star: [u64; 10],
    /// Male minus female all-ages average.
    pub gender_diff: f64,
    /// Non-US minus US average.
    pub origin_diff: f64,
}

/// One dataset row: the ČSFD record plus its optional IMDb enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilmRow {
    pub film: FilmRecord,
    pub imdb: Option<RatingEnrichment>,
}
