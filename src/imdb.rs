//! IMDb record linkage: year-bounded title search plus ratings-page
//! extraction. Misses are routine here (titles and years drift between the
//! sites), so every failure is a recoverable [`LinkageError`].

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use crate::error::LinkageError;
use crate::fetch::{fetch_document, Fetch};
use crate::record::RatingEnrichment;
use crate::text;

const IMDB_ORIGIN: &str = "https://www.imdb.com";

static RESULT_LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3.lister-item-header a").unwrap());
static AVERAGE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".inline-block.ratings-imdb-rating span").unwrap());
static SUB_PAGE_TABLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.title-ratings-sub-page table").unwrap());
static LEFT_ALIGNED_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.leftAligned").unwrap());
static DEMOG_TD_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.ratingTable").unwrap());
static BIGCELL_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.bigcell").unwrap());

// Result hrefs often drag a tracking query along ("/title/tt0078748/?ref_=adv_li_tt").
static TITLE_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(/title/tt\d+/)").unwrap());

// The demographic grid flattens row by row: cells 0-4 are all voters by age
// band, 5-9 males, 10-14 females. The region table follows as cells 15-17
// (top 1000 voters, US, non-US).
const CELL_MALES_ALL: usize = 5;
const CELL_FEMALES_ALL: usize = 10;
const CELL_US: usize = 16;
const CELL_NON_US: usize = 17;

/// Look a film up by title and year and pull its rating numbers.
pub fn enrich(
    fetcher: &impl Fetch,
    title: &str,
    year: i32,
) -> Result<RatingEnrichment, LinkageError> {
    let ratings_url = find_ratings_url(fetcher, title, year)?;
    debug!(title, year, url = %ratings_url, "Matched IMDb ratings page");
    let document = fetch_document(fetcher, &ratings_url)?;
    extract_ratings(&document)
}

/// ASCII-fold the title and join words with `+` for the query string.
pub fn normalize_title(title: &str) -> String {
    text::ascii_fold(title).replace(' ', "+")
}

/// Title search constrained to releases within the film's year.
pub fn search_url(title: &str, year: i32) -> String {
    format!(
        "{IMDB_ORIGIN}/search/title/?title={}&release_date={year}-01-01,{year}-12-31",
        normalize_title(title)
    )
}

/// First search result wins; there is no verification that it is the same
/// film. The matched URL is logged at debug level so misattributions can be
/// traced.
fn find_ratings_url(
    fetcher: &impl Fetch,
    title: &str,
    year: i32,
) -> Result<String, LinkageError> {
    let document = fetch_document(fetcher, &search_url(title, year))?;
    let href = document
        .select(&RESULT_LINK_SEL)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
        .ok_or_else(|| LinkageError::NoMatch {
            title: title.to_string(),
            year,
        })?;
    let path = TITLE_PATH_RE
        .captures(href)
        .and_then(|captures| captures.get(1))
        .ok_or_else(|| LinkageError::unparsable("result href", href))?
        .as_str();
    Ok(format!("{IMDB_ORIGIN}{path}ratings?ref_=tt_ov_rt"))
}

/// Parse one ratings page: the average, the ten-bucket vote distribution and
/// the two demographic differences.
pub fn extract_ratings(document: &Html) -> Result<RatingEnrichment, LinkageError> {
    let average_raw = document
        .select(&AVERAGE_SEL)
        .next()
        .map(|el| el.text().collect::<String>())
        .ok_or(LinkageError::Missing { field: "average" })?;
    let rating: f64 = average_raw
        .trim()
        .parse()
        .map_err(|_| LinkageError::unparsable("average", &average_raw))?;

    let votes_by_star = vote_distribution(document)?;

    let cells = demographic_cells(document)?;
    if cells.len() <= CELL_NON_US {
        return Err(LinkageError::Missing {
            field: "demographic table",
        });
    }
    let gender_diff = cells[CELL_MALES_ALL] - cells[CELL_FEMALES_ALL];
    let origin_diff = cells[CELL_NON_US] - cells[CELL_US];

    Ok(RatingEnrichment {
        rating,
        votes_by_star,
        gender_diff,
        origin_diff,
    })
}

/// The distribution table lists buckets ten-stars-first with a header cell on
/// top. Drop the header, parse the ten counts and store them least-to-most
/// star so index 0 is the 1★ bucket.
fn vote_distribution(document: &Html) -> Result<[u64; 10], LinkageError> {
    let table = document
        .select(&SUB_PAGE_TABLE_SEL)
        .next()
        .ok_or(LinkageError::Missing {
            field: "rating distribution",
        })?;

    let mut counts = Vec::new();
    for cell in table.select(&LEFT_ALIGNED_SEL).skip(1) {
        let raw: String = cell.text().collect();
        let digits = text::strip_number_grouping(&raw);
        let count = digits
            .parse::<u64>()
            .map_err(|_| LinkageError::unparsable("vote count", &raw))?;
        counts.push(count);
    }

    counts.reverse();
    counts.try_into().map_err(|_| LinkageError::Missing {
        field: "rating distribution",
    })
}

/// Every demographic cell in document order. A cell slot without a value
/// fails the page rather than silently shifting the fixed positions.
fn demographic_cells(document: &Html) -> Result<Vec<f64>, LinkageError> {
    let mut cells = Vec::new();
    for td in document.select(&DEMOG_TD_SEL) {
        let raw: String = td
            .select(&BIGCELL_SEL)
            .next()
            .ok_or(LinkageError::Missing {
                field: "demographic cell",
            })?
            .text()
            .collect();
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|_| LinkageError::unparsable("demographic cell", &raw))?;
        cells.push(value);
    }
    Ok(cells)
}

// ── Tests ──
