use reqwest::StatusCode;
use thiserror::Error;

/// Transport or HTTP-status failure while fetching a page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GET {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("GET {url} returned {status}")]
    Status { url: String, status: StatusCode },
}

/// A structural element the detail page is expected to carry is missing or
/// holds something unparsable.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("missing {field}")]
    Missing { field: &'static str },
    #[error("cannot parse {field} from {value:?}")]
    Unparsable { field: &'static str, value: String },
}

impl ExtractError {
    pub fn unparsable(field: &'static str, value: &str) -> Self {
        ExtractError::Unparsable {
            field,
            value: value.to_string(),
        }
    }
}

/// Everything that can sink one detail item. The scrape loop logs these and
/// moves on; they never abort a run.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// IMDb lookup or extraction failure. Misses are routine (titles and years
/// drift between the sites), so callers keep the film and leave its
/// enrichment absent.
#[derive(Debug, Error)]
pub enum LinkageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("no search result for {title:?} ({year})")]
    NoMatch { title: String, year: i32 },
    #[error("ratings page missing {field}")]
    Missing { field: &'static str },
    #[error("cannot parse {field} from {value:?}")]
    Unparsable { field: &'static str, value: String },
}

impl LinkageError {
    pub fn unparsable(field: &'static str, value: &str) -> Self {
        LinkageError::Unparsable {
            field,
            value: value.to_string(),
        }
    }
}

/// Rating blend weight outside [0, 1]. The one configuration error that
/// aborts instead of being skipped.
#[derive(Debug, Error)]
#[error("rating weight must lie within [0, 1], got {0}")]
pub struct WeightError(pub f64);
