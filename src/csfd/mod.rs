//! ČSFD side: listing-page crawl and detail-page extraction.

pub mod detail;
pub mod listing;

/// Listing rows carry site-relative hrefs; this is what they resolve against.
pub const SITE_ORIGIN: &str = "https://www.csfd.cz";
