use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::{info, warn};

use crate::fetch::{fetch_document, Fetch};
use crate::progress;

use super::SITE_ORIGIN;

/// Advanced-search results with every filter left open: all films, all
/// genres, all origins. Only the page number in the path varies.
const SEARCH_QUERY: &str = "type%5B0%5D=0&genre%5Btype%5D=2&genre%5Binclude%5D%5B0%5D=\
    &genre%5Bexclude%5D%5B0%5D=&origin%5Btype%5D=2&origin%5Binclude%5D%5B0%5D=\
    &origin%5Bexclude%5D%5B0%5D=&year_from=&year_to=&rating_from=&rating_to=\
    &actor=&director=&composer=&screenwriter=&author=&cinematographer=\
    &production=&edit=&sound=&scenography=&mask=&costumes=&tag=&ok=Hledat&_form_=film";

static NAME_CELL_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.name").unwrap());
static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

pub fn search_page_url(page: u32) -> String {
    format!("{SITE_ORIGIN}/podrobne-vyhledavani/strana-{page}/?{SEARCH_QUERY}")
}

/// Film detail links on one listing page, in row order, resolved against the
/// site origin. Each name cell contributes its first anchor; a page without
/// name cells yields an empty list.
pub fn extract_detail_links(document: &Html) -> Vec<String> {
    document
        .select(&NAME_CELL_SEL)
        .filter_map(|cell| cell.select(&ANCHOR_SEL).next())
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(|href| format!("{SITE_ORIGIN}{href}"))
        .collect()
}

/// Walk listing pages 1..=page_count and gather every film detail link in
/// page-then-row order, duplicates included. A page that fails to fetch or
/// carries no rows contributes nothing; the crawl keeps going.
pub fn collect_detail_links(fetcher: &impl Fetch, page_count: u32) -> Vec<String> {
    let pb = progress::bar(page_count as u64, "Collecting film links");
    let mut links = Vec::new();

    for page in 1..=page_count {
        let url = search_page_url(page);
        match fetch_document(fetcher, &url) {
            Ok(document) => {
                let page_links = extract_detail_links(&document);
                if page_links.is_empty() {
                    info!(page, "No film rows on listing page");
                } else {
                    links.extend(page_links);
                }
            }
            Err(e) => {
                warn!(page, error = %e, "Failed to fetch listing page");
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!("Collected {} film links from {} page(s)", links.len(), page_count);
    links
}

// ── Tests ──
