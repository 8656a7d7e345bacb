use tracing::{info, warn};

use crate::csfd::{detail, listing};
use crate::dataset::Dataset;
use crate::error::ItemError;
use crate::fetch::{fetch_document, Fetch};
use crate::imdb;
use crate::progress;
use crate::record::{FilmRecord, FilmRow};

/// What to scrape and whether to cross-link against IMDb.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub pages: u32,
    pub enrich: bool,
}

/// Counters reported after a run.
#[derive(Debug, Default)]
pub struct ScrapeStats {
    pub pages: u32,
    pub links: usize,
    pub items: usize,
    pub skipped: usize,
    pub enriched: usize,
    pub misses: usize,
}

/// Crawl the listing pages, extract every film detail page, optionally
/// enrich each record from IMDb, and collect the rows in crawl order.
/// A failed page or item is logged and skipped; nothing here aborts the run.
pub fn run(fetcher: &impl Fetch, options: &ScrapeOptions) -> (Dataset, ScrapeStats) {
    let links = listing::collect_detail_links(fetcher, options.pages);

    let mut stats = ScrapeStats {
        pages: options.pages,
        links: links.len(),
        ..Default::default()
    };
    let mut dataset = Dataset::new();

    let pb = progress::bar(links.len() as u64, "Scraping film pages");
    for url in &links {
        match scrape_item(fetcher, url) {
            Ok(film) => {
                let imdb = if options.enrich {
                    match imdb::enrich(fetcher, film.lookup_title(), film.year) {
                        Ok(enrichment) => {
                            stats.enriched += 1;
                            Some(enrichment)
                        }
                        Err(e) => {
                            warn!(url = %url, error = %e, "IMDb linkage failed");
                            stats.misses += 1;
                            None
                        }
                    }
                } else {
                    None
                };
                stats.items += 1;
                dataset.push(FilmRow { film, imdb });
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Skipping film page");
                stats.skipped += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!(
        "Scraped {} film(s) ({} skipped, {} enriched, {} IMDb misses)",
        stats.items, stats.skipped, stats.enriched, stats.misses
    );
    (dataset, stats)
}

fn scrape_item(fetcher: &impl Fetch, url: &str) -> Result<FilmRecord, ItemError> {
    let document = fetch_document(fetcher, url)?;
    Ok(detail::extract(&document, url)?)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csfd::listing::search_page_url;
    use crate::fetch::StubFetcher;
    use crate::imdb::search_url;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    const VETRELEC: &str = "https://www.csfd.cz/film/4422-vetrelec/";
    const PELISKY: &str = "https://www.csfd.cz/film/8652-pelisky/";
    const CTYRI: &str = "https://www.csfd.cz/film/8653-ctyri-svatby-a-jeden-pohreb/";
    const RATINGS: &str = "https://www.imdb.com/title/tt0078748/ratings?ref_=tt_ov_rt";

    #[test]
    fn linkage_miss_keeps_the_row() {
        let stub = StubFetcher::new()
            .page(&search_page_url(1), &fixture("listing_page"))
            .page(VETRELEC, &fixture("detail_vetrelec"))
            .page(PELISKY, &fixture("detail_pelisky"))
            .page(CTYRI, &fixture("detail_ctyri"))
            .page(&search_url("Alien", 1979), &fixture("imdb_search"))
            // Pelíšky has no English title; the search runs on the folded
            // Czech one and finds nothing.
            .page(&search_url("Pelíšky", 1999), &fixture("imdb_search_none"))
            .page(
                &search_url("Four Weddings and a Funeral", 1994),
                &fixture("imdb_search"),
            )
            .page(RATINGS, &fixture("imdb_ratings"));

        let options = ScrapeOptions {
            pages: 1,
            enrich: true,
        };
        let (dataset, stats) = run(&stub, &options);

        assert_eq!(dataset.len(), 3);
        let rows = dataset.rows();
        assert!(rows[0].imdb.is_some());
        assert!(rows[1].imdb.is_none());
        assert!(rows[2].imdb.is_some());

        assert_eq!(stats.links, 3);
        assert_eq!(stats.items, 3);
        assert_eq!(stats.enriched, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.skipped, 0);
    }

    #[test]
    fn failed_detail_page_is_skipped() {
        // Pelíšky's detail page 404s; the other two still land.
        let stub = StubFetcher::new()
            .page(&search_page_url(1), &fixture("listing_page"))
            .page(VETRELEC, &fixture("detail_vetrelec"))
            .page(CTYRI, &fixture("detail_ctyri"));

        let options = ScrapeOptions {
            pages: 1,
            enrich: false,
        };
        let (dataset, stats) = run(&stub, &options);

        assert_eq!(dataset.len(), 2);
        assert_eq!(stats.items, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.enriched, 0);
        assert_eq!(dataset.rows()[0].film.title, "Vetřelec");
        assert_eq!(
            dataset.rows()[1].film.title_en,
            "Four Weddings and a Funeral"
        );
    }

    #[test]
    fn rows_keep_crawl_order() {
        let stub = StubFetcher::new()
            .page(&search_page_url(1), &fixture("listing_page"))
            .page(VETRELEC, &fixture("detail_vetrelec"))
            .page(PELISKY, &fixture("detail_pelisky"))
            .page(CTYRI, &fixture("detail_ctyri"));

        let options = ScrapeOptions {
            pages: 1,
            enrich: false,
        };
        let (dataset, _) = run(&stub, &options);

        let urls: Vec<&str> = dataset.rows().iter().map(|r| r.film.url.as_str()).collect();
        assert_eq!(urls, [VETRELEC, PELISKY, CTYRI]);
    }
}
