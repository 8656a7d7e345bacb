use std::str::FromStr;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractError;
use crate::record::FilmRecord;
use crate::text;

static TITLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"h1[itemprop="name"]"#).unwrap());
static INFO_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.info").unwrap());
static YEAR_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"span[itemprop="dateCreated"]"#).unwrap());
static POSTER_IMG_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#poster img").unwrap());
static GENRE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".genre").unwrap());
static ORIGIN_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".origin").unwrap());
static AVERAGE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".average").unwrap());
static COUNT_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".count").unwrap());
static DIRECTOR_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[itemprop="director"]"#).unwrap());

/// Flag alt-texts tried in order when looking for an English release title.
/// US release first, then UK, then the generic "English" language flag.
const TITLE_FLAGS: [&str; 3] = ["USA", "Velká Británie", "anglický"];

/// Parse one film detail page. Every field except the alternate title is
/// mandatory; a missing element or an unparsable value fails the whole page
/// and the caller decides whether that skips the item or aborts.
pub fn extract(document: &Html, url: &str) -> Result<FilmRecord, ExtractError> {
    let title = element_text(document, &TITLE_SEL, "title")?
        .replace('\t', "")
        .replace('\n', "");

    let title_en = english_title(document);

    let year = parse_field("year", &element_text(document, &YEAR_SEL, "year")?)?;

    let poster_url = document
        .select(&POSTER_IMG_SEL)
        .next()
        .and_then(|img| img.value().attr("src"))
        .ok_or(ExtractError::Missing { field: "poster" })?
        .to_string();

    let genres = element_text(document, &GENRE_SEL, "genre")?
        .trim()
        .split(" / ")
        .map(str::to_string)
        .collect();

    // ".origin" reads like "USA / Velká Británie, 1979, 117 min": countries
    // first, then the year again, then the runtime.
    let origin = element_text(document, &ORIGIN_SEL, "origin")?;
    let mut segments = origin.trim().split(", ");
    let countries: Vec<String> = segments
        .next()
        .unwrap_or_default()
        .split(" / ")
        .map(str::to_string)
        .collect();
    let runtime_segment = segments
        .nth(1)
        .ok_or(ExtractError::Missing { field: "runtime" })?;
    let runtime_min = parse_field(
        "runtime",
        runtime_segment
            .split_whitespace()
            .next()
            .unwrap_or(runtime_segment),
    )?;

    let rating_pct = parse_field(
        "average",
        &element_text(document, &AVERAGE_SEL, "average")?.replace('%', ""),
    )?;

    // ".count" wraps the number in boilerplate and groups digits with NBSP:
    // "\nvšechna hodnocení(382 156)\n\t\t\t\t".
    let count_raw = element_text(document, &COUNT_SEL, "count")?;
    let count_digits = text::strip_number_grouping(
        &count_raw.replace("všechna hodnocení", "").replace(['(', ')'], ""),
    );
    let rating_count = parse_field("count", &count_digits)?;

    let director = element_text(document, &DIRECTOR_SEL, "director")?.replace('\n', "");

    Ok(FilmRecord {
        title,
        title_en,
        year,
        poster_url,
        genres,
        countries,
        runtime_min,
        director,
        url: url.to_string(),
        rating_pct,
        rating_count,
    })
}

/// First element matched by `selector`, full text.
fn element_text(
    document: &Html,
    selector: &Selector,
    field: &'static str,
) -> Result<String, ExtractError> {
    document
        .select(selector)
        .next()
        .map(|el| el.text().collect())
        .ok_or(ExtractError::Missing { field })
}

fn parse_field<T: FromStr>(field: &'static str, raw: &str) -> Result<T, ExtractError> {
    raw.trim()
        .parse()
        .map_err(|_| ExtractError::unparsable(field, raw))
}

/// The alternate-title block lists one row per release region, a flag image
/// followed by the title in an `h3`. Try the flags in priority order and take
/// the first `h3` following the matched flag in document order. Films without
/// any of the flags legitimately have no English title.
fn english_title(document: &Html) -> String {
    let Some(info) = document.select(&INFO_SEL).next() else {
        return String::new();
    };
    TITLE_FLAGS
        .iter()
        .find_map(|flag| title_after_flag(info, flag))
        .unwrap_or_default()
}

fn title_after_flag(info: ElementRef, flag_alt: &str) -> Option<String> {
    let mut seen_flag = false;
    for node in info.descendants() {
        let Some(el) = ElementRef::wrap(node) else {
            continue;
        };
        if !seen_flag {
            if el.value().name() == "img" && el.value().attr("alt") == Some(flag_alt) {
                seen_flag = true;
            }
        } else if el.value().name() == "h3" {
            let title: String = el.text().collect();
            return Some(title.trim().to_string());
        }
    }
    None
}

// ── Tests ──
