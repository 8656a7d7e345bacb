//! Self-contained HTML report of film rows, posters included. Pure string
//! building; the CLI decides where the file goes.

use chrono::Local;
use itertools::Itertools;

use crate::record::FilmRow;

const STYLE: &str = "<style>\n\
    body { font-family: sans-serif; margin: 2em; }\n\
    table { border-collapse: collapse; }\n\
    th, td { border: 1px solid #ccc; padding: 4px 8px; text-align: left; }\n\
    th { background: #eee; }\n\
    img { max-height: 120px; }\n\
    </style>\n";

const COLUMNS: [&str; 13] = [
    "Poster",
    "Title",
    "English title",
    "Year",
    "Genres",
    "Countries",
    "Runtime",
    "Director",
    "ČSFD %",
    "ČSFD votes",
    "IMDb",
    "M-F diff",
    "nonUS-US diff",
];

/// Render the rows as one HTML table with a generated-at timestamp. Rows
/// without IMDb enrichment leave the three IMDb cells empty.
pub fn render(title: &str, rows: &[&FilmRow]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape(title)));
    html.push_str(STYLE);
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape(title)));
    html.push_str(&format!(
        "<p>{} film(s), generated {}</p>\n",
        rows.len(),
        Local::now().format("%Y-%m-%d %H:%M")
    ));

    html.push_str("<table>\n<tr>");
    for column in COLUMNS {
        html.push_str(&format!("<th>{}</th>", column));
    }
    html.push_str("</tr>\n");

    for row in rows {
        html.push_str(&render_row(row));
    }

    html.push_str("</table>\n</body>\n</html>\n");
    html
}

fn render_row(row: &FilmRow) -> String {
    let film = &row.film;
    let (imdb, gender, origin) = match &row.imdb {
        Some(imdb) => (
            format!("{:.1}", imdb.rating),
            format!("{:+.2}", imdb.gender_diff),
            format!("{:+.2}", imdb.origin_diff),
        ),
        None => (String::new(), String::new(), String::new()),
    };

    format!(
        "<tr><td><img src=\"{}\" alt=\"poster\"></td>\
         <td><a href=\"{}\">{}</a></td>\
         <td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
         <td>{} min</td><td>{}</td><td>{:.0}%</td><td>{}</td>\
         <td>{}</td><td>{}</td><td>{}</td></tr>\n",
        escape(&film.poster_url),
        escape(&film.url),
        escape(&film.title),
        escape(&film.title_en),
        film.year,
        escape(&film.genres.iter().join(" / ")),
        escape(&film.countries.iter().join(", ")),
        film.runtime_min,
        escape(&film.director),
        film.rating_pct,
        film.rating_count,
        imdb,
        gender,
        origin,
    )
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FilmRecord, RatingEnrichment};

    fn sample(enriched: bool) -> FilmRow {
        FilmRow {
            film: FilmRecord {
                title: "Vetřelec".to_string(),
                title_en: "Alien".to_string(),
                year: 1979,
                poster_url: "https://img.csfd.cz/posters/4422.jpg".to_string(),
                genres: vec!["Sci-Fi".to_string(), "Horor".to_string()],
                countries: vec!["USA".to_string()],
                runtime_min: 117,
                director: "Ridley Scott".to_string(),
                url: "https://www.csfd.cz/film/4422-vetrelec/".to_string(),
                rating_pct: 89.0,
                rating_count: 382_156,
            },
            imdb: enriched.then(|| RatingEnrichment {
                rating: 8.5,
                votes_by_star: [100; 10],
                gender_diff: 0.5,
                origin_diff: -0.1,
            }),
        }
    }

    #[test]
    fn renders_posters_and_linked_titles() {
        let row = sample(true);
        let html = render("Test report", &[&row]);

        assert!(html.contains("<img src=\"https://img.csfd.cz/posters/4422.jpg\""));
        assert!(html.contains("<a href=\"https://www.csfd.cz/film/4422-vetrelec/\">Vetřelec</a>"));
        assert!(html.contains("Sci-Fi / Horor"));
        assert!(html.contains("8.5"));
        assert!(html.contains("<h1>Test report</h1>"));
    }

    #[test]
    fn unenriched_rows_leave_imdb_cells_empty() {
        let row = sample(false);
        let html = render("r", &[&row]);
        assert!(html.contains("<td></td><td></td><td></td></tr>"));
    }

    #[test]
    fn escapes_markup_in_fields() {
        let mut row = sample(false);
        row.film.title = "<script>".to_string();
        let html = render("r", &[&row]);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
