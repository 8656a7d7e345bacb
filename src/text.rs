//! Small text helpers shared by the extractors.

/// Transliterate to plain ASCII by folding diacritics to their base letters.
/// IMDb's search endpoint only matches unaccented titles, so "Pelíšky" has to
/// go out as "Pelisky". Characters without a mapping are dropped.
pub fn ascii_fold(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii() {
            out.push(c);
        } else if let Some(folded) = fold_char(c) {
            out.push_str(folded);
        }
    }
    out
}

/// Czech and Slovak letters first, then the western-European ones that show
/// up in titles and director names.
fn fold_char(c: char) -> Option<&'static str> {
    Some(match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'ą' => "a",
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' | 'Ą' => "A",
        'č' | 'ç' | 'ć' => "c",
        'Č' | 'Ç' | 'Ć' => "C",
        'ď' | 'đ' => "d",
        'Ď' | 'Đ' => "D",
        'é' | 'è' | 'ê' | 'ë' | 'ě' | 'ę' => "e",
        'É' | 'È' | 'Ê' | 'Ë' | 'Ě' | 'Ę' => "E",
        'í' | 'ì' | 'î' | 'ï' => "i",
        'Í' | 'Ì' | 'Î' | 'Ï' => "I",
        'ľ' | 'ĺ' | 'ł' => "l",
        'Ľ' | 'Ĺ' | 'Ł' => "L",
        'ň' | 'ñ' | 'ń' => "n",
        'Ň' | 'Ñ' | 'Ń' => "N",
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ő' | 'ø' => "o",
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' | 'Ő' | 'Ø' => "O",
        'ř' | 'ŕ' => "r",
        'Ř' | 'Ŕ' => "R",
        'š' | 'ś' | 'ş' => "s",
        'Š' | 'Ś' | 'Ş' => "S",
        'ť' | 'ţ' => "t",
        'Ť' | 'Ţ' => "T",
        'ú' | 'ù' | 'û' | 'ü' | 'ů' | 'ű' => "u",
        'Ú' | 'Ù' | 'Û' | 'Ü' | 'Ů' | 'Ű' => "U",
        'ý' | 'ÿ' => "y",
        'Ý' | 'Ÿ' => "Y",
        'ž' | 'ź' | 'ż' => "z",
        'Ž' | 'Ź' | 'Ż' => "Z",
        'ß' => "ss",
        'æ' => "ae",
        'Æ' => "Ae",
        'œ' => "oe",
        'Œ' => "Oe",
        _ => return None,
    })
}

/// Drop the grouping characters the sites put inside vote counts: regular
/// and non-breaking spaces on ČSFD, commas on IMDb.
pub fn strip_number_grouping(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_czech_diacritics() {
        assert_eq!(ascii_fold("Žluťoučký kůň"), "Zlutoucky kun");
        assert_eq!(ascii_fold("Pelíšky"), "Pelisky");
        assert_eq!(ascii_fold("Tmavomodrý svět"), "Tmavomodry svet");
    }

    #[test]
    fn keeps_ascii_untouched() {
        assert_eq!(ascii_fold("Alien 3: Resurrection!"), "Alien 3: Resurrection!");
    }

    #[test]
    fn folds_western_letters() {
        assert_eq!(ascii_fold("Amélie z Montmartru"), "Amelie z Montmartru");
        assert_eq!(ascii_fold("Das Boot über Größe"), "Das Boot uber Grosse");
    }

    #[test]
    fn drops_unmapped_characters() {
        // Em dash has no ASCII base letter.
        assert_eq!(ascii_fold("a—b"), "ab");
    }

    #[test]
    fn strips_vote_grouping() {
        assert_eq!(strip_number_grouping("382\u{a0}156"), "382156");
        assert_eq!(strip_number_grouping("1,234,567"), "1234567");
        assert_eq!(strip_number_grouping("\n 55 123 \t"), "55123");
    }
}
