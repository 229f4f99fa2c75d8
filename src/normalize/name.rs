//! Player name normalization.
//!
//! Platforms disagree on name shape: MFL ships `"Last, First"`, Sleeper ships
//! `"First Last"`, suffixes come dotted and dot-less, and initialisms appear
//! both as `DJ` and `D.J.`. [`normalize_name`] maps all of these onto a single
//! display form; [`merge_key`] derives the looser key used by fallback
//! matching.

/// Recognized name suffixes, paired with their canonical dotted form.
///
/// Checked longest-first so `" Jr."` wins over `" Jr"`.
const SUFFIXES: &[(&str, &str)] = &[
    ("Jr.", "Jr."),
    ("Sr.", "Sr."),
    ("III", "III"),
    ("II", "II"),
    ("IV", "IV"),
    ("Jr", "Jr."),
    ("Sr", "Sr."),
    ("V", "V"),
];

/// Two-letter initialism nicknames expanded when they lead a name.
const INITIALISMS: &[(&str, &str)] = &[
    ("DJ", "D.J."),
    ("AJ", "A.J."),
    ("TJ", "T.J."),
    ("CJ", "C.J."),
    ("JJ", "J.J."),
    ("RJ", "R.J."),
    ("BJ", "B.J."),
    ("PJ", "P.J."),
    ("MJ", "M.J."),
];

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for token in s.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token);
    }
    out
}

/// Splits a trailing suffix off `name`, returning the base name and the
/// canonical dotted form of the suffix when one was present.
fn split_suffix(name: &str) -> (&str, Option<&'static str>) {
    for (raw, canonical) in SUFFIXES {
        if name.len() > raw.len() + 1 {
            let cut = name.len() - raw.len();
            if name.ends_with(raw) && name.as_bytes()[cut - 1] == b' ' {
                return (name[..cut - 1].trim_end(), Some(canonical));
            }
        }
    }
    (name, None)
}

/// Normalizes a player name into canonical `"First Last [Suffix]"` form.
///
/// - `"Last, First"` input is converted to `"First Last"`; a suffix attached
///   to the last-name side (`"Smith Jr., John"`) is re-attached at the end.
/// - Suffixes are normalized to their dotted forms (`Jr` becomes `Jr.`).
/// - Leading initialism nicknames are expanded (`DJ Moore` becomes
///   `D.J. Moore`).
/// - Internal whitespace collapses to single spaces.
///
/// Output is stable under repeated application.
#[must_use]
pub fn normalize_name(raw: &str) -> String {
    let mut name = collapse_whitespace(raw);
    if name.is_empty() {
        return name;
    }

    // "Last, First" conversion, keeping any last-name-side suffix at the end.
    if let Some((last, first)) = name.split_once(", ") {
        let last = last.trim();
        let first = first.trim();
        if !last.is_empty() && !first.is_empty() {
            let (last_base, suffix) = split_suffix(last);
            name = match suffix {
                Some(sfx) => format!("{first} {last_base} {sfx}"),
                None => format!("{first} {last}"),
            };
        }
    }

    let (base, suffix) = split_suffix(&name);
    let mut base = base.to_string();

    for (short, dotted) in INITIALISMS {
        if let Some(rest) = base.strip_prefix(short) {
            if let Some(rest) = rest.strip_prefix(' ') {
                base = format!("{dotted} {rest}");
                break;
            }
        }
    }

    let mut out = collapse_whitespace(&base);
    if let Some(sfx) = suffix {
        out.push(' ');
        out.push_str(sfx);
    }
    out
}

/// Derives the loose matching key used by the fallback index.
///
/// Lowercased, suffix-stripped, and stripped of punctuation other than
/// hyphens and apostrophes, so `"D.J. Moore"` and `"DJ Moore"` collide while
/// `"Ja'Marr Chase"` keeps its apostrophe.
#[must_use]
pub fn merge_key(raw: &str) -> String {
    let normalized = normalize_name(raw);
    let (base, _) = split_suffix(&normalized);
    let cleaned: String = base
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '\'')
        .collect();
    collapse_whitespace(&cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_first_converts_to_first_last() {
        assert_eq!(normalize_name("Allen, Josh"), "Josh Allen");
        assert_eq!(normalize_name("Josh Allen"), "Josh Allen");
    }

    #[test]
    fn suffix_on_last_name_side_moves_to_end() {
        assert_eq!(normalize_name("Smith Jr., John"), "John Smith Jr.");
        assert_eq!(normalize_name("Chark Jr., DJ"), "D.J. Chark Jr.");
    }

    #[test]
    fn dotless_suffix_is_normalized() {
        assert_eq!(normalize_name("Odell Beckham Jr"), "Odell Beckham Jr.");
        assert_eq!(normalize_name("Marvin Harrison Sr"), "Marvin Harrison Sr.");
    }

    #[test]
    fn roman_numeral_suffixes_survive() {
        assert_eq!(normalize_name("Will Fuller V"), "Will Fuller V");
        assert_eq!(normalize_name("Robert Griffin III"), "Robert Griffin III");
        assert_eq!(normalize_name("Griffin III, Robert"), "Robert Griffin III");
    }

    #[test]
    fn leading_initialism_expands() {
        assert_eq!(normalize_name("DJ Moore"), "D.J. Moore");
        assert_eq!(normalize_name("AJ Brown"), "A.J. Brown");
        // Already-dotted input is untouched.
        assert_eq!(normalize_name("D.J. Moore"), "D.J. Moore");
        // Non-leading occurrences are untouched.
        assert_eq!(normalize_name("Moore DJ"), "Moore DJ");
    }

    #[test]
    fn whitespace_collapses() {
        assert_eq!(normalize_name("  Josh   Allen "), "Josh Allen");
    }

    #[test]
    fn idempotent() {
        for raw in [
            "Allen, Josh",
            "Smith Jr., John",
            "DJ Moore",
            "Odell Beckham Jr",
            "Van Der Berg, Kyle",
            "",
        ] {
            let once = normalize_name(raw);
            assert_eq!(normalize_name(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn multi_word_last_names() {
        assert_eq!(normalize_name("Van Der Berg, Kyle"), "Kyle Van Der Berg");
    }

    #[test]
    fn merge_key_collapses_punctuation_variants() {
        assert_eq!(merge_key("D.J. Moore"), merge_key("DJ Moore"));
        assert_eq!(merge_key("Odell Beckham Jr."), "odell beckham");
        assert_eq!(merge_key("Allen, Josh"), "josh allen");
        // Hyphens and apostrophes are meaningful.
        assert_eq!(merge_key("Ja'Marr Chase"), "ja'marr chase");
        assert_eq!(merge_key("Amon-Ra St. Brown"), "amon-ra st brown");
    }
}
