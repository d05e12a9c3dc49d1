//! Locale-aware string ordering for station labels.
//!
//! Follows the multi-level comparison a collator applies to Latin text:
//! base letters first (ignoring case and accents), then accents, then case
//! with lowercase first, and finally raw code points so the order is total.
//!
//! Labels are decomposed to NFD, so any precomposed accented letter splits
//! into its base letter plus combining marks, and the marks only count at the
//! accent level. Whitespace and punctuation sort before digits, and digits
//! before letters.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Primary collation weight for one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Primary {
    Gap(u32),
    Digit(u32),
    Letter(char),
}

/// One collation element. Combining marks have no primary weight.
#[derive(Debug, Clone, Copy)]
struct Element {
    primary: Option<Primary>,
    accent: u32,
    upper: bool,
}

impl Element {
    fn base(primary: Primary, upper: bool) -> Self {
        Self {
            primary: Some(primary),
            accent: 0,
            upper,
        }
    }

    fn mark(accent: u32) -> Self {
        Self {
            primary: None,
            accent,
            upper: false,
        }
    }
}

/// Accent weights for marks that are not combining characters.
const STROKE: u32 = 14;
const LIGATURE: u32 = 15;

/// Secondary weight of a combining mark, in default collation order.
fn mark_weight(c: char) -> u32 {
    match c {
        '\u{301}' => 1,  // acute
        '\u{300}' => 2,  // grave
        '\u{306}' => 3,  // breve
        '\u{302}' => 4,  // circumflex
        '\u{30C}' => 5,  // caron
        '\u{30A}' => 6,  // ring
        '\u{308}' => 7,  // diaeresis
        '\u{30B}' => 8,  // double acute
        '\u{303}' => 9,  // tilde
        '\u{307}' => 10, // dot above
        '\u{327}' => 11, // cedilla
        '\u{328}' => 12, // ogonek
        '\u{304}' => 13, // macron
        _ => 0x100 + c as u32,
    }
}

/// Letters Unicode does not decompose, mapped to base letters and an accent.
fn fold(c: char) -> Option<(&'static str, u32)> {
    let folded = match c {
        'ß' => ("ss", LIGATURE),
        'æ' => ("ae", LIGATURE),
        'œ' => ("oe", LIGATURE),
        'ĳ' => ("ij", LIGATURE),
        'ø' => ("o", STROKE),
        'ł' => ("l", STROKE),
        'đ' => ("d", STROKE),
        'ħ' => ("h", STROKE),
        'ŧ' => ("t", STROKE),
        _ => return None,
    };
    Some(folded)
}

/// Punctuation in default collation order. Unlisted symbols follow, by code
/// point.
const PUNCTUATION: &str = "_-\u{2010}\u{2011}\u{2012}\u{2013}\u{2014},;:!?.'\u{2018}\u{2019}\"\u{201C}\u{201D}()[]{}@*/\\&#%`^+<=>|~$";

fn gap_weight(c: char) -> u32 {
    if c.is_whitespace() {
        return 0;
    }
    match PUNCTUATION.find(c) {
        Some(pos) => 1 + pos as u32,
        None => 0x1000 + c as u32,
    }
}

fn push_letter(out: &mut Vec<Element>, lower: char, upper: bool) {
    if is_combining_mark(lower) {
        out.push(Element::mark(mark_weight(lower)));
        return;
    }
    match fold(lower) {
        Some((base, accent)) => {
            out.extend(base.chars().map(|b| Element::base(Primary::Letter(b), upper)));
            out.push(Element::mark(accent));
        }
        None => out.push(Element::base(Primary::Letter(lower), upper)),
    }
}

fn elements(s: &str) -> Vec<Element> {
    let mut out = Vec::with_capacity(s.len());
    for c in s.nfd() {
        if is_combining_mark(c) {
            out.push(Element::mark(mark_weight(c)));
        } else if c.is_alphabetic() {
            let upper = c.is_uppercase();
            for lower in c.to_lowercase() {
                push_letter(&mut out, lower, upper);
            }
        } else if c.is_numeric() {
            let digit = c.to_digit(10).unwrap_or(10 + c as u32);
            out.push(Element::base(Primary::Digit(digit), false));
        } else {
            out.push(Element::base(Primary::Gap(gap_weight(c)), false));
        }
    }
    out
}

/// Compare two strings for display ordering.
pub fn compare(a: &str, b: &str) -> Ordering {
    let ea = elements(a);
    let eb = elements(b);

    let primaries = |e: &[Element]| e.iter().filter_map(|e| e.primary).collect::<Vec<_>>();
    let cases = |e: &[Element]| {
        e.iter().filter(|e| e.primary.is_some()).map(|e| e.upper).collect::<Vec<_>>()
    };

    primaries(&ea)
        .cmp(&primaries(&eb))
        .then_with(|| ea.iter().map(|e| e.accent).cmp(eb.iter().map(|e| e.accent)))
        .then_with(|| cases(&ea).cmp(&cases(&eb)))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(items: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = items.iter().map(|s| s.to_string()).collect();
        v.sort_by(|a, b| compare(a, b));
        v
    }

    #[test]
    fn test_case_insensitive_primary() {
        assert_eq!(sorted(&["banbury", "Abingdon", "cambridge"]), vec![
            "Abingdon",
            "banbury",
            "cambridge"
        ]);
    }

    #[test]
    fn test_lowercase_first_on_tie() {
        assert_eq!(compare("a", "A"), Ordering::Less);
        assert_eq!(compare("Ab", "aC"), Ordering::Less);
    }

    #[test]
    fn test_accents_fold_to_base() {
        // "Ystradgynlais" vs "Ŷnys": primary y-s vs y-n decides, not the accent
        assert_eq!(compare("Ŷnys", "Ystrad"), Ordering::Less);
        assert_eq!(compare("Zürich", "Zurich"), Ordering::Greater);
        assert_eq!(compare("Côte", "Cote"), Ordering::Greater);
        assert_eq!(compare("Cotes", "Côte"), Ordering::Greater);
    }

    #[test]
    fn test_extended_latin_folds_to_base() {
        assert_eq!(compare("Āra", "Zeals"), Ordering::Less);
        assert_eq!(compare("Ďáblice", "Ealing"), Ordering::Less);
        assert_eq!(sorted(&["Zeals", "Ōban", "Ąbrook", "Ębbw", "Ťrow", "Ňess"]), vec![
            "Ąbrook", "Ębbw", "Ňess", "Ōban", "Ťrow", "Zeals"
        ]);
        assert_eq!(compare("Łódź", "Lodz"), Ordering::Greater);
        assert_eq!(compare("Łódź", "Lodza"), Ordering::Less);
    }

    #[test]
    fn test_decomposed_marks_are_accents() {
        assert_eq!(compare("E\u{301}z", "Ea"), Ordering::Greater);
        assert_eq!(compare("E\u{301}a", "Eb"), Ordering::Less);
        assert_eq!(compare("Cote", "Co\u{302}te"), Ordering::Less);
    }

    #[test]
    fn test_ligatures_expand() {
        assert_eq!(compare("Straße", "Strasse"), Ordering::Greater);
        assert_eq!(compare("Straße", "Strasso"), Ordering::Less);
    }

    #[test]
    fn test_gaps_and_digits_before_letters() {
        assert_eq!(sorted(&["St Ives", "St. Ives", "Stamford", "St2"]), vec![
            "St Ives", "St. Ives", "St2", "Stamford"
        ]);
    }

    #[test]
    fn test_punctuation_order() {
        assert_eq!(compare("Kew-Bridge", "Kew(Bridge"), Ordering::Less);
        assert_eq!(compare("Kew,Bridge", "Kew(Bridge"), Ordering::Less);
        assert_eq!(compare("Kew_Bridge", "Kew-Bridge"), Ordering::Less);
        assert_eq!(compare("Kew Bridge", "Kew_Bridge"), Ordering::Less);
    }

    #[test]
    fn test_total_order() {
        assert_eq!(compare("same", "same"), Ordering::Equal);
        assert_ne!(compare("a\u{0301}", "á"), Ordering::Equal);
    }
}
