//! Paragraph-to-sentence splitting
//!
//! English text runs through two independent heuristics (a general-purpose
//! boundary detector and a clause-aware splitter) and keeps whichever yields
//! more segments; shorter sentences batch more evenly and decode with fewer
//! errors. All other registered languages split on a script-specific
//! delimiter pattern.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::core::errors::Result;
use crate::lang::{DelimiterClass, LanguageTag};

/// Soft hyphen, stripped from every produced segment
const SOFT_HYPHEN: char = '\u{00AD}';

/// Sentence-delimiter runs for Brahmic scripts (danda, double danda, `?!.`)
static BRAHMIC_DELIM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[।॥?!.]+").expect("brahmic delim"));

/// Sentence-delimiter runs for Perso-Arabic scripts
static PERSO_ARABIC_DELIM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[۔؟?!.]+").expect("perso-arabic delim"));

/// Sentence-delimiter runs for Latin scripts outside the English dual path
static LATIN_DELIM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[?!.]+").expect("latin delim"));

/// Words that end with a period without ending a sentence
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "st", "rev", "gen", "col", "sgt", "vs", "etc", "no", "vol",
    "pp", "fig", "dept", "univ", "inc", "ltd", "jr", "sr",
];

/// Split free-form text into an ordered sequence of sentences
///
/// Fails with `UnsupportedLanguage` when the tag has no registered
/// segmentation strategy. No produced sentence is empty; soft hyphens are
/// removed and segments are trimmed.
pub fn split_sentences(text: &str, lang: &LanguageTag) -> Result<Vec<String>> {
    let entry = lang.resolve()?;

    let sentences = if lang.is_english() {
        let general = segment_general(text);
        let clause_aware = segment_clause_aware(text);
        debug!(
            "English split: general={} clause_aware={}",
            general.len(),
            clause_aware.len()
        );
        // Finer granularity wins
        if general.len() >= clause_aware.len() {
            general
        } else {
            clause_aware
        }
    } else {
        let pattern: &Regex = match entry.delimiters {
            DelimiterClass::Brahmic => &BRAHMIC_DELIM_RE,
            DelimiterClass::PersoArabic => &PERSO_ARABIC_DELIM_RE,
            DelimiterClass::Latin => &LATIN_DELIM_RE,
        };
        segment_on_delimiters(text, pattern)
    };

    let sentences: Vec<String> = sentences
        .into_iter()
        .map(|s| s.replace(SOFT_HYPHEN, "").trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    debug!("Split {} chars into {} sentences for {}", text.len(), sentences.len(), lang);
    Ok(sentences)
}

/// Delimiter-pattern segmentation: each sentence keeps its trailing delimiter
fn segment_on_delimiters(text: &str, pattern: &Regex) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut last = 0;
    for m in pattern.find_iter(text) {
        sentences.push(text[last..m.end()].to_string());
        last = m.end();
    }
    if last < text.len() {
        sentences.push(text[last..].to_string());
    }
    sentences
}

/// General-purpose boundary detector: break after every terminal-punctuation
/// run followed by whitespace, except after known abbreviations and single
/// initials
fn segment_general(text: &str) -> Vec<String> {
    segment_at(text, &boundaries(text, false))
}

/// Clause-aware splitter: also breaks on `;`/`:`, but only when the following
/// clause starts with a capital (or an opening quote before one)
fn segment_clause_aware(text: &str) -> Vec<String> {
    segment_at(text, &boundaries(text, true))
}

/// Byte offsets right after each detected sentence boundary
fn boundaries(text: &str, clause_aware: bool) -> Vec<usize> {
    let mut cuts = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        let terminal = matches!(ch, '.' | '?' | '!') || (clause_aware && matches!(ch, ';' | ':'));
        if !terminal {
            continue;
        }

        // Extend over the full punctuation run plus closing quotes
        let mut end = idx + ch.len_utf8();
        while let Some(&(next_idx, next_ch)) = chars.peek() {
            if matches!(next_ch, '.' | '?' | '!' | '"' | '\'' | ')') {
                end = next_idx + next_ch.len_utf8();
                chars.next();
            } else {
                break;
            }
        }

        let rest = &text[end..];
        let Some(first) = rest.chars().next() else {
            break; // end of text closes the final sentence implicitly
        };
        if !first.is_whitespace() {
            continue; // mid-token period (decimal, URL, version string)
        }

        if ch == '.' && is_abbreviation_before(&text[..idx]) {
            continue;
        }

        if clause_aware {
            let after = rest
                .trim_start()
                .trim_start_matches(['"', '\'', '(', '['])
                .chars()
                .next();
            match after {
                Some(c) if c.is_uppercase() => {}
                _ => continue,
            }
        }

        cuts.push(end);
    }

    cuts
}

/// Whether the word ending at the boundary is an abbreviation or an initial
fn is_abbreviation_before(prefix: &str) -> bool {
    let word = prefix
        .rsplit(|c: char| c.is_whitespace())
        .next()
        .unwrap_or("");
    let word = word.trim_matches(|c: char| !c.is_alphanumeric());
    if word.is_empty() {
        return false;
    }
    // "J. Smith" style initials
    if word.len() == 1 && word.chars().all(|c| c.is_uppercase()) {
        return true;
    }
    ABBREVIATIONS.contains(&word.to_lowercase().as_str())
}

/// Slice text into segments at the given byte offsets
fn segment_at(text: &str, cuts: &[usize]) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut last = 0;
    for &cut in cuts {
        sentences.push(text[last..cut].to_string());
        last = cut;
    }
    if last < text.len() {
        sentences.push(text[last..].to_string());
    }
    sentences
}
