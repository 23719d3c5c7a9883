//! Pure text helpers for lyrics: page extraction, section header removal and
//! the normalisation applied before language detection and scoring.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    // Spans newlines so that cleaning stays idempotent once whitespace is collapsed.
    static ref ANNOTATION_RE: Regex = Regex::new(r"(?s)\[.*?\]").expect("valid annotation regex");
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").expect("valid whitespace regex");
    static ref SECTION_HEADER_RE: Regex = Regex::new(r"\[.*?\]").expect("valid header regex");
    static ref BLANK_LINES_RE: Regex =
        Regex::new(r"\n(?:[ \t]*\n)+").expect("valid blank lines regex");
    static ref BR_RE: Regex = Regex::new(r"(?i)<br\s*/?>").expect("valid br regex");
    static ref TAG_RE: Regex = Regex::new(r"<[^>]*>").expect("valid tag regex");
    static ref ENTITY_RE: Regex =
        Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("valid entity regex");
}

const LYRICS_CONTAINER_MARKER: &str = "data-lyrics-container=\"true\"";

/// Removes bracketed annotations (`[Chorus]`, `[Verse 2: ...]`), collapses
/// every whitespace run to a single space and trims the result.
pub fn clean_lyrics(raw: &str) -> String {
    let without_annotations = ANNOTATION_RE.replace_all(raw, " ");
    WHITESPACE_RE
        .replace_all(&without_annotations, " ")
        .trim()
        .to_string()
}

/// Returns at most the first `max_chars` characters of `text`.
pub fn prefix_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Drops structural section headers from provider lyrics while keeping line breaks.
pub fn remove_section_headers(lyrics: &str) -> String {
    let stripped = SECTION_HEADER_RE.replace_all(lyrics, "");
    BLANK_LINES_RE
        .replace_all(&stripped, "\n")
        .trim()
        .to_string()
}

/// Extracts the plain-text lyrics from a lyrics page.
///
/// The page carries one or more `<div data-lyrics-container="true">` blocks; their
/// text is concatenated, with `<br>` turned into line breaks. Returns `None` when
/// the page has no lyrics container or the containers are empty.
pub fn extract_lyrics_from_page(html: &str) -> Option<String> {
    let mut sections = Vec::new();
    let mut cursor = 0;

    while let Some(found) = html[cursor..].find(LYRICS_CONTAINER_MARKER) {
        let marker_at = cursor + found;
        let Some(tag_end) = html[marker_at..].find('>') else {
            break;
        };
        let body_start = marker_at + tag_end + 1;
        let body_end = matching_div_end(html, body_start);
        sections.push(fragment_to_text(&html[body_start..body_end]));
        cursor = body_end;
    }

    let text = sections.join("\n");
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Byte offset of the `</div>` closing the div whose body starts at `from`.
fn matching_div_end(html: &str, from: usize) -> usize {
    let mut depth = 1usize;
    let mut pos = from;
    loop {
        let next_open = html[pos..].find("<div").map(|i| pos + i);
        let next_close = html[pos..].find("</div>").map(|i| pos + i);
        match (next_open, next_close) {
            (Some(open), Some(close)) if open < close => {
                depth += 1;
                pos = open + "<div".len();
            }
            (_, Some(close)) => {
                depth -= 1;
                if depth == 0 {
                    return close;
                }
                pos = close + "</div>".len();
            }
            (_, None) => return html.len(),
        }
    }
}

fn fragment_to_text(fragment: &str) -> String {
    let with_breaks = BR_RE.replace_all(fragment, "\n");
    let without_tags = TAG_RE.replace_all(&with_breaks, "");
    decode_entities(&without_tags)
}

fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                    u32::from_str_radix(&entity[2..], 16)
                        .ok()
                        .and_then(char::from_u32)
                }
                _ if entity.starts_with('#') => {
                    entity[1..].parse::<u32>().ok().and_then(char::from_u32)
                }
                _ => None,
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
