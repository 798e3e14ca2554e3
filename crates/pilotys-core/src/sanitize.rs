//! Plain-text cleanup for meeting notes.
//!
//! Notes arrive either as editor HTML or as pasted text full of entities,
//! non-breaking spaces and stray control characters. [`sanitize`] turns
//! them into plain text with one space between words and at most one blank
//! line between paragraphs. Domain keywords such as "Décisions", "Actions"
//! or "À venir" are never touched: only markup and whitespace artifacts go.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static BREAK_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid regex"));
static BLOCK_CLOSE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</(?:p|div|li|ul|ol|h[1-6])>").expect("valid regex"));
static BLOCK_OPEN_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<(?:p|div|li|ul|ol|h[1-6])(?:\s[^>]*)?>").expect("valid regex"));
static NUMERIC_ENTITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"&#(\d{2,3});").expect("valid regex"));
static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static UNICODE_SPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x{00A0}\x{2000}-\x{200B}\x{202F}\x{205F}\x{3000}]").expect("valid regex")
});
static CONTROL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").expect("valid regex"));
static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").expect("valid regex"));
static NEWLINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Named entities decoded in table order.
const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&eacute;", "é"),
    ("&egrave;", "è"),
    ("&ecirc;", "ê"),
    ("&agrave;", "à"),
    ("&acirc;", "â"),
    ("&ocirc;", "ô"),
    ("&ccedil;", "ç"),
    ("&uuml;", "ü"),
    ("&ouml;", "ö"),
    ("&auml;", "ä"),
    ("&iuml;", "ï"),
    ("&ucirc;", "û"),
];

/// Sanitize raw meeting notes into plain text.
///
/// Total over any input: returns `""` for empty input and never panics.
///
/// 1. Block-level tags (`<br>`, `<p>`, `<div>`, `<li>`, `<ul>`, `<ol>`,
///    `<h1>`..`<h6>`, opening or closing) become newlines.
/// 2. Named entities from a fixed table are decoded.
/// 3. Numeric entities `&#NN;`/`&#NNN;` are decoded for 32–126 and
///    160–255 (160 becomes a plain space); others are left verbatim.
/// 4. Remaining tags are stripped.
/// 5. Line endings, Unicode spaces and tabs are normalized, control
///    characters dropped, space runs collapsed.
/// 6. Lines are trimmed, newline runs capped at two, the whole trimmed.
pub fn sanitize(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let text = BREAK_TAG.replace_all(input, "\n");
    let text = BLOCK_CLOSE_TAG.replace_all(&text, "\n");
    let text = BLOCK_OPEN_TAG.replace_all(&text, "\n");

    let text = decode_named_entities(&text);
    let text = decode_numeric_entities(&text);

    let text = ANY_TAG.replace_all(&text, "");

    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = UNICODE_SPACE.replace_all(&text, " ");
    let text = text.replace('\t', " ");
    // Control characters go before collapsing so their removal cannot
    // leave a fresh double space or newline run behind.
    let text = CONTROL_CHARS.replace_all(&text, "");
    let text = SPACE_RUN.replace_all(&text, " ");

    let text = text.split('\n').map(str::trim).collect::<Vec<_>>().join("\n");
    let text = NEWLINE_RUN.replace_all(&text, "\n\n");

    text.trim().to_string()
}

fn decode_named_entities(text: &str) -> String {
    let mut decoded = text.to_string();
    if !decoded.contains('&') {
        return decoded;
    }
    for (entity, literal) in NAMED_ENTITIES {
        if decoded.contains(entity) {
            decoded = decoded.replace(entity, literal);
        }
    }
    decoded
}

fn decode_numeric_entities(text: &str) -> String {
    NUMERIC_ENTITY
        .replace_all(text, |caps: &Captures| {
            let code: u32 = caps[1].parse().unwrap_or(0);
            match code {
                160 => " ".to_string(),
                32..=126 | 161..=255 => char::from_u32(code)
                    .map(String::from)
                    .unwrap_or_else(|| caps[0].to_string()),
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}
