//! Section detection for minutes written with headers such as
//! "Points abordés", "Décisions", "Actions" or "À venir".

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::warn;

use crate::action::normalize_action_text;
use crate::split::split_long_sentences;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    Points,
    Decisions,
    Actions,
    Next,
    Clarify,
}

static HEADERS: Lazy<Vec<(SectionKind, Regex)>> = Lazy::new(|| {
    [
        (
            SectionKind::Points,
            r"points?(?:\s+(?:abord[ée]e?s?|discut[ée]e?s?|trait[ée]e?s?|[ée]voqu[ée]e?s?))?",
        ),
        (SectionKind::Decisions, r"d[ée]cisions?(?:\s+prises?)?"),
        (
            SectionKind::Actions,
            r"(?:actions?|action\s+items?)(?:\s+[àa]\s*(?:r[ée]aliser|faire|suivre|effectuer|traiter|engager))?",
        ),
        (
            SectionKind::Next,
            r"(?:[àa]\s+venir|(?:sujets?|points?)\s+[àa]\s+venir|sujets?\s+[àa]\s+traiter|points?\s+[àa]\s+discuter|prochaines?\s+[ée]tapes?)",
        ),
        (
            SectionKind::Clarify,
            r"(?:points?\s+[àa]\s+(?:clarifier|d[ée]finir|confirmer)|questions?(?:\s+ouvertes?)?|[àa]\s+clarifier)",
        ),
    ]
    .into_iter()
    .map(|(kind, header)| {
        let pattern = format!(r"(?i)^{header}\s*:?$");
        (kind, Regex::new(&pattern).expect("valid regex"))
    })
    .collect()
});

static UNICODE_SPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x{00A0}\x{2000}-\x{200B}\x{202F}\x{205F}\x{3000}\t]").expect("valid regex")
});
static CONTROL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").expect("valid regex"));
static BULLET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:->|[\-•*◦▪▫→➜➤✓✔☐☑▸▹▻►▶\x{2023}\x{2043}\x{204C}\x{204D}\x{2219}\x{25A0}\x{25A1}\x{25B6}\x{25B8}\x{25BA}\x{25BC}\x{25C0}\x{25C2}\x{25C4}\x{25CB}\x{25CF}\x{25E6}\x{219D}\x{21A3}\x{21AA}\x{2794}\x{279C}-\x{279F}\x{27A4}\x{27A5}\x{27B0}-\x{27B3}])+\s*",
    )
    .expect("valid regex")
});
static NUMBERING: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"^\d+[.)](?:\s+|$)", r"(?i)^[a-z]\)\s*", r"(?i)^[ivxlcdm]+\)\s*"]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
});
static SYMBOLS_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\s\p{P}\p{S}]*$").expect("valid regex"));

/// Cleaned, unsplit lines of each section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionBlocks {
    pub points: Vec<String>,
    pub decisions: Vec<String>,
    pub actions: Vec<String>,
    pub next: Vec<String>,
    pub clarify: Vec<String>,
    /// Whether at least one header was recognised.
    pub found: bool,
}

impl SectionBlocks {
    fn block_mut(&mut self, kind: SectionKind) -> &mut Vec<String> {
        match kind {
            SectionKind::Points => &mut self.points,
            SectionKind::Decisions => &mut self.decisions,
            SectionKind::Actions => &mut self.actions,
            SectionKind::Next => &mut self.next,
            SectionKind::Clarify => &mut self.clarify,
        }
    }
}

/// Section items after sentence splitting; actions are normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Sections {
    pub points: Vec<String>,
    pub decisions: Vec<String>,
    pub actions: Vec<String>,
    pub next: Vec<String>,
    pub clarify: Vec<String>,
}

/// Cut `text` into its sections.
///
/// Only the first header of each kind opens a block; a block runs until the
/// next such header. Without any header every cleaned line lands in
/// `points`.
pub fn section_blocks(text: &str) -> SectionBlocks {
    let lines: Vec<&str> = text.split('\n').map(str::trim).filter(|l| !l.is_empty()).collect();

    let mut starts: Vec<(SectionKind, usize)> = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if let Some(kind) = header_kind(&clean_list_line(line))
            && !starts.iter().any(|(seen, _)| *seen == kind)
        {
            starts.push((kind, idx));
        }
    }

    let mut blocks = SectionBlocks::default();
    if starts.is_empty() {
        if !lines.is_empty() {
            warn!(lines = lines.len(), "no section header found, treating every line as a point");
        }
        blocks.points = extract_items(&lines);
        return blocks;
    }

    blocks.found = true;
    for (pos, (kind, start)) in starts.iter().enumerate() {
        let end = starts.get(pos + 1).map_or(lines.len(), |(_, next)| *next);
        *blocks.block_mut(*kind) = extract_items(&lines[start + 1..end]);
    }
    blocks
}

/// Detect sections, split long sentences and normalize actions.
pub fn extract_sections(text: &str) -> Sections {
    let blocks = section_blocks(text);
    Sections {
        points: split_long_sentences(&blocks.points),
        decisions: split_long_sentences(&blocks.decisions),
        actions: split_long_sentences(&blocks.actions)
            .iter()
            .map(|action| normalize_action_text(action))
            .filter(|action| !action.is_empty())
            .collect(),
        next: split_long_sentences(&blocks.next),
        clarify: split_long_sentences(&blocks.clarify),
    }
}

fn header_kind(line: &str) -> Option<SectionKind> {
    HEADERS
        .iter()
        .find(|(_, re)| re.is_match(line))
        .map(|(kind, _)| *kind)
}

pub(crate) fn is_section_title(line: &str) -> bool {
    header_kind(line).is_some()
}

/// Normalize spacing and strip a leading bullet or list number.
pub(crate) fn clean_list_line(line: &str) -> String {
    let line = UNICODE_SPACE.replace_all(line, " ");
    let line = CONTROL_CHARS.replace_all(&line, "");
    let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut cleaned = BULLET.replace(&collapsed, "").into_owned();
    for numbering in NUMBERING.iter() {
        cleaned = numbering.replace(&cleaned, "").into_owned();
    }
    cleaned.trim().to_string()
}

fn extract_items(lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .map(|line| clean_list_line(line))
        .filter(|item| {
            item.chars().count() >= 3
                && !item.ends_with(':')
                && !is_section_title(item)
                && !SYMBOLS_ONLY.is_match(item)
        })
        .collect()
}
