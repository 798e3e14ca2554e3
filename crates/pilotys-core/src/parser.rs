//! Structured-list parser.
//!
//! Meeting notes often put an item on one line and its metadata on the
//! lines below:
//!
//! ```text
//! Créer la roadmap
//! Responsable: Rania
//! Échéance: Dans 3 jours
//! ```
//!
//! [`parse_structured_list`] folds such label lines into the item above
//! them. [`extract_metadata_from_context`] re-derives the same fields for a
//! single item from its own text and the few lines that follow it.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{ItemMetadata, ParsedItem};

/// Metadata field a label line feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Label {
    Responsible,
    DueDate,
    Context,
    Impact,
}

const RESPONSIBLE_KEYWORDS: &str = r"responsable|assignée?|chargée?|déléguée?";
const DUE_DATE_KEYWORDS: &str = r"échéance|deadline|date";
const CONTEXT_KEYWORDS: &str = r"contexte|situation|problème";
const IMPACT_KEYWORDS: &str = r"impact|conséquence|effet|bénéfice|risque|avantage";

/// How many lines after an item may still carry its metadata.
const FOLLOWING_LINES: usize = 3;

/// Whole-line labels, tried in priority order.
static LABEL_LINES: Lazy<Vec<(Label, Regex)>> = Lazy::new(|| {
    [
        (Label::Responsible, RESPONSIBLE_KEYWORDS),
        (Label::DueDate, DUE_DATE_KEYWORDS),
        (Label::Context, CONTEXT_KEYWORDS),
        (Label::Impact, IMPACT_KEYWORDS),
    ]
    .into_iter()
    .map(|(label, keywords)| {
        let pattern = format!(r"(?i)^(?:→|->|-)?\s*(?:{keywords})(?:\s+à)?\s*:\s*(.+)$");
        (label, Regex::new(&pattern).expect("valid regex"))
    })
    .collect()
});

/// A label keyword and colon with nothing after it.
static EMPTY_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:→|->|-)?\s*(?:{RESPONSIBLE_KEYWORDS}|{DUE_DATE_KEYWORDS}|{CONTEXT_KEYWORDS}|{IMPACT_KEYWORDS})(?:\s+à)?\s*:\s*$"
    ))
    .expect("valid regex")
});

static INLINE_RESPONSIBLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i:{RESPONSIBLE_KEYWORDS})(?:\s+à)?\s*:\s*(\p{{Lu}}\p{{Ll}}+(?:\s+\p{{Lu}}\p{{Ll}}+)?)"
    ))
    .expect("valid regex")
});
static INLINE_FIELDS: Lazy<Vec<(Label, Regex)>> = Lazy::new(|| {
    [
        (Label::DueDate, DUE_DATE_KEYWORDS),
        (Label::Context, CONTEXT_KEYWORDS),
        (Label::Impact, IMPACT_KEYWORDS),
    ]
    .into_iter()
    .map(|(label, keywords)| {
        let pattern = format!(r"(?i)(?:{keywords})\s*:\s*([^()]+?)\s*(?:\.(?:\s|$)|\)|$)");
        (label, Regex::new(&pattern).expect("valid regex"))
    })
    .collect()
});

static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^)]+)\)").expect("valid regex"));
static ASIDE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{Lu}\p{Ll}+(?:\s+\p{Lu}\p{Ll}+)?").expect("valid regex"));
static ASIDE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:à\s+partir\s+de|pour|avant|le)\s+((?:lundi|mardi|mercredi|jeudi|vendredi|samedi|dimanche)(?:\s+prochain)?|\d{1,2}[/\-.]\d{1,2}|semaine\s+prochaine)",
    )
    .expect("valid regex")
});

/// Match a whole line against the metadata labels, returning the label and
/// its trimmed value.
pub(crate) fn match_label(line: &str) -> Option<(Label, &str)> {
    LABEL_LINES.iter().find_map(|(label, re)| {
        re.captures(line)
            .and_then(|caps| caps.get(1))
            .map(|value| (*label, value.as_str().trim()))
    })
}

pub(crate) fn is_label_line(line: &str) -> bool {
    let line = line.trim();
    match_label(line).is_some() || EMPTY_LABEL.is_match(line)
}

/// Group lines into items, attaching label lines to the item above them.
///
/// Label lines that appear before any item are dropped, as are labels with
/// no value. An explicit label overwrites whatever the item already had.
/// A parenthetical aside such as `(Rania, à partir de mardi prochain)` only
/// fills fields still unset, and goes to the item that was open when its
/// line arrived: an aside on an item line enriches the previous item.
pub fn parse_structured_list<S: AsRef<str>>(lines: &[S]) -> Vec<ParsedItem> {
    let mut items = Vec::new();
    let mut current: Option<ParsedItem> = None;

    for line in lines {
        let line = line.as_ref().trim();
        if line.chars().count() < 2 {
            continue;
        }

        if let Some(item) = current.as_mut() {
            apply_parenthetical(item, line);
        }

        if let Some((label, value)) = match_label(line) {
            if let Some(item) = current.as_mut() {
                let value = Some(value.to_string());
                match label {
                    Label::Responsible => item.responsible = value,
                    Label::DueDate => item.due_date = value,
                    Label::Context => item.context = value,
                    Label::Impact => item.impact = value,
                }
            }
            continue;
        }
        if EMPTY_LABEL.is_match(line) {
            continue;
        }

        if let Some(done) = current.take().filter(|item| !item.text.is_empty()) {
            items.push(done);
        }
        current = Some(ParsedItem::new(line));
    }

    if let Some(done) = current.filter(|item| !item.text.is_empty()) {
        items.push(done);
    }

    items
}

fn apply_parenthetical(item: &mut ParsedItem, line: &str) {
    let Some(aside) = PARENTHETICAL.captures(line).and_then(|caps| caps.get(1)) else {
        return;
    };
    let aside = aside.as_str();

    if item.responsible.is_none()
        && let Some(name) = ASIDE_NAME.find(aside)
    {
        item.responsible = Some(name.as_str().trim().to_string());
    }
    if item.due_date.is_none()
        && let Some(date) = ASIDE_DATE.captures(aside).and_then(|caps| caps.get(1))
    {
        item.due_date = Some(date.as_str().trim().to_string());
    }
}

/// Re-derive one item's metadata from inline labels in its own text, then
/// from label lines among the next three lines.
///
/// The item text wins over following lines, and an earlier line wins over a
/// later one.
pub fn extract_metadata_from_context<S: AsRef<str>>(item_text: &str, following: &[S]) -> ItemMetadata {
    let mut metadata = ItemMetadata {
        responsible: INLINE_RESPONSIBLE
            .captures(item_text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string()),
        ..ItemMetadata::default()
    };

    for (label, re) in INLINE_FIELDS.iter() {
        if let Some(value) = re.captures(item_text).and_then(|caps| caps.get(1)) {
            set_if_unset(&mut metadata, *label, value.as_str().trim());
        }
    }

    for line in following.iter().take(FOLLOWING_LINES) {
        if let Some((label, value)) = match_label(line.as_ref().trim()) {
            set_if_unset(&mut metadata, label, value);
        }
    }

    metadata
}

fn set_if_unset(metadata: &mut ItemMetadata, label: Label, value: &str) {
    let slot = match label {
        Label::Responsible => &mut metadata.responsible,
        Label::DueDate => &mut metadata.due_date,
        Label::Context => &mut metadata.context,
        Label::Impact => &mut metadata.impact,
    };
    if slot.is_none() && !value.is_empty() {
        *slot = Some(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_lines_attach_to_item() {
        let items = parse_structured_list(&["Créer la roadmap", "Responsable: Rania", "Échéance: Dans 3 jours"]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "Créer la roadmap");
        assert_eq!(items[0].responsible.as_deref(), Some("Rania"));
        assert_eq!(items[0].due_date.as_deref(), Some("Dans 3 jours"));
        assert_eq!(items[0].context, None);
    }

    #[test]
    fn leading_label_is_dropped() {
        let items = parse_structured_list(&["Responsable: Rania", "Créer la roadmap"]);
        assert_eq!(items, vec![ParsedItem::new("Créer la roadmap")]);
    }

    #[test]
    fn only_labels_yield_nothing() {
        assert!(parse_structured_list(&["Responsable: Rania", "Échéance: lundi"]).is_empty());
    }

    #[test]
    fn arrows_and_feminine_labels() {
        let items = parse_structured_list(&[
            "Mettre à jour la FAQ",
            "→ Assignée : Inès",
            "-> Deadline : 12/05",
            "- Contexte : trop de tickets support",
            "Impact : moins de tickets",
        ]);
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.responsible.as_deref(), Some("Inès"));
        assert_eq!(item.due_date.as_deref(), Some("12/05"));
        assert_eq!(item.context.as_deref(), Some("trop de tickets support"));
        assert_eq!(item.impact.as_deref(), Some("moins de tickets"));
    }

    #[test]
    fn keyword_without_colon_starts_an_item() {
        let items = parse_structured_list(&["Date de la démo à fixer", "Impact sur le budget"]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text, "Date de la démo à fixer");
        assert_eq!(items[0].due_date, None);
    }

    #[test]
    fn segments_consecutive_items() {
        let items = parse_structured_list(&[
            "Préparer la démo",
            "Responsable: Paul",
            "x",
            "",
            "Envoyer le compte rendu",
            "Échéance: vendredi",
        ]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].responsible.as_deref(), Some("Paul"));
        assert_eq!(items[0].due_date, None);
        assert_eq!(items[1].text, "Envoyer le compte rendu");
        assert_eq!(items[1].due_date.as_deref(), Some("vendredi"));
    }

    #[test]
    fn aside_fills_the_open_item() {
        let items = parse_structured_list(&["Préparer la démo", "Envoyer le devis (Rania, pour vendredi)"]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].responsible.as_deref(), Some("Rania"));
        assert_eq!(items[0].due_date.as_deref(), Some("vendredi"));
        assert_eq!(items[1], ParsedItem::new("Envoyer le devis (Rania, pour vendredi)"));
    }

    #[test]
    fn leading_aside_is_dropped() {
        let items = parse_structured_list(&["Stabiliser l'auth (Rania, à partir de mardi prochain)"]);
        assert_eq!(items, vec![ParsedItem::new("Stabiliser l'auth (Rania, à partir de mardi prochain)")]);
    }

    #[test]
    fn aside_does_not_overwrite() {
        let items = parse_structured_list(&[
            "Stabiliser l'auth",
            "Responsable: Sophie",
            "Relire la PR (Rania, à partir de mardi prochain)",
        ]);
        assert_eq!(items[0].responsible.as_deref(), Some("Sophie"));
        assert_eq!(items[0].due_date.as_deref(), Some("mardi prochain"));
    }

    #[test]
    fn explicit_label_overrides_aside() {
        let items = parse_structured_list(&[
            "Stabiliser l'auth",
            "Échéance: lundi (Rania, pour vendredi)",
            "Responsable: Sophie",
            "Responsable: Karim",
        ]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].due_date.as_deref(), Some("lundi (Rania, pour vendredi)"));
        assert_eq!(items[0].responsible.as_deref(), Some("Karim"));
    }

    #[test]
    fn empty_label_is_skipped() {
        let items = parse_structured_list(&["Créer la roadmap", "Responsable:", "-> Échéance :", "Échéance: lundi"]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].responsible, None);
        assert_eq!(items[0].due_date.as_deref(), Some("lundi"));
        assert!(is_label_line("Responsable :"));
    }

    #[test]
    fn label_value_keeps_its_aside() {
        let items = parse_structured_list(&[
            "Stabiliser l'auth",
            "Responsable: Sophie (backup Paul)",
        ]);
        assert_eq!(items[0].responsible.as_deref(), Some("Sophie (backup Paul)"));
    }

    #[test]
    fn metadata_from_item_text() {
        let meta = extract_metadata_from_context::<&str>(
            "Migrer la base, responsable : Karim Benali. Échéance : fin juin. Impact : downtime réduit",
            &[],
        );
        assert_eq!(meta.responsible.as_deref(), Some("Karim Benali"));
        assert_eq!(meta.due_date.as_deref(), Some("fin juin"));
        assert_eq!(meta.impact.as_deref(), Some("downtime réduit"));
        assert_eq!(meta.context, None);
    }

    #[test]
    fn metadata_from_following_lines() {
        let meta = extract_metadata_from_context(
            "Créer la roadmap",
            &[
                "Responsable: Rania",
                "Responsable: Paul",
                "Échéance: Dans 3 jours",
                "Contexte: ignoré car trop loin",
            ],
        );
        assert_eq!(meta.responsible.as_deref(), Some("Rania"));
        assert_eq!(meta.due_date.as_deref(), Some("Dans 3 jours"));
        assert_eq!(meta.context, None);
    }

    #[test]
    fn item_text_wins_over_following_lines() {
        let meta = extract_metadata_from_context(
            "Créer la roadmap (échéance : lundi)",
            &["Échéance: mardi"],
        );
        assert_eq!(meta.due_date.as_deref(), Some("lundi"));
    }
}
