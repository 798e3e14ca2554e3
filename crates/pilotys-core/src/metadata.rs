//! Free-text metadata heuristics.
//!
//! Each extractor looks for one field in a single item's text and returns
//! `None` when nothing convincing is found. Callers decide on the
//! placeholder.

use once_cell::sync::Lazy;
use regex::Regex;

const NAME: &str = r"\p{Lu}\p{Ll}+(?:\s+\p{Lu}\p{Ll}+)?";
const WEEKDAY: &str = r"(?:lundi|mardi|mercredi|jeudi|vendredi|samedi|dimanche)";
const MONTH: &str =
    r"(?:janvier|février|mars|avril|mai|juin|juillet|août|septembre|octobre|novembre|décembre)";
const NUMERIC_DATE: &str = r"\d{1,2}[/\-.]\d{1,2}";

/// Capitalized words that look like names but never designate an owner.
const NOT_A_NAME: &[&str] = &[
    "il", "elle", "on", "nous", "vous", "ils", "elles", "je", "tu", "ce", "cela", "ça", "qui",
    "le", "la", "les", "un", "une", "tout", "chacun", "personne",
];

static RESPONSIBLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        format!(r"(?:^|\s)({NAME})\s+(?:va|vont|fera|feront|doit|doivent)\s+"),
        format!(r"\bpar\s+({NAME})"),
        format!(r"(?i:responsable|assignée?|chargée?|déléguée?)(?:\s+à)?\s*:\s*({NAME})"),
        format!(r"({NAME})\s*[(\-]\s*(?i:responsable|assignée?|chargée?)"),
        r"(?i:\bl['’]|\ble\s+|\bla\s+|\bles\s+)((?i:équipe|service|département|groupe)\s+\p{Lu}\p{L}+)"
            .to_string(),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static DUE_DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        format!(r"\b(?:le|pour|avant|au|à)\s+(?P<due>{NUMERIC_DATE}(?:[/\-.]\d{{2,4}})?)"),
        format!(r"\b(?:le|pour|avant|au|à)\s+(?P<due>{WEEKDAY}(?:\s+prochain)?)"),
        r"\b(?P<due>(?:cette|la)\s+semaine(?:\s+prochaine)?)".to_string(),
        r"\b(?P<due>dans\s+\d+\s+(?:jours?|semaines?|mois))".to_string(),
        format!(
            r"\b(?P<due>(?:avant|pour)\s+(?:la\s+)?fin\s+(?:du\s+|de\s+l['’])?(?:mois|semaine|année|{MONTH}))"
        ),
        r"\b(?P<due>(?:avant|pour)\s+(?:le\s+|la\s+)?(?:lancement|réunion|meeting|validation|approbation))"
            .to_string(),
        format!(r"\b(?P<due>d['’]ici\s+{NUMERIC_DATE})"),
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){p}")).expect("valid regex"))
    .collect()
});

static CONTEXT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(?:car|parce\s+que|puisque|étant\s+donné\s+que|du\s+fait\s+que)\s+(.+?)(?:[.\n]|$)",
        r"(?i)\b(?:(?:pour|afin\s+de|dans\s+le\s+but\s+de)\s+|afin\s+d['’])(.+?)(?:[.\n]|$)",
        r"(?i)\b(?:contexte|situation|problème|besoin)\s*:\s*(.+?)(?:[.\n]|$)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static IMPACT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(?:impact|conséquence|effet|bénéfice|risque|avantage)s?\s*:\s*(.+?)(?:[.\n]|$)",
        r"(?i)\b(?:permettra|va\s+permettre)\s+(?:de\s+|d['’])?(.+?)(?:[.\n]|$)",
        r"(?i)\b((?:augmentation|réduction|amélioration|diminution)\s+(?:des|du|de|d['’])\s*.+?)(?:[.\n]|$)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Find who owns an action: "Jean va préparer…", "… par Jean",
/// "Responsable : Jean", "Jean (responsable)", "l'équipe Marketing".
pub fn extract_responsible(text: &str) -> Option<String> {
    RESPONSIBLE_PATTERNS.iter().find_map(|pattern| {
        pattern.captures_iter(text).find_map(|caps| {
            let candidate = caps.get(1)?.as_str().trim();
            if candidate.chars().count() <= 2 || is_pronoun(candidate) {
                return None;
            }
            Some(capitalize_words(candidate))
        })
    })
}

/// Find a deadline: "le 20/03", "pour vendredi prochain", "cette semaine",
/// "dans 3 jours", "avant la fin du mois", "d'ici 15/04".
pub fn extract_due_date(text: &str) -> Option<String> {
    DUE_DATE_PATTERNS.iter().find_map(|pattern| {
        let due = pattern.captures(text)?.name("due")?.as_str().trim();
        (due.chars().count() > 2).then(|| due.to_lowercase())
    })
}

/// Find why a decision was taken ("car …", "afin de …", "contexte : …").
pub fn extract_context(text: &str) -> Option<String> {
    first_capture_within(&CONTEXT_PATTERNS, text, 10, 200)
}

/// Find the expected effect of a decision ("impact : …", "permettra de …").
pub fn extract_impact(text: &str) -> Option<String> {
    first_capture_within(&IMPACT_PATTERNS, text, 5, 200)
}

fn first_capture_within(patterns: &[Regex], text: &str, min: usize, max: usize) -> Option<String> {
    patterns.iter().find_map(|pattern| {
        let value = pattern.captures(text)?.get(1)?.as_str().trim();
        let len = value.chars().count();
        (len > min && len < max).then(|| value.to_string())
    })
}

fn is_pronoun(candidate: &str) -> bool {
    candidate
        .split_whitespace()
        .any(|word| NOT_A_NAME.contains(&word.to_lowercase().as_str()))
}

fn capitalize_words(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
