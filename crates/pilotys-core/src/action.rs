//! Rewriting of action items into imperative-infinitive form.
//!
//! "Les bugs critiques doivent être corrigés" → "Corriger les bugs critiques",
//! "Il faut créer un module" → "Créer un module". When the form is not
//! recognised the text is only tidied and capitalized; no verb is invented.

use once_cell::sync::Lazy;
use regex::Regex;

static PASSIVE_OBLIGATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:doit|doivent)\s+être\s+(\p{L}+)(?:[\s.,]|$)").expect("valid regex")
});
static SUBJECT_MUST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:les?|la|des?|un|une|nous|on|il|elle|ils|elles)\s+(.+?)\s+(?:doit|doivent)\s+(\p{L}+(?:er|ir|re|oir))(?:\s+(.+))?$",
    )
    .expect("valid regex")
});
static IMPERSONAL_PREFIXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^il\s+faut\s+(.+)$",
        r"(?i)^(?:nous|on)\s+(?:devons|doit|devrait|devrions)\s+(.+)$",
        r"(?i)^il\s+est\s+nécessaire\s+(?:de\s+|d')(.+)$",
        r"(?i)^il\s+convient\s+(?:de\s+|d')(.+)$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Normalize an action sentence into "Verbe complément" form.
pub fn normalize_action_text(text: &str) -> String {
    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.chars().count() < 3 {
        return cleaned;
    }

    if let Some(caps) = PASSIVE_OBLIGATION.captures(&cleaned)
        && let Some(whole) = caps.get(0)
        && whole.start() > 0
        && let Some(infinitive) = past_participle_to_infinitive(&caps[1])
    {
        let subject = cleaned[..whole.start()].trim().to_lowercase();
        if !subject.is_empty() {
            return format!("{} {}", capitalize_first(&infinitive), subject);
        }
    }

    if let Some(caps) = SUBJECT_MUST.captures(&cleaned) {
        let verb = caps[2].to_lowercase();
        if verb != "être" {
            let complement = caps
                .get(3)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_else(|| caps[1].trim().to_string());
            return format!("{} {}", capitalize_first(&verb), complement);
        }
    }

    for pattern in IMPERSONAL_PREFIXES.iter() {
        if let Some(caps) = pattern.captures(&cleaned) {
            return capitalize_first(caps[1].trim());
        }
    }

    capitalize_first(&cleaned)
}

fn past_participle_to_infinitive(participle: &str) -> Option<String> {
    let lower = participle.to_lowercase();
    const RULES: &[(&str, &str)] = &[
        ("ées", "er"),
        ("és", "er"),
        ("ée", "er"),
        ("é", "er"),
        ("ies", "ir"),
        ("is", "ir"),
        ("ie", "ir"),
        ("i", "ir"),
    ];
    RULES.iter().find_map(|(suffix, ending)| {
        lower
            .strip_suffix(suffix)
            .filter(|stem| !stem.is_empty())
            .map(|stem| format!("{stem}{ending}"))
    })
}

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
