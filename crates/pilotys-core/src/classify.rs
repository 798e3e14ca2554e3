//! Line classifier for notes written without section headers.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::action::normalize_action_text;
use crate::metadata::{extract_context, extract_due_date, extract_impact, extract_responsible};
use crate::model::{Action, AnalysisResult, Decision, NOT_SPECIFIED};
use crate::parser::{extract_metadata_from_context, is_label_line};
use crate::sections::{clean_list_line, is_section_title};

pub(crate) const MAX_DECISIONS: usize = 20;
pub(crate) const MAX_ACTIONS: usize = 30;
pub(crate) const MAX_CLARIFY: usize = 15;
pub(crate) const MAX_NEXT: usize = 15;

const MIN_LIST_ITEM_LEN: usize = 5;
const MIN_SENTENCE_LEN: usize = 10;
/// Below this many list items, long text is also read sentence by sentence.
const FEW_ITEMS: usize = 3;
const LONG_TEXT_LEN: usize = 50;
const FOLLOWING_LINES: usize = 3;

const ACTION_VERBS: &str = "préparer|envoyer|contacter|réviser|créer|mettre|organiser|planifier|développer|implémenter|finaliser|compléter|valider|vérifier|analyser|présenter|partager|distribuer|soumettre|transmettre|communiquer|informer|consulter|examiner|étudier|évaluer|tester|déployer|lancer|démarrer|initier|terminer|améliorer|optimiser|stabiliser|investiguer|rédiger|surveiller|faire|proposer|relancer";
const NAME: &str = r"\p{Lu}\p{Ll}+(?:\s+\p{Lu}\p{Ll}+)?";

static DECISION_CUES: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\b(?:décidée?s?|décisions?)\b",
        r"(?i)\b(?:convenue?s?|il\s+a\s+été\s+convenu)\b",
        r"(?i)\b(?:validée?s?|validation|approuvée?s?|approbation)\b",
        r"(?i)\bactée?s?\b",
        r"(?i)\bon\s+(?:garde|gardent|conserve|conservent)\b",
        r"(?i)\bon\s+ne\s+(?:montre|présente|fait)\s+pas\b",
        r"(?i)\btout\s+le\s+monde\s+acquiesce\b",
        r"(?i)\bon\s+(?:considère|note)\s+que\b",
        r"(?i)\bla\s+priorité\s+est\s+donnée\s+à\b",
        r"(?i)\bchoix\s+(?:fait|effectué|réalisé)\b",
        r"(?i)\b(?:sera\s+conservée?|seront\s+conservée?s)\b",
        r"(?i)\bne\s+sera\s+pas\s+(?:présentée?|montrée?)\b",
    ])
});

static ACTION_CUES: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\b(?:va|vont|fera|feront)\s+(?:faire|préparer|envoyer|créer|réviser|organiser)\b",
        r"(?i)\b(?:doit|doivent|devrait|devraient)\s+",
        r"(?i)\b(?:s['’]occupe(?:nt)?|interviendra|interviendront)\s+(?:de|sur)\b",
        r"(?i)\bà\s+faire\b|\baction\s*:",
        r"(?i)\b(?:il\s+faudrait|quelqu['’]un\s+doit)\b",
        format!(r"(?i)^(?:{ACTION_VERBS})\b").as_str(),
        format!(r"^{NAME}\s+(?i:lundi|mardi|mercredi|jeudi|vendredi|samedi|dimanche|\d{{1,2}})\s+(?i:sur|pour|avec)\b").as_str(),
        format!(r"^{NAME}\s*[:\-–]\s+\S").as_str(),
    ])
});

static CLARIFY_CUES: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\b(?:à\s+définir|à\s+clarifier|à\s+confirmer|en\s+attente)\b",
        r"(?i)\bquestion\s*:|\?\s*$",
        r"(?i)\bpas\s+sûrs?\b|\bon\s+ne\s+sait\s+pas\b",
        r"(?i)\b(?:à\s+venir|prochaines?\s+étapes?)\b",
        r"(?i)\b(?:sujet\s+reporté|pour\s+la\s+suite)\b",
    ])
});

static NEXT_CUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:à\s+venir|prochaines?|sujet\s+reporté|pour\s+la\s+suite)\b").expect("valid regex")
});
static STARTS_WITH_VERB: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)^(?:{ACTION_VERBS})\b")).expect("valid regex"));
static SENTENCE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.\n]+").expect("valid regex"));

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
}

fn looks_like_decision(text: &str) -> bool {
    text.chars().count() >= 8 && DECISION_CUES.iter().any(|re| re.is_match(text))
}

fn looks_like_action(text: &str) -> bool {
    text.chars().count() >= 5 && ACTION_CUES.iter().any(|re| re.is_match(text))
}

fn looks_like_clarify_or_next(text: &str) -> bool {
    text.chars().count() >= 6 && CLARIFY_CUES.iter().any(|re| re.is_match(text))
}

/// A candidate sentence and the index of the line it came from.
struct Candidate {
    text: String,
    line: usize,
}

/// Classify free-form notes into decisions, actions and open points.
///
/// Each candidate line is tried as a decision, then an action, then a point
/// to clarify or to come. Lines matching none of the cues are kept only
/// when they start with an infinitive verb, as actions.
pub fn classify_unstructured(text: &str) -> AnalysisResult {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let candidates = candidates(&lines, text.chars().count());

    let mut result = AnalysisResult::default();
    let mut seen = HashSet::new();

    for candidate in candidates {
        let cleaned = clean_list_line(&candidate.text);
        if cleaned.chars().count() < 6 || is_label_line(&cleaned) {
            continue;
        }
        if !seen.insert(cleaned.to_lowercase()) {
            continue;
        }

        let following = &lines[(candidate.line + 1).min(lines.len())..];
        let following = &following[..following.len().min(FOLLOWING_LINES)];

        if looks_like_decision(&cleaned) {
            let meta = extract_metadata_from_context(&cleaned, following);
            result.decisions.push(Decision {
                contexte: meta
                    .context
                    .or_else(|| extract_context(&cleaned))
                    .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
                impact_potentiel: meta
                    .impact
                    .or_else(|| extract_impact(&cleaned))
                    .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
                decision: cleaned,
            });
        } else if looks_like_action(&cleaned) || STARTS_WITH_VERB.is_match(&cleaned) {
            result.actions.push(build_action(&cleaned, following));
        } else if looks_like_clarify_or_next(&cleaned) {
            if NEXT_CUE.is_match(&cleaned) {
                result.points_a_venir.push(cleaned);
            } else {
                result.points_a_clarifier.push(cleaned);
            }
        }
    }

    result.decisions.truncate(MAX_DECISIONS);
    result.actions.truncate(MAX_ACTIONS);
    result.points_a_clarifier.truncate(MAX_CLARIFY);
    result.points_a_venir.truncate(MAX_NEXT);
    result
}

fn build_action(text: &str, following: &[&str]) -> Action {
    let meta = extract_metadata_from_context(text, following);
    Action {
        action: normalize_action_text(text),
        responsable: meta
            .responsible
            .or_else(|| extract_responsible(text))
            .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        echeance: meta
            .due_date
            .or_else(|| extract_due_date(text))
            .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
    }
}

/// List items of the notes; when there are few of them and the text is long
/// enough, items holding several sentences are read sentence by sentence.
fn candidates(lines: &[&str], text_len: usize) -> Vec<Candidate> {
    let items: Vec<(usize, String)> = lines
        .iter()
        .enumerate()
        .map(|(idx, line)| (idx, clean_list_line(line)))
        .filter(|(_, item)| {
            item.chars().count() >= MIN_LIST_ITEM_LEN && !is_label_line(item) && !is_section_title(item)
        })
        .collect();

    let by_sentence = items.len() < FEW_ITEMS && text_len > LONG_TEXT_LEN;

    let mut candidates = Vec::new();
    for (line, item) in items {
        let sentences: Vec<&str> = SENTENCE_BREAK
            .split(&item)
            .map(str::trim)
            .filter(|s| s.chars().count() >= MIN_SENTENCE_LEN)
            .collect();

        if by_sentence && sentences.len() > 1 {
            candidates.extend(sentences.into_iter().map(|s| Candidate {
                text: s.to_string(),
                line,
            }));
        } else {
            candidates.push(Candidate { text: item, line });
        }
    }
    candidates
}
