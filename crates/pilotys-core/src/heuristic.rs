//! Deterministic analysis used when no LLM is configured or the LLM fails.

use std::collections::HashSet;

use tracing::debug;

use crate::action::normalize_action_text;
use crate::classify::{MAX_ACTIONS, MAX_CLARIFY, MAX_DECISIONS, MAX_NEXT, classify_unstructured};
use crate::metadata::{extract_context, extract_due_date, extract_impact, extract_responsible};
use crate::model::{Action, AnalysisResult, Decision, NOT_SPECIFIED, ParsedItem};
use crate::parser::{extract_metadata_from_context, parse_structured_list};
use crate::sanitize::sanitize;
use crate::sections::section_blocks;
use crate::split::split_long_sentences;

const MIN_DECISION_LEN: usize = 5;
const MIN_ITEM_LEN: usize = 3;

/// Analyze meeting notes without any remote call.
///
/// Notes with section headers go through the structured-list parser;
/// anything else is handed to the line classifier. Never fails: the worst
/// case is an empty [`AnalysisResult`].
pub fn analyze_meeting_text(text: &str) -> AnalysisResult {
    let clean = sanitize(text);
    let blocks = section_blocks(&clean);
    if !blocks.found {
        return classify_unstructured(&clean);
    }

    let decisions = parse_structured_list(&blocks.decisions)
        .into_iter()
        .map(to_decision)
        .filter(|d| d.decision.chars().count() >= MIN_DECISION_LEN);
    let decisions = dedup_by(decisions, |d| &d.decision, MAX_DECISIONS);

    let actions = parse_structured_list(&blocks.actions)
        .into_iter()
        .map(to_action)
        .filter(|a| a.action.chars().count() >= MIN_ITEM_LEN);
    let actions = dedup_by(actions, |a| &a.action, MAX_ACTIONS);

    let questions = blocks.points.iter().filter(|p| p.trim_end().ends_with('?')).cloned();
    let clarify = split_long_sentences(&blocks.clarify).into_iter().chain(questions);
    let points_a_clarifier = dedup_by(clarify, |s| s, MAX_CLARIFY);

    let points_a_venir = dedup_by(split_long_sentences(&blocks.next), |s| s, MAX_NEXT);

    debug!(
        decisions = decisions.len(),
        actions = actions.len(),
        clarify = points_a_clarifier.len(),
        next = points_a_venir.len(),
        "heuristic analysis done"
    );

    AnalysisResult {
        decisions,
        actions,
        points_a_clarifier,
        points_a_venir,
    }
}

fn to_decision(item: ParsedItem) -> Decision {
    let inline = extract_metadata_from_context::<&str>(&item.text, &[]);
    Decision {
        contexte: item
            .context
            .or(inline.context)
            .or_else(|| extract_context(&item.text))
            .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        impact_potentiel: item
            .impact
            .or(inline.impact)
            .or_else(|| extract_impact(&item.text))
            .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        decision: item.text,
    }
}

fn to_action(item: ParsedItem) -> Action {
    let inline = extract_metadata_from_context::<&str>(&item.text, &[]);
    Action {
        action: normalize_action_text(&item.text),
        responsable: item
            .responsible
            .or(inline.responsible)
            .or_else(|| extract_responsible(&item.text))
            .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        echeance: item
            .due_date
            .or(inline.due_date)
            .or_else(|| extract_due_date(&item.text))
            .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
    }
}

/// Keep the first occurrence of each case-insensitive key, up to `cap` items.
fn dedup_by<T, F>(items: impl IntoIterator<Item = T>, key: F, cap: usize) -> Vec<T>
where
    F: Fn(&T) -> &String,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item).trim().to_lowercase()))
        .take(cap)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTES: &str = "<h2>Points abordés</h2>\
        <ul><li>Bilan du sprint</li><li>Qui présente la démo ?</li></ul>\
        <h2>Décisions</h2>\
        <ul><li>On garde l'API actuelle</li><li>Contexte : trop de clients branchés</li>\
        <li>on garde l'API actuelle</li></ul>\
        <h2>Actions</h2>\
        <ul><li>Les bugs critiques doivent être corrigés</li><li>Responsable : Rania</li>\
        <li>Échéance : vendredi</li><li>Jean va préparer la démo pour lundi</li></ul>\
        <h2>À venir</h2><p>Budget Q3</p>\
        <h2>Questions</h2><p>Hébergement en Europe ?</p>";

    #[test]
    fn structured_minutes() {
        let result = analyze_meeting_text(MINUTES);

        assert_eq!(
            result.decisions,
            vec![Decision {
                decision: "On garde l'API actuelle".into(),
                contexte: "trop de clients branchés".into(),
                impact_potentiel: NOT_SPECIFIED.into(),
            }]
        );
        assert_eq!(
            result.actions,
            vec![
                Action {
                    action: "Corriger les bugs critiques".into(),
                    responsable: "Rania".into(),
                    echeance: "vendredi".into(),
                },
                Action {
                    action: "Jean va préparer la démo pour lundi".into(),
                    responsable: "Jean".into(),
                    echeance: "lundi".into(),
                },
            ]
        );
        assert_eq!(result.points_a_venir, vec!["Budget Q3"]);
        assert_eq!(
            result.points_a_clarifier,
            vec!["Hébergement en Europe ?", "Qui présente la démo ?"]
        );
    }

    #[test]
    fn unstructured_notes_are_classified() {
        let result = analyze_meeting_text(
            "<p>Nous avons décidé de lancer le projet X car il répond à un besoin client urgent. \
             Jean va préparer le document de présentation pour vendredi.</p>",
        );
        assert_eq!(result.decisions.len(), 1);
        assert_eq!(result.actions.len(), 1);
        assert_eq!(result.actions[0].responsable, "Jean");
        assert_eq!(result.actions[0].echeance, "vendredi");
    }

    #[test]
    fn missing_metadata_is_not_specified() {
        let result = analyze_meeting_text("Actions\n- Envoyer le devis");
        assert_eq!(result.actions[0].responsable, NOT_SPECIFIED);
        assert_eq!(result.actions[0].echeance, NOT_SPECIFIED);
    }

    #[test]
    fn short_decisions_are_dropped() {
        let result = analyze_meeting_text("Décisions\n- Oui\n- Garder Stripe");
        assert_eq!(result.decisions.len(), 1);
        assert_eq!(result.decisions[0].decision, "Garder Stripe");
    }

    #[test]
    fn deterministic_and_total() {
        assert_eq!(analyze_meeting_text(MINUTES), analyze_meeting_text(MINUTES));
        assert!(analyze_meeting_text("").is_empty());
        assert!(analyze_meeting_text("<p></p>&nbsp;").is_empty());
    }
}
