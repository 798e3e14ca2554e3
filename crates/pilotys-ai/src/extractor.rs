//! LLM extraction with a deduplication pass and a heuristic fallback.
//!
//! The chain never fails towards the caller:
//! - no provider configured: the fallback result is returned as is;
//! - extraction fails (transport, status, bad JSON): warn, fallback;
//! - deduplication fails: warn, keep the extraction result.

use pilotys_core::{AnalysisResult, analyze_meeting_text, sanitize};
use tracing::{debug, info, warn};

use crate::config::LlmConfig;
use crate::decode::parse_analysis;
use crate::error::LlmError;
use crate::prompts::{ANALYSIS_SYSTEM_PROMPT, DEDUP_SYSTEM_PROMPT, build_analysis_prompt, build_dedup_prompt};
use crate::provider::{LlmProvider, provider_from_config};

pub struct Extractor {
    provider: Box<dyn LlmProvider>,
}

impl Extractor {
    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(provider_from_config(config, reqwest::Client::new()))
    }

    pub fn from_env() -> Self {
        Self::from_config(&LlmConfig::from_env())
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Analyze already-sanitized text, degrading to `fallback` on failure.
    pub async fn analyze<F>(&self, text: &str, fallback: F) -> AnalysisResult
    where
        F: FnOnce(&str) -> AnalysisResult,
    {
        let provider = self.provider.name();
        if !self.provider.is_configured() {
            debug!("no LLM configured, using heuristic analysis");
            return fallback(text);
        }

        let primary = match self.extract(text).await {
            Ok(result) => result,
            Err(e) => {
                warn!(provider, error = %e, "LLM extraction failed, falling back to heuristic analysis");
                return fallback(text);
            }
        };
        info!(
            provider,
            decisions = primary.decisions.len(),
            actions = primary.actions.len(),
            "LLM extraction complete"
        );

        match self.deduplicate(&primary).await {
            Ok(cleaned) => cleaned,
            Err(e) => {
                warn!(provider, error = %e, "deduplication failed, keeping primary extraction");
                primary
            }
        }
    }

    /// Sanitize raw notes, then analyze them with the heuristic fallback.
    pub async fn analyze_meeting(&self, raw: &str) -> AnalysisResult {
        let text = sanitize(raw);
        self.analyze(&text, analyze_meeting_text).await
    }

    async fn extract(&self, text: &str) -> Result<AnalysisResult, LlmError> {
        let prompt = build_analysis_prompt(text);
        let completion = self.provider.complete(ANALYSIS_SYSTEM_PROMPT, &prompt).await?;
        parse_analysis(&completion)
    }

    async fn deduplicate(&self, extracted: &AnalysisResult) -> Result<AnalysisResult, LlmError> {
        let json = serde_json::to_string_pretty(extracted)?;
        let prompt = build_dedup_prompt(&json);
        let completion = self.provider.complete(DEDUP_SYSTEM_PROMPT, &prompt).await?;
        parse_analysis(&completion)
    }
}

/// Analyze with the provider configured in the environment.
pub async fn analyze_with_llm<F>(text: &str, fallback: F) -> AnalysisResult
where
    F: FnOnce(&str) -> AnalysisResult,
{
    Extractor::from_env().analyze(text, fallback).await
}

/// Sanitize raw notes and analyze them with the environment's provider,
/// falling back to the heuristic analyzer.
pub async fn analyze_meeting(raw: &str) -> AnalysisResult {
    Extractor::from_env().analyze_meeting(raw).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::NullProvider;
    use async_trait::async_trait;
    use pilotys_core::{Action, Decision, NOT_SPECIFIED};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    const EXAMPLE_JSON: &str = r#"{
        "decisions": [{"decision": "Lancer le projet X", "contexte": "Répond à un besoin client urgent", "impact_potentiel": "non précisé"}],
        "actions": [{"action": "Préparer le document de présentation", "responsable": "Jean", "echeance": "vendredi"}],
        "points_a_clarifier": [],
        "points_a_venir": []
    }"#;

    const DUPLICATED_JSON: &str = r#"{
        "decisions": [
            {"decision": "Lancer le projet X", "contexte": "non précisé", "impact_potentiel": "non précisé"},
            {"decision": "Nous lançons le projet X", "contexte": "non précisé", "impact_potentiel": "non précisé"}
        ],
        "actions": [],
        "points_a_clarifier": []
    }"#;

    /// Replays canned replies and records every prompt it receives.
    struct ScriptedProvider {
        replies: Mutex<VecDeque<Option<String>>>,
        prompts: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl ScriptedProvider {
        fn new(replies: &[Option<&str>]) -> (Self, Arc<Mutex<Vec<(String, String)>>>) {
            let prompts = Arc::new(Mutex::new(Vec::new()));
            let provider = Self {
                replies: Mutex::new(replies.iter().map(|r| r.map(String::from)).collect()),
                prompts: Arc::clone(&prompts),
            };
            (provider, prompts)
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
            self.prompts
                .lock()
                .unwrap()
                .push((system.to_string(), prompt.to_string()));
            match self.replies.lock().unwrap().pop_front().flatten() {
                Some(reply) => Ok(reply),
                None => Err(LlmError::Server {
                    provider: "scripted",
                    status: 503,
                    body: "unavailable".into(),
                }),
            }
        }
    }

    fn marker_fallback(text: &str) -> AnalysisResult {
        AnalysisResult {
            points_a_clarifier: vec![format!("fallback: {text}")],
            ..AnalysisResult::default()
        }
    }

    #[tokio::test]
    async fn unconfigured_returns_fallback_exactly() {
        let extractor = Extractor::new(Box::new(NullProvider));
        let text = "Décisions\n- Garder Stripe\nActions\n- Envoyer le devis";
        assert_eq!(
            extractor.analyze(text, analyze_meeting_text).await,
            analyze_meeting_text(text)
        );
    }

    #[tokio::test]
    async fn extraction_then_dedup() {
        let (provider, prompts) = ScriptedProvider::new(&[Some(DUPLICATED_JSON), Some(EXAMPLE_JSON)]);
        let extractor = Extractor::new(Box::new(provider));

        let result = extractor.analyze("notes", marker_fallback).await;
        assert_eq!(result.decisions.len(), 1);
        assert_eq!(result.actions[0].responsable, "Jean");

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0].0, ANALYSIS_SYSTEM_PROMPT);
        assert!(prompts[0].1.ends_with("notes"));
        assert_eq!(prompts[1].0, DEDUP_SYSTEM_PROMPT);
        assert!(prompts[1].1.contains("Nous lançons le projet X"));
    }

    #[tokio::test]
    async fn dedup_failure_keeps_primary() {
        let (provider, _) = ScriptedProvider::new(&[Some(DUPLICATED_JSON), None]);
        let extractor = Extractor::new(Box::new(provider));

        let result = extractor.analyze("notes", marker_fallback).await;
        assert_eq!(result.decisions.len(), 2);
        assert!(result.points_a_clarifier.is_empty());
    }

    #[tokio::test]
    async fn dedup_garbage_keeps_primary() {
        let (provider, _) = ScriptedProvider::new(&[Some(DUPLICATED_JSON), Some("pas de JSON ici")]);
        let extractor = Extractor::new(Box::new(provider));
        assert_eq!(extractor.analyze("notes", marker_fallback).await.decisions.len(), 2);
    }

    #[tokio::test]
    async fn primary_failure_uses_fallback() {
        let (provider, prompts) = ScriptedProvider::new(&[None]);
        let extractor = Extractor::new(Box::new(provider));

        let result = extractor.analyze("notes", marker_fallback).await;
        assert_eq!(result, marker_fallback("notes"));
        assert_eq!(prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_primary_uses_fallback() {
        let (provider, _) = ScriptedProvider::new(&[Some(r#"{"decisions": 3}"#)]);
        let extractor = Extractor::new(Box::new(provider));
        assert_eq!(
            extractor.analyze("notes", marker_fallback).await,
            marker_fallback("notes")
        );
    }

    #[tokio::test]
    async fn end_to_end_with_stubbed_llm() {
        let (provider, prompts) = ScriptedProvider::new(&[Some(EXAMPLE_JSON), Some(EXAMPLE_JSON)]);
        let extractor = Extractor::new(Box::new(provider));

        let raw = "<p>Nous avons décidé de lancer le projet X car il répond à un besoin client urgent. \
                   Jean va préparer le document de présentation pour vendredi.</p>";
        let result = extractor.analyze_meeting(raw).await;

        assert_eq!(
            result.decisions,
            vec![Decision {
                decision: "Lancer le projet X".into(),
                contexte: "Répond à un besoin client urgent".into(),
                impact_potentiel: NOT_SPECIFIED.into(),
            }]
        );
        assert_eq!(
            result.actions,
            vec![Action {
                action: "Préparer le document de présentation".into(),
                responsable: "Jean".into(),
                echeance: "vendredi".into(),
            }]
        );

        let prompts = prompts.lock().unwrap();
        assert!(prompts[0].1.ends_with(
            "Nous avons décidé de lancer le projet X car il répond à un besoin client urgent. \
             Jean va préparer le document de présentation pour vendredi."
        ));
    }
}
