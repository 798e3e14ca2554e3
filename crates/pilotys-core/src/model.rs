//! Transient types flowing through one meeting analysis.
//!
//! Nothing here has a database identity: the caller owns persistence and
//! receives an [`AnalysisResult`] whose field names are a fixed contract.

use serde::{Deserialize, Serialize};

/// Placeholder for metadata that could not be found.
pub const NOT_SPECIFIED: &str = "non précisé";

fn not_specified() -> String {
    NOT_SPECIFIED.to_string()
}

/// A decision taken during the meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub decision: String,
    #[serde(default = "not_specified")]
    pub contexte: String,
    #[serde(default = "not_specified")]
    pub impact_potentiel: String,
}

/// A task to carry out after the meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub action: String,
    #[serde(default = "not_specified")]
    pub responsable: String,
    #[serde(default = "not_specified")]
    pub echeance: String,
}

/// Structured extraction handed back to the caller.
///
/// Always present, even when every list is empty. `points_a_venir` is
/// optional on input so older LLM answers without it still decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub decisions: Vec<Decision>,
    pub actions: Vec<Action>,
    pub points_a_clarifier: Vec<String>,
    #[serde(default)]
    pub points_a_venir: Vec<String>,
}

impl AnalysisResult {
    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
            && self.actions.is_empty()
            && self.points_a_clarifier.is_empty()
            && self.points_a_venir.is_empty()
    }
}

/// A candidate decision or action found by the structured-list parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedItem {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
}

impl ParsedItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Metadata re-derived for one item from its own text and the lines after it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemMetadata {
    pub responsible: Option<String>,
    pub due_date: Option<String>,
    pub context: Option<String>,
    pub impact: Option<String>,
}
