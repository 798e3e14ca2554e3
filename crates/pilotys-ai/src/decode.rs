//! Turning raw completions into an [`AnalysisResult`].

use once_cell::sync::Lazy;
use pilotys_core::AnalysisResult;
use regex::Regex;
use tracing::debug;

use crate::error::LlmError;

static THINK_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<think(?:ing)?>.*?</think(?:ing)?>").expect("valid regex"));
static TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",(\s*[}\]])").expect("valid regex"));

/// Decode a completion, tolerating reasoning blocks, code fences and prose
/// around the JSON object. One repair pass is attempted on failure.
pub fn parse_analysis(completion: &str) -> Result<AnalysisResult, LlmError> {
    let json = extract_json_object(completion).ok_or(LlmError::NoJson)?;
    serde_json::from_str(json).or_else(|err| {
        debug!(error = %err, "completion is not valid JSON, retrying after repair");
        serde_json::from_str(&repair_json(json)).map_err(|_| LlmError::Json(err))
    })
}

/// Slice from the first `{` to the last `}` once reasoning blocks and
/// fences are gone.
fn extract_json_object(completion: &str) -> Option<&str> {
    let without_thinking = match THINK_BLOCK.find_iter(completion).last() {
        Some(block) => &completion[block.end()..],
        None => completion,
    };
    let text = strip_code_fence(without_thinking.trim());

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json", "JSON", ...) on the opening fence line.
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn repair_json(json: &str) -> String {
    let normalized: String = json
        .chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{00AB}' | '\u{00BB}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect();
    TRAILING_COMMA.replace_all(&normalized, "$1").into_owned()
}
