use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{provider} returned {status}: {body}")]
    Server {
        provider: &'static str,
        status: u16,
        body: String,
    },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} returned an empty completion")]
    EmptyResponse(&'static str),
    #[error("no JSON object found in completion")]
    NoJson,
    #[error("no LLM provider configured")]
    NotConfigured,
}
