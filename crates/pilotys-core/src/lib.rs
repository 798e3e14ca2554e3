//! Meeting-notes text pipeline: sanitizing, section detection, list parsing
//! and the heuristic analyzer used as the LLM fallback.

pub mod action;
pub mod classify;
pub mod heuristic;
pub mod metadata;
pub mod model;
pub mod parser;
pub mod sanitize;
pub mod sections;
pub mod split;

pub use action::normalize_action_text;
pub use classify::classify_unstructured;
pub use heuristic::analyze_meeting_text;
pub use model::{Action, AnalysisResult, Decision, ItemMetadata, NOT_SPECIFIED, ParsedItem};
pub use parser::{extract_metadata_from_context, parse_structured_list};
pub use sanitize::sanitize;
pub use sections::{SectionBlocks, Sections, extract_sections, section_blocks};
pub use split::split_long_sentences;
