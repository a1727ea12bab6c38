//! ClassPilot Chat — retrieval-augmented chat over a managed knowledge base.
//!
//! The orchestrator sequences per-document analysis, retrieval, and citation
//! synthesis into one merged report. LLM and retrieval calls go to Bedrock's
//! HTTP APIs behind trait seams so tests can script them.

pub mod citations;
pub mod client;
pub mod filters;
pub mod lesson_plans;
pub mod orchestrator;
pub mod prompts;
pub mod session;
pub mod types;

pub use citations::{CitationExtractor, KeywordRule};
pub use client::{BedrockClient, LlmClient, RetrievalClient};
pub use filters::FilterContext;
pub use lesson_plans::sample_lesson_plan;
pub use orchestrator::{NullSink, Orchestrator, OrchestrationReport, ProgressSink, RecordingSink};
pub use session::Session;
pub use types::*;
