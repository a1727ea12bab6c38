//! Report orchestration: per-document analysis, retrieval, citation synthesis,
//! and the merged four-section report.
//!
//! Stages run strictly sequentially. Every external call is isolated: a failed
//! call degrades that stage's contribution to an inline error string and the
//! interaction always completes with a report.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::citations::CitationExtractor;
use crate::client::{LlmClient, RetrievalClient};
use crate::filters::FilterContext;
use crate::prompts;
use crate::types::{Citation, Message, StageEvent, StageKind, UploadedDocument};

/// Token budget for each per-document analysis call.
pub const ANALYSIS_MAX_TOKENS: u32 = 1500;
/// Token budget for the synthesis call over retrieved passages.
pub const SYNTHESIS_MAX_TOKENS: u32 = 1500;
/// Token budget for the single-call chat path.
pub const QUICK_CHAT_MAX_TOKENS: u32 = 1000;
/// Fixed passage count requested from the knowledge base.
pub const RETRIEVAL_TOP_K: usize = 5;

/// Knowledge-base section content when retrieval returns no passages.
pub const NO_MATCHES_MESSAGE: &str =
    "No matching passages were found in the knowledge base for this question.";

const NO_DOCUMENTS_PLACEHOLDER: &str = "_No state documents were uploaded for analysis._";
const NO_KNOWLEDGE_PLACEHOLDER: &str = "_No knowledge base analysis is available._";

/// Observer invoked at each stage boundary. Decouples orchestration from any
/// rendering surface.
pub trait ProgressSink: Send + Sync {
    fn stage(&self, event: StageEvent);
}

/// Discards all progress events.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn stage(&self, _event: StageEvent) {}
}

/// Collects progress events for later inspection.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<StageEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<StageEvent> {
        self.events.lock().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn stage(&self, event: StageEvent) {
        self.events.lock().push(event);
    }
}

/// The merged result of one orchestration run.
#[derive(Debug, Clone)]
pub struct OrchestrationReport {
    pub report: String,
    pub citations: Vec<Citation>,
    pub stages: Vec<StageEvent>,
    pub document_count: usize,
}

/// Sequences document analysis, retrieval, and citation synthesis into one
/// report. Calls are issued one after another; nothing runs concurrently.
pub struct Orchestrator {
    llm: Arc<dyn LlmClient>,
    retrieval: Arc<dyn RetrievalClient>,
    citations: CitationExtractor,
}

impl Orchestrator {
    pub fn new(llm: Arc<dyn LlmClient>, retrieval: Arc<dyn RetrievalClient>) -> Self {
        Self {
            llm,
            retrieval,
            citations: CitationExtractor::default(),
        }
    }

    pub fn with_citation_extractor(mut self, citations: CitationExtractor) -> Self {
        self.citations = citations;
        self
    }

    /// Run the full pipeline for one user question. Never fails: service
    /// errors become inline error strings in the affected section.
    pub async fn run(
        &self,
        question: &str,
        filters: &FilterContext,
        documents: &[UploadedDocument],
        progress: &dyn ProgressSink,
    ) -> OrchestrationReport {
        let mut stages: Vec<StageEvent> = Vec::new();
        let mut emit = |name: &str, status: String, kind: StageKind| {
            let event = StageEvent::new(name, status, kind);
            progress.stage(event.clone());
            stages.push(event);
        };

        // Stage 1: independent analysis of each uploaded document.
        let mut analysis_blocks: Vec<String> = Vec::new();
        for doc in documents {
            emit(
                "Document Analysis",
                format!("Analyzing {}", doc.name),
                StageKind::Info,
            );
            let prompt = prompts::document_analysis_prompt(&doc.name, &doc.content, question);
            match self
                .llm
                .converse(&[Message::user(prompt)], None, ANALYSIS_MAX_TOKENS)
                .await
            {
                Ok(text) => {
                    analysis_blocks.push(format!("### {}\n\n{}", doc.name, text));
                    emit(
                        "Document Analysis",
                        format!("Analyzed {}", doc.name),
                        StageKind::Success,
                    );
                }
                Err(e) => {
                    warn!("Analysis of {} failed: {}", doc.name, e);
                    analysis_blocks
                        .push(format!("### {}\n\n_Analysis failed: {}_", doc.name, e));
                    emit(
                        "Document Analysis",
                        format!("Analysis of {} failed: {}", doc.name, e),
                        StageKind::Error,
                    );
                }
            }
        }
        let state_analysis = analysis_blocks.join("\n\n");

        // Stage 2: retrieval with the raw question. Facets are prompt context
        // only, never structured retrieval constraints.
        emit(
            "Knowledge Base Retrieval",
            format!("Searching for {} passages", RETRIEVAL_TOP_K),
            StageKind::Info,
        );
        let mut citations: Vec<Citation> = Vec::new();
        let knowledge = match self.retrieval.retrieve(question, RETRIEVAL_TOP_K).await {
            Err(e) => {
                warn!("Retrieval failed: {}", e);
                emit(
                    "Knowledge Base Retrieval",
                    format!("Retrieval failed: {}", e),
                    StageKind::Error,
                );
                format!("_Knowledge base retrieval failed: {}_", e)
            }
            Ok(passages) if passages.is_empty() => {
                emit(
                    "Knowledge Base Retrieval",
                    "No matching passages found".into(),
                    StageKind::Info,
                );
                NO_MATCHES_MESSAGE.to_string()
            }
            Ok(passages) => {
                emit(
                    "Knowledge Base Retrieval",
                    format!("Retrieved {} passages", passages.len()),
                    StageKind::Success,
                );

                // Stage 3: citation extraction plus one synthesis call.
                citations = self.citations.extract(&passages);
                emit(
                    "Synthesis",
                    format!("Synthesizing answer from {} passages", passages.len()),
                    StageKind::Info,
                );
                let prompt =
                    prompts::synthesis_prompt(question, &filters.context_lines(), &passages);
                match self
                    .llm
                    .converse(&[Message::user(prompt)], None, SYNTHESIS_MAX_TOKENS)
                    .await
                {
                    Ok(text) => {
                        emit("Synthesis", "Synthesis complete".into(), StageKind::Success);
                        text
                    }
                    Err(e) => {
                        warn!("Synthesis failed: {}", e);
                        emit(
                            "Synthesis",
                            format!("Synthesis failed: {}", e),
                            StageKind::Error,
                        );
                        format!("_Knowledge base synthesis failed: {}_", e)
                    }
                }
            }
        };

        // Stage 4: merge.
        let report = merge_report(question, &state_analysis, &knowledge, &citations);
        emit("Report", "Report assembled".into(), StageKind::Success);
        debug!(
            "Pipeline complete: {} documents, {} citations",
            documents.len(),
            citations.len()
        );

        OrchestrationReport {
            report,
            citations,
            stages,
            document_count: documents.len(),
        }
    }

    /// Degenerate single-call path: no document analysis, no retrieval — one
    /// converse over the literal history with the facet context as the system
    /// sentence. A service failure becomes the returned message.
    pub async fn quick_chat(&self, history: &[Message], filters: &FilterContext) -> String {
        let system = prompts::assistant_system_message(&filters.context_lines());
        match self
            .llm
            .converse(history, Some(&system), QUICK_CHAT_MAX_TOKENS)
            .await
        {
            Ok(text) => text,
            Err(e) => format!("Sorry, I encountered an error: {}", e),
        }
    }
}

/// Fixed four-section report template. The citations section appears only
/// when citations exist.
fn merge_report(
    question: &str,
    state_analysis: &str,
    knowledge: &str,
    citations: &[Citation],
) -> String {
    let mut report = String::new();

    report.push_str("## State Requirements Analysis\n\n");
    if state_analysis.is_empty() {
        report.push_str(NO_DOCUMENTS_PLACEHOLDER);
    } else {
        report.push_str(state_analysis);
    }

    report.push_str("\n\n## Knowledge Base Analysis\n\n");
    if knowledge.is_empty() {
        report.push_str(NO_KNOWLEDGE_PLACEHOLDER);
    } else {
        report.push_str(knowledge);
    }

    report.push_str("\n\n## Summary\n\n");
    report.push_str(&format!("This report addresses your question: \"{}\"", question));

    if !citations.is_empty() {
        report.push_str("\n\n## Sources\n");
        for citation in citations {
            report.push('\n');
            match &citation.url {
                Some(url) => {
                    report.push_str(&format!(
                        "[{}] [{}]({})",
                        citation.match_number, citation.label, url
                    ));
                }
                None => {
                    report.push_str(&format!(
                        "[{}] {}: \"{}\" (no URL available)",
                        citation.match_number,
                        citation.label,
                        preview(&citation.source_text)
                    ));
                }
            }
        }
    }

    report
}

/// Short content preview for citations without a URL.
fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 120;
    if text.chars().count() <= MAX_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX_CHARS).collect();
        format!("{}…", head.trim_end())
    }
}
