//! Chat data model: messages, documents, passages, citations, pipeline runs.

use serde::{Deserialize, Serialize};

/// Conversation role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// The literal wire string sent to the model API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in the conversation transcript. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// An uploaded document after successful text extraction.
///
/// `name` is the unique key; uploading the same name again is treated as
/// already processed and skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub name: String,
    pub content: String,
    pub size: usize,
}

/// A ranked passage returned by the retrieval service. Read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedPassage {
    pub text: String,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    /// Source URI from the retrieval result's location block, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_uri: Option<String>,
}

/// A numbered reference linking generated text back to a retrieved passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Citation {
    /// Dense 1-based rank matching retrieval order.
    #[serde(rename = "matchNumber")]
    pub match_number: usize,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "locationHint")]
    pub location_hint: Option<String>,
    #[serde(rename = "sourceText")]
    pub source_text: String,
}

/// Severity of a pipeline stage notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    Info,
    Success,
    Error,
}

/// A stage-boundary notification emitted by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageEvent {
    pub name: String,
    pub status: String,
    pub kind: StageKind,
}

impl StageEvent {
    pub fn new(name: impl Into<String>, status: impl Into<String>, kind: StageKind) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
            kind,
        }
    }
}

/// A templated sample lesson plan. Generated locally from the active facet
/// selections, never by the LLM service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonPlan {
    pub title: String,
    pub state: String,
    pub grade: String,
    pub subject: String,
    /// Creation date as YYYY-MM-DD.
    pub date: String,
    pub objectives: Vec<String>,
    pub materials: Vec<String>,
    pub activities: Vec<String>,
    pub assessment: String,
    pub homework: String,
}

/// One recorded pipeline execution. Display/audit only; never read by logic.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    pub id: String,
    pub timestamp: String,
    pub stages: Vec<StageEvent>,
    #[serde(rename = "documentCount")]
    pub document_count: usize,
    #[serde(skip_serializing_if = "Option::is_none", rename = "finalResponse")]
    pub final_response: Option<String>,
}
