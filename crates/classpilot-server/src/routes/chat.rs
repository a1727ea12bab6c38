//! Chat routes — buffered report generation and SSE progress streaming.

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use axum::routing::post;
use axum::{Json, Router};
use futures::Stream;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use classpilot_chat::{
    Citation, FilterContext, Message, NullSink, ProgressSink, StageEvent,
};

use crate::state::AppState;

type SseStream = Pin<Box<dyn Stream<Item = Result<Event, Infallible>> + Send>>;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chat", post(chat))
        .route("/chat/stream", post(stream_chat))
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub filters: FilterContext,
    /// When false, take the single-call path: no document analysis, no
    /// retrieval, no citations.
    #[serde(default = "default_use_rag", rename = "useRag")]
    pub use_rag: bool,
}

fn default_use_rag() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stages: Vec<StageEvent>,
    #[serde(rename = "documentCount")]
    pub document_count: usize,
}

/// SSE event envelope for the streaming chat route.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum StreamEvent {
    #[serde(rename = "stage")]
    Stage { stage: StageEvent },
    #[serde(rename = "report")]
    Report {
        message: String,
        citations: Vec<Citation>,
        #[serde(rename = "documentCount")]
        document_count: usize,
    },
}

// ---------------------------------------------------------------
// Buffered chat
// ---------------------------------------------------------------

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let response = run_chat(&state, req, &NullSink).await;
    Json(response)
}

/// Append the user message, run the pipeline (or the single-call path), and
/// append the assistant reply. Never fails: service errors surface inside
/// the assistant message.
async fn run_chat(state: &AppState, req: ChatRequest, progress: &dyn ProgressSink) -> ChatResponse {
    let (documents, history) = {
        let mut session = state.session.write();
        session.append(Message::user(req.message.clone()));
        (session.documents().to_vec(), session.messages().to_vec())
    };

    if req.use_rag {
        let result = state
            .orchestrator
            .run(&req.message, &req.filters, &documents, progress)
            .await;

        let mut session = state.session.write();
        session.append(Message::assistant(result.report.clone()));
        session.record_run(&result);

        ChatResponse {
            message: result.report,
            citations: result.citations,
            stages: result.stages,
            document_count: result.document_count,
        }
    } else {
        let reply = state.orchestrator.quick_chat(&history, &req.filters).await;
        state.session.write().append(Message::assistant(reply.clone()));
        ChatResponse {
            message: reply,
            citations: Vec::new(),
            stages: Vec::new(),
            document_count: 0,
        }
    }
}

// ---------------------------------------------------------------
// Streaming chat (SSE): stage events while the pipeline runs, then the
// final report, then a [DONE] marker.
// ---------------------------------------------------------------

struct ChannelSink(mpsc::UnboundedSender<StageEvent>);

impl ProgressSink for ChannelSink {
    fn stage(&self, event: StageEvent) {
        let _ = self.0.send(event);
    }
}

async fn stream_chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Sse<SseStream> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        let sink = ChannelSink(tx);
        run_chat(&state, req, &sink).await
    });

    let sse_stream: SseStream = Box::pin(async_stream::stream! {
        while let Some(stage) = rx.recv().await {
            let event = StreamEvent::Stage { stage };
            yield Ok::<_, Infallible>(Event::default().data(
                serde_json::to_string(&event).unwrap()
            ));
        }

        // The sender is dropped once the pipeline finishes.
        if let Ok(response) = handle.await {
            let event = StreamEvent::Report {
                message: response.message,
                citations: response.citations,
                document_count: response.document_count,
            };
            yield Ok(Event::default().data(
                serde_json::to_string(&event).unwrap()
            ));
        }

        yield Ok(Event::default().data("[DONE]".to_string()));
    });

    Sse::new(sse_stream)
}
