//! Per-session state: conversation transcript, uploaded documents, and the
//! pipeline execution log. An explicit value passed through handlers — there
//! are no ambient globals. Mutated only by the single active interaction.

use chrono::Utc;
use uuid::Uuid;

use crate::orchestrator::OrchestrationReport;
use crate::types::{LessonPlan, Message, PipelineRun, UploadedDocument};

/// One chat session's state.
#[derive(Debug, Default)]
pub struct Session {
    messages: Vec<Message>,
    documents: Vec<UploadedDocument>,
    lesson_plans: Vec<LessonPlan>,
    runs: Vec<PipelineRun>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the transcript. Order is chronological and is the
    /// literal history sent to the LLM service.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Empty the transcript. Documents, plans, and the execution log are kept.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Transcript in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Store an extracted document. Returns false when a document with this
    /// name already exists; the upload is then treated as already processed.
    pub fn add_document(&mut self, document: UploadedDocument) -> bool {
        if self.documents.iter().any(|d| d.name == document.name) {
            return false;
        }
        self.documents.push(document);
        true
    }

    /// Remove a document by name. Returns false when no such document exists.
    pub fn remove_document(&mut self, name: &str) -> bool {
        let before = self.documents.len();
        self.documents.retain(|d| d.name != name);
        self.documents.len() != before
    }

    /// Uploaded documents in insertion order.
    pub fn documents(&self) -> &[UploadedDocument] {
        &self.documents
    }

    /// Store a generated sample plan. Plans accumulate; duplicates are fine.
    pub fn add_lesson_plan(&mut self, plan: LessonPlan) {
        self.lesson_plans.push(plan);
    }

    /// Remove a plan by position. Returns false when the index is out of
    /// range; later plans shift down one slot.
    pub fn remove_lesson_plan(&mut self, index: usize) -> bool {
        if index >= self.lesson_plans.len() {
            return false;
        }
        self.lesson_plans.remove(index);
        true
    }

    /// Generated sample plans in creation order.
    pub fn lesson_plans(&self) -> &[LessonPlan] {
        &self.lesson_plans
    }

    /// Record one pipeline execution for display/audit. The log is
    /// append-only and never read back by orchestration logic.
    pub fn record_run(&mut self, result: &OrchestrationReport) -> PipelineRun {
        let run = PipelineRun {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().to_rfc3339(),
            stages: result.stages.clone(),
            document_count: result.document_count,
            final_response: Some(result.report.clone()),
        };
        self.runs.push(run.clone());
        run
    }

    /// Recorded pipeline executions, oldest first.
    pub fn runs(&self) -> &[PipelineRun] {
        &self.runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Role, StageEvent, StageKind};

    fn doc(name: &str) -> UploadedDocument {
        UploadedDocument {
            name: name.into(),
            content: "content".into(),
            size: 7,
        }
    }

    #[test]
    fn test_append_preserves_order() {
        let mut session = Session::new();
        session.append(Message::user("first"));
        session.append(Message::assistant("second"));
        session.append(Message::user("third"));

        let contents: Vec<_> = session.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
        assert_eq!(session.messages()[1].role, Role::Assistant);
    }

    #[test]
    fn test_clear_resets_transcript() {
        let mut session = Session::new();
        for i in 0..10 {
            session.append(Message::user(format!("message {}", i)));
        }
        session.add_document(doc("kept.pdf"));

        session.clear();
        assert!(session.messages().is_empty());
        // Documents survive a transcript clear.
        assert_eq!(session.documents().len(), 1);
    }

    #[test]
    fn test_duplicate_document_name_skipped() {
        let mut session = Session::new();
        assert!(session.add_document(doc("standards.pdf")));
        assert!(!session.add_document(doc("standards.pdf")));
        assert_eq!(session.documents().len(), 1);
    }

    #[test]
    fn test_remove_document() {
        let mut session = Session::new();
        session.add_document(doc("a.pdf"));
        session.add_document(doc("b.pdf"));

        assert!(session.remove_document("a.pdf"));
        assert!(!session.remove_document("a.pdf"));
        assert_eq!(session.documents()[0].name, "b.pdf");
    }

    #[test]
    fn test_lesson_plans_list_and_remove() {
        use crate::lesson_plans::sample_lesson_plan;
        use crate::FilterContext;

        let mut session = Session::new();
        session.add_lesson_plan(sample_lesson_plan(&FilterContext::default()));
        session.add_lesson_plan(sample_lesson_plan(&FilterContext {
            states: vec!["Hawaii".into()],
            grade: None,
            subject: None,
        }));
        assert_eq!(session.lesson_plans().len(), 2);

        // Removing the first shifts the second down.
        assert!(session.remove_lesson_plan(0));
        assert_eq!(session.lesson_plans().len(), 1);
        assert_eq!(session.lesson_plans()[0].state, "Hawaii");
        assert!(!session.remove_lesson_plan(5));

        // A transcript clear leaves plans in place.
        session.append(Message::user("hello"));
        session.clear();
        assert_eq!(session.lesson_plans().len(), 1);
    }

    #[test]
    fn test_record_run() {
        let mut session = Session::new();
        let result = OrchestrationReport {
            report: "## Summary".into(),
            citations: vec![],
            stages: vec![StageEvent::new("Report", "done", StageKind::Success)],
            document_count: 2,
        };

        let run = session.record_run(&result);
        assert_eq!(run.document_count, 2);
        assert_eq!(run.final_response.as_deref(), Some("## Summary"));
        assert_eq!(session.runs().len(), 1);
        assert_eq!(session.runs()[0].stages.len(), 1);
        // The returned run is the same record that was stored.
        assert_eq!(session.runs()[0].id, run.id);
    }
}
