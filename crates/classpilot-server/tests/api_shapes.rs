//! API shape tests — validates that the response JSON the routes produce
//! matches what a chat front end expects, field names and types.

use classpilot_chat::{Citation, StageEvent, StageKind};

/// The /api/chat response carries message, citations, stages, documentCount.
#[test]
fn test_chat_response_shape() {
    let response = serde_json::json!({
        "message": "## State Requirements Analysis\n…",
        "citations": [
            { "matchNumber": 1, "label": "T_1", "url": "http://x/1", "sourceText": "…" },
        ],
        "stages": [
            { "name": "Report", "status": "Report assembled", "kind": "success" },
        ],
        "documentCount": 1,
    });

    assert!(response["message"].is_string());
    assert!(response["citations"].is_array());
    assert!(response["citations"][0]["matchNumber"].is_number());
    assert!(response["citations"][0]["label"].is_string());
    assert!(response["stages"][0]["kind"].is_string());
    assert!(response["documentCount"].is_number());
}

/// Citations serialize camelCase with optional fields dropped when absent.
#[test]
fn test_citation_wire_shape() {
    let citation = Citation {
        match_number: 3,
        label: "Curriculum Guide".into(),
        url: None,
        location_hint: Some("page 4".into()),
        source_text: "passage".into(),
    };
    let json = serde_json::to_value(&citation).unwrap();

    assert_eq!(json["matchNumber"], 3);
    assert_eq!(json["locationHint"], "page 4");
    assert_eq!(json["sourceText"], "passage");
    assert!(json.get("url").is_none());
}

/// Stage events use lowercase kinds on the wire.
#[test]
fn test_stage_event_wire_shape() {
    let event = StageEvent::new("Knowledge Base Retrieval", "Retrieved 2 passages", StageKind::Success);
    let json = serde_json::to_value(&event).unwrap();

    assert_eq!(json["name"], "Knowledge Base Retrieval");
    assert_eq!(json["kind"], "success");
}

/// Upload outcomes report per-file status strings the front end switches on.
#[test]
fn test_upload_outcome_shape() {
    let outcomes = serde_json::json!([
        { "name": "standards.pdf", "status": "stored", "size": 1024 },
        { "name": "standards.pdf", "status": "skipped", "size": 1024 },
        { "name": "photo.png", "status": "error", "error": "Unsupported document type: image/png" },
    ]);

    for outcome in outcomes.as_array().unwrap() {
        assert!(outcome["name"].is_string());
        assert!(matches!(
            outcome["status"].as_str().unwrap(),
            "stored" | "skipped" | "error"
        ));
    }
}

/// Lesson plans serialize with every section the plan card renders.
#[test]
fn test_lesson_plan_wire_shape() {
    use classpilot_chat::{sample_lesson_plan, FilterContext};

    let plan = sample_lesson_plan(&FilterContext {
        states: vec!["Washington".into()],
        grade: Some("8th Grade".into()),
        subject: Some("Asian American Studies".into()),
    });
    let json = serde_json::to_value(&plan).unwrap();

    assert_eq!(json["title"], "Asian American Studies Lesson Plan - 8th Grade");
    assert_eq!(json["state"], "Washington");
    assert!(json["objectives"].as_array().unwrap().len() == 3);
    assert!(json["activities"].as_array().unwrap().len() == 5);
    assert!(json["assessment"].is_string());
    assert!(json["homework"].is_string());
    assert!(json["date"].is_string());
}

/// The options route lists facets with the default sentinel first.
#[test]
fn test_options_defaults_first() {
    use classpilot_chat::filters::{ALL_GRADES, ALL_SUBJECTS, GRADE_LEVELS, US_STATES};

    let grades: Vec<&str> = std::iter::once(ALL_GRADES)
        .chain(GRADE_LEVELS.iter().copied())
        .collect();
    assert_eq!(grades[0], "All Grades");
    assert_eq!(grades[1], "Kindergarten");
    assert_eq!(US_STATES.len(), 50);
    assert_eq!(ALL_SUBJECTS, "All Subjects");
}
