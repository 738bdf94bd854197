// End-to-end behaviour of transcript parsing through the public API.
use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, Weekday};
use serde_json::json;
use taskdraft::model::{
    Confidence, ParsedTaskDraft, TaskPriority, TaskStatus, TranscriptParser, parse, parse_value,
};

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

fn parse_on(text: &str, reference: NaiveDateTime) -> ParsedTaskDraft {
    TranscriptParser::new().parse_at(Some(text), reference)
}

#[test]
fn test_invalid_input_gives_default_draft() {
    let expected = ParsedTaskDraft {
        title: String::new(),
        description: None,
        priority: TaskPriority::Medium,
        status: TaskStatus::Todo,
        due_date: None,
        confidence: Confidence {
            title: 0.0,
            due_date: 0.0,
            priority: 0.0,
            status: 0.0,
        },
    };
    assert_eq!(parse(None), expected);
    assert_eq!(parse(Some("")), expected);
    assert_eq!(parse(Some("    ")), expected);
    assert_eq!(parse_value(&json!(42)), expected);
    assert_eq!(parse_value(&json!(null)), expected);
    assert_eq!(parse_value(&json!({"text": "call bob"})), expected);
}

#[test]
fn test_json_string_value_is_parsed() {
    let draft = parse_value(&json!("Call the client asap"));
    assert_eq!(draft.priority, TaskPriority::Urgent);
    assert_eq!(draft.title, "Call the client");
}

#[test]
fn test_urgent_keywords() {
    let draft = parse(Some("URGENT: call the client asap"));
    assert_eq!(draft.priority, TaskPriority::Urgent);
    assert_eq!(draft.confidence.priority, 0.9);
}

#[test]
fn test_explicit_low_beats_sometime() {
    let today = Local::now().date_naive();
    let draft = parse(Some("Send the report, low priority, sometime next week"));
    assert_eq!(draft.priority, TaskPriority::Low);
    assert_eq!(draft.due_date, Some(today + Duration::days(7)));
    // Bare "next week" is not a "due/by ..." phrase and stays in the title.
    assert_eq!(draft.title, "Send the report, next week");
}

#[test]
fn test_next_monday_high_priority() {
    let today = Local::now().date_naive();
    let mut expected = today + Duration::days(1);
    while expected.weekday() != Weekday::Mon {
        expected += Duration::days(1);
    }

    let draft = parse(Some(
        "Schedule dentist appointment for next Monday, high priority",
    ));
    assert_eq!(draft.priority, TaskPriority::High);
    assert_eq!(draft.due_date, Some(expected));
    assert_eq!(draft.confidence.due_date, 0.95);
}

#[test]
fn test_working_on_is_in_progress() {
    let draft = parse(Some("I am currently working on the deployment script"));
    assert_eq!(draft.status, TaskStatus::InProgress);
    assert_eq!(draft.confidence.status, 0.9);
    assert_eq!(draft.title, "The deployment script");
}

#[test]
fn test_full_sentence() {
    // Wednesday
    let draft = parse_on(
        "Remind me to send the proposal to Dana by next Friday, high priority, notes: include the revised budget",
        at(2025, 6, 11),
    );
    assert_eq!(draft.title, "Send the proposal to Dana");
    assert_eq!(draft.priority, TaskPriority::High);
    assert_eq!(draft.status, TaskStatus::Todo);
    assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2025, 6, 13));
    assert_eq!(
        draft.description.as_deref(),
        Some("include the revised budget")
    );
    assert_eq!(
        draft.confidence,
        Confidence {
            title: 0.9,
            due_date: 0.95,
            priority: 0.9,
            status: 0.7
        }
    );
}

#[test]
fn test_done_status_and_weak_priority() {
    let draft = parse_on("finished the quarterly review, no rush", at(2025, 6, 11));
    assert_eq!(draft.status, TaskStatus::Done);
    assert_eq!(draft.priority, TaskPriority::Low);
    assert_eq!(draft.confidence.priority, 0.6);
    assert_eq!(draft.title, "The quarterly review");
}

#[test]
fn test_end_of_month_and_tonight() {
    let draft = parse_on("Close the books by end of month", at(2025, 6, 11));
    assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2025, 6, 30));

    let draft = parse_on("Pack the bags tonight", at(2025, 6, 11));
    assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2025, 6, 11));
    assert_eq!(draft.title, "Pack the bags tonight");
}

#[test]
fn test_past_date_rolls_one_year() {
    let draft = parse_on("Renew the passport on 2025-03-01", at(2025, 6, 11));
    assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2026, 3, 1));
}

#[test]
fn test_wire_shape() {
    let draft = parse_on("Call the plumber by tomorrow, urgent", at(2025, 6, 11));
    let value = serde_json::to_value(&draft).unwrap();
    assert_eq!(
        value,
        json!({
            "title": "Call the plumber",
            "description": null,
            "priority": "urgent",
            "status": "todo",
            "dueDate": "2025-06-12",
            "confidence": {"title": 0.9, "dueDate": 0.95, "priority": 0.9, "status": 0.7}
        })
    );
}

#[test]
fn test_envelope_echoes_transcript() {
    let response = TranscriptParser::new().respond("buy milk");
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["transcript"], "buy milk");
    assert_eq!(value["parsed"]["title"], "Buy milk");
}

#[test]
fn test_review_after_parse() {
    let draft = parse_on("uh", at(2025, 6, 11));
    assert_eq!(draft.title, "Uh");
    assert_eq!(draft.confidence.title, 0.5);
    assert_eq!(
        draft.confidence.fields_below(0.8),
        vec!["title", "dueDate", "priority", "status"]
    );
    let reviewed = draft.confirm();
    assert_eq!(reviewed.title, "Uh");
    assert_eq!(reviewed.description, None);
}

#[test]
fn test_title_is_not_idempotent() {
    let first = parse_on("with the team, call the client asap", at(2025, 6, 11));
    assert_eq!(first.title, "Call the client asap");
    let second = parse_on(&first.title, at(2025, 6, 11));
    assert_eq!(second.title, "Call the client");
}
