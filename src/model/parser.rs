// File: src/model/parser.rs
use crate::model::classify::{PriorityMatch, StatusMatch, classify_priority, classify_status};
use crate::model::dates::{DateRecognizer, PhraseRecognizer, resolve_due_date};
use crate::model::extract::{extract_description, extract_title};
use crate::model::item::{Confidence, ParseResponse, ParsedTaskDraft};
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::fmt;

/// Turns a free-form transcript into a `ParsedTaskDraft`.
///
/// Holds no state between calls; the only collaborator is the date
/// recognizer, which can be swapped for another implementation.
pub struct TranscriptParser {
    recognizer: Box<dyn DateRecognizer>,
}

impl fmt::Debug for TranscriptParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscriptParser").finish_non_exhaustive()
    }
}

impl Default for TranscriptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptParser {
    pub fn new() -> Self {
        Self::with_recognizer(Box::new(PhraseRecognizer))
    }

    pub fn with_recognizer(recognizer: Box<dyn DateRecognizer>) -> Self {
        Self { recognizer }
    }

    /// Parses relative to the current local time.
    pub fn parse(&self, text: Option<&str>) -> ParsedTaskDraft {
        self.parse_at(text, Local::now().naive_local())
    }

    /// Parses with `reference` as "now". Never fails: missing, empty or
    /// blank input yields the zero-confidence default draft.
    pub fn parse_at(&self, text: Option<&str>, reference: NaiveDateTime) -> ParsedTaskDraft {
        let Some(transcript) = text.map(str::trim).filter(|t| !t.is_empty()) else {
            log::debug!("Empty transcript, returning default draft");
            return ParsedTaskDraft::default();
        };

        let due_date = resolve_due_date(self.recognizer.as_ref(), transcript, reference);
        let priority = classify_priority(transcript);
        let status = classify_status(transcript);
        let description = extract_description(transcript);
        let title = extract_title(transcript);
        let confidence = score_confidence(&title, due_date, priority, status);

        ParsedTaskDraft {
            title,
            description,
            priority: priority.priority,
            status: status.status,
            due_date,
            confidence,
        }
    }

    /// Parses `transcript` and echoes it back with the draft.
    pub fn respond(&self, transcript: &str) -> ParseResponse {
        ParseResponse {
            transcript: transcript.to_string(),
            parsed: self.parse(Some(transcript)),
        }
    }
}

/// Fixed-threshold confidence per field.
pub fn score_confidence(
    title: &str,
    due_date: Option<NaiveDate>,
    priority: PriorityMatch,
    status: StatusMatch,
) -> Confidence {
    Confidence {
        title: if title.chars().count() > 3 { 0.9 } else { 0.5 },
        due_date: if due_date.is_some() { 0.95 } else { 0.0 },
        priority: if priority.explicit { 0.9 } else { 0.6 },
        status: if status.explicit { 0.9 } else { 0.7 },
    }
}

/// Parses `text` with the built-in recognizer, relative to now.
pub fn parse(text: Option<&str>) -> ParsedTaskDraft {
    TranscriptParser::new().parse(text)
}

/// Same as [`parse`] for loosely typed input; anything but a JSON string
/// gets the default draft.
pub fn parse_value(value: &serde_json::Value) -> ParsedTaskDraft {
    parse(value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::{TaskPriority, TaskStatus};
    use anyhow::{Result, anyhow};
    use crate::model::dates::RecognizedDate;

    struct BrokenRecognizer;

    impl DateRecognizer for BrokenRecognizer {
        fn recognize(&self, _text: &str, _reference: NaiveDateTime) -> Result<Vec<RecognizedDate>> {
            Err(anyhow!("recognizer exploded"))
        }
    }

    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 11)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn blank_input_is_default() {
        let parser = TranscriptParser::new();
        for input in [None, Some(""), Some("   \n\t")] {
            assert_eq!(parser.parse_at(input, reference()), ParsedTaskDraft::default());
        }
    }

    #[test]
    fn recognizer_failure_only_drops_the_date() {
        let parser = TranscriptParser::with_recognizer(Box::new(BrokenRecognizer));
        let draft = parser.parse_at(Some("Call the bank by tomorrow, urgent"), reference());
        assert_eq!(draft.due_date, None);
        assert_eq!(draft.confidence.due_date, 0.0);
        assert_eq!(draft.priority, TaskPriority::Urgent);
        assert_eq!(draft.title, "Call the bank");
    }

    #[test]
    fn thresholds_are_literal() {
        let explicit = PriorityMatch {
            priority: TaskPriority::High,
            explicit: true,
        };
        let weak = PriorityMatch {
            priority: TaskPriority::High,
            explicit: false,
        };
        let keyword = StatusMatch {
            status: TaskStatus::Done,
            explicit: true,
        };
        let modal = StatusMatch {
            status: TaskStatus::Todo,
            explicit: false,
        };
        let date = NaiveDate::from_ymd_opt(2025, 6, 12);

        let high = score_confidence("Buy milk", date, explicit, keyword);
        assert_eq!(
            high,
            Confidence {
                title: 0.9,
                due_date: 0.95,
                priority: 0.9,
                status: 0.9
            }
        );
        let low = score_confidence("Buy", None, weak, modal);
        assert_eq!(
            low,
            Confidence {
                title: 0.5,
                due_date: 0.0,
                priority: 0.6,
                status: 0.7
            }
        );
    }

    #[test]
    fn modal_only_transcript_keeps_default_status_confidence() {
        let draft = TranscriptParser::new().parse_at(Some("I need to call mom"), reference());
        assert_eq!(draft.status, TaskStatus::Todo);
        assert_eq!(draft.confidence.status, 0.7);
        assert_eq!(draft.title, "Call mom");
    }

    #[test]
    fn extractors_see_the_trimmed_original() {
        let draft = TranscriptParser::new().parse_at(
            Some("  Prepare slides with speaker notes and demo video due friday, high priority  "),
            reference(),
        );
        assert_eq!(draft.title, "Prepare slides");
        assert_eq!(
            draft.description.as_deref(),
            Some("speaker notes and demo video")
        );
        assert_eq!(draft.priority, TaskPriority::High);
        assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2025, 6, 13));
    }
}
