// File: ./src/model/item.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::EnumIter;

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 500;
pub const UNTITLED: &str = "Untitled Task";

#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Hash, Default, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    /// Wire name, as used in the JSON draft.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for TaskPriority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            other => Err(anyhow::anyhow!("Unknown priority '{}'", other)),
        }
    }
}

#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Hash, Default, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for TaskStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "todo" | "to_do" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(anyhow::anyhow!("Unknown status '{}'", other)),
        }
    }
}

/// Per-field extraction certainty, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confidence {
    pub title: f64,
    pub due_date: f64,
    pub priority: f64,
    pub status: f64,
}

impl Confidence {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Field names (wire spelling) scoring strictly below `threshold`.
    pub fn fields_below(&self, threshold: f64) -> Vec<&'static str> {
        [
            ("title", self.title),
            ("dueDate", self.due_date),
            ("priority", self.priority),
            ("status", self.status),
        ]
        .into_iter()
        .filter(|(_, score)| *score < threshold)
        .map(|(name, _)| name)
        .collect()
    }
}

/// Structured, unpersisted candidate task built from one transcript.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub confidence: Confidence,
}

impl ParsedTaskDraft {
    /// Due date in `YYYY-MM-DD` form.
    pub fn due_date_string(&self) -> Option<String> {
        self.due_date.map(|d| d.format("%Y-%m-%d").to_string())
    }

    /// Applies the review step's normalisation: blank titles become
    /// "Untitled Task", blank descriptions are dropped.
    pub fn confirm(self) -> ReviewedTask {
        let title = self.title.trim();
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        ReviewedTask {
            title: if title.is_empty() {
                UNTITLED.to_string()
            } else {
                title.to_string()
            },
            description,
            priority: self.priority,
            status: self.status,
            due_date: self.due_date,
        }
    }
}

/// A draft the user has accepted, ready for a downstream create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewedTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
}

/// Transcript echoed back alongside its draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResponse {
    pub transcript: String,
    pub parsed: ParsedTaskDraft,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn wire_names_roundtrip_through_serde() {
        for p in TaskPriority::iter() {
            let json = serde_json::to_string(&p).unwrap();
            assert_eq!(json, format!("\"{}\"", p.as_str()));
        }
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }

    #[test]
    fn default_draft_shape() {
        let value = serde_json::to_value(ParsedTaskDraft::default()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "title": "",
                "description": null,
                "priority": "medium",
                "status": "todo",
                "dueDate": null,
                "confidence": {"title": 0.0, "dueDate": 0.0, "priority": 0.0, "status": 0.0}
            })
        );
    }

    #[test]
    fn due_date_serializes_as_iso() {
        let draft = ParsedTaskDraft {
            due_date: NaiveDate::from_ymd_opt(2025, 3, 7),
            ..Default::default()
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["dueDate"], "2025-03-07");
        assert_eq!(draft.due_date_string().as_deref(), Some("2025-03-07"));
    }

    #[test]
    fn labels_and_parsing() {
        assert_eq!(TaskStatus::InProgress.to_string(), "In Progress");
        assert_eq!(TaskPriority::Urgent.to_string(), "Urgent");
        assert_eq!("In Progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!("HIGH".parse::<TaskPriority>().unwrap(), TaskPriority::High);
        assert!("later".parse::<TaskPriority>().is_err());
    }

    #[test]
    fn confirm_fills_blank_title() {
        let reviewed = ParsedTaskDraft {
            title: "   ".to_string(),
            description: Some("  ".to_string()),
            ..Default::default()
        }
        .confirm();
        assert_eq!(reviewed.title, UNTITLED);
        assert_eq!(reviewed.description, None);
    }

    #[test]
    fn low_confidence_fields() {
        let c = Confidence {
            title: 0.9,
            due_date: 0.0,
            priority: 0.6,
            status: 0.9,
        };
        assert_eq!(c.fields_below(0.8), vec!["dueDate", "priority"]);
        assert!(Confidence::zero().fields_below(0.0).is_empty());
    }
}
