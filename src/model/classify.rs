// File: src/model/classify.rs
//! Ordered keyword chains for priority and status.
use crate::model::item::{TaskPriority, TaskStatus};
use once_cell::sync::Lazy;
use regex::Regex;

fn keywords(alternatives: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives)).unwrap()
}

// Explicit vocabulary first, weak urgency/procrastination signals last.
static PRIORITY_CHAIN: Lazy<Vec<(Regex, TaskPriority, bool)>> = Lazy::new(|| {
    vec![
        (
            keywords("urgent|critical|asap|immediately|emergency|crucial|vital"),
            TaskPriority::Urgent,
            true,
        ),
        (
            keywords(r"low\s+priority|low|minor|whenever|optional|nice\s+to\s+have|if\s+time"),
            TaskPriority::Low,
            true,
        ),
        (
            keywords(r"high\s+priority|important|high|must\s+do|essential"),
            TaskPriority::High,
            true,
        ),
        (
            keywords(r"medium\s+priority|medium|normal|regular|standard"),
            TaskPriority::Medium,
            true,
        ),
        (keywords("soon|quickly|fast|hurry"), TaskPriority::High, false),
        (
            keywords(r"later|eventually|sometime|no\s+rush"),
            TaskPriority::Low,
            false,
        ),
    ]
});

// Modal verbs still mean todo, but are not a status keyword.
static STATUS_CHAIN: Lazy<Vec<(Regex, TaskStatus, bool)>> = Lazy::new(|| {
    vec![
        (
            keywords(r"in\s+progress|working\s+on|started|currently\s+doing|ongoing|active"),
            TaskStatus::InProgress,
            true,
        ),
        (
            keywords("done|completed|finished|accomplished|achieved"),
            TaskStatus::Done,
            true,
        ),
        (keywords(r"todo|to\s+do"), TaskStatus::Todo, true),
        (
            keywords(r"need\s+to|have\s+to|should|must"),
            TaskStatus::Todo,
            false,
        ),
    ]
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityMatch {
    pub priority: TaskPriority,
    /// True when an explicit priority word decided the outcome, false for
    /// weak signals ("soon", "later") and for the default.
    pub explicit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusMatch {
    pub status: TaskStatus,
    /// True when a status keyword decided the outcome, false for modal
    /// phrasing ("need to", "should") and for the default.
    pub explicit: bool,
}

/// First tier with a hit wins; nothing matches -> medium.
pub fn classify_priority(text: &str) -> PriorityMatch {
    PRIORITY_CHAIN
        .iter()
        .find(|(re, _, _)| re.is_match(text))
        .map(|(_, priority, explicit)| PriorityMatch {
            priority: *priority,
            explicit: *explicit,
        })
        .unwrap_or(PriorityMatch {
            priority: TaskPriority::default(),
            explicit: false,
        })
}

/// First tier with a hit wins; nothing matches -> todo.
pub fn classify_status(text: &str) -> StatusMatch {
    STATUS_CHAIN
        .iter()
        .find(|(re, _, _)| re.is_match(text))
        .map(|(_, status, explicit)| StatusMatch {
            status: *status,
            explicit: *explicit,
        })
        .unwrap_or(StatusMatch {
            status: TaskStatus::default(),
            explicit: false,
        })
}
