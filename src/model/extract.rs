// File: src/model/extract.rs
//! Title and description extraction.
//!
//! The title is what is left of the transcript once every date, priority,
//! status, description and filler phrase has been stripped out. Stripping is
//! a fixed sequence of passes (`TITLE_PASSES`); the order decides the outcome
//! on ambiguous input, so it lives in one list rather than in control flow.
use crate::model::item::{MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS};
use once_cell::sync::Lazy;
use regex::Regex;

const MIN_DESCRIPTION_CHARS: usize = 11;
const MIN_TITLE_CHARS: usize = 3;
const FALLBACK_TITLE_CHARS: usize = 50;
const ELLIPSIS: &str = "...";

const MONTH_NAMES: &str =
    "january|february|march|april|may|june|july|august|september|october|november|december";
const WEEKDAY_NAMES: &str = "monday|tuesday|wednesday|thursday|friday|saturday|sunday";

fn ci(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){}", pattern)).unwrap()
}

/// One stripping pass of title extraction.
pub struct TitlePass {
    pub name: &'static str,
    pattern: Regex,
    /// Only the first match is removed (anchored passes).
    once: bool,
}

impl TitlePass {
    fn all(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: ci(pattern),
            once: false,
        }
    }

    fn once(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: ci(pattern),
            once: true,
        }
    }

    pub fn apply(&self, text: &str) -> String {
        if self.once {
            self.pattern.replace(text, "").into_owned()
        } else {
            self.pattern.replace_all(text, "").into_owned()
        }
    }
}

pub static TITLE_PASSES: Lazy<Vec<TitlePass>> = Lazy::new(|| {
    vec![
        TitlePass::all(
            "relative_due",
            r"\b(?:due|by|before|on|until|deadline)\s+(?:on\s+)?(?:tomorrow|today|tonight|next\s+\w+|this\s+\w+|\d+)",
        ),
        TitlePass::all(
            "duration",
            r"\b(?:in|within)\s+\d+\s+(?:days?|weeks?|months?|hours?)\b",
        ),
        TitlePass::all(
            "month_day",
            &format!(r"\b(?:{})\s+\d+(?:st|nd|rd|th)?\b", MONTH_NAMES),
        ),
        TitlePass::all(
            "ordinal_day",
            &format!(r"\b\d+\s*(?:st|nd|rd|th)\s+(?:of\s+)?(?:{})\b", MONTH_NAMES),
        ),
        TitlePass::all("weekday", &format!(r"\b(?:{})\b", WEEKDAY_NAMES)),
        TitlePass::all("clock_time", r"\bat\s+\d+:\d+(?:\s*(?:am|pm)\b)?"),
        TitlePass::all(
            "priority",
            r"\b(?:high\s+priority|low\s+priority|medium\s+priority|urgent|critical|asap|immediately|emergency|crucial|vital|minor|whenever|optional|nice\s+to\s+have|if\s+time|important|must\s+do|essential|normal|regular|standard|soon|quickly|fast|hurry|later|eventually|sometime|no\s+rush|priority|high|low|medium)\b",
        ),
        TitlePass::all(
            "status",
            r"\b(?:in\s+progress|currently\s+(?:working\s+on|doing)|working\s+on|started|ongoing|active|done|completed|finished|accomplished|achieved|todo|to\s+do)\b",
        ),
        TitlePass::all(
            "labeled_description",
            r"\b(?:description|details?|notes?|about|regarding):.*",
        ),
        TitlePass::all("inline_description", r"\b(?:with|including|contains?)\s+.*"),
        TitlePass::once(
            "leading_filler",
            r"^(?:remind\s+me\s+to|i\s+need\s+to|i\s+have\s+to|i\s+want\s+to|i\s+should|i\s+am|i'm|please|hey|ok|okay|um|uh|so)\s+",
        ),
        TitlePass::once(
            "trailing_connector",
            r"\s+(?:due|by|before|priority|urgent|high|low|medium)\s*$",
        ),
    ]
});

static LABELED_DESCRIPTION: Lazy<Regex> =
    Lazy::new(|| ci(r"\b(?:description|details?|notes?|about|regarding):\s*(.+)"));
static INLINE_DESCRIPTION: Lazy<Regex> = Lazy::new(|| {
    ci(r"\b(?:with|including|contains?)\s+(.+?)(?:\s+(?:due|by|priority|urgent|high|low|medium)\b|\s*$)")
});
static ACTION_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    ci(r"\b(?:create|write|send|review|complete|finish|update|call|email|meet|schedule|prepare|submit|fix|debug|test|deploy)\s+[^,.!?]+")
});
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static EMPTY_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:\s*[,;])+").unwrap());

fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn is_edge_punctuation(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '.' | ';' | ':' | '!' | '?' | '-')
}

/// Description clause: a labelled one ("notes: ...") wins over an inline
/// "with ..." clause. Clauses of ten characters or less are noise.
pub fn extract_description(text: &str) -> Option<String> {
    [&*LABELED_DESCRIPTION, &*INLINE_DESCRIPTION]
        .into_iter()
        .filter_map(|re| re.captures(text))
        .filter_map(|caps| caps.get(1).map(|m| collapse_whitespace(m.as_str())))
        .find(|desc| desc.chars().count() >= MIN_DESCRIPTION_CHARS)
        .map(|desc| truncate_chars(&desc, MAX_DESCRIPTION_CHARS))
}

/// Runs every stripping pass in order and tidies the remainder.
pub fn strip_title(text: &str) -> String {
    let stripped = TITLE_PASSES
        .iter()
        .fold(text.to_string(), |acc, pass| pass.apply(&acc));
    let collapsed = collapse_whitespace(&stripped);
    let tidied = EMPTY_SEPARATORS.replace_all(&collapsed, |caps: &regex::Captures<'_>| {
        caps[0].trim_start().chars().next().map(String::from).unwrap_or_default()
    });
    tidied.trim_matches(is_edge_punctuation).to_string()
}

/// Short, capitalised title for `text`; never empty unless `text` is.
pub fn extract_title(text: &str) -> String {
    let mut title = strip_title(text);

    if title.chars().count() < MIN_TITLE_CHARS {
        title = match ACTION_CLAUSE.find(text) {
            Some(m) => m.as_str().trim().to_string(),
            None => text
                .split(['.', '!', '?'])
                .next()
                .unwrap_or_default()
                .trim()
                .to_string(),
        };
    }

    if title.is_empty() {
        return truncate_chars(text, FALLBACK_TITLE_CHARS);
    }

    // Capitalising can add characters ("ß" -> "SS").
    let title = capitalize_first(&title);
    if title.chars().count() > MAX_TITLE_CHARS {
        return format!(
            "{}{}",
            truncate_chars(&title, MAX_TITLE_CHARS - ELLIPSIS.len()),
            ELLIPSIS
        );
    }
    title
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
