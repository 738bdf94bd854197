// File: src/model/dates.rs
//! Natural-language due date recognition.
//!
//! `DateRecognizer` is the narrow seam the parse pipeline depends on: given a
//! text and a reference instant it returns the recognised date phrases in
//! text order, each resolved to an absolute instant. Ambiguous relative
//! phrases ("friday", "march 3", "at 9am") resolve forward, never into the
//! past. `PhraseRecognizer` is the built-in implementation.
use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// One recognised date phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedDate {
    /// Byte offsets into the scanned text.
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub value: NaiveDateTime,
}

pub trait DateRecognizer: Send + Sync {
    /// Returns every recognised phrase, ordered by `start`.
    fn recognize(&self, text: &str, reference: NaiveDateTime) -> Result<Vec<RecognizedDate>>;
}

// --- RESOLVER ---

/// Resolves the single due date of a transcript.
///
/// Only the first recognised phrase counts. "end of ..." and "tonight" pin the
/// time to the last millisecond of the day. A date that still lands before
/// the reference day is moved to the same day of next year. Recognizer
/// failures are logged and treated as "no date".
pub fn resolve_due_date(
    recognizer: &dyn DateRecognizer,
    text: &str,
    reference: NaiveDateTime,
) -> Option<NaiveDate> {
    let spans = match recognizer.recognize(text, reference) {
        Ok(spans) => spans,
        Err(e) => {
            log::warn!("Could not resolve a due date from '{}': {:#}", text, e);
            return None;
        }
    };
    let first = spans.into_iter().min_by_key(|s| s.start)?;
    log::debug!("Due date phrase '{}' -> {}", first.text, first.value);

    let mut value = first.value;
    let lower = text.to_lowercase();
    if lower.contains("end of") || lower.contains("tonight") {
        value = value.date().and_time(end_of_day());
    }

    let today = reference.date();
    let date = value.date();
    if date < today {
        return Some(roll_to_year(date, today.year() + 1));
    }
    Some(date)
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

/// Same month and day in `year`; Feb 29 overflows into Mar 1.
fn roll_to_year(date: NaiveDate, year: i32) -> NaiveDate {
    date.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .unwrap_or(date)
}

// --- BUILT-IN RECOGNIZER ---

const WEEKDAYS: &str = "monday|tuesday|wednesday|thursday|friday|saturday|sunday";
const MONTHS: &str = "january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec";
const AMOUNT: &str = r"\d+|an|a|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve";
const UNIT: &str = r"minutes?|mins?|hours?|hrs?|days?|weeks?|months?|years?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolved {
    Date(NaiveDate, Option<NaiveTime>),
    Time(NaiveTime),
}

type Resolve = fn(&Captures<'_>, NaiveDateTime) -> Result<Option<Resolved>>;

struct Rule {
    name: &'static str,
    pattern: Regex,
    resolve: Resolve,
}

fn rule(name: &'static str, pattern: &str, resolve: Resolve) -> Rule {
    Rule {
        name,
        pattern: Regex::new(&format!("(?i){}", pattern)).unwrap(),
        resolve,
    }
}

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        rule(
            "relative_day",
            r"\b(day\s+after\s+tomorrow|today|tonight|tomorrow|tmrw|yesterday)\b",
            resolve_relative_day,
        ),
        rule(
            "end_of",
            r"\bend\s+of\s+(?:the\s+)?(?:(this|next)\s+)?(day|week|month|year)\b",
            resolve_end_of,
        ),
        rule(
            "weekend",
            r"\b(?:(this|next|coming)\s+)?weekend\b",
            resolve_weekend,
        ),
        rule("next_unit", r"\bnext\s+(week|month|year)\b", resolve_next_unit),
        rule(
            "weekday",
            &format!(r"\b(?:(this|next|coming)\s+)?({})\b", WEEKDAYS),
            resolve_weekday,
        ),
        rule(
            "in_amount",
            &format!(
                r"\b(?:in|within)\s+(?P<amount>{})\s+(?P<unit>{})\b",
                AMOUNT, UNIT
            ),
            resolve_amount,
        ),
        rule(
            "amount_from_now",
            &format!(
                r"\b(?P<amount>{})\s+(?P<unit>{})\s+from\s+now\b",
                AMOUNT, UNIT
            ),
            resolve_amount,
        ),
        rule(
            "month_day",
            &format!(
                r"\b(?P<month>{})\.?\s+(?P<day>\d{{1,2}})(?:st|nd|rd|th)?\b(?:,?\s+(?P<year>\d{{4}})\b)?",
                MONTHS
            ),
            resolve_calendar,
        ),
        rule(
            "day_month",
            &format!(
                r"\b(?P<day>\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?(?P<month>{})\b(?:,?\s+(?P<year>\d{{4}})\b)?",
                MONTHS
            ),
            resolve_calendar,
        ),
        rule(
            "iso",
            r"\b(?P<year>\d{4})-(?P<month>\d{1,2})-(?P<day>\d{1,2})\b",
            resolve_calendar,
        ),
        rule(
            "slash",
            r"\b(?P<month>\d{1,2})/(?P<day>\d{1,2})(?:/(?P<year>\d{4}|\d{2}))?\b",
            resolve_calendar,
        ),
        rule(
            "clock_12h",
            r"\b(?:at\s+)?(?P<hour>\d{1,2})(?::(?P<minute>\d{2}))?\s*(?P<meridiem>am|pm)\b",
            resolve_clock,
        ),
        rule(
            "clock_24h",
            r"\b(?:at\s+)?(?P<hour>\d{1,2}):(?P<minute>\d{2})\b",
            resolve_clock,
        ),
        rule(
            "noon_midnight",
            r"\b(?:at\s+)?(noon|midnight)\b",
            resolve_noon_midnight,
        ),
    ]
});

/// Gap allowed between a date phrase and a following time phrase.
static DATE_TIME_GAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*,?\s*(?:at|@)?\s*$").unwrap());
/// Gap allowed between a time phrase and a following date phrase.
static TIME_DATE_GAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*,?\s*(?:on)?\s*$").unwrap());

#[derive(Debug, Clone, Copy)]
struct Candidate {
    start: usize,
    end: usize,
    resolved: Resolved,
}

/// Rule-based recognizer for common English date and time phrases.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhraseRecognizer;

impl PhraseRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl DateRecognizer for PhraseRecognizer {
    fn recognize(&self, text: &str, reference: NaiveDateTime) -> Result<Vec<RecognizedDate>> {
        let mut candidates = Vec::new();
        let mut failures = Vec::new();
        for rule in RULES.iter() {
            for caps in rule.pattern.captures_iter(text) {
                let Some(m) = caps.get(0) else { continue };
                match (rule.resolve)(&caps, reference) {
                    Ok(Some(resolved)) => candidates.push(Candidate {
                        start: m.start(),
                        end: m.end(),
                        resolved,
                    }),
                    Ok(None) => {}
                    Err(e) => failures.push((
                        m.start(),
                        m.end(),
                        e.context(format!("{} phrase '{}'", rule.name, m.as_str())),
                    )),
                }
            }
        }

        // Earliest start wins, then the longest phrase.
        candidates.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
        let mut selected: Vec<Candidate> = Vec::new();
        for c in candidates {
            if selected.last().is_none_or(|last| c.start >= last.end) {
                selected.push(c);
            }
        }

        // A phrase that failed to resolve only matters if it would have
        // come first.
        failures.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
        let first = selected.first().map(|c| (c.start, c.end));
        let leading = failures.iter().position(|(start, end, _)| {
            first.is_none_or(|(s, e)| *start < s || (*start == s && *end > e))
        });
        if let Some(idx) = leading {
            return Err(failures.swap_remove(idx).2);
        }
        for (_, _, e) in &failures {
            log::debug!("Ignoring later date phrase: {:#}", e);
        }

        let merged = merge_date_and_time(text, selected);
        Ok(merged
            .into_iter()
            .map(|c| RecognizedDate {
                start: c.start,
                end: c.end,
                text: text[c.start..c.end].to_string(),
                value: to_instant(c.resolved, reference),
            })
            .collect())
    }
}

/// Joins "friday at 3pm" and "3pm on friday" into one phrase.
fn merge_date_and_time(text: &str, selected: Vec<Candidate>) -> Vec<Candidate> {
    let mut out: Vec<Candidate> = Vec::with_capacity(selected.len());
    let mut iter = selected.into_iter().peekable();
    while let Some(current) = iter.next() {
        let Some(next) = iter.peek().copied() else {
            out.push(current);
            break;
        };
        let gap = &text[current.end..next.start];
        let joined = match (current.resolved, next.resolved) {
            (Resolved::Date(d, None), Resolved::Time(t)) if DATE_TIME_GAP.is_match(gap) => {
                Some(Resolved::Date(d, Some(t)))
            }
            (Resolved::Time(t), Resolved::Date(d, None)) if TIME_DATE_GAP.is_match(gap) => {
                Some(Resolved::Date(d, Some(t)))
            }
            _ => None,
        };
        match joined {
            Some(resolved) => {
                iter.next();
                out.push(Candidate {
                    start: current.start,
                    end: next.end,
                    resolved,
                });
            }
            None => out.push(current),
        }
    }
    out
}

fn to_instant(resolved: Resolved, reference: NaiveDateTime) -> NaiveDateTime {
    match resolved {
        Resolved::Date(d, Some(t)) => d.and_time(t),
        Resolved::Date(d, None) => d.and_time(implied_time()),
        Resolved::Time(t) => {
            let today = reference.date();
            if t > reference.time() {
                today.and_time(t)
            } else {
                today.succ_opt().unwrap_or(today).and_time(t)
            }
        }
    }
}

fn implied_time() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)
}

// --- RULE RESOLVERS ---

fn shift_days(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    let delta = Duration::try_days(days).ok_or_else(|| anyhow!("{} days is out of range", days))?;
    date.checked_add_signed(delta)
        .ok_or_else(|| anyhow!("{} shifted by {} days is out of range", date, days))
}

fn shift_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| anyhow!("{} shifted by {} months is out of range", date, months))
}

fn days_until(from: Weekday, target: Weekday) -> i64 {
    let from = from.num_days_from_monday() as i64;
    let target = target.num_days_from_monday() as i64;
    (target - from).rem_euclid(7)
}

fn modifier(caps: &Captures<'_>, idx: usize) -> Option<String> {
    caps.get(idx).map(|m| m.as_str().to_lowercase())
}

fn resolve_relative_day(caps: &Captures<'_>, reference: NaiveDateTime) -> Result<Option<Resolved>> {
    let today = reference.date();
    let word = caps[1].to_lowercase();
    let resolved = match word.as_str() {
        "today" => Resolved::Date(today, None),
        "tonight" => Resolved::Date(today, NaiveTime::from_hms_opt(22, 0, 0)),
        "tomorrow" | "tmrw" => Resolved::Date(shift_days(today, 1)?, None),
        "yesterday" => Resolved::Date(shift_days(today, -1)?, None),
        _ => Resolved::Date(shift_days(today, 2)?, None),
    };
    Ok(Some(resolved))
}

fn resolve_weekday(caps: &Captures<'_>, reference: NaiveDateTime) -> Result<Option<Resolved>> {
    let Some(target) = parse_weekday(&caps[2]) else {
        return Ok(None);
    };
    let today = reference.date();
    let mut ahead = days_until(today.weekday(), target);
    if ahead == 0 && modifier(caps, 1).as_deref() == Some("next") {
        ahead = 7;
    }
    Ok(Some(Resolved::Date(shift_days(today, ahead)?, None)))
}

fn resolve_weekend(caps: &Captures<'_>, reference: NaiveDateTime) -> Result<Option<Resolved>> {
    let today = reference.date();
    let mut ahead = match today.weekday() {
        Weekday::Sat | Weekday::Sun => 0,
        wd => days_until(wd, Weekday::Sat),
    };
    if modifier(caps, 1).as_deref() == Some("next") {
        ahead += 7;
    }
    Ok(Some(Resolved::Date(shift_days(today, ahead)?, None)))
}

fn resolve_next_unit(caps: &Captures<'_>, reference: NaiveDateTime) -> Result<Option<Resolved>> {
    let today = reference.date();
    let date = match caps[1].to_lowercase().as_str() {
        "week" => shift_days(today, 7)?,
        "month" => shift_months(today, 1)?,
        _ => shift_months(today, 12)?,
    };
    Ok(Some(Resolved::Date(date, None)))
}

fn resolve_end_of(caps: &Captures<'_>, reference: NaiveDateTime) -> Result<Option<Resolved>> {
    let today = reference.date();
    let next = modifier(caps, 1).as_deref() == Some("next");
    let date = match caps[2].to_lowercase().as_str() {
        "day" => {
            if next {
                shift_days(today, 1)?
            } else {
                today
            }
        }
        "week" => {
            let sunday = shift_days(today, 6 - today.weekday().num_days_from_monday() as i64)?;
            if next { shift_days(sunday, 7)? } else { sunday }
        }
        "month" => {
            let first = today.with_day(1).unwrap_or(today);
            let months = if next { 2 } else { 1 };
            shift_days(shift_months(first, months)?, -1)?
        }
        _ => {
            let year = if next { today.year() + 1 } else { today.year() };
            NaiveDate::from_ymd_opt(year, 12, 31)
                .ok_or_else(|| anyhow!("year {} is out of range", year))?
        }
    };
    Ok(Some(Resolved::Date(date, None)))
}

fn resolve_amount(caps: &Captures<'_>, reference: NaiveDateTime) -> Result<Option<Resolved>> {
    let amount = parse_amount(&caps["amount"])?;
    let unit = caps["unit"].to_lowercase();
    let resolved = if unit.starts_with("min") || unit.starts_with('h') {
        let delta = if unit.starts_with("min") {
            Duration::try_minutes(amount as i64)
        } else {
            Duration::try_hours(amount as i64)
        }
        .ok_or_else(|| anyhow!("{} {} is out of range", amount, unit))?;
        let at = reference
            .checked_add_signed(delta)
            .ok_or_else(|| anyhow!("{} {} from now is out of range", amount, unit))?;
        Resolved::Date(at.date(), Some(at.time()))
    } else if unit.starts_with('d') {
        Resolved::Date(shift_days(reference.date(), amount as i64)?, None)
    } else if unit.starts_with('w') {
        Resolved::Date(shift_days(reference.date(), amount as i64 * 7)?, None)
    } else if unit.starts_with("mo") {
        Resolved::Date(shift_months(reference.date(), amount)?, None)
    } else {
        let months = amount
            .checked_mul(12)
            .ok_or_else(|| anyhow!("{} years is out of range", amount))?;
        Resolved::Date(shift_months(reference.date(), months)?, None)
    };
    Ok(Some(resolved))
}

fn resolve_calendar(caps: &Captures<'_>, reference: NaiveDateTime) -> Result<Option<Resolved>> {
    let month_raw = &caps["month"];
    let month = match month_raw.parse::<u32>() {
        Ok(m) => m,
        Err(_) => match parse_month(month_raw) {
            Some(m) => m,
            None => return Ok(None),
        },
    };
    let Ok(day) = caps["day"].parse::<u32>() else {
        return Ok(None);
    };

    if let Some(year) = caps.name("year") {
        let Ok(mut year) = year.as_str().parse::<i32>() else {
            return Ok(None);
        };
        if year < 100 {
            year += 2000;
        }
        return Ok(NaiveDate::from_ymd_opt(year, month, day).map(|d| Resolved::Date(d, None)));
    }

    // No year given: the next occurrence on or after today.
    let today = reference.date();
    let found = (today.year()..=today.year() + 8)
        .filter_map(|y| NaiveDate::from_ymd_opt(y, month, day))
        .find(|d| *d >= today);
    Ok(found.map(|d| Resolved::Date(d, None)))
}

fn resolve_clock(caps: &Captures<'_>, _reference: NaiveDateTime) -> Result<Option<Resolved>> {
    let Ok(hour) = caps["hour"].parse::<u32>() else {
        return Ok(None);
    };
    let minute = match caps.name("minute") {
        Some(m) => match m.as_str().parse::<u32>() {
            Ok(m) => m,
            Err(_) => return Ok(None),
        },
        None => 0,
    };
    let hour = match caps.name("meridiem").map(|m| m.as_str().to_lowercase()) {
        Some(meridiem) => {
            if !(1..=12).contains(&hour) {
                return Ok(None);
            }
            match (meridiem.as_str(), hour) {
                ("am", 12) => 0,
                ("am", h) => h,
                ("pm", 12) => 12,
                (_, h) => h + 12,
            }
        }
        None => hour,
    };
    Ok(NaiveTime::from_hms_opt(hour, minute, 0).map(Resolved::Time))
}

fn resolve_noon_midnight(
    caps: &Captures<'_>,
    _reference: NaiveDateTime,
) -> Result<Option<Resolved>> {
    let hour = if caps[1].eq_ignore_ascii_case("noon") { 12 } else { 0 };
    Ok(NaiveTime::from_hms_opt(hour, 0, 0).map(Resolved::Time))
}

// --- WORD HELPERS ---

fn parse_amount(s: &str) -> Result<u32> {
    let n = match s.to_lowercase().as_str() {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        other => other
            .parse::<u32>()
            .with_context(|| format!("'{}' is not a usable amount", other))?,
    };
    Ok(n)
}

fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.to_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

fn parse_month(s: &str) -> Option<u32> {
    let lower = s.to_lowercase();
    let m = match lower.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(m)
}
