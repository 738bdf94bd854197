// File: ./src/model/mod.rs
pub mod classify;
pub mod dates;
pub mod extract;
pub mod item;
pub mod parser;

pub use dates::{DateRecognizer, PhraseRecognizer, RecognizedDate};
pub use item::{
    Confidence, ParseResponse, ParsedTaskDraft, ReviewedTask, TaskPriority, TaskStatus,
};
pub use parser::{TranscriptParser, parse, parse_value};
