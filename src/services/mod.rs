// src/services/mod.rs

pub mod attendance;
pub mod ledger;
pub mod registry;
pub mod scores;

pub use attendance::AttendanceLog;
pub use ledger::AnswerLedger;
pub use registry::QuestionRegistry;
pub use scores::ScoreBook;
