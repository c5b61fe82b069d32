//! Turns flat, unordered meal and workout rows into the summaries the
//! client renders: seven weekday buckets of macros, and per-exercise history.

pub mod calendar;
pub mod nutrition;
pub mod workout;

pub use nutrition::{weekly_summary, DailyMacroSummary};
pub use workout::{ExerciseHistory, ExerciseHistoryGroup};
