use serde::Serialize;

use super::calendar::{format_month_day, weekday_index, WEEKDAYS};
use crate::meals::{Macros, MealRecord};

/// Macro totals for one weekday bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyMacroSummary {
    pub day: &'static str,
    #[serde(flatten)]
    pub totals: Macros,
    /// `MM/DD` of the last record added to this bucket, empty when none.
    pub formatted_date: String,
}

impl DailyMacroSummary {
    fn empty(day: &'static str) -> Self {
        Self {
            day,
            totals: Macros::default(),
            formatted_date: String::new(),
        }
    }
}

/// Buckets meals by weekday and sums their macros.
///
/// Always yields seven buckets in `Sun..Sat` order. Date filtering belongs to
/// the caller's query; records landing on the same weekday are summed and the
/// later one in iteration order sets `formatted_date`.
pub fn weekly_summary<'a, I>(records: I) -> [DailyMacroSummary; 7]
where
    I: IntoIterator<Item = &'a MealRecord>,
{
    let mut days = WEEKDAYS.map(DailyMacroSummary::empty);
    for record in records {
        let bucket = &mut days[weekday_index(record.created_at)];
        bucket.totals += record.macros().sanitized();
        bucket.formatted_date = format_month_day(record.created_at);
    }
    days
}
