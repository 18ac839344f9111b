//! Weekday counting handler.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};

use crate::classify::TaskKind;
use crate::error::{ResolveError, ResolveResult};

use super::{Handler, TaskContext};

/// Accepted date spellings, tried in order.
const DATE_FORMATS: &[&str] = &["%B %d, %Y", "%Y-%m-%d", "%d %B %Y"];

fn parse_date(text: &str) -> ResolveResult<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .ok_or_else(|| ResolveError::Parameter(format!("unparseable date '{}'", text)))
}

/// Mondays through Fridays in the inclusive range. An inverted range counts
/// zero days rather than failing.
fn weekdays_between(start: NaiveDate, end: NaiveDate) -> usize {
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| day.weekday().number_from_monday() <= 5)
        .count()
}

/// Count the weekdays between the two captured dates.
pub struct WeekdaySpan;

#[async_trait]
impl Handler for WeekdaySpan {
    fn kind(&self) -> TaskKind {
        TaskKind::WeekdayCount
    }

    async fn run(&self, ctx: &TaskContext<'_>) -> ResolveResult<String> {
        let start = parse_date(ctx.require("start_date")?)?;
        let end = parse_date(ctx.require("end_date")?)?;
        Ok(weekdays_between(start, end).to_string())
    }
}
