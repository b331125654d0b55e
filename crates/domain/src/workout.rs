use chrono::{Datelike, NaiveDateTime, Weekday};

use crate::{CreateError, ReadError, Routine, WeeklyStats};

#[allow(async_fn_in_trait)]
pub trait CompletedRoutineRepository {
    async fn read_completed_routines(&self) -> Result<Vec<CompletedRoutine>, ReadError>;
    async fn append_completed_routine(
        &self,
        completed_routine: CompletedRoutine,
    ) -> Result<CompletedRoutine, CreateError>;
}

#[allow(async_fn_in_trait)]
pub trait WorkoutService {
    /// Completed routines, newest first.
    async fn get_completed_routines(&self) -> Result<Vec<CompletedRoutine>, ReadError>;
    async fn finish_workout(
        &self,
        routine: Routine,
        now: NaiveDateTime,
    ) -> Result<CompletedRoutine, CreateError>;
    async fn get_weekly_stats(&self, now: NaiveDateTime) -> Result<WeeklyStats, ReadError>;
}

/// Record of a routine as it was actually performed.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedRoutine {
    pub routine: Routine,
    pub weight: f64,
    pub date: NaiveDateTime,
    pub day: String,
}

/// Turn a finished workout into its historical record.
#[must_use]
pub fn complete(routine: Routine, now: NaiveDateTime) -> CompletedRoutine {
    CompletedRoutine {
        weight: routine.total_weight(),
        routine,
        date: now,
        day: day_abbreviation(now.weekday()).to_string(),
    }
}

#[must_use]
pub fn day_abbreviation(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Sort newest first.
pub fn sort_newest_first(completed_routines: &mut [CompletedRoutine]) {
    completed_routines.sort_by(|a, b| b.date.cmp(&a.date));
}
