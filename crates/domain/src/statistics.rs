use std::collections::BTreeSet;

use chrono::{Datelike, Days, NaiveDateTime, NaiveTime};

use crate::{CompletedRoutine, day_abbreviation};

/// Data point of the volume chart.
#[derive(Debug, Clone, PartialEq)]
pub struct LiftData {
    pub day: String,
    pub weight: f64,
}

/// How entries of the same day are presented in the weekly chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DayGrouping {
    /// One data point per completed routine.
    #[default]
    Individual,
    /// One data point per day holding the total of that day.
    Summed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Above,
    Below,
    Even,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyStats {
    pub per_day: Vec<LiftData>,
    pub average: f64,
    pub max: f64,
    pub current_day: String,
}

impl WeeklyStats {
    fn empty(now: NaiveDateTime) -> Self {
        Self {
            per_day: vec![],
            average: 0.0,
            max: 0.0,
            current_day: day_abbreviation(now.weekday()).to_string(),
        }
    }

    /// Total weight lifted on the current day.
    #[must_use]
    pub fn today_weight(&self) -> f64 {
        self.per_day
            .iter()
            .filter(|d| d.day == self.current_day)
            .map(|d| d.weight)
            .sum()
    }

    /// Compare the current day against the average of the week.
    #[must_use]
    pub fn trend(&self) -> Trend {
        let today = self.today_weight();
        if today > self.average {
            Trend::Above
        } else if today < self.average {
            Trend::Below
        } else {
            Trend::Even
        }
    }
}

/// First moment of the week (starting on Monday) containing `now`.
#[must_use]
pub fn week_start(now: NaiveDateTime) -> Option<NaiveDateTime> {
    let date = now.date();
    date.checked_sub_days(Days::new(u64::from(
        date.weekday().num_days_from_monday(),
    )))
    .map(|d| d.and_time(NaiveTime::MIN))
}

/// Aggregate the completed routines of the current week.
///
/// The average is the total weight divided by the number of distinct days with at least one
/// completed routine, so several workouts on one day do not lower the average.
#[must_use]
pub fn weekly_stats(
    completed_routines: &[CompletedRoutine],
    now: NaiveDateTime,
    grouping: DayGrouping,
) -> WeeklyStats {
    let Some(start) = week_start(now) else {
        return WeeklyStats::empty(now);
    };

    let mut entries = completed_routines
        .iter()
        .filter(|c| c.date >= start)
        .collect::<Vec<_>>();

    if entries.is_empty() {
        return WeeklyStats::empty(now);
    }

    entries.sort_by_key(|c| c.date);

    let total = entries.iter().map(|c| c.weight).sum::<f64>();
    let days = entries
        .iter()
        .map(|c| c.day.as_str())
        .collect::<BTreeSet<_>>()
        .len();
    let max = entries.iter().map(|c| c.weight).fold(0.0, f64::max);

    let per_day = match grouping {
        DayGrouping::Individual => entries
            .iter()
            .map(|c| LiftData {
                day: c.day.clone(),
                weight: c.weight,
            })
            .collect(),
        DayGrouping::Summed => {
            let mut result: Vec<LiftData> = vec![];
            for c in &entries {
                match result.iter_mut().find(|d| d.day == c.day) {
                    Some(d) => d.weight += c.weight,
                    None => result.push(LiftData {
                        day: c.day.clone(),
                        weight: c.weight,
                    }),
                }
            }
            result
        }
    };

    #[allow(clippy::cast_precision_loss)]
    let average = total / days as f64;

    WeeklyStats {
        per_day,
        average,
        max,
        current_day: day_abbreviation(now.weekday()).to_string(),
    }
}

/// The last `limit` completed routines in chronological order.
#[must_use]
pub fn recent_lift_data(completed_routines: &[CompletedRoutine], limit: usize) -> Vec<LiftData> {
    let mut entries = completed_routines.iter().collect::<Vec<_>>();
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries
        .into_iter()
        .take(limit)
        .rev()
        .map(|c| LiftData {
            day: c.day.clone(),
            weight: c.weight,
        })
        .collect()
}
