use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::time_utils::{day_name, minutes_between};

/// Closed time-of-day interval `[start, end]` of one meeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSpan {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Length in minutes. Zero or negative when the end does not come after the start.
    pub fn duration_minutes(&self) -> i64 {
        minutes_between(self.start, self.end)
    }
}

/// Where in the week a meeting takes place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MeetingSlot {
    Weekly { day: Weekday, span: TimeSpan },
    Online,
    Tba,
}

impl MeetingSlot {
    /// Day label used in reports: "Monday" ... "Saturday", "ONLINE" or "TBA"
    pub fn day_label(&self) -> &'static str {
        match self {
            MeetingSlot::Weekly { day, .. } => day_name(*day),
            MeetingSlot::Online => "ONLINE",
            MeetingSlot::Tba => "TBA",
        }
    }
}

/// One weekday occurrence of a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseMeeting {
    /// Department and number, e.g. "CS101". Retraction and credit key.
    pub name: String,
    pub title: String,
    pub credits: u32,
    pub location: String,
    pub slot: MeetingSlot,
    /// Title of the accepted meeting this one collided with, set on rejection
    pub conflict_with: Option<String>,
}

impl CourseMeeting {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        credits: u32,
        location: impl Into<String>,
        slot: MeetingSlot,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            credits,
            location: location.into(),
            slot,
            conflict_with: None,
        }
    }

    pub fn span(&self) -> Option<TimeSpan> {
        match self.slot {
            MeetingSlot::Weekly { span, .. } => Some(span),
            MeetingSlot::Online | MeetingSlot::Tba => None,
        }
    }
}

/// Number of weekday buckets, indexed by days from Monday
pub const DAYS_IN_WEEK: usize = 7;

pub(crate) fn bucket_index(day: Weekday) -> usize {
    day.num_days_from_monday() as usize
}

/// The accepted week plus everything that was turned away
#[derive(Debug, Clone, Default, Serialize)]
pub struct WeekSchedule {
    pub(crate) buckets: [Vec<CourseMeeting>; DAYS_IN_WEEK],
    pub(crate) roster: Vec<CourseMeeting>,
    pub(crate) conflict_log: Vec<CourseMeeting>,
    pub(crate) invalid_log: Vec<CourseMeeting>,
    pub(crate) total_credits: u64,
}

impl WeekSchedule {
    pub fn bucket(&self, day: Weekday) -> &[CourseMeeting] {
        &self.buckets[bucket_index(day)]
    }

    /// Non-empty weekday buckets in Monday-first order
    pub fn days(&self) -> impl Iterator<Item = (Weekday, &[CourseMeeting])> + '_ {
        (0..DAYS_IN_WEEK)
            .map(weekday_at)
            .map(|day| (day, self.bucket(day)))
            .filter(|(_, bucket)| !bucket.is_empty())
    }

    pub fn roster(&self) -> &[CourseMeeting] {
        &self.roster
    }

    pub fn conflict_log(&self) -> &[CourseMeeting] {
        &self.conflict_log
    }

    pub fn invalid_log(&self) -> &[CourseMeeting] {
        &self.invalid_log
    }

    pub fn total_credits(&self) -> u64 {
        self.total_credits
    }

    /// Length of the longest course name placed on any weekday
    pub fn longest_name(&self) -> usize {
        self.buckets
            .iter()
            .flatten()
            .map(|m| m.name.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Stable sort of every bucket by start time, ties keep insertion order
    pub(crate) fn sort_buckets(&mut self) {
        for bucket in self.buckets.iter_mut() {
            bucket.sort_by_key(|m| m.span().map(|s| s.start));
        }
    }
}

fn weekday_at(idx: usize) -> Weekday {
    match idx {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}
