use std::collections::HashMap;

use tracing::debug;

use crate::parser::ParsedCourseLine;
use super::conflict::first_conflict;
use super::time_utils::minutes_of_day;
use super::types::{bucket_index, CourseMeeting, MeetingSlot, WeekSchedule};

/// Meetings this long (in minutes) or longer are rejected
pub const MAX_MEETING_MINUTES: i64 = 5 * 60;

/// Classes may not start at or before 7:00 AM
pub const EARLIEST_START_MINUTES: u32 = 7 * 60;

/// Classes may not start at or after 11:00 PM
pub const LATEST_START_MINUTES: u32 = 23 * 60;

/// Folds course meetings into a [`WeekSchedule`], one at a time in input order
#[derive(Debug, Default)]
pub struct ScheduleBuilder {
    schedule: WeekSchedule,
    /// Credits contributed per course name, refunded on retraction
    credited: HashMap<String, u32>,
}

impl ScheduleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every meeting of a parsed line.
    ///
    /// A line whose title is already on the roster is ignored as a whole.
    pub fn add_line(&mut self, line: &ParsedCourseLine) {
        if self.schedule.roster.iter().any(|m| m.title == line.title) {
            debug!(course = %line.name, title = %line.title, "duplicate title, line ignored");
            return;
        }
        for meeting in line.meetings() {
            self.add_course(meeting);
        }
    }

    /// Evaluates one meeting: accepts it, rejects it as invalid, or rejects it
    /// as conflicting and retracts every accepted meeting of the same course.
    pub fn add_course(&mut self, mut meeting: CourseMeeting) {
        if self
            .schedule
            .roster
            .iter()
            .any(|m| m.title == meeting.title && m.slot == meeting.slot)
        {
            return;
        }

        if !has_valid_time(&meeting) {
            debug!(course = %meeting.name, "invalid meeting time");
            if !contains_name(&self.schedule.invalid_log, &meeting.name) {
                self.schedule.invalid_log.push(meeting);
            }
            return;
        }

        let (day, span) = match meeting.slot {
            MeetingSlot::Weekly { day, span } => (day, span),
            MeetingSlot::Online | MeetingSlot::Tba => {
                self.accept_unplaced(meeting);
                return;
            }
        };

        let idx = bucket_index(day);
        let rejected = if contains_name(&self.schedule.conflict_log, &meeting.name) {
            true
        } else if let Some(accepted) = first_conflict(&self.schedule.buckets[idx], &span) {
            debug!(course = %meeting.name, with = %accepted.name, day = %day, "time conflict");
            meeting.conflict_with = Some(accepted.title.clone());
            true
        } else {
            false
        };

        if rejected {
            self.reject(meeting);
        } else {
            debug!(course = %meeting.name, day = %day, "meeting accepted");
            self.credit(&meeting);
            self.schedule.buckets[idx].push(meeting.clone());
            self.schedule.roster.push(meeting);
        }
    }

    /// Sorts the buckets and hands over the finished schedule
    pub fn finish(mut self) -> WeekSchedule {
        self.schedule.sort_buckets();
        self.schedule
    }

    fn accept_unplaced(&mut self, meeting: CourseMeeting) {
        // A retracted course stays retracted, ONLINE/TBA lines included
        if contains_name(&self.schedule.conflict_log, &meeting.name) {
            return;
        }
        debug!(course = %meeting.name, slot = meeting.slot.day_label(), "unplaced meeting accepted");
        self.credit(&meeting);
        self.schedule.roster.push(meeting);
    }

    fn credit(&mut self, meeting: &CourseMeeting) {
        if !self.credited.contains_key(&meeting.name) {
            self.credited.insert(meeting.name.clone(), meeting.credits);
            self.schedule.total_credits = self.schedule.total_credits.saturating_add(u64::from(meeting.credits));
        }
    }

    fn reject(&mut self, meeting: CourseMeeting) {
        let name = meeting.name.clone();
        if !contains_name(&self.schedule.conflict_log, &name) {
            self.schedule.conflict_log.push(meeting);
        }
        self.retract(&name);
    }

    fn retract(&mut self, name: &str) {
        for bucket in self.schedule.buckets.iter_mut() {
            bucket.retain(|m| m.name != name);
        }
        let before = self.schedule.roster.len();
        self.schedule.roster.retain(|m| m.name != name);

        if let Some(credits) = self.credited.remove(name) {
            self.schedule.total_credits = self.schedule.total_credits.saturating_sub(u64::from(credits));
        }
        let removed = before - self.schedule.roster.len();
        if removed > 0 {
            debug!(course = %name, removed, "course retracted");
        }
    }
}

/// Runs every parsed line through a fresh builder, in input order
pub fn build_schedule(lines: &[ParsedCourseLine]) -> WeekSchedule {
    let mut builder = ScheduleBuilder::new();
    for line in lines {
        builder.add_line(line);
    }
    builder.finish()
}

/// Returns true if the meeting fits the allowed class window.
///
/// ONLINE and TBA meetings have no times and always pass.
pub fn has_valid_time(meeting: &CourseMeeting) -> bool {
    let span = match meeting.span() {
        Some(span) => span,
        None => return true,
    };
    let duration = span.duration_minutes();
    let start = minutes_of_day(span.start);

    duration > 0
        && duration < MAX_MEETING_MINUTES
        && start > EARLIEST_START_MINUTES
        && start < LATEST_START_MINUTES
}

fn contains_name(meetings: &[CourseMeeting], name: &str) -> bool {
    meetings.iter().any(|m| m.name == name)
}
