use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{NaiveTime, Timelike, Weekday};

use crate::report::render_report;
use crate::schedule::time_utils::{day_name, format_clock, format_walking_time, minutes_between};
use crate::schedule::{CourseMeeting, TimeSpan, WeekSchedule};

/// Minimum room reserved for course names in the left column
pub const NAME_COLUMN_WIDTH: usize = 10;

/// Spaces between the name column and the timeline
const GUTTER_PADDING: usize = 4;

/// Each timeline character stands for five minutes
const MINUTES_PER_DOT: i64 = 5;

/// Columns per hour on the scale line
const DOTS_PER_HOUR: usize = 12;

const MEETING_TIMES_CAPTION: &str = "---------MEETING TIMES--------";
const WALKING_TIMES_CAPTION: &str = "---------------WALKING TIMES-----------";

/// Lays out one weekday's accepted meetings as an ASCII time grid
#[derive(Debug, Clone, Copy)]
pub struct TimelineRenderer {
    gutter: usize,
}

impl TimelineRenderer {
    /// Sizes the name column for the longest course name in the week so that
    /// every day's grid starts at the same column.
    pub fn for_schedule(schedule: &WeekSchedule) -> Self {
        Self::with_name_width(schedule.longest_name())
    }

    pub fn with_name_width(longest_name: usize) -> Self {
        Self {
            gutter: longest_name.max(NAME_COLUMN_WIDTH) + GUTTER_PADDING,
        }
    }

    /// Renders a day block: header, hour scale, then one line per meeting.
    ///
    /// `meetings` must already be sorted by start time. Returns an empty
    /// string for a day without timed meetings.
    pub fn render_day(&self, day: Weekday, meetings: &[CourseMeeting]) -> String {
        let placed: Vec<(&CourseMeeting, TimeSpan)> = meetings
            .iter()
            .filter_map(|m| m.span().map(|span| (m, span)))
            .collect();

        let (first, last) = match (placed.first(), placed.last()) {
            (Some(first), Some(last)) => (first.1, last.1),
            _ => return String::new(),
        };
        let earliest = first.start;
        let range = dots_between(earliest, last.end);

        let mut out = self.header(day, range, placed.len());
        out.push('\n');
        out.push_str(&self.scale(earliest, range));
        out.push('\n');

        for (idx, (meeting, span)) in placed.iter().enumerate() {
            out.push_str(&self.timeline(meeting, span, earliest, range));
            if let Some((next, next_span)) = placed.get(idx + 1) {
                out.push_str(&walking_segment(meeting, span, next, next_span));
            }
            out.push('\n');
        }
        out
    }

    fn header(&self, day: Weekday, range: usize, meeting_count: usize) -> String {
        let label = day_name(day).to_uppercase();
        let filler = range.saturating_sub(label.len() + GUTTER_PADDING);

        let mut header = format!("\n----{}", label);
        header.push_str(&"-".repeat(self.gutter + filler));
        header.push_str(MEETING_TIMES_CAPTION);
        if meeting_count > 1 {
            header.push_str(WALKING_TIMES_CAPTION);
        }
        header
    }

    fn scale(&self, earliest: NaiveTime, range: usize) -> String {
        let mut scale = " ".repeat(self.gutter);
        let (_, mut hour) = earliest.hour12();

        for _ in 0..=(range / DOTS_PER_HOUR) {
            let label = hour.to_string();
            scale.push_str(&label);
            // Label plus padding spans exactly one hour of dots
            scale.push_str(&" ".repeat(DOTS_PER_HOUR - label.len()));
            hour = if hour == 12 { 1 } else { hour + 1 };
        }
        scale
    }

    fn timeline(&self, meeting: &CourseMeeting, span: &TimeSpan, earliest: NaiveTime, range: usize) -> String {
        let mut line = format!("{:<width$}", meeting.name, width = self.gutter);
        line.push_str(&dot_line(span, earliest, range));
        line.push_str(&format!(
            "      {} - {}",
            format_clock(span.start),
            format_clock(span.end)
        ));
        line
    }
}

/// Builds `range + 1` characters: `[` at the start, `]` at the end, `=` in
/// class and `.` while idle. A meeting shorter than one dot shows only `[`.
pub fn dot_line(span: &TimeSpan, earliest: NaiveTime, range: usize) -> String {
    let start = dots_between(earliest, span.start);
    let end = start + dots_between(span.start, span.end);

    (0..=range)
        .map(|i| {
            if i == start {
                '['
            } else if i == end {
                ']'
            } else if i < start || i > end {
                '.'
            } else {
                '='
            }
        })
        .collect()
}

fn dots_between(from: NaiveTime, to: NaiveTime) -> usize {
    (minutes_between(from, to).max(0) / MINUTES_PER_DOT) as usize
}

fn walking_segment(current: &CourseMeeting, span: &TimeSpan, next: &CourseMeeting, next_span: &TimeSpan) -> String {
    let gap = minutes_between(span.end, next_span.start);
    format!(
        "       {} from {} to {}",
        format_walking_time(gap),
        current.location,
        next.location
    )
}

/// Renders every non-empty weekday followed by the summary report
pub fn render_schedule(schedule: &WeekSchedule) -> String {
    let renderer = TimelineRenderer::for_schedule(schedule);
    let mut display = String::from("\n");

    for (day, meetings) in schedule.days() {
        display.push_str(&renderer.render_day(day, meetings));
        display.push_str("\n\n\n\n");
    }
    display.push_str(&render_report(schedule));
    display
}

/// Writes a rendered schedule to a file
pub fn write_schedule_to_file<P: AsRef<Path>>(rendered: &str, path: P) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "{}", rendered)?;
    Ok(())
}
