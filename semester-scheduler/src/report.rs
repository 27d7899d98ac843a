use std::collections::HashSet;

use crate::schedule::time_utils::format_clock;
use crate::schedule::WeekSchedule;

const SUMMARY_HEADER: &str = "----SUMMARY---------------------------";
const CONFLICTS_HEADER: &str = "----TIME CONFLICTS---------------------";
const ERRORS_HEADER: &str = "----ERRORS-----------------------------";

/// "<name> - <title>" for each accepted title, first occurrence only
pub fn summary_lines(schedule: &WeekSchedule) -> Vec<String> {
    let mut seen = HashSet::new();
    schedule
        .roster()
        .iter()
        .filter(|m| seen.insert(m.title.as_str()))
        .map(|m| format!("{} - {}", m.name, m.title))
        .collect()
}

/// "<title> conflicts with <other> on <day>" per rejected course
pub fn conflict_lines(schedule: &WeekSchedule) -> Vec<String> {
    schedule
        .conflict_log()
        .iter()
        .map(|m| {
            format!(
                "{} conflicts with {} on {}",
                m.title,
                m.conflict_with.as_deref().unwrap_or_default(),
                m.slot.day_label()
            )
        })
        .collect()
}

/// "<title> cannot last from <start> to <end>" per course with invalid times
pub fn invalid_lines(schedule: &WeekSchedule) -> Vec<String> {
    schedule
        .invalid_log()
        .iter()
        .filter_map(|m| {
            m.span().map(|span| {
                format!(
                    "{} cannot last from {} to {}",
                    m.title,
                    format_clock(span.start),
                    format_clock(span.end)
                )
            })
        })
        .collect()
}

/// Renders the trailing summary, conflict and error sections
pub fn render_report(schedule: &WeekSchedule) -> String {
    let mut report = String::new();

    report.push_str(SUMMARY_HEADER);
    report.push('\n');
    for line in summary_lines(schedule) {
        report.push_str(&line);
        report.push('\n');
    }
    report.push_str(&format!("Total Credits: {}\n", schedule.total_credits()));

    let conflicts = conflict_lines(schedule);
    if !conflicts.is_empty() {
        report.push('\n');
        report.push_str(CONFLICTS_HEADER);
        for line in conflicts {
            report.push('\n');
            report.push_str(&line);
        }
        report.push('\n');
    }

    let invalid = invalid_lines(schedule);
    if !invalid.is_empty() {
        report.push('\n');
        report.push_str(ERRORS_HEADER);
        for line in invalid {
            report.push('\n');
            report.push_str(&line);
        }
    }

    report
}
