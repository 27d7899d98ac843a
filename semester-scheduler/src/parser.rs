use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::Weekday;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ScheduleError;
use crate::schedule::time_utils::{parse_clock, weekday_from_code};
use crate::schedule::{CourseMeeting, MeetingSlot, TimeSpan};

/// Columns before the meeting time fields: name, title, credits, location
const FIXED_FIELDS: usize = 4;

/// Where a course meets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    /// Building and room, e.g. "Hall 101"
    Room(String),
    Online,
    Tba,
}

/// One `days-start-end` field, e.g. "MW-9:00 AM-10:15 AM"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingTime {
    pub days: Vec<Weekday>,
    pub span: TimeSpan,
}

/// One tokenized input line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCourseLine {
    pub name: String,
    pub title: String,
    pub credits: u32,
    pub location: Location,
    pub times: Vec<MeetingTime>,
}

impl ParsedCourseLine {
    /// Builds one meeting per day letter of every time field.
    ///
    /// ONLINE and TBA lines yield a single unplaced meeting.
    pub fn meetings(&self) -> Vec<CourseMeeting> {
        let room = match &self.location {
            Location::Online => return vec![self.meeting("ONLINE", MeetingSlot::Online)],
            Location::Tba => return vec![self.meeting("TBA", MeetingSlot::Tba)],
            Location::Room(room) => room,
        };

        self.times
            .iter()
            .flat_map(|time| {
                time.days.iter().map(move |&day| MeetingSlot::Weekly {
                    day,
                    span: time.span,
                })
            })
            .map(|slot| self.meeting(room, slot))
            .collect()
    }

    fn meeting(&self, location: &str, slot: MeetingSlot) -> CourseMeeting {
        CourseMeeting::new(&self.name, &self.title, self.credits, location, slot)
    }
}

/// Loads every course line from a schedule file
pub fn load_course_lines<P: AsRef<Path>>(path: P) -> Result<Vec<ParsedCourseLine>, ScheduleError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ScheduleError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_course_lines(file)
}

/// Tokenizes comma-delimited course lines.
///
/// Blank lines are skipped. The first malformed line aborts the whole read.
pub fn parse_course_lines<R: Read>(reader: R) -> Result<Vec<ParsedCourseLine>, ScheduleError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut lines = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(idx as u64 + 1);
        lines.push(parse_record(&record, line)?);
    }

    debug!(count = lines.len(), "parsed course lines");
    Ok(lines)
}

fn parse_record(record: &StringRecord, line: u64) -> Result<ParsedCourseLine, ScheduleError> {
    if record.len() < FIXED_FIELDS {
        return Err(ScheduleError::malformed(
            line,
            format!("expected at least {} fields, found {}", FIXED_FIELDS, record.len()),
        ));
    }

    let field = |idx: usize, what: &str| -> Result<String, ScheduleError> {
        let value = record.get(idx).unwrap_or("");
        if value.is_empty() {
            Err(ScheduleError::malformed(line, format!("missing {}", what)))
        } else {
            Ok(value.to_string())
        }
    };

    let name = field(0, "course name")?;
    let title = field(1, "course title")?;
    let credits_raw = field(2, "credit count")?;
    let credits = credits_raw
        .parse::<u32>()
        .map_err(|_| ScheduleError::InvalidCredits {
            line,
            value: credits_raw.clone(),
        })?;
    let location = parse_location(&field(3, "location")?);

    let time_fields: Vec<&str> = record.iter().skip(FIXED_FIELDS).collect();
    match (&location, time_fields.len()) {
        (Location::Online | Location::Tba, 0) => {}
        (Location::Online | Location::Tba, n) => {
            return Err(ScheduleError::malformed(
                line,
                format!("ONLINE/TBA course cannot list {} meeting time(s)", n),
            ));
        }
        (Location::Room(_), 0) => {
            return Err(ScheduleError::malformed(line, "no meeting times listed"));
        }
        (Location::Room(_), _) => {}
    }

    let times = time_fields
        .into_iter()
        .map(|value| parse_meeting_time(value, line))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ParsedCourseLine {
        name,
        title,
        credits,
        location,
        times,
    })
}

fn parse_location(value: &str) -> Location {
    match value {
        "ONLINE" => Location::Online,
        "TBA" => Location::Tba,
        // Collapse "Hall   101" to "Hall 101"
        room => Location::Room(room.split_whitespace().collect::<Vec<_>>().join(" ")),
    }
}

fn parse_meeting_time(value: &str, line: u64) -> Result<MeetingTime, ScheduleError> {
    let mut parts = value.splitn(3, '-');
    let (days, start, end) = match (parts.next(), parts.next(), parts.next()) {
        (Some(days), Some(start), Some(end)) if !days.trim().is_empty() => (days.trim(), start, end),
        _ => {
            return Err(ScheduleError::malformed(
                line,
                format!("meeting time '{}' is not days-start-end", value),
            ));
        }
    };

    let days = days
        .chars()
        .map(|code| weekday_from_code(code).ok_or(ScheduleError::UnknownWeekdayCode { line, code }))
        .collect::<Result<Vec<_>, _>>()?;

    let clock = |raw: &str| {
        parse_clock(raw).ok_or_else(|| ScheduleError::InvalidTimeFormat {
            line,
            value: raw.trim().to_string(),
        })
    };

    Ok(MeetingTime {
        days,
        span: TimeSpan::new(clock(start)?, clock(end)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use std::io::Write;

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn parses_room_course_with_two_time_fields() {
        let input = "CS101,Intro to Programming,3,Hall 101,MW-9:00 AM-10:00 AM,F-1:00 PM-2:30 PM\n";
        let lines = parse_course_lines(input.as_bytes()).unwrap();

        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert_eq!(line.name, "CS101");
        assert_eq!(line.title, "Intro to Programming");
        assert_eq!(line.credits, 3);
        assert_eq!(line.location, Location::Room("Hall 101".to_string()));
        assert_eq!(line.times[0].days, vec![Weekday::Mon, Weekday::Wed]);
        assert_eq!(line.times[1].span, TimeSpan::new(time(13, 0), time(14, 30)));
    }

    #[test]
    fn fans_out_one_meeting_per_day() {
        let input = "CS101,Intro,3,Hall101,MWF-9:00 AM-9:50 AM,R-2:00 PM-3:00 PM";
        let lines = parse_course_lines(input.as_bytes()).unwrap();
        let meetings = lines[0].meetings();

        let days: Vec<Weekday> = meetings
            .iter()
            .filter_map(|m| match m.slot {
                MeetingSlot::Weekly { day, .. } => Some(day),
                _ => None,
            })
            .collect();
        assert_eq!(days, [Weekday::Mon, Weekday::Wed, Weekday::Fri, Weekday::Thu]);
        assert!(meetings.iter().all(|m| m.name == "CS101" && m.location == "Hall101"));
        assert!(meetings.iter().all(|m| m.conflict_with.is_none()));
    }

    #[test]
    fn online_and_tba_lines() {
        let input = "ART100,Studio,2,ONLINE\n\nHIS200,History,3,TBA\n";
        let lines = parse_course_lines(input.as_bytes()).unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].meetings()[0].slot, MeetingSlot::Online);
        assert_eq!(lines[0].meetings()[0].location, "ONLINE");
        assert_eq!(lines[1].meetings()[0].slot, MeetingSlot::Tba);
    }

    #[test]
    fn online_with_times_is_malformed() {
        let input = "ART100,Studio,2,ONLINE,M-9:00 AM-10:00 AM";
        let err = parse_course_lines(input.as_bytes()).unwrap_err();
        assert!(matches!(err, ScheduleError::MalformedScheduleLine { line: 1, .. }));
    }

    #[test]
    fn room_without_times_is_malformed() {
        let input = "CS101,Intro,3,Hall101\nCS102,Data,3,Hall102";
        let err = parse_course_lines(input.as_bytes()).unwrap_err();
        assert!(matches!(err, ScheduleError::MalformedScheduleLine { line: 1, .. }));
    }

    #[test]
    fn too_few_fields_is_malformed() {
        let err = parse_course_lines("CS101,Intro".as_bytes()).unwrap_err();
        assert!(matches!(err, ScheduleError::MalformedScheduleLine { .. }));
    }

    #[test]
    fn unknown_weekday_reports_line_and_code() {
        let input = "CS101,Intro,3,Hall101,M-9:00 AM-10:00 AM\nCS102,Data,3,Hall102,MX-9:00 AM-10:00 AM";
        let err = parse_course_lines(input.as_bytes()).unwrap_err();
        assert!(matches!(err, ScheduleError::UnknownWeekdayCode { line: 2, code: 'X' }));
    }

    #[test]
    fn bad_time_and_bad_credits() {
        let err = parse_course_lines("CS101,Intro,3,Hall101,M-9 AM-10:00 AM".as_bytes()).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidTimeFormat { ref value, .. } if value == "9 AM"));

        let err = parse_course_lines("CS101,Intro,three,Hall101,M-9:00 AM-10:00 AM".as_bytes()).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidCredits { .. }));
    }

    #[test]
    fn missing_time_separator_is_malformed() {
        let err = parse_course_lines("CS101,Intro,3,Hall101,M 9:00 AM".as_bytes()).unwrap_err();
        assert!(matches!(err, ScheduleError::MalformedScheduleLine { .. }));
    }

    #[test]
    fn loads_from_disk_and_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("week.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "CS101,Intro,3,Hall101,TR-11:00 AM-12:15 PM").unwrap();

        let lines = load_course_lines(&path).unwrap();
        assert_eq!(lines[0].times[0].days, vec![Weekday::Tue, Weekday::Thu]);

        let err = load_course_lines(dir.path().join("nope.csv")).unwrap_err();
        assert!(err.is_unreadable());
    }
}
