pub mod types;
pub mod time_utils;
pub mod conflict;
pub mod builder;

pub use types::{CourseMeeting, MeetingSlot, TimeSpan, WeekSchedule};
pub use builder::build_schedule;
