use super::types::{CourseMeeting, TimeSpan};

/// Returns true when two closed intervals share at least one instant.
///
/// Shared endpoints count: a class ending at 10:00 collides with one starting
/// at 10:00.
pub fn conflicts(a: &TimeSpan, b: &TimeSpan) -> bool {
    a.start <= b.end && b.start <= a.end
}

/// Finds the first accepted meeting in `bucket` that collides with `span`
pub fn first_conflict<'a>(bucket: &'a [CourseMeeting], span: &TimeSpan) -> Option<&'a CourseMeeting> {
    bucket
        .iter()
        .find(|accepted| accepted.span().is_some_and(|s| conflicts(&s, span)))
}
