//! Error types for reading schedule files.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a scheduling run.
///
/// Invalid meeting times and time conflicts are not errors; they end up in the
/// schedule's report instead.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Schedule file missing or unreadable
    #[error("cannot read schedule file {}: {source}", .path.display())]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Field count does not match the ONLINE/TBA markers, or a field is empty
    #[error("FILE FORMATTING ERROR: line {line}: {reason}")]
    MalformedScheduleLine { line: u64, reason: String },

    /// Day letter outside M, T, W, R, F, S
    #[error("FILE FORMATTING ERROR: line {line}: unknown weekday code '{code}'")]
    UnknownWeekdayCode { line: u64, code: char },

    /// Time not in "h:mm AM|PM" form
    #[error("FILE FORMATTING ERROR: line {line}: invalid time '{value}', expected h:mm AM|PM")]
    InvalidTimeFormat { line: u64, value: String },

    /// Credit count is not a non-negative integer
    #[error("FILE FORMATTING ERROR: line {line}: invalid credit count '{value}'")]
    InvalidCredits { line: u64, value: String },

    /// CSV tokenizer failure (bad quoting, invalid UTF-8)
    #[error("FILE FORMATTING ERROR: {0}")]
    Csv(#[from] csv::Error),
}

impl ScheduleError {
    /// Process exit status for every input error
    pub const EXIT_CODE: u8 = 22;

    pub fn exit_code(&self) -> u8 {
        Self::EXIT_CODE
    }

    /// Returns true if the input could not be found, as opposed to being malformed.
    pub fn is_unreadable(&self) -> bool {
        matches!(self, ScheduleError::UnreadableFile { .. })
    }

    pub(crate) fn malformed(line: u64, reason: impl Into<String>) -> Self {
        ScheduleError::MalformedScheduleLine {
            line,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_line() {
        let err = ScheduleError::UnknownWeekdayCode { line: 4, code: 'X' };
        assert_eq!(
            err.to_string(),
            "FILE FORMATTING ERROR: line 4: unknown weekday code 'X'"
        );
        assert_eq!(err.exit_code(), 22);
        assert!(!err.is_unreadable());
    }

    #[test]
    fn unreadable_file_mentions_path() {
        let err = ScheduleError::UnreadableFile {
            path: PathBuf::from("files/missing.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("files/missing.csv"));
        assert!(err.is_unreadable());
    }
}
