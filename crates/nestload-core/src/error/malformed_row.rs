use super::Error;

/// Error when a joined row breaks null propagation.
///
/// Once a level's key is null every deeper level's key must be null too, and
/// the root level's key is never null.
#[derive(Debug)]
pub(super) struct MalformedRow {
    level: &'static str,
    key: Option<i64>,
    row: usize,
}

impl std::error::Error for MalformedRow {}

impl core::fmt::Display for MalformedRow {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.key {
            Some(key) => write!(
                f,
                "malformed row {}: {} key {} present below a null parent level",
                self.row, self.level, key
            ),
            None => write!(
                f,
                "malformed row {}: {} key is null on a required level",
                self.row, self.level
            ),
        }
    }
}

impl Error {
    /// Creates a malformed row error.
    ///
    /// `key` is the offending key, or `None` when a required level's key was
    /// null. `row` is the zero-based position of the row in its stream.
    pub fn malformed_row(level: &'static str, key: Option<i64>, row: usize) -> Error {
        Error::from(super::ErrorKind::MalformedRow(MalformedRow { level, key, row }))
    }

    /// Returns `true` if this error is a malformed row error.
    pub fn is_malformed_row(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::MalformedRow(_)))
    }
}
