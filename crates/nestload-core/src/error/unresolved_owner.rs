use super::Error;

/// Error when a record references an owner missing from the lookup table.
#[derive(Debug)]
pub(super) struct UnresolvedOwner {
    level: &'static str,
    key: i64,
    owner: Box<str>,
}

impl std::error::Error for UnresolvedOwner {}

impl core::fmt::Display for UnresolvedOwner {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unresolved owner: {} {} references owner `{}`, which is not in the lookup table",
            self.level, self.key, self.owner
        )
    }
}

impl Error {
    /// Creates an unresolved owner error for the record `key` at `level`.
    pub fn unresolved_owner(level: &'static str, key: i64, owner: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnresolvedOwner(UnresolvedOwner {
            level,
            key,
            owner: owner.into().into(),
        }))
    }

    /// Returns `true` if this error is an unresolved owner error.
    pub fn is_unresolved_owner(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::UnresolvedOwner(_)))
    }
}
