/// Builds a [`Row`](crate::stmt::Row) from a list of expressions convertible
/// into [`Value`](crate::stmt::Value).
///
/// ```
/// use nestload_core::{row, stmt::Value};
///
/// let r = row![1, "https://blog0.com", Value::Null];
/// assert_eq!(r.len(), 3);
/// ```
#[macro_export]
macro_rules! row {
    ( $( $value:expr ),* $(,)? ) => {
        $crate::stmt::Row::from_vec(vec![ $( $crate::stmt::Value::from($value) ),* ])
    };
}

/// Returns early with an ad hoc [`Error`](crate::Error) built from a format
/// string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Creates an ad hoc [`Error`](crate::Error) from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}
