//! Row schema descriptors.
//!
//! A descriptor binds the columns of a flat result set to the levels of the
//! blog hierarchy. Columns are resolved by name once per result set, after
//! which every per-row read is a positional lookup.

mod level;
pub use level::{Attach, BlogLevel, Child, CommentLevel, Level, LevelColumns, LevelNames, PostLevel};

use crate::{stmt::Row, Error, Result};

/// Column names of a three-level joined row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinNames<'a> {
    pub blog: LevelNames<'a>,
    pub post: LevelNames<'a>,
    pub comment: LevelNames<'a>,
}

/// Descriptor for rows of an eager `blogs ⟕ posts ⟕ comments` join.
///
/// The blog level is required; the post and comment levels come from LEFT
/// JOINs and may be absent, in which case every deeper level must be absent
/// as well.
#[derive(Debug, Clone)]
pub struct RowSchema {
    pub blog: BlogLevel,
    pub post: PostLevel,
    pub comment: CommentLevel,
}

/// Level keys of one joined row, after null propagation has been checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKeys {
    Blog(i64),
    Post(i64, i64),
    Comment(i64, i64, i64),
}

impl RowSchema {
    /// Binds `names` against a result set's `columns`.
    pub fn resolve(columns: &[String], names: &JoinNames<'_>) -> Result<Self> {
        Ok(Self {
            blog: BlogLevel::new(LevelColumns::resolve(columns, &names.blog)?),
            post: PostLevel::new(LevelColumns::resolve(columns, &names.post)?),
            comment: CommentLevel::new(LevelColumns::resolve(columns, &names.comment)?),
        })
    }

    /// Reads the level keys of `row`, enforcing null propagation.
    ///
    /// `index` is the row's position in its stream and only feeds error
    /// messages.
    pub fn keys(&self, row: &Row, index: usize) -> Result<RowKeys> {
        let blog = self.blog.key(row)?;
        let post = self.post.key(row)?;
        let comment = self.comment.key(row)?;

        match (blog, post, comment) {
            (Some(blog), Some(post), Some(comment)) => Ok(RowKeys::Comment(blog, post, comment)),
            (Some(blog), Some(post), None) => {
                optional(&self.comment, RowKeys::Post(blog, post), index)
            }
            (Some(blog), None, None) => optional(&self.post, RowKeys::Blog(blog), index),
            (Some(_), None, Some(comment)) => {
                Err(Error::malformed_row(CommentLevel::NAME, Some(comment), index))
            }
            (None, _, _) => Err(Error::malformed_row(BlogLevel::NAME, None, index)),
        }
    }
}

/// Accepts a row that stops at the level above `level`, provided `level`
/// may be absent.
fn optional<L: Level>(level: &L, keys: RowKeys, index: usize) -> Result<RowKeys> {
    if level.columns().optional {
        Ok(keys)
    } else {
        Err(Error::malformed_row(L::NAME, None, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stmt::Value;

    const NAMES: JoinNames<'static> = JoinNames {
        blog: LevelNames {
            key: "blog_id",
            attr: "url",
            parent: None,
            owner: "blog_owner",
            optional: false,
        },
        post: LevelNames {
            key: "post_id",
            attr: "title",
            parent: Some("post_blog_id"),
            owner: "post_owner",
            optional: true,
        },
        comment: LevelNames {
            key: "comment_id",
            attr: "text",
            parent: Some("comment_post_id"),
            owner: "comment_owner",
            optional: true,
        },
    };

    fn columns() -> Vec<String> {
        [
            "blog_id",
            "url",
            "blog_owner",
            "post_id",
            "title",
            "post_blog_id",
            "post_owner",
            "comment_id",
            "text",
            "comment_post_id",
            "comment_owner",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    fn keys_row(blog: Option<i64>, post: Option<i64>, comment: Option<i64>) -> Row {
        row![
            blog,
            "u",
            "o",
            post,
            "t",
            blog,
            "o",
            comment,
            "x",
            post,
            "o"
        ]
    }

    #[test]
    fn resolves_by_name_in_any_order() {
        let mut cols = columns();
        cols.reverse();
        let schema = RowSchema::resolve(&cols, &NAMES).unwrap();
        assert_eq!(schema.blog.columns().key, 10);
        assert_eq!(schema.comment.columns().owner, 0);
    }

    #[test]
    fn missing_column_is_invalid_result() {
        let mut cols = columns();
        cols.retain(|c| c != "title");
        let err = RowSchema::resolve(&cols, &NAMES).unwrap_err();
        assert!(err.is_invalid_result());
        assert!(err.to_string().contains("`title`"));
    }

    #[test]
    fn null_propagates_downward() {
        let schema = RowSchema::resolve(&columns(), &NAMES).unwrap();

        assert_eq!(
            schema.keys(&keys_row(Some(1), Some(2), Some(3)), 0).unwrap(),
            RowKeys::Comment(1, 2, 3)
        );
        assert_eq!(
            schema.keys(&keys_row(Some(1), Some(2), None), 0).unwrap(),
            RowKeys::Post(1, 2)
        );
        assert_eq!(
            schema.keys(&keys_row(Some(1), None, None), 0).unwrap(),
            RowKeys::Blog(1)
        );

        let err = schema.keys(&keys_row(Some(1), None, Some(3)), 4).unwrap_err();
        assert!(err.is_malformed_row());
        assert_eq!(
            err.to_string(),
            "malformed row 4: comment key 3 present below a null parent level"
        );
    }

    #[test]
    fn root_key_is_required() {
        let schema = RowSchema::resolve(&columns(), &NAMES).unwrap();

        let err = schema.keys(&keys_row(None, None, None), 0).unwrap_err();
        assert!(err.is_malformed_row());

        let err = schema.keys(&keys_row(None, Some(2), None), 0).unwrap_err();
        assert!(err.is_malformed_row());
    }

    #[test]
    fn non_integer_key_is_type_conversion() {
        let schema = RowSchema::resolve(&columns(), &NAMES).unwrap();
        let mut fields = keys_row(Some(1), None, None).into_inner();
        fields[3] = Value::from("2");

        let err = schema.keys(&Row::from_vec(fields), 0).unwrap_err();
        assert!(err.is_type_conversion());
    }
}
