use crate::{stmt::Rows, Error, Result, User};

use indexmap::IndexMap;
use std::sync::Arc;

/// Snapshot of owner records, keyed by email.
///
/// Every load builds its own table; records handed out by
/// [`resolve`](Self::resolve) share the table's allocation.
#[derive(Debug, Default, Clone)]
pub struct LookupTable {
    users: IndexMap<String, Arc<User>>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table from a result set with an `email` column.
    pub fn from_rows(rows: &Rows) -> Result<Self> {
        let email = rows.column_index("email")?;
        let mut table = Self::new();

        for row in rows {
            let Some(key) = row.get(email)?.to_opt_str()? else {
                return Err(Error::invalid_result("owner row with a null email"));
            };
            table.insert(User::new(key));
        }

        Ok(table)
    }

    /// Adds a user, returning the shared record. Inserting an email that is
    /// already present keeps the existing record.
    pub fn insert(&mut self, user: User) -> Arc<User> {
        self.users
            .entry(user.email.clone())
            .or_insert_with(|| Arc::new(user))
            .clone()
    }

    /// Returns the shared record for `email`.
    ///
    /// `level` and `key` identify the referencing record and only feed the
    /// error message.
    pub fn resolve(&self, level: &'static str, key: i64, email: &str) -> Result<&Arc<User>> {
        self.users
            .get(email)
            .ok_or_else(|| Error::unresolved_owner(level, key, email))
    }

    pub fn get(&self, email: &str) -> Option<&Arc<User>> {
        self.users.get(email)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Users in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<User>> {
        self.users.values()
    }
}

impl FromIterator<User> for LookupTable {
    fn from_iter<I: IntoIterator<Item = User>>(iter: I) -> Self {
        let mut table = Self::new();
        for user in iter {
            table.insert(user);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stmt::Value;

    #[test]
    fn resolve_shares_the_record() {
        let table: LookupTable = ["a@email.com", "b@email.com"]
            .into_iter()
            .map(User::new)
            .collect();

        let first = table.resolve("blog", 1, "a@email.com").unwrap().clone();
        let second = table.resolve("post", 9, "a@email.com").unwrap().clone();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn missing_owner_names_the_reference() {
        let table = LookupTable::new();
        let err = table.resolve("comment", 3, "nobody@email.com").unwrap_err();

        assert!(err.is_unresolved_owner());
        assert!(err.to_string().contains("comment 3"));
    }

    #[test]
    fn from_rows_requires_email_column() {
        let rows = Rows::new(vec!["id".into()], vec![row![1]]);
        assert!(LookupTable::from_rows(&rows).unwrap_err().is_invalid_result());

        let rows = Rows::new(
            vec!["EMAIL".into()],
            vec![row!["a@email.com"], row!["a@email.com"], row!["b@email.com"]],
        );
        let table = LookupTable::from_rows(&rows).unwrap();
        assert_eq!(table.len(), 2);

        let rows = Rows::new(vec!["email".into()], vec![row![Value::Null]]);
        assert!(LookupTable::from_rows(&rows).is_err());
    }
}
