use nestload_core::{
    schema::row::{Attach, Child},
    Blog, Comment, Error, Graph, Post, Result,
};

use indexmap::IndexMap;

/// Insertion-ordered key → record store for one hierarchy level.
///
/// Each slot remembers the arena index of its parent record, so a finished
/// level can be folded into the level above without a second key lookup.
#[derive(Debug)]
pub(crate) struct Arena<R> {
    slots: IndexMap<i64, Slot<R>>,
}

#[derive(Debug)]
struct Slot<R> {
    record: R,
    parent: Option<usize>,
}

impl<R> Arena<R> {
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: IndexMap::with_capacity(capacity),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn index_of(&self, key: i64) -> Option<usize> {
        self.slots.get_index_of(&key)
    }

    /// Registers a record the arena has not seen yet and returns its index.
    pub(crate) fn insert(&mut self, key: i64, record: R, parent: Option<usize>) -> usize {
        let (index, prev) = self.slots.insert_full(key, Slot { record, parent });
        debug_assert!(prev.is_none(), "key {key} registered twice");
        index
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }

    /// Points every record at its parent in `parents`, found through the
    /// record's own parent key.
    pub(crate) fn adopt<P>(&mut self, parents: &Arena<P>, level: &'static str) -> Result<()>
    where
        R: Child,
    {
        for (key, slot) in &mut self.slots {
            let parent_key = slot.record.parent_key();

            let Some(index) = parents.index_of(parent_key) else {
                return Err(Error::invalid_result(format!(
                    "{level} {key} references parent {parent_key}, which was not loaded"
                )));
            };

            slot.parent = Some(index);
        }

        Ok(())
    }

    /// Consumes the arena, moving every record into its parent. Records are
    /// visited in arena order, so siblings keep their first-seen order.
    fn fold_into<P>(self, parents: &mut Arena<P>, level: &'static str) -> Result<()>
    where
        P: Attach<R>,
    {
        for (key, slot) in self.slots {
            let parent = match slot.parent {
                Some(index) => parents.slots.get_index_mut(index),
                None => None,
            };

            let Some((_, parent)) = parent else {
                return Err(Error::invalid_result(format!(
                    "{level} {key} has no materialized parent"
                )));
            };

            parent.record.attach(slot.record);
        }

        Ok(())
    }

    fn into_records(self) -> Vec<R> {
        self.slots.into_values().map(|slot| slot.record).collect()
    }
}

/// Folds the three level arenas bottom-up into a finished graph.
pub(crate) fn assemble(
    mut blogs: Arena<Blog>,
    mut posts: Arena<Post>,
    comments: Arena<Comment>,
) -> Result<Graph> {
    comments.fold_into(&mut posts, "comment")?;
    posts.fold_into(&mut blogs, "post")?;

    Ok(Graph::new(blogs.into_records()))
}
