//! The materialized blog hierarchy.
//!
//! Every level holds its owner as an `Arc<User>` shared with the
//! [`LookupTable`](crate::LookupTable); nothing below the lookup table ever
//! owns a copy of a user.

use std::collections::HashSet;
use std::sync::Arc;

/// Owner record, keyed by email.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    pub email: String,
}

impl User {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Blog {
    pub id: i64,
    pub url: String,
    pub owner: Arc<User>,
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub blog_id: i64,
    pub owner: Arc<User>,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub post_id: i64,
    pub owner: Arc<User>,
}

/// The finished top-level sequence handed back by a load.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Graph {
    pub blogs: Vec<Blog>,
}

/// Entity counts of a [`Graph`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GraphStats {
    pub blogs: usize,
    pub posts: usize,
    pub comments: usize,
    /// Distinct owners referenced anywhere in the graph.
    pub owners: usize,
}

impl Graph {
    pub fn new(blogs: Vec<Blog>) -> Self {
        Self { blogs }
    }

    pub fn is_empty(&self) -> bool {
        self.blogs.is_empty()
    }

    pub fn posts(&self) -> impl Iterator<Item = &Post> {
        self.blogs.iter().flat_map(|blog| blog.posts.iter())
    }

    pub fn comments(&self) -> impl Iterator<Item = &Comment> {
        self.posts().flat_map(|post| post.comments.iter())
    }

    pub fn stats(&self) -> GraphStats {
        let mut owners = HashSet::new();
        let mut stats = GraphStats {
            blogs: self.blogs.len(),
            ..GraphStats::default()
        };

        for blog in &self.blogs {
            owners.insert(blog.owner.email.as_str());

            for post in &blog.posts {
                stats.posts += 1;
                owners.insert(post.owner.email.as_str());

                for comment in &post.comments {
                    stats.comments += 1;
                    owners.insert(comment.owner.email.as_str());
                }
            }
        }

        stats.owners = owners.len();
        stats
    }

    /// Sorts every level by id.
    ///
    /// Two strategies may legitimately deliver siblings in different orders
    /// (a join orders by parent then child, a per-level select by child id);
    /// comparing canonical forms removes that difference.
    pub fn canonicalize(&mut self) {
        self.blogs.sort_by_key(|blog| blog.id);

        for blog in &mut self.blogs {
            blog.posts.sort_by_key(|post| post.id);

            for post in &mut blog.posts {
                post.comments.sort_by_key(|comment| comment.id);
            }
        }
    }

    pub fn canonical(&self) -> Graph {
        let mut graph = self.clone();
        graph.canonicalize();
        graph
    }

    /// Same ids, attributes, owners and membership at every level, ignoring
    /// sibling order.
    pub fn structurally_eq(&self, other: &Graph) -> bool {
        self.canonical() == other.canonical()
    }
}

impl From<Vec<Blog>> for Graph {
    fn from(blogs: Vec<Blog>) -> Self {
        Self::new(blogs)
    }
}

impl IntoIterator for Graph {
    type Item = Blog;
    type IntoIter = std::vec::IntoIter<Blog>;

    fn into_iter(self) -> Self::IntoIter {
        self.blogs.into_iter()
    }
}
