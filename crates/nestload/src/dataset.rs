//! Synthetic benchmark data.

use nestload_core::{
    graph::GraphStats, stmt::Value, Blog, Comment, Connection, Error, Graph, Post, Result, Schema,
    User,
};

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

/// Shape of one generated dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetParams {
    pub blog_count: usize,
    pub posts_per_blog: usize,
    pub comments_per_post: usize,
    pub owner_count: usize,
}

impl DatasetParams {
    pub fn new(
        blog_count: usize,
        posts_per_blog: usize,
        comments_per_post: usize,
        owner_count: usize,
    ) -> Self {
        Self {
            blog_count,
            posts_per_blog,
            comments_per_post,
            owner_count,
        }
    }

    /// Blogs need an owner to be assigned round-robin; zero is otherwise a
    /// valid count everywhere.
    pub fn validate(&self) -> Result<()> {
        if self.owner_count == 0 && self.blog_count > 0 {
            return Err(Error::invalid_config(format!(
                "{self} has blogs but no owners to assign them to"
            )));
        }

        Ok(())
    }

    /// Entity counts of the generated graph. `owners` is the size of the
    /// owner table, an upper bound on distinct owners referenced.
    pub fn expected_stats(&self) -> GraphStats {
        let posts = self.blog_count * self.posts_per_blog;

        GraphStats {
            blogs: self.blog_count,
            posts,
            comments: posts * self.comments_per_post,
            owners: self.owner_count,
        }
    }

    /// Rows the eager join returns: one per comment, plus one for every
    /// childless post and every childless blog.
    pub fn expected_join_rows(&self) -> usize {
        let per_post = self.comments_per_post.max(1);
        let per_blog = (self.posts_per_blog * per_post).max(1);
        self.blog_count * per_blog
    }
}

impl fmt::Display for DatasetParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "blogs={} posts/blog={} comments/post={} owners={}",
            self.blog_count, self.posts_per_blog, self.comments_per_post, self.owner_count
        )
    }
}

/// A generated dataset, ready to be written to a database.
///
/// Generation is deterministic for a given seed. Surrogate keys are not part
/// of the dataset; the database assigns them when [`seed`](Self::seed) runs.
#[derive(Debug, Clone)]
pub struct Dataset {
    params: DatasetParams,
    users: Vec<User>,
    blogs: Vec<BlogSeed>,
}

#[derive(Debug, Clone)]
struct BlogSeed {
    url: String,
    owner: usize,
    posts: Vec<PostSeed>,
}

#[derive(Debug, Clone)]
struct PostSeed {
    title: String,
    owner: usize,
    comments: Vec<CommentSeed>,
}

#[derive(Debug, Clone)]
struct CommentSeed {
    text: String,
    owner: usize,
}

const LOREM: &[&str] = &[
    "lorem",
    "ipsum",
    "dolor",
    "sit",
    "amet",
    "consectetur",
    "adipiscing",
    "elit",
    "sed",
    "do",
    "eiusmod",
    "tempor",
    "incididunt",
    "ut",
    "labore",
    "et",
    "dolore",
    "magna",
    "aliqua",
    "enim",
    "ad",
    "minim",
    "veniam",
    "quis",
    "nostrud",
    "exercitation",
    "ullamco",
    "laboris",
    "nisi",
    "aliquip",
    "ex",
    "ea",
    "commodo",
    "consequat",
];

impl Dataset {
    pub fn generate(params: DatasetParams, seed: u64) -> Result<Dataset> {
        params.validate()?;

        let mut rng = StdRng::seed_from_u64(seed);

        let users = (1..=params.owner_count)
            .map(|i| User::new(format!("user{i}@email.com")))
            .collect();

        let blogs = (0..params.blog_count)
            .map(|i| BlogSeed {
                url: format!("https://blog{i}.com"),
                owner: i % params.owner_count,
                posts: (0..params.posts_per_blog)
                    .map(|_| PostSeed {
                        title: sentence(&mut rng),
                        owner: rng.gen_range(0..params.owner_count),
                        comments: (0..params.comments_per_post)
                            .map(|_| CommentSeed {
                                text: sentence(&mut rng),
                                owner: rng.gen_range(0..params.owner_count),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Ok(Dataset {
            params,
            users,
            blogs,
        })
    }

    pub fn params(&self) -> &DatasetParams {
        &self.params
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Creates the schema if needed, replaces every row with this dataset,
    /// and returns the graph a correct load must reproduce.
    pub async fn seed(&self, conn: &mut dyn Connection, schema: &Schema) -> Result<Graph> {
        conn.push_schema(schema).await?;
        conn.reset_db(schema).await?;

        let owners: Vec<Arc<User>> = self.users.iter().cloned().map(Arc::new).collect();

        let rows = self
            .users
            .iter()
            .map(|user| vec![Value::from(&user.email)])
            .collect();
        conn.insert(schema, schema.users(), rows).await?;

        let rows = self
            .blogs
            .iter()
            .map(|blog| vec![Value::from(&blog.url), self.owner_key(blog.owner)])
            .collect();
        let blog_ids = conn.insert(schema, schema.blogs(), rows).await?;
        expect_keys("blogs", self.blogs.len(), &blog_ids)?;

        let rows = self
            .blogs
            .iter()
            .zip(&blog_ids)
            .flat_map(|(blog, &blog_id)| {
                blog.posts.iter().map(move |post| {
                    vec![
                        Value::from(&post.title),
                        Value::from(blog_id),
                        self.owner_key(post.owner),
                    ]
                })
            })
            .collect::<Vec<_>>();
        let post_ids = conn.insert(schema, schema.posts(), rows).await?;
        expect_keys("posts", self.params.expected_stats().posts, &post_ids)?;

        let rows = self
            .posts()
            .zip(&post_ids)
            .flat_map(|(post, &post_id)| {
                post.comments.iter().map(move |comment| {
                    vec![
                        Value::from(&comment.text),
                        Value::from(post_id),
                        self.owner_key(comment.owner),
                    ]
                })
            })
            .collect::<Vec<_>>();
        let comment_ids = conn.insert(schema, schema.comments(), rows).await?;
        expect_keys("comments", self.params.expected_stats().comments, &comment_ids)?;

        tracing::info!(
            params = %self.params,
            posts = post_ids.len(),
            comments = comment_ids.len(),
            "seeded dataset"
        );

        let mut post_ids = post_ids.into_iter();
        let mut comment_ids = comment_ids.into_iter();

        let blogs = self
            .blogs
            .iter()
            .zip(blog_ids)
            .map(|(blog, blog_id)| Blog {
                id: blog_id,
                url: blog.url.clone(),
                owner: owners[blog.owner].clone(),
                posts: blog
                    .posts
                    .iter()
                    .zip(post_ids.by_ref())
                    .map(|(post, post_id)| Post {
                        id: post_id,
                        title: post.title.clone(),
                        blog_id,
                        owner: owners[post.owner].clone(),
                        comments: post
                            .comments
                            .iter()
                            .zip(comment_ids.by_ref())
                            .map(|(comment, comment_id)| Comment {
                                id: comment_id,
                                text: comment.text.clone(),
                                post_id,
                                owner: owners[comment.owner].clone(),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Ok(Graph::new(blogs))
    }

    fn posts(&self) -> impl Iterator<Item = &PostSeed> {
        self.blogs.iter().flat_map(|blog| blog.posts.iter())
    }

    fn owner_key(&self, owner: usize) -> Value {
        Value::from(&self.users[owner].email)
    }
}

fn expect_keys(table: &str, expected: usize, keys: &[i64]) -> Result<()> {
    if keys.len() != expected {
        return Err(Error::invalid_result(format!(
            "inserting {expected} {table} returned {} keys",
            keys.len()
        )));
    }

    Ok(())
}

/// A lorem ipsum sentence of three to ten words.
fn sentence(rng: &mut impl Rng) -> String {
    let len = rng.gen_range(3..=10);
    let mut sentence = String::new();

    for i in 0..len {
        let word = LOREM[rng.gen_range(0..LOREM.len())];

        if i == 0 {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                sentence.extend(first.to_uppercase());
                sentence.push_str(chars.as_str());
            }
        } else {
            sentence.push(' ');
            sentence.push_str(word);
        }
    }

    sentence.push('.');
    sentence
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic() {
        let params = DatasetParams::new(3, 2, 2, 2);

        let a = Dataset::generate(params, 7).unwrap();
        let b = Dataset::generate(params, 7).unwrap();

        let titles = |dataset: &Dataset| {
            dataset
                .posts()
                .map(|post| post.title.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(titles(&a), titles(&b));
        assert_eq!(a.posts().count(), 6);
    }

    #[test]
    fn blogs_are_owned_round_robin() {
        let dataset = Dataset::generate(DatasetParams::new(5, 0, 0, 2), 1).unwrap();

        let owners: Vec<_> = dataset.blogs.iter().map(|blog| blog.owner).collect();
        assert_eq!(owners, [0, 1, 0, 1, 0]);
        assert_eq!(dataset.blogs[3].url, "https://blog3.com");
        assert_eq!(dataset.users()[1].email, "user2@email.com");
    }

    #[test]
    fn blogs_without_owners_are_rejected() {
        let err = Dataset::generate(DatasetParams::new(1, 1, 1, 0), 1).unwrap_err();
        assert!(err.is_invalid_config());

        let empty = Dataset::generate(DatasetParams::new(0, 10, 10, 0), 1).unwrap();
        assert!(empty.blogs.is_empty());
    }

    #[test]
    fn expected_join_rows() {
        assert_eq!(DatasetParams::new(2, 2, 1, 1).expected_join_rows(), 4);
        assert_eq!(DatasetParams::new(2, 0, 5, 1).expected_join_rows(), 2);
        assert_eq!(DatasetParams::new(1, 3, 0, 1).expected_join_rows(), 3);
        assert_eq!(DatasetParams::new(100, 1, 10, 5).expected_join_rows(), 1000);
    }

    #[test]
    fn sentences_are_capitalized() {
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..20 {
            let s = sentence(&mut rng);
            assert!(s.ends_with('.'));
            assert!(s.chars().next().is_some_and(char::is_uppercase));
            let words = s.split(' ').count();
            assert!((3..=10).contains(&words));
        }
    }
}
