//! Demo data for local development.

use std::collections::HashSet;

use anyhow::{ensure, Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use social_database::{DatabaseConnection, FollowEdge, NewComment, NewPost, NewUser};
use tracing::info;
use uuid::Uuid;

const SEED_PASSWORD: &str = "password";

const WORDS: &[&str] = &[
    "rust", "fast", "social", "network", "build", "code", "deploy", "scale", "learn", "fun",
    "today", "music", "movie", "book", "daily", "life", "travel", "food", "tech", "dev",
];

const TAGS: &[&str] = &[
    "rust", "programming", "dev", "life", "music", "travel", "food", "movies", "books", "tech",
    "tutorial",
];

const ADJECTIVES: &[&str] = &[
    "blue", "fast", "happy", "smart", "lucky", "quiet", "brave", "kind", "wild", "calm",
];

const NOUNS: &[&str] = &[
    "tiger", "eagle", "fox", "panda", "otter", "lion", "koala", "whale", "hawk", "wolf",
];

#[derive(Debug, Clone)]
pub struct SeedOptions {
    pub users: usize,
    pub min_posts: usize,
    pub max_posts: usize,
    pub min_comments: usize,
    pub max_comments: usize,
    /// Upper bound on accounts each user follows.
    pub max_follows: usize,
    /// Fixed RNG seed; a random one is drawn and logged when absent.
    pub seed: Option<u64>,
    /// Delete existing rows before inserting.
    pub clear: bool,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            users: 20,
            min_posts: 1,
            max_posts: 3,
            min_comments: 0,
            max_comments: 5,
            max_follows: 5,
            seed: None,
            clear: false,
        }
    }
}

impl SeedOptions {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.users > 0, "users must be > 0");
        ensure!(
            self.max_posts >= self.min_posts,
            "max posts must be >= min posts"
        );
        ensure!(
            self.max_comments >= self.min_comments,
            "max comments must be >= min comments"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub seed: u64,
    pub users: usize,
    pub posts: usize,
    pub comments: usize,
    pub follows: usize,
}

/// Populate the store with activated users, their posts, comments and follow
/// edges.
pub async fn seed_database(
    database: &DatabaseConnection,
    options: &SeedOptions,
) -> Result<SeedReport> {
    options.validate()?;

    let seed = options.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    info!(seed, "seeding database");

    if options.clear {
        clear_all(database).await?;
        info!("cleared users, posts, comments and followers");
    }

    let mut report = SeedReport {
        seed,
        ..SeedReport::default()
    };

    let password_hash =
        social_feed::hash_password(SEED_PASSWORD).context("failed to hash seed password")?;
    let users = database.users();
    let mut user_ids = Vec::with_capacity(options.users);
    for username in unique_usernames(&mut rng, options.users) {
        let user = users
            .create(&NewUser {
                email: format!("{username}@example.com"),
                username,
                password_hash: password_hash.clone(),
            })
            .await
            .context("failed to insert seed user")?;
        users
            .activate(user.id)
            .await
            .context("failed to activate seed user")?;
        user_ids.push(user.id);
    }
    report.users = user_ids.len();

    let posts = database.posts();
    let mut post_ids = Vec::new();
    for &owner in &user_ids {
        let count = rng.gen_range(options.min_posts..=options.max_posts);
        for _ in 0..count {
            let tag_count = rng.gen_range(1..=3);
            let post = posts
                .create(&NewPost {
                    title: sentence(&mut rng, 3, 7),
                    content: paragraphs(&mut rng),
                    tags: TAGS
                        .choose_multiple(&mut rng, tag_count)
                        .map(|tag| tag.to_string())
                        .collect(),
                    user_id: owner,
                })
                .await
                .context("failed to insert seed post")?;
            post_ids.push(post.id);
        }
    }
    report.posts = post_ids.len();

    let comments = database.comments();
    for &post_id in &post_ids {
        let count = rng.gen_range(options.min_comments..=options.max_comments);
        for _ in 0..count {
            let Some(&author) = user_ids.choose(&mut rng) else {
                break;
            };
            comments
                .create(&NewComment {
                    post_id,
                    user_id: author,
                    content: sentence(&mut rng, 6, 16),
                })
                .await
                .context("failed to insert seed comment")?;
            report.comments += 1;
        }
    }

    if options.max_follows > 0 && user_ids.len() > 1 {
        let follows = database.follows();
        for &follower in &user_ids {
            let mut candidates: Vec<Uuid> = user_ids
                .iter()
                .copied()
                .filter(|&other| other != follower)
                .collect();
            candidates.shuffle(&mut rng);

            let count = rng.gen_range(0..=options.max_follows).min(candidates.len());
            for &followed in &candidates[..count] {
                follows
                    .follow(FollowEdge::new(followed, follower))
                    .await
                    .context("failed to insert seed follow")?;
                report.follows += 1;
            }
        }
    }

    info!(
        users = report.users,
        posts = report.posts,
        comments = report.comments,
        follows = report.follows,
        "seeding completed"
    );
    Ok(report)
}

async fn clear_all(database: &DatabaseConnection) -> Result<()> {
    // Children first.
    for statement in [
        "DELETE FROM followers",
        "DELETE FROM comments",
        "DELETE FROM posts",
        "DELETE FROM user_invites",
        "DELETE FROM users",
    ] {
        sqlx::query(statement)
            .execute(database.pool())
            .await
            .with_context(|| format!("failed to run {statement:?}"))?;
    }
    Ok(())
}

fn unique_usernames(rng: &mut StdRng, count: usize) -> Vec<String> {
    let mut seen = HashSet::with_capacity(count);
    let mut names = Vec::with_capacity(count);

    while names.len() < count {
        let mut name = format!(
            "{}_{}{}",
            ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())],
            NOUNS[rng.gen_range(0..NOUNS.len())],
            rng.gen_range(100..1000)
        );
        if seen.contains(&name) {
            name = format!("{name}{}", rng.gen_range(0..10));
            if seen.contains(&name) {
                continue;
            }
        }
        seen.insert(name.clone());
        names.push(name);
    }

    names
}

fn sentence(rng: &mut StdRng, min_words: usize, max_words: usize) -> String {
    let count = rng.gen_range(min_words..=max_words);
    let words: Vec<&str> = (0..count)
        .map(|_| WORDS[rng.gen_range(0..WORDS.len())])
        .collect();

    let mut text = words.join(" ");
    if let Some(first) = text.get(..1).map(str::to_ascii_uppercase) {
        text.replace_range(..1, &first);
    }
    text.push('.');
    text
}

fn paragraphs(rng: &mut StdRng) -> String {
    let count = rng.gen_range(1..=3);
    (0..count)
        .map(|_| sentence(rng, 8, 16))
        .collect::<Vec<_>>()
        .join("\n\n")
}
