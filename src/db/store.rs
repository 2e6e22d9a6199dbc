// Store trait - every read and write over users, posts, likes and sessions
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use thiserror::Error;

use crate::auth::password;
use crate::db::models::{FullPost, Like, Post, PrivateUser, User};
use crate::ids::{self, ENTITY_ID_LEN, SESSION_ID_LEN};
use crate::state::DbPool;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found")]
    NotFound,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("Identifier generation error: {0}")]
    Generation(#[from] rand::Error),

    #[error("Schema error: {0}")]
    Schema(anyhow::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Persistence error: {0}")]
    Persistence(rusqlite::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
            other => StoreError::Persistence(other),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    /// Create any missing tables
    async fn initialize(&self) -> StoreResult<()>;

    /// Hash the password and insert a new user. Returns the user id.
    async fn create_user(&self, email: &str, password: &str) -> StoreResult<String>;

    async fn get_user(&self, id: &str) -> StoreResult<User>;

    /// Includes the password hash; only for checking credentials.
    async fn get_user_by_email(&self, email: &str) -> StoreResult<PrivateUser>;

    /// Overwrite name and bio. Empty strings are stored as given.
    async fn update_user(&self, user_id: &str, name: &str, bio: &str) -> StoreResult<()>;

    /// Issue a new session token bound to the user
    async fn create_session(&self, user_id: &str) -> StoreResult<String>;

    /// Map a session token to its user id
    async fn resolve_session(&self, session_id: &str) -> StoreResult<String>;

    /// Remove a session. Deleting an unknown token succeeds.
    async fn delete_session(&self, session_id: &str) -> StoreResult<()>;

    /// Content must already be checked for emptiness by the caller.
    async fn create_post(&self, user_id: &str, content: &str) -> StoreResult<String>;

    async fn get_post(&self, id: &str) -> StoreResult<Post>;

    /// Newest first
    async fn get_posts_by_user(&self, user_id: &str) -> StoreResult<Vec<Post>>;

    /// Liking a post twice is a no-op
    async fn like_post(&self, user_id: &str, post_id: &str) -> StoreResult<()>;

    async fn unlike_post(&self, user_id: &str, post_id: &str) -> StoreResult<()>;

    /// Oldest first
    async fn post_likes(&self, post_id: &str) -> StoreResult<Vec<Like>>;

    async fn is_liked(&self, user_id: &str, post_id: &str) -> StoreResult<bool>;

    async fn get_full_post(&self, post_id: &str) -> StoreResult<FullPost>;
}

/// SQLite implementation
pub struct SqliteStore {
    pool: DbPool,
    bcrypt_cost: u32,
}

impl SqliteStore {
    pub fn new(pool: DbPool, bcrypt_cost: u32) -> Self {
        Self { pool, bcrypt_cost }
    }
}

const USER_COLUMNS: &str = "id, email, created_at, name, bio";
const POST_COLUMNS: &str = "id, user_id, content, created_at, updated_at";
const LIKE_COLUMNS: &str = "id, user_id, post_id, created_at";

fn user_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(offset)?,
        email: row.get(offset + 1)?,
        created_at: row.get(offset + 2)?,
        name: row.get(offset + 3)?,
        bio: row.get(offset + 4)?,
    })
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        user_id: row.get(1)?,
        content: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn like_from_row(row: &Row<'_>) -> rusqlite::Result<Like> {
    Ok(Like {
        id: row.get(0)?,
        user_id: row.get(1)?,
        post_id: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn likes_for_post(conn: &Connection, post_id: &str) -> StoreResult<Vec<Like>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {LIKE_COLUMNS} FROM likes WHERE post_id = ?1 ORDER BY created_at, rowid"
    ))?;
    let likes = stmt
        .query_map(params![post_id], like_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(likes)
}

#[async_trait]
impl Store for SqliteStore {
    async fn initialize(&self) -> StoreResult<()> {
        crate::db::run_migrations(&self.pool).map_err(StoreError::Schema)
    }

    async fn create_user(&self, email: &str, password: &str) -> StoreResult<String> {
        let password_hash = password::hash_password(password, self.bcrypt_cost)?;
        let user_id = ids::new_id(ENTITY_ID_LEN)?;

        let conn = self.pool.get()?;
        match conn.execute(
            "INSERT INTO users (id, email, password_hash) VALUES (?1, ?2, ?3)",
            params![user_id, email, password_hash],
        ) {
            Ok(_) => Ok(user_id),
            Err(e) if is_unique_violation(&e) => Err(StoreError::DuplicateEmail),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_user(&self, id: &str) -> StoreResult<User> {
        let conn = self.pool.get()?;
        let user = conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            |row| user_from_row(row, 0),
        )?;
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<PrivateUser> {
        let conn = self.pool.get()?;
        let user = conn.query_row(
            "SELECT id, email, password_hash, created_at, name, bio FROM users WHERE email = ?1",
            params![email],
            |row| {
                Ok(PrivateUser {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    password_hash: row.get(2)?,
                    created_at: row.get(3)?,
                    name: row.get(4)?,
                    bio: row.get(5)?,
                })
            },
        )?;
        Ok(user)
    }

    async fn update_user(&self, user_id: &str, name: &str, bio: &str) -> StoreResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE users SET name = ?1, bio = ?2 WHERE id = ?3",
            params![name, bio, user_id],
        )?;
        Ok(())
    }

    async fn create_session(&self, user_id: &str) -> StoreResult<String> {
        let session_id = ids::new_id(SESSION_ID_LEN)?;

        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO sessions (session_id, user_id) VALUES (?1, ?2)",
            params![session_id, user_id],
        )?;
        Ok(session_id)
    }

    async fn resolve_session(&self, session_id: &str) -> StoreResult<String> {
        let conn = self.pool.get()?;
        let user_id = conn.query_row(
            "SELECT user_id FROM sessions WHERE session_id = ?1",
            params![session_id],
            |row| row.get(0),
        )?;
        Ok(user_id)
    }

    async fn delete_session(&self, session_id: &str) -> StoreResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "DELETE FROM sessions WHERE session_id = ?1",
            params![session_id],
        )?;
        Ok(())
    }

    async fn create_post(&self, user_id: &str, content: &str) -> StoreResult<String> {
        let post_id = ids::new_id(ENTITY_ID_LEN)?;

        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO posts (id, user_id, content) VALUES (?1, ?2, ?3)",
            params![post_id, user_id, content],
        )?;
        Ok(post_id)
    }

    async fn get_post(&self, id: &str) -> StoreResult<Post> {
        let conn = self.pool.get()?;
        let post = conn.query_row(
            &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"),
            params![id],
            post_from_row,
        )?;
        Ok(post)
    }

    async fn get_posts_by_user(&self, user_id: &str) -> StoreResult<Vec<Post>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE user_id = ?1 \
             ORDER BY created_at DESC, rowid DESC"
        ))?;
        let posts = stmt
            .query_map(params![user_id], post_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    async fn like_post(&self, user_id: &str, post_id: &str) -> StoreResult<()> {
        let like_id = ids::new_id(ENTITY_ID_LEN)?;

        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO likes (id, user_id, post_id) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id, post_id) DO NOTHING",
            params![like_id, user_id, post_id],
        )?;
        Ok(())
    }

    async fn unlike_post(&self, user_id: &str, post_id: &str) -> StoreResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "DELETE FROM likes WHERE user_id = ?1 AND post_id = ?2",
            params![user_id, post_id],
        )?;
        Ok(())
    }

    async fn post_likes(&self, post_id: &str) -> StoreResult<Vec<Like>> {
        let conn = self.pool.get()?;
        likes_for_post(&conn, post_id)
    }

    async fn is_liked(&self, user_id: &str, post_id: &str) -> StoreResult<bool> {
        let conn = self.pool.get()?;
        let liked = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM likes WHERE user_id = ?1 AND post_id = ?2)",
            params![user_id, post_id],
            |row| row.get(0),
        )?;
        Ok(liked)
    }

    async fn get_full_post(&self, post_id: &str) -> StoreResult<FullPost> {
        let conn = self.pool.get()?;

        // Not snapshot-consistent with the likes read below.
        let joined = conn
            .query_row(
                "SELECT p.id, p.user_id, p.content, p.created_at, p.updated_at,
                        u.id, u.email, u.created_at, u.name, u.bio
                 FROM posts p
                 JOIN users u ON u.id = p.user_id
                 WHERE p.id = ?1",
                params![post_id],
                |row| Ok((post_from_row(row)?, user_from_row(row, 5)?)),
            )
            .optional()?;

        let (post, user) = joined.ok_or(StoreError::NotFound)?;
        let likes = likes_for_post(&conn, post_id)?;

        Ok(FullPost { post, user, likes })
    }
}
