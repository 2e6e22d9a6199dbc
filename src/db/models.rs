use serde::{Deserialize, Serialize};

/// Public projection of a user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub created_at: String,
    pub name: Option<String>,
    pub bio: Option<String>,
}

/// Full user row, used only to verify credentials at login.
#[derive(Debug, Clone)]
pub struct PrivateUser {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
    pub name: Option<String>,
    pub bio: Option<String>,
}

impl From<PrivateUser> for User {
    fn from(u: PrivateUser) -> Self {
        Self {
            id: u.id,
            email: u.email,
            created_at: u.created_at,
            name: u.name,
            bio: u.bio,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub id: String,
    pub user_id: String,
    pub post_id: String,
    pub created_at: String,
}

/// A post with its author and likes, assembled per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullPost {
    pub post: Post,
    pub user: User,
    pub likes: Vec<Like>,
}
