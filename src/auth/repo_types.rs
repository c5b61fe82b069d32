use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::PublicUser;
use crate::profile::Theme;

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,        // Argon2 hash, not exposed in JSON
    pub theme: String,                // "light" | "dark"
    pub picture_key: Option<String>,  // object key of the profile picture
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn theme(&self) -> Theme {
        Theme::parse(&self.theme)
    }
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        let theme = u.theme();
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            theme,
        }
    }
}

/// Fields of a user being registered.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// A login session. Deleting the row ends the session.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub expires_at: OffsetDateTime,
}
