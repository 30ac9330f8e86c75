mod handlers;

use axum::{routing::get, Router};
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use time::OffsetDateTime;

use crate::{error::PersistenceFailure, AppState};

/// Opaque user identifier issued by the identity provider.
pub type UserId = String;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub email: Option<String>,
    pub name: String,
    pub verified: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub verified: Option<bool>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(handlers::me).patch(handlers::update_me))
}

/// Display label for the other side of a conversation.
pub fn counterpart_label(user: Option<&User>, user_id: &str) -> String {
    match user {
        Some(user) if !user.name.trim().is_empty() => user.name.clone(),
        _ => format!("User {}...", user_id.chars().take(8).collect::<String>()),
    }
}

const USER_COLUMNS: &str = "id,email,name,verified,created_at";

#[derive(Clone)]
pub struct UserDirectory {
    db_pool: SqlitePool,
}

impl UserDirectory {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }

    pub async fn get(&self, user_id: &str) -> Result<Option<User>, PersistenceFailure> {
        Ok(
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id=?"))
                .bind(user_id)
                .fetch_optional(&self.db_pool)
                .await?,
        )
    }

    pub async fn label(&self, user_id: &str) -> Result<String, PersistenceFailure> {
        Ok(counterpart_label(self.get(user_id).await?.as_ref(), user_id))
    }

    /// Returns the user's profile, creating one with a generated name on first sight.
    pub async fn ensure(
        &self,
        user_id: &str,
        email: Option<&str>,
    ) -> Result<User, PersistenceFailure> {
        if let Some(user) = self.get(user_id).await? {
            return Ok(user);
        }

        let name = generated_name();
        tracing::info!(user_id, %name, "adding user");
        Ok(
            sqlx::query_as(&format!(
                "INSERT INTO users (id,email,name,verified,created_at) VALUES (?,?,?,0,?) \
                 ON CONFLICT(id) DO UPDATE SET id=excluded.id RETURNING {USER_COLUMNS}"
            ))
            .bind(user_id)
            .bind(email)
            .bind(&name)
            .bind(OffsetDateTime::now_utc())
            .fetch_one(&self.db_pool)
            .await?,
        )
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        ProfileUpdate { name, verified }: ProfileUpdate,
    ) -> Result<Option<User>, PersistenceFailure> {
        let name = name.map(|name| name.trim().to_owned()).filter(|name| !name.is_empty());
        Ok(
            sqlx::query_as(&format!(
                "UPDATE users SET name=COALESCE(?,name), verified=COALESCE(?,verified) \
                 WHERE id=? RETURNING {USER_COLUMNS}"
            ))
            .bind(name)
            .bind(verified)
            .bind(user_id)
            .fetch_optional(&self.db_pool)
            .await?,
        )
    }
}

fn generated_name() -> String {
    let adjectives = [
        "Quick", "Lazy", "Mysterious", "Jolly", "Brave", "Silent", "Witty", "Cozy",
        "Clever", "Gentle", "Wild", "Calm", "Bold", "Sunny", "Proud", "Happy",
        "Eager", "Fancy", "Rusty", "Golden", "Silver", "Bright", "Lucky", "Breezy",
    ];
    let nouns = [
        "Fox", "Bear", "Eagle", "Wolf", "Otter", "Heron", "Lion", "Owl", "Rabbit",
        "Falcon", "Hawk", "Seal", "Panda", "Kitten", "Puppy", "Robin", "Badger",
        "Turtle", "Dolphin", "Whale", "Moose", "Giraffe", "Zebra", "Lynx",
    ];

    let mut rng = rand::rng();
    format!(
        "{} {}",
        adjectives.choose(&mut rng).copied().unwrap_or("Quiet"),
        nouns.choose(&mut rng).copied().unwrap_or("Guest"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn user(name: &str) -> User {
        User {
            id: "2f9c1d7e-aaaa".to_owned(),
            email: None,
            name: name.to_owned(),
            verified: false,
            created_at: datetime!(2024-05-01 12:00 UTC),
        }
    }

    #[test]
    fn label_prefers_name() {
        assert_eq!(counterpart_label(Some(&user("Silent Owl")), "2f9c1d7e-aaaa"), "Silent Owl");
    }

    #[test]
    fn label_falls_back_to_truncated_id() {
        assert_eq!(counterpart_label(None, "2f9c1d7e-aaaa"), "User 2f9c1d7e...");
        assert_eq!(counterpart_label(Some(&user("  ")), "2f9c1d7e-aaaa"), "User 2f9c1d7e...");
        assert_eq!(counterpart_label(None, "abc"), "User abc...");
    }

    #[test]
    fn generated_names_have_two_words() {
        assert_eq!(generated_name().split(' ').count(), 2);
    }
}
