use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::{Document, USERS};

/// Registered account. `password` holds the PHC hash string, never the raw password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Profile fields supplied at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
}

impl User {
    pub fn new(email: impl Into<String>, password_hash: String, profile: Profile) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: profile.name,
            email: email.into(),
            password: password_hash,
            created_at: Utc::now(),
        }
    }
}

impl Document for User {
    const COLLECTION: &'static str = USERS;

    fn id(&self) -> Uuid {
        self.id
    }
}
