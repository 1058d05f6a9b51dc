use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Owned;
use crate::database::{Document, PROJECTS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub creator: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Project {
    pub fn new(input: NewProject, creator: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            creator,
            created_at: Utc::now(),
        }
    }
}

impl Document for Project {
    const COLLECTION: &'static str = PROJECTS;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Owned for Project {
    const KIND: &'static str = "Project";

    fn creator(&self) -> Uuid {
        self.creator
    }
}
