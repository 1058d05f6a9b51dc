use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Owned;
use crate::database::{Document, TASKS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    /// Completion flag.
    pub status: bool,
    pub project: Uuid,
    pub creator: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub name: String,
    pub project: Uuid,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
}

impl Task {
    pub fn new(input: NewTask, creator: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            status: false,
            project: input.project,
            creator,
            created_at: Utc::now(),
        }
    }
}

impl Document for Task {
    const COLLECTION: &'static str = TASKS;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Owned for Task {
    const KIND: &'static str = "Task";

    fn creator(&self) -> Uuid {
        self.creator
    }
}
