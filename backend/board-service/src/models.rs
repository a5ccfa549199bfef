use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use notification_dispatch::{BoardContext, BoardSnapshot};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub content: String,
    pub assignee_id: Option<Uuid>,
    /// Insertion order, no duplicates
    pub participants: Vec<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    pub fn new(project_id: Uuid, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            title: title.into(),
            content: String::new(),
            assignee_id: None,
            participants: Vec::new(),
            start_date: None,
            due_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::new(self.assignee_id, self.participants.clone())
    }

    pub fn notification_context(&self, project: &Project) -> BoardContext {
        BoardContext::new(project.workspace_id, self.id, &self.title, &project.name)
    }
}

/// Partial update. Absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBoardRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    /// The nil UUID clears the assignee.
    pub assignee_id: Option<Uuid>,
    /// Replaces the whole participant set.
    pub participants: Option<Vec<Uuid>>,
    pub start_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
}
