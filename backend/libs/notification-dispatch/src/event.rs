//! Notification events as accepted by the internal notification API

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    BoardAssigned,
    BoardUnassigned,
    BoardParticipantAdded,
    BoardUpdated,
    BoardStatusChanged,
    BoardCommentAdded,
    BoardDueSoon,
    BoardOverdue,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::BoardAssigned => "BOARD_ASSIGNED",
            NotificationType::BoardUnassigned => "BOARD_UNASSIGNED",
            NotificationType::BoardParticipantAdded => "BOARD_PARTICIPANT_ADDED",
            NotificationType::BoardUpdated => "BOARD_UPDATED",
            NotificationType::BoardStatusChanged => "BOARD_STATUS_CHANGED",
            NotificationType::BoardCommentAdded => "BOARD_COMMENT_ADDED",
            NotificationType::BoardDueSoon => "BOARD_DUE_SOON",
            NotificationType::BoardOverdue => "BOARD_OVERDUE",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Board,
}

/// Where a board lives and how to name it in a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardContext {
    pub workspace_id: Uuid,
    pub board_id: Uuid,
    pub board_title: String,
    pub project_name: String,
}

impl BoardContext {
    pub fn new(
        workspace_id: Uuid,
        board_id: Uuid,
        board_title: impl Into<String>,
        project_name: impl Into<String>,
    ) -> Self {
        Self {
            workspace_id,
            board_id,
            board_title: board_title.into(),
            project_name: project_name.into(),
        }
    }
}

/// One notification for one recipient. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub actor_id: Uuid,
    pub target_user_id: Uuid,
    pub workspace_id: Uuid,
    pub resource_type: ResourceType,
    pub resource_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl NotificationEvent {
    /// Board event carrying the standard `projectName` and `timestamp` metadata.
    pub fn for_board(
        kind: NotificationType,
        actor_id: Uuid,
        target_user_id: Uuid,
        board: &BoardContext,
    ) -> Self {
        let mut metadata = Map::new();
        metadata.insert(
            "projectName".to_string(),
            Value::String(board.project_name.clone()),
        );
        metadata.insert("timestamp".to_string(), Value::from(Utc::now().timestamp()));

        Self {
            kind,
            actor_id,
            target_user_id,
            workspace_id: board.workspace_id,
            resource_type: ResourceType::Board,
            resource_id: board.board_id,
            resource_name: Some(board.board_title.clone()),
            metadata,
        }
    }

    pub fn board_assigned(actor_id: Uuid, target_user_id: Uuid, board: &BoardContext) -> Self {
        Self::for_board(NotificationType::BoardAssigned, actor_id, target_user_id, board)
    }

    pub fn board_unassigned(actor_id: Uuid, target_user_id: Uuid, board: &BoardContext) -> Self {
        Self::for_board(NotificationType::BoardUnassigned, actor_id, target_user_id, board)
    }

    pub fn board_participant_added(
        actor_id: Uuid,
        target_user_id: Uuid,
        board: &BoardContext,
    ) -> Self {
        Self::for_board(
            NotificationType::BoardParticipantAdded,
            actor_id,
            target_user_id,
            board,
        )
    }

    /// `changes` is merged into the metadata and may override the standard keys.
    pub fn board_updated(
        actor_id: Uuid,
        target_user_id: Uuid,
        board: &BoardContext,
        changes: Map<String, Value>,
    ) -> Self {
        let mut event =
            Self::for_board(NotificationType::BoardUpdated, actor_id, target_user_id, board);
        event.metadata.extend(changes);
        event
    }

    pub fn board_status_changed(
        actor_id: Uuid,
        target_user_id: Uuid,
        board: &BoardContext,
        old_status: &str,
        new_status: &str,
    ) -> Self {
        Self::for_board(
            NotificationType::BoardStatusChanged,
            actor_id,
            target_user_id,
            board,
        )
        .with_metadata("oldStatus", old_status)
        .with_metadata("newStatus", new_status)
    }

    pub fn board_comment_added(
        actor_id: Uuid,
        target_user_id: Uuid,
        board: &BoardContext,
        comment_id: Uuid,
    ) -> Self {
        Self::for_board(
            NotificationType::BoardCommentAdded,
            actor_id,
            target_user_id,
            board,
        )
        .with_metadata("commentId", comment_id.to_string())
    }

    pub fn board_due_soon(
        actor_id: Uuid,
        target_user_id: Uuid,
        board: &BoardContext,
        due_at: i64,
    ) -> Self {
        Self::for_board(NotificationType::BoardDueSoon, actor_id, target_user_id, board)
            .with_metadata("dueAt", due_at)
    }

    pub fn board_overdue(
        actor_id: Uuid,
        target_user_id: Uuid,
        board: &BoardContext,
        due_at: i64,
    ) -> Self {
        Self::for_board(NotificationType::BoardOverdue, actor_id, target_user_id, board)
            .with_metadata("dueAt", due_at)
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> BoardContext {
        BoardContext::new(Uuid::new_v4(), Uuid::new_v4(), "Release checklist", "Apollo")
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let board = board();
        let actor = Uuid::new_v4();
        let target = Uuid::new_v4();
        let event = NotificationEvent::board_assigned(actor, target, &board);

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "BOARD_ASSIGNED");
        assert_eq!(json["actorId"], actor.to_string());
        assert_eq!(json["targetUserId"], target.to_string());
        assert_eq!(json["workspaceId"], board.workspace_id.to_string());
        assert_eq!(json["resourceType"], "board");
        assert_eq!(json["resourceId"], board.board_id.to_string());
        assert_eq!(json["resourceName"], "Release checklist");
        assert_eq!(json["metadata"]["projectName"], "Apollo");
        assert!(json["metadata"]["timestamp"].is_i64());
    }

    #[test]
    fn test_empty_optional_fields_are_omitted() {
        let mut event = NotificationEvent::board_assigned(Uuid::new_v4(), Uuid::new_v4(), &board());
        event.resource_name = None;
        event.metadata.clear();

        let json = serde_json::to_value(&event).unwrap();
        let obj = json.as_object().unwrap();

        assert!(!obj.contains_key("resourceName"));
        assert!(!obj.contains_key("metadata"));
    }

    #[test]
    fn test_type_names_match_serde() {
        for kind in [
            NotificationType::BoardAssigned,
            NotificationType::BoardUnassigned,
            NotificationType::BoardParticipantAdded,
            NotificationType::BoardUpdated,
            NotificationType::BoardStatusChanged,
            NotificationType::BoardCommentAdded,
            NotificationType::BoardDueSoon,
            NotificationType::BoardOverdue,
        ] {
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
        }
    }

    #[test]
    fn test_status_change_metadata() {
        let event = NotificationEvent::board_status_changed(
            Uuid::new_v4(),
            Uuid::new_v4(),
            &board(),
            "TODO",
            "DONE",
        );

        assert_eq!(event.kind, NotificationType::BoardStatusChanged);
        assert_eq!(event.metadata["oldStatus"], "TODO");
        assert_eq!(event.metadata["newStatus"], "DONE");
        assert_eq!(event.metadata["projectName"], "Apollo");
    }

    #[test]
    fn test_updated_merges_changes() {
        let mut changes = Map::new();
        changes.insert("title".into(), Value::String("New title".into()));

        let event =
            NotificationEvent::board_updated(Uuid::new_v4(), Uuid::new_v4(), &board(), changes);

        assert_eq!(event.metadata["title"], "New title");
        assert!(event.metadata.contains_key("timestamp"));
    }
}
