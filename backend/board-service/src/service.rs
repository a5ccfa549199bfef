//! Board update flow
//!
//! Membership is checked before anything is read. The before-snapshot is
//! taken from the stored board, the update is applied and persisted, and the
//! resulting [`BoardMutation`] is handed back so the caller can respond first
//! and notify afterwards.

use std::collections::HashSet;
use std::sync::Arc;

use actix_middleware::require_workspace_member;
use chrono::Utc;
use identity_client::MembershipAuthorizer;
use notification_dispatch::{AppliedChanges, BoardMutation, NotificationDispatcher};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Board, UpdateBoardRequest};
use crate::repository::BoardRepository;

/// The acting caller, as resolved by authentication.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: Uuid,
    pub token: String,
    pub workspace_id: Uuid,
}

#[derive(Clone)]
pub struct BoardService {
    repository: Arc<dyn BoardRepository>,
    membership: Arc<dyn MembershipAuthorizer>,
    notifications: NotificationDispatcher,
}

impl BoardService {
    pub fn new(
        repository: Arc<dyn BoardRepository>,
        membership: Arc<dyn MembershipAuthorizer>,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self {
            repository,
            membership,
            notifications,
        }
    }

    pub fn notifications(&self) -> &NotificationDispatcher {
        &self.notifications
    }

    pub async fn update_board(
        &self,
        caller: &Caller,
        board_id: Uuid,
        req: UpdateBoardRequest,
    ) -> Result<(Board, BoardMutation), AppError> {
        require_workspace_member(
            self.membership.as_ref(),
            caller.workspace_id,
            caller.user_id,
            &caller.token,
        )
        .await?;

        let mut board = self
            .repository
            .find_board(board_id)
            .await?
            .ok_or(AppError::BoardNotFound)?;

        // A board outside the caller's workspace does not exist for them
        let project = self
            .repository
            .find_project(board.project_id)
            .await?
            .filter(|p| p.workspace_id == caller.workspace_id)
            .ok_or(AppError::BoardNotFound)?;

        let before = board.snapshot();
        let changes = apply_update(&mut board, req)?;
        board.updated_at = Utc::now();

        self.repository.update_board(&board).await?;

        info!(
            board_id = %board.id,
            actor_id = %caller.user_id,
            "Board updated"
        );

        let mutation = BoardMutation {
            actor_id: caller.user_id,
            before,
            after: board.snapshot(),
            changes,
            context: board.notification_context(&project),
        };

        Ok((board, mutation))
    }
}

/// Apply the provided fields and report which notification-relevant ones
/// were part of the request.
pub fn apply_update(board: &mut Board, req: UpdateBoardRequest) -> Result<AppliedChanges, AppError> {
    let start_date = req.start_date.or(board.start_date);
    let due_date = req.due_date.or(board.due_date);
    if let (Some(start), Some(due)) = (start_date, due_date) {
        if start > due {
            return Err(AppError::Validation(
                "startDate must not be after dueDate".into(),
            ));
        }
    }

    if let Some(title) = req.title {
        if title.trim().is_empty() {
            return Err(AppError::Validation("title must not be empty".into()));
        }
        board.title = title;
    }
    if let Some(content) = req.content {
        board.content = content;
    }

    let changes = AppliedChanges {
        assignee: req.assignee_id.is_some(),
        participants: req.participants.is_some(),
    };

    if let Some(assignee_id) = req.assignee_id {
        board.assignee_id = (!assignee_id.is_nil()).then_some(assignee_id);
    }
    if let Some(participants) = req.participants {
        let mut seen = HashSet::new();
        board.participants = participants
            .into_iter()
            .filter(|id| !id.is_nil() && seen.insert(*id))
            .collect();
    }

    board.start_date = start_date;
    board.due_date = due_date;

    Ok(changes)
}
