//! Board storage seam
//!
//! Persistence is owned elsewhere; the in-memory implementation backs local
//! runs and tests.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Board, Project};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("board {0} not found")]
    BoardNotFound(Uuid),

    #[error("storage error: {0}")]
    Storage(String),
}

#[async_trait]
pub trait BoardRepository: Send + Sync {
    async fn find_board(&self, id: Uuid) -> Result<Option<Board>, RepositoryError>;

    async fn update_board(&self, board: &Board) -> Result<(), RepositoryError>;

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, RepositoryError>;
}

#[derive(Default)]
pub struct InMemoryBoardRepository {
    boards: RwLock<HashMap<Uuid, Board>>,
    projects: RwLock<HashMap<Uuid, Project>>,
}

impl InMemoryBoardRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_project(&self, project: Project) {
        self.projects.write().await.insert(project.id, project);
    }

    pub async fn insert_board(&self, board: Board) {
        self.boards.write().await.insert(board.id, board);
    }
}

#[async_trait]
impl BoardRepository for InMemoryBoardRepository {
    async fn find_board(&self, id: Uuid) -> Result<Option<Board>, RepositoryError> {
        Ok(self.boards.read().await.get(&id).cloned())
    }

    async fn update_board(&self, board: &Board) -> Result<(), RepositoryError> {
        let mut boards = self.boards.write().await;
        match boards.get_mut(&board.id) {
            Some(existing) => {
                *existing = board.clone();
                Ok(())
            }
            None => Err(RepositoryError::BoardNotFound(board.id)),
        }
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, RepositoryError> {
        Ok(self.projects.read().await.get(&id).cloned())
    }
}
