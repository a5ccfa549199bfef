/// Board handlers
use actix_middleware::{BearerToken, RequireWorkspace, UserId};
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::UpdateBoardRequest;
use crate::service::{BoardService, Caller};

/// Update a board
///
/// PATCH /api/boards/{id}
///
/// Notifications about the change are spawned once the response is built,
/// only when delivery is enabled, and never affect it.
pub async fn update_board(
    service: web::Data<BoardService>,
    path: web::Path<Uuid>,
    user: UserId,
    token: BearerToken,
    workspace: RequireWorkspace,
    req: web::Json<UpdateBoardRequest>,
) -> Result<HttpResponse, AppError> {
    let caller = Caller {
        user_id: user.0,
        token: token.0,
        workspace_id: workspace.0,
    };

    let (board, mutation) = service
        .update_board(&caller, path.into_inner(), req.into_inner())
        .await?;

    let response = HttpResponse::Ok().json(board);
    if service.notifications().is_enabled() {
        service.notifications().spawn_board_mutation(mutation);
    }

    Ok(response)
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/boards/{id}", web::patch().to(update_board));
}
