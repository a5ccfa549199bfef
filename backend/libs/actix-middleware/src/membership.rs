//! Workspace membership gate for handlers
//!
//! Only a definite "member" answer lets the request through. An unreachable
//! or misbehaving user service denies exactly like a "no".

use identity_client::{MembershipAuthorizer, MembershipDecision};
use uuid::Uuid;

use crate::error::ApiError;

pub async fn require_workspace_member(
    authorizer: &dyn MembershipAuthorizer,
    workspace_id: Uuid,
    user_id: Uuid,
    token: &str,
) -> Result<(), ApiError> {
    match authorizer.decide(workspace_id, user_id, token).await {
        MembershipDecision::Member => Ok(()),
        MembershipDecision::NotMember => {
            tracing::info!(
                workspace_id = %workspace_id,
                user_id = %user_id,
                "Workspace access denied: not a member"
            );
            Err(ApiError::not_workspace_member())
        }
        MembershipDecision::Indeterminate(e) => {
            tracing::warn!(
                workspace_id = %workspace_id,
                user_id = %user_id,
                error = %e,
                "Workspace access denied: membership could not be determined"
            );
            Err(ApiError::not_workspace_member())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use error_types::ServiceError;
    use identity_client::MembershipError;

    struct Fixed(fn() -> Result<bool, MembershipError>);

    #[async_trait]
    impl MembershipAuthorizer for Fixed {
        async fn is_member(
            &self,
            _workspace_id: Uuid,
            _user_id: Uuid,
            _token: &str,
        ) -> Result<bool, MembershipError> {
            (self.0)()
        }
    }

    async fn gate(authorizer: Fixed) -> Result<(), ApiError> {
        require_workspace_member(&authorizer, Uuid::new_v4(), Uuid::new_v4(), "tok").await
    }

    #[tokio::test]
    async fn test_member_passes() {
        assert!(gate(Fixed(|| Ok(true))).await.is_ok());
    }

    #[tokio::test]
    async fn test_non_member_is_forbidden() {
        let err = gate(Fixed(|| Ok(false))).await.unwrap_err();
        assert!(matches!(err.kind(), ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_indeterminate_fails_closed() {
        let err = gate(Fixed(|| Err(MembershipError::Status(502))))
            .await
            .unwrap_err();

        assert!(matches!(err.kind(), ServiceError::Forbidden(_)));
        assert_eq!(err.code(), "NOT_WORKSPACE_MEMBER");
    }
}
