//! Workspace membership checks against the user service
//!
//! The user service is the source of truth and answers are never cached.
//! 403 and 404 are meaningful "not a member" answers; anything else that is
//! not a clean 2xx is indeterminate and must be treated as a denial.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use resilience::{with_timeout_result, TimeoutError};

use crate::config::MembershipConfig;

#[derive(Debug, Error)]
pub enum MembershipError {
    #[error("membership request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("membership service returned status {0}")]
    Status(u16),

    #[error("membership response could not be decoded: {0}")]
    Decode(String),

    #[error("membership service did not answer within {0:?}")]
    Timeout(Duration),
}

/// Tri-state outcome of a membership check.
#[derive(Debug)]
pub enum MembershipDecision {
    Member,
    NotMember,
    Indeterminate(MembershipError),
}

impl MembershipDecision {
    pub fn from_result(result: Result<bool, MembershipError>) -> Self {
        match result {
            Ok(true) => MembershipDecision::Member,
            Ok(false) => MembershipDecision::NotMember,
            Err(e) => MembershipDecision::Indeterminate(e),
        }
    }

    /// Fail-closed: only a definite `Member` grants access.
    pub fn is_granted(&self) -> bool {
        matches!(self, MembershipDecision::Member)
    }
}

#[async_trait]
pub trait MembershipAuthorizer: Send + Sync {
    /// `token` is the caller's own credential, forwarded for delegated authorization.
    async fn is_member(
        &self,
        workspace_id: Uuid,
        user_id: Uuid,
        token: &str,
    ) -> Result<bool, MembershipError>;

    async fn decide(&self, workspace_id: Uuid, user_id: Uuid, token: &str) -> MembershipDecision {
        MembershipDecision::from_result(self.is_member(workspace_id, user_id, token).await)
    }
}

/// Membership answer across user-service API revisions.
///
/// Which of the three flags is populated depends on the revision; absent
/// flags count as false and any true flag wins.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceValidationResponse {
    #[serde(default)]
    pub workspace_id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub valid: Option<bool>,
    #[serde(default)]
    pub is_valid: Option<bool>,
    #[serde(default)]
    pub is_member: Option<bool>,
}

impl WorkspaceValidationResponse {
    pub fn is_member(&self) -> bool {
        [self.valid, self.is_valid, self.is_member]
            .iter()
            .any(|flag| flag.unwrap_or(false))
    }
}

/// HTTP client for `GET {users}/api/workspaces/{ws}/validate-member/{user}`.
#[derive(Debug, Clone)]
pub struct HttpMembershipClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpMembershipClient {
    pub fn new(http: reqwest::Client, config: &MembershipConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            timeout: config.timeout,
        }
    }

    fn member_url(&self, workspace_id: Uuid, user_id: Uuid) -> String {
        format!(
            "{}/api/workspaces/{}/validate-member/{}",
            self.base_url, workspace_id, user_id
        )
    }

    async fn call_validate_member(
        &self,
        workspace_id: Uuid,
        user_id: Uuid,
        token: &str,
    ) -> Result<bool, MembershipError> {
        let url = self.member_url(workspace_id, user_id);

        let response = self.http.get(&url).bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                url = %url,
                "User service returned non-success status"
            );
            // 403 = not a member, 404 = workspace not found
            return match status.as_u16() {
                403 | 404 => Ok(false),
                code => Err(MembershipError::Status(code)),
            };
        }

        let body: WorkspaceValidationResponse = response
            .json()
            .await
            .map_err(|e| MembershipError::Decode(e.to_string()))?;

        Ok(body.is_member())
    }
}

#[async_trait]
impl MembershipAuthorizer for HttpMembershipClient {
    async fn is_member(
        &self,
        workspace_id: Uuid,
        user_id: Uuid,
        token: &str,
    ) -> Result<bool, MembershipError> {
        let result = with_timeout_result(
            self.timeout,
            self.call_validate_member(workspace_id, user_id, token),
        )
        .await
        .map_err(|e| match e {
            TimeoutError::Elapsed(d) => MembershipError::Timeout(d),
            TimeoutError::Inner(inner) => inner,
        });

        match &result {
            Ok(is_member) => debug!(
                workspace_id = %workspace_id,
                user_id = %user_id,
                is_member = *is_member,
                "Workspace member validation result"
            ),
            Err(e) => warn!(
                workspace_id = %workspace_id,
                user_id = %user_id,
                error = %e,
                "Workspace member validation indeterminate"
            ),
        }

        result
    }
}
