/// Resilience helpers for service-to-service calls
///
/// Every outbound call in the board platform is bounded by a timeout so that a
/// slow dependency cannot pile up outstanding requests. There are no retries:
/// callers either fall back (token validation), fail closed (membership) or
/// drop the work (notifications).
///
/// # Example: bounding a remote call
///
/// ```rust,no_run
/// use resilience::{presets, with_timeout_result};
///
/// #[tokio::main]
/// async fn main() {
///     let config = presets::authority_config();
///
///     let result = with_timeout_result(config.timeout.duration, async {
///         // Your HTTP call here
///         Ok::<_, String>(())
///     })
///     .await;
/// }
/// ```

pub mod presets;
pub mod timeout;

pub use presets::{authority_config, membership_config, notification_config, ServiceConfig};
pub use timeout::{with_timeout_result, TimeoutConfig, TimeoutError};
