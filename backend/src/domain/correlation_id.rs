//! Request-scoped correlation identifier shared by logs and responses.
//!
//! `CorrelationId` follows one request through the system. It lives in
//! task-local storage so any code running inside the request can read it
//! without threading it through signatures. The binding is released when the
//! scoped future finishes, whether it completes, fails, panics or is dropped.
//!
//! Tokio task-local variables are not inherited across spawned tasks. Copy the
//! identifier with [`CorrelationId::current`] before spawning and re-enter
//! [`CorrelationId::scope`] inside the new task.

use std::fmt;
use std::future::Future;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    /// Task-local storage for the active correlation identifier.
    static CORRELATION_ID: CorrelationId;
}

/// Header carrying the correlation identifier in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Value reported by [`CorrelationId::current_or_unknown`] outside a request.
pub const UNKNOWN_REQUEST_ID: &str = "N/A";

/// Opaque per-request identifier.
///
/// Inbound values are accepted verbatim; generated values are random UUIDs.
///
/// # Examples
/// ```
/// use auth_backend::domain::CorrelationId;
///
/// async fn handler() {
///     if let Some(id) = CorrelationId::current() {
///         println!("request id: {id}");
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a fresh identifier in canonical UUID text form.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Resolve the identifier for a new request.
    ///
    /// A present, non-blank inbound value is reused exactly as received;
    /// otherwise a new identifier is generated.
    ///
    /// # Examples
    /// ```
    /// use auth_backend::domain::CorrelationId;
    ///
    /// let reused = CorrelationId::begin(Some("client-42"));
    /// assert_eq!(reused.as_str(), "client-42");
    ///
    /// let generated = CorrelationId::begin(Some("   "));
    /// assert_ne!(generated.as_str(), "   ");
    /// ```
    #[must_use]
    pub fn begin(inbound: Option<&str>) -> Self {
        match inbound {
            Some(value) if !value.trim().is_empty() => Self(value.to_owned()),
            _ => Self::generate(),
        }
    }

    /// Returns the identifier bound to the current task, if any.
    #[must_use]
    #[rustfmt::skip]
    pub fn current() -> Option<Self> {
        CORRELATION_ID.try_with(Clone::clone).ok()
    }

    /// Returns the bound identifier or [`UNKNOWN_REQUEST_ID`].
    #[must_use]
    pub fn current_or_unknown() -> String {
        CORRELATION_ID
            .try_with(|id| id.0.clone())
            .unwrap_or_else(|_| UNKNOWN_REQUEST_ID.to_owned())
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Run `fut` with `id` bound for its whole lifetime.
    ///
    /// # Examples
    /// ```
    /// use auth_backend::domain::CorrelationId;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let id = CorrelationId::begin(Some("abc"));
    /// let observed = CorrelationId::scope(id.clone(), async { CorrelationId::current() }).await;
    /// assert_eq!(observed, Some(id));
    /// assert_eq!(CorrelationId::current(), None);
    /// # });
    /// ```
    pub async fn scope<Fut>(id: CorrelationId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CORRELATION_ID.scope(id, fut).await
    }

    /// Run the synchronous closure `f` with `id` bound.
    pub fn sync_scope<F, R>(id: CorrelationId, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        CORRELATION_ID.sync_scope(id, f)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CorrelationId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn generate_produces_uuid() {
        let id = CorrelationId::generate();
        let parsed = Uuid::parse_str(id.as_str()).expect("valid UUID");
        assert_eq!(parsed.to_string(), id.as_str());
    }

    #[rstest]
    #[case(Some("custom-request-id-12345"))]
    #[case(Some("not a uuid at all"))]
    #[case(Some(" padded "))]
    fn begin_reuses_non_blank_inbound_verbatim(#[case] inbound: Option<&str>) {
        let id = CorrelationId::begin(inbound);
        assert_eq!(Some(id.as_str()), inbound);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("  \t "))]
    fn begin_generates_when_absent_or_blank(#[case] inbound: Option<&str>) {
        let id = CorrelationId::begin(inbound);
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[rstest]
    fn generated_ids_are_distinct() {
        assert_ne!(CorrelationId::generate(), CorrelationId::generate());
    }

    #[tokio::test]
    async fn current_reflects_scope() {
        let expected = CorrelationId::generate();
        let observed =
            CorrelationId::scope(expected.clone(), async move { CorrelationId::current() }).await;
        assert_eq!(observed, Some(expected));
    }

    #[tokio::test]
    async fn current_is_none_out_of_scope() {
        assert!(CorrelationId::current().is_none());
        assert_eq!(CorrelationId::current_or_unknown(), UNKNOWN_REQUEST_ID);
    }

    #[tokio::test]
    async fn binding_is_released_after_a_failing_scope() {
        let id = CorrelationId::begin(Some("failing"));
        let result: Result<(), &str> = CorrelationId::scope(id, async { Err("boom") }).await;
        assert!(result.is_err());
        assert!(CorrelationId::current().is_none());
    }

    #[tokio::test]
    async fn spawned_tasks_do_not_inherit_the_binding() {
        let id = CorrelationId::begin(Some("parent"));
        let (inherited, propagated) = CorrelationId::scope(id, async {
            let inherited = tokio::spawn(async { CorrelationId::current() })
                .await
                .expect("task joins");
            let copied = CorrelationId::current().expect("id in scope");
            let propagated = tokio::spawn(CorrelationId::scope(copied, async {
                CorrelationId::current_or_unknown()
            }))
            .await
            .expect("task joins");
            (inherited, propagated)
        })
        .await;
        assert!(inherited.is_none());
        assert_eq!(propagated, "parent");
    }

    #[tokio::test]
    async fn concurrent_scopes_are_isolated() {
        let first = CorrelationId::scope(CorrelationId::begin(Some("one")), async {
            tokio::task::yield_now().await;
            CorrelationId::current_or_unknown()
        });
        let second = CorrelationId::scope(CorrelationId::begin(Some("two")), async {
            tokio::task::yield_now().await;
            CorrelationId::current_or_unknown()
        });
        let (first, second) = tokio::join!(first, second);
        assert_eq!(first, "one");
        assert_eq!(second, "two");
    }

    #[rstest]
    fn sync_scope_binds_for_closure() {
        let id = CorrelationId::begin(Some("sync"));
        let observed = CorrelationId::sync_scope(id, CorrelationId::current_or_unknown);
        assert_eq!(observed, "sync");
        assert_eq!(CorrelationId::current_or_unknown(), UNKNOWN_REQUEST_ID);
    }
}
