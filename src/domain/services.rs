//! Identity resolution and request submission services.
//!
//! This module provides the two workflows at the heart of the client:
//! resolving the chat-platform identity that gates the form, and the
//! ordered two-step write that records a freight request.

use super::errors::{IdentityError, StoreError};
use super::models::{Identity, IdentityPhase, SubmissionOutcome, SubmissionPayload, UserRecord};
use serde_json::Value;
use tracing::{error, info};

/// Table holding one row per known chat user, keyed by their external id.
pub const USERS_TABLE: &str = "users";
/// Table holding freight requests, keyed by a server-generated id.
pub const REQUESTS_TABLE: &str = "requests";
/// Conflict column for the user upsert.
pub const USERS_CONFLICT_KEY: &str = "user_id";

/// Host-platform identity capability.
///
/// Mirrors the LIFF-style SDK surface: session state, profile data and the
/// hooks for the host container that embeds the client. Implementations are
/// injected so the workflows never touch a process-wide singleton.
pub trait IdentityProvider {
    /// Binds the provider to the configured application identifier.
    /// Must reject an absent or empty identifier.
    fn init(&mut self, app_id: &str) -> Result<(), IdentityError>;

    /// Whether the current session already carries credentials.
    fn is_logged_in(&self) -> bool;

    /// Produces the login URL the user must visit to authenticate.
    /// Control only resumes after a new process start with credentials set.
    fn login(&self) -> String;

    /// Fetches the profile of the authenticated user.
    fn get_profile(&self) -> Result<Identity, IdentityError>;

    /// Whether the client runs inside the host container.
    fn is_in_client(&self) -> bool;

    /// Asks the host container to close the view.
    fn close_window(&self);
}

/// Table-oriented persistence capability.
///
/// Two operations over JSON records: insert-or-update keyed by a conflict
/// column, and plain insert. Implementations are injected; tests use
/// in-memory fakes.
pub trait TableStore {
    fn upsert(&self, table: &str, conflict_key: &str, record: Value) -> Result<(), StoreError>;

    fn insert(&self, table: &str, record: Value) -> Result<(), StoreError>;
}

/// Resolves the user identity exactly once at application start.
///
/// The implicit redirect-and-resume behavior of the host SDK is modeled as
/// an explicit state machine: an unauthenticated session yields
/// [`IdentityPhase::RedirectPending`] and the caller renders a blocking
/// login screen instead of the form. Any failure yields
/// [`IdentityPhase::Failed`] and blocks the form as well.
pub struct IdentityResolver;

impl IdentityResolver {
    /// Runs the init / login-check / profile-fetch sequence.
    ///
    /// # Arguments
    ///
    /// * `provider` - Injected identity capability
    /// * `app_id` - Configured application identifier (may be empty, in
    ///   which case `init` fails and resolution ends in `Failed`)
    pub fn resolve<P: IdentityProvider>(provider: &mut P, app_id: &str) -> IdentityPhase {
        if let Err(err) = provider.init(app_id) {
            error!("identity init failed: {err}");
            return IdentityPhase::Failed(err.to_string());
        }

        if !provider.is_logged_in() {
            info!("session not authenticated, login redirect required");
            return IdentityPhase::RedirectPending {
                login_url: provider.login(),
            };
        }

        match provider.get_profile() {
            Ok(identity) => {
                info!("identity resolved for {}", identity.display_name);
                IdentityPhase::Resolved(identity)
            }
            Err(err) => {
                error!("profile fetch failed: {err}");
                IdentityPhase::Failed(err.to_string())
            }
        }
    }
}

/// The ordered two-step write that records a freight request.
///
/// Step 1 upserts the user row (idempotent, replace on key match). Step 2
/// inserts the request row. The steps are independent, non-atomic writes:
/// a failure in step 2 leaves the user row from step 1 in place. There are
/// no retries; resubmission re-runs the full sequence.
pub struct SubmissionWorkflow<'a, S: TableStore> {
    store: &'a S,
}

impl<'a, S: TableStore> SubmissionWorkflow<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Performs the two writes in strict order and reports the terminal
    /// outcome. The caller is responsible for holding `Pending` while this
    /// runs and for disabling re-entry until it returns.
    pub fn submit(&self, identity: &Identity, payload: &SubmissionPayload) -> SubmissionOutcome {
        let user = UserRecord::customer(identity);
        let record = match serde_json::to_value(&user) {
            Ok(record) => record,
            Err(err) => return SubmissionOutcome::Failed(err.to_string()),
        };

        if let Err(err) = self.store.upsert(USERS_TABLE, USERS_CONFLICT_KEY, record) {
            error!("user upsert failed: {err}");
            return SubmissionOutcome::Failed(err.to_string());
        }

        let record = match serde_json::to_value(payload) {
            Ok(record) => record,
            Err(err) => return SubmissionOutcome::Failed(err.to_string()),
        };

        if let Err(err) = self.store.insert(REQUESTS_TABLE, record) {
            // The user upsert above already took effect; there is no
            // compensating rollback for this window.
            error!("request insert failed: {err}");
            return SubmissionOutcome::Failed(err.to_string());
        }

        info!("freight request recorded for {}", payload.customer_id);
        SubmissionOutcome::Succeeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{CargoCategory, Draft, RequestStatus};
    use std::cell::RefCell;
    use std::collections::HashMap;

    struct FakeProvider {
        logged_in: bool,
        profile: Result<Identity, IdentityError>,
        app_id: String,
    }

    impl FakeProvider {
        fn new(logged_in: bool, profile: Result<Identity, IdentityError>) -> Self {
            Self {
                logged_in,
                profile,
                app_id: String::new(),
            }
        }
    }

    impl IdentityProvider for FakeProvider {
        fn init(&mut self, app_id: &str) -> Result<(), IdentityError> {
            if app_id.trim().is_empty() {
                return Err(IdentityError::MissingAppId);
            }
            self.app_id = app_id.to_string();
            Ok(())
        }

        fn is_logged_in(&self) -> bool {
            self.logged_in
        }

        fn login(&self) -> String {
            format!("https://login.example/authorize?client_id={}", self.app_id)
        }

        fn get_profile(&self) -> Result<Identity, IdentityError> {
            self.profile.clone()
        }

        fn is_in_client(&self) -> bool {
            false
        }

        fn close_window(&self) {}
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Upsert(String),
        Insert(String),
    }

    struct RecordingStore {
        calls: RefCell<Vec<Call>>,
        upsert_error: Option<StoreError>,
        insert_error: Option<StoreError>,
    }

    impl RecordingStore {
        fn ok() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                upsert_error: None,
                insert_error: None,
            }
        }

        fn failing_upsert(err: StoreError) -> Self {
            Self {
                upsert_error: Some(err),
                ..Self::ok()
            }
        }

        fn failing_insert(err: StoreError) -> Self {
            Self {
                insert_error: Some(err),
                ..Self::ok()
            }
        }
    }

    impl TableStore for RecordingStore {
        fn upsert(&self, table: &str, _conflict_key: &str, _record: Value) -> Result<(), StoreError> {
            self.calls.borrow_mut().push(Call::Upsert(table.to_string()));
            match &self.upsert_error {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }

        fn insert(&self, table: &str, _record: Value) -> Result<(), StoreError> {
            self.calls.borrow_mut().push(Call::Insert(table.to_string()));
            match &self.insert_error {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }
    }

    /// Fake with merge-duplicates semantics, for the idempotence law.
    struct KeyedStore {
        users: RefCell<HashMap<String, Value>>,
        requests: RefCell<Vec<Value>>,
    }

    impl KeyedStore {
        fn new() -> Self {
            Self {
                users: RefCell::new(HashMap::new()),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl TableStore for KeyedStore {
        fn upsert(&self, _table: &str, conflict_key: &str, record: Value) -> Result<(), StoreError> {
            let key = record[conflict_key]
                .as_str()
                .ok_or_else(|| StoreError::Rejected("missing conflict key".to_string()))?
                .to_string();
            self.users.borrow_mut().insert(key, record);
            Ok(())
        }

        fn insert(&self, _table: &str, record: Value) -> Result<(), StoreError> {
            self.requests.borrow_mut().push(record);
            Ok(())
        }
    }

    fn alice() -> Identity {
        Identity {
            user_id: "U1".to_string(),
            display_name: "Alice".to_string(),
            picture_url: None,
        }
    }

    fn complete_draft() -> Draft {
        Draft {
            pickup: "A".to_string(),
            dropoff: "B".to_string(),
            cargo_category: CargoCategory::Electronics,
            weight: "10kg".to_string(),
            photo_name: String::new(),
        }
    }

    #[test]
    fn test_resolve_logged_in_yields_identity() {
        // Scenario A: logged in, profile available, startup completes.
        let mut provider = FakeProvider::new(true, Ok(alice()));
        let phase = IdentityResolver::resolve(&mut provider, "liff-123");
        assert_eq!(phase, IdentityPhase::Resolved(alice()));
    }

    #[test]
    fn test_resolve_not_logged_in_requires_redirect() {
        // Scenario E: no session, login redirect, no form in this execution.
        let mut provider = FakeProvider::new(false, Ok(alice()));
        let phase = IdentityResolver::resolve(&mut provider, "liff-123");
        match phase {
            IdentityPhase::RedirectPending { login_url } => {
                assert!(login_url.contains("client_id=liff-123"));
            }
            other => panic!("expected redirect, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_empty_app_id_fails_closed() {
        let mut provider = FakeProvider::new(true, Ok(alice()));
        let phase = IdentityResolver::resolve(&mut provider, "");
        assert!(matches!(phase, IdentityPhase::Failed(_)));
    }

    #[test]
    fn test_resolve_profile_fetch_failure() {
        let mut provider = FakeProvider::new(
            true,
            Err(IdentityError::ProfileFetch("timeout".to_string())),
        );
        let phase = IdentityResolver::resolve(&mut provider, "liff-123");
        match phase {
            IdentityPhase::Failed(message) => assert!(message.contains("timeout")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_submit_success_runs_both_steps_in_order() {
        // Scenario B: both writes succeed.
        let store = RecordingStore::ok();
        let payload = complete_draft().to_submission_payload(&alice()).unwrap();

        let outcome = SubmissionWorkflow::new(&store).submit(&alice(), &payload);

        assert_eq!(outcome, SubmissionOutcome::Succeeded);
        assert_eq!(
            *store.calls.borrow(),
            vec![
                Call::Upsert(USERS_TABLE.to_string()),
                Call::Insert(REQUESTS_TABLE.to_string()),
            ]
        );
    }

    #[test]
    fn test_submit_upsert_failure_skips_insert() {
        // Scenario C: user upsert fails, the request row is never written.
        let store =
            RecordingStore::failing_upsert(StoreError::Transport("network error".to_string()));
        let payload = complete_draft().to_submission_payload(&alice()).unwrap();

        let outcome = SubmissionWorkflow::new(&store).submit(&alice(), &payload);

        assert_eq!(outcome, SubmissionOutcome::Failed("network error".to_string()));
        assert_eq!(*store.calls.borrow(), vec![Call::Upsert(USERS_TABLE.to_string())]);
    }

    #[test]
    fn test_submit_insert_failure_leaves_user_row_applied() {
        let store = RecordingStore::failing_insert(StoreError::Rejected("row too large".to_string()));
        let payload = complete_draft().to_submission_payload(&alice()).unwrap();

        let outcome = SubmissionWorkflow::new(&store).submit(&alice(), &payload);

        assert_eq!(outcome, SubmissionOutcome::Failed("row too large".to_string()));
        // The upsert happened before the failing insert; no rollback.
        assert_eq!(
            *store.calls.borrow(),
            vec![
                Call::Upsert(USERS_TABLE.to_string()),
                Call::Insert(REQUESTS_TABLE.to_string()),
            ]
        );
    }

    #[test]
    fn test_user_upsert_is_idempotent_on_external_id() {
        let store = KeyedStore::new();
        let payload = complete_draft().to_submission_payload(&alice()).unwrap();

        let first = SubmissionWorkflow::new(&store).submit(&alice(), &payload);
        assert_eq!(first, SubmissionOutcome::Succeeded);

        let renamed = Identity {
            display_name: "Alice B.".to_string(),
            ..alice()
        };
        let second = SubmissionWorkflow::new(&store).submit(&renamed, &payload);
        assert_eq!(second, SubmissionOutcome::Succeeded);

        // Same external id twice: one user row, display name updated.
        let users = store.users.borrow();
        assert_eq!(users.len(), 1);
        assert_eq!(users["U1"]["display_name"], "Alice B.");

        // Each submission inserted its own request row.
        assert_eq!(store.requests.borrow().len(), 2);
    }

    #[test]
    fn test_submitted_request_row_is_open() {
        let store = KeyedStore::new();
        let payload = complete_draft().to_submission_payload(&alice()).unwrap();
        assert_eq!(payload.status, RequestStatus::Open);

        SubmissionWorkflow::new(&store).submit(&alice(), &payload);

        let requests = store.requests.borrow();
        assert_eq!(requests[0]["status"], "open");
        assert_eq!(requests[0]["cargo_type"], "Electronics");
    }
}
