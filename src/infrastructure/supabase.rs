use crate::domain::{StoreError, StoreResult, TableStore};
use crate::infrastructure::Config;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

const GENERIC_REJECTION: &str = "An error occurred while submitting your request.";

/// PostgREST-style table store.
///
/// Both operations are a `POST` to `{url}/rest/v1/{table}`; an upsert adds
/// the conflict column and asks the backend to merge duplicates instead of
/// rejecting them.
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseStore {
    pub fn new(config: &Config) -> Self {
        Self {
            client: build_client(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            api_key: config.supabase_anon_key.clone(),
        }
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn post(&self, table: &str, prefer: &str, query: &[(&str, &str)], record: Value) -> StoreResult<()> {
        if self.base_url.is_empty() || self.api_key.is_empty() {
            return Err(StoreError::MissingCredentials);
        }

        let mut request = self.client.post(self.endpoint(table));
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", prefer)
            .json(&record)
            .send()
            .map_err(|err| StoreError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            info!("wrote row to {table}");
            return Ok(());
        }

        let body = response.text().unwrap_or_default();
        warn!("write to {table} rejected with {status}");
        Err(StoreError::Rejected(rejection_message(status, &body)))
    }
}

fn build_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(15))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Prefers the backend's own error message, falling back to a generic one.
fn rejection_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(String::from))
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("{} (HTTP {})", GENERIC_REJECTION, status.as_u16()))
}

impl TableStore for SupabaseStore {
    fn upsert(&self, table: &str, conflict_key: &str, record: Value) -> StoreResult<()> {
        self.post(
            table,
            "resolution=merge-duplicates,return=minimal",
            &[("on_conflict", conflict_key)],
            record,
        )
    }

    fn insert(&self, table: &str, record: Value) -> StoreResult<()> {
        self.post(table, "return=minimal", &[], record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_store(url: &str, key: &str) -> SupabaseStore {
        SupabaseStore::new(&Config::from_lookup(|var| match var {
            crate::infrastructure::SUPABASE_URL_VAR if !url.is_empty() => Some(url.to_string()),
            crate::infrastructure::SUPABASE_ANON_KEY_VAR if !key.is_empty() => {
                Some(key.to_string())
            }
            _ => None,
        }))
    }

    #[test]
    fn test_endpoint_building_strips_trailing_slash() {
        let store = make_store("https://db.example.co/", "anon");
        assert_eq!(store.endpoint("users"), "https://db.example.co/rest/v1/users");
        assert_eq!(
            store.endpoint("requests"),
            "https://db.example.co/rest/v1/requests"
        );
    }

    #[test]
    fn test_missing_credentials_fail_closed_without_io() {
        let store = make_store("", "");
        let result = store.insert("requests", json!({"status": "open"}));
        assert_eq!(result, Err(StoreError::MissingCredentials));

        let store = make_store("https://db.example.co", "");
        let result = store.upsert("users", "user_id", json!({"user_id": "U1"}));
        assert_eq!(result, Err(StoreError::MissingCredentials));
    }

    #[test]
    fn test_rejection_message_prefers_backend_message() {
        let message = rejection_message(
            StatusCode::CONFLICT,
            r#"{"message":"duplicate key value violates unique constraint"}"#,
        );
        assert_eq!(message, "duplicate key value violates unique constraint");
    }

    #[test]
    fn test_rejection_message_falls_back_to_generic() {
        let message = rejection_message(StatusCode::INTERNAL_SERVER_ERROR, "not json");
        assert!(message.starts_with(GENERIC_REJECTION));
        assert!(message.contains("500"));

        let message = rejection_message(StatusCode::BAD_REQUEST, r#"{"message":""}"#);
        assert!(message.starts_with(GENERIC_REJECTION));
    }
}
