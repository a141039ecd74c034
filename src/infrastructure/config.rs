use std::env;
use tracing::warn;

pub const LIFF_ID_VAR: &str = "FRF_LIFF_ID";
pub const SUPABASE_URL_VAR: &str = "FRF_SUPABASE_URL";
pub const SUPABASE_ANON_KEY_VAR: &str = "FRF_SUPABASE_ANON_KEY";
pub const ACCESS_TOKEN_VAR: &str = "FRF_LINE_ACCESS_TOKEN";
pub const IN_CLIENT_VAR: &str = "FRF_IN_CLIENT";
pub const LOG_FILE_VAR: &str = "FRF_LOG_FILE";

/// Environment-provided settings. Every credential falls back to the empty
/// string when unset; the capabilities fail closed on empty values.
#[derive(Debug, Clone)]
pub struct Config {
    pub liff_id: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub line_access_token: String,
    pub in_client: bool,
    pub log_file: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            liff_id: fallible(&lookup, LIFF_ID_VAR),
            supabase_url: fallible(&lookup, SUPABASE_URL_VAR),
            supabase_anon_key: fallible(&lookup, SUPABASE_ANON_KEY_VAR),
            line_access_token: lookup(ACCESS_TOKEN_VAR).unwrap_or_default(),
            in_client: matches!(
                lookup(IN_CLIENT_VAR).as_deref(),
                Some("1") | Some("true") | Some("yes")
            ),
            log_file: lookup(LOG_FILE_VAR).filter(|path| !path.is_empty()),
        }
    }
}

fn fallible<F>(lookup: &F, key: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| {
        warn!("{key} not set, falling back to empty value");
        String::new()
    })
}
