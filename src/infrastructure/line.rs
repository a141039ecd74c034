use crate::domain::{Identity, IdentityError, IdentityProvider};
use crate::infrastructure::Config;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

const PROFILE_ENDPOINT: &str = "https://api.line.me/v2/profile";
const AUTHORIZE_ENDPOINT: &str = "https://access.line.me/oauth2/v2.1/authorize";

/// LINE-backed identity capability.
///
/// Login state is carried by a bearer access token from the configuration;
/// there is no browser redirect to resume, so an unauthenticated session
/// surfaces the authorize URL and the user restarts the client once the
/// token is set.
pub struct LineIdentityProvider {
    client: Client,
    app_id: String,
    access_token: String,
    in_client: bool,
}

impl LineIdentityProvider {
    pub fn new(config: &Config) -> Self {
        Self {
            client: build_client(),
            app_id: String::new(),
            access_token: config.line_access_token.clone(),
            in_client: config.in_client,
        }
    }
}

fn build_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(15))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    user_id: String,
    display_name: String,
    picture_url: Option<String>,
}

impl IdentityProvider for LineIdentityProvider {
    fn init(&mut self, app_id: &str) -> Result<(), IdentityError> {
        if app_id.trim().is_empty() {
            return Err(IdentityError::MissingAppId);
        }
        self.app_id = app_id.trim().to_string();
        Ok(())
    }

    fn is_logged_in(&self) -> bool {
        !self.access_token.is_empty()
    }

    fn login(&self) -> String {
        format!(
            "{}?response_type=code&client_id={}&scope=profile%20openid",
            AUTHORIZE_ENDPOINT, self.app_id
        )
    }

    fn get_profile(&self) -> Result<Identity, IdentityError> {
        let response = self
            .client
            .get(PROFILE_ENDPOINT)
            .bearer_auth(&self.access_token)
            .send()
            .map_err(|err| IdentityError::ProfileFetch(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("profile endpoint returned {status}");
            return Err(IdentityError::ProfileFetch(format!(
                "profile endpoint returned {}",
                status
            )));
        }

        let profile: ProfileResponse = response
            .json()
            .map_err(|err| IdentityError::ProfileFetch(err.to_string()))?;

        Ok(Identity {
            user_id: profile.user_id,
            display_name: profile.display_name,
            picture_url: profile.picture_url,
        })
    }

    fn is_in_client(&self) -> bool {
        self.in_client
    }

    fn close_window(&self) {
        // The host launcher owns the window; returning from the event loop
        // is what actually ends the view.
        info!("close requested by host container");
    }
}
