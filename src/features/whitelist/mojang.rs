//! Mojang profile lookup

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::Deserialize;

const PROFILE_ENDPOINT: &str = "https://api.mojang.com/users/profiles/minecraft";

/// Mojang's view of a player profile.
#[derive(Debug, Clone, Deserialize)]
pub struct MojangProfile {
    /// Canonical username (casing as registered)
    pub name: String,
    /// Profile uuid, undashed
    pub id: String,
}

#[derive(Default, Clone)]
pub struct MojangClient {
    http: reqwest::Client,
}

impl MojangClient {
    pub fn new() -> Self {
        MojangClient {
            http: reqwest::Client::new(),
        }
    }

    /// Resolve a username to its profile; `None` when no such player
    /// exists (Mojang answers anything but 200 for unknown names).
    pub async fn fetch_profile(&self, username: &str) -> Result<Option<MojangProfile>> {
        let response = self
            .http
            .get(format!("{PROFILE_ENDPOINT}/{username}"))
            .send()
            .await
            .context("Mojang profile request failed")?;

        if response.status() != StatusCode::OK {
            return Ok(None);
        }

        let profile = response
            .json()
            .await
            .context("malformed Mojang profile response")?;
        Ok(Some(profile))
    }
}
