use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::models::Profile;

/// Errors that can occur when talking to the profile store
#[derive(Debug, Error)]
pub enum ProfileStoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Outcome of a profile sync
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub profile: Profile,
    /// True when the profile did not exist and was created.
    pub created: bool,
}

/// HTTP client for the external profile store
///
/// The profile subsystem owns user records; the engine reads them for
/// scoring and pushes sync updates through the explicit two-path
/// create-if-absent / update-existing lifecycle.
pub struct ProfileStoreClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl ProfileStoreClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Fetch a single profile by its stable id
    pub async fn get_profile(&self, user_id: &str) -> Result<Profile, ProfileStoreError> {
        let url = self.url(&format!("/profiles/{}", urlencoding::encode(user_id)));

        tracing::debug!("Fetching profile from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(ProfileStoreError::NotFound(format!(
                    "profile {} not found",
                    user_id
                )))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ProfileStoreError::Unauthorized)
            }
            status if !status.is_success() => {
                return Err(ProfileStoreError::ApiError(format!(
                    "Failed to fetch profile: {}",
                    status
                )))
            }
            _ => {}
        }

        let json: Value = response.json().await?;
        serde_json::from_value(json).map_err(|e| {
            ProfileStoreError::InvalidResponse(format!("Failed to parse profile: {}", e))
        })
    }

    /// List candidate profiles, excluding the given ids
    pub async fn list_profiles(
        &self,
        exclude_ids: &[String],
        limit: usize,
    ) -> Result<Vec<Profile>, ProfileStoreError> {
        let exclude_csv = exclude_ids.join(",");
        let url = self.url(&format!(
            "/profiles?limit={}&exclude={}",
            limit,
            urlencoding::encode(&exclude_csv)
        ));

        tracing::debug!(
            "Listing up to {} profiles ({} exclusions)",
            limit,
            exclude_ids.len()
        );

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ProfileStoreError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(ProfileStoreError::ApiError(format!(
                "Failed to list profiles: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        let profiles = json
            .get("profiles")
            .and_then(|p| p.as_array())
            .ok_or_else(|| ProfileStoreError::InvalidResponse("Missing profiles array".into()))?;

        profiles
            .iter()
            .map(|doc| {
                serde_json::from_value(doc.clone()).map_err(|e| {
                    ProfileStoreError::InvalidResponse(format!("Failed to parse profile: {}", e))
                })
            })
            .collect()
    }

    /// Create the profile unless its id is already taken.
    ///
    /// Returns false when the store reports the id as existing; the record
    /// is left untouched in that case.
    pub async fn create_if_absent(&self, profile: &Profile) -> Result<bool, ProfileStoreError> {
        let url = self.url("/profiles");

        let response = self
            .client
            .post(&url)
            .header("X-Api-Key", &self.api_key)
            .json(profile)
            .send()
            .await?;

        match response.status() {
            StatusCode::CONFLICT => Ok(false),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(ProfileStoreError::Unauthorized)
            }
            status if status.is_success() => Ok(true),
            status => Err(ProfileStoreError::ApiError(format!(
                "Failed to create profile: {}",
                status
            ))),
        }
    }

    /// Update a profile that already exists
    pub async fn update_existing(&self, profile: &Profile) -> Result<(), ProfileStoreError> {
        let url = self.url(&format!(
            "/profiles/{}",
            urlencoding::encode(&profile.user_id)
        ));

        let response = self
            .client
            .put(&url)
            .header("X-Api-Key", &self.api_key)
            .json(profile)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(ProfileStoreError::NotFound(format!(
                "profile {} not found",
                profile.user_id
            ))),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(ProfileStoreError::Unauthorized)
            }
            status if status.is_success() => Ok(()),
            status => Err(ProfileStoreError::ApiError(format!(
                "Failed to update profile: {}",
                status
            ))),
        }
    }

    /// Sync a profile through the explicit two-path lifecycle, keyed by the
    /// stable external id: create when absent, otherwise update in place.
    pub async fn sync_profile(&self, profile: &Profile) -> Result<SyncOutcome, ProfileStoreError> {
        if self.create_if_absent(profile).await? {
            tracing::info!("Created profile {}", profile.user_id);
            return Ok(SyncOutcome {
                profile: profile.clone(),
                created: true,
            });
        }

        self.update_existing(profile).await?;
        tracing::info!("Updated profile {}", profile.user_id);

        Ok(SyncOutcome {
            profile: profile.clone(),
            created: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityLevel;

    fn sample_profile() -> Profile {
        Profile {
            user_id: "dev1".to_string(),
            display_name: "Dev One".to_string(),
            languages: vec!["Rust".to_string()],
            interests: vec!["cli".to_string()],
            activity_level: ActivityLevel::High,
            location: "Remote".to_string(),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_profile_parses_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/profiles/dev1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"userId":"dev1","displayName":"Dev One","languages":["Rust"],"interests":["cli"],"activityLevel":"high","location":"Remote"}"#,
            )
            .create_async()
            .await;

        let client = ProfileStoreClient::new(server.url(), "test-key".to_string());
        let profile = client.get_profile("dev1").await.unwrap();

        assert_eq!(profile.user_id, "dev1");
        assert_eq!(profile.languages, vec!["Rust"]);
        assert_eq!(profile.activity_level, ActivityLevel::High);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_profile_maps_404_to_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/profiles/ghost")
            .with_status(404)
            .create_async()
            .await;

        let client = ProfileStoreClient::new(server.url(), "test-key".to_string());
        let err = client.get_profile("ghost").await.unwrap_err();

        assert!(matches!(err, ProfileStoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_sync_profile_creates_when_absent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/profiles")
            .with_status(201)
            .create_async()
            .await;

        let client = ProfileStoreClient::new(server.url(), "test-key".to_string());
        let outcome = client.sync_profile(&sample_profile()).await.unwrap();

        assert!(outcome.created);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_sync_profile_updates_when_present() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/profiles")
            .with_status(409)
            .create_async()
            .await;
        let put_mock = server
            .mock("PUT", "/profiles/dev1")
            .with_status(200)
            .create_async()
            .await;

        let client = ProfileStoreClient::new(server.url(), "test-key".to_string());
        let outcome = client.sync_profile(&sample_profile()).await.unwrap();

        assert!(!outcome.created);
        put_mock.assert_async().await;
    }
}
