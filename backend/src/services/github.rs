//! GitHub API client for the profile repos lookup

use crate::config::GithubConfig;
use crate::error::ApiError;
use anyhow::Context;
use std::time::Duration;
use tracing::debug;

pub const NO_GITHUB_PROFILE_MESSAGE: &str = "No GitHub profile found";

const MAX_USERNAME_LEN: usize = 39;

/// GitHub logins are alphanumeric with single inner hyphens
fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= MAX_USERNAME_LEN
        && !username.starts_with('-')
        && !username.ends_with('-')
        && !username.contains("--")
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Fetches a user's public repositories
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
    repo_limit: u8,
}

impl GithubClient {
    pub fn new(config: &GithubConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("devconnector/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build GitHub HTTP client")?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            repo_limit: config.repo_limit,
        })
    }

    /// The user's oldest-first repos, up to the configured limit
    ///
    /// Repository objects are passed through as GitHub returns them.
    pub async fn repos(&self, username: &str) -> Result<Vec<serde_json::Value>, ApiError> {
        if !is_valid_username(username) {
            return Err(ApiError::NotFound(NO_GITHUB_PROFILE_MESSAGE.to_string()));
        }

        let url = format!("{}/users/{}/repos", self.api_url, username);
        let per_page = self.repo_limit.to_string();

        let mut request = self.http.get(&url).query(&[
            ("per_page", per_page.as_str()),
            ("sort", "created"),
            ("direction", "asc"),
        ]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .context("GitHub request failed")
            .map_err(ApiError::Internal)?;

        if !response.status().is_success() {
            debug!(status = %response.status(), %username, "GitHub lookup failed");
            return Err(ApiError::NotFound(NO_GITHUB_PROFILE_MESSAGE.to_string()));
        }

        response
            .json::<Vec<serde_json::Value>>()
            .await
            .context("Invalid GitHub response body")
            .map_err(ApiError::Internal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, token: Option<&str>) -> GithubClient {
        GithubClient::new(&GithubConfig {
            api_url: server.uri(),
            token: token.map(str::to_string),
            repo_limit: 5,
        })
        .unwrap()
    }

    #[rstest]
    #[case("octocat", true)]
    #[case("a-b-c", true)]
    #[case("", false)]
    #[case("-lead", false)]
    #[case("trail-", false)]
    #[case("dou--ble", false)]
    #[case("../admin", false)]
    #[case("way-too-long-username-for-github-accounts", false)]
    fn test_username_rules(#[case] username: &str, #[case] valid: bool) {
        assert_eq!(is_valid_username(username), valid);
    }

    #[tokio::test]
    async fn test_repos_passes_through_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .and(query_param("per_page", "5"))
            .and(query_param("sort", "created"))
            .and(query_param("direction", "asc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "name": "hello-world", "stargazers_count": 1 },
                { "name": "spoon-knife", "stargazers_count": 2 }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let repos = client_for(&server, None).repos("octocat").await.unwrap();

        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0]["name"], "hello-world");
    }

    #[tokio::test]
    async fn test_token_sent_as_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .and(header("authorization", "Bearer gh-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let repos = client_for(&server, Some("gh-token"))
            .repos("octocat")
            .await
            .unwrap();
        assert!(repos.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/ghost-user/repos"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server, None)
            .repos("ghost-user")
            .await
            .unwrap_err();

        match err {
            ApiError::NotFound(msg) => assert_eq!(msg, NO_GITHUB_PROFILE_MESSAGE),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_username_never_calls_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let result = client_for(&server, None).repos("bad/name").await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
