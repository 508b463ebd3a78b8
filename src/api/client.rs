//! Canvas REST API HTTP client.

use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use url::Url;

use crate::api::source::CourseSource;
use crate::api::types::*;
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;

/// Items requested per page on list endpoints.
pub const PAGE_SIZE: u32 = 100;

/// Client user agent.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Timeout for establishing connections, shared with file downloads.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Characters of an unparseable body kept in the error message.
const BODY_EXCERPT_CHARS: usize = 500;

static NEXT_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<([^>]*)>;\s*rel="next""#).expect("valid regex"));

/// Canvas API client bound to one instance and access token.
pub struct CanvasApi {
    client: Client,
    base: Url,
    token: String,
    request_timeout: Duration,
    retry: RetryPolicy,
}

impl CanvasApi {
    /// Create a client for the instance at `base_url`
    /// (e.g. `https://school.instructure.com/`).
    pub fn new(
        base_url: &str,
        token: String,
        request_timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base: api_base_url(base_url)?,
            token,
            request_timeout,
            retry,
        })
    }

    /// The underlying HTTP client, for fetching file bodies.
    ///
    /// File URLs returned by Canvas carry their own verifier, so requests made
    /// with this client are sent without the access token.
    pub fn http_client(&self) -> Client {
        self.client.clone()
    }

    /// Root of the versioned API, always ending in `/api/v1/`.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let mut url = self.base.join(path)?;
        url.query_pairs_mut()
            .append_pair("per_page", &PAGE_SIZE.to_string());
        Ok(url)
    }

    /// Make an authenticated GET request, retrying when rate limited.
    async fn get(&self, url: &Url) -> Result<Response> {
        let mut retries = 0;
        loop {
            tracing::debug!("GET {}", url);

            let response = self
                .client
                .get(url.clone())
                .bearer_auth(&self.token)
                .timeout(self.request_timeout)
                .send()
                .await?;

            tracing::debug!("Response status: {}", response.status());

            match check_status(response).await {
                Err(Error::RateLimited(secs)) if self.retry.should_retry(retries) => {
                    retries += 1;
                    let delay = self
                        .retry
                        .delay_for(retries, Some(Duration::from_secs(secs)));
                    tracing::warn!(
                        "Rate limited by Canvas, retrying in {:.1}s ({}/{})",
                        delay.as_secs_f64(),
                        retries,
                        self.retry.max_retries
                    );
                    sleep(delay).await;
                }
                other => return other,
            }
        }
    }

    async fn get_one<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base.join(path)?;
        let text = self.get(&url).await?.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            Error::Api(format!(
                "Failed to parse {}: {} - Response: {}",
                path,
                e,
                excerpt(&text)
            ))
        })
    }

    /// Fetch every page of a list endpoint by following `Link` headers.
    async fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(self.endpoint(path)?);

        while let Some(url) = next.take() {
            let response = self.get(&url).await?;
            next = next_page(response.headers())?;

            let text = response.text().await?;
            let page: Vec<T> = serde_json::from_str(&text).map_err(|e| {
                Error::Api(format!(
                    "Failed to parse {}: {} - Response: {}",
                    path,
                    e,
                    excerpt(&text)
                ))
            })?;
            items.extend(page);
        }

        Ok(items)
    }
}

#[async_trait]
impl CourseSource for CanvasApi {
    async fn list_courses(&self, enrollment_states: &[String]) -> Result<Vec<Course>> {
        let mut seen = HashSet::new();
        let mut courses = Vec::new();

        for state in enrollment_states {
            let path = format!("courses?enrollment_state={}", state);
            for course in self.get_all::<Course>(&path).await? {
                if seen.insert(course.id) {
                    courses.push(course);
                }
            }
        }

        Ok(courses)
    }

    async fn get_course(&self, course_id: u64) -> Result<Course> {
        self.get_one(&format!("courses/{}", course_id)).await
    }

    async fn list_folders(&self, course_id: u64) -> Result<Vec<RemoteFolder>> {
        self.get_all(&format!("courses/{}/folders", course_id))
            .await
    }

    async fn list_folder_files(&self, folder_id: u64) -> Result<Vec<RemoteFile>> {
        self.get_all(&format!("folders/{}/files", folder_id)).await
    }

    async fn list_subfolders(&self, folder_id: u64) -> Result<Vec<RemoteFolder>> {
        self.get_all(&format!("folders/{}/folders", folder_id))
            .await
    }

    async fn list_modules(&self, course_id: u64) -> Result<Vec<RemoteModule>> {
        self.get_all(&format!("courses/{}/modules", course_id))
            .await
    }

    async fn list_module_items(
        &self,
        course_id: u64,
        module_id: u64,
    ) -> Result<Vec<RemoteModuleItem>> {
        self.get_all(&format!("courses/{}/modules/{}/items", course_id, module_id))
            .await
    }

    async fn get_file(&self, file_id: u64) -> Result<RemoteFile> {
        self.get_one(&format!("files/{}", file_id)).await
    }
}

/// Normalize a user supplied instance URL into the `/api/v1/` root.
pub fn api_base_url(base_url: &str) -> Result<Url> {
    let trimmed = base_url.trim().trim_end_matches('/');

    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(Error::InvalidUrl(format!(
            "'{}' must start with http:// or https://",
            base_url
        )));
    }

    let root = trimmed.strip_suffix("/api/v1").unwrap_or(trimmed);
    Ok(Url::parse(&format!("{}/api/v1/", root))?)
}

/// Map a Canvas response status onto the error taxonomy.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    let url = response.url().clone();
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.summary())
        .unwrap_or_else(|| format!("HTTP {}", status));

    match status {
        // Canvas signals throttling with 403 and a plain-text body
        StatusCode::FORBIDDEN if body.contains("Rate Limit Exceeded") => {
            Err(Error::RateLimited(retry_after.unwrap_or(1)))
        }
        StatusCode::TOO_MANY_REQUESTS => Err(Error::RateLimited(retry_after.unwrap_or(1))),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            tracing::debug!("Auth error response for {}: {}", url, body);
            Err(Error::Unauthorized(detail))
        }
        StatusCode::NOT_FOUND => Err(Error::NotFound(format!("{} ({})", url.path(), detail))),
        _ => Err(Error::Api(format!("{} returned {}", url.path(), detail))),
    }
}

/// Extract the `rel="next"` target from a `Link` header, if any.
fn next_page(headers: &header::HeaderMap) -> Result<Option<Url>> {
    let Some(link) = headers.get(header::LINK).and_then(|v| v.to_str().ok()) else {
        return Ok(None);
    };

    match NEXT_LINK.captures(link).and_then(|c| c.get(1)) {
        Some(m) => Ok(Some(Url::parse(m.as_str())?)),
        None => Ok(None),
    }
}

/// First characters of a response body, for error messages.
fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}
