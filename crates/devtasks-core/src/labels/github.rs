//! Minimal GitHub REST client for repository labels

use super::{LabelPlan, LabelSpec};
use anyhow::{Context, Result};
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use url::Url;

/// Public GitHub API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "DEVTASKS_GITHUB_API";

/// Environment variable holding the access token
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

const PAGE_SIZE: usize = 100;

#[derive(Serialize)]
struct LabelBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_name: Option<&'a str>,
    color: String,
    description: &'a str,
}

/// Label endpoints of one repository
pub struct GithubLabels {
    client: reqwest::Client,
    base: Url,
    owner: String,
    repo: String,
    token: Option<String>,
}

impl GithubLabels {
    /// Create a client for `owner/name`
    pub fn new(api_url: &str, slug: &str, token: Option<String>, user_agent: &str) -> Result<Self> {
        let base = Url::parse(api_url).with_context(|| format!("Invalid API URL: {}", api_url))?;
        let (owner, repo) = slug
            .split_once('/')
            .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty() && !repo.contains('/'))
            .ok_or_else(|| anyhow::anyhow!("Repository must be 'owner/name', got '{}'", slug))?;

        Ok(Self {
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base,
            owner: owner.to_string(),
            repo: repo.to_string(),
            token,
        })
    }

    /// Create a client using `DEVTASKS_GITHUB_API` and `GITHUB_TOKEN` when set
    pub fn from_env(api_url: Option<&str>, slug: &str, user_agent: &str) -> Result<Self> {
        let api_url = std::env::var(API_URL_ENV)
            .ok()
            .or_else(|| api_url.map(str::to_string))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty());
        Self::new(&api_url, slug, token, user_agent)
    }

    /// `{base}/repos/{owner}/{repo}/labels[/{name}]`, keeping any base path
    fn labels_url(&self, name: Option<&str>) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", self.base))?;
            segments
                .pop_if_empty()
                .extend(["repos", self.owner.as_str(), self.repo.as_str(), "labels"]);
            if let Some(name) = name {
                segments.push(name);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header("Accept", "application/vnd.github+json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, what: &str) -> Result<Response> {
        let response = builder
            .send()
            .await
            .with_context(|| format!("Failed to {}", what))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to {}: HTTP {}\n{}", what, status, body.trim());
        }
        Ok(response)
    }

    /// All labels of the repository
    pub async fn list(&self) -> Result<Vec<LabelSpec>> {
        let mut labels = Vec::new();
        let mut page = 1;
        loop {
            let mut url = self.labels_url(None)?;
            url.query_pairs_mut()
                .append_pair("per_page", &PAGE_SIZE.to_string())
                .append_pair("page", &page.to_string());

            let what = format!("list labels of {}/{}", self.owner, self.repo);
            let response = self.send(self.request(Method::GET, url), &what).await?;
            let batch: Vec<LabelSpec> = response
                .json()
                .await
                .with_context(|| format!("Failed to parse labels of {}/{}", self.owner, self.repo))?;

            let done = batch.len() < PAGE_SIZE;
            labels.extend(batch);
            if done {
                return Ok(labels);
            }
            page += 1;
        }
    }

    pub async fn create(&self, label: &LabelSpec) -> Result<()> {
        let body = LabelBody {
            name: Some(&label.name),
            new_name: None,
            color: label.normalized_color(),
            description: label.description.as_deref().unwrap_or(""),
        };
        let request = self
            .request(Method::POST, self.labels_url(None)?)
            .json(&body);
        self.send(request, &format!("create label '{}'", label.name))
            .await?;
        Ok(())
    }

    pub async fn update(&self, current_name: &str, label: &LabelSpec) -> Result<()> {
        let body = LabelBody {
            name: None,
            new_name: Some(&label.name),
            color: label.normalized_color(),
            description: label.description.as_deref().unwrap_or(""),
        };
        let request = self
            .request(Method::PATCH, self.labels_url(Some(current_name))?)
            .json(&body);
        self.send(request, &format!("update label '{}'", current_name))
            .await?;
        Ok(())
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        let request = self.request(Method::DELETE, self.labels_url(Some(name))?);
        self.send(request, &format!("delete label '{}'", name))
            .await?;
        Ok(())
    }

    /// Carry out a plan, one request at a time, stopping at the first failure
    pub async fn apply(&self, plan: &LabelPlan) -> Result<()> {
        for label in &plan.create {
            self.create(label).await?;
            tracing::info!(label = %label.name, "created label");
        }
        for update in &plan.update {
            self.update(&update.current_name, &update.label).await?;
            tracing::info!(label = %update.current_name, "updated label");
        }
        for name in &plan.delete {
            self.delete(name).await?;
            tracing::info!(label = %name, "deleted label");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_url() {
        let client = GithubLabels::new(DEFAULT_API_URL, "acme/widgets", None, "devtasks").unwrap();
        assert_eq!(
            client.labels_url(None).unwrap().as_str(),
            "https://api.github.com/repos/acme/widgets/labels"
        );
        assert_eq!(
            client.labels_url(Some("good first issue")).unwrap().as_str(),
            "https://api.github.com/repos/acme/widgets/labels/good%20first%20issue"
        );
    }

    #[test]
    fn test_labels_url_keeps_enterprise_base_path() {
        let client =
            GithubLabels::new("https://github.example.com/api/v3/", "acme/widgets", None, "devtasks")
                .unwrap();
        assert_eq!(
            client.labels_url(None).unwrap().as_str(),
            "https://github.example.com/api/v3/repos/acme/widgets/labels"
        );
    }

    #[test]
    fn test_invalid_slug_rejected() {
        for slug in ["acme", "/widgets", "acme/", "a/b/c"] {
            assert!(GithubLabels::new(DEFAULT_API_URL, slug, None, "devtasks").is_err());
        }
    }

    /// Serve canned HTTP responses, one per connection, and record request lines
    async fn fake_api(
        responses: Vec<(u16, String)>,
    ) -> (String, tokio::task::JoinHandle<Vec<String>>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                }
                let head = String::from_utf8_lossy(&buf);
                requests.push(head.lines().next().unwrap_or_default().to_string());
                let response = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
            requests
        });
        (format!("http://{}", addr), handle)
    }

    #[tokio::test]
    async fn test_list_labels() {
        let body = r#"[{"id": 1, "name": "bug", "color": "d73a4a", "description": null}]"#;
        let (base, server) = fake_api(vec![(200, body.to_string())]).await;
        let client = GithubLabels::new(&base, "acme/widgets", None, "devtasks").unwrap();

        let labels = client.list().await.unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].name, "bug");
        assert_eq!(labels[0].description, None);

        let requests = server.await.unwrap();
        assert!(requests[0].starts_with("GET /repos/acme/widgets/labels?per_page=100&page=1 "));
    }

    #[tokio::test]
    async fn test_http_error_carries_status_and_body() {
        let (base, server) =
            fake_api(vec![(404, r#"{"message": "Not Found"}"#.to_string())]).await;
        let client = GithubLabels::new(&base, "acme/widgets", None, "devtasks").unwrap();

        let err = client.delete("bug").await.unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("404"));
        assert!(message.contains("Not Found"));

        let requests = server.await.unwrap();
        assert!(requests[0].starts_with("DELETE /repos/acme/widgets/labels/bug "));
    }

    #[test]
    fn test_label_body_shapes() {
        let create = LabelBody {
            name: Some("bug"),
            new_name: None,
            color: "d73a4a".to_string(),
            description: "",
        };
        let json = serde_json::to_value(&create).unwrap();
        assert_eq!(json["name"], "bug");
        assert!(json.get("new_name").is_none());
    }
}
