//! Common utilities for integration tests

use ghrel::di::mocks::MockConfigProvider;
use ghrel::di::ServiceContainer;
use ghrel::github::{GitHubClient, GitHubTagHelper, ReleaseAsset};
use ghrel::ReleaseManager;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const OWNER: &str = "octo";
pub const REPO: &str = "app";
pub const HEAD_SHA: &str = "5d6e7f8091a2b3c4d5e6f708192a3b4c5d6e7f80";

/// Route log output through the test harness; set `RUST_LOG` to see it
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
pub struct FakeState {
    next_id: u64,
    releases: Vec<Value>,
    tags: HashMap<String, String>,
    downloads: HashMap<String, Vec<u8>>,
}

/// A stateful stand-in for the REST routes the release manager uses.
///
/// One server plays the API, the upload host and the download host.
#[derive(Clone)]
pub struct FakeGitHub {
    base: String,
    state: Arc<Mutex<FakeState>>,
}

impl FakeGitHub {
    pub async fn start() -> (MockServer, Self) {
        let server = MockServer::start().await;
        let fake = Self {
            base: server.uri(),
            state: Arc::new(Mutex::new(FakeState::default())),
        };
        Mock::given(any())
            .respond_with(fake.clone())
            .mount(&server)
            .await;
        (server, fake)
    }

    /// A manager wired to the real client and tag helper
    pub fn manager(&self) -> ReleaseManager {
        let config = MockConfigProvider::with_urls(&self.base, &self.base);
        let client = GitHubClient::new(&config).unwrap();
        let tags = GitHubTagHelper::new(client.clone());
        ServiceContainer::with_providers(Arc::new(config), Arc::new(client), Arc::new(tags))
            .release_manager()
            .unwrap()
    }

    pub fn add_tag(&self, tag: &str, sha: &str) {
        self.state
            .lock()
            .unwrap()
            .tags
            .insert(tag.to_string(), sha.to_string());
    }

    /// Seed a published release whose assets download from this server
    pub fn add_release(&self, tag: &str, created_at: &str, assets: &[(&str, &[u8])]) {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;

        let mut listed = Vec::new();
        for (name, content) in assets {
            let asset = ReleaseAsset {
                id: id * 100 + listed.len() as u64,
                name: name.to_string(),
                browser_download_url: format!("{}/download/{}/{}", self.base, tag, name),
                content_type: "application/octet-stream".to_string(),
                size: content.len() as u64,
            };
            state
                .downloads
                .insert(format!("/download/{}/{}", tag, name), content.to_vec());
            listed.push(serde_json::to_value(asset).unwrap());
        }

        state.releases.push(json!({
            "id": id,
            "tag_name": tag,
            "name": tag,
            "draft": false,
            "prerelease": false,
            "created_at": created_at,
            "html_url": format!("https://github.com/{}/{}/releases/tag/{}", OWNER, REPO, tag),
            "assets": listed,
        }));
    }

    pub fn tag_sha(&self, tag: &str) -> Option<String> {
        self.state.lock().unwrap().tags.get(tag).cloned()
    }

    pub fn release_count(&self) -> usize {
        self.state.lock().unwrap().releases.len()
    }

    fn handle(&self, request: &Request) -> ResponseTemplate {
        let repo_root = format!("/repos/{}/{}", OWNER, REPO);
        let path = request.url.path().to_string();
        let method = request.method.as_str().to_string();
        let mut state = self.state.lock().unwrap();

        if let Some(content) = state.downloads.get(&path) {
            return ResponseTemplate::new(200).set_body_bytes(content.clone());
        }

        let Some(route) = path.strip_prefix(repo_root.as_str()) else {
            return ResponseTemplate::new(404);
        };

        match (method.as_str(), route) {
            ("GET", "") => ResponseTemplate::new(200).set_body_json(json!({
                "default_branch": "main"
            })),
            ("GET", "/git/ref/heads/main") => ResponseTemplate::new(200).set_body_json(json!({
                "ref": "refs/heads/main",
                "object": { "sha": HEAD_SHA }
            })),
            ("GET", r) if r.starts_with("/git/ref/tags/") => {
                let tag = &r["/git/ref/tags/".len()..];
                match state.tags.get(tag) {
                    Some(sha) => ResponseTemplate::new(200).set_body_json(json!({
                        "ref": format!("refs/tags/{}", tag),
                        "object": { "sha": sha }
                    })),
                    None => ResponseTemplate::new(404),
                }
            }
            ("POST", "/git/refs") => {
                let body: Value = serde_json::from_slice(&request.body).unwrap();
                let ref_name = body["ref"].as_str().unwrap_or_default().to_string();
                let sha = body["sha"].as_str().unwrap_or_default().to_string();
                let tag = ref_name.trim_start_matches("refs/tags/").to_string();
                if state.tags.contains_key(&tag) {
                    return ResponseTemplate::new(422)
                        .set_body_string(r#"{"message":"Reference already exists"}"#);
                }
                state.tags.insert(tag, sha.clone());
                ResponseTemplate::new(201).set_body_json(json!({
                    "ref": ref_name,
                    "object": { "sha": sha }
                }))
            }
            ("DELETE", r) if r.starts_with("/git/refs/tags/") => {
                let tag = &r["/git/refs/tags/".len()..];
                match state.tags.remove(tag) {
                    Some(_) => ResponseTemplate::new(204),
                    None => ResponseTemplate::new(422),
                }
            }
            ("GET", "/releases") => {
                let page: usize = request
                    .url
                    .query_pairs()
                    .find(|(k, _)| k == "page")
                    .and_then(|(_, v)| v.parse().ok())
                    .unwrap_or(1);
                // Newest first, like the real listing
                let listed: Vec<Value> = if page == 1 {
                    state.releases.iter().rev().cloned().collect()
                } else {
                    Vec::new()
                };
                ResponseTemplate::new(200).set_body_json(listed)
            }
            ("POST", "/releases") => {
                let body: Value = serde_json::from_slice(&request.body).unwrap();
                let tag = body["tag_name"].as_str().unwrap_or_default().to_string();
                state.next_id += 1;
                let release = json!({
                    "id": state.next_id,
                    "tag_name": tag,
                    "name": body["name"],
                    "body": body["body"],
                    "draft": body["draft"],
                    "prerelease": body["prerelease"],
                    "created_at": "2026-01-01T00:00:00Z",
                    "html_url": format!("https://github.com/{}/{}/releases/tag/{}", OWNER, REPO, tag),
                    "assets": [],
                });
                state.releases.push(release.clone());
                ResponseTemplate::new(201).set_body_json(release)
            }
            ("POST", r) if r.starts_with("/releases/") && r.ends_with("/assets") => {
                let id: u64 = r["/releases/".len()..r.len() - "/assets".len()]
                    .parse()
                    .unwrap_or(0);
                let name = request
                    .url
                    .query_pairs()
                    .find(|(k, _)| k == "name")
                    .map(|(_, v)| v.into_owned())
                    .unwrap_or_default();
                let asset = json!({
                    "id": id * 100 + 1,
                    "name": name,
                    "browser_download_url": format!("https://github.com/{}/{}/releases/download/x/{}", OWNER, REPO, name),
                    "content_type": "application/octet-stream",
                    "size": request.body.len(),
                });
                match state.releases.iter_mut().find(|r| r["id"] == id) {
                    Some(release) => {
                        if let Some(assets) = release["assets"].as_array_mut() {
                            assets.push(asset.clone());
                        }
                        ResponseTemplate::new(201).set_body_json(asset)
                    }
                    None => ResponseTemplate::new(404),
                }
            }
            ("DELETE", r) if r.starts_with("/releases/") => {
                let id: u64 = r["/releases/".len()..].parse().unwrap_or(0);
                let before = state.releases.len();
                state.releases.retain(|r| r["id"] != id);
                if state.releases.len() < before {
                    ResponseTemplate::new(204)
                } else {
                    ResponseTemplate::new(404)
                }
            }
            _ => ResponseTemplate::new(404),
        }
    }
}

impl Respond for FakeGitHub {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        self.handle(request)
    }
}
