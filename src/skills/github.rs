use crate::error::SklmanError;
use crate::skills::remote::{RemoteSource, RepoId, TreeEntry};
use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::env;

pub const ENV_API_BASE: &str = "SKLMAN_GITHUB_API_BASE";
pub const ENV_RAW_BASE: &str = "SKLMAN_GITHUB_RAW_BASE";

const DEFAULT_API_BASE: &str = "https://api.github.com";
const DEFAULT_RAW_BASE: &str = "https://raw.githubusercontent.com";

#[derive(Debug, Deserialize)]
struct RepoResponse {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeNode>,
}

#[derive(Debug, Deserialize)]
struct TreeNode {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

/// GitHub-backed [`RemoteSource`]: repository metadata and tree listings via
/// the REST API, file contents via raw.githubusercontent.com. One attempt
/// per request, no retries.
pub struct GithubClient {
    client: reqwest::blocking::Client,
    api_base: String,
    raw_base: String,
}

impl GithubClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("sklman/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_base: base_url(ENV_API_BASE, DEFAULT_API_BASE),
            raw_base: base_url(ENV_RAW_BASE, DEFAULT_RAW_BASE),
        })
    }

    fn get_api(&self, url: &str) -> Result<reqwest::blocking::Response> {
        let resp = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("GET {url}"))?;
        if !resp.status().is_success() {
            let status = resp.status();
            return Err(SklmanError::RemoteAccess {
                message: t!("errors.remote_status", url = url, status = status).to_string(),
            }
            .into());
        }
        Ok(resp)
    }
}

impl RemoteSource for GithubClient {
    fn default_branch(&self, repo: &RepoId) -> Result<String> {
        let url = format!("{}/repos/{}", self.api_base, repo);
        let parsed: RepoResponse = self
            .get_api(&url)?
            .json()
            .with_context(|| format!("parse {url}"))?;
        Ok(parsed.default_branch)
    }

    fn list_tree(&self, repo: &RepoId, branch: &str) -> Result<Vec<TreeEntry>> {
        let url = format!(
            "{}/repos/{}/git/trees/{}?recursive=1",
            self.api_base, repo, branch
        );
        let parsed: TreeResponse = self
            .get_api(&url)?
            .json()
            .with_context(|| format!("parse {url}"))?;
        Ok(parsed
            .tree
            .into_iter()
            .map(|node| TreeEntry {
                path: node.path,
                is_blob: node.kind == "blob",
            })
            .collect())
    }

    fn fetch_file(&self, repo: &RepoId, branch: &str, path: &str) -> Result<Vec<u8>> {
        let url = format!("{}/{}/{}/{}", self.raw_base, repo, branch, path);
        let resp = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("GET {url}"))?;
        if !resp.status().is_success() {
            return Err(anyhow!("HTTP {}", resp.status()));
        }
        Ok(resp.bytes()?.to_vec())
    }
}

fn base_url(env_key: &str, default: &str) -> String {
    env::var(env_key)
        .ok()
        .map(|value| value.trim().trim_end_matches('/').to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}
