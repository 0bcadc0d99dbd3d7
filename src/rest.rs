use crate::error::{FetchError, Result};
use crate::rank::{self, RankInputs};
use crate::resolver::StatsProvider;
use crate::stats::{Stats, TOP_LANGUAGES};
use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

const API_ROOT: &str = "https://api.github.com";
const USER_AGENT: &str = "profile-terminal";

/// Public, unauthenticated GitHub REST provider. Subject to the anonymous
/// rate limit, which is why the resolver can fall back to GraphQL.
pub struct RestProvider {
    http: Client,
}

#[derive(Deserialize)]
struct UserResponse {
    followers: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RepoEntry {
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    fork: bool,
}

#[derive(Deserialize)]
struct SearchCount {
    total_count: u64,
}

impl RestProvider {
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { http })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let resp = self
            .http
            .get(format!("{API_ROOT}{path}"))
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn search_count(&self, kind: &str, q: &str) -> Result<u64> {
        let found: SearchCount = self
            .get_json(&format!("/search/{kind}"), &[("q", q), ("per_page", "1")])
            .await?;
        Ok(found.total_count)
    }

    /// Search totals are optional: a failed search leaves its field unknown.
    async fn optional_count(&self, login: &str, kind: &str, q: &str) -> Option<u64> {
        match self.search_count(kind, q).await {
            Ok(n) => Some(n),
            Err(e) => {
                warn!(user = login, query = q, error = %e, "GitHub search failed");
                None
            }
        }
    }
}

#[async_trait]
impl StatsProvider for RestProvider {
    async fn fetch(&self, login: &str) -> Result<Stats> {
        let user: UserResponse = self.get_json(&format!("/users/{login}"), &[]).await?;
        let repos: Vec<RepoEntry> = self
            .get_json(
                &format!("/users/{login}/repos"),
                &[("type", "owner"), ("per_page", "100")],
            )
            .await?;
        let owned: Vec<RepoEntry> = repos.into_iter().filter(|r| !r.fork).collect();
        debug!(user = login, repos = owned.len(), "fetched owned repositories");

        let since = (Utc::now() - TimeDelta::days(365)).format("%Y-%m-%d");
        let prs = self
            .optional_count(login, "issues", &format!("author:{login} type:pr"))
            .await;
        let issues = self
            .optional_count(login, "issues", &format!("author:{login} type:issue"))
            .await;
        let commits = self
            .optional_count(
                login,
                "commits",
                &format!("author:{login} committer-date:>={since}"),
            )
            .await;

        Ok(assemble(&owned, user.followers, commits, prs, issues))
    }
}

/// Build the result from REST data. Rank needs every input, so an unknown
/// commit, PR or issue total leaves the rank unknown as well.
pub(crate) fn assemble(
    repos: &[RepoEntry],
    followers: u64,
    commits: Option<u64>,
    prs: Option<u64>,
    issues: Option<u64>,
) -> Stats {
    let stars = total_stars(repos);
    let languages = top_languages(repos);

    let rank_level = match (commits, prs, issues) {
        (Some(commits), Some(prs), Some(issues)) => {
            let rank = rank::calculate(&RankInputs {
                commits,
                prs,
                issues,
                reviews: 0,
                stars,
                followers,
            });
            debug!(level = rank.level, percentile = rank.percentile, "computed rank");
            Some(rank.level.to_string())
        }
        _ => None,
    };

    Stats {
        total_stargazers: Some(stars),
        total_commits_last_year: commits,
        total_pull_requests_made: prs,
        rank_level,
        top_languages: (!languages.is_empty()).then_some(languages),
    }
}

pub(crate) fn total_stars(repos: &[RepoEntry]) -> u64 {
    repos.iter().map(|r| r.stargazers_count).sum()
}

/// Languages ranked by the summed size of the repositories they dominate.
pub(crate) fn top_languages(repos: &[RepoEntry]) -> Vec<String> {
    let mut sizes: HashMap<&str, u64> = HashMap::new();
    for repo in repos {
        if let Some(lang) = repo.language.as_deref() {
            *sizes.entry(lang).or_default() += repo.size;
        }
    }

    let mut ranked: Vec<(&str, u64)> = sizes.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(TOP_LANGUAGES)
        .map(|(lang, _)| lang.to_string())
        .collect()
}
