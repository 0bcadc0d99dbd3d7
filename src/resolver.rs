//! Stats acquisition fallback chain.
//!
//! 1. primary provider (any error means "no result")
//! 2. authenticated commit query, only when the commit count is still unknown
//!    and a query client was supplied
//! 3. whatever remains unknown renders as `N/A`; a configured default
//!    language list stands in when the provider failed outright
//!
//! Every step is tried at most once and nothing here returns an error.

use crate::error::{FetchError, Result};
use crate::stats::Stats;
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Primary source of aggregate profile statistics.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    async fn fetch(&self, login: &str) -> Result<Stats>;
}

/// Narrow, credentialed source for the commit count alone.
#[async_trait]
pub trait CommitQuery: Send + Sync {
    async fn commit_count(&self, login: &str) -> Result<u64>;
}

/// A provider whose client could not be built answers every fetch with
/// [`FetchError::Unavailable`], so the chain moves straight on to step 2.
#[async_trait]
impl<P: StatsProvider> StatsProvider for Option<P> {
    async fn fetch(&self, login: &str) -> Result<Stats> {
        match self {
            Some(provider) => provider.fetch(login).await,
            None => Err(FetchError::Unavailable("stats provider".to_string())),
        }
    }
}

pub struct Resolver<P, Q> {
    provider: P,
    commit_query: Option<Q>,
    default_languages: Option<Vec<String>>,
}

impl<P: StatsProvider, Q: CommitQuery> Resolver<P, Q> {
    /// `commit_query` is `None` when no credential is available, which
    /// disables step 2 entirely.
    pub fn new(
        provider: P,
        commit_query: Option<Q>,
        default_languages: Option<Vec<String>>,
    ) -> Self {
        Self {
            provider,
            commit_query,
            default_languages,
        }
    }

    pub async fn resolve(&self, login: &str) -> Stats {
        let mut stats = match self.provider.fetch(login).await {
            Ok(stats) => stats,
            Err(e) => {
                warn!(user = login, error = %e, "stats provider unavailable");
                Stats::unknown(self.default_languages.as_deref())
            }
        };

        if stats.total_commits_last_year.is_none() {
            stats.total_commits_last_year = self.fallback_commits(login).await;
        }

        if stats.is_complete() {
            info!(user = login, "resolved all statistics");
        } else {
            info!(user = login, ?stats, "resolved statistics with gaps");
        }
        stats
    }

    async fn fallback_commits(&self, login: &str) -> Option<u64> {
        let Some(query) = &self.commit_query else {
            debug!(user = login, "no token configured, skipping commit query");
            return None;
        };

        match query.commit_count(login).await {
            Ok(n) => Some(n),
            Err(e) => {
                warn!(user = login, error = %e, "commit query failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::parse_commit_count;
    use crate::stats::{StatLine, format_lines};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Outcome {
        Ok(Stats),
        Timeout,
        Malformed,
    }

    struct FakeProvider {
        outcome: Outcome,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn new(outcome: Outcome) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl StatsProvider for FakeProvider {
        async fn fetch(&self, _login: &str) -> Result<Stats> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.outcome {
                Outcome::Ok(stats) => Ok(stats.clone()),
                Outcome::Timeout => Err(FetchError::Timeout),
                Outcome::Malformed => Err(FetchError::Parse("expected value".into())),
            }
        }
    }

    /// Answers with a canned GraphQL body, run through the real decoder.
    struct FakeQuery {
        body: &'static str,
        calls: AtomicUsize,
    }

    impl FakeQuery {
        fn new(body: &'static str) -> Self {
            Self {
                body,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CommitQuery for FakeQuery {
        async fn commit_count(&self, _login: &str) -> Result<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            parse_commit_count(self.body)
        }
    }

    struct TimeoutQuery;

    #[async_trait]
    impl CommitQuery for TimeoutQuery {
        async fn commit_count(&self, _login: &str) -> Result<u64> {
            Err(FetchError::Timeout)
        }
    }

    const COMMITS_19: &str =
        r#"{"data":{"user":{"contributionsCollection":{"totalCommitContributions": 19}}}}"#;

    fn full() -> Stats {
        Stats {
            total_stargazers: Some(42),
            total_commits_last_year: Some(7),
            total_pull_requests_made: Some(3),
            rank_level: Some("A+".to_string()),
            top_languages: Some(vec!["Python".to_string(), "Go".to_string()]),
        }
    }

    fn lines(stats: &Stats) -> Vec<String> {
        format_lines(stats, &StatLine::ALL)
    }

    #[tokio::test]
    async fn full_provider_result_is_used_as_is() {
        let resolver = Resolver::new(
            FakeProvider::new(Outcome::Ok(full())),
            Some(FakeQuery::new(COMMITS_19)),
            None,
        );

        let stats = resolver.resolve("octocat").await;

        assert_eq!(
            lines(&stats),
            vec![
                "Stars: 42",
                "Commits (last year): 7",
                "Pull requests: 3",
                "Rank: A+",
                "Top languages: Python, Go",
            ]
        );
        let query = resolver.commit_query.as_ref().unwrap();
        assert_eq!(query.calls.load(Ordering::SeqCst), 0);
        assert_eq!(resolver.provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn timeout_without_token_is_all_not_available() {
        let resolver: Resolver<_, FakeQuery> =
            Resolver::new(FakeProvider::new(Outcome::Timeout), None, None);

        let stats = resolver.resolve("octocat").await;

        assert_eq!(stats, Stats::default());
        assert!(lines(&stats).iter().all(|l| l.ends_with("N/A")));
    }

    #[tokio::test]
    async fn missing_commits_filled_by_query() {
        let partial = Stats {
            total_commits_last_year: None,
            ..full()
        };
        let resolver = Resolver::new(
            FakeProvider::new(Outcome::Ok(partial)),
            Some(FakeQuery::new(COMMITS_19)),
            None,
        );

        let stats = resolver.resolve("octocat").await;

        assert_eq!(stats.total_commits_last_year, Some(19));
        assert_eq!(stats.total_stargazers, Some(42));
        assert_eq!(stats.rank_level.as_deref(), Some("A+"));
        assert_eq!(StatLine::Commits.value(&stats), "19");
        let query = resolver.commit_query.as_ref().unwrap();
        assert_eq!(query.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn malformed_query_response_leaves_commits_unknown() {
        let partial = Stats {
            total_commits_last_year: None,
            ..full()
        };
        let resolver = Resolver::new(
            FakeProvider::new(Outcome::Ok(partial)),
            Some(FakeQuery::new(r#"{"data": {"user": "#)),
            None,
        );

        let stats = resolver.resolve("octocat").await;

        assert_eq!(StatLine::Commits.value(&stats), "N/A");
        assert_eq!(StatLine::Stars.value(&stats), "42");
    }

    #[tokio::test]
    async fn provider_failure_with_token_still_queries_commits() {
        let resolver = Resolver::new(
            FakeProvider::new(Outcome::Malformed),
            Some(FakeQuery::new(COMMITS_19)),
            None,
        );

        let stats = resolver.resolve("octocat").await;

        assert_eq!(stats.total_commits_last_year, Some(19));
        assert_eq!(stats.total_stargazers, None);
        assert_eq!(stats.top_languages, None);
    }

    #[tokio::test]
    async fn missing_provider_still_queries_commits() {
        let resolver = Resolver::new(
            None::<FakeProvider>,
            Some(FakeQuery::new(COMMITS_19)),
            Some(vec!["Go".to_string()]),
        );

        let stats = resolver.resolve("octocat").await;

        assert_eq!(stats.total_commits_last_year, Some(19));
        assert_eq!(stats.total_stargazers, None);
        assert_eq!(StatLine::Languages.value(&stats), "Go");
        let query = resolver.commit_query.as_ref().unwrap();
        assert_eq!(query.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn query_timeout_is_swallowed() {
        let resolver = Resolver::new(
            FakeProvider::new(Outcome::Timeout),
            Some(TimeoutQuery),
            None,
        );

        assert_eq!(resolver.resolve("octocat").await, Stats::default());
    }

    #[tokio::test]
    async fn provider_failure_uses_default_languages() {
        let defaults = vec!["Python".to_string(), "Rust".to_string()];
        let resolver: Resolver<_, FakeQuery> = Resolver::new(
            FakeProvider::new(Outcome::Timeout),
            None,
            Some(defaults),
        );

        let stats = resolver.resolve("octocat").await;

        assert_eq!(StatLine::Languages.value(&stats), "Python, Rust");
        assert_eq!(StatLine::Rank.value(&stats), "N/A");
    }

    #[tokio::test]
    async fn default_languages_ignored_when_provider_succeeds() {
        let partial = Stats {
            top_languages: None,
            ..full()
        };
        let resolver: Resolver<_, FakeQuery> = Resolver::new(
            FakeProvider::new(Outcome::Ok(partial)),
            None,
            Some(vec!["Python".to_string()]),
        );

        let stats = resolver.resolve("octocat").await;

        assert_eq!(stats.top_languages, None);
    }
}
