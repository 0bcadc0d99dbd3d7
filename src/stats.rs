/// Display value for any statistic that could not be resolved.
pub const NOT_AVAILABLE: &str = "N/A";

/// Maximum number of languages kept in `top_languages`.
pub const TOP_LANGUAGES: usize = 5;

/// Aggregate profile statistics. Every field is resolved independently, so a
/// `None` in one never invalidates the others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub total_stargazers: Option<u64>,
    pub total_commits_last_year: Option<u64>,
    pub total_pull_requests_made: Option<u64>,
    pub rank_level: Option<String>,
    pub top_languages: Option<Vec<String>>,
}

impl Stats {
    /// Result used when the provider produced nothing at all.
    pub fn unknown(default_languages: Option<&[String]>) -> Self {
        Self {
            top_languages: default_languages
                .filter(|langs| !langs.is_empty())
                .map(|langs| langs.iter().take(TOP_LANGUAGES).cloned().collect()),
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total_stargazers.is_some()
            && self.total_commits_last_year.is_some()
            && self.total_pull_requests_made.is_some()
            && self.rank_level.is_some()
            && self.top_languages.is_some()
    }
}

/// One labelled row of the summary block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatLine {
    Stars,
    Commits,
    PullRequests,
    Rank,
    Languages,
}

impl StatLine {
    pub const ALL: [StatLine; 5] = [
        StatLine::Stars,
        StatLine::Commits,
        StatLine::PullRequests,
        StatLine::Rank,
        StatLine::Languages,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatLine::Stars => "Stars",
            StatLine::Commits => "Commits (last year)",
            StatLine::PullRequests => "Pull requests",
            StatLine::Rank => "Rank",
            StatLine::Languages => "Top languages",
        }
    }

    pub fn value(self, stats: &Stats) -> String {
        fn count(v: Option<u64>) -> String {
            v.map(|n| n.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        }

        match self {
            StatLine::Stars => count(stats.total_stargazers),
            StatLine::Commits => count(stats.total_commits_last_year),
            StatLine::PullRequests => count(stats.total_pull_requests_made),
            StatLine::Rank => stats
                .rank_level
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            StatLine::Languages => match &stats.top_languages {
                Some(langs) if !langs.is_empty() => langs
                    .iter()
                    .take(TOP_LANGUAGES)
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
                _ => NOT_AVAILABLE.to_string(),
            },
        }
    }
}

/// Formats the selected rows as `Label: value`, in the order given.
pub fn format_lines(stats: &Stats, lines: &[StatLine]) -> Vec<String> {
    lines
        .iter()
        .map(|line| format!("{}: {}", line.label(), line.value(stats)))
        .collect()
}
