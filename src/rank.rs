//! rank.rs
//!
//! Letter-grade rank for a profile, in the same scheme GitHub readme-stats
//! cards use. Each activity metric is normalised by a median and squashed
//! through a CDF; the weighted mean becomes a percentile (lower is better),
//! which is then bucketed into a level.

const COMMITS_MEDIAN: f64 = 250.0;
const COMMITS_WEIGHT: f64 = 2.0;
const PRS_MEDIAN: f64 = 50.0;
const PRS_WEIGHT: f64 = 3.0;
const ISSUES_MEDIAN: f64 = 25.0;
const ISSUES_WEIGHT: f64 = 1.0;
const REVIEWS_MEDIAN: f64 = 2.0;
const REVIEWS_WEIGHT: f64 = 1.0;
const STARS_MEDIAN: f64 = 50.0;
const STARS_WEIGHT: f64 = 4.0;
const FOLLOWERS_MEDIAN: f64 = 10.0;
const FOLLOWERS_WEIGHT: f64 = 1.0;

const TOTAL_WEIGHT: f64 = COMMITS_WEIGHT
    + PRS_WEIGHT
    + ISSUES_WEIGHT
    + REVIEWS_WEIGHT
    + STARS_WEIGHT
    + FOLLOWERS_WEIGHT;

const THRESHOLDS: [f64; 9] = [1.0, 12.5, 25.0, 37.5, 50.0, 62.5, 75.0, 87.5, 100.0];
const LEVELS: [&str; 9] = ["S", "A+", "A", "A-", "B+", "B", "B-", "C+", "C"];

#[derive(Debug, Clone, Copy, Default)]
pub struct RankInputs {
    pub commits: u64,
    pub prs: u64,
    pub issues: u64,
    pub reviews: u64,
    pub stars: u64,
    pub followers: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rank {
    pub level: &'static str,
    pub percentile: f64,
}

fn exponential_cdf(x: f64) -> f64 {
    1.0 - 2f64.powf(-x)
}

fn log_normal_cdf(x: f64) -> f64 {
    x / (1.0 + x)
}

pub fn calculate(inputs: &RankInputs) -> Rank {
    let score = COMMITS_WEIGHT * exponential_cdf(inputs.commits as f64 / COMMITS_MEDIAN)
        + PRS_WEIGHT * exponential_cdf(inputs.prs as f64 / PRS_MEDIAN)
        + ISSUES_WEIGHT * exponential_cdf(inputs.issues as f64 / ISSUES_MEDIAN)
        + REVIEWS_WEIGHT * exponential_cdf(inputs.reviews as f64 / REVIEWS_MEDIAN)
        + STARS_WEIGHT * log_normal_cdf(inputs.stars as f64 / STARS_MEDIAN)
        + FOLLOWERS_WEIGHT * log_normal_cdf(inputs.followers as f64 / FOLLOWERS_MEDIAN);

    let percentile = (1.0 - score / TOTAL_WEIGHT) * 100.0;
    let level = THRESHOLDS
        .iter()
        .position(|t| percentile <= *t)
        .map(|i| LEVELS[i])
        .unwrap_or(LEVELS[LEVELS.len() - 1]);

    Rank { level, percentile }
}
