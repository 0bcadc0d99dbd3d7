mod config;
mod error;
mod github;
mod rank;
mod readme;
mod resolver;
mod rest;
mod session;
mod stats;
mod svg;
mod terminal;

use anyhow::{Context, Result};
use chrono::Utc;
use config::Config;
use github::GithubClient;
use resolver::Resolver;
use rest::RestProvider;
use std::fs;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();

    // Stats are best effort: the resolver never fails.
    let provider = match RestProvider::new(config.provider_timeout) {
        Ok(provider) => Some(provider),
        Err(e) => {
            warn!(error = %e, "could not build REST client, stats provider disabled");
            None
        }
    };
    let commit_query = match config.github_token.as_deref() {
        Some(token) => match GithubClient::new(token, config.query_timeout) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(error = %e, "could not build GraphQL client, commit fallback disabled");
                None
            }
        },
        None => None,
    };
    let resolver = Resolver::new(provider, commit_query, config.default_languages.clone());
    let stats = resolver.resolve(&config.username).await;

    // Output artifacts are not: any failure here aborts the run.
    let recording = session::record_session(&config, &stats);
    let image = svg::render(&recording);
    fs::write(&config.output_image, image)
        .with_context(|| format!("failed to write {}", config.output_image.display()))?;

    let image_name = config
        .output_image
        .file_name()
        .and_then(|n| n.to_str())
        .context("output image path has no file name")?;
    let readme = readme::build_readme(image_name, Utc::now());
    fs::write(&config.readme_path, readme)
        .with_context(|| format!("failed to write {}", config.readme_path.display()))?;

    info!(
        image = %config.output_image.display(),
        readme = %config.readme_path.display(),
        frames = recording.total_frames(),
        "generated profile terminal"
    );

    Ok(())
}
