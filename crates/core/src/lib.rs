//! Core calculation engine.
//!
//! Computes the next semantic version from git history, tags, branch names,
//! and declarative configuration, independent of whether the repository is
//! read from disk or a forge's HTTP API — both are [`repository::RepositoryPort`]
//! implementations.

pub mod calculator;
pub mod config;
pub mod context;
pub mod errors;
pub mod increment;
pub mod output;
pub mod repository;
pub mod strategies;
pub mod version;

pub use calculator::{calculate, CalculationResult};
pub use config::{Builder as ConfigBuilder, Config, EffectiveConfiguration};
pub use context::{Context, ContextOptions};
pub use errors::{CoreError, CoreResult};
pub use repository::RepositoryPort;
pub use version::SemanticVersion;

/// Runs the full calculation pipeline: resolves context, evaluates every
/// strategy, and returns the result plus its rendered output variables.
pub async fn run(
    repo: &dyn RepositoryPort,
    config: &Config,
    options: &ContextOptions,
) -> CoreResult<(CalculationResult, std::collections::BTreeMap<String, String>)> {
    let ctx = Context::resolve(repo, config, options).await?;
    let result = calculate(&ctx).await?;
    let vars = output::variables(&ctx, &result);
    Ok((result, vars))
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
