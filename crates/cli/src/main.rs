//! Command-line interface for nextver.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod errors;

use errors::{CliError, CliResult};

use nextver_core::calculator::calculate as run_calculator;
use nextver_core::output::{variables, ExplainTrace};
use nextver_core::{Context, ContextOptions, RepositoryPort};

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// nextver: compute the next semantic version from git history
#[derive(Parser, Debug)]
#[command(name = "nextver")]
#[command(about = "Computes the next semantic version from git history, tags, and configuration")]
#[command(version)]
struct Cli {
    /// Local repository path to calculate against
    #[arg(short, long, global = true, default_value = ".")]
    path: PathBuf,

    /// Override the target branch (defaults to the current branch)
    #[arg(short, long, global = true)]
    branch: Option<String>,

    /// Override the target commit sha (defaults to the branch tip)
    #[arg(short, long, global = true)]
    commit: Option<String>,

    /// Explicit configuration file path (skips auto-discovery)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format for the calculated variables
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::KeyValue)]
    output: OutputFormat,

    /// Print a single variable's value and exit
    #[arg(long, global = true, value_name = "VARIABLE")]
    show_variable: Option<String>,

    /// Print the effective configuration for the resolved branch as JSON and exit
    #[arg(long, global = true)]
    show_config: bool,

    /// Emit the strategy evaluation trace to stderr
    #[arg(long, global = true)]
    explain: bool,

    /// Logging verbosity
    #[arg(short = 'v', long, global = true, value_enum, default_value_t = Verbosity::Info)]
    verbosity: Verbosity,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate against a remote repository through its forge HTTP API
    Remote(RemoteArgs),
}

#[derive(Args, Debug)]
struct RemoteArgs {
    /// Repository in `owner/repo` form
    owner_repo: String,

    /// GitHub personal access token (falls back to `GITHUB_TOKEN`)
    #[arg(long)]
    token: Option<String>,

    /// GitHub App ID (falls back to `GH_APP_ID`)
    #[arg(long)]
    github_app_id: Option<u64>,

    /// GitHub App private key, PEM contents (falls back to `GH_APP_PRIVATE_KEY`)
    #[arg(long)]
    github_app_key: Option<String>,

    /// GitHub App private key, path to a PEM file (falls back to `GH_APP_PRIVATE_KEY_PATH`)
    #[arg(long)]
    github_app_key_path: Option<PathBuf>,

    /// Base URL of the GitHub API (falls back to `GITHUB_API_URL`)
    #[arg(long)]
    github_url: Option<String>,

    /// Git ref to calculate against on the remote (defaults to the repository's default branch)
    #[arg(long = "ref")]
    git_ref: Option<String>,

    /// Hard cap on commits scanned by an unbounded history walk
    #[arg(long, default_value_t = 1000)]
    max_commits: usize,

    /// Explicit remote path to the configuration file, relative to the repository root
    #[arg(long)]
    remote_config_path: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Buildserver,
    KeyValue,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Verbosity {
    Quiet,
    Info,
    Debug,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbosity);

    if let Err(err) = run(&cli).await {
        eprintln!("{} {err}", "error:".red().bold());
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        None => run_local(cli).await,
        Some(Command::Remote(args)) => run_remote(cli, args).await,
    }
}

async fn run_local(cli: &Cli) -> CliResult<()> {
    let repo = nextver_git::LocalRepositoryAdapter::open(&cli.path)?;
    let config = nextver_config::ConfigLoader::new(&cli.path).load(cli.config.as_deref())?;
    produce_output(cli, &repo, &config).await
}

async fn run_remote(cli: &Cli, args: &RemoteArgs) -> CliResult<()> {
    let (owner, repo_name) = args.owner_repo.split_once('/').ok_or_else(|| {
        CliError::invalid_argument("owner/repo", "must be in the form 'owner/repo'")
    })?;

    let client = build_remote_client(args).await?;
    let mut adapter = nextver_github::GitHubRepositoryAdapter::new(client, owner, repo_name);
    adapter.set_max_commits(args.max_commits);

    let config = load_remote_config(&adapter, args).await?;

    let mut options_cli = Cli {
        branch: cli.branch.clone().or_else(|| args.git_ref.clone()),
        ..clone_global_flags(cli)
    };
    options_cli.command = None;

    produce_output(&options_cli, &adapter, &config).await
}

/// Builds a `Cli` carrying only the global flags, for reuse between the
/// local and remote paths without duplicating the output/explain logic.
fn clone_global_flags(cli: &Cli) -> Cli {
    Cli {
        path: cli.path.clone(),
        branch: cli.branch.clone(),
        commit: cli.commit.clone(),
        config: cli.config.clone(),
        output: cli.output,
        show_variable: cli.show_variable.clone(),
        show_config: cli.show_config,
        explain: cli.explain,
        verbosity: cli.verbosity,
        command: None,
    }
}

async fn build_remote_client(args: &RemoteArgs) -> CliResult<octocrab::Octocrab> {
    let base_url = args
        .github_url
        .clone()
        .or_else(|| std::env::var("GITHUB_API_URL").ok());

    let app_id = args
        .github_app_id
        .or_else(|| std::env::var("GH_APP_ID").ok().and_then(|v| v.parse().ok()));

    if let Some(app_id) = app_id {
        let key = resolve_app_key(args)?;
        return nextver_github::create_app_client_with_base_url(app_id, &key, base_url.as_deref())
            .await
            .map_err(CliError::from);
    }

    let token = args
        .token
        .clone()
        .or_else(|| std::env::var("GITHUB_TOKEN").ok())
        .ok_or_else(|| {
            CliError::missing_dependency(
                "token",
                "set --token, --github-app-id, or the GITHUB_TOKEN environment variable",
            )
        })?;

    nextver_github::create_token_client_with_base_url(&token, base_url.as_deref())
        .map_err(CliError::from)
}

fn resolve_app_key(args: &RemoteArgs) -> CliResult<String> {
    if let Some(key) = &args.github_app_key {
        return Ok(key.clone());
    }
    if let Ok(key) = std::env::var("GH_APP_PRIVATE_KEY") {
        return Ok(key);
    }

    let path = args
        .github_app_key_path
        .clone()
        .or_else(|| std::env::var("GH_APP_PRIVATE_KEY_PATH").ok().map(PathBuf::from))
        .ok_or_else(|| {
            CliError::missing_dependency(
                "github-app-key",
                "set --github-app-key, --github-app-key-path, GH_APP_PRIVATE_KEY, or GH_APP_PRIVATE_KEY_PATH",
            )
        })?;

    Ok(std::fs::read_to_string(path)?)
}

async fn load_remote_config(
    adapter: &nextver_github::GitHubRepositoryAdapter,
    args: &RemoteArgs,
) -> CliResult<nextver_core::Config> {
    let path = args
        .remote_config_path
        .as_deref()
        .and_then(|p| p.to_str())
        .unwrap_or("GitVersion.yml");

    match adapter.read_file(path).await {
        Ok(content) => {
            let format = nextver_config::FormatDetector::detect_from_path(std::path::Path::new(path))
                .unwrap_or(nextver_config::ConfigFormat::Yaml);
            Ok(format.parse(&content).map_err(CliError::from)?)
        }
        Err(_) => Ok(nextver_core::Config::default()),
    }
}

async fn produce_output(
    cli: &Cli,
    repo: &dyn RepositoryPort,
    config: &nextver_core::Config,
) -> CliResult<()> {
    let options = ContextOptions {
        target_branch: cli.branch.clone(),
        commit_id: cli.commit.clone(),
    };
    let ctx = Context::resolve(repo, config, &options).await?;

    if cli.show_config {
        println!("{}", render_effective_config(&ctx)?);
        return Ok(());
    }

    let result = run_calculator(&ctx).await?;
    let mut vars = variables(&ctx, &result);
    let uncommitted = repo.uncommitted_changes().await.unwrap_or(0);
    vars.insert("UncommittedChanges".into(), uncommitted.to_string());

    if cli.explain {
        eprint!("{}", ExplainTrace { result: &result }.render());
    }

    if let Some(name) = &cli.show_variable {
        let value = vars.get(name).ok_or_else(|| {
            CliError::invalid_argument("--show-variable", format!("unknown variable '{name}'"))
        })?;
        println!("{value}");
        return Ok(());
    }

    println!("{}", format_variables(&vars, cli.output)?);
    Ok(())
}

fn format_variables(
    vars: &std::collections::BTreeMap<String, String>,
    format: OutputFormat,
) -> CliResult<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(vars)?,
        OutputFormat::Buildserver => vars
            .iter()
            .map(|(key, value)| format!("export {key}={value}"))
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::KeyValue => vars
            .iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<_>>()
            .join("\n"),
    };
    Ok(rendered)
}

/// Serializable projection of `EffectiveConfiguration`, whose `tag_prefix`
/// is a compiled `Regex` and so isn't `Serialize` itself.
#[derive(serde::Serialize)]
struct EffectiveConfigView<'a> {
    tag_prefix: &'a str,
    increment_default: String,
    mode: String,
    mainline_increment: String,
    label: &'a str,
    is_release_branch: bool,
    is_mainline: bool,
    prevent_increment: bool,
    tracks_release_branches: bool,
    source_branches: &'a [String],
    commit_message_convention: String,
    pre_release_weight: u32,
    cd_fallback_tag: &'a str,
    versioning_scheme: String,
}

fn render_effective_config(ctx: &Context<'_>) -> CliResult<String> {
    let effective = &ctx.effective;
    let view = EffectiveConfigView {
        tag_prefix: effective.tag_prefix.as_str(),
        increment_default: format!("{:?}", effective.increment_default),
        mode: format!("{:?}", effective.mode),
        mainline_increment: format!("{:?}", effective.mainline_increment),
        label: &effective.label,
        is_release_branch: effective.is_release_branch,
        is_mainline: effective.is_mainline,
        prevent_increment: effective.prevent_increment,
        tracks_release_branches: effective.tracks_release_branches,
        source_branches: &effective.source_branches,
        commit_message_convention: format!("{:?}", effective.commit_message_convention),
        pre_release_weight: effective.pre_release_weight,
        cd_fallback_tag: &effective.cd_fallback_tag,
        versioning_scheme: format!("{:?}", effective.versioning_scheme),
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

fn setup_logging(verbosity: Verbosity) {
    let filter = match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Info => "info",
        Verbosity::Debug => "debug",
    };
    debug!(filter, "initializing logging");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
