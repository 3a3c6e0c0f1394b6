//! `autostatus` entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration**: command-line flags with environment fallbacks,
//!    optionally layered over a JSON [`GithubConfig`] file.
//! 2. **Wire observability**: see [`telemetry`].
//! 3. **Construct notifiers**: build a [`GithubStatusClient`] for the
//!    repository, wrap it in a [`GithubBuildNotifier`], and register it with a
//!    [`BuildNotifierManager`].
//! 4. **Dispatch**: forward the requested event to every enabled notifier.
//!
//! Reporting is best effort: once configuration is valid the process exits 0
//! whether or not GitHub accepted the status.

mod telemetry;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use github::{GithubBuildNotifier, GithubConfig, GithubStatusClient};
use notifier::{
    BuildNotifierManager, BuildState, CommitSha, CommitStatusClient, RepositoryId, TargetUrl,
};
use tracing::{info, warn, Level};

#[derive(Debug, Parser)]
#[command(name = "autostatus")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Report build stage status as GitHub commit statuses", long_about = None)]
struct Cli {
    /// Repository in owner/name form
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repo: Option<RepositoryId>,

    /// Commit the statuses are attached to
    #[arg(long, env = "GIT_COMMIT")]
    sha: CommitSha,

    /// Link back to the build, shown next to each status
    #[arg(long, env = "BUILD_URL")]
    target_url: Option<TargetUrl>,

    /// Job name used as logging context
    #[arg(long, env = "JOB_NAME", default_value = "build")]
    job: String,

    /// GitHub token; without one the GitHub notifier is disabled
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// GitHub REST base URL (overrides the config file)
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    /// Per-request timeout in seconds (overrides the config file)
    #[arg(long, env = "AUTOSTATUS_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Ignore HTTP(S)_PROXY settings
    #[arg(long)]
    no_proxy: bool,

    /// JSON file with GitHub connection settings
    #[arg(long, env = "AUTOSTATUS_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Report a stage transition
    Stage {
        /// Stage name, used as the status context
        #[arg(long)]
        stage: String,

        /// New state (pending, completed-success, skipped-failure, ...)
        #[arg(long)]
        state: BuildState,

        /// How long the stage ran, in milliseconds
        #[arg(long, default_value_t = 0)]
        duration_ms: u64,
    },

    /// Report the outcome of the whole build
    Final {
        #[arg(long)]
        state: BuildState,

        /// Total build time, in milliseconds
        #[arg(long, default_value_t = 0)]
        duration_ms: u64,

        /// Time spent queued before the build started, in milliseconds
        #[arg(long, default_value_t = 0)]
        blocked_ms: u64,
    },

    /// Report a failure that happened outside any stage
    Error {
        /// Name to report the failure under
        #[arg(long)]
        stage: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let telemetry = telemetry::init(cli.json, level)?;

    let result = run(cli).await;
    telemetry.shutdown().await;
    result
}

async fn run(cli: Cli) -> Result<()> {
    let file_config = cli.config.as_deref().map(load_config_file).transpose()?;
    let config = github_config(&cli, file_config);
    let manager = build_manager(
        &cli.job,
        cli.repo.clone(),
        cli.sha.clone(),
        cli.target_url.clone(),
        &config,
    )?;

    if manager.is_empty() {
        warn!(job = %cli.job, "No notifiers enabled; nothing to report");
        return Ok(());
    }

    dispatch(&manager, &cli.command).await;
    info!(job = %cli.job, sha = %cli.sha, "Notification dispatched");
    Ok(())
}

async fn dispatch(manager: &BuildNotifierManager, command: &Command) {
    match command {
        Command::Stage {
            stage,
            state,
            duration_ms,
        } => {
            manager
                .notify_build_stage_status(stage, *state, Duration::from_millis(*duration_ms))
                .await;
        }
        Command::Final {
            state,
            duration_ms,
            blocked_ms,
        } => {
            manager
                .notify_final_build_status(
                    *state,
                    Duration::from_millis(*duration_ms),
                    Duration::from_millis(*blocked_ms),
                )
                .await;
        }
        Command::Error { stage } => manager.send_non_stage_error(stage).await,
    }
}

fn load_config_file(path: &Path) -> Result<GithubConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

/// Flags and environment variables win over the file; the file wins over
/// built-in defaults.
fn github_config(cli: &Cli, file: Option<GithubConfig>) -> GithubConfig {
    let mut config = file.unwrap_or_default();
    if let Some(api_url) = &cli.api_url {
        config.api_url = api_url.clone();
    }
    if let Some(token) = &cli.token {
        config.token = Some(token.clone());
    }
    if let Some(timeout) = cli.timeout_secs {
        config.request_timeout_secs = timeout;
    }
    if cli.no_proxy {
        config.use_system_proxy = false;
    }
    config
}

/// Registers the GitHub notifier. It is disabled (and therefore not
/// registered) when either the repository or the token is missing.
fn build_manager(
    job: &str,
    repo: Option<RepositoryId>,
    sha: CommitSha,
    target_url: Option<TargetUrl>,
    config: &GithubConfig,
) -> Result<BuildNotifierManager> {
    let client: Option<Arc<dyn CommitStatusClient>> = match (repo, config.token()) {
        (Some(repo), Some(_)) => {
            let label = repo.to_string();
            let client = GithubStatusClient::new(config, repo)
                .with_context(|| format!("Failed to configure GitHub client for {label}"))?;
            Some(Arc::new(client))
        }
        _ => None,
    };

    let mut manager = BuildNotifierManager::new(job);
    let github = GithubBuildNotifier::new(client, sha, target_url);
    if !manager.add_notifier(Arc::new(github)) {
        warn!(job = %job, "GitHub notifier disabled: repository or token not configured");
    }
    Ok(manager)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use notifier::fakes::{NotifierCall, RecordingNotifier};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    const SHA: &str = "6dcb09b5b57875f334f61aebed695e2e4193db5e";

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["autostatus", "--sha", SHA, "--job", "acme/main"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("valid arguments")
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_stage_command() {
        let cli = parse(&[
            "--repo",
            "octocat/hello-world",
            "stage",
            "--stage",
            "build",
            "--state",
            "completed-success",
            "--duration-ms",
            "1200",
        ]);

        assert_eq!(cli.repo.unwrap().to_string(), "octocat/hello-world");
        assert_eq!(cli.sha.as_str(), SHA);
        match cli.command {
            Command::Stage {
                stage,
                state,
                duration_ms,
            } => {
                assert_eq!(stage, "build");
                assert_eq!(state, BuildState::CompletedSuccess);
                assert_eq!(duration_ms, 1200);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_state_and_malformed_repo() {
        assert!(Cli::try_parse_from([
            "autostatus", "--sha", SHA, "final", "--state", "aborted",
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "autostatus", "--sha", SHA, "--repo", "no-slash", "error", "--stage", "x",
        ])
        .is_err());
    }

    #[test]
    fn flags_override_file_config() {
        let cli = parse(&[
            "--api-url",
            "https://ghe.example.com/api/v3",
            "--token",
            "ghp_flag",
            "--timeout-secs",
            "5",
            "--no-proxy",
            "error",
            "--stage",
            "checkout",
        ]);
        let file = GithubConfig {
            api_url: "https://file.example.com".to_string(),
            token: Some("ghp_file".to_string()),
            user_agent: "custom-agent".to_string(),
            ..GithubConfig::default()
        };

        let config = github_config(&cli, Some(file));

        assert_eq!(config.api_url, "https://ghe.example.com/api/v3");
        assert_eq!(config.token(), Some("ghp_flag"));
        assert_eq!(config.request_timeout_secs, 5);
        assert!(!config.use_system_proxy);
        assert_eq!(config.user_agent, "custom-agent");
    }

    #[test]
    fn manager_is_empty_without_token() {
        let config = GithubConfig::default();
        let manager = build_manager(
            "job",
            Some(RepositoryId::parse("octocat/hello-world").unwrap()),
            CommitSha::new(SHA).unwrap(),
            None,
            &config,
        )
        .unwrap();
        assert!(manager.is_empty());
    }

    #[test]
    fn manager_is_empty_without_repository() {
        let config = GithubConfig {
            token: Some("ghp_test".to_string()),
            ..GithubConfig::default()
        };
        let manager =
            build_manager("job", None, CommitSha::new(SHA).unwrap(), None, &config).unwrap();
        assert!(manager.is_empty());
    }

    #[test]
    fn manager_registers_github_notifier_when_configured() {
        let config = GithubConfig {
            token: Some("ghp_test".to_string()),
            ..GithubConfig::default()
        };
        let manager = build_manager(
            "job",
            Some(RepositoryId::parse("octocat/hello-world").unwrap()),
            CommitSha::new(SHA).unwrap(),
            TargetUrl::new("https://ci.example.com/job/1/"),
            &config,
        )
        .unwrap();
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.job_name(), "job");
    }

    /// Answers one request with `status_line` and returns its request line.
    async fn respond_once(status_line: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before headers were complete");
                buf.extend_from_slice(&chunk[..n]);
            }
            let body = r#"{"message":"Not Found"}"#;
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&buf)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });

        (format!("http://{addr}"), handle)
    }

    #[tokio::test]
    async fn run_succeeds_when_github_rejects_the_status() {
        let (api_url, server) = respond_once("404 Not Found").await;
        let cli = parse(&[
            "--repo",
            "octocat/hello-world",
            "--token",
            "ghp_test",
            "--api-url",
            &api_url,
            "--no-proxy",
            "stage",
            "--stage",
            "build",
            "--state",
            "pending",
        ]);

        run(cli).await.expect("best-effort reporting exits cleanly");

        assert_eq!(
            server.await.unwrap(),
            format!("POST /repos/octocat/hello-world/statuses/{SHA} HTTP/1.1")
        );
    }

    #[tokio::test]
    async fn dispatch_forwards_each_command() {
        let recorder = Arc::new(RecordingNotifier::new(true));
        let mut manager = BuildNotifierManager::new("acme/main");
        assert!(manager.add_notifier(recorder.clone()));

        let commands = [
            Command::Stage {
                stage: "build".to_string(),
                state: BuildState::CompletedSuccess,
                duration_ms: 1500,
            },
            Command::Final {
                state: BuildState::CompletedError,
                duration_ms: 60_000,
                blocked_ms: 250,
            },
            Command::Error {
                stage: "checkout".to_string(),
            },
        ];
        for command in &commands {
            dispatch(&manager, command).await;
        }

        assert_eq!(
            recorder.calls(),
            vec![
                NotifierCall::StageStatus {
                    job_name: "acme/main".to_string(),
                    node_name: "build".to_string(),
                    build_state: BuildState::CompletedSuccess,
                    node_duration: Duration::from_millis(1500),
                },
                NotifierCall::FinalStatus {
                    job_name: "acme/main".to_string(),
                    build_state: BuildState::CompletedError,
                    build_duration: Duration::from_secs(60),
                    blocked_duration: Duration::from_millis(250),
                },
                NotifierCall::NonStageError {
                    job_name: "acme/main".to_string(),
                    node_name: "checkout".to_string(),
                },
            ]
        );
    }

    #[test]
    fn invalid_api_url_is_a_configuration_error() {
        let config = GithubConfig {
            api_url: "ftp://example.com".to_string(),
            token: Some("ghp_test".to_string()),
            ..GithubConfig::default()
        };
        let err = build_manager(
            "job",
            Some(RepositoryId::parse("octocat/hello-world").unwrap()),
            CommitSha::new(SHA).unwrap(),
            None,
            &config,
        )
        .unwrap_err();
        assert!(err.to_string().contains("octocat/hello-world"));
    }
}
