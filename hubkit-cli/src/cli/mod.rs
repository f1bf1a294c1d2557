//! # Command Line Interface
//!
//! Defines the CLI structure and dispatches each command against a GitHub
//! client built from configuration and flags.

mod repo;
mod user;

use anyhow::{Context, Result};
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser, Subcommand};
use hubkit_gh::{AuthenticatedGitHubClient, BasicGitHubClient, ClientConfig, GitHubClient};
use tokio::runtime::Runtime;
use tracing::debug;
use url::Url;

pub use repo::{RepoArgs, RepoSubcommands, parse_full_name};

/// Top-level CLI command for hubkit
#[derive(Parser)]
#[command(name = "hubkit")]
#[command(about = "A small typed client for the GitHub REST API")]
#[command(
  long_about = "hubkit talks to the GitHub REST API: inspect the authenticated user and\n\
        get, list, create or delete repositories.\n\n\
        The access token is taken from --token, GITHUB_TOKEN, the config file or\n\
        ~/.netrc, in that order."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// API base URL, overriding configuration and GITHUB_API_URL
  #[arg(long, global = true, value_name = "URL")]
  pub base_url: Option<Url>,

  /// Access token, overriding configuration and GITHUB_TOKEN
  #[arg(long, global = true, value_name = "TOKEN")]
  pub token: Option<String>,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for hubkit
#[derive(Subcommand)]
pub enum Commands {
  /// Show the authenticated user
  #[command(long_about = "Fetches the user the access token belongs to (GET /user).")]
  User,

  /// Repository operations
  #[command(arg_required_else_help = true)]
  Repo(RepoArgs),
}

/// Build the client used by every command.
///
/// `--token` replaces any configured token: the leaf is stripped of its own
/// token and wrapped in a token decorator. Otherwise the configured token, if
/// any, is sent by the leaf client.
pub fn build_client(config: &ClientConfig, base_url: Option<&Url>, token: Option<&str>) -> Result<Box<dyn GitHubClient>> {
  let mut client = BasicGitHubClient::from_config(config).context("Failed to create GitHub client")?;
  if let Some(base_url) = base_url {
    client.set_base_url(base_url.clone());
  }

  match token {
    Some(token) => {
      debug!("Using access token from the command line");
      client.clear_access_token();
      let client = AuthenticatedGitHubClient::new(client, token).context("Invalid access token")?;
      Ok(Box::new(client))
    }
    None => Ok(Box::new(client)),
  }
}

/// Run the parsed command
pub fn handle_cli(cli: Cli) -> Result<()> {
  let config = ClientConfig::load().context("Failed to load configuration")?;
  debug!("Loaded configuration: {:?}", config);

  let client = build_client(&config, cli.base_url.as_ref(), cli.token.as_deref())?;
  let rt = Runtime::new().context("Failed to start async runtime")?;
  rt.block_on(run_command(cli.command, client.as_ref()))
}

/// Run one command against `client`
pub async fn run_command(command: Commands, client: &dyn GitHubClient) -> Result<()> {
  match command {
    Commands::User => user::handle_user_command(client).await,
    Commands::Repo(repo) => repo::handle_repo_command(repo, client).await,
  }
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;
  use hubkit_gh::UserEndpoints;
  use hubkit_test_utils::{EnvVarGuard, HomeEnvTestGuard};
  use serial_test::serial;
  use wiremock::matchers::{header, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;

  #[test]
  fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_parse_global_flags() -> Result<()> {
    let cli = Cli::try_parse_from([
      "hubkit",
      "-vv",
      "repo",
      "get",
      "octokit/octokit.net",
      "--base-url",
      "https://github.example.com/api/v3",
      "--token",
      "abc",
    ])?;

    assert_eq!(cli.verbose, 2);
    assert_eq!(
      cli.base_url.as_ref().map(Url::as_str),
      Some("https://github.example.com/api/v3")
    );
    assert_eq!(cli.token.as_deref(), Some("abc"));
    assert!(matches!(
      cli.command,
      Commands::Repo(RepoArgs {
        subcommand: RepoSubcommands::Get { .. }
      })
    ));
    Ok(())
  }

  #[test]
  fn test_parse_rejects_invalid_base_url() {
    assert!(Cli::try_parse_from(["hubkit", "--base-url", "nope", "user"]).is_err());
  }

  #[test]
  fn test_build_client_with_token_flag() -> Result<()> {
    let config = ClientConfig::default();
    let base_url = Url::parse("https://github.example.com/api/v3")?;

    let client = build_client(&config, Some(&base_url), Some("flag-token"))?;
    assert!(client.has_access_token());
    assert_eq!(client.base_url(), &base_url);

    assert!(build_client(&config, None, Some("")).is_err());
    Ok(())
  }

  #[test]
  fn test_build_client_from_config() -> Result<()> {
    let client = build_client(&ClientConfig::default(), None, None)?;
    assert!(!client.has_access_token());
    assert_eq!(client.base_url().as_str(), "https://api.github.com/");

    let config = ClientConfig {
      access_token: Some("config-token".to_string()),
      ..ClientConfig::default()
    };
    assert!(build_client(&config, None, None)?.has_access_token());
    Ok(())
  }

  #[tokio::test]
  async fn test_token_flag_overrides_configured_token() -> Result<()> {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/user"))
      .and(header("authorization", "token flag-token"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "login": "octocat" })))
      .expect(1)
      .mount(&mock_server)
      .await;

    let config = ClientConfig {
      base_url: Url::parse(&mock_server.uri())?,
      access_token: Some("config-token".to_string()),
      ..ClientConfig::default()
    };
    let client = build_client(&config, None, Some("flag-token"))?;
    let user = client.get_authenticated_user().await?;
    assert_eq!(user.login(), Some("octocat"));

    let requests = mock_server.received_requests().await.unwrap_or_default();
    let authorization: Vec<_> = requests
      .iter()
      .flat_map(|request| request.headers.get_all("authorization").iter())
      .collect();
    assert_eq!(authorization, vec!["token flag-token"]);
    Ok(())
  }

  #[tokio::test]
  async fn test_configured_token_is_sent_without_flag() -> Result<()> {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/user"))
      .and(header("authorization", "token config-token"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "login": "octocat" })))
      .expect(1)
      .mount(&mock_server)
      .await;

    let config = ClientConfig {
      base_url: Url::parse(&mock_server.uri())?,
      access_token: Some("config-token".to_string()),
      ..ClientConfig::default()
    };
    let client = build_client(&config, None, None)?;
    client.get_authenticated_user().await?;
    Ok(())
  }

  #[test]
  #[serial]
  #[cfg(target_os = "linux")]
  fn test_config_is_read_from_xdg_config_home() -> Result<()> {
    let home = HomeEnvTestGuard::new();
    let _url = EnvVarGuard::remove("GITHUB_API_URL");
    let _token = EnvVarGuard::remove("GITHUB_TOKEN");
    home.write_file(
      ".config/hubkit/config.toml",
      "base_url = \"https://github.example.com/api/v3\"\n",
    )?;

    let config = ClientConfig::load()?;
    assert_eq!(config.base_url.as_str(), "https://github.example.com/api/v3");
    assert_eq!(config.access_token, None);
    Ok(())
  }
}
