//! # Repository Command
//!
//! Derive-based implementation of the `repo` command group: get, list,
//! create and delete repositories.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use hubkit_gh::{CreateRepositoryParameters, GitHubClient, RepositoryEndpoints, RepositoryParameters};

use crate::output::{format_repo_name, format_repository, print_info, print_success};

/// Command for repository operations
#[derive(Args)]
pub struct RepoArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: RepoSubcommands,
}

/// Subcommands for the repo command
#[derive(Subcommand)]
pub enum RepoSubcommands {
  /// Show a repository
  Get {
    /// Repository as OWNER/NAME
    #[arg(value_name = "OWNER/NAME")]
    full_name: String,
  },

  /// List repositories of the authenticated user
  #[command(alias = "ls")]
  List,

  /// Create a repository for the authenticated user
  Create {
    /// Name of the new repository
    name: String,

    /// Short description
    #[arg(long, short = 'd')]
    description: Option<String>,

    /// Create a private repository
    #[arg(long)]
    private: bool,
  },

  /// Delete a repository
  #[command(long_about = "Deletes a repository (DELETE /repos/{owner}/{name}).\n\n\
            Requires a token with the delete_repo scope and admin rights on the repository.")]
  #[command(alias = "rm")]
  Delete {
    /// Repository as OWNER/NAME
    #[arg(value_name = "OWNER/NAME")]
    full_name: String,
  },
}

/// Split `OWNER/NAME` into repository parameters
pub fn parse_full_name(full_name: &str) -> Result<RepositoryParameters> {
  let Some((owner, name)) = full_name.split_once('/') else {
    bail!("Expected OWNER/NAME, got '{full_name}'");
  };
  if owner.is_empty() || name.is_empty() || name.contains('/') {
    bail!("Expected OWNER/NAME, got '{full_name}'");
  }
  Ok(RepositoryParameters::new(owner, name)?)
}

pub async fn handle_repo_command(repo: RepoArgs, client: &dyn GitHubClient) -> Result<()> {
  match repo.subcommand {
    RepoSubcommands::Get { full_name } => {
      let parameters = parse_full_name(&full_name)?;
      let repository = client.get_repository(&parameters).await?;
      println!("{}", format_repository(&repository));
    }
    RepoSubcommands::List => {
      let repositories = client.get_repositories_for_authenticated_user().await?;
      if repositories.is_empty() {
        print_info("No repositories found.");
      }
      for repository in &repositories {
        println!("{}", format_repository(repository));
      }
    }
    RepoSubcommands::Create {
      name,
      description,
      private,
    } => {
      let mut parameters = CreateRepositoryParameters::new(&name)?;
      if let Some(description) = description.as_deref() {
        parameters.set_description(description)?;
      }
      if private {
        parameters.set_private(true);
      }
      let repository = client.create_repository(&parameters).await?;
      print_success(&format!("Created {}", format_repository(&repository)));
    }
    RepoSubcommands::Delete { full_name } => {
      let parameters = parse_full_name(&full_name)?;
      client.delete_repository(&parameters).await?;
      print_success(&format!("Deleted {}", format_repo_name(&full_name)));
    }
  }
  Ok(())
}
