//! # User Command
//!
//! Shows the user the access token belongs to.

use anyhow::Result;
use hubkit_gh::{GitHubClient, UserEndpoints};

use crate::output::{format_repo_name, print_info, print_success};

pub async fn handle_user_command(client: &dyn GitHubClient) -> Result<()> {
  if !client.has_access_token() {
    print_info("No access token configured; GitHub will reject this request.");
  }

  let user = client.get_authenticated_user().await?;
  let login = user.login().unwrap_or("<unknown>");
  print_success(&format!("Authenticated as {}", format_repo_name(login)));
  Ok(())
}
