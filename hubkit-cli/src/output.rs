//! # Output Formatting
//!
//! Colored, emoji-prefixed messages for the terminal, plus rendering of
//! GitHub API errors.

use hubkit_gh::{ApiError, Error as GitHubError, GitHubRepository};
use owo_colors::OwoColorize;

/// Get an emoji by shortcode, or `default` when it is unknown
pub fn get_emoji_or_default(name: &str, default: &str) -> String {
  match emojis::get_by_shortcode(name) {
    Some(emoji) => emoji.to_string(),
    None => default.to_string(),
  }
}

pub fn print_success(message: &str) {
  let check = get_emoji_or_default("check_mark", "✓");
  println!("{} {}", check.green().bold(), message);
}

pub fn print_error(message: &str) {
  let cross = get_emoji_or_default("cross_mark", "✗");
  eprintln!("{} {}", cross.red().bold(), message);
}

pub fn print_info(message: &str) {
  let info = get_emoji_or_default("information", "ℹ");
  println!("{} {}", info.blue().bold(), message);
}

pub fn format_repo_name(name: &str) -> String {
  name.bright_cyan().bold().to_string()
}

pub fn format_url(url: &str) -> String {
  url.bright_green().to_string()
}

/// One line summary of a repository: `owner/name  clone_url`
pub fn format_repository(repository: &GitHubRepository) -> String {
  let full_name = repository.full_name().or(repository.name()).unwrap_or("<unnamed>");
  match repository.clone_url() {
    Some(clone_url) => format!("{}  {}", format_repo_name(full_name), format_url(clone_url)),
    None => format_repo_name(full_name),
  }
}

/// Lines describing an API error: status and message, documentation link and
/// each reported sub-error
pub fn api_error_lines(error: &ApiError) -> Vec<String> {
  let mut lines = vec![format!("GitHub API error {}: {}", error.status_code(), error.message())];
  if let Some(documentation_url) = error.documentation_url() {
    lines.push(format!("  See {documentation_url}"));
  }
  for detail in error.errors() {
    let mut parts = Vec::new();
    if let Some(resource) = detail.resource() {
      parts.push(format!("resource={resource}"));
    }
    if let Some(field) = detail.field() {
      parts.push(format!("field={field}"));
    }
    if let Some(code) = detail.code() {
      parts.push(format!("code={code}"));
    }
    let summary = parts.join(" ");
    match detail.message() {
      Some(message) if summary.is_empty() => lines.push(format!("  - {message}")),
      Some(message) => lines.push(format!("  - {message} ({summary})")),
      None => lines.push(format!("  - {summary}")),
    }
  }
  lines
}

/// Print a command failure to stderr. API errors get their full detail.
pub fn report_error(error: &anyhow::Error) {
  let api_error = error.downcast_ref::<GitHubError>().and_then(GitHubError::as_api_error);
  match api_error {
    Some(api_error) => {
      let mut lines = api_error_lines(api_error).into_iter();
      if let Some(headline) = lines.next() {
        print_error(&headline);
      }
      for line in lines {
        eprintln!("{line}");
      }
    }
    None => print_error(&format!("{error:#}")),
  }
}

#[cfg(test)]
mod tests {
  use hubkit_gh::{ErrorDetail, ErrorResponse};

  use super::*;

  #[test]
  fn test_get_emoji_or_default() {
    let result = get_emoji_or_default("check_mark", "✓");
    assert!(!result.is_empty());

    assert_eq!(get_emoji_or_default("not_a_real_emoji", "?"), "?");
  }

  #[test]
  fn test_api_error_lines() {
    let error = ApiError::new(
      422,
      ErrorResponse::new()
        .with_message("Repository creation failed.")
        .with_documentation_url("https://docs.github.com/rest/reference/repos")
        .with_errors(vec![
          ErrorDetail::new()
            .with_resource("Repository")
            .with_code("custom")
            .with_field("name")
            .with_message("name already exists on this account"),
          ErrorDetail::new().with_code("missing_field"),
        ]),
    )
    .unwrap();

    assert_eq!(
      api_error_lines(&error),
      vec![
        "GitHub API error 422: Repository creation failed.",
        "  See https://docs.github.com/rest/reference/repos",
        "  - name already exists on this account (resource=Repository field=name code=custom)",
        "  - code=missing_field",
      ]
    );
  }

  #[test]
  fn test_api_error_lines_minimal() {
    let error = ApiError::new(401, ErrorResponse::new().with_message("Bad credentials")).unwrap();
    assert_eq!(api_error_lines(&error), vec!["GitHub API error 401: Bad credentials"]);
  }

  #[test]
  fn test_format_repository_falls_back_to_name() {
    let mut repository = GitHubRepository::new();
    repository.set_name("hello").unwrap();
    assert!(format_repository(&repository).contains("hello"));

    repository.set_full_name("octocat/hello").unwrap();
    assert!(format_repository(&repository).contains("octocat/hello"));
  }
}
