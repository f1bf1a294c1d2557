//! # GitHub API Endpoints
//!
//! Typed operations built purely on [`GitHubClient::send`](crate::GitHubClient::send),
//! so every client, leaf or decorated, gets them through a blanket impl.
//!
//! Each operation comes in two forms. `send_*_request` returns the typed
//! response wrapper without classifying the status. The plain form raises
//! [`Error::Api`](crate::Error::Api) on a client error status, extracts the
//! payload and disposes the response.

pub mod repos;
pub mod users;

pub use repos::RepositoryEndpoints;
pub use users::UserEndpoints;
