//! Test utilities shared across the hubkit workspace
//!
//! - Environment variable overrides restored on drop ([`EnvVarGuard`])
//! - HOME and XDG config isolation in a temporary directory
//!   ([`HomeEnvTestGuard`])
//!
//! Tests that use these guards mutate process-wide state and should be marked
//! `#[serial]`.

pub mod env;
pub mod home;

pub use env::EnvVarGuard;
pub use home::HomeEnvTestGuard;
