//! REST clients for the forges on either side of a mirror.
//!
//! GitHub and Gitea-based forges such as Codeberg expose the same branch
//! endpoints with small differences in pagination parameters, auth header
//! scheme and base URL. Those differences live in a [`Dialect`]; the
//! [`ForgeClient`] itself is shared.

mod client;
mod dialect;
mod error;

pub use client::ForgeClient;
pub use dialect::{AuthScheme, CODEBERG_API_BASE, Dialect, GITHUB_API_BASE, PAGE_SIZE};
pub use error::{ForgeError, short_error_message};
