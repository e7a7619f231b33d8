//! Registry fetching from remote origins.

pub mod git;

pub use git::{GitFetchResult, GitFetcher};
