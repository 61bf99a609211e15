#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod diff;
pub mod listing;
pub mod readme;
pub mod runner;
pub mod snapshot;
pub mod store;
pub mod summary;

pub use config::{parse_account_list, ConfigError, Settings};
pub use diff::new_full_names;
pub use listing::list_public_repos;
pub use readme::{fetch_readme_snippet, Snippet, UnavailableReason};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use snapshot::{DiscoveryRecord, RepositoryRecord, Snapshot};
pub use store::{DateIndex, Store, StoreError};
pub use summary::RunSummary;
