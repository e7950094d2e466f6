//! Business logic services.
//!
//! The selection engine (random selection, participation history,
//! contributor ranking and the orchestrating [`ReviewerService`]) only talks
//! to the hosting service through [`RepositoryApi`], so it is testable with
//! [`InMemoryRepository`] and independent of the GitHub adapter.

pub mod contributors;
pub mod github_client;
pub mod memory;
pub mod pr_history;
pub mod random_selector;
pub mod repository;
pub mod reviewer_service;

pub use github_client::GitHubClient;
pub use memory::InMemoryRepository;
pub use repository::{PullRequestContext, RepositoryApi};
pub use reviewer_service::ReviewerService;
