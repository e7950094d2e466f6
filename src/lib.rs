//! Smart reviewer assignment for pull requests.
//!
//! Picks reviewers from a fixed always-add list, a random or
//! participation-balanced fill up to a minimum count, and the top recent
//! contributor of the changed files, then requests them on the pull request.

pub mod action;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

use action::logger::ActionsLogger;
use log::LevelFilter;

/// Entry point for the binary. Returns `false` when the run failed.
pub fn run() -> bool {
    ActionsLogger::init(LevelFilter::Debug);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("Action failed: Failed to start async runtime: {}", e);
            return false;
        }
    };

    match runtime.block_on(action::run()) {
        Ok(()) => true,
        Err(e) => {
            log::error!("Action failed: {}", e);
            false
        }
    }
}
