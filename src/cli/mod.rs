//! Command-line interface module.

mod args;
pub mod auth;
pub mod browse;
pub mod common;
pub mod preview;
pub mod search;
pub mod shell;
mod view;

pub use args::{Cli, Commands, ListingArgs};
