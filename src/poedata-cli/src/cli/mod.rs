//! CLI argument definitions for poedata

mod core;

pub use core::{Cli, Commands};
