//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing and subcommand handlers.

mod args;
mod commands;

pub use args::{Args, Command, ConfigAction};
pub use commands::{
    handle_config_action, run, run_gray, run_receive, run_resample, run_threshold,
    setup_ctrlc_handler, CommandError, ReceiveOptions, ReceiveSummary,
    STOP_REQUESTED,
};
