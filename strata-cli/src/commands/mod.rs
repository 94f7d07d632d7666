//! Subcommand handlers

pub mod catalogers;
pub mod config;
pub mod scan;
pub mod schema;
