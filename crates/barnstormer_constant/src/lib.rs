//! Shared constants for the Barnstormer workspace.

pub mod app;
pub mod catalog;
pub mod layout;
