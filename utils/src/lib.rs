//! Shared utilities for the merchant admin workspace.
//!
//! Build metadata lives here so that every binary in the workspace reports
//! its version the same way.

pub mod version_info;
