//! SDK Utilities
//!
//! Common utilities for the SDK.

pub mod de;
pub mod time;

pub use time::{format_datetime, parse_datetime};
