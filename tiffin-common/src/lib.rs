//! Shared plumbing for the Tiffin workspace.
//!
//! # Overview
//!
//! - [`observability`]: tracing initialization with an optional rolling
//!   file sink and a stderr mirror, shared by the binary and by any
//!   future harness that embeds the funnel crates.
//!
//! The crate deliberately stays small: anything that is specific to one
//! workspace member lives in that member.

pub mod observability;

pub use observability::{init_logging, LogConfig, LogFormat};
