//! Error Handling Module
//!
//! This module provides the error handling for the generation pipeline:
//! - Core error type (`GenerationError`) and its closed `ErrorKind` taxonomy
//! - The classifier that turns transport/HTTP/body failures into actionable errors
//! - Type conversions from common error types
//!
//! # Example
//!
//! ```rust,ignore
//! use augury::error::{classify_http_error, ErrorKind};
//!
//! let error = classify_http_error(429, "");
//! assert_eq!(error.kind(), ErrorKind::RateLimited);
//! assert!(error.is_retryable());
//! ```

mod classify;
mod conversions;
pub mod types;

pub use classify::*;
pub use types::*;
