//! Attachment storage module.
//!
//! # Examples
//!
//! ```rust,no_run
//! use reinhardt_webform::storage::{StorageBackend, StorageConfig, create_storage};
//! ```

pub use reinhardt_webforms_storage::*;
