//! # reinhardt-webforms-storage
//!
//! Attachment storage for reinhardt web forms.
//!
//! Web form submissions carry attachments inline as data URLs. This crate
//! decodes them, writes the bytes to a [`StorageBackend`] and hands back the
//! public URL the form stores in its attachment field.
//!
//! ## Features
//!
//! - **Unified API**: a single [`StorageBackend`] trait for every backend
//! - **Async I/O**: all operations are asynchronous using Tokio
//! - **Feature Flags**: the `local` feature enables the filesystem backend
//!
//! ## Example
//!
//! ```rust,no_run
//! use reinhardt_webforms::FileStore;
//! use reinhardt_webforms_storage::{AttachmentConfig, AttachmentStore, StorageConfig, create_storage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let storage = create_storage(StorageConfig::from_env()?).await?;
//!     let files = AttachmentStore::new(storage, AttachmentConfig::from_env()?);
//!
//!     let file = files
//!         .save_file("notes.txt", "data:text/plain;base64,aGVsbG8=", "Event", "Event-0001")
//!         .await?;
//!     println!("stored at {}", file.file_url);
//!
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod backends;
pub mod config;
pub mod data_url;
pub mod error;
pub mod factory;
pub mod file_store;

pub use backend::StorageBackend;
pub use config::{AttachmentConfig, BackendType, StorageConfig};
pub use error::{Result, StorageError};
pub use factory::create_storage;
pub use file_store::AttachmentStore;
