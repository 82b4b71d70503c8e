//! # mediacheck-core
//!
//! Runs a media collection's integrity check with the process working
//! directory set to the collection's media folder, then puts the working
//! directory back.
//!
//! Some collections resolve media file names relative to the working
//! directory while they verify themselves. [`check_media`] takes care of the
//! directory bookkeeping around that call and hands back the check's
//! `(missing, report, unused)` fields untouched.
//!
//! ## Modules
//!
//! - [`collection`]: the [`MediaCollection`] seam and its [`CheckResult`]
//! - [`check`]: the checked scan itself
//! - [`working_dir`]: scoped, lock-protected working directory changes
//! - [`config`]: restore policy and its environment/file loader
//! - [`error`]: a ready-made error type for collections
//!
//! ## Example
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use mediacheck_core::{CheckResult, MediaCollection, MediaError, check_media};
//!
//! struct Library {
//!     root: PathBuf,
//! }
//!
//! impl MediaCollection for Library {
//!     type Error = MediaError;
//!
//!     fn media_dir(&self) -> Result<PathBuf, MediaError> {
//!         Ok(self.root.join("collection.media"))
//!     }
//!
//!     fn check_media(&mut self) -> Result<CheckResult, MediaError> {
//!         // Paths here are relative to the media directory.
//!         let present = std::fs::read_dir(".")?.count();
//!         Ok(CheckResult::new(vec![], format!("{present} files"), vec![]))
//!     }
//! }
//!
//! fn main() -> Result<(), MediaError> {
//!     let mut library = Library { root: PathBuf::from("/srv/library") };
//!     let (missing, report, unused) = check_media(&mut library)?;
//!     println!("{report}: {} missing, {} unused", missing.len(), unused.len());
//!     Ok(())
//! }
//! ```

/// Checked media scan
pub mod check;

/// Collection seam and check results
pub mod collection;

/// Check configuration and loading
pub mod config;

/// Error types and error handling utilities
pub mod error;

pub mod working_dir;

pub use check::{check_media, check_media_from_env, check_media_with};
pub use collection::{CheckResult, MediaCheckOutput, MediaCollection};
pub use config::{CheckConfig, CheckConfigSource, ConfigError, RestorePolicy};
pub use error::{MediaError, Result};
pub use working_dir::WorkingDirGuard;
