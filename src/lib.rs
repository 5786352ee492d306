// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # json2parquet
//!
//! Convert JSON datasets to Parquet, on a developer machine or inside OCI
//! Data Flow.
//!
//! ## Features
//!
//! - **Execution Modes**: implicit authentication in Data Flow, `~/.oci/config` profiles locally
//! - **JSON Input**: JSON Lines or multiline documents, schema inferred across all files
//! - **Parquet Output**: overwrite semantics, `part-*` files plus a `_SUCCESS` marker
//! - **Object Stores**: local paths, `oci://`, `s3://`, `gs://` and `az://` URIs
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use json2parquet::session::{get_session, ExecutionMode, SessionRequest};
//!
//! #[tokio::main]
//! async fn main() -> json2parquet::Result<()> {
//!     let request = SessionRequest::new(ExecutionMode::detect());
//!     let session = get_session(&request)?;
//!
//!     let dataset = session.read_json("data/events.json").await?;
//!     dataset.write_parquet("data/events.parquet").await?;
//!     println!("{} rows", dataset.count().await?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    CLI (clap) → Runner                    │
//! └─────────────────────────────┬────────────────────────────┘
//!                               │
//! ┌──────────────┬──────────────┴──────┬──────────────────────┐
//! │ Credentials  │      Session        │      Dataset         │
//! ├──────────────┼─────────────────────┼──────────────────────┤
//! │ INI profiles │ Execution mode      │ JSON → Arrow         │
//! │ Validation   │ Ordered config      │ Arrow → Parquet      │
//! │              │ get_or_create       │ Overwrite + _SUCCESS │
//! └──────────────┴─────────────────────┴──────────┬───────────┘
//!                                                 │
//!                                    Storage (object_store)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// OCI credential profiles
pub mod credentials;

/// Session provisioning and engine configuration
pub mod session;

/// Object store locations
pub mod storage;

/// JSON and Parquet datasets
pub mod dataset;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use session::{get_session, ExecutionMode, Session, SessionRequest};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
