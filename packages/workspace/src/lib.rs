//! # ConceptMap Workspace
//!
//! Everything around the editor engine that touches the outside world:
//! directory-backed storage, the last-opened pointer, configuration, reset,
//! and the [`Workspace`] that bootstraps and switches documents.

pub mod config;
pub mod errors;
pub mod last_doc;
pub mod reset;
pub mod storage;
pub mod workspace;

pub use config::{AutosaveSettings, Config, DEFAULT_CONFIG_NAME};
pub use errors::{WorkspaceError, WorkspaceResult};
pub use last_doc::{LastDocument, LAST_DOC_FILE};
pub use reset::reset_app_data;
pub use storage::{DirectoryStorage, MAPS_DIR};
pub use workspace::{fetch_document, Workspace};
