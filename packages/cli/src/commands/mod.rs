pub mod delete;
pub mod export;
pub mod import;
pub mod list;
pub mod new;
pub mod rename;
pub mod reset;
pub mod show;

pub use delete::{delete, DeleteArgs};
pub use export::{export, ExportArgs};
pub use import::{import, ImportArgs};
pub use list::list;
pub use new::{new, NewArgs};
pub use rename::{rename, RenameArgs};
pub use reset::{reset, ResetArgs};
pub use show::{show, ShowArgs};

use std::path::PathBuf;

use anyhow::Result;
use conceptmap_workspace::{Config, DirectoryStorage, LastDocument, Workspace};
use tracing::debug;

/// Resolved configuration shared by every command
#[derive(Debug)]
pub struct Context {
    pub cwd: PathBuf,
    pub config: Config,
    pub data_dir: PathBuf,
}

impl Context {
    pub fn load(cwd: PathBuf, data_dir: Option<PathBuf>) -> Result<Self> {
        let config = Config::load(&cwd)?;
        let data_dir = match data_dir {
            Some(dir) => cwd.join(dir),
            None => config.data_dir(&cwd),
        };
        debug!(data_dir = %data_dir.display(), "Resolved data directory");

        Ok(Self {
            cwd,
            config,
            data_dir,
        })
    }

    pub fn storage(&self) -> DirectoryStorage {
        DirectoryStorage::new(&self.data_dir)
    }

    pub fn last_doc(&self) -> LastDocument {
        LastDocument::new(&self.data_dir)
    }

    pub async fn open_workspace(&self) -> Result<Workspace> {
        Ok(Workspace::open_dir(&self.data_dir, &self.config).await?)
    }
}
