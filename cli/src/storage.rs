use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tripwire_core::{GameGrid, SaveError};

const SAVE_EXTENSION: &str = "ms";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("save name {0:?} is not usable, pick a plain name")]
    InvalidName(String),
    #[error("no save at {}", .0.display())]
    NotFound(PathBuf),
    #[error("save {} is damaged: {source}", .path.display())]
    Corrupt { path: PathBuf, source: SaveError },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Directory of `<name>.ms` save files.
#[derive(Clone, Debug)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> Result<PathBuf, StorageError> {
        let name = name.trim();
        let plain = !name.is_empty()
            && !name.starts_with('.')
            && !name.contains(['/', '\\'])
            && Path::new(name).file_name().is_some();
        if !plain {
            return Err(StorageError::InvalidName(name.to_owned()));
        }
        Ok(self.dir.join(format!("{name}.{SAVE_EXTENSION}")))
    }

    pub fn save(&self, name: &str, grid: &GameGrid) -> Result<PathBuf, StorageError> {
        let path = self.path_for(name)?;
        fs::write(&path, grid.to_save())?;
        log::info!("Saved game to {}", path.display());
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<GameGrid, StorageError> {
        let path = self.path_for(name)?;
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(path));
            }
            Err(err) => return Err(err.into()),
        };

        match GameGrid::from_save(&data) {
            Ok(grid) => {
                log::info!("Loaded game from {}", path.display());
                Ok(grid)
            }
            Err(source) => Err(StorageError::Corrupt { path, source }),
        }
    }
}
