use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub db_path: PathBuf,
}

impl CoreConfig {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    /// Default database location under the platform data directory.
    pub fn default_db_path() -> PathBuf {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("chirp").join("chirp.db")
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new(Self::default_db_path())
    }
}
