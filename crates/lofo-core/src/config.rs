use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub data_dir: PathBuf,
}

impl CoreConfig {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new(default_data_dir())
    }
}

/// Get the directory the on-device cache slots live in
pub fn default_data_dir() -> PathBuf {
    if let Ok(base_dir) = std::env::var("LOFO_BASE_DIR") {
        return PathBuf::from(base_dir).join("cache");
    }
    let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("lofo").join("cache")
}
