//! JSON file persistence for [`MemoryStore`].

use crate::store::MemoryStore;
use std::io;
use std::path::{Path, PathBuf};

/// Load the store from `path`. A missing file is an empty store.
pub fn load(path: &Path) -> io::Result<MemoryStore> {
    match std::fs::read_to_string(path) {
        Ok(text) => serde_json::from_str(&text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(MemoryStore::default()),
        Err(e) => Err(e),
    }
}

/// Pretty JSON snapshot of the store.
pub fn to_json(store: &MemoryStore) -> serde_json::Result<String> {
    serde_json::to_string_pretty(store)
}

/// Write `contents` next to `path` and rename over it, so readers never see half a file.
pub async fn write_atomic(path: &Path, contents: String) -> io::Result<()> {
    let tmp = tmp_path(path);
    tokio::fs::write(&tmp, contents).await?;
    tokio::fs::rename(&tmp, path).await
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
