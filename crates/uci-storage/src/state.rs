use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::error::StorageError;

/// Load a JSON state file. Returns `None` when the file does not exist.
pub async fn load_state<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let value: T = serde_json::from_slice(&bytes)?;
    tracing::debug!(path = %path.display(), "state loaded");
    Ok(Some(value))
}

/// Save a JSON state file atomically: write a sibling tmp file, then rename
/// it over the target.
pub async fn save_state<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let json = serde_json::to_vec_pretty(value)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, &json).await?;
    tokio::fs::rename(&tmp_path, path).await?;
    tracing::debug!(path = %path.display(), bytes = json.len(), "state saved");
    Ok(())
}
