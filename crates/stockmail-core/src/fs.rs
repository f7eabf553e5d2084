use crate::{Error, Result};
use std::path::Path;

/// Reads a `.json` file from `path`; `Ok(None)` if there is no file yet.
///
/// ```rust,no_run
/// # async fn run() -> stockmail_core::Result<()> {
/// let refs: Option<serde_json::Value> = stockmail_core::fs::read_json("stock_reference.json").await?;
/// # Ok(())
/// # }
/// ```
pub async fn read_json<T: serde::de::DeserializeOwned>(
    path: impl AsRef<Path>,
) -> Result<Option<T>> {
    let path = path.as_ref();
    let file = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(Error::Persistence {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let data: T = serde_json::from_slice(&file).map_err(|source| Error::CorruptStore {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(data))
}

/// Overwrite `path` with `data` as JSON.
///
/// The bytes land in a sibling `.tmp` file first and are renamed over the
/// target, so an interrupted run leaves either the old or the new file.
pub async fn write_json<T: serde::Serialize>(path: impl AsRef<Path>, data: &T) -> Result<()> {
    let path = path.as_ref();
    let bytes = serde_json::to_vec_pretty(data)?;
    let persistence = |source: std::io::Error| Error::Persistence {
        path: path.to_path_buf(),
        source,
    };

    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await.map_err(persistence)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    tokio::fs::write(&tmp, &bytes).await.map_err(persistence)?;
    tokio::fs::rename(&tmp, path).await.map_err(persistence)?;
    log::trace!("{} written ({} bytes)", path.display(), bytes.len());
    Ok(())
}
