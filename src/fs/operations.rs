use std::path::{Path, PathBuf};

use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::{File, OpenOptions},
    io::{self, AsyncWriteExt},
};

/// Reads the whole file while holding a shared lock on its lock file.
pub async fn read_locked(path: &Path) -> Result<Vec<u8>, io::Error> {
    let lock = open_lock(path).await?;
    lock.lock_shared()?;
    let result = tokio::fs::read(path).await;
    lock.unlock_async().await?;
    result
}

/// Replaces contents of `path` without ever exposing a half written file. Data goes into a sibling
/// temporary file first, which is then renamed over the target. Writers are serialized with
/// readers through the lock file next to `path`.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), io::Error> {
    let lock = open_lock(path).await?;

    // Semi-safe acquire-release for a file
    lock.lock_exclusive()?;
    let result = replace(path, contents).await;
    lock.unlock_async().await?;
    result
}

async fn replace(path: &Path, contents: &[u8]) -> Result<(), io::Error> {
    let temporary = temporary_path(path);
    let result: Result<(), io::Error> = async {
        let mut file = File::create(&temporary).await?;
        file.write_all(contents).await?;
        file.sync_all().await
    }
    .await;

    if let Err(e) = result {
        let _ = tokio::fs::remove_file(&temporary).await;
        return Err(e);
    }

    tokio::fs::rename(&temporary, path).await?;
    sync_parent(path).await
}

/// The rename itself lives in the directory, so it is flushed too.
#[cfg(unix)]
async fn sync_parent(path: &Path) -> Result<(), io::Error> {
    let parent = path
        .parent()
        .filter(|v| !v.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    File::open(parent).await?.sync_all().await
}

#[cfg(not(unix))]
async fn sync_parent(_path: &Path) -> Result<(), io::Error> {
    Ok(())
}

async fn open_lock(path: &Path) -> Result<File, io::Error> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path(path))
        .await
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

fn temporary_path(path: &Path) -> PathBuf {
    sibling_path(path, ".tmp")
}

fn lock_path(path: &Path) -> PathBuf {
    sibling_path(path, ".lock")
}
