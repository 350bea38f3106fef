use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::{File, create_dir_all, rename};
use tokio::io::AsyncWriteExt;

/// Writes `data` to a temporary sibling of `path`, then renames it into place.
/// The parent directory is synced after the temp file is created and again
/// after the rename.
pub async fn write_bytes_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let parent = path.parent().filter(|parent| !parent.as_os_str().is_empty());
    if let Some(parent) = parent {
        create_dir_all(parent).await?;
    }

    let tmp_path = temp_path(path)?;
    let mut file = File::create(&tmp_path).await?;
    file.write_all(data).await?;
    file.sync_all().await?;
    drop(file);

    if let Some(parent) = parent {
        sync_dir(parent).await?;
    }

    rename(&tmp_path, path).await?;
    if let Some(parent) = parent {
        sync_dir(parent).await?;
    }

    Ok(())
}

async fn sync_dir(path: &Path) -> io::Result<()> {
    let dir = File::open(path).await?;
    dir.sync_all().await
}

fn temp_path(path: &Path) -> io::Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "invalid path for atomic write")
    })?;
    let tmp_name = format!("{}.tmp", file_name.to_string_lossy());
    Ok(path.with_file_name(tmp_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_parents_and_leaves_no_temp_file() {
        let dir = std::env::temp_dir().join(format!("modelgen-output-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested/out.txt");

        write_bytes_atomic(&path, b"hello").await.expect("write");

        assert_eq!(std::fs::read_to_string(&path).expect("read"), "hello");
        assert!(!dir.join("nested/out.txt.tmp").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn replaces_an_existing_file_in_place() {
        let dir = std::env::temp_dir().join(format!("modelgen-output-{}", uuid::Uuid::new_v4()));
        let path = dir.join("out.txt");

        write_bytes_atomic(&path, b"first").await.expect("first write");
        write_bytes_atomic(&path, b"second").await.expect("second write");

        assert_eq!(std::fs::read_to_string(&path).expect("read"), "second");
        let names: Vec<_> = std::fs::read_dir(&dir)
            .expect("list")
            .map(|entry| entry.expect("entry").file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("out.txt")]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn rejects_paths_without_a_file_name() {
        assert!(temp_path(Path::new("/")).is_err());
    }
}
