use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::message::ParsedMessage;

/// A message loaded from a file in a folder directory
#[derive(Debug, Clone)]
pub struct FolderEntry {
    pub path: PathBuf,
    pub message: ParsedMessage,
}

/// Load every message file in `dir`, sorted by file name.
///
/// Hidden files and subdirectories are ignored. Files that cannot be read or
/// do not parse as RFC 822 are logged and skipped; only failing to list the
/// directory is an error.
pub async fn load_folder(dir: &Path) -> Result<Vec<FolderEntry>> {
    let mut paths = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if hidden || !entry.file_type().await?.is_file() {
            continue;
        }
        paths.push(entry.path());
    }
    paths.sort();

    let loaded = load_files(paths).await;
    tracing::info!("Loaded {} messages from {}", loaded.len(), dir.display());
    Ok(loaded)
}

/// Read and parse each file in order, skipping the ones that fail.
pub async fn load_files(paths: Vec<PathBuf>) -> Vec<FolderEntry> {
    let mut loaded = Vec::with_capacity(paths.len());
    for path in paths {
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Skipping unreadable {}: {}", path.display(), e);
                continue;
            }
        };
        match ParsedMessage::parse(&raw) {
            Ok(message) => loaded.push(FolderEntry { path, message }),
            Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
        }
    }
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extra;
    use crate::message::Message;
    use mail_builder::MessageBuilder;

    fn build(subject: &str) -> Vec<u8> {
        MessageBuilder::new()
            .from(("Ann", "ann@example.com"))
            .to("bob@example.com")
            .subject(subject)
            .text_body("hello")
            .write_to_vec()
            .unwrap()
    }

    #[tokio::test]
    async fn test_load_folder_sorted() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("2.eml"), build("Second"))
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("1.eml"), build("Re: First"))
            .await
            .unwrap();
        tokio::fs::write(dir.path().join(".hidden"), build("Hidden"))
            .await
            .unwrap();
        tokio::fs::create_dir(dir.path().join("sub")).await.unwrap();

        let entries = load_folder(dir.path()).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].path.ends_with("1.eml"));
        assert_eq!(entries[0].message.header("Subject"), Some("Re: First"));

        let view = extra::get(&entries[0].message);
        assert_eq!(view.author(), "Ann");
        assert_eq!(view.simplified_subject(), "First");
        assert_eq!(view.recipients(), vec!["bob@example.com"]);
    }

    #[tokio::test]
    async fn test_unreadable_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("1.eml");
        tokio::fs::write(&good, build("Kept")).await.unwrap();

        let entries = load_files(vec![dir.path().join("vanished.eml"), good.clone()]).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, good);
        assert_eq!(entries[0].message.header("Subject"), Some("Kept"));
    }

    #[tokio::test]
    async fn test_missing_folder_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_folder(&dir.path().join("nope")).await.is_err());
    }
}
