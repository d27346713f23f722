//! Whitelist file store
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation
//!
//! One JSON file holding every whitelisted player. The file is small and
//! rewritten whole on each addition; a missing file reads as empty.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One whitelisted player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhitelistEntry {
    /// Discord user that requested the entry
    pub user_id: u64,
    /// Minecraft username as resolved by Mojang
    pub username: String,
    /// Mojang profile uuid
    pub uuid: String,
    pub added_at: DateTime<Utc>,
}

pub struct WhitelistStore {
    path: PathBuf,
}

impl WhitelistStore {
    pub fn new(path: PathBuf) -> Self {
        WhitelistStore { path }
    }

    pub async fn load(&self) -> Result<Vec<WhitelistEntry>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("malformed whitelist file {}", self.path.display())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err).context("failed to read whitelist file"),
        }
    }

    pub async fn add(&self, entry: WhitelistEntry) -> Result<()> {
        let mut entries = self.load().await?;
        entries.push(entry);
        self.save(&entries).await
    }

    async fn save(&self, entries: &[WhitelistEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("failed to create whitelist directory")?;
        }
        let bytes = serde_json::to_vec_pretty(entries)?;
        tokio::fs::write(&self.path, bytes)
            .await
            .with_context(|| format!("failed to write whitelist file {}", self.path.display()))
    }
}

/// An entry collides when any of the three keys is already taken: the
/// Minecraft name, the profile uuid, or the requesting Discord user.
pub fn find_conflict<'a>(
    entries: &'a [WhitelistEntry],
    user_id: u64,
    username: &str,
    uuid: &str,
) -> Option<&'a WhitelistEntry> {
    entries.iter().find(|entry| {
        entry.username == username || entry.uuid == uuid || entry.user_id == user_id
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(user_id: u64, username: &str, uuid: &str) -> WhitelistEntry {
        WhitelistEntry {
            user_id,
            username: username.to_string(),
            uuid: uuid.to_string(),
            added_at: Utc::now(),
        }
    }

    #[test]
    fn test_find_conflict_by_each_key() {
        let entries = vec![entry(1, "Steve", "uuid-steve")];

        assert!(find_conflict(&entries, 1, "Alex", "uuid-alex").is_some());
        assert!(find_conflict(&entries, 2, "Steve", "uuid-alex").is_some());
        assert!(find_conflict(&entries, 2, "Alex", "uuid-steve").is_some());
        assert!(find_conflict(&entries, 2, "Alex", "uuid-alex").is_none());
    }

    #[test]
    fn test_find_conflict_empty() {
        assert!(find_conflict(&[], 1, "Steve", "uuid-steve").is_none());
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let store = WhitelistStore::new(unique_temp_path());
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_then_load_round_trip() {
        let path = unique_temp_path();
        let store = WhitelistStore::new(path.clone());

        store.add(entry(1, "Steve", "uuid-steve")).await.unwrap();
        store.add(entry(2, "Alex", "uuid-alex")).await.unwrap();

        let entries = store.load().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].username, "Steve");
        assert_eq!(entries[1].user_id, 2);

        tokio::fs::remove_file(path).await.unwrap();
    }

    fn unique_temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("whitelist-{}.json", uuid::Uuid::new_v4()))
    }
}
