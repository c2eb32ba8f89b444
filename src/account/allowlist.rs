use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::common::{debug, Result};

/// vsftpd userlist: one username per line, `#` starts a comment line.
#[derive(Debug, Clone)]
pub struct AllowList {
    path: PathBuf,
}

impl AllowList {
    const FILE_MODE: u32 = 0o644;

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        fs::metadata(&self.path).await.is_ok()
    }

    /// Usernames in file order, skipping blank and comment lines.
    pub async fn entries(&self) -> Result<Vec<String>> {
        let raw = fs::read_to_string(&self.path).await?;
        Ok(raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_owned)
            .collect())
    }

    /// Missing file means not listed.
    pub async fn contains(&self, username: &str) -> Result<bool> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(raw.lines().any(|line| line.trim() == username)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Append `username` unless present. Creates the file when missing.
    /// Returns whether a line was written.
    pub async fn add(&self, username: &str) -> Result<bool> {
        if !self.exists().await {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::File::create(&self.path).await?;
            fs::set_permissions(
                &self.path,
                std::fs::Permissions::from_mode(AllowList::FILE_MODE),
            )
            .await?;
            debug!(path=%self.path.display(), "Created allow-list");
        }

        let raw = fs::read_to_string(&self.path).await?;
        if raw.lines().any(|line| line.trim() == username) {
            return Ok(false);
        }

        let mut f = fs::OpenOptions::new()
            .append(true)
            .open(&self.path)
            .await?;
        if !raw.is_empty() && !raw.ends_with('\n') {
            f.write_all(b"\n").await?;
        }
        f.write_all(format!("{}\n", username).as_bytes()).await?;
        f.flush().await?;

        Ok(true)
    }

    /// Drop every line equal to `username` (ignoring surrounding
    /// whitespace). All other lines are kept byte for byte.
    /// Returns how many lines were removed.
    pub async fn remove(&self, username: &str) -> Result<usize> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(err.into()),
        };

        let mut kept = String::with_capacity(raw.len());
        let mut removed = 0;
        for line in raw.split_inclusive('\n') {
            if line.trim() == username {
                removed += 1;
            } else {
                kept.push_str(line);
            }
        }

        if removed > 0 {
            fs::write(&self.path, kept).await?;
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_creates_file_with_mode() {
        let dir = tempfile::tempdir().unwrap();
        let list = AllowList::new(dir.path().join("vsftpd.userlist"));

        assert!(list.add("alice").await.unwrap());
        assert!(!list.add("alice").await.unwrap());

        let mode = std::fs::metadata(list.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
        assert_eq!(std::fs::read_to_string(list.path()).unwrap(), "alice\n");
    }

    #[tokio::test]
    async fn add_repairs_missing_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("userlist");
        std::fs::write(&path, "alice").unwrap();

        AllowList::new(&path).add("bob").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "alice\nbob\n");
    }

    #[tokio::test]
    async fn entries_skip_comments_and_blanks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("userlist");
        std::fs::write(&path, "# managed\nalice\n\n  bob  \n  # disabled: carol\n").unwrap();

        let entries = AllowList::new(&path).entries().await.unwrap();
        assert_eq!(entries, vec!["alice", "bob"]);
    }

    #[tokio::test]
    async fn remove_only_touches_matching_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("userlist");
        std::fs::write(&path, "# ftp users\nalice\nalice2\nbob\n").unwrap();
        let list = AllowList::new(&path);

        assert_eq!(list.remove("alice").await.unwrap(), 1);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "# ftp users\nalice2\nbob\n"
        );

        assert_eq!(list.remove("carol").await.unwrap(), 0);
        assert!(!list.contains("alice").await.unwrap());
        assert!(list.contains("alice2").await.unwrap());
    }

    #[tokio::test]
    async fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let list = AllowList::new(dir.path().join("none"));

        assert!(!list.contains("alice").await.unwrap());
        assert_eq!(list.remove("alice").await.unwrap(), 0);
    }
}
