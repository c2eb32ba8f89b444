use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::common::{debug, Result, Time};

pub const HEADER: [&str; 5] = [
    "Timestamp",
    "Username",
    "Password",
    "Home Directory",
    "Files Directory",
];

/// One row of the credential log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub timestamp: String,
    pub username: String,
    pub password: String,
    pub home_dir: PathBuf,
    pub files_dir: PathBuf,
}

impl CredentialRecord {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        home_dir: impl Into<PathBuf>,
        files_dir: impl Into<PathBuf>,
    ) -> Self {
        Self::at(Local::now(), username, password, home_dir, files_dir)
    }

    pub(crate) fn at(
        time: Time,
        username: impl Into<String>,
        password: impl Into<String>,
        home_dir: impl Into<PathBuf>,
        files_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            timestamp: time.format("%Y-%m-%d %H:%M:%S").to_string(),
            username: username.into(),
            password: password.into(),
            home_dir: home_dir.into(),
            files_dir: files_dir.into(),
        }
    }

    fn to_csv(&self) -> String {
        let home = self.home_dir.to_string_lossy();
        let files = self.files_dir.to_string_lossy();
        csv_row(&[
            self.timestamp.as_str(),
            self.username.as_str(),
            self.password.as_str(),
            &home,
            &files,
        ])
    }
}

/// Append-only CSV of issued credentials, readable by root only.
#[derive(Debug, Clone)]
pub struct CredentialLog {
    path: PathBuf,
}

impl CredentialLog {
    const FILE_MODE: u32 = 0o600;

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row, writing the header first when the file is new.
    pub async fn append(&self, record: &CredentialRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        // an empty file still needs its header.
        let is_new = fs::metadata(&self.path)
            .await
            .map_or(true, |meta| meta.len() == 0);

        let mut f = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .mode(CredentialLog::FILE_MODE)
            .open(&self.path)
            .await?;

        let mut buf = String::new();
        if is_new {
            buf.push_str(&csv_row(&HEADER));
        }
        buf.push_str(&record.to_csv());
        f.write_all(buf.as_bytes()).await?;
        f.flush().await?;

        // an existing file may have been created with a looser mode.
        fs::set_permissions(
            &self.path,
            std::fs::Permissions::from_mode(CredentialLog::FILE_MODE),
        )
        .await?;

        debug!(path=%self.path.display(), username=%record.username, "Credentials logged");
        Ok(())
    }

    /// Whole file content, `None` when it does not exist yet.
    pub async fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

// RFC 4180 row: fields quoted only when they contain a delimiter, a quote
// or a line break; rows end with CRLF.
fn csv_row(fields: &[&str]) -> String {
    let mut row = fields
        .iter()
        .map(|field| csv_field(field))
        .collect::<Vec<_>>()
        .join(",");
    row.push_str("\r\n");
    row
}

fn csv_field(field: &str) -> String {
    if field.contains(&[',', '"', '\r', '\n'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn quotes_only_when_needed() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn record_row_layout() {
        let time = Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let record = CredentialRecord::at(time, "alice", "p@ss", "/srv/ftp/alice", "/srv/ftp/alice/files");

        assert_eq!(
            record.to_csv(),
            "2024-03-01 09:30:00,alice,p@ss,/srv/ftp/alice,/srv/ftp/alice/files\r\n"
        );
    }

    #[tokio::test]
    async fn one_row_per_append_and_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let log = CredentialLog::new(dir.path().join("nested/creds.csv"));

        let record = CredentialRecord::new("alice", "one", "/srv/ftp/alice", "/srv/ftp/alice/files");
        log.append(&record).await.unwrap();
        let first = log.read().await.unwrap().unwrap();

        let record = CredentialRecord::new("alice", "two", "/srv/ftp/alice", "/srv/ftp/alice/files");
        log.append(&record).await.unwrap();
        let second = log.read().await.unwrap().unwrap();

        assert!(second.starts_with(&first));
        assert_eq!(second.lines().count(), 3);
        assert_eq!(second.matches("Timestamp,Username").count(), 1);

        let mode = std::fs::metadata(log.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn empty_file_gets_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds.csv");
        std::fs::write(&path, "").unwrap();

        let log = CredentialLog::new(&path);
        log.append(&CredentialRecord::new("bob", "pw", "/h", "/h/files"))
            .await
            .unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("Timestamp,Username,Password,Home Directory,Files Directory\r\n"));
        assert_eq!(raw.lines().count(), 2);
    }

    #[tokio::test]
    async fn tightens_mode_of_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds.csv");
        std::fs::write(&path, "Timestamp,Username,Password,Home Directory,Files Directory\r\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let log = CredentialLog::new(&path);
        log.append(&CredentialRecord::new("bob", "pw", "/h", "/h/files"))
            .await
            .unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw.lines().count(), 2);
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
