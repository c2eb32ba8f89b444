use std::path::PathBuf;

use crate::command::{Executor, Invocation};
use crate::common::{ErrorKind, Result};

/// The fields of an `/etc/passwd` line the tools care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswdEntry {
    pub name: String,
    pub uid: u32,
    pub gid: u32,
    pub home: PathBuf,
    pub shell: String,
}

impl PasswdEntry {
    /// Parse `name:password:uid:gid:gecos:home:shell`.
    pub fn parse(line: &str) -> Result<Self> {
        let malformed = || ErrorKind::MalformedPasswd {
            line: line.to_owned(),
        };
        let fields: Vec<&str> = line.trim_end().split(':').collect();
        if fields.len() != 7 {
            return Err(malformed().into());
        }

        Ok(Self {
            name: fields[0].to_owned(),
            uid: fields[2].parse().map_err(|_| malformed())?,
            gid: fields[3].parse().map_err(|_| malformed())?,
            home: PathBuf::from(fields[5]),
            shell: fields[6].to_owned(),
        })
    }

    /// Look the account up through NSS. `None` when it does not exist.
    pub async fn lookup<E>(executor: &E, username: &str) -> Result<Option<Self>>
    where
        E: Executor + ?Sized,
    {
        let out = executor
            .output(&Invocation::new("getent").args(["passwd", username]))
            .await;
        if !out.success() {
            return Ok(None);
        }
        match out.stdout.lines().next() {
            Some(line) => PasswdEntry::parse(line).map(Some),
            None => Ok(None),
        }
    }
}

/// `id <user>` succeeds.
pub async fn user_exists<E>(executor: &E, username: &str) -> bool
where
    E: Executor + ?Sized,
{
    executor
        .succeeds(&Invocation::new("id").arg(username))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Output, ScriptedExecutor};

    #[test]
    fn parses_passwd_line() {
        let entry =
            PasswdEntry::parse("alice:x:1001:1002:Alice,,,:/srv/ftp/alice:/bin/bash\n").unwrap();

        assert_eq!(entry.uid, 1001);
        assert_eq!(entry.gid, 1002);
        assert_eq!(entry.home, PathBuf::from("/srv/ftp/alice"));
        assert_eq!(entry.shell, "/bin/bash");
    }

    #[test]
    fn rejects_malformed_line() {
        assert!(PasswdEntry::parse("alice:x:notanumber:1:::/bin/sh").is_err());
        assert!(PasswdEntry::parse("alice:x:1").is_err());
    }

    #[tokio::test]
    async fn lookup_missing_user() {
        let executor = ScriptedExecutor::new()
            .on("getent passwd ghost", Output::new(2, "", ""));

        assert_eq!(PasswdEntry::lookup(&executor, "ghost").await.unwrap(), None);
        assert!(!user_exists(&executor, "ghost").await);
    }
}
