use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::account::{self, AllowList, CredentialLog, CredentialRecord, PasswdEntry, PasswordGenerator, Username};
use crate::command::{Executor, Invocation};
use crate::common::{info, warn, ErrorKind, Result};
use crate::config::{Config, FtpConfig, LoggingConfig, UserDefaults};
use crate::report::{self, Status};
use crate::sys;

const DIR_MODE: u32 = 0o755;

/// A freshly provisioned (or re-keyed) FTP account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub username: Username,
    pub password: String,
    pub home: PathBuf,
    pub files: PathBuf,
}

/// Row of the user listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listed {
    pub username: String,
    pub state: ListedState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListedState {
    Active { home: PathBuf },
    MissingDirectories { home: PathBuf },
    AccountMissing,
}

/// Ownership and mode of a directory, `None` when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirStatus {
    pub path: PathBuf,
    pub owner: Option<(u32, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub entry: PasswdEntry,
    pub groups: String,
    pub home: DirStatus,
    pub files: DirStatus,
    /// `None` when the allow-list file does not exist.
    pub allowed: Option<bool>,
}

/// Creates, removes and inspects vsftpd accounts.
pub struct UserManager<E> {
    executor: E,
    ftp: FtpConfig,
    defaults: UserDefaults,
    logging: LoggingConfig,
    generator: PasswordGenerator,
    allow_list: AllowList,
    credentials: CredentialLog,
}

impl<E> UserManager<E>
where
    E: Executor,
{
    /// Fails when the password policy cannot be satisfied.
    pub fn new(config: &Config, executor: E) -> Result<Self> {
        let generator = PasswordGenerator::new(&config.password_policy)?;
        Ok(Self {
            executor,
            allow_list: AllowList::new(config.ftp_config.allowed_users_file()),
            credentials: CredentialLog::new(config.logging.credentials_file()),
            ftp: config.ftp_config.clone(),
            defaults: config.user_defaults.clone(),
            logging: config.logging.clone(),
            generator,
        })
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    pub fn credentials(&self) -> &CredentialLog {
        &self.credentials
    }

    pub fn remove_home_on_delete(&self) -> bool {
        self.defaults.remove_home_on_delete()
    }

    pub fn home_dir(&self, username: &str) -> PathBuf {
        self.ftp.user_home(username)
    }

    pub fn files_dir(&self, username: &str) -> PathBuf {
        self.home_dir(username).join(self.defaults.files_dir())
    }

    pub async fn user_exists(&self, username: &str) -> bool {
        account::user_exists(&self.executor, username).await
    }

    pub fn generate_password(&self) -> String {
        self.generator.generate()
    }

    /// Provision an account. A password is generated when none is given.
    ///
    /// When provisioning fails after `useradd`, the account is removed
    /// again with `userdel -r`.
    pub async fn create_user(&self, username: &str, password: Option<String>) -> Result<Account> {
        let username = Username::new(username)?;
        if self.user_exists(&username).await {
            return Err(ErrorKind::UserExists {
                username: username.into_string(),
            }
            .into());
        }

        let account = Account {
            password: password.unwrap_or_else(|| self.generate_password()),
            home: self.home_dir(&username),
            files: self.files_dir(&username),
            username,
        };

        println!("\n👤 Creating user: {}", account.username);
        if let Err(err) = self.provision(&account).await {
            report::line(Status::Fail, format!("Failed to create user: {}", err));
            self.cleanup(&account.username).await;
            return Err(err);
        }

        self.log_credentials(&account).await;
        println!("\n✓ User '{}' created successfully", account.username);
        info!(username=%account.username, "User created");

        Ok(account)
    }

    async fn provision(&self, account: &Account) -> Result<()> {
        let name = account.username.as_str();

        self.executor
            .checked(
                &Invocation::new("useradd")
                    .arg("-m")
                    .arg("-d")
                    .arg(account.home.to_string_lossy())
                    .args(["-s", self.ftp.default_shell(), "-G", self.ftp.ftp_group()])
                    .arg(name),
            )
            .await?;
        self.set_password(name, &account.password).await?;
        report::line(Status::Pass, "User account created");

        println!("📁 Setting up directories...");
        // chroot target must be owned by root and not writable by the user.
        fs::create_dir_all(&account.home).await?;
        self.chown(&account.home, 0, 0).await?;
        set_mode(&account.home, DIR_MODE).await?;

        fs::create_dir_all(&account.files).await?;
        let entry = PasswdEntry::lookup(&self.executor, name)
            .await?
            .ok_or_else(|| ErrorKind::UserNotFound {
                username: name.to_owned(),
            })?;
        self.chown(&account.files, entry.uid, entry.gid).await?;
        set_mode(&account.files, DIR_MODE).await?;

        report::line(Status::Pass, "Directory structure created");
        println!("   Home: {}", account.home.display());
        println!("   Files: {}", account.files.display());

        if self.allow_list.add(name).await? {
            report::line(Status::Pass, "Added to allowed users list");
        } else {
            report::line(Status::Pass, "Already in allowed users list");
        }

        Ok(())
    }

    async fn cleanup(&self, username: &str) {
        if self.user_exists(username).await {
            let out = self
                .executor
                .output(&Invocation::new("userdel").args(["-r", username]))
                .await;
            if !out.success() {
                warn!(username, stderr=%out.stderr.trim(), "Cleanup of partial account failed");
            }
        }
    }

    /// Remove the account and its allow-list entry.
    pub async fn delete_user(&self, username: &str, remove_home: bool) -> Result<()> {
        if !self.user_exists(username).await {
            return Err(ErrorKind::UserNotFound {
                username: username.to_owned(),
            }
            .into());
        }

        println!("\n🗑️  Deleting user: {}", username);

        let mut userdel = Invocation::new("userdel");
        if remove_home {
            userdel = userdel.arg("-r");
        }
        self.executor.checked(&userdel.arg(username)).await?;
        report::line(Status::Pass, "User account deleted");

        if self.allow_list.exists().await {
            self.allow_list.remove(username).await?;
            report::line(Status::Pass, "Removed from allowed users list");
        }

        println!("\n✓ User '{}' deleted successfully", username);
        info!(username, remove_home, "User deleted");
        Ok(())
    }

    /// Set a new password, generated when none is given. Returns it.
    pub async fn change_password(&self, username: &str, password: Option<String>) -> Result<String> {
        if !self.user_exists(username).await {
            return Err(ErrorKind::UserNotFound {
                username: username.to_owned(),
            }
            .into());
        }

        let password = password.unwrap_or_else(|| self.generate_password());

        println!("\n🔑 Changing password for: {}", username);
        self.set_password(username, &password).await?;
        report::line(Status::Pass, "Password changed successfully");

        let record = CredentialRecord::new(
            username,
            password.as_str(),
            self.home_dir(username),
            self.files_dir(username),
        );
        self.append_credentials(&record).await;

        Ok(password)
    }

    /// Allow-listed users with their state. `None` when the allow-list
    /// file does not exist.
    pub async fn list_users(&self) -> Result<Option<Vec<Listed>>> {
        if !self.allow_list.exists().await {
            return Ok(None);
        }

        let mut listed = Vec::new();
        for username in self.allow_list.entries().await? {
            let state = if self.user_exists(&username).await {
                let home = self.home_dir(&username);
                if fs::metadata(&home).await.is_ok() {
                    ListedState::Active { home }
                } else {
                    ListedState::MissingDirectories { home }
                }
            } else {
                ListedState::AccountMissing
            };
            listed.push(Listed { username, state });
        }
        Ok(Some(listed))
    }

    /// Account details, `None` when the user does not exist.
    pub async fn user_info(&self, username: &str) -> Result<Option<UserInfo>> {
        if !self.user_exists(username).await {
            return Ok(None);
        }
        let Some(entry) = PasswdEntry::lookup(&self.executor, username).await? else {
            return Ok(None);
        };

        let groups = self
            .executor
            .output(&Invocation::new("groups").arg(username))
            .await;
        let groups = groups
            .stdout
            .rsplit(':')
            .next()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .unwrap_or("N/A")
            .to_owned();

        let home = dir_status(entry.home.clone()).await;
        let files = dir_status(entry.home.join(self.defaults.files_dir())).await;
        let allowed = if self.allow_list.exists().await {
            Some(self.allow_list.contains(username).await?)
        } else {
            None
        };

        Ok(Some(UserInfo {
            entry,
            groups,
            home,
            files,
            allowed,
        }))
    }

    pub async fn show_user_info(&self, username: &str) -> Result<()> {
        report::header(&format!("USER INFORMATION: {}", username));

        match self.user_info(username).await? {
            Some(info) => print_user_info(&info, self.allow_list.path()),
            None => report::line(Status::Fail, format!("User '{}' does not exist", username)),
        }

        println!("\n{}\n", report::rule());
        Ok(())
    }

    pub async fn show_users(&self) -> Result<()> {
        report::header("FTP USERS");

        let Some(listed) = self.list_users().await? else {
            report::line(Status::Warn, "No user list file found");
            println!("   Expected at: {}", self.allow_list.path().display());
            return Ok(());
        };
        if listed.is_empty() {
            println!("No users found");
            return Ok(());
        }

        println!("{:<20} {:<40} Status", "Username", "Home Directory");
        println!("{}", "-".repeat(report::WIDTH));
        for user in &listed {
            let (home, status) = match &user.state {
                ListedState::Active { home } => (home.display().to_string(), "✓ Active"),
                ListedState::MissingDirectories { home } => {
                    (home.display().to_string(), "⚠ Missing directories")
                }
                ListedState::AccountMissing => ("N/A".to_owned(), "✗ User missing"),
            };
            println!("{:<20} {:<40} {}", user.username, home, status);
        }
        println!("\n{}\n", report::rule());
        Ok(())
    }

    /// Print the credential log.
    pub async fn view_credentials(&self) -> Result<()> {
        match self.credentials.read().await? {
            Some(content) => {
                println!("\n📄 Credentials File: {}\n", self.credentials.path().display());
                println!("{}", content);
            }
            None => report::line(
                Status::Fail,
                format!(
                    "Credentials file not found: {}",
                    self.credentials.path().display()
                ),
            ),
        }
        Ok(())
    }

    async fn set_password(&self, username: &str, password: &str) -> Result<()> {
        self.executor
            .checked_with_input(
                &Invocation::new("chpasswd"),
                &format!("{}:{}", username, password),
            )
            .await?;
        Ok(())
    }

    async fn chown(&self, path: &Path, uid: u32, gid: u32) -> Result<()> {
        self.executor
            .checked(
                &Invocation::new("chown")
                    .arg(format!("{}:{}", uid, gid))
                    .arg(path.to_string_lossy()),
            )
            .await?;
        Ok(())
    }

    async fn log_credentials(&self, account: &Account) {
        let record = CredentialRecord::new(
            account.username.as_str(),
            account.password.as_str(),
            account.home.as_path(),
            account.files.as_path(),
        );
        self.append_credentials(&record).await;
    }

    // A failed write does not undo the account operation.
    async fn append_credentials(&self, record: &CredentialRecord) {
        if !self.logging.enabled() {
            return;
        }
        match self.credentials.append(record).await {
            Ok(()) => report::line(
                Status::Pass,
                format!("Credentials saved to {}", self.credentials.path().display()),
            ),
            Err(err) => {
                warn!(%err, "Append credential log");
                report::line(Status::Warn, format!("Failed to log credentials: {}", err));
            }
        }
    }
}

async fn set_mode(path: &Path, mode: u32) -> Result<()> {
    fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).await?;
    Ok(())
}

async fn dir_status(path: PathBuf) -> DirStatus {
    let owner = fs::metadata(&path)
        .await
        .ok()
        .map(|meta| (sys::owner_uid(&meta), sys::mode_string(&meta)));
    DirStatus { path, owner }
}

fn print_user_info(info: &UserInfo, allow_list: &Path) {
    println!("Username: {}", info.entry.name);
    println!("UID: {}", info.entry.uid);
    println!("GID: {}", info.entry.gid);
    println!("Home Directory: {}", info.entry.home.display());
    println!("Shell: {}", info.entry.shell);
    println!("Groups: {}", info.groups);

    println!("\nDirectory Status:");
    match &info.home.owner {
        Some((uid, mode)) => {
            println!("  Home: ✓ {}", info.home.path.display());
            println!("    Owner: UID {} (should be 0 for chroot)", uid);
            println!("    Permissions: {}", mode);
        }
        None => println!("  Home: ✗ Missing - {}", info.home.path.display()),
    }
    match &info.files.owner {
        Some((uid, mode)) => {
            println!("  Files: ✓ {}", info.files.path.display());
            println!("    Owner: UID {}", uid);
            println!("    Permissions: {}", mode);
        }
        None => println!("  Files: ✗ Missing - {}", info.files.path.display()),
    }

    match info.allowed {
        Some(true) => println!("\nAllowed List: ✓ Present in {}", allow_list.display()),
        Some(false) => println!("\nAllowed List: ✗ Not in {}", allow_list.display()),
        None => {}
    }
}
