use std::path::PathBuf;

use clap::Parser;
use tokio::io::AsyncBufRead;

use crate::account::Username;
use crate::cli::ftp_debug::FtpOverrides;
use crate::command::{Executor, SystemExecutor};
use crate::config::{Config, MissingFile};
use crate::ftp::users::{Account, UserManager};
use crate::report::{self, Status};
use crate::sys;
use crate::term::Prompt;
use crate::{OpskitError, Result};

const QUIT_WORDS: [&str; 3] = ["quit", "q", "exit"];

/// Manage vsftpd user accounts (requires root)
#[derive(Parser, Debug)]
#[command(name = "ftp-users", version)]
pub struct FtpUsersCommand {
    /// Configuration file path
    #[arg(default_value = Config::DEFAULT_PATH)]
    config: PathBuf,
    #[command(flatten)]
    overrides: FtpOverrides,
}

impl FtpUsersCommand {
    pub async fn run(self) -> Result<()> {
        let FtpUsersCommand { config, overrides } = self;

        let mut config = super::load_config(&config, MissingFile::Fail).await?;
        overrides.apply(&mut config.ftp_config);

        if !sys::is_root() {
            return Err(OpskitError::NotRoot);
        }

        let manager = UserManager::new(&config, SystemExecutor::default())?;
        menu(&manager, &mut Prompt::stdin()).await
    }
}

/// Main menu loop. Returns when the operator exits or input ends.
pub async fn menu<E, R>(manager: &UserManager<E>, prompt: &mut Prompt<R>) -> Result<()>
where
    E: Executor,
    R: AsyncBufRead + Unpin,
{
    loop {
        report::title("FTP USER MANAGER");
        println!("\n1. Create new user");
        println!("2. Delete user");
        println!("3. Change user password");
        println!("4. List all users");
        println!("5. Show user information");
        println!("6. View credentials file");
        println!("7. Exit");

        let Some(choice) = prompt.ask("\nSelect option: ").await? else {
            return Ok(());
        };

        match choice.as_str() {
            "1" => create_loop(manager, prompt).await?,
            "2" => delete(manager, prompt).await?,
            "3" => change_password(manager, prompt).await?,
            "4" => {
                if let Err(err) = manager.show_users().await {
                    report::line(Status::Fail, format!("Failed to list users: {}", err));
                }
            }
            "5" => {
                if let Some(username) = super::non_empty(prompt.ask("\nEnter username: ").await?) {
                    show_user_info(manager, &username).await;
                }
            }
            "6" => {
                if let Err(err) = manager.view_credentials().await {
                    report::line(Status::Fail, format!("Failed to read credentials: {}", err));
                }
                prompt.pause().await?;
            }
            c if c == "7" || QUIT_WORDS.contains(&c.to_lowercase().as_str()) => {
                println!("\nGoodbye!");
                return Ok(());
            }
            _ => report::line(Status::Fail, "Invalid option"),
        }
    }
}

async fn create_loop<E, R>(manager: &UserManager<E>, prompt: &mut Prompt<R>) -> Result<()>
where
    E: Executor,
    R: AsyncBufRead + Unpin,
{
    report::title("CREATE NEW FTP USER");

    loop {
        let Some(answer) = prompt
            .ask("\nEnter username (or 'quit' to exit): ")
            .await?
        else {
            return Ok(());
        };
        if QUIT_WORDS.contains(&answer.to_lowercase().as_str()) {
            return Ok(());
        }

        let username = match Username::new(answer) {
            Ok(username) => username,
            Err(err) => {
                report::line(Status::Fail, err);
                continue;
            }
        };
        if manager.user_exists(&username).await {
            report::line(Status::Warn, format!("User '{}' already exists", username));
            continue;
        }

        let password = if prompt.confirm("Use custom password? (y/N): ").await? {
            match ask_new_password(prompt, "Enter password: ").await? {
                Some(password) => Some(password),
                None => continue,
            }
        } else {
            report::line(Status::Pass, "Password will be auto-generated");
            None
        };

        match manager.create_user(&username, password).await {
            Ok(account) => print_created(manager, &account),
            Err(err) => {
                report::line(Status::Fail, err);
                return Ok(());
            }
        }

        if !prompt.confirm("\nCreate another user? (y/N): ").await? {
            return Ok(());
        }
    }
}

async fn delete<E, R>(manager: &UserManager<E>, prompt: &mut Prompt<R>) -> Result<()>
where
    E: Executor,
    R: AsyncBufRead + Unpin,
{
    let Some(username) = super::non_empty(prompt.ask("\nEnter username to delete: ").await?) else {
        return Ok(());
    };

    if manager.user_exists(&username).await {
        show_user_info(manager, &username).await;
    }

    let remove_home = manager.remove_home_on_delete();
    let question = if remove_home {
        format!("\nDelete user '{}' and their files? (yes/no): ", username)
    } else {
        format!("\nDelete user '{}'? (yes/no): ", username)
    };
    let confirmed = prompt
        .ask(&question)
        .await?
        .map_or(false, |a| a.eq_ignore_ascii_case("yes"));
    if !confirmed {
        println!("Cancelled");
        return Ok(());
    }

    if let Err(err) = manager.delete_user(&username, remove_home).await {
        report::line(Status::Fail, format!("Failed to delete user: {}", err));
    }
    Ok(())
}

async fn change_password<E, R>(manager: &UserManager<E>, prompt: &mut Prompt<R>) -> Result<()>
where
    E: Executor,
    R: AsyncBufRead + Unpin,
{
    let Some(username) = super::non_empty(prompt.ask("\nEnter username: ").await?) else {
        return Ok(());
    };
    if !manager.user_exists(&username).await {
        report::line(Status::Fail, format!("User '{}' does not exist", username));
        return Ok(());
    }

    let password = if prompt.confirm("Use custom password? (y/N): ").await? {
        match ask_new_password(prompt, "Enter new password: ").await? {
            Some(password) => Some(password),
            None => return Ok(()),
        }
    } else {
        None
    };

    match manager.change_password(&username, password).await {
        Ok(password) => {
            println!();
            report::line(Status::Pass, "Password changed successfully");
            println!("   New password: {}", password);
        }
        Err(err) => report::line(Status::Fail, format!("Failed to change password: {}", err)),
    }
    Ok(())
}

async fn show_user_info<E: Executor>(manager: &UserManager<E>, username: &str) {
    if let Err(err) = manager.show_user_info(username).await {
        report::line(Status::Fail, format!("Failed to read user information: {}", err));
    }
}

/// Ask twice without echo. `None` when the answers differ or input ended.
async fn ask_new_password<R>(prompt: &mut Prompt<R>, question: &str) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let first = prompt.ask_secret(question).await?;
    let second = prompt.ask_secret("Confirm password: ").await?;
    match (first, second) {
        (Some(first), Some(second)) if first == second => Ok(Some(first)),
        (Some(_), Some(_)) => {
            report::line(Status::Fail, "Passwords do not match");
            Ok(None)
        }
        _ => Ok(None),
    }
}

fn print_created<E: Executor>(manager: &UserManager<E>, account: &Account) {
    report::title("USER CREATED SUCCESSFULLY");
    println!("\n📝 Credentials:");
    println!("   Username: {}", account.username);
    println!("   Password: {}", account.password);
    println!("\n📁 Directories:");
    println!("   FTP Root: {}", account.home.display());
    println!("   Writable: {}", account.files.display());
    println!(
        "\n🔒 Credentials saved to: {}",
        manager.credentials().path().display()
    );
    println!("\n{}", report::rule());
}
