use std::os::unix::fs::PermissionsExt;

use opskit::command::{Output, ScriptedExecutor};
use opskit::ftp::UserManager;

mod common;

#[test]
fn create_user_provisions_account_directories_and_logs() {
    tokio_test::block_on(async move {
        let root = common::temp_dir();
        let config = common::config(root.path(), "");
        let home = config.ftp_config.user_home("alice");

        let executor = ScriptedExecutor::new()
            .on("id alice", Output::new(1, "", "id: 'alice': no such user"))
            .on("id alice", Output::ok("uid=1001(alice) gid=1001(alice)"))
            .on(
                "getent passwd alice",
                Output::ok(format!("alice:x:1001:1001::{}:/bin/bash\n", home.display())),
            )
            .otherwise(Output::ok(""));
        let manager = UserManager::new(&config, executor).unwrap();

        let account = manager
            .create_user("alice", Some("Tr1cky,\"pass\"".to_owned()))
            .await
            .unwrap();

        assert_eq!(account.username.as_str(), "alice");
        assert_eq!(account.home, home);
        assert_eq!(account.files, home.join("files"));

        let calls = manager.executor().calls();
        assert!(calls.contains(&format!(
            "useradd -m -d {} -s /bin/bash -G ftpusers alice",
            home.display()
        )));
        assert!(calls.contains(&format!("chown 0:0 {}", home.display())));
        assert!(calls.contains(&format!("chown 1001:1001 {}", account.files.display())));
        assert!(!calls.iter().any(|c| c.starts_with("userdel")));
        assert_eq!(
            manager.executor().inputs(),
            vec![("chpasswd".to_owned(), "alice:Tr1cky,\"pass\"".to_owned())]
        );

        for dir in [&account.home, &account.files] {
            let mode = std::fs::metadata(dir).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }

        let allowed = std::fs::read_to_string(config.ftp_config.allowed_users_file()).unwrap();
        assert_eq!(allowed, "alice\n");

        let credentials_file = manager.credentials().path();
        let credentials = std::fs::read_to_string(credentials_file).unwrap();
        let mut rows = credentials.split("\r\n");
        assert_eq!(
            rows.next(),
            Some("Timestamp,Username,Password,Home Directory,Files Directory")
        );
        let row = rows.next().unwrap();
        assert!(row.contains(&format!(
            ",alice,\"Tr1cky,\"\"pass\"\"\",{},{}",
            home.display(),
            account.files.display()
        )));
        let mode = std::fs::metadata(credentials_file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    });
}

#[test]
fn delete_user_drops_only_its_allow_list_line() {
    tokio_test::block_on(async move {
        let root = common::temp_dir();
        let config = common::config(root.path(), "");
        let list = config.ftp_config.allowed_users_file();
        std::fs::create_dir_all(list.parent().unwrap()).unwrap();
        std::fs::write(list, "bob\n  alice \ncarol").unwrap();

        let executor = ScriptedExecutor::new()
            .on("id alice", Output::ok("uid=1001(alice)"))
            .on("userdel alice", Output::ok(""));
        let manager = UserManager::new(&config, executor).unwrap();

        manager.delete_user("alice", false).await.unwrap();

        assert!(manager.executor().was_called("userdel alice"));
        assert_eq!(std::fs::read_to_string(list).unwrap(), "bob\ncarol");
    });
}

#[test]
fn generated_passwords_follow_the_default_policy() {
    let root = common::temp_dir();
    let config = common::config(root.path(), "");
    let manager = UserManager::new(&config, ScriptedExecutor::new()).unwrap();

    for _ in 0..50 {
        let password = manager.generate_password();
        assert_eq!(password.chars().count(), 16);
        assert!(password.chars().any(|c| c.is_ascii_uppercase()));
        assert!(password.chars().any(|c| c.is_ascii_lowercase()));
        assert!(password.chars().any(|c| c.is_ascii_digit()));
        assert!(!password.chars().any(|c| "0O1lI".contains(c)));
    }
}
