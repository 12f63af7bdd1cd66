//! Integration tests for pkgcache

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Binary with config, state and home pointed into `home`
    fn pkgcache(home: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("pkgcache");
        cmd.env("HOME", home)
            .env("XDG_CONFIG_HOME", home.join("config"))
            .env("XDG_STATE_HOME", home.join("state"))
            .env("XDG_CACHE_HOME", home.join("cache"))
            .env_remove("PKGCACHE_CONFIG");
        cmd
    }

    fn build_dir(home: &Path, workspaces: &[&str]) -> std::path::PathBuf {
        let root = home.join("build");
        for name in workspaces {
            fs::create_dir_all(root.join(name)).unwrap();
        }
        fs::create_dir_all(&root).unwrap();
        root
    }

    fn write_config(home: &Path, content: &str) -> std::path::PathBuf {
        let path = home.join("pkgcache.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn help_displays() {
        let home = TempDir::new().unwrap();
        pkgcache(home.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("build cache"));
    }

    #[test]
    fn version_displays() {
        let home = TempDir::new().unwrap();
        pkgcache(home.path())
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("pkgcache"));
    }

    #[test]
    fn config_path() {
        let home = TempDir::new().unwrap();
        pkgcache(home.path())
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("pkgcache/config.toml"));
    }

    #[test]
    fn config_show() {
        let home = TempDir::new().unwrap();
        pkgcache(home.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]"))
            .stdout(predicate::str::contains("KeepInstalled"));
    }

    #[test]
    fn config_init_writes_file() {
        let home = TempDir::new().unwrap();
        let path = home.path().join("custom.toml");

        pkgcache(home.path())
            .args(["--config", path.to_str().unwrap(), "config", "init"])
            .assert()
            .success();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("[remote]"));
    }

    #[test]
    fn invalid_config_fails() {
        let home = TempDir::new().unwrap();
        let config = write_config(home.path(), "[cache]\njobs = 0\n");

        pkgcache(home.path())
            .args(["--config", config.to_str().unwrap(), "config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("cache.jobs"));
    }

    #[test]
    fn clean_all_removes_everything() {
        let home = TempDir::new().unwrap();
        let root = build_dir(home.path(), &["foo", "bar/.git", "baz"]);

        pkgcache(home.path())
            .args(["clean", "--all", "-y", "--build-dir", root.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("3 removed, 0 kept, 0 failed"));

        assert!(root.exists());
        assert_eq!(fs::read_dir(&root).unwrap().count(), 0);
    }

    #[test]
    fn clean_all_writes_audit_log() {
        let home = TempDir::new().unwrap();
        let root = build_dir(home.path(), &["foo"]);

        pkgcache(home.path())
            .args(["clean", "--all", "-y", "--build-dir", root.to_str().unwrap()])
            .assert()
            .success();

        let log = fs::read_to_string(home.path().join("state/pkgcache/audit.log")).unwrap();
        assert!(log.contains("cache.reconcile"));
        assert!(log.contains("\"foo\""));
    }

    #[test]
    fn clean_dry_run_touches_nothing() {
        let home = TempDir::new().unwrap();
        let root = build_dir(home.path(), &["foo", "bar"]);

        pkgcache(home.path())
            .args([
                "clean",
                "--all",
                "--dry-run",
                "--build-dir",
                root.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("2 of 2 workspace(s) would be removed"));

        assert!(root.join("foo").exists());
        assert!(root.join("bar").exists());
    }

    #[test]
    fn clean_without_retention_keeps_stray_files() {
        let home = TempDir::new().unwrap();
        let root = build_dir(home.path(), &["foo", "bar"]);
        fs::write(root.join("notes.txt"), "keep me").unwrap();
        let config = write_config(home.path(), "[cache]\nclean_method = []\n");

        pkgcache(home.path())
            .args([
                "--config",
                config.to_str().unwrap(),
                "clean",
                "-y",
                "--build-dir",
                root.to_str().unwrap(),
            ])
            .assert()
            .success();

        assert!(!root.join("foo").exists());
        assert!(!root.join("bar").exists());
        assert!(root.join("notes.txt").exists());
    }

    #[test]
    fn clean_failure_exits_nonzero_after_report() {
        let home = TempDir::new().unwrap();
        let root = build_dir(home.path(), &["foo", "bar/.git"]);
        let config = write_config(
            home.path(),
            "[cache]\nclean_method = []\n\n[vcs]\nbin = \"false\"\n",
        );

        pkgcache(home.path())
            .args([
                "--config",
                config.to_str().unwrap(),
                "clean",
                "-y",
                "--build-dir",
                root.to_str().unwrap(),
            ])
            .assert()
            .failure()
            .stdout(predicate::str::contains("bar"))
            .stderr(predicate::str::contains("could not be disposed"));

        assert!(!root.join("foo").exists());
        assert!(root.join("bar").exists());
    }

    #[test]
    fn clean_missing_build_dir_fails_with_hint() {
        let home = TempDir::new().unwrap();
        let missing = home.path().join("nope");

        pkgcache(home.path())
            .args(["clean", "--all", "-y", "--build-dir", missing.to_str().unwrap()])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Cannot read build directory"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn list_plain_sorted() {
        let home = TempDir::new().unwrap();
        let root = build_dir(home.path(), &["zeta", "alpha", "mid/.git"]);

        pkgcache(home.path())
            .args(["list", "--format", "plain", "--build-dir", root.to_str().unwrap()])
            .assert()
            .success()
            .stdout("alpha\nmid\nzeta\n");
    }

    #[test]
    fn list_json_reports_state() {
        let home = TempDir::new().unwrap();
        let root = build_dir(home.path(), &["foo", "bar/.git"]);

        let output = pkgcache(home.path())
            .args(["list", "--format", "json", "--build-dir", root.to_str().unwrap()])
            .output()
            .unwrap();
        assert!(output.status.success());

        let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(listed[0]["name"], "bar");
        assert_eq!(listed[0]["state"], "vcs");
        assert_eq!(listed[1]["name"], "foo");
        assert_eq!(listed[1]["state"], "plain");
    }

    #[test]
    fn list_empty_json() {
        let home = TempDir::new().unwrap();
        let root = build_dir(home.path(), &[]);

        pkgcache(home.path())
            .args(["list", "--format", "json", "--build-dir", root.to_str().unwrap()])
            .assert()
            .success()
            .stdout("[]\n");
    }

    #[test]
    fn dispose_delete_named_bases() {
        let home = TempDir::new().unwrap();
        let root = build_dir(home.path(), &["foo", "bar"]);

        pkgcache(home.path())
            .args([
                "dispose",
                "foo",
                "ghost",
                "--delete",
                "--build-dir",
                root.to_str().unwrap(),
            ])
            .assert()
            .success();

        assert!(!root.join("foo").exists());
        assert!(root.join("bar").exists());
    }

    #[test]
    fn dispose_rejects_paths_outside_build_dir() {
        let home = TempDir::new().unwrap();
        let root = build_dir(home.path(), &["foo"]);
        let victim = home.path().join("victim");
        fs::create_dir_all(victim.join("src")).unwrap();

        for base in [victim.to_str().unwrap(), "../victim", "foo/../../victim"] {
            pkgcache(home.path())
                .args(["dispose", base, "--delete", "--build-dir", root.to_str().unwrap()])
                .assert()
                .failure()
                .stderr(predicate::str::contains("not a package base name"));
        }

        assert!(victim.join("src").exists());
        assert!(root.join("foo").exists());
    }

    #[test]
    fn completions_bash() {
        let home = TempDir::new().unwrap();
        pkgcache(home.path())
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("pkgcache"));
    }
}
