//! Local package database access through pacman
//!
//! Only foreign packages (installed but absent from every sync repository)
//! can have a workspace in the build cache, so `list_installed` reports
//! exactly those.

use crate::backend::failure_detail;
use crate::config::schema::PacmanConfig;
use crate::error::{PkgCacheError, PkgCacheResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// An installed package record from the local database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    /// Package name
    pub name: String,
    /// Package base, when the database records one
    pub base: Option<String>,
}

impl InstalledPackage {
    /// Create a record without an explicit base
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
        }
    }

    /// Create a record with an explicit base
    pub fn with_base(name: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: Some(base.into()),
        }
    }

    /// The base this package was built from (its own name if unrecorded)
    pub fn package_base(&self) -> &str {
        match self.base.as_deref() {
            Some(base) if !base.is_empty() => base,
            _ => &self.name,
        }
    }
}

/// System package database and package manager
#[async_trait]
pub trait PackageDatabase: Send + Sync {
    /// Snapshot of installed packages not provided by any sync repository
    async fn list_installed(&self) -> PkgCacheResult<Vec<InstalledPackage>>;

    /// Packages installed as dependencies that nothing requires anymore
    async fn list_orphans(&self, include_optional: bool) -> PkgCacheResult<Vec<String>>;

    /// Uninstall the given packages through the package manager
    async fn remove_packages(&self, targets: &[String]) -> PkgCacheResult<()>;
}

/// Package database backed by the pacman CLI
pub struct PacmanCli {
    bin: String,
    sudo_bin: String,
    db_path: PathBuf,
    noconfirm: bool,
}

impl PacmanCli {
    /// Create a pacman runner from config
    pub fn new(config: &PacmanConfig) -> Self {
        Self {
            bin: config.bin.clone(),
            sudo_bin: config.sudo_bin.clone(),
            db_path: config.db_path.clone(),
            noconfirm: false,
        }
    }

    /// Pass `--noconfirm` to removals instead of letting pacman prompt
    pub fn with_noconfirm(mut self, noconfirm: bool) -> Self {
        self.noconfirm = noconfirm;
        self
    }

    /// Execute a pacman query and return the output
    async fn exec(&self, args: &[&str]) -> PkgCacheResult<Output> {
        debug!("Executing: {} {:?}", self.bin, args);

        Command::new(&self.bin)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| PkgCacheError::command_failed(format!("{} {:?}", self.bin, args), e))
    }

    /// Run a query whose "no match" result is exit status 1 without output
    async fn query_lines(&self, args: &[&str]) -> PkgCacheResult<Vec<String>> {
        let output = self.exec(args).await?;

        if !output.status.success() {
            if output.stdout.is_empty() && output.stderr.is_empty() {
                return Ok(vec![]);
            }
            return Err(PkgCacheError::PackageManager(format!(
                "{} {}: {}",
                self.bin,
                args.join(" "),
                failure_detail(&output)
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Read the recorded base of an installed package from its `desc` file
    async fn read_base(&self, name: &str, version: &str) -> Option<String> {
        let desc = local_desc_path(&self.db_path, name, version);
        match tokio::fs::read_to_string(&desc).await {
            Ok(content) => parse_desc_base(&content),
            Err(e) => {
                debug!("No desc for {} at {}: {}", name, desc.display(), e);
                None
            }
        }
    }
}

impl Default for PacmanCli {
    fn default() -> Self {
        Self::new(&PacmanConfig::default())
    }
}

#[async_trait]
impl PackageDatabase for PacmanCli {
    async fn list_installed(&self) -> PkgCacheResult<Vec<InstalledPackage>> {
        let lines = self.query_lines(&["-Qm"]).await?;
        let mut packages = Vec::with_capacity(lines.len());

        for line in &lines {
            let Some((name, version)) = parse_query_line(line) else {
                warn!("Skipping unparseable package line: {}", line);
                continue;
            };
            packages.push(InstalledPackage {
                name: name.to_string(),
                base: self.read_base(name, version).await,
            });
        }

        debug!("Found {} foreign package(s)", packages.len());
        Ok(packages)
    }

    async fn list_orphans(&self, include_optional: bool) -> PkgCacheResult<Vec<String>> {
        // -tt also reports packages only optionally required by others
        let flag = if include_optional { "-Qdttq" } else { "-Qdtq" };
        self.query_lines(&[flag]).await
    }

    async fn remove_packages(&self, targets: &[String]) -> PkgCacheResult<()> {
        if targets.is_empty() {
            return Ok(());
        }

        let mut command = if is_root() {
            Command::new(&self.bin)
        } else {
            let mut c = Command::new(&self.sudo_bin);
            c.arg(&self.bin);
            c
        };
        command.arg("-R");
        if self.noconfirm {
            command.arg("--noconfirm");
        }
        command.args(targets);

        info!("Removing {} package(s)", targets.len());
        let status = command
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| PkgCacheError::command_failed(format!("{} -R", self.bin), e))?;

        if status.success() {
            Ok(())
        } else {
            Err(PkgCacheError::PackageManager(format!(
                "{} -R exited with {}",
                self.bin, status
            )))
        }
    }
}

#[cfg(unix)]
fn is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

#[cfg(not(unix))]
fn is_root() -> bool {
    false
}

fn local_desc_path(db_path: &Path, name: &str, version: &str) -> PathBuf {
    db_path
        .join("local")
        .join(format!("{}-{}", name, version))
        .join("desc")
}

/// Parse a `pacman -Q` line of the form `name version`
fn parse_query_line(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split_whitespace();
    let name = parts.next()?;
    let version = parts.next()?;
    Some((name, version))
}

/// Extract the `%BASE%` section from a local database `desc` file
fn parse_desc_base(content: &str) -> Option<String> {
    let mut lines = content.lines();
    while let Some(line) = lines.next() {
        if line.trim() == "%BASE%" {
            return lines
                .next()
                .map(str::trim)
                .filter(|base| !base.is_empty())
                .map(str::to_string);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn package_base_falls_back_to_name() {
        assert_eq!(InstalledPackage::new("foo").package_base(), "foo");
        assert_eq!(
            InstalledPackage::with_base("foo-docs", "foo").package_base(),
            "foo"
        );
        assert_eq!(InstalledPackage::with_base("bar", "").package_base(), "bar");
    }

    #[test]
    fn parse_query_line_valid() {
        assert_eq!(
            parse_query_line("yay-bin 12.4.2-1"),
            Some(("yay-bin", "12.4.2-1"))
        );
        assert_eq!(parse_query_line("lonely"), None);
        assert_eq!(parse_query_line(""), None);
    }

    #[test]
    fn parse_desc_base_section() {
        let desc = "%NAME%\nfoo-docs\n\n%VERSION%\n1.0-1\n\n%BASE%\nfoo\n\n%DESC%\ndocs\n";
        assert_eq!(parse_desc_base(desc), Some("foo".to_string()));
        assert_eq!(parse_desc_base("%NAME%\nfoo\n"), None);
        assert_eq!(parse_desc_base("%BASE%\n"), None);
    }

    #[test]
    fn desc_path_layout() {
        let path = local_desc_path(Path::new("/var/lib/pacman"), "foo", "1.0-1");
        assert_eq!(path, PathBuf::from("/var/lib/pacman/local/foo-1.0-1/desc"));
    }

    #[cfg(unix)]
    fn fake_pacman(dir: &Path, script: &str) -> PacmanCli {
        use std::os::unix::fs::PermissionsExt;

        let bin = dir.join("pacman");
        fs::write(&bin, format!("#!/bin/sh\n{}\n", script)).unwrap();
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o755)).unwrap();

        PacmanCli::new(&PacmanConfig {
            bin: bin.to_string_lossy().into_owned(),
            sudo_bin: "sudo".to_string(),
            db_path: dir.join("db"),
        })
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn list_installed_reads_bases() {
        let temp = TempDir::new().unwrap();
        let pacman = fake_pacman(temp.path(), "echo 'foo-docs 1.0-1'\necho 'bar 2-1'");

        let desc_dir = temp.path().join("db/local/foo-docs-1.0-1");
        fs::create_dir_all(&desc_dir).unwrap();
        fs::write(desc_dir.join("desc"), "%NAME%\nfoo-docs\n\n%BASE%\nfoo\n").unwrap();

        let installed = pacman.list_installed().await.unwrap();
        assert_eq!(
            installed,
            vec![
                InstalledPackage::with_base("foo-docs", "foo"),
                InstalledPackage::new("bar"),
            ]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn silent_exit_one_means_no_packages() {
        let temp = TempDir::new().unwrap();
        let pacman = fake_pacman(temp.path(), "exit 1");

        assert!(pacman.list_installed().await.unwrap().is_empty());
        assert!(pacman.list_orphans(false).await.unwrap().is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn query_failure_is_package_manager_error() {
        let temp = TempDir::new().unwrap();
        let pacman = fake_pacman(temp.path(), "echo 'error: could not open database' >&2\nexit 1");

        let err = pacman.list_installed().await.unwrap_err();
        assert!(matches!(err, PkgCacheError::PackageManager(_)));
        assert!(err.to_string().contains("could not open database"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn orphans_use_optional_flag() {
        let temp = TempDir::new().unwrap();
        let pacman = fake_pacman(
            temp.path(),
            "if [ \"$1\" = \"-Qdttq\" ]; then echo opt-orphan; fi\necho orphan",
        );

        assert_eq!(pacman.list_orphans(false).await.unwrap(), vec!["orphan"]);
        assert_eq!(
            pacman.list_orphans(true).await.unwrap(),
            vec!["opt-orphan", "orphan"]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn remove_passes_targets_and_noconfirm() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let log = temp.path().join("args");
        let mut pacman = fake_pacman(temp.path(), &format!("echo \"$@\" > {}", log.display()));

        let sudo = temp.path().join("sudo");
        fs::write(&sudo, "#!/bin/sh\nexec \"$@\"\n").unwrap();
        fs::set_permissions(&sudo, fs::Permissions::from_mode(0o755)).unwrap();
        pacman.sudo_bin = sudo.to_string_lossy().into_owned();

        let pacman = pacman.with_noconfirm(true);
        pacman
            .remove_packages(&["foo".to_string(), "bar".to_string()])
            .await
            .unwrap();

        assert_eq!(fs::read_to_string(&log).unwrap().trim(), "-R --noconfirm foo bar");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failed_removal_is_package_manager_error() {
        let temp = TempDir::new().unwrap();
        let mut pacman = fake_pacman(temp.path(), "exit 1");
        pacman.sudo_bin = "env".to_string();

        let err = pacman
            .remove_packages(&["foo".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, PkgCacheError::PackageManager(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn sudo_only_when_not_root() {
        let temp = TempDir::new().unwrap();
        let mut pacman = fake_pacman(temp.path(), "exit 0");
        pacman.sudo_bin = temp.path().join("no-such-sudo").to_string_lossy().into_owned();

        let result = pacman.remove_packages(&["foo".to_string()]).await;
        if is_root() {
            assert!(result.is_ok());
        } else {
            assert!(matches!(result, Err(PkgCacheError::CommandFailed { .. })));
        }
    }

    #[tokio::test]
    async fn remove_nothing_is_noop() {
        let pacman = PacmanCli::new(&PacmanConfig {
            bin: "pkgcache-no-such-pacman".to_string(),
            ..PacmanConfig::default()
        });
        pacman.remove_packages(&[]).await.unwrap();
    }
}
