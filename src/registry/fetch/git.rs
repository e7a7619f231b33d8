//! Git registry fetching.
//!
//! Clones a registry repository into its cache directory, or pulls the
//! latest commit when the clone already exists. Shells out to the `git`
//! binary.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::tree;

/// Fetches registries from git repositories.
#[derive(Debug, Clone, Default)]
pub struct GitFetcher;

/// Information about a git fetch.
#[derive(Debug)]
pub struct GitFetchResult {
    /// Path to the fetched content.
    pub local_path: PathBuf,
    /// Current commit SHA.
    pub commit_sha: String,
    /// Whether this fetch created the clone.
    pub cloned: bool,
}

impl GitFetcher {
    /// Create a new git fetcher.
    pub fn new() -> Self {
        Self
    }

    /// Clone `url` into `dest` if absent, otherwise pull into it.
    pub fn fetch(&self, url: &str, dest: &Path) -> Result<GitFetchResult> {
        let cloned = if dest.exists() {
            self.pull(dest)?;
            false
        } else {
            self.clone_repo(url, dest)?;
            true
        };

        let commit_sha = self.head_sha(dest)?;

        Ok(GitFetchResult {
            local_path: dest.to_path_buf(),
            commit_sha,
            cloned,
        })
    }

    /// Clone a repository.
    ///
    /// The clone is made in a temporary sibling directory and moved into
    /// place only on success, so a failed clone leaves `dest` absent.
    pub fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        let parent = dest
            .parent()
            .with_context(|| format!("{} has no parent directory", dest.display()))?;
        std::fs::create_dir_all(parent)?;

        let work = tempfile::Builder::new()
            .prefix(".gryphon-clone-")
            .tempdir_in(parent)?;
        let checkout = work.path().join("repo");

        tracing::debug!("Cloning {} into {}", url, dest.display());
        let output = Command::new("git")
            .args(["clone", "--depth", "1", url])
            .arg(&checkout)
            .output()
            .context("Failed to run git")?;

        if !output.status.success() {
            bail!(
                "Git clone failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        tree::replace_dir(&checkout, dest)
    }

    /// Bring an existing clone up to date with its upstream.
    ///
    /// The working tree is only reset after a successful fetch, so a network
    /// failure leaves the clone exactly as it was.
    pub fn pull(&self, path: &Path) -> Result<()> {
        tracing::debug!("Pulling {}", path.display());
        run_git(path, &["fetch", "origin"], "Git fetch failed")?;
        run_git(path, &["reset", "--hard", "@{upstream}"], "Git reset failed")?;
        Ok(())
    }

    /// Current commit of a clone.
    pub fn head_sha(&self, path: &Path) -> Result<String> {
        let output = Command::new("git")
            .args(["rev-parse", "HEAD"])
            .current_dir(path)
            .output()?;

        if !output.status.success() {
            bail!("Git rev-parse failed in {}", path.display());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

fn run_git(path: &Path, args: &[&str], what: &str) -> Result<()> {
    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .output()
        .context("Failed to run git")?;

    if !output.status.success() {
        bail!("{}: {}", what, String::from_utf8_lossy(&output.stderr).trim());
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Serialize git-process tests to avoid flaky failures under parallel execution
    pub(crate) static GIT_LOCK: Mutex<()> = Mutex::new(());

    fn git(dir: &Path, args: &[&str]) {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    fn configure_user(work_dir: &Path) {
        for (key, val) in [("user.name", "Test"), ("user.email", "test@test.com")] {
            git(work_dir, &["config", key, val]);
        }
    }

    /// Create a bare repo holding a registry with one init template.
    /// Returns the path to the bare repo.
    pub(crate) fn create_bare_registry(parent: &Path) -> PathBuf {
        let bare_path = parent.join("registry.git");
        let work_dir = parent.join("work");
        std::fs::create_dir_all(&work_dir).unwrap();

        git(
            parent,
            &[
                "init",
                "--bare",
                "--initial-branch=main",
                bare_path.to_string_lossy().as_ref(),
            ],
        );
        git(
            parent,
            &[
                "clone",
                bare_path.to_string_lossy().as_ref(),
                work_dir.to_string_lossy().as_ref(),
            ],
        );
        configure_user(&work_dir);

        let template = work_dir.join("init").join("analytics_git").join("template");
        std::fs::create_dir_all(&template).unwrap();
        std::fs::write(template.join("README.md"), "# {{project_name}}\n").unwrap();
        std::fs::write(
            work_dir.join("metadata.json"),
            r#"{"init": {"analytics_git": {"display_name": "Analytics"}}, "generate": {}}"#,
        )
        .unwrap();

        git(&work_dir, &["add", "."]);
        git(&work_dir, &["commit", "-m", "Initial commit"]);
        git(&work_dir, &["push", "origin", "HEAD:main"]);

        bare_path
    }

    /// Push a commit adding a generate template to the bare repo.
    pub(crate) fn push_generate_template(parent: &Path, bare_path: &Path) {
        let work_dir = parent.join("work2");
        git(
            parent,
            &[
                "clone",
                &bare_path.to_string_lossy(),
                &work_dir.to_string_lossy(),
            ],
        );
        configure_user(&work_dir);

        let template = work_dir
            .join("generate")
            .join("mlclustering_git")
            .join("template");
        std::fs::create_dir_all(&template).unwrap();
        std::fs::write(template.join("cluster.py"), "k = 3\n").unwrap();
        std::fs::write(
            work_dir.join("metadata.json"),
            r#"{"init": {"analytics_git": {}}, "generate": {"mlclustering_git": {}}}"#,
        )
        .unwrap();

        git(&work_dir, &["add", "."]);
        git(&work_dir, &["commit", "-m", "Add clustering"]);
        git(&work_dir, &["push", "origin", "HEAD:main"]);
    }

    #[test]
    fn clone_from_local_bare_repo() {
        let _lock = GIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp = TempDir::new().unwrap();
        let bare_path = create_bare_registry(temp.path());
        let dest = temp.path().join("cache").join("open-source");

        let result = GitFetcher::new()
            .fetch(&bare_path.to_string_lossy(), &dest)
            .unwrap();

        assert!(result.cloned);
        assert_eq!(result.commit_sha.len(), 40);
        assert!(dest.join("metadata.json").exists());
        assert!(dest.join("init/analytics_git/template/README.md").exists());
    }

    #[test]
    fn second_fetch_pulls_new_commits() {
        let _lock = GIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp = TempDir::new().unwrap();
        let bare_path = create_bare_registry(temp.path());
        let dest = temp.path().join("cache").join("open-source");
        let fetcher = GitFetcher::new();

        let first = fetcher.fetch(&bare_path.to_string_lossy(), &dest).unwrap();
        push_generate_template(temp.path(), &bare_path);
        let second = fetcher.fetch(&bare_path.to_string_lossy(), &dest).unwrap();

        assert!(!second.cloned);
        assert_ne!(first.commit_sha, second.commit_sha);
        assert!(dest.join("generate/mlclustering_git/template/cluster.py").exists());
    }

    #[test]
    fn failed_clone_leaves_no_destination() {
        let _lock = GIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("cache").join("broken");

        let result = GitFetcher::new().fetch("/nonexistent/path/repo.git", &dest);

        assert!(result.is_err());
        assert!(!dest.exists());
        let leftovers: Vec<_> = std::fs::read_dir(temp.path().join("cache"))
            .unwrap()
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn failed_pull_leaves_clone_untouched() {
        let _lock = GIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp = TempDir::new().unwrap();
        let bare_path = create_bare_registry(temp.path());
        let dest = temp.path().join("cache").join("open-source");
        let fetcher = GitFetcher::new();

        fetcher.fetch(&bare_path.to_string_lossy(), &dest).unwrap();
        std::fs::remove_dir_all(&bare_path).unwrap();

        assert!(fetcher.pull(&dest).is_err());
        assert!(dest.join("metadata.json").exists());
    }
}
