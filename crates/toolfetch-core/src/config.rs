use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetch::FetchOptions;
use crate::retry::RetryPolicy;

/// Retry policy parameters (optional section in tools.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per job (including the first). 1 disables retry.
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_secs_f64(self.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(self.max_delay_secs),
        }
    }
}

/// What to do when two jobs derive the same destination filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Later jobs get a numeric suffix (`-2`, `-3`, ...) before the extension.
    #[default]
    Rename,
    /// Later jobs fail with a name-collision outcome and are not fetched.
    Fail,
}

/// Configuration loaded from `~/.config/toolfetch/tools.toml`.
///
/// Every field has a default, so a file containing only a `[tools]` table is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolfetchConfig {
    /// Base output directory. Relative paths resolve against the working directory.
    pub dest_dir: PathBuf,
    /// Append-only failure log. Relative paths resolve against the working directory.
    pub failure_log: PathBuf,
    /// Maximum number of jobs fetched at once (1 = strictly sequential).
    pub concurrency: usize,
    pub collision: CollisionPolicy,
    pub connect_timeout_secs: u64,
    /// Upper bound for a whole transfer, in seconds.
    pub timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,
    /// Job table: tool name -> release archive URL. Iterated in name order.
    pub tools: BTreeMap<String, String>,
}

impl Default for ToolfetchConfig {
    fn default() -> Self {
        Self {
            dest_dir: PathBuf::from("bin/backup"),
            failure_log: PathBuf::from("download_errors.log"),
            concurrency: 4,
            collision: CollisionPolicy::Rename,
            connect_timeout_secs: 30,
            timeout_secs: 600,
            user_agent: None,
            retry: None,
            tools: BTreeMap::new(),
        }
    }
}

impl ToolfetchConfig {
    /// Effective retry policy (config section or built-in default).
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().policy()
    }

    pub fn fetch_options(&self) -> FetchOptions {
        let mut opts = FetchOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs.max(1)),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
            ..FetchOptions::default()
        };
        if let Some(ua) = &self.user_agent {
            opts.user_agent = ua.clone();
        }
        opts
    }

    /// `dest_dir` resolved against `cwd` when relative.
    pub fn resolved_dest_dir(&self, cwd: &Path) -> PathBuf {
        resolve(cwd, &self.dest_dir)
    }

    /// `failure_log` resolved against `cwd` when relative.
    pub fn resolved_failure_log(&self, cwd: &Path) -> PathBuf {
        resolve(cwd, &self.failure_log)
    }
}

fn resolve(cwd: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        cwd.join(p)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("toolfetch")?;
    Ok(xdg_dirs.place_config_file("tools.toml")?)
}

/// Parse a config file. Fails if it does not exist.
pub fn load_from_path(path: &Path) -> Result<ToolfetchConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: ToolfetchConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Write the default configuration to `path`. Refuses to replace an existing file unless `force`.
pub fn write_default(path: &Path, force: bool) -> Result<ToolfetchConfig> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to replace)", path.display());
    }
    let default_cfg = ToolfetchConfig::default();
    let toml = toml::to_string_pretty(&default_cfg)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml).with_context(|| format!("failed to write config {}", path.display()))?;
    tracing::info!("created default config at {}", path.display());
    Ok(default_cfg)
}

/// Load configuration. An explicit `path` must exist; the default XDG path is
/// created with defaults if none exists.
pub fn load_or_init(path: Option<&Path>) -> Result<ToolfetchConfig> {
    if let Some(p) = path {
        return load_from_path(p);
    }
    let path = config_path()?;
    if !path.exists() {
        return write_default(&path, false);
    }
    load_from_path(&path)
}
