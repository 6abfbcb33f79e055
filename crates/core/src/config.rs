//! Gateway runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! the upstream store. The intent is to avoid reading process-wide
//! environment variables during request handling, which can lead to
//! inconsistent behaviour in multi-threaded runtimes and test harnesses.
//!
//! A gateway with missing required settings still boots: the runner serves
//! an unconfigured router that answers every request with a configuration
//! error before any upstream call is attempted.

/// Branch used when `GITHUB_BRANCH` is not set.
pub const DEFAULT_BRANCH: &str = "main";

/// Upstream API root used when `GITHUB_API_URL` is not set.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Errors that can occur when resolving gateway configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// One of the required settings was absent or empty
    #[error("Server misconfigured: missing GITHUB_TOKEN, GITHUB_OWNER, or GITHUB_REPO.")]
    MissingSettings,
}

/// Gateway configuration resolved at startup.
///
/// Holds the credential and repository coordinates for the upstream
/// contents API. All fields are trimmed; the three required settings must
/// be non-empty.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    token: String,
    owner: String,
    repo: String,
    branch: String,
    api_base: String,
}

impl GatewayConfig {
    /// Create a new `GatewayConfig`.
    ///
    /// `branch` falls back to [`DEFAULT_BRANCH`] and `api_base` to
    /// [`DEFAULT_API_BASE`] when absent or empty. Trailing slashes on
    /// `api_base` are stripped so URL building can join with `/`.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingSettings`] if the token, owner, or
    /// repository name is empty after trimming.
    pub fn new(
        token: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: Option<String>,
        api_base: Option<String>,
    ) -> Result<Self, ConfigError> {
        let token = token.into().trim().to_owned();
        let owner = owner.into().trim().to_owned();
        let repo = repo.into().trim().to_owned();

        if token.is_empty() || owner.is_empty() || repo.is_empty() {
            return Err(ConfigError::MissingSettings);
        }

        let branch = branch
            .map(|b| b.trim().to_owned())
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| DEFAULT_BRANCH.to_owned());

        let api_base = api_base
            .map(|b| b.trim().trim_end_matches('/').to_owned())
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_owned());

        Ok(Self {
            token,
            owner,
            repo,
            branch,
            api_base,
        })
    }

    /// Resolve configuration from the process environment.
    ///
    /// Reads `GITHUB_TOKEN`, `GITHUB_OWNER`, `GITHUB_REPO` (required) and
    /// `GITHUB_BRANCH`, `GITHUB_API_URL` (optional). Intended to be called
    /// once from the binary's `main`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let var = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());

        Self::new(
            var("GITHUB_TOKEN").ok_or(ConfigError::MissingSettings)?,
            var("GITHUB_OWNER").ok_or(ConfigError::MissingSettings)?,
            var("GITHUB_REPO").ok_or(ConfigError::MissingSettings)?,
            var("GITHUB_BRANCH"),
            var("GITHUB_API_URL"),
        )
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config_with_defaults() {
        let cfg = GatewayConfig::new("tok", "acme", "storage", None, None).unwrap();
        assert_eq!(cfg.token(), "tok");
        assert_eq!(cfg.owner(), "acme");
        assert_eq!(cfg.repo(), "storage");
        assert_eq!(cfg.branch(), DEFAULT_BRANCH);
        assert_eq!(cfg.api_base(), DEFAULT_API_BASE);
    }

    #[test]
    fn missing_required_settings_rejected() {
        assert_eq!(
            GatewayConfig::new("", "acme", "storage", None, None).unwrap_err(),
            ConfigError::MissingSettings
        );
        assert_eq!(
            GatewayConfig::new("tok", "  ", "storage", None, None).unwrap_err(),
            ConfigError::MissingSettings
        );
        assert_eq!(
            GatewayConfig::new("tok", "acme", "", None, None).unwrap_err(),
            ConfigError::MissingSettings
        );
    }

    #[test]
    fn branch_override_and_empty_fallback() {
        let cfg =
            GatewayConfig::new("tok", "acme", "storage", Some("release".into()), None).unwrap();
        assert_eq!(cfg.branch(), "release");

        let cfg = GatewayConfig::new("tok", "acme", "storage", Some("  ".into()), None).unwrap();
        assert_eq!(cfg.branch(), DEFAULT_BRANCH);
    }

    #[test]
    fn api_base_trailing_slash_stripped() {
        let cfg = GatewayConfig::new(
            "tok",
            "acme",
            "storage",
            None,
            Some("https://ghe.example.com/api/v3/".into()),
        )
        .unwrap();
        assert_eq!(cfg.api_base(), "https://ghe.example.com/api/v3");
    }
}
