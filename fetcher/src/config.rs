//! Validated, immutable run configuration.
//!
//! Raw command-line and environment inputs are validated once into a
//! [`FetchConfig`], which is then passed by reference to every stage. No
//! stage reads ambient state directly.

use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use thiserror::Error;

use crate::cli::Cli;

/// Destination used when none is configured.
pub const DEFAULT_DESTINATION: &str = "./";

/// Errors arising from invalid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No repository identity was supplied.
    #[error("repository is required; expected \"owner/repo\"")]
    MissingRepository,

    /// The repository identity is not of the form `owner/repo`.
    #[error("invalid repository \"{value}\"; expected \"owner/repo\"")]
    InvalidRepository {
        /// The rejected repository string.
        value: String,
    },

    /// No authentication token was supplied.
    #[error("authentication token is required")]
    MissingToken,
}

/// Repository identity, split into owner and repository name.
///
/// The input is split on the first `/`; both halves must be non-empty.
///
/// # Examples
///
/// ```
/// use artefact_fetcher::config::RepoIdentity;
///
/// let repo = RepoIdentity::try_from("octo/hello").expect("valid repo");
/// assert_eq!(repo.owner(), "octo");
/// assert_eq!(repo.repo(), "hello");
/// assert!(RepoIdentity::try_from("octo/").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoIdentity {
    owner: String,
    repo: String,
}

impl RepoIdentity {
    /// The owning user or organisation.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The repository name.
    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }
}

impl TryFrom<&str> for RepoIdentity {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => Ok(Self {
                owner: owner.to_owned(),
                repo: repo.to_owned(),
            }),
            _ => Err(ConfigError::InvalidRepository {
                value: value.to_owned(),
            }),
        }
    }
}

impl fmt::Display for RepoIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Credential for the listing and download services.
///
/// `Debug` output is redacted so the token never reaches logs.
///
/// # Examples
///
/// ```
/// use artefact_fetcher::config::AuthToken;
///
/// let token = AuthToken::try_from("ghs_secret").expect("non-empty token");
/// assert_eq!(token.expose(), "ghs_secret");
/// assert!(!format!("{token:?}").contains("ghs_secret"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Return the raw token for use in an `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for AuthToken {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Immutable configuration for one fetch run.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    repo: RepoIdentity,
    token: AuthToken,
    destination: Utf8PathBuf,
    name_filter: Option<String>,
    latest_only: bool,
}

impl FetchConfig {
    /// Assemble a configuration from validated parts.
    ///
    /// An empty name filter is normalised to no filter.
    #[must_use]
    pub fn new(
        repo: RepoIdentity,
        token: AuthToken,
        destination: Utf8PathBuf,
        name_filter: Option<String>,
        latest_only: bool,
    ) -> Self {
        Self {
            repo,
            token,
            destination,
            name_filter: name_filter.filter(|name| !name.is_empty()),
            latest_only,
        }
    }

    /// Validate command-line and environment inputs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the repository or token is missing or
    /// malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use artefact_fetcher::cli::Cli;
    /// use artefact_fetcher::config::FetchConfig;
    ///
    /// let cli = Cli {
    ///     token: Some("t".to_owned()),
    ///     repo: Some("octo/hello".to_owned()),
    ///     ..Cli::default()
    /// };
    /// let config = FetchConfig::from_cli(&cli).expect("valid config");
    /// assert_eq!(config.destination(), "./");
    /// assert!(config.name_filter().is_none());
    /// assert!(!config.latest_only());
    /// ```
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let repo = match cli.repo.as_deref().map(str::trim) {
            None | Some("") => return Err(ConfigError::MissingRepository),
            Some(value) => RepoIdentity::try_from(value)?,
        };
        let token = AuthToken::try_from(cli.token.as_deref().unwrap_or_default())?;
        let destination = cli
            .path
            .clone()
            .filter(|path| !path.as_str().is_empty())
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DESTINATION));
        Ok(Self::new(
            repo,
            token,
            destination,
            cli.name.clone(),
            cli.latest,
        ))
    }

    /// The repository whose artefacts are fetched.
    #[must_use]
    pub const fn repo(&self) -> &RepoIdentity {
        &self.repo
    }

    /// The credential for the listing and download services.
    #[must_use]
    pub const fn token(&self) -> &AuthToken {
        &self.token
    }

    /// The configured destination path.
    #[must_use]
    pub fn destination(&self) -> &Utf8Path {
        &self.destination
    }

    /// The name filter, if one was supplied.
    #[must_use]
    pub fn name_filter(&self) -> Option<&str> {
        self.name_filter.as_deref()
    }

    /// Whether only the single latest artefact is fetched.
    #[must_use]
    pub const fn latest_only(&self) -> bool {
        self.latest_only
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn cli(repo: Option<&str>, token: Option<&str>) -> Cli {
        Cli {
            repo: repo.map(str::to_owned),
            token: token.map(str::to_owned),
            ..Cli::default()
        }
    }

    #[rstest]
    #[case::simple("octo/hello", "octo", "hello")]
    #[case::splits_on_first_slash("octo/hello/extra", "octo", "hello/extra")]
    #[case::trims_whitespace(" octo/hello ", "octo", "hello")]
    fn parses_repository_identity(#[case] raw: &str, #[case] owner: &str, #[case] repo: &str) {
        let identity = RepoIdentity::try_from(raw).expect("valid repo");
        assert_eq!(identity.owner(), owner);
        assert_eq!(identity.repo(), repo);
    }

    #[rstest]
    #[case::no_slash("octo")]
    #[case::empty_owner("/hello")]
    #[case::empty_repo("octo/")]
    #[case::only_slash("/")]
    fn rejects_malformed_repository(#[case] raw: &str) {
        let err = RepoIdentity::try_from(raw).expect_err("should be rejected");
        assert_eq!(
            err,
            ConfigError::InvalidRepository {
                value: raw.to_owned()
            }
        );
    }

    #[test]
    fn repository_display_round_trips() {
        let identity = RepoIdentity::try_from("octo/hello").expect("valid repo");
        assert_eq!(identity.to_string(), "octo/hello");
    }

    #[rstest]
    #[case::absent(None)]
    #[case::blank(Some("  "))]
    fn missing_repository_is_a_config_error(#[case] repo: Option<&str>) {
        let err = FetchConfig::from_cli(&cli(repo, Some("t"))).expect_err("should fail");
        assert_eq!(err, ConfigError::MissingRepository);
    }

    #[rstest]
    #[case::absent(None)]
    #[case::empty(Some(""))]
    fn missing_token_is_a_config_error(#[case] token: Option<&str>) {
        let err = FetchConfig::from_cli(&cli(Some("octo/hello"), token)).expect_err("should fail");
        assert_eq!(err, ConfigError::MissingToken);
    }

    #[test]
    fn empty_name_filter_means_no_filter() {
        let cli = Cli {
            name: Some(String::new()),
            ..cli(Some("octo/hello"), Some("t"))
        };
        let config = FetchConfig::from_cli(&cli).expect("valid config");
        assert!(config.name_filter().is_none());
    }

    #[test]
    fn carries_explicit_settings() {
        let cli = Cli {
            path: Some(Utf8PathBuf::from("out")),
            name: Some("build-x".to_owned()),
            latest: true,
            ..cli(Some("octo/hello"), Some("t"))
        };
        let config = FetchConfig::from_cli(&cli).expect("valid config");
        assert_eq!(config.destination(), Utf8Path::new("out"));
        assert_eq!(config.name_filter(), Some("build-x"));
        assert!(config.latest_only());
        assert_eq!(config.token().expose(), "t");
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = AuthToken::try_from("super-secret").expect("token");
        let config = FetchConfig::new(
            RepoIdentity::try_from("octo/hello").expect("repo"),
            token,
            Utf8PathBuf::from("out"),
            None,
            false,
        );
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
