//! CLI argument definitions for the artefact fetcher.
//!
//! Every flag falls back to the environment variable a GitHub Actions runner
//! sets for the matching step input, so the binary can be invoked bare from
//! an action definition or with explicit flags from a shell.

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser};

use crate::artefact::github::DEFAULT_API_URL;

/// Download GitHub Actions artefacts and extract them locally.
#[derive(Parser, Debug, Clone)]
#[command(name = "artefact-fetcher")]
#[command(version, about)]
#[command(long_about = concat!(
    "Download GitHub Actions artefacts and extract them locally.\n\n",
    "Lists the artefacts of a repository, drops expired ones, keeps the most ",
    "recently updated artefact for each name, and extracts each zip archive ",
    "into the destination directory. Without --name, every artefact is ",
    "extracted into a sub-directory named after it.",
))]
#[command(after_help = concat!(
    "OUTPUTS:\n",
    "  found-artifact   true when at least one artefact was downloaded\n",
    "  path             absolute destination path, empty when none was found\n\n",
    "Outputs are appended to the file named by GITHUB_OUTPUT, or printed to\n",
    "stdout when it is unset.\n\n",
    "EXAMPLES:\n",
    "  Fetch the newest copy of every artefact:\n",
    "    $ artefact-fetcher --repo octo/hello --token \"$GITHUB_TOKEN\"\n\n",
    "  Fetch one named artefact into dist/:\n",
    "    $ artefact-fetcher --repo octo/hello --name build-x --path dist\n\n",
    "  Fetch only the most recently updated artefact:\n",
    "    $ artefact-fetcher --repo octo/hello --latest",
))]
pub struct Cli {
    /// Token used to authenticate against the artifacts API.
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repository in `owner/repo` form.
    #[arg(long, env = "INPUT_REPO", value_name = "OWNER/REPO")]
    pub repo: Option<String>,

    /// Destination directory [default: ./].
    #[arg(long, env = "INPUT_PATH", value_name = "DIR")]
    pub path: Option<Utf8PathBuf>,

    /// Only fetch artefacts with exactly this name.
    #[arg(long, env = "INPUT_NAME", value_name = "NAME")]
    pub name: Option<String>,

    /// Only fetch the single most recently updated artefact.
    #[arg(
        long,
        env = "INPUT_LATEST",
        action = ArgAction::Set,
        value_parser = parse_input_flag,
        num_args = 0..=1,
        default_missing_value = "true",
        default_value = "false",
        value_name = "BOOL"
    )]
    pub latest: bool,

    /// Root URL of the REST API, for GitHub Enterprise Server.
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL, value_name = "URL")]
    pub api_url: String,

    /// File that step outputs are appended to [default: stdout].
    #[arg(long, env = "GITHUB_OUTPUT", value_name = "FILE")]
    pub github_output: Option<Utf8PathBuf>,

    /// Emit debug diagnostics.
    #[arg(
        long,
        env = "RUNNER_DEBUG",
        action = ArgAction::Set,
        value_parser = parse_debug_flag,
        num_args = 0..=1,
        default_missing_value = "true",
        default_value = "false",
        value_name = "BOOL"
    )]
    pub debug: bool,
}

/// Interpret a step input as a boolean.
///
/// Only a case-insensitive `true` enables a flag; any other value, including
/// an empty string, leaves it disabled.
///
/// # Errors
///
/// Never fails; the `Result` matches clap's value-parser signature.
///
/// # Examples
///
/// ```
/// use artefact_fetcher::cli::parse_input_flag;
///
/// assert_eq!(parse_input_flag("TRUE"), Ok(true));
/// assert_eq!(parse_input_flag("yes"), Ok(false));
/// assert_eq!(parse_input_flag(""), Ok(false));
/// ```
pub fn parse_input_flag(value: &str) -> Result<bool, String> {
    Ok(value.trim().eq_ignore_ascii_case("true"))
}

/// Interpret `RUNNER_DEBUG`, which runners set to `1` when debug logging is
/// enabled for a re-run.
///
/// # Errors
///
/// Never fails; the `Result` matches clap's value-parser signature.
pub fn parse_debug_flag(value: &str) -> Result<bool, String> {
    Ok(value.trim() == "1" || parse_input_flag(value)?)
}

impl Default for Cli {
    /// Creates a `Cli` with no credentials, no repository and every flag
    /// disabled.
    ///
    /// This is useful for tests and programmatic construction where only
    /// specific fields need to be set.
    ///
    /// # Examples
    ///
    /// ```
    /// use artefact_fetcher::cli::Cli;
    ///
    /// let cli = Cli::default();
    /// assert!(cli.repo.is_none());
    /// assert!(!cli.latest);
    /// assert_eq!(cli.api_url, "https://api.github.com");
    /// ```
    fn default() -> Self {
        Self {
            token: None,
            repo: None,
            path: None,
            name: None,
            latest: false,
            api_url: DEFAULT_API_URL.to_owned(),
            github_output: None,
            debug: false,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
