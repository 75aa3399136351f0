//! Artefact fetcher CLI entrypoint.
//!
//! This binary runs as a GitHub Actions step: it downloads the selected
//! artefacts of a repository, extracts them, and reports the
//! `found-artifact` and `path` step outputs.

use clap::Parser;
use std::io::Write;

use artefact_fetcher::cli::Cli;
use artefact_fetcher::config::FetchConfig;
use artefact_fetcher::error::{FetchError, Result};
use artefact_fetcher::fetch_flow::run_fetch;
use artefact_fetcher::logging;
use artefact_fetcher::output::{open_output_sink, write_outputs, write_progress_line};

fn main() {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    report_logger_init(&logging::init(cli.debug), &mut stdout);
    let run_result = run(&cli, &mut stdout);
    let exit_code = exit_code_for_run_result(run_result, &mut stdout);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, progress: &mut dyn Write) -> Result<()> {
    let config = FetchConfig::from_cli(cli)?;
    log::debug!(
        "fetching artefacts of {} into {} (name filter: {}, latest only: {})",
        config.repo(),
        config.destination(),
        config.name_filter().unwrap_or("<none>"),
        config.latest_only()
    );

    let outcome = run_fetch(&config, &cli.api_url, progress)?;

    let mut sink =
        open_output_sink(cli.github_output.as_deref()).map_err(FetchError::WriteOutput)?;
    write_outputs(&outcome.step_outputs(), &mut sink).map_err(FetchError::WriteOutput)
}

/// Report a failed logger install as a warning; the run continues unlogged.
fn report_logger_init(
    result: &std::result::Result<(), log::SetLoggerError>,
    stdout: &mut dyn Write,
) {
    if let Err(err) = result {
        let message = format!("logging disabled: {err}");
        write_progress_line(stdout, logging::format_command(log::Level::Warn, &message));
    }
}

fn exit_code_for_run_result(result: Result<()>, stdout: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            let message = logging::format_command(log::Level::Error, &err.to_string());
            write_progress_line(stdout, message);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artefact_fetcher::artefact::download::DownloadError;
    use artefact_fetcher::config::ConfigError;

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stdout = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &mut stdout);
        assert_eq!(exit_code, 0);
        assert!(stdout.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_reports_one_error_command() {
        let err = FetchError::from(DownloadError::NotFound {
            url: "https://api.example/zip".to_owned(),
        });

        let mut stdout = Vec::new();
        let exit_code = exit_code_for_run_result(Err(err), &mut stdout);
        assert_eq!(exit_code, 1);

        let text = String::from_utf8(stdout).expect("stdout was not UTF-8");
        assert_eq!(text, "::error::not found: https://api.example/zip\n");
    }

    #[test]
    fn logger_init_failure_is_reported_as_a_warning() {
        report_logger_init(&logging::init(false), &mut Vec::new());
        let err = logging::init(false).expect_err("only one logger can be installed");

        let mut stdout = Vec::new();
        report_logger_init(&Err(err), &mut stdout);

        let text = String::from_utf8(stdout).expect("stdout was not UTF-8");
        assert!(text.starts_with("::warning::logging disabled: "), "text: {text}");
    }

    #[test]
    fn successful_logger_init_writes_nothing() {
        let mut stdout = Vec::new();
        report_logger_init(&Ok(()), &mut stdout);
        assert!(stdout.is_empty());
    }

    #[test]
    fn run_rejects_invalid_repository_before_any_request() {
        let cli = Cli {
            token: Some("t".to_owned()),
            repo: Some("no-slash".to_owned()),
            api_url: "http://127.0.0.1:9".to_owned(),
            ..Cli::default()
        };
        let mut progress = Vec::new();
        let result = run(&cli, &mut progress);
        assert!(matches!(
            result,
            Err(FetchError::Config(ConfigError::InvalidRepository { .. }))
        ));
        assert!(progress.is_empty());
    }

    #[test]
    fn run_requires_a_token() {
        let cli = Cli {
            repo: Some("octo/hello".to_owned()),
            ..Cli::default()
        };
        let mut progress = Vec::new();
        let result = run(&cli, &mut progress);
        assert!(matches!(
            result,
            Err(FetchError::Config(ConfigError::MissingToken))
        ));
    }
}
