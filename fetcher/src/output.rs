//! Step outputs and progress line helpers.
//!
//! A run reports two outputs back to the workflow: `found-artifact` and
//! `path`. They are appended to the file named by `GITHUB_OUTPUT` using the
//! runner's `name=value` format, or printed to stdout when no file is set.

use camino::Utf8Path;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};

/// Delimiter stem for multi-line output values.
const HEREDOC_DELIMITER: &str = "ARTEFACT_FETCHER_EOF";

/// The outputs reported at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepOutputs {
    /// Whether at least one artefact was selected.
    pub found_artifact: bool,
    /// Absolute destination path, or empty when nothing was found.
    pub path: String,
}

impl StepOutputs {
    /// Outputs for a run that selected nothing.
    #[must_use]
    pub fn not_found() -> Self {
        Self::default()
    }

    /// Outputs for a run that fetched into `path`.
    #[must_use]
    pub fn found(path: impl Into<String>) -> Self {
        Self {
            found_artifact: true,
            path: path.into(),
        }
    }

    /// Render the outputs in the runner's output-file format.
    ///
    /// # Examples
    ///
    /// ```
    /// use artefact_fetcher::output::StepOutputs;
    ///
    /// assert_eq!(
    ///     StepOutputs::found("/work/out").render(),
    ///     "found-artifact=true\npath=/work/out\n"
    /// );
    /// assert_eq!(StepOutputs::not_found().render(), "found-artifact=false\npath=\n");
    /// ```
    #[must_use]
    pub fn render(&self) -> String {
        let mut rendered = render_output("found-artifact", &self.found_artifact.to_string());
        rendered.push_str(&render_output("path", &self.path));
        rendered
    }
}

impl fmt::Display for StepOutputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Render one `name=value` entry, switching to the heredoc form for values
/// containing a newline.
fn render_output(name: &str, value: &str) -> String {
    if !value.contains('\n') && !value.contains('\r') {
        return format!("{name}={value}\n");
    }
    let mut delimiter = HEREDOC_DELIMITER.to_owned();
    while value.contains(&delimiter) {
        delimiter.push('_');
    }
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

/// Write `outputs` to `sink` in one call.
///
/// # Errors
///
/// Returns any I/O error raised by the sink.
pub fn write_outputs(outputs: &StepOutputs, sink: &mut dyn Write) -> io::Result<()> {
    sink.write_all(outputs.render().as_bytes())?;
    sink.flush()
}

/// Open the sink step outputs are written to.
///
/// A configured output file is opened for appending (and created if
/// missing); otherwise outputs go to stdout.
///
/// # Errors
///
/// Returns an I/O error if the output file cannot be opened.
pub fn open_output_sink(output_file: Option<&Utf8Path>) -> io::Result<Box<dyn Write>> {
    match output_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path.as_std_path())?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

/// Write a progress line, ignoring failures of the progress stream.
pub fn write_progress_line(progress: &mut dyn Write, message: impl fmt::Display) {
    if writeln!(progress, "{message}").is_err() {
        // Progress output is best-effort.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::rstest;

    #[rstest]
    #[case::found(StepOutputs::found("/w/out"), "found-artifact=true\npath=/w/out\n")]
    #[case::not_found(StepOutputs::not_found(), "found-artifact=false\npath=\n")]
    fn renders_outputs(#[case] outputs: StepOutputs, #[case] expected: &str) {
        assert_eq!(outputs.render(), expected);
    }

    #[test]
    fn multi_line_values_use_heredoc_form() {
        let rendered = render_output("path", "a\nb");
        assert_eq!(
            rendered,
            "path<<ARTEFACT_FETCHER_EOF\na\nb\nARTEFACT_FETCHER_EOF\n"
        );
    }

    #[test]
    fn heredoc_delimiter_avoids_value_content() {
        let rendered = render_output("path", "x\nARTEFACT_FETCHER_EOF");
        assert!(rendered.starts_with("path<<ARTEFACT_FETCHER_EOF_\n"));
        assert!(rendered.ends_with("\nARTEFACT_FETCHER_EOF_\n"));
    }

    #[test]
    fn output_file_is_appended_to() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::try_from(dir.path().join("outputs")).expect("UTF-8 path");
        std::fs::write(path.as_std_path(), "existing=1\n").expect("seed output file");

        let mut sink = open_output_sink(Some(&path)).expect("open sink");
        write_outputs(&StepOutputs::found("/w/out"), &mut sink).expect("write outputs");
        drop(sink);

        let contents = std::fs::read_to_string(path.as_std_path()).expect("read outputs");
        assert_eq!(contents, "existing=1\nfound-artifact=true\npath=/w/out\n");
    }

    #[test]
    fn progress_lines_end_with_newline() {
        let mut buf = Vec::new();
        write_progress_line(&mut buf, "  inflating: out/a.txt");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "  inflating: out/a.txt\n");
    }
}
