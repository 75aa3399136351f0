//! Destination directory derivation.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use thiserror::Error;

use super::record::Artefact;

/// Directory name used for artefacts listed without a name.
pub const UNNAMED_ARTEFACT_DIR: &str = "artifact";

/// An artefact name that cannot be used as a single directory name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("artefact name {name:?} is not a plain directory name")]
pub struct InvalidArtefactName {
    /// The rejected name.
    pub name: String,
}

/// Return the directory an artefact is extracted into.
///
/// With a name filter there is a single logical target, so the configured
/// path is used as-is. Otherwise each artefact gets a sub-directory named
/// after it, which must stay directly under `base`.
///
/// # Errors
///
/// Returns [`InvalidArtefactName`] when the name is not exactly one normal
/// path component (for example `..`, `/abs` or `a/b`).
///
/// # Examples
///
/// ```
/// use artefact_fetcher::artefact::destination::destination_dir;
/// use artefact_fetcher::artefact::record::{Artefact, UpdatedAt};
/// use camino::Utf8Path;
///
/// let artefact = Artefact::new(1_u64, "build-x", UpdatedAt::missing());
/// let out = Utf8Path::new("out");
/// assert_eq!(destination_dir(out, None, &artefact)?, "out/build-x");
/// assert_eq!(destination_dir(out, Some("build-x"), &artefact)?, "out");
///
/// let sneaky = Artefact::new(2_u64, "../elsewhere", UpdatedAt::missing());
/// assert!(destination_dir(out, None, &sneaky).is_err());
/// # Ok::<(), artefact_fetcher::artefact::destination::InvalidArtefactName>(())
/// ```
pub fn destination_dir(
    base: &Utf8Path,
    name_filter: Option<&str>,
    artefact: &Artefact,
) -> Result<Utf8PathBuf, InvalidArtefactName> {
    if name_filter.is_some_and(|name| !name.is_empty()) {
        return Ok(base.to_owned());
    }
    let dir_name = match artefact.name() {
        "" => UNNAMED_ARTEFACT_DIR,
        name => name,
    };
    let mut components = Utf8Path::new(dir_name).components();
    match (components.next(), components.next()) {
        (Some(Utf8Component::Normal(component)), None) if component == dir_name => {
            Ok(base.join(dir_name))
        }
        _ => Err(InvalidArtefactName {
            name: dir_name.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artefact::record::UpdatedAt;
    use rstest::rstest;

    #[rstest]
    #[case::no_filter("out", None, "build-x", "out/build-x")]
    #[case::empty_filter("out", Some(""), "build-x", "out/build-x")]
    #[case::filter_matches("out", Some("build-x"), "build-x", "out")]
    #[case::filter_ignores_name("out", Some("build-x"), "other", "out")]
    #[case::unnamed("out", None, "", "out/artifact")]
    #[case::default_base("./", None, "dist", "./dist")]
    fn derives_destination(
        #[case] base: &str,
        #[case] name_filter: Option<&str>,
        #[case] name: &str,
        #[case] expected: &str,
    ) {
        let artefact = Artefact::new(1_u64, name, UpdatedAt::missing());
        let dest = destination_dir(Utf8Path::new(base), name_filter, &artefact)
            .expect("valid destination");
        assert_eq!(dest, Utf8PathBuf::from(expected));
    }

    #[rstest]
    #[case::parent("..")]
    #[case::current(".")]
    #[case::absolute("/etc")]
    #[case::nested("a/b")]
    #[case::climbing("../../escape")]
    #[case::trailing_separator("dist/")]
    fn rejects_names_that_leave_the_base(#[case] name: &str) {
        let artefact = Artefact::new(1_u64, name, UpdatedAt::missing());
        let err = destination_dir(Utf8Path::new("out"), None, &artefact)
            .expect_err("name should be rejected");
        assert_eq!(err.name, name);
    }

    #[test]
    fn name_filter_skips_the_name_check() {
        let artefact = Artefact::new(1_u64, "../x", UpdatedAt::missing());
        let dest = destination_dir(Utf8Path::new("out"), Some("../x"), &artefact)
            .expect("filter uses the base as-is");
        assert_eq!(dest, Utf8PathBuf::from("out"));
    }
}
