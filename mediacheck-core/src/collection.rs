use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// `(missing, report, unused)` as handed back by a checked scan.
pub type MediaCheckOutput = (Vec<String>, String, Vec<String>);

/// Outcome of a collection's media integrity check.
///
/// Produced by the collection and passed through untouched. File names are
/// relative to the collection's media directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Files referenced by the collection but absent from the media directory.
    pub missing: Vec<String>,
    /// Human readable summary produced by the check.
    pub report: String,
    /// Files present in the media directory that nothing references.
    pub unused: Vec<String>,
}

impl CheckResult {
    /// Assemble a result from its three parts.
    pub fn new(
        missing: Vec<String>,
        report: impl Into<String>,
        unused: Vec<String>,
    ) -> Self {
        Self {
            missing,
            report: report.into(),
            unused,
        }
    }

    /// True when nothing is missing and nothing is unused.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.unused.is_empty()
    }

    /// Split into `(missing, report, unused)`.
    pub fn into_parts(self) -> MediaCheckOutput {
        (self.missing, self.report, self.unused)
    }
}

impl From<CheckResult> for MediaCheckOutput {
    fn from(result: CheckResult) -> Self {
        result.into_parts()
    }
}

/// A media library that can locate its media folder and verify it.
///
/// `check_media` may resolve file names relative to the process working
/// directory; [`check_media`](crate::check_media) arranges for that to be the
/// media directory while it runs.
pub trait MediaCollection {
    /// Error raised by the collection. Directory change failures are
    /// converted into it unchanged.
    type Error: From<io::Error>;

    /// Absolute path of the collection's media directory.
    fn media_dir(&self) -> Result<PathBuf, Self::Error>;

    /// Run the integrity check.
    fn check_media(&mut self) -> Result<CheckResult, Self::Error>;
}

impl<C: MediaCollection + ?Sized> MediaCollection for &mut C {
    type Error = C::Error;

    fn media_dir(&self) -> Result<PathBuf, Self::Error> {
        (**self).media_dir()
    }

    fn check_media(&mut self) -> Result<CheckResult, Self::Error> {
        (**self).check_media()
    }
}

impl<C: MediaCollection + ?Sized> MediaCollection for Box<C> {
    type Error = C::Error;

    fn media_dir(&self) -> Result<PathBuf, Self::Error> {
        (**self).media_dir()
    }

    fn check_media(&mut self) -> Result<CheckResult, Self::Error> {
        (**self).check_media()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_only_when_both_lists_are_empty() {
        assert!(CheckResult::new(vec![], "ok", vec![]).is_clean());
        assert!(
            !CheckResult::new(vec![], "ok", vec!["x.jpg".into()]).is_clean()
        );
        assert!(
            !CheckResult::new(vec!["a.mp3".into()], "", vec![]).is_clean()
        );
    }

    #[test]
    fn into_parts_keeps_field_order() {
        let result = CheckResult::new(
            vec!["gone.png".into()],
            "1 missing",
            vec!["stray.ogg".into()],
        );
        let (missing, report, unused) = result.into_parts();
        assert_eq!(missing, vec!["gone.png".to_string()]);
        assert_eq!(report, "1 missing");
        assert_eq!(unused, vec!["stray.ogg".to_string()]);
    }

    #[test]
    fn deserializes_from_collaborator_json() {
        let raw = r#"{"missing":[],"report":"ok","unused":["x.jpg"]}"#;
        let result: CheckResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result, CheckResult::new(vec![], "ok", vec!["x.jpg".into()]));
    }
}
