//! Stored photo file name.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The name of an uploaded photo as stored in the upload directory.
///
/// Built with [`PhotoName::sanitize`] from whatever file name the browser sent,
/// so it is always a single path component made of `[A-Za-z0-9._-]` that does
/// not start with a dot.
///
/// ```
/// use classifieds_core::PhotoName;
///
/// let name = PhotoName::sanitize("../../etc/my bike.jpg").unwrap();
/// assert_eq!(name.as_str(), "etc_my_bike.jpg");
/// assert!(PhotoName::sanitize("...").is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhotoName(String);

impl PhotoName {
    /// Maximum length of a stored name (matches the `photo` column width).
    pub const MAX_LENGTH: usize = 100;

    /// Longest sanitized name kept before a storage prefix is added.
    const MAX_SANITIZED_LENGTH: usize = 80;

    /// Reduce an untrusted client file name to a safe single component.
    ///
    /// Path separators and whitespace runs become `_`, every other character
    /// outside `[A-Za-z0-9._-]` is dropped, and leading or trailing `.`/`_`
    /// are stripped. Returns `None` when nothing usable remains.
    #[must_use]
    pub fn sanitize(raw: &str) -> Option<Self> {
        let spaced = raw.replace(['/', '\\'], " ");
        let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
        let filtered: String = joined
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
            .collect();
        let trimmed = filtered.trim_matches(|c| c == '.' || c == '_');

        if trimmed.is_empty() {
            return None;
        }

        Some(Self(truncate_keeping_extension(
            trimmed,
            Self::MAX_SANITIZED_LENGTH,
        )))
    }

    /// Prefix the name with a storage token so uploads never collide.
    #[must_use]
    pub fn with_prefix(self, token: &str) -> Self {
        let mut prefixed = format!("{token}_{}", self.0);
        prefixed.truncate(Self::MAX_LENGTH);
        Self(prefixed)
    }

    /// Wrap a name previously produced by this type and read back from storage.
    #[must_use]
    pub const fn from_stored(name: String) -> Self {
        Self(name)
    }

    /// Returns the file name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Shorten an ASCII file name to `max` bytes, keeping a short extension intact.
fn truncate_keeping_extension(name: &str, max: usize) -> String {
    if name.len() <= max {
        return name.to_owned();
    }

    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.len() < max / 2 => {
            let keep = max - ext.len() - 1;
            format!("{}.{ext}", stem.get(..keep).unwrap_or(stem))
        }
        _ => name.get(..max).unwrap_or(name).to_owned(),
    }
}

impl fmt::Display for PhotoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PhotoName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_plain_name() {
        assert_eq!(PhotoName::sanitize("bike.png").unwrap().as_str(), "bike.png");
    }

    #[test]
    fn test_sanitize_strips_directories_and_spaces() {
        let name = PhotoName::sanitize("C:\\Users\\me\\My Photo 1.JPG").unwrap();
        assert_eq!(name.as_str(), "C_Users_me_My_Photo_1.JPG");
    }

    #[test]
    fn test_sanitize_drops_disallowed_characters() {
        let name = PhotoName::sanitize("дом<script>.png").unwrap();
        assert_eq!(name.as_str(), "script.png");
    }

    #[test]
    fn test_sanitize_rejects_hidden_and_empty() {
        assert!(PhotoName::sanitize("").is_none());
        assert!(PhotoName::sanitize("   ").is_none());
        assert!(PhotoName::sanitize("..").is_none());
        assert_eq!(PhotoName::sanitize(".htaccess").unwrap().as_str(), "htaccess");
    }

    #[test]
    fn test_sanitize_truncates_but_keeps_extension() {
        let raw = format!("{}.jpeg", "a".repeat(200));
        let name = PhotoName::sanitize(&raw).unwrap();
        assert_eq!(name.as_str().len(), 80);
        assert!(name.as_str().ends_with(".jpeg"));
    }

    #[test]
    fn test_with_prefix_fits_column() {
        let raw = format!("{}.png", "b".repeat(200));
        let name = PhotoName::sanitize(&raw).unwrap().with_prefix("0123abcd");
        assert!(name.as_str().starts_with("0123abcd_"));
        assert!(name.as_str().len() <= PhotoName::MAX_LENGTH);
    }
}
