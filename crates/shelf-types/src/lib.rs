/// Errors that can occur when creating validated filename types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NameError {
    /// The input was empty or contained only whitespace
    #[error("Filename cannot be empty")]
    Empty,
    /// The input contained a parent-directory segment
    #[error("Filename must not contain '..'")]
    ParentTraversal,
    /// The input started with a path separator
    #[error("Filename must not start with '/'")]
    LeadingSeparator,
}

/// A filename that is safe to hand to the upstream contents API.
///
/// This type wraps a `String` and guarantees the value is non-empty after
/// trimming, contains no `..` segment, and does not begin with a path
/// separator. Subdirectory paths such as `notes/todo.txt` are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileName(String);

impl FileName {
    /// Creates a new `FileName` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace before
    /// validation. Rejects empty results, values containing a
    /// parent-directory (`..`) segment, and values starting with `/`.
    ///
    /// # Arguments
    ///
    /// * `input` - Any type that can be converted to a string reference
    ///
    /// # Returns
    ///
    /// Returns `Ok(FileName)` when the trimmed input passes validation,
    /// or the matching `NameError` otherwise.
    pub fn new(input: impl AsRef<str>) -> Result<Self, NameError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(NameError::Empty);
        }
        if trimmed.contains("..") {
            return Err(NameError::ParentTraversal);
        }
        if trimmed.starts_with('/') {
            return Err(NameError::LeadingSeparator);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the lowercased extension, if the name has one.
    ///
    /// The extension is everything after the final `.` in the final path
    /// segment. Names without a `.` (or ending in one) have no extension.
    pub fn extension(&self) -> Option<String> {
        let last_segment = self.0.rsplit('/').next().unwrap_or(&self.0);
        match last_segment.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
                Some(ext.to_ascii_lowercase())
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for FileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for FileName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for FileName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for FileName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FileName::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        let name = FileName::new("notes.txt").unwrap();
        assert_eq!(name.as_str(), "notes.txt");
    }

    #[test]
    fn accepts_subdirectory_paths() {
        let name = FileName::new("docs/readme.md").unwrap();
        assert_eq!(name.as_str(), "docs/readme.md");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let name = FileName::new("  report.pdf  ").unwrap();
        assert_eq!(name.as_str(), "report.pdf");
    }

    #[test]
    fn rejects_empty_and_whitespace_only() {
        assert_eq!(FileName::new(""), Err(NameError::Empty));
        assert_eq!(FileName::new("   "), Err(NameError::Empty));
    }

    #[test]
    fn rejects_parent_traversal() {
        assert_eq!(FileName::new("../secret"), Err(NameError::ParentTraversal));
        assert_eq!(
            FileName::new("a/../../etc/passwd"),
            Err(NameError::ParentTraversal)
        );
        // The original gateway rejects any occurrence of "..", even mid-name.
        assert_eq!(FileName::new("a..b"), Err(NameError::ParentTraversal));
    }

    #[test]
    fn rejects_leading_separator() {
        assert_eq!(
            FileName::new("/etc/passwd"),
            Err(NameError::LeadingSeparator)
        );
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(
            FileName::new("photo.JPG").unwrap().extension(),
            Some("jpg".into())
        );
    }

    #[test]
    fn extension_uses_final_segment() {
        assert_eq!(
            FileName::new("dir.d/data.csv").unwrap().extension(),
            Some("csv".into())
        );
        assert_eq!(FileName::new("dir.d/data").unwrap().extension(), None);
    }

    #[test]
    fn extensionless_names_have_no_extension() {
        assert_eq!(FileName::new("Makefile").unwrap().extension(), None);
        assert_eq!(FileName::new("archive.").unwrap().extension(), None);
    }

    #[test]
    fn serde_round_trip_revalidates() {
        let name = FileName::new("notes.txt").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"notes.txt\"");

        let parsed: FileName = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, name);

        let bad: Result<FileName, _> = serde_json::from_str("\"../up\"");
        assert!(bad.is_err());
    }
}
