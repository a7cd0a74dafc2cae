use std::fmt;

/// Length of an abbreviated object id, as printed in logs and patch headers.
pub const SHORT_OID_LENGTH: usize = 7;

/// An opaque, comparable, printable identifier for a stored object.
///
/// The engine never computes these itself; they come from the object store
/// and are only compared, abbreviated and printed. Commits form a DAG via
/// parent ids (0 parents = root, 1 = normal, 2 or more = merge).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        ObjectId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form used in human-facing output.
    pub fn short(&self) -> &str {
        if self.0.len() > SHORT_OID_LENGTH {
            &self.0[..SHORT_OID_LENGTH]
        } else {
            &self.0
        }
    }

    /// Whether a string could be an abbreviated object id: at least
    /// [`SHORT_OID_LENGTH`] characters, hex digits only.
    pub fn looks_like_abbreviation(s: &str) -> bool {
        s.len() >= SHORT_OID_LENGTH && s.chars().all(|c| c.is_ascii_hexdigit())
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        ObjectId(s.to_string())
    }
}
