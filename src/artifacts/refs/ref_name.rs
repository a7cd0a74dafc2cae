use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Prefix of the local branch namespace.
pub const LOCAL_NAMESPACE: &str = "heads/";

/// Prefix of the remote-tracking namespace.
pub const REMOTE_NAMESPACE: &str = "remotes/";

/// Last path segment of a remote's default-branch pointer. Refs ending in
/// it are symbolic and excluded from branch listings.
pub const SYMBOLIC_HEAD_MARKER: &str = "HEAD";

/// Remote names are plain identifiers: letters, digits and dashes.
static REMOTE_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("remote name regex is valid"));

pub fn is_valid_remote_name(name: &str) -> bool {
    REMOTE_NAME_REGEX.is_match(name)
}

/// A remote-tracking ref, convertible losslessly between its short form
/// (`origin/main`) and full form (`remotes/origin/main`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteRef {
    remote: String,
    branch: String,
}

impl RemoteRef {
    /// Parse either form. Full form wins when the string starts with the
    /// `remotes/` namespace prefix, so round-tripping is lossless for any
    /// name without a literal `remotes/` collision.
    pub fn parse(s: &str) -> Option<Self> {
        if let Some(rest) = s.strip_prefix(REMOTE_NAMESPACE) {
            Self::split(rest)
        } else {
            Self::split(s)
        }
    }

    fn split(s: &str) -> Option<Self> {
        let (remote, branch) = s.split_once('/')?;
        if !is_valid_remote_name(remote) || branch.is_empty() {
            return None;
        }
        Some(RemoteRef {
            remote: remote.to_string(),
            branch: branch.to_string(),
        })
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Short form: `origin/main`.
    pub fn to_short(&self) -> String {
        format!("{}/{}", self.remote, self.branch)
    }

    /// Full form: `remotes/origin/main`.
    pub fn to_full(&self) -> String {
        format!("{}{}/{}", REMOTE_NAMESPACE, self.remote, self.branch)
    }

    /// Whether this ref is a remote's default-branch pointer rather than a
    /// real branch.
    pub fn is_symbolic_head(&self) -> bool {
        self.branch
            .rsplit('/')
            .next()
            .is_some_and(|segment| segment == SYMBOLIC_HEAD_MARKER)
    }
}

impl fmt::Display for RemoteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_short())
    }
}

/// Strip the local namespace prefix, if present.
pub fn local_short_name(full: &str) -> Option<&str> {
    full.strip_prefix(LOCAL_NAMESPACE)
}

/// Whether a full ref path's last segment is the symbolic-head marker.
pub fn is_symbolic_head_path(full: &str) -> bool {
    full.rsplit('/')
        .next()
        .is_some_and(|segment| segment == SYMBOLIC_HEAD_MARKER)
}
