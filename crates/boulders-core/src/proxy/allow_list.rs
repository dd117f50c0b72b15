use regex::RegexSet;

/// Upstream path prefixes the proxy forwards.
pub const ALLOWED_PATH_PATTERNS: [&str; 5] = [
    r"^/api/reference/",
    r"^/api/products/",
    r"^/api/ver3/services/",
    r"^/services/",
    r"^/ver3/",
];

/// Allow-list of upstream paths. Anything it rejects is never fetched.
#[derive(Debug, Clone)]
pub struct PathAllowList {
    patterns: RegexSet,
}

impl Default for PathAllowList {
    fn default() -> Self {
        Self::new(ALLOWED_PATH_PATTERNS).expect("built-in path patterns are valid")
    }
}

impl PathAllowList {
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            patterns: RegexSet::new(patterns)?,
        })
    }

    /// Dot segments are refused outright: the upstream URL parser would
    /// resolve them and escape the matched prefix.
    pub fn is_allowed(&self, path: &str) -> bool {
        !has_dot_segment(path) && self.patterns.is_match(path)
    }
}

fn has_dot_segment(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    path.split(['/', '\\']).any(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == "." || decoded == ".."
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_prefixes_are_allowed() {
        let list = PathAllowList::default();
        for path in [
            "/api/reference/foo",
            "/api/products/memberships",
            "/api/ver3/services/businessunits",
            "/services/x",
            "/ver3/customers/1?expand=true",
        ] {
            assert!(list.is_allowed(path), "{path} should be allowed");
        }
    }

    #[test]
    fn other_paths_are_rejected() {
        let list = PathAllowList::default();
        for path in ["/unknown/x", "/api/admin", "api/products/x", "/api/productsx/1", ""] {
            assert!(!list.is_allowed(path), "{path} should be rejected");
        }
    }

    #[test]
    fn traversal_out_of_a_prefix_is_rejected() {
        let list = PathAllowList::default();
        assert!(!list.is_allowed("/api/products/../../admin"));
        assert!(!list.is_allowed("/api/products/%2E%2E/admin"));
        assert!(list.is_allowed("/api/products/a..b"));
    }
}
