//! Route classification table
//!
//! Classification is a pure function of the request path, evaluated before
//! any identity work. The prefix lists are plain data so the public surface
//! of the gateway can be reviewed in one place.

/// Verdict for a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Login-flow endpoint; always passes through unmodified so the login
    /// mechanism can never lock itself out.
    Bypass,
    /// Publicly reachable without identity.
    Public,
    /// Requires a resolved principal.
    Protected,
}

/// Enumerable lists of bypass and public path prefixes.
///
/// Prefixes match on path-segment boundaries: `/about` matches `/about` and
/// `/about/team` but not `/aboutx`. `/` matches only the root path.
#[derive(Debug, Clone)]
pub struct RouteTable {
    bypass_prefixes: Vec<String>,
    public_prefixes: Vec<String>,
}

impl RouteTable {
    pub fn new<S: Into<String>>(
        bypass_prefixes: impl IntoIterator<Item = S>,
        public_prefixes: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            bypass_prefixes: bypass_prefixes.into_iter().map(Into::into).collect(),
            public_prefixes: public_prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Classify a path. Bypass wins over public; everything unlisted is
    /// protected.
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.bypass_prefixes.iter().any(|p| prefix_match(p, path)) {
            RouteClass::Bypass
        } else if self.public_prefixes.iter().any(|p| prefix_match(p, path)) {
            RouteClass::Public
        } else {
            RouteClass::Protected
        }
    }
}

/// Segment-boundary prefix match.
pub(crate) fn prefix_match(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return path == "/";
    }
    match path.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::new(vec!["/auth", "/login"], vec!["/", "/about", "/api/health-check"])
    }

    #[test]
    fn public_prefix_matches_on_segment_boundary() {
        let t = table();
        assert_eq!(t.classify("/about"), RouteClass::Public);
        assert_eq!(t.classify("/about/extra"), RouteClass::Public);
        assert_eq!(t.classify("/aboutxyz"), RouteClass::Protected);
    }

    #[test]
    fn root_matches_exactly() {
        let t = table();
        assert_eq!(t.classify("/"), RouteClass::Public);
        assert_eq!(t.classify("/dashboard"), RouteClass::Protected);
    }

    #[test]
    fn login_flow_paths_bypass() {
        let t = table();
        assert_eq!(t.classify("/auth/telegram/callback"), RouteClass::Bypass);
        assert_eq!(t.classify("/login"), RouteClass::Bypass);
    }

    #[test]
    fn api_paths_default_to_protected() {
        let t = table();
        assert_eq!(t.classify("/api/health-check"), RouteClass::Public);
        assert_eq!(t.classify("/api/me"), RouteClass::Protected);
    }
}
