//! Declarative route access policy.
//!
//! Routes form a tree: `/user` has children `profile`, `requests`, and
//! so on. Access requirements are declared per record and *propagate
//! downward* — if `/admin` requires auth and privilege, every descendant
//! does too, without re-declaring anything. Resolution walks the tree,
//! matching the target path segment by segment, and ORs together the
//! requirements of every record on the matched chain.
//!
//! A `:param` segment matches any single segment (`/request/:id`
//! matches `/request/42`). An unmatched path resolves to no
//! requirements — unknown territory is the renderer's problem (a 404
//! view), not an access question.

/// The resolved access requirements for one navigation target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    /// Some record on the matched chain requires a signed-in session.
    pub requires_auth: bool,
    /// Some record on the matched chain requires the elevated role.
    pub requires_privilege: bool,
}

impl AccessPolicy {
    fn merge(self, other: AccessPolicy) -> AccessPolicy {
        AccessPolicy {
            requires_auth: self.requires_auth || other.requires_auth,
            requires_privilege: self.requires_privilege || other.requires_privilege,
        }
    }
}

/// One route record: a path pattern, its own requirements, and children.
///
/// Top-level records carry absolute paths (`/user`); children carry
/// paths relative to their parent (`profile`). An empty child path is
/// the default child and matches the parent's own path exactly.
#[derive(Debug, Clone)]
pub struct Route {
    path: String,
    requires_auth: bool,
    requires_privilege: bool,
    children: Vec<Route>,
}

impl Route {
    /// A record with no requirements of its own.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            requires_auth: false,
            requires_privilege: false,
            children: Vec::new(),
        }
    }

    /// Requires a signed-in session for this record and everything
    /// beneath it.
    pub fn requires_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    /// Requires the elevated role for this record and everything
    /// beneath it.
    pub fn requires_privilege(mut self) -> Self {
        self.requires_privilege = true;
        self
    }

    /// Adds a child record (path relative to this one).
    pub fn child(mut self, child: Route) -> Self {
        self.children.push(child);
        self
    }

    fn own_policy(&self) -> AccessPolicy {
        AccessPolicy {
            requires_auth: self.requires_auth,
            requires_privilege: self.requires_privilege,
        }
    }

    /// Tries to match `segments` against this record (and, if segments
    /// remain, its children). Returns the merged policy of the matched
    /// chain, or `None` if this record doesn't match.
    fn resolve(&self, segments: &[&str]) -> Option<AccessPolicy> {
        let own: Vec<&str> = split_segments(&self.path);

        if own.len() > segments.len() {
            return None;
        }
        for (pattern, actual) in own.iter().zip(segments) {
            if !segment_matches(pattern, actual) {
                return None;
            }
        }

        let rest = &segments[own.len()..];
        if rest.is_empty() {
            return Some(self.own_policy());
        }

        self.children
            .iter()
            .find_map(|child| child.resolve(rest))
            .map(|child_policy| self.own_policy().merge(child_policy))
    }
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn segment_matches(pattern: &str, actual: &str) -> bool {
    pattern.starts_with(':') || pattern == actual
}

/// The full route policy: every top-level record of the client.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// An empty table (everything resolves to no requirements).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a top-level record.
    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Resolves the access policy for a navigation target.
    ///
    /// The query string and fragment are ignored for matching (they
    /// stay part of the *redirect* target, but that's the guard's
    /// concern, not the table's).
    pub fn resolve(&self, target: &str) -> AccessPolicy {
        let path = target
            .split(['?', '#'])
            .next()
            .unwrap_or(target);
        let segments = split_segments(path);

        self.routes
            .iter()
            .find_map(|route| route.resolve(&segments))
            .unwrap_or_default()
    }
}
