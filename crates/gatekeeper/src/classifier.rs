use gatehouse_common::RouteRule;

/// Policy applied to paths no configured rule matches.
pub const FALLBACK_POLICY: &str = "api";

/// Maps request paths to policy names by ordered prefix match.
pub struct RouteClassifier {
    routes: Vec<RouteRule>,
}

impl RouteClassifier {
    pub fn new(routes: Vec<RouteRule>) -> Self {
        Self { routes }
    }

    /// The first configured prefix that matches wins, so more specific
    /// prefixes must be listed before shorter ones. Unmatched paths fall
    /// back to [`FALLBACK_POLICY`] without logging.
    pub fn classify(&self, path: &str) -> &str {
        for route in &self.routes {
            if path.starts_with(&route.path_prefix) {
                return &route.policy;
            }
        }
        FALLBACK_POLICY
    }
}
