use std::time::Duration;

/// A named rate-limit policy. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    pub name: String,
    pub max_requests: u32,
    pub window: Duration,
}

impl Policy {
    pub fn new(name: impl Into<String>, max_requests: u32, window: Duration) -> Self {
        Self {
            name: name.into(),
            max_requests,
            window,
        }
    }
}

/// The set of policies defined at startup, looked up by name.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    policies: Vec<Policy>,
}

impl PolicyTable {
    pub fn new(policies: Vec<Policy>) -> Self {
        Self { policies }
    }

    pub fn get(&self, name: &str) -> Option<&Policy> {
        self.policies.iter().find(|p| p.name == name)
    }

    /// The longest window across all policies. Records older than a multiple
    /// of this can never influence a decision and are safe to evict.
    pub fn max_window(&self) -> Duration {
        self.policies
            .iter()
            .map(|p| p.window)
            .max()
            .unwrap_or(Duration::from_secs(60))
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
