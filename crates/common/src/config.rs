use serde::{Deserialize, Serialize};

/// Top-level gatekeeper configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_policies")]
    pub policies: Vec<PolicyConfig>,
    #[serde(default = "default_routes")]
    pub routes: Vec<RouteRule>,
    #[serde(default)]
    pub gatekeeper: GatekeeperConfig,
    #[serde(default)]
    pub csrf: CsrfConfig,
    #[serde(default)]
    pub heuristic: HeuristicConfig,
    #[serde(default)]
    pub events: EventsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            policies: default_policies(),
            routes: default_routes(),
            gatekeeper: GatekeeperConfig::default(),
            csrf: CsrfConfig::default(),
            heuristic: HeuristicConfig::default(),
            events: EventsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default)]
    pub admin: AdminConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            admin: AdminConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_listen")]
    pub listen: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            listen: default_admin_listen(),
        }
    }
}

/// A named rate-limit policy: at most `max_requests` per `window_secs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub name: String,
    pub max_requests: u32,
    pub window_secs: u64,
}

/// Maps a path prefix to the policy governing it. First match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRule {
    pub path_prefix: String,
    pub policy: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatekeeperConfig {
    /// How long an identity stays blocked after exhausting the auth policy.
    #[serde(default = "default_auth_block_secs")]
    pub auth_block_secs: u64,
    #[serde(default = "default_reaper_interval")]
    pub reaper_interval_secs: u64,
}

impl Default for GatekeeperConfig {
    fn default() -> Self {
        Self {
            auth_block_secs: default_auth_block_secs(),
            reaper_interval_secs: default_reaper_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrfConfig {
    #[serde(default = "default_csrf_cookie")]
    pub cookie_name: String,
    #[serde(default = "default_csrf_header")]
    pub header_name: String,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_csrf_cookie(),
            header_name: default_csrf_header(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeuristicConfig {
    /// Extra suspicious substrings scanned in addition to the built-in set.
    #[serde(default)]
    pub extra_patterns: Vec<String>,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            extra_patterns: vec![],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    #[serde(default = "default_events_capacity")]
    pub capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            capacity: default_events_capacity(),
        }
    }
}

// Default value helpers
fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}
fn default_admin_listen() -> String {
    "127.0.0.1:9090".to_string()
}
fn default_policies() -> Vec<PolicyConfig> {
    vec![
        PolicyConfig {
            name: "auth".to_string(),
            max_requests: 5,
            window_secs: 300,
        },
        PolicyConfig {
            name: "api".to_string(),
            max_requests: 60,
            window_secs: 60,
        },
        PolicyConfig {
            name: "calendar".to_string(),
            max_requests: 30,
            window_secs: 60,
        },
        PolicyConfig {
            name: "productivity".to_string(),
            max_requests: 30,
            window_secs: 60,
        },
    ]
}
fn default_routes() -> Vec<RouteRule> {
    vec![
        RouteRule {
            path_prefix: "/auth".to_string(),
            policy: "auth".to_string(),
        },
        RouteRule {
            path_prefix: "/api/calendar".to_string(),
            policy: "calendar".to_string(),
        },
        RouteRule {
            path_prefix: "/api/tasks".to_string(),
            policy: "productivity".to_string(),
        },
        RouteRule {
            path_prefix: "/api".to_string(),
            policy: "api".to_string(),
        },
    ]
}
fn default_auth_block_secs() -> u64 {
    1800
}
fn default_reaper_interval() -> u64 {
    60
}
fn default_csrf_cookie() -> String {
    "session".to_string()
}
fn default_csrf_header() -> String {
    "x-csrf-token".to_string()
}
fn default_events_capacity() -> usize {
    1000
}

impl AppConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration for consistency.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.listen.is_empty() {
            anyhow::bail!("server.listen must not be empty");
        }

        if self.policies.is_empty() {
            anyhow::bail!("at least one rate-limit policy must be defined");
        }

        for (i, policy) in self.policies.iter().enumerate() {
            if policy.max_requests == 0 {
                anyhow::bail!("policy '{}' has max_requests 0", policy.name);
            }
            if policy.window_secs == 0 {
                anyhow::bail!("policy '{}' has a zero-length window", policy.name);
            }
            if self.policies[..i].iter().any(|p| p.name == policy.name) {
                anyhow::bail!("duplicate policy name '{}'", policy.name);
            }
        }

        for route in &self.routes {
            let policy_exists = self.policies.iter().any(|p| p.name == route.policy);
            if !policy_exists {
                anyhow::bail!(
                    "route '{}' references unknown policy '{}'",
                    route.path_prefix,
                    route.policy
                );
            }
        }

        if self.events.capacity == 0 {
            anyhow::bail!("events.capacity must be at least 1");
        }

        for name in ["auth", "api"] {
            if !self.policies.iter().any(|p| p.name == name) {
                tracing::warn!(policy = name, "well-known policy is not configured");
            }
        }

        Ok(())
    }
}
