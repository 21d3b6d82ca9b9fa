use std::time::Duration;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for [`super::ReqwestTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Deadline for the whole exchange, body included. `None` waits forever.
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
            user_agent: concat!("courier/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl TransportConfig {
    /// Defaults overridden by `COURIER_TIMEOUT_SECS`,
    /// `COURIER_CONNECT_TIMEOUT_SECS` and `COURIER_USER_AGENT`. Values that do
    /// not parse are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let secs = |key: &str| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
        };
        let mut config = Self::default();
        if let Some(timeout) = secs("COURIER_TIMEOUT_SECS") {
            config.timeout = Some(timeout);
        }
        if let Some(connect) = secs("COURIER_CONNECT_TIMEOUT_SECS") {
            config.connect_timeout = Some(connect);
        }
        if let Some(agent) = lookup("COURIER_USER_AGENT").filter(|v| !v.is_empty()) {
            config.user_agent = agent;
        }
        config
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = TransportConfig::default();
        assert_eq!(config.timeout, None);
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(10)));
        assert!(config.user_agent.starts_with("courier/"));
    }

    #[test]
    fn env_overrides_apply() {
        let config = TransportConfig::from_lookup(lookup(&[
            ("COURIER_TIMEOUT_SECS", "30"),
            ("COURIER_CONNECT_TIMEOUT_SECS", " 2 "),
            ("COURIER_USER_AGENT", "svc/1"),
        ]));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(2)));
        assert_eq!(config.user_agent, "svc/1");
    }

    #[test]
    fn unparsable_values_fall_back() {
        let config = TransportConfig::from_lookup(lookup(&[
            ("COURIER_TIMEOUT_SECS", "soon"),
            ("COURIER_USER_AGENT", ""),
        ]));
        assert_eq!(config, TransportConfig::default());
    }
}
