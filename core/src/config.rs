//! Runtime configuration.

use crate::error::{Error, Result};
use std::env;
use std::str::FromStr;

/// Environment variable naming the platform to use, e.g. `headless`.
pub const PLATFORM_VAR: &str = "VENEER_PLATFORM";

/// Environment variable selecting the [`EventPolicy`] (`strict` or `lenient`).
pub const EVENT_POLICY_VAR: &str = "VENEER_EVENT_POLICY";

/// What happens when a widget event is subscribed to but the handler does not support it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPolicy {
    /// Subscribing fails with [`Error::UnsupportedEvent`].
    Strict,
    /// The subscription is kept but never fires; a warning is logged once per widget and event.
    Lenient,
}

impl Default for EventPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            EventPolicy::Strict
        } else {
            EventPolicy::Lenient
        }
    }
}

impl FromStr for EventPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(EventPolicy::Strict),
            "lenient" => Ok(EventPolicy::Lenient),
            _ => Err(Error::InvalidConfig {
                key: EVENT_POLICY_VAR,
                value: s.to_string(),
            }),
        }
    }
}

/// Platform selection and dispatch settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Id of the platform to use. If unset, the first loadable backend is picked.
    pub platform: Option<String>,

    /// Policy for unsupported widget events.
    pub event_policy: EventPolicy,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// Unset variables keep their defaults; an unrecognized policy is an error.
    pub fn from_env() -> Result<Config> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let mut config = Config::default();
        if let Some(platform) = lookup(PLATFORM_VAR) {
            let platform = platform.trim();
            if !platform.is_empty() {
                config.platform = Some(platform.to_string());
            }
        }
        if let Some(policy) = lookup(EVENT_POLICY_VAR) {
            config.event_policy = policy.parse()?;
        }
        Ok(config)
    }

    pub fn with_platform(mut self, id: impl Into<String>) -> Self {
        self.platform = Some(id.into());
        self
    }

    pub fn with_event_policy(mut self, policy: EventPolicy) -> Self {
        self.event_policy = policy;
        self
    }
}

#[test]
fn test_policy_parse() {
    assert_eq!("strict".parse::<EventPolicy>().unwrap(), EventPolicy::Strict);
    assert_eq!(" Lenient ".parse::<EventPolicy>().unwrap(), EventPolicy::Lenient);
    match "loud".parse::<EventPolicy>() {
        Err(Error::InvalidConfig { key, value }) => {
            assert_eq!(key, EVENT_POLICY_VAR);
            assert_eq!(value, "loud");
        }
        other => panic!("expected InvalidConfig, got {:?}", other),
    }
}

#[test]
fn test_config_from_lookup() {
    let config = Config::from_lookup(|key| match key {
        PLATFORM_VAR => Some("headless".into()),
        EVENT_POLICY_VAR => Some("lenient".into()),
        _ => None,
    })
    .unwrap();
    assert_eq!(config.platform.as_deref(), Some("headless"));
    assert_eq!(config.event_policy, EventPolicy::Lenient);

    let config = Config::from_lookup(|key| match key {
        PLATFORM_VAR => Some("  ".into()),
        _ => None,
    })
    .unwrap();
    assert_eq!(config, Config::default());

    assert!(Config::from_lookup(|key| match key {
        EVENT_POLICY_VAR => Some("sometimes".into()),
        _ => None,
    })
    .is_err());
}
