//! Responder configuration

use std::time::Duration;

use crate::types::Profile;

/// Configuration consumed by the listening role.
///
/// Built and validated by the CLI before the core starts; the core never
/// re-checks it.
#[derive(Debug, Clone)]
pub struct ResponderConfig {
    /// Port to listen on, bound on all interfaces
    pub port: u16,

    /// Handler profile for accepted connections
    pub profile: Profile,

    /// Identity announced in the shell banner (defaults to the local username)
    pub identity: Option<String>,

    /// Kill a command and report an error once this elapses; unbounded when unset
    pub command_timeout: Option<Duration>,

    /// Cap on concurrently served connections; unbounded when unset
    pub max_connections: Option<usize>,
}

impl ResponderConfig {
    /// Create a config with the required fields; the optional knobs keep
    /// their permissive defaults.
    pub fn new(port: u16, profile: Profile) -> Self {
        Self {
            port,
            profile,
            identity: None,
            command_timeout: None,
            max_connections: None,
        }
    }

    /// Identity announced in the shell banner, falling back to the
    /// effective local username
    pub fn effective_identity(&self) -> String {
        self.identity.clone().unwrap_or_else(whoami::username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_identity_prefers_override() {
        let mut config = ResponderConfig::new(9000, Profile::Shell);
        config.identity = Some("alice".to_string());
        assert_eq!(config.effective_identity(), "alice");
    }

    #[test]
    fn test_effective_identity_falls_back_to_username() {
        let config = ResponderConfig::new(9000, Profile::Shell);
        assert!(!config.effective_identity().is_empty());
    }

    #[test]
    fn test_new_defaults_are_unbounded() {
        let config = ResponderConfig::new(9000, Profile::Shell);
        assert!(config.command_timeout.is_none());
        assert!(config.max_connections.is_none());
    }
}
