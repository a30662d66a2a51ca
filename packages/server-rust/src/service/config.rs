/// Server-level configuration for the ordering services.
///
/// Built once by the composition root and shared as `Arc<ServerConfig>`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Identifier for this server node, used in log fields.
    pub node_id: String,
    /// Status label every new order starts with. Must not be blank.
    pub initial_order_status: String,
    /// How many fresh keys `create_order` tries before giving up on collisions.
    pub key_generation_attempts: u32,
    /// Seed the menu repository with the default catalog at startup.
    pub seed_default_menu: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            node_id: "noodlebar-0".to_string(),
            initial_order_status: "received".to_string(),
            key_generation_attempts: 8,
            seed_default_menu: true,
        }
    }
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("initial order status must not be blank")]
    BlankInitialStatus,
    #[error("key generation attempts must be at least 1")]
    NoKeyAttempts,
}

impl ServerConfig {
    /// Checks the invariants the services rely on.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_order_status.trim().is_empty() {
            return Err(ConfigError::BlankInitialStatus);
        }
        if self.key_generation_attempts == 0 {
            return Err(ConfigError::NoKeyAttempts);
        }
        Ok(())
    }
}
