//! Common test utilities and helpers for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use registry_warden::auth::{AuthGate, JwtSigner};
use registry_warden::config::{JwtTokenOptions, SecurityConfig, TokenSignOptions};
use registry_warden::error::StoreError;
use registry_warden::store::UserStore;

/// Shared secret used across the integration tests
pub const SECRET: &str = "integration-secret";

/// In-memory user store backing the integration tests
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<String, (String, Vec<String>)>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user with a password and group list
    pub fn with_user(self, name: &str, password: &str, groups: &[&str]) -> Self {
        self.users.lock().unwrap().insert(
            name.to_string(),
            (
                password.to_string(),
                groups.iter().map(|g| g.to_string()).collect(),
            ),
        );
        self
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Vec<String>, StoreError> {
        let users = self.users.lock().unwrap();
        match users.get(username) {
            Some((stored, groups)) if stored == password => Ok(groups.clone()),
            _ => Err(StoreError::InvalidCredentials),
        }
    }

    async fn add_user(&self, username: &str, password: &str) -> Result<(), StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(username) {
            return Err(StoreError::UserExists(username.to_string()));
        }
        users.insert(username.to_string(), (password.to_string(), Vec::new()));
        Ok(())
    }
}

/// Security configuration in default (legacy) mode
pub fn legacy_security() -> SecurityConfig {
    SecurityConfig::default()
}

/// Security configuration with JWT API tokens enabled
pub fn jwt_security() -> SecurityConfig {
    let mut security = SecurityConfig::default();
    security.api.jwt = Some(JwtTokenOptions {
        sign: Some(TokenSignOptions {
            expires_in: Some(std::time::Duration::from_secs(3600)),
            not_before: None,
        }),
        verify: None,
    });
    security
}

/// Create a gate over a seeded store and the JWT signer
pub fn create_gate(
    security: &SecurityConfig,
    store: MemoryUserStore,
) -> AuthGate<MemoryUserStore> {
    AuthGate::new(
        Some(security),
        SECRET,
        Arc::new(store),
        Arc::new(JwtSigner::new()),
    )
}
