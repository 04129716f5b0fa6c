use anyhow::anyhow;
use bcrypt::hash;

/// Turns plain-text passwords into what gets stored in `users.password`.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Clone)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl CredentialHasher for BcryptHasher {
    fn hash(&self, password: &str) -> anyhow::Result<String> {
        hash(password, self.cost).map_err(|e| anyhow!("Failed to hash password: {}", e))
    }
}
