use crate::error::Result;

/// Hashing policy for stored credentials. The concrete algorithm is swappable
/// without touching the registration/login flow.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String>;
    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool>;
}

/// bcrypt-backed policy. The cost factor bounds register/login throughput on
/// purpose; tests lower it.
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<String> {
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }

    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool> {
        Ok(bcrypt::verify(plaintext, digest)?)
    }
}
