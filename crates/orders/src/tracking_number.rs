//! Buyer-facing tracking numbers.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use ordertrack_core::{DomainError, DomainResult, ValueObject};

/// Opaque, user-facing order identifier (e.g. `GIGA-7K2QXD`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrackingNumber(String);

impl TrackingNumber {
    /// Accepts any non-empty token without whitespace.
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::validation("tracking number must not be empty"));
        }
        if value.chars().any(char::is_whitespace) {
            return Err(DomainError::validation(format!(
                "tracking number '{value}' must not contain whitespace"
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for TrackingNumber {}

impl core::fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TrackingNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TrackingNumber> for String {
    fn from(value: TrackingNumber) -> Self {
        value.0
    }
}

/// Source of fresh tracking numbers.
///
/// Uniqueness is the caller's concern: generators only promise a
/// well-formed token.
pub trait TrackingNumberGenerator {
    fn generate(&mut self) -> TrackingNumber;
}

const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// `<PREFIX>-XXXXXX` tokens drawn from `[0-9A-Z]`.
///
/// Not cryptographically unique; collisions are possible and must be checked
/// against existing orders.
#[derive(Debug, Clone)]
pub struct RandomTrackingNumbers {
    prefix: String,
    rng: StdRng,
}

impl RandomTrackingNumbers {
    pub const DEFAULT_PREFIX: &'static str = "GIGA";
    pub const TOKEN_LEN: usize = 6;

    pub fn new(prefix: impl Into<String>) -> DomainResult<Self> {
        Ok(Self {
            prefix: validate_prefix(prefix.into())?,
            rng: StdRng::from_entropy(),
        })
    }

    /// Deterministic sequence, for tests and benchmarks.
    pub fn seeded(prefix: impl Into<String>, seed: u64) -> DomainResult<Self> {
        Ok(Self {
            prefix: validate_prefix(prefix.into())?,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for RandomTrackingNumbers {
    fn default() -> Self {
        Self {
            prefix: Self::DEFAULT_PREFIX.to_string(),
            rng: StdRng::from_entropy(),
        }
    }
}

impl TrackingNumberGenerator for RandomTrackingNumbers {
    fn generate(&mut self) -> TrackingNumber {
        let token: String = (0..Self::TOKEN_LEN)
            .map(|_| ALPHABET[self.rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        TrackingNumber(format!("{}-{}", self.prefix, token))
    }
}

fn validate_prefix(prefix: String) -> DomainResult<String> {
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(DomainError::validation(format!(
            "tracking prefix '{prefix}' must be non-empty ASCII alphanumeric"
        )));
    }
    Ok(prefix)
}
