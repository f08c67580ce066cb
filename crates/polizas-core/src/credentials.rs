//! Credential verification backed by a single configured account.

use crate::traits::{CredentialVerifier, Principal};

/// Constant-time byte comparison to prevent timing attacks on credential checks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Accepts exactly one email/password pair, supplied at startup.
#[derive(Debug, Clone)]
pub struct StaticCredentialVerifier {
    user_id: String,
    email: String,
    password: String,
}

impl StaticCredentialVerifier {
    pub fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

impl CredentialVerifier for StaticCredentialVerifier {
    fn verify(&self, email: &str, password: &str) -> Option<Principal> {
        // Evaluate both comparisons so timing does not reveal which one failed.
        let email_ok = constant_time_eq(email.as_bytes(), self.email.as_bytes());
        let password_ok = constant_time_eq(password.as_bytes(), self.password.as_bytes());

        (email_ok & password_ok).then(|| Principal {
            id: self.user_id.clone(),
            email: self.email.clone(),
        })
    }
}
