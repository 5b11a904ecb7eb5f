use subtle::ConstantTimeEq;

/// Shared-secret check guarding every API and admin route
#[derive(Clone)]
pub struct AccessGate {
    secret: String,
}

impl AccessGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Exact, case-sensitive match against the configured secret
    pub fn allows(&self, code: &str) -> bool {
        bool::from(code.as_bytes().ct_eq(self.secret.as_bytes()))
    }
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate").field("secret", &"<redacted>").finish()
    }
}
