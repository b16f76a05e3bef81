use std::fmt;

/// Number of credential characters kept in a token identity.
const PREFIX_LENGTH: usize = 8;

/// Coarse key used to partition the rate limiter.
///
/// Either `token:<first 8 credential characters>` or `anonymous`. The full
/// credential never ends up in an identity, so identities are safe to log.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    /// The identity shared by every caller without a credential.
    pub fn anonymous() -> Self {
        Self("anonymous".to_string())
    }

    /// Derives the identity for an optional credential. Empty counts as absent.
    pub fn from_credential(credential: Option<&str>) -> Self {
        match credential {
            None | Some("") => Self::anonymous(),
            Some(credential) => {
                let prefix: String = credential.chars().take(PREFIX_LENGTH).collect();
                Self(format!("token:{prefix}"))
            }
        }
    }

    /// The identity as the rate limiter key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
