use std::borrow::Cow;

use http::{HeaderMap, header::AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};

/// Picks the CourtListener credential for one tool call.
///
/// A `Bearer` token on the inbound HTTP request wins over the configured key.
#[derive(Default)]
pub(crate) struct CredentialSource {
    configured: Option<SecretString>,
}

impl CredentialSource {
    pub(crate) fn new(configured: Option<SecretString>) -> Self {
        Self { configured }
    }

    pub(crate) fn resolve<'a>(&'a self, headers: &'a HeaderMap) -> Option<Cow<'a, str>> {
        if let Some(token) = bearer_token(headers) {
            return Some(Cow::Borrowed(token));
        }

        self.configured
            .as_ref()
            .map(|key| Cow::Borrowed(key.expose_secret()))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    Some(token.trim()).filter(|token| !token.is_empty())
}
