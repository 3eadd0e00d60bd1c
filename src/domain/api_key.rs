use secrecy::ExposeSecret;
use secrecy::Secret;

/// A GetResponse API key, trimmed and known to be non-empty. The key is
/// redacted in `Debug` output, so it never ends up in logs by accident.
#[derive(Debug, Clone)]
pub struct ApiKey(Secret<String>);

impl ApiKey {
    /// `None` for an empty or whitespace-only key: there is nothing to call
    /// the API with.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim();
        (!key.is_empty()).then(|| Self(Secret::new(key.to_string())))
    }

    pub fn expose(&self) -> &str { self.0.expose_secret() }
}
