use std::fmt;

use crate::error::CouncilError;

/// A validated API key. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn parse(raw: Option<&str>) -> Result<Self, CouncilError> {
        let key = raw.map(str::trim).unwrap_or_default();
        if key.is_empty() {
            return Err(CouncilError::Authentication(
                "no API key configured; set GROQ_API_KEY or enter a key".into(),
            ));
        }
        if !key.chars().all(|c| c.is_ascii_graphic()) {
            return Err(CouncilError::Authentication(
                "API key contains invalid characters".into(),
            ));
        }
        Ok(Self(key.to_string()))
    }

    /// Pick the key to use: a non-blank session value wins over the environment.
    pub fn resolve<'a>(session_key: Option<&'a str>, env_key: Option<&'a str>) -> Option<&'a str> {
        session_key
            .filter(|k| !k.trim().is_empty())
            .or(env_key.filter(|k| !k.trim().is_empty()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}
