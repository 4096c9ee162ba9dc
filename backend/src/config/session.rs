//! Session cookie configuration

use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;
use crate::application::SESSION_COOKIE;

/// `SameSite` attribute of the session cookie.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// How the session cookie is written.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Cookie holding the user id; read and written under this one name
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Add the `Secure` attribute
    #[serde(default)]
    pub secure: bool,

    #[serde(default)]
    pub same_site: SameSite,

    /// `Max-Age` in seconds; 0 writes a browser-session cookie
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,
}

impl SessionConfig {
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let valid_name = !self.cookie_name.is_empty()
            && self
                .cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid_name {
            return Err(ValidationError::InvalidCookieName(self.cookie_name.clone()));
        }
        if self.same_site == SameSite::None && !self.secure {
            return Err(ValidationError::InsecureCrossSiteCookie);
        }
        if *environment == Environment::Production && !self.secure {
            return Err(ValidationError::CookieMustBeSecure);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            secure: false,
            same_site: SameSite::default(),
            max_age_secs: default_max_age(),
        }
    }
}

fn default_cookie_name() -> String {
    SESSION_COOKIE.to_string()
}

fn default_max_age() -> u64 {
    60 * 60 * 24 * 30
}
