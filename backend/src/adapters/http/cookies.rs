//! Request-scoped cookie jar over HTTP headers.
//!
//! Reads the request's `Cookie` headers into a [`cookie::CookieJar`] and
//! tracks changes as its delta, which the session middleware writes back
//! as `Set-Cookie` headers. Values are percent-encoded on the way out and
//! decoded on the way in.

use axum::http::{
    header::{self, InvalidHeaderValue},
    HeaderMap, HeaderValue,
};
use cookie::{time::Duration, Cookie};

use crate::config::{SameSite, SessionConfig};
use crate::ports::CookieJar;

/// Attributes written with every session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
    pub same_site: SameSite,
    /// `None` writes a browser-session cookie.
    pub max_age_secs: Option<u64>,
}

impl CookiePolicy {
    /// A cookie carrying `value` with the policy's attributes.
    pub fn build(&self, name: &str, value: &str) -> Cookie<'static> {
        let mut builder = Cookie::build((name.to_string(), value.to_string()))
            .path("/")
            .http_only(true)
            .same_site(self.cookie_same_site())
            .secure(self.secure);
        if let Some(secs) = self.max_age_secs {
            builder = builder.max_age(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)));
        }
        builder.build()
    }

    fn cookie_same_site(&self) -> cookie::SameSite {
        match self.same_site {
            SameSite::Strict => cookie::SameSite::Strict,
            SameSite::Lax => cookie::SameSite::Lax,
            SameSite::None => cookie::SameSite::None,
        }
    }
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for CookiePolicy {
    fn from(config: &SessionConfig) -> Self {
        Self {
            secure: config.secure,
            same_site: config.same_site,
            max_age_secs: (config.max_age_secs > 0).then_some(config.max_age_secs),
        }
    }
}

/// Cookie jar for one request.
#[derive(Debug, Clone)]
pub struct HeaderCookieJar {
    jar: cookie::CookieJar,
    policy: CookiePolicy,
}

impl HeaderCookieJar {
    /// Parses every `Cookie` header. When a name repeats, the first
    /// occurrence wins; unparsable pairs are skipped.
    pub fn from_headers(headers: &HeaderMap, policy: CookiePolicy) -> Self {
        let mut jar = cookie::CookieJar::new();
        for value in headers.get_all(header::COOKIE) {
            let Ok(value) = value.to_str() else {
                continue;
            };
            for parsed in Cookie::split_parse_encoded(value).flatten() {
                if jar.get(parsed.name()).is_none() {
                    jar.add_original(parsed.into_owned());
                }
            }
        }

        Self { jar, policy }
    }

    pub fn has_changes(&self) -> bool {
        self.jar.delta().next().is_some()
    }

    /// One encoded `Set-Cookie` value per changed cookie.
    pub fn set_cookie_headers(&self) -> Result<Vec<HeaderValue>, InvalidHeaderValue> {
        self.jar
            .delta()
            .map(|cookie| HeaderValue::from_str(&cookie.encoded().to_string()))
            .collect()
    }

    /// Appends the jar's changes to `headers`, skipping any cookie that
    /// `headers` already sets.
    pub fn write_to(&self, headers: &mut HeaderMap) -> Result<(), InvalidHeaderValue> {
        let already_set: Vec<String> = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| Cookie::parse_encoded(value).ok())
            .map(|cookie| cookie.name().to_string())
            .collect();

        for cookie in self.jar.delta() {
            if already_set.iter().any(|name| name == cookie.name()) {
                continue;
            }
            let value = HeaderValue::from_str(&cookie.encoded().to_string())?;
            headers.append(header::SET_COOKIE, value);
        }
        Ok(())
    }
}

impl CookieJar for HeaderCookieJar {
    fn get(&self, name: &str) -> Option<String> {
        self.jar
            .get(name)
            .map(|cookie| cookie.value_trimmed().to_string())
    }

    fn set(&mut self, name: &str, value: &str) {
        self.jar.add(self.policy.build(name, value));
    }

    fn delete(&mut self, name: &str) {
        // The removal cookie must carry the same path the cookie was set with.
        self.jar.remove(self.policy.build(name, ""));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jar(cookie: &str) -> HeaderCookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        HeaderCookieJar::from_headers(&headers, CookiePolicy::default())
    }

    fn written(jar: &HeaderCookieJar) -> Vec<String> {
        jar.set_cookie_headers()
            .unwrap()
            .into_iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn parses_multiple_pairs() {
        let jar = jar("theme=dark; user-token=ada; lang=en");

        assert_eq!(jar.get("user-token"), Some("ada".to_string()));
        assert_eq!(jar.get("theme"), Some("dark".to_string()));
        assert_eq!(jar.get("missing"), None);
    }

    #[test]
    fn strips_quotes_and_ignores_malformed_pairs() {
        let jar = jar("junk; user-token=\"ada\"; =nameless");

        assert_eq!(jar.get("user-token"), Some("ada".to_string()));
        assert_eq!(jar.get(""), None);
    }

    #[test]
    fn first_duplicate_wins() {
        let jar = jar("user-token=first; user-token=second");

        assert_eq!(jar.get("user-token"), Some("first".to_string()));
    }

    #[test]
    fn reads_across_multiple_cookie_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::COOKIE, HeaderValue::from_static("user-token=ada"));

        let jar = HeaderCookieJar::from_headers(&headers, CookiePolicy::default());

        assert_eq!(jar.get("user-token"), Some("ada".to_string()));
    }

    #[test]
    fn decodes_percent_encoded_values() {
        let jar = jar("user-token=ada%3Blovelace");

        assert_eq!(jar.get("user-token"), Some("ada;lovelace".to_string()));
    }

    #[test]
    fn unchanged_jar_emits_no_headers() {
        let jar = jar("user-token=ada");

        assert!(!jar.has_changes());
        assert!(written(&jar).is_empty());
    }

    #[test]
    fn delete_hides_cookie_and_emits_expiry() {
        let mut jar = jar("user-token=ghost");

        jar.delete("user-token");

        assert_eq!(jar.get("user-token"), None);
        let headers = written(&jar);
        assert_eq!(headers.len(), 1);
        assert!(headers[0].starts_with("user-token=;"));
        assert!(headers[0].contains("Max-Age=0"));
        assert!(headers[0].contains("Path=/"));
    }

    #[test]
    fn deleting_an_absent_cookie_writes_nothing() {
        let mut jar = jar("theme=dark");

        jar.delete("user-token");

        assert!(!jar.has_changes());
    }

    #[test]
    fn last_change_per_cookie_wins() {
        let mut jar = jar("user-token=ada");

        jar.set("user-token", "grace");
        jar.delete("user-token");
        jar.set("user-token", "hopper");

        assert_eq!(jar.get("user-token"), Some("hopper".to_string()));
        assert_eq!(written(&jar).len(), 1);
    }

    #[test]
    fn separators_in_values_are_encoded() {
        let mut outgoing = jar("");

        outgoing.set("user-token", "ada;Path=/admin");

        let headers = written(&outgoing);
        assert_eq!(headers.len(), 1);
        assert!(!headers[0].contains("Path=/admin"));
        assert!(!headers[0].starts_with("user-token=ada;"));

        // The encoded value reads back unchanged on the next request.
        let cookie_pair = headers[0].split(';').next().unwrap();
        assert_eq!(
            jar(cookie_pair).get("user-token"),
            Some("ada;Path=/admin".to_string())
        );
    }

    #[test]
    fn set_applies_policy_attributes() {
        let policy = CookiePolicy {
            secure: true,
            same_site: SameSite::Strict,
            max_age_secs: Some(3600),
        };
        let mut jar = HeaderCookieJar::from_headers(&HeaderMap::new(), policy);

        jar.set("user-token", "ada");

        let header = &written(&jar)[0];
        assert!(header.starts_with("user-token=ada"));
        for attribute in ["HttpOnly", "SameSite=Strict", "Secure", "Path=/", "Max-Age=3600"] {
            assert!(header.contains(attribute), "missing {} in {}", attribute, header);
        }
    }

    #[test]
    fn zero_max_age_writes_session_cookie() {
        let config = SessionConfig {
            max_age_secs: 0,
            ..SessionConfig::default()
        };
        let policy = CookiePolicy::from(&config);
        let mut jar = HeaderCookieJar::from_headers(&HeaderMap::new(), policy.clone());

        jar.set("user-token", "ada");

        assert_eq!(policy.max_age_secs, None);
        assert!(!written(&jar)[0].contains("Max-Age"));
    }

    #[test]
    fn write_to_appends_every_change() {
        let mut jar = jar("user-token=ada; theme=dark");
        jar.delete("user-token");
        jar.set("theme", "light");
        let mut headers = HeaderMap::new();

        jar.write_to(&mut headers).unwrap();

        assert_eq!(headers.get_all(header::SET_COOKIE).iter().count(), 2);
    }

    #[test]
    fn write_to_leaves_cookies_the_response_already_sets() {
        let mut stale = jar("user-token=ghost");
        stale.delete("user-token");
        let mut headers = HeaderMap::new();
        headers.append(
            header::SET_COOKIE,
            HeaderValue::from_static("user-token=ada; Path=/; HttpOnly"),
        );

        stale.write_to(&mut headers).unwrap();

        let values: Vec<_> = headers.get_all(header::SET_COOKIE).iter().collect();
        assert_eq!(values, vec![HeaderValue::from_static("user-token=ada; Path=/; HttpOnly")]);
    }
}
