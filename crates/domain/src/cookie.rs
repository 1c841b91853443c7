//! Cookie simulation types.
//!
//! The jar here is a deliberately simplified simulation for a testing
//! tool: matching is domain-substring only, with no path, scheme, or
//! expiry checks. It is not RFC 6265 compliant and is not presented as
//! such.

use serde::{Deserialize, Serialize};

/// A single simulated cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// Domain the cookie belongs to.
    pub domain: String,
    /// Path the cookie applies to (unused by matching).
    #[serde(default = "default_path")]
    pub path: String,
    /// Expiration, as an opaque user-entered string (unused by matching).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
}

fn default_path() -> String {
    "/".to_string()
}

impl Cookie {
    /// Creates a new cookie with the default `/` path.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: default_path(),
            expires: None,
        }
    }

    /// Returns true if this cookie matches the given hostname.
    ///
    /// A cookie matches when its domain is a substring of the hostname,
    /// so `example.com` matches both `example.com` and
    /// `api.example.com`. Not public-suffix aware.
    #[must_use]
    pub fn matches_host(&self, hostname: &str) -> bool {
        hostname.contains(&self.domain)
    }

    /// Formats this cookie as a `name=value` pair.
    #[must_use]
    pub fn to_pair(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// A flat list of simulated cookies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CookieJar {
    cookies: Vec<Cookie>,
}

impl CookieJar {
    /// Creates an empty jar.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cookies: Vec::new(),
        }
    }

    /// Adds a cookie to the jar.
    pub fn add(&mut self, cookie: Cookie) {
        self.cookies.push(cookie);
    }

    /// Returns all cookies.
    #[must_use]
    pub fn all(&self) -> &[Cookie] {
        &self.cookies
    }

    /// Replaces the jar contents.
    pub fn replace(&mut self, cookies: Vec<Cookie>) {
        self.cookies = cookies;
    }

    /// Returns cookies matching the given hostname.
    pub fn matching(&self, hostname: &str) -> impl Iterator<Item = &Cookie> {
        self.cookies.iter().filter(move |c| c.matches_host(hostname))
    }

    /// Builds a `Cookie` header value for the given hostname.
    ///
    /// Returns `None` when no cookies match, so the header can be
    /// omitted entirely.
    #[must_use]
    pub fn header_for(&self, hostname: &str) -> Option<String> {
        let pairs: Vec<String> = self.matching(hostname).map(Cookie::to_pair).collect();
        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        }
    }

    /// Returns the number of cookies in the jar.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Returns true if the jar is empty.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

impl FromIterator<Cookie> for CookieJar {
    fn from_iter<T: IntoIterator<Item = Cookie>>(iter: T) -> Self {
        Self {
            cookies: iter.into_iter().collect(),
        }
    }
}
