//! Auth and cookie header builders

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqatlas_domain::{AuthConfig, CookieJar, Environment};
use url::Url;

use crate::resolver::resolve;

/// Builds the `Authorization` header value for a request, resolving
/// `{{var}}` tokens in the credential fields first.
///
/// Returns `None` for [`AuthConfig::None`]. `OAuth2` tokens are
/// user-supplied and treated identically to bearer tokens on the wire.
#[must_use]
pub fn authorization_header(auth: &AuthConfig, env: Option<&Environment>) -> Option<String> {
    match auth {
        AuthConfig::None => None,
        AuthConfig::Basic { username, password } => {
            let user = resolve(username, env);
            let pass = resolve(password, env);
            let encoded = BASE64.encode(format!("{user}:{pass}"));
            Some(format!("Basic {encoded}"))
        }
        AuthConfig::Bearer { token } => Some(format!("Bearer {}", resolve(token, env))),
        AuthConfig::OAuth2 { access_token } => {
            Some(format!("Bearer {}", resolve(access_token, env)))
        }
    }
}

/// Extracts the hostname from a URL, failing open.
///
/// An unparsable URL yields an empty hostname rather than an error, so
/// cookie matching degrades to "no matches" instead of blocking the
/// send.
#[must_use]
pub fn url_hostname(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}

/// Builds the `Cookie` header value for a resolved request URL.
///
/// Every stored cookie whose domain is a substring of the URL hostname
/// is included as a `name=value` pair joined with `; `. Returns `None`
/// when nothing matches so the header is omitted entirely.
#[must_use]
pub fn cookie_header(resolved_url: &str, jar: &CookieJar) -> Option<String> {
    let hostname = url_hostname(resolved_url);
    jar.header_for(&hostname)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqatlas_domain::{Cookie, EnvVariable};

    #[test]
    fn test_none_has_no_header() {
        assert_eq!(authorization_header(&AuthConfig::None, None), None);
    }

    #[test]
    fn test_basic_round_trips_through_base64() {
        let header = authorization_header(&AuthConfig::basic("alice", "s3cret"), None).unwrap();
        let encoded = header.strip_prefix("Basic ").unwrap();
        let decoded = BASE64.decode(encoded).unwrap();
        assert_eq!(decoded, b"alice:s3cret");
    }

    #[test]
    fn test_basic_resolves_credentials() {
        let mut env = Environment::new("dev");
        env.push_variable(EnvVariable::new("user", "alice"));
        env.push_variable(EnvVariable::new("pass", "pw"));

        let auth = AuthConfig::basic("{{user}}", "{{pass}}");
        let header = authorization_header(&auth, Some(&env)).unwrap();
        let encoded = header.strip_prefix("Basic ").unwrap();
        assert_eq!(BASE64.decode(encoded).unwrap(), b"alice:pw");
    }

    #[test]
    fn test_bearer_and_oauth2_identical_on_wire() {
        let mut env = Environment::new("dev");
        env.push_variable(EnvVariable::new("token", "tok-123"));

        let bearer = authorization_header(&AuthConfig::bearer("{{token}}"), Some(&env));
        let oauth2 = authorization_header(&AuthConfig::oauth2("{{token}}"), Some(&env));
        assert_eq!(bearer.as_deref(), Some("Bearer tok-123"));
        assert_eq!(bearer, oauth2);
    }

    #[test]
    fn test_hostname_fails_open() {
        assert_eq!(url_hostname("https://api.example.com/users"), "api.example.com");
        assert_eq!(url_hostname("not a url"), "");
    }

    #[test]
    fn test_cookie_header_substring_matching() {
        let jar: CookieJar = [
            Cookie::new("session", "abc", "example.com"),
            Cookie::new("other", "x", "example.org"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            cookie_header("https://api.example.com/v1", &jar),
            Some("session=abc".to_string())
        );
        assert_eq!(cookie_header("https://unrelated.net", &jar), None);
    }

    #[test]
    fn test_cookie_header_none_for_bad_url() {
        let jar: CookieJar = [Cookie::new("session", "abc", "example.com")]
            .into_iter()
            .collect();
        assert_eq!(cookie_header("::::", &jar), None);
    }
}
