//! `Set-Cookie` parsing.
//!
//! Only the attributes a caller is likely to inspect are split out; the
//! client keeps no cookie jar and never sends cookies back on its own.

/// A cookie received in a `Set-Cookie` response header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: Option<String>,
    pub domain: Option<String>,
    /// Raw `Expires` attribute, unparsed.
    pub expires: Option<String>,
    /// `Max-Age` in seconds as sent. Zero or negative asks the client to
    /// drop the cookie; see [`Cookie::is_removal`].
    pub max_age: Option<i64>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: Option<String>,
}

impl Cookie {
    /// Parse one `Set-Cookie` header value. Returns `None` when the
    /// `name=value` pair is missing or the name is empty.
    pub fn parse(header: &str) -> Option<Cookie> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut cookie = Cookie {
            name: name.to_string(),
            value: unquote(value.trim()).to_string(),
            ..Cookie::default()
        };

        for attr in parts {
            let (key, val) = match attr.split_once('=') {
                Some((k, v)) => (k.trim(), Some(v.trim())),
                None => (attr.trim(), None),
            };
            match (key.to_ascii_lowercase().as_str(), val) {
                ("path", Some(v)) => cookie.path = Some(v.to_string()),
                ("domain", Some(v)) => {
                    cookie.domain = Some(v.trim_start_matches('.').to_string())
                }
                ("expires", Some(v)) => cookie.expires = Some(v.to_string()),
                ("max-age", Some(v)) => cookie.max_age = v.parse().ok(),
                ("samesite", Some(v)) => cookie.same_site = Some(v.to_string()),
                ("secure", _) => cookie.secure = true,
                ("httponly", _) => cookie.http_only = true,
                _ => {}
            }
        }

        Some(cookie)
    }

    /// True when the server is deleting this cookie (`Max-Age` of zero or
    /// less).
    pub fn is_removal(&self) -> bool {
        self.max_age.is_some_and(|secs| secs <= 0)
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
