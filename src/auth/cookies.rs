use axum::http::{header, HeaderMap};

/// `HttpOnly` session cookie. Lifetime is bounded by the token's own expiry.
pub fn session_cookie(name: &str, token: &str) -> String {
    format!("{}={}; HttpOnly; Path=/", name, token)
}

pub fn clear_session_cookie(name: &str) -> String {
    format!("{}=; HttpOnly; Path=/; Max-Age=0", name)
}

pub fn get_cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let mut split = cookie.splitn(2, '=');
            let key = split.next()?.trim();
            let val = split.next()?.trim();
            if key == name && !val.is_empty() {
                Some(val)
            } else {
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn session_cookie_is_http_only_without_max_age() {
        let cookie = session_cookie("token", "abc");
        assert!(cookie.starts_with("token=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(!cookie.contains("Max-Age"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        assert!(clear_session_cookie("token").contains("Max-Age=0"));
    }

    #[test]
    fn finds_named_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; token=abc.def.ghi; lang=fr"),
        );
        assert_eq!(get_cookie_value(&headers, "token"), Some("abc.def.ghi"));
        assert_eq!(get_cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn empty_cookie_value_counts_as_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("token="));
        assert_eq!(get_cookie_value(&headers, "token"), None);
    }
}
