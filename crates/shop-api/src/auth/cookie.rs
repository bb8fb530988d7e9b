//! 인증 쿠키 처리.
//!
//! 요청의 `Cookie` 헤더에서 토큰을 꺼내고, 로그인/로그아웃 응답에 사용할
//! `Set-Cookie` 값을 생성합니다.

use axum::http::{header::COOKIE, HeaderMap, HeaderValue};
use shop_core::CookieConfig;

/// 요청 헤더에서 이름이 `name`인 쿠키 값을 찾습니다.
///
/// 여러 `Cookie` 헤더가 있으면 순서대로 검사합니다. 값이 빈 쿠키는 없는 것으로 봅니다.
pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|s| s.split(';'))
        .filter_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key.trim() == name).then(|| value.trim().to_string())
        })
        .find(|value| !value.is_empty())
}

/// 로그인 성공 시 설정할 인증 쿠키.
///
/// `HttpOnly`, `SameSite=Strict`, `Path=/`에 도메인을 지정하며 토큰과 같은 수명을 가집니다.
pub fn auth_cookie(
    config: &CookieConfig,
    token: &str,
    max_age_secs: i64,
) -> Result<HeaderValue, axum::http::header::InvalidHeaderValue> {
    let mut cookie = format!(
        "{}={}; Domain={}; Path=/; Max-Age={}; HttpOnly; SameSite=Strict",
        config.name, token, config.domain, max_age_secs
    );
    if config.secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// 로그아웃 시 인증 쿠키를 만료시키는 값.
pub fn clear_auth_cookie(
    config: &CookieConfig,
) -> Result<HeaderValue, axum::http::header::InvalidHeaderValue> {
    auth_cookie(config, "", 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(values: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for value in values {
            map.append(COOKIE, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_parse_single_cookie() {
        let map = headers(&["token=abc.def.ghi"]);
        assert_eq!(parse_cookie(&map, "token"), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn test_parse_among_many() {
        let map = headers(&["theme=dark; token=t1; lang=ko"]);
        assert_eq!(parse_cookie(&map, "token"), Some("t1".to_string()));
        assert_eq!(parse_cookie(&map, "lang"), Some("ko".to_string()));
    }

    #[test]
    fn test_parse_multiple_headers() {
        let map = headers(&["theme=dark", "token=t2"]);
        assert_eq!(parse_cookie(&map, "token"), Some("t2".to_string()));
    }

    #[test]
    fn test_missing_or_empty_cookie() {
        assert_eq!(parse_cookie(&HeaderMap::new(), "token"), None);
        assert_eq!(parse_cookie(&headers(&["tokenx=1"]), "token"), None);
        assert_eq!(parse_cookie(&headers(&["token="]), "token"), None);
    }

    #[test]
    fn test_auth_cookie_attributes() {
        let config = CookieConfig::default();
        let value = auth_cookie(&config, "jwt", 3600).unwrap();
        let s = value.to_str().unwrap();

        assert!(s.starts_with("token=jwt;"));
        assert!(s.contains("Domain=localhost"));
        assert!(s.contains("Path=/"));
        assert!(s.contains("Max-Age=3600"));
        assert!(s.contains("HttpOnly"));
        assert!(s.contains("SameSite=Strict"));
        assert!(!s.contains("Secure"));
    }

    #[test]
    fn test_secure_and_clear_cookie() {
        let config = CookieConfig {
            secure: true,
            ..CookieConfig::default()
        };
        assert!(auth_cookie(&config, "jwt", 60)
            .unwrap()
            .to_str()
            .unwrap()
            .ends_with("; Secure"));

        let cleared = clear_auth_cookie(&config).unwrap();
        assert!(cleared.to_str().unwrap().starts_with("token=;"));
        assert!(cleared.to_str().unwrap().contains("Max-Age=0"));
    }
}
