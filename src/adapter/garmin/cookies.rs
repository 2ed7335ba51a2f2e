//! Cookie Jar
//!
//! SSO と Connect のセッションクッキーを保持する最小限のクッキージャー
//!
//! クッキーはドメインごとに保持する。`Domain` 属性が無いものは受信したホスト限定、
//! あるものはサブドメインにも送る。パスは区別しない（Garmin のクッキーは `Path=/`）。

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use reqwest::header::{HeaderMap, SET_COOKIE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `Expires` 属性として受け付ける日付形式（RFC 1123 / Java・CASのダッシュ形式 / RFC 850）
const EXPIRES_FORMATS: [&str; 3] = [
    "%a, %d %b %Y %H:%M:%S GMT",
    "%a, %d-%b-%Y %H:%M:%S GMT",
    "%A, %d-%b-%y %H:%M:%S GMT",
];

/// ドメインキー → (名前 → 値)
///
/// ドメインキーは `Domain` 属性由来なら先頭に `.` を付ける
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CookieJar(BTreeMap<String, BTreeMap<String, String>>);

fn parse_expires(value: &str) -> Option<DateTime<Utc>> {
    EXPIRES_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value.trim(), format).ok())
        .map(|naive| naive.and_utc())
}

/// 属性から失効時刻を求める（`Max-Age` が `Expires` より優先）
fn expiry(attrs: &[(String, String)], now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let max_age = attrs
        .iter()
        .find(|(name, _)| name == "max-age")
        .and_then(|(_, value)| value.trim().parse::<i64>().ok());
    if let Some(seconds) = max_age {
        if seconds <= 0 {
            return Some(now);
        }
        return Duration::try_seconds(seconds).and_then(|ttl| now.checked_add_signed(ttl));
    }

    attrs
        .iter()
        .find(|(name, _)| name == "expires")
        .and_then(|(_, value)| parse_expires(value))
}

fn domain_matches(key: &str, host: &str) -> bool {
    match key.strip_prefix('.') {
        Some(domain) => host == domain || host.ends_with(key),
        None => host == key,
    }
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// レスポンスヘッダーの Set-Cookie をすべて取り込む
    ///
    /// `host` はレスポンスを返したホスト
    pub fn absorb(&mut self, host: &str, headers: &HeaderMap) {
        let now = Utc::now();
        for value in headers.get_all(SET_COOKIE) {
            if let Ok(set_cookie) = value.to_str() {
                self.absorb_set_cookie(host, set_cookie, now);
            }
        }
    }

    /// Set-Cookie ヘッダー1行を取り込む
    ///
    /// 値が空、または `now` 時点で失効済みのクッキーは削除する
    pub fn absorb_set_cookie(&mut self, host: &str, set_cookie: &str, now: DateTime<Utc>) {
        let mut parts = set_cookie.split(';');
        let Some((name, value)) = parts.next().and_then(|pair| pair.split_once('=')) else {
            return;
        };
        let name = name.trim();
        let value = value.trim().trim_matches('"');
        if name.is_empty() {
            return;
        }

        let attrs: Vec<(String, String)> = parts
            .map(|attr| match attr.split_once('=') {
                Some((k, v)) => (k.trim().to_ascii_lowercase(), v.trim().to_string()),
                None => (attr.trim().to_ascii_lowercase(), String::new()),
            })
            .collect();

        let domain = attrs
            .iter()
            .find(|(k, v)| k == "domain" && !v.is_empty())
            .map(|(_, v)| format!(".{}", v.trim_start_matches('.').to_ascii_lowercase()))
            .unwrap_or_else(|| host.to_ascii_lowercase());

        let expired = expiry(&attrs, now).is_some_and(|at| at <= now);

        if expired || value.is_empty() {
            if let Some(cookies) = self.0.get_mut(&domain) {
                cookies.remove(name);
                if cookies.is_empty() {
                    self.0.remove(&domain);
                }
            }
        } else {
            self.0
                .entry(domain)
                .or_default()
                .insert(name.to_string(), value.to_string());
        }
    }

    /// `host` に送る Cookie リクエストヘッダーの値
    pub fn header_value(&self, host: &str) -> Option<String> {
        let host = host.to_ascii_lowercase();
        let pairs: Vec<String> = self
            .0
            .iter()
            .filter(|(key, _)| domain_matches(key, &host))
            .flat_map(|(_, cookies)| cookies.iter())
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();

        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        }
    }

    /// `host` に送られるクッキーの値
    pub fn get(&self, host: &str, name: &str) -> Option<&str> {
        let host = host.to_ascii_lowercase();
        self.0
            .iter()
            .filter(|(key, _)| domain_matches(key, &host))
            .find_map(|(_, cookies)| cookies.get(name))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use reqwest::header::HeaderValue;

    const SSO: &str = "sso.garmin.com";
    const CONNECT: &str = "connect.garmin.com";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 25, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_absorb_set_cookie_with_attributes() {
        let mut jar = CookieJar::new();
        jar.absorb_set_cookie(SSO, "SESSIONID=abc123; Path=/; Secure; HttpOnly", now());

        assert_eq!(jar.get(SSO, "SESSIONID"), Some("abc123"));
        assert_eq!(jar.len(), 1);
    }

    #[test]
    fn test_absorb_overwrites_existing() {
        let mut jar = CookieJar::new();
        jar.absorb_set_cookie(SSO, "SESSIONID=old", now());
        jar.absorb_set_cookie(SSO, "SESSIONID=new; Path=/", now());

        assert_eq!(jar.get(SSO, "SESSIONID"), Some("new"));
    }

    #[test]
    fn test_max_age_zero_removes_cookie() {
        let mut jar = CookieJar::new();
        jar.absorb_set_cookie(SSO, "CASTGC=ticket", now());
        jar.absorb_set_cookie(SSO, "CASTGC=; Max-Age=0; Path=/", now());

        assert!(jar.get(SSO, "CASTGC").is_none());
        assert!(jar.is_empty());
    }

    #[test]
    fn test_dash_format_epoch_expiry_removes_cookie() {
        let mut jar = CookieJar::new();
        jar.absorb_set_cookie(SSO, "CASTGC=ticket", now());
        jar.absorb_set_cookie(
            SSO,
            "CASTGC=deleted; Expires=Thu, 01-Jan-1970 00:00:10 GMT; Path=/",
            now(),
        );

        assert!(jar.get(SSO, "CASTGC").is_none());
    }

    #[test]
    fn test_past_expiry_date_removes_cookie() {
        let mut jar = CookieJar::new();
        jar.absorb_set_cookie(SSO, "OTHER=value", now());
        jar.absorb_set_cookie(SSO, "OTHER=gone; Expires=Wed, 21 Oct 2015 07:28:00 GMT", now());

        assert!(jar.get(SSO, "OTHER").is_none());
        assert!(jar.is_empty());
    }

    #[test]
    fn test_future_expiry_keeps_cookie() {
        let mut jar = CookieJar::new();
        jar.absorb_set_cookie(
            SSO,
            "GARMIN-SSO=1; Expires=Fri, 31-Dec-2099 23:59:59 GMT",
            now(),
        );
        jar.absorb_set_cookie(SSO, "TTL=1; Max-Age=3600", now());

        assert_eq!(jar.get(SSO, "GARMIN-SSO"), Some("1"));
        assert_eq!(jar.get(SSO, "TTL"), Some("1"));
    }

    #[test]
    fn test_max_age_takes_precedence_over_expires() {
        let mut jar = CookieJar::new();
        jar.absorb_set_cookie(
            SSO,
            "A=1; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=60",
            now(),
        );

        assert_eq!(jar.get(SSO, "A"), Some("1"));
    }

    #[test]
    fn test_malformed_cookie_is_ignored() {
        let mut jar = CookieJar::new();
        jar.absorb_set_cookie(SSO, "no-equals-sign", now());
        jar.absorb_set_cookie(SSO, "=value", now());

        assert!(jar.is_empty());
    }

    #[test]
    fn test_host_only_cookies_do_not_collide() {
        let mut jar = CookieJar::new();
        jar.absorb_set_cookie(SSO, "SESSIONID=sso", now());
        jar.absorb_set_cookie(CONNECT, "SESSIONID=connect", now());

        assert_eq!(jar.get(SSO, "SESSIONID"), Some("sso"));
        assert_eq!(jar.get(CONNECT, "SESSIONID"), Some("connect"));
        assert_eq!(jar.len(), 2);
        assert_eq!(jar.header_value(CONNECT).unwrap(), "SESSIONID=connect");
    }

    #[test]
    fn test_domain_cookie_is_shared_with_subdomains() {
        let mut jar = CookieJar::new();
        jar.absorb_set_cookie(SSO, "GARMIN-SSO=1; Domain=.garmin.com; Path=/", now());

        assert_eq!(jar.get(CONNECT, "GARMIN-SSO"), Some("1"));
        assert_eq!(jar.get("garmin.com", "GARMIN-SSO"), Some("1"));
        assert!(jar.get("notgarmin.com", "GARMIN-SSO").is_none());
    }

    #[test]
    fn test_header_value() {
        let mut jar = CookieJar::new();
        assert!(jar.header_value(SSO).is_none());

        jar.absorb_set_cookie(SSO, "b=2", now());
        jar.absorb_set_cookie(SSO, "a=1", now());
        assert_eq!(jar.header_value(SSO).unwrap(), "a=1; b=2");
        assert!(jar.header_value(CONNECT).is_none());
    }

    #[test]
    fn test_absorb_headers() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("SESSIONID=abc; Path=/"));
        headers.append(SET_COOKIE, HeaderValue::from_static("GARMIN-SSO=1; Domain=.garmin.com"));

        let mut jar = CookieJar::new();
        jar.absorb(SSO, &headers);

        assert_eq!(jar.len(), 2);
        assert_eq!(jar.get(SSO, "GARMIN-SSO"), Some("1"));
    }

    #[test]
    fn test_serializes_by_domain() {
        let mut jar = CookieJar::new();
        jar.absorb_set_cookie(SSO, "SESSIONID=abc", now());
        jar.absorb_set_cookie(SSO, "GARMIN-SSO=1; Domain=garmin.com", now());

        let value = serde_json::to_value(&jar).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                ".garmin.com": {"GARMIN-SSO": "1"},
                "sso.garmin.com": {"SESSIONID": "abc"},
            })
        );
    }
}
