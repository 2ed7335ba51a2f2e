//! SSO Page Parsing
//!
//! SSOサインインページからCSRFトークンとサービスチケットを取り出す

use regex::Regex;
use std::sync::LazyLock;

use crate::domain::errors::WellnessError;

static CSRF_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"name="_csrf"\s+value="([^"]+)""#).unwrap());
static TICKET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"ticket=([^"&\\\s]+)"#).unwrap());
static TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<title>\s*(.*?)\s*</title>").unwrap());

fn capture(re: &Regex, html: &str) -> Option<String> {
    re.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// サインインフォームのCSRFトークン
pub fn extract_csrf(html: &str) -> Option<String> {
    capture(&CSRF_REGEX, html)
}

/// サインイン成功ページに埋め込まれたサービスチケット
pub fn extract_ticket(html: &str) -> Option<String> {
    capture(&TICKET_REGEX, html)
}

pub fn extract_title(html: &str) -> Option<String> {
    capture(&TITLE_REGEX, html)
}

/// サインイン結果ページからチケットを取り出す
///
/// # Errors
///
/// MFAを要求された場合、またはチケットが見つからない場合に
/// `WellnessError::Authentication` を返す
pub fn ticket_from_signin(html: &str) -> Result<String, WellnessError> {
    let title = extract_title(html);

    if title.as_deref().is_some_and(|t| t.contains("MFA")) {
        return Err(WellnessError::Authentication(
            "multi-factor authentication is not supported".to_string(),
        ));
    }

    extract_ticket(html).ok_or_else(|| {
        WellnessError::Authentication(format!(
            "no service ticket in sign-in response (page title: {})",
            title.as_deref().unwrap_or("none")
        ))
    })
}
