//! One-shot banner messages. A redirect stores the message in a short-lived
//! cookie; the next page that renders reads it and clears the cookie.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

const COOKIE_NAME: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Banner style. The name doubles as the CSS class suffix (`alert-success`).
pub enum FlashLevel {
    Success,
    Danger,
}

impl FlashLevel {
    /// Lowercase name used in markup and in the cookie.
    pub fn as_str(self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A message shown once, on the next page that renders.
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    /// Green banner for a completed action.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    /// Red banner for a rejected or failed action.
    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Danger,
            message: message.into(),
        }
    }

    /// `Set-Cookie` header carrying this message to the next request.
    /// Form-encoding keeps the value free of separators a cookie cannot hold.
    pub fn to_cookie(&self) -> (axum::http::HeaderName, HeaderValue) {
        let value = serde_urlencoded::to_string(self).unwrap_or_default();
        let cookie = format!("{COOKIE_NAME}={value}; Path=/; Max-Age=60; HttpOnly; SameSite=Lax");
        (
            SET_COOKIE,
            HeaderValue::from_str(&cookie).unwrap_or_else(|_| clear_value()),
        )
    }

    /// Read the pending message from the request cookies, if any.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == COOKIE_NAME)
            .and_then(|(_, value)| serde_urlencoded::from_str(value).ok())
    }
}

/// `Set-Cookie` header that drops a consumed message.
pub fn clear_cookie() -> (axum::http::HeaderName, HeaderValue) {
    (SET_COOKIE, clear_value())
}

fn clear_value() -> HeaderValue {
    HeaderValue::from_static("flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_carries_the_message_to_the_next_request() {
        let flash = Flash::success("Bill #7 successfully added!");
        let (_, set_cookie) = flash.to_cookie();
        let pair = set_cookie.to_str().unwrap().split(';').next().unwrap().to_string();

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {pair}")).unwrap(),
        );
        assert_eq!(Flash::from_headers(&headers), Some(flash));
    }

    #[test]
    fn missing_or_garbled_cookie_is_ignored() {
        let mut headers = HeaderMap::new();
        assert_eq!(Flash::from_headers(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("flash=level=purple"));
        assert_eq!(Flash::from_headers(&headers), None);
    }
}
