// SPDX-FileCopyrightText: 2026 Portcullis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use axum::response::Redirect;
use portcullis_security::{sterilize, UNSAFE_LINK};

/// Redirect to `target` if it is safe to follow, otherwise to `#`.
///
/// Targets with ASCII control characters are refused here: browsers drop tab
/// and newline while parsing a `Location`, which turns `/\t/evil.com` into
/// `//evil.com`, and such bytes are not valid in a header value anyway.
pub fn safe_redirect(target: Option<&str>) -> Redirect {
    match target {
        Some(raw) if raw.chars().any(|c| c.is_ascii_control()) => {
            tracing::debug!(len = raw.len(), "redirect target with control characters rejected");
            Redirect::to(UNSAFE_LINK)
        }
        _ => Redirect::to(&sterilize(target)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::LOCATION, StatusCode};
    use axum::response::IntoResponse;

    fn location(redirect: Redirect) -> (StatusCode, String) {
        let response = redirect.into_response();
        let location = response.headers()[LOCATION].to_str().unwrap().to_string();
        (response.status(), location)
    }

    #[test]
    fn safe_target_is_kept() {
        assert_eq!(
            location(safe_redirect(Some("/account"))),
            (StatusCode::SEE_OTHER, "/account".to_string())
        );
    }

    #[test]
    fn control_characters_become_sentinel() {
        for target in ["/\t/evil.com", "/a\nb", "/a\r\nSet-Cookie: x=1", "/\u{7f}"] {
            assert_eq!(
                location(safe_redirect(Some(target))),
                (StatusCode::SEE_OTHER, "#".to_string()),
                "{target:?}"
            );
        }
    }

    #[test]
    fn unsafe_target_becomes_sentinel() {
        assert_eq!(location(safe_redirect(Some("//evil.com"))).1, "#");
        assert_eq!(location(safe_redirect(None)).1, "#");
    }
}
