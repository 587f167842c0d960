// SPDX-FileCopyrightText: 2026 Portcullis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plain validation predicates.
//!
//! Called explicitly by the code that needs them, typically config
//! validation and request handlers.

use uuid::Uuid;

/// `true` unless the UUID is the nil UUID.
pub fn is_not_empty_uuid(value: &Uuid) -> bool {
    !value.is_nil()
}

/// `true` unless the value equals its type's `Default`.
pub fn is_not_default<T: Default + PartialEq>(value: &T) -> bool {
    *value != T::default()
}

/// `true` when the string has at least one non-whitespace character.
pub fn is_not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// `true` when every byte is an RFC 7230 `tchar` and the string is non-empty.
pub fn is_http_token(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(is_tchar)
}

/// `true` for a usable HTTP header name no longer than `max_len` characters.
pub fn is_valid_header_name(value: &str, max_len: usize) -> bool {
    value.len() <= max_len && is_http_token(value)
}

fn is_tchar(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#'
                | b'$'
                | b'%'
                | b'&'
                | b'\''
                | b'*'
                | b'+'
                | b'-'
                | b'.'
                | b'^'
                | b'_'
                | b'`'
                | b'|'
                | b'~'
        )
}
