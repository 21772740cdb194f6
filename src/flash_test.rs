use super::*;

// =============================================================================
// hex helpers
// =============================================================================

#[test]
fn bytes_to_hex_leading_zero() {
    assert_eq!(bytes_to_hex(&[0x0a, 0xff]), "0aff");
}

#[test]
fn hex_to_bytes_rejects_odd_length() {
    assert_eq!(hex_to_bytes("abc"), None);
}

#[test]
fn hex_to_bytes_rejects_non_hex() {
    assert_eq!(hex_to_bytes("zz"), None);
}

#[test]
fn hex_to_bytes_empty_is_empty() {
    assert_eq!(hex_to_bytes(""), Some(Vec::new()));
}

// =============================================================================
// Toast encoding
// =============================================================================

#[test]
fn encoded_toast_is_cookie_safe() {
    let toast = Toast::error("Invalid email; or \"password\"");
    let encoded = toast.encode();
    assert!(encoded.starts_with("error:"));
    assert!(encoded.chars().all(|c| c.is_ascii_alphanumeric() || c == ':'));
}

#[test]
fn decode_restores_unicode_message() {
    let toast = Toast::success("Bienvenue, Zoë");
    assert_eq!(Toast::decode(&toast.encode()), Some(toast));
}

#[test]
fn decode_unknown_kind_is_none() {
    assert_eq!(Toast::decode("warning:6869"), None);
}

#[test]
fn decode_missing_separator_is_none() {
    assert_eq!(Toast::decode("success"), None);
}

// =============================================================================
// push / take
// =============================================================================

#[test]
fn push_then_take_yields_toast() {
    let jar = push(CookieJar::new(), &Toast::success("User has been created"), false);
    let cookie = jar.get(FLASH_COOKIE).unwrap();
    assert_eq!(cookie.max_age(), Some(Duration::seconds(FLASH_MAX_AGE_SECS)));

    let (_, toast) = take(jar);
    assert_eq!(toast, Some(Toast::success("User has been created")));
}

#[test]
fn take_clears_cookie() {
    let jar = push(CookieJar::new(), &Toast::error("nope"), false);
    let (jar, _) = take(jar);
    assert!(jar.get(FLASH_COOKIE).is_none());
}

#[test]
fn take_without_cookie_is_none() {
    let (_, toast) = take(CookieJar::new());
    assert!(toast.is_none());
}
