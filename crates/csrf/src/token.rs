use rand::Rng;

/// Compare two tokens in constant time.
///
/// Length is checked up front; a length-only timing leak is accepted. The
/// byte comparison itself always walks both strings end to end, so its cost
/// does not depend on where the first difference sits.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (a_byte, b_byte) in a.bytes().zip(b.bytes()) {
        result |= a_byte ^ b_byte;
    }
    result == 0
}

/// Validate a supplied CSRF token against the token stored in the session.
///
/// Absent or empty on either side fails: there is no anonymous pass-through
/// for mutating requests. Neither token is ever mutated or rotated here.
pub fn validate(session_token: Option<&str>, supplied: Option<&str>) -> bool {
    let (session_token, supplied) = match (session_token, supplied) {
        (Some(s), Some(p)) => (s, p),
        _ => return false,
    };

    if session_token.is_empty() || supplied.is_empty() {
        return false;
    }

    constant_time_eq(session_token, supplied)
}

/// Generate a fresh CSRF token: 32 random bytes, hex-encoded.
pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    hex::encode(bytes)
}
