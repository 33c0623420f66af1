// ABOUTME: Session token generation — opaque "sess_" + base36 identifiers.
// ABOUTME: A fresh token is issued on first load and whenever the conversation is cleared.

use rand::Rng;

pub const SESSION_PREFIX: &str = "sess_";
const SUFFIX_LEN: usize = 8;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a new random session token.
pub fn generate_session_id() -> String {
    generate_session_id_with(&mut rand::thread_rng())
}

/// Generate a session token from the given RNG.
pub fn generate_session_id_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}{}", SESSION_PREFIX, suffix)
}

/// Generate a token guaranteed to differ from `previous`.
pub fn next_session_id(previous: &str) -> String {
    loop {
        let candidate = generate_session_id();
        if candidate != previous {
            return candidate;
        }
    }
}

/// Whether a stored value looks like a usable session token.
pub fn is_valid_session_id(value: &str) -> bool {
    !value.trim().is_empty()
}
