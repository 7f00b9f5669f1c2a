use crate::auth::AuthError;
use base64::{Engine, engine::general_purpose::URL_SAFE};
use rand::{TryRngCore, rngs::OsRng};

/// Random bytes behind each OAuth state value
pub const OAUTH_STATE_BYTES: usize = 32;

/// Generate an unguessable state value: 32 bytes from the OS RNG, URL-safe base64
pub fn generate_state() -> Result<String, AuthError> {
    let mut bytes = [0u8; OAUTH_STATE_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AuthError::LoginInitiation {
            cause: format!("OS random source failed: {}", e),
        })?;

    Ok(URL_SAFE.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_shape() {
        let state = generate_state().unwrap();
        // 32 bytes -> 44 padded base64 characters
        assert_eq!(state.len(), 44);
        assert!(!state.contains('+') && !state.contains('/'));
        assert_eq!(URL_SAFE.decode(&state).unwrap().len(), OAUTH_STATE_BYTES);
    }

    #[test]
    fn test_states_are_unique() {
        let first = generate_state().unwrap();
        let second = generate_state().unwrap();
        assert_ne!(first, second);
    }
}
