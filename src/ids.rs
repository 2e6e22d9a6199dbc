use rand::rngs::OsRng;
use rand::RngCore;

/// Length of user, post and like identifiers.
pub const ENTITY_ID_LEN: usize = 8;

/// Length of session tokens.
pub const SESSION_ID_LEN: usize = 16;

const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

// Largest multiple of 62 that fits in a byte. Bytes at or above it are
// rejected so every symbol is equally likely.
const ACCEPT_BELOW: u8 = 248;

/// Generate a random alphanumeric identifier of `len` characters.
///
/// Draws from the operating system's entropy source. Uniqueness is not
/// checked here; callers rely on primary-key constraints for that.
pub fn new_id(len: usize) -> Result<String, rand::Error> {
    let mut id = String::with_capacity(len);
    let mut buf = [0u8; 32];

    while id.len() < len {
        OsRng.try_fill_bytes(&mut buf)?;
        for &b in buf.iter().filter(|&&b| b < ACCEPT_BELOW) {
            if id.len() == len {
                break;
            }
            id.push(CHARSET[usize::from(b) % CHARSET.len()] as char);
        }
    }

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_id_has_requested_length() {
        assert_eq!(new_id(ENTITY_ID_LEN).unwrap().len(), 8);
        assert_eq!(new_id(SESSION_ID_LEN).unwrap().len(), 16);
        assert_eq!(new_id(100).unwrap().len(), 100);
    }

    #[test]
    fn new_id_zero_length_is_empty() {
        assert_eq!(new_id(0).unwrap(), "");
    }

    #[test]
    fn new_id_is_alphanumeric() {
        let id = new_id(256).unwrap();
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn new_id_is_unique() {
        let a = new_id(SESSION_ID_LEN).unwrap();
        let b = new_id(SESSION_ID_LEN).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn charset_has_62_symbols() {
        assert_eq!(CHARSET.len(), 62);
        assert_eq!(usize::from(ACCEPT_BELOW) % CHARSET.len(), 0);
    }
}
