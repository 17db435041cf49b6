//! # Password Generation

use rand::Rng;

use crate::utils::error::{Error, Result};

const ALNUM: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()_+-=[]{};:,.<>?";

/// Generates a random password of exactly `length` characters.
///
/// Characters are drawn uniformly from letters and digits, extended with a
/// symbol set unless `symbols` is false.
pub fn generate(length: usize, symbols: bool) -> Result<String> {
    if length == 0 {
        return Err(Error::new("password length must be greater than zero"));
    }

    let charset: Vec<u8> = if symbols {
        [ALNUM, SYMBOLS].concat()
    } else {
        ALNUM.to_vec()
    };

    let mut rng = rand::rng();
    let password = (0..length)
        .map(|_| charset[rng.random_range(0..charset.len())] as char)
        .collect();

    Ok(password)
}
