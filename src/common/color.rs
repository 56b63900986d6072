/// Deterministic color for a username, as `#rrggbb` in lowercase hex.
///
/// The hash walks UTF-16 code units with `hash = unit + hash * 31` in 32-bit
/// signed wrapping arithmetic, then emits the three low-order bytes, least
/// significant first. Other clients compute the exact same value, so a user keeps
/// their color everywhere.
pub fn color_from(username: &str) -> String {
    let hash = username.encode_utf16().fold(0i32, |hash, unit| {
        i32::from(unit).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    });

    let bytes = hash.to_le_bytes();
    format!("#{}", hex::encode(&bytes[..3]))
}
