//! The path hash stored in RAF entry records.

/// Hash a logical path the way RAF archive indexes do
///
/// The hash is case insensitive: every character is lowered before being mixed in.
///
/// ```
/// assert_eq!(rads_formats::hash_path("DATA/cfg.ini"), 0x0F62_EC19);
/// assert_eq!(rads_formats::hash_path("data/CFG.INI"), 0x0F62_EC19);
/// ```
pub fn hash_path(path: &str) -> u32 {
    path.chars().fold(0u32, |hash, c| {
        let mut hash = (hash << 4).wrapping_add(c.to_ascii_lowercase() as u32);
        let high = hash & 0xF000_0000;
        if high != 0 {
            hash ^= high >> 24;
            hash ^= high;
        }
        hash
    })
}
