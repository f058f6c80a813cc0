/// Domain tag mixed into every name hash.
///
/// Producers and consumers of integer-family storages must agree on it.
pub const NAME_HASH_DOMAIN: &str = "arbor-name-v1";

/// Hash a name into an integer-family word under [`NAME_HASH_DOMAIN`].
pub fn hash_name(name: &str) -> u64 {
    hash_name_in(NAME_HASH_DOMAIN, name)
}

/// Hash a name into an integer-family word under a custom domain tag.
///
/// The word is the first eight bytes, little-endian, of
/// `BLAKE3(domain ":" name)`.
pub fn hash_name_in(domain: &str, name: &str) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(domain.as_bytes());
    hasher.update(b":");
    hasher.update(name.as_bytes());
    let digest = hasher.finalize();
    let mut word = [0u8; 8];
    word.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(word)
}
