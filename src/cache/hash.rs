use sha2::{Digest, Sha256};

/// Lower-hex SHA-256 of `bytes`, 64 ASCII characters. Used both for
/// `chunk.hash` (spec §3 I6, §6 "Chunk hash: sha256(content), lower-hex, 64
/// chars") and for the AST cache key's content-hash component.
///
/// The spec explicitly forbids a simple polynomial hash here because of
/// collision risk (§9 open questions); SHA-256 is collision-resistant for
/// our purposes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(64);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

/// `chunk.hash` — a pure function of `content` only (spec §3 I6).
pub fn content_hash(content: &str) -> String {
    sha256_hex(content.as_bytes())
}

/// AST cache key format: `ast:{utf8_path}:{lower_hex sha256(content)}`
/// (spec §6 "Persisted artifacts").
pub fn ast_cache_key(path: &str, content: &[u8]) -> String {
    format!("ast:{path}:{}", sha256_hex(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic_and_64_lower_hex_chars() {
        let h1 = content_hash("fn main() {}");
        let h2 = content_hash("fn main() {}");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
        assert!(h1.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn different_content_differs() {
        assert_ne!(content_hash("a"), content_hash("b"));
    }
}
