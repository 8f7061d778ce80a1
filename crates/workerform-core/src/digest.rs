//! SHA-512 content addressing for module bundles.

use sha2::{Digest, Sha512};

use crate::bundle::ContentKind;

/// Digest of a single module, seeded by its content kind.
pub fn file_digest(bytes: &[u8], kind: ContentKind) -> String {
    let mut hasher = Sha512::new();
    hasher.update(kind.mime_type().as_bytes());
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Fold per-file digests, in order, into one bundle digest.
///
/// Each digest's hex text is fed into a single running hasher, so the result
/// depends on the order of `digests`.
pub fn bundle_digest<I, S>(digests: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hasher = Sha512::new();
    for digest in digests {
        hasher.update(digest.as_ref().as_bytes());
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX_JS: &[u8] = b"export default {};\n";

    #[test]
    fn test_file_digest_known_value() {
        assert_eq!(
            file_digest(INDEX_JS, ContentKind::Script),
            "4ffccc4e26a1071a2ca847e3f2347337670b6e0963d60a0355ff2bb77730768a988441a4dfc821fb3d7c7a41e290d051b53a692b2b0a04eae10523e8aa7822d5"
        );
    }

    #[test]
    fn test_bundle_digest_known_value() {
        let file = file_digest(INDEX_JS, ContentKind::Script);
        assert_eq!(
            bundle_digest([file]),
            "3008cec7fb3321a48cf11adf09dec3303e161a3da8ff23db5d662612b78f7fd13bfbc2f3726e1dc681b4d909cce3868fc5f0b8ed73d8ba9d85cefbc5e439f4cc"
        );
    }

    #[test]
    fn test_empty_bundle_digest() {
        assert_eq!(
            bundle_digest(Vec::<String>::new()),
            "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e"
        );
    }

    #[test]
    fn test_file_digest_is_deterministic() {
        assert_eq!(
            file_digest(b"\0asm", ContentKind::Binary),
            file_digest(b"\0asm", ContentKind::Binary)
        );
    }

    #[test]
    fn test_content_kind_changes_digest() {
        assert_ne!(
            file_digest(INDEX_JS, ContentKind::Script),
            file_digest(INDEX_JS, ContentKind::SourceMap)
        );
    }

    #[test]
    fn test_single_byte_changes_digest() {
        assert_ne!(
            file_digest(b"export default {};\n", ContentKind::Script),
            file_digest(b"export default {};\r", ContentKind::Script)
        );
    }

    #[test]
    fn test_bundle_digest_is_order_sensitive() {
        let a = file_digest(b"a", ContentKind::Script);
        let b = file_digest(b"b", ContentKind::Script);
        assert_eq!(bundle_digest([&a, &b]), bundle_digest([&a, &b]));
        assert_ne!(bundle_digest([&a, &b]), bundle_digest([&b, &a]));
    }
}
