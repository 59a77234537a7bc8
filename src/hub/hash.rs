extern crate sha1;

use sha1::{Digest, Sha1};

/// Git object id of `content` stored as a blob.
///
/// The header carries the UTF-8 byte length, which is what the hosting
/// provider hashes, so `"日本語"` is prefixed with `blob 9`.
pub fn blob_hash(content: &str) -> String {
    let bytes = content.as_bytes();
    let mut hasher = Sha1::new();
    hasher.update(format!("blob {}\0", bytes.len()).as_bytes());
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod test {
    use super::blob_hash;
    use sha1::{Digest, Sha1};

    #[test]
    fn matches_git_hash_object() {
        assert_eq!(
            blob_hash("hello"),
            "b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0"
        );
        assert_eq!(blob_hash(""), "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391");
    }

    #[test]
    fn length_is_counted_in_bytes() {
        let text = "日本語";
        assert_eq!(text.chars().count(), 3);
        assert_eq!(blob_hash(text), "1bead7a0133af046435d267030237bbe0bc304d3");

        let mut hasher = Sha1::new();
        hasher.update(b"blob 9\0");
        hasher.update(text.as_bytes());
        assert_eq!(blob_hash(text), format!("{:x}", hasher.finalize()));

        let mut by_chars = Sha1::new();
        by_chars.update(b"blob 3\0");
        by_chars.update(text.as_bytes());
        assert_ne!(blob_hash(text), format!("{:x}", by_chars.finalize()));
    }

    #[test]
    fn deterministic() {
        let code = "fn main() {}\n";
        assert_eq!(blob_hash(code), blob_hash(code));
        assert_ne!(blob_hash(code), blob_hash("fn main() { }\n"));
    }
}
