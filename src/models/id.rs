use chrono::Utc;
use rand::Rng;

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// `<prefix>-<unix millis>`. Two calls within the same millisecond collide.
pub fn timestamp_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Utc::now().timestamp_millis())
}

/// `<prefix>-<unix millis>-<9 char base36 suffix>`
pub fn random_id(prefix: &str) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.random_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("{}-{}", timestamp_id(prefix), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_id_has_prefix_timestamp_and_suffix() {
        let id = random_id("img");
        let parts: Vec<&str> = id.split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "img");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }
}
