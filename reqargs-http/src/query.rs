use reqargs_core::MultiDict;
use tracing::warn;

/// Parses a urlencoded string into a [`MultiDict`].
///
/// Used for both query strings and form bodies. Repeated keys keep every
/// value (`tag=a&tag=b`). Input that cannot be decoded yields an empty map.
pub fn parse(value: &str) -> MultiDict {
    match serde_urlencoded::from_str::<Vec<(String, String)>>(value) {
        Ok(pairs) => pairs.into_iter().collect(),
        Err(error) => {
            warn!(%error, "discarding undecodable urlencoded data");
            MultiDict::new()
        }
    }
}

/// Parses urlencoded bytes, as sent in a form body.
pub fn parse_bytes(value: &[u8]) -> Result<MultiDict, serde_urlencoded::de::Error> {
    serde_urlencoded::from_bytes::<Vec<(String, String)>>(value)
        .map(|pairs| pairs.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_one() {
        let query = parse("key=value");
        assert_eq!(query.get("key"), Some("value"));
    }

    #[test]
    fn test_parse_valid_multiple() {
        let query = parse("key-one=value-one&key-two=value-two&key-three=value-three");
        assert_eq!(query.get("key-one"), Some("value-one"));
        assert_eq!(query.get("key-two"), Some("value-two"));
        assert_eq!(query.get("key-three"), Some("value-three"));
    }

    #[test]
    fn test_parse_repeated_keys() {
        let query = parse("color=red&color=blue&color=green");
        let colors: Vec<_> = query.get_all("color").collect();
        assert_eq!(colors, vec!["red", "blue", "green"]);
    }

    #[test]
    fn test_parse_percent_and_plus_decoding() {
        let query = parse("name=Ferris+the%20Crab&empty=");
        assert_eq!(query.get("name"), Some("Ferris the Crab"));
        assert_eq!(query.get("empty"), Some(""));
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse("").is_empty());
    }
}
