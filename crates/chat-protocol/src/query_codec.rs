//! Username extraction from the upgrade URL.
//!
//! Clients identify themselves by appending `?username=<name>` to the
//! connection URL, e.g. `ws://host:port/?username=alice`. The value is
//! `application/x-www-form-urlencoded`, so spaces and non-ASCII names
//! arrive percent-encoded.
//!
//! Rules:
//! - first `username` occurrence with a non-empty value wins,
//! - a missing query, missing key, or empty value falls back to
//!   [`DEFAULT_USERNAME`].

use url::form_urlencoded;

/// Query-string key carrying the display name.
pub const USERNAME_KEY: &str = "username";

/// Display name used when the client does not supply one.
pub const DEFAULT_USERNAME: &str = "Anonymous";

/// Extract the username from a raw query string (the part after `?`).
///
/// `query` is `None` when the upgrade request had no query string at
/// all; both cases fall back to the default.
pub fn username_from_query(query: Option<&str>) -> String {
    let raw = match query {
        Some(raw) => raw,
        None => return DEFAULT_USERNAME.to_string(),
    };

    form_urlencoded::parse(raw.as_bytes())
        .find(|(key, value)| key == USERNAME_KEY && !value.is_empty())
        .map(|(_, value)| value.into_owned())
        .unwrap_or_else(|| DEFAULT_USERNAME.to_string())
}

/// Build the query string a client should append when connecting,
/// percent-encoding the username.
pub fn format_username_query(username: &str) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair(USERNAME_KEY, username)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_username_is_extracted() {
        assert_eq!(username_from_query(Some("username=alice")), "alice");
    }

    #[test]
    fn missing_query_defaults_to_anonymous() {
        assert_eq!(username_from_query(None), DEFAULT_USERNAME);
    }

    #[test]
    fn missing_key_defaults_to_anonymous() {
        assert_eq!(username_from_query(Some("user=alice&x=1")), DEFAULT_USERNAME);
    }

    #[test]
    fn empty_value_defaults_to_anonymous() {
        assert_eq!(username_from_query(Some("username=")), DEFAULT_USERNAME);
    }

    #[test]
    fn empty_query_defaults_to_anonymous() {
        assert_eq!(username_from_query(Some("")), DEFAULT_USERNAME);
    }

    #[test]
    fn percent_encoding_is_decoded() {
        assert_eq!(username_from_query(Some("username=alice%20b")), "alice b");
        assert_eq!(username_from_query(Some("username=a%2Bb")), "a+b");
    }

    #[test]
    fn plus_decodes_as_space() {
        assert_eq!(username_from_query(Some("username=alice+b")), "alice b");
    }

    #[test]
    fn first_non_empty_occurrence_wins() {
        assert_eq!(
            username_from_query(Some("username=alice&username=bob")),
            "alice"
        );
        // An empty first occurrence is skipped, matching form decoding
        // that drops blank values.
        assert_eq!(
            username_from_query(Some("username=&username=bob")),
            "bob"
        );
    }

    #[test]
    fn other_keys_are_ignored() {
        assert_eq!(
            username_from_query(Some("token=abc&username=carol&mode=x")),
            "carol"
        );
    }

    #[test]
    fn format_round_trips_through_parse() {
        let query = format_username_query("alice b+c");
        assert_eq!(username_from_query(Some(&query)), "alice b+c");
    }
}
