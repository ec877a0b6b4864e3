//! Query string access.
//!
//! Repeated keys keep the last value, "present" means non-blank, and integers are read the
//! lenient way the public API always has: a leading integer, otherwise zero.

use url::form_urlencoded;

/// Ordered, decoded query parameters of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Decodes a raw (still percent-encoded) query string.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        Self { pairs: form_urlencoded::parse(query.as_bytes()).into_owned().collect() }
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self { pairs: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    /// Last value given for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs.iter().rev().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    /// Last value for `name` when it is not blank.
    #[must_use]
    pub fn present(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.trim().is_empty())
    }

    /// `to_i` of the last value; `None` when the parameter is absent.
    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).map(parse_leading_int)
    }

    /// Pairs in request order, duplicates included.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// One entry per key, holding the last value, in first-seen key order.
    #[must_use]
    pub fn merged(&self) -> Vec<(&str, &str)> {
        let mut merged: Vec<(&str, &str)> = Vec::new();
        for (key, value) in self.pairs() {
            match merged.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => merged.push((key, value)),
            }
        }
        merged
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Lenient integer: optional leading whitespace and sign, then digits (single
/// underscores allowed between digits). Anything unparsable yields 0; overflow saturates.
#[must_use]
pub fn parse_leading_int(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let mut value: i64 = 0;
    let mut previous_was_digit = false;
    for byte in digits.bytes() {
        match byte {
            b'0'..=b'9' => {
                value = value.saturating_mul(10).saturating_add(i64::from(byte - b'0'));
                previous_was_digit = true;
            },
            b'_' if previous_was_digit => previous_was_digit = false,
            _ => break,
        }
    }
    if negative { -value } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_int_reads_prefix_digits() {
        assert_eq!(parse_leading_int("42"), 42);
        assert_eq!(parse_leading_int("  7abc"), 7);
        assert_eq!(parse_leading_int("-3"), -3);
        assert_eq!(parse_leading_int("+5"), 5);
        assert_eq!(parse_leading_int("1_000"), 1000);
        assert_eq!(parse_leading_int("1__0"), 1);
        assert_eq!(parse_leading_int("abc"), 0);
        assert_eq!(parse_leading_int(""), 0);
        assert_eq!(parse_leading_int("99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn last_value_wins() {
        let params = QueryParams::parse("page=1&topic=5&page=3");
        assert_eq!(params.get("page"), Some("3"));
        assert_eq!(params.int("page"), Some(3));
        assert_eq!(params.merged(), vec![("page", "3"), ("topic", "5")]);
    }

    #[test]
    fn blank_values_are_not_present() {
        let params = QueryParams::parse("q=+&sort=&order=desc");
        assert_eq!(params.get("q"), Some(" "));
        assert_eq!(params.present("q"), None);
        assert_eq!(params.present("sort"), None);
        assert_eq!(params.present("order"), Some("desc"));
        assert_eq!(params.int("missing"), None);
    }

    #[test]
    fn values_are_percent_decoded() {
        let params = QueryParams::parse("search=health%20%26+care");
        assert_eq!(params.get("search"), Some("health & care"));
    }
}
