use itertools::Itertools;

use std::fmt::{Display, Formatter};
use std::string::FromUtf8Error;

/// Byte string in the native form expected by environ-style applications.
///
/// Each character holds exactly one byte (U+0000 through U+00FF). Text is converted by encoding it
/// as UTF-8 and reinterpreting every resulting byte as a single Latin-1 character, so ASCII input
/// is unchanged while multi-byte characters expand to one character per byte. The original text
/// can always be recovered with [`decode`](NativeString::decode).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NativeString(String);

impl NativeString {
  /// Transcode UTF-8 text into its byte-per-character form.
  pub fn from_text(text: &str) -> Self {
    Self(text.bytes().map(char::from).collect())
  }

  /// Return the transcoded characters.
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Return the raw bytes represented by this string (i.e., the UTF-8 bytes of the source text).
  pub fn to_bytes(&self) -> Vec<u8> {
    // Every char is at most U+00FF, so the cast is lossless.
    self.0.chars().map(|c| c as u8).collect()
  }

  /// Recover the text this string was transcoded from.
  pub fn decode(&self) -> Result<String, FromUtf8Error> {
    String::from_utf8(self.to_bytes())
  }

  /// Return `true` if the string contains no characters.
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl Display for NativeString {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl PartialEq<str> for NativeString {
  fn eq(&self, other: &str) -> bool {
    self.0 == other
  }
}

impl PartialEq<&str> for NativeString {
  fn eq(&self, other: &&str) -> bool {
    self.0 == *other
  }
}

/// Serialize key/value pairs as an `application/x-www-form-urlencoded` query string.
///
/// Pairs are emitted in iteration order. Unreserved characters (`A-Z`, `a-z`, `0-9`, `-`, `.`,
/// `_`, `~`) are kept as-is, spaces become `+`, and all other bytes are percent-encoded.
pub fn url_encode<'a, I>(pairs: I) -> String
where
  I: IntoIterator<Item = (&'a str, &'a str)>,
{
  pairs
    .into_iter()
    .map(|(key, value)| format!("{}={}", quote_plus(key), quote_plus(value)))
    .join("&")
}

fn quote_plus(value: &str) -> String {
  // A literal `+` is already encoded as `%2B`, so only spaces turn into `+`.
  urlencoding::encode(value).replace("%20", "+")
}

#[cfg(test)]
mod tests {
  use super::{url_encode, NativeString};

  use pretty_assertions::assert_eq;

  #[test]
  fn test_ascii_unchanged() {
    let native = NativeString::from_text("/hello?x=1");
    assert_eq!(native, "/hello?x=1");
    assert_eq!(native.to_bytes(), b"/hello?x=1".to_vec());
  }

  #[test]
  fn test_multibyte_expands_to_bytes() {
    let native = NativeString::from_text("é");
    assert_eq!(native.as_str(), "\u{c3}\u{a9}");
    assert_eq!(native.to_bytes(), "é".as_bytes().to_vec());
    assert_eq!(native.decode().unwrap(), "é");
  }

  #[test]
  fn test_url_encode() {
    assert_eq!(url_encode(Vec::<(&str, &str)>::new()), "");
    assert_eq!(
      url_encode(vec![("q", "a b+c"), ("name", "zoë"), ("x", "~-._")]),
      "q=a+b%2Bc&name=zo%C3%AB&x=~-._"
    );
  }
}
