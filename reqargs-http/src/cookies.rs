//! Cookie parsing.

use cookie::Cookie;
use http::HeaderMap;
use http::header::COOKIE;
use reqargs_core::MultiDict;
use tracing::trace;

/// Collects every cookie sent in the `Cookie` header(s).
///
/// Double quotes around a value are removed. Malformed pairs and header
/// values that are not valid strings are skipped.
pub fn parse(headers: &HeaderMap) -> MultiDict {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value))
        .filter_map(|cookie| match cookie {
            Ok(cookie) => Some((cookie.name().to_owned(), cookie.value_trimmed().to_owned())),
            Err(error) => {
                trace!(%error, "skipping malformed cookie");
                None
            }
        })
        .collect()
}
