//! Status code → error class registry.
//!
//! Every status code the [`http`] crate knows a canonical reason for (from
//! 200 upwards) gets an [`ErrorClass`]. The table is built once, on first
//! use, and never changes afterwards.
//!
//! A validation failure is turned into a response by looking up the class
//! for the requested status and calling [`ErrorClass::build`]. Asking for a
//! status without a class is a configuration error, see
//! [`HttpParser::handle_error`](crate::HttpParser::handle_error).

use std::collections::HashMap;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use lazy_static::lazy_static;

use crate::HttpError;

/// Status code family of an [`ErrorClass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorFamily {
    /// 2xx
    Success,
    /// 3xx
    Redirection,
    /// 4xx
    ClientError,
    /// 5xx
    ServerError,
}

impl ErrorFamily {
    fn of(status: StatusCode) -> Option<Self> {
        if status.is_success() {
            Some(ErrorFamily::Success)
        } else if status.is_redirection() {
            Some(ErrorFamily::Redirection)
        } else if status.is_client_error() {
            Some(ErrorFamily::ClientError)
        } else if status.is_server_error() {
            Some(ErrorFamily::ServerError)
        } else {
            None
        }
    }
}

/// A registered HTTP error class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorClass {
    status: StatusCode,
    reason: &'static str,
    family: ErrorFamily,
}

impl ErrorClass {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Canonical reason phrase, e.g. `Unprocessable Entity`.
    pub fn reason(&self) -> &'static str {
        self.reason
    }

    pub fn family(&self) -> ErrorFamily {
        self.family
    }

    /// Builds an error response of this class.
    pub fn build(&'static self, body: Bytes, headers: HeaderMap) -> HttpError {
        HttpError::new(self, body, headers)
    }
}

lazy_static! {
    static ref ERROR_CLASSES: HashMap<u16, ErrorClass> = discover();
}

fn discover() -> HashMap<u16, ErrorClass> {
    (200..=599u16)
        .filter_map(|code| {
            let status = StatusCode::from_u16(code).ok()?;
            let reason = status.canonical_reason()?;
            let family = ErrorFamily::of(status)?;
            Some((code, ErrorClass { status, reason, family }))
        })
        .collect()
}

/// Looks up the error class registered for `code`.
pub fn error_class(code: u16) -> Option<&'static ErrorClass> {
    ERROR_CLASSES.get(&code)
}

/// Every registered error class, ordered by status code.
pub fn error_classes() -> Vec<&'static ErrorClass> {
    let mut classes: Vec<_> = ERROR_CLASSES.values().collect();
    classes.sort_by_key(|class| class.status);
    classes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unprocessable_entity_is_registered() {
        let class = error_class(422).unwrap();
        assert_eq!(class.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(class.reason(), "Unprocessable Entity");
        assert_eq!(class.family(), ErrorFamily::ClientError);
    }

    #[test]
    fn test_every_named_status_is_registered() {
        for code in 200..=599u16 {
            let Ok(status) = StatusCode::from_u16(code) else {
                continue;
            };
            if status.canonical_reason().is_some() {
                let class = error_class(code).unwrap_or_else(|| panic!("{code} not registered"));
                assert_eq!(class.status(), status);
            }
        }
    }

    #[test]
    fn test_unnamed_and_informational_codes_are_not_registered() {
        assert!(error_class(100).is_none());
        assert!(error_class(299).is_none());
        assert!(error_class(499).is_none());
        assert!(error_class(600).is_none());
    }

    #[test]
    fn test_families() {
        assert_eq!(error_class(200).unwrap().family(), ErrorFamily::Success);
        assert_eq!(error_class(302).unwrap().family(), ErrorFamily::Redirection);
        assert_eq!(error_class(404).unwrap().family(), ErrorFamily::ClientError);
        assert_eq!(error_class(503).unwrap().family(), ErrorFamily::ServerError);
    }

    #[test]
    fn test_classes_are_sorted() {
        let codes: Vec<u16> = error_classes().iter().map(|class| class.status().as_u16()).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
        assert!(codes.contains(&422));
    }
}
