//! `multipart/form-data` bodies.
//!
//! Only text parts become form values. Parts carrying a file name are
//! uploads and are skipped.

use std::convert::Infallible;

use bytes::Bytes;
use futures::stream;
use multer::Multipart;
use reqargs_core::MultiDict;
use tracing::trace;

use crate::body::BodyError;

/// Collects the text fields of a buffered multipart body.
///
/// `content_type` is the full header value, boundary included.
pub async fn parse(content_type: &str, body: Bytes) -> Result<MultiDict, BodyError> {
    let boundary = multer::parse_boundary(content_type)?;
    let chunks = stream::once(async move { Ok::<_, Infallible>(body) });
    let mut multipart = Multipart::new(chunks, boundary);

    let mut form = MultiDict::new();
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            trace!("skipping unnamed multipart part");
            continue;
        };
        if field.file_name().is_some() {
            trace!(field = %name, "skipping file part");
            continue;
        }
        let text = field.text().await?;
        form.append(name, text);
    }
    Ok(form)
}
