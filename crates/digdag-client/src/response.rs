//! Buffered HTTP responses and body decoding.

use std::borrow::Cow;
use std::io::Read;

use flate2::read::GzDecoder;
use reqwest::header::{HeaderMap, CONTENT_ENCODING};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// A response whose body has been read off the wire.
///
/// The connection is released as soon as the body is read, so dropping an
/// `ApiResponse` at any point never leaks a stream.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ApiResponse {
    pub(crate) fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body bytes, exactly as received.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Status line, e.g. `200 OK`.
    ///
    /// The reason phrase is the canonical one for the code; codes without a
    /// registered phrase yield the bare number (`599`).
    pub fn status_line(&self) -> String {
        match self.status.canonical_reason() {
            Some(reason) => format!("{} {}", self.status.as_u16(), reason),
            None => self.status.as_u16().to_string(),
        }
    }

    /// Body with any `Content-Encoding: gzip` removed.
    pub fn decoded_body(&self) -> Result<Cow<'_, [u8]>> {
        if self.is_gzip_encoded() {
            return Ok(Cow::Owned(gunzip(&self.body)?));
        }
        Ok(Cow::Borrowed(&self.body))
    }

    /// Decode the body as JSON.
    ///
    /// A body sent with `Content-Encoding: gzip` is inflated first.
    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        Ok(serde_json::from_slice(&self.decoded_body()?)?)
    }

    /// Inflate a gzip payload and return it as text.
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected; log files
    /// are written by arbitrary task processes.
    pub fn gunzip_text(self) -> Result<String> {
        let data = gunzip(&self.body)?;
        Ok(String::from_utf8_lossy(&data).into_owned())
    }

    /// Body as text, inflated per `Content-Encoding`.
    ///
    /// A body that claims gzip but does not inflate is returned as received.
    pub fn text(&self) -> String {
        match self.decoded_body() {
            Ok(body) => String::from_utf8_lossy(&body).into_owned(),
            Err(_) => String::from_utf8_lossy(&self.body).into_owned(),
        }
    }

    fn is_gzip_encoded(&self) -> bool {
        self.headers
            .get(CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("gzip"))
    }
}

fn gunzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).map_err(Error::Decompress)?;
    Ok(out)
}
