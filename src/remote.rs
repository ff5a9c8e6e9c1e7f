//! Remote solve backend: serializes a [`Study`] to a remote HTTP endpoint and deserializes its
//! solved [`crate::result::Result`] (§4.9, §6.2).
//!
//! The wire format is `bincode` over a blocking `reqwest` POST, carrying the study's `f64` fields
//! as plain IEEE-754 doubles — there is no JSON layer to pay for on a payload that is, by
//! construction, almost entirely floating point matrices.
use crate::domain::Study;
use crate::error::{Error, Result};
use crate::result::Result as HadarResult;
use std::time::Duration;

/// POST `study` to `url`, authenticated with `token` as a query parameter, and return the
/// deserialized solved result.
///
/// # Errors
///
/// - [`Error::Auth`] if the server responds `403 Forbidden` or `404 Not Found`.
/// - [`Error::RemoteIo`] for any other non-success status, a connection failure, or a response
///   body that doesn't deserialize as a `bincode`-encoded [`crate::result::Result`].
pub fn solve(study: &Study, url: &str, token: &str, deadline: Option<Duration>) -> Result<HadarResult> {
    let body = bincode::serialize(study).map_err(|e| Error::RemoteIo(format!("failed to encode study: {e}")))?;

    let mut builder = reqwest::blocking::Client::builder();
    if let Some(deadline) = deadline {
        builder = builder.timeout(deadline);
    }
    let client = builder
        .build()
        .map_err(|e| Error::RemoteIo(format!("failed to build HTTP client: {e}")))?;

    let response = client
        .post(url)
        .query(&[("token", token)])
        .header("content-type", "application/octet-stream")
        .body(body)
        .send()
        .map_err(|e| Error::RemoteIo(format!("request to '{url}' failed: {e}")))?;

    let status = response.status();
    if status == reqwest::StatusCode::FORBIDDEN || status == reqwest::StatusCode::NOT_FOUND {
        return Err(Error::Auth(format!("remote backend rejected request: {status}")));
    }
    if !status.is_success() {
        return Err(Error::RemoteIo(format!("remote backend returned {status}")));
    }

    let bytes = response
        .bytes()
        .map_err(|e| Error::RemoteIo(format!("failed to read response body: {e}")))?;

    bincode::deserialize(&bytes).map_err(|e| Error::RemoteIo(format!("failed to decode solved result: {e}")))
}
