use std::fmt;

use gloo::net::http::Request;
use serde::Deserialize;

use crate::config::sample_text_url;

#[derive(Debug, Deserialize)]
struct SampleTextResponse {
    sample_text: String,
}

#[derive(Debug)]
pub(crate) enum SampleTextError {
    Http(u16),
    Network(String),
    Decode(String),
}

impl fmt::Display for SampleTextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleTextError::Http(status) => write!(f, "HTTP error {status}"),
            SampleTextError::Network(reason) => f.write_str(reason),
            SampleTextError::Decode(reason) => write!(f, "invalid response: {reason}"),
        }
    }
}

impl std::error::Error for SampleTextError {}

/// `GET /sample_text/{sheet}` returning the first text row of that sheet.
pub(crate) async fn fetch_sample_text(sheet: &str) -> Result<String, SampleTextError> {
    let response = Request::get(&sample_text_url(sheet))
        .send()
        .await
        .map_err(|err| SampleTextError::Network(err.to_string()))?;
    if !response.ok() {
        return Err(SampleTextError::Http(response.status()));
    }
    let body: SampleTextResponse = response
        .json()
        .await
        .map_err(|err| SampleTextError::Decode(err.to_string()))?;
    Ok(body.sample_text)
}
