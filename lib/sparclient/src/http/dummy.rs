//! Stand-in HTTP client used when the `http-client` feature is disabled.

use std::io::{Empty, Error, ErrorKind, Result};
use std::time::Duration;

#[derive(Clone)]
pub struct Client;

impl Client {
    #[expect(clippy::unnecessary_wraps)]
    pub fn new(_timeout: Option<Duration>, _redirection_limit: usize) -> Result<Self> {
        Ok(Self)
    }

    #[expect(clippy::unused_self)]
    pub fn get(&self, _url: &str, _accept: &'static str) -> Result<(Option<String>, Empty)> {
        Err(unsupported())
    }

    #[expect(clippy::unused_self, clippy::needless_pass_by_value)]
    pub fn post(
        &self,
        _url: &str,
        _payload: Vec<u8>,
        _content_type: &'static str,
        _accept: &'static str,
    ) -> Result<(Option<String>, Empty)> {
        Err(unsupported())
    }
}

fn unsupported() -> Error {
    Error::new(
        ErrorKind::Unsupported,
        "HTTP client is not available. Enable the feature 'http-client'",
    )
}
