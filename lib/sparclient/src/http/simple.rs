use oxhttp::model::header::{ACCEPT, CONTENT_TYPE};
use oxhttp::model::{Body, Method, Request, Response};
use std::io::{Error, ErrorKind, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub struct Client {
    client: Arc<oxhttp::Client>,
}

impl Client {
    pub fn new(timeout: Option<Duration>, redirection_limit: usize) -> Result<Self> {
        let mut client = oxhttp::Client::new()
            .with_redirection_limit(redirection_limit)
            .with_user_agent(concat!("sparclient/", env!("CARGO_PKG_VERSION")))
            .map_err(invalid_input_error)?;
        if let Some(timeout) = timeout {
            client = client.with_global_timeout(timeout);
        }
        Ok(Self {
            client: Arc::new(client),
        })
    }

    pub fn get(&self, url: &str, accept: &'static str) -> Result<(Option<String>, Body)> {
        debug!(url, accept, "HTTP GET");
        let request = Request::builder()
            .uri(url)
            .header(ACCEPT, accept)
            .body(())
            .map_err(invalid_input_error)?;
        into_content(url, self.client.request(request)?)
    }

    pub fn post(
        &self,
        url: &str,
        payload: Vec<u8>,
        content_type: &'static str,
        accept: &'static str,
    ) -> Result<(Option<String>, Body)> {
        debug!(url, content_type, size = payload.len(), "HTTP POST");
        let request = Request::builder()
            .method(Method::POST)
            .uri(url)
            .header(ACCEPT, accept)
            .header(CONTENT_TYPE, content_type)
            .body(payload)
            .map_err(invalid_input_error)?;
        into_content(url, self.client.request(request)?)
    }
}

fn into_content(url: &str, response: Response<Body>) -> Result<(Option<String>, Body)> {
    let status = response.status();
    if !status.is_success() {
        return Err(Error::other(format!(
            "Error {} returned by {} with payload:\n{}",
            status,
            url,
            response.into_body().to_string()?
        )));
    }
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .map(|value| value.to_str().map(ToOwned::to_owned))
        .transpose()
        .map_err(invalid_data_error)?;
    Ok((content_type, response.into_body()))
}

fn invalid_data_error(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Error {
    Error::new(ErrorKind::InvalidData, error)
}

fn invalid_input_error(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Error {
    Error::new(ErrorKind::InvalidInput, error)
}
