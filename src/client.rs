use crate::config::Config;
use crate::error::Result;
use crate::sse::{ParseOptions, process_stream};
use crate::transport::{HttpTransport, Transport};
use crate::types::{Message, StreamResponse, build_completion_payload};

/// Client for the Anura API.
#[derive(Debug, Clone)]
pub struct Anura<T: Transport = HttpTransport> {
    config: Config,
    transport: T,
}

impl Anura<HttpTransport> {
    /// Create a new client that talks HTTP.
    pub fn new(config: Config) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout())?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create a new client configured from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env()?)
    }
}

impl<T: Transport> Anura<T> {
    /// Create a client over a custom transport.
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self { config, transport }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    /// Send the conversation to `model` and read the streamed reply.
    ///
    /// The body is consumed and released before this returns. If the stream
    /// fails part way, the error carries the text received up to that point.
    pub async fn complete_chat(&self, model: &str, messages: &[Message]) -> Result<StreamResponse> {
        let payload = build_completion_payload(model, messages)?;
        let url = self.config.completions_url()?;
        let body = self
            .transport
            .post_completion(&url, payload, self.config.api_key())
            .await?;
        tracing::debug!(model, status = body.status(), "completion stream opened");
        let options = ParseOptions::verbose(self.config.verbose());
        let response = process_stream(body.into_stream(), options).await?;
        tracing::debug!(
            job_id = response.job_id.as_deref(),
            chars = response.text.len(),
            "completion finished"
        );
        Ok(response)
    }
}
