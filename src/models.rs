use crate::client::Anura;
use crate::error::{Error, Result};
use crate::observability::{MODELS_DECODE_ERRORS, MODELS_LISTED};
use crate::transport::Transport;
use crate::types::ModelsEnvelope;

impl<T: Transport> Anura<T> {
    /// List the names of the models the service offers.
    ///
    /// # Returns
    /// The model names in the order the server lists them. A body that is not
    /// a models envelope fails with [`Error::Serialization`]; there is no
    /// retry, and choosing a fallback model is up to the caller.
    ///
    /// # Example
    /// ```rust,no_run
    /// # use anura::Anura;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Anura::from_env()?;
    /// for model in client.list_models().await? {
    ///     println!("{model}");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = self.config().models_url()?;
        let body = self
            .transport()
            .get_models(&url, self.config().api_key())
            .await?;
        let models = decode_models(&body)?;
        tracing::debug!(count = models.len(), "listed models");
        Ok(models)
    }
}

/// Decode a models envelope and return its model names.
pub fn decode_models(body: &[u8]) -> Result<Vec<String>> {
    match serde_json::from_slice::<ModelsEnvelope>(body) {
        Ok(envelope) => {
            MODELS_LISTED.click();
            Ok(envelope.into_models())
        }
        Err(e) => {
            MODELS_DECODE_ERRORS.click();
            Err(Error::serialization(
                format!("Failed to decode models response: {e}"),
                Some(Box::new(e)),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_models_keeps_order() {
        let models =
            decode_models(br#"{"data":{"models":["a","b"]},"message":"ok","status":200}"#).unwrap();
        assert_eq!(models, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn decode_models_rejects_wrong_shape() {
        let err = decode_models(br#"{"models":["a","b"]}"#).unwrap_err();
        assert!(err.is_decode());

        let err = decode_models(b"not json").unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn decode_empty_model_list() {
        let models = decode_models(br#"{"data":{"models":[]},"message":"","status":200}"#).unwrap();
        assert!(models.is_empty());
    }
}
