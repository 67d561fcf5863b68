use anyhow::Result;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const PREDICT_PATH: &str = "/predict";

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("could not encode capture: {0}")]
    Encode(String),
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("response was not valid json: {0}")]
    MalformedResponse(String),
    #[error("response carried no prediction (error: {})", backend_error(.error))]
    MissingPrediction { error: Option<String> },
}

fn backend_error(error: &Option<String>) -> &str {
    error.as_deref().unwrap_or("none")
}

#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub image: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub prediction: Option<Vec<f64>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Decodes a response body into per-class scores.
pub fn parse_scores(body: &str) -> Result<Vec<f64>, SubmitError> {
    let response: PredictResponse = serde_json::from_str(body)
        .map_err(|err| SubmitError::MalformedResponse(err.to_string()))?;
    match response.prediction {
        Some(scores) if !scores.is_empty() => Ok(scores),
        _ => Err(SubmitError::MissingPrediction {
            error: response.error,
        }),
    }
}

/// Remote classifier. Implementations block; callers run them off the UI thread.
pub trait PredictClient: Send + Sync {
    fn predict(&self, image_data_uri: &str) -> Result<Vec<f64>, SubmitError>;
}

pub struct HttpPredictClient {
    client: Client,
    endpoint: String,
}

impl HttpPredictClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("digit-pad")
            .build()?;
        Ok(Self {
            client,
            endpoint: predict_endpoint(base_url),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport_error(&self, err: impl std::fmt::Display) -> SubmitError {
        SubmitError::Transport {
            url: self.endpoint.clone(),
            message: err.to_string(),
        }
    }
}

impl PredictClient for HttpPredictClient {
    fn predict(&self, image_data_uri: &str) -> Result<Vec<f64>, SubmitError> {
        let body = serde_json::to_string(&PredictRequest {
            image: image_data_uri,
        })
        .map_err(|err| SubmitError::Encode(err.to_string()))?;

        let resp = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|err| self.transport_error(err))?;
        let status = resp.status();
        let text = resp.text().map_err(|err| self.transport_error(err))?;
        tracing::debug!(%status, bytes = text.len(), "predict response received");
        // Status is informational; the body decides success.
        parse_scores(&text)
    }
}

pub fn predict_endpoint(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), PREDICT_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        assert_eq!(
            predict_endpoint("http://localhost:5050/"),
            "http://localhost:5050/predict"
        );
        assert_eq!(
            predict_endpoint("https://example.test"),
            "https://example.test/predict"
        );
    }

    #[test]
    fn request_body_has_image_field() {
        let body = serde_json::to_value(PredictRequest {
            image: "data:image/png;base64,AAAA",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "image": "data:image/png;base64,AAAA" }));
    }

    #[test]
    fn scores_are_parsed_from_prediction_array() {
        let scores = parse_scores(r#"{"prediction":[0.1,0.9,0.05]}"#).unwrap();
        assert_eq!(scores, vec![0.1, 0.9, 0.05]);
    }

    #[test]
    fn error_body_is_missing_prediction() {
        let err = parse_scores(r#"{"error":"No image provided"}"#).unwrap_err();
        match err {
            SubmitError::MissingPrediction { error } => {
                assert_eq!(error.as_deref(), Some("No image provided"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_prediction_is_missing_prediction() {
        assert!(matches!(
            parse_scores(r#"{"prediction":[]}"#),
            Err(SubmitError::MissingPrediction { .. })
        ));
    }

    #[test]
    fn non_json_body_is_malformed() {
        assert!(matches!(
            parse_scores("<html>502 Bad Gateway</html>"),
            Err(SubmitError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_scores(r#"{"prediction":["a","b"]}"#),
            Err(SubmitError::MalformedResponse(_))
        ));
    }
}
