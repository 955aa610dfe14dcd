//! Base HTTP client with shared logic

use crate::infrastructure::model::types::ModelError;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Base HTTP client with shared functionality
#[derive(Debug, Clone, Default)]
pub struct HttpClientBase {
    pub http: Client,
}

impl HttpClientBase {
    /// Join an endpoint and a path with exactly one slash.
    pub fn build_url(endpoint: &str, path: &str) -> String {
        let base = endpoint.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Post JSON with an `api-key` header (Azure style)
    pub async fn post_with_api_key<Req, Res>(
        &self,
        deployment: &str,
        url: &str,
        query: &[(&str, &str)],
        api_key: &str,
        body: &Req,
    ) -> Result<Res, ModelError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        self.http
            .post(url)
            .query(query)
            .header("api-key", api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ModelError::network(deployment, e))?
            .error_for_status()
            .map_err(|e| ModelError::network(deployment, e))?
            .json()
            .await
            .map_err(|e| ModelError::network(deployment, e))
    }
}
