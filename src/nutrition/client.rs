//! FoodData Central search client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::FdcConfig;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("nutrition api returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// One `{nutrientId, value}` pair of a candidate food.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodNutrient {
    #[serde(default)]
    pub nutrient_id: Option<i64>,
    #[serde(default)]
    pub value: Option<f64>,
}

/// A candidate food item returned by a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub fdc_id: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub food_nutrients: Vec<FoodNutrient>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<FoodItem>,
}

#[async_trait]
pub trait NutritionLookup: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<FoodItem>, LookupError>;
}

#[derive(Clone, Debug)]
pub struct FdcClient {
    base_url: String,
    api_key: String,
    page_size: u32,
    client: reqwest::Client,
}

impl FdcClient {
    pub fn new(cfg: &FdcConfig) -> Self {
        Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            page_size: cfg.page_size,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NutritionLookup for FdcClient {
    async fn search(&self, query: &str) -> Result<Vec<FoodItem>, LookupError> {
        let url = format!("{}/foods/search", self.base_url);
        let page_size = self.page_size.to_string();
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("query", query),
                ("pageSize", page_size.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "fdc search failed");
            return Err(LookupError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse = resp.json().await?;
        debug!(query, hits = parsed.foods.len(), "fdc search");
        Ok(parsed.foods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> FdcClient {
        FdcClient::new(&FdcConfig {
            base_url: format!("{}/", server.uri()),
            api_key: "test-key".into(),
            page_size: 5,
        })
    }

    #[tokio::test]
    async fn search_sends_query_and_parses_foods() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/foods/search"))
            .and(query_param("query", "banana"))
            .and(query_param("pageSize", "5"))
            .and(query_param("api_key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "totalHits": 1,
                "foods": [{
                    "fdcId": 1105314,
                    "description": "Bananas, raw",
                    "foodNutrients": [
                        {"nutrientId": 1008, "nutrientName": "Energy", "value": 89.0},
                        {"nutrientId": 1003, "value": 1.09},
                        {"nutrientName": "no id"}
                    ]
                }]
            })))
            .mount(&server)
            .await;

        let foods = client_for(&server).search("banana").await.unwrap();
        assert_eq!(foods.len(), 1);
        assert_eq!(foods[0].fdc_id, 1105314);
        assert_eq!(foods[0].description, "Bananas, raw");
        assert_eq!(foods[0].food_nutrients.len(), 3);
        assert_eq!(foods[0].food_nutrients[2].nutrient_id, None);
    }

    #[tokio::test]
    async fn missing_foods_field_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/foods/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let foods = client_for(&server).search("zzz").await.unwrap();
        assert!(foods.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/foods/search"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API_KEY_INVALID"))
            .mount(&server)
            .await;

        let err = client_for(&server).search("apple").await.unwrap_err();
        match err {
            LookupError::Status { status, body } => {
                assert_eq!(status, 403);
                assert!(body.contains("API_KEY_INVALID"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
