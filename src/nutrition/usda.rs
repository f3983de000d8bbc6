//! USDA FoodData Central client
//!
//! Implements `NutritionSource` over the FoodData Central REST API:
//! - `GET {base}/foods/search?query=..&pageSize=..` for candidates
//! - `GET {base}/food/{fdcId}` for the nutrient record
//!
//! Search and detail results are cached in memory for `cache_ttl_secs`
//! (0 disables the cache). Every request is bounded by `timeout_secs`.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::source::{
    FoodDetails, FoodNutrient, FoodSearchResult, LookupError, LookupResult, NutritionSource,
};
use crate::build_info::BuildInfo;

/// Default FoodData Central endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";

/// Placeholder key shipped in sample environments; treated as unset
pub const PLACEHOLDER_API_KEY: &str = "your_usda_api_key_here";

/// Data types searched; branded foods are excluded
const SEARCH_DATA_TYPES: &str = "Foundation,SR Legacy,Survey (FNDDS)";

/// USDA client configuration
#[derive(Debug, Clone)]
pub struct UsdaClientConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    pub cache_ttl_secs: u64,
}

impl Default for UsdaClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
            cache_ttl_secs: 86400,
        }
    }
}

impl UsdaClientConfig {
    /// The API key, if one is set and is not the placeholder
    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && *k != PLACEHOLDER_API_KEY)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<FoodSearchResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoodDetailsResponse {
    fdc_id: u64,
    #[serde(default)]
    description: String,
    #[serde(default)]
    food_nutrients: Vec<FoodNutrientResponse>,
}

#[derive(Debug, Deserialize)]
struct FoodNutrientResponse {
    nutrient: Option<NutrientInfo>,
    amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NutrientInfo {
    name: String,
    #[serde(default)]
    unit_name: String,
}

impl From<FoodDetailsResponse> for FoodDetails {
    fn from(response: FoodDetailsResponse) -> Self {
        let nutrients = response
            .food_nutrients
            .into_iter()
            .filter_map(|n| {
                let info = n.nutrient?;
                Some(FoodNutrient {
                    name: info.name,
                    unit_name: info.unit_name,
                    amount: n.amount.unwrap_or(0.0),
                })
            })
            .collect();

        Self {
            fdc_id: response.fdc_id,
            description: response.description,
            nutrients,
        }
    }
}

/// Entries kept per cache once expired ones are evicted
const MAX_CACHE_ENTRIES: usize = 1024;

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    expires_at: Instant,
}

type Cache<K, T> = Arc<RwLock<HashMap<K, CacheEntry<T>>>>;

/// Unexpired cached value for `key`
async fn cached<K, T>(cache: &Cache<K, T>, key: &K) -> Option<T>
where
    K: Eq + Hash,
    T: Clone,
{
    let cache = cache.read().await;
    cache
        .get(key)
        .filter(|entry| Instant::now() < entry.expires_at)
        .map(|entry| entry.data.clone())
}

/// Insert after evicting expired entries; at capacity the entry closest to
/// expiry makes room
async fn store<K, T>(cache: &Cache<K, T>, key: K, data: T, expires_at: Instant)
where
    K: Eq + Hash + Clone,
{
    let mut cache = cache.write().await;
    let now = Instant::now();
    cache.retain(|_, entry| now < entry.expires_at);

    if cache.len() >= MAX_CACHE_ENTRIES && !cache.contains_key(&key) {
        let oldest = cache
            .iter()
            .min_by_key(|(_, entry)| entry.expires_at)
            .map(|(k, _)| k.clone());
        if let Some(oldest) = oldest {
            cache.remove(&oldest);
        }
    }
    cache.insert(key, CacheEntry { data, expires_at });
}

/// USDA FoodData Central API client
pub struct UsdaClient {
    config: UsdaClientConfig,
    http_client: reqwest::Client,
    search_cache: Cache<String, Vec<FoodSearchResult>>,
    details_cache: Cache<u64, Option<FoodDetails>>,
}

impl UsdaClient {
    pub fn new(config: UsdaClientConfig) -> LookupResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(BuildInfo::current().user_agent())
            .build()?;

        Ok(Self {
            config,
            http_client,
            search_cache: Arc::new(RwLock::new(HashMap::new())),
            details_cache: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    fn api_key(&self) -> LookupResult<&str> {
        self.config.usable_api_key().ok_or(LookupError::NotConfigured)
    }

    /// Expiry for an entry stored now; None when caching is off or the TTL
    /// does not fit in an `Instant`
    fn cache_expiry(&self) -> Option<Instant> {
        match self.config.cache_ttl_secs {
            0 => None,
            ttl => Instant::now().checked_add(Duration::from_secs(ttl)),
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> LookupError {
        if e.is_timeout() {
            LookupError::Timeout(self.config.timeout_secs)
        } else {
            LookupError::Http(e)
        }
    }
}

#[async_trait]
impl NutritionSource for UsdaClient {
    fn name(&self) -> &str {
        "usda"
    }

    fn is_configured(&self) -> bool {
        self.config.usable_api_key().is_some()
    }

    async fn search(&self, query: &str, limit: u32) -> LookupResult<Vec<FoodSearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LookupError::InvalidQuery("search query cannot be empty".to_string()));
        }
        if limit == 0 || limit > 200 {
            return Err(LookupError::InvalidQuery(format!(
                "page size must be between 1 and 200, got {}",
                limit
            )));
        }
        let api_key = self.api_key()?;

        let cache_key = format!("{}:{}", query.to_lowercase(), limit);
        if let Some(foods) = cached(&self.search_cache, &cache_key).await {
            debug!(query, "USDA search served from cache");
            return Ok(foods);
        }

        let url = format!("{}/foods/search", self.config.base_url);
        let page_size = limit.to_string();
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("query", query),
                ("pageSize", page_size.as_str()),
                ("dataType", SEARCH_DATA_TYPES),
                ("api_key", api_key),
            ])
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            warn!(query, status = %response.status(), "USDA search failed");
            return Err(LookupError::Status {
                service: "USDA search".to_string(),
                status: response.status().as_u16(),
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Malformed(format!("USDA search body: {}", e)))?;

        let mut foods = body.foods;
        foods.truncate(limit as usize);

        if let Some(expires_at) = self.cache_expiry() {
            store(&self.search_cache, cache_key, foods.clone(), expires_at).await;
        }

        Ok(foods)
    }

    async fn detail(&self, fdc_id: u64) -> LookupResult<Option<FoodDetails>> {
        let api_key = self.api_key()?;

        if let Some(details) = cached(&self.details_cache, &fdc_id).await {
            debug!(fdc_id, "USDA detail served from cache");
            return Ok(details);
        }

        let url = format!("{}/food/{}", self.config.base_url, fdc_id);
        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", api_key)])
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let details = match response.status() {
            StatusCode::NOT_FOUND => None,
            status if status.is_success() => {
                let body: FoodDetailsResponse = response
                    .json()
                    .await
                    .map_err(|e| LookupError::Malformed(format!("USDA detail body: {}", e)))?;
                Some(FoodDetails::from(body))
            }
            status => {
                warn!(fdc_id, %status, "USDA detail lookup failed");
                return Err(LookupError::Status {
                    service: "USDA detail".to_string(),
                    status: status.as_u16(),
                });
            }
        };

        if let Some(expires_at) = self.cache_expiry() {
            store(&self.details_cache, fdc_id, details.clone(), expires_at).await;
        }

        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> UsdaClient {
        UsdaClient::new(UsdaClientConfig {
            api_key: Some("test-key".to_string()),
            base_url: server.uri(),
            timeout_secs: 5,
            cache_ttl_secs: 60,
        })
        .unwrap()
    }

    fn apple_detail() -> serde_json::Value {
        json!({
            "fdcId": 171688,
            "description": "Apples, raw, with skin",
            "foodNutrients": [
                {"nutrient": {"name": "Energy", "unitName": "kcal"}, "amount": 52.0},
                {"nutrient": {"name": "Protein", "unitName": "g"}, "amount": 0.26}
            ]
        })
    }

    #[test]
    fn test_placeholder_key_is_unusable() {
        let mut config = UsdaClientConfig::default();
        assert_eq!(config.usable_api_key(), None);

        config.api_key = Some(PLACEHOLDER_API_KEY.to_string());
        assert_eq!(config.usable_api_key(), None);

        config.api_key = Some("  ".to_string());
        assert_eq!(config.usable_api_key(), None);

        config.api_key = Some("abc123".to_string());
        assert_eq!(config.usable_api_key(), Some("abc123"));
    }

    #[test]
    fn test_search_response_parses_camel_case() {
        let body = r#"{"totalHits": 2, "foods": [
            {"fdcId": 171688, "description": "Apples, raw, with skin", "dataType": "SR Legacy"},
            {"fdcId": 1102644, "description": "Apple, raw"}
        ]}"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.foods.len(), 2);
        assert_eq!(parsed.foods[0].fdc_id, 171688);
        assert_eq!(parsed.foods[0].data_type.as_deref(), Some("SR Legacy"));
        assert_eq!(parsed.foods[1].data_type, None);
    }

    #[test]
    fn test_detail_response_skips_entries_without_nutrient() {
        let body = r#"{"fdcId": 171688, "description": "Apples, raw", "foodNutrients": [
            {"nutrient": {"id": 1008, "name": "Energy", "unitName": "kcal"}, "amount": 52.0},
            {"nutrient": {"id": 1003, "name": "Protein", "unitName": "g"}},
            {"amount": 3.0}
        ]}"#;
        let parsed: FoodDetailsResponse = serde_json::from_str(body).unwrap();
        let details = FoodDetails::from(parsed);
        assert_eq!(details.nutrients.len(), 2);
        assert_eq!(details.nutrients[0].unit_name, "kcal");
        assert_eq!(details.nutrients[1].amount, 0.0);
    }

    #[tokio::test]
    async fn test_unconfigured_client_refuses_queries() {
        let client = UsdaClient::new(UsdaClientConfig::default()).unwrap();
        assert!(!client.is_configured());
        assert!(matches!(
            client.search("apple", 1).await,
            Err(LookupError::NotConfigured)
        ));
        assert!(matches!(client.detail(1).await, Err(LookupError::NotConfigured)));
        assert!(client.search_cache.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_search_validates_query() {
        let config = UsdaClientConfig {
            api_key: Some("key".to_string()),
            ..UsdaClientConfig::default()
        };
        let client = UsdaClient::new(config).unwrap();
        assert!(matches!(
            client.search("   ", 1).await,
            Err(LookupError::InvalidQuery(_))
        ));
        assert!(matches!(
            client.search("apple", 0).await,
            Err(LookupError::InvalidQuery(_))
        ));
    }

    #[tokio::test]
    async fn test_search_sends_key_and_caches_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/foods/search"))
            .and(query_param("query", "apple"))
            .and(query_param("pageSize", "1"))
            .and(query_param("api_key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "foods": [{"fdcId": 171688, "description": "Apples, raw", "dataType": "SR Legacy"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let first = client.search("apple", 1).await.unwrap();
        let second = client.search("Apple", 1).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].fdc_id, 171688);
        assert_eq!(second[0].fdc_id, 171688);
        assert_eq!(client.search_cache.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_search_error_status_maps_to_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/foods/search"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = client_for(&server).search("apple", 1).await;
        assert!(matches!(result, Err(LookupError::Status { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_search_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/foods/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(matches!(
            client.search("apple", 1).await,
            Err(LookupError::Malformed(_))
        ));
        assert!(client.search_cache.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_detail_found_missing_and_failing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/food/171688"))
            .respond_with(ResponseTemplate::new(200).set_body_json(apple_detail()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/food/404"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/food/500"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server);

        let details = client.detail(171688).await.unwrap().unwrap();
        assert_eq!(details.description, "Apples, raw, with skin");
        assert_eq!(details.nutrients.len(), 2);

        assert_eq!(client.detail(404).await.unwrap(), None);
        assert!(matches!(
            client.detail(500).await,
            Err(LookupError::Status { status: 500, .. })
        ));
    }

    #[test]
    fn test_cache_expiry_bounds() {
        let mut config = UsdaClientConfig {
            cache_ttl_secs: 0,
            ..UsdaClientConfig::default()
        };
        assert!(UsdaClient::new(config.clone()).unwrap().cache_expiry().is_none());

        config.cache_ttl_secs = u64::MAX;
        assert!(UsdaClient::new(config.clone()).unwrap().cache_expiry().is_none());

        config.cache_ttl_secs = 60;
        assert!(UsdaClient::new(config).unwrap().cache_expiry().is_some());
    }

    #[tokio::test]
    async fn test_store_evicts_expired_and_caps_size() {
        let cache: Cache<u64, u32> = Arc::new(RwLock::new(HashMap::new()));

        store(&cache, 1, 1, Instant::now()).await;
        let later = Instant::now() + Duration::from_secs(3600);
        store(&cache, 2, 2, later).await;
        assert_eq!(cache.read().await.len(), 1);
        assert_eq!(cached(&cache, &2).await, Some(2));
        assert_eq!(cached(&cache, &1).await, None);

        for key in 10..(10 + MAX_CACHE_ENTRIES as u64) {
            store(&cache, key, 0, later + Duration::from_secs(key)).await;
        }
        let cache = cache.read().await;
        assert_eq!(cache.len(), MAX_CACHE_ENTRIES);
        // Entry 2 expired soonest, so it made room
        assert!(!cache.contains_key(&2));
        assert!(cache.contains_key(&10));
    }
}
