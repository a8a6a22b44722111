// # Azure DNS Client
//
// Implements the zones and records capabilities against the Azure
// Resource Manager REST API.
//
// ## API Calls
//
// ```http
// GET    {arm}/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Network/dnsZones
// GET    {arm}/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Network/dnsZones/{zone}/recordsets
// DELETE {arm}/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Network/dnsZones/{zone}/{TYPE}/{name}
// PUT    {arm}/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Network/dnsZones/{zone}/{TYPE}/{name}
// Authorization: Bearer <token>
// ```
//
// List operations follow `nextLink` until the last page. Each mutation is
// one request; there is no retry here.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use zonesync_core::traits::{RawRecord, RecordSetProperties, RecordsClient, ZonesClient};
use zonesync_core::{Error, RecordType, Result, Zone};

use crate::config::AzureConfig;
use crate::wire::{ListPage, RecordSetBody, RecordSetResource, ZoneResource};

/// API version of the Microsoft.Network DNS resources
const DNS_API_VERSION: &str = "2018-05-01";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Provider name used in error messages
const PROVIDER: &str = "azure";

/// Azure DNS REST client
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct AzureDnsClient {
    /// HTTP client for API requests
    http: reqwest::Client,

    /// Resource Manager endpoint (no trailing slash)
    endpoint: String,

    /// Subscription holding the zones
    subscription_id: String,

    /// Resource group holding the zones
    resource_group: String,

    /// Bearer token
    /// ⚠️ NEVER log this value
    access_token: String,
}

impl std::fmt::Debug for AzureDnsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureDnsClient")
            .field("endpoint", &self.endpoint)
            .field("subscription_id", &self.subscription_id)
            .field("resource_group", &self.resource_group)
            .field("access_token", &"<REDACTED>")
            .finish()
    }
}

impl AzureDnsClient {
    /// Create a client for the subscription and resource group in `config`
    ///
    /// # Parameters
    ///
    /// - `config`: Parsed Azure config file
    /// - `access_token`: Resource Manager bearer token
    pub fn new(config: &AzureConfig, access_token: impl Into<String>) -> Result<Self> {
        let access_token = access_token.into();
        if access_token.is_empty() {
            return Err(Error::config("Azure access token cannot be empty"));
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: config.environment()?.resource_manager_endpoint().to_string(),
            subscription_id: config.subscription_id.clone(),
            resource_group: config.resource_group.clone(),
            access_token,
        })
    }

    /// Override the Resource Manager endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    fn zones_url(&self) -> String {
        format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/dnsZones",
            self.endpoint, self.subscription_id, self.resource_group
        )
    }

    fn record_sets_url(&self, zone: &Zone) -> String {
        format!("{}/{}/recordsets", self.zones_url(), zone.name)
    }

    fn record_set_url(&self, zone: &Zone, relative_name: &str, record_type: RecordType) -> String {
        format!(
            "{}/{}/{}/{}",
            self.zones_url(),
            zone.name,
            record_type,
            relative_name
        )
    }

    /// Fetch every page of a list operation
    async fn list_all<T: DeserializeOwned>(&self, url: String, what: &str) -> Result<Vec<T>> {
        let first = format!("{}?api-version={}", url, DNS_API_VERSION);
        collect_pages(first, |page_url| self.fetch_page(page_url, what)).await
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        url: String,
        what: &str,
    ) -> Result<ListPage<T>> {
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("HTTP request failed: {}", e)))?;

        check_status(response, what)
            .await?
            .json()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("Failed to parse response: {}", e)))
    }
}

/// Follow `nextLink` from `first_url` until a page without one
///
/// `nextLink` already carries api-version and the skip token, so it is
/// fetched as given.
async fn collect_pages<T, F, Fut>(first_url: String, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<ListPage<T>>>,
{
    let mut items = Vec::new();
    let mut next = Some(first_url);

    while let Some(url) = next {
        let page = fetch(url).await?;
        items.extend(page.value);
        next = page.next_link.filter(|link| !link.is_empty());
    }

    Ok(items)
}

/// Map a non-success response to an error
async fn check_status(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());

    Err(match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "Invalid access token or insufficient permissions for {}. Status: {}",
            what, status
        )),
        404 => Error::not_found(format!("{} not found: {}", what, error_text)),
        409 | 412 => Error::conflict(format!(
            "{} is being modified by another process. Status: {}",
            what, status
        )),
        429 => Error::rate_limited(format!(
            "Rate limit exceeded for {}. Please retry later. Status: {}",
            what, status
        )),
        500..=599 => Error::provider(
            PROVIDER,
            format!("Azure server error (transient) for {}: {} - {}", what, status, error_text),
        ),
        _ => Error::provider(
            PROVIDER,
            format!("Request for {} failed: {} - {}", what, status, error_text),
        ),
    })
}

#[async_trait]
impl ZonesClient for AzureDnsClient {
    async fn list_zones(&self) -> Result<Vec<Zone>> {
        tracing::debug!("Listing Azure DNS zones in resource group '{}'", self.resource_group);

        let resources: Vec<ZoneResource> = self
            .list_all(self.zones_url(), "DNS zones")
            .await
            .map_err(|e| Error::zone_fetch(e.to_string()))?;

        Ok(resources
            .into_iter()
            .filter_map(ZoneResource::into_zone)
            .collect())
    }
}

#[async_trait]
impl RecordsClient for AzureDnsClient {
    async fn list_records(&self, zone: &Zone) -> Result<Vec<RawRecord>> {
        tracing::debug!("Listing record sets of Azure DNS zone '{}'", zone.name);

        let resources: Vec<RecordSetResource> = self
            .list_all(self.record_sets_url(zone), &format!("record sets of zone '{}'", zone.name))
            .await?;

        Ok(resources.into_iter().map(RawRecord::from).collect())
    }

    async fn delete_record(
        &self,
        zone: &Zone,
        relative_name: &str,
        record_type: RecordType,
    ) -> Result<()> {
        let url = self.record_set_url(zone, relative_name, record_type);

        let response = self
            .http
            .delete(&url)
            .query(&[("api-version", DNS_API_VERSION)])
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("HTTP request failed: {}", e)))?;

        check_status(
            response,
            &format!("{} record set '{}' in zone '{}'", record_type, relative_name, zone.name),
        )
        .await?;

        Ok(())
    }

    async fn upsert_record(
        &self,
        zone: &Zone,
        relative_name: &str,
        record_type: RecordType,
        value: &str,
        ttl: u32,
    ) -> Result<()> {
        let url = self.record_set_url(zone, relative_name, record_type);
        let body = RecordSetBody {
            properties: RecordSetProperties::for_target(record_type, value, ttl).into(),
        };

        let response = self
            .http
            .put(&url)
            .query(&[("api-version", DNS_API_VERSION)])
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("HTTP request failed: {}", e)))?;

        check_status(
            response,
            &format!("{} record set '{}' in zone '{}'", record_type, relative_name, zone.name),
        )
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn config() -> AzureConfig {
        AzureConfig::from_yaml("subscriptionId: sub\nresourceGroup: k8s\n").unwrap()
    }

    #[test]
    fn test_resource_urls() {
        let client = AzureDnsClient::new(&config(), "token").unwrap();
        let zone = Zone::new("example.com");

        assert_eq!(
            client.zones_url(),
            "https://management.azure.com/subscriptions/sub/resourceGroups/k8s/providers/Microsoft.Network/dnsZones"
        );
        assert!(client.record_sets_url(&zone).ends_with("/dnsZones/example.com/recordsets"));
        assert!(client
            .record_set_url(&zone, "@", RecordType::Txt)
            .ends_with("/dnsZones/example.com/TXT/@"));
    }

    #[test]
    fn test_endpoint_override_trims_slash() {
        let client = AzureDnsClient::new(&config(), "token")
            .unwrap()
            .with_endpoint("http://127.0.0.1:8080/");
        assert!(client.zones_url().starts_with("http://127.0.0.1:8080/subscriptions/"));
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(matches!(
            AzureDnsClient::new(&config(), ""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_token_not_exposed_in_debug() {
        let client = AzureDnsClient::new(&config(), "secret_token_12345").unwrap();
        let debug_str = format!("{:?}", client);
        assert!(!debug_str.contains("secret_token"));
        assert!(debug_str.contains("AzureDnsClient"));
    }

    fn response(status: u16, body: &str) -> reqwest::Response {
        reqwest::Response::from(
            http::Response::builder()
                .status(status)
                .body(body.to_string())
                .unwrap(),
        )
    }

    fn page(value: &[&str], next_link: Option<&str>) -> ListPage<String> {
        ListPage {
            value: value.iter().map(|v| v.to_string()).collect(),
            next_link: next_link.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_pages_followed_until_last() {
        let pages = Mutex::new(VecDeque::from(vec![
            page(&["a", "b"], Some("https://arm/page2?api-version=2018-05-01&$skipToken=x")),
            page(&["c"], Some("")),
        ]));
        let requested = Mutex::new(Vec::new());

        let items = collect_pages("https://arm/zones?api-version=2018-05-01".to_string(), |url| {
            requested.lock().unwrap().push(url);
            let next = pages.lock().unwrap().pop_front();
            async move { next.ok_or_else(|| Error::provider(PROVIDER, "no more pages")) }
        })
        .await
        .unwrap();

        assert_eq!(items, vec!["a", "b", "c"]);
        assert_eq!(
            *requested.lock().unwrap(),
            vec![
                "https://arm/zones?api-version=2018-05-01".to_string(),
                "https://arm/page2?api-version=2018-05-01&$skipToken=x".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_single_page_without_next_link() {
        let mut calls = 0;
        let items = collect_pages("https://arm/zones".to_string(), |_| {
            calls += 1;
            async { Ok(page(&["only"], None)) }
        })
        .await
        .unwrap();

        assert_eq!(items, vec!["only"]);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_page_error_stops_listing() {
        let mut calls = 0;
        let result: Result<Vec<String>> = collect_pages("https://arm/zones".to_string(), |_| {
            calls += 1;
            let first = calls == 1;
            async move {
                if first {
                    Ok(page(&["a"], Some("https://arm/page2")))
                } else {
                    Err(Error::rate_limited("slow down"))
                }
            }
        })
        .await;

        assert!(matches!(result, Err(Error::RateLimited(_))));
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn test_success_status_passes_through() {
        let ok = check_status(response(200, "{}"), "DNS zones").await.unwrap();
        assert_eq!(ok.status(), 200);
    }

    #[tokio::test]
    async fn test_status_mapping() {
        for status in [401, 403] {
            let err = check_status(response(status, ""), "DNS zones").await.unwrap_err();
            assert!(matches!(err, Error::Authentication(_)), "status {}", status);
        }

        let err = check_status(response(404, "ZoneNotFound"), "DNS zones").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(err.to_string().contains("ZoneNotFound"));

        for status in [409, 412] {
            let err = check_status(response(status, ""), "A record set 'www'").await.unwrap_err();
            assert!(matches!(err, Error::Conflict(_)), "status {}", status);
        }

        let err = check_status(response(429, ""), "DNS zones").await.unwrap_err();
        assert!(matches!(err, Error::RateLimited(_)));
    }

    #[tokio::test]
    async fn test_server_and_other_errors_are_provider_errors() {
        let err = check_status(response(503, "busy"), "DNS zones").await.unwrap_err();
        assert!(matches!(err, Error::Provider { .. }));
        assert!(err.to_string().contains("transient"));
        assert!(err.to_string().contains("busy"));

        let err = check_status(response(400, "BadRequest"), "DNS zones").await.unwrap_err();
        assert!(matches!(err, Error::Provider { .. }));
        assert!(!err.to_string().contains("transient"));
        assert!(err.to_string().contains("BadRequest"));
    }
}
