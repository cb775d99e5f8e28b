//! Service registry client and endpoint resolution
//!
//! The registry maps a logical service name to live instances, each
//! carrying an attribute map. Host and port are read from fixed attribute
//! keys; an instance missing either key is a hard resolution failure
//! rather than a silent fallback.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use thiserror::Error;
use tracing::info;

/// Attribute key carrying an instance's IPv4 address.
pub const ATTR_IPV4: &str = "IPV4";
/// Attribute key carrying an instance's listening port.
pub const ATTR_PORT: &str = "PORT";

/// One live instance advertised by the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInstance {
    pub instance_id: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

/// Network endpoint resolved from a registry instance. Derived once per
/// request, used for exactly one downstream call, then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub host: String,
    pub port: String,
}

impl ResolvedEndpoint {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Why a service name could not be turned into a usable endpoint.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The registry call failed or returned zero instances.
    #[error("failed to discover service instances: {0}")]
    Resolution(String),

    /// The returned instance lacks a required attribute key.
    #[error("instance {instance_id} is missing attribute '{attribute}'")]
    AttributeMissing {
        instance_id: String,
        attribute: &'static str,
    },
}

/// Lookup of live instances for a logical service name.
#[async_trait]
pub trait ServiceRegistry: Send + Sync {
    /// Return up to `max_results` healthy instances of `service_name`
    /// within `namespace`.
    async fn discover_instances(
        &self,
        service_name: &str,
        namespace: &str,
        max_results: u32,
    ) -> Result<Vec<ServiceInstance>>;
}

/// Resolve a logical service name to a single live endpoint.
///
/// Only one instance is requested, so no disambiguation is needed. No
/// downstream call is attempted when resolution fails.
pub async fn resolve_endpoint(
    registry: &dyn ServiceRegistry,
    service_name: &str,
    namespace: &str,
) -> Result<ResolvedEndpoint, ResolveError> {
    let instances = registry
        .discover_instances(service_name, namespace, 1)
        .await
        .map_err(|e| ResolveError::Resolution(format!("{:#}", e)))?;

    let instance = instances.into_iter().next().ok_or_else(|| {
        ResolveError::Resolution(format!("no instances registered for '{}'", service_name))
    })?;

    let attribute = |key: &'static str| {
        instance
            .attributes
            .get(key)
            .cloned()
            .ok_or_else(|| ResolveError::AttributeMissing {
                instance_id: instance.instance_id.clone(),
                attribute: key,
            })
    };

    Ok(ResolvedEndpoint {
        host: attribute(ATTR_IPV4)?,
        port: attribute(ATTR_PORT)?,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DiscoverInstancesRequest<'a> {
    namespace_name: &'a str,
    service_name: &'a str,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct DiscoverInstancesResponse {
    #[serde(default)]
    instances: Vec<ServiceInstance>,
}

/// REST client for the service registry API.
#[derive(Debug, Clone)]
pub struct HttpServiceRegistry {
    http_client: Client,
    base_url: String,
    api_token: String,
}

impl HttpServiceRegistry {
    /// Build a registry client from `REGISTRY_API_URL` and
    /// `REGISTRY_API_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("REGISTRY_API_URL").context("REGISTRY_API_URL must be set")?;
        let api_token = env::var("REGISTRY_API_TOKEN").context("REGISTRY_API_TOKEN must be set")?;

        let http_client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        info!("Service registry client initialized");

        Ok(Self::new(http_client, base_url, api_token))
    }

    pub fn new(
        http_client: Client,
        base_url: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
        }
    }
}

#[async_trait]
impl ServiceRegistry for HttpServiceRegistry {
    async fn discover_instances(
        &self,
        service_name: &str,
        namespace: &str,
        max_results: u32,
    ) -> Result<Vec<ServiceInstance>> {
        let url = format!("{}/v1/discover-instances", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&DiscoverInstancesRequest {
                namespace_name: namespace,
                service_name,
                max_results,
            })
            .send()
            .await
            .context("Registry API unreachable")?;

        if !response.status().is_success() {
            anyhow::bail!("Registry API returned status: {}", response.status());
        }

        let body = response
            .json::<DiscoverInstancesResponse>()
            .await
            .context("Failed to decode discover-instances response")?;

        Ok(body.instances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{bearer_token, body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct StaticRegistry(Vec<ServiceInstance>);

    #[async_trait]
    impl ServiceRegistry for StaticRegistry {
        async fn discover_instances(
            &self,
            _service_name: &str,
            _namespace: &str,
            max_results: u32,
        ) -> Result<Vec<ServiceInstance>> {
            Ok(self.0.iter().take(max_results as usize).cloned().collect())
        }
    }

    struct BrokenRegistry;

    #[async_trait]
    impl ServiceRegistry for BrokenRegistry {
        async fn discover_instances(
            &self,
            _service_name: &str,
            _namespace: &str,
            _max_results: u32,
        ) -> Result<Vec<ServiceInstance>> {
            anyhow::bail!("registry unavailable")
        }
    }

    fn instance(attributes: &[(&str, &str)]) -> ServiceInstance {
        ServiceInstance {
            instance_id: "i-1".to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_resolve_returns_host_and_port() {
        let registry = StaticRegistry(vec![instance(&[
            (ATTR_IPV4, "10.0.0.5"),
            (ATTR_PORT, "8080"),
        ])]);

        let endpoint = resolve_endpoint(&registry, "catalog", "dev").await.unwrap();

        assert_eq!(
            endpoint,
            ResolvedEndpoint {
                host: "10.0.0.5".to_string(),
                port: "8080".to_string(),
            }
        );
        assert_eq!(endpoint.base_url(), "http://10.0.0.5:8080");
    }

    #[tokio::test]
    async fn test_resolve_zero_instances_is_resolution_error() {
        let registry = StaticRegistry(Vec::new());

        let err = resolve_endpoint(&registry, "catalog", "dev")
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::Resolution(_)));
        assert!(err.to_string().contains("catalog"));
    }

    #[tokio::test]
    async fn test_resolve_registry_failure_is_resolution_error() {
        let err = resolve_endpoint(&BrokenRegistry, "catalog", "dev")
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::Resolution(_)));
        assert!(err.to_string().contains("registry unavailable"));
    }

    #[tokio::test]
    async fn test_resolve_missing_attribute_is_hard_failure() {
        let registry = StaticRegistry(vec![instance(&[(ATTR_IPV4, "10.0.0.5")])]);

        let err = resolve_endpoint(&registry, "catalog", "dev")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ResolveError::AttributeMissing {
                attribute: ATTR_PORT,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_http_registry_discovers_instances() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/discover-instances"))
            .and(bearer_token("test-token"))
            .and(body_json(serde_json::json!({
                "namespaceName": "dev",
                "serviceName": "catalog",
                "maxResults": 1,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "instances": [{
                    "instanceId": "i-1",
                    "attributes": { "IPV4": "10.0.0.5", "PORT": "8080" },
                }],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let registry = HttpServiceRegistry::new(Client::new(), server.uri(), "test-token");
        let instances = registry.discover_instances("catalog", "dev", 1).await.unwrap();

        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].instance_id, "i-1");
        assert_eq!(
            instances[0].attributes.get(ATTR_IPV4).map(String::as_str),
            Some("10.0.0.5")
        );
    }

    #[tokio::test]
    async fn test_http_registry_surfaces_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let registry = HttpServiceRegistry::new(Client::new(), server.uri(), "test-token");
        let err = registry
            .discover_instances("catalog", "dev", 1)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("500"));
    }
}
