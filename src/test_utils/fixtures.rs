use std::sync::Arc;

use crate::cache::Store;
use crate::constants::*;
use crate::observe::Listers;
use crate::ConfigMap;
use crate::EndpointAddress;
use crate::EndpointSubset;
use crate::Endpoints;
use crate::ImageConfig;
use crate::ImageConfigStatus;
use crate::Namespace;
use crate::ObjectMeta;
use crate::ObservedSources;
use crate::OperatorConfig;
use crate::OperatorConfigSpec;
use crate::RawExtension;
use crate::ServiceAccount;

pub fn config_map(
    namespace: &str,
    name: &str,
    data: &[(&str, &str)],
) -> ConfigMap {
    ConfigMap {
        metadata: ObjectMeta::new(namespace, name),
        data: data
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

/// The kube-apiserver `public-info` config map carrying `selector`.
pub fn public_info(selector: &str) -> ConfigMap {
    config_map(
        KUBE_APISERVER_NAMESPACE,
        PUBLIC_INFO_CONFIG_MAP,
        &[(DEFAULT_NODE_SELECTOR_KEY, selector)],
    )
}

/// etcd endpoints with one subset per entry of `subsets`.
pub fn etcd_endpoints(
    dns_suffix: &str,
    subsets: &[&[&str]],
) -> Endpoints {
    let mut metadata = ObjectMeta::new(ETCD_NAMESPACE, ETCD_ENDPOINTS_NAME);
    metadata
        .annotations
        .insert(ETCD_DNS_SUFFIX_ANNOTATION.to_string(), dns_suffix.to_string());
    Endpoints {
        metadata,
        subsets: subsets
            .iter()
            .map(|hostnames| EndpointSubset {
                addresses: hostnames
                    .iter()
                    .enumerate()
                    .map(|(i, hostname)| EndpointAddress {
                        ip: format!("10.0.0.{}", i + 1),
                        hostname: hostname.to_string(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

pub fn image_config(internal_registry_hostname: &str) -> ImageConfig {
    ImageConfig {
        metadata: ObjectMeta::cluster_scoped(IMAGE_CONFIG_NAME),
        status: ImageConfigStatus {
            internal_registry_hostname: internal_registry_hostname.to_string(),
        },
    }
}

pub fn namespace(name: &str) -> Namespace {
    Namespace {
        metadata: ObjectMeta::cluster_scoped(name),
    }
}

pub fn service_account(
    namespace: &str,
    name: &str,
) -> ServiceAccount {
    ServiceAccount {
        metadata: ObjectMeta::new(namespace, name),
    }
}

/// Operator config `instance` at resource version "1" holding `observed`
/// verbatim, plus unrelated operator state.
pub fn operator_config(observed: &[u8]) -> OperatorConfig {
    let mut metadata = ObjectMeta::cluster_scoped(OPERATOR_CONFIG_NAME);
    metadata.resource_version = "1".to_string();
    OperatorConfig {
        metadata,
        spec: OperatorConfigSpec {
            management_state: "Managed".to_string(),
            log_level: "Normal".to_string(),
            observed_config: RawExtension {
                raw: observed.to_vec(),
            },
            unsupported_config_overrides: RawExtension {
                raw: br#"{"debug":true}"#.to_vec(),
            },
        },
        status: serde_json::json!({ "observedGeneration": 3 }),
    }
}

/// Synced in-memory caches backing a [`Listers`].
pub struct TestCaches {
    pub config_maps: Arc<Store<ConfigMap>>,
    pub endpoints: Arc<Store<Endpoints>>,
    pub image_configs: Arc<Store<ImageConfig>>,
}

impl TestCaches {
    pub fn new(
        config_maps: Vec<ConfigMap>,
        endpoints: Vec<Endpoints>,
        image_configs: Vec<ImageConfig>,
    ) -> Self {
        let caches = Self {
            config_maps: Arc::new(Store::new()),
            endpoints: Arc::new(Store::new()),
            image_configs: Arc::new(Store::new()),
        };
        caches.config_maps.replace(config_maps);
        caches.endpoints.replace(endpoints);
        caches.image_configs.replace(image_configs);
        caches
    }

    pub fn empty() -> Self {
        Self::new(vec![], vec![], vec![])
    }

    pub fn listers(&self) -> Listers {
        Listers {
            config_maps: self.config_maps.clone(),
            endpoints: self.endpoints.clone(),
            image_configs: self.image_configs.clone(),
            sources: ObservedSources::default(),
        }
    }
}
