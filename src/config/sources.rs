use serde::Deserialize;
use serde::Serialize;

use super::config_error;
use super::validate_name;
use crate::constants::*;
use crate::Result;

/// Names of the records folded into the observed config.
///
/// Each observer reads exactly the records named here; the values default to
/// the records the kube-apiserver and installer publish.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ObservedSources {
    /// Namespace holding the kube-apiserver public info config map
    #[serde(default = "default_kube_apiserver_namespace")]
    pub kube_apiserver_namespace: String,

    #[serde(default = "default_public_info_config_map")]
    pub public_info_config_map: String,

    /// Data key copied into `projectConfig.defaultNodeSelector`
    #[serde(default = "default_node_selector_key")]
    pub default_node_selector_key: String,

    #[serde(default = "default_etcd_namespace")]
    pub etcd_namespace: String,

    #[serde(default = "default_etcd_endpoints_name")]
    pub etcd_endpoints_name: String,

    /// Annotation on the etcd endpoints carrying the DNS suffix of each member
    #[serde(default = "default_etcd_dns_suffix_annotation")]
    pub etcd_dns_suffix_annotation: String,

    #[serde(default = "default_etcd_url_scheme")]
    pub etcd_url_scheme: String,

    #[serde(default = "default_etcd_client_port")]
    pub etcd_client_port: u16,

    /// Cluster-scoped image config name
    #[serde(default = "default_image_config_name")]
    pub image_config_name: String,

    /// Namespace whose lifecycle events re-trigger reconciliation
    #[serde(default = "default_target_namespace")]
    pub target_namespace: String,
}

impl Default for ObservedSources {
    fn default() -> Self {
        Self {
            kube_apiserver_namespace: default_kube_apiserver_namespace(),
            public_info_config_map: default_public_info_config_map(),
            default_node_selector_key: default_node_selector_key(),
            etcd_namespace: default_etcd_namespace(),
            etcd_endpoints_name: default_etcd_endpoints_name(),
            etcd_dns_suffix_annotation: default_etcd_dns_suffix_annotation(),
            etcd_url_scheme: default_etcd_url_scheme(),
            etcd_client_port: default_etcd_client_port(),
            image_config_name: default_image_config_name(),
            target_namespace: default_target_namespace(),
        }
    }
}

impl ObservedSources {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.kube_apiserver_namespace, "sources.kube_apiserver_namespace")?;
        validate_name(&self.public_info_config_map, "sources.public_info_config_map")?;
        validate_name(&self.default_node_selector_key, "sources.default_node_selector_key")?;
        validate_name(&self.etcd_namespace, "sources.etcd_namespace")?;
        validate_name(&self.etcd_endpoints_name, "sources.etcd_endpoints_name")?;
        validate_name(&self.etcd_dns_suffix_annotation, "sources.etcd_dns_suffix_annotation")?;
        validate_name(&self.etcd_url_scheme, "sources.etcd_url_scheme")?;
        validate_name(&self.image_config_name, "sources.image_config_name")?;
        validate_name(&self.target_namespace, "sources.target_namespace")?;

        if self.etcd_client_port == 0 {
            return Err(config_error("sources.etcd_client_port cannot be 0"));
        }
        Ok(())
    }
}

fn default_kube_apiserver_namespace() -> String {
    KUBE_APISERVER_NAMESPACE.to_string()
}
fn default_public_info_config_map() -> String {
    PUBLIC_INFO_CONFIG_MAP.to_string()
}
fn default_node_selector_key() -> String {
    DEFAULT_NODE_SELECTOR_KEY.to_string()
}
fn default_etcd_namespace() -> String {
    ETCD_NAMESPACE.to_string()
}
fn default_etcd_endpoints_name() -> String {
    ETCD_ENDPOINTS_NAME.to_string()
}
fn default_etcd_dns_suffix_annotation() -> String {
    ETCD_DNS_SUFFIX_ANNOTATION.to_string()
}
fn default_etcd_url_scheme() -> String {
    ETCD_URL_SCHEME.to_string()
}
fn default_etcd_client_port() -> u16 {
    ETCD_CLIENT_PORT
}
fn default_image_config_name() -> String {
    IMAGE_CONFIG_NAME.to_string()
}
fn default_target_namespace() -> String {
    TARGET_NAMESPACE.to_string()
}
