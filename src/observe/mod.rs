//! Observer chain: builds the observed config from watch cache contents.
//!
//! Every observer is a plain function sharing [`ObserveConfigFn`]. Each one
//! reads a few records through [`Listers`] and folds the fields it owns into
//! the accumulating document, never touching fields owned by another
//! observer. The first error aborts the chain.


use std::sync::Arc;

use tracing::trace;
use tracing::warn;

use crate::cache::Lister;
use crate::constants::DEFAULT_NODE_SELECTOR_PATH;
use crate::constants::INTERNAL_REGISTRY_HOSTNAME_PATH;
use crate::constants::STORAGE_URLS_PATH;
use crate::ConfigMap;
use crate::Endpoints;
use crate::ImageConfig;
use crate::ObservedConfig;
use crate::ObservedSources;
use crate::Result;

/// Read access shared by every observer.
#[derive(Clone)]
pub struct Listers {
    pub config_maps: Arc<dyn Lister<ConfigMap>>,
    pub endpoints: Arc<dyn Lister<Endpoints>>,
    pub image_configs: Arc<dyn Lister<ImageConfig>>,
    /// Names of the records to read
    pub sources: ObservedSources,
}

/// Folds one group of fields into `observed`.
pub type ObserveConfigFn = fn(&Listers, ObservedConfig) -> Result<ObservedConfig>;

/// The observers run on every pass, in order.
pub fn default_observers() -> Vec<ObserveConfigFn> {
    vec![
        observe_kube_apiserver_public_info as ObserveConfigFn,
        observe_etcd_endpoints,
        observe_internal_registry_hostname,
    ]
}

/// Runs `observers` in order on an empty document.
pub fn run_chain(
    observers: &[ObserveConfigFn],
    listers: &Listers,
) -> Result<ObservedConfig> {
    observers
        .iter()
        .try_fold(ObservedConfig::new(), |observed, observe| observe(listers, observed))
}

/// Copies the default node selector published by the kube-apiserver into
/// `projectConfig.defaultNodeSelector`.
pub fn observe_kube_apiserver_public_info(
    listers: &Listers,
    mut observed: ObservedConfig,
) -> Result<ObservedConfig> {
    let sources = &listers.sources;
    let public_info = match listers
        .config_maps
        .get(&sources.kube_apiserver_namespace, &sources.public_info_config_map)
    {
        Ok(cm) => cm,
        Err(e) if e.is_not_found() => {
            trace!("{}", e);
            return Ok(observed);
        }
        Err(e) => return Err(e),
    };

    if let Some(selector) = public_info.data.get(&sources.default_node_selector_key) {
        observed.set_nested_field(selector.as_str(), DEFAULT_NODE_SELECTOR_PATH)?;
    }
    Ok(observed)
}

/// Synthesizes one client URL per etcd member into `storageConfig.urls`.
///
/// URLs follow address order across subsets. The field is left unset when
/// there is no member to point at.
pub fn observe_etcd_endpoints(
    listers: &Listers,
    mut observed: ObservedConfig,
) -> Result<ObservedConfig> {
    let sources = &listers.sources;
    let endpoints = match listers
        .endpoints
        .get(&sources.etcd_namespace, &sources.etcd_endpoints_name)
    {
        Ok(ep) => ep,
        Err(e) if e.is_not_found() => {
            warn!("no etcd endpoints found: {}", e);
            return Ok(observed);
        }
        Err(e) => return Err(e),
    };

    let dns_suffix = endpoints
        .metadata
        .annotations
        .get(&sources.etcd_dns_suffix_annotation)
        .map(String::as_str)
        .unwrap_or_default();

    let urls: Vec<String> = endpoints
        .subsets
        .iter()
        .flat_map(|subset| subset.addresses.iter())
        .map(|address| {
            format!(
                "{}://{}.{}:{}",
                sources.etcd_url_scheme, address.hostname, dns_suffix, sources.etcd_client_port
            )
        })
        .collect();

    if !urls.is_empty() {
        observed.set_nested_string_slice(&urls, STORAGE_URLS_PATH)?;
    }
    Ok(observed)
}

/// Copies the cluster's internal registry hostname into
/// `imagePolicyConfig.internalRegistryHostname`.
pub fn observe_internal_registry_hostname(
    listers: &Listers,
    mut observed: ObservedConfig,
) -> Result<ObservedConfig> {
    let image_config = match listers.image_configs.get("", &listers.sources.image_config_name) {
        Ok(image) => image,
        Err(e) if e.is_not_found() => return Ok(observed),
        Err(e) => return Err(e),
    };

    let hostname = &image_config.status.internal_registry_hostname;
    if !hostname.is_empty() {
        observed.set_nested_field(hostname.as_str(), INTERNAL_REGISTRY_HOSTNAME_PATH)?;
    }
    Ok(observed)
}
