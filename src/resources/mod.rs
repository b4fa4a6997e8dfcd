//! Typed views of the remote records the observer watches.
//!
//! Only the fields the observers read are modelled; everything else a record
//! carries on the server is irrelevant to the derived document.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::ObservedConfig;
use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectMeta {
    pub name: String,
    /// Empty for cluster-scoped records
    pub namespace: String,
    pub annotations: BTreeMap<String, String>,
    /// Concurrency token echoed back on update
    pub resource_version: String,
}

impl ObjectMeta {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    pub fn cluster_scoped(name: impl Into<String>) -> Self {
        Self::new("", name)
    }

    /// Cache key: `namespace/name`, or `name` for cluster-scoped records.
    pub fn key(&self) -> String {
        object_key(&self.namespace, &self.name)
    }
}

pub fn object_key(
    namespace: &str,
    name: &str,
) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}/{name}")
    }
}

/// A record kind that can live in a watch cache.
pub trait Resource: Debug + Send + Sync + 'static {
    const KIND: &'static str;

    fn metadata(&self) -> &ObjectMeta;

    /// Wraps a cached object into the kind-tagged notification payload.
    fn into_watched(obj: Arc<Self>) -> WatchedObject;
}

/// Kind-tagged payload carried by cache notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchedObject {
    OperatorConfig(Arc<OperatorConfig>),
    ConfigMap(Arc<ConfigMap>),
    ServiceAccount(Arc<ServiceAccount>),
    Endpoints(Arc<Endpoints>),
    ImageConfig(Arc<ImageConfig>),
    Namespace(Arc<Namespace>),
}

impl WatchedObject {
    pub fn kind(&self) -> &'static str {
        match self {
            WatchedObject::OperatorConfig(_) => OperatorConfig::KIND,
            WatchedObject::ConfigMap(_) => ConfigMap::KIND,
            WatchedObject::ServiceAccount(_) => ServiceAccount::KIND,
            WatchedObject::Endpoints(_) => Endpoints::KIND,
            WatchedObject::ImageConfig(_) => ImageConfig::KIND,
            WatchedObject::Namespace(_) => Namespace::KIND,
        }
    }

    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            WatchedObject::OperatorConfig(o) => o.metadata(),
            WatchedObject::ConfigMap(o) => o.metadata(),
            WatchedObject::ServiceAccount(o) => o.metadata(),
            WatchedObject::Endpoints(o) => o.metadata(),
            WatchedObject::ImageConfig(o) => o.metadata(),
            WatchedObject::Namespace(o) => o.metadata(),
        }
    }

    pub fn as_namespace(&self) -> Option<&Namespace> {
        match self {
            WatchedObject::Namespace(ns) => Some(ns),
            _ => None,
        }
    }
}

macro_rules! impl_resource {
    ($ty:ident, $kind:literal) => {
        impl Resource for $ty {
            const KIND: &'static str = $kind;

            fn metadata(&self) -> &ObjectMeta {
                &self.metadata
            }

            fn into_watched(obj: Arc<Self>) -> WatchedObject {
                WatchedObject::$ty(obj)
            }
        }
    };
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigMap {
    pub metadata: ObjectMeta,
    pub data: BTreeMap<String, String>,
}
impl_resource!(ConfigMap, "ConfigMap");

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceAccount {
    pub metadata: ObjectMeta,
}
impl_resource!(ServiceAccount, "ServiceAccount");

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Namespace {
    pub metadata: ObjectMeta,
}
impl_resource!(Namespace, "Namespace");

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub metadata: ObjectMeta,
    pub subsets: Vec<EndpointSubset>,
}
impl_resource!(Endpoints, "Endpoints");

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointSubset {
    pub addresses: Vec<EndpointAddress>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointAddress {
    pub ip: String,
    pub hostname: String,
}

/// Cluster-scoped image configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub metadata: ObjectMeta,
    pub status: ImageConfigStatus,
}
impl_resource!(ImageConfig, "Image");

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageConfigStatus {
    pub internal_registry_hostname: String,
}

/// Embedded, self-describing blob as stored by the remote API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawExtension {
    pub raw: Vec<u8>,
}

impl RawExtension {
    pub fn from_document(document: &ObservedConfig) -> Result<Self> {
        Ok(Self {
            raw: document.to_raw()?,
        })
    }
}

/// The operator's own configuration record.
///
/// The observer owns `spec.observed_config` only; every other field is
/// carried through an update untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperatorConfig {
    pub metadata: ObjectMeta,
    pub spec: OperatorConfigSpec,
    pub status: serde_json::Value,
}
impl_resource!(OperatorConfig, "OpenShiftAPIServerOperatorConfig");

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperatorConfigSpec {
    pub management_state: String,
    pub log_level: String,
    pub observed_config: RawExtension,
    pub unsupported_config_overrides: RawExtension,
}
