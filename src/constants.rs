// -
// Work queue

/// The only key ever placed on the work queue
pub const WORK_QUEUE_KEY: &str = "key";

/// Default queue name, used for metrics labels and logs
pub const DEFAULT_QUEUE_NAME: &str = "ConfigObserver";

// -
// Operator config

pub const OPERATOR_CONFIG_NAME: &str = "instance";

// -
// Observed sources

pub const KUBE_APISERVER_NAMESPACE: &str = "openshift-kube-apiserver";
pub const PUBLIC_INFO_CONFIG_MAP: &str = "public-info";
pub const DEFAULT_NODE_SELECTOR_KEY: &str = "projectConfig.defaultNodeSelector";

pub const ETCD_NAMESPACE: &str = "kube-system";
pub const ETCD_ENDPOINTS_NAME: &str = "etcd";
pub const ETCD_DNS_SUFFIX_ANNOTATION: &str = "alpha.installer.openshift.io/dns-suffix";
pub const ETCD_URL_SCHEME: &str = "https";
pub const ETCD_CLIENT_PORT: u16 = 2379;

pub const IMAGE_CONFIG_NAME: &str = "cluster";

pub const TARGET_NAMESPACE: &str = "openshift-apiserver";

// -
// Observed config paths

pub(crate) const DEFAULT_NODE_SELECTOR_PATH: &[&str] = &["projectConfig", "defaultNodeSelector"];
pub(crate) const STORAGE_URLS_PATH: &[&str] = &["storageConfig", "urls"];
pub(crate) const INTERNAL_REGISTRY_HOSTNAME_PATH: &[&str] =
    &["imagePolicyConfig", "internalRegistryHostname"];
