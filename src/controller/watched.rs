use std::sync::Arc;

use crate::cache::CacheSynced;
use crate::cache::ResourceEventHandler;
use crate::cache::Store;
use crate::observe::Listers;
use crate::queue::WorkQueue;
use crate::reporter::ErrorReporter;
use crate::router::EnqueueOnChange;
use crate::router::NamespaceEventHandler;
use crate::ConfigMap;
use crate::Endpoints;
use crate::ImageConfig;
use crate::Namespace;
use crate::ObservedSources;
use crate::OperatorConfig;
use crate::ServiceAccount;

/// Every watch cache whose changes re-trigger reconciliation.
///
/// The watch feeds write into these stores; the controller reads through
/// them and waits for all of them to sync before its worker starts.
#[derive(Default)]
pub struct WatchedSources {
    pub operator_configs: Arc<Store<OperatorConfig>>,
    pub config_maps: Arc<Store<ConfigMap>>,
    pub service_accounts: Arc<Store<ServiceAccount>>,
    pub endpoints: Arc<Store<Endpoints>>,
    pub image_configs: Arc<Store<ImageConfig>>,
    pub namespaces: Arc<Store<Namespace>>,
}

impl WatchedSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn listers(
        &self,
        sources: &ObservedSources,
    ) -> Listers {
        Listers {
            config_maps: self.config_maps.clone(),
            endpoints: self.endpoints.clone(),
            image_configs: self.image_configs.clone(),
            sources: sources.clone(),
        }
    }

    pub(crate) fn synced(&self) -> Vec<Arc<dyn CacheSynced>> {
        vec![
            self.operator_configs.clone() as Arc<dyn CacheSynced>,
            self.config_maps.clone(),
            self.service_accounts.clone(),
            self.endpoints.clone(),
            self.image_configs.clone(),
            self.namespaces.clone(),
        ]
    }

    /// Routes every store's notifications onto `queue`. Namespaces only
    /// count when they are `target_namespace`.
    pub(crate) fn register_handlers(
        &self,
        queue: &WorkQueue,
        target_namespace: &str,
        reporter: Arc<dyn ErrorReporter>,
    ) {
        let on_change: Arc<dyn ResourceEventHandler> = Arc::new(EnqueueOnChange::new(queue.clone()));
        self.operator_configs.add_event_handler(on_change.clone());
        self.config_maps.add_event_handler(on_change.clone());
        self.service_accounts.add_event_handler(on_change.clone());
        self.endpoints.add_event_handler(on_change.clone());
        self.image_configs.add_event_handler(on_change);

        self.namespaces.add_event_handler(Arc::new(NamespaceEventHandler::new(
            queue.clone(),
            target_namespace,
            reporter,
        )));
    }
}
