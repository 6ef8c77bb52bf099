use crate::domain::model::Connectivity;
use crate::domain::traits::NetworkMonitor;

/// Connectivity declared up front (from config) rather than probed
#[derive(Debug, Clone, Copy)]
pub struct StaticNetwork(pub Connectivity);

impl NetworkMonitor for StaticNetwork {
    fn connectivity(&self) -> Connectivity {
        self.0
    }
}
