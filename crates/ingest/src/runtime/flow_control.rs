use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::IngestError;
use crate::types::RuntimeConfig;

#[derive(Debug, Clone)]
pub struct FlowControlConfig {
    /// Scans allowed on the blocking pool at once.
    pub max_in_flight: usize,
}

impl Default for FlowControlConfig {
    fn default() -> Self {
        Self::from(&RuntimeConfig::default())
    }
}

impl From<&RuntimeConfig> for FlowControlConfig {
    fn from(value: &RuntimeConfig) -> Self {
        Self {
            max_in_flight: value.max_in_flight,
        }
    }
}

/// Hands out scan slots. Clones share the same slots, so every job of a
/// run competes for one limit.
#[derive(Clone)]
pub struct FlowController {
    slots: Arc<Semaphore>,
}

impl FlowController {
    pub fn new(config: &FlowControlConfig) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(config.max_in_flight.max(1))),
        }
    }

    /// Waits for a free slot; the slot is released when the permit drops.
    pub async fn acquire_in_flight(&self) -> Result<OwnedSemaphorePermit, IngestError> {
        Arc::clone(&self.slots)
            .acquire_owned()
            .await
            .map_err(|_| IngestError::Execution("scan slots closed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn zero_limit_still_admits_one_scan() {
        let flow = FlowController::new(&FlowControlConfig { max_in_flight: 0 });
        let permit = flow.acquire_in_flight().await.unwrap();
        let waiting = tokio::time::timeout(Duration::from_millis(20), flow.acquire_in_flight()).await;
        assert!(waiting.is_err());
        drop(permit);
        let next = tokio::time::timeout(Duration::from_millis(200), flow.acquire_in_flight()).await;
        assert!(matches!(next, Ok(Ok(_))));
    }
}
