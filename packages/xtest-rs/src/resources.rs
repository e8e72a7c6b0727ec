use crate::error::{Result, XTestError};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};

/// Resource kind for the instruction-set simulator
pub const XSIM: &str = "xsim";

/// Pools of shared execution resources, one counting semaphore per kind.
///
/// Slots are handed out as [`ResourceHandle`]s and returned to the pool when
/// the handle is dropped.
#[derive(Debug, Clone, Default)]
pub struct ResourceBroker {
    pools: HashMap<String, Pool>,
}

#[derive(Debug, Clone)]
struct Pool {
    capacity: usize,
    slots: Arc<Semaphore>,
}

impl ResourceBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a broker from a `kind -> slots` map
    pub fn from_capacities(capacities: &BTreeMap<String, usize>) -> Result<Self> {
        let mut broker = Self::new();
        for (kind, &slots) in capacities {
            broker = broker.with_pool(kind.clone(), slots)?;
        }
        Ok(broker)
    }

    pub fn with_pool(mut self, kind: impl Into<String>, slots: usize) -> Result<Self> {
        let kind = kind.into();
        if slots == 0 {
            return Err(XTestError::InvalidParameter(format!(
                "Resource pool '{}' must have at least one slot",
                kind
            )));
        }
        self.pools.insert(
            kind,
            Pool {
                capacity: slots,
                slots: Arc::new(Semaphore::new(slots)),
            },
        );
        Ok(self)
    }

    fn pool(&self, kind: &str) -> Result<&Pool> {
        self.pools.get(kind).ok_or_else(|| {
            XTestError::ResourceUnavailable(format!("unknown resource kind '{}'", kind))
        })
    }

    /// Wait for a free slot of `kind`.
    pub async fn request_resource(&self, kind: &str) -> Result<ResourceHandle> {
        let pool = self.pool(kind)?;
        log::debug!("Requesting '{}' resource ({} free)", kind, pool.slots.available_permits());
        let permit = pool
            .slots
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| XTestError::ResourceUnavailable(format!("'{}' pool is closed", kind)))?;
        Ok(ResourceHandle {
            kind: kind.to_string(),
            _permit: permit,
        })
    }

    /// Take a slot of `kind` only if one is free right now.
    pub fn try_request_resource(&self, kind: &str) -> Result<ResourceHandle> {
        let pool = self.pool(kind)?;
        let permit = pool.slots.clone().try_acquire_owned().map_err(|e| match e {
            TryAcquireError::NoPermits => XTestError::ResourceUnavailable(format!(
                "all {} '{}' slots are in use",
                pool.capacity, kind
            )),
            TryAcquireError::Closed => {
                XTestError::ResourceUnavailable(format!("'{}' pool is closed", kind))
            }
        })?;
        Ok(ResourceHandle {
            kind: kind.to_string(),
            _permit: permit,
        })
    }

    pub fn capacity(&self, kind: &str) -> Option<usize> {
        self.pools.get(kind).map(|p| p.capacity)
    }

    pub fn available(&self, kind: &str) -> Option<usize> {
        self.pools.get(kind).map(|p| p.slots.available_permits())
    }
}

/// A held resource slot; dropping it returns the slot to its pool.
#[derive(Debug)]
pub struct ResourceHandle {
    kind: String,
    _permit: OwnedSemaphorePermit,
}

impl ResourceHandle {
    pub fn kind(&self) -> &str {
        &self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_unknown_kind_is_unavailable() {
        let broker = ResourceBroker::new().with_pool(XSIM, 1).unwrap();
        let err = broker.try_request_resource("hw").unwrap_err();
        assert!(matches!(err, XTestError::ResourceUnavailable(_)));
    }

    #[test]
    fn test_zero_slots_rejected() {
        assert!(ResourceBroker::new().with_pool(XSIM, 0).is_err());
    }

    #[test]
    fn test_handle_releases_on_drop() {
        let broker = ResourceBroker::new().with_pool(XSIM, 1).unwrap();
        let handle = broker.try_request_resource(XSIM).unwrap();
        assert_eq!(handle.kind(), XSIM);
        assert_eq!(broker.available(XSIM), Some(0));
        assert!(broker.try_request_resource(XSIM).is_err());

        drop(handle);
        assert_eq!(broker.available(XSIM), Some(1));
        assert!(broker.try_request_resource(XSIM).is_ok());
    }

    #[tokio::test]
    async fn test_request_waits_for_release() {
        let broker = ResourceBroker::new().with_pool(XSIM, 1).unwrap();
        let held = broker.request_resource(XSIM).await.unwrap();

        let waiter = {
            let broker = broker.clone();
            tokio::spawn(async move { broker.request_resource(XSIM).await.map(|_| ()) })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(held);
        let acquired = tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .expect("waiter should be released")
            .unwrap();
        assert!(acquired.is_ok());
    }

    #[test]
    fn test_from_capacities() {
        let mut caps = BTreeMap::new();
        caps.insert(XSIM.to_string(), 3);
        let broker = ResourceBroker::from_capacities(&caps).unwrap();
        assert_eq!(broker.capacity(XSIM), Some(3));
        assert_eq!(broker.capacity("other"), None);
    }
}
