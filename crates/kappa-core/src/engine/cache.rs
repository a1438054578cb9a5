use crate::core::curve::CurveError;
use crate::core::curve::order::CurveOrder;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::trace;

/// Curve orders keyed by grid resolution.
///
/// An order depends only on `nbins`, so it is built once and handed out as an [`Arc`]
/// to every snapshot binned at that resolution. Safe to share across threads.
#[derive(Debug, Default)]
pub struct CurveOrderCache {
    orders: RwLock<HashMap<usize, Arc<CurveOrder>>>,
}

impl CurveOrderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached order for `nbins`, building it on first use.
    pub fn get_or_build(&self, nbins: usize) -> Result<Arc<CurveOrder>, CurveError> {
        if let Some(order) = self
            .orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&nbins)
        {
            trace!(nbins, "Curve order cache hit.");
            return Ok(Arc::clone(order));
        }

        let mut orders = self.orders.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have built it while we waited for the write lock.
        if let Some(order) = orders.get(&nbins) {
            return Ok(Arc::clone(order));
        }
        let order = Arc::new(CurveOrder::new(nbins)?);
        orders.insert(nbins, Arc::clone(&order));
        Ok(order)
    }

    #[cfg(test)]
    fn contains(&self, nbins: usize) -> bool {
        self.orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&nbins)
    }

    pub fn len(&self) -> usize {
        self.orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    fn clear(&self) {
        self.orders
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_once_and_shares_the_order() {
        let cache = CurveOrderCache::new();
        assert!(cache.is_empty());

        let first = cache.get_or_build(4).unwrap();
        let second = cache.get_or_build(4).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(4));
        assert!(!cache.contains(8));
    }

    #[test]
    fn keeps_one_entry_per_resolution() {
        let cache = CurveOrderCache::new();
        cache.get_or_build(2).unwrap();
        cache.get_or_build(8).unwrap();
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn invalid_resolution_is_not_cached() {
        let cache = CurveOrderCache::new();
        assert!(cache.get_or_build(6).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_requests_agree() {
        let cache = CurveOrderCache::new();
        let orders: Vec<Arc<CurveOrder>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4).map(|_| s.spawn(|| cache.get_or_build(8).unwrap())).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(cache.len(), 1);
        assert!(orders.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
