use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per scan date. Writers for the same date queue up,
/// writers for different dates proceed independently.
#[derive(Clone, Default, Debug)]
pub struct DateLocks {
    locks: Arc<Mutex<HashMap<NaiveDate, Arc<Mutex<()>>>>>,
}

impl DateLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, date: NaiveDate) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(date).or_default().clone()
        };
        lock.lock_owned().await
    }

    pub async fn tracked_dates(&self) -> usize {
        self.locks.lock().await.len()
    }
}
