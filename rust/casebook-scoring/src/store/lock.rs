use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// The case-wide read/write gate owned by the store collaborator.
///
/// Score operations acquire this gate around each individual query or
/// write, never across a full retry loop, so that retrying writers
/// cannot starve other threads. The scoped guards release the gate on
/// every exit path, error paths included.
#[derive(Debug, Default)]
pub struct CaseLock {
    gate: RwLock<()>,
}

impl CaseLock {
    /// Create an uncontended case lock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the gate for a single read operation.
    pub async fn read(&self) -> CaseReadGuard<'_> {
        CaseReadGuard(self.gate.read().await)
    }

    /// Acquire the gate for a single write operation.
    pub async fn write(&self) -> CaseWriteGuard<'_> {
        CaseWriteGuard(self.gate.write().await)
    }
}

/// Scoped read acquisition of a [`CaseLock`]; released on drop.
#[derive(Debug)]
pub struct CaseReadGuard<'lock>(RwLockReadGuard<'lock, ()>);

/// Scoped write acquisition of a [`CaseLock`]; released on drop.
#[derive(Debug)]
pub struct CaseWriteGuard<'lock>(RwLockWriteGuard<'lock, ()>);
