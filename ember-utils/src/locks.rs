//! Lock aliases so every crate agrees on one synchronous lock implementation.

/// A synchronous mutex. Never held while waiting on another chunk's lock.
pub type SyncMutex<T> = parking_lot::Mutex<T>;

/// Guard returned by locking a [`SyncMutex`].
pub type SyncMutexGuard<'a, T> = parking_lot::MutexGuard<'a, T>;
