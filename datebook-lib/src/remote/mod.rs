//! Keeping the endpoint in step with the local [`Store`](crate::Store).
//!
//! The endpoint is read exactly once, when the calendar is first shown. After that every
//! local mutation is followed by a write of the complete collection. Writes are
//! fire-and-forget: the store has already changed by the time one is issued, a failure is
//! only logged, and overlapping writes race each other to the server.

use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use tracing::{debug, info, warn};

use crate::{Error, Result, meeting::Meeting};

mod http;

pub use http::HttpRemote;

/// The coarse-grained contract of the meeting endpoint.
pub trait Remote: Clone + Send + Sync + 'static {
    /// Read the whole collection.
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<Meeting>>> + Send;

    /// Overwrite the whole collection with `meetings`.
    fn replace_all(&self, meetings: Vec<Meeting>) -> impl Future<Output = Result<()>> + Send;
}

/// What became of a write. Nothing in the UI reacts to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Failed,
}

#[derive(Debug, Clone)]
pub struct SyncClient<R> {
    remote: R,
    reading: Arc<AtomicBool>,
}

impl<R: Remote> SyncClient<R> {
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            reading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Read every meeting. Fails with [`Error::ReadInFlight`] if another read hasn't finished.
    pub fn fetch_all(&self) -> impl Future<Output = Result<Vec<Meeting>>> + Send + 'static {
        let remote = self.remote.clone();
        let reading = self.reading.clone();

        async move {
            let _guard = ReadGuard::acquire(reading)?;

            match remote.fetch_all().await {
                Ok(meetings) => {
                    info!("Fetched {} meetings", meetings.len());
                    Ok(meetings)
                }
                Err(e) => {
                    warn!("Fetching meetings failed: {e}");
                    Err(e)
                }
            }
        }
    }

    /// Send `meetings` as the complete new collection. The returned future never fails.
    pub fn replace_all(
        &self,
        meetings: Vec<Meeting>,
    ) -> impl Future<Output = WriteOutcome> + Send + 'static {
        let remote = self.remote.clone();

        async move {
            let count = meetings.len();

            match remote.replace_all(meetings).await {
                Ok(()) => {
                    debug!("Wrote {count} meetings");
                    WriteOutcome::Written
                }
                Err(e) => {
                    // TODO: Flag the divergence in the UI once there's a place to show it
                    warn!("Writing {count} meetings failed: {e}");
                    WriteOutcome::Failed
                }
            }
        }
    }
}

#[cfg(test)]
impl SyncClient<MemoryRemote> {
    /// A client backed by an empty [`MemoryRemote`]
    pub(crate) fn mock() -> Self {
        Self::new(MemoryRemote::default())
    }
}

/// Marks a read as in flight for as long as it lives.
struct ReadGuard(Arc<AtomicBool>);

impl ReadGuard {
    fn acquire(flag: Arc<AtomicBool>) -> Result<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            return Err(Error::ReadInFlight);
        }

        Ok(Self(flag))
    }
}

impl Drop for ReadGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
pub(crate) use memory::MemoryRemote;
