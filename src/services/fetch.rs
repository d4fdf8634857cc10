use std::collections::BTreeSet;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::future::BoxFuture;
use tokio::sync::watch;
use tracing::debug;

use crate::error::AppError;

/// A data-producing call with its arguments already bound.
pub type Operation<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, AppError>> + Send + Sync>;

pub fn operation<T, F, Fut>(f: F) -> Operation<T>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, AppError>> + Send + 'static,
{
    Arc::new(move || -> BoxFuture<'static, Result<T, AppError>> { Box::pin(f()) })
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

/// Bookkeeping of issued fetches. A fetch whose future is dropped before
/// it settles leaves `outstanding` without ever being applied.
#[derive(Default)]
struct Progress {
    issued: u64,
    applied: u64,
    outstanding: BTreeSet<u64>,
}

impl Progress {
    /// A result may land only if no newer fetch is still live or already applied.
    fn may_apply(&self, seq: u64) -> bool {
        seq > self.applied && self.outstanding.iter().all(|s| *s < seq)
    }

    fn loading(&self) -> bool {
        self.outstanding.iter().any(|s| *s > self.applied)
    }
}

struct Shared<T> {
    state: watch::Sender<FetchState<T>>,
    progress: Mutex<Progress>,
    mounted: AtomicBool,
}

impl<T> Shared<T> {
    fn progress(&self) -> MutexGuard<'_, Progress> {
        self.progress.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn start(&self) -> u64 {
        let mut progress = self.progress();
        progress.issued += 1;
        let seq = progress.issued;
        progress.outstanding.insert(seq);
        self.state.send_modify(|state| state.loading = true);
        seq
    }

    fn settle(&self, seq: u64, result: Result<T, AppError>) {
        let mut progress = self.progress();
        progress.outstanding.remove(&seq);
        if !self.mounted.load(Ordering::SeqCst) {
            debug!("fetch #{} finished after unmount, dropped", seq);
            return;
        }

        let result = if progress.may_apply(seq) {
            progress.applied = seq;
            Some(result)
        } else {
            debug!("fetch #{} superseded by a newer fetch, dropped", seq);
            None
        };
        let loading = progress.loading();
        self.state.send_modify(|state| {
            match result {
                Some(Ok(data)) => {
                    state.data = Some(data);
                    state.error = None;
                }
                // Previous data stays on screen next to the error.
                Some(Err(err)) => state.error = Some(err.message()),
                None => {}
            }
            state.loading = loading;
        });
    }

    fn abandon(&self, seq: u64) {
        let mut progress = self.progress();
        progress.outstanding.remove(&seq);
        debug!("fetch #{} dropped before completion", seq);
        if self.mounted.load(Ordering::SeqCst) {
            let loading = progress.loading();
            self.state.send_modify(|state| state.loading = loading);
        }
    }
}

/// Withdraws a fetch whose future is dropped before it settles.
struct Pending<T> {
    shared: Arc<Shared<T>>,
    seq: u64,
    settled: bool,
}

impl<T> Pending<T> {
    fn settle(mut self, result: Result<T, AppError>) {
        self.settled = true;
        self.shared.settle(self.seq, result);
    }
}

impl<T> Drop for Pending<T> {
    fn drop(&mut self) {
        if !self.settled {
            self.shared.abandon(self.seq);
        }
    }
}

/// Loading/error/data tracking around one bound operation.
///
/// Several fetches may be outstanding at once; only the most recently
/// started one that is still live is allowed to write its outcome.
pub struct FetchHandle<T> {
    shared: Arc<Shared<T>>,
    operation: Operation<T>,
}

impl<T> FetchHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(operation: Operation<T>) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: watch::Sender::new(FetchState::default()),
                progress: Mutex::new(Progress::default()),
                mounted: AtomicBool::new(true),
            }),
            operation,
        }
    }

    /// Creates the handle and runs the first fetch.
    pub async fn mount(operation: Operation<T>) -> Self {
        let handle = Self::new(operation);
        handle.fetch().await;
        handle
    }

    /// Starts a fetch. `loading` is already true when this returns, before
    /// the future is polled. Dropping the future withdraws the fetch.
    pub fn fetch(&self) -> impl Future<Output = ()> + Send + use<T> {
        let pending = Pending {
            seq: self.shared.start(),
            shared: Arc::clone(&self.shared),
            settled: false,
        };
        let call = (self.operation)();
        async move {
            let result = call.await;
            pending.settle(result);
        }
    }

    /// Binds new arguments (or a new operation) and fetches again.
    pub fn set_operation(
        &mut self,
        operation: Operation<T>,
    ) -> impl Future<Output = ()> + Send + use<T> {
        self.operation = operation;
        self.fetch()
    }

    /// Stops state updates. Calls already in flight keep running but their
    /// outcome is dropped.
    pub fn unmount(&self) {
        self.shared.mounted.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.shared.mounted.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> FetchState<T> {
        self.shared.state.borrow().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.shared.state.borrow().data.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.shared.state.subscribe()
    }
}

impl<T> Drop for FetchHandle<T> {
    fn drop(&mut self) {
        self.shared.mounted.store(false, Ordering::SeqCst);
    }
}
