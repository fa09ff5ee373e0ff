use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;

/// Cooperative stop signal shared by the acquisition source, the scheduler
/// and whoever raises it (typically a SIGINT handler).
///
/// Raising it never interrupts a frame that is already being rendered.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        if !self.flag.swap(true, Ordering::SeqCst) {
            info!("Cancellation requested, draining pipeline");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Iterator adapter that stops pulling from the wrapped source once the
/// token is raised.
pub struct CancellableSource<I> {
    inner: I,
    token: CancellationToken,
}

impl<I> CancellableSource<I> {
    pub fn new(inner: I, token: CancellationToken) -> Self {
        Self { inner, token }
    }
}

impl<I: Iterator> Iterator for CancellableSource<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.token.is_cancelled() {
            return None;
        }
        self.inner.next()
    }
}

/// Extension for wrapping any source in a [`CancellableSource`].
pub trait CancelExt: Iterator + Sized {
    fn until_cancelled(self, token: &CancellationToken) -> CancellableSource<Self> {
        CancellableSource::new(self, token.clone())
    }
}

impl<I: Iterator> CancelExt for I {}
