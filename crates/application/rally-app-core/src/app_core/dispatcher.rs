use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Executes one intent to completion. Rejections resolve to state updates and
/// effects, so `handle` has nothing to return.
#[async_trait]
pub trait IntentHandler: Send + Sync + 'static {
    type Intent: Debug + Send + 'static;

    async fn handle(&self, intent: Self::Intent);
}

/// Spawns one task per intent. In-flight handlers of the same workflow are
/// neither ordered nor serialized against each other.
pub struct Dispatcher<H: IntentHandler> {
    handler: Arc<H>,
    runtime: Handle,
    in_flight: Arc<AtomicUsize>,
}

impl<H: IntentHandler> Clone for Dispatcher<H> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
            runtime: self.runtime.clone(),
            in_flight: self.in_flight.clone(),
        }
    }
}

struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl<H: IntentHandler> Dispatcher<H> {
    /// Binds to the ambient tokio runtime, or to a shared fallback runtime
    /// when called from synchronous code.
    pub fn new(handler: Arc<H>) -> anyhow::Result<Self> {
        Ok(Self::with_runtime(handler, crate::async_runtime::handle()?))
    }

    pub fn with_runtime(handler: Arc<H>, runtime: Handle) -> Self {
        Self {
            handler,
            runtime,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns immediately; the handler runs as its own task.
    pub fn dispatch(&self, intent: H::Intent) -> JoinHandle<()> {
        tracing::debug!(?intent, "dispatching intent");
        let handler = self.handler.clone();
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        let guard = InFlightGuard(self.in_flight.clone());
        self.runtime.spawn(async move {
            let _guard = guard;
            handler.handle(intent).await;
        })
    }

    /// Runs the handler on the caller's task instead of spawning.
    pub async fn run(&self, intent: H::Intent) {
        tracing::debug!(?intent, "running intent inline");
        self.handler.handle(intent).await;
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn handler(&self) -> &Arc<H> {
        &self.handler
    }
}
