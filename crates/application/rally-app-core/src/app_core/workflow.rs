use std::sync::Arc;

use tokio::task::JoinHandle;

use super::dispatcher::{Dispatcher, IntentHandler};
use super::effects::{EffectConsumer, EffectQueue};
use super::side_effect::SideEffect;
use super::store::{StateStore, StateSubscription};

/// An intent handler that publishes into its own state store and effect queue.
pub trait WorkflowHandler: IntentHandler {
    type State: Clone + Send + Sync + 'static;

    fn store(&self) -> &StateStore<Self::State>;
    fn effects(&self) -> &EffectQueue<SideEffect>;
}

/// One open workflow instance: the client-facing surface of a handler.
pub struct Workflow<H: WorkflowHandler> {
    dispatcher: Dispatcher<H>,
}

impl<H: WorkflowHandler> Clone for Workflow<H> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<H: WorkflowHandler> Workflow<H> {
    pub fn from_handler(handler: H) -> anyhow::Result<Self> {
        Ok(Self {
            dispatcher: Dispatcher::new(Arc::new(handler))?,
        })
    }

    /// Fire and forget. The returned handle only matters to callers that
    /// want to wait for this particular intent.
    pub fn dispatch(&self, intent: H::Intent) -> JoinHandle<()> {
        self.dispatcher.dispatch(intent)
    }

    /// Runs the intent to completion on the caller's task.
    pub async fn handle(&self, intent: H::Intent) {
        self.dispatcher.run(intent).await
    }

    pub fn state(&self) -> H::State {
        self.handler().store().current()
    }

    pub fn subscribe(&self) -> StateSubscription<H::State> {
        self.handler().store().subscribe()
    }

    pub fn effects(&self) -> EffectConsumer<SideEffect> {
        self.handler().effects().consume()
    }

    pub fn in_flight(&self) -> usize {
        self.dispatcher.in_flight()
    }

    pub fn handler(&self) -> &H {
        self.dispatcher.handler()
    }
}
