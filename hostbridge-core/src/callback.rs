use crate::enums::WireEnum;
use crate::error::Result;
use crate::group::ApiGroup;
use crate::ids::CorrelationId;
use crate::registry::{CorrelationRegistry, EntryKind};
use crate::script::{ScriptValue, WebSinkAdapter};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, warn};

/// Static description of one callback or listener type.
///
/// `NAME` forms the web-side handler: `handle<NAME>Result`,
/// `handle<NAME>Warning` and `handle<NAME>Error`.
pub trait CallbackShape: Send + 'static {
    const NAME: &'static str;
    type Payload: ScriptValue + Send;
    type Warning: WireEnum + ScriptValue + Send;
    type Error: WireEnum + ScriptValue + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Result,
    Warning,
    Error,
}

impl Outcome {
    pub fn suffix(&self) -> &'static str {
        match self {
            Outcome::Result => "Result",
            Outcome::Warning => "Warning",
            Outcome::Error => "Error",
        }
    }
}

/// Pairs the correlation registry with the web sink; every delivery goes
/// through here.
#[derive(Debug)]
pub struct Correlator {
    registry: CorrelationRegistry,
    sink: WebSinkAdapter,
}

impl Correlator {
    pub fn new(sink: WebSinkAdapter) -> Self {
        Correlator {
            registry: CorrelationRegistry::new(),
            sink,
        }
    }

    pub fn registry(&self) -> &CorrelationRegistry {
        &self.registry
    }

    pub fn sink(&self) -> &WebSinkAdapter {
        &self.sink
    }

    pub fn callback<S: CallbackShape>(
        self: &Arc<Self>,
        id: CorrelationId,
        group: ApiGroup,
    ) -> Result<Callback<S>> {
        self.registry.register(id, group, S::NAME, EntryKind::Callback)?;
        Ok(Callback {
            id,
            correlator: Arc::clone(self),
            settled: false,
            _shape: PhantomData,
        })
    }

    pub fn listener<S: CallbackShape>(
        self: &Arc<Self>,
        id: CorrelationId,
        group: ApiGroup,
    ) -> Result<Listener<S>> {
        self.registry.register(id, group, S::NAME, EntryKind::Listener)?;
        Ok(Listener {
            id,
            correlator: Arc::clone(self),
            _shape: PhantomData,
        })
    }

    /// Push one outcome for `id`. Returns `false`, and sends nothing, when the
    /// id is not (or no longer) registered.
    pub fn deliver(&self, id: CorrelationId, outcome: Outcome, args: &[String]) -> bool {
        let Some(entry) = self.registry.claim(id) else {
            warn!(%id, outcome = outcome.suffix(), "dropping outcome for unregistered correlation id");
            return false;
        };

        let handler = format!("handle{}{}", entry.handler, outcome.suffix());
        self.sink.deliver(&handler, id, args);
        true
    }

    fn namespace(&self) -> &str {
        self.sink.namespace()
    }
}

/// Single-shot completion handle for an asynchronous call.
///
/// Each outcome method consumes the handle, so the owner can report at most
/// once. Dropping it unsettled releases the registry entry.
pub struct Callback<S: CallbackShape> {
    id: CorrelationId,
    correlator: Arc<Correlator>,
    settled: bool,
    _shape: PhantomData<fn() -> S>,
}

impl<S: CallbackShape> Callback<S> {
    pub fn id(&self) -> CorrelationId {
        self.id
    }

    pub fn on_result(mut self, payload: S::Payload) -> bool {
        let args = [payload.to_script(self.correlator.namespace())];
        self.settle(Outcome::Result, &args)
    }

    pub fn on_warning(mut self, payload: S::Payload, warning: S::Warning) -> bool {
        let namespace = self.correlator.namespace();
        let args = [payload.to_script(namespace), warning.to_script(namespace)];
        self.settle(Outcome::Warning, &args)
    }

    pub fn on_error(mut self, error: S::Error) -> bool {
        let args = [error.to_script(self.correlator.namespace())];
        self.settle(Outcome::Error, &args)
    }

    fn settle(&mut self, outcome: Outcome, args: &[String]) -> bool {
        self.settled = true;
        self.correlator.deliver(self.id, outcome, args)
    }
}

impl<S: CallbackShape> Drop for Callback<S> {
    fn drop(&mut self) {
        if !self.settled && self.correlator.registry.release(self.id).is_some() {
            debug!(id = %self.id, handler = S::NAME, "callback dropped without delivery");
        }
    }
}

impl<S: CallbackShape> fmt::Debug for Callback<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("shape", &S::NAME)
            .field("id", &self.id)
            .field("settled", &self.settled)
            .finish()
    }
}

/// Long-lived handle that may report any number of outcomes until the web
/// side removes it.
pub struct Listener<S: CallbackShape> {
    id: CorrelationId,
    correlator: Arc<Correlator>,
    _shape: PhantomData<fn() -> S>,
}

impl<S: CallbackShape> Listener<S> {
    pub fn id(&self) -> CorrelationId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.correlator.registry.contains(self.id)
    }

    pub fn on_result(&self, payload: S::Payload) -> bool {
        let args = [payload.to_script(self.correlator.namespace())];
        self.correlator.deliver(self.id, Outcome::Result, &args)
    }

    pub fn on_warning(&self, payload: S::Payload, warning: S::Warning) -> bool {
        let namespace = self.correlator.namespace();
        let args = [payload.to_script(namespace), warning.to_script(namespace)];
        self.correlator.deliver(self.id, Outcome::Warning, &args)
    }

    pub fn on_error(&self, error: S::Error) -> bool {
        let args = [error.to_script(self.correlator.namespace())];
        self.correlator.deliver(self.id, Outcome::Error, &args)
    }
}

impl<S: CallbackShape> Clone for Listener<S> {
    fn clone(&self) -> Self {
        Listener {
            id: self.id,
            correlator: Arc::clone(&self.correlator),
            _shape: PhantomData,
        }
    }
}

impl<S: CallbackShape> fmt::Debug for Listener<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("shape", &S::NAME)
            .field("id", &self.id)
            .finish()
    }
}
