use hostbridge_core::{
    bean, encode, wire_enum, ApiGroup, Call, CallMode, CallbackShape, Capability, CorrelationId,
    Listener, MethodDescriptor, Result, Returns,
};

wire_enum! {
    pub enum LifecycleState as "LifecycleState" {
        Starting => "Starting",
        Started => "Started",
        Running => "Running",
        Pausing => "Pausing",
        PausedIdle => "PausedIdle",
        PausedRun => "PausedRun",
        Resuming => "Resuming",
        Stopping => "Stopping",
    }
}

bean! {
    /// A state transition of the host application.
    pub struct Lifecycle as "Lifecycle" {
        state: LifecycleState => "state",
        timestamp: i64 => "timestamp",
    }
}

wire_enum! {
    pub enum LifecycleListenerWarning as "ILifecycleListenerWarning" {
        MemoryLow => "MemoryLow",
    }
}

wire_enum! {
    pub enum LifecycleListenerError as "ILifecycleListenerError" {
        Runtime => "Runtime",
        Implementation => "Implementation",
    }
}

#[derive(Debug)]
pub struct LifecycleListener;

impl CallbackShape for LifecycleListener {
    const NAME: &'static str = "LifecycleListener";
    type Payload = Lifecycle;
    type Warning = LifecycleListenerWarning;
    type Error = LifecycleListenerError;
}

pub trait LifecycleDelegate: Send + Sync {
    fn add_lifecycle_listener(&self, listener: Listener<LifecycleListener>);
    fn remove_lifecycle_listener(&self, id: CorrelationId);
    fn remove_lifecycle_listeners(&self);
    fn is_background(&self) -> Option<bool>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleOp {
    AddLifecycleListener,
    IsBackground,
    RemoveLifecycleListener,
    RemoveLifecycleListeners,
}

#[derive(Debug)]
pub struct LifecycleBridge;

impl Capability for LifecycleBridge {
    type Delegate = dyn LifecycleDelegate;
    type Op = LifecycleOp;

    const BRIDGE: &'static str = "LifecycleBridge";
    const INTERFACE: &'static str = "ILifecycle";
    const GROUP: ApiGroup = ApiGroup::Application;
    const METHODS: &'static [MethodDescriptor<LifecycleOp>] = &[
        MethodDescriptor {
            name: "addLifecycleListener",
            op: LifecycleOp::AddLifecycleListener,
            params: &[],
            mode: CallMode::AddListener,
        },
        MethodDescriptor {
            name: "isBackground",
            op: LifecycleOp::IsBackground,
            params: &[],
            mode: CallMode::Sync(Returns::Bool),
        },
        MethodDescriptor {
            name: "removeLifecycleListener",
            op: LifecycleOp::RemoveLifecycleListener,
            params: &[],
            mode: CallMode::RemoveListener(LifecycleListener::NAME),
        },
        MethodDescriptor {
            name: "removeLifecycleListeners",
            op: LifecycleOp::RemoveLifecycleListeners,
            params: &[],
            mode: CallMode::RemoveListeners(LifecycleListener::NAME),
        },
    ];

    fn dispatch(delegate: &Self::Delegate, call: &Call<'_, LifecycleOp>) -> Result<Option<String>> {
        match call.op() {
            LifecycleOp::AddLifecycleListener => delegate.add_lifecycle_listener(call.listener()?),
            LifecycleOp::IsBackground => return Ok(encode(delegate.is_background())),
            LifecycleOp::RemoveLifecycleListener => {
                delegate.remove_lifecycle_listener(call.correlation_id()?)
            }
            LifecycleOp::RemoveLifecycleListeners => delegate.remove_lifecycle_listeners(),
        }
        Ok(None)
    }
}
