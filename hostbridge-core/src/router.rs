use crate::bean::{from_json, to_json, WireValue};
use crate::callback::{Callback, CallbackShape, Correlator, Listener};
use crate::delegate::DelegateSlot;
use crate::envelope::{ApiRequest, ApiResponse, API_VERSION};
use crate::error::{BridgeError, Result};
use crate::group::ApiGroup;
use crate::ids::CorrelationId;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};

/// Declared positional parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    /// Wire type, e.g. `string`, `ContactUid` or `[IContactFieldGroup]`.
    pub ty: &'static str,
}

impl Param {
    pub const fn new(name: &'static str, ty: &'static str) -> Self {
        Param { name, ty }
    }
}

/// What a synchronous method answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Returns {
    Nothing,
    Bool,
    Value(&'static str),
}

impl Returns {
    /// Body used when no delegate is bound or the delegate has no answer.
    pub fn default_json(&self) -> &'static str {
        match self {
            Returns::Bool => "false",
            Returns::Nothing | Returns::Value(_) => "null",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMode {
    Sync(Returns),
    /// Completes later through a single-shot callback keyed by `asyncId`.
    Callback,
    /// Registers a long-lived listener keyed by `asyncId`.
    AddListener,
    /// Removes the listener of the named callback type whose id is carried in
    /// `asyncId`.
    RemoveListener(&'static str),
    /// Removes every listener of the named callback type.
    RemoveListeners(&'static str),
}

impl CallMode {
    pub fn needs_correlation_id(&self) -> bool {
        matches!(
            self,
            CallMode::Callback | CallMode::AddListener | CallMode::RemoveListener(_)
        )
    }
}

/// One row of a capability's method table.
#[derive(Debug)]
pub struct MethodDescriptor<Op: 'static> {
    pub name: &'static str,
    pub op: Op,
    pub params: &'static [Param],
    pub mode: CallMode,
}

/// A family of methods served by one delegate trait.
///
/// Implementors are marker types; `METHODS` is the routing table and
/// `dispatch` matches on the operation to call into the delegate, returning
/// the encoded body of a synchronous answer.
pub trait Capability: 'static {
    type Delegate: ?Sized + Send + Sync;
    type Op: Copy + fmt::Debug + Send + Sync + 'static;

    /// Name used in diagnostics, e.g. `ContactBridge`.
    const BRIDGE: &'static str;
    /// Name the web side addresses, e.g. `IContact`.
    const INTERFACE: &'static str;
    const GROUP: ApiGroup;
    const METHODS: &'static [MethodDescriptor<Self::Op>];

    fn dispatch(delegate: &Self::Delegate, call: &Call<'_, Self::Op>) -> Result<Option<String>>;
}

/// Encode a delegate answer; `None` stays `None` so the router can fall back
/// to the method's default.
pub fn encode<T: WireValue>(value: Option<T>) -> Option<String> {
    value.map(|value| to_json(&value))
}

/// A request matched to its method, as seen by [`Capability::dispatch`].
pub struct Call<'a, Op: 'static> {
    method: &'static MethodDescriptor<Op>,
    request: &'a ApiRequest,
    group: ApiGroup,
    correlator: &'a Arc<Correlator>,
}

impl<'a, Op: Copy + 'static> Call<'a, Op> {
    pub fn op(&self) -> Op {
        self.method.op
    }

    pub fn method_name(&self) -> &'static str {
        self.method.name
    }

    fn fragment(&self, index: usize) -> Result<&'a str> {
        self.request
            .parameters
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| BridgeError::MissingParameter {
                method: self.method.name,
                index,
                name: self
                    .method
                    .params
                    .get(index)
                    .map(|param| param.name)
                    .unwrap_or_default(),
            })
    }

    /// Decode the parameter at `index`.
    pub fn param<T: WireValue>(&self, index: usize) -> Result<T> {
        from_json(self.fragment(index)?).map_err(|e| e.in_parameter(self.method.name, index))
    }

    /// Decode a string parameter. A quoted JSON string is unescaped; anything
    /// else is taken verbatim.
    pub fn string(&self, index: usize) -> Result<String> {
        let fragment = self.fragment(index)?;
        if fragment.trim_start().starts_with('"') {
            self.param(index)
        } else {
            Ok(fragment.to_string())
        }
    }

    pub fn correlation_id(&self) -> Result<CorrelationId> {
        self.request
            .async_id
            .ok_or(BridgeError::MissingCorrelationId {
                method: self.method.name,
            })
    }

    /// Register the request's `asyncId` and hand out its completion handle.
    pub fn callback<S: CallbackShape>(&self) -> Result<Callback<S>> {
        self.correlator.callback(self.correlation_id()?, self.group)
    }

    pub fn listener<S: CallbackShape>(&self) -> Result<Listener<S>> {
        self.correlator.listener(self.correlation_id()?, self.group)
    }
}

impl<Op: fmt::Debug + 'static> fmt::Debug for Call<'_, Op> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call")
            .field("method", &self.method.name)
            .field("op", &self.method.op)
            .field("parameters", &self.request.parameters.len())
            .field("async_id", &self.request.async_id)
            .finish()
    }
}

/// Object-safe view of a router, as held by a host.
pub trait ApiBridge: Send + Sync {
    fn name(&self) -> &'static str;
    fn interface(&self) -> &'static str;
    fn group(&self) -> ApiGroup;
    fn api_version(&self) -> &str;
    fn method_names(&self) -> Vec<&'static str>;
    fn has_delegate(&self) -> bool;
    fn invoke(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// Dispatch router for one capability.
pub struct Router<C: Capability> {
    delegate: DelegateSlot<C::Delegate>,
    table: HashMap<&'static str, &'static MethodDescriptor<C::Op>>,
    correlator: Arc<Correlator>,
    api_version: String,
    _capability: PhantomData<fn() -> C>,
}

impl<C: Capability> Router<C> {
    pub fn new(correlator: Arc<Correlator>) -> Self {
        let table = C::METHODS
            .iter()
            .map(|method| (method.name, method))
            .collect();

        Router {
            delegate: DelegateSlot::empty(),
            table,
            correlator,
            api_version: API_VERSION.to_string(),
            _capability: PhantomData,
        }
    }

    pub fn with_delegate(self, delegate: Arc<C::Delegate>) -> Self {
        self.delegate.set(delegate);
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn set_delegate(&self, delegate: Arc<C::Delegate>) -> Option<Arc<C::Delegate>> {
        self.delegate.set(delegate)
    }

    pub fn clear_delegate(&self) -> Option<Arc<C::Delegate>> {
        self.delegate.clear()
    }

    pub fn delegate(&self) -> Option<Arc<C::Delegate>> {
        self.delegate.get()
    }

    pub fn correlator(&self) -> &Arc<Correlator> {
        &self.correlator
    }

    /// Route one request.
    ///
    /// Unknown methods and unbound delegates still produce a response; only
    /// malformed input or a duplicate correlation id is an `Err`.
    pub fn invoke(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let Some(method) = self.table.get(request.method_name.as_str()).copied() else {
            warn!(
                category = %C::GROUP,
                bridge = C::BRIDGE,
                method = %request.method_name,
                "unknown method"
            );
            return Ok(ApiResponse::not_found(format!(
                "{} does not provide the function '{}' Please check your client-side API version; should be API version >= {}.",
                C::BRIDGE, request.method_name, self.api_version
            )));
        };

        if request.parameters.len() < method.params.len() {
            let index = request.parameters.len();
            return Err(BridgeError::MissingParameter {
                method: method.name,
                index,
                name: method.params.get(index).map(|p| p.name).unwrap_or_default(),
            });
        }
        if method.mode.needs_correlation_id() && request.async_id.is_none() {
            return Err(BridgeError::MissingCorrelationId {
                method: method.name,
            });
        }

        debug!(category = %C::GROUP, bridge = C::BRIDGE, method = method.name, "executing");

        let body = match self.delegate.get() {
            Some(delegate) => {
                let started = Instant::now();
                let call = Call {
                    method,
                    request,
                    group: C::GROUP,
                    correlator: &self.correlator,
                };
                let body = C::dispatch(&delegate, &call)?;
                debug!(
                    category = %C::GROUP,
                    bridge = C::BRIDGE,
                    method = method.name,
                    elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                    "executed"
                );
                body
            }
            None => {
                error!(
                    category = %C::GROUP,
                    bridge = C::BRIDGE,
                    method = method.name,
                    "no delegate bound"
                );
                None
            }
        };

        match (method.mode, request.async_id) {
            (CallMode::RemoveListener(handler), Some(id)) => {
                self.correlator.registry().release_listener(id, C::GROUP, handler);
            }
            (CallMode::RemoveListeners(handler), _) => {
                self.correlator.registry().release_listeners(C::GROUP, handler);
            }
            _ => {}
        }

        let response = match method.mode {
            CallMode::Sync(returns) => body.unwrap_or_else(|| returns.default_json().to_string()),
            _ => "null".to_string(),
        };
        Ok(ApiResponse::ok(response))
    }
}

impl<C: Capability> ApiBridge for Router<C> {
    fn name(&self) -> &'static str {
        C::BRIDGE
    }

    fn interface(&self) -> &'static str {
        C::INTERFACE
    }

    fn group(&self) -> ApiGroup {
        C::GROUP
    }

    fn api_version(&self) -> &str {
        &self.api_version
    }

    fn method_names(&self) -> Vec<&'static str> {
        C::METHODS.iter().map(|method| method.name).collect()
    }

    fn has_delegate(&self) -> bool {
        self.delegate.is_bound()
    }

    fn invoke(&self, request: &ApiRequest) -> Result<ApiResponse> {
        Router::invoke(self, request)
    }
}

impl<C: Capability> fmt::Debug for Router<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("bridge", &C::BRIDGE)
            .field("methods", &self.table.len())
            .field("delegate", &self.delegate)
            .field("api_version", &self.api_version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{RecordingSink, WebSinkAdapter};

    trait Echo: Send + Sync {
        fn echo(&self, text: String, times: i32) -> Option<String>;
        fn ready(&self) -> Option<bool>;
    }

    #[derive(Debug, Clone, Copy)]
    enum EchoOp {
        Echo,
        Ready,
    }

    struct EchoBridge;

    impl Capability for EchoBridge {
        type Delegate = dyn Echo;
        type Op = EchoOp;

        const BRIDGE: &'static str = "EchoBridge";
        const INTERFACE: &'static str = "IEcho";
        const GROUP: ApiGroup = ApiGroup::Util;
        const METHODS: &'static [MethodDescriptor<EchoOp>] = &[
            MethodDescriptor {
                name: "echo",
                op: EchoOp::Echo,
                params: &[Param::new("text", "string"), Param::new("times", "int")],
                mode: CallMode::Sync(Returns::Value("string")),
            },
            MethodDescriptor {
                name: "ready",
                op: EchoOp::Ready,
                params: &[],
                mode: CallMode::Sync(Returns::Bool),
            },
        ];

        fn dispatch(delegate: &Self::Delegate, call: &Call<'_, EchoOp>) -> Result<Option<String>> {
            Ok(match call.op() {
                EchoOp::Echo => encode(delegate.echo(call.string(0)?, call.param(1)?)),
                EchoOp::Ready => encode(delegate.ready()),
            })
        }
    }

    struct Repeat;

    impl Echo for Repeat {
        fn echo(&self, text: String, times: i32) -> Option<String> {
            usize::try_from(times).ok().map(|n| text.repeat(n))
        }

        fn ready(&self) -> Option<bool> {
            Some(true)
        }
    }

    fn router() -> Router<EchoBridge> {
        let sink = Arc::new(RecordingSink::new());
        Router::new(Arc::new(Correlator::new(WebSinkAdapter::new(sink))))
    }

    #[test]
    fn test_unknown_method() {
        let response = router().invoke(&ApiRequest::new("shout")).unwrap();
        assert_eq!(response.status_code, 404);
        assert_eq!(response.response, "null");
        assert_eq!(
            response.status_message,
            "EchoBridge does not provide the function 'shout' Please check your client-side API version; should be API version >= v2.2.15."
        );
    }

    #[test]
    fn test_safe_defaults_without_delegate() {
        let router = router();

        let ready = router.invoke(&ApiRequest::new("ready")).unwrap();
        assert_eq!((ready.status_code, ready.response.as_str()), (200, "false"));

        let echo = router
            .invoke(&ApiRequest::new("echo").with_param(r#""hi""#).with_param("2"))
            .unwrap();
        assert_eq!((echo.status_code, echo.response.as_str()), (200, "null"));
    }

    #[test]
    fn test_dispatch_with_delegate() {
        let router = router().with_delegate(Arc::new(Repeat));

        let echo = router
            .invoke(&ApiRequest::new("echo").with_param(r#""ab""#).with_param("3"))
            .unwrap();
        assert_eq!(echo, ApiResponse::ok(r#""ababab""#));

        // Unquoted text is accepted verbatim.
        let raw = router
            .invoke(&ApiRequest::new("echo").with_param("x").with_param("2"))
            .unwrap();
        assert_eq!(raw.response, r#""xx""#);

        // Delegate without an answer falls back to the default.
        let none = router
            .invoke(&ApiRequest::new("echo").with_param(r#""ab""#).with_param("-1"))
            .unwrap();
        assert_eq!(none.response, "null");
    }

    #[test]
    fn test_malformed_parameters() {
        let router = router().with_delegate(Arc::new(Repeat));

        let missing = router
            .invoke(&ApiRequest::new("echo").with_param(r#""ab""#))
            .unwrap_err();
        assert!(matches!(
            missing,
            BridgeError::MissingParameter {
                method: "echo",
                index: 1,
                name: "times"
            }
        ));

        let wrong = router
            .invoke(&ApiRequest::new("echo").with_param(r#""ab""#).with_param(r#""three""#))
            .unwrap_err();
        assert!(matches!(wrong, BridgeError::InvalidParameter { index: 1, .. }));
    }

    #[test]
    fn test_bridge_metadata() {
        let router = router();
        let bridge: &dyn ApiBridge = &router;
        assert_eq!(bridge.interface(), "IEcho");
        assert_eq!(bridge.group(), ApiGroup::Util);
        assert_eq!(bridge.method_names(), vec!["echo", "ready"]);
        assert!(!bridge.has_delegate());

        router.set_delegate(Arc::new(Repeat));
        assert!(bridge.has_delegate());
        assert!(router.clear_delegate().is_some());
    }
}
