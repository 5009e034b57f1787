//! End-to-end routing through a small capability with sync, callback and
//! listener methods.

use hostbridge_core::{
    bean, encode, wire_enum, ApiGroup, ApiRequest, BridgeError, Call, CallMode, Callback,
    CallbackShape, Capability, CorrelationId, Correlator, EntryKind, Listener, MethodDescriptor,
    Param, RecordingSink, Result, Returns, Router, WebSinkAdapter,
};
use std::sync::{Arc, Mutex};

bean! {
    pub struct Alarm as "Alarm" {
        label: String => "label",
        minutes: i32 => "minutes",
    }
}

wire_enum! {
    pub enum AlarmWarning as "IAlarmResultCallbackWarning" {
        Rescheduled => "Rescheduled",
    }
}

wire_enum! {
    pub enum AlarmError as "IAlarmResultCallbackError" {
        NoPermission => "NoPermission",
    }
}

struct AlarmResult;

impl CallbackShape for AlarmResult {
    const NAME: &'static str = "AlarmResultCallback";
    type Payload = Alarm;
    type Warning = AlarmWarning;
    type Error = AlarmError;
}

struct TickListener;

impl CallbackShape for TickListener {
    const NAME: &'static str = "TickListener";
    type Payload = i64;
    type Warning = AlarmWarning;
    type Error = AlarmError;
}

trait Clock: Send + Sync {
    fn schedule(&self, alarm: Alarm, callback: Callback<AlarmResult>);
    fn add_tick_listener(&self, listener: Listener<TickListener>);
    fn remove_tick_listener(&self, id: CorrelationId);
    fn remove_tick_listeners(&self);
    fn is_running(&self) -> Option<bool>;
}

#[derive(Debug, Clone, Copy)]
enum ClockOp {
    Schedule,
    AddTickListener,
    RemoveTickListener,
    RemoveTickListeners,
    IsRunning,
}

struct ClockBridge;

impl Capability for ClockBridge {
    type Delegate = dyn Clock;
    type Op = ClockOp;

    const BRIDGE: &'static str = "ClockBridge";
    const INTERFACE: &'static str = "IClock";
    const GROUP: ApiGroup = ApiGroup::Util;
    const METHODS: &'static [MethodDescriptor<ClockOp>] = &[
        MethodDescriptor {
            name: "schedule",
            op: ClockOp::Schedule,
            params: &[Param::new("alarm", "Alarm")],
            mode: CallMode::Callback,
        },
        MethodDescriptor {
            name: "addTickListener",
            op: ClockOp::AddTickListener,
            params: &[],
            mode: CallMode::AddListener,
        },
        MethodDescriptor {
            name: "removeTickListener",
            op: ClockOp::RemoveTickListener,
            params: &[],
            mode: CallMode::RemoveListener("TickListener"),
        },
        MethodDescriptor {
            name: "removeTickListeners",
            op: ClockOp::RemoveTickListeners,
            params: &[],
            mode: CallMode::RemoveListeners("TickListener"),
        },
        MethodDescriptor {
            name: "isRunning",
            op: ClockOp::IsRunning,
            params: &[],
            mode: CallMode::Sync(Returns::Bool),
        },
    ];

    fn dispatch(delegate: &Self::Delegate, call: &Call<'_, ClockOp>) -> Result<Option<String>> {
        match call.op() {
            ClockOp::Schedule => {
                let alarm = call.param(0)?;
                delegate.schedule(alarm, call.callback()?);
            }
            ClockOp::AddTickListener => delegate.add_tick_listener(call.listener()?),
            ClockOp::RemoveTickListener => delegate.remove_tick_listener(call.correlation_id()?),
            ClockOp::RemoveTickListeners => delegate.remove_tick_listeners(),
            ClockOp::IsRunning => return Ok(encode(delegate.is_running())),
        }
        Ok(None)
    }
}

/// Keeps handles so the test decides when they report.
#[derive(Default)]
struct ManualClock {
    pending: Mutex<Vec<(Alarm, Callback<AlarmResult>)>>,
    listeners: Mutex<Vec<Listener<TickListener>>>,
}

impl Clock for ManualClock {
    fn schedule(&self, alarm: Alarm, callback: Callback<AlarmResult>) {
        self.pending.lock().unwrap().push((alarm, callback));
    }

    fn add_tick_listener(&self, listener: Listener<TickListener>) {
        self.listeners.lock().unwrap().push(listener);
    }

    fn remove_tick_listener(&self, id: CorrelationId) {
        self.listeners.lock().unwrap().retain(|l| l.id() != id);
    }

    fn remove_tick_listeners(&self) {
        self.listeners.lock().unwrap().clear();
    }

    fn is_running(&self) -> Option<bool> {
        Some(true)
    }
}

fn setup() -> (Arc<RecordingSink>, Arc<ManualClock>, Router<ClockBridge>) {
    let sink = Arc::new(RecordingSink::new());
    let correlator = Arc::new(Correlator::new(WebSinkAdapter::new(sink.clone())));
    let clock = Arc::new(ManualClock::default());
    let router = Router::<ClockBridge>::new(correlator).with_delegate(clock.clone());
    (sink, clock, router)
}

#[test]
fn test_async_call_returns_immediately_then_delivers() {
    let (sink, clock, router) = setup();

    let response = router
        .invoke(
            &ApiRequest::new("schedule")
                .with_param(r#"{"label":"tea","minutes":4}"#)
                .with_async_id(11),
        )
        .unwrap();
    assert_eq!(response.status_code, 200);
    assert_eq!(response.response, "null");
    assert!(sink.is_empty());
    assert!(router.correlator().registry().contains(CorrelationId::new(11)));

    let (alarm, callback) = clock.pending.lock().unwrap().pop().unwrap();
    assert_eq!(alarm.label.as_deref(), Some("tea"));
    assert!(callback.on_result(alarm));

    assert_eq!(
        sink.scripts(),
        vec![
            r#"Adaptive.handleAlarmResultCallbackResult(11, Adaptive.Alarm.toObject(JSON.parse("{ \"label\": \"tea\", \"minutes\": 4 }")))"#
        ]
    );
    assert!(router.correlator().registry().is_empty());
}

#[test]
fn test_async_call_requires_async_id() {
    let (_sink, clock, router) = setup();
    let err = router
        .invoke(&ApiRequest::new("schedule").with_param("{}"))
        .unwrap_err();
    assert!(matches!(err, BridgeError::MissingCorrelationId { method: "schedule" }));
    assert!(clock.pending.lock().unwrap().is_empty());
}

#[test]
fn test_outstanding_id_is_rejected() {
    let (_sink, clock, router) = setup();
    let request = ApiRequest::new("schedule")
        .with_param("{}")
        .with_async_id(5);

    router.invoke(&request).unwrap();
    let err = router.invoke(&request).unwrap_err();
    assert!(matches!(err, BridgeError::DuplicateCorrelationId(_)));
    assert_eq!(err.status_code(), 409);

    // The original call is still deliverable.
    assert_eq!(clock.pending.lock().unwrap().len(), 1);
    assert_eq!(router.correlator().registry().len(), 1);
}

#[test]
fn test_malformed_bean_parameter_registers_nothing() {
    let (_sink, _clock, router) = setup();
    let err = router
        .invoke(
            &ApiRequest::new("schedule")
                .with_param(r#"{"minutes":"soon"}"#)
                .with_async_id(6),
        )
        .unwrap_err();
    assert!(matches!(err, BridgeError::InvalidParameter { index: 0, .. }));
    assert!(router.correlator().registry().is_empty());
}

#[test]
fn test_listener_lifecycle() {
    let (sink, clock, router) = setup();

    for id in [100, 101] {
        router
            .invoke(&ApiRequest::new("addTickListener").with_async_id(id))
            .unwrap();
    }
    assert_eq!(router.correlator().registry().stats().listeners, 2);

    let first = clock.listeners.lock().unwrap()[0].clone();
    assert!(first.on_result(1));
    assert!(first.on_result(2));

    router
        .invoke(&ApiRequest::new("removeTickListener").with_async_id(100))
        .unwrap();
    assert!(!first.on_result(3));
    assert_eq!(clock.listeners.lock().unwrap().len(), 1);

    router
        .invoke(&ApiRequest::new("removeTickListeners"))
        .unwrap();
    assert!(router.correlator().registry().is_empty());

    assert_eq!(
        sink.scripts(),
        vec![
            "Adaptive.handleTickListenerResult(100, 1)",
            "Adaptive.handleTickListenerResult(100, 2)",
        ]
    );
}

#[test]
fn test_remove_listener_ignores_pending_callback() {
    let (sink, clock, router) = setup();

    router
        .invoke(&ApiRequest::new("schedule").with_param("{}").with_async_id(7))
        .unwrap();
    router
        .invoke(&ApiRequest::new("removeTickListener").with_async_id(7))
        .unwrap();
    assert!(router.correlator().registry().contains(CorrelationId::new(7)));

    let (alarm, callback) = clock.pending.lock().unwrap().pop().unwrap();
    assert!(callback.on_result(alarm));
    assert_eq!(sink.len(), 1);
    assert!(router.correlator().registry().is_empty());
}

#[test]
fn test_remove_listener_ignores_other_capability_listener() {
    let (sink, _clock, router) = setup();
    let registry = router.correlator().registry();
    registry
        .register(
            CorrelationId::new(8),
            ApiGroup::Application,
            "LifecycleListener",
            EntryKind::Listener,
        )
        .unwrap();

    router
        .invoke(&ApiRequest::new("removeTickListener").with_async_id(8))
        .unwrap();
    assert_eq!(registry.get(CorrelationId::new(8)).unwrap().handler, "LifecycleListener");
    assert!(sink.is_empty());
}

#[test]
fn test_unbound_delegate_releases_nothing_and_defaults() {
    let sink = Arc::new(RecordingSink::new());
    let correlator = Arc::new(Correlator::new(WebSinkAdapter::new(sink)));
    let router = Router::<ClockBridge>::new(correlator);

    let running = router.invoke(&ApiRequest::new("isRunning")).unwrap();
    assert_eq!(running.response, "false");

    let scheduled = router
        .invoke(&ApiRequest::new("schedule").with_param("{}").with_async_id(1))
        .unwrap();
    assert_eq!(scheduled.status_code, 200);
    assert!(router.correlator().registry().is_empty());
}

mod property_tests {
    use super::*;
    use hostbridge_core::{Bean, WireEnum};
    use proptest::prelude::*;

    bean! {
        pub struct Reminder as "Reminder" {
            title: String => "title",
            done: bool => "done",
            priority: i64 => "priority",
            weight: f64 => "weight",
            initial: char => "initial",
            warning: AlarmWarning => "warning",
            alarms: Vec<Alarm> => "alarms",
            blob: Vec<u8> => "blob",
        }
    }

    fn alarm() -> impl Strategy<Value = Alarm> {
        (proptest::option::of(".*"), proptest::option::of(any::<i32>()))
            .prop_map(|(label, minutes)| Alarm { label, minutes })
    }

    fn reminder() -> impl Strategy<Value = Reminder> {
        (
            proptest::option::of(".*"),
            proptest::option::of(any::<bool>()),
            proptest::option::of(any::<i64>()),
            proptest::option::of((-4_000_000i32..4_000_000).prop_map(|n| f64::from(n) / 8.0)),
            proptest::option::of(any::<char>()),
            proptest::option::of(prop_oneof![
                Just(AlarmWarning::Rescheduled),
                Just(AlarmWarning::Unknown)
            ]),
            proptest::option::of(proptest::collection::vec(alarm(), 0..4)),
            proptest::option::of(proptest::collection::vec(any::<u8>(), 0..16)),
        )
            .prop_map(
                |(title, done, priority, weight, initial, warning, alarms, blob)| Reminder {
                    title,
                    done,
                    priority,
                    weight,
                    initial,
                    warning,
                    alarms,
                    blob,
                },
            )
    }

    proptest! {
        #[test]
        fn test_bean_round_trip(original in reminder()) {
            let json = original.to_json();
            let decoded = Reminder::from_json(&json).unwrap();
            prop_assert_eq!(decoded, original);
        }

        #[test]
        fn test_unknown_enum_names_fall_back(name in "[a-z]{1,12}") {
            let json = format!(r#"{{"value":"{name}"}}"#);
            let decoded: AlarmWarning = hostbridge_core::bean::from_json(&json).unwrap();
            prop_assert_eq!(decoded, AlarmWarning::from_wire_or_unknown(&name));
            prop_assert_eq!(decoded, AlarmWarning::Unknown);
        }
    }

    #[test]
    fn test_empty_list_differs_from_unset() {
        let empty = Reminder {
            alarms: Some(Vec::new()),
            ..Default::default()
        };
        let json = empty.to_json();
        assert!(json.contains(r#""alarms": []"#));
        assert_eq!(Reminder::from_json(&json).unwrap().alarms, Some(Vec::new()));
        assert_eq!(
            Reminder::from_json(&Reminder::default().to_json()).unwrap().alarms,
            None
        );
    }
}
