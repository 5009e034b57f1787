use crate::bean::{to_json, write_json_string, Bean, WireValue};
use crate::enums::WireEnum;
use crate::envelope::DEFAULT_NAMESPACE;
use crate::ids::CorrelationId;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::trace;

/// Renders a value as a script expression that rebuilds it on the web side.
pub trait ScriptValue {
    fn to_script(&self, namespace: &str) -> String;
}

/// `Namespace.Type.toObject(JSON.parse("<escaped json>"))`
pub fn bean_fragment<B: Bean>(bean: &B, namespace: &str) -> String {
    typed_fragment(namespace, B::TYPE_NAME, &to_json(bean))
}

/// `Namespace.IType.toObject(JSON.parse("{ \"value\": \"V\" }"))`
pub fn enum_fragment<E: WireEnum + WireValue>(value: &E, namespace: &str) -> String {
    typed_fragment(namespace, E::TYPE_NAME, &to_json(value))
}

fn typed_fragment(namespace: &str, type_name: &str, json: &str) -> String {
    let mut out = String::with_capacity(json.len() + type_name.len() + namespace.len() + 32);
    out.push_str(namespace);
    out.push('.');
    out.push_str(type_name);
    out.push_str(".toObject(JSON.parse(");
    write_json_string(&mut out, json);
    out.push_str("))");
    out
}

macro_rules! literal_script_value {
    ($($ty:ty),*) => {
        $(
            impl ScriptValue for $ty {
                fn to_script(&self, _namespace: &str) -> String {
                    to_json(self)
                }
            }
        )*
    };
}

literal_script_value!(bool, i32, i64, u8, f64, char, String);

impl<T: ScriptValue> ScriptValue for Vec<T> {
    fn to_script(&self, namespace: &str) -> String {
        let items: Vec<String> = self.iter().map(|item| item.to_script(namespace)).collect();
        format!("[{}]", items.join(", "))
    }
}

impl<T: ScriptValue> ScriptValue for Option<T> {
    fn to_script(&self, namespace: &str) -> String {
        match self {
            Some(value) => value.to_script(namespace),
            None => "null".to_string(),
        }
    }
}

/// Executes script text inside the web context. Implementations must not
/// block and never report failure back.
pub trait WebSink: Send + Sync {
    fn execute_script(&self, script: &str);
}

/// Builds `Namespace.handler(id, args...)` calls and hands them to a [`WebSink`].
#[derive(Clone)]
pub struct WebSinkAdapter {
    sink: Arc<dyn WebSink>,
    namespace: String,
}

impl WebSinkAdapter {
    pub fn new(sink: Arc<dyn WebSink>) -> Self {
        Self::with_namespace(sink, DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(sink: Arc<dyn WebSink>, namespace: impl Into<String>) -> Self {
        WebSinkAdapter {
            sink,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn script_call(&self, handler: &str, id: CorrelationId, args: &[String]) -> String {
        let mut script = format!("{}.{}({}", self.namespace, handler, id.as_i64());
        for arg in args {
            script.push_str(", ");
            script.push_str(arg);
        }
        script.push(')');
        script
    }

    pub fn deliver(&self, handler: &str, id: CorrelationId, args: &[String]) {
        let script = self.script_call(handler, id, args);
        trace!(%id, handler, "pushing script to web sink");
        self.sink.execute_script(&script);
    }
}

impl fmt::Debug for WebSinkAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebSinkAdapter")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

/// In-memory sink that keeps every script it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    scripts: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripts(&self) -> Vec<String> {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl WebSink for RecordingSink {
    fn execute_script(&self, script: &str) {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(script.to_string());
    }
}
