use hostbridge_core::{
    bean, encode, wire_enum, ApiGroup, Call, CallMode, Callback, CallbackShape, Capability,
    MethodDescriptor, Param, Result, Returns,
};

bean! {
    /// One entry of the platform secure store.
    pub struct SecureKeyPair as "SecureKeyPair" {
        secure_data: String => "secureData",
        secure_key: String => "secureKey",
    }
}

wire_enum! {
    pub enum SecurityResultWarning as "ISecurityResultCallbackWarning" {
        EntryOverride => "EntryOverride",
    }
}

wire_enum! {
    pub enum SecurityResultError as "ISecurityResultCallbackError" {
        NoPermission => "NoPermission",
        NoMatchesFound => "NoMatchesFound",
    }
}

#[derive(Debug)]
pub struct SecurityResultCallback;

impl CallbackShape for SecurityResultCallback {
    const NAME: &'static str = "SecurityResultCallback";
    type Payload = Vec<SecureKeyPair>;
    type Warning = SecurityResultWarning;
    type Error = SecurityResultError;
}

/// Secure key/value storage shared under a public access name.
pub trait SecurityDelegate: Send + Sync {
    fn delete_secure_key_value_pairs(
        &self,
        keys: Vec<String>,
        public_access_name: String,
        callback: Callback<SecurityResultCallback>,
    );
    fn get_secure_key_value_pairs(
        &self,
        keys: Vec<String>,
        public_access_name: String,
        callback: Callback<SecurityResultCallback>,
    );
    fn set_secure_key_value_pairs(
        &self,
        key_values: Vec<SecureKeyPair>,
        public_access_name: String,
        callback: Callback<SecurityResultCallback>,
    );
    /// Whether the device is rooted or jailbroken.
    fn is_device_modified(&self) -> Option<bool>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityOp {
    DeleteSecureKeyValuePairs,
    GetSecureKeyValuePairs,
    SetSecureKeyValuePairs,
    IsDeviceModified,
}

#[derive(Debug)]
pub struct SecurityBridge;

impl Capability for SecurityBridge {
    type Delegate = dyn SecurityDelegate;
    type Op = SecurityOp;

    const BRIDGE: &'static str = "SecurityBridge";
    const INTERFACE: &'static str = "ISecurity";
    const GROUP: ApiGroup = ApiGroup::Security;
    const METHODS: &'static [MethodDescriptor<SecurityOp>] = &[
        MethodDescriptor {
            name: "deleteSecureKeyValuePairs",
            op: SecurityOp::DeleteSecureKeyValuePairs,
            params: &[
                Param::new("keys", "[string]"),
                Param::new("publicAccessName", "string"),
            ],
            mode: CallMode::Callback,
        },
        MethodDescriptor {
            name: "getSecureKeyValuePairs",
            op: SecurityOp::GetSecureKeyValuePairs,
            params: &[
                Param::new("keys", "[string]"),
                Param::new("publicAccessName", "string"),
            ],
            mode: CallMode::Callback,
        },
        MethodDescriptor {
            name: "setSecureKeyValuePairs",
            op: SecurityOp::SetSecureKeyValuePairs,
            params: &[
                Param::new("keyValues", "[SecureKeyPair]"),
                Param::new("publicAccessName", "string"),
            ],
            mode: CallMode::Callback,
        },
        MethodDescriptor {
            name: "isDeviceModified",
            op: SecurityOp::IsDeviceModified,
            params: &[],
            mode: CallMode::Sync(Returns::Bool),
        },
    ];

    fn dispatch(delegate: &Self::Delegate, call: &Call<'_, SecurityOp>) -> Result<Option<String>> {
        match call.op() {
            SecurityOp::DeleteSecureKeyValuePairs => {
                let (keys, name) = (call.param(0)?, call.string(1)?);
                delegate.delete_secure_key_value_pairs(keys, name, call.callback()?);
            }
            SecurityOp::GetSecureKeyValuePairs => {
                let (keys, name) = (call.param(0)?, call.string(1)?);
                delegate.get_secure_key_value_pairs(keys, name, call.callback()?);
            }
            SecurityOp::SetSecureKeyValuePairs => {
                let (pairs, name) = (call.param(0)?, call.string(1)?);
                delegate.set_secure_key_value_pairs(pairs, name, call.callback()?);
            }
            SecurityOp::IsDeviceModified => return Ok(encode(delegate.is_device_modified())),
        }
        Ok(None)
    }
}
