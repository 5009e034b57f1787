use hostbridge_core::{
    bean, encode, ApiGroup, Call, CallMode, Capability, MethodDescriptor, Result, Returns,
};

bean! {
    /// Operating system the host runs on.
    pub struct OsInfo as "OSInfo" {
        name: String => "name",
        version: String => "version",
        vendor: String => "vendor",
    }
}

pub trait OsDelegate: Send + Sync {
    fn get_os_info(&self) -> Option<OsInfo>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsOp {
    GetOsInfo,
}

#[derive(Debug)]
pub struct OsBridge;

impl Capability for OsBridge {
    type Delegate = dyn OsDelegate;
    type Op = OsOp;

    const BRIDGE: &'static str = "OSBridge";
    const INTERFACE: &'static str = "IOS";
    const GROUP: ApiGroup = ApiGroup::System;
    const METHODS: &'static [MethodDescriptor<OsOp>] = &[MethodDescriptor {
        name: "getOSInfo",
        op: OsOp::GetOsInfo,
        params: &[],
        mode: CallMode::Sync(Returns::Value("OSInfo")),
    }];

    fn dispatch(delegate: &Self::Delegate, call: &Call<'_, OsOp>) -> Result<Option<String>> {
        match call.op() {
            OsOp::GetOsInfo => Ok(encode(delegate.get_os_info())),
        }
    }
}
