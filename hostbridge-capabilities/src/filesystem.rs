use hostbridge_core::{
    bean, encode, ApiGroup, Call, CallMode, Capability, MethodDescriptor, Param, Result, Returns,
};

bean! {
    /// A file or folder as seen by the web side. Dates are milliseconds since
    /// the Unix epoch.
    pub struct FileDescriptor as "FileDescriptor" {
        date_created: i64 => "dateCreated",
        date_modified: i64 => "dateModified",
        name: String => "name",
        path: String => "path",
        path_absolute: String => "pathAbsolute",
        size: i64 => "size",
    }
}

/// Well-known application folders.
pub trait FileSystemDelegate: Send + Sync {
    /// Descriptor for `name` inside `parent`. The file need not exist.
    fn create_file_descriptor(&self, parent: FileDescriptor, name: String) -> Option<FileDescriptor>;
    fn get_application_cache_folder(&self) -> Option<FileDescriptor>;
    fn get_application_cloud_folder(&self) -> Option<FileDescriptor>;
    fn get_application_documents_folder(&self) -> Option<FileDescriptor>;
    fn get_application_folder(&self) -> Option<FileDescriptor>;
    fn get_application_protected_folder(&self) -> Option<FileDescriptor>;
    fn get_separator(&self) -> Option<char>;
    fn get_system_external_folder(&self) -> Option<FileDescriptor>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSystemOp {
    CreateFileDescriptor,
    GetApplicationCacheFolder,
    GetApplicationCloudFolder,
    GetApplicationDocumentsFolder,
    GetApplicationFolder,
    GetApplicationProtectedFolder,
    GetSeparator,
    GetSystemExternalFolder,
}

const FOLDER: CallMode = CallMode::Sync(Returns::Value("FileDescriptor"));

#[derive(Debug)]
pub struct FileSystemBridge;

impl Capability for FileSystemBridge {
    type Delegate = dyn FileSystemDelegate;
    type Op = FileSystemOp;

    const BRIDGE: &'static str = "FileSystemBridge";
    const INTERFACE: &'static str = "IFileSystem";
    const GROUP: ApiGroup = ApiGroup::Data;
    const METHODS: &'static [MethodDescriptor<FileSystemOp>] = &[
        MethodDescriptor {
            name: "createFileDescriptor",
            op: FileSystemOp::CreateFileDescriptor,
            params: &[
                Param::new("parent", "FileDescriptor"),
                Param::new("name", "string"),
            ],
            mode: FOLDER,
        },
        MethodDescriptor {
            name: "getApplicationCacheFolder",
            op: FileSystemOp::GetApplicationCacheFolder,
            params: &[],
            mode: FOLDER,
        },
        MethodDescriptor {
            name: "getApplicationCloudFolder",
            op: FileSystemOp::GetApplicationCloudFolder,
            params: &[],
            mode: FOLDER,
        },
        MethodDescriptor {
            name: "getApplicationDocumentsFolder",
            op: FileSystemOp::GetApplicationDocumentsFolder,
            params: &[],
            mode: FOLDER,
        },
        MethodDescriptor {
            name: "getApplicationFolder",
            op: FileSystemOp::GetApplicationFolder,
            params: &[],
            mode: FOLDER,
        },
        MethodDescriptor {
            name: "getApplicationProtectedFolder",
            op: FileSystemOp::GetApplicationProtectedFolder,
            params: &[],
            mode: FOLDER,
        },
        MethodDescriptor {
            name: "getSeparator",
            op: FileSystemOp::GetSeparator,
            params: &[],
            mode: CallMode::Sync(Returns::Value("char")),
        },
        MethodDescriptor {
            name: "getSystemExternalFolder",
            op: FileSystemOp::GetSystemExternalFolder,
            params: &[],
            mode: FOLDER,
        },
    ];

    fn dispatch(delegate: &Self::Delegate, call: &Call<'_, FileSystemOp>) -> Result<Option<String>> {
        Ok(match call.op() {
            FileSystemOp::CreateFileDescriptor => {
                encode(delegate.create_file_descriptor(call.param(0)?, call.string(1)?))
            }
            FileSystemOp::GetApplicationCacheFolder => encode(delegate.get_application_cache_folder()),
            FileSystemOp::GetApplicationCloudFolder => encode(delegate.get_application_cloud_folder()),
            FileSystemOp::GetApplicationDocumentsFolder => {
                encode(delegate.get_application_documents_folder())
            }
            FileSystemOp::GetApplicationFolder => encode(delegate.get_application_folder()),
            FileSystemOp::GetApplicationProtectedFolder => {
                encode(delegate.get_application_protected_folder())
            }
            FileSystemOp::GetSeparator => encode(delegate.get_separator()),
            FileSystemOp::GetSystemExternalFolder => encode(delegate.get_system_external_folder()),
        })
    }
}
