//! Reference delegates backed by the desktop the host runs on.

use chrono::{DateTime, Utc};
use hostbridge_capabilities::filesystem::FileDescriptor;
use hostbridge_capabilities::os::OsInfo;
use hostbridge_capabilities::{FileSystemDelegate, OsDelegate};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::time::SystemTime;

/// Reports the compile-time target OS.
#[derive(Debug, Default)]
pub struct DesktopOs;

impl DesktopOs {
    fn name() -> &'static str {
        match std::env::consts::OS {
            "linux" => "Linux",
            "macos" => "OSX",
            "windows" => "Windows",
            "ios" => "iOS",
            "android" => "Android",
            other => other,
        }
    }

    fn vendor() -> &'static str {
        match std::env::consts::OS {
            "macos" | "ios" => "Apple",
            "windows" => "Microsoft",
            "android" => "Google",
            _ => "Unknown",
        }
    }

    fn version() -> Option<String> {
        std::fs::read_to_string("/proc/sys/kernel/osrelease")
            .ok()
            .map(|release| release.trim().to_string())
            .filter(|release| !release.is_empty())
    }
}

impl OsDelegate for DesktopOs {
    fn get_os_info(&self) -> Option<OsInfo> {
        Some(OsInfo {
            name: Some(Self::name().to_string()),
            version: Self::version(),
            vendor: Some(Self::vendor().to_string()),
        })
    }
}

/// Application folders laid out under a root directory.
///
/// ```text
/// <root>/             application folder
/// <root>/documents    documents
/// <root>/protected    protected
/// <temp>/<app>        cache
/// ```
///
/// There is no cloud folder on the desktop; the external folder is the
/// user's home directory when known.
#[derive(Debug, Clone)]
pub struct DesktopFileSystem {
    root: PathBuf,
    cache: PathBuf,
    external: Option<PathBuf>,
}

impl DesktopFileSystem {
    pub fn new(root: impl Into<PathBuf>, app_name: &str) -> Self {
        let external = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from);
        Self {
            root: root.into(),
            cache: std::env::temp_dir().join(app_name),
            external,
        }
    }

    /// Rooted at the process working directory.
    pub fn from_current_dir(app_name: &str) -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?, app_name))
    }

    pub fn with_external(mut self, external: Option<PathBuf>) -> Self {
        self.external = external;
        self
    }
}

fn millis(time: std::io::Result<SystemTime>) -> Option<i64> {
    time.ok()
        .map(|time| DateTime::<Utc>::from(time).timestamp_millis())
}

/// Describe `path`; metadata fields stay unset when it does not exist.
pub fn describe(path: &Path) -> FileDescriptor {
    let metadata = std::fs::metadata(path).ok();
    FileDescriptor {
        date_created: metadata.as_ref().and_then(|m| millis(m.created())),
        date_modified: metadata.as_ref().and_then(|m| millis(m.modified())),
        name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned()),
        path: path
            .parent()
            .map(|parent| parent.to_string_lossy().into_owned()),
        path_absolute: Some(path.to_string_lossy().into_owned()),
        size: metadata
            .as_ref()
            .and_then(|m| i64::try_from(m.len()).ok()),
    }
}

impl FileSystemDelegate for DesktopFileSystem {
    fn create_file_descriptor(&self, parent: FileDescriptor, name: String) -> Option<FileDescriptor> {
        let parent = match (parent.path_absolute, parent.path, parent.name) {
            (Some(absolute), _, _) => PathBuf::from(absolute),
            (None, Some(dir), Some(file)) => Path::new(&dir).join(file),
            (None, Some(dir), None) => PathBuf::from(dir),
            (None, None, _) => return None,
        };
        Some(describe(&parent.join(name)))
    }

    fn get_application_cache_folder(&self) -> Option<FileDescriptor> {
        Some(describe(&self.cache))
    }

    fn get_application_cloud_folder(&self) -> Option<FileDescriptor> {
        None
    }

    fn get_application_documents_folder(&self) -> Option<FileDescriptor> {
        Some(describe(&self.root.join("documents")))
    }

    fn get_application_folder(&self) -> Option<FileDescriptor> {
        Some(describe(&self.root))
    }

    fn get_application_protected_folder(&self) -> Option<FileDescriptor> {
        Some(describe(&self.root.join("protected")))
    }

    fn get_separator(&self) -> Option<char> {
        Some(MAIN_SEPARATOR)
    }

    fn get_system_external_folder(&self) -> Option<FileDescriptor> {
        self.external.as_deref().map(describe)
    }
}
