//! Opening the native library and locating it on disk.

use std::ffi::{c_void, OsString};
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

use libloading::Library;
use tracing::{debug, info};
use webview_common::NativeError;

/// Environment variable that overrides the library location.
pub const PATH_ENV: &str = "WEBVIEW_PATH";

/// Anything symbols can be resolved from.
///
/// Implemented by [`NativeLibrary`] for real shared objects; tests use an
/// in-process table instead.
pub trait SymbolSource: Send + Sync {
    /// Resolve `name`, returning `None` when the symbol does not exist.
    fn symbol(&self, name: &str) -> Option<NonNull<c_void>>;

    /// Human-readable origin for log lines.
    fn describe(&self) -> String;
}

/// A loaded shared library. Dropping it unloads the library.
pub struct NativeLibrary {
    path: PathBuf,
    lib: Library,
}

impl NativeLibrary {
    /// Open the shared library at `path`.
    pub fn open(path: &Path) -> Result<Self, NativeError> {
        // SAFETY: loading runs the library's initialisers; the webview library
        // has no initialisers with preconditions on the host.
        let lib = unsafe { Library::new(path) }.map_err(|e| NativeError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        info!(path = %path.display(), "native library loaded");
        Ok(Self {
            path: path.to_path_buf(),
            lib,
        })
    }
}

impl SymbolSource for NativeLibrary {
    fn symbol(&self, name: &str) -> Option<NonNull<c_void>> {
        // SAFETY: the symbol is read as an untyped address; it is only cast to
        // a function type by the entry-point table, which owns the signatures.
        let sym = unsafe { self.lib.get::<*mut c_void>(name.as_bytes()) }.ok()?;
        NonNull::new(*sym)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

impl Drop for NativeLibrary {
    fn drop(&mut self) {
        info!(path = %self.path.display(), "native library unloaded");
    }
}

// =============================================================================
// LOCATION
// =============================================================================

/// Where to look for the library.
#[derive(Debug, Clone, Default)]
pub struct LibrarySearch {
    /// Used as-is when set.
    pub explicit: Option<PathBuf>,
    /// Honour [`PATH_ENV`].
    pub use_env_override: bool,
    /// Directories searched for [`default_library_name`].
    pub search_dirs: Vec<PathBuf>,
}

/// Architecture tag used in the Linux library file name.
fn arch_tag() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        "x86" => "ia32",
        other => other,
    }
}

/// Platform default file name of the library.
///
/// - Windows: `libwebview.dll`
/// - Linux: `libwebview-<arch>.so`
/// - macOS: `libwebview.dylib`
pub fn default_library_name() -> String {
    if cfg!(target_os = "windows") {
        "libwebview.dll".to_string()
    } else if cfg!(target_os = "macos") {
        "libwebview.dylib".to_string()
    } else {
        format!("libwebview-{}.so", arch_tag())
    }
}

/// Ordered list of paths to try, given the value of [`PATH_ENV`].
pub fn candidate_paths(search: &LibrarySearch, env_value: Option<OsString>) -> Vec<PathBuf> {
    if let Some(path) = &search.explicit {
        return vec![path.clone()];
    }
    if search.use_env_override {
        if let Some(value) = env_value.filter(|v| !v.is_empty()) {
            return vec![PathBuf::from(value)];
        }
    }

    let name = default_library_name();
    let mut dirs: Vec<PathBuf> = search.search_dirs.clone();
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir.join("build"));
    }
    dirs.push(PathBuf::from("build"));

    dirs.into_iter().map(|d| d.join(&name)).collect()
}

/// Resolve the library path: the first candidate that exists, otherwise the
/// first candidate so the load error names a concrete file.
pub fn locate(search: &LibrarySearch) -> PathBuf {
    let candidates = candidate_paths(search, std::env::var_os(PATH_ENV));
    let found = candidates.iter().find(|p| p.exists()).cloned();
    match found {
        Some(path) => {
            debug!(path = %path.display(), "located native library");
            path
        }
        None => candidates
            .into_iter()
            .next()
            .unwrap_or_else(|| PathBuf::from(default_library_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let search = LibrarySearch {
            explicit: Some(PathBuf::from("/opt/libwebview.so")),
            use_env_override: true,
            search_dirs: vec![PathBuf::from("vendor")],
        };
        let paths = candidate_paths(&search, Some(OsString::from("/env/libwebview.so")));
        assert_eq!(paths, vec![PathBuf::from("/opt/libwebview.so")]);
    }

    #[test]
    fn env_override_beats_search_dirs() {
        let search = LibrarySearch {
            use_env_override: true,
            search_dirs: vec![PathBuf::from("vendor")],
            ..Default::default()
        };
        let paths = candidate_paths(&search, Some(OsString::from("/env/libwebview.so")));
        assert_eq!(paths, vec![PathBuf::from("/env/libwebview.so")]);
    }

    #[test]
    fn env_override_ignored_when_disabled_or_empty() {
        let search = LibrarySearch {
            use_env_override: false,
            ..Default::default()
        };
        let paths = candidate_paths(&search, Some(OsString::from("/env/libwebview.so")));
        assert!(paths.iter().all(|p| p != Path::new("/env/libwebview.so")));

        let search = LibrarySearch {
            use_env_override: true,
            ..Default::default()
        };
        let paths = candidate_paths(&search, Some(OsString::new()));
        assert!(paths.iter().all(|p| p.ends_with(default_library_name())));
    }

    #[test]
    fn search_dirs_come_first_then_build_dirs() {
        let search = LibrarySearch {
            search_dirs: vec![PathBuf::from("vendor")],
            ..Default::default()
        };
        let paths = candidate_paths(&search, None);
        assert_eq!(paths[0], PathBuf::from("vendor").join(default_library_name()));
        assert_eq!(
            paths.last().unwrap(),
            &PathBuf::from("build").join(default_library_name())
        );
    }

    #[test]
    fn locate_prefers_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(default_library_name());
        std::fs::write(&file, b"").unwrap();

        let search = LibrarySearch {
            search_dirs: vec![PathBuf::from("/definitely/missing"), dir.path().to_path_buf()],
            ..Default::default()
        };
        assert_eq!(locate(&search), file);
    }

    #[test]
    fn default_name_matches_platform() {
        let name = default_library_name();
        assert!(name.starts_with("libwebview"));
        if cfg!(target_os = "linux") {
            assert!(name.ends_with(".so"));
            assert!(name.contains('-'));
        }
    }

    #[test]
    fn open_missing_library_is_load_error() {
        let err = NativeLibrary::open(Path::new("/definitely/missing/libwebview.so"))
            .err()
            .unwrap();
        assert!(matches!(err, NativeError::Load { .. }));
        assert!(err.to_string().contains("/definitely/missing/libwebview.so"));
    }
}
