//! Import-path registry: maps import paths to package builders and
//! memoizes the built packages
//!
//! The registry is an explicit instance, not a process-wide table, so
//! independent checker instances (and tests) do not interfere. Each path
//! moves through Registered → Building → Cached exactly once; there is no
//! invalidation or rebuild.

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use thiserror::Error;
use vela_types::Package;

/// A no-argument constructor producing a finished package
pub type BuildFn = Box<dyn Fn() -> Package + Send + Sync>;

/// Import resolution errors
///
/// The only recoverable failure of the registry. Defects inside a
/// registered builder (duplicate names, unfinalized types, incomplete
/// interfaces) panic instead: a malformed package would corrupt every
/// later checking decision that depends on it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ImportError {
    /// No builder is registered for the requested import path
    #[error("unsupported import: {path:?}")]
    Unsupported {
        /// The import path that failed to resolve
        path: String,
    },
}

/// Per-path slot: the pending builder plus the memoized result
struct Slot {
    build: Mutex<Option<BuildFn>>,
    built: OnceCell<Arc<Package>>,
}

/// Registry of stub package builders, keyed by import path
///
/// `lookup` memoizes: the builder for a path runs at most once, even under
/// concurrent first use, and every caller observes the identical
/// `Arc<Package>`.
pub struct Registry {
    slots: Mutex<FxHashMap<String, Arc<Slot>>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Registry {
            slots: Mutex::new(FxHashMap::default()),
        }
    }

    /// Register a package builder for an import path
    ///
    /// Typically called once per supported path at startup.
    ///
    /// # Panics
    ///
    /// Panics if the path already has a registered builder; a second
    /// registration could silently replace an already-cached package and is
    /// treated as a construction defect.
    pub fn register<F>(&self, path: impl Into<String>, build: F)
    where
        F: Fn() -> Package + Send + Sync + 'static,
    {
        let path = path.into();
        let mut slots = self.slots.lock();
        if slots.contains_key(&path) {
            panic!("duplicate registration for import path {path:?}");
        }
        slots.insert(
            path,
            Arc::new(Slot {
                build: Mutex::new(Some(Box::new(build))),
                built: OnceCell::new(),
            }),
        );
    }

    /// Resolve an import path to its package
    ///
    /// Returns the cached package if the path was already built; otherwise
    /// runs the registered builder exactly once, caches the result, and
    /// returns it. Unregistered paths fail with
    /// [`ImportError::Unsupported`], never a panic.
    pub fn lookup(&self, path: &str) -> Result<Arc<Package>, ImportError> {
        let slot = self
            .slots
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| ImportError::Unsupported {
                path: path.to_string(),
            })?;

        // get_or_init blocks concurrent first lookups until the one running
        // builder finishes, so construction happens exactly once.
        let pkg = slot.built.get_or_init(|| {
            let build = slot
                .build
                .lock()
                .take()
                .expect("builder taken without populating the cache");
            let pkg = build();
            assert!(
                pkg.is_complete(),
                "builder for {path:?} returned an incomplete package"
            );
            assert_eq!(
                pkg.path(),
                path,
                "builder for {path:?} returned a package with a different path"
            );
            Arc::new(pkg)
        });
        Ok(Arc::clone(pkg))
    }

    /// Whether a builder is registered for the path
    pub fn is_registered(&self, path: &str) -> bool {
        self.slots.lock().contains_key(path)
    }

    /// Whether the package for a path has already been built
    pub fn is_cached(&self, path: &str) -> bool {
        self.slots
            .lock()
            .get(path)
            .is_some_and(|slot| slot.built.get().is_some())
    }

    /// Number of registered paths
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    /// Whether no paths are registered
    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    /// All registered import paths, sorted
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.slots.lock().keys().cloned().collect();
        paths.sort();
        paths
    }
}
