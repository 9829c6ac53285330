//! Shared helpers for Bijoux integration tests.
//!
//! The persistence facade is exercised against the file backend on
//! temporary directories, so every test gets an isolated, freshly seeded
//! store.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used)] // test support code

use tempfile::TempDir;

use bijoux_core::ProductDraft;
use bijoux_server::assets::Assets;
use bijoux_server::store::Store;
use bijoux_server::store::file::FileStore;

/// A file-backed store rooted in a temp directory, plus an uploads root.
///
/// The temp dirs live as long as this value; keep it in scope for the
/// whole test.
pub struct TestStore {
    pub store: Store,
    pub assets: Assets,
    data_dir: TempDir,
    uploads_dir: TempDir,
}

impl TestStore {
    /// Open a freshly seeded file-backed store.
    ///
    /// # Panics
    ///
    /// Panics when the temp directories cannot be created; tests have no
    /// useful way to recover from that.
    pub async fn open() -> Self {
        let data_dir = TempDir::new().unwrap();
        let uploads_dir = TempDir::new().unwrap();
        let store = Store::File(FileStore::open(data_dir.path()).await.unwrap());
        let assets = Assets::new(uploads_dir.path()).unwrap();
        Self {
            store,
            assets,
            data_dir,
            uploads_dir,
        }
    }

    /// Path of the data directory backing this store.
    #[must_use]
    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }

    /// Path of the uploads directory backing this store.
    #[must_use]
    pub fn uploads_path(&self) -> &std::path::Path {
        self.uploads_dir.path()
    }
}

/// A minimal product draft with the given name.
#[must_use]
pub fn draft(name: &str) -> ProductDraft {
    ProductDraft {
        name: name.to_string(),
        ..ProductDraft::default()
    }
}
