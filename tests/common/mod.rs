#![allow(dead_code)]

use async_trait::async_trait;
use globo_note::app::{FileOpsOptions, GlobalFolders};
use globo_note::host::scripted::{RecordingWorkbench, ScriptedDialogs};
use globo_note::host::{Host, StateStore};
use globo_note::model::filesystem::{
    DeleteOptions, DirEntry, FileStat, FileSystem, StdFileSystem,
};
use globo_note::model::folder::PathPolicy;
use globo_note::primitives::name_validation::NamePlatform;
use globo_note::services::state::MemoryStateStore;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

/// Initialize the global tracing subscriber once (output shows with `RUST_LOG`).
pub fn init_tracing_from_env() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stdout);
        let _ = subscriber.try_init();
    });
}

/// Real filesystem that counts stat, rename and delete calls
#[derive(Debug, Default)]
pub struct CountingFileSystem {
    inner: StdFileSystem,
    stats: AtomicUsize,
    renames: AtomicUsize,
    deletes: AtomicUsize,
}

impl CountingFileSystem {
    pub fn stats(&self) -> usize {
        self.stats.load(Ordering::SeqCst)
    }

    pub fn renames(&self) -> usize {
        self.renames.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileSystem for CountingFileSystem {
    async fn stat(&self, path: &Path) -> io::Result<FileStat> {
        self.stats.fetch_add(1, Ordering::SeqCst);
        self.inner.stat(path).await
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        self.inner.read_dir(path).await
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        self.inner.write_file(path, data).await
    }

    async fn create_dir(&self, path: &Path) -> io::Result<()> {
        self.inner.create_dir(path).await
    }

    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.renames.fetch_add(1, Ordering::SeqCst);
        self.inner.rename(from, to).await
    }

    async fn delete(&self, path: &Path, options: DeleteOptions) -> io::Result<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(path, options).await
    }
}

/// Scripted host around a temp directory
pub struct Harness {
    pub temp_dir: tempfile::TempDir,
    pub fs: Arc<CountingFileSystem>,
    pub state: Arc<dyn StateStore>,
    pub dialogs: Arc<ScriptedDialogs>,
    pub workbench: Arc<RecordingWorkbench>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_state(Arc::new(MemoryStateStore::new()))
    }

    pub fn with_state(state: Arc<dyn StateStore>) -> Self {
        init_tracing_from_env();
        Self {
            temp_dir: tempfile::tempdir().unwrap(),
            fs: Arc::new(CountingFileSystem::default()),
            state,
            dialogs: Arc::new(ScriptedDialogs::new()),
            workbench: Arc::new(RecordingWorkbench::new()),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn host(&self) -> Host {
        Host::new(
            self.fs.clone(),
            self.state.clone(),
            self.dialogs.clone(),
            self.workbench.clone(),
        )
    }

    pub fn app(&self) -> GlobalFolders {
        let options = FileOpsOptions {
            platform: NamePlatform::Unix,
            use_trash: false,
            confirm_delete: true,
        };
        GlobalFolders::new(self.host(), PathPolicy::CASE_SENSITIVE, options)
    }

    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    pub fn mkdir(&self, relative: &str) {
        std::fs::create_dir_all(self.path().join(relative)).unwrap();
    }
}
