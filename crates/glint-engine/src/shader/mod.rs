//! Shader programs: WGSL vertex + fragment pairs compiled through a
//! [`GpuBackend`], with reflected vertex inputs and live reload from disk.

mod reflect;

use std::cell::{Cell, Ref, RefCell};
use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::buffer::GpuBackend;
use crate::error::{Error, Result};

pub use reflect::{check_fragment, vertex_inputs, FRAGMENT_ENTRY, VERTEX_ENTRY};

static NEXT_PROGRAM_ID: AtomicU64 = AtomicU64::new(1);

struct ShaderFiles {
    vertex: PathBuf,
    fragment: PathBuf,
    watch: SourceWatch,
}

impl ShaderFiles {
    fn read(&self) -> Result<(String, String)> {
        Ok((read_source(&self.vertex)?, read_source(&self.fragment)?))
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_owned(), source })
}

/// Watches the directories holding a shader's sources.
///
/// Directories rather than files, so editors that save by renaming a
/// temporary file over the original are still seen.
struct SourceWatch {
    _watcher: Option<RecommendedWatcher>,
    events: mpsc::Receiver<notify::Event>,
    names: Vec<OsString>,
}

impl SourceWatch {
    fn new(files: &[&Path]) -> Self {
        let (tx, rx) = mpsc::channel::<notify::Event>();
        let names = files.iter().filter_map(|f| f.file_name()).map(OsString::from).collect();

        let watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            if let Ok(event) = res {
                let _ = tx.send(event);
            }
        });
        let watcher = match watcher {
            Ok(mut watcher) => {
                let mut dirs: Vec<&Path> = files
                    .iter()
                    .map(|f| f.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new(".")))
                    .collect();
                dirs.dedup();
                for dir in dirs {
                    if let Err(e) = watcher.watch(dir, RecursiveMode::NonRecursive) {
                        log::warn!("cannot watch {} for shader edits: {e}", dir.display());
                    }
                }
                Some(watcher)
            }
            Err(e) => {
                log::warn!("shader file watcher unavailable, live reload disabled: {e}");
                None
            }
        };

        Self { _watcher: watcher, events: rx, names }
    }

    /// Drains pending events; true if any of them touched a watched source.
    fn changed(&self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.events.try_recv() {
            if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                continue;
            }
            changed |= event
                .paths
                .iter()
                .filter_map(|p| p.file_name())
                .any(|name| self.names.iter().any(|n| n == name));
        }
        changed
    }
}

/// A compiled program plus the vertex-input table reflected from its source.
///
/// Shared between buffers through `Rc`; recompilation swaps the program in
/// place, so state lives behind interior mutability.
pub struct Shader<B: GpuBackend> {
    program: RefCell<Option<B::Program>>,
    attributes: RefCell<HashMap<String, u32>>,
    id: Cell<u64>,
    files: Option<ShaderFiles>,
}

impl<B: GpuBackend> Shader<B> {
    /// Reads and compiles a vertex/fragment pair from disk and starts
    /// watching both files.
    pub fn load(gpu: &B, vertex_path: impl AsRef<Path>, fragment_path: impl AsRef<Path>) -> Result<Self> {
        let (vertex, fragment) = (vertex_path.as_ref(), fragment_path.as_ref());
        let files = ShaderFiles {
            vertex: vertex.to_owned(),
            fragment: fragment.to_owned(),
            watch: SourceWatch::new(&[vertex, fragment]),
        };
        Self::from_files(gpu, files)
    }

    fn from_files(gpu: &B, files: ShaderFiles) -> Result<Self> {
        let (vs, fs) = files.read()?;
        let shader = Self { files: Some(files), ..Self::unloaded() };
        shader.compile(gpu, &vs, &fs)?;
        log::info!("loaded shader {}", shader.describe());
        Ok(shader)
    }

    /// Compiles in-memory sources. Such a shader never reloads.
    pub fn from_source(gpu: &B, vertex_src: &str, fragment_src: &str) -> Result<Self> {
        let shader = Self::unloaded();
        shader.compile(gpu, vertex_src, fragment_src)?;
        Ok(shader)
    }

    /// A shader with no program. Not ready; buffers refuse it.
    pub fn unloaded() -> Self {
        Self {
            program: RefCell::new(None),
            attributes: RefCell::new(HashMap::new()),
            id: Cell::new(0),
            files: None,
        }
    }

    fn compile(&self, gpu: &B, vertex_src: &str, fragment_src: &str) -> Result<()> {
        let attributes = reflect::vertex_inputs(vertex_src)?;
        reflect::check_fragment(fragment_src)?;
        let program = gpu.compile_program(vertex_src, fragment_src)?;

        *self.program.borrow_mut() = Some(program);
        *self.attributes.borrow_mut() = attributes;
        self.id.set(NEXT_PROGRAM_ID.fetch_add(1, Ordering::Relaxed));
        Ok(())
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.program.borrow().is_some()
    }

    /// Location of the vertex input called `name`, if the program declares one.
    pub fn attribute_location(&self, name: &str) -> Option<u32> {
        self.attributes.borrow().get(name).copied()
    }

    /// The current program. Borrow briefly; a reload needs it back.
    pub fn program(&self) -> Option<Ref<'_, B::Program>> {
        Ref::filter_map(self.program.borrow(), Option::as_ref).ok()
    }

    /// Changes every time a new program is compiled; 0 while unloaded.
    #[inline]
    pub fn program_id(&self) -> u64 {
        self.id.get()
    }

    /// Source paths for shaders created with [`load`](Self::load).
    pub fn paths(&self) -> Option<(&Path, &Path)> {
        self.files.as_ref().map(|f| (f.vertex.as_path(), f.fragment.as_path()))
    }

    /// Recompiles when the file watcher has reported an edit to either
    /// source since the last call.
    ///
    /// Returns whether a new program was installed. On a failed recompile
    /// the previous program stays in place and the error is returned; the
    /// broken sources are not read again until the next edit.
    ///
    /// Attribute locations follow the new program. Vertex layouts derived
    /// from them must be rebuilt when [`program_id`](Self::program_id)
    /// changes.
    pub fn reload_if_modified(&self, gpu: &B) -> Result<bool> {
        let Some(files) = &self.files else { return Ok(false) };
        if !files.watch.changed() {
            return Ok(false);
        }

        let (vs, fs) = files.read()?;
        self.compile(gpu, &vs, &fs)?;
        log::info!("reloaded shader {}", self.describe());
        Ok(true)
    }

    fn describe(&self) -> String {
        match &self.files {
            Some(f) => format!("{} + {} (program {})", f.vertex.display(), f.fragment.display(), self.id.get()),
            None => format!("<inline> (program {})", self.id.get()),
        }
    }
}

impl<B: GpuBackend> fmt::Debug for Shader<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shader")
            .field("program_id", &self.id.get())
            .field("ready", &self.is_ready())
            .field("attributes", &*self.attributes.borrow())
            .finish()
    }
}
