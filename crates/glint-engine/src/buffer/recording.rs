//! In-memory backend used by unit tests.
//!
//! Buffers keep their bytes so tests can read back what the GPU would see, and
//! every handle reports its release to a shared ledger.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{Error, Result};

use super::backend::{BufferKind, BufferUsage, GpuBackend};
use super::vertex::VertexLayout;

#[derive(Debug)]
pub(crate) struct RecordedBuffer {
    pub kind: BufferKind,
    pub usage: BufferUsage,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub(crate) struct Ledger {
    next_id: u64,
    buffers: HashMap<u64, RecordedBuffer>,
    vertex_arrays: HashMap<u64, VertexLayout>,
    live_programs: usize,
    live_textures: usize,
    writes: usize,
}

impl Ledger {
    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Creation step that should fail on its next call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum FailPoint {
    VertexBuffer,
    IndexBuffer,
}

#[derive(Debug)]
pub(crate) struct FakeVertexArray {
    id: u64,
    ledger: Rc<RefCell<Ledger>>,
}

impl Drop for FakeVertexArray {
    fn drop(&mut self) {
        self.ledger.borrow_mut().vertex_arrays.remove(&self.id);
    }
}

#[derive(Debug)]
pub(crate) struct FakeBuffer {
    id: u64,
    ledger: Rc<RefCell<Ledger>>,
}

impl Drop for FakeBuffer {
    fn drop(&mut self) {
        self.ledger.borrow_mut().buffers.remove(&self.id);
    }
}

#[derive(Debug)]
pub(crate) struct FakeProgram {
    pub vertex_src: String,
    ledger: Rc<RefCell<Ledger>>,
}

impl Drop for FakeProgram {
    fn drop(&mut self) {
        self.ledger.borrow_mut().live_programs -= 1;
    }
}

#[derive(Debug)]
pub(crate) struct FakeTexture {
    pub width: u32,
    pub height: u32,
    pixels: Vec<u8>,
    ledger: Rc<RefCell<Ledger>>,
}

impl Drop for FakeTexture {
    fn drop(&mut self) {
        self.ledger.borrow_mut().live_textures -= 1;
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    ledger: Rc<RefCell<Ledger>>,
    fail_next: Cell<Option<FailPoint>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, point: FailPoint) {
        self.fail_next.set(Some(point));
    }

    /// Bytes currently stored in `buffer`.
    pub fn read_back(&self, buffer: &FakeBuffer) -> Vec<u8> {
        self.ledger
            .borrow()
            .buffers
            .get(&buffer.id)
            .map(|b| b.bytes.clone())
            .unwrap_or_default()
    }

    pub fn usage_of(&self, buffer: &FakeBuffer) -> Option<BufferUsage> {
        self.ledger.borrow().buffers.get(&buffer.id).map(|b| b.usage)
    }

    pub fn kind_of(&self, buffer: &FakeBuffer) -> Option<BufferKind> {
        self.ledger.borrow().buffers.get(&buffer.id).map(|b| b.kind)
    }

    pub fn layout_of(&self, vao: &FakeVertexArray) -> Option<VertexLayout> {
        self.ledger.borrow().vertex_arrays.get(&vao.id).cloned()
    }

    pub fn live_buffers(&self) -> usize {
        self.ledger.borrow().buffers.len()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.ledger.borrow().vertex_arrays.len()
    }

    pub fn live_programs(&self) -> usize {
        self.ledger.borrow().live_programs
    }

    pub fn live_textures(&self) -> usize {
        self.ledger.borrow().live_textures
    }

    pub fn texture_pixels(&self, texture: &FakeTexture) -> Vec<u8> {
        texture.pixels.clone()
    }

    pub fn writes(&self) -> usize {
        self.ledger.borrow().writes
    }

    fn take_failure(&self, point: FailPoint) -> bool {
        if self.fail_next.get() == Some(point) {
            self.fail_next.set(None);
            true
        } else {
            false
        }
    }
}

impl GpuBackend for RecordingBackend {
    type VertexArray = FakeVertexArray;
    type Buffer = FakeBuffer;
    type Program = FakeProgram;
    type Texture = FakeTexture;

    fn create_vertex_array(&self, layout: &VertexLayout) -> Result<FakeVertexArray> {
        let mut ledger = self.ledger.borrow_mut();
        let id = ledger.alloc_id();
        ledger.vertex_arrays.insert(id, layout.clone());
        Ok(FakeVertexArray { id, ledger: Rc::clone(&self.ledger) })
    }

    fn create_buffer(&self, kind: BufferKind, contents: &[u8], usage: BufferUsage) -> Result<FakeBuffer> {
        let point = match kind {
            BufferKind::Vertex => FailPoint::VertexBuffer,
            BufferKind::Index => FailPoint::IndexBuffer,
        };
        if self.take_failure(point) {
            return Err(Error::Gpu(format!("injected {kind:?} buffer failure")));
        }

        let mut ledger = self.ledger.borrow_mut();
        let id = ledger.alloc_id();
        ledger.buffers.insert(id, RecordedBuffer { kind, usage, bytes: contents.to_vec() });
        Ok(FakeBuffer { id, ledger: Rc::clone(&self.ledger) })
    }

    fn write_buffer(&self, buffer: &FakeBuffer, offset: u64, data: &[u8]) -> Result<()> {
        let mut ledger = self.ledger.borrow_mut();
        ledger.writes += 1;
        let stored = ledger
            .buffers
            .get_mut(&buffer.id)
            .ok_or_else(|| Error::Gpu("write to released buffer".into()))?;

        let start = offset as usize;
        let end = start + data.len();
        if end > stored.bytes.len() {
            return Err(Error::Gpu(format!(
                "write of {} bytes at {start} overflows a {}-byte buffer",
                data.len(),
                stored.bytes.len()
            )));
        }
        stored.bytes[start..end].copy_from_slice(data);
        Ok(())
    }

    fn compile_program(&self, vertex_src: &str, fragment_src: &str) -> Result<FakeProgram> {
        if vertex_src.trim().is_empty() || fragment_src.trim().is_empty() {
            return Err(Error::ShaderCompile("empty shader source".into()));
        }
        self.ledger.borrow_mut().live_programs += 1;
        Ok(FakeProgram { vertex_src: vertex_src.to_owned(), ledger: Rc::clone(&self.ledger) })
    }

    fn create_texture(&self, width: u32, height: u32, rgba: &[u8]) -> Result<FakeTexture> {
        self.ledger.borrow_mut().live_textures += 1;
        Ok(FakeTexture { width, height, pixels: rgba.to_vec(), ledger: Rc::clone(&self.ledger) })
    }
}
