use glam::Vec2;

use crate::buffer::{translate_positions, GpuBackend, GpuBuffer};
use crate::error::Result;

/// A group of buffers that move together.
///
/// Unlike [`Shape`](super::Shape) there is no pivot, so only translation is supported.
#[derive(Debug)]
pub struct Entity<B: GpuBackend> {
    buffers: Vec<GpuBuffer<B>>,
}

impl<B: GpuBackend> Entity<B> {
    pub fn new() -> Self {
        Self { buffers: Vec::new() }
    }

    pub fn push(&mut self, buffer: GpuBuffer<B>) {
        self.buffers.push(buffer);
    }

    pub fn translate(&mut self, delta: Vec2) {
        for buffer in &mut self.buffers {
            let stride = buffer.stride();
            translate_positions(buffer.vertices_mut(), stride, delta);
        }
    }

    /// Re-uploads every buffer, stopping at the first failure.
    pub fn update(&self, gpu: &B) -> Result<()> {
        self.buffers.iter().try_for_each(|b| b.update(gpu))
    }

    #[inline]
    pub fn buffers(&self) -> &[GpuBuffer<B>] {
        &self.buffers
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

impl<B: GpuBackend> Default for Entity<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: GpuBackend> FromIterator<GpuBuffer<B>> for Entity<B> {
    fn from_iter<I: IntoIterator<Item = GpuBuffer<B>>>(iter: I) -> Self {
        Self { buffers: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::recording::RecordingBackend;
    use crate::error::Error;
    use crate::shader::tests::test_shader;
    use crate::shapes::Shape;

    fn two_rects(gpu: &RecordingBackend) -> Entity<RecordingBackend> {
        let shader = test_shader(gpu);
        [(0.0, 0.0), (10.0, 10.0)]
            .into_iter()
            .map(|(x, y)| Shape::rectangle(gpu, x, y, 1.0, 1.0, &shader, None).unwrap().into_buffer())
            .collect()
    }

    #[test]
    fn translate_moves_every_buffer() {
        let gpu = RecordingBackend::new();
        let mut entity = two_rects(&gpu);
        entity.translate(Vec2::new(2.0, 3.0));

        assert_eq!(entity.len(), 2);
        assert_eq!(entity.buffers()[0].packed_vertices()[0].position, [2.0, 3.0, 0.0]);
        assert_eq!(entity.buffers()[1].packed_vertices()[3].position, [13.0, 14.0, 0.0]);
    }

    #[test]
    fn update_uploads_every_buffer() {
        let gpu = RecordingBackend::new();
        let mut entity = two_rects(&gpu);
        entity.translate(Vec2::new(1.0, 1.0));
        entity.update(&gpu).unwrap();

        for buffer in entity.buffers() {
            let handles = buffer.handles().unwrap();
            assert_eq!(gpu.read_back(&handles.vertex_buffer), bytemuck::cast_slice::<f32, u8>(buffer.vertices()));
        }
    }

    #[test]
    fn update_stops_at_unallocated_buffer() {
        let gpu = RecordingBackend::new();
        let mut entity = Entity::new();
        entity.push(GpuBuffer::empty());
        assert!(matches!(entity.update(&gpu), Err(Error::Unallocated)));
    }

    #[test]
    fn empty_entity() {
        let gpu = RecordingBackend::new();
        let entity = Entity::<RecordingBackend>::default();
        assert!(entity.is_empty());
        assert!(entity.update(&gpu).is_ok());
    }
}
