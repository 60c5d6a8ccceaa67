//! Vertex data structures and layouts for voxel rendering.
//!
//! This module defines the vertex format emitted by the mesh builder and the
//! matching `wgpu` vertex buffer layout.

use cgmath::{Point3, Vector3};

/// A vertex in the voxel rendering pipeline.
///
/// One vertex per face corner; faces never share vertices. Only the sun channel
/// of the corner lighting reaches the vertex.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Normal: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Texture Index: u32 (4 bytes)
/// - Sun Light: f32 (4 bytes)
///
/// Total size: 40 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Corner position in world space
    pub position: [f32; 3],
    /// Face normal
    pub normal: [f32; 3],
    /// UV texture coordinates (normalized 0.0-1.0)
    pub tex_coords: [f32; 2],
    /// Index of the texture in the texture array
    pub texture_index: u32,
    /// Averaged corner sunlight, normalized to 0.0-1.0
    pub sun_light: f32,
}

impl Vertex {
    /// Creates a new vertex with the given parameters.
    ///
    /// # Arguments
    /// * `position` - The corner position in world space
    /// * `normal` - The outward normal of the face
    /// * `tex_coords` - UV coordinates of the corner
    /// * `texture_index` - Index of the texture in the texture array
    /// * `sun_light` - Normalized sunlight at the corner
    ///
    /// # Returns
    /// A new `Vertex` instance
    pub fn new(
        position: Point3<f32>,
        normal: Vector3<f32>,
        tex_coords: [f32; 2],
        texture_index: u32,
        sun_light: f32,
    ) -> Self {
        Vertex {
            position: position.into(),
            normal: normal.into(),
            tex_coords,
            texture_index,
            sun_light,
        }
    }

    /// Returns the vertex buffer layout description for the shader pipeline.
    ///
    /// # Returns
    /// A `wgpu::VertexBufferLayout` describing the vertex format
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: normal (vec3<f32>)
    /// - `location = 2`: tex_coords (vec2<f32>)
    /// - `location = 3`: texture_index (u32)
    /// - `location = 4`: sun_light (f32)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Uint32,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 9]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_stride_matches_struct_size() {
        let layout = Vertex::desc();

        assert_eq!(layout.array_stride, 40);
        assert_eq!(std::mem::size_of::<Vertex>(), 40);
        assert_eq!(layout.attributes.last().map(|a| a.offset), Some(36));
    }
}
