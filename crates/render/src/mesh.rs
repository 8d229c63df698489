use bytemuck::{Pod, Zeroable};

/// Position plus texture coordinate.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
}

/// One named vertex attribute inside an interleaved vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub name: &'static str,
    pub location: u32,
    /// Number of `f32` components.
    pub components: u32,
    /// Byte offset inside the vertex.
    pub offset: u64,
}

/// Interleaved vertex layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    pub stride: u64,
    pub attributes: &'static [VertexAttribute],
}

impl VertexLayout {
    /// Shader input location of the attribute called `name`.
    pub fn attrib_location(&self, name: &str) -> Option<u32> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.location)
    }
}

pub const TEXTURED_VERTEX_LAYOUT: VertexLayout = VertexLayout {
    stride: std::mem::size_of::<TexturedVertex>() as u64,
    attributes: &[
        VertexAttribute {
            name: "position",
            location: 0,
            components: 3,
            offset: 0,
        },
        VertexAttribute {
            name: "tex_coord",
            location: 1,
            components: 2,
            offset: 3 * std::mem::size_of::<f32>() as u64,
        },
    ],
};

/// Static indexed geometry, uploaded once.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<TexturedVertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Unit quad in the XY plane, facing +Z, with texture coordinates in
    /// bottom-left origin convention.
    pub fn textured_quad() -> Self {
        #[rustfmt::skip]
        let vertices = vec![
            TexturedVertex { position: [ 0.5,  0.5, 0.0], tex_coord: [1.0, 1.0] }, // top right
            TexturedVertex { position: [ 0.5, -0.5, 0.0], tex_coord: [1.0, 0.0] }, // bottom right
            TexturedVertex { position: [-0.5, -0.5, 0.0], tex_coord: [0.0, 0.0] }, // bottom left
            TexturedVertex { position: [-0.5,  0.5, 0.0], tex_coord: [0.0, 1.0] }, // top left
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 1, 3,
            1, 2, 3,
        ];
        Self { vertices, indices }
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_indices_in_range() {
        let mesh = Mesh::textured_quad();
        assert_eq!(mesh.index_count(), 6);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn byte_views_match_layout() {
        let mesh = Mesh::textured_quad();
        assert_eq!(TEXTURED_VERTEX_LAYOUT.stride, 20);
        assert_eq!(mesh.vertex_bytes().len(), 4 * 20);
        assert_eq!(mesh.index_bytes().len(), 6 * 4);
    }

    #[test]
    fn attribute_lookup() {
        assert_eq!(TEXTURED_VERTEX_LAYOUT.attrib_location("position"), Some(0));
        assert_eq!(TEXTURED_VERTEX_LAYOUT.attrib_location("tex_coord"), Some(1));
        assert_eq!(TEXTURED_VERTEX_LAYOUT.attrib_location("normal"), None);
    }
}
