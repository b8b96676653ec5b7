//! The base mesh the tessellator subdivides.

use std::ffi::c_void;
use std::mem::size_of;
use std::ptr::null;

use gl::types::{GLsizei, GLuint};

/// Unit icosahedron, 12 vertices.
#[rustfmt::skip]
pub const VERTICES: [f32; 36] = [
     0.000,  0.000,  1.000,
     0.894,  0.000,  0.447,
     0.276,  0.851,  0.447,
    -0.724,  0.526,  0.447,
    -0.724, -0.526,  0.447,
     0.276, -0.851,  0.447,
     0.724,  0.526, -0.447,
    -0.276,  0.851, -0.447,
    -0.894,  0.000, -0.447,
    -0.276, -0.851, -0.447,
     0.724, -0.526, -0.447,
     0.000,  0.000, -1.000,
];

/// 20 triangular faces, one patch each.
#[rustfmt::skip]
pub const INDICES: [u32; 60] = [
    2, 1, 0,
    3, 2, 0,
    4, 3, 0,
    5, 4, 0,
    1, 5, 0,

    11, 6,  7,
    11, 7,  8,
    11, 8,  9,
    11, 9, 10,
    11, 10, 6,

    1, 2, 6,
    2, 3, 7,
    3, 4, 8,
    4, 5, 9,
    5, 1, 10,

    2,  7, 6,
    3,  8, 7,
    4,  9, 8,
    5, 10, 9,
    1,  6, 10,
];

/// Vertex and index buffers bound into one vertex array, drawn as patches.
pub struct PatchMesh {
    vao: GLuint,
    vbo: GLuint,
    ebo: GLuint,
    index_count: GLsizei,
}

impl PatchMesh {
    /// Uploads positions (attribute 0, tightly packed vec3) and indices.
    pub fn upload(vertices: &[f32], indices: &[u32]) -> Self {
        let mut vbo = 0;
        let mut vao = 0;
        let mut ebo = 0;
        unsafe {
            gl::GenBuffers(1, &mut vbo);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                (vertices.len() * size_of::<f32>()) as isize,
                vertices.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );

            gl::GenVertexArrays(1, &mut vao);
            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::VertexAttribPointer(0, 3, gl::FLOAT, gl::FALSE, 0, null());
            gl::EnableVertexAttribArray(0);

            gl::GenBuffers(1, &mut ebo);
            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
            gl::BufferData(
                gl::ELEMENT_ARRAY_BUFFER,
                (indices.len() * size_of::<u32>()) as isize,
                indices.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );
        }
        Self {
            vao,
            vbo,
            ebo,
            index_count: indices.len() as GLsizei,
        }
    }

    /// One indexed draw of the whole mesh, one triangle per patch.
    pub fn draw_patches(&self) {
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::DrawElements(gl::PATCHES, self.index_count, gl::UNSIGNED_INT, null());
        }
    }

    pub fn index_count(&self) -> GLsizei {
        self.index_count
    }
}

impl Drop for PatchMesh {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteBuffers(1, &self.ebo);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertices_sit_on_the_unit_sphere() {
        for vertex in VERTICES.chunks(3) {
            let length = (vertex[0] * vertex[0] + vertex[1] * vertex[1] + vertex[2] * vertex[2])
                .sqrt();
            assert!((length - 1.0).abs() < 1e-3, "vertex {vertex:?} off the sphere");
        }
    }

    #[test]
    fn indices_reference_existing_vertices() {
        let vertex_count = (VERTICES.len() / 3) as u32;
        assert!(INDICES.iter().all(|&i| i < vertex_count));
    }

    #[test]
    fn the_mesh_has_twenty_triangular_faces() {
        assert_eq!(INDICES.len() % 3, 0);
        assert_eq!(INDICES.len() / 3, 20);
    }

    #[test]
    fn each_face_uses_three_distinct_vertices() {
        for face in INDICES.chunks(3) {
            assert!(face[0] != face[1] && face[1] != face[2] && face[0] != face[2]);
        }
    }
}
