use crate::mesh::MeshModel;
use std::fmt::{Debug, Display};

/**
 * All elements of the mesh implement this trait. They are identified by their
 * index.
 */
pub trait Handle {
    /**
     * The index of the element.
     */
    fn index(&self) -> u32;
}

/**
 * Vertex handle.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VH {
    idx: u32,
}

/**
 * Halfedge handle.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HH {
    idx: u32,
}

/**
 * Face handle.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FH {
    idx: u32,
}

impl Handle for VH {
    fn index(&self) -> u32 {
        self.idx
    }
}

impl From<u32> for VH {
    fn from(idx: u32) -> Self {
        VH { idx }
    }
}

impl From<&u32> for VH {
    fn from(idx: &u32) -> Self {
        VH { idx: *idx }
    }
}

impl Handle for HH {
    fn index(&self) -> u32 {
        self.idx
    }
}

impl From<u32> for HH {
    fn from(idx: u32) -> Self {
        HH { idx }
    }
}

impl From<&u32> for HH {
    fn from(idx: &u32) -> Self {
        HH { idx: *idx }
    }
}

impl Handle for FH {
    fn index(&self) -> u32 {
        self.idx
    }
}

impl From<u32> for FH {
    fn from(idx: u32) -> Self {
        FH { idx }
    }
}

impl From<&u32> for FH {
    fn from(idx: &u32) -> Self {
        FH { idx: *idx }
    }
}

impl Display for VH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VH({})", self.index())
    }
}

impl Display for HH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HH({})", self.index())
    }
}

impl Display for FH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FH({})", self.index())
    }
}

impl Debug for VH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VH({})", self.index())
    }
}

impl Debug for HH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HH({})", self.index())
    }
}

impl Debug for FH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FH({})", self.index())
    }
}

impl VH {
    /// One outgoing halfedge incident on this vertex, if any face using the
    /// vertex has been added.
    pub fn halfedge(self, mesh: &MeshModel) -> Option<HH> {
        mesh.vertex_halfedge(self)
    }

    /// Check if this vertex is valid for the `mesh`.
    ///
    /// The index has to be less than the number of vertices in the mesh.
    pub fn is_valid(self, mesh: &MeshModel) -> bool {
        (self.idx as usize) < mesh.num_vertices()
    }
}

impl HH {
    /// The vertex this halfedge points away from.
    pub fn tail(self, mesh: &MeshModel) -> VH {
        mesh.tail_vertex(self)
    }

    /// The vertex this halfedge points at.
    pub fn head(self, mesh: &MeshModel) -> VH {
        mesh.head_vertex(self)
    }

    pub fn prev(self, mesh: &MeshModel) -> HH {
        mesh.prev_halfedge(self)
    }

    pub fn next(self, mesh: &MeshModel) -> HH {
        mesh.next_halfedge(self)
    }

    /// The twin halfedge going the opposite way along the same undirected
    /// edge. `None` until the neighboring face is added, or forever if the
    /// edge is on the mesh boundary.
    pub fn pair(self, mesh: &MeshModel) -> Option<HH> {
        mesh.pair_halfedge(self)
    }

    pub fn face(self, mesh: &MeshModel) -> FH {
        mesh.halfedge_face(self)
    }

    /// Check if this halfedge is valid for the `mesh`.
    ///
    /// The index has to be less than the number of halfedges in the mesh.
    pub fn is_valid(self, mesh: &MeshModel) -> bool {
        (self.idx as usize) < mesh.num_halfedges()
    }

    /// Check if this halfedge is on the boundary of `mesh`.
    ///
    /// A halfedge is on the boundary as long as no twin going the other way
    /// has been inserted.
    pub fn is_boundary(self, mesh: &MeshModel) -> bool {
        mesh.pair_halfedge(self).is_none()
    }
}

impl FH {
    pub fn halfedge(self, mesh: &MeshModel) -> HH {
        mesh.face_halfedge(self)
    }

    /// Check if this face is valid for the `mesh`.
    ///
    /// The index has to be less than the number of faces in the mesh.
    pub fn is_valid(self, mesh: &MeshModel) -> bool {
        (self.idx as usize) < mesh.num_faces()
    }
}

#[derive(Debug, Copy, Clone)]
pub(crate) struct Vertex {
    pub(crate) id: u32,
    pub(crate) point: glam::Vec3,
    pub(crate) color: glam::Vec3,
    pub(crate) normal: glam::Vec3,
    pub(crate) num_faces: u32,
    pub(crate) halfedge: Option<HH>,
}

#[derive(Debug, Copy, Clone)]
pub(crate) struct Halfedge {
    pub(crate) vertex: VH,
    pub(crate) next: HH,
    pub(crate) prev: HH,
    pub(crate) pair: Option<HH>,
    pub(crate) face: FH,
}

#[derive(Debug, Copy, Clone)]
pub(crate) struct Face {
    pub(crate) halfedge: HH,
    pub(crate) normal: glam::Vec3,
    pub(crate) color: glam::Vec3,
}
