use crate::bounds::Sphere;
use arrayvec::ArrayVec;

/// Mesh shading pipelines bound the number of vertices one cluster may
/// reference.
pub const MAX_MESHLET_VERTICES: usize = 64;

/// Upper bound on local primitive indices per cluster, i.e. 42 triangles.
pub const MAX_MESHLET_INDICES: usize = 126;

/**
 * One GPU-sized cluster of triangles.
 *
 * `vertex_indices` holds original mesh vertex ids. `primitive_indices`
 * holds local indices into `vertex_indices`, grouped in consecutive triples
 * per triangle. The bounding sphere is attached when the cluster is
 * finished and is what culling layers consume.
 */
#[derive(Debug, Clone)]
pub struct Meshlet {
    pub vertex_indices: ArrayVec<u32, MAX_MESHLET_VERTICES>,
    pub primitive_indices: ArrayVec<u32, MAX_MESHLET_INDICES>,
    pub sphere: Sphere,
}

impl Default for Meshlet {
    fn default() -> Self {
        Self::new()
    }
}

impl Meshlet {
    pub fn new() -> Self {
        Meshlet {
            vertex_indices: ArrayVec::new(),
            primitive_indices: ArrayVec::new(),
            sphere: Sphere {
                center: glam::Vec3::ZERO,
                radius: 0.0,
            },
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_indices.len()
    }

    pub fn index_count(&self) -> usize {
        self.primitive_indices.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.primitive_indices.len() / 3
    }

    fn local_index(&self, id: u32) -> Option<u32> {
        // Linear scan; the list never exceeds 64 entries.
        self.vertex_indices
            .iter()
            .position(|other| *other == id)
            .map(|i| i as u32)
    }

    /// Whether a triangle over `ids` fits without breaking either capacity.
    pub fn fits(&self, ids: &[u32; 3]) -> bool {
        let new = ids
            .iter()
            .filter(|id| self.local_index(**id).is_none())
            .count();
        self.vertex_count() + new <= MAX_MESHLET_VERTICES
            && self.index_count() + 3 <= MAX_MESHLET_INDICES
    }

    /// Append a triangle given by original vertex ids. Ids already
    /// referenced by the cluster are reused through their local index.
    /// Callers must check [`Meshlet::fits`] first.
    pub fn push_triangle(&mut self, ids: [u32; 3]) {
        debug_assert!(self.fits(&ids));
        for id in ids {
            let local = match self.local_index(id) {
                Some(local) => local,
                None => {
                    self.vertex_indices.push(id);
                    (self.vertex_indices.len() - 1) as u32
                }
            };
            self.primitive_indices.push(local);
        }
    }

    /// The triangles of this cluster mapped back to original vertex ids.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + use<'_> {
        self.primitive_indices
            .chunks_exact(3)
            .map(|tri| [0, 1, 2].map(|i| self.vertex_indices[tri[i] as usize]))
    }
}
