use crate::{
    element::{FH, Face, HH, Halfedge, Handle, VH, Vertex},
    error::Error,
    iterator,
};
use std::collections::HashMap;

/// How face normals are folded into the normals of their incident vertices.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NormalPolicy {
    /// Maintain a running average as faces are added. The vertex normal is
    /// usable at any point during construction.
    Blend,
    /// Accumulate the raw sum and a face counter, and average everything in
    /// one pass when [`MeshModel::finalize_normals`] is called.
    Deferred,
}

/// What to do when a directed edge is inserted a second time, which can only
/// happen for non-manifold input where more than two faces share an edge.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PairingPolicy {
    /// Keep only the most recently inserted halfedge in the lookup index.
    /// Pairing links of earlier faces on the same edge are left as they
    /// were, so downstream adjacency across that edge is unreliable.
    Overwrite,
    /// Fail fast with [`Error::NonManifoldEdge`].
    Reject,
}

/**
 * A triangle mesh stored as a halfedge graph.
 *
 * Vertices, faces and halfedges live in dense arenas and reference each
 * other by index handles ([`VH`], [`FH`], [`HH`]). Directed edges are
 * additionally indexed by a packed key of their endpoint handles, which
 * makes [`MeshModel::find_halfedge`] an O(1) lookup and lets
 * [`MeshModel::add_face`] pair a new halfedge with its already inserted
 * twin.
 */
pub struct MeshModel {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
    halfedges: Vec<Halfedge>,
    edge_index: HashMap<u64, HH>,
    id_index: HashMap<u32, VH>,
    pairing: PairingPolicy,
}

/// Pack a directed edge into a single hashable key. The reversed key of
/// (from, to) is the key of (to, from), which is how twins are found.
fn halfedge_key(from: VH, to: VH) -> u64 {
    ((from.index() as u64) << 32) | (to.index() as u64)
}

impl Default for MeshModel {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshModel {
    pub fn new() -> Self {
        Self::with_pairing(PairingPolicy::Overwrite)
    }

    pub fn with_pairing(pairing: PairingPolicy) -> Self {
        MeshModel {
            vertices: Vec::new(),
            faces: Vec::new(),
            halfedges: Vec::new(),
            edge_index: HashMap::new(),
            id_index: HashMap::new(),
            pairing,
        }
    }

    pub fn with_capacity(nverts: usize, nfaces: usize) -> Self {
        MeshModel {
            vertices: Vec::with_capacity(nverts),
            faces: Vec::with_capacity(nfaces),
            halfedges: Vec::with_capacity(nfaces * 3),
            edge_index: HashMap::with_capacity(nfaces * 3),
            id_index: HashMap::with_capacity(nverts),
            pairing: PairingPolicy::Overwrite,
        }
    }

    pub(crate) fn vertex(&self, v: VH) -> &Vertex {
        &self.vertices[v.index() as usize]
    }

    fn vertex_mut(&mut self, v: VH) -> &mut Vertex {
        &mut self.vertices[v.index() as usize]
    }

    pub(crate) fn halfedge(&self, h: HH) -> &Halfedge {
        &self.halfedges[h.index() as usize]
    }

    fn halfedge_mut(&mut self, h: HH) -> &mut Halfedge {
        &mut self.halfedges[h.index() as usize]
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn vertices(&self) -> impl Iterator<Item = VH> {
        (0..(self.num_vertices() as u32)).map(|i| i.into())
    }

    pub fn halfedges(&self) -> impl Iterator<Item = HH> {
        (0..(self.num_halfedges() as u32)).map(|i| i.into())
    }

    pub fn faces(&self) -> impl Iterator<Item = FH> {
        (0..(self.num_faces() as u32)).map(|i| i.into())
    }

    pub fn point(&self, v: VH) -> glam::Vec3 {
        self.vertex(v).point
    }

    pub fn vertex_color(&self, v: VH) -> glam::Vec3 {
        self.vertex(v).color
    }

    pub fn vertex_normal(&self, v: VH) -> glam::Vec3 {
        self.vertex(v).normal
    }

    /// The id the vertex was registered under, or the dense id after
    /// [`MeshModel::align_vertex_ids`].
    pub fn vertex_id(&self, v: VH) -> u32 {
        self.vertex(v).id
    }

    pub fn vertex_halfedge(&self, v: VH) -> Option<HH> {
        self.vertex(v).halfedge
    }

    pub fn tail_vertex(&self, h: HH) -> VH {
        self.halfedge(h).vertex
    }

    pub fn head_vertex(&self, h: HH) -> VH {
        self.halfedge(self.halfedge(h).next).vertex
    }

    pub fn prev_halfedge(&self, h: HH) -> HH {
        self.halfedge(h).prev
    }

    pub fn next_halfedge(&self, h: HH) -> HH {
        self.halfedge(h).next
    }

    pub fn pair_halfedge(&self, h: HH) -> Option<HH> {
        self.halfedge(h).pair
    }

    pub fn halfedge_face(&self, h: HH) -> FH {
        self.halfedge(h).face
    }

    pub fn face_halfedge(&self, f: FH) -> HH {
        self.faces[f.index() as usize].halfedge
    }

    pub fn face_normal(&self, f: FH) -> glam::Vec3 {
        self.faces[f.index() as usize].normal
    }

    pub fn face_color(&self, f: FH) -> glam::Vec3 {
        self.faces[f.index() as usize].color
    }

    /// Find the halfedge going from `from` to `to`, if that directed edge
    /// was ever created. O(1) hash lookup.
    pub fn find_halfedge(&self, from: VH, to: VH) -> Option<HH> {
        self.edge_index.get(&halfedge_key(from, to)).copied()
    }

    /// Find the vertex registered under `id`.
    pub fn find_vertex(&self, id: u32) -> Option<VH> {
        self.id_index.get(&id).copied()
    }

    /// The three corner vertices of `f` in winding order.
    pub fn face_vertices(&self, f: FH) -> [VH; 3] {
        let h0 = self.face_halfedge(f);
        let h1 = self.next_halfedge(h0);
        let h2 = self.next_halfedge(h1);
        [
            self.tail_vertex(h0),
            self.tail_vertex(h1),
            self.tail_vertex(h2),
        ]
    }

    /// The three corner positions of `f` in winding order.
    pub fn face_points(&self, f: FH) -> [glam::Vec3; 3] {
        self.face_vertices(f).map(|v| self.point(v))
    }

    pub fn fh_ccw_iter(&self, f: FH) -> impl Iterator<Item = HH> + use<'_> {
        iterator::fh_ccw_iter(self, f)
    }

    pub fn fv_ccw_iter(&self, f: FH) -> impl Iterator<Item = VH> + use<'_> {
        iterator::fv_ccw_iter(self, f)
    }

    pub fn ff_iter(&self, f: FH) -> impl Iterator<Item = FH> + use<'_> {
        iterator::ff_iter(self, f)
    }

    /// Register a vertex under `id`. Registering the same id again is a
    /// no-op that returns the existing handle, so importers can call this
    /// once per face corner without bookkeeping.
    pub fn add_vertex(&mut self, id: u32, point: glam::Vec3, color: glam::Vec3) -> VH {
        if let Some(v) = self.id_index.get(&id) {
            return *v;
        }
        let v: VH = (self.vertices.len() as u32).into();
        self.vertices.push(Vertex {
            id,
            point,
            color,
            normal: glam::Vec3::ZERO,
            num_faces: 0,
            halfedge: None,
        });
        self.id_index.insert(id, v);
        v
    }

    /// Add the triangle `v0 -> v1 -> v2` to the mesh.
    ///
    /// Three halfedges are created forming a closed next/prev cycle. For
    /// each of them the reversed directed edge is looked up, and when it
    /// exists the two are linked as mutual pairs. The face normal is the
    /// normalized cross product of the first two edge vectors, and gets
    /// folded into the corner vertices according to `policy`.
    ///
    /// A degenerate zero-area triangle is accepted; it gets a zero normal.
    /// Re-inserting a directed edge is resolved by the mesh's
    /// [`PairingPolicy`].
    pub fn add_face(
        &mut self,
        v0: VH,
        v1: VH,
        v2: VH,
        policy: NormalPolicy,
    ) -> Result<FH, Error> {
        let corners = [v0, v1, v2];
        if self.pairing == PairingPolicy::Reject {
            for (from, to) in (0..3).map(|i| (corners[i], corners[(i + 1) % 3])) {
                if self.edge_index.contains_key(&halfedge_key(from, to)) {
                    return Err(Error::NonManifoldEdge(from, to));
                }
            }
        }
        let normal = {
            let [p0, p1, p2] = corners.map(|v| self.point(v));
            (p1 - p0).cross(p2 - p0).normalize_or_zero()
        };
        let color = corners
            .iter()
            .fold(glam::Vec3::ZERO, |acc, v| acc + self.vertex(*v).color)
            / 3.0;
        let base = self.halfedges.len() as u32;
        let hs: [HH; 3] = [base.into(), (base + 1).into(), (base + 2).into()];
        let f: FH = (self.faces.len() as u32).into();
        self.faces.push(Face {
            halfedge: hs[0],
            normal,
            color,
        });
        for i in 0..3 {
            let (from, to) = (corners[i], corners[(i + 1) % 3]);
            let pair = self.find_halfedge(to, from);
            self.halfedges.push(Halfedge {
                vertex: from,
                next: hs[(i + 1) % 3],
                prev: hs[(i + 2) % 3],
                pair,
                face: f,
            });
            if let Some(p) = pair {
                self.halfedge_mut(p).pair = Some(hs[i]);
            }
            if let Some(old) = self.edge_index.insert(halfedge_key(from, to), hs[i]) {
                log::warn!(
                    "duplicate directed edge {} -> {} replaces {} in the lookup index",
                    from,
                    to,
                    old
                );
            }
            let vert = self.vertex_mut(from);
            if vert.halfedge.is_none() {
                vert.halfedge = Some(hs[i]);
            }
            match policy {
                NormalPolicy::Blend => {
                    let n = vert.num_faces as f32;
                    vert.normal = (vert.normal * n + normal) / (n + 1.0);
                    vert.num_faces += 1;
                }
                NormalPolicy::Deferred => {
                    vert.normal += normal;
                    vert.num_faces += 1;
                }
            }
        }
        Ok(f)
    }

    /// Average and normalize the vertex normals accumulated under
    /// [`NormalPolicy::Deferred`]. Vertices with no incident faces keep a
    /// zero normal. Harmless after [`NormalPolicy::Blend`].
    pub fn finalize_normals(&mut self) {
        for vert in &mut self.vertices {
            if vert.num_faces > 0 {
                vert.normal = (vert.normal / vert.num_faces as f32).normalize_or_zero();
            }
        }
    }

    /// Renumber all vertex ids densely starting at 0, in arena order.
    ///
    /// Imported ids can be sparse when a model file shares one vertex pool
    /// across several objects. GPU export needs dense ids, so this is
    /// called once after construction. Topology handles are untouched.
    pub fn align_vertex_ids(&mut self) {
        self.id_index.clear();
        for (i, vert) in self.vertices.iter_mut().enumerate() {
            vert.id = i as u32;
            self.id_index.insert(vert.id, (i as u32).into());
        }
    }
}
