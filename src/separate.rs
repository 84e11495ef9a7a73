use crate::{
    bounds::Sphere,
    element::FH,
    error::Error,
    mesh::MeshModel,
    meshlet::Meshlet,
};
use std::collections::BTreeSet;

/// Which bounding volume the greedy growth tries to keep small.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Criterion {
    /// Penalize the volume and the extent spread of the cluster's box.
    MinimizeAabb,
    /// Penalize the squared radius needed to cover a candidate from the
    /// current sphere center.
    MinimizeSphere,
}

impl Criterion {
    /// Short label used to key cache files.
    pub fn tag(&self) -> &'static str {
        match self {
            Criterion::MinimizeAabb => "aabb",
            Criterion::MinimizeSphere => "sphere",
        }
    }
}

/// Growth cost of admitting one more triangle into the cluster being grown.
/// One implementation per [`Criterion`]; the strategy is picked once per
/// separation call and carries the evolving volume itself.
trait GrowthCost {
    fn cost(&self, tri: &[glam::Vec3; 3]) -> f32;

    fn grow(&mut self, tri: &[glam::Vec3; 3]);
}

struct AabbGrowth {
    min: glam::Vec3,
    max: glam::Vec3,
}

impl AabbGrowth {
    fn seed(tri: &[glam::Vec3; 3]) -> Self {
        AabbGrowth {
            min: tri[0].min(tri[1]).min(tri[2]),
            max: tri[0].max(tri[1]).max(tri[2]),
        }
    }

    /// Volume plus the variance of the three extents. The variance term
    /// steers the growth away from long thin boxes that a pure volume
    /// penalty tolerates.
    fn loss(min: glam::Vec3, max: glam::Vec3) -> f32 {
        let extents = max - min;
        let volume = extents.x * extents.y * extents.z;
        let mean = (extents.x + extents.y + extents.z) / 3.0;
        let variance = ((extents.x - mean).powi(2)
            + (extents.y - mean).powi(2)
            + (extents.z - mean).powi(2))
            / 3.0;
        volume + variance
    }
}

impl GrowthCost for AabbGrowth {
    fn cost(&self, tri: &[glam::Vec3; 3]) -> f32 {
        let min = self.min.min(tri[0]).min(tri[1]).min(tri[2]);
        let max = self.max.max(tri[0]).max(tri[1]).max(tri[2]);
        Self::loss(min, max)
    }

    fn grow(&mut self, tri: &[glam::Vec3; 3]) {
        self.min = self.min.min(tri[0]).min(tri[1]).min(tri[2]);
        self.max = self.max.max(tri[0]).max(tri[1]).max(tri[2]);
    }
}

struct SphereGrowth {
    sphere: Sphere,
}

impl SphereGrowth {
    fn seed(tri: &[glam::Vec3; 3]) -> Result<Self, Error> {
        Ok(SphereGrowth {
            sphere: Sphere::ritter(tri)?,
        })
    }
}

impl GrowthCost for SphereGrowth {
    fn cost(&self, tri: &[glam::Vec3; 3]) -> f32 {
        // Squared radius required to cover the triangle from the current
        // center. Monotonic in the eventual growth.
        tri.iter()
            .map(|p| p.distance_squared(self.sphere.center))
            .fold(f32::MIN, f32::max)
    }

    fn grow(&mut self, tri: &[glam::Vec3; 3]) {
        for p in tri {
            crate::bounds::extend_sphere_to_point(&mut self.sphere, *p);
        }
    }
}

fn seed_growth(criterion: Criterion, tri: &[glam::Vec3; 3]) -> Result<Box<dyn GrowthCost>, Error> {
    Ok(match criterion {
        Criterion::MinimizeAabb => Box::new(AabbGrowth::seed(tri)),
        Criterion::MinimizeSphere => Box::new(SphereGrowth::seed(tri)?),
    })
}

/**
 * Book keeping for one separation run over one mesh.
 *
 * Owns the shrinking set of faces that have not been clustered yet. Ordered
 * sets make every "pick any face" step deterministic: the lowest face id
 * wins, where the reference implementation let hash iteration order decide.
 */
struct Session<'a> {
    mesh: &'a MeshModel,
    remaining: BTreeSet<FH>,
}

impl<'a> Session<'a> {
    fn new(mesh: &'a MeshModel) -> Self {
        Session {
            mesh,
            remaining: mesh.faces().collect(),
        }
    }

    /// The lowest-id face not clustered yet, or `None` once the run is
    /// done.
    fn first_remaining(&self) -> Option<FH> {
        self.remaining.iter().next().copied()
    }

    fn remove_face(&mut self, f: FH) {
        self.remaining.remove(&f);
    }

    /// Fold the neighbors of a freshly consumed `face` into `frontier`.
    ///
    /// Every face across a paired halfedge that is still unclustered
    /// becomes a candidate. The consumed face itself is dropped from the
    /// frontier; a face is never its own neighbor.
    fn update_frontier(&self, frontier: &mut BTreeSet<FH>, face: FH) {
        for neighbor in self.mesh.ff_iter(face) {
            if self.remaining.contains(&neighbor) {
                frontier.insert(neighbor);
            }
        }
        frontier.remove(&face);
    }
}

/**
 * Partition `mesh` into capacity bounded meshlets by greedy growth.
 *
 * One meshlet at a time is grown face by face. Each step scores every
 * frontier face with the criterion's growth cost and consumes the cheapest
 * one; ties go to the lowest face id. When a pick no longer fits the vertex
 * or index capacity the meshlet is closed, a Ritter sphere over its
 * vertices is attached, and the next meshlet is seeded from the frontier to
 * stay local (falling back to the lowest remaining face).
 *
 * Every face ends up in exactly one meshlet. Each face is consumed once and
 * each growth step is linear in the frontier size.
 */
pub fn separate(mesh: &MeshModel, criterion: Criterion) -> Result<Vec<Meshlet>, Error> {
    let mut session = Session::new(mesh);
    let mut meshlets = Vec::new();
    let mut frontier: BTreeSet<FH> = BTreeSet::new();
    let mut current = session.first_remaining();
    while let Some(seed) = current {
        let mut meshlet = Meshlet::new();
        let mut growth = seed_growth(criterion, &mesh.face_points(seed))?;
        frontier.clear();
        frontier.insert(seed);
        loop {
            let mut best: Option<(FH, f32)> = None;
            for f in &frontier {
                let loss = growth.cost(&mesh.face_points(*f));
                // Strict comparison keeps the lowest face id on ties.
                if best.is_none_or(|(_, bestloss)| loss < bestloss) {
                    best = Some((*f, loss));
                }
            }
            let Some((pick, _)) = best else {
                break;
            };
            let ids = mesh.face_vertices(pick).map(|v| mesh.vertex_id(v));
            if !meshlet.fits(&ids) {
                // The pick stays unclustered and seeds a later meshlet.
                break;
            }
            meshlet.push_triangle(ids);
            growth.grow(&mesh.face_points(pick));
            session.update_frontier(&mut frontier, pick);
            session.remove_face(pick);
        }
        let points: Vec<glam::Vec3> = meshlet
            .vertex_indices
            .iter()
            .filter_map(|id| mesh.find_vertex(*id))
            .map(|v| mesh.point(v))
            .collect();
        meshlet.sphere = Sphere::ritter(&points)?;
        meshlets.push(meshlet);
        current = frontier
            .iter()
            .next()
            .copied()
            .or_else(|| session.first_remaining());
    }
    log::debug!(
        "separated {} faces into {} meshlets ({:?})",
        mesh.num_faces(),
        meshlets.len(),
        criterion
    );
    Ok(meshlets)
}

#[cfg(test)]
mod test {
    use super::{Criterion, Session, separate};
    use crate::{
        element::FH,
        mesh::MeshModel,
        meshlet::{MAX_MESHLET_INDICES, MAX_MESHLET_VERTICES},
        primitive,
    };
    use std::collections::BTreeSet;

    fn check_partition(mesh: &MeshModel, criterion: Criterion) {
        let meshlets = separate(mesh, criterion).expect("Separation failed");
        let mut seen = BTreeSet::new();
        for meshlet in &meshlets {
            assert!(meshlet.vertex_count() <= MAX_MESHLET_VERTICES);
            assert!(meshlet.index_count() <= MAX_MESHLET_INDICES);
            assert_eq!(meshlet.index_count() % 3, 0);
            for mut tri in meshlet.triangles() {
                tri.sort_unstable();
                assert!(seen.insert(tri), "Triangle clustered twice: {:?}", tri);
            }
            // The attached sphere covers every vertex of the cluster.
            let limit = meshlet.sphere.radius * (1.0 + 1e-5);
            for id in &meshlet.vertex_indices {
                let v = mesh.find_vertex(*id).expect("Unknown vertex id");
                assert!(mesh.point(v).distance(meshlet.sphere.center) <= limit);
            }
        }
        let expected: BTreeSet<_> = mesh
            .faces()
            .map(|f| {
                let mut tri = mesh.face_vertices(f).map(|v| mesh.vertex_id(v));
                tri.sort_unstable();
                tri
            })
            .collect();
        assert_eq!(seen, expected, "Partition must reproduce the face set");
    }

    #[test]
    fn t_box_single_meshlet() {
        let mesh = primitive::triangle_box(glam::Vec3::ZERO, glam::Vec3::ONE)
            .expect("Cannot create a box primitive");
        assert_eq!(mesh.num_faces(), 12);
        for criterion in [Criterion::MinimizeAabb, Criterion::MinimizeSphere] {
            let meshlets = separate(&mesh, criterion).expect("Separation failed");
            assert_eq!(meshlets.len(), 1);
            assert_eq!(meshlets[0].vertex_count(), 8);
            assert_eq!(meshlets[0].index_count(), 36);
        }
    }

    #[test]
    fn t_grid_partition_aabb() {
        let mesh = primitive::triangle_grid(16, 16).expect("Cannot create a grid primitive");
        assert_eq!(mesh.num_faces(), 512);
        check_partition(&mesh, Criterion::MinimizeAabb);
    }

    #[test]
    fn t_grid_partition_sphere() {
        let mesh = primitive::triangle_grid(16, 16).expect("Cannot create a grid primitive");
        check_partition(&mesh, Criterion::MinimizeSphere);
    }

    #[test]
    fn t_grid_needs_multiple_meshlets() {
        // 512 triangles cannot fit the 42 triangle budget of one cluster.
        let mesh = primitive::triangle_grid(16, 16).expect("Cannot create a grid primitive");
        let meshlets = separate(&mesh, Criterion::MinimizeAabb).expect("Separation failed");
        assert!(meshlets.len() >= 13);
        let total: usize = meshlets.iter().map(|m| m.num_triangles()).sum();
        assert_eq!(total, 512);
    }

    #[test]
    fn t_separate_empty_mesh() {
        let mesh = MeshModel::new();
        let meshlets = separate(&mesh, Criterion::MinimizeAabb).expect("Separation failed");
        assert!(meshlets.is_empty());
    }

    #[test]
    fn t_separate_deterministic() {
        let mesh = primitive::triangle_grid(8, 8).expect("Cannot create a grid primitive");
        let a = separate(&mesh, Criterion::MinimizeSphere).expect("Separation failed");
        let b = separate(&mesh, Criterion::MinimizeSphere).expect("Separation failed");
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.vertex_indices, y.vertex_indices);
            assert_eq!(x.primitive_indices, y.primitive_indices);
        }
    }

    #[test]
    fn t_session_frontier_excludes_self() {
        let mesh = primitive::triangle_grid(2, 2).expect("Cannot create a grid primitive");
        let session = Session::new(&mesh);
        let f: FH = 0u32.into();
        let mut frontier = BTreeSet::new();
        frontier.insert(f);
        session.update_frontier(&mut frontier, f);
        assert!(!frontier.contains(&f));
        assert!(!frontier.is_empty());
        for neighbor in &frontier {
            assert!(mesh.ff_iter(f).any(|g| g == *neighbor));
        }
    }

    #[test]
    fn t_session_shrinks_to_done() {
        let mesh = primitive::triangle_grid(2, 2).expect("Cannot create a grid primitive");
        let mut session = Session::new(&mesh);
        let mut consumed = 0;
        while let Some(f) = session.first_remaining() {
            session.remove_face(f);
            consumed += 1;
        }
        assert_eq!(consumed, mesh.num_faces());
        assert!(session.first_remaining().is_none());
    }
}
