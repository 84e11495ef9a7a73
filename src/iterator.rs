use crate::{
    element::{FH, HH, VH},
    mesh::MeshModel,
};

struct FaceHalfedgeIter<'a> {
    mesh: &'a MeshModel,
    hstart: HH,
    hcurrent: Option<HH>,
}

impl<'a> Iterator for FaceHalfedgeIter<'a> {
    type Item = HH;

    fn next(&mut self) -> Option<Self::Item> {
        match self.hcurrent {
            Some(current) => {
                let next = self.mesh.next_halfedge(current);
                self.hcurrent = if next == self.hstart {
                    None
                } else {
                    Some(next)
                };
                Some(current)
            }
            None => None,
        }
    }
}

pub(crate) fn fh_ccw_iter(mesh: &MeshModel, f: FH) -> impl Iterator<Item = HH> + use<'_> {
    let h = mesh.face_halfedge(f);
    FaceHalfedgeIter {
        mesh,
        hstart: h,
        hcurrent: Some(h),
    }
}

pub(crate) fn fv_ccw_iter(mesh: &MeshModel, f: FH) -> impl Iterator<Item = VH> + use<'_> {
    fh_ccw_iter(mesh, f).map(|h| mesh.tail_vertex(h))
}

/// Faces sharing an edge with `f`. Boundary halfedges contribute nothing
/// because they have no twin.
pub(crate) fn ff_iter(mesh: &MeshModel, f: FH) -> impl Iterator<Item = FH> + use<'_> {
    fh_ccw_iter(mesh, f).filter_map(|h| mesh.pair_halfedge(h).map(|p| mesh.halfedge_face(p)))
}
