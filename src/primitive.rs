use crate::{
    error::Error,
    mesh::{MeshModel, NormalPolicy},
};

/// Makes a triangulated box with the following topology, spanning from the
/// min point to the max point. Each quad is split along its first diagonal,
/// giving 8 vertices and 12 triangles.
///
///  ```text
///       7-----------6
///      /|          /|
///     / |         / |
///    4-----------5  |
///    |  |        |  |
///    |  3--------|--2
///    | /         | /
///    |/          |/
///    0-----------1
///  ```
pub fn triangle_box(min: glam::Vec3, max: glam::Vec3) -> Result<MeshModel, Error> {
    const BOX_POS: [(bool, bool, bool); 8] = [
        (false, false, false),
        (true, false, false),
        (true, true, false),
        (false, true, false),
        (false, false, true),
        (true, false, true),
        (true, true, true),
        (false, true, true),
    ];
    const BOX_IDX: [(u32, u32, u32, u32); 6] = [
        (0, 3, 2, 1),
        (0, 1, 5, 4),
        (1, 2, 6, 5),
        (2, 3, 7, 6),
        (3, 0, 4, 7),
        (4, 5, 6, 7),
    ];
    let mut mesh = MeshModel::with_capacity(8, 12);
    let verts: Vec<_> = BOX_POS
        .iter()
        .enumerate()
        .map(|(i, &(xf, yf, zf))| {
            let p = glam::vec3(
                if xf { max.x } else { min.x },
                if yf { max.y } else { min.y },
                if zf { max.z } else { min.z },
            );
            mesh.add_vertex(i as u32, p, glam::Vec3::ONE)
        })
        .collect();
    for (a, b, c, d) in BOX_IDX {
        let (a, b, c, d) = (
            verts[a as usize],
            verts[b as usize],
            verts[c as usize],
            verts[d as usize],
        );
        mesh.add_face(a, b, c, NormalPolicy::Deferred)?;
        mesh.add_face(a, c, d, NormalPolicy::Deferred)?;
    }
    mesh.finalize_normals();
    Ok(mesh)
}

/// Makes a planar grid of `nx` by `ny` cells in the xy plane with unit
/// spacing, each cell split into two triangles. `(nx + 1) * (ny + 1)`
/// vertices, `2 * nx * ny` triangles.
pub fn triangle_grid(nx: u32, ny: u32) -> Result<MeshModel, Error> {
    let mut mesh = MeshModel::with_capacity(((nx + 1) * (ny + 1)) as usize, (2 * nx * ny) as usize);
    let index = |x: u32, y: u32| (y * (nx + 1) + x) as usize;
    let mut verts = Vec::with_capacity(((nx + 1) * (ny + 1)) as usize);
    for y in 0..=ny {
        for x in 0..=nx {
            verts.push(mesh.add_vertex(
                index(x, y) as u32,
                glam::vec3(x as f32, y as f32, 0.0),
                glam::Vec3::ONE,
            ));
        }
    }
    for y in 0..ny {
        for x in 0..nx {
            let (a, b, c, d) = (
                verts[index(x, y)],
                verts[index(x + 1, y)],
                verts[index(x + 1, y + 1)],
                verts[index(x, y + 1)],
            );
            mesh.add_face(a, b, c, NormalPolicy::Deferred)?;
            mesh.add_face(a, c, d, NormalPolicy::Deferred)?;
        }
    }
    mesh.finalize_normals();
    Ok(mesh)
}

#[cfg(test)]
mod test {
    use super::{triangle_box, triangle_grid};

    #[test]
    fn t_box_counts() {
        let mesh =
            triangle_box(glam::Vec3::ZERO, glam::Vec3::ONE).expect("Cannot create a box primitive");
        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.num_faces(), 12);
        assert_eq!(mesh.num_halfedges(), 36);
        // A closed box has every halfedge paired.
        assert!(mesh.halfedges().all(|h| mesh.pair_halfedge(h).is_some()));
    }

    #[test]
    fn t_grid_counts() {
        let mesh = triangle_grid(3, 2).expect("Cannot create a grid primitive");
        assert_eq!(mesh.num_vertices(), 12);
        assert_eq!(mesh.num_faces(), 12);
        // Boundary halfedges of an open grid stay unpaired.
        assert!(mesh.halfedges().any(|h| mesh.pair_halfedge(h).is_none()));
    }
}
