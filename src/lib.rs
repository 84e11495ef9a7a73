/*!
This is a halfedge based mesh clustering library. It partitions a triangle
mesh into small capacity bounded clusters ("meshlets") that mesh shading
pipelines can consume directly.

# Overview

+ A halfedge datastructure represents the topology of the mesh, i.e. the
  connectivity of vertices, halfedges and faces. Elements live in dense
  arenas and reference each other through index handles ([`VH`], [`HH`],
  [`FH`]); directed edges are hash indexed so that twin lookup and
  [`MeshModel::find_halfedge`] are O(1).

+ Bounding volumes ([`Aabb`], [`Sphere`] built with Ritter's linear time
  heuristic, and the [`BoundingVolume`] union of the two) score cluster
  quality during growth and survive as the sphere attached to each finished
  [`Meshlet`]. The same construction and intersection contracts serve broad
  phase collision consumers.

+ [`separate()`] greedily grows one meshlet at a time, face by face, under a
  growth cost [`Criterion`] that keeps either the cluster's box or its
  sphere small. Every face lands in exactly one meshlet and each meshlet
  stays within 64 vertices and 126 primitive indices.

+ Separation runs offline at asset build time, so the results can be cached
  to a flat file with [`write_meshlet_cache`] and reloaded with
  [`load_meshlet_cache`].

The geometry types come from the [`glam`](https://crates.io/crates/glam)
crate; the mesh is concrete `f32`/[`glam::Vec3`] throughout.
*/

mod bounds;
mod cache;
mod element;
mod error;
mod iterator;
mod mesh;
mod meshlet;
pub mod primitive;
mod separate;

pub use bounds::{
    Aabb, BoundingVolume, Sphere, extend_sphere_to_point, most_separated_points_on_aabb,
    sphere_from_distant_points,
};
pub use cache::{cache_path, load_meshlet_cache, write_meshlet_cache};
pub use element::{FH, HH, Handle, VH};
pub use error::Error;
pub use mesh::{MeshModel, NormalPolicy, PairingPolicy};
pub use meshlet::{MAX_MESHLET_INDICES, MAX_MESHLET_VERTICES, Meshlet};
pub use separate::{Criterion, separate};
