use crate::element::VH;

#[derive(Debug)]
pub enum Error {
    // Topology.
    /// A directed edge was inserted twice. Only reported when the mesh is
    /// configured to reject non-manifold input.
    NonManifoldEdge(VH, VH),
    // Bounds.
    /// Bounding volumes cannot be constructed from zero points.
    EmptyPointSet,
    // Cache.
    CacheIoFailed(String),
    /// The cache file could not be parsed. The payload is the 1-based line
    /// number of the offending record.
    MalformedCacheRecord(usize),
}
