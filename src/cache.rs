use crate::{
    bounds::Sphere,
    error::Error,
    meshlet::{MAX_MESHLET_INDICES, MAX_MESHLET_VERTICES, Meshlet},
    separate::Criterion,
};
use arrayvec::ArrayVec;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/*
 * Separation output is cached as newline delimited text, six lines per
 * meshlet:
 *
 *   vertex count
 *   comma joined vertex ids
 *   primitive index count
 *   comma joined primitive indices
 *   sphere center as x,y,z
 *   sphere radius
 *
 * The file carries no version tag or checksum. A schema change makes old
 * files parse as malformed records at best, so stale caches have to be
 * deleted by hand.
 */

/// Where the meshlets of `model_name` separated under `criterion` live
/// below `dir`.
pub fn cache_path(dir: &Path, model_name: &str, criterion: Criterion) -> PathBuf {
    dir.join(format!("{}.{}.meshlets", model_name, criterion.tag()))
}

/// Serialize `meshlets` to the per-model cache file, creating `dir` if
/// needed. An existing file for the same model and criterion is replaced.
pub fn write_meshlet_cache(
    dir: &Path,
    model_name: &str,
    criterion: Criterion,
    meshlets: &[Meshlet],
) -> Result<(), Error> {
    let path = cache_path(dir, model_name, criterion);
    std::fs::create_dir_all(dir).map_err(|e| Error::CacheIoFailed(format!("{}", e)))?;
    let file = File::create(&path).map_err(|e| Error::CacheIoFailed(format!("{}", e)))?;
    let mut out = BufWriter::new(file);
    for meshlet in meshlets {
        write_record(&mut out, meshlet).map_err(|e| Error::CacheIoFailed(format!("{}", e)))?;
    }
    out.flush().map_err(|e| Error::CacheIoFailed(format!("{}", e)))?;
    log::debug!("wrote {} meshlets to {}", meshlets.len(), path.display());
    Ok(())
}

fn write_record(out: &mut impl Write, meshlet: &Meshlet) -> std::io::Result<()> {
    writeln!(out, "{}", meshlet.vertex_count())?;
    writeln!(out, "{}", join(meshlet.vertex_indices.iter()))?;
    writeln!(out, "{}", meshlet.index_count())?;
    writeln!(out, "{}", join(meshlet.primitive_indices.iter()))?;
    let c = meshlet.sphere.center;
    writeln!(out, "{},{},{}", c.x, c.y, c.z)?;
    writeln!(out, "{}", meshlet.sphere.radius)
}

fn join<'a>(values: impl Iterator<Item = &'a u32>) -> String {
    values
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Load the cached meshlets of `model_name` under `criterion`.
///
/// A missing file is a cache miss signaled by `Ok(None)`; the caller is
/// expected to separate the mesh and write the result back. An existing
/// file that fails to parse is an error, not a miss.
pub fn load_meshlet_cache(
    dir: &Path,
    model_name: &str,
    criterion: Criterion,
) -> Result<Option<Vec<Meshlet>>, Error> {
    let path = cache_path(dir, model_name, criterion);
    if !path.exists() {
        log::debug!("meshlet cache miss for {}", path.display());
        return Ok(None);
    }
    let contents =
        std::fs::read_to_string(&path).map_err(|e| Error::CacheIoFailed(format!("{}", e)))?;
    let mut meshlets = Vec::new();
    let mut lines = contents.lines().enumerate();
    while let Some((lineno, line)) = lines.next() {
        let vertex_count = parse_count(line, lineno)?;
        let vertex_indices =
            parse_indices::<MAX_MESHLET_VERTICES>(next_line(&mut lines)?, vertex_count)?;
        let (lineno, line) = next_line(&mut lines)?;
        let index_count = parse_count(line, lineno)?;
        let primitive_indices =
            parse_indices::<MAX_MESHLET_INDICES>(next_line(&mut lines)?, index_count)?;
        let center = parse_center(next_line(&mut lines)?)?;
        let radius = parse_radius(next_line(&mut lines)?)?;
        meshlets.push(Meshlet {
            vertex_indices,
            primitive_indices,
            sphere: Sphere { center, radius },
        });
    }
    log::debug!(
        "loaded {} meshlets from {}",
        meshlets.len(),
        path.display()
    );
    Ok(Some(meshlets))
}

fn next_line<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
) -> Result<(usize, &'a str), Error> {
    // A record truncated by EOF is blamed on the line past the end.
    lines.next().ok_or(Error::MalformedCacheRecord(usize::MAX))
}

fn parse_count(line: &str, lineno: usize) -> Result<usize, Error> {
    line.trim()
        .parse::<usize>()
        .map_err(|_| Error::MalformedCacheRecord(lineno + 1))
}

fn parse_indices<const CAP: usize>(
    numbered: (usize, &str),
    count: usize,
) -> Result<ArrayVec<u32, CAP>, Error> {
    let (lineno, line) = numbered;
    let malformed = || Error::MalformedCacheRecord(lineno + 1);
    if count > CAP {
        return Err(malformed());
    }
    let mut values = ArrayVec::new();
    if count == 0 {
        return Ok(values);
    }
    for field in line.split(',') {
        if values.is_full() {
            return Err(malformed());
        }
        values.push(field.trim().parse::<u32>().map_err(|_| malformed())?);
    }
    if values.len() != count {
        return Err(malformed());
    }
    Ok(values)
}

fn parse_center(numbered: (usize, &str)) -> Result<glam::Vec3, Error> {
    let (lineno, line) = numbered;
    let malformed = || Error::MalformedCacheRecord(lineno + 1);
    let mut fields = line.split(',');
    let mut coord = || -> Result<f32, Error> {
        fields
            .next()
            .ok_or_else(malformed)?
            .trim()
            .parse::<f32>()
            .map_err(|_| malformed())
    };
    let center = glam::vec3(coord()?, coord()?, coord()?);
    if fields.next().is_some() {
        return Err(malformed());
    }
    Ok(center)
}

fn parse_radius(numbered: (usize, &str)) -> Result<f32, Error> {
    let (lineno, line) = numbered;
    line.trim()
        .parse::<f32>()
        .map_err(|_| Error::MalformedCacheRecord(lineno + 1))
}
