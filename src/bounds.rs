use crate::error::Error;

/**
 * Axis aligned bounding box stored as a center and per-axis half extents.
 */
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub center: glam::Vec3,
    pub half_extents: glam::Vec3,
}

impl Aabb {
    /// The box spanning the per-axis min/max of `points`. The raw point set
    /// is used as is, no hull reduction happens first.
    pub fn from_points(points: &[glam::Vec3]) -> Result<Self, Error> {
        let (min, max) = min_max(points)?;
        Ok(Aabb {
            center: (min + max) * 0.5,
            half_extents: (max - min) * 0.5,
        })
    }

    pub fn min(&self) -> glam::Vec3 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> glam::Vec3 {
        self.center + self.half_extents
    }

    pub fn contains_point(&self, p: glam::Vec3) -> bool {
        let d = (p - self.center).abs();
        d.x <= self.half_extents.x && d.y <= self.half_extents.y && d.z <= self.half_extents.z
    }

    /// Separating interval test. The boxes overlap iff their center
    /// distance stays within the summed half extents on every axis.
    pub fn intersects(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        let e = self.half_extents + other.half_extents;
        d.x <= e.x && d.y <= e.y && d.z <= e.z
    }

    /// Closest point test: clamp the sphere center to the box and compare
    /// the remaining distance against the radius.
    pub fn intersects_sphere(&self, sphere: &Sphere) -> bool {
        let closest = sphere.center.clamp(self.min(), self.max());
        closest.distance_squared(sphere.center) <= sphere.radius * sphere.radius
    }
}

/**
 * Bounding sphere as a center and radius.
 */
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sphere {
    pub center: glam::Vec3,
    pub radius: f32,
}

impl Sphere {
    /// Enclosing sphere of `points` via Ritter's O(n) heuristic: seed a
    /// sphere on the most separated axis-extreme pair, then grow it
    /// minimally over every point left outside. The result is a valid
    /// enclosure but not necessarily the minimum one.
    pub fn ritter(points: &[glam::Vec3]) -> Result<Self, Error> {
        let mut sphere = sphere_from_distant_points(points)?;
        for p in points {
            extend_sphere_to_point(&mut sphere, *p);
        }
        Ok(sphere)
    }

    pub fn contains_point(&self, p: glam::Vec3) -> bool {
        p.distance_squared(self.center) <= self.radius * self.radius
    }

    pub fn intersects(&self, other: &Sphere) -> bool {
        let r = self.radius + other.radius;
        self.center.distance_squared(other.center) <= r * r
    }
}

/**
 * Either kind of bounding volume, for consumers that register mixed volumes
 * and test them pairwise.
 */
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum BoundingVolume {
    Aabb(Aabb),
    Sphere(Sphere),
}

impl BoundingVolume {
    pub fn intersects(&self, other: &BoundingVolume) -> bool {
        match (self, other) {
            (BoundingVolume::Aabb(a), BoundingVolume::Aabb(b)) => a.intersects(b),
            (BoundingVolume::Aabb(a), BoundingVolume::Sphere(s)) => a.intersects_sphere(s),
            (BoundingVolume::Sphere(s), BoundingVolume::Aabb(a)) => a.intersects_sphere(s),
            (BoundingVolume::Sphere(a), BoundingVolume::Sphere(b)) => a.intersects(b),
        }
    }
}

fn min_max(points: &[glam::Vec3]) -> Result<(glam::Vec3, glam::Vec3), Error> {
    let (first, rest) = points.split_first().ok_or(Error::EmptyPointSet)?;
    Ok(rest
        .iter()
        .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p))))
}

/// Indices of the axis-extreme pair of `points` with the largest squared
/// distance. Per axis the min and max point are found, and the best of the
/// three candidate pairs wins.
pub fn most_separated_points_on_aabb(points: &[glam::Vec3]) -> Result<(usize, usize), Error> {
    if points.is_empty() {
        return Err(Error::EmptyPointSet);
    }
    let (mut minidx, mut maxidx) = ([0usize; 3], [0usize; 3]);
    for (i, p) in points.iter().enumerate() {
        for axis in 0..3 {
            if p[axis] < points[minidx[axis]][axis] {
                minidx[axis] = i;
            }
            if p[axis] > points[maxidx[axis]][axis] {
                maxidx[axis] = i;
            }
        }
    }
    let (pair, _) = (0..3).fold(((minidx[0], maxidx[0]), f32::MIN), |(best, bestd), axis| {
        let d = points[maxidx[axis]].distance_squared(points[minidx[axis]]);
        if d > bestd {
            ((minidx[axis], maxidx[axis]), d)
        } else {
            (best, bestd)
        }
    });
    Ok(pair)
}

/// Seed sphere for Ritter's algorithm: centered at the midpoint of the most
/// separated axis-extreme pair, with radius half their distance.
pub fn sphere_from_distant_points(points: &[glam::Vec3]) -> Result<Sphere, Error> {
    let (i, j) = most_separated_points_on_aabb(points)?;
    let center = (points[i] + points[j]) * 0.5;
    Ok(Sphere {
        center,
        radius: points[j].distance(center),
    })
}

/// Grow `sphere` minimally so it covers `point`. A point already inside
/// leaves the sphere untouched.
pub fn extend_sphere_to_point(sphere: &mut Sphere, point: glam::Vec3) {
    let d2 = point.distance_squared(sphere.center);
    if d2 > sphere.radius * sphere.radius {
        let d = d2.sqrt();
        let radius = (sphere.radius + d) * 0.5;
        sphere.center += (point - sphere.center) * ((radius - sphere.radius) / d);
        sphere.radius = radius;
    }
}

#[cfg(test)]
mod test {
    use super::{
        Aabb, BoundingVolume, Sphere, extend_sphere_to_point, most_separated_points_on_aabb,
        sphere_from_distant_points,
    };
    use crate::error::Error;

    fn scatter() -> Vec<glam::Vec3> {
        // Low discrepancy-ish scatter, deterministic on purpose.
        (0..64)
            .map(|i| {
                let t = i as f32;
                glam::vec3(
                    (t * 0.754).sin() * 3.0,
                    (t * 1.213).cos() * 2.0 + 0.5,
                    (t * 0.377).sin() * (t * 0.11).cos() * 4.0,
                )
            })
            .collect()
    }

    #[test]
    fn t_aabb_contains_all_points() {
        let points = scatter();
        let aabb = Aabb::from_points(&points).expect("Cannot build a box");
        for p in &points {
            assert!(aabb.contains_point(*p));
        }
    }

    #[test]
    fn t_aabb_empty_points() {
        assert!(matches!(Aabb::from_points(&[]), Err(Error::EmptyPointSet)));
        assert!(matches!(Sphere::ritter(&[]), Err(Error::EmptyPointSet)));
    }

    #[test]
    fn t_aabb_single_point() {
        let p = glam::vec3(2.0, -3.0, 0.5);
        let aabb = Aabb::from_points(&[p]).expect("Cannot build a box");
        assert_eq!(aabb.center, p);
        assert_eq!(aabb.half_extents, glam::Vec3::ZERO);
    }

    #[test]
    fn t_most_separated_points() {
        let points = [
            glam::vec3(1.0, 1.0, 0.0),
            glam::vec3(-1.0, 1.0, 0.0),
            glam::vec3(0.0, 1.5, 0.0),
            glam::vec3(0.0, 0.5, 0.0),
            glam::vec3(0.0, 1.0, 0.5),
            glam::vec3(0.0, 1.0, -0.5),
        ];
        let (i, j) = most_separated_points_on_aabb(&points).expect("Cannot find extremes");
        assert_eq!((i, j), (1, 0));
    }

    #[test]
    fn t_sphere_from_distant_points() {
        let points = [
            glam::vec3(1.0, 1.0, 0.0),
            glam::vec3(-1.0, 1.0, 0.0),
            glam::vec3(0.0, 1.5, 0.0),
            glam::vec3(0.0, 0.5, 0.0),
            glam::vec3(0.0, 1.0, 0.5),
            glam::vec3(0.0, 1.0, -0.5),
        ];
        let sphere = sphere_from_distant_points(&points).expect("Cannot seed a sphere");
        assert_eq!(sphere.radius, 1.0);
        assert_eq!(sphere.center, glam::vec3(0.0, 1.0, 0.0));
    }

    #[test]
    fn t_ritter_contains_all_points() {
        let points = scatter();
        let sphere = Sphere::ritter(&points).expect("Cannot build a sphere");
        let limit = sphere.radius * (1.0 + 1e-5);
        for p in &points {
            assert!(p.distance(sphere.center) <= limit);
        }
    }

    #[test]
    fn t_extend_sphere_noop_inside() {
        let mut sphere = Sphere {
            center: glam::Vec3::ZERO,
            radius: 2.0,
        };
        extend_sphere_to_point(&mut sphere, glam::vec3(1.0, 0.0, 0.0));
        assert_eq!(sphere.radius, 2.0);
        assert_eq!(sphere.center, glam::Vec3::ZERO);
    }

    #[test]
    fn t_extend_sphere_outside() {
        let mut sphere = Sphere {
            center: glam::Vec3::ZERO,
            radius: 1.0,
        };
        extend_sphere_to_point(&mut sphere, glam::vec3(3.0, 0.0, 0.0));
        assert_eq!(sphere.radius, 2.0);
        assert_eq!(sphere.center, glam::vec3(1.0, 0.0, 0.0));
        assert!(sphere.contains_point(glam::vec3(3.0, 0.0, 0.0)));
        assert!(sphere.contains_point(glam::vec3(-1.0, 0.0, 0.0)));
    }

    #[test]
    fn t_aabb_aabb_intersection() {
        let a = Aabb {
            center: glam::Vec3::ZERO,
            half_extents: glam::Vec3::ONE,
        };
        let b = Aabb {
            center: glam::vec3(1.5, 0.0, 0.0),
            half_extents: glam::Vec3::ONE,
        };
        let c = Aabb {
            center: glam::vec3(0.0, 3.0, 0.0),
            half_extents: glam::Vec3::ONE,
        };
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn t_sphere_sphere_intersection() {
        let a = Sphere {
            center: glam::Vec3::ZERO,
            radius: 1.0,
        };
        let b = Sphere {
            center: glam::vec3(1.5, 0.0, 0.0),
            radius: 1.0,
        };
        let c = Sphere {
            center: glam::vec3(0.0, 2.5, 0.0),
            radius: 1.0,
        };
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn t_aabb_sphere_intersection() {
        let aabb = Aabb {
            center: glam::Vec3::ZERO,
            half_extents: glam::Vec3::ONE,
        };
        // Straddling a face.
        assert!(aabb.intersects_sphere(&Sphere {
            center: glam::vec3(1.5, 0.0, 0.0),
            radius: 1.0,
        }));
        // Near a corner but outside the diagonal reach.
        assert!(!aabb.intersects_sphere(&Sphere {
            center: glam::vec3(2.0, 2.0, 2.0),
            radius: 1.0,
        }));
        // Fully inside.
        assert!(aabb.intersects_sphere(&Sphere {
            center: glam::Vec3::ZERO,
            radius: 0.1,
        }));
    }

    #[test]
    fn t_bounding_volume_mixed() {
        let a = BoundingVolume::Aabb(Aabb {
            center: glam::Vec3::ZERO,
            half_extents: glam::Vec3::ONE,
        });
        let s = BoundingVolume::Sphere(Sphere {
            center: glam::vec3(1.5, 0.0, 0.0),
            radius: 1.0,
        });
        assert!(a.intersects(&s));
        assert!(s.intersects(&a));
    }
}
