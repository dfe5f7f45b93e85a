//! Geodesic sphere meshes for ball rendering
//!
//! A base polyhedron inscribed in the unit sphere is refined by splitting each
//! triangular face into four and pushing the new edge midpoints back out onto
//! the sphere. Every ball of a given smoothness shares one `Arc<Mesh>`.

use std::collections::HashMap;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_SMOOTHNESS;
use crate::error::{PhysicsError, Result};

/// Golden ratio, used for the icosahedron's vertex coordinates
const PHI: f64 = 1.618_033_988_749_895;

const ICOSAHEDRON_VERTICES: [[f64; 3]; 12] = [
    [0.0, 1.0, PHI],
    [0.0, -1.0, PHI],
    [0.0, 1.0, -PHI],
    [0.0, -1.0, -PHI],
    [1.0, PHI, 0.0],
    [-1.0, PHI, 0.0],
    [1.0, -PHI, 0.0],
    [-1.0, -PHI, 0.0],
    [PHI, 0.0, 1.0],
    [-PHI, 0.0, 1.0],
    [PHI, 0.0, -1.0],
    [-PHI, 0.0, -1.0],
];

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 1, 8],
    [0, 9, 1],
    [0, 5, 9],
    [0, 4, 5],
    [0, 8, 4],
    [3, 6, 7],
    [3, 10, 6],
    [3, 2, 10],
    [3, 11, 2],
    [3, 7, 11],
    [1, 9, 7],
    [1, 7, 6],
    [1, 6, 8],
    [10, 8, 6],
    [10, 4, 8],
    [10, 2, 4],
    [5, 4, 2],
    [5, 2, 11],
    [5, 11, 9],
    [7, 9, 11],
];

const TETRAHEDRON_VERTICES: [[f64; 3]; 4] = [
    [1.0, 0.0, -std::f64::consts::FRAC_1_SQRT_2],
    [-1.0, 0.0, -std::f64::consts::FRAC_1_SQRT_2],
    [0.0, 1.0, std::f64::consts::FRAC_1_SQRT_2],
    [0.0, -1.0, std::f64::consts::FRAC_1_SQRT_2],
];

const TETRAHEDRON_FACES: [[usize; 3]; 4] = [[0, 1, 2], [1, 3, 2], [0, 2, 3], [0, 3, 1]];

/// Polyhedron the subdivision starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BaseShape {
    /// 12 vertices, 20 faces; near-uniform triangles
    #[default]
    Icosahedron,
    /// 4 vertices, 4 faces; coarse
    Tetrahedron,
}

impl BaseShape {
    pub fn face_count(&self) -> usize {
        match self {
            BaseShape::Icosahedron => ICOSAHEDRON_FACES.len(),
            BaseShape::Tetrahedron => TETRAHEDRON_FACES.len(),
        }
    }

    /// Base faces as triangles with unit-length vertices, in fixed order
    pub fn faces(&self) -> Vec<Triangle> {
        let (vertices, faces): (&[[f64; 3]], &[[usize; 3]]) = match self {
            BaseShape::Icosahedron => (&ICOSAHEDRON_VERTICES, &ICOSAHEDRON_FACES),
            BaseShape::Tetrahedron => (&TETRAHEDRON_VERTICES, &TETRAHEDRON_FACES),
        };

        // Base vertices are all far from the origin, so plain normalize is safe
        let unit: Vec<DVec3> = vertices
            .iter()
            .map(|&v| DVec3::from_array(v).normalize())
            .collect();

        faces
            .iter()
            .map(|&[a, b, c]| Triangle::new(unit[a], unit[b], unit[c]))
            .collect()
    }

    /// Triangle count after `depth` rounds of subdivision
    pub fn triangle_count(&self, depth: u32) -> usize {
        self.face_count() * 4usize.pow(depth)
    }
}

/// A triangle on the unit sphere
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub points: [DVec3; 3],
}

impl Triangle {
    pub const fn new(a: DVec3, b: DVec3, c: DVec3) -> Self {
        Self { points: [a, b, c] }
    }
}

/// Vertex layout handed to a renderer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Immutable triangle mesh approximating the unit sphere
#[derive(Debug, Default, PartialEq)]
pub struct Mesh {
    triangles: Vec<Triangle>,
}

impl Mesh {
    /// Subdivide every face of `base` `depth` times
    ///
    /// Output order is fixed: base faces in table order, and within a face the
    /// center sub-triangle before the three corners.
    pub fn generate(base: BaseShape, depth: u32) -> Result<Self> {
        if depth > MAX_SMOOTHNESS {
            return Err(PhysicsError::config(format!(
                "mesh depth {depth} exceeds maximum {MAX_SMOOTHNESS}"
            )));
        }

        let faces = base.faces();
        let per_face = 4usize.pow(depth);

        #[cfg(feature = "parallel")]
        let triangles = {
            use rayon::prelude::*;
            faces
                .par_iter()
                .map(|face| {
                    let mut out = Vec::with_capacity(per_face);
                    subdivide(*face, depth, &mut out);
                    out
                })
                .collect::<Vec<_>>()
                .concat()
        };

        #[cfg(not(feature = "parallel"))]
        let triangles = {
            let mut out = Vec::with_capacity(faces.len() * per_face);
            for face in &faces {
                subdivide(*face, depth, &mut out);
            }
            out
        };

        log::debug!("Generated {:?} mesh at depth {}: {} triangles", base, depth, triangles.len());

        Ok(Self { triangles })
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    /// Place the unit mesh at `center` with the given `radius`
    ///
    /// Three vertices per triangle, no index sharing. On a sphere the normal
    /// is the unit-mesh point itself.
    pub fn vertices(&self, center: DVec3, radius: f64) -> Vec<MeshVertex> {
        self.triangles
            .iter()
            .flat_map(|t| t.points)
            .map(|p| MeshVertex {
                position: (center + p * radius).as_vec3().to_array(),
                normal: p.as_vec3().to_array(),
            })
            .collect()
    }

    /// Raw bytes of [`Mesh::vertices`], ready for a vertex buffer upload
    pub fn vertex_bytes(&self, center: DVec3, radius: f64) -> Vec<u8> {
        let vertices = self.vertices(center, radius);
        bytemuck::cast_slice::<MeshVertex, u8>(&vertices).to_vec()
    }
}

impl<'a> IntoIterator for &'a Mesh {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}

/// Recursive geodesic split of one triangle into `4^depth` triangles
fn subdivide(tri: Triangle, depth: u32, out: &mut Vec<Triangle>) {
    if depth == 0 {
        out.push(tri);
        return;
    }

    let [p0, p1, p2] = tri.points;
    let m01 = midpoint_on_sphere(p0, p1);
    let m12 = midpoint_on_sphere(p1, p2);
    let m20 = midpoint_on_sphere(p2, p0);

    // Center first, then the corner at each original vertex
    subdivide(Triangle::new(m01, m12, m20), depth - 1, out);
    subdivide(Triangle::new(p0, m01, m20), depth - 1, out);
    subdivide(Triangle::new(p1, m12, m01), depth - 1, out);
    subdivide(Triangle::new(p2, m20, m12), depth - 1, out);
}

/// Midpoint of two unit vectors, projected back onto the sphere
///
/// Adjacent mesh vertices are never antipodal, so the sum never vanishes.
#[inline]
fn midpoint_on_sphere(a: DVec3, b: DVec3) -> DVec3 {
    ((a + b) * 0.5).normalize()
}

/// Memoized meshes, one per `(base, depth)`
#[derive(Debug, Default)]
pub struct MeshCache {
    meshes: HashMap<(BaseShape, u32), Arc<Mesh>>,
}

impl MeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared mesh for `(base, depth)`, generating it on first use
    pub fn get(&mut self, base: BaseShape, depth: u32) -> Result<Arc<Mesh>> {
        if let Some(mesh) = self.meshes.get(&(base, depth)) {
            return Ok(Arc::clone(mesh));
        }

        let mesh = Arc::new(Mesh::generate(base, depth)?);
        self.meshes.insert((base, depth), Arc::clone(&mesh));
        Ok(mesh)
    }

    /// Number of distinct meshes built so far
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::EPSILON;

    #[test]
    fn test_icosahedron_triangle_counts() {
        for depth in 0..=4 {
            let mesh = Mesh::generate(BaseShape::Icosahedron, depth).unwrap();
            assert_eq!(mesh.len(), 20 * 4usize.pow(depth), "depth {depth}");
        }
    }

    #[test]
    fn test_tetrahedron_triangle_counts() {
        for depth in 0..=4 {
            let mesh = Mesh::generate(BaseShape::Tetrahedron, depth).unwrap();
            assert_eq!(mesh.len(), BaseShape::Tetrahedron.triangle_count(depth));
        }
    }

    #[test]
    fn test_all_vertices_on_unit_sphere() {
        for base in [BaseShape::Icosahedron, BaseShape::Tetrahedron] {
            for depth in 0..=4 {
                let mesh = Mesh::generate(base, depth).unwrap();
                for tri in &mesh {
                    for p in tri.points {
                        assert!((p.length() - 1.0).abs() < EPSILON, "{base:?} {depth}: {p}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_depth_zero_is_base_polyhedron() {
        let mesh = Mesh::generate(BaseShape::Icosahedron, 0).unwrap();
        assert_eq!(mesh.triangles(), BaseShape::Icosahedron.faces().as_slice());
    }

    #[test]
    fn test_center_triangle_emitted_first() {
        let face = BaseShape::Icosahedron.faces()[0];
        let mesh = Mesh::generate(BaseShape::Icosahedron, 1).unwrap();
        let [p0, p1, p2] = face.points;

        let center = mesh.triangles()[0];
        assert_eq!(center.points[0], midpoint_on_sphere(p0, p1));
        assert_eq!(center.points[1], midpoint_on_sphere(p1, p2));
        assert_eq!(center.points[2], midpoint_on_sphere(p2, p0));

        // Then one corner per original vertex, in vertex order
        assert_eq!(mesh.triangles()[1].points[0], p0);
        assert_eq!(mesh.triangles()[2].points[0], p1);
        assert_eq!(mesh.triangles()[3].points[0], p2);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = Mesh::generate(BaseShape::Icosahedron, 3).unwrap();
        let b = Mesh::generate(BaseShape::Icosahedron, 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_subdivision_shrinks_triangles() {
        // Geodesic refinement should keep triangles similar in size
        let mesh = Mesh::generate(BaseShape::Icosahedron, 3).unwrap();
        let edge = |t: &Triangle| (t.points[0] - t.points[1]).length();
        let (min, max) = mesh
            .iter()
            .map(edge)
            .fold((f64::MAX, 0.0_f64), |(lo, hi), e| (lo.min(e), hi.max(e)));
        assert!(min > 0.0);
        assert!(max / min < 2.0, "edge ratio {}", max / min);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential_order() {
        for base in [BaseShape::Icosahedron, BaseShape::Tetrahedron] {
            let depth = 3;
            let mut sequential = Vec::new();
            for face in base.faces() {
                subdivide(face, depth, &mut sequential);
            }

            let mesh = Mesh::generate(base, depth).unwrap();
            assert_eq!(mesh.triangles(), sequential.as_slice(), "{base:?}");
        }
    }

    #[test]
    fn test_rejects_excessive_depth() {
        let err = Mesh::generate(BaseShape::Icosahedron, MAX_SMOOTHNESS + 1);
        assert!(matches!(err, Err(PhysicsError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_cache_shares_meshes() {
        let mut cache = MeshCache::new();
        let a = cache.get(BaseShape::Icosahedron, 2).unwrap();
        let b = cache.get(BaseShape::Icosahedron, 2).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);

        let c = cache.get(BaseShape::Tetrahedron, 2).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_vertices_translated_and_scaled() {
        let mesh = Mesh::generate(BaseShape::Tetrahedron, 1).unwrap();
        let center = DVec3::new(10.0, -2.0, 3.0);
        let vertices = mesh.vertices(center, 2.0);
        assert_eq!(vertices.len(), mesh.len() * 3);

        for v in &vertices {
            let pos = DVec3::new(v.position[0] as f64, v.position[1] as f64, v.position[2] as f64);
            assert!(((pos - center).length() - 2.0).abs() < 1e-4);
        }

        let bytes = mesh.vertex_bytes(center, 2.0);
        assert_eq!(bytes.len(), vertices.len() * std::mem::size_of::<MeshVertex>());
    }
}
