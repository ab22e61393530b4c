//! Mesh Data
//!
//! Editable in-memory mesh built from imported geometry.

use ahash::{AHashMap, AHashSet};
use csvmesh_core::Topology;
use csvmesh_core::math::{Aabb, IVec3, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{AssetError, AssetResult, Material};

/// Smallest grid cell used by the weld spatial hash
const MIN_CELL_SIZE: f32 = 1.0e-6;

/// Mesh with object-space vertices and an object origin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    /// Mesh name
    pub name: String,
    /// Vertex positions relative to `origin`
    pub vertices: Vec<Vec3>,
    /// Edges that are not implied by a face
    pub edges: Vec<[usize; 2]>,
    /// Triangles
    pub faces: Vec<[usize; 3]>,
    /// Texture coordinates per face corner
    pub corner_uvs: Option<Vec<[Vec2; 3]>>,
    /// Smooth shading
    pub smooth: bool,
    /// Object location in world space
    pub origin: Vec3,
    /// Assigned material
    pub material: Option<Material>,
}

impl MeshData {
    /// Build a mesh from imported vertices and their connectivity
    pub fn from_topology(name: impl Into<String>, vertices: &[Vec3], topology: &Topology) -> Self {
        let (edges, faces) = match topology {
            Topology::Edges(edges) => (edges.clone(), Vec::new()),
            Topology::Faces(faces) => (Vec::new(), faces.clone()),
        };
        Self {
            name: name.into(),
            vertices: vertices.to_vec(),
            edges,
            faces,
            ..Self::default()
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Bounds in object space
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.vertices)
    }

    /// Vertex positions in world space
    pub fn world_vertices(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.iter().map(move |&v| v + self.origin)
    }

    /// Spread per-vertex UVs onto face corners.
    ///
    /// Edge-only meshes have no corners, so nothing is stored for them.
    pub fn set_vertex_uvs(&mut self, uvs: &[Vec2]) -> AssetResult<()> {
        if uvs.len() != self.vertices.len() {
            return Err(AssetError::UvMismatch {
                vertices: self.vertices.len(),
                uvs: uvs.len(),
            });
        }
        if self.faces.is_empty() {
            log::debug!("{}: no faces, UVs not stored", self.name);
            self.corner_uvs = None;
            return Ok(());
        }
        self.corner_uvs = Some(
            self.faces
                .iter()
                .map(|&[a, b, c]| [uvs[a], uvs[b], uvs[c]])
                .collect(),
        );
        Ok(())
    }

    /// Weld vertices closer than `tolerance`.
    ///
    /// The first vertex of a cluster survives. Faces and edges collapsing to
    /// fewer than their corner count are dropped, as are duplicate edges.
    /// Returns the number of vertices removed.
    pub fn merge_by_distance(&mut self, tolerance: f32) -> usize {
        if self.vertices.is_empty() || !tolerance.is_finite() || tolerance < 0.0 {
            return 0;
        }
        let cell_size = tolerance.max(MIN_CELL_SIZE);
        let tolerance_sq = tolerance * tolerance;

        let mut grid: AHashMap<IVec3, SmallVec<[usize; 4]>> = AHashMap::new();
        let mut merged: Vec<Vec3> = Vec::with_capacity(self.vertices.len());
        let mut remap = Vec::with_capacity(self.vertices.len());

        for &vertex in &self.vertices {
            let cell = (vertex / cell_size).floor().as_ivec3();
            let target = neighbor_cells(cell)
                .filter_map(|key| grid.get(&key))
                .flat_map(|bucket| bucket.iter().copied())
                .find(|&k| merged[k].distance_squared(vertex) <= tolerance_sq);

            let index = match target {
                Some(k) => k,
                None => {
                    merged.push(vertex);
                    let k = merged.len() - 1;
                    grid.entry(cell).or_default().push(k);
                    k
                }
            };
            remap.push(index);
        }

        let removed = self.vertices.len() - merged.len();
        self.vertices = merged;
        self.remap_elements(&remap);
        log::debug!("{}: merged {} vertices", self.name, removed);
        removed
    }

    /// Delete edges that are not part of any face, then drop vertices that
    /// nothing references. Returns the number of edges removed.
    pub fn remove_loose_edges(&mut self) -> usize {
        let face_edges: AHashSet<[usize; 2]> = self
            .faces
            .iter()
            .flat_map(|&[a, b, c]| [sorted(a, b), sorted(b, c), sorted(c, a)])
            .collect();

        let before = self.edges.len();
        self.edges.retain(|&[a, b]| face_edges.contains(&sorted(a, b)));
        let removed = before - self.edges.len();

        let mut used = vec![false; self.vertices.len()];
        for &index in self.edges.iter().flatten().chain(self.faces.iter().flatten()) {
            used[index] = true;
        }
        if used.iter().any(|&u| !u) {
            let mut remap = vec![0; self.vertices.len()];
            let mut kept = Vec::with_capacity(self.vertices.len());
            for (i, &vertex) in self.vertices.iter().enumerate() {
                if used[i] {
                    remap[i] = kept.len();
                    kept.push(vertex);
                }
            }
            log::debug!(
                "{}: dropped {} unreferenced vertices",
                self.name,
                self.vertices.len() - kept.len()
            );
            self.vertices = kept;
            self.remap_elements(&remap);
        }

        removed
    }

    /// Move the origin to the center of the bounds, keeping world positions.
    /// Returns the new origin.
    pub fn recenter_origin(&mut self) -> Vec3 {
        if let Some(bounds) = self.bounds() {
            let center = bounds.center();
            for vertex in &mut self.vertices {
                *vertex -= center;
            }
            self.origin += center;
        }
        self.origin
    }

    fn remap_elements(&mut self, remap: &[usize]) {
        let mut faces = Vec::with_capacity(self.faces.len());
        let mut corner_uvs = self.corner_uvs.as_ref().map(|uvs| Vec::with_capacity(uvs.len()));
        for (i, &[a, b, c]) in self.faces.iter().enumerate() {
            let face = [remap[a], remap[b], remap[c]];
            if face[0] == face[1] || face[1] == face[2] || face[2] == face[0] {
                continue;
            }
            faces.push(face);
            if let (Some(out), Some(uvs)) = (corner_uvs.as_mut(), self.corner_uvs.as_ref()) {
                out.push(uvs[i]);
            }
        }
        self.faces = faces;
        self.corner_uvs = corner_uvs;

        let mut seen = AHashSet::new();
        self.edges = self
            .edges
            .iter()
            .map(|&[a, b]| [remap[a], remap[b]])
            .filter(|&[a, b]| a != b && seen.insert(sorted(a, b)))
            .collect();
    }
}

fn sorted(a: usize, b: usize) -> [usize; 2] {
    if a <= b { [a, b] } else { [b, a] }
}

fn neighbor_cells(cell: IVec3) -> impl Iterator<Item = IVec3> {
    (-1..=1).flat_map(move |dx| {
        (-1..=1).flat_map(move |dy| {
            (-1..=1).map(move |dz| {
                IVec3::new(
                    cell.x.saturating_add(dx),
                    cell.y.saturating_add(dy),
                    cell.z.saturating_add(dz),
                )
            })
        })
    })
}
