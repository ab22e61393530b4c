//! Topology Builder
//!
//! Connects an ordered vertex stream into edges or triangles. Indices refer
//! to positions in the vertex list; no welding happens here.

use serde::{Deserialize, Serialize};

use crate::profile::{Profile, Stride};

/// How vertices are connected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionMode {
    /// Line segments, mostly useful for debugging a capture
    Edges,
    /// Triangles
    #[default]
    Faces,
}

/// Connectivity of an import, all tuples of one arity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topology {
    Edges(Vec<[usize; 2]>),
    Faces(Vec<[usize; 3]>),
}

impl Topology {
    /// Connection mode that produced this topology
    pub fn mode(&self) -> ConnectionMode {
        match self {
            Self::Edges(_) => ConnectionMode::Edges,
            Self::Faces(_) => ConnectionMode::Faces,
        }
    }

    /// Number of edges or faces
    pub fn len(&self) -> usize {
        match self {
            Self::Edges(edges) => edges.len(),
            Self::Faces(faces) => faces.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Largest referenced vertex index
    pub fn max_index(&self) -> Option<usize> {
        match self {
            Self::Edges(edges) => edges.iter().flatten().copied().max(),
            Self::Faces(faces) => faces.iter().flatten().copied().max(),
        }
    }
}

/// Build the connectivity for `vertex_count` vertices.
///
/// Dense streams are chained: every vertex connects to the next one. For faces
/// this is a sliding window, so consecutive triangles share two corners even
/// when the capture listed unrelated triangles back to back. Triplet streams
/// are cut into independent groups of three, and edge mode keeps only the
/// first edge of every group.
pub fn build_topology(vertex_count: usize, stride: Stride, mode: ConnectionMode) -> Topology {
    let step = stride.rows();
    match mode {
        ConnectionMode::Edges => Topology::Edges(
            (0..vertex_count.saturating_sub(1))
                .step_by(step)
                .map(|i| [i, i + 1])
                .collect(),
        ),
        ConnectionMode::Faces => Topology::Faces(
            (0..vertex_count.saturating_sub(2))
                .step_by(step)
                .map(|i| [i, i + 1, i + 2])
                .collect(),
        ),
    }
}

/// Build the connectivity using a profile's stride
pub fn build_for_profile(vertex_count: usize, profile: &Profile, mode: ConnectionMode) -> Topology {
    build_topology(vertex_count, profile.stride(), mode)
}
