//! # csvmesh Assets
//!
//! Turns imported geometry into finished meshes and writes them out.
//!
//! ## Features
//! - Mesh assembler contract with an in-memory implementation
//! - Merge by distance, loose edge cleanup and origin recentering
//! - Per-format materials
//! - OBJ and JSON export, plain-text point listings

pub mod assembler;
pub mod export;
pub mod mesh;

pub use assembler::{MeshAssembler, MeshLibrary, finish_import};
pub use export::{ExportFormat, export_to_path, write_json, write_obj, write_point_listing};
pub use mesh::MeshData;

use csvmesh_core::CsvFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Asset errors
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Mesh not found: {0}")]
    MeshNotFound(MeshHandle),

    #[error("UV count {uvs} does not match vertex count {vertices}")]
    UvMismatch { vertices: usize, uvs: usize },

    #[error("Unsupported export format: {0}")]
    UnsupportedExport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for asset operations
pub type AssetResult<T> = Result<T, AssetError>;

/// Handle of a mesh owned by a [`MeshLibrary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshHandle(pub u64);

impl std::fmt::Display for MeshHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mesh#{}", self.0)
    }
}

/// Flat diffuse material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Material name
    pub name: String,
    /// Linear RGBA diffuse color
    pub diffuse_color: [f32; 4],
}

impl Material {
    /// Material identifying the source game of an import
    pub fn for_format(format: CsvFormat) -> Self {
        Self {
            name: format!("{}_material", format.name()),
            diffuse_color: format.diffuse_color(),
        }
    }
}

/// Post-import finishing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinishSettings {
    /// Distance under which vertices are welded
    pub merge_distance: f32,
    /// Remove edges that do not belong to a face (face imports only)
    pub cleanup: bool,
    /// Smooth shading
    pub smooth: bool,
    /// Place the object at the world origin instead of where it was captured
    pub center: bool,
}

impl Default for FinishSettings {
    fn default() -> Self {
        Self {
            merge_distance: 0.001,
            cleanup: true,
            smooth: false,
            center: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_for_format() {
        let material = Material::for_format(CsvFormat::Bioshock);
        assert_eq!(material.name, "bioshock_material");
        assert_eq!(material.diffuse_color, CsvFormat::Bioshock.diffuse_color());
    }

    #[test]
    fn test_finish_settings_defaults() {
        let settings: FinishSettings = serde_json::from_str(r#"{ "smooth": true }"#).unwrap();
        assert!(settings.smooth);
        assert!(settings.cleanup);
        assert!(!settings.center);
        assert_eq!(settings.merge_distance, 0.001);
    }

    #[test]
    fn test_mesh_handle_display() {
        assert_eq!(MeshHandle(7).to_string(), "mesh#7");
    }
}
