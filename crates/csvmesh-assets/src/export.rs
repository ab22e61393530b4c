//! Mesh Export
//!
//! Wavefront OBJ and JSON writers, and the plain-text point listing.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use csvmesh_core::math::{Vec2, Vec3};

use crate::mesh::MeshData;
use crate::{AssetError, AssetResult};

/// Output file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Obj,
    Json,
}

impl ExportFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .and_then(|ext| match ext.as_str() {
                "obj" => Some(Self::Obj),
                "json" => Some(Self::Json),
                _ => None,
            })
    }
}

/// Write a mesh to `path`, choosing the format from the extension
pub fn export_to_path(mesh: &MeshData, path: &Path) -> AssetResult<()> {
    let format = ExportFormat::from_path(path)
        .ok_or_else(|| AssetError::UnsupportedExport(path.display().to_string()))?;
    let mut writer = BufWriter::new(File::create(path)?);
    match format {
        ExportFormat::Obj => write_obj(mesh, &mut writer)?,
        ExportFormat::Json => write_json(mesh, &mut writer)?,
    }
    writer.flush()?;
    log::info!("Wrote {} to {}", mesh.name, path.display());
    Ok(())
}

/// Write a mesh as Wavefront OBJ with world-space positions
pub fn write_obj<W: Write>(mesh: &MeshData, writer: &mut W) -> AssetResult<()> {
    writeln!(writer, "# csvmesh {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(writer, "o {}", if mesh.name.is_empty() { "CSV_Mesh" } else { mesh.name.as_str() })?;

    for v in mesh.world_vertices() {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }

    if let Some(corner_uvs) = &mesh.corner_uvs {
        for corners in corner_uvs {
            for uv in corners {
                writeln!(writer, "vt {} {}", uv.x, uv.y)?;
            }
        }
    }

    writeln!(writer, "s {}", if mesh.smooth { "1" } else { "off" })?;

    match &mesh.corner_uvs {
        Some(_) => {
            for (i, [a, b, c]) in mesh.faces.iter().enumerate() {
                let t = i * 3;
                writeln!(
                    writer,
                    "f {}/{} {}/{} {}/{}",
                    a + 1,
                    t + 1,
                    b + 1,
                    t + 2,
                    c + 1,
                    t + 3
                )?;
            }
        }
        None => {
            for [a, b, c] in &mesh.faces {
                writeln!(writer, "f {} {} {}", a + 1, b + 1, c + 1)?;
            }
        }
    }

    for [a, b] in &mesh.edges {
        writeln!(writer, "l {} {}", a + 1, b + 1)?;
    }

    Ok(())
}

/// Write a mesh as pretty-printed JSON
pub fn write_json<W: Write>(mesh: &MeshData, writer: &mut W) -> AssetResult<()> {
    serde_json::to_writer_pretty(&mut *writer, mesh)
        .map_err(|e| AssetError::Serialization(e.to_string()))?;
    writeln!(writer)?;
    Ok(())
}

/// Write the parsed points as text, vertices first, then UVs as `(u, v, 1.0)`
pub fn write_point_listing<W: Write>(
    vertices: &[Vec3],
    uvs: &[Vec2],
    writer: &mut W,
) -> AssetResult<()> {
    writeln!(writer, "Vertices:")?;
    for v in vertices {
        writeln!(writer, "({}, {}, {})", v.x, v.y, v.z)?;
    }
    writeln!(writer, "UV Coordinates:")?;
    for uv in uvs {
        writeln!(writer, "({}, {}, 1.0)", uv.x, uv.y)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshData {
        MeshData {
            name: String::from("tri"),
            vertices: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            faces: vec![[0, 1, 2]],
            origin: Vec3::new(0.0, 0.0, 2.0),
            ..MeshData::default()
        }
    }

    fn to_string(f: impl FnOnce(&mut Vec<u8>) -> AssetResult<()>) -> String {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_obj_faces_are_one_based() {
        let mesh = triangle();
        let obj = to_string(|w| write_obj(&mesh, w));
        assert!(obj.contains("o tri\n"));
        assert!(obj.contains("v 1 0 2\n"));
        assert!(obj.contains("f 1 2 3\n"));
        assert!(obj.contains("s off\n"));
    }

    #[test]
    fn test_obj_with_uvs() {
        let mut mesh = triangle();
        mesh.corner_uvs = Some(vec![[Vec2::ZERO, Vec2::X, Vec2::Y]]);
        mesh.smooth = true;
        let obj = to_string(|w| write_obj(&mesh, w));
        assert!(obj.contains("vt 1 0\n"));
        assert!(obj.contains("f 1/1 2/2 3/3\n"));
        assert!(obj.contains("s 1\n"));
    }

    #[test]
    fn test_obj_edges() {
        let mesh = MeshData {
            name: String::from("line"),
            vertices: vec![Vec3::ZERO, Vec3::X],
            edges: vec![[0, 1]],
            ..MeshData::default()
        };
        let obj = to_string(|w| write_obj(&mesh, w));
        assert!(obj.contains("l 1 2\n"));
        assert!(!obj.contains("\nf "));
    }

    #[test]
    fn test_json_round_trip() {
        let mesh = triangle();
        let json = to_string(|w| write_json(&mesh, w));
        let parsed: MeshData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, mesh);
    }

    #[test]
    fn test_point_listing() {
        let text = to_string(|w| {
            write_point_listing(&[Vec3::new(1.0, 2.5, -3.0)], &[Vec2::new(0.5, 0.25)], w)
        });
        assert_eq!(text, "Vertices:\n(1, 2.5, -3)\nUV Coordinates:\n(0.5, 0.25, 1.0)\n");
    }

    #[test]
    fn test_export_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("a/mesh.OBJ")), Some(ExportFormat::Obj));
        assert_eq!(ExportFormat::from_path(Path::new("mesh.json")), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_path(Path::new("mesh.fbx")), None);
    }

    #[test]
    fn test_export_unsupported_extension() {
        let err = export_to_path(&triangle(), Path::new("mesh.fbx")).unwrap_err();
        assert!(matches!(err, AssetError::UnsupportedExport(_)));
    }
}
