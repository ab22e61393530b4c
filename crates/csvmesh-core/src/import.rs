//! CSV Import
//!
//! End-to-end pipeline from a CSV capture to vertices, UVs and connectivity.
//! An import either fully succeeds or returns an error; no partial geometry
//! is ever handed back.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::math::{Aabb, Vec2, Vec3};
use crate::parser::RowParser;
use crate::profile::{CsvFormat, CustomColumns, Profile};
use crate::topology::{ConnectionMode, Topology, build_for_profile};
use crate::{CoreError, CoreResult};

/// Practical range of scale factors
pub const SCALE_RANGE: (f32, f32) = (0.01, 10.0);

/// Import configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Source format
    pub format: CsvFormat,
    /// Column layout for the custom format
    pub custom: Option<CustomColumns>,
    /// Uniform scale applied to positions
    pub scale: f32,
    /// Edges or faces
    pub mode: ConnectionMode,
    /// Read texture coordinates (`None` uses the profile default)
    pub extract_uv: Option<bool>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            format: CsvFormat::Stubbs,
            custom: None,
            scale: 1.0,
            mode: ConnectionMode::Faces,
            extract_uv: None,
        }
    }
}

impl ImportConfig {
    /// Create a configuration for a format with default settings
    pub fn for_format(format: CsvFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Resolve the profile described by this configuration
    pub fn profile(&self) -> CoreResult<Profile> {
        Profile::for_format(self.format, self.custom)
    }

    /// Check the scale factor
    pub fn validate(&self) -> CoreResult<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(CoreError::InvalidScale(self.scale));
        }
        let (min, max) = SCALE_RANGE;
        if self.scale < min || self.scale > max {
            log::warn!(
                "Scale factor {} is outside the usual range {} - {}",
                self.scale,
                min,
                max
            );
        }
        Ok(())
    }
}

/// Result of a successful import
#[derive(Debug, Clone)]
pub struct ImportedGeometry {
    /// Profile the file was read with
    pub profile: Profile,
    /// Scaled positions in file order
    pub vertices: Vec<Vec3>,
    /// Texture coordinates, empty or one per vertex
    pub uvs: Vec<Vec2>,
    /// Connectivity over `vertices`
    pub topology: Topology,
}

impl ImportedGeometry {
    /// UVs, if they line up with the vertices
    pub fn aligned_uvs(&self) -> Option<&[Vec2]> {
        if !self.uvs.is_empty() && self.uvs.len() == self.vertices.len() {
            Some(&self.uvs)
        } else {
            None
        }
    }

    /// Bounds of the imported positions
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.vertices)
    }

    /// Connection mode of the topology
    pub fn mode(&self) -> ConnectionMode {
        self.topology.mode()
    }
}

/// Import a CSV file.
///
/// The file is closed before this returns, on success and on failure.
pub fn import_csv(path: impl AsRef<Path>, config: &ImportConfig) -> CoreResult<ImportedGeometry> {
    let path = path.as_ref();
    log::info!("Importing {} as {}", path.display(), config.format.title());
    let file = File::open(path)?;
    import_reader(file, config)
}

/// Import CSV data from any reader
pub fn import_reader<R: Read>(reader: R, config: &ImportConfig) -> CoreResult<ImportedGeometry> {
    config.validate()?;
    let profile = config.profile()?;
    let extract_uv = config.extract_uv.unwrap_or_else(|| profile.uv_by_default());
    let parser = RowParser::new(profile, config.scale, extract_uv);
    log::debug!(
        "Columns {:?}, UVs {}",
        profile.position_columns(),
        if parser.extracts_uv() { "on" } else { "off" }
    );

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut vertices = Vec::new();
    let mut uvs = Vec::new();
    let mut record = csv::ByteRecord::new();
    let mut index = 0usize;

    while read_record(&mut reader, &mut record, index + 1)? {
        index += 1;
        let row = record.position().map_or(index, |pos| pos.line() as usize);
        if index == 1 {
            log::debug!("Skipping header with {} columns", record.len());
            continue;
        }
        let fields: Vec<&[u8]> = record.iter().collect();
        let (vertex, uv) = parser.parse_row(row, &fields)?;
        vertices.push(vertex);
        if let Some(uv) = uv {
            uvs.push(uv);
        }
    }

    if vertices.is_empty() {
        return Err(CoreError::EmptyInput);
    }

    let topology = build_for_profile(vertices.len(), &profile, config.mode);

    log::info!(
        "Parsed {} vertices, {} UVs, {} {}",
        vertices.len(),
        uvs.len(),
        topology.len(),
        match topology.mode() {
            ConnectionMode::Edges => "edges",
            ConnectionMode::Faces => "faces",
        }
    );

    Ok(ImportedGeometry {
        profile,
        vertices,
        uvs,
        topology,
    })
}

fn read_record<R: Read>(
    reader: &mut csv::Reader<R>,
    record: &mut csv::ByteRecord,
    fallback_row: usize,
) -> CoreResult<bool> {
    reader.read_byte_record(record).map_err(|err| {
        let row = err
            .position()
            .map_or(fallback_row, |pos| pos.line() as usize);
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => CoreError::Io(io),
            _ => CoreError::Csv { row, message },
        }
    })
}
