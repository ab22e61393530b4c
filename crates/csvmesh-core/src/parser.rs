//! Row Parser
//!
//! Turns one CSV record into a scaled vertex and, when requested, a texture
//! coordinate.

use crate::math::{Vec2, Vec3};
use crate::profile::Profile;
use crate::{CoreError, CoreResult};

/// Immutable per-import row parser
#[derive(Debug, Clone, Copy)]
pub struct RowParser {
    profile: Profile,
    scale: f32,
    extract_uv: bool,
}

impl RowParser {
    /// Create a parser for the given profile.
    ///
    /// UVs are only read when `extract_uv` is set and the profile defines
    /// texture coordinate columns.
    pub fn new(profile: Profile, scale: f32, extract_uv: bool) -> Self {
        Self {
            profile,
            scale,
            extract_uv: extract_uv && profile.has_uv(),
        }
    }

    /// Whether this parser produces UVs
    pub fn extracts_uv(&self) -> bool {
        self.extract_uv
    }

    /// Parse one data row.
    ///
    /// `row_number` is the 1-based line of the record in the file and is only
    /// used for diagnostics. Only the referenced cells are decoded, so other
    /// columns may hold arbitrary bytes.
    pub fn parse_row<S: AsRef<[u8]>>(
        &self,
        row_number: usize,
        fields: &[S],
    ) -> CoreResult<(Vec3, Option<Vec2>)> {
        let [x, y, z] = self.profile.position_columns();
        let position = Vec3::new(
            cell(fields, row_number, x)?,
            cell(fields, row_number, y)?,
            cell(fields, row_number, z)?,
        ) * self.scale;

        let uv = match self.profile.uv_columns() {
            Some([u, v]) if self.extract_uv => Some(Vec2::new(
                cell(fields, row_number, u)?,
                cell(fields, row_number, v)?,
            )),
            _ => None,
        };

        Ok((position, uv))
    }
}

fn cell<S: AsRef<[u8]>>(fields: &[S], row: usize, column: usize) -> CoreResult<f32> {
    let Some(raw) = fields.get(column) else {
        return Err(CoreError::MalformedRow {
            row,
            column,
            reason: format!("row has only {} columns", fields.len()),
        });
    };
    let raw = std::str::from_utf8(raw.as_ref())
        .map_err(|_| CoreError::MalformedRow {
            row,
            column,
            reason: String::from("invalid UTF-8"),
        })?
        .trim();
    raw.parse::<f32>().map_err(|_| CoreError::MalformedRow {
        row,
        column,
        reason: format!("not a number: {:?}", raw),
    })
}
