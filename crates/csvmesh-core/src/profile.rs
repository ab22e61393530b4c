//! Profile Registry
//!
//! Column layouts of the CSV dumps produced for each supported source game.
//! A profile tells the row parser which columns hold position and texture
//! coordinates, and tells the topology builder how rows group into primitives.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Source format of a CSV capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CsvFormat {
    /// Stubbs the Zombie
    #[default]
    Stubbs,
    /// BioShock 1 & 2 and We Happy Few
    #[serde(alias = "whf")]
    WeHappyFew,
    /// BioShock Infinite
    Bioshock,
    /// Any capture, columns supplied by the user
    #[serde(alias = "other")]
    Custom,
}

impl CsvFormat {
    /// Built-in formats followed by the custom layout
    pub const ALL: [CsvFormat; 4] = [
        CsvFormat::Stubbs,
        CsvFormat::WeHappyFew,
        CsvFormat::Bioshock,
        CsvFormat::Custom,
    ];

    /// Machine name accepted by `FromStr`
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stubbs => "stubbs",
            Self::WeHappyFew => "we_happy_few",
            Self::Bioshock => "bioshock",
            Self::Custom => "custom",
        }
    }

    /// Human readable title
    pub fn title(&self) -> &'static str {
        match self {
            Self::Stubbs => "Stubbs The Zombie",
            Self::WeHappyFew => "BioShock 1 & 2 + We Happy Few",
            Self::Bioshock => "BioShock Infinite",
            Self::Custom => "Other (custom columns)",
        }
    }

    /// Scale factors known to produce sensible sizes for this game
    pub fn scale_hint(&self) -> &'static str {
        match self {
            Self::Stubbs => "1.0 - 10.0",
            Self::WeHappyFew => "0.01",
            Self::Bioshock => "0.01 - 0.10",
            Self::Custom => "0.01 - 1.0",
        }
    }

    /// Diffuse color given to meshes imported with this format
    pub fn diffuse_color(&self) -> [f32; 4] {
        match self {
            Self::Stubbs => [0.375_999, 0.782_452, 0.152_31, 1.0],
            Self::WeHappyFew => [0.979_846, 0.907_275, 0.065_402, 1.0],
            Self::Bioshock => [0.066_149, 0.255_212, 0.979_846, 1.0],
            Self::Custom => [0.8, 0.5, 0.8, 1.0],
        }
    }
}

impl fmt::Display for CsvFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CsvFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "stubbs" => Ok(Self::Stubbs),
            "we_happy_few" | "whf" => Ok(Self::WeHappyFew),
            "bioshock" => Ok(Self::Bioshock),
            "custom" | "other" => Ok(Self::Custom),
            _ => Err(CoreError::InvalidFormat(s.to_string())),
        }
    }
}

/// Number of consecutive rows forming one primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stride {
    /// One row per unique vertex, consecutive rows are connected
    Dense,
    /// One row per triangle corner, three rows per triangle
    Triplet,
}

impl Stride {
    /// Rows per group
    pub fn rows(&self) -> usize {
        match self {
            Self::Dense => 1,
            Self::Triplet => 3,
        }
    }
}

/// User-supplied column layout for [`CsvFormat::Custom`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomColumns {
    /// Column of POSITION.x
    pub x: usize,
    /// Column of POSITION.y
    pub y: usize,
    /// Column of POSITION.z
    pub z: usize,
    /// Columns of TEXCOORD.x and TEXCOORD.y
    pub uv: Option<[usize; 2]>,
    /// Rows come in triangle-corner triplets
    pub per_triplet: bool,
}

impl Default for CustomColumns {
    fn default() -> Self {
        Self {
            x: 2,
            y: 3,
            z: 4,
            uv: Some([5, 6]),
            per_triplet: false,
        }
    }
}

/// Resolved column layout of one import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    format: CsvFormat,
    position_columns: [usize; 3],
    uv_columns: Option<[usize; 2]>,
    stride: Stride,
}

impl Profile {
    /// Resolve a profile by format name.
    ///
    /// `custom` is only consulted for the custom format; when absent the
    /// default custom layout is used.
    pub fn resolve(format_name: &str, custom: Option<CustomColumns>) -> CoreResult<Self> {
        let format = format_name.parse::<CsvFormat>()?;
        Self::for_format(format, custom)
    }

    /// Build the profile of a known format
    pub fn for_format(format: CsvFormat, custom: Option<CustomColumns>) -> CoreResult<Self> {
        let profile = match format {
            CsvFormat::Stubbs => Self {
                format,
                position_columns: [2, 3, 4],
                uv_columns: Some([14, 15]),
                stride: Stride::Dense,
            },
            CsvFormat::WeHappyFew => Self {
                format,
                position_columns: [2, 3, 4],
                uv_columns: Some([13, 14]),
                stride: Stride::Triplet,
            },
            CsvFormat::Bioshock => Self {
                format,
                position_columns: [18, 19, 20],
                uv_columns: Some([21, 22]),
                stride: Stride::Triplet,
            },
            CsvFormat::Custom => {
                let columns = custom.unwrap_or_default();
                let profile = Self {
                    format,
                    position_columns: [columns.x, columns.y, columns.z],
                    uv_columns: columns.uv,
                    stride: if columns.per_triplet {
                        Stride::Triplet
                    } else {
                        Stride::Dense
                    },
                };
                profile.check_distinct()?;
                profile
            }
        };
        Ok(profile)
    }

    fn check_distinct(&self) -> CoreResult<()> {
        let columns = self.referenced_columns();
        for (i, a) in columns.iter().enumerate() {
            if columns[i + 1..].contains(a) {
                return Err(CoreError::InvalidFormat(format!(
                    "column {} is referenced more than once in the custom layout",
                    a
                )));
            }
        }
        Ok(())
    }

    fn referenced_columns(&self) -> Vec<usize> {
        let mut columns = self.position_columns.to_vec();
        if let Some(uv) = self.uv_columns {
            columns.extend_from_slice(&uv);
        }
        columns
    }

    /// Source format
    pub fn format(&self) -> CsvFormat {
        self.format
    }

    /// Columns of x, y and z
    pub fn position_columns(&self) -> [usize; 3] {
        self.position_columns
    }

    /// Columns of u and v, if the layout defines them
    pub fn uv_columns(&self) -> Option<[usize; 2]> {
        self.uv_columns
    }

    /// Row grouping
    pub fn stride(&self) -> Stride {
        self.stride
    }

    /// Whether the layout defines texture coordinates
    pub fn has_uv(&self) -> bool {
        self.uv_columns.is_some()
    }

    /// Whether UVs are read when the caller does not say otherwise.
    ///
    /// The triplet layouts often carry garbage in their texcoord columns, so
    /// only the dense and custom layouts read them by default.
    pub fn uv_by_default(&self) -> bool {
        match self.format {
            CsvFormat::Stubbs | CsvFormat::Custom => self.has_uv(),
            CsvFormat::WeHappyFew | CsvFormat::Bioshock => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles() {
        let stubbs = Profile::resolve("stubbs", None).unwrap();
        assert_eq!(stubbs.position_columns(), [2, 3, 4]);
        assert_eq!(stubbs.uv_columns(), Some([14, 15]));
        assert_eq!(stubbs.stride(), Stride::Dense);

        let whf = Profile::resolve("we_happy_few", None).unwrap();
        assert_eq!(whf.uv_columns(), Some([13, 14]));
        assert_eq!(whf.stride(), Stride::Triplet);

        let bio = Profile::resolve("BioShock", None).unwrap();
        assert_eq!(bio.position_columns(), [18, 19, 20]);
        assert_eq!(bio.uv_columns(), Some([21, 22]));
        assert_eq!(bio.stride(), Stride::Triplet);
    }

    #[test]
    fn test_unknown_format() {
        let err = Profile::resolve("quake", None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidFormat(name) if name == "quake"));
    }

    #[test]
    fn test_format_aliases() {
        assert_eq!("whf".parse::<CsvFormat>().unwrap(), CsvFormat::WeHappyFew);
        assert_eq!("we-happy-few".parse::<CsvFormat>().unwrap(), CsvFormat::WeHappyFew);
        assert_eq!("OTHER".parse::<CsvFormat>().unwrap(), CsvFormat::Custom);
    }

    #[test]
    fn test_custom_defaults() {
        let profile = Profile::resolve("custom", None).unwrap();
        assert_eq!(profile.position_columns(), [2, 3, 4]);
        assert_eq!(profile.uv_columns(), Some([5, 6]));
        assert_eq!(profile.stride(), Stride::Dense);
    }

    #[test]
    fn test_custom_triplet_without_uv() {
        let columns = CustomColumns {
            x: 0,
            y: 1,
            z: 2,
            uv: None,
            per_triplet: true,
        };
        let profile = Profile::for_format(CsvFormat::Custom, Some(columns)).unwrap();
        assert_eq!(profile.stride(), Stride::Triplet);
        assert!(!profile.has_uv());
        assert!(!profile.uv_by_default());
    }

    #[test]
    fn test_custom_duplicate_columns_rejected() {
        let columns = CustomColumns {
            x: 0,
            y: 1,
            z: 2,
            uv: Some([2, 3]),
            per_triplet: false,
        };
        let err = Profile::for_format(CsvFormat::Custom, Some(columns)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidFormat(_)));
    }

    #[test]
    fn test_custom_columns_ignored_for_builtin() {
        let columns = CustomColumns {
            x: 7,
            y: 8,
            z: 9,
            uv: None,
            per_triplet: true,
        };
        let profile = Profile::for_format(CsvFormat::Stubbs, Some(columns)).unwrap();
        assert_eq!(profile.position_columns(), [2, 3, 4]);
    }

    #[test]
    fn test_uv_defaults() {
        assert!(Profile::resolve("stubbs", None).unwrap().uv_by_default());
        assert!(!Profile::resolve("whf", None).unwrap().uv_by_default());
        assert!(!Profile::resolve("bioshock", None).unwrap().uv_by_default());
    }

    #[test]
    fn test_format_serde_names() {
        let format: CsvFormat = serde_json::from_str("\"whf\"").unwrap();
        assert_eq!(format, CsvFormat::WeHappyFew);
        assert_eq!(serde_json::to_string(&CsvFormat::Bioshock).unwrap(), "\"bioshock\"");
    }
}
