//! # csvmesh CLI
//!
//! Command-line interface for importing CSV mesh captures.
//!
//! ## Commands
//! - `import` - Rebuild a mesh from a CSV capture and export it
//! - `profiles` - List the known CSV layouts

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;

use csvmesh_assets::{
    FinishSettings, MeshData, MeshLibrary, export_to_path, finish_import, write_point_listing,
};
use csvmesh_core::{ConnectionMode, CsvFormat, ImportConfig, Profile, import_csv};

/// CSV capture to mesh converter
#[derive(Parser)]
#[command(name = "csvmesh")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Rebuild a mesh from a CSV capture
    Import(ImportArgs),

    /// List the known CSV layouts
    Profiles,
}

/// Connection method
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Connect vertices with edges (debugging)
    Edges,
    /// Connect vertices with faces
    Faces,
}

impl From<ModeArg> for ConnectionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Edges => ConnectionMode::Edges,
            ModeArg::Faces => ConnectionMode::Faces,
        }
    }
}

/// Arguments of `import`
#[derive(Args, Debug, Default)]
pub struct ImportArgs {
    /// CSV capture to read
    pub input: PathBuf,

    /// CSV format (stubbs, we_happy_few, bioshock, custom)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Scale factor applied to positions
    #[arg(short, long)]
    pub scale: Option<f32>,

    /// Connection method
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Read texture coordinates
    #[arg(long, conflicts_with = "no_uv")]
    pub uv: bool,

    /// Do not read texture coordinates
    #[arg(long)]
    pub no_uv: bool,

    /// Custom columns as x,y,z or x,y,z,u,v
    #[arg(long, value_parser = parse_columns)]
    pub columns: Option<ColumnList>,

    /// Custom rows come in triangle-corner triplets
    #[arg(long)]
    pub triplets: bool,

    /// Object name (defaults to the file name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// JSON settings file
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Keep loose edges
    #[arg(long)]
    pub no_cleanup: bool,

    /// Smooth shading
    #[arg(long)]
    pub smooth: bool,

    /// Place the object at the world origin
    #[arg(long)]
    pub center: bool,

    /// Distance under which vertices are welded
    #[arg(long)]
    pub merge_distance: Option<f32>,

    /// Output file (.obj or .json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the parsed vertices and UVs
    #[arg(long)]
    pub dump: bool,
}

/// Column indices given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnList(pub Vec<usize>);

/// Settings file layout
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SettingsFile {
    pub import: ImportConfig,
    pub finish: FinishSettings,
}

impl SettingsFile {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open settings {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse settings {}", path.display()))
    }
}

fn parse_columns(s: &str) -> Result<ColumnList, String> {
    let columns = s
        .split(',')
        .map(|c| c.trim().parse::<usize>().map_err(|e| format!("{:?}: {}", c, e)))
        .collect::<Result<Vec<_>, _>>()?;
    match columns.len() {
        3 | 5 => Ok(ColumnList(columns)),
        n => Err(format!("expected 3 or 5 columns, got {}", n)),
    }
}

/// Merge the settings file and command-line flags
pub fn resolve_settings(args: &ImportArgs) -> Result<(ImportConfig, FinishSettings)> {
    let SettingsFile {
        mut import,
        mut finish,
    } = match &args.settings {
        Some(path) => SettingsFile::load(path)?,
        None => SettingsFile::default(),
    };

    if let Some(format) = &args.format {
        import.format = format.parse::<CsvFormat>()?;
    }
    if let Some(scale) = args.scale {
        import.scale = scale;
    }
    if let Some(mode) = args.mode {
        import.mode = mode.into();
    }
    if args.uv {
        import.extract_uv = Some(true);
    } else if args.no_uv {
        import.extract_uv = Some(false);
    }

    if args.columns.is_some() || args.triplets {
        if import.format != CsvFormat::Custom {
            bail!("--columns and --triplets require the custom format");
        }
        let mut custom = import.custom.unwrap_or_default();
        if let Some(ColumnList(columns)) = &args.columns {
            custom.x = columns[0];
            custom.y = columns[1];
            custom.z = columns[2];
            custom.uv = columns.get(3..5).map(|uv| [uv[0], uv[1]]);
        }
        custom.per_triplet |= args.triplets;
        import.custom = Some(custom);
    }

    if args.no_cleanup {
        finish.cleanup = false;
    }
    finish.smooth |= args.smooth;
    finish.center |= args.center;
    if let Some(distance) = args.merge_distance {
        finish.merge_distance = distance;
    }

    Ok((import, finish))
}

/// Run an import and return the finished mesh
pub fn run_import(args: &ImportArgs) -> Result<MeshData> {
    let (config, finish) = resolve_settings(args)?;
    let geometry = import_csv(&args.input, &config)
        .with_context(|| format!("failed to import {}", args.input.display()))?;
    if let Some(bounds) = geometry.bounds() {
        log::debug!("Captured extent {} around {}", bounds.size(), bounds.center());
    }

    if args.dump {
        let stdout = std::io::stdout();
        write_point_listing(&geometry.vertices, &geometry.uvs, &mut stdout.lock())?;
    }

    let name = args.name.clone().unwrap_or_else(|| {
        args.input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "CSV_Mesh".to_string())
    });

    let mut library = MeshLibrary::new();
    let handle = finish_import(&mut library, &name, &geometry, &finish)?;
    let mesh = library.take(handle)?;

    log::info!(
        "{}: {} vertices, {} edges, {} faces",
        mesh.name,
        mesh.vertex_count(),
        mesh.edge_count(),
        mesh.face_count()
    );

    if let Some(output) = &args.output {
        export_to_path(&mesh, output)?;
    }

    Ok(mesh)
}

fn print_profiles() {
    for format in CsvFormat::ALL {
        println!("{:<14} {}", format.name(), format.title());
        match Profile::for_format(format, None) {
            Ok(profile) => {
                let [x, y, z] = profile.position_columns();
                println!("  position columns: {}, {}, {}", x, y, z);
                if let Some([u, v]) = profile.uv_columns() {
                    println!(
                        "  uv columns: {}, {} ({})",
                        u,
                        v,
                        if profile.uv_by_default() { "read by default" } else { "off by default" }
                    );
                }
                println!("  rows per primitive: {}", profile.stride().rows());
                println!("  scale: {}", format.scale_hint());
            }
            Err(e) => log::warn!("{}: {}", format, e),
        }
    }
}

/// Execute the CLI command
pub fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    match cli.command {
        Commands::Import(args) => {
            run_import(&args)?;
            log::info!("Mesh imported successfully.");
        }

        Commands::Profiles => print_profiles(),
    }

    Ok(())
}
