//! Mesh Assembler
//!
//! The contract between the import core and whatever hosts the resulting
//! mesh, plus the in-memory host used by the command line tool.

use ahash::AHashMap;
use csvmesh_core::math::{Vec2, Vec3};
use csvmesh_core::{ConnectionMode, ImportedGeometry, Topology};

use crate::mesh::MeshData;
use crate::{AssetError, AssetResult, FinishSettings, Material, MeshHandle};

/// Materializes imported geometry as a mesh object
pub trait MeshAssembler {
    /// Handle to a created mesh
    type Handle: Copy;

    /// Create a mesh from vertices and connectivity
    fn create_mesh(
        &mut self,
        name: &str,
        vertices: &[Vec3],
        topology: &Topology,
    ) -> AssetResult<Self::Handle>;

    /// Attach per-vertex texture coordinates
    fn assign_uv(&mut self, handle: Self::Handle, uvs: &[Vec2]) -> AssetResult<()>;

    /// Weld vertices within `tolerance`, returning how many were removed
    fn merge_coincident_vertices(&mut self, handle: Self::Handle, tolerance: f32)
    -> AssetResult<usize>;

    /// Remove edges without faces, returning how many were removed
    fn remove_loose_edges(&mut self, handle: Self::Handle) -> AssetResult<usize>;

    /// Toggle smooth shading
    fn set_smooth_shading(&mut self, handle: Self::Handle, smooth: bool) -> AssetResult<()>;

    /// Move the origin to the geometry bounds center, returning it
    fn recenter_origin(&mut self, handle: Self::Handle) -> AssetResult<Vec3>;

    /// Move the object to the world origin
    fn clear_location(&mut self, handle: Self::Handle) -> AssetResult<()>;

    /// Assign a material
    fn assign_material(&mut self, handle: Self::Handle, material: Material) -> AssetResult<()>;
}

/// In-memory mesh store
#[derive(Debug, Default)]
pub struct MeshLibrary {
    meshes: AHashMap<MeshHandle, MeshData>,
    next_handle: u64,
}

impl MeshLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a mesh by handle
    pub fn get(&self, handle: MeshHandle) -> Option<&MeshData> {
        self.meshes.get(&handle)
    }

    /// Remove a mesh from the library, handing ownership to the caller
    pub fn take(&mut self, handle: MeshHandle) -> AssetResult<MeshData> {
        self.meshes
            .remove(&handle)
            .ok_or(AssetError::MeshNotFound(handle))
    }

    /// Number of meshes held
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    fn mesh_mut(&mut self, handle: MeshHandle) -> AssetResult<&mut MeshData> {
        self.meshes
            .get_mut(&handle)
            .ok_or(AssetError::MeshNotFound(handle))
    }
}

impl MeshAssembler for MeshLibrary {
    type Handle = MeshHandle;

    fn create_mesh(
        &mut self,
        name: &str,
        vertices: &[Vec3],
        topology: &Topology,
    ) -> AssetResult<MeshHandle> {
        let handle = MeshHandle(self.next_handle);
        self.next_handle += 1;
        self.meshes
            .insert(handle, MeshData::from_topology(name, vertices, topology));
        Ok(handle)
    }

    fn assign_uv(&mut self, handle: MeshHandle, uvs: &[Vec2]) -> AssetResult<()> {
        self.mesh_mut(handle)?.set_vertex_uvs(uvs)
    }

    fn merge_coincident_vertices(&mut self, handle: MeshHandle, tolerance: f32) -> AssetResult<usize> {
        Ok(self.mesh_mut(handle)?.merge_by_distance(tolerance))
    }

    fn remove_loose_edges(&mut self, handle: MeshHandle) -> AssetResult<usize> {
        Ok(self.mesh_mut(handle)?.remove_loose_edges())
    }

    fn set_smooth_shading(&mut self, handle: MeshHandle, smooth: bool) -> AssetResult<()> {
        self.mesh_mut(handle)?.smooth = smooth;
        Ok(())
    }

    fn recenter_origin(&mut self, handle: MeshHandle) -> AssetResult<Vec3> {
        Ok(self.mesh_mut(handle)?.recenter_origin())
    }

    fn clear_location(&mut self, handle: MeshHandle) -> AssetResult<()> {
        self.mesh_mut(handle)?.origin = Vec3::ZERO;
        Ok(())
    }

    fn assign_material(&mut self, handle: MeshHandle, material: Material) -> AssetResult<()> {
        self.mesh_mut(handle)?.material = Some(material);
        Ok(())
    }
}

/// Hand imported geometry to an assembler and apply the finishing steps.
///
/// Cleanup only runs for face imports: on an edge import every edge is loose
/// and would be deleted.
pub fn finish_import<A: MeshAssembler>(
    assembler: &mut A,
    name: &str,
    geometry: &ImportedGeometry,
    settings: &FinishSettings,
) -> AssetResult<A::Handle> {
    let handle = assembler.create_mesh(name, &geometry.vertices, &geometry.topology)?;

    match geometry.aligned_uvs() {
        Some(uvs) if geometry.mode() == ConnectionMode::Faces => assembler.assign_uv(handle, uvs)?,
        Some(_) => log::debug!("{}: UVs ignored for an edge import", name),
        None if !geometry.uvs.is_empty() => {
            log::warn!(
                "{}: {} UVs for {} vertices, UVs ignored",
                name,
                geometry.uvs.len(),
                geometry.vertices.len()
            );
        }
        None => {}
    }

    let origin = assembler.recenter_origin(handle)?;
    log::debug!("{}: origin at {}", name, origin);

    let merged = assembler.merge_coincident_vertices(handle, settings.merge_distance)?;
    log::info!("{}: merged {} coincident vertices", name, merged);

    if settings.cleanup && geometry.mode() == ConnectionMode::Faces {
        let removed = assembler.remove_loose_edges(handle)?;
        log::info!("{}: removed {} loose edges", name, removed);
    }

    if settings.smooth {
        assembler.set_smooth_shading(handle, true)?;
    }

    if settings.center {
        assembler.clear_location(handle)?;
    }

    assembler.assign_material(handle, Material::for_format(geometry.profile.format()))?;

    Ok(handle)
}
