//! Per-chunk mesh slots: version tracking and atomic installation of
//! finished builds.

use crate::error::MeshError;
use crate::mesh_data::MeshData;
use crate::render_mesh::{CollisionMesh, RenderMesh};

/// Version bookkeeping for one chunk's installed mesh.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkMeshState {
    /// Chunk version the installed mesh was built from, `None` before the
    /// first successful install.
    pub meshed_version: Option<u64>,
    /// Whether a build for this chunk is in flight.
    pub remesh_pending: bool,
}

impl ChunkMeshState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the installed mesh does not reflect `current_version`.
    pub fn is_stale(&self, current_version: u64) -> bool {
        self.meshed_version != Some(current_version)
    }

    /// Returns `true` if a build should be submitted for `current_version`.
    pub fn needs_remesh(&self, current_version: u64) -> bool {
        self.is_stale(current_version) && !self.remesh_pending
    }
}

/// What [`MeshSlot::install`] did with a successful build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Both meshes were replaced.
    Installed,
    /// The build was older than the installed mesh and was dropped.
    Stale,
}

/// Holds the live render and collision meshes of one chunk.
///
/// Both meshes are always replaced together from the same [`MeshData`], so
/// they never disagree.
#[derive(Clone, Debug, Default)]
pub struct MeshSlot {
    render: Option<RenderMesh>,
    collision: Option<CollisionMesh>,
    state: ChunkMeshState,
}

impl MeshSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&self) -> Option<&RenderMesh> {
        self.render.as_ref()
    }

    pub fn collision(&self) -> Option<&CollisionMesh> {
        self.collision.as_ref()
    }

    pub fn state(&self) -> &ChunkMeshState {
        &self.state
    }

    /// Records that a build for this chunk has been submitted.
    pub fn mark_pending(&mut self) {
        self.state.remesh_pending = true;
    }

    /// Installs the result of a build made from chunk `version`.
    ///
    /// A failed or invalid build leaves the current meshes untouched and
    /// returns the error. A successful build older than the installed one is
    /// dropped. Results older than the installed mesh leave the pending flag
    /// alone, since a newer build may still be running.
    pub fn install(
        &mut self,
        version: u64,
        result: Result<MeshData, MeshError>,
    ) -> Result<InstallOutcome, MeshError> {
        let superseded = self
            .state
            .meshed_version
            .is_some_and(|installed| installed > version);
        if !superseded {
            self.state.remesh_pending = false;
        }

        let data = match result.and_then(|data| data.validate().map(|()| data)) {
            Ok(data) => data,
            Err(err) => {
                tracing::warn!(version, error = %err, "mesh build failed, keeping previous mesh");
                return Err(err);
            }
        };

        if superseded {
            tracing::debug!(version, installed = ?self.state.meshed_version, "dropping stale mesh");
            return Ok(InstallOutcome::Stale);
        }

        self.render = Some(RenderMesh::from(&data));
        self.collision = Some(CollisionMesh::from(&data));
        self.state.meshed_version = Some(version);
        Ok(InstallOutcome::Installed)
    }
}
