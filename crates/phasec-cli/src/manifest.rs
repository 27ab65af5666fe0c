//! `manifest.json`: the package-name/version/dependency-alias input to
//! spec.md §6.1's `DependencyManager`, plus the ordered file list the
//! driver compiles in (dependency order is given, per spec.md §1's
//! non-goal on cyclic-import resolution — this workspace never computes
//! that order itself).

use anyhow::{Context, Result};
use phasec_binder::DependencyManager;
use phasec_common::{Package, Version};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    #[serde(default)]
    pub build: Option<u32>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub variant: Option<String>,
}

impl From<ManifestVersion> for Version {
    fn from(v: ManifestVersion) -> Self {
        Version { major: v.major, minor: v.minor, patch: v.patch, build: v.build, channel: v.channel, variant: v.variant }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestDependency {
    pub alias: String,
    pub organization: String,
    pub name: String,
    pub version: ManifestVersion,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub organization: String,
    pub name: String,
    pub version: ManifestVersion,
    #[serde(default)]
    pub dependencies: Vec<ManifestDependency>,
    /// Source file stems, `main.ast.json`-relative, in the order the driver
    /// should run the pipeline over them.
    pub files: Vec<String>,
}

impl Manifest {
    pub fn load(project_dir: &Path) -> Result<Self> {
        let path = project_dir.join("manifest.json");
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("reading manifest at {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("parsing manifest at {}", path.display()))
    }

    #[must_use]
    pub fn self_package(&self) -> Package {
        Package::new(self.organization.clone(), self.name.clone(), self.version.clone().into())
    }

    #[must_use]
    pub fn dependency_manager(&self) -> DependencyManager {
        let mut dm = DependencyManager::new(self.self_package());
        for dep in &self.dependencies {
            dm.bind(dep.alias.clone(), Package::new(dep.organization.clone(), dep.name.clone(), dep.version.clone().into()));
        }
        dm
    }
}
