//! Resolver labels and the TOML application config.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Display labels used by the resolver.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Labels {
    /// Administrative unit when no municipality matches.
    pub city: String,
    pub urban_soil: String,
    pub protected_area: String,
    /// Zoning name for conservation soil without a zoning polygon.
    pub no_data: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            city: "Ciudad de México".to_string(),
            urban_soil: "Suelo Urbano".to_string(),
            protected_area: "ÁREA NATURAL PROTEGIDA".to_string(),
            no_data: "Información no disponible".to_string(),
        }
    }
}

/// Immutable settings handed to the resolver at construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolverConfig {
    pub labels: Labels,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub datasets: DatasetPaths,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Location of each dataset on disk. Any of them may be left out.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatasetPaths {
    pub city_boundary: Option<PathBuf>,
    pub municipalities: Option<PathBuf>,
    pub conservation_soil: Option<PathBuf>,
    pub protected_areas: Option<PathBuf>,
    pub zoning: Option<PathBuf>,
    pub internal_zoning: Option<PathBuf>,
    pub rules: Option<PathBuf>,
    /// Neighbouring states probed for points outside the city, in order.
    #[serde(default)]
    pub neighbors: Vec<NeighborPath>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NeighborPath {
    pub label: String,
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_listen() -> String {
    "0.0.0.0:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl AppConfig {
    /// Read a config file. Relative dataset paths are resolved against the
    /// directory holding the file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.datasets.resolve_relative(base);
        }
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            labels: self.labels.clone(),
        }
    }
}

impl DatasetPaths {
    fn resolve_relative(&mut self, base: &Path) {
        let join = |p: &mut Option<PathBuf>| {
            if let Some(path) = p {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        };
        join(&mut self.city_boundary);
        join(&mut self.municipalities);
        join(&mut self.conservation_soil);
        join(&mut self.protected_areas);
        join(&mut self.zoning);
        join(&mut self.internal_zoning);
        join(&mut self.rules);

        for neighbor in &mut self.neighbors {
            if neighbor.path.is_relative() {
                neighbor.path = base.join(&neighbor.path);
            }
        }
    }
}
