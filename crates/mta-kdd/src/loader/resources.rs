//! Remote resources and their local cache paths

use std::path::{Path, PathBuf};

/// Public mirror of the MTA-KDD-19 feature sets
pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/IvanLetteri/MTA-KDD-19/master/";

/// Cache directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Key naming one of the two datasets
///
/// The keys are cross-labelled relative to the files they fetch: `Mta`
/// downloads the legitimate-traffic file and `Leg` the malware file. Cache
/// file names follow the key, not the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    Mta,
    Leg,
}

impl ResourceKey {
    /// Keys in load order
    pub const ALL: [ResourceKey; 2] = [ResourceKey::Mta, ResourceKey::Leg];

    pub fn token(&self) -> &'static str {
        match self {
            ResourceKey::Mta => "mta",
            ResourceKey::Leg => "leg",
        }
    }

    pub fn capitalized(&self) -> &'static str {
        match self {
            ResourceKey::Mta => "Mta",
            ResourceKey::Leg => "Leg",
        }
    }

    /// File name on the remote mirror
    pub fn remote_file_name(&self) -> &'static str {
        match self {
            ResourceKey::Mta => "datasetLegitimate33featues.csv",
            ResourceKey::Leg => "datasetMalware33featues.csv",
        }
    }

    /// File name inside the data directory
    pub fn cache_file_name(&self) -> String {
        format!("dataset{}33featues.csv", self.capitalized())
    }
}

impl std::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// A remote CSV and where it is cached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResource {
    pub key: ResourceKey,
    pub url: String,
    pub local_path: PathBuf,
}

impl RemoteResource {
    /// `base_url` is concatenated as-is, so it needs its trailing slash
    pub fn new(key: ResourceKey, base_url: &str, data_dir: &Path) -> Self {
        Self {
            key,
            url: format!("{}{}", base_url, key.remote_file_name()),
            local_path: data_dir.join(key.cache_file_name()),
        }
    }

    /// Both resources in load order
    pub fn resolve_all(base_url: &str, data_dir: &Path) -> [RemoteResource; 2] {
        ResourceKey::ALL.map(|key| RemoteResource::new(key, base_url, data_dir))
    }
}
