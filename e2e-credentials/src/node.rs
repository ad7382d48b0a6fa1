//! Description of the node under test, as handed to credential providers

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSpec {
    pub name: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    pub cluster: ClusterSpec,
}

/// Extra file a provider needs on the node before bootstrap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeFile {
    pub path: PathBuf,
    pub content: Vec<u8>,
    pub mode: u32,
}

impl NodeSpec {
    pub fn new<N, C, R>(name: N, cluster_name: C, region: R) -> Self
    where
        N: Into<String>,
        C: Into<String>,
        R: Into<String>,
    {
        Self {
            name: name.into(),
            cluster: ClusterSpec {
                name: cluster_name.into(),
                region: region.into(),
            },
        }
    }
}
