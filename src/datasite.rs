// Datasite folder layout and permission policies

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::sink::{SinkError, to_indented_json};

/// File name of the aggregate record in both tiers.
pub const OUTPUT_FILE_NAME: &str = "cpu_tracker.json";

/// Policy file persisted next to the data it scopes.
pub const PERMISSION_FILE_NAME: &str = "syftperm.json";

const PUBLIC_SUBDIR: &str = "app_pipelines/cpu_tracker";
const PRIVATE_SUBDIR: &str = "private/cpu_tracker";

/// Identities allowed to administer, read, and write a folder. Serialized as
/// the folder's policy file; enforcement is the datasite runtime's job, not
/// ours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionPolicy {
    pub admin: Vec<String>,
    pub read: Vec<String>,
    pub write: Vec<String>,
}

impl PermissionPolicy {
    /// Owner-only default: the owner administers, reads, and writes.
    pub fn owner_default(email: &str) -> Self {
        Self {
            admin: vec![email.to_string()],
            read: vec![email.to_string()],
            write: vec![email.to_string()],
        }
    }

    /// Grant read access to additional identities on top of the default.
    pub fn with_readers(mut self, readers: &[String]) -> Self {
        for reader in readers {
            if !self.read.contains(reader) {
                self.read.push(reader.clone());
            }
        }
        self
    }
}

/// Root path and owner identity of the datasite this job writes into.
/// Passed explicitly wherever it is needed; there is no ambient client.
#[derive(Debug, Clone)]
pub struct Datasite {
    root: PathBuf,
    email: String,
}

impl Datasite {
    pub fn new(root: impl Into<PathBuf>, email: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            email: email.into(),
        }
    }

    /// Create `<root>/app_pipelines/cpu_tracker/` with a policy readable by
    /// the owner plus the given aggregator identities. Idempotent: an
    /// existing folder is reused and its policy file rewritten.
    pub fn create_restricted_public_folder(
        &self,
        readers: &[String],
    ) -> Result<PathBuf, SinkError> {
        let policy = PermissionPolicy::owner_default(&self.email).with_readers(readers);
        self.create_scoped_folder(PUBLIC_SUBDIR, &policy)
    }

    /// Create `<root>/private/cpu_tracker/` readable by the owner only.
    pub fn create_private_folder(&self) -> Result<PathBuf, SinkError> {
        let policy = PermissionPolicy::owner_default(&self.email);
        self.create_scoped_folder(PRIVATE_SUBDIR, &policy)
    }

    fn create_scoped_folder(
        &self,
        subdir: &str,
        policy: &PermissionPolicy,
    ) -> Result<PathBuf, SinkError> {
        let folder = self.root.join(subdir);
        std::fs::create_dir_all(&folder).map_err(|source| SinkError::Io {
            path: folder.clone(),
            source,
        })?;
        write_policy(policy, &folder.join(PERMISSION_FILE_NAME))?;
        Ok(folder)
    }
}

fn write_policy(policy: &PermissionPolicy, path: &Path) -> Result<(), SinkError> {
    let buf = to_indented_json(policy).map_err(|source| SinkError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, buf).map_err(|source| SinkError::Io {
        path: path.to_path_buf(),
        source,
    })
}
