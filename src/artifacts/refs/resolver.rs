use crate::areas::project::Project;
use crate::artifacts::refs::ref_name::{
    self, LOCAL_NAMESPACE, REMOTE_NAMESPACE, RemoteRef, local_short_name,
};
use crate::errors::{EngineError, Result};
use crate::store::ObjectId;
use derive_new::new;
use std::collections::BTreeSet;

/// Local and remote branch names, listed separately. Remote names are in
/// short form (`origin/main`); symbolic default-branch pointers are
/// excluded from both lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchList {
    pub local: Vec<String>,
    pub remote: Vec<String>,
}

impl BranchList {
    /// All names, locals first, for "known branches" error messages.
    pub fn all(&self) -> Vec<String> {
        self.local.iter().chain(self.remote.iter()).cloned().collect()
    }
}

/// Maps human-readable branch/ref strings to commit ids and enumerates
/// branches. Every operation that takes a branch name routes through this.
#[derive(Debug, new)]
pub struct RefResolver<'p> {
    project: &'p Project,
}

impl RefResolver<'_> {
    /// Resolve a ref string to a commit id.
    ///
    /// Resolution order: full remote form when the prefix before the first
    /// slash is a known remote, then local form, then literal
    /// interpretation, then abbreviated-commit-id expansion. The first
    /// success wins; exhaustion raises [`EngineError::RefNotFound`] listing
    /// the currently known branches.
    pub async fn resolve(&self, name: &str) -> Result<ObjectId> {
        if name.contains('/')
            && let Some(remote_ref) = RemoteRef::parse(name)
            && self.known_remotes().await?.contains(remote_ref.remote())
            && let Some(id) = self.try_resolve(&remote_ref.to_full()).await?
        {
            return Ok(id);
        }

        if let Some(id) = self.try_resolve(&format!("{LOCAL_NAMESPACE}{name}")).await? {
            return Ok(id);
        }

        if let Some(id) = self.try_resolve(name).await? {
            return Ok(id);
        }

        if ObjectId::looks_like_abbreviation(name) {
            let expanded = self
                .project
                .store()
                .expand_object_id(name)
                .await
                .map_err(|e| EngineError::store("expand object id", name, e))?;
            if let Some(id) = expanded {
                return Ok(id);
            }
        }

        tracing::debug!(name, "ref resolution exhausted all strategies");
        Err(EngineError::RefNotFound {
            name: name.to_string(),
            known: self.list_branches().await?.all(),
        })
    }

    async fn try_resolve(&self, full: &str) -> Result<Option<ObjectId>> {
        self.project
            .store()
            .resolve_ref(full)
            .await
            .map_err(|e| EngineError::store("resolve ref", full, e))
    }

    /// Local and remote branch names, with symbolic default-branch
    /// pointers filtered out.
    pub async fn list_branches(&self) -> Result<BranchList> {
        let refs = self.list_refs().await?;
        let mut branches = BranchList::default();

        for full in &refs {
            if ref_name::is_symbolic_head_path(full) {
                continue;
            }

            if let Some(local) = local_short_name(full) {
                branches.local.push(local.to_string());
            } else if let Some(rest) = full.strip_prefix(REMOTE_NAMESPACE)
                && let Some(remote_ref) = RemoteRef::parse(rest)
            {
                branches.remote.push(remote_ref.to_short());
            }
        }

        branches.local.sort();
        branches.remote.sort();
        Ok(branches)
    }

    /// Names of remotes that currently have tracking refs.
    pub async fn known_remotes(&self) -> Result<BTreeSet<String>> {
        let refs = self.list_refs().await?;
        Ok(refs
            .iter()
            .filter_map(|full| full.strip_prefix(REMOTE_NAMESPACE))
            .filter_map(|rest| rest.split_once('/'))
            .map(|(remote, _)| remote.to_string())
            .collect())
    }

    async fn list_refs(&self) -> Result<Vec<String>> {
        self.project
            .store()
            .list_refs()
            .await
            .map_err(|e| EngineError::store("list refs", self.project.id().to_string(), e))
    }
}
