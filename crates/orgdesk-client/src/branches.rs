//! Branch management: listing, deletion and editing

use crate::{api_client::ApiClient, error::ApiResult, notice::Notice};
use orgdesk_core::{Branch, BranchDraft};
use tracing::{error, info};

/// Prompt shown before a branch is deleted
pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this branch?";

/// Thin wrapper over the branch endpoints
#[derive(Debug, Clone)]
pub struct BranchListManager {
    client: ApiClient,
}

impl BranchListManager {
    /// Create a manager over the given backend
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch all branches
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status or an
    /// unreadable body.
    pub async fn list(&self) -> ApiResult<Vec<Branch>> {
        self.client.branches().await
    }

    /// Delete a branch on the backend
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client.delete_branch(id).await
    }

    /// Create a branch
    ///
    /// # Errors
    ///
    /// Returns a validation error for an incomplete draft, otherwise any
    /// backend failure.
    pub async fn create(&self, draft: &BranchDraft) -> ApiResult<Branch> {
        draft.check()?;
        self.client.create_branch(draft).await
    }

    /// Update a branch
    ///
    /// # Errors
    ///
    /// Returns a validation error for an incomplete draft, otherwise any
    /// backend failure.
    pub async fn update(&self, id: &str, draft: &BranchDraft) -> ApiResult<Branch> {
        draft.check()?;
        self.client.update_branch(id, draft).await
    }
}

/// In-memory branch list for the branch management page
///
/// Deletions are applied locally without re-fetching. Another client deleting
/// or editing the same branch is not detected; a stale delete just gets the
/// backend's failure response.
#[derive(Debug)]
pub struct BranchList {
    manager: BranchListManager,
    branches: Vec<Branch>,
}

impl BranchList {
    /// Create an empty list
    #[must_use]
    pub const fn new(manager: BranchListManager) -> Self {
        Self {
            manager,
            branches: Vec::new(),
        }
    }

    /// Create the list and run the initial fetch
    pub async fn activate(manager: BranchListManager) -> (Self, Option<Notice>) {
        let mut list = Self::new(manager);
        let notice = list.refresh().await;
        (list, notice)
    }

    /// Branches currently shown
    #[must_use]
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// Look up a shown branch by identifier
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Branch> {
        self.branches.iter().find(|b| b.id == id)
    }

    /// Replace the list with the backend's current contents
    ///
    /// On failure the list is emptied and a notice is returned.
    pub async fn refresh(&mut self) -> Option<Notice> {
        match self.manager.list().await {
            Ok(branches) => {
                self.branches = branches;
                None
            }
            Err(err) => {
                error!(error = %err, "Error fetching branches");
                self.branches.clear();
                Some(Notice::fetch_failed("branches", &err))
            }
        }
    }

    /// Delete a branch the user has already confirmed
    ///
    /// On success exactly the matching entry is dropped from the local list.
    /// On failure the list is left untouched.
    pub async fn delete(&mut self, id: &str) -> Notice {
        match self.manager.delete(id).await {
            Ok(()) => {
                self.branches.retain(|b| b.id != id);
                info!(id, remaining = self.branches.len(), "Branch deleted");
                Notice::success("Branch deleted successfully")
            }
            Err(err) => {
                error!(id, error = %err, "Error deleting branch");
                Notice::delete_failed("branch", &err)
            }
        }
    }

    /// Create a branch and append it to the local list
    pub async fn create(&mut self, draft: &BranchDraft) -> Notice {
        match self.manager.create(draft).await {
            Ok(branch) => {
                info!(id = %branch.id, "Branch created");
                self.branches.push(branch);
                Notice::success("Branch added successfully")
            }
            Err(err) => {
                error!(error = %err, "Error creating branch");
                Notice::error(format!("Failed to add branch: {err}"))
            }
        }
    }

    /// Update a branch and replace its local entry with the stored record
    pub async fn update(&mut self, id: &str, draft: &BranchDraft) -> Notice {
        match self.manager.update(id, draft).await {
            Ok(updated) => {
                info!(id, "Branch updated");
                if let Some(slot) = self.branches.iter_mut().find(|b| b.id == id) {
                    *slot = updated;
                }
                Notice::success("Branch updated successfully")
            }
            Err(err) => {
                error!(id, error = %err, "Error updating branch");
                Notice::error(format!("Failed to update branch: {err}"))
            }
        }
    }
}
