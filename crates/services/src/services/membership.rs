//! Optimistic editing of an owner's member alcohols (curation contents,
//! tasting-tag connections).

use models::models::{alcohol::AlcoholSummary, page::IdResponse};
use tracing::warn;

use super::{api_error::ApiError, mutation::Mutation};

/// Variables for add/remove relationship mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipChange {
    pub owner_id: i64,
    pub alcohol_ids: Vec<i64>,
}

impl MembershipChange {
    pub fn owner(change: &MembershipChange) -> i64 {
        change.owner_id
    }
}

#[derive(Debug, Clone, PartialEq)]
enum PendingDelta {
    Add(Vec<AlcoholSummary>),
    Remove(Vec<i64>),
}

/// Confirmed members plus at most one unconfirmed delta.
#[derive(Debug, Clone)]
pub struct MembershipEditor {
    owner_id: i64,
    confirmed: Vec<AlcoholSummary>,
    pending: Option<PendingDelta>,
}

impl MembershipEditor {
    pub fn new(owner_id: i64, members: Vec<AlcoholSummary>) -> Self {
        Self {
            owner_id,
            confirmed: members,
            pending: None,
        }
    }

    pub fn owner_id(&self) -> i64 {
        self.owner_id
    }

    pub fn confirmed(&self) -> &[AlcoholSummary] {
        &self.confirmed
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Members as they should be rendered right now.
    pub fn displayed(&self) -> Vec<AlcoholSummary> {
        match &self.pending {
            None => self.confirmed.clone(),
            Some(PendingDelta::Add(added)) => self
                .confirmed
                .iter()
                .chain(added.iter())
                .cloned()
                .collect(),
            Some(PendingDelta::Remove(ids)) => self
                .confirmed
                .iter()
                .filter(|a| !ids.contains(&a.id))
                .cloned()
                .collect(),
        }
    }

    /// Stages the alcohols that are not members yet. Returns `None` when there
    /// is nothing to add or another change is still in flight.
    pub fn stage_add(&mut self, alcohols: Vec<AlcoholSummary>) -> Option<MembershipChange> {
        if self.pending.is_some() {
            return None;
        }
        let mut added: Vec<AlcoholSummary> = Vec::new();
        for alcohol in alcohols {
            let known = self.confirmed.iter().chain(added.iter()).any(|a| a.id == alcohol.id);
            if !known {
                added.push(alcohol);
            }
        }
        if added.is_empty() {
            return None;
        }
        let change = self.change(added.iter().map(|a| a.id).collect());
        self.pending = Some(PendingDelta::Add(added));
        Some(change)
    }

    pub fn stage_remove(&mut self, alcohol_ids: Vec<i64>) -> Option<MembershipChange> {
        if self.pending.is_some() {
            return None;
        }
        let ids: Vec<i64> = alcohol_ids
            .into_iter()
            .filter(|id| self.confirmed.iter().any(|a| a.id == *id))
            .collect();
        if ids.is_empty() {
            return None;
        }
        let change = self.change(ids.clone());
        self.pending = Some(PendingDelta::Remove(ids));
        Some(change)
    }

    /// Folds the staged delta into the confirmed members.
    pub fn confirm(&mut self) {
        match self.pending.take() {
            Some(PendingDelta::Add(added)) => self.confirmed.extend(added),
            Some(PendingDelta::Remove(ids)) => self.confirmed.retain(|a| !ids.contains(&a.id)),
            None => {}
        }
    }

    pub fn rollback(&mut self) {
        self.pending = None;
    }

    pub async fn add(
        &mut self,
        alcohols: Vec<AlcoholSummary>,
        mutation: &Mutation<MembershipChange, IdResponse>,
    ) -> Result<(), ApiError> {
        match self.stage_add(alcohols) {
            Some(change) => self.settle(change, mutation).await,
            None => Ok(()),
        }
    }

    pub async fn remove(
        &mut self,
        alcohol_ids: Vec<i64>,
        mutation: &Mutation<MembershipChange, IdResponse>,
    ) -> Result<(), ApiError> {
        match self.stage_remove(alcohol_ids) {
            Some(change) => self.settle(change, mutation).await,
            None => Ok(()),
        }
    }

    async fn settle(
        &mut self,
        change: MembershipChange,
        mutation: &Mutation<MembershipChange, IdResponse>,
    ) -> Result<(), ApiError> {
        match mutation.mutate_async(change).await {
            Ok(_) => {
                self.confirm();
                Ok(())
            }
            Err(error) => {
                warn!(owner = self.owner_id, code = %error.code, "membership change rolled back");
                self.rollback();
                Err(error)
            }
        }
    }

    fn change(&self, alcohol_ids: Vec<i64>) -> MembershipChange {
        MembershipChange {
            owner_id: self.owner_id,
            alcohol_ids,
        }
    }
}
