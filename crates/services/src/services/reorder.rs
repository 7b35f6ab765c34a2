//! Drag-to-reorder for lists with a persisted integer order (banners,
//! curations).
//!
//! The controller keeps the last server-confirmed list and, while a drag is
//! being persisted, a pending list plus the plan that produced it. Commit
//! promotes the pending list; any failure drops it, which is the rollback.

use async_trait::async_trait;
use models::models::page::IdResponse;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use super::{
    api_error::ApiError,
    mutation::Mutation,
    notification::{Notifier, Toast},
    query_cache::QueryCache,
    query_key::QueryKey,
};

pub trait Reorderable: Clone + Send + Sync {
    fn id(&self) -> i64;
    fn order(&self) -> i32;
    fn set_order(&mut self, order: i32);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderChange {
    pub id: i64,
    pub order: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReorderPlan {
    pub changes: Vec<OrderChange>,
}

impl ReorderPlan {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ReorderError {
    #[error("reordering is not enabled")]
    NotEditing,
    #[error("position {index} is out of bounds for {len} rows")]
    OutOfBounds { index: usize, len: usize },
    #[error("a previous reorder is still being saved")]
    Busy,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Moves `items[from]` to position `to` and reassigns orders inside the
/// affected range only.
///
/// The range keeps the order values it already owned; they are handed out
/// again in the new sequence. Duplicate values are bumped so the result is
/// strictly increasing, and the range grows past its ends while a neighbour
/// would tie with or overtake a reassigned slot.
pub fn plan_move<T: Reorderable>(
    items: &[T],
    from: usize,
    to: usize,
) -> Result<(Vec<T>, ReorderPlan), ReorderError> {
    let len = items.len();
    for index in [from, to] {
        if index >= len {
            return Err(ReorderError::OutOfBounds { index, len });
        }
    }

    let mut moved = items.to_vec();
    if from == to {
        return Ok((moved, ReorderPlan::default()));
    }
    let item = moved.remove(from);
    moved.insert(to, item);

    let (mut lo, mut hi) = (from.min(to), from.max(to));
    let slots = loop {
        let slots = increasing_slots(&items[lo..=hi]);
        if lo > 0 && items[lo - 1].order() >= slots[0] {
            lo -= 1;
        } else if hi + 1 < len && items[hi + 1].order() <= slots[slots.len() - 1] {
            hi += 1;
        } else {
            break slots;
        }
    };

    let mut plan = ReorderPlan::default();
    for (row, slot) in moved[lo..=hi].iter_mut().zip(slots) {
        if row.order() != slot {
            row.set_order(slot);
            plan.changes.push(OrderChange {
                id: row.id(),
                order: slot,
            });
        }
    }
    Ok((moved, plan))
}

fn increasing_slots<T: Reorderable>(rows: &[T]) -> Vec<i32> {
    let mut slots: Vec<i32> = rows.iter().map(Reorderable::order).collect();
    slots.sort_unstable();
    for i in 1..slots.len() {
        if slots[i] <= slots[i - 1] {
            slots[i] = slots[i - 1] + 1;
        }
    }
    slots
}

/// Sends a single order change to the backend.
#[async_trait]
pub trait ReorderPersister: Send + Sync {
    async fn persist(&self, change: OrderChange) -> Result<(), ApiError>;

    /// Called once a commit finishes, whether it succeeded or not.
    async fn settled(&self) {}
}

/// Persists through an order mutation and refreshes the entity's lists when
/// the commit settles.
pub struct MutationPersister {
    mutation: Mutation<OrderChange, IdResponse>,
    cache: QueryCache,
    lists: QueryKey,
}

impl MutationPersister {
    pub fn new(mutation: Mutation<OrderChange, IdResponse>, cache: QueryCache, lists: QueryKey) -> Self {
        Self {
            mutation,
            cache,
            lists,
        }
    }
}

#[async_trait]
impl ReorderPersister for MutationPersister {
    async fn persist(&self, change: OrderChange) -> Result<(), ApiError> {
        self.mutation.mutate_async(change).await.map(|_| ())
    }

    async fn settled(&self) {
        self.cache.invalidate(&self.lists).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderMode {
    Viewing,
    ReorderEditing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowClick {
    Navigate(i64),
    Ignored,
}

#[derive(Debug, Clone)]
struct PendingReorder<T> {
    items: Vec<T>,
    plan: ReorderPlan,
}

#[derive(Debug, Clone)]
pub struct ReorderController<T> {
    mode: ReorderMode,
    confirmed: Vec<T>,
    pending: Option<PendingReorder<T>>,
}

impl<T: Reorderable> ReorderController<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            mode: ReorderMode::Viewing,
            confirmed: items,
            pending: None,
        }
    }

    pub fn mode(&self) -> ReorderMode {
        self.mode
    }

    pub fn start_reorder(&mut self) {
        self.mode = ReorderMode::ReorderEditing;
    }

    /// Leaves reorder mode. Every drag was already persisted on its own.
    pub fn finish_reorder(&mut self) {
        self.mode = ReorderMode::Viewing;
    }

    pub fn row_click(&self, index: usize) -> RowClick {
        match (self.mode, self.displayed().get(index)) {
            (ReorderMode::Viewing, Some(row)) => RowClick::Navigate(row.id()),
            _ => RowClick::Ignored,
        }
    }

    /// The pending list while a drag is unconfirmed, otherwise the confirmed one.
    pub fn displayed(&self) -> &[T] {
        self.pending
            .as_ref()
            .map_or(self.confirmed.as_slice(), |p| p.items.as_slice())
    }

    pub fn confirmed(&self) -> &[T] {
        &self.confirmed
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Replaces the confirmed list with freshly fetched server data.
    pub fn sync(&mut self, items: Vec<T>) {
        if self.pending.is_none() {
            self.confirmed = items;
        }
    }

    /// Applies a drag locally and returns the plan that still has to be
    /// persisted with [`commit`](Self::commit).
    pub fn drag(&mut self, from: usize, to: usize) -> Result<ReorderPlan, ReorderError> {
        if self.mode != ReorderMode::ReorderEditing {
            return Err(ReorderError::NotEditing);
        }
        if self.pending.is_some() {
            return Err(ReorderError::Busy);
        }
        let (items, plan) = plan_move(&self.confirmed, from, to)?;
        if !plan.is_empty() {
            self.pending = Some(PendingReorder {
                items,
                plan: plan.clone(),
            });
        }
        Ok(plan)
    }

    pub async fn commit(
        &mut self,
        persister: &dyn ReorderPersister,
        notifier: &dyn Notifier,
    ) -> Result<(), ReorderError> {
        let Some(pending) = self.pending.clone() else {
            return Ok(());
        };

        for change in &pending.plan.changes {
            if let Err(error) = persister.persist(*change).await {
                warn!(id = change.id, code = %error.code, "reorder failed, rolling back");
                self.pending = None;
                notifier.show_toast(Toast::error(error.message.clone()));
                persister.settled().await;
                return Err(error.into());
            }
        }

        info!(changes = pending.plan.len(), "reorder saved");
        self.confirmed = pending.items;
        self.pending = None;
        persister.settled().await;
        Ok(())
    }

    pub async fn move_item(
        &mut self,
        from: usize,
        to: usize,
        persister: &dyn ReorderPersister,
        notifier: &dyn Notifier,
    ) -> Result<(), ReorderError> {
        self.drag(from, to)?;
        self.commit(persister, notifier).await
    }
}
