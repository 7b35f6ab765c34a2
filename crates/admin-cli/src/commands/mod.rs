pub mod alcohols;
pub mod banners;
pub mod curations;
pub mod helps;
pub mod reference;
pub mod session;
pub mod tags;

use std::sync::{Arc, Weak};

use anyhow::{anyhow, bail};
use services::services::{
    form_state::{FormController, FormMode, Navigator, SubmitOutcome},
    notification::Notifier,
    reorder::{ReorderController, ReorderPersister, Reorderable},
    resource::{Resource, ResourceHooks},
};

use crate::support::{PrintNavigator, confirm, query_data, with_spinner};

/// Converts 1-based row numbers from the command line.
fn row_index(row: usize, len: usize) -> anyhow::Result<usize> {
    match row.checked_sub(1) {
        Some(index) if index < len => Ok(index),
        _ => Err(anyhow!("row {row} is out of range (1..={len})")),
    }
}

/// Runs one drag through the reorder controller and returns the saved order.
pub async fn move_row<T: Reorderable>(
    rows: Vec<T>,
    from: usize,
    to: usize,
    persister: &dyn ReorderPersister,
    notifier: &dyn Notifier,
) -> anyhow::Result<Vec<T>> {
    let from = row_index(from, rows.len())?;
    let to = row_index(to, rows.len())?;
    let mut controller = ReorderController::new(rows);
    controller.start_reorder();
    with_spinner("Saving order", controller.move_item(from, to, persister, notifier)).await?;
    controller.finish_reorder();
    Ok(controller.confirmed().to_vec())
}

/// Create-or-update through the form controller. `target` is `new` or an id.
pub async fn save<R: Resource>(
    hooks: ResourceHooks<R>,
    target: &str,
    apply: impl FnOnce(&mut R::Form),
) -> anyhow::Result<SubmitOutcome> {
    let navigator: Arc<dyn Navigator> = Arc::new(PrintNavigator);
    let mut form = FormController::new(hooks, target, Arc::downgrade(&navigator))?;
    if let FormMode::Edit(_) = form.mode() {
        query_data(with_spinner("Loading", form.load()).await)?;
    }
    form.edit(apply);
    Ok(with_spinner("Saving", form.submit()).await?)
}

pub async fn delete<R: Resource>(
    hooks: ResourceHooks<R>,
    id: i64,
    assume_yes: bool,
) -> anyhow::Result<()> {
    let mut form = FormController::new(hooks, &id.to_string(), Weak::<PrintNavigator>::new())?;
    let pending = form.request_delete()?;
    if !confirm(&format!("Delete {} {id}?", R::ENTITY), assume_yes)? {
        pending.cancel();
        bail!("cancelled");
    }
    form.confirm_delete(pending).await?;
    println!("Deleted {} {id}", R::ENTITY);
    Ok(())
}

pub fn report(outcome: SubmitOutcome, what: &str) {
    match outcome {
        SubmitOutcome::Created(id) => println!("Created {what} {id}"),
        SubmitOutcome::Updated(id) => println!("Updated {what} {id}"),
    }
}
