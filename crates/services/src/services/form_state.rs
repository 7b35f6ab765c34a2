//! Create/edit form lifecycle for a single record.

use std::sync::Weak;

use models::models::page::IdResponse;
use thiserror::Error;
use tracing::{debug, info};

use super::{
    api_error::ApiError,
    image_upload::{ImageUploader, UploadFile},
    mutation::{Mutation, MutationOptions},
    query_cache::QueryResult,
    resource::{Resource, ResourceHooks, item_path},
};

/// Route parameter that opens an empty form.
pub const NEW_RECORD: &str = "new";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

impl FormMode {
    pub fn from_route_param(param: &str) -> Result<Self, FormError> {
        if param == NEW_RECORD {
            return Ok(Self::Create);
        }
        param
            .parse::<i64>()
            .map(Self::Edit)
            .map_err(|_| FormError::InvalidRouteParam(param.to_string()))
    }

    pub fn id(&self) -> Option<i64> {
        match self {
            Self::Create => None,
            Self::Edit(id) => Some(*id),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("'{0}' is neither \"new\" nor a record id")]
    InvalidRouteParam(String),
    #[error("record {0} was already created from this form")]
    AlreadyCreated(i64),
    #[error("only existing records can be deleted")]
    NothingToDelete,
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(i64),
    Updated(i64),
}

/// Proof that deletion was asked for. The delete request can only be sent by
/// handing this back to [`FormController::confirm_delete`].
#[derive(Debug)]
#[must_use]
pub struct PendingDelete {
    id: i64,
}

impl PendingDelete {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn cancel(self) {
        debug!(id = self.id, "delete cancelled");
    }
}

pub struct FormController<R: Resource> {
    mode: FormMode,
    hooks: ResourceHooks<R>,
    navigator: Weak<dyn Navigator>,
    form: R::Form,
    hydrated_for: Option<i64>,
    created: Option<i64>,
    create: Mutation<R::Form, IdResponse>,
    update: Mutation<(i64, R::Form), IdResponse>,
    delete: Mutation<i64, IdResponse>,
}

impl<R: Resource> FormController<R> {
    pub fn new(
        hooks: ResourceHooks<R>,
        route_param: &str,
        navigator: Weak<dyn Navigator>,
    ) -> Result<Self, FormError> {
        let mode = FormMode::from_route_param(route_param)?;
        Ok(Self {
            mode,
            create: hooks.create(MutationOptions::new().success_message("등록되었습니다.")),
            update: hooks.update(MutationOptions::new().success_message("수정되었습니다.")),
            delete: hooks.delete(MutationOptions::new().success_message("삭제되었습니다.")),
            hooks,
            navigator,
            form: R::Form::default(),
            hydrated_for: None,
            created: None,
        })
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn form(&self) -> &R::Form {
        &self.form
    }

    pub fn edit(&mut self, change: impl FnOnce(&mut R::Form)) {
        change(&mut self.form);
    }

    pub fn is_submitting(&self) -> bool {
        self.create.is_pending() || self.update.is_pending() || self.delete.is_pending()
    }

    /// Fetches the record in edit mode. Form defaults are taken from the
    /// first successful load only, so later refetches keep user edits.
    pub async fn load(&mut self) -> QueryResult<R::Detail> {
        let id = self.mode.id();
        let result = self.hooks.detail(id).await;
        if let (Some(id), Some(detail)) = (id, result.data()) {
            if self.hydrated_for != Some(id) {
                self.form = R::form_defaults(detail);
                self.hydrated_for = Some(id);
            }
        }
        result
    }

    pub async fn submit(&mut self) -> Result<SubmitOutcome, FormError> {
        match self.mode {
            FormMode::Create => {
                if let Some(id) = self.created {
                    return Err(FormError::AlreadyCreated(id));
                }
                let created = self.create.mutate_async(self.form.clone()).await?;
                self.created = Some(created.target_id);
                info!(entity = %R::ENTITY, id = created.target_id, "record created");
                self.navigate(&item_path(R::PATH, created.target_id));
                Ok(SubmitOutcome::Created(created.target_id))
            }
            FormMode::Edit(id) => {
                self.update.mutate_async((id, self.form.clone())).await?;
                Ok(SubmitOutcome::Updated(id))
            }
        }
    }

    pub fn request_delete(&self) -> Result<PendingDelete, FormError> {
        self.mode
            .id()
            .map(|id| PendingDelete { id })
            .ok_or(FormError::NothingToDelete)
    }

    /// Deletes and returns to the list.
    pub async fn confirm_delete(&mut self, pending: PendingDelete) -> Result<IdResponse, FormError> {
        let deleted = self.delete.mutate_async(pending.id).await?;
        self.navigate(R::PATH);
        Ok(deleted)
    }

    /// Uploads `file` and, when a URL comes back, stores it with `set`.
    /// Returns whether the form changed.
    pub async fn attach_image(
        &mut self,
        uploader: &dyn ImageUploader,
        file: UploadFile,
        set: impl FnOnce(&mut R::Form, String),
    ) -> Result<bool, FormError> {
        match uploader.upload(file).await? {
            Some(url) => {
                set(&mut self.form, url);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn navigate(&self, path: &str) {
        if let Some(navigator) = self.navigator.upgrade() {
            navigator.navigate(path);
        }
    }
}
