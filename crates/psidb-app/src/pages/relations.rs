//! Screens that relate existing entries by id

use psidb_backend::{Backend, BackendCommand};
use psidb_core::prelude::*;
use psidb_core::{Action, Severity};

use super::{PageContext, SubmitOutcome};
use crate::editor::{IdListEditor, KeyValueFormEditor};
use crate::ports::NotificationPort;
use crate::serializer;
use crate::validation::IdPolicy;

pub const NO_DATA_IDS_WARNING: &str = "Warning: No data IDs specified";
pub const ONE_TRANSFORM_ID_MSG: &str = "Error: Exactly one transform ID must be specified";

/// Chain existing transforms into a new one
#[derive(Debug, Clone, Default)]
pub struct ChainPage {
    pub transform_ids: IdListEditor,
    pub metadata: KeyValueFormEditor,
}

impl ChainPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn submit<B: Backend, N: NotificationPort>(
        &self,
        ctx: &PageContext<'_, B, N>,
    ) -> SubmitOutcome {
        if !ctx.require_database().await {
            return SubmitOutcome::DatabaseUnavailable;
        }

        let validator = ctx.validator();
        let ids = validator
            .ids(self.transform_ids.list(), &IdPolicy::required())
            .await;
        let metadata = validator.metadata(&self.metadata.snapshot()).await;

        if !(ids.accepted && metadata.accepted) {
            debug!("chain aborted by validation");
            return SubmitOutcome::Aborted;
        }

        let command = BackendCommand::Chain {
            transform_ids: ids.items,
            meta_data: serializer::metadata(&metadata.items),
        };
        SubmitOutcome::Dispatched(ctx.dispatcher().submit(command).await)
    }
}

/// Apply one transform to a set of data entries
#[derive(Debug, Clone, Default)]
pub struct ApplyPage {
    pub transform_ids: IdListEditor,
    pub data_ids: IdListEditor,
    pub metadata: KeyValueFormEditor,
}

impl ApplyPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn submit<B: Backend, N: NotificationPort>(
        &self,
        ctx: &PageContext<'_, B, N>,
    ) -> SubmitOutcome {
        if !ctx.require_database().await {
            return SubmitOutcome::DatabaseUnavailable;
        }

        let validator = ctx.validator();
        let transform = validator
            .ids(self.transform_ids.list(), &IdPolicy::required())
            .await;
        let data = validator
            .ids(
                self.data_ids.list(),
                &IdPolicy::confirm_empty(NO_DATA_IDS_WARNING),
            )
            .await;
        let metadata = validator.metadata(&self.metadata.snapshot()).await;

        if !(transform.accepted && data.accepted && metadata.accepted) {
            debug!("apply aborted by validation");
            return SubmitOutcome::Aborted;
        }

        let transform_id = match transform.items.as_slice() {
            [id] => *id,
            other => {
                debug!("apply aborted: {} transform ids", other.len());
                ctx.notifier
                    .notify(Severity::Error, ONE_TRANSFORM_ID_MSG)
                    .await;
                return SubmitOutcome::Aborted;
            }
        };

        let command = BackendCommand::Apply {
            transform_id,
            data_ids: data.items,
            meta_data: serializer::metadata(&metadata.items),
        };
        SubmitOutcome::Dispatched(ctx.dispatcher().submit(command).await)
    }
}

/// Link data entries into a new dataset
#[derive(Debug, Clone, Default)]
pub struct LinkPage {
    pub data_ids: IdListEditor,
    pub metadata: KeyValueFormEditor,
}

impl LinkPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn submit<B: Backend, N: NotificationPort>(
        &self,
        ctx: &PageContext<'_, B, N>,
    ) -> SubmitOutcome {
        if !ctx.require_database().await {
            return SubmitOutcome::DatabaseUnavailable;
        }

        let validator = ctx.validator();
        let ids = validator
            .ids(self.data_ids.list(), &IdPolicy::required())
            .await;
        let metadata = validator.metadata(&self.metadata.snapshot()).await;

        if !(ids.accepted && metadata.accepted) {
            debug!("link aborted by validation");
            return SubmitOutcome::Aborted;
        }

        let command = BackendCommand::Link {
            data_ids: ids.items,
            meta_data: serializer::metadata(&metadata.items),
        };
        SubmitOutcome::Dispatched(ctx.dispatcher().submit(command).await)
    }
}

/// Create an arbitrary connection between data and transforms
///
/// All four id lists are optional; the backend decides what makes sense
/// for the chosen action.
#[derive(Debug, Clone, Default)]
pub struct ConnectPage {
    pub action: Action,
    pub in_data_ids: IdListEditor,
    pub out_data_ids: IdListEditor,
    pub in_transform_ids: IdListEditor,
    pub out_transform_ids: IdListEditor,
    pub metadata: KeyValueFormEditor,
}

impl ConnectPage {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            ..Self::default()
        }
    }

    pub async fn submit<B: Backend, N: NotificationPort>(
        &self,
        ctx: &PageContext<'_, B, N>,
    ) -> SubmitOutcome {
        if !ctx.require_database().await {
            return SubmitOutcome::DatabaseUnavailable;
        }

        let validator = ctx.validator();
        let optional = IdPolicy::optional();
        let in_data = validator.ids(self.in_data_ids.list(), &optional).await;
        let out_data = validator.ids(self.out_data_ids.list(), &optional).await;
        let in_transform = validator
            .ids(self.in_transform_ids.list(), &optional)
            .await;
        let out_transform = validator
            .ids(self.out_transform_ids.list(), &optional)
            .await;
        let metadata = validator.metadata(&self.metadata.snapshot()).await;

        let accepted = in_data.accepted
            && out_data.accepted
            && in_transform.accepted
            && out_transform.accepted
            && metadata.accepted;
        if !accepted {
            debug!("connect aborted by validation");
            return SubmitOutcome::Aborted;
        }

        let command = BackendCommand::Connect {
            action: self.action,
            in_data_ids: in_data.items,
            out_data_ids: out_data.items,
            in_transform_ids: in_transform.items,
            out_transform_ids: out_transform.items,
            meta_data: serializer::metadata(&metadata.items),
        };
        SubmitOutcome::Dispatched(ctx.dispatcher().submit(command).await)
    }
}
