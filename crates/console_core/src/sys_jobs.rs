use std::ops::Deref;
use std::sync::Arc;

use console_api::{ApiEnvelope, NewSysJob, SysJob, SysJobPatch, SysJobsApi, TransportError};

use crate::ListViewModel;

/// Job list plus the single-record calls the job editor needs.
///
/// Creates and updates do not touch the local page; refetch to see them.
#[derive(Clone)]
pub struct SysJobsViewModel {
    list: ListViewModel<SysJobsApi>,
}

impl SysJobsViewModel {
    pub fn new(api: SysJobsApi) -> Self {
        Self::from_shared(Arc::new(api))
    }

    pub fn from_shared(api: Arc<SysJobsApi>) -> Self {
        Self {
            list: ListViewModel::from_shared(api),
        }
    }

    pub async fn create_data(
        &self,
        job: &NewSysJob,
    ) -> Result<ApiEnvelope<Option<SysJob>>, TransportError> {
        self.list.resource().create(job).await
    }

    pub async fn update_data(
        &self,
        patch: &SysJobPatch,
    ) -> Result<ApiEnvelope<Option<SysJob>>, TransportError> {
        self.list.resource().update(patch).await
    }

    pub async fn get_detail(&self, id: &str) -> Result<ApiEnvelope<SysJob>, TransportError> {
        self.list.resource().get(id).await
    }
}

impl Deref for SysJobsViewModel {
    type Target = ListViewModel<SysJobsApi>;

    fn deref(&self) -> &Self::Target {
        &self.list
    }
}
