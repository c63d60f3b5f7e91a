use console_api::{
    ApiEnvelope, ListParams, PageData, QueryFilters, SysJob, SysJobResult, SysJobResultId,
    SysJobResultsApi, SysJobResultsQuery, SysJobsApi, SysJobsQuery, TransportError,
};

/// A backend collection that can be listed page by page and deleted from.
#[async_trait::async_trait]
pub trait PagedResource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;
    type Id: PartialEq + Send + Sync + ?Sized;
    type Filters: QueryFilters;

    async fn list(
        &self,
        params: &ListParams<Self::Filters>,
    ) -> Result<ApiEnvelope<PageData<Self::Item>>, TransportError>;

    async fn delete(&self, id: &Self::Id) -> Result<ApiEnvelope, TransportError>;

    fn item_id(item: &Self::Item) -> &Self::Id;
}

#[async_trait::async_trait]
impl PagedResource for SysJobsApi {
    type Item = SysJob;
    type Id = str;
    type Filters = SysJobsQuery;

    async fn list(
        &self,
        params: &ListParams<SysJobsQuery>,
    ) -> Result<ApiEnvelope<PageData<SysJob>>, TransportError> {
        SysJobsApi::list(self, params).await
    }

    async fn delete(&self, id: &str) -> Result<ApiEnvelope, TransportError> {
        SysJobsApi::delete(self, id).await
    }

    fn item_id(item: &SysJob) -> &str {
        &item.id
    }
}

#[async_trait::async_trait]
impl PagedResource for SysJobResultsApi {
    type Item = SysJobResult;
    type Id = SysJobResultId;
    type Filters = SysJobResultsQuery;

    async fn list(
        &self,
        params: &ListParams<SysJobResultsQuery>,
    ) -> Result<ApiEnvelope<PageData<SysJobResult>>, TransportError> {
        SysJobResultsApi::list(self, params).await
    }

    async fn delete(&self, id: &SysJobResultId) -> Result<ApiEnvelope, TransportError> {
        SysJobResultsApi::delete(self, *id).await
    }

    fn item_id(item: &SysJobResult) -> &SysJobResultId {
        &item.id
    }
}
