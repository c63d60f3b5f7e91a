use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::query::query_filters;
use crate::transport::to_json;
use crate::{
    request_json, ApiEnvelope, Endpoints, ListParams, Method, PageData, RequestOptions, Transport,
    TransportError,
};

pub type SysJobResultId = i64;

/// One recorded execution of a job. Written by the scheduler only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SysJobResult {
    pub id: SysJobResultId,
    pub job_id: String,
    pub status: String,
    pub error: String,
    pub start_time: String,
    pub end_time: String,
    /// Nanoseconds.
    pub duration: i64,
    pub retry_count: i32,
    pub created_at: String,
}

query_filters! {
    /// Filters accepted by `sysJobResults/list`.
    pub struct SysJobResultsQuery {
        id: SysJobResultId,
        job_id: String,
        status: String,
        error: String,
        start_time: String,
        end_time: String,
        duration: i64,
        retry_count: i32,
        created_at: String,
    }
}

#[derive(Clone)]
pub struct SysJobResultsApi {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
}

impl SysJobResultsApi {
    pub fn new(transport: Arc<dyn Transport>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    pub async fn list(
        &self,
        params: &ListParams<SysJobResultsQuery>,
    ) -> Result<ApiEnvelope<PageData<SysJobResult>>, TransportError> {
        let url = self.endpoints.api_url("sysJobResults/list");
        let options = RequestOptions::params(to_json(params)?);
        request_json(self.transport.as_ref(), Method::Get, &url, options).await
    }

    pub async fn delete(&self, id: SysJobResultId) -> Result<ApiEnvelope, TransportError> {
        let url = self.endpoints.api_url("sysJobResults/delete");
        let options = RequestOptions::data(json!({ "id": id }));
        request_json(self.transport.as_ref(), Method::Delete, &url, options).await
    }
}
