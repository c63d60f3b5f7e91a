use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::query::query_filters;
use crate::transport::to_json;
use crate::{
    request_json, ApiEnvelope, Endpoints, ExecutorList, ListParams, Method, PageData,
    RequestOptions, Transport, TransportError,
};

pub type SysJobId = String;

/// A scheduled job as the backend reports it. Durations are nanoseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SysJob {
    pub id: SysJobId,
    pub group: String,
    pub name: String,
    pub description: String,
    pub executor_name: String,
    pub execution_policy: i32,
    pub status: i32,
    pub cron_expression: String,
    pub parameters: String,
    pub blocking_policy: i32,
    pub timeout: i64,
    pub max_retry: i32,
    pub retry_interval: i64,
    pub parallel_num: i32,
    /// Instances currently running.
    pub running_count: i32,
    pub created_at: String,
    pub updated_at: String,
}

/// Body of a create call; the backend assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSysJob {
    pub group: String,
    pub name: String,
    pub description: String,
    pub executor_name: String,
    pub execution_policy: i32,
    pub status: i32,
    pub cron_expression: String,
    pub parameters: String,
    pub blocking_policy: i32,
    pub timeout: i64,
    pub max_retry: i32,
    pub retry_interval: i64,
    pub parallel_num: i32,
    pub running_count: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<SysJob> for NewSysJob {
    fn from(job: SysJob) -> Self {
        Self {
            group: job.group,
            name: job.name,
            description: job.description,
            executor_name: job.executor_name,
            execution_policy: job.execution_policy,
            status: job.status,
            cron_expression: job.cron_expression,
            parameters: job.parameters,
            blocking_policy: job.blocking_policy,
            timeout: job.timeout,
            max_retry: job.max_retry,
            retry_interval: job.retry_interval,
            parallel_num: job.parallel_num,
            running_count: job.running_count,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

/// Body of an edit call; only the fields that are set get sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SysJobPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<SysJobId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_policy: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cron_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking_policy: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retry: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_interval: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_num: Option<i32>,
}

impl SysJobPatch {
    pub fn for_job(id: impl Into<SysJobId>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

query_filters! {
    /// Filters accepted by `sysJobs/list`.
    pub struct SysJobsQuery {
        id: SysJobId,
        group: String,
        name: String,
        description: String,
        executor_name: String,
        execution_policy: i32,
        status: i32,
        cron_expression: String,
        parameters: String,
        blocking_policy: i32,
        timeout: i64,
        max_retry: i32,
        retry_interval: i64,
        parallel_num: i32,
        running_count: i32,
        created_at: String,
        updated_at: String,
    }
}

/// Endpoints of the `sysJobs` resource.
#[derive(Clone)]
pub struct SysJobsApi {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
}

impl SysJobsApi {
    pub fn new(transport: Arc<dyn Transport>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    pub async fn list(
        &self,
        params: &ListParams<SysJobsQuery>,
    ) -> Result<ApiEnvelope<PageData<SysJob>>, TransportError> {
        let options = RequestOptions::params(to_json(params)?);
        self.call(Method::Get, "sysJobs/list", options).await
    }

    pub async fn create(
        &self,
        job: &NewSysJob,
    ) -> Result<ApiEnvelope<Option<SysJob>>, TransportError> {
        let options = RequestOptions::data(to_json(job)?);
        self.call(Method::Post, "sysJobs/add", options).await
    }

    pub async fn update(
        &self,
        patch: &SysJobPatch,
    ) -> Result<ApiEnvelope<Option<SysJob>>, TransportError> {
        let options = RequestOptions::data(to_json(patch)?);
        self.call(Method::Put, "sysJobs/edit", options).await
    }

    pub async fn delete(&self, id: &str) -> Result<ApiEnvelope, TransportError> {
        let options = RequestOptions::data(json!({ "id": id }));
        self.call(Method::Delete, "sysJobs/delete", options).await
    }

    pub async fn get(&self, id: &str) -> Result<ApiEnvelope<SysJob>, TransportError> {
        let path = format!("sysJobs/{id}");
        self.call(Method::Get, &path, RequestOptions::default()).await
    }

    /// Names of the executors a job can be bound to.
    pub async fn executors(&self) -> Result<ApiEnvelope<ExecutorList>, TransportError> {
        self.call(Method::Get, "sysJobs/executors", RequestOptions::default())
            .await
    }

    pub async fn set_status(&self, id: &str, status: i32) -> Result<ApiEnvelope, TransportError> {
        let options = RequestOptions::params(json!({ "id": id, "status": status }));
        self.call(Method::Put, "sysJobs/setStatus", options).await
    }

    /// Triggers one run right away, independent of the cron schedule.
    pub async fn execute_now(&self, id: &str) -> Result<ApiEnvelope, TransportError> {
        let options = RequestOptions::params(json!({ "id": id }));
        self.call(Method::Post, "sysJobs/executeNow", options).await
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, TransportError> {
        let url = self.endpoints.api_url(path);
        request_json(self.transport.as_ref(), method, &url, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn job_deserializes_camel_case_and_tolerates_missing_fields() {
        let job: SysJob = serde_json::from_value(json!({
            "id": "j-1",
            "executorName": "http",
            "cronExpression": "0 */5 * * * *",
            "maxRetry": 3,
            "runningCount": 1
        }))
        .unwrap();
        assert_eq!(job.id, "j-1");
        assert_eq!(job.executor_name, "http");
        assert_eq!(job.max_retry, 3);
        assert_eq!(job.running_count, 1);
        assert_eq!(job.group, "");
    }

    #[test]
    fn patch_sends_only_set_fields() {
        let patch = SysJobPatch {
            cron_expression: Some("0 0 * * * *".into()),
            ..SysJobPatch::for_job("j-9")
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"id": "j-9", "cronExpression": "0 0 * * * *"})
        );
    }

    #[test]
    fn new_job_drops_the_id() {
        let job = SysJob {
            id: "j-1".into(),
            name: "cleanup".into(),
            ..SysJob::default()
        };
        let body = serde_json::to_value(NewSysJob::from(job)).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["name"], "cleanup");
    }
}
