//! Console API: transport, endpoint clients and the shared area reference data.
mod area;
mod config;
mod query;
mod sys_job_results;
mod sys_jobs;
mod transport;
mod types;

pub use area::{find_area_by_path, AreaDataCache, AreaItem, AreaTree, AREA_DATA_PATH};
pub use config::{Endpoints, TransportSettings};
pub use query::{ListParams, QueryFilters};
pub use sys_job_results::{SysJobResult, SysJobResultId, SysJobResultsApi, SysJobResultsQuery};
pub use sys_jobs::{NewSysJob, SysJob, SysJobId, SysJobPatch, SysJobsApi, SysJobsQuery};
pub use transport::{request_json, Method, ReqwestTransport, RequestOptions, Transport};
pub use types::{ApiEnvelope, ExecutorList, FailureKind, PageData, TransportError};
