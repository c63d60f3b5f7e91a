//! Console core: paginated list state and per-resource view-models.
mod list;
mod resource;
mod state;
mod sys_job_results;
mod sys_jobs;
mod view_model;

pub use list::{FetchParams, ListViewModel};
pub use resource::PagedResource;
pub use state::{PageState, DEFAULT_PAGE_SIZE, FIRST_PAGE};
pub use sys_job_results::SysJobResultsViewModel;
pub use sys_jobs::SysJobsViewModel;
pub use view_model::PageView;
