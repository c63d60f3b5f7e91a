use console_api::SysJobResultsApi;

use crate::ListViewModel;

/// Execution history list. Results are read-only apart from deletion.
pub type SysJobResultsViewModel = ListViewModel<SysJobResultsApi>;
