//! Hierarchical area reference data (province → city → district).
//!
//! The dataset is static, so it is fetched at most once per [`AreaDataCache`]
//! and shared by every form that needs it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use console_logging::{console_debug, console_error, console_info};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};

use crate::{request_json, Endpoints, Method, RequestOptions, Transport, TransportError};

/// Path of the dataset below the public prefix.
pub const AREA_DATA_PATH: &str = "area/area.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaItem {
    /// Area code.
    pub value: String,
    /// Display name.
    pub label: String,
    /// Tier: "1" province, "2" city, "3" district.
    #[serde(default)]
    pub level: String,
    /// Code of the enclosing area; meaningless on roots.
    #[serde(default)]
    pub parent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<AreaItem>>,
}

impl AreaItem {
    pub fn is_leaf(&self) -> bool {
        self.children.as_ref().map_or(true, Vec::is_empty)
    }

    fn child_items(&self) -> &[AreaItem] {
        self.children.as_deref().unwrap_or(&[])
    }
}

pub type AreaTree = Arc<Vec<AreaItem>>;

type AreaLoad = Shared<BoxFuture<'static, Result<AreaTree, TransportError>>>;

#[derive(Default)]
struct CacheCells {
    tree: Option<AreaTree>,
    pending: Option<AreaLoad>,
    /// Bumped by every clear so a load started earlier cannot write back.
    generation: u64,
}

/// Loads the area tree once and hands the same result to every caller.
///
/// Clones share one cache. Callers arriving while a load is in flight await
/// that same load instead of issuing another request.
#[derive(Clone)]
pub struct AreaDataCache {
    transport: Arc<dyn Transport>,
    url: String,
    cells: Arc<Mutex<CacheCells>>,
}

impl AreaDataCache {
    pub fn new(transport: Arc<dyn Transport>, endpoints: &Endpoints) -> Self {
        Self::with_url(transport, endpoints.public_url(AREA_DATA_PATH))
    }

    pub fn with_url(transport: Arc<dyn Transport>, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
            cells: Arc::new(Mutex::new(CacheCells::default())),
        }
    }

    /// Returns the full tree, loading it if nothing is cached yet.
    ///
    /// A failed load is reported to every caller awaiting it and leaves the
    /// cache empty, so the next call retries.
    pub async fn get_area_data(&self) -> Result<AreaTree, TransportError> {
        let load = {
            let mut cells = lock(&self.cells);
            if let Some(tree) = cells.tree.as_ref() {
                return Ok(Arc::clone(tree));
            }
            match cells.pending.as_ref() {
                Some(pending) => {
                    console_debug!("Joining in-flight area data load");
                    pending.clone()
                }
                None => {
                    let load = self.start_load(cells.generation);
                    cells.pending = Some(load.clone());
                    load
                }
            }
        };
        load.await
    }

    /// The cached tree, if a load has already succeeded.
    pub fn cached(&self) -> Option<AreaTree> {
        lock(&self.cells).tree.clone()
    }

    /// Forgets the cached tree and any in-flight load.
    pub fn clear_area_data_cache(&self) {
        let mut cells = lock(&self.cells);
        cells.tree = None;
        cells.pending = None;
        cells.generation = cells.generation.wrapping_add(1);
    }

    fn start_load(&self, generation: u64) -> AreaLoad {
        let transport = Arc::clone(&self.transport);
        let url = self.url.clone();
        let cells = Arc::clone(&self.cells);

        async move {
            console_info!("Loading area data from {}", url);
            let result = request_json::<Vec<AreaItem>>(
                transport.as_ref(),
                Method::Get,
                &url,
                RequestOptions::default(),
            )
            .await
            .map(Arc::new);

            let mut guard = lock(&cells);
            if guard.generation == generation {
                guard.pending = None;
                match &result {
                    Ok(tree) => guard.tree = Some(Arc::clone(tree)),
                    Err(err) => console_error!("Failed to load area data: {}", err),
                }
            }
            result
        }
        .boxed()
        .shared()
    }
}

fn lock(cells: &Mutex<CacheCells>) -> MutexGuard<'_, CacheCells> {
    cells.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Follows `codes` down the tree, one level per code.
///
/// Stops at the first code with no exact match and returns the matched prefix.
pub fn find_area_by_path<'a, S: AsRef<str>>(
    tree: &'a [AreaItem],
    codes: &[S],
) -> Vec<&'a AreaItem> {
    let mut matched = Vec::with_capacity(codes.len());
    let mut level = tree;
    for code in codes {
        let code = code.as_ref();
        match level.iter().find(|item| item.value == code) {
            Some(item) => {
                matched.push(item);
                level = item.child_items();
            }
            None => break,
        }
    }
    matched
}
