use serde::Serialize;

/// Search filters of one list endpoint.
///
/// Every field is optional; `merge_from` lets set fields of `other` overwrite
/// the current ones while unset fields keep what was there.
pub trait QueryFilters: Clone + Default + Serialize + Send + Sync + 'static {
    fn merge_from(&mut self, other: Self);

    fn is_empty(&self) -> bool;
}

/// Query string of a list request: pagination plus the flattened filters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams<F> {
    pub page_num: u32,
    pub page_size: u32,
    #[serde(flatten)]
    pub filters: F,
}

impl<F: QueryFilters> ListParams<F> {
    pub fn new(page_num: u32, page_size: u32, filters: F) -> Self {
        Self {
            page_num,
            page_size,
            filters,
        }
    }
}

/// Declares a filter struct with one `Option` per field and implements
/// [`QueryFilters`] for it.
macro_rules! query_filters {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $($field:ident: $ty:ty,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            $(
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )*
        }

        impl $crate::query::QueryFilters for $name {
            fn merge_from(&mut self, other: Self) {
                $(
                    if other.$field.is_some() {
                        self.$field = other.$field;
                    }
                )*
            }

            fn is_empty(&self) -> bool {
                true $(&& self.$field.is_none())*
            }
        }
    };
}

pub(crate) use query_filters;
