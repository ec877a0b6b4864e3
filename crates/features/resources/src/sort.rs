//! `sort` / `order` parameters of linked data lists.

use crate::error::ResourcesError;
use pdl_domain::resource::{ResourceDefinition, SortOrder};
use pdl_kernel::params::QueryParams;

/// Validated sort request; `None` means the resource default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortRequest {
    pub field: Option<&'static str>,
    pub order: Option<SortOrder>,
}

impl SortRequest {
    /// Reads `sort` / `order` with the given parameter names.
    ///
    /// Field names and orders are matched exactly (`DESC` is rejected).
    ///
    /// # Errors
    /// [`ResourcesError::InvalidArgument`] for a field outside `sortable_fields` or an
    /// order other than `asc` / `desc`.
    pub fn parse(
        definition: &ResourceDefinition,
        params: &QueryParams,
        field_name: &str,
        order_name: &str,
    ) -> Result<Self, ResourcesError> {
        let field = match params.present(field_name) {
            None => None,
            Some(requested) => Some(
                definition
                    .sortable_fields
                    .iter()
                    .copied()
                    .find(|field| *field == requested)
                    .ok_or_else(|| {
                        ResourcesError::invalid_argument(format!(
                            "Invalid sort field '{requested}'. Valid fields: {}",
                            definition.sortable_fields.join(", ")
                        ))
                    })?,
            ),
        };

        let order = match params.present(order_name) {
            None => None,
            Some("asc") => Some(SortOrder::Asc),
            Some("desc") => Some(SortOrder::Desc),
            Some(requested) => {
                return Err(ResourcesError::invalid_argument(format!(
                    "Invalid sort order '{requested}'. Valid orders: {}",
                    SortOrder::VALID.join(", ")
                )));
            },
        };

        Ok(Self { field, order })
    }

    #[must_use]
    pub const fn field_or_default(&self, definition: &ResourceDefinition) -> &'static str {
        match self.field {
            Some(field) => field,
            None => definition.sort_field,
        }
    }

    #[must_use]
    pub const fn order_or_default(&self, definition: &ResourceDefinition) -> SortOrder {
        match self.order {
            Some(order) => order,
            None => definition.sort_order,
        }
    }
}
