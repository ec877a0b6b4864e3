//! Output shaping for fetched items. The LDA (v0) shape lives with the legacy slice.

pub mod json;

pub use json::{ItemMeta, ShowDocument, format_index, format_item, format_show, unwrap_value};
