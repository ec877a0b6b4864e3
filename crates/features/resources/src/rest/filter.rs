use pdl_domain::resource::RestSource;
use pdl_kernel::params::QueryParams;

/// Upstream query parameters for the request: the caller's value when present, else the
/// mapping default. Mapping order is preserved.
#[must_use]
pub fn build(source: &RestSource, params: &QueryParams) -> Vec<(&'static str, String)> {
    source
        .filter_mappings
        .iter()
        .filter_map(|mapping| {
            let value = params.present(mapping.param).or(mapping.default)?;
            Some((mapping.upstream_param, value.to_owned()))
        })
        .collect()
}
