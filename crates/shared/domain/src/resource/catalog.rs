use super::{
    BILL_PETITION, COMMITTEE, COMMITTEE_BUSINESS, COMMITTEE_BUSINESS_TYPE, COMMITTEE_TYPE,
    COUNTRY, DEPOSITED_PAPER, EVENT, ORAL_EVIDENCE, RESEARCH_BRIEFING, ResourceDefinition,
    WRITTEN_EVIDENCE,
};

/// Every published resource type, in the order they are documented.
pub static RESOURCES: [ResourceDefinition; 11] = [
    RESEARCH_BRIEFING,
    DEPOSITED_PAPER,
    COMMITTEE,
    COMMITTEE_BUSINESS,
    EVENT,
    BILL_PETITION,
    ORAL_EVIDENCE,
    WRITTEN_EVIDENCE,
    COMMITTEE_BUSINESS_TYPE,
    COMMITTEE_TYPE,
    COUNTRY,
];

/// Looks a resource up by its URL path segment.
#[must_use]
pub fn find(path: &str) -> Option<&'static ResourceDefinition> {
    RESOURCES.iter().find(|definition| definition.path == path)
}

/// Resources backed by the triple store.
pub fn linked_data_resources() -> impl Iterator<Item = &'static ResourceDefinition> {
    RESOURCES.iter().filter(|definition| definition.sparql().is_some())
}
