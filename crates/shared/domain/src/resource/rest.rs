use super::{
    Attribute, FilterMapping, Property, ResourceDefinition, ResponseFormat, RestSource,
    SortOrder, Source,
};

const COMMITTEES_API: &str = "https://committees-api.parliament.uk";

const ID_NAME: &[Property] = &[Property::new("id", "id"), Property::new("name", "name")];
const ID_TITLE: &[Property] = &[Property::new("id", "id"), Property::new("title", "title")];
const URL_TITLE: &[Property] = &[Property::new("url", "url"), Property::new("title", "title")];
const CONTACT: &[Property] = &[
    Property::new("email", "email"),
    Property::new("phone", "phone"),
    Property::new("address", "address"),
];
const COMMITTEE_REFS: &[Property] = &[
    Property::new("id", "id"),
    Property::new("name", "name"),
    Property::new("house", "house"),
];
const WITNESSES: &[Property] = &[
    Property::new("id", "id"),
    Property::new("name", "name"),
    Property::new("submitter_type", "submitterType"),
];
const DOCUMENT: &[Property] = &[Property::new("document_id", "documentId")];
const HC_NUMBER: &[Property] = &[
    Property::new("number", "number"),
    Property::new("session_id", "sessionId"),
    Property::new("session_description", "sessionDescription"),
];
const SUBMISSION_PERIOD: &[Property] = &[
    Property::new("id", "id"),
    Property::new("start_date", "startDate"),
    Property::new("end_date", "endDate"),
    Property::new("submission_type", "submissionType"),
];

const HOUSES: &[&str] = &["Commons", "Lords"];

const COMMITTEE_ID: FilterMapping = FilterMapping::new("committee_id", "CommitteeId", "committee ID");
const COMMITTEE_BUSINESS_ID: FilterMapping =
    FilterMapping::new("committee_business_id", "CommitteeBusinessId", "committee business ID");
const SEARCH: FilterMapping = FilterMapping::new("search", "SearchTerm", "search term");

/// Filters shared by the evidence and petition endpoints.
const EVIDENCE_FILTERS: &[FilterMapping] = &[
    COMMITTEE_ID,
    COMMITTEE_BUSINESS_ID,
    SEARCH,
    FilterMapping::new("start_date", "StartDate", "start date"),
    FilterMapping::new("end_date", "EndDate", "end date"),
];

const fn committees_api(
    api_path: &'static str,
    format: ResponseFormat,
    filter_mappings: &'static [FilterMapping],
) -> Source {
    Source::Rest(RestSource {
        base_url: COMMITTEES_API,
        api_path,
        id_field: "id",
        format,
        filter_mappings,
    })
}

pub const COMMITTEE: ResourceDefinition = ResourceDefinition {
    path: "committees",
    type_key: "committee",
    source: committees_api(
        "/api/Committees",
        ResponseFormat::Collection,
        &[
            FilterMapping::new("house", "House", "house").values(HOUSES),
            FilterMapping::new("status", "CommitteeStatus", "status")
                .values(&["Current", "All"])
                .default_value("Current"),
            FilterMapping::new("category", "CommitteeCategory", "category")
                .values(&["Select", "General", "Other"]),
            SEARCH,
        ],
    ),
    sort_field: "name",
    sort_order: SortOrder::Asc,
    sortable_fields: &["name", "start_date"],
    attributes: &[
        Attribute::simple("name", "name"),
        Attribute::simple("house", "house"),
        Attribute::simple("show_on_website", "showOnWebsite"),
        Attribute::simple("start_date", "startDate"),
        Attribute::simple("end_date", "endDate"),
        Attribute::simple("date_commons_appointed", "dateCommonsAppointed"),
        Attribute::simple("date_lords_appointed", "dateLordsAppointed"),
        Attribute::simple("is_lead_committee", "isLeadCommittee"),
        Attribute::simple("purpose", "purpose"),
        Attribute::simple("lead_house", "leadHouse"),
        Attribute::nested("category", "category", ID_NAME),
        Attribute::nested("parent_committee", "parentCommittee", ID_NAME),
        Attribute::nested("sub_committees", "subCommittees", ID_NAME),
        Attribute::nested("contact", "contact", CONTACT),
        Attribute::nested("committee_types", "committeeTypes", ID_NAME),
        Attribute::nested(
            "scrutinising_departments",
            "scrutinisingDepartments",
            &[Property::new("department_id", "departmentId"), Property::new("name", "name")],
        ),
        Attribute::nested(
            "name_history",
            "nameHistory",
            &[
                Property::new("id", "id"),
                Property::new("name", "name"),
                Property::new("start_date", "startDate"),
                Property::new("end_date", "endDate"),
            ],
        ),
        Attribute::nested("previous_committees", "previousCommittees", ID_NAME),
        Attribute::nested("content_links", "contentLinks", URL_TITLE),
    ],
    index_attributes: &["name", "house", "start_date", "end_date", "category", "committee_types"],
    required_attributes: &["name"],
};

pub const COMMITTEE_BUSINESS: ResourceDefinition = ResourceDefinition {
    path: "committee-business",
    type_key: "committee_business",
    source: committees_api(
        "/api/CommitteeBusiness",
        ResponseFormat::Collection,
        &[
            COMMITTEE_ID,
            FilterMapping::new("business_type_id", "BusinessTypeId", "business type ID"),
            FilterMapping::new("status", "Status", "status").values(&["Open", "Closed", "All"]),
            SEARCH,
            FilterMapping::new("date_from", "DateFrom", "start date from"),
            FilterMapping::new("date_to", "DateTo", "start date to"),
        ],
    ),
    sort_field: "open_date",
    sort_order: SortOrder::Desc,
    sortable_fields: &["open_date", "title"],
    attributes: &[
        Attribute::simple("title", "title"),
        Attribute::simple("open_date", "openDate"),
        Attribute::simple("close_date", "closeDate"),
        Attribute::simple("scope", "scope"),
        Attribute::simple("latest_report", "latestReport"),
        Attribute::simple("next_oral_evidence_session", "nextOralEvidenceSession"),
        Attribute::nested(
            "business_type",
            "type",
            &[
                Property::new("id", "id"),
                Property::new("name", "name"),
                Property::new("is_inquiry", "isInquiry"),
            ],
        ),
        Attribute::nested("contact", "contact", CONTACT),
        Attribute::nested("open_submission_periods", "openSubmissionPeriods", SUBMISSION_PERIOD),
        Attribute::nested("closed_submission_periods", "closedSubmissionPeriods", SUBMISSION_PERIOD),
        Attribute::nested("related_information", "relatedInformation", URL_TITLE),
    ],
    index_attributes: &["title", "open_date", "close_date", "business_type"],
    required_attributes: &["title"],
};

pub const EVENT: ResourceDefinition = ResourceDefinition {
    path: "events",
    type_key: "event",
    source: committees_api(
        "/api/Events",
        ResponseFormat::Collection,
        &[
            COMMITTEE_ID,
            COMMITTEE_BUSINESS_ID,
            FilterMapping::new("house", "House", "house").values(HOUSES),
            FilterMapping::new("start_date_from", "StartDateFrom", "start date from"),
            FilterMapping::new("start_date_to", "StartDateTo", "start date to"),
            SEARCH,
            FilterMapping::new("event_type_id", "EventTypeId", "event type ID"),
            FilterMapping::new("exclude_cancelled", "ExcludeCancelledEvents", "exclude cancelled events")
                .values(&["true", "false"]),
        ],
    ),
    sort_field: "start_date",
    sort_order: SortOrder::Desc,
    sortable_fields: &["start_date", "name"],
    attributes: &[
        Attribute::simple("name", "name"),
        Attribute::simple("start_date", "startDate"),
        Attribute::simple("end_date", "endDate"),
        Attribute::simple("cancelled_date", "cancelledDate"),
        Attribute::simple("location", "location"),
        Attribute::simple("event_source", "eventSource"),
        Attribute::simple("primary_description", "primaryDescription"),
        Attribute::simple("secondary_description", "secondaryDescription"),
        Attribute::simple("parliament_tv_url", "parliamentTvUrl"),
        Attribute::nested(
            "event_type",
            "eventType",
            &[
                Property::new("id", "id"),
                Property::new("name", "name"),
                Property::new("is_visit", "isVisit"),
            ],
        ),
        Attribute::nested("committees", "committees", COMMITTEE_REFS),
        Attribute::nested("committee_businesses", "committeeBusinesses", ID_TITLE),
        Attribute::nested(
            "activities",
            "activities",
            &[
                Property::new("id", "id"),
                Property::new("name", "name"),
                Property::new("start_date", "startDate"),
                Property::new("end_date", "endDate"),
                Property::new("activity_type", "activityType"),
                Property::new("is_private", "isPrivate"),
            ],
        ),
    ],
    index_attributes: &["name", "start_date", "end_date", "location", "event_type", "committees"],
    required_attributes: &["name"],
};

pub const BILL_PETITION: ResourceDefinition = ResourceDefinition {
    path: "bill-petitions",
    type_key: "bill_petition",
    source: committees_api("/api/BillPetitions", ResponseFormat::Collection, EVIDENCE_FILTERS),
    sort_field: "publication_date",
    sort_order: SortOrder::Desc,
    sortable_fields: &["publication_date"],
    attributes: &[
        Attribute::simple("submission_id", "submissionId"),
        Attribute::simple("internal_reference", "internalReference"),
        Attribute::simple("publication_date", "publicationDate"),
        Attribute::simple("created_date", "createdDate"),
        Attribute::simple("outcome", "outcome"),
        Attribute::nested("committee_business", "committeeBusiness", ID_TITLE),
        Attribute::nested("witnesses", "witnesses", WITNESSES),
        Attribute::nested("document", "document", DOCUMENT),
        Attribute::nested("committees", "committees", COMMITTEE_REFS),
    ],
    index_attributes: &["publication_date", "committee_business", "committees", "witnesses"],
    required_attributes: &["publication_date"],
};

pub const ORAL_EVIDENCE: ResourceDefinition = ResourceDefinition {
    path: "oral-evidence",
    type_key: "oral_evidence",
    source: committees_api("/api/OralEvidence", ResponseFormat::Collection, EVIDENCE_FILTERS),
    sort_field: "publication_date",
    sort_order: SortOrder::Desc,
    sortable_fields: &["publication_date", "meeting_date"],
    attributes: &[
        Attribute::simple("meeting_date", "meetingDate"),
        Attribute::simple("publication_date", "publicationDate"),
        Attribute::simple("legacy_html_url", "legacyHtmlUrl"),
        Attribute::simple("legacy_pdf_url", "legacyPdfUrl"),
        Attribute::nested("hc_number", "hcNumber", HC_NUMBER),
        Attribute::nested("committee_businesses", "committeeBusinesses", ID_TITLE),
        Attribute::nested("witnesses", "witnesses", WITNESSES),
        Attribute::nested("document", "document", DOCUMENT),
        Attribute::nested("committees", "committees", COMMITTEE_REFS),
    ],
    index_attributes: &[
        "meeting_date",
        "publication_date",
        "committee_businesses",
        "committees",
        "witnesses",
    ],
    required_attributes: &["publication_date"],
};

pub const WRITTEN_EVIDENCE: ResourceDefinition = ResourceDefinition {
    path: "written-evidence",
    type_key: "written_evidence",
    source: committees_api("/api/WrittenEvidence", ResponseFormat::Collection, EVIDENCE_FILTERS),
    sort_field: "publication_date",
    sort_order: SortOrder::Desc,
    sortable_fields: &["publication_date"],
    attributes: &[
        Attribute::simple("submission_id", "submissionId"),
        Attribute::simple("internal_reference", "internalReference"),
        Attribute::simple("publication_date", "publicationDate"),
        Attribute::simple("anonymous", "anonymous"),
        Attribute::simple("anonymous_witness_text", "anonymousWitnessText"),
        Attribute::simple("legacy_html_url", "legacyHtmlUrl"),
        Attribute::simple("legacy_pdf_url", "legacyPdfUrl"),
        Attribute::nested("hc_number", "hcNumber", HC_NUMBER),
        Attribute::nested("committee_business", "committeeBusiness", ID_TITLE),
        Attribute::nested("witnesses", "witnesses", WITNESSES),
        Attribute::nested("document", "document", DOCUMENT),
        Attribute::nested("committees", "committees", COMMITTEE_REFS),
    ],
    index_attributes: &["publication_date", "committee_business", "committees", "witnesses"],
    required_attributes: &["publication_date"],
};

pub const COMMITTEE_BUSINESS_TYPE: ResourceDefinition = ResourceDefinition {
    path: "committee-business-types",
    type_key: "committee_business_type",
    source: committees_api("/api/CommitteeBusinessType", ResponseFormat::Array, &[]),
    sort_field: "name",
    sort_order: SortOrder::Asc,
    sortable_fields: &["name"],
    attributes: &[
        Attribute::simple("name", "name"),
        Attribute::simple("is_inquiry", "isInquiry"),
        Attribute::simple("description", "description"),
    ],
    index_attributes: &["name", "is_inquiry"],
    required_attributes: &["name"],
};

pub const COMMITTEE_TYPE: ResourceDefinition = ResourceDefinition {
    path: "committee-types",
    type_key: "committee_type",
    source: committees_api("/api/CommitteeType", ResponseFormat::Array, &[]),
    sort_field: "name",
    sort_order: SortOrder::Asc,
    sortable_fields: &["name"],
    attributes: &[
        Attribute::simple("name", "name"),
        Attribute::nested("committee_category", "committeeCategory", ID_NAME),
    ],
    index_attributes: &["name", "committee_category"],
    required_attributes: &["name"],
};

pub const COUNTRY: ResourceDefinition = ResourceDefinition {
    path: "countries",
    type_key: "country",
    source: committees_api("/api/Countries", ResponseFormat::Array, &[]),
    sort_field: "name",
    sort_order: SortOrder::Asc,
    sortable_fields: &["name"],
    attributes: &[
        Attribute::simple("name", "text"),
        Attribute::simple("iso_code", "isoCode"),
        Attribute::simple("display_order", "displayOrder"),
    ],
    index_attributes: &["name", "iso_code"],
    required_attributes: &["name"],
};
