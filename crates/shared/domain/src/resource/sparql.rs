use super::{
    Attribute, Property, ResourceDefinition, SortOrder, Source, SparqlSource, TermMapping,
};

const LABEL: &[Property] = &[Property::new("label", "skos:prefLabel")];

pub const RESEARCH_BRIEFING: ResourceDefinition = ResourceDefinition {
    path: "research-briefings",
    type_key: "research_briefing",
    source: Source::Sparql(SparqlSource {
        rdf_type: "http://data.parliament.uk/schema/parl#ResearchBriefing",
        item_uri: "http://data.parliament.uk/resources/{id}",
        term_mappings: &[
            TermMapping::new("subject", "dc-term:subject", "subject"),
            TermMapping::new("topic", "parl:topic", "topic"),
            TermMapping::new("publisher", "dc-term:publisher", "published by"),
            TermMapping::new("section", "parl:section", "Section"),
            TermMapping::new("subtype", "parl:subtype", "Type"),
            TermMapping::new("category", "parl:category", "Category"),
            TermMapping::new("author", "dc-term:creator", "Author").through("rdfs:seeAlso"),
        ],
        required_filter: None,
    }),
    sort_field: "date",
    sort_order: SortOrder::Desc,
    sortable_fields: &["date"],
    attributes: &[
        Attribute::simple("title", "dc-term:title"),
        Attribute::simple("identifier", "dc-term:identifier"),
        Attribute::simple("description", "dc-term:description"),
        Attribute::simple("date", "dc-term:date"),
        Attribute::simple("content_location", "parl:contentLocation"),
        Attribute::simple("external_location", "parl:externalLocation"),
        Attribute::simple("html_summary", "parl:htmlsummary"),
        Attribute::nested("topic", "parl:topic", LABEL),
        Attribute::nested("subject", "dc-term:subject", LABEL),
        Attribute::nested("publisher", "dc-term:publisher", LABEL),
        Attribute::nested("section", "parl:section", LABEL),
        Attribute::nested("subtype", "parl:subtype", LABEL),
        Attribute::nested("category", "parl:category", LABEL),
        Attribute::nested(
            "author",
            "dc-term:creator",
            &[
                Property::new("ses_id", "rdfs:seeAlso"),
                Property::new("given_name", "schema:givenName"),
                Property::new("family_name", "schema:familyName"),
            ],
        ),
        Attribute::nested(
            "related_link",
            "parl:relatedLink",
            &[Property::new("url", "schema:url"), Property::new("label", "rdfs:label")],
        ),
        Attribute::nested(
            "attachment",
            "parl:attachment",
            &[Property::new("title", "dc-term:title"), Property::new("file_url", "nfo:fileUrl")],
        ),
    ],
    index_attributes: &["title", "identifier", "description", "date", "publisher", "topic"],
    required_attributes: &["title", "identifier"],
};

pub const DEPOSITED_PAPER: ResourceDefinition = ResourceDefinition {
    path: "deposited-papers",
    type_key: "deposited_paper",
    source: Source::Sparql(SparqlSource {
        rdf_type: "http://data.parliament.uk/schema/parl#DepositedPaper",
        item_uri: "http://data.parliament.uk/depositedpapers/{id}",
        term_mappings: &[
            TermMapping::new("subject", "dc-term:subject", "subject"),
            TermMapping::new("publisher", "dc-term:publisher", "published by"),
            TermMapping::new("depositing-department", "parl:department", "deposited by"),
            TermMapping::new("corporate-author", "parl:corporateAuthor", "author"),
            TermMapping::new("legislature", "parl:legislature", "house"),
        ],
        required_filter: None,
    }),
    sort_field: "dateReceived",
    sort_order: SortOrder::Desc,
    sortable_fields: &["dateReceived"],
    attributes: &[
        Attribute::simple("title", "dc-term:title"),
        Attribute::simple("identifier", "dc-term:identifier"),
        Attribute::simple("abstract", "dc-term:abstract"),
        Attribute::simple("dateReceived", "parl:dateReceived"),
        Attribute::simple("lastModified", "parl:dateLastModified"),
        Attribute::simple("dateOfOrigin", "parl:dateOfOrigin"),
        Attribute::simple("dateOfCommitmentToDeposit", "parl:dateOfCommitmentToDeposit"),
        Attribute::simple("depositedFile", "parl:depositedFile"),
        Attribute::simple("indexingStatus", "parl:indexStatus"),
        Attribute::nested("corporateAuthor", "parl:corporateAuthor", LABEL),
        Attribute::nested("subject", "dc-term:subject", LABEL),
        Attribute::nested("depositingDepartment", "parl:department", LABEL),
        Attribute::nested("legislature", "parl:legislature", LABEL),
        Attribute::nested(
            "relation",
            "dc-term:relation",
            &[
                Property::new("externalLocation", "parl:externalLocation"),
                Property::new("title", "dc-term:title"),
            ],
        ),
    ],
    index_attributes: &["abstract", "identifier", "depositingDepartment", "dateReceived", "legislature"],
    required_attributes: &["abstract", "identifier", "dateReceived"],
};
