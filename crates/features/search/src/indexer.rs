//! Search index lifecycle: create, delete and rebuild from the triple store.

use crate::error::{SearchError, SearchErrorExt};
use pdl_domain::resource::{DEPOSITED_PAPER, RESEARCH_BRIEFING, ResourceDefinition};
use pdl_elastic::ElasticClient;
use pdl_kernel::format::format_item;
use pdl_kernel::resource::ResourceItem;
use pdl_resources::linked_data::{LinkedDataService, ListRequest};
use pdl_resources::sort::SortRequest;
use regex::Regex;
use serde_json::{Map, Value, json};
use std::sync::LazyLock;
use tracing::{info, warn};

pub const BATCH_SIZE: u64 = 100;

/// Resource types fed into the index, in reindex order.
pub static INDEXED_RESOURCES: [&ResourceDefinition; 2] = [&RESEARCH_BRIEFING, &DEPOSITED_PAPER];

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("static pattern is valid"));

/// Nested attributes whose term ids become keyword filter fields.
const TERM_ID_FIELDS: [(&str, &str); 9] = [
    ("topic", "topic_ids"),
    ("subject", "subject_ids"),
    ("publisher", "publisher_ids"),
    ("section", "section_ids"),
    ("subtype", "subtype_ids"),
    ("category", "category_ids"),
    ("depositingDepartment", "depositing_department_ids"),
    ("corporateAuthor", "corporate_author_ids"),
    ("legislature", "legislature_ids"),
];

#[derive(Debug, Clone)]
pub struct SearchIndexer {
    elastic: ElasticClient,
    linked_data: LinkedDataService,
    index: String,
}

impl SearchIndexer {
    #[must_use]
    pub fn new(elastic: ElasticClient, linked_data: LinkedDataService, index: impl Into<String>) -> Self {
        Self { elastic, linked_data, index: index.into() }
    }

    #[must_use]
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Creates the index unless it exists. Returns whether it was created.
    ///
    /// # Errors
    /// [`SearchError::Elastic`] on cluster failures.
    pub async fn create_index(&self) -> Result<bool, SearchError> {
        if self.elastic.index_exists(&self.index).await.context("Checking index")? {
            info!(index = %self.index, "Search index already exists");
            return Ok(false);
        }
        self.elastic.create_index(&self.index, &index_definition()).await.context("Creating index")?;
        Ok(true)
    }

    /// Deletes the index if present. Returns whether it existed.
    ///
    /// # Errors
    /// [`SearchError::Elastic`] on cluster failures.
    pub async fn delete_index(&self) -> Result<bool, SearchError> {
        if !self.elastic.index_exists(&self.index).await.context("Checking index")? {
            return Ok(false);
        }
        self.elastic.delete_index(&self.index).await.context("Deleting index")?;
        Ok(true)
    }

    /// Reindexes every indexed resource type; returns the per-type document counts.
    ///
    /// # Errors
    /// See [`Self::reindex`].
    pub async fn reindex_all(&self) -> Result<Vec<(&'static str, usize)>, SearchError> {
        let mut counts = Vec::with_capacity(INDEXED_RESOURCES.len());
        for definition in INDEXED_RESOURCES {
            counts.push((definition.type_key, self.reindex(definition).await?));
        }
        Ok(counts)
    }

    /// Walks one resource type in batches of [`BATCH_SIZE`] and bulk-indexes each batch.
    /// Stops at the first short or empty batch.
    ///
    /// # Errors
    /// [`SearchError::Resources`] for resources without query templates,
    /// [`SearchError::Elastic`] when a bulk request fails.
    pub async fn reindex(&self, definition: &'static ResourceDefinition) -> Result<usize, SearchError> {
        let mut offset = 0;
        let mut total = 0;

        loop {
            let request = ListRequest {
                filter: String::new(),
                offset,
                limit: BATCH_SIZE,
                all_fields: true,
                sort: SortRequest::default(),
            };
            let batch = self.linked_data.get_items(definition, &request).await.context("Reading batch")?;
            if batch.items.is_empty() {
                break;
            }

            let lines: Vec<Value> = batch
                .items
                .iter()
                .flat_map(|item| {
                    let (doc_id, document) = build_document(item);
                    [json!({ "index": { "_index": self.index, "_id": doc_id } }), document]
                })
                .collect();
            let summary = self.elastic.bulk(&lines).await.context("Bulk indexing")?;
            if summary.errors {
                warn!(resource = definition.type_key, offset, "Some documents were rejected");
            }

            total += batch.items.len();
            info!(resource = definition.type_key, total, "Indexed items so far");

            if (batch.items.len() as u64) < BATCH_SIZE {
                break;
            }
            offset += BATCH_SIZE;
        }

        info!(resource = definition.type_key, total, "Finished indexing");
        Ok(total)
    }
}

/// Index settings (`parliament_analyzer`) and field mappings.
#[must_use]
pub fn index_definition() -> Value {
    let text = json!({ "type": "text", "analyzer": "parliament_analyzer" });
    let keyword = json!({ "type": "keyword" });

    let mut properties = Map::new();
    properties.insert("resource_type".to_owned(), keyword.clone());
    properties.insert("resource_id".to_owned(), keyword.clone());
    properties.insert("title".to_owned(), text.clone());
    properties.insert("description".to_owned(), text.clone());
    properties.insert(
        "identifier".to_owned(),
        json!({ "type": "keyword", "fields": { "text": { "type": "text" } } }),
    );
    properties.insert(
        "date".to_owned(),
        json!({
            "type": "date",
            "format": "yyyy-MM-dd||strict_date_optional_time||epoch_millis",
            "ignore_malformed": true,
        }),
    );
    for field in ["topics", "subjects", "publisher", "summary"] {
        properties.insert(field.to_owned(), text.clone());
    }
    for (_, field) in TERM_ID_FIELDS {
        properties.insert(field.to_owned(), keyword.clone());
    }

    json!({
        "settings": {
            "analysis": {
                "analyzer": {
                    "parliament_analyzer": {
                        "type": "custom",
                        "tokenizer": "standard",
                        "filter": ["lowercase", "asciifolding", "english_stemmer"],
                    }
                },
                "filter": {
                    "english_stemmer": { "type": "stemmer", "language": "english" }
                },
            }
        },
        "mappings": { "properties": properties },
    })
}

/// `({type}_{id}, document)` for one item.
#[must_use]
pub fn build_document(item: &ResourceItem) -> (String, Value) {
    let formatted = format_item(item, item.definition.attributes, false);
    let field = |name: &str| formatted.get(name).filter(|value| !value.is_null()).cloned();

    let mut document = Map::new();
    document.insert("resource_type".to_owned(), json!(item.type_key()));
    document.insert("resource_id".to_owned(), json!(item.id));
    document.insert("title".to_owned(), field("title").or_else(|| field("abstract")).into());
    document.insert("description".to_owned(), field("description").or_else(|| field("abstract")).into());
    document.insert("identifier".to_owned(), field("identifier").into());
    document.insert("date".to_owned(), field("date").or_else(|| field("dateReceived")).into());
    document.insert("topics".to_owned(), labels(formatted.get("topic")));
    document.insert("subjects".to_owned(), labels(formatted.get("subject")));
    document.insert("publisher".to_owned(), labels(formatted.get("publisher")));
    document.insert("summary".to_owned(), strip_html(formatted.get("html_summary")).into());
    for (attribute, keyword) in TERM_ID_FIELDS {
        document.insert(keyword.to_owned(), term_ids(formatted.get(attribute)));
    }

    (format!("{}_{}", item.type_key(), item.id), Value::Object(document))
}

fn nested_entries(value: Option<&Value>) -> &[Value] {
    value.and_then(Value::as_array).map_or(&[], Vec::as_slice)
}

fn labels(value: Option<&Value>) -> Value {
    nested_entries(value).iter().filter_map(|entry| entry.get("label").filter(|l| !l.is_null()).cloned()).collect()
}

fn term_ids(value: Option<&Value>) -> Value {
    nested_entries(value)
        .iter()
        .filter_map(|entry| {
            let id = match entry.get("id")? {
                Value::String(id) => id.clone(),
                Value::Null => return None,
                other => other.to_string(),
            };
            Some(Value::String(id.rsplit('/').next().unwrap_or_default().to_owned()))
        })
        .collect()
}

fn strip_html(value: Option<&Value>) -> Option<String> {
    let html = value?.as_str().filter(|html| !html.trim().is_empty())?;
    Some(HTML_TAG.replace_all(html, "").into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(definition: &'static ResourceDefinition, id: &str, data: Value) -> ResourceItem {
        ResourceItem::new(id.to_owned(), data.as_object().cloned().unwrap_or_default(), definition)
    }

    #[test]
    fn briefing_documents_carry_labels_ids_and_plain_summary() {
        let briefing = item(
            &RESEARCH_BRIEFING,
            "CBP-1",
            json!({
                "@id": "http://data.parliament.uk/resources/CBP-1",
                "dc-term:title": "Energy prices",
                "dc-term:identifier": "CBP-1",
                "dc-term:date": { "@value": "2024-01-02T00:00:00", "@type": "xsd:dateTime" },
                "parl:topic": [{ "@id": "http://data.parliament.uk/terms/10", "skos:prefLabel": "Energy" }],
                "parl:htmlsummary": "<p>Bills <b>rise</b></p>",
            }),
        );

        let (doc_id, document) = build_document(&briefing);
        assert_eq!(doc_id, "research_briefing_CBP-1");
        assert_eq!(document["resource_type"], "research_briefing");
        assert_eq!(document["title"], "Energy prices");
        assert_eq!(document["description"], Value::Null);
        assert_eq!(document["date"], "2024-01-02T00:00:00");
        assert_eq!(document["topics"], json!(["Energy"]));
        assert_eq!(document["topic_ids"], json!(["10"]));
        assert_eq!(document["subject_ids"], json!([]));
        assert_eq!(document["summary"], "Bills rise");
    }

    #[test]
    fn deposited_papers_fall_back_to_abstract_and_date_received() {
        let paper = item(
            &DEPOSITED_PAPER,
            "DEP2024-0001",
            json!({
                "dc-term:abstract": "Letter on prisons",
                "parl:dateReceived": { "@value": "2024-02-01" },
                "parl:legislature": [{ "@id": "http://data.parliament.uk/terms/25259", "skos:prefLabel": "House of Commons" }],
            }),
        );

        let (_, document) = build_document(&paper);
        assert_eq!(document["title"], "Letter on prisons");
        assert_eq!(document["description"], "Letter on prisons");
        assert_eq!(document["date"], "2024-02-01");
        assert_eq!(document["legislature_ids"], json!(["25259"]));
        assert_eq!(document["summary"], Value::Null);
    }

    #[test]
    fn mappings_cover_every_filter_field() {
        let definition = index_definition();
        let properties = &definition["mappings"]["properties"];
        for (_, field) in crate::query::FILTER_FIELDS {
            assert_eq!(properties[*field]["type"], "keyword", "{field}");
        }
        assert_eq!(properties["identifier"]["fields"]["text"]["type"], "text");
        assert_eq!(
            definition["settings"]["analysis"]["analyzer"]["parliament_analyzer"]["tokenizer"],
            "standard"
        );
    }
}
