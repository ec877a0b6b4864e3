//! JSON-LD framing for CONSTRUCT results.
//!
//! Covers the subset the data library relies on: a single typed frame, `@embed: @always`
//! for every property, prefix compaction and scalar unwrapping. The input may be expanded
//! JSON-LD, a compacted document with `@context`/`@graph`, or a lone node object.

use crate::error::SparqlError;
use fxhash::FxHashMap;
use serde_json::{Map, Value, json};

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// Frame definition: the root type plus the prefix context used for compaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    prefixes: Vec<(String, String)>,
    type_iri: String,
    embedded: Vec<String>,
}

impl Frame {
    pub fn new<'a>(
        type_iri: impl Into<String>,
        prefixes: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        Self {
            prefixes: prefixes.into_iter().map(|(p, ns)| (p.to_owned(), ns.to_owned())).collect(),
            type_iri: type_iri.into(),
            embedded: Vec::new(),
        }
    }

    /// Marks a (prefixed) predicate as always embedded. Recorded in [`Self::to_json`].
    #[must_use]
    pub fn embed(mut self, predicate: impl Into<String>) -> Self {
        let predicate = predicate.into();
        if !self.embedded.contains(&predicate) {
            self.embedded.push(predicate);
        }
        self
    }

    #[must_use]
    pub fn type_iri(&self) -> &str {
        &self.type_iri
    }

    /// The `@context` object emitted with framed output.
    #[must_use]
    pub fn context(&self) -> Value {
        Value::Object(
            self.prefixes.iter().map(|(p, ns)| (p.clone(), Value::String(ns.clone()))).collect(),
        )
    }

    /// The frame as a JSON-LD frame document.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut frame = Map::new();
        frame.insert("@context".to_owned(), self.context());
        frame.insert("@type".to_owned(), Value::String(self.type_iri.clone()));
        frame.insert("@embed".to_owned(), json!("@always"));
        for predicate in &self.embedded {
            frame.insert(predicate.clone(), json!({ "@embed": "@always" }));
        }
        Value::Object(frame)
    }

    /// `http://purl.org/dc/terms/title` → `dc-term:title`, using the longest namespace.
    #[must_use]
    pub fn compact_iri(&self, iri: &str) -> String {
        self.prefixes
            .iter()
            .filter(|(_, ns)| iri.len() > ns.len() && iri.starts_with(ns.as_str()))
            .max_by_key(|(_, ns)| ns.len())
            .map_or_else(|| iri.to_owned(), |(prefix, ns)| format!("{prefix}:{}", &iri[ns.len()..]))
    }
}

/// Frames `document`, returning `{"@context": .., "@graph": [roots]}`.
///
/// # Errors
/// [`SparqlError::Frame`] when the document is neither an object nor an array.
pub fn frame(document: &Value, frame: &Frame) -> Result<Value, SparqlError> {
    let (nodes, input_context) = match document {
        Value::Array(items) => (items.as_slice(), None),
        Value::Object(object) => match object.get("@graph") {
            Some(Value::Array(graph)) => (graph.as_slice(), object.get("@context")),
            Some(single @ Value::Object(_)) => (std::slice::from_ref(single), object.get("@context")),
            _ => (std::slice::from_ref(document), object.get("@context")),
        },
        _ => {
            return Err(SparqlError::Frame {
                message: "document must be a JSON object or array".into(),
                context: None,
            });
        },
    };

    let context = Context::new(frame, input_context);
    let mut map = NodeMap::default();
    for node in nodes {
        if let Value::Object(object) = node {
            map.add_node(object, &context);
        }
    }

    let roots: Vec<Value> = map
        .order
        .iter()
        .filter(|id| map.nodes.get(*id).is_some_and(|node| node.types.contains(&frame.type_iri)))
        .map(|id| map.embed(id, frame, &mut Vec::new()))
        .collect();

    Ok(json!({ "@context": frame.context(), "@graph": roots }))
}

#[derive(Debug)]
struct TermDefinition {
    iri: String,
    coerce_id: bool,
}

/// Term and prefix definitions used to expand input keys.
#[derive(Debug, Default)]
struct Context {
    terms: FxHashMap<String, TermDefinition>,
}

impl Context {
    fn new(frame: &Frame, input: Option<&Value>) -> Self {
        let mut context = Self::default();
        for (prefix, ns) in &frame.prefixes {
            context.define(prefix, ns.clone(), false);
        }
        match input {
            Some(Value::Object(definitions)) => context.merge(definitions),
            Some(Value::Array(items)) => {
                for item in items {
                    if let Value::Object(definitions) = item {
                        context.merge(definitions);
                    }
                }
            },
            _ => {},
        }
        context
    }

    fn define(&mut self, term: &str, iri: String, coerce_id: bool) {
        self.terms.insert(term.to_owned(), TermDefinition { iri, coerce_id });
    }

    fn merge(&mut self, definitions: &Map<String, Value>) {
        for (term, definition) in definitions {
            if term.starts_with('@') {
                continue;
            }
            match definition {
                Value::String(iri) => {
                    let iri = self.expand(iri);
                    self.define(term, iri, false);
                },
                Value::Object(object) => {
                    let Some(iri) = object.get("@id").and_then(Value::as_str) else { continue };
                    let iri = self.expand(iri);
                    let coerce_id = object.get("@type").and_then(Value::as_str) == Some("@id");
                    self.define(term, iri, coerce_id);
                },
                _ => {},
            }
        }
    }

    fn expand(&self, name: &str) -> String {
        if let Some(definition) = self.terms.get(name) {
            return definition.iri.clone();
        }
        if let Some((prefix, local)) = name.split_once(':')
            && !local.starts_with("//")
            && let Some(definition) = self.terms.get(prefix)
        {
            return format!("{}{local}", definition.iri);
        }
        name.to_owned()
    }

    fn coerces_id(&self, term: &str) -> bool {
        self.terms.get(term).is_some_and(|definition| definition.coerce_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Literal {
    value: Value,
    datatype: Option<String>,
    language: Option<String>,
}

impl Literal {
    fn compact(&self, frame: &Frame) -> Value {
        if let Some(language) = &self.language {
            return json!({ "@language": language, "@value": self.value });
        }
        match &self.datatype {
            Some(datatype) if datatype != XSD_STRING => {
                json!({ "@type": frame.compact_iri(datatype), "@value": self.value })
            },
            _ => self.value.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Object {
    Node(String),
    Literal(Literal),
}

#[derive(Debug, Default)]
struct Node {
    types: Vec<String>,
    properties: Vec<(String, Vec<Object>)>,
}

impl Node {
    fn add_type(&mut self, iri: String) {
        if !self.types.contains(&iri) {
            self.types.push(iri);
        }
    }

    fn add_objects(&mut self, predicate: String, objects: Vec<Object>) {
        let index = match self.properties.iter().position(|(p, _)| *p == predicate) {
            Some(index) => index,
            None => {
                self.properties.push((predicate, Vec::new()));
                self.properties.len() - 1
            },
        };
        let values = &mut self.properties[index].1;
        for object in objects {
            if !values.contains(&object) {
                values.push(object);
            }
        }
    }
}

/// Flattened view of the document, keyed by node identifier.
///
/// Every blank node, labelled in the input or not, gets a fresh `_:bN` label so input
/// labels can never clash with generated ones.
#[derive(Debug, Default)]
struct NodeMap {
    order: Vec<String>,
    nodes: FxHashMap<String, Node>,
    blank_labels: FxHashMap<String, String>,
    blank_nodes: usize,
}

impl NodeMap {
    fn fresh_blank(&mut self) -> String {
        let label = format!("_:b{}", self.blank_nodes);
        self.blank_nodes += 1;
        label
    }

    fn relabel(&mut self, id: String) -> String {
        if !is_blank(&id) {
            return id;
        }
        if let Some(label) = self.blank_labels.get(&id) {
            return label.clone();
        }
        let label = self.fresh_blank();
        self.blank_labels.insert(id, label.clone());
        label
    }

    fn node_mut(&mut self, id: &str) -> &mut Node {
        if !self.nodes.contains_key(id) {
            self.order.push(id.to_owned());
        }
        self.nodes.entry(id.to_owned()).or_default()
    }

    fn add_node(&mut self, object: &Map<String, Value>, context: &Context) -> String {
        let id = match object.get("@id").and_then(Value::as_str) {
            Some(id) => self.relabel(context.expand(id)),
            None => self.fresh_blank(),
        };
        self.node_mut(&id);

        for (key, value) in object {
            match key.as_str() {
                "@type" => {
                    for item in as_items(value) {
                        if let Some(type_name) = item.as_str() {
                            self.node_mut(&id).add_type(context.expand(type_name));
                        }
                    }
                },
                key if key.starts_with('@') => {},
                key => {
                    let predicate = context.expand(key);
                    let mut objects = Vec::new();
                    let coerce_id = context.coerces_id(key);
                    for item in as_items(value) {
                        self.collect(item, context, coerce_id, &mut objects);
                    }
                    if predicate == RDF_TYPE {
                        for object in objects {
                            if let Object::Node(type_iri) = object {
                                self.node_mut(&id).add_type(type_iri);
                            }
                        }
                    } else {
                        self.node_mut(&id).add_objects(predicate, objects);
                    }
                },
            }
        }
        id
    }

    fn collect(&mut self, value: &Value, context: &Context, coerce_id: bool, out: &mut Vec<Object>) {
        match value {
            Value::Null => {},
            Value::Array(items) => {
                for item in items {
                    self.collect(item, context, coerce_id, out);
                }
            },
            Value::Object(object) if object.contains_key("@value") => {
                let value = object.get("@value").cloned().unwrap_or(Value::Null);
                if value.is_null() {
                    return;
                }
                out.push(Object::Literal(Literal {
                    value,
                    datatype: object.get("@type").and_then(Value::as_str).map(|t| context.expand(t)),
                    language: object.get("@language").and_then(Value::as_str).map(str::to_owned),
                }));
            },
            Value::Object(object) if object.contains_key("@list") || object.contains_key("@set") => {
                for inner in object.get("@list").into_iter().chain(object.get("@set")) {
                    self.collect(inner, context, coerce_id, out);
                }
            },
            Value::Object(object) => out.push(Object::Node(self.add_node(object, context))),
            Value::String(iri) if coerce_id => {
                let id = self.relabel(context.expand(iri));
                out.push(Object::Node(id));
            },
            scalar => out.push(Object::Literal(Literal {
                value: scalar.clone(),
                datatype: None,
                language: None,
            })),
        }
    }

    fn embed(&self, id: &str, frame: &Frame, stack: &mut Vec<String>) -> Value {
        let Some(node) = self.nodes.get(id) else { return reference(id) };
        if stack.iter().any(|ancestor| ancestor == id) {
            return reference(id);
        }
        stack.push(id.to_owned());

        let mut out = Map::new();
        if !is_blank(id) {
            out.insert("@id".to_owned(), Value::String(id.to_owned()));
        }
        match node.types.as_slice() {
            [] => {},
            [single] => {
                out.insert("@type".to_owned(), Value::String(frame.compact_iri(single)));
            },
            many => {
                let types = many.iter().map(|t| Value::String(frame.compact_iri(t))).collect();
                out.insert("@type".to_owned(), Value::Array(types));
            },
        }

        let mut properties: Vec<(String, &Vec<Object>)> = node
            .properties
            .iter()
            .map(|(predicate, objects)| (frame.compact_iri(predicate), objects))
            .collect();
        properties.sort_by(|a, b| a.0.cmp(&b.0));

        for (key, objects) in properties {
            let mut values: Vec<Value> = objects
                .iter()
                .map(|object| match object {
                    Object::Node(reference) => self.embed(reference, frame, stack),
                    Object::Literal(literal) => literal.compact(frame),
                })
                .collect();
            let value = if values.len() == 1 { values.swap_remove(0) } else { Value::Array(values) };
            out.insert(key, value);
        }

        stack.pop();
        Value::Object(out)
    }
}

fn as_items(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items,
        other => std::slice::from_ref(other),
    }
}

fn is_blank(id: &str) -> bool {
    id.starts_with("_:")
}

fn reference(id: &str) -> Value {
    if is_blank(id) { json!({}) } else { json!({ "@id": id }) }
}
