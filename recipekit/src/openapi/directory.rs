use std::collections::HashMap;

use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, error};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::model::SchemaRef;
use crate::openapi::refs::ref_dependencies;
use crate::openapi::schema::SchemaResolver;

pub type DependencyGraph = DiGraph<String, ()>;

/// Tracks the `$ref` dependencies between component schemas. Each schema is a node in the
/// graph, and each reference from one schema to another is an edge from the referencing
/// schema to the referenced one.
#[derive(Debug, Default)]
pub struct Dependencies {
    graph: DependencyGraph,
    node_map: HashMap<String, NodeIndex>,
    /// Referenced names per schema, including names missing from the document.
    refs: HashMap<String, Vec<String>>,
}

impl Dependencies {
    pub fn build(schemas: &Map<String, Value>) -> Self {
        let mut deps = Self::default();
        // Two passes, all nodes then all edges, so that forward references find their node.
        for name in schemas.keys() {
            let index = deps.graph.add_node(name.clone());
            deps.node_map.insert(name.clone(), index);
        }
        for (name, schema) in schemas {
            let from = deps.node_map[name];
            let refs = ref_dependencies(schema).into_iter().unique().collect_vec();
            for to in refs.iter().filter_map(|dependency| deps.node_map.get(dependency)) {
                deps.graph.add_edge(from, *to, ());
            }
            deps.refs.insert(name.clone(), refs);
        }
        deps
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.node_map.contains_key(name)
    }

    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        match (self.node_map.get(from), self.node_map.get(to)) {
            (Some(from), Some(to)) => self.graph.contains_edge(*from, *to),
            _ => false,
        }
    }

    /// Names referenced by `name`, deduplicated, in order of first appearance.
    pub fn refs(&self, name: &str) -> &[String] {
        self.refs.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Groups of mutually dependent schemas, every group after the groups it depends on. A
    /// group of more than one schema, or a schema referencing itself, is a cycle.
    fn resolution_order(&self) -> Vec<Vec<NodeIndex>> {
        tarjan_scc(&self.graph)
    }

    fn is_cycle(&self, group: &[NodeIndex]) -> bool {
        match group {
            [index] => self.graph.contains_edge(*index, *index),
            _ => true,
        }
    }
}

/// The resolved component schemas of one document, in document order, plus the names that
/// could not be resolved because of a cyclic or missing dependency.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct SchemaDirectory {
    #[serde(flatten)]
    schemas: IndexMap<String, SchemaRef>,
    #[serde(skip)]
    unresolved: Vec<String>,
}

impl SchemaDirectory {
    /// Resolves every schema of a `components.schemas` map after the schemas it references.
    /// Schemas on a dependency cycle, or depending on one, or on a schema that does not exist,
    /// are left out and reported.
    pub fn build(schemas: &Map<String, Value>, docs_base_url: &str) -> Self {
        let deps = Dependencies::build(schemas);
        let mut resolved: IndexMap<String, SchemaRef> = IndexMap::new();
        for group in deps.resolution_order() {
            if deps.is_cycle(&group) {
                continue;
            }
            let name = &deps.graph[group[0]];
            debug!("resolving schema '{}'", name);
            if !deps.refs(name).iter().all(|dependency| resolved.contains_key(dependency)) {
                continue;
            }
            let resolver = SchemaResolver::new(&resolved, docs_base_url);
            let node = match resolver.resolve(&schemas[name]) {
                Ok(node) => node,
                Err(err) => {
                    error!("unable to resolve schema '{}': {}", name, err);
                    continue;
                }
            };
            resolved.insert(name.clone(), node);
        }

        let (schemas, unresolved): (Vec<_>, Vec<_>) = schemas
            .keys()
            .partition(|name| resolved.contains_key(name.as_str()));
        if !unresolved.is_empty() {
            error!(
                "The dependency graphs for these schemas are bad: {}",
                unresolved.iter().join(",")
            );
        }
        Self {
            schemas: schemas
                .into_iter()
                .map(|name| (name.clone(), resolved[name.as_str()].clone()))
                .collect(),
            unresolved: unresolved.into_iter().cloned().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&SchemaRef> {
        self.schemas.get(name)
    }

    pub fn schemas(&self) -> &IndexMap<String, SchemaRef> {
        &self.schemas
    }

    /// Names that are in the document but could not be resolved, in document order.
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
