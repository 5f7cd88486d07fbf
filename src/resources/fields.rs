//! Derived field sets: which names may be filtered, sorted or written.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::schema::{AttributeOptions, ResourceSchema};

/// A resource schema together with the schemas of its direct relationships.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedSchema {
    pub(crate) schema: Arc<ResourceSchema>,
    /// `(rel_name, related schema)` in relationship order.
    pub(crate) related: Vec<(String, Arc<ResourceSchema>)>,
}

impl ResolvedSchema {
    /// Schema of a direct relationship.
    pub(crate) fn related(&self, rel_name: &str) -> Option<&Arc<ResourceSchema>> {
        self.related
            .iter()
            .find(|(name, _)| name == rel_name)
            .map(|(_, schema)| schema)
    }

    /// Own attributes matching `flag`, plus `relName.attr` for every related
    /// attribute matching it.
    pub(crate) fn qualifying(&self, flag: fn(&AttributeOptions) -> bool) -> BTreeSet<String> {
        let own = self
            .schema
            .attributes
            .iter()
            .filter(|(_, options)| flag(options))
            .map(|(name, _)| name.clone());

        let related = self.related.iter().flat_map(|(rel_name, schema)| {
            schema
                .attributes
                .iter()
                .filter(|(_, options)| flag(options))
                .map(move |(name, _)| format!("{rel_name}.{name}"))
        });

        own.chain(related).collect()
    }
}

pub(crate) fn filterable(options: &AttributeOptions) -> bool {
    options.filterable
}

pub(crate) fn sortable(options: &AttributeOptions) -> bool {
    options.sortable
}

pub(crate) fn readonly(options: &AttributeOptions) -> bool {
    options.readonly
}
