//! Resource schemas and the catalog they are looked up in.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The catalog shipped with the crate.
const BUNDLED_CATALOG: &str = include_str!("catalog.json");

/// Flags of a single resource attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeOptions {
    /// May be used in `filter[...]`.
    pub filterable: bool,
    /// Computed by the server; dropped from create/update bodies.
    pub readonly: bool,
    /// May be used in `sort`.
    pub sortable: bool,
}

impl AttributeOptions {
    /// An attribute that is filterable and sortable.
    pub const fn queryable() -> Self {
        Self {
            filterable: true,
            readonly: false,
            sortable: true,
        }
    }

    /// Marks the attribute as readonly.
    #[must_use]
    pub const fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }
}

/// A named relationship to another catalog resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipDef {
    /// Name of the relationship, e.g. `owner`.
    pub rel_name: String,
    /// Catalog name of the related resource, e.g. `users`.
    pub resource: String,
}

/// Static description of an API resource.
///
/// ```rust
/// use outreach_sdk::resources::{AttributeOptions, ResourceSchema};
///
/// let schema = ResourceSchema::new("prospects", "prospect")
///     .with_attribute("firstName", AttributeOptions::queryable())
///     .with_attribute("createdAt", AttributeOptions::queryable().readonly())
///     .with_relationship("owner", "users");
///
/// assert!(schema.relationship("owner").is_some());
/// assert!(schema.attribute("createdAt").unwrap().readonly);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSchema {
    /// Path below the API base URL, e.g. `prospects`.
    pub api_path: String,
    /// JSON:API type name, e.g. `prospect`.
    pub resource_type: String,
    /// Attribute flags by attribute name.
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeOptions>,
    /// Relationships in declaration order.
    #[serde(default)]
    pub relationships: Vec<RelationshipDef>,
}

impl ResourceSchema {
    /// Creates a schema with no attributes or relationships.
    pub fn new(api_path: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            api_path: api_path.into(),
            resource_type: resource_type.into(),
            attributes: BTreeMap::new(),
            relationships: Vec::new(),
        }
    }

    /// Adds or replaces an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, options: AttributeOptions) -> Self {
        self.attributes.insert(name.into(), options);
        self
    }

    /// Appends a relationship.
    #[must_use]
    pub fn with_relationship(mut self, rel_name: impl Into<String>, resource: impl Into<String>) -> Self {
        self.relationships.push(RelationshipDef {
            rel_name: rel_name.into(),
            resource: resource.into(),
        });
        self
    }

    /// Looks up an attribute's flags.
    pub fn attribute(&self, name: &str) -> Option<&AttributeOptions> {
        self.attributes.get(name)
    }

    /// Looks up a relationship by name.
    pub fn relationship(&self, rel_name: &str) -> Option<&RelationshipDef> {
        self.relationships.iter().find(|rel| rel.rel_name == rel_name)
    }
}

/// Source of resource schemas, looked up by catalog name.
///
/// Implementations are read-only. [`StaticCatalog`] is the in-memory
/// implementation; tests can supply their own.
pub trait ResourceCatalog: Send + Sync {
    /// Returns the schema for `name`, or
    /// [`ErrorKind::ResourceNotSupported`](crate::ErrorKind::ResourceNotSupported).
    fn lookup(&self, name: &str) -> Result<Arc<ResourceSchema>>;
}

impl<T: ResourceCatalog + ?Sized> ResourceCatalog for Arc<T> {
    fn lookup(&self, name: &str) -> Result<Arc<ResourceSchema>> {
        (**self).lookup(name)
    }
}

/// In-memory [`ResourceCatalog`].
///
/// ```rust
/// use outreach_sdk::resources::{ResourceCatalog, StaticCatalog};
///
/// let catalog = StaticCatalog::bundled().unwrap();
/// assert_eq!(catalog.lookup("prospects").unwrap().resource_type, "prospect");
/// assert!(catalog.lookup("nothing").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    schemas: HashMap<String, Arc<ResourceSchema>>,
}

impl StaticCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the catalog shipped with the crate, parsed once per process.
    ///
    /// It covers `prospects`, `accounts`, `users`, `emailAddresses`,
    /// `sequences` and `mailboxes`.
    pub fn bundled() -> Result<Arc<StaticCatalog>> {
        static BUNDLED: OnceLock<std::result::Result<Arc<StaticCatalog>, String>> = OnceLock::new();
        BUNDLED
            .get_or_init(|| {
                StaticCatalog::from_json(BUNDLED_CATALOG)
                    .map(Arc::new)
                    .map_err(|e| e.to_string())
            })
            .clone()
            .map_err(Error::configuration)
    }

    /// Parses a catalog from a JSON object keyed by resource name.
    pub fn from_json(json: &str) -> Result<Self> {
        let schemas: HashMap<String, ResourceSchema> = serde_json::from_str(json)
            .map_err(|e| Error::configuration(format!("invalid resource catalog: {e}")).with_source(e))?;
        Ok(Self {
            schemas: schemas
                .into_iter()
                .map(|(name, schema)| (name, Arc::new(schema)))
                .collect(),
        })
    }

    /// Adds or replaces a schema.
    pub fn insert(&mut self, name: impl Into<String>, schema: ResourceSchema) {
        self.schemas.insert(name.into(), Arc::new(schema));
    }

    /// Builder-style [`insert()`](Self::insert).
    #[must_use]
    pub fn with_schema(mut self, name: impl Into<String>, schema: ResourceSchema) -> Self {
        self.insert(name, schema);
        self
    }

    /// Returns `true` if `name` is in the catalog.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Catalog names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns `true` if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl ResourceCatalog for StaticCatalog {
    fn lookup(&self, name: &str) -> Result<Arc<ResourceSchema>> {
        self.schemas
            .get(name)
            .cloned()
            .ok_or_else(|| Error::resource_not_supported(name))
    }
}
