//! Outreach API resources and the JSON:API query builder.
//!
//! A resource is described by a [`ResourceSchema`]: its path, its JSON:API
//! type, flags for each attribute, and named relationships to other
//! resources. Schemas come from a [`ResourceCatalog`]; the crate ships a
//! [`StaticCatalog`] covering the common Outreach resources.
//!
//! [`ApiResource`] validates queries against the schema and sends them:
//!
//! - `filter[attr]` / `filter[rel][attr]` from [`ListRequest::filter`]
//! - `sort=a,-b` from [`ListRequest::sort`]
//! - `page[size]` and `count`, or `page[limit]`, from
//!   [`PaginationConfig`](crate::PaginationConfig)
//! - `include` and `fields[type]` from [`GetRequest`]

pub(crate) mod envelope;
pub(crate) mod fields;
mod query;
mod resource;
mod schema;

pub use envelope::Envelope;
pub use query::{FilterValue, SortField, SortSpec, normalize_field};
pub use resource::{ApiResource, GetRequest, ListRequest};
pub use schema::{AttributeOptions, RelationshipDef, ResourceCatalog, ResourceSchema, StaticCatalog};
