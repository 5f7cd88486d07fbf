//! Query parameter construction in the Outreach JSON:API dialect.
//!
//! | Input                          | Wire form                          |
//! |--------------------------------|------------------------------------|
//! | filter `firstName = John`      | `filter[firstName]=John`           |
//! | filter `owner.email = a@b.c`   | `filter[owner][email]=a@b.c`       |
//! | sort `["-account.name", "id"]` | `sort=-account.name,id`            |
//! | include `["owner"]`            | `include=owner`                    |
//! | fields `["owner.email"]`       | `fields[user]=email`               |
//!
//! Every builder validates before emitting anything, so a rejected query
//! never reaches the transport.

use std::collections::BTreeSet;
use std::fmt;

use super::fields::ResolvedSchema;
use super::schema::{ResourceCatalog, ResourceSchema};
use crate::{Error, Result};

/// Keyword-style relationship separator, normalized to `.`.
const KEYWORD_SEPARATOR: &str = "__";

/// Normalizes a keyword-style field name (`owner__email`) to dotted form.
pub fn normalize_field(name: &str) -> String {
    name.replace(KEYWORD_SEPARATOR, ".")
}

// ============================================================================
// Filter values
// ============================================================================

/// Value of a filter parameter.
///
/// Lists render comma-joined into a single parameter:
///
/// ```rust
/// use outreach_sdk::resources::FilterValue;
///
/// assert_eq!(FilterValue::from(vec![1, 2, 3]).to_string(), "1,2,3");
/// assert_eq!(FilterValue::from("John").to_string(), "John");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// A string value.
    String(String),
    /// An integer value.
    Integer(i64),
    /// A floating point value.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// A list of values.
    List(Vec<FilterValue>),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::String(value) => f.write_str(value),
            FilterValue::Integer(value) => write!(f, "{value}"),
            // whole floats keep their `.0`, e.g. `1.0` rather than `1`
            FilterValue::Float(value) if value.fract() == 0.0 && value.abs() < 1e16 => {
                write!(f, "{value:.1}")
            }
            FilterValue::Float(value) => write!(f, "{value}"),
            FilterValue::Bool(value) => write!(f, "{value}"),
            FilterValue::List(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{value}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::String(value)
    }
}

impl From<&String> for FilterValue {
    fn from(value: &String) -> Self {
        FilterValue::String(value.clone())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Integer(i64::from(value))
    }
}

impl From<u32> for FilterValue {
    fn from(value: u32) -> Self {
        FilterValue::Integer(i64::from(value))
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Float(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(values: Vec<T>) -> Self {
        FilterValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FilterValue>, const N: usize> From<[T; N]> for FilterValue {
    fn from(values: [T; N]) -> Self {
        FilterValue::List(values.into_iter().map(Into::into).collect())
    }
}

// ============================================================================
// Sort
// ============================================================================

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortField {
    /// Dotted field name, without the `-` prefix.
    pub field: String,
    /// `true` for descending order.
    pub descending: bool,
}

impl SortField {
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix('-') {
            Some(field) => Self {
                field: normalize_field(field),
                descending: true,
            },
            None => Self {
                field: normalize_field(raw),
                descending: false,
            },
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-{}", self.field)
        } else {
            f.write_str(&self.field)
        }
    }
}

/// Ordered sort keys, in exactly the order given.
///
/// ```rust
/// use outreach_sdk::resources::SortSpec;
///
/// let from_str = SortSpec::from("-account.name,firstName");
/// let from_list = SortSpec::from(vec!["-account.name", "firstName"]);
/// assert_eq!(from_str, from_list);
/// assert_eq!(from_list.to_string(), "-account.name,firstName");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SortSpec {
    fields: Vec<SortField>,
}

impl SortSpec {
    /// Parses a comma-joined string; empty segments are skipped.
    pub fn parse(spec: &str) -> Self {
        Self::from_iter(spec.split(','))
    }

    /// The sort keys in order.
    pub fn fields(&self) -> &[SortField] {
        &self.fields
    }

    /// Returns `true` if there are no sort keys.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Appends the keys of `other`.
    pub(crate) fn extend(&mut self, other: SortSpec) {
        self.fields.extend(other.fields);
    }
}

impl<S: AsRef<str>> FromIterator<S> for SortSpec {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|raw| raw.as_ref().trim().to_string())
                .filter(|raw| !raw.is_empty() && raw != "-")
                .map(|raw| SortField::parse(&raw))
                .collect(),
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

impl From<&str> for SortSpec {
    fn from(spec: &str) -> Self {
        Self::parse(spec)
    }
}

impl From<String> for SortSpec {
    fn from(spec: String) -> Self {
        Self::parse(&spec)
    }
}

impl<S: AsRef<str>> From<Vec<S>> for SortSpec {
    fn from(fields: Vec<S>) -> Self {
        fields.iter().collect()
    }
}

impl<S: AsRef<str>> From<&[S]> for SortSpec {
    fn from(fields: &[S]) -> Self {
        fields.iter().collect()
    }
}

impl<S: AsRef<str>, const N: usize> From<[S; N]> for SortSpec {
    fn from(fields: [S; N]) -> Self {
        fields.iter().collect()
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Builds `filter[...]` parameters in insertion order.
///
/// Fails with `InvalidFilterParameter` on the first field that is not in
/// `filter_fields`.
pub(crate) fn filter_params(
    filters: &[(String, FilterValue)],
    filter_fields: &BTreeSet<String>,
) -> Result<Vec<(String, String)>> {
    filters
        .iter()
        .map(|(raw, value)| {
            let field = normalize_field(raw);
            if !filter_fields.contains(&field) {
                return Err(Error::invalid_filter(&field));
            }
            let key = field
                .split('.')
                .fold(String::from("filter"), |key, part| format!("{key}[{part}]"));
            Ok((key, value.to_string()))
        })
        .collect()
}

/// Builds the `sort` parameter, or nothing for an empty spec.
pub(crate) fn sort_param(
    sort: &SortSpec,
    sort_fields: &BTreeSet<String>,
) -> Result<Option<(String, String)>> {
    if let Some(invalid) = sort
        .fields()
        .iter()
        .find(|key| !sort_fields.contains(&key.field))
    {
        return Err(Error::invalid_sort(&invalid.field));
    }
    if sort.is_empty() {
        return Ok(None);
    }
    Ok(Some(("sort".to_string(), sort.to_string())))
}

/// Builds `include` and `fields[type]` parameters.
///
/// Only the first segment of each include path is checked against the
/// schema. A dotted field's relation path must be one of the includes; its
/// type is found by walking the relationships from the primary schema.
pub(crate) fn include_params(
    resolved: &ResolvedSchema,
    catalog: &dyn ResourceCatalog,
    include: &[String],
    fields: &[String],
) -> Result<Vec<(String, String)>> {
    let schema = &resolved.schema;

    for path in include {
        let first = path.split('.').next().unwrap_or_default();
        if schema.relationship(first).is_none() {
            return Err(Error::no_related_resource(&schema.resource_type, first));
        }
    }

    // (type, fields) in first-appearance order
    let mut by_type: Vec<(String, Vec<String>)> = Vec::new();
    for field in fields {
        let (resource_type, attribute) = match field.rsplit_once('.') {
            None => (schema.resource_type.clone(), field.as_str()),
            Some((relation_path, attribute)) => {
                if !include.iter().any(|path| path == relation_path) {
                    return Err(Error::related_resource_not_included());
                }
                let related = resolve_path(resolved, catalog, relation_path)?;
                (related.resource_type.clone(), attribute)
            }
        };

        match by_type.iter_mut().find(|(ty, _)| *ty == resource_type) {
            Some((_, attributes)) => attributes.push(attribute.to_string()),
            None => by_type.push((resource_type, vec![attribute.to_string()])),
        }
    }

    let mut params = Vec::with_capacity(by_type.len() + 1);
    if !include.is_empty() {
        params.push(("include".to_string(), include.join(",")));
    }
    params.extend(
        by_type
            .into_iter()
            .map(|(ty, attributes)| (format!("fields[{ty}]"), attributes.join(","))),
    );
    Ok(params)
}

/// Follows a dotted relationship path to the schema at its end.
fn resolve_path(
    resolved: &ResolvedSchema,
    catalog: &dyn ResourceCatalog,
    path: &str,
) -> Result<std::sync::Arc<ResourceSchema>> {
    let mut segments = path.split('.');
    let first = segments.next().unwrap_or_default();
    let mut current = resolved
        .related(first)
        .cloned()
        .ok_or_else(|| Error::no_related_resource(&resolved.schema.resource_type, first))?;

    for segment in segments {
        let next = current
            .relationship(segment)
            .ok_or_else(|| Error::no_related_resource(&current.resource_type, segment))?
            .resource
            .clone();
        current = catalog.lookup(&next)?;
    }
    Ok(current)
}
