//! API resource handles and their request builders.

use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

use serde::Serialize;
use serde_json::{Map, Value};

use super::envelope::Envelope;
use super::fields::{self, ResolvedSchema};
use super::query::{self, FilterValue, SortSpec};
use super::schema::ResourceSchema;
use crate::config::PaginationConfig;
use crate::transport::Method;
use crate::{Client, Error, Result};

/// One API resource, e.g. `prospects`, bound to a [`Client`].
///
/// Filter, sort, include and fieldset arguments are checked against the
/// resource schema before any request is sent.
///
/// ## Field Sets
///
/// [`filter_fields()`](Self::filter_fields),
/// [`sort_fields()`](Self::sort_fields) and
/// [`readonly_fields()`](Self::readonly_fields) hold the resource's own
/// qualifying attributes plus `relationName.attribute` for each qualifying
/// attribute of a related resource. Each set is derived once, on first use,
/// and shared by every clone of the handle.
///
/// ## Example
///
/// ```rust,no_run
/// use outreach_sdk::{Client, PaginationConfig};
///
/// # async fn example(client: Client) -> Result<(), outreach_sdk::Error> {
/// let prospects = client.resource("prospects")?;
///
/// let page = prospects
///     .list()
///     .filter("firstName", "John")
///     .filter("emailAddresses__email", "email@example.com")
///     .sort(["-account.name", "firstName"])
///     .pagination(PaginationConfig::default().with_limit(3))
///     .await?;
///
/// let one = prospects
///     .get(1)
///     .include(["owner"])
///     .fields(["firstName", "owner.email"])
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiResource {
    client: Client,
    state: Arc<ResourceState>,
}

struct ResourceState {
    name: String,
    url: String,
    resolved: ResolvedSchema,
    filter_fields: OnceLock<BTreeSet<String>>,
    sort_fields: OnceLock<BTreeSet<String>>,
    readonly_fields: OnceLock<BTreeSet<String>>,
}

impl ApiResource {
    /// Looks up `name` and its related resources in the client's catalog.
    pub(crate) fn new(client: Client, name: &str) -> Result<Self> {
        let catalog = client.catalog();
        let schema = catalog.lookup(name)?;
        let related = schema
            .relationships
            .iter()
            .map(|rel| Ok((rel.rel_name.clone(), catalog.lookup(&rel.resource)?)))
            .collect::<Result<Vec<_>>>()?;
        let url = format!("{}/{}", client.api_url(), schema.api_path);

        Ok(Self {
            client,
            state: Arc::new(ResourceState {
                name: name.to_string(),
                url,
                resolved: ResolvedSchema { schema, related },
                filter_fields: OnceLock::new(),
                sort_fields: OnceLock::new(),
                readonly_fields: OnceLock::new(),
            }),
        })
    }

    /// Catalog name, e.g. `prospects`.
    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// Collection URL, e.g. `https://api.outreach.io/api/v2/prospects`.
    pub fn url(&self) -> &str {
        &self.state.url
    }

    /// JSON:API type, e.g. `prospect`.
    pub fn resource_type(&self) -> &str {
        &self.state.resolved.schema.resource_type
    }

    /// The resource schema.
    pub fn schema(&self) -> &ResourceSchema {
        &self.state.resolved.schema
    }

    /// Names accepted by [`ListRequest::filter`].
    pub fn filter_fields(&self) -> &BTreeSet<String> {
        self.state
            .filter_fields
            .get_or_init(|| self.state.resolved.qualifying(fields::filterable))
    }

    /// Names accepted by [`ListRequest::sort`].
    pub fn sort_fields(&self) -> &BTreeSet<String> {
        self.state
            .sort_fields
            .get_or_init(|| self.state.resolved.qualifying(fields::sortable))
    }

    /// Names dropped from create and update bodies.
    pub fn readonly_fields(&self) -> &BTreeSet<String> {
        self.state
            .readonly_fields
            .get_or_init(|| self.state.resolved.qualifying(fields::readonly))
    }

    /// Starts a collection request.
    pub fn list(&self) -> ListRequest {
        ListRequest {
            resource: self.clone(),
            filters: Vec::new(),
            sort: SortSpec::default(),
            pagination: None,
        }
    }

    /// Starts a single-resource request.
    pub fn get(&self, id: u64) -> GetRequest {
        GetRequest {
            resource: self.clone(),
            id,
            include: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Creates a resource.
    ///
    /// `attributes` must serialize to a JSON object. Readonly attributes are
    /// dropped, never rejected.
    pub async fn create(&self, attributes: impl Serialize) -> Result<Envelope> {
        let attributes = self.writable_attributes(attributes)?;
        let body = serde_json::json!({
            "data": {
                "type": self.resource_type(),
                "attributes": attributes,
            }
        });
        self.client
            .inner()
            .execute(Method::Post, self.url().to_string(), Vec::new(), Some(body))
            .await
    }

    /// Updates a resource's attributes.
    ///
    /// Readonly attributes are dropped, never rejected.
    pub async fn update(&self, id: u64, attributes: impl Serialize) -> Result<Envelope> {
        let attributes = self.writable_attributes(attributes)?;
        let body = serde_json::json!({
            "data": {
                "type": self.resource_type(),
                "id": id,
                "attributes": attributes,
            }
        });
        self.client
            .inner()
            .execute(Method::Patch, self.member_url(id), Vec::new(), Some(body))
            .await
    }

    /// Deletes a resource. An empty response body yields an empty envelope.
    pub async fn delete(&self, id: u64) -> Result<Envelope> {
        self.client
            .inner()
            .execute(Method::Delete, self.member_url(id), Vec::new(), None)
            .await
    }

    fn member_url(&self, id: u64) -> String {
        format!("{}/{}", self.state.url, id)
    }

    fn writable_attributes(&self, attributes: impl Serialize) -> Result<Map<String, Value>> {
        let mut attributes = match serde_json::to_value(attributes) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(Error::configuration("attributes must be a JSON object")),
            Err(e) => {
                return Err(
                    Error::configuration(format!("attributes cannot be serialized: {e}")).with_source(e),
                );
            }
        };

        let readonly = self.readonly_fields();
        let stripped: Vec<String> = attributes
            .keys()
            .filter(|key| readonly.contains(key.as_str()))
            .cloned()
            .collect();
        if !stripped.is_empty() {
            tracing::debug!(
                resource = %self.name(),
                stripped = ?stripped,
                "dropping readonly attributes"
            );
            for key in &stripped {
                attributes.remove(key);
            }
        }
        Ok(attributes)
    }
}

impl std::fmt::Debug for ApiResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiResource")
            .field("name", &self.state.name)
            .field("url", &self.state.url)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Request Builders
// ============================================================================

/// Request to list a resource collection.
///
/// Await it directly; validation runs first and a rejected query is never
/// sent.
#[must_use = "requests do nothing unless awaited"]
pub struct ListRequest {
    resource: ApiResource,
    filters: Vec<(String, FilterValue)>,
    sort: SortSpec,
    pagination: Option<PaginationConfig>,
}

impl ListRequest {
    /// Adds a filter. Related attributes use `relation.attr` or
    /// `relation__attr`.
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    /// Adds several filters.
    pub fn filters<I, K, V>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FilterValue>,
    {
        self.filters
            .extend(filters.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Adds sort keys, as a comma-joined string or a list; `-` marks
    /// descending.
    pub fn sort(mut self, sort: impl Into<SortSpec>) -> Self {
        self.sort.extend(sort.into());
        self
    }

    /// Overrides the resource's default pagination.
    pub fn pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Validates and renders the query: filters, then sort, then paging.
    pub fn query_params(&self) -> Result<Vec<(String, String)>> {
        let mut params = query::filter_params(&self.filters, self.resource.filter_fields())?;
        if let Some(sort) = query::sort_param(&self.sort, self.resource.sort_fields())? {
            params.push(sort);
        }
        let pagination = self
            .pagination
            .unwrap_or_else(|| self.resource.client.pagination());
        params.extend(pagination.query_params());
        Ok(params)
    }

    async fn execute(self) -> Result<Envelope> {
        let params = self.query_params()?;
        self.resource
            .client
            .inner()
            .execute(Method::Get, self.resource.url().to_string(), params, None)
            .await
    }
}

impl std::future::IntoFuture for ListRequest {
    type Output = Result<Envelope>;
    type IntoFuture = std::pin::Pin<Box<dyn std::future::Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.execute())
    }
}

/// Request to fetch one resource by id.
#[must_use = "requests do nothing unless awaited"]
pub struct GetRequest {
    resource: ApiResource,
    id: u64,
    include: Vec<String>,
    fields: Vec<String>,
}

impl GetRequest {
    /// Adds relationships to side-load, e.g. `owner` or `account.owner`.
    pub fn include<I, S>(mut self, include: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.extend(include.into_iter().map(Into::into));
        self
    }

    /// Adds sparse fieldset entries: `attr` for this resource,
    /// `relation.attr` for an included one.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Validates and renders the query: include, then fieldsets.
    pub fn query_params(&self) -> Result<Vec<(String, String)>> {
        query::include_params(
            &self.resource.state.resolved,
            self.resource.client.catalog(),
            &self.include,
            &self.fields,
        )
    }

    async fn execute(self) -> Result<Envelope> {
        let params = self.query_params()?;
        self.resource
            .client
            .inner()
            .execute(Method::Get, self.resource.member_url(self.id), params, None)
            .await
    }
}

impl std::future::IntoFuture for GetRequest {
    type Output = Result<Envelope>;
    type IntoFuture = std::pin::Pin<Box<dyn std::future::Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.execute())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::resources::{AttributeOptions, StaticCatalog};
    use crate::testing::MockTransport;
    use crate::{Credentials, ErrorKind};

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn client(transport: Arc<MockTransport>) -> Client {
        Client::builder()
            .credentials(Credentials::new().with_access_token("access_token"))
            .transport(transport)
            .build()
            .unwrap()
    }

    fn prospects(transport: Arc<MockTransport>) -> ApiResource {
        client(transport).resource("prospects").unwrap()
    }

    #[test]
    fn test_resource_identity() {
        let prospects = prospects(Arc::new(MockTransport::new()));
        assert_eq!(prospects.name(), "prospects");
        assert_eq!(prospects.url(), "https://api.outreach.io/api/v2/prospects");
        assert_eq!(prospects.resource_type(), "prospect");
    }

    #[test]
    fn test_prospect_filter_fields() {
        let prospects = prospects(Arc::new(MockTransport::new()));
        assert_eq!(
            prospects.filter_fields(),
            &set(&[
                "createdAt", "emails", "engagedAt", "engagedScore", "externalSource", "firstName",
                "githubUsername", "lastName", "linkedInId", "linkedInSlug", "stackOverflowId",
                "title", "touchedAt", "twitterUsername", "updatedAt",
                "account.buyerIntentScore", "account.createdAt", "account.customId",
                "account.domain", "account.name", "account.named", "account.touchedAt",
                "account.updatedAt",
                "emailAddresses.bouncedAt", "emailAddresses.email", "emailAddresses.emailType",
                "emailAddresses.order", "emailAddresses.status", "emailAddresses.statusChangedAt",
                "emailAddresses.unsubscribedAt",
                "owner.createdAt", "owner.email", "owner.firstName", "owner.lastName",
                "owner.locked", "owner.updatedAt", "owner.username",
            ])
        );
    }

    #[test]
    fn test_prospect_sort_fields() {
        let prospects = prospects(Arc::new(MockTransport::new()));
        let sort = prospects.sort_fields();
        assert_eq!(sort.len(), 35);
        assert!(!sort.contains("emails"));
        assert!(!sort.contains("owner.locked"));
        assert!(sort.contains("account.name"));
    }

    #[test]
    fn test_prospect_readonly_fields() {
        let prospects = prospects(Arc::new(MockTransport::new()));
        assert_eq!(
            prospects.readonly_fields(),
            &set(&[
                "callOptedOut", "callsOptedAt", "clickCount", "contactHistogram", "createdAt",
                "emailOptedOut", "emailsOptedAt", "engagedAt", "engagedScore", "externalSource",
                "linkedInSlug", "name", "openCount", "optedOutAt", "replyCount", "smsOptedAt",
                "smsOptedOut", "timeZoneIana", "timeZoneInferred", "touchedAt", "updatedAt",
                "account.contactHistogram", "account.createdAt", "account.externalSource",
                "account.touchedAt", "account.trashedAt", "account.updatedAt",
                "emailAddresses.bouncedAt", "emailAddresses.createdAt",
                "emailAddresses.statusChangedAt", "emailAddresses.unsubscribedAt",
                "emailAddresses.updatedAt",
                "owner.createdAt", "owner.currentSignInAt", "owner.lastSignInAt", "owner.name",
                "owner.passwordExpiresAt", "owner.updatedAt",
            ])
        );
    }

    #[test]
    fn test_field_sets_are_memoized_across_clones() {
        let prospects = prospects(Arc::new(MockTransport::new()));
        let clone = prospects.clone();
        assert!(std::ptr::eq(prospects.filter_fields(), clone.filter_fields()));
        assert!(std::ptr::eq(prospects.sort_fields(), prospects.sort_fields()));
    }

    #[test]
    fn test_related_resource_missing_from_catalog() {
        let catalog = StaticCatalog::new().with_schema(
            "widgets",
            ResourceSchema::new("widgets", "widget").with_relationship("maker", "makers"),
        );
        let client = Client::builder()
            .credentials(Credentials::new())
            .catalog(Arc::new(catalog))
            .transport(Arc::new(MockTransport::new()))
            .build()
            .unwrap();
        let err = client.resource("widgets").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceNotSupported);
        assert!(err.message().contains("makers"));
    }

    #[tokio::test]
    async fn test_list_query() {
        let transport = Arc::new(MockTransport::new());
        prospects(transport.clone())
            .list()
            .filter("firstName", "John")
            .filter("emailAddresses__email", "email@example.com")
            .sort(vec!["-account.name", "firstName"])
            .await
            .unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, Method::Get);
        assert_eq!(sent.url, "https://api.outreach.io/api/v2/prospects");
        assert_eq!(
            sent.query_string(),
            "filter[firstName]=John&filter[emailAddresses][email]=email@example.com\
             &sort=-account.name,firstName&page[size]=50&count=false"
        );
    }

    #[test]
    fn test_list_limit_replaces_size_and_count() {
        let prospects = prospects(Arc::new(MockTransport::new()));
        let params = prospects
            .list()
            .pagination(PaginationConfig::default().with_limit(3))
            .query_params()
            .unwrap();
        assert_eq!(params, vec![("page[limit]".to_string(), "3".to_string())]);
    }

    #[test]
    fn test_client_pagination_is_the_default() {
        let client = Client::builder()
            .credentials(Credentials::new())
            .pagination(PaginationConfig::default().with_size(10).with_count(true))
            .transport(Arc::new(MockTransport::new()))
            .build()
            .unwrap();
        let params = client.resource("users").unwrap().list().query_params().unwrap();
        assert_eq!(
            params,
            vec![
                ("page[size]".to_string(), "10".to_string()),
                ("count".to_string(), "true".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_filter_sends_nothing() {
        let transport = Arc::new(MockTransport::new());
        let err = prospects(transport.clone())
            .list()
            .filter("fiirstName", "John")
            .filter("lastName", "Doe")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFilterParameter);
        assert_eq!(err.message(), "'fiirstName' field is not filterable.");
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_sort_sends_nothing() {
        let transport = Arc::new(MockTransport::new());
        let err = prospects(transport.clone())
            .list()
            .sort(["-fiirstName"])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSortParameter);
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_get_query() {
        let transport = Arc::new(MockTransport::new());
        prospects(transport.clone())
            .get(1)
            .include(["owner"])
            .fields(["firstName", "lastName", "owner.firstName", "owner.lastName"])
            .await
            .unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.url, "https://api.outreach.io/api/v2/prospects/1");
        assert_eq!(
            sent.query_string(),
            "include=owner&fields[prospect]=firstName,lastName&fields[user]=firstName,lastName"
        );
    }

    #[tokio::test]
    async fn test_get_fields_without_include_sends_nothing() {
        let transport = Arc::new(MockTransport::new());
        let err = prospects(transport.clone())
            .get(1)
            .fields(["owner.email"])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RelatedResourceNotIncluded);
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_update_body_drops_readonly() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, serde_json::json!({}));
        prospects(transport.clone())
            .update(
                1,
                serde_json::json!({"tags": ["Tag 1", "Tag 2"], "name": "James Bond", "createdAt": "x"}),
            )
            .await
            .unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, Method::Patch);
        assert_eq!(sent.url, "https://api.outreach.io/api/v2/prospects/1");
        assert_eq!(
            sent.body.unwrap(),
            serde_json::json!({
                "data": {"type": "prospect", "id": 1, "attributes": {"tags": ["Tag 1", "Tag 2"]}}
            })
        );
        assert!(sent.query.is_empty());
    }

    #[tokio::test]
    async fn test_create_body_drops_readonly() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct NewProspect {
            first_name: &'static str,
            engaged_score: f64,
        }

        let transport = Arc::new(MockTransport::new());
        transport.push_json(201, serde_json::json!({"data": {"type": "prospect", "id": 9}}));
        let created = prospects(transport.clone())
            .create(NewProspect {
                first_name: "John",
                engaged_score: 1.5,
            })
            .await
            .unwrap();
        assert_eq!(created.data().unwrap()["id"], 9);

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, Method::Post);
        assert_eq!(
            sent.body.unwrap(),
            serde_json::json!({"data": {"type": "prospect", "attributes": {"firstName": "John"}}})
        );
    }

    #[tokio::test]
    async fn test_create_requires_object() {
        let transport = Arc::new(MockTransport::new());
        let err = prospects(transport.clone())
            .create(vec![1, 2])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_empty_body() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(crate::transport::HttpResponse::new(204, ""));
        let envelope = prospects(transport.clone()).delete(3).await.unwrap();
        assert_eq!(envelope.status(), 204);
        assert!(envelope.data().is_none());

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, Method::Delete);
        assert_eq!(sent.url, "https://api.outreach.io/api/v2/prospects/3");
        assert!(sent.body.is_none());
    }

    #[tokio::test]
    async fn test_api_error() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(
            403,
            serde_json::json!({
                "errors": [{
                    "id": "unauthorizedRequest",
                    "title": "Unauthorized Request",
                    "detail": "You are not authorized to perform that request.",
                }]
            }),
        );
        let err = prospects(transport).get(1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(
            err.api_error().unwrap().to_string(),
            "403 Unauthorized Request\ndetail: You are not authorized to perform that request."
        );
    }

    #[tokio::test]
    async fn test_custom_catalog() {
        let catalog = StaticCatalog::new()
            .with_schema(
                "widgets",
                ResourceSchema::new("v1/widgets", "widget")
                    .with_attribute("size", AttributeOptions::queryable())
                    .with_relationship("maker", "makers"),
            )
            .with_schema(
                "makers",
                ResourceSchema::new("makers", "maker")
                    .with_attribute("name", AttributeOptions::queryable()),
            );
        let transport = Arc::new(MockTransport::new());
        let client = Client::builder()
            .api_url("http://localhost:9999")
            .credentials(Credentials::new())
            .catalog(Arc::new(catalog))
            .transport(transport.clone())
            .build()
            .unwrap();

        let widgets = client.resource("widgets").unwrap();
        assert_eq!(widgets.filter_fields(), &set(&["maker.name", "size"]));

        widgets
            .list()
            .filter("maker__name", "acme")
            .sort("-size")
            .pagination(PaginationConfig::default().with_limit(2000))
            .await
            .unwrap();
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.url, "http://localhost:9999/v1/widgets");
        assert_eq!(
            sent.query_string(),
            "filter[maker][name]=acme&sort=-size&page[limit]=1000"
        );
        assert!(!sent.headers.contains_key(http::header::AUTHORIZATION));
    }
}
