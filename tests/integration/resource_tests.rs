//! Resource requests over the reqwest transport.

use outreach_sdk::{Client, Credentials, ErrorEnvelopePolicy, ErrorKind, PaginationConfig};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{TestServer, init_tracing, prospect_document};

#[tokio::test]
async fn test_list_sends_filters_sort_and_pagination() {
    let ts = TestServer::start().await.unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v2/prospects"))
        .and(header("authorization", "Bearer access_token"))
        .and(header("content-type", "application/vnd.api+json"))
        .and(query_param("filter[firstName]", "John"))
        .and(query_param("filter[emailAddresses][email]", "email@example.com"))
        .and(query_param("sort", "-account.name,firstName"))
        .and(query_param("page[size]", "50"))
        .and(query_param("count", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"type": "prospect", "id": 1}],
            "links": {"next": "https://api.outreach.io/api/v2/prospects?page[after]=x"},
        })))
        .expect(1)
        .mount(&ts.server)
        .await;

    let page = ts
        .client
        .resource("prospects")
        .unwrap()
        .list()
        .filter("firstName", "John")
        .filter("emailAddresses__email", "email@example.com")
        .sort(["-account.name", "firstName"])
        .await
        .unwrap();

    assert_eq!(page.status(), 200);
    assert_eq!(page.data().unwrap()[0]["id"], 1);
    assert!(page.next_page().unwrap().contains("page[after]"));
}

#[tokio::test]
async fn test_list_with_limit() {
    let ts = TestServer::start().await.unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v2/prospects"))
        .and(query_param("page[limit]", "3"))
        .and(query_param_is_missing("page[size]"))
        .and(query_param_is_missing("count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&ts.server)
        .await;

    ts.client
        .resource("prospects")
        .unwrap()
        .list()
        .pagination(PaginationConfig::default().with_limit(3))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_rejected_query_never_reaches_server() {
    let ts = TestServer::start().await.unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(0)
        .mount(&ts.server)
        .await;

    let prospects = ts.client.resource("prospects").unwrap();

    let err = prospects.list().filter("fiirstName", "John").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFilterParameter);

    let err = prospects.list().sort("-fiirstName").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSortParameter);

    let err = prospects.get(1).include(["boss"]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoRelatedResource);

    let err = prospects.get(1).fields(["owner.email"]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RelatedResourceNotIncluded);
}

#[tokio::test]
async fn test_get_with_include_and_fields() {
    let ts = TestServer::start().await.unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v2/prospects/1"))
        .and(query_param("include", "owner"))
        .and(query_param("fields[prospect]", "firstName,lastName"))
        .and(query_param("fields[user]", "firstName"))
        .respond_with(ResponseTemplate::new(200).set_body_json(prospect_document(1)))
        .expect(1)
        .mount(&ts.server)
        .await;

    let envelope = ts
        .client
        .resource("prospects")
        .unwrap()
        .get(1)
        .include(["owner"])
        .fields(["firstName", "lastName", "owner.firstName"])
        .await
        .unwrap();

    assert_eq!(envelope.data().unwrap()["attributes"]["firstName"], "John");
    assert_eq!(envelope.included().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_update_delete() {
    let ts = TestServer::start().await.unwrap();

    Mock::given(method("POST"))
        .and(path("/api/v2/prospects"))
        .and(body_json(json!({
            "data": {"type": "prospect", "attributes": {"firstName": "John"}}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(prospect_document(5)))
        .expect(1)
        .mount(&ts.server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/api/v2/prospects/5"))
        .and(body_json(json!({
            "data": {"type": "prospect", "id": 5, "attributes": {"tags": ["Tag 1", "Tag 2"]}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(prospect_document(5)))
        .expect(1)
        .mount(&ts.server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/v2/prospects/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&ts.server)
        .await;

    let prospects = ts.client.resource("prospects").unwrap();

    let created = prospects
        .create(json!({"firstName": "John", "createdAt": "2020-07-01T12:00:00Z"}))
        .await
        .unwrap();
    assert_eq!(created.status(), 201);

    prospects
        .update(5, json!({"tags": ["Tag 1", "Tag 2"], "name": "James Bond"}))
        .await
        .unwrap();

    let deleted = prospects.delete(5).await.unwrap();
    assert_eq!(deleted.status(), 204);
    assert!(deleted.data().is_none());
}

#[tokio::test]
async fn test_error_document_raises_api_error() {
    let ts = TestServer::start().await.unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v2/prospects/1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "errors": [{
                "id": "unauthorizedRequest",
                "title": "Unauthorized Request",
                "detail": "You are not authorized to perform that request.",
            }]
        })))
        .mount(&ts.server)
        .await;

    let err = ts.client.resource("prospects").unwrap().get(1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.status(), Some(403));
    assert_eq!(
        err.api_error().unwrap().to_string(),
        "403 Unauthorized Request\ndetail: You are not authorized to perform that request."
    );
}

#[tokio::test]
async fn test_error_document_returned_under_return_policy() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/users/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{"id": "resourceNotFound", "title": "Resource Not Found"}]
        })))
        .mount(&server)
        .await;

    let client = Client::builder()
        .api_url(format!("{}/api/v2", server.uri()))
        .credentials(Credentials::new().with_access_token("access_token"))
        .error_envelope_policy(ErrorEnvelopePolicy::Return)
        .build()
        .unwrap();

    let envelope = client.resource("users").unwrap().get(9).await.unwrap();
    assert!(envelope.is_error());
    assert_eq!(envelope.status(), 404);
    assert_eq!(envelope.errors().unwrap()[0]["id"], "resourceNotFound");
}

#[tokio::test]
async fn test_non_json_failure_is_http_error() {
    let ts = TestServer::start().await.unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v2/accounts"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&ts.server)
        .await;

    let err = ts.client.resource("accounts").unwrap().list().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Http);
    assert_eq!(err.status(), Some(502));
    assert!(err.message().contains("Bad Gateway"));
}

#[tokio::test]
async fn test_unreachable_server_is_connection_error() {
    init_tracing();
    let client = Client::builder()
        .api_url("http://127.0.0.1:1/api/v2")
        .credentials(Credentials::new())
        .build()
        .unwrap();

    let err = client.resource("users").unwrap().list().await.unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Connection | ErrorKind::Transport));
}
