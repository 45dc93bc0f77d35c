use std::sync::Arc;

use mockall::predicate::{always, eq};
use serde_json::json;

use super::{Error, Headers, HttpClient, Method, MockHttpClient, Request, Response, StatusCode};

fn response(status: u16, body: &[u8], method: Method) -> Response {
    Response {
        body: body.to_vec(),
        headers: Headers::from([("Content-Type".to_string(), "application/json".to_string())]),
        status: StatusCode(status),
        request: Request {
            body: None,
            headers: Default::default(),
            method,
            url: "https://example.com".to_string(),
        },
    }
}

fn client_with(mock: MockHttpClient) -> Arc<dyn HttpClient> {
    Arc::new(mock)
}

#[tokio::test]
async fn test_basic_auth_and_form_body() {
    let mut mock = MockHttpClient::default();
    mock.expect_send()
        .once()
        .with(eq("https://example.com/token"), always(), always(), eq(Method::Post))
        .returning(|_, body, headers, method| {
            let headers = headers.unwrap();
            assert_eq!(
                "Basic Y2xpZW50OnNlY3JldA==",
                headers.get("Authorization").unwrap()
            );
            assert_eq!(
                "application/x-www-form-urlencoded",
                headers.get("Content-Type").unwrap()
            );
            assert_eq!(b"grant_type=client_credentials".to_vec(), body.unwrap());
            Ok(response(200, b"{}", method))
        });

    let client = client_with(mock);
    let response = super::RequestBuilder::new(client, Method::Post, "https://example.com/token")
        .basic_auth("client", "secret")
        .unwrap()
        .form([("grant_type", "client_credentials")])
        .unwrap()
        .send()
        .await
        .unwrap();

    assert_eq!(StatusCode(200), response.status);
}

#[tokio::test]
async fn test_json_body_and_response() {
    let mut mock = MockHttpClient::default();
    mock.expect_send()
        .once()
        .returning(|_, body, headers, method| {
            assert_eq!(
                "application/json",
                headers.unwrap().get("Content-Type").unwrap()
            );
            assert_eq!(br#"{"tan":"123456"}"#.to_vec(), body.unwrap());
            Ok(response(200, br#"{"state":"FINISHED"}"#, method))
        });

    let value: serde_json::Value =
        super::RequestBuilder::new(client_with(mock), Method::Put, "https://example.com")
            .json(json!({"tan": "123456"}))
            .unwrap()
            .send()
            .await
            .unwrap()
            .json()
            .unwrap();

    assert_eq!(json!({"state": "FINISHED"}), value);
}

#[tokio::test]
async fn test_error_for_status() {
    let mut mock = MockHttpClient::default();
    mock.expect_send()
        .once()
        .returning(|_, _, _, method| Ok(response(503, b"", method)));

    let result = super::RequestBuilder::new(client_with(mock), Method::Get, "https://example.com")
        .send()
        .await
        .unwrap()
        .error_for_status();

    assert!(matches!(
        result,
        Err(Error::Status(StatusCode(503)))
    ));
}

#[tokio::test]
async fn test_octet_stream_body_and_bearer_token() {
    let mut mock = MockHttpClient::default();
    mock.expect_send()
        .once()
        .returning(|_, body, headers, method| {
            let headers = headers.unwrap();
            assert_eq!("Bearer token", headers.get("Authorization").unwrap());
            assert_eq!(
                "application/octet-stream",
                headers.get("Content-Type").unwrap()
            );
            assert_eq!(vec![0x25, 0x50, 0x44, 0x46], body.unwrap());
            Ok(response(201, b"{}", method))
        });

    let response = super::RequestBuilder::new(client_with(mock), Method::Post, "https://example.com")
        .bearer_auth("token")
        .octet_stream(b"%PDF".to_vec())
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap();

    assert_eq!(StatusCode(201), response.status);
}

#[tokio::test]
async fn test_request_without_headers_sends_none() {
    let mut mock = MockHttpClient::default();
    mock.expect_send()
        .once()
        .withf(|_, body, headers, _| body.is_none() && headers.is_none())
        .returning(|_, _, _, method| Ok(response(200, b"", method)));

    super::RequestBuilder::new(client_with(mock), Method::Get, "https://example.com")
        .send()
        .await
        .unwrap();
}

#[test]
fn test_binary_body_is_summarized_in_logs() {
    assert_eq!("<2 bytes>", super::format_body(Some([0xffu8, 0xfe].as_slice())));
    assert_eq!("<none>", super::format_body(None));
}

#[test]
fn test_authorization_is_redacted_in_logs() {
    let headers = Headers::from([("Authorization".to_string(), "Bearer token".to_string())]);

    assert_eq!("Authorization: <redacted>", super::format_headers(&headers));
}
