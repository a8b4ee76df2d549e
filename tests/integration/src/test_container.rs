//! Container (Edit-IRI) integration tests.

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use swordstack_core::SwordConfig;
    use swordstack_model::{AuthFailure, ServerFault, SwordError};

    use crate::{ENTRY, PASSWORD, RecordingRepository, TestServer, USER, client, md5_hex};

    const ENTRY_TYPE: &str = "application/atom+xml;type=entry";

    #[tokio::test]
    async fn test_should_checksum_receipt_body() {
        let server = TestServer::start(SwordConfig::default()).await.unwrap();

        let resp = client()
            .get(server.url("/edit/1"))
            .basic_auth(USER, Some(PASSWORD))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-type").and_then(|v| v.to_str().ok()),
            Some(ENTRY_TYPE)
        );
        let md5 = resp
            .headers()
            .get("content-md5")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .unwrap();
        let body = resp.bytes().await.unwrap();
        assert_eq!(md5, md5_hex(&body));

        let xml = std::str::from_utf8(&body).unwrap();
        assert!(xml.contains(&format!("<id>{}</id>", server.url("/edit/1"))));
        assert!(xml.contains("<sword:treatment>stored</sword:treatment>"));
        assert!(xml.contains("<dcterms:title>Integration deposit</dcterms:title>"));
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_answer_head_with_get_headers() {
        let server = TestServer::start(SwordConfig::default()).await.unwrap();

        let get = client()
            .get(server.url("/edit/1"))
            .basic_auth(USER, Some(PASSWORD))
            .send()
            .await
            .unwrap();
        let head = client()
            .head(server.url("/edit/1"))
            .basic_auth(USER, Some(PASSWORD))
            .send()
            .await
            .unwrap();

        assert_eq!(get.status(), head.status());
        for name in ["content-type", "content-md5", "last-modified", "location"] {
            assert_eq!(get.headers().get(name), head.headers().get(name), "{name}");
        }
        assert!(head.bytes().await.unwrap().is_empty());
        assert!(!get.bytes().await.unwrap().is_empty());
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_negotiate_statement() {
        let server = TestServer::start(SwordConfig::default()).await.unwrap();

        let resp = client()
            .get(server.url("/edit/1"))
            .basic_auth(USER, Some(PASSWORD))
            .header("accept", "application/rdf+xml")
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-type").and_then(|v| v.to_str().ok()),
            Some("application/rdf+xml")
        );
        assert_eq!(server.repository.calls(), vec!["get_statement"]);
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_replace_metadata() {
        let server = TestServer::start(SwordConfig::default()).await.unwrap();

        let resp = client()
            .put(server.url("/edit/1"))
            .basic_auth(USER, Some(PASSWORD))
            .header("content-type", ENTRY_TYPE)
            .body(ENTRY)
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("location").and_then(|v| v.to_str().ok()),
            Some(server.url("/edit/1").as_str())
        );
        assert_eq!(server.repository.calls(), vec!["replace_metadata"]);
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_answer_no_content_when_receipts_disabled() {
        let config = SwordConfig::builder().return_deposit_receipt(false).build();
        let server = TestServer::start(config).await.unwrap();

        let resp = client()
            .put(server.url("/edit/1"))
            .basic_auth(USER, Some(PASSWORD))
            .header("content-type", ENTRY_TYPE)
            .body(ENTRY)
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(resp.headers().get("location").is_some());
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_route_empty_post_to_use_headers() {
        let server = TestServer::start(SwordConfig::default()).await.unwrap();

        let resp = client()
            .post(server.url("/edit/1"))
            .basic_auth(USER, Some(PASSWORD))
            .header("in-progress", "false")
            .header("content-length", "0")
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            server.repository.calls(),
            vec!["use_headers in_progress=false"]
        );
        assert_eq!(server.spool.stored(), 0);
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_reject_multipart_writes() {
        let server = TestServer::start(SwordConfig::default()).await.unwrap();
        let multipart = "multipart/related; boundary=\"===\"; type=\"application/atom+xml\"";

        for path in ["/edit/1", "/edit-media/1"] {
            for method in [reqwest::Method::PUT, reqwest::Method::POST] {
                let resp = client()
                    .request(method.clone(), server.url(path))
                    .basic_auth(USER, Some(PASSWORD))
                    .header("content-type", multipart)
                    .body("--===\r\n\r\n--===--")
                    .send()
                    .await
                    .unwrap();

                assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "{method} {path}");
                assert_eq!(
                    resp.headers().get("content-type").and_then(|v| v.to_str().ok()),
                    Some("application/xml")
                );
                let body = resp.text().await.unwrap();
                assert!(body.contains("http://purl.org/net/sword/error/MethodNotAllowed"));
            }
        }
        assert!(server.repository.calls().is_empty());
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_reject_non_entry_put() {
        let server = TestServer::start(SwordConfig::default()).await.unwrap();

        let resp = client()
            .put(server.url("/edit/1"))
            .basic_auth(USER, Some(PASSWORD))
            .header("content-type", "application/zip")
            .body("PK")
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = resp.text().await.unwrap();
        assert!(body.contains("PUT to Edit-IRI MUST be an Atom Entry"));
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_delete_container() {
        let server = TestServer::start(SwordConfig::default()).await.unwrap();

        let resp = client()
            .delete(server.url("/edit/1"))
            .basic_auth(USER, Some(PASSWORD))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(resp.bytes().await.unwrap().is_empty());
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_release_spooled_payload_once_on_failure() {
        let server = TestServer::start(SwordConfig::default()).await.unwrap();
        server
            .repository
            .fail_next(SwordError::error_content("unsupported packaging"));

        let resp = client()
            .post(server.url("/edit/1"))
            .basic_auth(USER, Some(PASSWORD))
            .header("content-type", "application/zip")
            .body(&b"PK\x03\x04 payload"[..])
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(server.spool.stored(), 1);
        assert_eq!(server.spool.release_calls(), 1);
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_release_spooled_payload_once_on_fault() {
        let server = TestServer::start(SwordConfig::default()).await.unwrap();
        server.repository.fail_next(ServerFault::new("repository offline"));

        let resp = client()
            .post(server.url("/edit/1"))
            .basic_auth(USER, Some(PASSWORD))
            .header("content-type", "application/zip")
            .body(&b"PK\x03\x04 payload"[..])
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(resp.bytes().await.unwrap().is_empty());
        assert_eq!(server.spool.stored(), 1);
        assert_eq!(server.spool.release_calls(), 1);
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_release_spooled_payload_once_on_rejection() {
        let server = TestServer::start(SwordConfig::default()).await.unwrap();
        server
            .repository
            .fail_next(AuthFailure::Rejected("not a depositor here".to_owned()));

        let resp = client()
            .post(server.url("/edit-media/1"))
            .basic_auth(USER, Some(PASSWORD))
            .body(&b"PK\x03\x04 payload"[..])
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(server.spool.stored(), 1);
        assert_eq!(server.spool.release_calls(), 1);
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_alias_sword_edit_to_edit() {
        let repository = RecordingRepository {
            sword_edit_only: true,
            ..RecordingRepository::default()
        };
        let server = TestServer::start_with(SwordConfig::default(), repository)
            .await
            .unwrap();

        let resp = client()
            .get(server.url("/edit/1"))
            .basic_auth(USER, Some(PASSWORD))
            .send()
            .await
            .unwrap();
        let xml = resp.text().await.unwrap();
        let iri = server.url("/edit/1");
        assert!(xml.contains(&format!("<link rel=\"edit\" href=\"{iri}\"/>")));
        assert!(xml.contains(&format!(
            "<link rel=\"http://purl.org/net/sword/terms/add\" href=\"{iri}\"/>"
        )));
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_alias_edit_to_sword_edit() {
        let server = TestServer::start(SwordConfig::default()).await.unwrap();

        let resp = client()
            .get(server.url("/edit/1"))
            .basic_auth(USER, Some(PASSWORD))
            .send()
            .await
            .unwrap();
        let xml = resp.text().await.unwrap();
        let iri = server.url("/edit/1");
        assert!(xml.contains(&format!(
            "<link rel=\"http://purl.org/net/sword/terms/add\" href=\"{iri}\"/>"
        )));
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_return_not_found_outside_endpoints() {
        let server = TestServer::start(SwordConfig::default()).await.unwrap();

        let resp = client()
            .get(server.url("/collections/1"))
            .basic_auth(USER, Some(PASSWORD))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let health = client().get(server.url("/health")).send().await.unwrap();
        assert_eq!(health.status(), StatusCode::OK);
        let json: serde_json::Value = health.json().await.unwrap();
        assert_eq!(json["status"], "running");
        server.stop().await.unwrap();
    }
}
