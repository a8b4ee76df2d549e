//! Authentication integration tests.

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use swordstack_core::SwordConfig;

    use crate::{PASSWORD, TestServer, USER, client};

    #[tokio::test]
    async fn test_should_challenge_missing_credentials() {
        let server = TestServer::start(SwordConfig::default()).await.unwrap();

        let resp = client().get(server.url("/edit/1")).send().await.unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers()
                .get("www-authenticate")
                .and_then(|v| v.to_str().ok()),
            Some("Basic realm=\"SWORD2\"")
        );
        assert!(server.repository.calls().is_empty());
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_reject_malformed_credentials_without_challenge() {
        let server = TestServer::start(SwordConfig::default()).await.unwrap();

        let resp = client()
            .get(server.url("/edit/1"))
            .header("authorization", "Basic !!!not-base64!!!")
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(resp.headers().get("www-authenticate").is_none());
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_use_configured_realm() {
        let config = SwordConfig::builder().auth_realm("Repository".to_owned()).build();
        let server = TestServer::start(config).await.unwrap();

        let resp = client()
            .delete(server.url("/edit-media/1"))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers()
                .get("www-authenticate")
                .and_then(|v| v.to_str().ok()),
            Some("Basic realm=\"Repository\"")
        );
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_serve_anonymous_media_reads_when_enabled() {
        let config = SwordConfig::builder()
            .allow_unauthenticated_media_access(true)
            .build();
        let server = TestServer::start(config).await.unwrap();

        let read = client()
            .get(server.url("/edit-media/1"))
            .send()
            .await
            .unwrap();
        assert_eq!(read.status(), StatusCode::OK);

        let write = client()
            .put(server.url("/edit-media/1"))
            .body("data")
            .send()
            .await
            .unwrap();
        assert_eq!(write.status(), StatusCode::UNAUTHORIZED);
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_refuse_mediation_when_disabled() {
        let config = SwordConfig::builder().allow_mediation(false).build();
        let server = TestServer::start(config).await.unwrap();

        let resp = client()
            .get(server.url("/edit/1"))
            .basic_auth(USER, Some(PASSWORD))
            .header("on-behalf-of", "jbloggs")
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::PRECONDITION_FAILED);
        let body = resp.text().await.unwrap();
        assert!(body.contains("http://purl.org/net/sword/error/MediationNotAllowed"));
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_forbid_unknown_credentials_without_challenge() {
        let server = TestServer::start(SwordConfig::default()).await.unwrap();

        let resp = client()
            .get(server.url("/edit/1"))
            .basic_auth(USER, Some("wrong password"))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(resp.headers().get("www-authenticate").is_none());
        assert!(resp.bytes().await.unwrap().is_empty());
        assert!(server.repository.calls().is_empty());
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_challenge_upload_without_spooling_it() {
        let server = TestServer::start(SwordConfig::default()).await.unwrap();

        let resp = client()
            .post(server.url("/edit-media/1"))
            .header("content-type", "application/zip")
            .body(vec![0_u8; 16 * 1024])
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.headers().get("www-authenticate").is_some());
        assert_eq!(server.spool.stored(), 0);
        server.stop().await.unwrap();
    }
}
