//! Integration tests for network error handling

use ejbca_client::{Credentials, EjbcaClient, EstEnrollOptions, ServerTarget};

fn unreachable_client() -> EjbcaClient {
    // Port 9 (discard) on localhost is not expected to be listening.
    let target = ServerTarget::builder()
        .hostname("127.0.0.1")
        .tls_base_url("http://127.0.0.1:9")
        .plain_base_url("http://127.0.0.1:9")
        .build()
        .expect("Valid target");

    EjbcaClient::new(target)
}

#[tokio::test]
async fn test_rest_connection_refused() {
    let result = unreachable_client()
        .rest()
        .fetch_certificate("CN=ManagementCA", &Credentials::insecure())
        .await;

    let err = result.unwrap_err();
    assert!(err.is_transport(), "Should be transport error, got: {:?}", err);
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_est_connection_refused() {
    let result = unreachable_client()
        .est()
        .simple_enroll(b"MIIB", &Credentials::insecure(), &EstEnrollOptions::new())
        .await;

    assert!(result.unwrap_err().is_transport());
}

#[tokio::test]
async fn test_missing_credential_file() {
    let result = Credentials::builder()
        .ca_bundle("/nonexistent/ca-bundle.pem")
        .build();

    assert!(matches!(
        result,
        Err(ejbca_client::EjbcaError::CredentialFileNotFound { .. })
    ));
}
