use brokerscope_core::errors::*;

#[test]
fn connection_failed_carries_endpoint() {
    let err = AdapterError::ConnectionFailed {
        endpoint: "http://rabbit:15672/api/overview".into(),
        reason: "connection refused".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("http://rabbit:15672/api/overview"));
    assert!(msg.contains("connection refused"));
}

#[test]
fn http_404_is_not_found() {
    let err = AdapterError::HttpStatus {
        endpoint: "/stats".into(),
        status: 404,
    };
    assert!(err.is_not_found());
    let err = AdapterError::HttpStatus {
        endpoint: "/stats".into(),
        status: 500,
    };
    assert!(!err.is_not_found());
}

#[test]
fn adapter_error_is_connection_class() {
    let err: ScopeError = AdapterError::Timeout {
        endpoint: "x".into(),
        timeout_ms: 3000,
    }
    .into();
    assert!(err.is_connection());
    assert!(!err.is_not_found());
}

#[test]
fn not_found_is_visible_through_scope_error() {
    let err: ScopeError = AdapterError::HttpStatus {
        endpoint: "/admin/v2/broker-stats/load-report".into(),
        status: 404,
    }
    .into();
    assert!(err.is_not_found());
    assert!(err.is_connection());

    let err = ScopeError::Aggregation {
        reason: "join failed".into(),
    };
    assert!(!err.is_connection());
    assert!(!err.is_not_found());
}

#[test]
fn storage_error_converts_to_scope_error() {
    let err: ScopeError = StorageError::Sqlite {
        message: "disk full".into(),
    }
    .into();
    assert!(matches!(err, ScopeError::Storage(_)));
    assert!(!err.is_connection());
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn migration_failure_names_version() {
    let err = StorageError::MigrationFailed {
        version: 2,
        reason: "boom".into(),
    };
    assert!(err.to_string().contains('2'));
}
