use schema::NewAccount;

use super::*;

#[test]
fn notice_hides_server_detail() {
    let err = ApiError::Status { status: 500, message: "pq: relation missing".to_owned() };
    assert_eq!(err.notice("Failed to add account"), "Failed to add account");
}

#[test]
fn notice_names_invalid_field() {
    let err = ApiError::from(NewAccount::new("", "a@b.com").unwrap_err());
    assert_eq!(err.notice("Failed to add account"), "Name is required");
}

#[test]
fn login_notice_prefers_server_message_on_401() {
    let err = ApiError::Unauthorized { message: Some("no admin rights".to_owned()) };
    assert_eq!(err.login_notice(), "no admin rights");
    assert!(err.is_unauthorized());
}

#[test]
fn login_notice_falls_back_for_other_failures() {
    let err = ApiError::Transport(TransportError("connection refused".to_owned()));
    assert_eq!(err.login_notice(), LOGIN_FAILED);
    assert_eq!(ApiError::Unauthorized { message: None }.login_notice(), LOGIN_FAILED);
}

#[test]
fn unauthorized_display_includes_message() {
    let err = ApiError::Unauthorized { message: Some("expired".to_owned()) };
    assert_eq!(err.to_string(), "not authorized: expired");
    assert_eq!(ApiError::Unauthorized { message: None }.to_string(), "not authorized");
}
