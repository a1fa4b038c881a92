#![allow(missing_docs)]

use std::sync::Arc;

use serde_json::{Value, json};
use taskboard_app::{
    AuthError, AuthStore, BoardError, BoardService, HOME_ROUTE, MemberError, MemberService, RegistrationForm,
    RouteDecision, Toaster,
};
use taskboard_client::{ApiClient, ApiError, RecordingNavigator, Session};
use taskboard_core::{
    AuthRequest, AuthResponse, ProjectMemberRequest, ProjectRole, TaskFilter, TaskStatus, ToastVariant,
};
use time::macros::datetime;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::new(
        &format!("{}/api", server.uri()),
        Session::in_memory(),
        Arc::new(RecordingNavigator::default()),
    )
    .unwrap_or_else(|err| panic!("client: {err}"));
    (server, client)
}

fn tokens() -> Value {
    json!({"token": "tok", "refreshToken": "ref"})
}

fn task(id: i64, status: &str, labels: Value) -> Value {
    json!({
        "id": id,
        "title": format!("Task {id}"),
        "description": "",
        "status": status,
        "priority": "MEDIUM",
        "assignedTo": "john",
        "projectName": "Core",
        "createdBy": "jane",
        "createdAt": "2024-01-01T00:00:00",
        "dueDate": null,
        "labels": labels
    })
}

fn member(username: &str, role: &str) -> Value {
    json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "role": role,
        "joinedAt": "2024-01-01T00:00:00"
    })
}

async fn mount_board(server: &MockServer) {
    let frontend = json!([{"id": 1, "name": "frontend", "color": "#3b82f6"}]);
    Mock::given(method("GET"))
        .and(path("/api/tasks/project/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            task(1, "TODO", frontend.clone()),
            task(2, "REVIEW", json!([])),
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/labels/project/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(frontend))
        .mount(server)
        .await;
}

#[tokio::test]
async fn login_persists_tokens_and_authenticates() {
    let (server, client) = client().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tokens()))
        .mount(&server)
        .await;

    let mut auth = AuthStore::initialized(client);
    assert!(!auth.is_authenticated());
    auth.login(&AuthRequest {
        username_or_email: "john".into(),
        password: "pw".into(),
    })
    .await
    .unwrap_or_else(|err| panic!("login: {err}"));

    assert!(auth.is_authenticated());
    assert_eq!(auth.client().session().token().as_deref(), Some("tok"));
    assert_eq!(auth.client().session().refresh_token().as_deref(), Some("ref"));
}

#[tokio::test]
async fn failed_login_stays_unauthenticated() {
    let (server, client) = client().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let mut auth = AuthStore::initialized(client);
    let result = auth
        .login(&AuthRequest {
            username_or_email: "john".into(),
            password: "wrong".into(),
        })
        .await;
    assert!(matches!(result, Err(AuthError::Api(ApiError::Status { status: 400 }))));
    assert!(!auth.is_authenticated());
    assert!(!auth.client().session().has_token());
}

#[tokio::test]
async fn unauthorized_call_signs_the_store_out() {
    let (server, client) = client().await;
    client
        .session()
        .store_tokens(&AuthResponse {
            token: "expired".into(),
            refresh_token: "ref".into(),
        })
        .unwrap_or_else(|err| panic!("store: {err}"));
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let auth = AuthStore::initialized(client);
    assert!(auth.is_authenticated());
    assert_eq!(auth.guard(HOME_ROUTE), RouteDecision::Render);

    let result = auth.client().projects().await;
    assert!(matches!(result, Err(ApiError::Status { status: 401 })));
    assert!(!auth.is_authenticated());
    assert!(!auth.state().is_authenticated);
    assert_eq!(auth.guard(HOME_ROUTE), RouteDecision::Redirect("/login"));
}

#[tokio::test]
async fn register_logs_in_with_email() {
    let (server, client) = client().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_json(json!({
            "username": "testuser",
            "email": "test@example.com",
            "password": "password123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"usernameOrEmail": "test@example.com", "password": "password123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(tokens()))
        .expect(1)
        .mount(&server)
        .await;

    let mut auth = AuthStore::initialized(client);
    auth.register_form(&RegistrationForm {
        username: "testuser".into(),
        email: "test@example.com".into(),
        password: "password123".into(),
        confirm_password: "password123".into(),
    })
    .await
    .unwrap_or_else(|err| panic!("register: {err}"));
    assert!(auth.is_authenticated());
}

#[tokio::test]
async fn invalid_registration_never_reaches_server() {
    let (server, client) = client().await;
    let mut auth = AuthStore::initialized(client);
    let result = auth
        .register_form(&RegistrationForm {
            username: "testuser".into(),
            email: "test@example.com".into(),
            password: "password123".into(),
            confirm_password: "password124".into(),
        })
        .await;
    let Err(AuthError::Validation(message)) = result else {
        panic!("expected a validation error");
    };
    assert_eq!(message, "Passwords do not match");
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn board_move_updates_after_server_accepts() {
    let (server, client) = client().await;
    mount_board(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/tasks/1"))
        .and(body_partial_json(json!({"status": "IN_PROGRESS", "projectId": 7, "labelIds": [1]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(task(1, "IN_PROGRESS", json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let mut board = BoardService::new(client, 7);
    board.load().await.unwrap_or_else(|err| panic!("load: {err}"));

    let moved = board
        .move_task(1, TaskStatus::InProgress)
        .await
        .unwrap_or_else(|err| panic!("move: {err}"));
    assert!(moved);
    assert_eq!(board.tasks()[0].status, TaskStatus::InProgress);

    let unchanged = board
        .move_task(2, TaskStatus::Review)
        .await
        .unwrap_or_else(|err| panic!("noop move: {err}"));
    assert!(!unchanged);
    let unknown = board
        .move_task(99, TaskStatus::Done)
        .await
        .unwrap_or_else(|err| panic!("unknown move: {err}"));
    assert!(!unknown);

    let columns = board.columns(&TaskFilter::default(), datetime!(2024-03-01 00:00:00 UTC));
    assert_eq!(columns[1].status, TaskStatus::InProgress);
    assert_eq!(columns[1].tasks.len(), 1);
}

#[tokio::test]
async fn board_move_failure_leaves_local_state() {
    let (server, client) = client().await;
    mount_board(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/tasks/2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut board = BoardService::new(client, 7);
    board.load().await.unwrap_or_else(|err| panic!("load: {err}"));
    let result = board.move_task(2, TaskStatus::Done).await;
    assert!(matches!(result, Err(BoardError::Api(ApiError::Status { status: 500 }))));
    assert_eq!(board.tasks()[1].status, TaskStatus::Review);
}

#[tokio::test]
async fn board_rejects_labels_from_other_projects() {
    let (server, client) = client().await;
    let foreign = json!([{"id": 42, "name": "elsewhere", "color": "#000000"}]);
    Mock::given(method("GET"))
        .and(path("/api/tasks/project/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([task(1, "TODO", foreign)])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/labels/project/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let mut board = BoardService::new(client, 7);
    board.load().await.unwrap_or_else(|err| panic!("load: {err}"));
    let result = board.move_task(1, TaskStatus::Done).await;
    assert!(matches!(result, Err(BoardError::ForeignLabel { label_id: 42 })));
    assert_eq!(board.tasks()[0].status, TaskStatus::Todo);
}

#[tokio::test]
async fn adding_member_reloads_and_toasts() {
    let (server, client) = client().await;
    Mock::given(method("POST"))
        .and(path("/api/projects/3/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(member("jane", "TEAM_MEMBER")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/projects/3/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            member("john", "OWNER"),
            member("jane", "TEAM_MEMBER"),
        ])))
        .mount(&server)
        .await;

    let toaster = Toaster::default();
    let mut members = MemberService::new(client, toaster.clone(), 3);
    members
        .add(&ProjectMemberRequest::new(" jane "))
        .await
        .unwrap_or_else(|err| panic!("add: {err}"));

    assert_eq!(members.members().len(), 2);
    let toasts = toaster.toasts();
    assert_eq!(toasts[0].title.as_deref(), Some("Success"));
    assert_eq!(
        toasts[0].description.as_deref(),
        Some("jane has been added to the project")
    );
}

#[tokio::test]
async fn member_failures_toast_and_return_error() {
    let (server, client) = client().await;
    Mock::given(method("POST"))
        .and(path("/api/projects/3/members"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/projects/3/members"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let toaster = Toaster::default();
    let mut members = MemberService::new(client, toaster.clone(), 3);

    let result = members.load().await;
    assert!(matches!(result, Err(MemberError::Api(_))));
    assert_eq!(
        toaster.toasts()[0].description.as_deref(),
        Some("Failed to load project members")
    );

    let result = members.add(&ProjectMemberRequest::new("ghost")).await;
    assert!(matches!(result, Err(MemberError::Api(ApiError::Status { status: 404 }))));
    let toast = &toaster.toasts()[0];
    assert_eq!(toast.variant, ToastVariant::Destructive);
    assert_eq!(
        toast.description.as_deref(),
        Some("Failed to add member. Please check if the username exists.")
    );
}

#[tokio::test]
async fn owner_rules_are_checked_before_sending() {
    let (server, client) = client().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/3/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([member("john", "OWNER")])))
        .mount(&server)
        .await;

    let toaster = Toaster::default();
    let mut members = MemberService::new(client, toaster.clone(), 3);
    members.load().await.unwrap_or_else(|err| panic!("load: {err}"));

    assert!(matches!(members.remove("john").await, Err(MemberError::Rule(_))));
    assert!(matches!(
        members.update_role("john", ProjectRole::Viewer).await,
        Err(MemberError::Rule(_))
    ));
    assert!(matches!(
        members.add(&ProjectMemberRequest::new("   ")).await,
        Err(MemberError::Rule(_))
    ));
    assert!(toaster.toasts().is_empty());
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), 1);
}
