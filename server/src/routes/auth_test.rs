use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use super::*;
use crate::config::CookieOptions;
use crate::routes::api_routes;
use crate::services::identity::{IdentityApi, IdentityError, LoginGrant};

// =============================================================================
// IN-MEMORY UPSTREAM
// =============================================================================

struct FakeIdentity {
    user: UserRecord,
    password: &'static str,
    token: &'static str,
    create_status: Option<(u16, &'static str)>,
    create_calls: AtomicUsize,
    get_calls: AtomicUsize,
}

impl FakeIdentity {
    fn new() -> Self {
        Self {
            user: UserRecord {
                id: "u-1".to_owned(),
                full_name: "Ann Lee".to_owned(),
                email: "ann@example.com".to_owned(),
                avatar_url: None,
                extra: serde_json::Map::new(),
            },
            password: "secret1",
            token: "tok-1",
            create_status: None,
            create_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
        }
    }

    fn failing_create(status: u16, message: &'static str) -> Self {
        Self { create_status: Some((status, message)), ..Self::new() }
    }
}

fn rejected(endpoint: &str, status: u16, message: Option<&str>) -> IdentityError {
    IdentityError::Status {
        endpoint: endpoint.to_owned(),
        status,
        message: message.map(str::to_owned),
        errors: None,
    }
}

#[async_trait::async_trait]
impl IdentityApi for FakeIdentity {
    async fn create_user(&self, payload: &CreateUserPayload) -> Result<UserRecord, IdentityError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some((status, message)) = self.create_status {
            return Err(rejected("POST /Users", status, Some(message)));
        }
        Ok(UserRecord {
            id: "u-new".to_owned(),
            full_name: payload.full_name.clone(),
            email: payload.email.clone(),
            avatar_url: None,
            extra: serde_json::Map::from_iter([("roleId".to_owned(), payload.role_id.clone())]),
        })
    }

    async fn get_user(&self, id: &str, bearer: &str) -> Result<UserRecord, IdentityError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if bearer != self.token {
            return Err(rejected("GET /Users/{id}", 401, None));
        }
        if id != self.user.id {
            return Err(rejected("GET /Users/{id}", 404, Some("User not found")));
        }
        Ok(self.user.clone())
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, IdentityError> {
        if credentials.email == self.user.email && credentials.password == self.password {
            Ok(LoginGrant { access_token: self.token.to_owned(), user_id: self.user.id.clone() })
        } else {
            Err(rejected("POST /Auth/login", 401, Some("Invalid email or password")))
        }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn test_app(identity: &Arc<FakeIdentity>) -> Router {
    api_routes(AppState::new(identity.clone(), CookieOptions::default()))
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn cookie_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn set_cookies(resp: &Response) -> Vec<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_owned())
        .collect()
}

fn set_cookie_for<'a>(cookies: &'a [String], name: &str) -> Option<&'a String> {
    cookies.iter().find(|c| c.starts_with(&format!("{name}=")))
}

async fn body_json(resp: Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn ann_registration() -> Value {
    json!({ "fullName": "Ann Lee", "email": "ann@example.com", "password": "secret1", "roleId": "r1" })
}

// =============================================================================
// register
// =============================================================================

#[tokio::test]
async fn register_returns_created_user() {
    let identity = Arc::new(FakeIdentity::new());
    let resp = test_app(&identity)
        .oneshot(json_request("POST", "/api/auth/register", &ann_registration()))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Registration successful");
    assert_eq!(body["user"]["id"], "u-new");
    assert_eq!(body["user"]["fullName"], "Ann Lee");
    assert_eq!(body["user"]["email"], "ann@example.com");
    assert_eq!(identity.create_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn register_missing_password_is_400_without_upstream_call() {
    let identity = Arc::new(FakeIdentity::new());
    let body = json!({ "fullName": "Ann Lee", "email": "ann@example.com", "roleId": "r1" });
    let resp = test_app(&identity)
        .oneshot(json_request("POST", "/api/auth/register", &body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Missing required fields");
    assert_eq!(identity.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn register_blank_field_is_400() {
    let identity = Arc::new(FakeIdentity::new());
    let body = json!({ "fullName": "  ", "email": "ann@example.com", "password": "secret1", "roleId": "r1" });
    let resp = test_app(&identity)
        .oneshot(json_request("POST", "/api/auth/register", &body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(identity.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn register_forwards_numeric_role_id() {
    let identity = Arc::new(FakeIdentity::new());
    let body = json!({ "fullName": "Ann Lee", "email": "ann@example.com", "password": "secret1", "roleId": 2 });
    let resp = test_app(&identity)
        .oneshot(json_request("POST", "/api/auth/register", &body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["user"]["roleId"], json!(2));
    assert_eq!(identity.create_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn register_null_or_blank_role_id_is_400() {
    let identity = Arc::new(FakeIdentity::new());
    for role in [Value::Null, json!(""), json!("   ")] {
        let body = json!({ "fullName": "Ann Lee", "email": "ann@example.com", "password": "secret1", "roleId": role });
        let resp = test_app(&identity)
            .oneshot(json_request("POST", "/api/auth/register", &body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "roleId {role}");
    }
    assert_eq!(identity.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn register_malformed_json_is_400() {
    let identity = Arc::new(FakeIdentity::new());
    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let resp = test_app(&identity).oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid request body");
    assert_eq!(identity.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn login_wrong_field_type_hides_decoder_detail() {
    let identity = Arc::new(FakeIdentity::new());
    let body = json!({ "email": "ann@example.com", "password": 12345 });
    let resp = test_app(&identity)
        .oneshot(json_request("POST", "/api/auth/login", &body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let message = body_json(resp).await["message"].as_str().unwrap().to_owned();
    assert_eq!(message, "Invalid request body");
    assert!(!message.contains("line"));
}

#[tokio::test]
async fn register_forwards_upstream_failure() {
    let identity = Arc::new(FakeIdentity::failing_create(409, "Email already exists"));
    let resp = test_app(&identity)
        .oneshot(json_request("POST", "/api/auth/register", &ann_registration()))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Email already exists");
}

// =============================================================================
// login
// =============================================================================

#[tokio::test]
async fn login_sets_both_session_cookies() {
    let identity = Arc::new(FakeIdentity::new());
    let resp = test_app(&identity)
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &json!({ "email": "ann@example.com", "password": "secret1" }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let cookies = set_cookies(&resp);
    let token = set_cookie_for(&cookies, "accessToken").expect("accessToken cookie");
    let user = set_cookie_for(&cookies, "userId").expect("userId cookie");
    assert!(token.starts_with("accessToken=tok-1"));
    assert!(token.contains("HttpOnly"));
    assert!(token.contains("Path=/"));
    assert!(user.starts_with("userId=u-1"));

    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["userId"], "u-1");
}

#[tokio::test]
async fn login_rejected_credentials_surface_upstream_message() {
    let identity = Arc::new(FakeIdentity::new());
    let resp = test_app(&identity)
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &json!({ "email": "ann@example.com", "password": "wrong" }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&resp).is_empty());
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn login_missing_password_is_400() {
    let identity = Arc::new(FakeIdentity::new());
    let resp = test_app(&identity)
        .oneshot(json_request("POST", "/api/auth/login", &json!({ "email": "ann@example.com" })))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(set_cookies(&resp).is_empty());
}

// =============================================================================
// logout
// =============================================================================

#[tokio::test]
async fn logout_clears_cookies_and_succeeds() {
    let identity = Arc::new(FakeIdentity::new());
    let resp = test_app(&identity)
        .oneshot(cookie_request("POST", "/api/auth/logout", Some("accessToken=tok-1; userId=u-1")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let cookies = set_cookies(&resp);
    for name in ["accessToken", "userId"] {
        let cookie = set_cookie_for(&cookies, name).expect("removal cookie");
        assert!(cookie.contains("Max-Age=0"), "{cookie}");
    }
    let body = body_json(resp).await;
    assert_eq!(body, json!({ "success": true, "message": "Logged out successfully" }));
}

#[tokio::test]
async fn logout_without_session_still_succeeds() {
    let identity = Arc::new(FakeIdentity::new());
    let resp = test_app(&identity)
        .oneshot(cookie_request("POST", "/api/auth/logout", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(set_cookies(&resp).len(), 2);
}

// =============================================================================
// me
// =============================================================================

#[tokio::test]
async fn me_without_cookies_is_401() {
    let identity = Arc::new(FakeIdentity::new());
    let resp = test_app(&identity)
        .oneshot(cookie_request("GET", "/api/auth/me", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await, json!({ "success": false, "message": "Unauthorized" }));
    assert_eq!(identity.get_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn me_with_partial_session_is_401() {
    let identity = Arc::new(FakeIdentity::new());
    for cookie in ["accessToken=tok-1", "userId=u-1", "accessToken=; userId=u-1"] {
        let resp = test_app(&identity)
            .oneshot(cookie_request("GET", "/api/auth/me", Some(cookie)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "cookie {cookie:?}");
        assert_eq!(body_json(resp).await["success"], false);
    }
    assert_eq!(identity.get_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn me_with_session_returns_user() {
    let identity = Arc::new(FakeIdentity::new());
    let resp = test_app(&identity)
        .oneshot(cookie_request("GET", "/api/auth/me", Some("accessToken=tok-1; userId=u-1")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(set_cookies(&resp).is_empty());
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["id"], "u-1");
    assert_eq!(body["user"]["fullName"], "Ann Lee");
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn me_with_stale_token_clears_session() {
    let identity = Arc::new(FakeIdentity::new());
    let resp = test_app(&identity)
        .oneshot(cookie_request("GET", "/api/auth/me", Some("accessToken=expired; userId=u-1")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let cookies = set_cookies(&resp);
    assert!(set_cookie_for(&cookies, "accessToken").unwrap().contains("Max-Age=0"));
    assert!(set_cookie_for(&cookies, "userId").unwrap().contains("Max-Age=0"));
    assert_eq!(body_json(resp).await["success"], false);
}

#[tokio::test]
async fn me_with_other_upstream_failure_keeps_session() {
    let identity = Arc::new(FakeIdentity::new());
    let resp = test_app(&identity)
        .oneshot(cookie_request("GET", "/api/auth/me", Some("accessToken=tok-1; userId=u-gone")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(set_cookies(&resp).is_empty());
    assert_eq!(body_json(resp).await["message"], "User not found");
}

// =============================================================================
// user profile
// =============================================================================

#[tokio::test]
async fn profile_requires_session() {
    let identity = Arc::new(FakeIdentity::new());
    let resp = test_app(&identity)
        .oneshot(cookie_request("GET", "/api/users/u-1/profile", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_returns_requested_user() {
    let identity = Arc::new(FakeIdentity::new());
    let resp = test_app(&identity)
        .oneshot(cookie_request("GET", "/api/users/u-1/profile", Some("accessToken=tok-1; userId=u-1")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["user"]["email"], "ann@example.com");
}
