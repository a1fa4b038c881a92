//! Typed access to the board REST API.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use taskboard_core::{
    AuthRequest, AuthResponse, EntityId, Label, LabelRequest, Project, ProjectMember, ProjectMemberRequest,
    ProjectRequest, ProjectRole, RefreshRequest, RegisterRequest, Task, TaskRequest,
};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::navigator::{LOGIN_ROUTE, Navigator};
use crate::session::Session;

/// Base URL used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// HTTP client bound to one API base URL and one session.
///
/// Each call attaches the stored bearer token when present. A 401 response
/// clears the session and sends the navigator to the login route before the
/// error is returned.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    session: Session,
    navigator: Arc<dyn Navigator>,
    login_route: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base.as_str())
            .field("login_route", &self.login_route)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client for `base_url`.
    ///
    /// # Errors
    /// Returns [`ApiError::Url`] when the URL does not parse or cannot be a base.
    pub fn new(base_url: &str, session: Session, navigator: Arc<dyn Navigator>) -> Result<Self, ApiError> {
        let base = Url::parse(base_url).map_err(|err| ApiError::Url(format!("{base_url}: {err}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Url(format!("{base_url}: cannot be a base URL")));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base,
            session,
            navigator,
            login_route: LOGIN_ROUTE.to_owned(),
        })
    }

    /// Override the route used for the 401 redirect.
    #[must_use]
    pub fn with_login_route(mut self, route: impl Into<String>) -> Self {
        self.login_route = route.into();
        self
    }

    /// Session shared with this client.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Base URL all endpoints are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    // auth

    /// `POST /auth/login`
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or a non-2xx status.
    pub async fn login(&self, request: &AuthRequest) -> Result<AuthResponse, ApiError> {
        self.post_anonymous(&["auth", "login"], request).await
    }

    /// `POST /auth/register`. The body is returned as-is.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or a non-2xx status.
    pub async fn register(&self, request: &RegisterRequest) -> Result<serde_json::Value, ApiError> {
        self.post_anonymous(&["auth", "register"], request).await
    }

    /// `POST /auth/refresh`
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or a non-2xx status.
    pub async fn refresh_token(&self, request: &RefreshRequest) -> Result<AuthResponse, ApiError> {
        self.post_anonymous(&["auth", "refresh"], request).await
    }

    // projects

    /// `GET /projects`
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or a non-2xx status.
    pub async fn projects(&self) -> Result<Vec<Project>, ApiError> {
        self.send_json(Method::GET, &["projects"], None::<&()>).await
    }

    /// `GET /projects/{id}`
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or a non-2xx status.
    pub async fn project(&self, id: EntityId) -> Result<Project, ApiError> {
        self.send_json(Method::GET, &["projects", &id.to_string()], None::<&()>)
            .await
    }

    /// `POST /projects`
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or a non-2xx status.
    pub async fn create_project(&self, request: &ProjectRequest) -> Result<Project, ApiError> {
        self.send_json(Method::POST, &["projects"], Some(request)).await
    }

    /// `PUT /projects/{id}`
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or a non-2xx status.
    pub async fn update_project(&self, id: EntityId, request: &ProjectRequest) -> Result<Project, ApiError> {
        self.send_json(Method::PUT, &["projects", &id.to_string()], Some(request))
            .await
    }

    /// `DELETE /projects/{id}`
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or a non-2xx status.
    pub async fn delete_project(&self, id: EntityId) -> Result<(), ApiError> {
        self.send_empty(Method::DELETE, &["projects", &id.to_string()]).await
    }

    // tasks

    /// `GET /tasks/project/{projectId}`
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or a non-2xx status.
    pub async fn project_tasks(&self, project_id: EntityId) -> Result<Vec<Task>, ApiError> {
        self.send_json(
            Method::GET,
            &["tasks", "project", &project_id.to_string()],
            None::<&()>,
        )
        .await
    }

    /// `GET /tasks/my-tasks`
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or a non-2xx status.
    pub async fn my_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.send_json(Method::GET, &["tasks", "my-tasks"], None::<&()>).await
    }

    /// `GET /tasks/{id}`
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or a non-2xx status.
    pub async fn task(&self, id: EntityId) -> Result<Task, ApiError> {
        self.send_json(Method::GET, &["tasks", &id.to_string()], None::<&()>)
            .await
    }

    /// `POST /tasks`
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or a non-2xx status.
    pub async fn create_task(&self, request: &TaskRequest) -> Result<Task, ApiError> {
        self.send_json(Method::POST, &["tasks"], Some(request)).await
    }

    /// `PUT /tasks/{id}`
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or a non-2xx status.
    pub async fn update_task(&self, id: EntityId, request: &TaskRequest) -> Result<Task, ApiError> {
        self.send_json(Method::PUT, &["tasks", &id.to_string()], Some(request))
            .await
    }

    /// `DELETE /tasks/{id}`
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or a non-2xx status.
    pub async fn delete_task(&self, id: EntityId) -> Result<(), ApiError> {
        self.send_empty(Method::DELETE, &["tasks", &id.to_string()]).await
    }

    // labels

    /// `GET /labels`
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or a non-2xx status.
    pub async fn labels(&self) -> Result<Vec<Label>, ApiError> {
        self.send_json(Method::GET, &["labels"], None::<&()>).await
    }

    /// `GET /labels/project/{projectId}`
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or a non-2xx status.
    pub async fn project_labels(&self, project_id: EntityId) -> Result<Vec<Label>, ApiError> {
        self.send_json(
            Method::GET,
            &["labels", "project", &project_id.to_string()],
            None::<&()>,
        )
        .await
    }

    /// `POST /labels`
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or a non-2xx status.
    pub async fn create_label(&self, request: &LabelRequest) -> Result<Label, ApiError> {
        self.send_json(Method::POST, &["labels"], Some(request)).await
    }

    /// `PUT /labels/{id}`
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or a non-2xx status.
    pub async fn update_label(&self, id: EntityId, request: &LabelRequest) -> Result<Label, ApiError> {
        self.send_json(Method::PUT, &["labels", &id.to_string()], Some(request))
            .await
    }

    /// `DELETE /labels/{id}`
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or a non-2xx status.
    pub async fn delete_label(&self, id: EntityId) -> Result<(), ApiError> {
        self.send_empty(Method::DELETE, &["labels", &id.to_string()]).await
    }

    // members

    /// `GET /projects/{id}/members`
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or a non-2xx status.
    pub async fn project_members(&self, project_id: EntityId) -> Result<Vec<ProjectMember>, ApiError> {
        self.send_json(
            Method::GET,
            &["projects", &project_id.to_string(), "members"],
            None::<&()>,
        )
        .await
    }

    /// `POST /projects/{id}/members`
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or a non-2xx status.
    pub async fn add_project_member(
        &self,
        project_id: EntityId,
        request: &ProjectMemberRequest,
    ) -> Result<ProjectMember, ApiError> {
        self.send_json(
            Method::POST,
            &["projects", &project_id.to_string(), "members"],
            Some(request),
        )
        .await
    }

    /// `PUT /projects/{id}/members/{username}/role`; the body is the bare role string.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or a non-2xx status.
    pub async fn update_member_role(
        &self,
        project_id: EntityId,
        username: &str,
        role: ProjectRole,
    ) -> Result<ProjectMember, ApiError> {
        self.send_json(
            Method::PUT,
            &["projects", &project_id.to_string(), "members", username, "role"],
            Some(&role),
        )
        .await
    }

    /// `DELETE /projects/{id}/members/{username}`
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or a non-2xx status.
    pub async fn remove_project_member(&self, project_id: EntityId, username: &str) -> Result<(), ApiError> {
        self.send_empty(
            Method::DELETE,
            &["projects", &project_id.to_string(), "members", username],
        )
        .await
    }

    // plumbing

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Url(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn anonymous_request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(segments)?;
        debug!("{method} {}", url.path());
        Ok(self.http.request(method, url))
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        let builder = self.anonymous_request(method, segments)?;
        Ok(match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        warn!("request to {} failed with status {status}", response.url().path());
        if status == StatusCode::UNAUTHORIZED {
            self.force_logout();
        }
        Err(ApiError::Status {
            status: status.as_u16(),
        })
    }

    fn force_logout(&self) {
        warn!("session rejected; clearing tokens");
        if let Err(err) = self.session.clear() {
            warn!("failed to clear session: {err}");
        }
        self.navigator.navigate(&self.login_route);
    }

    async fn send_json<B, T>(&self, method: Method, segments: &[&str], body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut builder = self.request(method, segments)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.decode(builder).await
    }

    // The auth endpoints never carry the stored token, even a stale one.
    async fn post_anonymous<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.anonymous_request(Method::POST, segments)?.json(body);
        self.decode(builder).await
    }

    async fn decode<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.execute(builder).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_empty(&self, method: Method, segments: &[&str]) -> Result<(), ApiError> {
        let builder = self.request(method, segments)?;
        self.execute(builder).await.map(drop)
    }
}
