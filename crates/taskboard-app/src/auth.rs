//! Authentication state for the signed-in user.
//!
//! Whether the user counts as authenticated is derived from token presence
//! alone. Tokens are only validated by the server; a 401 on any call clears
//! them through the API client.

use taskboard_client::{ApiClient, ApiError, LOGIN_ROUTE, Session, SessionError};
use taskboard_core::{AuthRequest, RegisterRequest};
use thiserror::Error;
use tracing::{debug, info};

/// Routes reachable without a session.
pub const PUBLIC_ROUTES: [&str; 2] = [LOGIN_ROUTE, "/register"];

/// Where an authenticated user lands after visiting a public route.
pub const HOME_ROUTE: &str = "/dashboard";

/// Errors raised by [`AuthStore`] operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The form was rejected before any request was sent.
    #[error("{0}")]
    Validation(String),
    /// The server call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Tokens could not be persisted.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl AuthError {
    /// Message shown next to the login form.
    #[must_use]
    pub fn login_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Api(_) | Self::Session(_) => "Invalid credentials. Please try again.".to_owned(),
        }
    }

    /// Message shown next to the registration form.
    #[must_use]
    pub fn registration_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Api(_) | Self::Session(_) => "Registration failed. Please try again.".to_owned(),
        }
    }
}

/// Loading and authentication flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthState {
    /// True until the persisted token has been checked.
    pub loading: bool,
    /// A token is present.
    pub is_authenticated: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            loading: true,
            is_authenticated: false,
        }
    }
}

/// What to do with a navigation to some route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session check not finished yet.
    Loading,
    /// Send the user elsewhere.
    Redirect(&'static str),
    /// Show the route.
    Render,
}

/// Login, registration and logout on top of an [`ApiClient`].
///
/// Once loaded, authentication always reflects the shared [`Session`], so a
/// 401 seen by any holder of the client signs this store out as well.
#[derive(Debug)]
pub struct AuthStore {
    client: ApiClient,
    loading: bool,
}

impl AuthStore {
    /// Store in its initial loading state.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            loading: true,
        }
    }

    /// Store already initialized from the persisted session.
    #[must_use]
    pub fn initialized(client: ApiClient) -> Self {
        let mut store = Self::new(client);
        store.initialize();
        store
    }

    /// Check the persisted token and leave the loading state.
    pub fn initialize(&mut self) {
        self.loading = false;
        debug!("auth initialized: authenticated={}", self.is_authenticated());
    }

    /// Current flags.
    #[must_use]
    pub fn state(&self) -> AuthState {
        AuthState {
            loading: self.loading,
            is_authenticated: self.is_authenticated(),
        }
    }

    /// Whether the user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.loading && self.session().has_token()
    }

    /// Whether the session check is still pending.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Client used for every call.
    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    fn session(&self) -> &Session {
        self.client.session()
    }

    /// Exchange credentials for tokens and persist them.
    ///
    /// # Errors
    /// Propagates the API error; the state stays unauthenticated.
    pub async fn login(&mut self, credentials: &AuthRequest) -> Result<(), AuthError> {
        let tokens = self.client.login(credentials).await?;
        self.session().store_tokens(&tokens)?;
        self.loading = false;
        info!("logged in as {}", credentials.username_or_email);
        Ok(())
    }

    /// Create an account, then log in with its email and password.
    ///
    /// # Errors
    /// Propagates a failure of either step.
    pub async fn register(&mut self, request: &RegisterRequest) -> Result<(), AuthError> {
        self.client.register(request).await?;
        info!("registered {}", request.username);
        self.login(&AuthRequest {
            username_or_email: request.email.clone(),
            password: request.password.clone(),
        })
        .await
    }

    /// Validate the form, then [`register`](Self::register).
    ///
    /// # Errors
    /// Returns [`AuthError::Validation`] without any request when the form is invalid.
    pub async fn register_form(&mut self, form: &RegistrationForm) -> Result<(), AuthError> {
        let request = form.validate()?;
        self.register(&request).await
    }

    /// Forget both tokens. Safe to call repeatedly.
    ///
    /// # Errors
    /// Returns an error when the session file cannot be updated.
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.session().clear()?;
        info!("logged out");
        Ok(())
    }

    /// Decide whether `route` may be shown.
    #[must_use]
    pub fn guard(&self, route: &str) -> RouteDecision {
        if self.loading {
            return RouteDecision::Loading;
        }
        let public = PUBLIC_ROUTES.contains(&route);
        match (self.is_authenticated(), public) {
            (false, false) => RouteDecision::Redirect(LOGIN_ROUTE),
            (true, true) => RouteDecision::Redirect(HOME_ROUTE),
            _ => RouteDecision::Render,
        }
    }
}

/// Sign-up form fields as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    /// Desired username.
    pub username: String,
    /// Address used for the automatic login after sign-up.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Must repeat `password` exactly.
    pub confirm_password: String,
}

impl RegistrationForm {
    /// Check the form and build the request.
    ///
    /// # Errors
    /// Returns [`AuthError::Validation`] when a field is blank or the passwords differ.
    pub fn validate(&self) -> Result<RegisterRequest, AuthError> {
        let fields = [
            ("Username", self.username.trim()),
            ("Email", self.email.trim()),
            ("Password", self.password.as_str()),
            ("Confirm Password", self.confirm_password.as_str()),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(AuthError::Validation(format!("{name} is required")));
        }
        if self.password != self.confirm_password {
            return Err(AuthError::Validation("Passwords do not match".to_owned()));
        }
        Ok(RegisterRequest {
            username: self.username.trim().to_owned(),
            email: self.email.trim().to_owned(),
            password: self.password.clone(),
        })
    }
}
