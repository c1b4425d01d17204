//! Authentication slice: the signed-in admin and session transitions.

use serde::Serialize;

use crate::client::ApiClient;
use crate::errors::ClientError;
use crate::models::{AuthResponse, LoginRequest, SignupRequest, User};

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: Option<User>,
    pub authenticated: bool,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct AuthSlice {
    client: ApiClient,
    state: AuthState,
}

impl AuthSlice {
    pub fn new(client: ApiClient) -> Self {
        let authenticated = client.session().is_authenticated();
        Self {
            client,
            state: AuthState {
                authenticated,
                ..Default::default()
            },
        }
    }

    /// Current auth state. A session ended elsewhere, such as a 401 on another
    /// slice, reads as signed out.
    pub fn state(&self) -> AuthState {
        if self.state.authenticated && !self.client.session().is_authenticated() {
            return AuthState {
                error: self.state.error.clone(),
                ..Default::default()
            };
        }
        self.state.clone()
    }

    /// POST /auth/login and persist the token of an admin account.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, ClientError> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        if let Err(e) = request.validate() {
            return self.reject(e);
        }
        self.begin();

        let response = match self.client.post::<_, AuthResponse>("/auth/login", &request).await {
            Ok(response) => response,
            Err(e) => return self.reject(e),
        };

        if !response.user.is_admin() {
            return self.reject(ClientError::Api {
                status: 403,
                message: "Admin access required".to_string(),
            });
        }

        self.establish(response)
    }

    /// POST /auth/signup. Only admin accounts are signed in afterwards.
    pub async fn signup(&mut self, request: SignupRequest) -> Result<User, ClientError> {
        if let Err(e) = request.validate() {
            return self.reject(e);
        }
        self.begin();

        let response = match self.client.post::<_, AuthResponse>("/auth/signup", &request).await {
            Ok(response) => response,
            Err(e) => return self.reject(e),
        };

        if response.user.is_admin() {
            return self.establish(response);
        }

        tracing::info!(
            "Account {} created without admin role; not signing in",
            response.user.email
        );
        self.state.user = Some(response.user.clone());
        self.state.authenticated = false;
        self.state.loading = false;
        Ok(response.user)
    }

    /// GET /auth/me for the current token.
    pub async fn fetch_profile(&mut self) -> Result<User, ClientError> {
        self.begin();

        match self.client.get::<User>("/auth/me").await {
            Ok(user) => {
                self.state.user = Some(user.clone());
                self.state.authenticated = self.client.session().is_authenticated();
                self.state.loading = false;
                Ok(user)
            }
            Err(e) => self.reject(e),
        }
    }

    /// Drop the local session and route to sign-in.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.state = AuthState::default();
        tracing::info!("Signed out");
        self.client.session().sign_out()
    }

    fn establish(&mut self, response: AuthResponse) -> Result<User, ClientError> {
        if response.token.is_empty() {
            return self.reject(ClientError::Decode(
                "Authentication response carried no token".to_string(),
            ));
        }
        if let Err(e) = self.client.session().sign_in(&response.token) {
            return self.reject(e);
        }

        tracing::info!("Signed in as {}", response.user.email);
        self.state = AuthState {
            user: Some(response.user.clone()),
            authenticated: true,
            loading: false,
            error: None,
        };
        Ok(response.user)
    }

    fn begin(&mut self) {
        self.state.loading = true;
        self.state.error = None;
    }

    fn reject<R>(&mut self, err: ClientError) -> Result<R, ClientError> {
        tracing::warn!("auth request failed: {}", err);
        self.state.loading = false;
        self.state.error = Some(err.message());
        self.state.authenticated = self.client.session().is_authenticated();
        if !self.state.authenticated {
            self.state.user = None;
        }
        Err(err)
    }
}
