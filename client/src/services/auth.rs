//! Login, signup and logout

use shared::{check, AuthResponse, LoginCredentials, RegisterData, User};

use crate::api::ApiClient;
use crate::error::ClientResult;

#[derive(Debug, Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Sign in and activate the session
    pub async fn login(&self, credentials: &LoginCredentials) -> ClientResult<User> {
        check(credentials)?;
        let auth: AuthResponse = self.api.post_public("/auth/login", credentials).await?;
        let user = self.api.session().activate(auth)?;
        tracing::info!("Signed in as {} ({:?})", user.username, user.role);
        Ok(user)
    }

    /// Create an account; the user signs in separately afterwards
    pub async fn register(&self, data: &RegisterData) -> ClientResult<()> {
        check(data)?;
        self.api.post_public_unit("/auth/signup", data).await?;
        tracing::info!("Registered {}", data.username);
        Ok(())
    }

    pub fn logout(&self) {
        self.api.session().clear();
        tracing::info!("Signed out");
    }
}
