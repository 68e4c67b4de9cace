//! Auth Service
//!
//! Sign-in, sign-up and logout.

use tracing::{info, instrument, warn};

use crate::client::ApiClient;
use crate::core::HttpTransport;
use crate::error::ApiError;
use crate::types::{ApiRequest, AuthTokensResponse, Credentials, Endpoints, TokenSet};

/// Authentication operations.
pub struct AuthService<'a, T: HttpTransport> {
    client: &'a ApiClient<T>,
}

impl<'a, T: HttpTransport> AuthService<'a, T> {
    pub fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    async fn exchange_credentials(&self, path: &str, credentials: &Credentials) -> Result<TokenSet, ApiError> {
        let request = ApiRequest::post(path).json(credentials)?.without_auth();
        let response: AuthTokensResponse = self.client.send_json(request).await?;
        let tokens = response.into_token_set(None);
        self.client.token_store().set_tokens(&tokens);
        Ok(tokens)
    }

    /// Sign in and store the returned tokens.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenSet, ApiError> {
        let tokens = self.exchange_credentials(Endpoints::SIGN_IN, credentials).await?;
        info!("signed in");
        Ok(tokens)
    }

    /// Create an account and store the returned tokens.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn registration(&self, credentials: &Credentials) -> Result<TokenSet, ApiError> {
        let tokens = self.exchange_credentials(Endpoints::SIGN_UP, credentials).await?;
        info!("account created");
        Ok(tokens)
    }

    /// End the session. Local tokens are cleared whatever the server says;
    /// the server result is still returned.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.client.send_empty(ApiRequest::get(Endpoints::LOGOUT)).await;
        if let Err(e) = &result {
            warn!(error = %e, "logout request failed, clearing tokens anyway");
        }
        self.client.token_store().clear_tokens();
        info!("signed out");
        result
    }
}
