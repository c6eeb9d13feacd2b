//! Login and registration against the recipe service.

use std::sync::Arc;

use reqwest::Client;
use shared::protocol::{LoginRequest, LoginResponse, RegisterRequest};
use tracing::{info, warn};

use crate::{
    error::{user_message, AuthError, LOGIN_FALLBACK, REGISTER_FALLBACK},
    session::SessionStore,
    transport::{decode, Endpoint},
};

pub struct AuthClient {
    endpoint: Endpoint,
    session: Arc<dyn SessionStore>,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>, session: Arc<dyn SessionStore>) -> Self {
        Self::with_client(Client::new(), base_url, session)
    }

    pub fn with_client(
        http: Client,
        base_url: impl Into<String>,
        session: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            endpoint: Endpoint::new(http, base_url),
            session,
        }
    }

    /// Exchanges credentials for a token and hands it to the session store.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let request = self
            .endpoint
            .http()
            .post(self.endpoint.url("/auth/login"))
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            });

        let body: LoginResponse = match self.endpoint.send(request, None).await {
            Ok(response) => decode::<LoginResponse>(response).await,
            Err(err) => Err(err),
        }
        .map_err(|err| {
            warn!(error = %err, "auth: login rejected");
            AuthError::Login {
                message: user_message(&err, LOGIN_FALLBACK),
            }
        })?;

        self.session.save(&body.token).await?;
        info!(email, "auth: logged in");
        Ok(())
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), AuthError> {
        let request = self
            .endpoint
            .http()
            .post(self.endpoint.url("/auth/register"))
            .json(&RegisterRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            });

        self.endpoint.send(request, None).await.map_err(|err| {
            warn!(error = %err, "auth: registration rejected");
            AuthError::Register {
                message: user_message(&err, REGISTER_FALLBACK),
            }
        })?;
        info!(email, "auth: registered");
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), AuthError> {
        self.session.clear().await?;
        info!("auth: logged out");
        Ok(())
    }

    pub async fn is_logged_in(&self) -> Result<bool, AuthError> {
        Ok(self.session.load().await?.is_some())
    }
}

#[cfg(test)]
#[path = "tests/auth_tests.rs"]
mod tests;
