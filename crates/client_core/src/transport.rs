//! HTTP access to the recipe service.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Recipe, RecipeDraft, RecipeId},
    error::{ErrorBody, ServiceError},
};
use tracing::debug;
use url::Url;

use crate::session::SessionStore;

/// Remote recipe operations used by the sync controller.
#[async_trait]
pub trait RecipeService: Send + Sync {
    async fn list_recipes(&self) -> Result<Vec<Recipe>, ServiceError>;
    async fn create_recipe(&self, draft: &RecipeDraft) -> Result<Recipe, ServiceError>;
    async fn update_recipe(&self, id: &RecipeId, draft: &RecipeDraft) -> Result<(), ServiceError>;
    async fn delete_recipe(&self, id: &RecipeId) -> Result<(), ServiceError>;
}

/// Base URL plus HTTP client, shared by the recipe and auth clients.
#[derive(Clone)]
pub(crate) struct Endpoint {
    http: Client,
    base_url: String,
}

impl Endpoint {
    pub(crate) fn new(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `path` followed by `segment` as a single escaped path segment, so
    /// reserved characters in the segment stay part of it.
    pub(crate) fn url_with_segment(&self, path: &str, segment: &str) -> Result<Url, ServiceError> {
        let raw = self.url(path);
        let mut url = Url::parse(&raw)
            .map_err(|err| ServiceError::Transport(format!("invalid url '{raw}': {err}")))?;
        url.path_segments_mut()
            .map_err(|_| ServiceError::Transport(format!("url '{raw}' cannot take path segments")))?
            .push(segment);
        Ok(url)
    }

    /// Sends the request, turning non-success statuses into `ServiceError::Status`
    /// with the service's `error` field when the body carries one.
    pub(crate) async fn send(
        &self,
        request: RequestBuilder,
        token: Option<&str>,
    ) -> Result<Response, ServiceError> {
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request
            .send()
            .await
            .map_err(|err| ServiceError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let raw = response.text().await.unwrap_or_default();
        Err(ServiceError::Status {
            status: status.as_u16(),
            message: ErrorBody::message_from(&raw),
        })
    }
}

pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    response
        .json::<T>()
        .await
        .map_err(|err| ServiceError::Decode(err.to_string()))
}

pub struct HttpRecipeService {
    endpoint: Endpoint,
    session: Arc<dyn SessionStore>,
}

impl HttpRecipeService {
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

    async fn token(&self) -> Result<Option<String>, ServiceError> {
        self.session
            .load()
            .await
            .map_err(|err| ServiceError::Transport(err.to_string()))
    }

    fn recipe_url(&self, id: &RecipeId) -> Result<Url, ServiceError> {
        self.endpoint.url_with_segment("/reseps", id.as_str())
    }
}

#[async_trait]
impl RecipeService for HttpRecipeService {
    async fn list_recipes(&self) -> Result<Vec<Recipe>, ServiceError> {
        let token = self.token().await?;
        debug!("recipes: GET /reseps");
        let request = self.endpoint.http().get(self.endpoint.url("/reseps"));
        let response = self.endpoint.send(request, token.as_deref()).await?;
        decode(response).await
    }

    async fn create_recipe(&self, draft: &RecipeDraft) -> Result<Recipe, ServiceError> {
        let token = self.token().await?;
        debug!(name = %draft.name, "recipes: POST /reseps");
        let request = self
            .endpoint
            .http()
            .post(self.endpoint.url("/reseps"))
            .json(draft);
        let response = self.endpoint.send(request, token.as_deref()).await?;
        decode(response).await
    }

    async fn update_recipe(&self, id: &RecipeId, draft: &RecipeDraft) -> Result<(), ServiceError> {
        let token = self.token().await?;
        debug!(recipe_id = %id, "recipes: PUT /reseps/{{id}}");
        let request = self.endpoint.http().put(self.recipe_url(id)?).json(draft);
        // The body is either the updated record or a bare acknowledgment.
        self.endpoint.send(request, token.as_deref()).await?;
        Ok(())
    }

    async fn delete_recipe(&self, id: &RecipeId) -> Result<(), ServiceError> {
        let token = self.token().await?;
        debug!(recipe_id = %id, "recipes: DELETE /reseps/{{id}}");
        let request = self.endpoint.http().delete(self.recipe_url(id)?);
        self.endpoint.send(request, token.as_deref()).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
