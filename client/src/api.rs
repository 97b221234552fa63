//! HTTP client for the salon backend
//!
//! Adds the bearer token from the [`Session`] to every authenticated request
//! and clears the session on any 401.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

/// Whether a request carries the session token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Bearer,
    Public,
}

/// Backend API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Session) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, auth: Auth) -> RequestBuilder {
        tracing::debug!("{} {}", method, path);
        let builder = self.http.request(method, self.url(path));
        match (auth, self.session.token()) {
            (Auth::Bearer, Some(token)) => builder.bearer_auth(token),
            _ => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder, path: &str, auth: Auth) -> ClientResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED if auth == Auth::Public => Err(ClientError::InvalidCredentials),
            StatusCode::UNAUTHORIZED => {
                tracing::warn!("Backend rejected the session token, clearing session");
                self.session.clear();
                Err(ClientError::SessionExpired)
            }
            StatusCode::FORBIDDEN => Err(ClientError::Forbidden),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(path.to_string())),
            _ => {
                let message = response.text().await.unwrap_or_default();
                tracing::warn!("{} returned {}: {}", path, status, message);
                Err(ClientError::Status {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub async fn fetch<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let builder = self.request(Method::GET, path, Auth::Bearer);
        let response = self.execute(builder, path, Auth::Bearer).await?;
        Self::decode(response).await
    }

    /// `GET` with query parameters
    pub async fn get<T, Q>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path, Auth::Bearer).query(query);
        let response = self.execute(builder, path, Auth::Bearer).await?;
        Self::decode(response).await
    }

    /// `GET` of a paginated collection: `page` first, then the filters
    pub async fn get_page<T, F>(&self, path: &str, page: u32, filters: &F) -> ClientResult<T>
    where
        T: DeserializeOwned,
        F: Serialize + ?Sized,
    {
        let builder = self
            .request(Method::GET, path, Auth::Bearer)
            .query(&[("page", page)])
            .query(filters);
        let response = self.execute(builder, path, Auth::Bearer).await?;
        Self::decode(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, body, Auth::Bearer).await
    }

    /// `POST` without the session token, for login and signup
    pub async fn post_public<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, body, Auth::Public).await
    }

    /// Public `POST` whose response body is ignored
    pub async fn post_public_unit<B>(&self, path: &str, body: &B) -> ClientResult<()>
    where
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::POST, path, Auth::Public).json(body);
        self.execute(builder, path, Auth::Public).await?;
        Ok(())
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PUT, path, body, Auth::Bearer).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PATCH, path, body, Auth::Bearer).await
    }

    /// `PATCH` whose response body is ignored
    pub async fn patch_unit<B>(&self, path: &str, body: &B) -> ClientResult<()>
    where
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::PATCH, path, Auth::Bearer).json(body);
        self.execute(builder, path, Auth::Bearer).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let builder = self.request(Method::DELETE, path, Auth::Bearer);
        self.execute(builder, path, Auth::Bearer).await?;
        Ok(())
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B, auth: Auth) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(method, path, auth).json(body);
        let response = self.execute(builder, path, auth).await?;
        Self::decode(response).await
    }
}
