//! HTTP client for network-based API calls

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::client::{HealthResponse, LoginRequest, LoginResponse, UserInfo};
use shared::error::{ApiResponse, ErrorCode};
use shared::models::{
    CreateOrderRequest, DashboardStats, MenuEntry, MenuEntryCreate, MenuEntryUpdate, Order,
    OrderStatus, Report, ReportPeriod, StatusCounts, StockUpdate, UpdateStatusRequest,
};

use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client for making network requests to the Meja server
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Replace or clear the authentication token
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let request = self.client.request(method, url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.request(Method::GET, path).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request without body
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.request(Method::POST, path).send().await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.request(Method::PUT, path).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a PATCH request with JSON body
    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.request(Method::PATCH, path).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.request(Method::DELETE, path).send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    ///
    /// Failures carry the server's `{code, message}` body when it has one.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            let (code, message) = match serde_json::from_str::<ApiResponse<()>>(&text) {
                Ok(body) => (body.code.unwrap_or(ErrorCode::Unknown.code()), body.message),
                Err(_) => (ErrorCode::Unknown.code(), text),
            };
            tracing::debug!(status = status.as_u16(), code, "API request failed: {}", message);
            return Err(ClientError::Api {
                status: status.as_u16(),
                code,
                message,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }

    // ========== Health ==========

    pub async fn health(&self) -> ClientResult<HealthResponse> {
        self.get("/health").await
    }

    // ========== Auth API ==========

    /// Login with username and password
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response: LoginResponse = self.post("/api/auth/login", &request).await?;
        if !response.success || response.token.is_empty() {
            return Err(ClientError::InvalidResponse(
                "Login response without token".to_string(),
            ));
        }
        Ok(response)
    }

    /// Get current user information
    pub async fn me(&self) -> ClientResult<UserInfo> {
        self.get("/api/auth/me").await
    }

    /// Logout and drop the token
    pub async fn logout(&mut self) -> ClientResult<()> {
        self.post_empty::<ApiResponse<()>>("/api/auth/logout").await?;
        self.token = None;
        Ok(())
    }

    // ========== Menu API ==========

    pub async fn list_menu(&self) -> ClientResult<Vec<MenuEntry>> {
        self.get("/api/menu").await
    }

    pub async fn get_menu_entry(&self, id: i64) -> ClientResult<MenuEntry> {
        self.get(&format!("/api/menu/{}", id)).await
    }

    pub async fn create_menu_entry(&self, payload: &MenuEntryCreate) -> ClientResult<MenuEntry> {
        self.post("/api/menu", payload).await
    }

    pub async fn update_menu_entry(
        &self,
        id: i64,
        payload: &MenuEntryUpdate,
    ) -> ClientResult<MenuEntry> {
        self.put(&format!("/api/menu/{}", id), payload).await
    }

    pub async fn set_menu_stock(&self, id: i64, stock: i32) -> ClientResult<MenuEntry> {
        self.put(&format!("/api/menu/{}/stock", id), &StockUpdate { stock })
            .await
    }

    pub async fn delete_menu_entry(&self, id: i64) -> ClientResult<bool> {
        self.delete(&format!("/api/menu/{}", id)).await
    }

    // ========== Orders API ==========

    /// Submit an order (no token required)
    pub async fn create_order(&self, request: &CreateOrderRequest) -> ClientResult<Order> {
        self.post("/api/orders", request).await
    }

    pub async fn get_order(&self, id: i64) -> ClientResult<Order> {
        self.get(&format!("/api/orders/{}", id)).await
    }

    pub async fn list_orders(&self, status: Option<OrderStatus>) -> ClientResult<Vec<Order>> {
        match status {
            Some(status) => self.get(&format!("/api/orders?status={}", status)).await,
            None => self.get("/api/orders").await,
        }
    }

    pub async fn order_counts(&self) -> ClientResult<StatusCounts> {
        self.get("/api/orders/counts").await
    }

    pub async fn update_order_status(&self, id: i64, status: OrderStatus) -> ClientResult<Order> {
        self.patch(
            &format!("/api/orders/{}", id),
            &UpdateStatusRequest { status },
        )
        .await
    }

    // ========== Reports API ==========

    pub async fn report(&self, period: ReportPeriod) -> ClientResult<Report> {
        self.get(&format!("/api/reports?period={}", period)).await
    }

    pub async fn dashboard(&self) -> ClientResult<DashboardStats> {
        self.get("/api/reports/dashboard").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = HttpClient::new(&ClientConfig::new("http://localhost:3000/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert!(client.token().is_none());

        let client = client.with_token("t");
        assert_eq!(client.token(), Some("t"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let base_url = format!("http://127.0.0.1:{}", port);
        let client = HttpClient::new(&ClientConfig::new(base_url).with_timeout(2)).unwrap();
        let err = client.list_menu().await.unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
    }
}
