use crate::model::{day_key, Importance, Todo};
use chrono::NaiveDate;
use reqwest::{Client as HttpClient, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// `POST /todos` request body. The backend fills in the id.
#[derive(Debug, Serialize)]
struct CreateTodoRequest<'a> {
    title: &'a str,
    description: &'a str,
    date: NaiveDate,
    priority: i32,
    importance: Importance,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// Thin wrapper over the backend's REST surface (base `http://host:port/api`).
///
/// No retries and no timeouts beyond transport defaults: every failure is
/// terminal for the user action that caused the call.
#[derive(Debug, Clone)]
pub struct TodoClient {
    http: HttpClient,
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // --- READ OPERATIONS ---

    /// All todos whose date falls in `[start, end]` inclusive.
    pub async fn list_range(&self, start: NaiveDate, end: NaiveDate) -> ClientResult<Vec<Todo>> {
        let req = self
            .http
            .get(format!("{}/todos", self.base_url))
            .query(&[("start", day_key(start)), ("end", day_key(end))]);
        self.expect_json(req).await
    }

    /// Todos for exactly one day.
    pub async fn list_day(&self, day: NaiveDate) -> ClientResult<Vec<Todo>> {
        let req = self.http.get(format!("{}/todos/{}", self.base_url, day_key(day)));
        self.expect_json(req).await
    }

    // --- WRITE OPERATIONS ---

    /// Create a todo with empty description, priority 0, importance low.
    /// Returns the backend-assigned record, id included.
    pub async fn create(&self, title: &str, date: NaiveDate) -> ClientResult<Todo> {
        let body = CreateTodoRequest {
            title,
            description: "",
            date,
            priority: 0,
            importance: Importance::Low,
        };
        let req = self.http.post(format!("{}/todos", self.base_url)).json(&body);
        self.expect_json(req).await
    }

    /// Delete a todo. A 404 is indistinguishable from success for the caller,
    /// so repeated deletes are idempotent.
    pub async fn remove(&self, id: i64) -> ClientResult<()> {
        let response = self
            .http
            .delete(format!("{}/todos/{}", self.base_url, id))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::check_status(response).await?;
        Ok(())
    }

    /// Flip completion server-side; returns the updated record.
    pub async fn toggle_completed(&self, id: i64) -> ClientResult<Todo> {
        let req = self
            .http
            .request(Method::PATCH, format!("{}/todos/{}/toggle", self.base_url, id));
        self.expect_json(req).await
    }

    /// Persist a client-computed importance. The response body is ignored.
    pub async fn set_importance(&self, id: i64, importance: Importance) -> ClientResult<()> {
        let response = self
            .http
            .request(
                Method::PATCH,
                format!("{}/todos/{}/changeimportance", self.base_url, id),
            )
            .query(&[("importance", importance.as_str())])
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Upload a file, returning the URL the server stored it under.
    pub async fn upload(&self, filename: &str, bytes: Vec<u8>) -> ClientResult<String> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("image", part);
        let response = self
            .http
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await?;
        let text = Self::check_status(response).await?;
        let parsed: UploadResponse = serde_json::from_str(&text)?;
        Ok(parsed.url)
    }

    // --- HELPERS ---

    async fn expect_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<T> {
        let response = req.send().await?;
        let text = Self::check_status(response).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn check_status(response: Response) -> ClientResult<String> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(ClientError::Status { status, body })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn client_for(server: &mockito::ServerGuard) -> TodoClient {
        TodoClient::new(&format!("{}/api", server.url()))
    }

    #[tokio::test]
    async fn test_list_range_queries_month_window() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/todos")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("start".into(), "2024-03-01".into()),
                Matcher::UrlEncoded("end".into(), "2024-03-31".into()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"id":1,"title":"A","date":"2024-03-15"},
                    {"id":2,"title":"B","date":"2024-03-20","completed":true}]"#,
            )
            .create_async()
            .await;

        let todos = client_for(&server)
            .list_range(d("2024-03-01"), d("2024-03-31"))
            .await
            .unwrap();

        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0].title, "A");
        assert!(todos[1].completed);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_day_hits_date_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/todos/2024-03-15")
            .with_body(r#"[{"id":1,"title":"A","date":"2024-03-15"}]"#)
            .create_async()
            .await;

        let todos = client_for(&server).list_day(d("2024-03-15")).await.unwrap();
        assert_eq!(todos.len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_sends_defaults_and_returns_assigned_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/todos")
            .match_body(Matcher::Json(serde_json::json!({
                "title": "Write report",
                "description": "",
                "date": "2024-03-15",
                "priority": 0,
                "importance": "low",
            })))
            .with_body(r#"{"id":42,"title":"Write report","date":"2024-03-15"}"#)
            .create_async()
            .await;

        let todo = client_for(&server)
            .create("Write report", d("2024-03-15"))
            .await
            .unwrap();

        assert_eq!(todo.id, 42);
        assert!(!todo.completed);
        assert_eq!(todo.importance, Importance::Low);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_remove_treats_not_found_as_success() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/api/todos/42")
            .with_status(404)
            .create_async()
            .await;

        assert!(client_for(&server).remove(42).await.is_ok());
    }

    #[tokio::test]
    async fn test_toggle_returns_updated_record() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PATCH", "/api/todos/7/toggle")
            .with_body(r#"{"id":7,"title":"A","date":"2024-03-15","completed":true}"#)
            .create_async()
            .await;

        let todo = client_for(&server).toggle_completed(7).await.unwrap();
        assert!(todo.completed);
    }

    #[tokio::test]
    async fn test_set_importance_passes_value_in_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/api/todos/7/changeimportance")
            .match_query(Matcher::UrlEncoded("importance".into(), "middle".into()))
            .create_async()
            .await;

        client_for(&server)
            .set_importance(7, Importance::Middle)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_returns_stored_url() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/upload")
            .with_body(r#"{"url":"/static/img/1.png"}"#)
            .create_async()
            .await;

        let url = client_for(&server)
            .upload("photo.png", vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(url, "/static/img/1.png");
    }

    #[tokio::test]
    async fn test_server_error_surfaces_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/todos/2024-03-15")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let err = client_for(&server).list_day(d("2024-03-15")).await.unwrap_err();
        match err {
            ClientError::Status { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
