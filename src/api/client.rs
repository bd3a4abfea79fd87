//! HTTP client for the log service

use super::{
    ApiError, LinkResponse, LogQuery, LogRecord, LogService, LoginRequest, LoginResponse,
    StatBucket, UploadResponse,
};
use futures::future::BoxFuture;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;

/// Log service client over HTTP/JSON
#[derive(Clone)]
pub struct HttpLogService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLogService {
    /// Create a client for the service at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Read the body and decode it, keeping network and decode failures apart
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Malformed(e.to_string()))
    }

    /// Resolve a pre-signed link for a stored log.
    ///
    /// `download` asks for an attachment disposition instead of inline viewing.
    pub async fn presigned_link(&self, log_id: &str, download: bool) -> Result<String, ApiError> {
        let endpoint = if download { "download-log" } else { "view-log" };
        let response = self
            .client
            .get(self.url(&format!("/api/{}/{}", endpoint, log_id)))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let link: LinkResponse =
            serde_json::from_str(&body).map_err(|e| ApiError::Malformed(e.to_string()))?;

        match (link.url, link.error) {
            (Some(url), _) => Ok(url),
            (None, error) => Err(ApiError::Status {
                status,
                message: error.unwrap_or_else(|| "No link in response".to_string()),
            }),
        }
    }

    /// Upload a log file; returns the id the service assigned
    pub async fn upload(&self, path: &Path, level: &str, owner: &str) -> Result<String, ApiError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::Network(format!("Cannot read {}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.log".to_string());

        let form = Form::new()
            .text("level", level.to_uppercase())
            .text("owner", owner.to_string())
            .part("file", Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(self.url("/api/upload-log"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let upload: UploadResponse =
            serde_json::from_str(&body).map_err(|e| ApiError::Malformed(e.to_string()))?;

        match upload {
            UploadResponse {
                success: true,
                log_id: Some(id),
                ..
            } => Ok(id),
            UploadResponse { error, .. } => Err(ApiError::Status {
                status,
                message: error.unwrap_or_else(|| "Upload rejected".to_string()),
            }),
        }
    }
}

impl LogService for HttpLogService {
    fn login<'a>(
        &'a self,
        username: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<LoginResponse, ApiError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.url("/api/login"))
                .json(&LoginRequest { username, password })
                .send()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;

            // Rejections arrive as 401 with a JSON body; the body is what matters
            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;

            match serde_json::from_str::<LoginResponse>(&body) {
                Ok(parsed) => Ok(parsed),
                Err(_) if !status.is_success() => Err(ApiError::Status {
                    status: status.as_u16(),
                    message: body,
                }),
                Err(e) => Err(ApiError::Malformed(e.to_string())),
            }
        })
    }

    fn logs<'a>(&'a self, query: &'a LogQuery) -> BoxFuture<'a, Result<Vec<LogRecord>, ApiError>> {
        Box::pin(async move {
            let response = self
                .client
                .get(self.url("/api/logs"))
                .query(&[
                    ("user", query.user.as_str()),
                    ("level", query.level.as_query()),
                    ("search", query.search.as_str()),
                ])
                .send()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;

            Self::decode(response).await
        })
    }

    fn stats<'a>(&'a self, user: &'a str) -> BoxFuture<'a, Result<Vec<StatBucket>, ApiError>> {
        Box::pin(async move {
            let response = self
                .client
                .get(self.url("/api/stats"))
                .query(&[("user", user)])
                .send()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;

            Self::decode(response).await
        })
    }

    fn download_url(&self, filename: &str) -> String {
        self.url(&format!("/s3-view/{}", filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::LevelFilter;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    /// Serve one canned response per connection; request heads are sent back
    /// on the returned channel
    async fn canned_server(
        status: &'static str,
        body: &'static str,
    ) -> (HttpLogService, mpsc::UnboundedReceiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let head = read_request(&mut socket).await;
                let _ = tx.send(head);
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        let service =
            HttpLogService::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap();
        (service, rx)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    return text[..end].to_string();
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[tokio::test]
    async fn test_login_rejection_is_a_response() {
        let (service, _requests) = canned_server(
            "401 Unauthorized",
            r#"{"success":false,"message":"Invalid credentials"}"#,
        )
        .await;

        let response = service.login("admin", "wrong").await.unwrap();
        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("Invalid credentials"));
    }

    #[tokio::test]
    async fn test_login_error_page_is_status_error() {
        let (service, _requests) = canned_server("502 Bad Gateway", "upstream down").await;

        let err = service.login("admin", "admin").await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 502,
                message: "upstream down".into()
            }
        );
    }

    #[tokio::test]
    async fn test_log_query_is_url_encoded() {
        let (service, mut requests) = canned_server("200 OK", "[]").await;
        let query = LogQuery {
            user: "admin".into(),
            level: LevelFilter::Error,
            search: "a&b c".into(),
        };

        let records = service.logs(&query).await.unwrap();
        assert!(records.is_empty());

        let head = requests.recv().await.unwrap();
        let request_line = head.lines().next().unwrap();
        assert!(request_line.starts_with("GET /api/logs?"), "{}", request_line);
        assert!(request_line.contains("user=admin"), "{}", request_line);
        assert!(request_line.contains("level=ERROR"), "{}", request_line);
        assert!(request_line.contains("search=a%26b+c"), "{}", request_line);
    }

    #[tokio::test]
    async fn test_server_error_is_status_error() {
        let (service, _requests) = canned_server("500 Internal Server Error", "boom").await;

        let err = service.stats("admin").await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 500,
                message: "boom".into()
            }
        );
    }

    #[tokio::test]
    async fn test_non_array_log_body_is_malformed() {
        let (service, _requests) = canned_server("200 OK", r#"{"error":"x"}"#).await;
        let query = LogQuery {
            user: "admin".into(),
            level: LevelFilter::All,
            search: String::new(),
        };

        let err = service.logs(&query).await.unwrap_err();
        assert!(matches!(err, ApiError::Malformed(_)), "got {:?}", err);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let service = HttpLogService::new("http://localhost:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(service.base_url, "http://localhost:5000");
        assert_eq!(
            service.download_url("admin_1.json"),
            "http://localhost:5000/s3-view/admin_1.json"
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        // Port 9 (discard) on loopback is closed on test machines
        let service = HttpLogService::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = service.stats("admin").await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)), "got {:?}", err);
    }
}
