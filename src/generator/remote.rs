//! Remote generation client (Tier 1)
//!
//! One blocking `POST /analyze` per file, no retries. Every failure is
//! classified so the orchestrator can log it and fall back.

use crate::config::Settings;
use crate::protocol::{AnalyzeRequest, AnalyzeResponse, ErrorBody};
use crate::{FileRecord, Framework, GenerationOptions};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RemoteError {
    /// Connection refused, DNS failure, timeout or other network trouble
    #[error("{}: {message}", transport_label(.refused))]
    Transport { refused: bool, message: String },
    /// Non-2xx response
    #[error("Server error ({status}): {message}")]
    Status { status: u16, message: String },
    /// 2xx response that does not honor the response contract
    #[error("Protocol error: {0}")]
    Protocol(String),
}

fn transport_label(refused: &bool) -> &'static str {
    if *refused {
        "Server unavailable"
    } else {
        "Network error"
    }
}

/// A remote test generator
pub trait RemoteGenerator: Send + Sync {
    /// Request test content for one file
    fn generate(
        &self,
        file: &FileRecord,
        framework: Framework,
        options: &GenerationOptions,
    ) -> Result<RemoteOutput, RemoteError>;
}

/// Successful remote generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteOutput {
    pub content: String,
    /// Method reported by the server, when present
    pub method: Option<String>,
}

/// Interpret a 2xx body against the response contract
pub fn interpret_success(body: &str) -> Result<RemoteOutput, RemoteError> {
    let response: AnalyzeResponse = serde_json::from_str(body)
        .map_err(|e| RemoteError::Protocol(format!("invalid response body: {}", e)))?;
    if !response.success {
        return Err(RemoteError::Protocol(
            "Server returned unsuccessful response".to_string(),
        ));
    }
    match response.generated_test {
        Some(content) if !content.is_empty() => Ok(RemoteOutput {
            content,
            method: response.metadata.and_then(|m| m.method),
        }),
        _ => Err(RemoteError::Protocol(
            "Server returned success but no test content".to_string(),
        )),
    }
}

/// Build the error for a non-2xx response, preferring the `{error}` field
pub fn interpret_failure(status: u16, body: &str) -> RemoteError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                "Unknown error".to_string()
            } else {
                body.trim().to_string()
            }
        });
    RemoteError::Status { status, message }
}

/// HTTP client for the remote generation service
pub struct HttpRemoteClient {
    client: reqwest::blocking::Client,
    analyze_url: String,
}

impl HttpRemoteClient {
    pub fn new(settings: &Settings) -> Result<Self, RemoteError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| RemoteError::Transport {
                refused: false,
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            analyze_url: settings.analyze_url(),
        })
    }

    pub fn analyze_url(&self) -> &str {
        &self.analyze_url
    }
}

fn transport_error(e: reqwest::Error) -> RemoteError {
    RemoteError::Transport {
        refused: e.is_connect(),
        message: e.to_string(),
    }
}

impl RemoteGenerator for HttpRemoteClient {
    fn generate(
        &self,
        file: &FileRecord,
        framework: Framework,
        options: &GenerationOptions,
    ) -> Result<RemoteOutput, RemoteError> {
        debug!(url = %self.analyze_url, file = %file.name, "posting to remote generator");
        let request = AnalyzeRequest::new(file, framework, *options);
        let response = self
            .client
            .post(&self.analyze_url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().map_err(transport_error)?;
        if !status.is_success() {
            return Err(interpret_failure(status.as_u16(), &body));
        }
        interpret_success(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::time::Duration;

    /// Answer exactly one HTTP request with `status` and `body`; returns the base URL
    fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
            }
            let mut request_body = vec![0u8; content_length];
            reader.read_exact(&mut request_body).unwrap();
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            reader.get_mut().write_all(response.as_bytes()).unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(url: &str) -> HttpRemoteClient {
        HttpRemoteClient::new(&Settings::default().with_api_url(url)).unwrap()
    }

    #[test]
    fn test_round_trip_success() {
        let url = serve_once(
            "200 OK",
            r#"{"success":true,"generatedTest":"describe('a', () => {});","metadata":{"method":"agent","sourceFile":"a.js"}}"#,
        );
        let file = FileRecord::new("a.js", "a.js", "a.js", "function a() {}");
        let out = client_for(&url)
            .generate(&file, Framework::Jest, &GenerationOptions::default())
            .unwrap();
        assert_eq!(out.content, "describe('a', () => {});");
        assert_eq!(out.method.as_deref(), Some("agent"));
    }

    #[test]
    fn test_round_trip_server_error() {
        let url = serve_once("500 Internal Server Error", r#"{"error":"agent crashed"}"#);
        let file = FileRecord::new("a.js", "a.js", "a.js", "function a() {}");
        let err = client_for(&url)
            .generate(&file, Framework::Jest, &GenerationOptions::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "Server error (500): agent crashed");
    }

    #[test]
    fn test_analyze_url_has_no_double_slash() {
        let client = client_for("http://localhost:3000/");
        assert_eq!(client.analyze_url(), "http://localhost:3000/analyze");
    }

    #[test]
    fn test_success_with_content() {
        let out = interpret_success(
            r#"{"success":true,"generatedTest":"describe('x')","metadata":{"method":"agent"}}"#,
        )
        .unwrap();
        assert_eq!(out.content, "describe('x')");
        assert_eq!(out.method.as_deref(), Some("agent"));
    }

    #[test]
    fn test_success_without_content_is_protocol_error() {
        let err = interpret_success(r#"{"success":true}"#).unwrap_err();
        assert!(matches!(err, RemoteError::Protocol(ref m) if m.contains("no test content")));
        let err = interpret_success(r#"{"success":true,"generatedTest":""}"#).unwrap_err();
        assert!(matches!(err, RemoteError::Protocol(_)));
    }

    #[test]
    fn test_unsuccessful_flag_is_protocol_error() {
        let err = interpret_success(r#"{"success":false,"generatedTest":"x"}"#).unwrap_err();
        assert!(matches!(err, RemoteError::Protocol(_)));
    }

    #[test]
    fn test_garbage_body_is_protocol_error() {
        assert!(matches!(
            interpret_success("<html>oops</html>").unwrap_err(),
            RemoteError::Protocol(_)
        ));
    }

    #[test]
    fn test_failure_message_from_error_field() {
        let err = interpret_failure(413, r#"{"error":"payload too large"}"#);
        assert_eq!(err.to_string(), "Server error (413): payload too large");
        let err = interpret_failure(502, "");
        assert_eq!(err.to_string(), "Server error (502): Unknown error");
    }

    #[test]
    fn test_connection_refused_is_transport() {
        // Port 9 (discard) on localhost is closed in test environments
        let settings = Settings {
            request_timeout: Duration::from_secs(5),
            ..Settings::default().with_api_url("http://127.0.0.1:9")
        };
        let client = HttpRemoteClient::new(&settings).unwrap();
        let file = FileRecord::new("a.js", "a.js", "a.js", "function a() {}");
        let err = client
            .generate(&file, Framework::Jest, &GenerationOptions::default())
            .unwrap_err();
        assert!(matches!(err, RemoteError::Transport { .. }), "got {:?}", err);
    }
}
