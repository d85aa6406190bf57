use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::auth::credential_context::CredentialContext;
use crate::search::domain::error::SearchError;
use crate::search::domain::search_backend::SearchBackend;
use crate::search::domain::session::{FaceSearchTicket, TextSearchTicket};
use crate::search::domain::types::{FaceSearchResponse, TextSearchResponse};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Rejection body shape the backend uses for 4xx responses.
#[derive(Deserialize)]
struct RejectionBody {
    detail: String,
}

/// Blocking HTTP implementation of the two search protocols.
///
/// Face search is a multipart upload with the ticket parameters as query
/// arguments; text search is a plain GET. The operator credential rides
/// along as a bearer header on every request.
pub struct HttpSearchBackend {
    client: reqwest::blocking::Client,
    api_base: String,
    credential: CredentialContext,
}

impl HttpSearchBackend {
    pub fn new(api_base: impl Into<String>, credential: CredentialContext) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            credential,
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn authorize(
        &self,
        req: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        match self.credential.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Reduce a completed HTTP exchange to the domain taxonomy and parse
    /// the payload. 401 means the credential died; other 4xx carry a
    /// human-readable `detail`; everything else unexpected is transport.
    fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::blocking::Response,
    ) -> Result<T, SearchError> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(SearchError::AuthExpired);
        }
        if status.is_client_error() {
            let message = response
                .json::<RejectionBody>()
                .map(|b| b.detail)
                .unwrap_or_else(|_| format!("request rejected ({status})"));
            return Err(SearchError::Validation { message });
        }
        if !status.is_success() {
            return Err(SearchError::Network {
                message: format!("server error ({status})"),
            });
        }

        response.json::<T>().map_err(|e| SearchError::Network {
            message: format!("malformed response: {e}"),
        })
    }
}

impl SearchBackend for HttpSearchBackend {
    fn search_by_face(
        &self,
        photo: &Path,
        ticket: &FaceSearchTicket,
    ) -> Result<FaceSearchResponse, SearchError> {
        let form = reqwest::blocking::multipart::Form::new()
            .file("file", photo)
            .map_err(|e| SearchError::Validation {
                message: format!("cannot read upload {}: {e}", photo.display()),
            })?;

        let mut query: Vec<(&str, String)> = vec![
            ("top_k", ticket.top_k.to_string()),
            ("threshold", ticket.threshold.to_string()),
        ];
        if let Some(index) = ticket.face_index {
            query.push(("face_index", index.to_string()));
        }

        let request = self
            .authorize(self.client.post(format!("{}/search/face", self.api_base)))
            .query(&query)
            .multipart(form);

        log::debug!(
            "face search: top_k={} threshold={} face_index={:?}",
            ticket.top_k,
            ticket.threshold,
            ticket.face_index
        );

        let response = request.send().map_err(|e| SearchError::Network {
            message: e.to_string(),
        })?;
        Self::read_json(response)
    }

    fn search_by_text(&self, ticket: &TextSearchTicket) -> Result<TextSearchResponse, SearchError> {
        let request = self
            .authorize(self.client.get(format!("{}/search/text", self.api_base)))
            .query(&[("q", ticket.query.as_str()), ("page", &ticket.page.to_string())]);

        let response = request.send().map_err(|e| SearchError::Network {
            message: e.to_string(),
        })?;
        Self::read_json(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve exactly one canned HTTP response on a loopback port and hand
    /// back the raw request for assertions.
    fn one_shot_server(status_line: &str, body: &str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            // Read headers, then drain the announced body length.
            let mut header_end = None;
            while header_end.is_none() {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                header_end = request.windows(4).position(|w| w == b"\r\n\r\n");
            }
            let text = String::from_utf8_lossy(&request).to_string();
            if let Some(end) = header_end {
                let content_length = text
                    .lines()
                    .find_map(|l| l.to_ascii_lowercase().strip_prefix("content-length:").map(str::trim).map(String::from))
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(0);
                let mut already = request.len() - (end + 4);
                while already < content_length {
                    let n = stream.read(&mut buf).unwrap();
                    if n == 0 {
                        break;
                    }
                    already += n;
                }
            }
            stream.write_all(response.as_bytes()).unwrap();
            let _ = stream.flush();
            text
        });

        (base, handle)
    }

    fn text_ticket(query: &str) -> TextSearchTicket {
        TextSearchTicket {
            generation: 1,
            query: query.into(),
            page: 1,
        }
    }

    #[test]
    fn test_text_search_parses_results() {
        let (base, server) = one_shot_server(
            "200 OK",
            r#"{"results": [{"id": 5, "group_name": "g", "text": "hello"}]}"#,
        );
        let backend = HttpSearchBackend::new(base, CredentialContext::anonymous());
        let resp = backend.search_by_text(&text_ticket("hello")).unwrap();
        assert_eq!(resp.results.len(), 1);
        assert_eq!(resp.results[0].id, 5);

        let request = server.join().unwrap();
        assert!(request.starts_with("GET /search/text?q=hello&page=1"));
    }

    #[test]
    fn test_bearer_token_attached() {
        let (base, server) = one_shot_server("200 OK", r#"{"results": []}"#);
        let backend = HttpSearchBackend::new(base, CredentialContext::with_token("tok-42"));
        backend.search_by_text(&text_ticket("x")).unwrap();
        let request = server.join().unwrap();
        assert!(request.contains("authorization: Bearer tok-42")
            || request.contains("Authorization: Bearer tok-42"));
    }

    #[test]
    fn test_unauthorized_maps_to_auth_expired() {
        let (base, server) = one_shot_server("401 Unauthorized", r#"{"detail": "expired"}"#);
        let backend = HttpSearchBackend::new(base, CredentialContext::anonymous());
        let err = backend.search_by_text(&text_ticket("x")).unwrap_err();
        assert!(matches!(err, SearchError::AuthExpired));
        server.join().unwrap();
    }

    #[test]
    fn test_client_rejection_surfaces_detail() {
        let (base, server) = one_shot_server(
            "422 Unprocessable Entity",
            r#"{"detail": "file is not a valid image"}"#,
        );
        let backend = HttpSearchBackend::new(base, CredentialContext::anonymous());
        let err = backend.search_by_text(&text_ticket("x")).unwrap_err();
        match err {
            SearchError::Validation { message } => assert_eq!(message, "file is not a valid image"),
            other => panic!("expected Validation, got {other:?}"),
        }
        server.join().unwrap();
    }

    #[test]
    fn test_server_error_is_transport() {
        let (base, server) = one_shot_server("502 Bad Gateway", "");
        let backend = HttpSearchBackend::new(base, CredentialContext::anonymous());
        let err = backend.search_by_text(&text_ticket("x")).unwrap_err();
        assert!(matches!(err, SearchError::Network { .. }));
        server.join().unwrap();
    }

    #[test]
    fn test_connection_refused_is_transport() {
        // Bind then immediately drop to get a port nobody listens on.
        let port = {
            let l = TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let backend = HttpSearchBackend::new(
            format!("http://127.0.0.1:{port}"),
            CredentialContext::anonymous(),
        );
        let err = backend.search_by_text(&text_ticket("x")).unwrap_err();
        assert!(matches!(err, SearchError::Network { .. }));
    }

    #[test]
    fn test_face_search_sends_multipart_with_ticket_params() {
        let tmp = tempfile::TempDir::new().unwrap();
        let photo = tmp.path().join("query.png");
        image::RgbImage::new(4, 4).save(&photo).unwrap();

        let (base, server) = one_shot_server(
            "200 OK",
            r#"{"faces_detected": 1, "results": [{"bbox": [0.0, 0.0, 4.0, 4.0], "matches": []}]}"#,
        );
        let backend = HttpSearchBackend::new(base, CredentialContext::anonymous());
        let ticket = FaceSearchTicket {
            generation: 7,
            top_k: 20,
            threshold: 65,
            face_index: Some(1),
        };
        let resp = backend.search_by_face(&photo, &ticket).unwrap();
        assert_eq!(resp.faces_detected, 1);

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /search/face?"));
        assert!(request.contains("top_k=20"));
        assert!(request.contains("threshold=65"));
        assert!(request.contains("face_index=1"));
        assert!(request.to_ascii_lowercase().contains("multipart/form-data"));
    }

    #[test]
    fn test_face_search_unreadable_file_fails_before_network() {
        let backend = HttpSearchBackend::new(
            "http://127.0.0.1:1", // would refuse; must not even be reached
            CredentialContext::anonymous(),
        );
        let ticket = FaceSearchTicket {
            generation: 1,
            top_k: 20,
            threshold: 50,
            face_index: None,
        };
        let err = backend
            .search_by_face(Path::new("/nonexistent/query.png"), &ticket)
            .unwrap_err();
        assert!(matches!(err, SearchError::Validation { .. }));
    }
}
