use crate::errors::{Result, SketchifyError};
use crate::models::{ConversionRequest, ConversionResult};
use log::{debug, error};
use reqwest::multipart::{Form, Part};
use reqwest::Url;

/// Sends a validated request to the conversion endpoint.
///
/// The page controller only depends on this trait, so the browser build uses
/// [`HttpTransport`] and tests substitute scripted responses.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Performs one upload. `Ok` covers both server-reported failures and
    /// successful conversions; `Err` means the exchange itself failed.
    ///
    /// Takes the request by value so the file contents move into the body.
    async fn submit(&self, request: ConversionRequest) -> Result<ConversionResult>;
}

/// `reqwest`-backed transport posting multipart bodies to `{base}{upload_path}`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Resolves `upload_path` against `base_url` (usually the page origin).
    ///
    /// # Errors
    ///
    /// Returns `SketchifyError::InvalidConfig` if either part does not form a valid URL.
    pub fn new(http_client: reqwest::Client, base_url: &str, upload_path: &str) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|e| {
            SketchifyError::InvalidConfig(format!("Invalid base URL '{}': {}", base_url, e))
        })?;
        let endpoint = base.join(upload_path).map_err(|e| {
            SketchifyError::InvalidConfig(format!(
                "Invalid upload path '{}' for base '{}': {}",
                upload_path, base_url, e
            ))
        })?;
        Ok(HttpTransport {
            http_client,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Encodes a request as the multipart body the endpoint expects:
/// `file`, `conversion_type`, `resolution`, then `width`/`height` for custom sizes.
pub fn build_form(request: ConversionRequest) -> Result<Form> {
    let fields = request.text_fields();
    let source = request.source;
    let file_part = Part::bytes(source.data)
        .file_name(source.name)
        .mime_str(&source.media_type)?;

    let form = fields
        .into_iter()
        .fold(Form::new().part("file", file_part), |form, (name, value)| {
            form.text(name, value)
        });
    Ok(form)
}

impl Transport for HttpTransport {
    async fn submit(&self, request: ConversionRequest) -> Result<ConversionResult> {
        debug!(
            "POST {} ({}, {} bytes)",
            self.endpoint,
            request.source.name,
            request.source.data.len()
        );
        let form = build_form(request)?;

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(SketchifyError::Network)?;

        // The body decides the outcome; the status is only logged.
        let status = response.status();
        let bytes = response.bytes().await.map_err(SketchifyError::Network)?;
        debug!("Upload answered with status {} ({} bytes)", status, bytes.len());

        ConversionResult::from_json(&bytes).inspect_err(|e| {
            let snippet = String::from_utf8_lossy(&bytes[..bytes.len().min(500)]);
            error!(
                "Unreadable conversion response (status {}): {}\nBody snippet:\n{}",
                status, e, snippet
            );
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConversionType, CustomSize, Resolution, SelectedFile};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Accepts one connection, records the raw request and answers with `body`.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                if request_complete(&raw) {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&raw).into_owned()
        });

        (base, handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let headers = text[..header_end].to_ascii_lowercase();
        let body_len = raw.len() - (header_end + 4);
        match headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
        {
            Some(expected) => body_len >= expected,
            None => text.ends_with("\r\n0\r\n\r\n"),
        }
    }

    fn request(resolution: Resolution) -> ConversionRequest {
        ConversionRequest {
            source: SelectedFile::new("cat.jpg", "image/jpeg", b"JPEGDATA".to_vec()),
            conversion_type: ConversionType::ArtSketch,
            resolution,
        }
    }

    fn transport(base: &str) -> HttpTransport {
        HttpTransport::new(reqwest::Client::new(), base, "/upload").unwrap()
    }

    #[test]
    fn test_endpoint_is_resolved_against_base() {
        let t = transport("http://localhost:5000/some/page.html");
        assert_eq!(t.endpoint().as_str(), "http://localhost:5000/upload");

        let err = HttpTransport::new(reqwest::Client::new(), "not a url", "/upload").unwrap_err();
        assert!(matches!(err, SketchifyError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_custom_request_posts_all_fields() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"input_url":"/static/uploads/in.jpg","output_url":"/static/outputs/out.jpg","download_url":"/download?file=out.jpg"}"#,
        )
        .await;

        let result = transport(&base)
            .submit(request(Resolution::Custom(CustomSize {
                width: 300,
                height: 200,
            })))
            .await
            .unwrap();
        assert!(result.is_success());

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /upload HTTP/1.1"));
        assert!(raw.contains(r#"name="file"; filename="cat.jpg""#));
        assert!(raw.contains("Content-Type: image/jpeg"));
        assert!(raw.contains("JPEGDATA"));
        assert!(raw.contains("name=\"conversion_type\"\r\n\r\nart_sketch\r\n"));
        assert!(raw.contains("name=\"resolution\"\r\n\r\ncustom\r\n"));
        assert!(raw.contains("name=\"width\"\r\n\r\n300\r\n"));
        assert!(raw.contains("name=\"height\"\r\n\r\n200\r\n"));
    }

    #[tokio::test]
    async fn test_large_file_contents_are_sent_whole() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"input_url":"/a","output_url":"/b","download_url":"/c"}"#,
        )
        .await;

        let data = b"0123456789abcdef".repeat(4096);
        let upload = ConversionRequest {
            source: SelectedFile::new("big.png", "image/png", data.clone()),
            conversion_type: ConversionType::InkBlot,
            resolution: Resolution::Original,
        };
        transport(&base).submit(upload).await.unwrap();

        let raw = server.await.unwrap();
        assert!(raw.contains(r#"name="file"; filename="big.png""#));
        assert!(raw.contains(std::str::from_utf8(&data).unwrap()));
    }

    #[test]
    fn test_build_form_rejects_unparsable_media_type() {
        let upload = ConversionRequest {
            source: SelectedFile::new("x.png", "not a mime", vec![1, 2, 3]),
            conversion_type: ConversionType::LineArt,
            resolution: Resolution::Original,
        };
        assert!(matches!(
            build_form(upload),
            Err(SketchifyError::Network(_))
        ));
    }

    #[tokio::test]
    async fn test_preset_request_omits_dimensions() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"input_url":"/a","output_url":"/b","download_url":"/c","message":"ok"}"#,
        )
        .await;

        transport(&base)
            .submit(request(Resolution::FullHd1080))
            .await
            .unwrap();

        let raw = server.await.unwrap();
        assert!(raw.contains("name=\"resolution\"\r\n\r\n1080p\r\n"));
        assert!(!raw.contains("name=\"width\""));
        assert!(!raw.contains("name=\"height\""));
    }

    #[tokio::test]
    async fn test_error_body_wins_regardless_of_status() {
        let (base, _server) =
            serve_once("400 BAD REQUEST", r#"{"error":"Jenis efek tidak dikenal: x"}"#).await;

        let result = transport(&base)
            .submit(request(Resolution::Original))
            .await
            .unwrap();
        assert_eq!(
            result,
            ConversionResult::Failed {
                error: "Jenis efek tidak dikenal: x".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unparsable_body_is_an_error() {
        let (base, _server) = serve_once("502 Bad Gateway", "<html>bad gateway</html>").await;

        let err = transport(&base)
            .submit(request(Resolution::Original))
            .await
            .unwrap_err();
        assert!(matches!(err, SketchifyError::JsonDeserialization(_)));
    }

    #[tokio::test]
    async fn test_connection_failure_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let err = transport(&base)
            .submit(request(Resolution::Original))
            .await
            .unwrap_err();
        assert!(matches!(err, SketchifyError::Network(_)));
    }
}
