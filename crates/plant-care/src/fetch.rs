/// Downloads the gardening guide and checks that it really is a PDF.
///
/// One GET per call. A transport failure, a non-2xx status or an oversized body is a
/// `Network` error; a `Content-Type` other than exactly `application/pdf` is a
/// `Format` error and the body is never read.
use std::time::Duration;

use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info};

use crate::config::{DocumentConfig, USER_AGENT};
use crate::error::AppError;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

#[derive(Clone)]
pub struct PdfFetcher {
    http: reqwest::Client,
    timeout: Duration,
    max_bytes: usize,
}

impl PdfFetcher {
    pub fn new(config: &DocumentConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            timeout: config.fetch_timeout,
            max_bytes: config.max_bytes,
        })
    }

    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError> {
        info!(url, "fetching PDF");
        let resp = self
            .http
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
        match content_type.as_deref() {
            Some(PDF_MEDIA_TYPE) => {}
            Some(other) => return Err(AppError::Format(format!("content type is {other:?}"))),
            None => return Err(AppError::Format("response has no content type".to_string())),
        }

        if let Some(len) = resp.content_length() {
            if len > self.max_bytes as u64 {
                return Err(self.too_large());
            }
        }

        let status = resp.status();
        let mut body = Vec::new();
        let mut stream = resp.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if body.len() + chunk.len() > self.max_bytes {
                return Err(self.too_large());
            }
            body.extend_from_slice(&chunk);
        }

        debug!(url, %status, bytes = body.len(), "PDF downloaded");
        Ok(body)
    }

    fn too_large(&self) -> AppError {
        AppError::Network(format!("document exceeds {} bytes", self.max_bytes))
    }
}
