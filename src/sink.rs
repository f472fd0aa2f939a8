//! Destinations for encoded push requests.
//!
//! The client hands every encoded batch to a [`PushSink`]. Transport,
//! retries and connection handling belong to the sink implementation; the
//! client only propagates its errors.

use loadgen_encode::Encoding;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Header carrying the tenant of a push.
pub const TENANT_HEADER: &str = "X-Scope-OrgID";

/// An encoded push request ready for transmission.
#[derive(Debug, Clone, Copy)]
pub struct PushRequest<'a> {
    pub body: &'a [u8],
    pub encoding: Encoding,
    pub tenant_id: &'a str,
    /// Number of log entries in `body`
    pub entries: usize,
    /// Sum of line lengths before encoding
    pub uncompressed_bytes: usize,
}

impl PushRequest<'_> {
    pub fn content_type(&self) -> &'static str {
        self.encoding.content_type()
    }

    pub fn content_encoding(&self) -> Option<&'static str> {
        self.encoding.content_encoding()
    }

    /// HTTP headers for this request.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![("Content-Type", self.content_type().to_string())];
        if let Some(encoding) = self.content_encoding() {
            headers.push(("Content-Encoding", encoding.to_string()));
        }
        headers.push((TENANT_HEADER, self.tenant_id.to_string()));
        headers
    }
}

/// Errors returned by sinks.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Push rejected: {0}")]
    Rejected(String),
}

/// Receiver of encoded push requests.
pub trait PushSink {
    fn push(&mut self, request: &PushRequest<'_>) -> Result<(), SinkError>;
}

impl<S: PushSink + ?Sized> PushSink for &mut S {
    fn push(&mut self, request: &PushRequest<'_>) -> Result<(), SinkError> {
        (**self).push(request)
    }
}

impl<S: PushSink + ?Sized> PushSink for Box<S> {
    fn push(&mut self, request: &PushRequest<'_>) -> Result<(), SinkError> {
        (**self).push(request)
    }
}

/// Sink that counts requests and drops them.
#[derive(Debug, Default, Clone)]
pub struct DiscardSink {
    pub requests: u64,
    pub entries: u64,
    pub payload_bytes: u64,
}

impl DiscardSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PushSink for DiscardSink {
    fn push(&mut self, request: &PushRequest<'_>) -> Result<(), SinkError> {
        self.requests += 1;
        self.entries += request.entries as u64;
        self.payload_bytes += request.body.len() as u64;
        Ok(())
    }
}

/// Sink that writes each payload to its own file.
///
/// Files are named `<tenant>-<sequence>.<ext>` where the extension is
/// `pb.snappy` for protobuf payloads and `json` for JSON payloads.
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    prefix: String,
    sequence: u64,
}

impl DirectorySink {
    /// Create the directory if needed and write files into it.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self, SinkError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            prefix: String::new(),
            sequence: 0,
        })
    }

    /// Prefix every file name, e.g. with a worker id.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of payloads written so far.
    pub fn written(&self) -> u64 {
        self.sequence
    }

    fn file_name(&self, request: &PushRequest<'_>) -> String {
        let extension = match request.encoding {
            Encoding::Protobuf => "pb.snappy",
            Encoding::Json => "json",
        };
        format!(
            "{}{}-{:06}.{}",
            self.prefix,
            sanitize(request.tenant_id),
            self.sequence,
            extension
        )
    }
}

impl PushSink for DirectorySink {
    fn push(&mut self, request: &PushRequest<'_>) -> Result<(), SinkError> {
        let path = self.dir.join(self.file_name(request));
        fs::write(&path, request.body)?;
        tracing::debug!(
            "Wrote {} entries ({} bytes) to {}",
            request.entries,
            request.body.len(),
            path.display()
        );
        self.sequence += 1;
        Ok(())
    }
}

/// Keep tenant ids usable as file names.
fn sanitize(tenant: &str) -> String {
    tenant
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
