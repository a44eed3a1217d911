//! In-memory HTTP and event fakes, plus minimal audio containers, shared by unit tests.

use crate::batch::{BatchEvent, EventSink};
use crate::errors::{LyricsFinderError, Result};
use crate::utils::{HttpFetch, HttpResponse};
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Canned HTTP responses keyed by URL.
///
/// A key matches a request URL exactly or as a prefix; the first match wins.
/// Unknown URLs answer 404 with an empty body.
#[derive(Default)]
pub struct FakeHttp {
    pages: Vec<(String, HttpResponse)>,
    heads: Vec<(String, u16)>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, status: u16, body: &str) -> Self {
        self.pages.push((
            url.to_string(),
            HttpResponse {
                status,
                body: body.to_string(),
            },
        ));
        self
    }

    pub fn with_head(mut self, url: &str, status: u16) -> Self {
        self.heads.push((url.to_string(), status));
        self
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    /// Every request made so far, as "METHOD url"
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn network_calls(&self) -> usize {
        self.calls().iter().filter(|call| !call.starts_with("PACE")).count()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn check_failure(&self, url: &str) -> Result<()> {
        if self.failing.iter().any(|key| url.starts_with(key.as_str())) {
            return Err(LyricsFinderError::Unknown(format!("connection refused: {}", url)));
        }
        Ok(())
    }

    fn lookup<'a, T>(entries: &'a [(String, T)], url: &str) -> Option<&'a T> {
        entries
            .iter()
            .find(|(key, _)| key == url)
            .or_else(|| entries.iter().find(|(key, _)| url.starts_with(key.as_str())))
            .map(|(_, value)| value)
    }

    fn get_page(&self, url: &str) -> Result<HttpResponse> {
        self.check_failure(url)?;
        Ok(Self::lookup(&self.pages, url).cloned().unwrap_or(HttpResponse {
            status: 404,
            body: String::new(),
        }))
    }
}

#[async_trait]
impl HttpFetch for FakeHttp {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.record(format!("GET {}", url));
        self.get_page(url)
    }

    async fn get_authorized(&self, url: &str, _token: &str) -> Result<HttpResponse> {
        self.record(format!("GET+AUTH {}", url));
        self.get_page(url)
    }

    async fn head(&self, url: &str) -> Result<u16> {
        self.record(format!("HEAD {}", url));
        self.check_failure(url)?;
        Ok(Self::lookup(&self.heads, url).copied().unwrap_or(404))
    }

    async fn pace(&self) {
        self.record("PACE".to_string());
    }
}

/// Collects every event for later assertions
#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<BatchEvent>>,
}

impl CollectingSink {
    pub fn events(&self) -> Vec<BatchEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                BatchEvent::Status(message) => Some(message),
                BatchEvent::Finished(_) => None,
            })
            .collect()
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: BatchEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

fn atom(kind: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut bytes = ((payload.len() + 8) as u32).to_be_bytes().to_vec();
    bytes.extend_from_slice(kind);
    bytes.extend_from_slice(payload);
    bytes
}

/// Smallest M4A the tag writer accepts: ftyp, moov with an mvhd, empty mdat
pub fn minimal_m4a(dir: &Path, name: &str) -> PathBuf {
    let mut ftyp = b"M4A ".to_vec();
    ftyp.extend_from_slice(&0u32.to_be_bytes());
    ftyp.extend_from_slice(b"M4A mp42isom");

    let mut mvhd = vec![0u8; 4]; // version + flags
    mvhd.extend_from_slice(&0u32.to_be_bytes()); // creation time
    mvhd.extend_from_slice(&0u32.to_be_bytes()); // modification time
    mvhd.extend_from_slice(&1000u32.to_be_bytes()); // timescale
    mvhd.extend_from_slice(&0u32.to_be_bytes()); // duration
    mvhd.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // rate 1.0
    mvhd.extend_from_slice(&0x0100u16.to_be_bytes()); // volume 1.0
    mvhd.extend_from_slice(&[0u8; 10]);
    for value in [0x0001_0000u32, 0, 0, 0, 0x0001_0000, 0, 0, 0, 0x4000_0000] {
        mvhd.extend_from_slice(&value.to_be_bytes());
    }
    mvhd.extend_from_slice(&[0u8; 24]);
    mvhd.extend_from_slice(&1u32.to_be_bytes()); // next track id

    let mut bytes = atom(b"ftyp", &ftyp);
    bytes.extend(atom(b"moov", &atom(b"mvhd", &mvhd)));
    bytes.extend(atom(b"mdat", &[]));

    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Smallest FLAC the tag writer accepts: marker, STREAMINFO, PADDING
pub fn minimal_flac(dir: &Path, name: &str) -> PathBuf {
    let mut bytes = b"fLaC".to_vec();

    // STREAMINFO: 34 bytes
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 34]);
    bytes.extend_from_slice(&4096u16.to_be_bytes());
    bytes.extend_from_slice(&4096u16.to_be_bytes());
    bytes.extend_from_slice(&[0u8; 6]); // frame sizes unknown
    // 44.1 kHz, 2 channels, 16 bits, sample count unknown
    let packed: u64 = (44_100u64 << 44) | (1 << 41) | (15 << 36);
    bytes.extend_from_slice(&packed.to_be_bytes());
    bytes.extend_from_slice(&[0u8; 16]); // MD5

    // last block: PADDING
    bytes.extend_from_slice(&[0x81, 0x00, 0x00, 16]);
    bytes.extend_from_slice(&[0u8; 16]);

    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
