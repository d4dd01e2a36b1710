//! Turning font sources into bytes, with caching and graceful degradation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::fonts::source::FontSource;

/// Default timeout for remote font fetches.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Font bytes ready for layout, or the system fallback stack.
#[derive(Clone, Debug)]
pub enum ResolvedFont {
    /// Raw font file bytes (TTF/OTF) from a palette source.
    Custom(Arc<Vec<u8>>),
    /// No usable bytes; lay out with the system sans-serif stack instead.
    Fallback,
}

/// Resolves [`FontSource`]s to bytes with caching and graceful degradation.
///
/// Resolution never fails: any fetch or read problem is logged as a warning
/// and yields [`ResolvedFont::Fallback`]. Successful resolutions are cached
/// for the lifetime of the resolver, so the per-render size search and
/// repeated renders of the same style fetch each source at most once.
pub struct FontResolver {
    client: Option<reqwest::blocking::Client>,
    timeout: Duration,
    cache: HashMap<String, Arc<Vec<u8>>>,
}

impl FontResolver {
    /// Create a resolver with [`DEFAULT_FETCH_TIMEOUT`].
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    /// Create a resolver with an explicit fetch timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: None,
            timeout,
            cache: HashMap::new(),
        }
    }

    /// Resolve a source to font bytes, falling back on any failure.
    pub fn resolve(&mut self, source: &FontSource) -> ResolvedFont {
        if let Some(bytes) = self.cache.get(source.as_str()) {
            return ResolvedFont::Custom(bytes.clone());
        }

        match self.load(source) {
            Ok(bytes) => {
                let bytes = Arc::new(bytes);
                self.cache
                    .insert(source.as_str().to_string(), bytes.clone());
                ResolvedFont::Custom(bytes)
            }
            Err(e) => {
                tracing::warn!(source = %source, error = %e, "font unavailable, using fallback");
                ResolvedFont::Fallback
            }
        }
    }

    fn load(&mut self, source: &FontSource) -> anyhow::Result<Vec<u8>> {
        match source {
            FontSource::Remote(url) => {
                let client = self.http_client()?;
                let resp = client.get(url).send()?.error_for_status()?;
                Ok(resp.bytes()?.to_vec())
            }
            FontSource::Local(path) => Ok(std::fs::read(path)?),
        }
    }

    fn http_client(&mut self) -> anyhow::Result<&reqwest::blocking::Client> {
        if self.client.is_none() {
            let client = reqwest::blocking::Client::builder()
                .timeout(self.timeout)
                .build()?;
            self.client = Some(client);
        }
        // Populated just above.
        self.client
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("http client unavailable"))
    }
}

impl Default for FontResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_local_file_degrades_to_fallback() {
        let mut resolver = FontResolver::new();
        let src = FontSource::Local("no/such/font.ttf".to_string());
        assert!(matches!(resolver.resolve(&src), ResolvedFont::Fallback));
    }

    #[test]
    fn local_read_is_cached() {
        let dir = std::env::temp_dir().join("glyphcard-resolve-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("fake.ttf");
        std::fs::write(&path, b"not a real font, bytes only").unwrap();

        let mut resolver = FontResolver::new();
        let src = FontSource::Local(path.to_string_lossy().into_owned());
        let first = resolver.resolve(&src);
        std::fs::remove_file(&path).unwrap();
        // Second resolve must come from cache even though the file is gone.
        let second = resolver.resolve(&src);
        match (first, second) {
            (ResolvedFont::Custom(a), ResolvedFont::Custom(b)) => assert!(Arc::ptr_eq(&a, &b)),
            other => panic!("expected cached custom bytes, got {other:?}"),
        }
    }

    #[test]
    fn unroutable_remote_degrades_to_fallback() {
        let mut resolver = FontResolver::with_timeout(Duration::from_millis(200));
        let src = FontSource::Remote("http://127.0.0.1:1/font.ttf".to_string());
        assert!(matches!(resolver.resolve(&src), ResolvedFont::Fallback));
    }
}
