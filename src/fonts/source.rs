//! Font source references and the built-in named palette.

use serde::{Deserialize, Serialize};

/// Where a font's bytes come from.
///
/// Serialized as a plain string; anything starting with `http` is treated as
/// a remote URL, everything else as a local file path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FontSource {
    /// Fetch over HTTP(S).
    Remote(String),
    /// Read from the local filesystem.
    Local(String),
}

impl FontSource {
    /// Cache key / display form of the source.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Remote(url) => url,
            Self::Local(path) => path,
        }
    }
}

impl From<String> for FontSource {
    fn from(s: String) -> Self {
        if s.starts_with("http") {
            Self::Remote(s)
        } else {
            Self::Local(s)
        }
    }
}

impl From<&str> for FontSource {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<FontSource> for String {
    fn from(s: FontSource) -> Self {
        match s {
            FontSource::Remote(url) => url,
            FontSource::Local(path) => path,
        }
    }
}

impl std::fmt::Display for FontSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A palette entry pairing a human-readable family name with its source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedFont {
    /// Display name, e.g. `"Cookie"`.
    pub name: String,
    /// Where to get the bytes.
    pub source: FontSource,
}

impl NamedFont {
    /// Build an entry from a name and a source string.
    pub fn new(name: impl Into<String>, source: impl Into<FontSource>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// The built-in named font palette.
pub(crate) fn default_fonts() -> Vec<NamedFont> {
    vec![
        NamedFont::new(
            "Berkshire Swash",
            "https://github.com/google/fonts/raw/main/ofl/berkshireswash/BerkshireSwash-Regular.ttf",
        ),
        NamedFont::new(
            "Bungee Tint",
            "https://github.com/google/fonts/raw/main/ofl/bungeetint/BungeeTint-Regular.ttf",
        ),
        NamedFont::new(
            "Cookie",
            "https://github.com/google/fonts/raw/main/ofl/cookie/Cookie-Regular.ttf",
        ),
        NamedFont::new(
            "Courgette",
            "https://github.com/google/fonts/raw/main/ofl/courgette/Courgette-Regular.ttf",
        ),
        NamedFont::new(
            "Protest Riot",
            "https://github.com/google/fonts/raw/main/ofl/protestriot/ProtestRiot-Regular.ttf",
        ),
        NamedFont::new("Satisfy", "Satisfy-Regular.ttf"),
        NamedFont::new(
            "Yatra One",
            "https://github.com/google/fonts/raw/main/ofl/yatraone/YatraOne-Regular.ttf",
        ),
    ]
}
