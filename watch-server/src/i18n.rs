//! Key-based localization.
//!
//! Catalogs are flat `"ns.key": "text"` JSON maps, one file per
//! language, mirroring the `locales/<lang>.json` layout the interface
//! has always shipped. A copy of each catalog is embedded in the binary
//! so the server works without the files on disk; files, when present,
//! override the embedded entries.
//!
//! Lookup order: active language → English → the key itself.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::Language;

/// Embedded default catalogs, paired with their languages.
const BUILTIN: [(Language, &str); 3] = [
    (Language::En, include_str!("../locales/en.json")),
    (Language::Fr, include_str!("../locales/fr.json")),
    (Language::Nl, include_str!("../locales/nl.json")),
];

/// Errors loading locale catalogs from disk.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Reading a locale file failed for a reason other than absence.
    #[error("failed to read locale file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A locale file was not a flat string-to-string JSON map.
    #[error("failed to parse locale file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Localized message catalog for all supported languages.
#[derive(Debug, Clone)]
pub struct Catalog {
    tables: HashMap<Language, HashMap<String, String>>,
}

impl Catalog {
    /// The embedded default catalogs.
    pub fn builtin() -> Self {
        let tables = BUILTIN
            .iter()
            .map(|(lang, json)| {
                let table: HashMap<String, String> =
                    serde_json::from_str(json).expect("embedded locale catalog is valid JSON");
                (*lang, table)
            })
            .collect();

        Self { tables }
    }

    /// Load catalogs from a directory of `<lang>.json` files.
    ///
    /// Entries from disk override the embedded defaults; a missing file
    /// just leaves the defaults for that language. An unreadable or
    /// malformed file is an error.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let mut catalog = Self::builtin();

        for lang in Language::ALL {
            let path = dir.as_ref().join(format!("{}.json", lang.as_str()));

            let contents = match std::fs::read_to_string(&path) {
                Ok(contents) => contents,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(CatalogError::Io {
                        path,
                        source: e,
                    });
                }
            };

            let table: HashMap<String, String> =
                serde_json::from_str(&contents).map_err(|e| CatalogError::Parse {
                    path,
                    message: e.to_string(),
                })?;

            catalog
                .tables
                .entry(lang)
                .or_default()
                .extend(table);
        }

        Ok(catalog)
    }

    /// Look up a key in the given language, falling back to English.
    pub fn lookup(&self, lang: Language, key: &str) -> Option<&str> {
        self.tables
            .get(&lang)
            .and_then(|table| table.get(key))
            .or_else(|| {
                self.tables
                    .get(&Language::En)
                    .and_then(|table| table.get(key))
            })
            .map(String::as_str)
    }

    /// Translate a key; a missing key is echoed back.
    pub fn t(&self, lang: Language, key: &str) -> String {
        self.lookup(lang, key)
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }

    /// Translate the first key in the list with a translation.
    ///
    /// Falls back through the list in order; if nothing matches, the
    /// first key is echoed back.
    pub fn t_first<S: AsRef<str>>(&self, lang: Language, keys: &[S]) -> String {
        for key in keys {
            if let Some(text) = self.lookup(lang, key.as_ref()) {
                return text.to_string();
            }
        }
        keys.first()
            .map(|k| k.as_ref().to_string())
            .unwrap_or_default()
    }

    /// Translate a key and substitute `{n}` with a count.
    pub fn t_n(&self, lang: Language, key: &str, n: i64) -> String {
        self.t(lang, key).replace("{n}", &n.to_string())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
