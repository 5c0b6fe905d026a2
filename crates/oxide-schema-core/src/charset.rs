//! Character set catalog.
//!
//! A static table of every known character set is the source of truth. A
//! [`CharsetView`] adjusts that table for one flavor (availability, the
//! `utf8`/`utf8mb3` rename, default collation changes). Views are pure
//! functions of the flavor, so [`CharsetCatalog`] caches them.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::flavor::{Flavor, Vendor, Version};
use crate::introspect::Queryer;

/// A character set and its default collation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSet {
    /// Character set name.
    pub name: String,
    /// Default collation for this flavor.
    pub default_collation: String,
    /// Maximum bytes per character.
    pub max_length: u8,
}

/// Errors from the character set catalog.
#[derive(Debug, thiserror::Error)]
pub enum CharsetError {
    /// An override entry was not of the form `charset=collation`.
    #[error("invalid character set override entry {0:?}")]
    InvalidOverride(String),
    /// An override named a character set this flavor lacks.
    #[error("override names unknown character set {0:?}")]
    UnknownCharset(String),
    /// The override query failed.
    #[error("failed to query collation overrides: {0}")]
    Query(#[source] Box<dyn std::error::Error + Send + Sync>),
}

struct StaticCharset {
    name: &'static str,
    default_collation: &'static str,
    max_length: u8,
}

const fn cs(name: &'static str, default_collation: &'static str, max_length: u8) -> StaticCharset {
    StaticCharset {
        name,
        default_collation,
        max_length,
    }
}

/// Every known character set, with pre-MySQL-8 defaults.
const CHARSETS: &[StaticCharset] = &[
    cs("armscii8", "armscii8_general_ci", 1),
    cs("ascii", "ascii_general_ci", 1),
    cs("big5", "big5_chinese_ci", 2),
    cs("binary", "binary", 1),
    cs("cp1250", "cp1250_general_ci", 1),
    cs("cp1251", "cp1251_general_ci", 1),
    cs("cp1256", "cp1256_general_ci", 1),
    cs("cp1257", "cp1257_general_ci", 1),
    cs("cp850", "cp850_general_ci", 1),
    cs("cp852", "cp852_general_ci", 1),
    cs("cp866", "cp866_general_ci", 1),
    cs("cp932", "cp932_japanese_ci", 2),
    cs("dec8", "dec8_swedish_ci", 1),
    cs("eucjpms", "eucjpms_japanese_ci", 3),
    cs("euckr", "euckr_korean_ci", 2),
    cs("gb18030", "gb18030_chinese_ci", 4),
    cs("gb2312", "gb2312_chinese_ci", 2),
    cs("gbk", "gbk_chinese_ci", 2),
    cs("geostd8", "geostd8_general_ci", 1),
    cs("greek", "greek_general_ci", 1),
    cs("hebrew", "hebrew_general_ci", 1),
    cs("hp8", "hp8_english_ci", 1),
    cs("keybcs2", "keybcs2_general_ci", 1),
    cs("koi8r", "koi8r_general_ci", 1),
    cs("koi8u", "koi8u_general_ci", 1),
    cs("latin1", "latin1_swedish_ci", 1),
    cs("latin2", "latin2_general_ci", 1),
    cs("latin5", "latin5_turkish_ci", 1),
    cs("latin7", "latin7_general_ci", 1),
    cs("macce", "macce_general_ci", 1),
    cs("macroman", "macroman_general_ci", 1),
    cs("sjis", "sjis_japanese_ci", 2),
    cs("swe7", "swe7_swedish_ci", 1),
    cs("tis620", "tis620_thai_ci", 1),
    cs("ucs2", "ucs2_general_ci", 2),
    cs("ujis", "ujis_japanese_ci", 3),
    cs("utf16", "utf16_general_ci", 4),
    cs("utf16le", "utf16le_general_ci", 4),
    cs("utf32", "utf32_general_ci", 4),
    cs("utf8", "utf8_general_ci", 3),
    cs("utf8mb4", "utf8mb4_general_ci", 4),
];

/// Unicode sets whose defaults moved to the UCA 14.0.0 naming scheme.
const UCA1400_CHARSETS: &[&str] = &["ucs2", "utf16", "utf32", "utf8mb3", "utf8mb4"];

/// Maximum bytes per character of `charset`, straight from the static
/// table. Unrecognized names yield 1.
#[must_use]
pub fn max_bytes_per_char(charset: &str) -> u8 {
    let name = if charset == "utf8mb3" { "utf8" } else { charset };
    CHARSETS
        .iter()
        .find(|c| c.name == name)
        .map_or(1, |c| c.max_length)
}

fn available(name: &str, flavor: Flavor) -> bool {
    match name {
        "gb18030" => flavor.min_mysql(&[5, 7, 4]),
        "utf8mb4" => !flavor.is_mysql(&[]) || flavor.min_mysql(&[5, 5, 3]),
        _ => true,
    }
}

// ================================================================
// Per-flavor view
// ================================================================

/// The character sets of one flavor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharsetView {
    flavor: Flavor,
    sets: BTreeMap<String, CharacterSet>,
}

impl CharsetView {
    /// Computes the view for `flavor`. Prefer [`CharsetCatalog::view`],
    /// which caches the result.
    #[must_use]
    pub fn for_flavor(flavor: Flavor) -> Self {
        let mut sets: BTreeMap<String, CharacterSet> = CHARSETS
            .iter()
            .filter(|c| available(c.name, flavor))
            .map(|c| {
                (
                    c.name.to_string(),
                    CharacterSet {
                        name: c.name.to_string(),
                        default_collation: c.default_collation.to_string(),
                        max_length: c.max_length,
                    },
                )
            })
            .collect();

        // MySQL 8.0.29 renamed the set but kept the old collation names.
        if flavor.is_mysql(&[8, 0, 29]) {
            rekey(&mut sets, "utf8", "utf8mb3", "utf8_general_ci");
        } else if flavor.min_mysql(&[8, 0, 30]) || flavor.min_mariadb(&[10, 6]) {
            rekey(&mut sets, "utf8", "utf8mb3", "utf8mb3_general_ci");
        }

        if flavor.min_mysql(&[8]) {
            set_default(&mut sets, "utf8mb4", "utf8mb4_0900_ai_ci");
        }

        if flavor.min_mariadb(&[11, 8]) {
            for name in UCA1400_CHARSETS {
                set_default(&mut sets, name, &format!("{name}_uca1400_ai_ci"));
            }
        }

        Self { flavor, sets }
    }

    /// Flavor this view was computed for.
    #[must_use]
    pub const fn flavor(&self) -> Flavor {
        self.flavor
    }

    /// Looks up a character set by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CharacterSet> {
        self.sets.get(name)
    }

    /// Returns `true` if the character set exists for this flavor.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }

    /// Default collation of `charset`, if known.
    #[must_use]
    pub fn default_collation(&self, charset: &str) -> Option<&str> {
        self.sets.get(charset).map(|c| c.default_collation.as_str())
    }

    /// Returns `true` if `collation` is the default for `charset`.
    #[must_use]
    pub fn is_default_collation(&self, charset: &str, collation: &str) -> bool {
        self.default_collation(charset) == Some(collation)
    }

    /// Iterates character sets in name order.
    pub fn iter(&self) -> impl Iterator<Item = &CharacterSet> {
        self.sets.values()
    }

    /// Number of character sets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns `true` if the view has no character sets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Returns a copy with default collations replaced per `overrides`, a
    /// comma-separated list of `charset=collation` pairs. An empty string
    /// yields an identical copy.
    pub fn with_overrides(&self, overrides: &str) -> Result<Self, CharsetError> {
        let mut view = self.clone();
        for entry in overrides.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (charset, collation) = entry
                .split_once('=')
                .map(|(c, l)| (c.trim(), l.trim()))
                .filter(|(c, l)| !c.is_empty() && !l.is_empty())
                .ok_or_else(|| CharsetError::InvalidOverride(entry.to_string()))?;
            let set = view
                .sets
                .get_mut(charset)
                .ok_or_else(|| CharsetError::UnknownCharset(charset.to_string()))?;
            set.default_collation = collation.to_string();
        }
        Ok(view)
    }
}

fn rekey(sets: &mut BTreeMap<String, CharacterSet>, from: &str, to: &str, collation: &str) {
    if let Some(mut set) = sets.remove(from) {
        set.name = to.to_string();
        set.default_collation = collation.to_string();
        sets.insert(to.to_string(), set);
    }
}

fn set_default(sets: &mut BTreeMap<String, CharacterSet>, charset: &str, collation: &str) {
    if let Some(set) = sets.get_mut(charset) {
        set.default_collation = collation.to_string();
    }
}

/// Reads the server's `character_set_collations` override variable and
/// returns `view` with it applied. Flavors without the variable get an
/// unchanged copy. Intended for verification tooling only.
pub fn load_collation_overrides<Q: Queryer>(
    db: &Q,
    view: &CharsetView,
) -> Result<CharsetView, CharsetError> {
    if !view.flavor().min_mariadb(&[11, 2]) {
        return Ok(view.clone());
    }
    let value = db
        .query_optional_string("SELECT @@global.character_set_collations")
        .map_err(|e| CharsetError::Query(Box::new(e)))?;
    match value {
        Some(overrides) => view.with_overrides(&overrides),
        None => Ok(view.clone()),
    }
}

// ================================================================
// Cache
// ================================================================

/// Thread-safe cache of per-flavor views.
///
/// Keyed by vendor and full version: views differ between patch releases
/// (MySQL 8.0.29 vs 8.0.30), while variants never affect them. Concurrent
/// misses may compute a view more than once; the first one stored wins and
/// every caller gets that same `Arc`.
#[derive(Debug, Default)]
pub struct CharsetCatalog {
    views: RwLock<HashMap<(Vendor, Version), Arc<CharsetView>>>,
}

static GLOBAL_CATALOG: Lazy<CharsetCatalog> = Lazy::new(CharsetCatalog::new);

impl CharsetCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide catalog for callers that do not inject their own.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL_CATALOG
    }

    /// Returns the view for `flavor`, computing and caching it on first use.
    pub fn view(&self, flavor: Flavor) -> Arc<CharsetView> {
        let key = (flavor.vendor, flavor.version);
        if let Some(view) = self.views.read().get(&key) {
            return Arc::clone(view);
        }
        let computed = Arc::new(CharsetView::for_flavor(flavor.without_variants()));
        let mut views = self.views.write();
        let view = views.entry(key).or_insert_with(|| {
            tracing::debug!(%flavor, "cached character set view");
            computed
        });
        Arc::clone(view)
    }

    /// Number of cached views.
    #[must_use]
    pub fn len(&self) -> usize {
        self.views.read().len()
    }

    /// Returns `true` if nothing is cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.read().is_empty()
    }
}
