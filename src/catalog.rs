//! Numeric type catalogs fed to the template expander.
//!
//! The standard catalog is the cross product of the two integer axes
//! (width-major, sign-minor) followed by the float widths:
//!
//! `u8 i8 u16 i16 u32 i32 u64 i64 f32 f64`
//!
//! Custom catalogs come from a small JSON file and are validated as a whole
//! before anything is rendered.
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Outer axis of the integer cross product.
pub const INT_WIDTHS: [u8; 4] = [8, 16, 32, 64];
/// Inner axis of the integer cross product.
pub const SIGNS: [Sign; 2] = [Sign::Unsigned, Sign::Signed];
pub const FLOAT_WIDTHS: [u8; 2] = [32, 64];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Unsigned,
    Signed,
}

impl Sign {
    fn prefix(self) -> char {
        match self {
            Sign::Unsigned => 'u',
            Sign::Signed => 'i',
        }
    }
}

/// A primitive numeric type. `Display` yields the exact Rust spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumTy {
    Int { sign: Sign, width: u8 },
    Float { width: u8 },
}

impl NumTy {
    pub fn is_int(&self) -> bool {
        matches!(self, NumTy::Int { .. })
    }
    pub fn is_float(&self) -> bool {
        matches!(self, NumTy::Float { .. })
    }
}

impl fmt::Display for NumTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumTy::Int { sign, width } => write!(f, "{}{width}", sign.prefix()),
            NumTy::Float { width } => write!(f, "f{width}"),
        }
    }
}

static NUM_TY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:([ui])(8|16|32|64)|f(32|64))$").unwrap());

impl FromStr for NumTy {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(CatalogError::EmptyIdentifier);
        }
        let caps = NUM_TY_RE
            .captures(s)
            .ok_or_else(|| CatalogError::InvalidIdentifier(s.to_string()))?;
        if let (Some(sign), Some(width)) = (caps.get(1), caps.get(2)) {
            let sign = if sign.as_str() == "u" { Sign::Unsigned } else { Sign::Signed };
            let width = width.as_str().parse::<u8>()
                .map_err(|_| CatalogError::InvalidIdentifier(s.to_string()))?;
            return Ok(NumTy::Int { sign, width });
        }
        let width = caps.get(3)
            .map_or("", |m| m.as_str())
            .parse::<u8>()
            .map_err(|_| CatalogError::InvalidIdentifier(s.to_string()))?;
        Ok(NumTy::Float { width })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("empty type identifier")]
    EmptyIdentifier,
    #[error("unknown numeric type identifier `{0}`")]
    InvalidIdentifier(String),
    #[error("`{ident}` listed under `{section}` but it is not {expected} type")]
    WrongSection { ident: String, section: &'static str, expected: &'static str },
    #[error("duplicate catalog entry `{0}`")]
    Duplicate(String),
    #[error("catalog has no entries")]
    Empty,
    #[error("malformed catalog file at {path}: {message}")]
    Parse { path: String, message: String },
}

/// Ordered, duplicate-free catalog. Integers always precede floats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    integers: Vec<NumTy>,
    floats: Vec<NumTy>,
}

/// On-disk shape of a catalog: `{ "integers": [...], "floats": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    #[serde(default)]
    pub integers: Vec<String>,
    #[serde(default)]
    pub floats: Vec<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

/// Lazy width × sign cross product, in catalog order.
pub fn standard_integers() -> impl Iterator<Item = NumTy> + Clone {
    INT_WIDTHS.into_iter().flat_map(|width| {
        SIGNS.into_iter().map(move |sign| NumTy::Int { sign, width })
    })
}

pub fn standard_floats() -> impl Iterator<Item = NumTy> + Clone {
    FLOAT_WIDTHS.into_iter().map(|width| NumTy::Float { width })
}

/// Integers first, then floats.
pub fn standard_mixed() -> impl Iterator<Item = NumTy> + Clone {
    standard_integers().chain(standard_floats())
}

impl Catalog {
    /// The fixed 8 + 2 catalog.
    pub fn standard() -> Self {
        Catalog {
            integers: standard_integers().collect(),
            floats: standard_floats().collect(),
        }
    }

    /// Validate identifiers in order. Any failure rejects the whole catalog.
    pub fn new<I, F>(integers: I, floats: F) -> Result<Self, CatalogError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        F: IntoIterator,
        F::Item: AsRef<str>,
    {
        let mut seen = IndexSet::<NumTy>::new();
        let integers = collect_section(integers, Section::INTEGERS, &mut seen)?;
        let floats = collect_section(floats, Section::FLOATS, &mut seen)?;
        if seen.is_empty() {
            return Err(CatalogError::Empty);
        }
        tracing::debug!(integers = integers.len(), floats = floats.len(), "catalog validated");
        Ok(Catalog { integers, floats })
    }

    pub fn from_file_model(file: &CatalogFile) -> Result<Self, CatalogError> {
        Catalog::new(&file.integers, &file.floats)
    }

    pub fn from_json_str(src: &str) -> Result<Self, CatalogError> {
        let file = crate::path_de::from_str_with_path::<CatalogFile>(src)?;
        Catalog::from_file_model(&file)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read catalog file {}", path.display()))?;
        let file = crate::path_de::from_slice_with_path::<CatalogFile>(&bytes)
            .with_context(|| format!("failed to parse catalog file {}", path.display()))?;
        let catalog = Catalog::from_file_model(&file)
            .with_context(|| format!("invalid catalog file {}", path.display()))?;
        tracing::info!(path = %path.display(), entries = catalog.len(), "loaded custom catalog");
        Ok(catalog)
    }

    /// Integer-only view (smart-number mode).
    pub fn integers(&self) -> &[NumTy] {
        &self.integers
    }

    pub fn floats(&self) -> &[NumTy] {
        &self.floats
    }

    /// Integers followed by floats (operand and node modes).
    pub fn mixed(&self) -> impl Iterator<Item = NumTy> + Clone + '_ {
        self.integers.iter().chain(self.floats.iter()).copied()
    }

    pub fn len(&self) -> usize {
        self.integers.len() + self.floats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_file_model(&self) -> CatalogFile {
        CatalogFile {
            integers: self.integers.iter().map(ToString::to_string).collect(),
            floats: self.floats.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::standard()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

struct Section {
    name: &'static str,
    expected: &'static str,
    admits: fn(&NumTy) -> bool,
}

impl Section {
    const INTEGERS: Section = Section { name: "integers", expected: "an integer", admits: NumTy::is_int };
    const FLOATS: Section = Section { name: "floats", expected: "a floating-point", admits: NumTy::is_float };
}

fn collect_section<I>(
    raw: I,
    section: Section,
    seen: &mut IndexSet<NumTy>,
) -> Result<Vec<NumTy>, CatalogError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out = Vec::new();
    for ident in raw {
        let ident = ident.as_ref();
        let ty = ident.parse::<NumTy>()?;
        if !(section.admits)(&ty) {
            return Err(CatalogError::WrongSection {
                ident: ident.to_string(),
                section: section.name,
                expected: section.expected,
            });
        }
        if !seen.insert(ty) {
            return Err(CatalogError::Duplicate(ident.to_string()));
        }
        out.push(ty);
    }
    Ok(out)
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(tys: impl IntoIterator<Item = NumTy>) -> Vec<String> {
        tys.into_iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn standard_catalog_is_width_major_sign_minor() {
        let cat = Catalog::standard();
        assert_eq!(
            names(cat.integers().iter().copied()),
            ["u8", "i8", "u16", "i16", "u32", "i32", "u64", "i64"],
        );
        assert_eq!(
            names(cat.mixed()),
            ["u8", "i8", "u16", "i16", "u32", "i32", "u64", "i64", "f32", "f64"],
        );
        assert_eq!(cat.len(), 10);
    }

    #[test]
    fn num_ty_parses_what_it_displays() {
        for ty in Catalog::standard().mixed() {
            let back: NumTy = ty.to_string().parse().unwrap();
            assert_eq!(back, ty);
        }
    }

    #[test]
    fn num_ty_rejects_unknown_combinations() {
        for bad in ["u128", "f16", "x8", "i", "u 8", "U8", "f8"] {
            assert_eq!(
                bad.parse::<NumTy>(),
                Err(CatalogError::InvalidIdentifier(bad.to_string())),
                "{bad}",
            );
        }
        assert_eq!("".parse::<NumTy>(), Err(CatalogError::EmptyIdentifier));
    }

    #[test]
    fn custom_catalog_keeps_given_order() {
        let cat = Catalog::new(["i64", "u8"], ["f64"]).unwrap();
        assert_eq!(names(cat.mixed()), ["i64", "u8", "f64"]);
    }

    #[test]
    fn duplicates_are_rejected() {
        assert_eq!(
            Catalog::new(["u8", "i8", "u8"], Vec::<String>::new()),
            Err(CatalogError::Duplicate("u8".into())),
        );
        assert_eq!(
            Catalog::new(Vec::<String>::new(), ["f32", "f32"]),
            Err(CatalogError::Duplicate("f32".into())),
        );
    }

    #[test]
    fn empty_identifier_and_empty_catalog_are_rejected() {
        assert_eq!(
            Catalog::new(["u8", ""], Vec::<String>::new()),
            Err(CatalogError::EmptyIdentifier),
        );
        assert_eq!(
            Catalog::new(Vec::<String>::new(), Vec::<String>::new()),
            Err(CatalogError::Empty),
        );
    }

    #[test]
    fn misplaced_kinds_are_rejected() {
        assert_eq!(
            Catalog::new(["f32"], Vec::<String>::new()),
            Err(CatalogError::WrongSection {
                ident: "f32".into(),
                section: "integers",
                expected: "an integer",
            }),
        );
        let err = Catalog::new(Vec::<String>::new(), ["i32"]).unwrap_err();
        assert_eq!(err.to_string(), "`i32` listed under `floats` but it is not a floating-point type");
    }

    #[test]
    fn json_catalog_round_trips_through_file_model() {
        let src = json!({ "integers": ["u16", "i16"], "floats": ["f32"] }).to_string();
        let cat = Catalog::from_json_str(&src).unwrap();
        let model = serde_json::to_value(cat.to_file_model()).unwrap();
        assert_eq!(model, json!({ "integers": ["u16", "i16"], "floats": ["f32"] }));
    }

    #[test]
    fn json_catalog_sections_are_optional() {
        let cat = Catalog::from_json_str(r#"{ "floats": ["f64"] }"#).unwrap();
        assert!(cat.integers().is_empty());
        assert_eq!(names(cat.floats().iter().copied()), ["f64"]);
        assert!(!cat.is_empty());
    }

    #[test]
    fn json_catalog_errors_report_path() {
        let err = Catalog::from_json_str(r#"{ "integers": ["u8", 16] }"#).unwrap_err();
        match err {
            CatalogError::Parse { path, .. } => assert_eq!(path, "integers[1]"),
            other => panic!("unexpected error: {other}"),
        }
        let err = Catalog::from_json_str(r#"{ "ints": [] }"#).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }), "unknown keys rejected");
    }
}
