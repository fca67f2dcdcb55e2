//! # Symbologies
//!
//! Encoders turn a value into one or more [`EncodedSegment`]s whose `data`
//! is a bit string, one character per column (`'1'` = bar, `'0'` = space).
//!
//! Encoders are looked up by format name through a [`Registry`]. The
//! built-in registry wraps the `barcoders` crate (see [`linear`]); callers
//! can register more formats without touching the compiler or fit policy.
//!
//! ## Adding a New Format
//!
//! 1. Implement [`Encoder`] for a struct holding the parsed value
//! 2. Call [`Registry::register`] with the format name and a constructor
//!
//! ```
//! use barpath::symbology::{Encoded, EncodedSegment, Encoder, Registry};
//!
//! struct Alternating(String);
//!
//! impl Encoder for Alternating {
//!     fn format(&self) -> &str { "ALT" }
//!     fn valid(&self) -> bool { !self.0.is_empty() }
//!     fn encode(&self) -> Encoded {
//!         Encoded::Single(EncodedSegment::new(self.0.clone(), "10".repeat(self.0.len())))
//!     }
//! }
//!
//! let mut registry = Registry::builtin();
//! registry.register("ALT", |value, _| Ok(Box::new(Alternating(value.to_string()))));
//! let encoder = registry.create("alt", "abc", &Default::default()).unwrap();
//! assert_eq!(encoder.encode().data(), "101010");
//! ```

pub mod linear;

use serde::{Deserialize, Serialize};

use crate::error::BarcodeError;

/// Format used when none is configured.
pub const DEFAULT_FORMAT: &str = "CODE128";

/// One encoded piece of a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedSegment {
    /// Human readable text belonging to this segment (may be empty).
    pub text: String,
    /// Bit string over `'0'`/`'1'`.
    pub data: String,
}

impl EncodedSegment {
    pub fn new(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            data: data.into(),
        }
    }

    /// Segment without text (guards, separators).
    pub fn bits(data: impl Into<String>) -> Self {
        Self::new(String::new(), data)
    }
}

/// Output of an encoder: a single record or an ordered run of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Encoded {
    Single(EncodedSegment),
    Multi(Vec<EncodedSegment>),
}

impl Encoded {
    /// Combined bit string, segments concatenated in order.
    pub fn data(&self) -> String {
        match self {
            Encoded::Single(segment) => segment.data.clone(),
            Encoded::Multi(segments) => segments.iter().map(|s| s.data.as_str()).collect(),
        }
    }

    /// Combined human readable text.
    pub fn text(&self) -> String {
        match self {
            Encoded::Single(segment) => segment.text.clone(),
            Encoded::Multi(segments) => segments.iter().map(|s| s.text.as_str()).collect(),
        }
    }

    pub fn segments(&self) -> &[EncodedSegment] {
        match self {
            Encoded::Single(segment) => std::slice::from_ref(segment),
            Encoded::Multi(segments) => segments,
        }
    }
}

/// Options forwarded to encoder constructors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    /// Emit a single flat segment instead of guard/half segments (EAN/UPC).
    pub flat: bool,
}

/// Encoder capability shared by all symbologies.
pub trait Encoder {
    /// Registered format name (uppercase, e.g. "CODE128").
    fn format(&self) -> &str;

    /// Whether the value satisfies the symbology's own rules.
    fn valid(&self) -> bool;

    /// Encode the value. Only meaningful when [`valid`](Encoder::valid) is true.
    fn encode(&self) -> Encoded;
}

/// Constructor registered for a format.
pub type EncoderFactory =
    Box<dyn Fn(&str, &EncodeOptions) -> Result<Box<dyn Encoder>, BarcodeError> + Send + Sync>;

struct Entry {
    name: String,
    factory: EncoderFactory,
}

/// Format name → encoder constructor, in display order.
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    /// Registry without any formats.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registry with every built-in linear format.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        linear::register_all(&mut registry);
        registry
    }

    /// Register (or replace) a format. Names are matched case-insensitively.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&str, &EncodeOptions) -> Result<Box<dyn Encoder>, BarcodeError>
            + Send
            + Sync
            + 'static,
    {
        let name = name.to_uppercase();
        let factory: EncoderFactory = Box::new(factory);
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.factory = factory,
            None => self.entries.push(Entry { name, factory }),
        }
    }

    pub fn contains(&self, format: &str) -> bool {
        self.lookup(format).is_some()
    }

    /// Registered format names, in display order.
    pub fn formats(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Construct an encoder for `value` in `format`.
    pub fn create(
        &self,
        format: &str,
        value: &str,
        options: &EncodeOptions,
    ) -> Result<Box<dyn Encoder>, BarcodeError> {
        let entry = self
            .lookup(format)
            .ok_or_else(|| BarcodeError::construction(format, "unknown format"))?;
        (entry.factory)(value, options)
    }

    /// Construct, validate and encode in one step.
    pub fn encode(
        &self,
        format: &str,
        value: &str,
        options: &EncodeOptions,
    ) -> Result<Encoded, BarcodeError> {
        let encoder = self.create(format, value, options)?;
        if !encoder.valid() {
            return Err(BarcodeError::validation(
                encoder.format(),
                format!("'{}' rejected", value),
            ));
        }
        Ok(encoder.encode())
    }

    fn lookup(&self, format: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(format))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
