//! Size-stock codec.
//!
//! The catalog feed carries per-size figures in one compound string:
//!
//! ```text
//! L : 14 // M : 53 // S : 31
//! ```
//!
//! Segments are joined by `" // "`, and each segment is `label : value`.
//! The same shape is reused at every pipeline stage with a different value
//! form (raw stock, `stock-sold` after the sales join, a sell-through ratio,
//! and finally a display form where reference sizes lose their value).
//! Each form is a [`SizeValue`] implementation, so a [`SizeStock`] always
//! knows which stage it belongs to and conversions between stages are
//! explicit functions instead of string rewrites.
//!
//! Segments that are not in `label : value` form are kept as
//! [`SizeEntry::Opaque`] and re-emitted byte-for-byte.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::thresholds::{JOINED_SEPARATOR, LABEL_SEPARATOR, REFERENCE_LABELS, SEGMENT_SEPARATOR};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("size '{label}' has an undecodable value '{value}'")]
    InvalidValue { label: String, value: String },
}

/// Result type alias for strict decoding.
pub type CodecResult<T> = Result<T, CodecError>;

/// The value carried by a size entry at one pipeline stage.
pub trait SizeValue: Sized + Clone {
    /// Decode the trimmed text to the right of `" : "`.
    fn decode(text: &str) -> Option<Self>;

    /// Decode a segment that has no `" : "` at all. Only the display stage
    /// gives bare labels a meaning.
    fn decode_bare(_segment: &str) -> Option<Self> {
        None
    }

    /// Render the value. `None` renders the entry as its bare label.
    fn encode(&self) -> Option<String>;
}

/// Raw stock counts and sell-through ratios are both plain counts.
impl SizeValue for u32 {
    fn decode(text: &str) -> Option<Self> {
        text.parse().ok()
    }

    fn encode(&self) -> Option<String> {
        Some(self.to_string())
    }
}

/// Current stock paired with historical sold quantity (`"14-2"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct JoinedStock {
    pub stock: u32,
    pub sold: u32,
}

impl SizeValue for JoinedStock {
    fn decode(text: &str) -> Option<Self> {
        let mut parts = text.split(JOINED_SEPARATOR);
        let stock = parts.next()?.trim().parse().ok()?;
        let sold = parts.next()?.trim().parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self { stock, sold })
    }

    fn encode(&self) -> Option<String> {
        Some(format!("{}{}{}", self.stock, JOINED_SEPARATOR, self.sold))
    }
}

/// Final display form: reference sizes are shown without a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DisplayValue {
    Ratio(u32),
    Bare,
}

impl SizeValue for DisplayValue {
    fn decode(text: &str) -> Option<Self> {
        text.parse().ok().map(DisplayValue::Ratio)
    }

    fn decode_bare(segment: &str) -> Option<Self> {
        (segment == segment.trim() && is_reference_label(segment)).then_some(DisplayValue::Bare)
    }

    fn encode(&self) -> Option<String> {
        match self {
            DisplayValue::Ratio(ratio) => Some(ratio.to_string()),
            DisplayValue::Bare => None,
        }
    }
}

/// True for the size labels that anchor the inflation ratio.
pub fn is_reference_label(label: &str) -> bool {
    REFERENCE_LABELS.contains(&label)
}

/// One segment of a size-stock string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SizeEntry<V> {
    /// Segment that did not decode; re-emitted verbatim, never inspected.
    Opaque(String),
    Sized { label: String, value: V },
}

impl<V> SizeEntry<V> {
    pub fn label(&self) -> Option<&str> {
        match self {
            SizeEntry::Sized { label, .. } => Some(label),
            SizeEntry::Opaque(_) => None,
        }
    }

    pub fn value(&self) -> Option<&V> {
        match self {
            SizeEntry::Sized { value, .. } => Some(value),
            SizeEntry::Opaque(_) => None,
        }
    }
}

/// Ordered per-size entries of one product at one stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SizeStock<V> {
    entries: Vec<SizeEntry<V>>,
}

impl<V: SizeValue> SizeStock<V> {
    pub fn new(entries: Vec<SizeEntry<V>>) -> Self {
        Self { entries }
    }

    /// Lenient decode: anything that does not decode for this stage is
    /// kept as an opaque segment.
    pub fn decode(encoded: &str) -> Self {
        let entries = encoded
            .split(SEGMENT_SEPARATOR)
            .map(|segment| {
                decode_segment(segment).unwrap_or_else(|_| SizeEntry::Opaque(segment.to_string()))
            })
            .collect();
        Self { entries }
    }

    /// Strict decode: a `label : value` segment whose value does not decode
    /// is an error. Segments without a separator are still opaque.
    pub fn decode_strict(encoded: &str) -> CodecResult<Self> {
        let entries = encoded
            .split(SEGMENT_SEPARATOR)
            .map(decode_segment)
            .collect::<CodecResult<Vec<_>>>()?;
        Ok(Self { entries })
    }

    pub fn encode(&self) -> String {
        self.entries
            .iter()
            .map(|entry| match entry {
                SizeEntry::Opaque(text) => text.clone(),
                SizeEntry::Sized { label, value } => match value.encode() {
                    Some(value) => format!("{}{}{}", label, LABEL_SEPARATOR, value),
                    None => label.clone(),
                },
            })
            .collect::<Vec<_>>()
            .join(SEGMENT_SEPARATOR)
    }

    /// Convert every sized entry to the next stage's value, keeping order,
    /// labels and opaque segments untouched.
    pub fn map_sized<W, F>(&self, mut convert: F) -> SizeStock<W>
    where
        F: FnMut(&str, &V) -> W,
    {
        let entries = self
            .entries
            .iter()
            .map(|entry| match entry {
                SizeEntry::Opaque(text) => SizeEntry::Opaque(text.clone()),
                SizeEntry::Sized { label, value } => SizeEntry::Sized {
                    label: label.clone(),
                    value: convert(label, value),
                },
            })
            .collect();
        SizeStock { entries }
    }

    /// Like [`SizeStock::map_sized`], but a conversion may give up on an
    /// entry. `Err(text)` turns that entry into an opaque segment holding
    /// `text` verbatim.
    pub fn try_map_sized<W, F>(&self, mut convert: F) -> SizeStock<W>
    where
        F: FnMut(&str, &V) -> Result<W, String>,
    {
        let entries = self
            .entries
            .iter()
            .map(|entry| match entry {
                SizeEntry::Opaque(text) => SizeEntry::Opaque(text.clone()),
                SizeEntry::Sized { label, value } => match convert(label, value) {
                    Ok(value) => SizeEntry::Sized {
                        label: label.clone(),
                        value,
                    },
                    Err(text) => SizeEntry::Opaque(text),
                },
            })
            .collect();
        SizeStock { entries }
    }
}

impl<V> SizeStock<V> {
    pub fn entries(&self) -> &[SizeEntry<V>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sized entries in order, skipping opaque segments.
    pub fn sized(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().filter_map(|entry| match entry {
            SizeEntry::Sized { label, value } => Some((label.as_str(), value)),
            SizeEntry::Opaque(_) => None,
        })
    }

    /// Labels of the sized entries, in order.
    pub fn labels(&self) -> Vec<&str> {
        self.sized().map(|(label, _)| label).collect()
    }
}

impl<V: SizeValue> fmt::Display for SizeStock<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Label cleanup: drop the value of reference sizes for display.
pub fn strip_reference_values(ratios: &SizeStock<u32>) -> SizeStock<DisplayValue> {
    ratios.map_sized(|label, ratio| {
        if is_reference_label(label) {
            DisplayValue::Bare
        } else {
            DisplayValue::Ratio(*ratio)
        }
    })
}

fn split_segment(segment: &str) -> Option<(&str, &str)> {
    let (label, value) = segment.split_once(LABEL_SEPARATOR)?;
    if value.contains(LABEL_SEPARATOR) {
        return None;
    }
    Some((label.trim(), value.trim()))
}

fn decode_segment<V: SizeValue>(segment: &str) -> CodecResult<SizeEntry<V>> {
    match split_segment(segment) {
        Some((label, value)) => V::decode(value)
            .map(|decoded| SizeEntry::Sized {
                label: label.to_string(),
                value: decoded,
            })
            .ok_or_else(|| CodecError::InvalidValue {
                label: label.to_string(),
                value: value.to_string(),
            }),
        None => Ok(match V::decode_bare(segment) {
            Some(value) => SizeEntry::Sized {
                label: segment.to_string(),
                value,
            },
            None => SizeEntry::Opaque(segment.to_string()),
        }),
    }
}
