//! Typed property values.
//!
//! Designer property editors and descriptor defaults speak in text
//! (`"True"`, `"&HFF0000FF"`); the runtime speaks in typed values.
//! [`PropertyValue::parse`] bridges the two.

use std::fmt;

use crate::error::PropertyError;

/// The declared type of a property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyType {
    /// Free text.
    Text,
    /// True/false flag.
    Boolean,
    /// Signed integer.
    Integer,
    /// Floating point number.
    Float,
    /// Path to a media asset (image, sound).
    Asset,
    /// ARGB color.
    Color,
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Asset => "asset",
            Self::Color => "color",
        };
        f.write_str(name)
    }
}

/// A typed property value.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// Free text.
    Text(String),
    /// True/false flag.
    Boolean(bool),
    /// Signed integer.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Path to a media asset. Empty means "no asset".
    Asset(String),
    /// ARGB color packed as `0xAARRGGBB`.
    Color(u32),
}

impl PropertyValue {
    /// The type tag of this value.
    pub fn value_type(&self) -> PropertyType {
        match self {
            Self::Text(_) => PropertyType::Text,
            Self::Boolean(_) => PropertyType::Boolean,
            Self::Integer(_) => PropertyType::Integer,
            Self::Float(_) => PropertyType::Float,
            Self::Asset(_) => PropertyType::Asset,
            Self::Color(_) => PropertyType::Color,
        }
    }

    /// Parse designer text into a value of the given type.
    ///
    /// Booleans accept `True`/`False` in any case. Colors use the `&HAARRGGBB`
    /// notation of the block language.
    pub fn parse(ty: PropertyType, text: &str) -> Result<Self, PropertyError> {
        let invalid = || PropertyError::InvalidValue {
            expected: ty,
            text: text.to_string(),
        };

        match ty {
            PropertyType::Text => Ok(Self::Text(text.to_string())),
            PropertyType::Asset => Ok(Self::Asset(text.to_string())),
            PropertyType::Boolean => {
                if text.eq_ignore_ascii_case("true") {
                    Ok(Self::Boolean(true))
                } else if text.eq_ignore_ascii_case("false") {
                    Ok(Self::Boolean(false))
                } else {
                    Err(invalid())
                }
            }
            PropertyType::Integer => text.trim().parse().map(Self::Integer).map_err(|_| invalid()),
            PropertyType::Float => text.trim().parse().map(Self::Float).map_err(|_| invalid()),
            PropertyType::Color => {
                let hex = text.strip_prefix("&H").ok_or_else(invalid)?;
                if hex.len() != 8 {
                    return Err(invalid());
                }
                u32::from_str_radix(hex, 16).map(Self::Color).map_err(|_| invalid())
            }
        }
    }

    /// The text of a `Text` or `Asset` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Asset(s) => Some(s),
            _ => None,
        }
    }

    /// The flag of a `Boolean` value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The number of an `Integer` value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// The number of a `Float` or `Integer` value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            Self::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// The packed ARGB of a `Color` value.
    pub fn as_color(&self) -> Option<u32> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) | Self::Asset(s) => f.write_str(s),
            Self::Boolean(true) => f.write_str("True"),
            Self::Boolean(false) => f.write_str("False"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Color(c) => write!(f, "&H{c:08X}"),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}
