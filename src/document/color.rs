//! Colors and palettes.
//!
//! Lottie stores colors as normalized floats; callers speak `#RRGGBB`.

use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

use crate::error::{LottieError, LottieResult};

/// An RGB color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Converts 8-bit channels to normalized floats (`channel / 255`).
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: f64::from(r) / 255.0,
            g: f64::from(g) / 255.0,
            b: f64::from(b) / 255.0,
        }
    }

    /// Strict parse of `#RRGGBB` / `RRGGBB` (case-insensitive).
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 {
            return None;
        }
        match hex::decode(digits).ok()?.as_slice() {
            [r, g, b] => Some(Self::from_rgb8(*r, *g, *b)),
            _ => None,
        }
    }

    /// Lenient parse: malformed input yields black instead of an error.
    ///
    /// Use [`Rgb::parse_hex`] when malformed input must be rejected.
    pub fn from_hex(hex: &str) -> Self {
        Self::parse_hex(hex).unwrap_or_else(|| {
            warn!(input = hex, "Malformed hex color, using black");
            Self::BLACK
        })
    }

    /// Formats as uppercase `#RRGGBB`.
    pub fn to_hex(&self) -> String {
        fn channel(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        format!(
            "#{}",
            hex::encode_upper([channel(self.r), channel(self.g), channel(self.b)])
        )
    }
}

/// Canonical form of a hex color (`#RRGGBB`, uppercase), or `None` if malformed.
pub fn normalize_hex(hex: &str) -> Option<String> {
    Rgb::parse_hex(hex).map(|rgb| rgb.to_hex())
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Ok(Rgb::from_hex(&hex))
    }
}

// =============================================================================
// PALETTE
// =============================================================================

/// A non-empty, ordered list of colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    pub fn new(colors: Vec<Rgb>) -> LottieResult<Self> {
        if colors.is_empty() {
            return Err(LottieError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    /// Builds a palette from hex strings (lenient per color).
    pub fn from_hex<I, S>(hexes: I) -> LottieResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(hexes.into_iter().map(|h| Rgb::from_hex(h.as_ref())).collect())
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Serialize for Palette {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.colors.iter().map(Rgb::to_hex))
    }
}

/// Accepts `["#FF0000", ...]` or `{ "primary": "#FF0000", ... }`; object
/// values are taken in document order.
impl<'de> Deserialize<'de> for Palette {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            List(Vec<String>),
            Named(serde_json::Map<String, Value>),
        }

        let hexes: Vec<String> = match Repr::deserialize(deserializer)? {
            Repr::List(list) => list,
            Repr::Named(map) => map
                .into_iter()
                .map(|(name, value)| match value {
                    Value::String(hex) => Ok(hex),
                    other => Err(D::Error::custom(format!(
                        "palette entry '{}' must be a hex string, got {}",
                        name, other
                    ))),
                })
                .collect::<Result<_, _>>()?,
        };

        Palette::from_hex(hexes).map_err(D::Error::custom)
    }
}
