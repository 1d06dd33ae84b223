use crate::{
    data::entity::{Category, MapEntity},
    prelude::HashMap,
    MapError, Result,
};
use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA color, (de)serialized as `#rrggbb` / `#rrggbbaa`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || MapError::Config(format!("invalid color '{}'", hex));
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());

        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if digits.len() == 8 { channel(6)? } else { 255 },
        })
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Rgba {
    type Error = MapError;

    fn try_from(value: String) -> Result<Self> {
        Rgba::from_hex(&value)
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_hex()
    }
}

impl std::fmt::Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(feature = "egui")]
impl From<Rgba> for egui::Color32 {
    fn from(color: Rgba) -> Self {
        egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
    }
}

/// Marker colors, resolved first match wins:
/// search point > identity override > category > listing > default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerPalette {
    pub default_color: Rgba,
    pub listing: Rgba,
    pub sightseeing: Rgba,
    /// High-visibility color that stands out on satellite imagery
    pub search: Rgba,
    pub overrides: HashMap<String, Rgba>,
}

impl Default for MarkerPalette {
    fn default() -> Self {
        let mut overrides = HashMap::default();
        overrides.insert("listing-002".to_string(), Rgba::rgb(0x8b, 0x5c, 0xf6));

        Self {
            default_color: Rgba::rgb(0x3b, 0x82, 0xf6),
            listing: Rgba::rgb(0x10, 0xb9, 0x81),
            sightseeing: Rgba::rgb(0xf5, 0x9e, 0x0b),
            search: Rgba::rgb(0xff, 0x00, 0x66),
            overrides,
        }
    }
}

impl MarkerPalette {
    pub fn with_override(mut self, id: impl Into<String>, color: Rgba) -> Self {
        self.overrides.insert(id.into(), color);
        self
    }

    pub fn resolve(&self, entity: &MapEntity) -> Rgba {
        let catalog = match entity {
            MapEntity::Search(_) => return self.search,
            MapEntity::Catalog(catalog) => catalog,
        };

        if let Some(color) = catalog.color {
            return color;
        }
        if let Some(color) = self.overrides.get(&catalog.id) {
            return *color;
        }
        if catalog.category == Category::Sightseeing {
            return self.sightseeing;
        }
        if catalog.is_listing() {
            return self.listing;
        }
        self.default_color
    }
}
