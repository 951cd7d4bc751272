use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of colors in every palette
pub const PALETTE_SIZE: usize = 5;

/// An opaque 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed 0xRRGGBB value
    pub const fn from_u32(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }

    /// `#RRGGBB` form
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Perceived brightness in 0-255
    pub fn luminance(&self) -> f32 {
        0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Named color schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Palette {
    #[default]
    Cosmic,
    Ocean,
    Sunset,
    Forest,
    Fire,
    Neon,
    Monochrome,
    Pastel,
}

const COSMIC: [Rgb; PALETTE_SIZE] = [
    Rgb::from_u32(0xFF006E),
    Rgb::from_u32(0xFB5607),
    Rgb::from_u32(0xFFBE0B),
    Rgb::from_u32(0x8338EC),
    Rgb::from_u32(0x3A86FF),
];
const OCEAN: [Rgb; PALETTE_SIZE] = [
    Rgb::from_u32(0x03045E),
    Rgb::from_u32(0x0077B6),
    Rgb::from_u32(0x00B4D8),
    Rgb::from_u32(0x90E0EF),
    Rgb::from_u32(0xCAF0F8),
];
const SUNSET: [Rgb; PALETTE_SIZE] = [
    Rgb::from_u32(0xFF5400),
    Rgb::from_u32(0xFF6D00),
    Rgb::from_u32(0xFF8500),
    Rgb::from_u32(0xFFAA00),
    Rgb::from_u32(0xFFDD00),
];
const FOREST: [Rgb; PALETTE_SIZE] = [
    Rgb::from_u32(0x2D6A4F),
    Rgb::from_u32(0x40916C),
    Rgb::from_u32(0x52B788),
    Rgb::from_u32(0x74C69D),
    Rgb::from_u32(0x95D5B2),
];
const FIRE: [Rgb; PALETTE_SIZE] = [
    Rgb::from_u32(0x370617),
    Rgb::from_u32(0x6A040F),
    Rgb::from_u32(0x9D0208),
    Rgb::from_u32(0xD00000),
    Rgb::from_u32(0xDC2F02),
];
const NEON: [Rgb; PALETTE_SIZE] = [
    Rgb::from_u32(0xFF006E),
    Rgb::from_u32(0x00F5FF),
    Rgb::from_u32(0xFFFF00),
    Rgb::from_u32(0xFF00FF),
    Rgb::from_u32(0x00FF00),
];
const MONOCHROME: [Rgb; PALETTE_SIZE] = [
    Rgb::from_u32(0x000000),
    Rgb::from_u32(0x333333),
    Rgb::from_u32(0x666666),
    Rgb::from_u32(0x999999),
    Rgb::from_u32(0xCCCCCC),
];
const PASTEL: [Rgb; PALETTE_SIZE] = [
    Rgb::from_u32(0xFFB5E8),
    Rgb::from_u32(0xB5DEFF),
    Rgb::from_u32(0xC5FFC5),
    Rgb::from_u32(0xFFF4B5),
    Rgb::from_u32(0xFFCCE6),
];

impl Palette {
    pub const ALL: [Palette; 8] = [
        Palette::Cosmic,
        Palette::Ocean,
        Palette::Sunset,
        Palette::Forest,
        Palette::Fire,
        Palette::Neon,
        Palette::Monochrome,
        Palette::Pastel,
    ];

    /// Case-insensitive lookup; anything unrecognized falls back to Cosmic.
    pub fn resolve(name: &str) -> Palette {
        let key = name.to_lowercase();
        match Palette::ALL.into_iter().find(|p| p.name() == key) {
            Some(palette) => palette,
            None => {
                if !key.is_empty() {
                    tracing::debug!(scheme = %key, "unknown palette, using cosmic");
                }
                Palette::Cosmic
            }
        }
    }

    pub fn colors(&self) -> &'static [Rgb; PALETTE_SIZE] {
        match self {
            Palette::Cosmic => &COSMIC,
            Palette::Ocean => &OCEAN,
            Palette::Sunset => &SUNSET,
            Palette::Forest => &FOREST,
            Palette::Fire => &FIRE,
            Palette::Neon => &NEON,
            Palette::Monochrome => &MONOCHROME,
            Palette::Pastel => &PASTEL,
        }
    }

    /// Color at `index`, wrapping past the end
    pub fn color(&self, index: usize) -> Rgb {
        self.colors()[index % PALETTE_SIZE]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Palette::Cosmic => "cosmic",
            Palette::Ocean => "ocean",
            Palette::Sunset => "sunset",
            Palette::Forest => "forest",
            Palette::Fire => "fire",
            Palette::Neon => "neon",
            Palette::Monochrome => "monochrome",
            Palette::Pastel => "pastel",
        }
    }

    pub fn next(&self) -> Palette {
        match self {
            Palette::Cosmic => Palette::Ocean,
            Palette::Ocean => Palette::Sunset,
            Palette::Sunset => Palette::Forest,
            Palette::Forest => Palette::Fire,
            Palette::Fire => Palette::Neon,
            Palette::Neon => Palette::Monochrome,
            Palette::Monochrome => Palette::Pastel,
            Palette::Pastel => Palette::Cosmic,
        }
    }

    pub fn prev(&self) -> Palette {
        match self {
            Palette::Cosmic => Palette::Pastel,
            Palette::Ocean => Palette::Cosmic,
            Palette::Sunset => Palette::Ocean,
            Palette::Forest => Palette::Sunset,
            Palette::Fire => Palette::Forest,
            Palette::Neon => Palette::Fire,
            Palette::Monochrome => Palette::Neon,
            Palette::Pastel => Palette::Monochrome,
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stored names go through the same lookup as user input
impl From<String> for Palette {
    fn from(name: String) -> Self {
        Palette::resolve(&name)
    }
}
