use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use tsify::Tsify;

/// An opaque sRGB colour.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Tsify)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };
    pub const BLUE: Rgb = Rgb { r: 0, g: 122, b: 255 };
    pub const INDIGO: Rgb = Rgb { r: 88, g: 86, b: 214 };
    pub const ORANGE: Rgb = Rgb { r: 255, g: 149, b: 0 };

    /// Per-channel step used by [`Rgb::lighter`], as a fraction of full scale.
    pub const LIGHTER_DELTA: f64 = 0.1;

    /// Nodes are coloured by the low 24 bits of their node number, read as
    /// `0xRRGGBB`.
    pub fn from_node_num(num: u32) -> Rgb {
        Rgb {
            r: ((num >> 16) & 0xff) as u8,
            g: ((num >> 8) & 0xff) as u8,
            b: (num & 0xff) as u8,
        }
    }

    pub fn lighter(&self) -> Rgb {
        let step = (Self::LIGHTER_DELTA * 255.).round() as u8;
        Rgb {
            r: self.r.saturating_add(step),
            g: self.g.saturating_add(step),
            b: self.b.saturating_add(step),
        }
    }

    /// Perceived brightness in `[0, 255]`.
    pub fn brightness(&self) -> f64 {
        (299. * self.r as f64 + 587. * self.g as f64 + 114. * self.b as f64) / 1000.
    }

    pub fn is_light(&self) -> bool {
        self.brightness() > 127.5
    }

    /// Black on light colours, white on dark ones.
    pub fn contrast(&self) -> Rgb {
        if self.is_light() { Rgb::BLACK } else { Rgb::WHITE }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
