/// Named continuous color scales
///
/// Names follow plotly's built-in scales so the browser view can pass them
/// through unchanged; the stop tables below let the native renderers sample
/// the same scales.
use serde::{Deserialize, Serialize};

use crate::error::VoxelizeError;

macro_rules! color_schemes {
    ($($variant:ident => $name:literal : [$($stop:literal),+ $(,)?]),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum ColorScheme {
            $($variant),+
        }

        impl ColorScheme {
            pub const ALL: &'static [ColorScheme] = &[$(ColorScheme::$variant),+];

            pub fn name(self) -> &'static str {
                match self {
                    $(ColorScheme::$variant => $name),+
                }
            }

            fn stops(self) -> &'static [u32] {
                match self {
                    $(ColorScheme::$variant => &[$($stop),+]),+
                }
            }
        }
    };
}

color_schemes! {
    Viridis => "Viridis": [0x440154, 0x482878, 0x3e4989, 0x31688e, 0x26828e, 0x1f9e89, 0x35b779, 0x6ece58, 0xb5de2b, 0xfde725],
    Plasma => "Plasma": [0x0d0887, 0x46039f, 0x7201a8, 0x9c179e, 0xbd3786, 0xd8576b, 0xed7953, 0xfb9f3a, 0xfdca26, 0xf0f921],
    Inferno => "Inferno": [0x000004, 0x1b0c41, 0x4a0c6b, 0x781c6d, 0xa52c60, 0xcf4446, 0xed6925, 0xfb9b06, 0xf7d13d, 0xfcffa4],
    Magma => "Magma": [0x000004, 0x180f3d, 0x440f76, 0x721f81, 0x9e2f7f, 0xcd4071, 0xf1605d, 0xfd9668, 0xfeca8d, 0xfcfdbf],
    Cividis => "Cividis": [0x00224e, 0x123570, 0x3b496c, 0x575d6d, 0x707173, 0x8a8678, 0xa59c74, 0xc3b369, 0xe1cc55, 0xfee838],
    Turbo => "Turbo": [0x30123b, 0x4145ab, 0x4675ed, 0x39a2fc, 0x1bcfd4, 0x24eca6, 0x61fc6c, 0xa4fc3b, 0xd1e834, 0xf3c63a, 0xfe9b2d, 0xf36315, 0xd93806, 0xb11901, 0x7a0402],
    Rainbow => "Rainbow": [0x96005a, 0x0000c8, 0x0019ff, 0x0098ff, 0x2cff96, 0x97ff00, 0xffea00, 0xff6f00, 0xff0000],
    Jet => "Jet": [0x000083, 0x003caa, 0x05ffff, 0xffff00, 0xfa0000, 0x800000],
    Hot => "Hot": [0x000000, 0xe60000, 0xffd200, 0xffffff],
    Cool => "Cool": [0x00ffff, 0xff00ff],
    Spring => "Spring": [0xff00ff, 0xffff00],
    Summer => "Summer": [0x008066, 0xffff66],
    Autumn => "Autumn": [0xff0000, 0xffff00],
    Winter => "Winter": [0x0000ff, 0x00ff80],
    Spectral => "Spectral": [0x9e0142, 0xd53e4f, 0xf46d43, 0xfdae61, 0xfee08b, 0xffffbf, 0xe6f598, 0xabdda4, 0x66c2a5, 0x3288bd, 0x5e4fa2],
    RdYlBu => "RdYlBu": [0xa50026, 0xd73027, 0xf46d43, 0xfdae61, 0xfee090, 0xffffbf, 0xe0f3f8, 0xabd9e9, 0x74add1, 0x4575b4, 0x313695],
    RdBu => "RdBu": [0x67001f, 0xb2182b, 0xd6604d, 0xf4a582, 0xfddbc7, 0xf7f7f7, 0xd1e5f0, 0x92c5de, 0x4393c3, 0x2166ac, 0x053061],
    PiYG => "PiYG": [0x8e0152, 0xc51b7d, 0xde77ae, 0xf1b6da, 0xfde0ef, 0xf7f7f7, 0xe6f5d0, 0xb8e186, 0x7fbc41, 0x4d9221, 0x276419],
    BrBG => "BrBG": [0x543005, 0x8c510a, 0xbf812d, 0xdfc27d, 0xf6e8c3, 0xf5f5f5, 0xc7eae5, 0x80cdc1, 0x35978f, 0x01665e, 0x003c30],
    RdGy => "RdGy": [0x67001f, 0xb2182b, 0xd6604d, 0xf4a582, 0xfddbc7, 0xffffff, 0xe0e0e0, 0xbababa, 0x878787, 0x4d4d4d, 0x1a1a1a],
    PuOr => "PuOr": [0x7f3b08, 0xb35806, 0xe08214, 0xfdb863, 0xfee0b6, 0xf7f7f7, 0xd8daeb, 0xb2abd2, 0x8073ac, 0x542788, 0x2d004b],
    Sunset => "Sunset": [0xf3e79b, 0xfac484, 0xf8a07e, 0xeb7f86, 0xce6693, 0xa059a0, 0x5c53a5],
    Sunsetdark => "Sunsetdark": [0xfcde9c, 0xfaa476, 0xf0746e, 0xe34f6f, 0xdc3977, 0xb9257a, 0x7c1d6f],
    Oryel => "Oryel": [0xecda9a, 0xefc47e, 0xf3ad6a, 0xf7945d, 0xf97b57, 0xf66356, 0xee4d5a],
    Peach => "Peach": [0xfde0c5, 0xfacba6, 0xf8b58b, 0xf59e72, 0xf2855d, 0xef6a4c, 0xeb4a40],
    Pinkyl => "Pinkyl": [0xfef6b5, 0xffdd9a, 0xffc285, 0xffa679, 0xfa8a76, 0xf16d7a, 0xe15383],
    Mint => "Mint": [0xe4f1e1, 0xb4d9cc, 0x89c0b6, 0x63a6a0, 0x448c8a, 0x287274, 0x0d585f],
    BluGrn => "BluGrn": [0xc4e6c3, 0x96d2a4, 0x6dbc90, 0x4da284, 0x36877a, 0x266b6e, 0x1d4f60],
    Darkmint => "Darkmint": [0xd2fbd4, 0xa5dbc2, 0x7bbcb0, 0x559c9e, 0x3a7c89, 0x235d72, 0x123f5a],
    Electric => "Electric": [0x000000, 0x1e0064, 0x780064, 0xa05a00, 0xe6c800, 0xfffadc],
    Plotly3 => "Plotly3": [0x0508b8, 0x1910d8, 0x3c19f0, 0x6b1cfb, 0x981cfd, 0xbf1cfd, 0xdd2bfd, 0xf246fe, 0xfc67fd, 0xfea5fd, 0xfebefe, 0xfec3fe],
    Deep => "Deep": [0xfdfecc, 0xb2e8a2, 0x6acfa1, 0x4db2a1, 0x3b93a1, 0x32759c, 0x3e568f, 0x3e3a6a, 0x281a2c],
    Dense => "Dense": [0xe6f1f1, 0xbbd7e3, 0x95bae1, 0x7f9be1, 0x7879d6, 0x7356b9, 0x693793, 0x561c65, 0x360e24],
    Haline => "Haline": [0x2a186c, 0x0e3d9d, 0x0f5f8e, 0x227984, 0x32937b, 0x46ad6c, 0x72c456, 0xb4d65b, 0xfdef9a],
    Ice => "Ice": [0x040613, 0x1d1d3e, 0x2f3677, 0x3b52a0, 0x4271b4, 0x5490c0, 0x70acc9, 0x9bc8d6, 0xd0e5ea, 0xeafdfd],
    Thermal => "Thermal": [0x032333, 0x0f3a76, 0x3c3ba7, 0x6a48a8, 0x964f9f, 0xc5548c, 0xea6766, 0xfb8d48, 0xf8be41, 0xe8fa5b],
}

impl ColorScheme {
    /// Sample the scale at `t` in [0, 1]; values outside are clamped
    pub fn sample(self, t: f64) -> [u8; 3] {
        let stops = self.stops();
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let scaled = t * (stops.len() - 1) as f64;
        let lo = (scaled.floor() as usize).min(stops.len() - 1);
        let hi = (lo + 1).min(stops.len() - 1);
        let frac = scaled - lo as f64;

        let (a, b) = (rgb(stops[lo]), rgb(stops[hi]));
        [0, 1, 2].map(|c| (a[c] as f64 + (b[c] as f64 - a[c] as f64) * frac).round() as u8)
    }
}

fn rgb(hex: u32) -> [u8; 3] {
    [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8]
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme::Viridis
    }
}

impl std::fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ColorScheme {
    type Err = VoxelizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorScheme::ALL
            .iter()
            .copied()
            .find(|scheme| scheme.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| VoxelizeError::InvalidParameter {
                name: "color scheme",
                reason: format!("unknown scheme '{}'", s),
            })
    }
}

/// Map values linearly onto [0, 1] using their own min and max
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let span = max - min;
    values
        .iter()
        .map(|&v| if span > 0.0 { (v - min) / span } else { 0.5 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_schemes_listed() {
        assert_eq!(ColorScheme::ALL.len(), 36);
        assert_eq!(ColorScheme::ALL[0], ColorScheme::default());
        assert_eq!(ColorScheme::ALL[35].name(), "Thermal");
    }

    #[test]
    fn test_sample_endpoints() {
        assert_eq!(ColorScheme::Viridis.sample(0.0), [0x44, 0x01, 0x54]);
        assert_eq!(ColorScheme::Viridis.sample(1.0), [0xfd, 0xe7, 0x25]);
        assert_eq!(ColorScheme::Hot.sample(2.0), [0xff, 0xff, 0xff]);
        assert_eq!(ColorScheme::Cool.sample(0.5), [0x80, 0x80, 0xff]);
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("rdylbu".parse::<ColorScheme>().unwrap(), ColorScheme::RdYlBu);
        assert!("Sepia".parse::<ColorScheme>().is_err());
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(&[2.0, 4.0, 3.0]), vec![0.0, 1.0, 0.5]);
        assert_eq!(normalize(&[7.0, 7.0]), vec![0.5, 0.5]);
    }
}
