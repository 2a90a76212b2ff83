//! Color palettes and colormaps
//!
//! Categorical palettes feed the round-robin line colors; sequential and
//! diverging palettes are the colormaps of 2D figures. Colormap names ending
//! in `_r` resolve to the reversed map.

use crate::{Result, SciplotError};

// =============================================================================
// Categorical Color Palettes
// =============================================================================

/// D3 Category 10, the default line colors
pub const CATEGORY10: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
    "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

/// Tableau 10
pub const TABLEAU10: &[&str] = &[
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f",
    "#edc948", "#b07aa1", "#ff9da7", "#9c755f", "#bab0ac",
];

/// ColorBrewer Dark2
pub const DARK2: &[&str] = &[
    "#1b9e77", "#d95f02", "#7570b3", "#e7298a", "#66a61e",
    "#e6ab02", "#a6761d", "#666666",
];

// =============================================================================
// Sequential Colormaps
// =============================================================================

pub const VIRIDIS: &[&str] = &[
    "#440154", "#482878", "#3e4a89", "#31688e", "#26828e",
    "#1f9e89", "#35b779", "#6ece58", "#b5de2b", "#fde725",
];

pub const PLASMA: &[&str] = &[
    "#0d0887", "#46039f", "#7201a8", "#9c179e", "#bd3786",
    "#d8576b", "#ed7953", "#fb9f3a", "#fdca26", "#f0f921",
];

pub const MAGMA: &[&str] = &[
    "#000004", "#180f3d", "#440f76", "#721f81", "#9e2f7f",
    "#cd4071", "#f1605d", "#fd9668", "#feca8d", "#fcfdbf",
];

pub const INFERNO: &[&str] = &[
    "#000004", "#1b0c41", "#4a0c6b", "#781c6d", "#a52c60",
    "#cf4446", "#ed6925", "#fb9b06", "#f7d13d", "#fcffa4",
];

pub const CIVIDIS: &[&str] = &[
    "#00224e", "#123570", "#3b496c", "#575d6d", "#707173",
    "#8a8678", "#a59c74", "#c3b369", "#e1cc55", "#fdea45",
];

pub const GREYS: &[&str] = &[
    "#ffffff", "#f0f0f0", "#d9d9d9", "#bdbdbd", "#969696",
    "#737373", "#525252", "#252525", "#000000",
];

pub const BLUES: &[&str] = &[
    "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6",
    "#4292c6", "#2171b5", "#08519c", "#08306b",
];

pub const HOT: &[&str] = &[
    "#0b0000", "#4d0000", "#900000", "#d20000", "#ff1700",
    "#ff5a00", "#ff9c00", "#ffdf00", "#ffff3b", "#ffffff",
];

// =============================================================================
// Diverging Colormaps
// =============================================================================

pub const RDBU: &[&str] = &[
    "#67001f", "#b2182b", "#d6604d", "#f4a582", "#fddbc7",
    "#f7f7f7", "#d1e5f0", "#92c5de", "#4393c3", "#2166ac", "#053061",
];

pub const COOLWARM: &[&str] = &[
    "#3b4cc0", "#5977e3", "#7b9ff9", "#9ebeff", "#c0d4f5",
    "#dddcdc", "#f2cbb7", "#f7ac8e", "#ee8468", "#d65244", "#b40426",
];

pub const SPECTRAL: &[&str] = &[
    "#9e0142", "#d53e4f", "#f46d43", "#fdae61", "#fee08b",
    "#ffffbf", "#e6f598", "#abdda4", "#66c2a5", "#3288bd", "#5e4fa2",
];

/// Gray used for masked points
pub const MASK_COLOR: &str = "#7f7f7f";

// =============================================================================
// Color Utilities
// =============================================================================

/// Convert any CSS color (name, hex, rgb(), hsl()) to `#rrggbb`.
pub fn color_to_hex(value: &str) -> Result<String> {
    csscolorparser::parse(value)
        .map(|c| c.to_css_hex())
        .map_err(|e| SciplotError::StyleError(format!("Invalid color '{}': {}", value, e)))
}

// =============================================================================
// Lookup Functions
// =============================================================================

/// Look up the stops of a named colormap; `_r` reverses it.
pub fn get_colormap(name: &str) -> Option<Vec<&'static str>> {
    let lower = name.to_lowercase();
    let (base, reversed) = match lower.strip_suffix("_r") {
        Some(base) => (base, true),
        None => (lower.as_str(), false),
    };
    let stops: &'static [&'static str] = match base {
        "viridis" => VIRIDIS,
        "plasma" => PLASMA,
        "magma" => MAGMA,
        "inferno" => INFERNO,
        "cividis" => CIVIDIS,
        "greys" | "gray" | "grey" => GREYS,
        "blues" => BLUES,
        "hot" => HOT,
        "rdbu" => RDBU,
        "coolwarm" => COOLWARM,
        "spectral" => SPECTRAL,
        _ => return None,
    };
    let mut stops = stops.to_vec();
    if reversed {
        stops.reverse();
    }
    Some(stops)
}

/// Look up a categorical palette by name
pub fn get_color_palette(name: &str) -> Option<&'static [&'static str]> {
    match name.to_lowercase().as_str() {
        "category10" | "tab10" => Some(CATEGORY10),
        "tableau10" | "tableau" => Some(TABLEAU10),
        "dark2" => Some(DARK2),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_colormap() {
        assert_eq!(get_colormap("viridis").unwrap()[0], "#440154");
        assert!(get_colormap("VIRIDIS").is_some());
        assert!(get_colormap("unknown").is_none());
    }

    #[test]
    fn test_get_colormap_reversed() {
        let reversed = get_colormap("viridis_r").unwrap();
        assert_eq!(reversed[0], "#fde725");
        assert_eq!(reversed[reversed.len() - 1], "#440154");
    }

    #[test]
    fn test_get_color_palette() {
        assert_eq!(get_color_palette("tab10"), Some(CATEGORY10));
        assert!(get_color_palette("nope").is_none());
    }

    #[test]
    fn test_color_to_hex() {
        assert_eq!(color_to_hex("red").unwrap(), "#ff0000");
        assert_eq!(color_to_hex("#F00").unwrap(), "#ff0000");
        assert!(color_to_hex("notacolor").is_err());
        assert!(color_to_hex("").is_err());
    }
}
