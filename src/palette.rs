// The fixed pen colors the two-finger gesture cycles through.

use crate::types::pack_rgb;

/// One pen color and the name shown on the HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PenColor {
    pub rgb: u32, // 0x00RRGGBB
    pub name: &'static str,
}

/// Ordered list of pen colors. Only built through `Default`, so never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<PenColor>,
}

impl Palette {
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Color at `index`, wrapping around the end of the palette.
    pub fn get(&self, index: usize) -> PenColor {
        self.colors[index % self.len()]
    }

    /// Index that follows `index`, wrapping to 0 after the last color.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.len()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: vec![
                PenColor { rgb: pack_rgb(255, 0, 0), name: "Red" },
                PenColor { rgb: pack_rgb(0, 255, 0), name: "Green" },
                PenColor { rgb: pack_rgb(0, 0, 255), name: "Blue" },
                PenColor { rgb: pack_rgb(255, 255, 0), name: "Yellow" },
                PenColor { rgb: pack_rgb(0, 255, 255), name: "Cyan" },
            ],
        }
    }
}
