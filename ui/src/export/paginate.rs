//! Slicing one tall snapshot across fixed-size pages.

/// Rounding noise below this (in millimetres) never opens another page.
const PAGE_TOLERANCE_MM: f64 = 0.01;

/// Page geometry in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// ISO A4, portrait.
    pub const A4_PORTRAIT: PageSize = PageSize {
        width: 210.0,
        height: 297.0,
    };
}

/// Where the snapshot goes on one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub page: usize,
    /// Vertical offset of the image's top edge; negative once earlier pages consumed it.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Scale a `pixel_width` x `pixel_height` image to the page width and lay it out over as many
/// pages as its proportional height needs. Page `n` shows the image shifted up by `n` page
/// heights.
pub fn paginate(pixel_width: u32, pixel_height: u32, page: PageSize) -> Vec<Placement> {
    if pixel_width == 0 || pixel_height == 0 || page.height <= 0.0 {
        return Vec::new();
    }

    let width = page.width;
    let height = f64::from(pixel_height) * width / f64::from(pixel_width);

    let mut placements = vec![Placement {
        page: 0,
        y: 0.0,
        width,
        height,
    }];

    let mut consumed = page.height;
    while height - consumed > PAGE_TOLERANCE_MM {
        placements.push(Placement {
            page: placements.len(),
            y: -consumed,
            width,
            height,
        });
        consumed += page.height;
    }

    placements
}
