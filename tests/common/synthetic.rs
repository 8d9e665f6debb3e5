use sudoku_scan::image::RgbImage;

/// Side length of the generated photo.
pub const PHOTO_SIDE: usize = 400;
/// Margin between the photo edge and the puzzle frame.
pub const FRAME_MARGIN: usize = 40;

/// Generates a synthetic photographed puzzle: bright paper, a dark square
/// frame, and a dark blob in the middle of each listed `(row, col)` cell.
///
/// The frame is axis-aligned so rectification is close to a crop, which
/// keeps the planted blobs inside their intended cells.
pub fn sudoku_photo(blobs: &[(usize, usize)]) -> RgbImage {
    let side = PHOTO_SIDE;
    let m = FRAME_MARGIN;
    let mut img = RgbImage::new(side, side);
    for v in &mut img.data {
        *v = 220;
    }

    // Square frame with a 6px stroke.
    let lo = m;
    let hi = side - 1 - m;
    for y in lo..=hi {
        for x in lo..=hi {
            let on_frame = y < lo + 6 || y > hi - 6 || x < lo + 6 || x > hi - 6;
            if on_frame {
                img.set_rgb(x, y, [25, 25, 25]);
            }
        }
    }

    // Digit stand-ins: mid-gray squares centred in their cells. Intensity 90
    // survives the background mask and the fill brightness cutoff.
    let span = hi - lo;
    let cell = span / 9;
    for &(row, col) in blobs {
        let cy = lo + row * cell + cell / 2;
        let cx = lo + col * cell + cell / 2;
        let r = cell / 4;
        for y in cy - r..cy + r {
            for x in cx - r..cx + r {
                img.set_rgb(x, y, [90, 90, 90]);
            }
        }
    }
    img
}

/// Photo whose only dark region is a solid plus shape: plenty of foreground,
/// but its boundary cannot be reduced to four corners.
pub fn plus_shaped_photo() -> RgbImage {
    let mut img = RgbImage::new(300, 300);
    for v in &mut img.data {
        *v = 220;
    }
    for y in 120..180 {
        for x in 50..250 {
            img.set_rgb(x, y, [25, 25, 25]);
        }
    }
    for y in 50..250 {
        for x in 120..180 {
            img.set_rgb(x, y, [25, 25, 25]);
        }
    }
    img
}

/// Uniform bright photo with no puzzle in it.
pub fn blank_photo() -> RgbImage {
    let mut img = RgbImage::new(64, 64);
    for v in &mut img.data {
        *v = 220;
    }
    img
}
