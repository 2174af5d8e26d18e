//! Basin color palette.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const GOLDEN_RATIO_CONJUGATE: f32 = 0.618_034;

/// Hues of the fixed marker colors: contested red and coast green.
const MARKER_HUES: [f32; 2] = [0.0, 1.0 / 3.0];

/// Minimum hue distance between a basin color and any marker color.
const MARKER_HUE_CLEARANCE: f32 = 0.06;

/// Circular distance between two hues in [0, 1).
fn hue_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).abs() % 1.0;
    d.min(1.0 - d)
}

fn clear_of_markers(hue: f32) -> bool {
    MARKER_HUES.iter().all(|&m| hue_distance(hue, m) >= MARKER_HUE_CLEARANCE)
}

/// Generates one distinct RGB color per basin.
///
/// Hues advance by the golden ratio so neighboring basin ids land far apart
/// on the color wheel. Hues too close to the coast or contested markers are
/// skipped. The same `(count, seed)` always yields the same palette.
pub fn generate_basin_colors(count: usize, seed: u64) -> Vec<[u8; 3]> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut hue = rng.random::<f32>();

    (0..count)
        .map(|_| {
            // The golden-ratio rotation is equidistributed, so this always exits.
            loop {
                hue = (hue + GOLDEN_RATIO_CONJUGATE) % 1.0;
                if clear_of_markers(hue) {
                    break;
                }
            }
            // Saturation and value stay off the extremes so no basin reads as
            // black ocean or grey unreached land.
            let saturation = 0.45 + rng.random::<f32>() * 0.35;
            let value = 0.55 + rng.random::<f32>() * 0.35;
            hsv_to_rgb(hue, saturation, value)
        })
        .collect()
}

/// Converts HSV (all components in [0, 1]) to RGB.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [u8; 3] {
    let sector = (h.rem_euclid(1.0)) * 6.0;
    let chroma = v * s;
    let x = chroma * (1.0 - ((sector % 2.0) - 1.0).abs());
    let m = v - chroma;

    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    let channel = |c: f32| ((c + m) * 255.0) as u8;
    [channel(r), channel(g), channel(b)]
}
