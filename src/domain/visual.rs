/// Age-derived visual state: threshold-gated linear curves and text distortion.

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Glyphs used to corrupt distorted text.
pub const GLITCH_CHARS: &[char] = &[
    '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '_', '+', '-', '=', '[', ']',
    '{', '}', '|', ';', ':', ',', '.', '<', '>', '?', '~', '`',
];

/// Zero up to `threshold`, then rising `rate` per tick, clamped to `max`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct AgeCurve {
    pub threshold: u32,
    pub rate: f32,
    pub max: f32,
}

impl AgeCurve {
    pub const fn new(threshold: u32, rate: f32, max: f32) -> Self {
        AgeCurve { threshold, rate, max }
    }

    pub fn value(&self, age: u32) -> f32 {
        if age <= self.threshold { return 0.0; }
        ((age - self.threshold) as f32 * self.rate).clamp(0.0, self.max)
    }
}

/// Replace non-space glyphs with glitch characters with probability `level`.
///
/// The substitution is seeded from `seed`, so the same (text, level, seed)
/// always yields the same output.
pub fn distort(text: &str, level: f32, seed: u64) -> String {
    if level <= 0.0 { return text.to_string(); }
    let mut rng = StdRng::seed_from_u64(seed);
    text.chars()
        .map(|c| {
            let roll: f32 = rng.gen();
            if c != ' ' && roll < level {
                GLITCH_CHARS[rng.gen_range(0..GLITCH_CHARS.len())]
            } else {
                c
            }
        })
        .collect()
}
