/// Catch rules: when an alive entity counts as caught.

/// Axis-aligned tolerance box around a cursor.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Tolerance {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum CatchRule {
    /// Within the tolerance box of a cursor.
    Proximity { cx: f32, cy: f32, tolerance: Tolerance },
    /// Within `band` rows of a fixed zone row. Only evaluated on a tick
    /// where a catch attempt was issued.
    Zone { row: f32, band: f32 },
}

impl CatchRule {
    pub fn hits(&self, x: f32, y: f32) -> bool {
        match *self {
            CatchRule::Proximity { cx, cy, tolerance } => {
                (x - cx).abs() <= tolerance.x && (y - cy).abs() <= tolerance.y
            }
            CatchRule::Zone { row, band } => (y - row).abs() <= band,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(cx: f32, cy: f32) -> CatchRule {
        CatchRule::Proximity { cx, cy, tolerance: Tolerance { x: 2.0, y: 1.5 } }
    }

    #[test]
    fn proximity_box() {
        let rule = cursor(5.0, 10.0);
        assert!(rule.hits(6.0, 11.0));
        assert!(!rule.hits(8.0, 11.0));
        // Edges are inclusive
        assert!(rule.hits(7.0, 11.5));
        assert!(rule.hits(3.0, 8.5));
    }

    #[test]
    fn proximity_is_a_box_not_a_circle() {
        // Corner of the box: distance sqrt(2² + 1.5²) = 2.5 > 2.0, still a hit
        assert!(cursor(0.0, 0.0).hits(2.0, 1.5));
        assert!(!cursor(0.0, 0.0).hits(0.0, 1.6));
    }

    #[test]
    fn zone_band() {
        let rule = CatchRule::Zone { row: 12.0, band: 1.0 };
        assert!(rule.hits(40.0, 11.0));
        assert!(rule.hits(0.0, 12.7));
        assert!(rule.hits(0.0, 13.0));
        assert!(!rule.hits(0.0, 13.01));
        assert!(!rule.hits(0.0, 10.9));
    }
}
