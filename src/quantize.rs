use crate::geometry::FULL_TURN;

/// Fraction of a full turn used for the maximum value, so the arc never closes on itself.
pub const SENTINEL_TURN_FRACTION: f64 = 0.9999;
pub const SENTINEL_ANGLE: f64 = FULL_TURN * SENTINEL_TURN_FRACTION;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantized {
    pub angle: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepEntry {
    pub angle: f64,
    pub value: f64,
    /// Query angles strictly below this classify as this step.
    pub boundary: f64,
}

/// Angle-to-value mapping for one ring.
///
/// `steps` whole steps share `angle_unit` each; a trailing remainder step is
/// `remainder_fraction` of a unit wide. The last entry always carries the
/// maximum value at [`SENTINEL_ANGLE`]. Entries are computed on demand, so a
/// fine step over a wide range costs nothing up front.
#[derive(Debug, Clone, PartialEq)]
pub struct StepTable {
    min_value: f64,
    max_value: f64,
    step: f64,
    steps: usize,
    remainder_fraction: f64,
    angle_unit: f64,
}

impl StepTable {
    /// Expects a validated range: finite bounds and span, `min_value < max_value`, `step > 0`.
    pub fn new(min_value: f64, max_value: f64, step: f64) -> Self {
        let range = max_value - min_value;
        // saturates for absurdly fine steps, which only shrinks the unit
        let steps = (range / step).floor() as usize;
        let remainder_fraction = (range % step) / step;
        let angle_unit = FULL_TURN / (steps as f64 + remainder_fraction);

        Self {
            min_value,
            max_value,
            step,
            steps,
            remainder_fraction,
            angle_unit,
        }
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn remainder_fraction(&self) -> f64 {
        self.remainder_fraction
    }

    pub fn angle_unit(&self) -> f64 {
        self.angle_unit
    }

    /// Number of entries, sentinel included.
    pub fn len(&self) -> usize {
        self.steps
            .saturating_add(usize::from(self.remainder_fraction > 0.0))
            .saturating_add(1)
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// The `k`-th entry in angle order; the last one is the sentinel.
    pub fn entry(&self, k: usize) -> Option<StepEntry> {
        let last = self.len() - 1;
        if k > last {
            return None;
        }
        if k == last {
            return Some(StepEntry {
                angle: SENTINEL_ANGLE,
                value: self.max_value,
                boundary: f64::INFINITY,
            });
        }

        let angle = k as f64 * self.angle_unit;
        // the last whole step blends into the remainder region
        let half_width = if k == self.steps {
            self.remainder_fraction * self.angle_unit / 2.0
        } else {
            self.angle_unit / 2.0
        };
        Some(StepEntry {
            angle,
            value: k as f64 * self.step + self.min_value,
            boundary: angle + half_width,
        })
    }

    pub fn entries(&self) -> impl Iterator<Item = StepEntry> + '_ {
        (0..self.len()).map_while(|k| self.entry(k))
    }

    /// Same classification as scanning the entries for the first boundary
    /// above `angle`: the nearest step is computed directly and the scan only
    /// moves past it when rounding put `angle` on its boundary.
    pub fn quantize(&self, angle: f64) -> Quantized {
        if angle.is_nan() {
            return Quantized {
                angle: 0.0,
                value: self.min_value,
            };
        }
        let nearest = (angle / self.angle_unit + 0.5).floor().max(0.0);
        let start = if nearest.is_finite() {
            (nearest as usize).min(self.len() - 1)
        } else {
            self.len() - 1
        };

        (start..self.len())
            .map_while(|k| self.entry(k))
            .find(|entry| angle < entry.boundary)
            .map(|entry| Quantized {
                angle: entry.angle,
                value: entry.value,
            })
            .unwrap_or(Quantized {
                angle: SENTINEL_ANGLE,
                value: self.max_value,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_zero_angle_is_min_value() {
        let table = StepTable::new(25.0, 725.0, 25.0);
        assert_eq!(table.quantize(0.0).value, 25.0);
        assert_eq!(table.quantize(0.0).angle, 0.0);
    }

    #[test]
    fn test_full_turn_is_max_value() {
        for (min, max, step) in [(0.0, 100.0, 25.0), (0.0, 11.0, 2.5), (5.0, 50.0, 5.0)] {
            let table = StepTable::new(min, max, step);
            let q = table.quantize(FULL_TURN - 1e-9);
            assert_eq!(q.value, max);
            assert_eq!(q.angle, SENTINEL_ANGLE);
        }
    }

    #[test]
    fn test_evenly_divisible_range() {
        let table = StepTable::new(0.0, 100.0, 25.0);
        assert_eq!(table.steps(), 4);
        assert_eq!(table.remainder_fraction(), 0.0);
        assert_abs_diff_eq!(table.angle_unit(), FULL_TURN / 4.0);

        let top = table.entries().last().unwrap();
        assert_eq!(table.len(), 5);
        assert_eq!(top.value, 100.0);
        assert_eq!(top.angle, SENTINEL_ANGLE);

        // past the last half unit the handle snaps to the sentinel, never to 2π
        let q = table.quantize(3.6 * table.angle_unit());
        assert_eq!(q, Quantized { angle: SENTINEL_ANGLE, value: 100.0 });
        assert!(table.entries().all(|e| e.angle < FULL_TURN));
        assert_eq!(table.quantize(3.4 * table.angle_unit()).value, 75.0);
    }

    #[test]
    fn test_remainder_range() {
        let table = StepTable::new(0.0, 11.0, 2.5);
        assert_eq!(table.steps(), 4);
        assert_abs_diff_eq!(table.remainder_fraction(), 0.4, epsilon = 1e-12);

        let unit = table.angle_unit();
        assert_abs_diff_eq!(unit, FULL_TURN / 4.4, epsilon = 1e-12);

        let trailing = table.entry(4).unwrap();
        assert_eq!(trailing.value, 10.0);
        assert_abs_diff_eq!(trailing.boundary, 4.0 * unit + 0.4 * unit / 2.0, epsilon = 1e-12);

        assert_eq!(table.quantize(4.0 * unit + 0.19 * unit).value, 10.0);
        assert_eq!(table.quantize(4.0 * unit + 0.21 * unit).value, 11.0);
    }

    #[test]
    fn test_step_midpoints() {
        let table = StepTable::new(0.0, 100.0, 5.0);
        let unit = table.angle_unit();
        assert_eq!(table.quantize(0.49 * unit).value, 0.0);
        assert_eq!(table.quantize(0.51 * unit).value, 5.0);
        assert_abs_diff_eq!(table.quantize(0.51 * unit).angle, unit);
        assert_eq!(table.quantize(7.2 * unit).value, 35.0);
    }

    #[test]
    fn test_quantize_is_monotonic() {
        for (min, max, step) in [(0.0, 11.0, 2.5), (25.0, 725.0, 25.0), (0.0, 1.0, 0.3)] {
            let table = StepTable::new(min, max, step);
            let mut previous = table.quantize(0.0).value;
            for i in 1..2000 {
                let value = table.quantize(i as f64 * FULL_TURN / 2000.0).value;
                assert!(value >= previous, "{value} < {previous} at sample {i}");
                previous = value;
            }
        }
    }

    #[test]
    fn test_boundaries_non_decreasing() {
        let table = StepTable::new(0.0, 11.0, 2.5);
        let entries: Vec<StepEntry> = table.entries().collect();
        assert_eq!(entries.len(), 6);
        assert!(entries.windows(2).all(|w| w[0].boundary <= w[1].boundary));
        assert_eq!(entries.last().unwrap().value, 11.0);
    }

    #[test]
    fn test_quantize_matches_entry_scan() {
        for (min, max, step) in [(0.0, 11.0, 2.5), (25.0, 725.0, 25.0), (0.0, 1.0, 0.3)] {
            let table = StepTable::new(min, max, step);
            let entries: Vec<StepEntry> = table.entries().collect();
            for i in 0..997 {
                let angle = i as f64 * FULL_TURN / 997.0;
                let scanned = entries.iter().find(|e| angle < e.boundary).unwrap();
                let q = table.quantize(angle);
                assert_eq!((q.angle, q.value), (scanned.angle, scanned.value), "at {angle}");
            }
        }
    }

    #[test]
    fn test_fine_step_over_wide_range() {
        let table = StepTable::new(0.0, 1.0, 1e-9);
        assert!(table.steps() >= 999_999_999);
        assert_eq!(table.quantize(0.0).value, 0.0);
        assert_abs_diff_eq!(table.quantize(FULL_TURN - 1e-12).value, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(table.quantize(FULL_TURN / 2.0).value, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_saturated_step_count_stays_total() {
        let table = StepTable::new(0.0, 1e300, 1e-300);
        assert_eq!(table.steps(), usize::MAX);
        assert_eq!(table.len(), usize::MAX);
        assert_eq!(table.quantize(0.0).value, 0.0);
        assert_eq!(table.quantize(FULL_TURN).value, 1e300);
    }
}
