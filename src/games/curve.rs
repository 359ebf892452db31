use std::time::Duration;

/// Multiplier as a function of elapsed round time: `1 + t^1.5 * 0.3`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiplierCurve {
    exponent: f64,
    rate: f64,
}

impl Default for MultiplierCurve {
    fn default() -> Self {
        Self {
            exponent: 1.5,
            rate: 0.3,
        }
    }
}

impl MultiplierCurve {
    pub fn value_at(&self, elapsed_seconds: f64) -> f64 {
        // Stray negative or NaN elapsed times pin to the start of the curve
        let t = if elapsed_seconds > 0.0 { elapsed_seconds } else { 0.0 };
        1.0 + t.powf(self.exponent) * self.rate
    }

    pub fn value_after(&self, elapsed: Duration) -> f64 {
        self.value_at(elapsed.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_one() {
        assert_eq!(MultiplierCurve::default().value_at(0.0), 1.0);
        assert_eq!(MultiplierCurve::default().value_after(Duration::ZERO), 1.0);
    }

    #[test]
    fn test_known_values() {
        let curve = MultiplierCurve::default();
        // 1^1.5 * 0.3
        assert!((curve.value_at(1.0) - 1.3).abs() < 1e-12);
        // 4^1.5 = 8
        assert!((curve.value_at(4.0) - 3.4).abs() < 1e-12);
    }

    #[test]
    fn test_non_decreasing() {
        let curve = MultiplierCurve::default();
        let mut previous = curve.value_at(0.0);
        for step in 1..5_000 {
            let current = curve.value_at(step as f64 * 0.013);
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn test_negative_elapsed_clamps() {
        assert_eq!(MultiplierCurve::default().value_at(-3.0), 1.0);
    }
}
