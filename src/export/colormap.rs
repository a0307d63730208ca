//! Viridis colour ramp for node colouring

/// Viridis sampled at 0, 0.25, 0.5, 0.75, 1
const VIRIDIS: [(f64, [f64; 3]); 5] = [
    (0.00, [68.0, 1.0, 84.0]),
    (0.25, [59.0, 82.0, 139.0]),
    (0.50, [33.0, 145.0, 140.0]),
    (0.75, [94.0, 201.0, 98.0]),
    (1.00, [253.0, 231.0, 37.0]),
];

/// 8-bit RGB colour with float alpha, as GEXF `viz:color` expects
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

/// Linear normalisation of values onto [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    min: f64,
    max: f64,
}

impl ColorScale {
    /// Scale spanning the min and max of `values`
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let (min, max) = values
            .into_iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if min.is_finite() && max.is_finite() {
            Self { min, max }
        } else {
            Self { min: 0.0, max: 0.0 }
        }
    }

    /// Position of `value` in [0, 1]; a degenerate range maps to 0
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }

    pub fn color(&self, value: f64) -> Rgba {
        viridis(self.normalize(value))
    }
}

/// Viridis colour at position `t` in [0, 1]
pub fn viridis(t: f64) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    let upper = VIRIDIS
        .iter()
        .position(|(stop, _)| *stop >= t)
        .unwrap_or(VIRIDIS.len() - 1)
        .max(1);
    let (t0, c0) = VIRIDIS[upper - 1];
    let (t1, c1) = VIRIDIS[upper];
    let f = (t - t0) / (t1 - t0);

    let channel = |i: usize| (c0[i] + f * (c1[i] - c0[i])).round() as u8;
    Rgba {
        r: channel(0),
        g: channel(1),
        b: channel(2),
        a: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(viridis(0.0), Rgba { r: 68, g: 1, b: 84, a: 1.0 });
        assert_eq!(viridis(1.0), Rgba { r: 253, g: 231, b: 37, a: 1.0 });
        assert_eq!(viridis(0.5), Rgba { r: 33, g: 145, b: 140, a: 1.0 });
    }

    #[test]
    fn test_scale() {
        let scale = ColorScale::from_values([0.0, 2.0, 1.0]);
        assert_eq!(scale.normalize(1.0), 0.5);
        assert_eq!(scale.color(2.0), viridis(1.0));
    }

    #[test]
    fn test_degenerate_scale() {
        let scale = ColorScale::from_values([0.7, 0.7]);
        assert_eq!(scale.normalize(0.7), 0.0);
        let empty = ColorScale::from_values(Vec::new());
        assert_eq!(empty.normalize(3.0), 0.0);
    }
}
