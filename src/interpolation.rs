use crate::math::{F, V3};

/// Linear interpolation between `p0` and `p1`.
///
/// `x` is not clamped, values outside of `[0, 1]` extrapolate along the line.
pub fn lerp(p0: V3, p1: V3, x: F) -> V3 {
    p0 * (1.0 - x) + p1 * x
}

/// Evaluates the Catmull-Rom segment running from `p1` to `p2` at `x`.
///
/// `p0` and `p3` only shape the tangents at the segment ends. `tension` scales
/// those tangents, `0.5` gives the classic Catmull-Rom curve. Neither `x` nor
/// `tension` is clamped.
pub fn catmull_rom(p0: V3, p1: V3, p2: V3, p3: V3, tension: F, x: F) -> V3 {
    let t = tension;
    let x2 = x * x;
    let x3 = x2 * x;

    let w0 = -t * x + 2.0 * t * x2 - t * x3;
    let w1 = 1.0 + (t - 3.0) * x2 + (2.0 - t) * x3;
    let w2 = t * x + (3.0 - 2.0 * t) * x2 + (t - 2.0) * x3;
    let w3 = -t * x2 + t * x3;

    p0 * w0 + p1 * w1 + p2 * w2 + p3 * w3
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CatmullRom {
    pub p0: V3,
    pub p1: V3,
    pub p2: V3,
    pub p3: V3,
    pub tension: F,
}

impl CatmullRom {
    pub fn new(p0: V3, p1: V3, p2: V3, p3: V3, tension: F) -> Self {
        Self {
            p0,
            p1,
            p2,
            p3,
            tension,
        }
    }

    pub fn eval(&self, x: F) -> V3 {
        catmull_rom(self.p0, self.p1, self.p2, self.p3, self.tension, x)
    }
}

/// Samples a Catmull-Rom curve passing through every point of `points`.
///
/// The first and last points are repeated as their own outer neighbours.
/// Each segment contributes `samples_per_segment` points (its end point is
/// left to the next segment), and the final point is always included.
pub fn sample_chain(points: &[V3], tension: F, samples_per_segment: usize) -> Vec<V3> {
    match points.len() {
        0 => return Vec::new(),
        1 => return vec![points[0]],
        _ => (),
    }

    let samples_per_segment = samples_per_segment.max(1);
    let last = points.len() - 1;
    let mut curve = Vec::with_capacity(last * samples_per_segment + 1);

    for i in 0..last {
        let segment = CatmullRom::new(
            points[i.saturating_sub(1)],
            points[i],
            points[i + 1],
            points[(i + 2).min(last)],
            tension,
        );

        for s in 0..samples_per_segment {
            curve.push(segment.eval(s as F / samples_per_segment as F));
        }
    }

    curve.push(points[last]);
    curve
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: F = 1e-5;

    fn control_points() -> [V3; 4] {
        [
            V3::new(-3.0, 1.0, 7.5),
            V3::new(0.25, -2.0, 4.0),
            V3::new(6.0, 3.5, -1.0),
            V3::new(9.0, 0.0, 2.0),
        ]
    }

    #[test]
    fn lerp_hits_both_ends() {
        let p0 = V3::new(1.5, -2.0, 3.25);
        let p1 = V3::new(-7.0, 4.0, 0.5);

        assert_eq!(lerp(p0, p1, 0.0), p0);
        assert_eq!(lerp(p0, p1, 1.0), p1);
    }

    #[test]
    fn lerp_midpoint() {
        let mid = lerp(V3::zero(), V3::new(10.0, 0.0, 0.0), 0.5);
        assert_eq!(mid, V3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn lerp_extrapolates() {
        let p = lerp(V3::zero(), V3::new(10.0, 0.0, 0.0), 1.5);
        assert_eq!(p, V3::new(15.0, 0.0, 0.0));

        let p = lerp(V3::zero(), V3::new(10.0, 0.0, 0.0), -0.5);
        assert_eq!(p, V3::new(-5.0, 0.0, 0.0));
    }

    #[test]
    fn catmull_rom_passes_through_inner_points() {
        let [p0, p1, p2, p3] = control_points();

        for &t in &[0.0, 0.1, 0.5, 1.0, 2.0, -1.0] {
            assert_eq!(catmull_rom(p0, p1, p2, p3, t, 0.0), p1);
            assert!(catmull_rom(p0, p1, p2, p3, t, 1.0).near(p2, EPSILON));
        }
    }

    #[test]
    fn catmull_rom_weights_sum_to_one() {
        // Every weight set is affine, so a constant curve stays constant.
        let c = V3::new(3.0, -4.0, 5.0);
        for i in 0..=10 {
            let x = i as F / 10.0;
            assert!(catmull_rom(c, c, c, c, 0.5, x).near(c, EPSILON));
        }
    }

    #[test]
    fn catmull_rom_on_a_line_stays_on_the_line() {
        let p = |x: F| V3::new(x, 2.0 * x, 0.0);
        let mid = catmull_rom(p(0.0), p(1.0), p(2.0), p(3.0), 0.5, 0.5);
        assert!(mid.near(p(1.5), EPSILON));
    }

    #[test]
    fn segment_matches_free_function() {
        let [p0, p1, p2, p3] = control_points();
        let segment = CatmullRom::new(p0, p1, p2, p3, 0.3);
        assert_eq!(segment.eval(0.4), catmull_rom(p0, p1, p2, p3, 0.3, 0.4));
    }

    #[test]
    fn chain_includes_every_control_point() {
        let points = [
            V3::new(0.0, 0.0, 0.0),
            V3::new(4.0, 0.0, 0.0),
            V3::new(4.0, 0.0, 4.0),
            V3::new(8.0, 0.0, 4.0),
        ];
        let curve = sample_chain(&points, 0.5, 4);

        assert_eq!(curve.len(), 3 * 4 + 1);
        for (i, point) in points.iter().enumerate() {
            assert!(curve[i * 4].near(*point, EPSILON));
        }
    }

    #[test]
    fn chain_degenerate_inputs() {
        assert!(sample_chain(&[], 0.5, 8).is_empty());

        let single = V3::new(1.0, 2.0, 3.0);
        assert_eq!(sample_chain(&[single], 0.5, 8), vec![single]);

        let pair = [V3::zero(), V3::new(2.0, 0.0, 0.0)];
        assert_eq!(sample_chain(&pair, 0.5, 0).len(), 2);
    }
}
