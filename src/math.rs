mod generic;

pub type V2 = generic::V2<F>;
pub type V3 = generic::V3<F>;
pub type V4 = generic::V4<F>;
pub type M4 = generic::M4<F>;
pub type F = f32;

pub const PI: F = std::f32::consts::PI;
pub const TAU: F = std::f32::consts::PI * 2.0;

impl V3 {
    pub fn zero() -> Self {
        Self::fill(0.0)
    }

    pub fn one() -> Self {
        Self::fill(1.0)
    }

    pub fn expand(self, w: F) -> V4 {
        V4::new(self.x(), self.y(), self.z(), w)
    }

    pub fn length_squared(&self) -> F {
        self.dot(*self)
    }

    pub fn length(&self) -> F {
        self.length_squared().sqrt()
    }

    pub fn distance(&self, other: Self) -> F {
        let v = *self - other;
        v.dot(v).sqrt()
    }

    pub fn near(&self, other: Self, epsilon: F) -> bool {
        let d = (*self - other).abs();
        d.x() <= epsilon && d.y() <= epsilon && d.z() <= epsilon
    }
}

impl V4 {
    pub fn contract(self) -> V3 {
        V3::new(self.x(), self.y(), self.z())
    }
}

impl M4 {
    #[cfg(test)]
    pub fn identity() -> Self {
        Self::new(
            V4::new(1.0, 0.0, 0.0, 0.0),
            V4::new(0.0, 1.0, 0.0, 0.0),
            V4::new(0.0, 0.0, 1.0, 0.0),
            V4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    pub fn translation(translate: V3) -> Self {
        M4::new(
            V4::new(1.0, 0.0, 0.0, 0.0),
            V4::new(0.0, 1.0, 0.0, 0.0),
            V4::new(0.0, 0.0, 1.0, 0.0),
            V4::new(translate.x(), translate.y(), translate.z(), 1.0),
        )
    }

    /// Right handed rotation about +Y, `angle` in radians.
    pub fn rotate_y(angle: F) -> Self {
        let (sin_y, cos_y) = angle.sin_cos();

        M4::new(
            V4::new(cos_y, 0.0, -sin_y, 0.0),
            V4::new(0.0, 1.0, 0.0, 0.0),
            V4::new(sin_y, 0.0, cos_y, 0.0),
            V4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    pub fn scale(scale: V3) -> Self {
        M4::new(
            V4::new(scale.x(), 0.0, 0.0, 0.0),
            V4::new(0.0, scale.y(), 0.0, 0.0),
            V4::new(0.0, 0.0, scale.z(), 0.0),
            V4::new(0.0, 0.0, 0.0, 1.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_y_turns_x_toward_negative_z() {
        let v = M4::rotate_y(PI / 2.0).transform_vector(V3::new(1.0, 0.0, 0.0));
        assert!(v.near(V3::new(0.0, 0.0, -1.0), 1e-6));
    }

    #[test]
    fn matrix_product_applies_right_to_left() {
        let m = M4::translation(V3::new(10.0, 0.0, 0.0)) * M4::scale(V3::fill(2.0));
        let p = m.transform_point(V3::new(1.0, 1.0, 1.0));
        assert_eq!(p, V3::new(12.0, 2.0, 2.0));
        assert_eq!(m.translation_part(), V3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn vectors_ignore_translation() {
        let m = M4::translation(V3::new(5.0, 5.0, 5.0));
        assert_eq!(m.transform_vector(V3::one()), V3::one());
        assert_eq!(M4::identity() * m, m);
    }

    #[test]
    fn distance_is_euclidean() {
        let a = V3::new(1.0, 2.0, 3.0);
        let b = V3::new(4.0, 6.0, 3.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!((b - a).length(), 5.0);
    }
}
