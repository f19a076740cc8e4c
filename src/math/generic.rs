#![allow(dead_code)]

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use super::F;

impl V3<F> {
    pub fn dot(&self, other: Self) -> F {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn abs(&self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }
}

impl<T: Mul<Output = T> + Add<Output = T> + Copy> V4<T> {
    fn dot(&self, other: Self) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }
}

/// Column-major 4x4 matrix.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct M4<T> {
    pub c0: V4<T>,
    pub c1: V4<T>,
    pub c2: V4<T>,
    pub c3: V4<T>,
}

impl<T> M4<T> {
    pub const fn new(c0: V4<T>, c1: V4<T>, c2: V4<T>, c3: V4<T>) -> Self {
        M4 { c0, c1, c2, c3 }
    }
}

impl<T: Copy> M4<T> {
    pub fn transpose(self) -> M4<T> {
        M4 {
            c0: V4::new(self.c0.x, self.c1.x, self.c2.x, self.c3.x),
            c1: V4::new(self.c0.y, self.c1.y, self.c2.y, self.c3.y),
            c2: V4::new(self.c0.z, self.c1.z, self.c2.z, self.c3.z),
            c3: V4::new(self.c0.w, self.c1.w, self.c2.w, self.c3.w),
        }
    }
}

impl M4<F> {
    fn transform(self, rhs: V3<F>, w: F) -> V3<F> {
        let v = self * V4::new(rhs.x, rhs.y, rhs.z, w);
        V3::new(v.x, v.y, v.z)
    }

    pub fn transform_vector(self, rhs: V3<F>) -> V3<F> {
        self.transform(rhs, 0.0)
    }

    pub fn transform_point(self, rhs: V3<F>) -> V3<F> {
        self.transform(rhs, 1.0)
    }

    pub fn translation_part(self) -> V3<F> {
        V3::new(self.c3.x, self.c3.y, self.c3.z)
    }
}

impl Mul for M4<F> {
    type Output = M4<F>;

    fn mul(self, rhs: M4<F>) -> Self::Output {
        let rows = self.transpose();
        let column = |c: V4<F>| {
            V4::new(
                rows.c0.dot(c),
                rows.c1.dot(c),
                rows.c2.dot(c),
                rows.c3.dot(c),
            )
        };

        M4::new(column(rhs.c0), column(rhs.c1), column(rhs.c2), column(rhs.c3))
    }
}

impl Mul<V4<F>> for M4<F> {
    type Output = V4<F>;

    fn mul(self, rhs: V4<F>) -> Self::Output {
        (self.c0 * rhs.x) + (self.c1 * rhs.y) + (self.c2 * rhs.z) + (self.c3 * rhs.w)
    }
}

macro_rules! implement_vector{
    (operator, $name:ident, $op:ident, $func:ident, $op_assign:ident, $func_assign:ident, $($field:ident),*) => {
        impl<T: $op<Output = T>> $op for $name<T> {
            type Output = Self;

            #[inline(always)]
            fn $func(self, other: Self) -> Self::Output {
                $name {
                    $($field: self.$field.$func(other.$field),)*
                }
            }
        }

        impl<T: $op<Output = T> + Clone> $op<T> for $name<T> {
            type Output = Self;

            #[inline(always)]
            fn $func(self, other: T) -> Self::Output {
                $name {
                    $($field: self.$field.$func(other.clone()),)*
                }
            }
        }

        impl $op<$name<f32>> for f32 {
            type Output = $name<f32>;

            #[inline(always)]
            fn $func(self, other: $name<f32>) -> Self::Output {
                $name {
                    $($field: self.$func(other.$field),)*
                }
            }
        }

        impl<T: $op<Output = T> + Clone> $op_assign for $name<T> {
            #[inline(always)]
            fn $func_assign(&mut self, other: Self) {
                *self = $name {
                    $($field: self.$field.clone().$func(other.$field),)*
                }
            }
        }

        impl<T: $op<Output = T> + Clone> $op_assign<T> for $name<T> {
            #[inline(always)]
            fn $func_assign(&mut self, other: T) {
                *self = $name {
                    $($field: self.$field.clone().$func(other.clone()),)*
                }
            }
        }

    };
    ($name:ident, $($field:ident),*) => {
        #[repr(C)]
        #[derive(Debug, Copy, Clone, PartialEq)]
        pub struct $name<T> {
            $($field: T,)*
        }

        impl<T: Clone> $name<T> {
            pub fn fill(v: T) -> Self {
                $name {
                    $($field: v.clone(),)*
                }
            }

            $(
                #[inline(always)]
                pub fn $field(&self) -> T {
                    self.$field.clone()
                }
            )*
        }

        impl<T> $name<T> {
            pub const fn new($($field: T,)*) -> Self {
                $name {
                    $($field,)*
                }
            }
        }

        impl<T: Neg<Output = T>> Neg for $name<T> {
            type Output = Self;

            fn neg(self) -> Self::Output {
                $name {
                    $($field: self.$field.neg(),)*
                }
            }
        }


        implement_vector!(operator, $name, Add, add, AddAssign, add_assign, $($field),*);
        implement_vector!(operator, $name, Sub, sub, SubAssign, sub_assign, $($field),*);
        implement_vector!(operator, $name, Mul, mul, MulAssign, mul_assign, $($field),*);
        implement_vector!(operator, $name, Div, div, DivAssign, div_assign, $($field),*);
    }
}

implement_vector!(V2, x, y);
implement_vector!(V3, x, y, z);
implement_vector!(V4, x, y, z, w);
