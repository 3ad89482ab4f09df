use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign,
};

use crate::dual::{check_widths, Dual};
use crate::float::Float;

// ──────────────────────────────────────────────
//  Dual<F> ∘ Dual<F>, owned operands
//
//  The owned impls are the core: they reuse the lhs tangent allocation.
//  Reference variants below forward here via clone, since the runtime-width
//  dual is Clone but not Copy.
// ──────────────────────────────────────────────

impl<F: Float> Add for Dual<F> {
    type Output = Self;
    #[inline]
    fn add(mut self, rhs: Self) -> Self {
        check_widths(&self.eps, &rhs.eps);
        self.re = self.re + rhs.re;
        for (e, &re) in self.eps.iter_mut().zip(rhs.eps.iter()) {
            *e = *e + re;
        }
        self
    }
}

impl<F: Float> Sub for Dual<F> {
    type Output = Self;
    #[inline]
    fn sub(mut self, rhs: Self) -> Self {
        check_widths(&self.eps, &rhs.eps);
        self.re = self.re - rhs.re;
        for (e, &re) in self.eps.iter_mut().zip(rhs.eps.iter()) {
            *e = *e - re;
        }
        self
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl<F: Float> Mul for Dual<F> {
    type Output = Self;
    #[inline]
    fn mul(mut self, rhs: Self) -> Self {
        check_widths(&self.eps, &rhs.eps);
        for (e, &re) in self.eps.iter_mut().zip(rhs.eps.iter()) {
            *e = self.re * re + *e * rhs.re;
        }
        self.re = self.re * rhs.re;
        self
    }
}

impl<F: Float> Div for Dual<F> {
    type Output = Self;
    #[inline]
    fn div(mut self, rhs: Self) -> Self {
        check_widths(&self.eps, &rhs.eps);
        let inv = F::one() / rhs.re;
        for (e, &re) in self.eps.iter_mut().zip(rhs.eps.iter()) {
            *e = (*e * rhs.re - self.re * re) * inv * inv;
        }
        self.re = self.re * inv;
        self
    }
}

impl<F: Float> Neg for Dual<F> {
    type Output = Self;
    #[inline]
    fn neg(mut self) -> Self {
        self.re = -self.re;
        for e in self.eps.iter_mut() {
            *e = -*e;
        }
        self
    }
}

impl<F: Float> Rem for Dual<F> {
    type Output = Self;
    #[inline]
    fn rem(mut self, rhs: Self) -> Self {
        check_widths(&self.eps, &rhs.eps);
        self.re = self.re % rhs.re;
        self
    }
}

// ──────────────────────────────────────────────
//  Reference forwarding
// ──────────────────────────────────────────────

macro_rules! forward_ref_binop {
    ($imp:ident, $method:ident) => {
        impl<'a, 'b, F: Float> $imp<&'b Dual<F>> for &'a Dual<F> {
            type Output = Dual<F>;
            #[inline]
            fn $method(self, rhs: &'b Dual<F>) -> Dual<F> {
                self.clone().$method(rhs.clone())
            }
        }

        impl<'a, F: Float> $imp<&'a Dual<F>> for Dual<F> {
            type Output = Dual<F>;
            #[inline]
            fn $method(self, rhs: &'a Dual<F>) -> Dual<F> {
                self.$method(rhs.clone())
            }
        }

        impl<'a, F: Float> $imp<Dual<F>> for &'a Dual<F> {
            type Output = Dual<F>;
            #[inline]
            fn $method(self, rhs: Dual<F>) -> Dual<F> {
                self.clone().$method(rhs)
            }
        }
    };
}

forward_ref_binop!(Add, add);
forward_ref_binop!(Sub, sub);
forward_ref_binop!(Mul, mul);
forward_ref_binop!(Div, div);
forward_ref_binop!(Rem, rem);

impl<'a, F: Float> Neg for &'a Dual<F> {
    type Output = Dual<F>;
    #[inline]
    fn neg(self) -> Dual<F> {
        -self.clone()
    }
}

// ──────────────────────────────────────────────
//  Assignment operators
// ──────────────────────────────────────────────

impl<F: Float> AddAssign for Dual<F> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self += &rhs;
    }
}

impl<'a, F: Float> AddAssign<&'a Dual<F>> for Dual<F> {
    #[inline]
    fn add_assign(&mut self, rhs: &'a Dual<F>) {
        check_widths(&self.eps, &rhs.eps);
        self.re = self.re + rhs.re;
        for (e, &re) in self.eps.iter_mut().zip(rhs.eps.iter()) {
            *e = *e + re;
        }
    }
}

impl<F: Float> SubAssign for Dual<F> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self -= &rhs;
    }
}

impl<'a, F: Float> SubAssign<&'a Dual<F>> for Dual<F> {
    #[inline]
    fn sub_assign(&mut self, rhs: &'a Dual<F>) {
        check_widths(&self.eps, &rhs.eps);
        self.re = self.re - rhs.re;
        for (e, &re) in self.eps.iter_mut().zip(rhs.eps.iter()) {
            *e = *e - re;
        }
    }
}

impl<F: Float> MulAssign for Dual<F> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self *= &rhs;
    }
}

impl<'a, F: Float> MulAssign<&'a Dual<F>> for Dual<F> {
    #[inline]
    fn mul_assign(&mut self, rhs: &'a Dual<F>) {
        check_widths(&self.eps, &rhs.eps);
        for (e, &re) in self.eps.iter_mut().zip(rhs.eps.iter()) {
            *e = self.re * re + *e * rhs.re;
        }
        self.re = self.re * rhs.re;
    }
}

impl<F: Float> DivAssign for Dual<F> {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self /= &rhs;
    }
}

impl<'a, F: Float> DivAssign<&'a Dual<F>> for Dual<F> {
    #[inline]
    fn div_assign(&mut self, rhs: &'a Dual<F>) {
        check_widths(&self.eps, &rhs.eps);
        let inv = F::one() / rhs.re;
        for (e, &re) in self.eps.iter_mut().zip(rhs.eps.iter()) {
            *e = (*e * rhs.re - self.re * re) * inv * inv;
        }
        self.re = self.re * inv;
    }
}

impl<F: Float> RemAssign for Dual<F> {
    #[inline]
    fn rem_assign(&mut self, rhs: Self) {
        check_widths(&self.eps, &rhs.eps);
        self.re = self.re % rhs.re;
    }
}

// ──────────────────────────────────────────────
//  Mixed ops: Dual<F> with primitive floats
// ──────────────────────────────────────────────

macro_rules! impl_dual_scalar_ops {
    ($f:ty) => {
        impl Add<$f> for Dual<$f> {
            type Output = Dual<$f>;
            #[inline]
            fn add(mut self, rhs: $f) -> Dual<$f> {
                self.re += rhs;
                self
            }
        }

        impl Add<Dual<$f>> for $f {
            type Output = Dual<$f>;
            #[inline]
            fn add(self, mut rhs: Dual<$f>) -> Dual<$f> {
                rhs.re += self;
                rhs
            }
        }

        impl Sub<$f> for Dual<$f> {
            type Output = Dual<$f>;
            #[inline]
            fn sub(mut self, rhs: $f) -> Dual<$f> {
                self.re -= rhs;
                self
            }
        }

        impl Sub<Dual<$f>> for $f {
            type Output = Dual<$f>;
            #[inline]
            fn sub(self, mut rhs: Dual<$f>) -> Dual<$f> {
                rhs.re = self - rhs.re;
                for e in rhs.eps.iter_mut() {
                    *e = -*e;
                }
                rhs
            }
        }

        impl Mul<$f> for Dual<$f> {
            type Output = Dual<$f>;
            #[inline]
            fn mul(mut self, rhs: $f) -> Dual<$f> {
                self.re *= rhs;
                for e in self.eps.iter_mut() {
                    *e *= rhs;
                }
                self
            }
        }

        impl Mul<Dual<$f>> for $f {
            type Output = Dual<$f>;
            #[inline]
            fn mul(self, rhs: Dual<$f>) -> Dual<$f> {
                rhs * self
            }
        }

        impl Div<$f> for Dual<$f> {
            type Output = Dual<$f>;
            #[inline]
            fn div(self, rhs: $f) -> Dual<$f> {
                self * (1.0 / rhs)
            }
        }

        impl Div<Dual<$f>> for $f {
            type Output = Dual<$f>;
            #[inline]
            fn div(self, mut rhs: Dual<$f>) -> Dual<$f> {
                let inv = 1.0 / rhs.re;
                for e in rhs.eps.iter_mut() {
                    *e = -self * *e * inv * inv;
                }
                rhs.re = self * inv;
                rhs
            }
        }

        impl Rem<$f> for Dual<$f> {
            type Output = Dual<$f>;
            #[inline]
            fn rem(mut self, rhs: $f) -> Dual<$f> {
                self.re %= rhs;
                self
            }
        }

        impl<'a> Add<$f> for &'a Dual<$f> {
            type Output = Dual<$f>;
            #[inline]
            fn add(self, rhs: $f) -> Dual<$f> {
                self.clone() + rhs
            }
        }

        impl<'a> Add<&'a Dual<$f>> for $f {
            type Output = Dual<$f>;
            #[inline]
            fn add(self, rhs: &'a Dual<$f>) -> Dual<$f> {
                self + rhs.clone()
            }
        }

        impl<'a> Sub<$f> for &'a Dual<$f> {
            type Output = Dual<$f>;
            #[inline]
            fn sub(self, rhs: $f) -> Dual<$f> {
                self.clone() - rhs
            }
        }

        impl<'a> Sub<&'a Dual<$f>> for $f {
            type Output = Dual<$f>;
            #[inline]
            fn sub(self, rhs: &'a Dual<$f>) -> Dual<$f> {
                self - rhs.clone()
            }
        }

        impl<'a> Mul<$f> for &'a Dual<$f> {
            type Output = Dual<$f>;
            #[inline]
            fn mul(self, rhs: $f) -> Dual<$f> {
                self.clone() * rhs
            }
        }

        impl<'a> Mul<&'a Dual<$f>> for $f {
            type Output = Dual<$f>;
            #[inline]
            fn mul(self, rhs: &'a Dual<$f>) -> Dual<$f> {
                self * rhs.clone()
            }
        }

        impl<'a> Div<$f> for &'a Dual<$f> {
            type Output = Dual<$f>;
            #[inline]
            fn div(self, rhs: $f) -> Dual<$f> {
                self.clone() / rhs
            }
        }

        impl<'a> Div<&'a Dual<$f>> for $f {
            type Output = Dual<$f>;
            #[inline]
            fn div(self, rhs: &'a Dual<$f>) -> Dual<$f> {
                self / rhs.clone()
            }
        }
    };
}

impl_dual_scalar_ops!(f32);
impl_dual_scalar_ops!(f64);

// Comparisons look only at the primal value, matching what the same code
// would do over plain floats.

impl<F: Float> PartialEq for Dual<F> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.re == other.re
    }
}

impl<F: Float> PartialOrd for Dual<F> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.re.partial_cmp(&other.re)
    }
}
