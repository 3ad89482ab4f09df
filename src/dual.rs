//! Forward-mode dual numbers with a runtime number of tangent lanes.
//!
//! [`Dual<F>`] carries `seed_width` independent tangent directions
//! simultaneously, so one function evaluation propagates a whole batch of
//! directional derivatives. The width is fixed when the dual is constructed;
//! the Jacobian engine picks it from the sparsity descriptor (`n` for dense,
//! `bandwidth` for banded, `blocksize` for block-diagonal).

use std::fmt::{self, Display};

use crate::Float;

/// Forward-mode dual number: a value with a runtime-sized tangent vector.
///
/// `Dual { re, eps }` represents a value with `eps.len()` independent tangent
/// directions. All duals participating in one evaluation must share the same
/// width; binary operations assert this and panic on mismatch.
#[derive(Clone, Debug)]
pub struct Dual<F: Float> {
    /// Primal (real) value.
    pub re: F,
    /// Tangent (derivative) values — one per seed lane.
    pub eps: Box<[F]>,
}

impl<F: Float> Display for Dual<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.re)?;
        for (i, e) in self.eps.iter().enumerate() {
            write!(f, " + {}\u{03b5}{}", e, i)?;
        }
        Ok(())
    }
}

/// Panics when two duals of different seed widths meet in one operation.
#[inline]
pub(crate) fn check_widths<F: Float>(a: &[F], b: &[F]) {
    assert_eq!(
        a.len(),
        b.len(),
        "seed width mismatch: {} vs {} tangent lanes",
        a.len(),
        b.len()
    );
}

impl<F: Float> Dual<F> {
    /// Create a new dual number from its parts.
    #[inline]
    pub fn new(re: F, eps: Box<[F]>) -> Self {
        Dual { re, eps }
    }

    /// Create a constant (zero tangent in all `width` lanes).
    #[inline]
    pub fn constant(re: F, width: usize) -> Self {
        Dual {
            re,
            eps: vec![F::zero(); width].into_boxed_slice(),
        }
    }

    /// Create a single-lane variable (unit tangent) for scalar differentiation.
    #[inline]
    pub fn variable(re: F) -> Self {
        Dual {
            re,
            eps: vec![F::one()].into_boxed_slice(),
        }
    }

    /// Create a variable with unit tangent in the specified lane.
    #[inline]
    pub fn with_tangent(re: F, width: usize, lane: usize) -> Self {
        let mut eps = vec![F::zero(); width].into_boxed_slice();
        eps[lane] = F::one();
        Dual { re, eps }
    }

    /// Number of tangent lanes this dual carries.
    #[inline]
    pub fn seed_width(&self) -> usize {
        self.eps.len()
    }

    /// Apply the chain rule: given `f(self.re)` and `f'(self.re)`, produce the
    /// dual result. Reuses the tangent allocation.
    #[inline(always)]
    fn chain(mut self, f_val: F, f_deriv: F) -> Self {
        self.re = f_val;
        for e in self.eps.iter_mut() {
            *e = *e * f_deriv;
        }
        self
    }

    // -- Powers --

    #[inline]
    pub fn recip(self) -> Self {
        let inv = F::one() / self.re;
        self.chain(inv, -inv * inv)
    }

    #[inline]
    pub fn sqrt(self) -> Self {
        let s = self.re.sqrt();
        let two = F::one() + F::one();
        self.chain(s, F::one() / (two * s))
    }

    #[inline]
    pub fn cbrt(self) -> Self {
        let c = self.re.cbrt();
        let three = F::from(3.0).unwrap();
        self.chain(c, F::one() / (three * c * c))
    }

    #[inline]
    pub fn powi(self, n: i32) -> Self {
        let val = self.re.powi(n);
        let deriv = F::from(n).unwrap() * self.re.powi(n - 1);
        self.chain(val, deriv)
    }

    #[inline]
    pub fn powf(mut self, n: Self) -> Self {
        // d/dx (x^y) = y * x^(y-1) * dx + x^y * ln(x) * dy
        check_widths(&self.eps, &n.eps);
        let val = self.re.powf(n.re);
        let lnx = self.re.ln();
        for (e, &ne) in self.eps.iter_mut().zip(n.eps.iter()) {
            *e = val * (n.re * *e / self.re + ne * lnx);
        }
        self.re = val;
        self
    }

    // -- Exp/Log --

    #[inline]
    pub fn exp(self) -> Self {
        let e = self.re.exp();
        self.chain(e, e)
    }

    #[inline]
    pub fn exp2(self) -> Self {
        let e = self.re.exp2();
        self.chain(e, e * F::LN_2())
    }

    #[inline]
    pub fn exp_m1(self) -> Self {
        let re = self.re;
        let d = re.exp();
        self.chain(re.exp_m1(), d)
    }

    #[inline]
    pub fn ln(self) -> Self {
        let re = self.re;
        self.chain(re.ln(), F::one() / re)
    }

    #[inline]
    pub fn log2(self) -> Self {
        let re = self.re;
        self.chain(re.log2(), F::one() / (re * F::LN_2()))
    }

    #[inline]
    pub fn log10(self) -> Self {
        let re = self.re;
        self.chain(re.log10(), F::one() / (re * F::LN_10()))
    }

    #[inline]
    pub fn ln_1p(self) -> Self {
        let re = self.re;
        self.chain(re.ln_1p(), F::one() / (F::one() + re))
    }

    #[inline]
    pub fn log(self, base: Self) -> Self {
        self.ln() / base.ln()
    }

    // -- Trig --

    #[inline]
    pub fn sin(self) -> Self {
        let re = self.re;
        self.chain(re.sin(), re.cos())
    }

    #[inline]
    pub fn cos(self) -> Self {
        let re = self.re;
        self.chain(re.cos(), -re.sin())
    }

    #[inline]
    pub fn tan(self) -> Self {
        let re = self.re;
        let c = re.cos();
        self.chain(re.tan(), F::one() / (c * c))
    }

    #[inline]
    pub fn sin_cos(self) -> (Self, Self) {
        let (s, c) = self.re.sin_cos();
        let cos_part = self.clone().chain(c, -s);
        let sin_part = self.chain(s, c);
        (sin_part, cos_part)
    }

    #[inline]
    pub fn asin(self) -> Self {
        let re = self.re;
        self.chain(re.asin(), F::one() / (F::one() - re * re).sqrt())
    }

    #[inline]
    pub fn acos(self) -> Self {
        let re = self.re;
        self.chain(re.acos(), -F::one() / (F::one() - re * re).sqrt())
    }

    #[inline]
    pub fn atan(self) -> Self {
        let re = self.re;
        self.chain(re.atan(), F::one() / (F::one() + re * re))
    }

    #[inline]
    pub fn atan2(mut self, other: Self) -> Self {
        // d/dx atan2(y,x) = x/(x²+y²) dy - y/(x²+y²) dx
        check_widths(&self.eps, &other.eps);
        let denom = self.re * self.re + other.re * other.re;
        for (e, &oe) in self.eps.iter_mut().zip(other.eps.iter()) {
            *e = (other.re * *e - self.re * oe) / denom;
        }
        self.re = self.re.atan2(other.re);
        self
    }

    // -- Hyperbolic --

    #[inline]
    pub fn sinh(self) -> Self {
        let re = self.re;
        self.chain(re.sinh(), re.cosh())
    }

    #[inline]
    pub fn cosh(self) -> Self {
        let re = self.re;
        self.chain(re.cosh(), re.sinh())
    }

    #[inline]
    pub fn tanh(self) -> Self {
        let re = self.re;
        let c = re.cosh();
        self.chain(re.tanh(), F::one() / (c * c))
    }

    #[inline]
    pub fn asinh(self) -> Self {
        let re = self.re;
        self.chain(re.asinh(), F::one() / (re * re + F::one()).sqrt())
    }

    #[inline]
    pub fn acosh(self) -> Self {
        let re = self.re;
        self.chain(re.acosh(), F::one() / (re * re - F::one()).sqrt())
    }

    #[inline]
    pub fn atanh(self) -> Self {
        let re = self.re;
        self.chain(re.atanh(), F::one() / (F::one() - re * re))
    }

    // -- Misc --

    #[inline]
    pub fn abs(self) -> Self {
        let re = self.re;
        let sign = re.signum();
        self.chain(re.abs(), sign)
    }

    #[inline]
    pub fn signum(self) -> Self {
        let re = self.re;
        self.chain(re.signum(), F::zero())
    }

    #[inline]
    pub fn floor(self) -> Self {
        let re = self.re;
        self.chain(re.floor(), F::zero())
    }

    #[inline]
    pub fn ceil(self) -> Self {
        let re = self.re;
        self.chain(re.ceil(), F::zero())
    }

    #[inline]
    pub fn round(self) -> Self {
        let re = self.re;
        self.chain(re.round(), F::zero())
    }

    #[inline]
    pub fn trunc(self) -> Self {
        let re = self.re;
        self.chain(re.trunc(), F::zero())
    }

    #[inline]
    pub fn fract(self) -> Self {
        let re = self.re;
        self.chain(re.fract(), F::one())
    }

    #[inline]
    pub fn mul_add(mut self, a: Self, b: Self) -> Self {
        // d(x*a + b) = a*dx + x*da + db
        check_widths(&self.eps, &a.eps);
        check_widths(&self.eps, &b.eps);
        for ((e, &ae), &be) in self.eps.iter_mut().zip(a.eps.iter()).zip(b.eps.iter()) {
            *e = *e * a.re + self.re * ae + be;
        }
        self.re = self.re.mul_add(a.re, b.re);
        self
    }

    #[inline]
    pub fn hypot(mut self, other: Self) -> Self {
        check_widths(&self.eps, &other.eps);
        let h = self.re.hypot(other.re);
        for (e, &oe) in self.eps.iter_mut().zip(other.eps.iter()) {
            *e = (self.re * *e + other.re * oe) / h;
        }
        self.re = h;
        self
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        if self.re >= other.re {
            self
        } else {
            other
        }
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        if self.re <= other.re {
            self
        } else {
            other
        }
    }
}
