//! Complex amplitudes and single-qubit states
//!
//! Just enough linear algebra for the Bloch-sphere verses.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::FRAC_1_SQRT_2;

/// Complex number
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Complex {
    pub re: f32,
    pub im: f32,
}

impl Complex {
    pub const ZERO: Complex = Complex { re: 0.0, im: 0.0 };
    pub const ONE: Complex = Complex { re: 1.0, im: 0.0 };

    pub fn new(re: f32, im: f32) -> Self {
        Self { re, im }
    }

    /// r * e^(i*theta)
    pub fn from_polar(r: f32, theta: f32) -> Self {
        Self {
            re: r * theta.cos(),
            im: r * theta.sin(),
        }
    }

    /// |z|^2
    pub fn norm_sq(&self) -> f32 {
        self.re * self.re + self.im * self.im
    }

    pub fn arg(&self) -> f32 {
        self.im.atan2(self.re)
    }

    pub fn conj(&self) -> Self {
        Self {
            re: self.re,
            im: -self.im,
        }
    }
}

impl std::ops::Add for Complex {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl std::ops::Sub for Complex {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl std::ops::Mul for Complex {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl std::ops::Mul<f32> for Complex {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.re * rhs, self.im * rhs)
    }
}

/// Single qubit state |ψ⟩ = α|0⟩ + β|1⟩
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Qubit {
    pub alpha: Complex,
    pub beta: Complex,
}

impl Qubit {
    /// |0⟩ state
    pub const ZERO: Qubit = Qubit {
        alpha: Complex::ONE,
        beta: Complex::ZERO,
    };

    /// |1⟩ state
    pub const ONE: Qubit = Qubit {
        alpha: Complex::ZERO,
        beta: Complex::ONE,
    };

    /// State with P(|1⟩) = `prob_one` and relative phase `phase`
    pub fn from_probability(prob_one: f32, phase: f32) -> Self {
        let p = prob_one.clamp(0.0, 1.0);
        Self {
            alpha: Complex::new((1.0 - p).sqrt(), 0.0),
            beta: Complex::from_polar(p.sqrt(), phase),
        }
    }

    /// Bloch vector in the renderer's frame: |0⟩ points along +Y
    pub fn bloch_vector(&self) -> Vec3 {
        // x = 2 Re(α*β), y = 2 Im(α*β), z = |α|² - |β|²
        let cross = self.alpha.conj() * self.beta;
        Vec3::new(
            2.0 * cross.re,
            self.alpha.norm_sq() - self.beta.norm_sq(),
            2.0 * cross.im,
        )
    }

    pub fn prob_zero(&self) -> f32 {
        self.alpha.norm_sq()
    }

    pub fn prob_one(&self) -> f32 {
        self.beta.norm_sq()
    }

    /// Relative phase between the |1⟩ and |0⟩ amplitudes
    pub fn relative_phase(&self) -> f32 {
        (self.alpha.conj() * self.beta).arg()
    }

    /// Apply Hadamard gate
    pub fn hadamard(&mut self) {
        let new_alpha = (self.alpha + self.beta) * FRAC_1_SQRT_2;
        let new_beta = (self.alpha - self.beta) * FRAC_1_SQRT_2;
        self.alpha = new_alpha;
        self.beta = new_beta;
    }

    /// Rotate the relative phase (precession about the Bloch Y axis)
    pub fn rotate_phase(&mut self, angle: f32) {
        self.beta = self.beta * Complex::from_polar(1.0, angle);
    }

    /// Born-rule measurement, collapsing the state; returns `true` for |1⟩
    pub fn measure<R: Rng>(&mut self, rng: &mut R) -> bool {
        let one = rng.gen::<f32>() < self.prob_one();
        *self = if one { Self::ONE } else { Self::ZERO };
        one
    }
}

impl Default for Qubit {
    fn default() -> Self {
        Self::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn probability_constructor_is_normalized() {
        for &p in &[0.0, 0.25, 0.5, 0.9, 1.0] {
            let q = Qubit::from_probability(p, 1.3);
            assert!((q.prob_zero() + q.prob_one() - 1.0).abs() < 1e-5);
            assert!((q.prob_one() - p).abs() < 1e-5);
        }
    }

    #[test]
    fn poles_of_the_bloch_sphere() {
        assert!((Qubit::ZERO.bloch_vector() - Vec3::Y).length() < 1e-5);
        assert!((Qubit::ONE.bloch_vector() + Vec3::Y).length() < 1e-5);
        let equator = Qubit::from_probability(0.5, 0.0).bloch_vector();
        assert!((equator - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn hadamard_is_self_inverse() {
        let mut q = Qubit::from_probability(0.3, 0.7);
        let original = q;
        q.hadamard();
        q.hadamard();
        assert!((q.alpha - original.alpha).norm_sq() < 1e-8);
        assert!((q.beta - original.beta).norm_sq() < 1e-8);
    }

    #[test]
    fn measurement_collapses_to_a_basis_state() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut q = Qubit::from_probability(0.5, 0.0);
        let one = q.measure(&mut rng);
        assert_eq!(q, if one { Qubit::ONE } else { Qubit::ZERO });
    }
}
