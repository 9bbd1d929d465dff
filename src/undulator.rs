// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/*! Planar undulator radiation.

An electron passing through `N` periods of length `λu` radiates a wave
train of `N` oscillations. Seen at polar angle θ, the fundamental photon
energy is

```text
E₁(θ) = 2γ² h c / (λu (1 + K²/2 + γ²θ²))
```

and emission concentrates near the harmonics `E_n = n E₁`. We follow Kim
(1989, AIP Conf. Proc. 184, 565) for the strength of each harmonic. With
`D = 1 + K²/2 + γ²θ²`,

```text
X = 2nγK θ_h / D,   Y = nK² / 4D
S0 = Σ_p J_p(Y) J_{n+2p}(X)
S1 = Σ_p J_p(Y) [J_{n+2p-1}(X) + J_{n+2p+1}(X)]
Σx = 2γθ_h S0 - K S1,   Σy = 2γθ_v S0
d²F/dΩ = α N² γ² (Δω/ω) (I/e) n² (Σx² + Σy²) / D²
```

where `θ_h` is the angle in the wiggle plane and `θ_v` the angle out of
it. On axis this collapses to the familiar `F_n(K)` with its
`J_{(n-1)/2} - J_{(n+1)/2}` Bessel difference, and the even harmonics
vanish.

Each harmonic is spread over energy by the finite length of the wave
train. We use the single-harmonic line shape `[sin(πNν) / πNν]²` with
detuning `ν = E/E₁ - n`, so that peaks grow as `N²` while their widths
shrink as `1/N`.

*/

use slog::Logger;

use std::ops::RangeInclusive;

use crate::bessel::{significant_order, Jn};
use crate::errors::{require_finite, require_nonnegative, require_positive, Error, Result};
use crate::{PhysicalConstants, PER_MRAD2, PI, RELATIVE_BANDWIDTH, TWO_PI};


/// Below this value of `πNν` the line shape is evaluated from its series
/// expansion instead of the quotient.
const SINC_SERIES_LIMIT: f64 = 1e-4;



/// Compute `K = e B λ / (2π m c)`.
pub fn deflection_parameter(constants: &PhysicalConstants, bfield_max: f64, period: f64) -> Result<f64> {
    let bfield_max = require_nonnegative("bfield_max", bfield_max)?;
    let period = require_positive("period", period)?;

    Ok(constants.elementary_charge * bfield_max * period
       / (TWO_PI * constants.electron_mass * constants.speed_of_light))
}


/// The photon energy and flux density at the peak of one harmonic.
#[derive(Copy,Clone,Debug,PartialEq)]
pub struct HarmonicPeak {
    /// The harmonic number, starting at 1 for the fundamental.
    pub harmonic: u32,

    /// The photon energy of the peak, in eV.
    pub energy_ev: f64,

    /// The flux density at the peak, in photons / s / mrad² / 0.1% BW.
    pub flux: f64,
}


/// The resonance condition of an undulator as seen from one direction.
#[derive(Copy,Clone,Debug,PartialEq)]
pub struct Resonance {
    k: f64,
    gamma: f64,
    angle_v: f64,
    angle_h: f64,
    denom: f64,
    fundamental_ev: f64,
}

impl Resonance {
    /// Work out the resonance for peak field `bfield`, period `period`, beam
    /// energy `beam_energy_gev`, and observation angles `angle_v` and
    /// `angle_h`.
    pub fn new(constants: &PhysicalConstants, bfield: f64, period: f64, beam_energy_gev: f64,
               angle_v: f64, angle_h: f64) -> Result<Self> {
        let k = deflection_parameter(constants, bfield, period)?;
        let gamma = constants.lorentz_factor(beam_energy_gev)?;
        let angle_v = require_finite("angle_v", angle_v)?;
        let angle_h = require_finite("angle_h", angle_h)?;

        let gamma_theta2 = gamma * gamma * (angle_v * angle_v + angle_h * angle_h);
        let denom = 1. + 0.5 * k * k + gamma_theta2;
        let fundamental_ev = 2. * gamma * gamma * constants.hc_ev_m() / (period * denom);

        if !(fundamental_ev > 0. && fundamental_ev.is_finite()) {
            return Err(Error::NumericalInstability {
                quantity: "undulator fundamental energy",
                detail: format!("gamma = {:e}, K = {:e}, gamma^2 theta^2 = {:e}", gamma, k, gamma_theta2),
            });
        }

        Ok(Resonance { k, gamma, angle_v, angle_h, denom, fundamental_ev })
    }

    /// The deflection parameter.
    pub fn k(&self) -> f64 {
        self.k
    }

    /// The fundamental photon energy in this direction, in eV.
    pub fn fundamental_ev(&self) -> f64 {
        self.fundamental_ev
    }

    /// The photon energy of harmonic `harmonic` in this direction, in eV.
    pub fn harmonic_energy(&self, harmonic: u32) -> Result<f64> {
        if harmonic == 0 {
            return Err(Error::InvalidArgument {
                name: "harmonic",
                value: 0.,
                requirement: "at least 1",
            });
        }

        Ok(harmonic as f64 * self.fundamental_ev)
    }

    /// The arguments `(X, Y)` of the generalized Bessel sums for harmonic `n`.
    fn bessel_arguments(&self, n: u32) -> (f64, f64) {
        let nf = n as f64;
        let x = 2. * nf * self.gamma * self.k * self.angle_h / self.denom;
        let y = nf * self.k * self.k / (4. * self.denom);
        (x, y)
    }

    /// Evaluate `n² (Σx² + Σy²) / D²`, the angular strength of harmonic `n`
    /// without the dimensional prefactors.
    fn harmonic_strength(&self, n: u32) -> f64 {
        let nf = n as f64;
        let (x, y) = self.bessel_arguments(n);
        let x_limit = significant_order(x);
        let jx = |order: i64| if order.abs() > x_limit { 0. } else { Jn(order, x) };

        let mut s0 = 0_f64;
        let mut s1 = 0_f64;

        for p in summation_range(n as i64, x_limit, significant_order(y)) {
            let jp = Jn(p, y);

            if jp == 0. {
                continue;
            }

            let m = n as i64 + 2 * p;
            s0 += jp * jx(m);
            s1 += jp * (jx(m - 1) + jx(m + 1));
        }

        let sigma_x = 2. * self.gamma * self.angle_h * s0 - self.k * s1;
        let sigma_y = 2. * self.gamma * self.angle_v * s0;

        nf * nf * (sigma_x * sigma_x + sigma_y * sigma_y) / (self.denom * self.denom)
    }
}


/// The values of `p` that can contribute to the sums for harmonic `n`.
///
/// Each term is `J_p(Y)` times Bessel functions of `X` at orders `n + 2p`
/// and `n + 2p ± 1`, so we need `|p|` within `y_limit` and `|n + 2p|` within
/// one of `x_limit`. On axis `X = 0` and only a couple of terms survive.
fn summation_range(n: i64, x_limit: i64, y_limit: i64) -> RangeInclusive<i64> {
    let lo = (-y_limit).max(-((x_limit + 1 + n).div_euclid(2)));
    let hi = y_limit.min((x_limit + 1 - n).div_euclid(2));
    lo..=hi
}


/// An undulator of a given length seen from one direction.
#[derive(Clone, Debug)]
pub struct UndulatorState<'a> {
    constants: &'a PhysicalConstants,
    logger: &'a Logger,
    resonance: Resonance,
    n_periods: f64,
}

impl<'a> UndulatorState<'a> {
    /// Set up a calculation for an undulator of `n_periods` periods.
    pub fn new(constants: &'a PhysicalConstants, logger: &'a Logger, resonance: Resonance,
               n_periods: f64) -> Result<Self> {
        let n_periods = require_positive("n_periods", n_periods)?;

        trace!(logger, "undulator setup";
               "K" => resonance.k,
               "gamma" => resonance.gamma,
               "n_periods" => n_periods,
               "fundamental_ev" => resonance.fundamental_ev,
        );

        Ok(UndulatorState { constants, logger, resonance, n_periods })
    }

    /// The resonance condition being used.
    pub fn resonance(&self) -> &Resonance {
        &self.resonance
    }

    /// The normalized line shape `[sin(πNν) / πNν]²` at detuning `nu`.
    ///
    /// Right on a harmonic both the numerator and the denominator vanish, so
    /// there we use the series `1 - (πNν)²/3` instead.
    pub fn line_shape(&self, nu: f64) -> f64 {
        let arg = PI * self.n_periods * nu;

        if arg.abs() < SINC_SERIES_LIMIT {
            1. - arg * arg / 3.
        } else {
            let sinc = arg.sin() / arg;
            sinc * sinc
        }
    }

    /// Compute the flux density at photon energy `energy_ev`, in photons / s
    /// / mrad² / 0.1% BW per ampere, summing the nearest harmonic and up to
    /// `window` neighbours on each side of it.
    pub fn flux_density(&self, energy_ev: f64, window: u32) -> Result<f64> {
        let energy_ev = require_nonnegative("energy_ev", energy_ev)?;

        if energy_ev == 0. {
            return Ok(0.);
        }

        let r = &self.resonance;
        let c = self.constants;
        let ratio = energy_ev / r.fundamental_ev;
        let nearest = ratio.round();

        if !nearest.is_finite() || nearest > u32::MAX as f64 - window as f64 {
            return Err(Error::NumericalInstability {
                quantity: "undulator harmonic number",
                detail: format!("E / E1 = {:e}", ratio),
            });
        }

        let nearest = nearest as u32;
        let lo = nearest.saturating_sub(window).max(1);
        let hi = (nearest + window).max(lo);

        let prefactor = c.fine_structure * self.n_periods * self.n_periods * r.gamma * r.gamma
            * RELATIVE_BANDWIDTH * PER_MRAD2 / c.elementary_charge;

        let mut total = 0_f64;

        for n in lo..=hi {
            let shape = self.line_shape(ratio - n as f64);
            let strength = r.harmonic_strength(n);
            total += shape * strength;

            trace!(self.logger, "undulator harmonic";
                   "n" => n,
                   "detuning" => ratio - n as f64,
                   "line_shape" => shape,
                   "strength" => strength,
            );
        }

        let flux = prefactor * total;

        if flux.is_finite() {
            Ok(flux)
        } else {
            Err(Error::NumericalInstability {
                quantity: "undulator flux density",
                detail: format!("n_periods = {:e}, E / E1 = {:e}, harmonics {}..={}",
                                self.n_periods, ratio, lo, hi),
            })
        }
    }
}
