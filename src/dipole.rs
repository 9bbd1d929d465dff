// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/*! Bending-magnet (dipole) radiation.

We use the classical spectral-angular distribution of an electron on a
circular orbit, as given in e.g. Jackson §14.6 or the X-ray Data Booklet
§2.1:

```text
d²F/dθdψ = (3α / 4π²) γ² (Δω/ω) (I/e) y² (1+X²)² [K²_2/3(ξ) + X²/(1+X²) K²_1/3(ξ)]
```

where `y = E / E_c` is the photon energy in units of the critical energy,
`X = γψ` is the scaled vertical angle, and `ξ = y (1+X²)^{3/2} / 2`. The two
Bessel terms are the σ and π polarization components respectively. On axis
the spectrum rises as `y^{2/3}` well below the critical energy and falls as
`y e^{-y}` above it.

*/

use slog::Logger;

use crate::bessel::scaled_bessel_k_fractional;
use crate::errors::{require_finite, require_nonnegative, Error, Result};
use crate::{PhysicalConstants, PER_MRAD2, PI, RELATIVE_BANDWIDTH};


/// Past this value of `ξ` the Bessel terms underflow.
const MAX_XI: f64 = 700.;


/// The quantities that stay fixed for a given magnet and beam.
#[derive(Clone, Debug)]
pub struct DipoleState<'a> {
    constants: &'a PhysicalConstants,
    logger: &'a Logger,
    gamma: f64,
    critical_energy_ev: f64,
}


impl<'a> DipoleState<'a> {
    /// Set up a calculation for a bending field `bfield` (tesla) and a beam
    /// energy `beam_energy_gev`.
    pub fn new(constants: &'a PhysicalConstants, logger: &'a Logger, bfield: f64,
               beam_energy_gev: f64) -> Result<Self> {
        let bfield = require_nonnegative("bfield", bfield)?;
        let gamma = constants.lorentz_factor(beam_energy_gev)?;
        let beta = (1. - 1. / (gamma * gamma)).sqrt();

        // E_c = 3/2 ħ c γ³ / ρ with bending radius ρ = βγmc / eB. Dividing
        // the energy by e to get eV cancels the charge.
        let critical_energy_ev = 1.5 * constants.hbar * gamma * gamma * bfield
            / (beta * constants.electron_mass);

        if !critical_energy_ev.is_finite() {
            return Err(Error::NumericalInstability {
                quantity: "dipole critical energy",
                detail: format!("bfield = {:e}, gamma = {:e}", bfield, gamma),
            });
        }

        trace!(logger, "dipole setup";
               "bfield" => bfield,
               "gamma" => gamma,
               "critical_energy_ev" => critical_energy_ev,
        );

        Ok(DipoleState {
            constants,
            logger,
            gamma,
            critical_energy_ev,
        })
    }

    /// The critical photon energy, in eV.
    pub fn critical_energy_ev(&self) -> f64 {
        self.critical_energy_ev
    }

    /// Compute the flux density at vertical angle `angle` and photon energy
    /// `energy_ev`, in photons / s / mrad² / 0.1% BW per ampere of beam
    /// current.
    pub fn flux_density(&self, angle: f64, energy_ev: f64) -> Result<f64> {
        let angle = require_finite("angle", angle)?;
        let energy_ev = require_nonnegative("energy_ev", energy_ev)?;

        // No field, no bending, no light; and the density vanishes at zero
        // photon energy.
        if self.critical_energy_ev == 0. || energy_ev == 0. {
            return Ok(0.);
        }

        let y = energy_ev / self.critical_energy_ev;
        let x2 = (self.gamma * angle).powi(2);
        let one_x2 = 1. + x2;
        let xi = 0.5 * y * one_x2.powf(1.5);

        if !(xi <= MAX_XI) {
            trace!(self.logger, "dipole xi beyond cutoff"; "y" => y, "xi" => xi);
            return Ok(0.);
        }

        // `y² (1+X²)²` is `4ξ² / (1+X²)`. Folding one `2ξ` into each Bessel
        // factor keeps small ξ, where K_ν diverges, from overflowing.
        let a13 = 2. * scaled_bessel_k_fractional(1. / 3., xi);
        let a23 = 2. * scaled_bessel_k_fractional(2. / 3., xi);
        let shape = (a23 * a23 + x2 / one_x2 * a13 * a13) / one_x2;

        let c = self.constants;
        let prefactor = 3. * c.fine_structure / (4. * PI * PI) * self.gamma * self.gamma
            * RELATIVE_BANDWIDTH * PER_MRAD2 / c.elementary_charge;
        let flux = prefactor * shape;

        trace!(self.logger, "dipole flux density";
               "angle" => angle,
               "energy_ev" => energy_ev,
               "y" => y,
               "xi" => xi,
               "2xi_k13" => a13,
               "2xi_k23" => a23,
               "flux" => flux,
        );

        if flux.is_finite() {
            Ok(flux)
        } else {
            Err(Error::NumericalInstability {
                quantity: "dipole flux density",
                detail: format!("xi = {:e}, 2 xi K_1/3 = {:e}, 2 xi K_2/3 = {:e}", xi, a13, a23),
            })
        }
    }
}


#[cfg(test)]
mod tests {
    use slog::{Discard, Logger};

    use crate::CODATA_2018;
    use super::DipoleState;

    fn state(log: &Logger, bfield: f64, beam_energy_gev: f64) -> DipoleState<'_> {
        DipoleState::new(&CODATA_2018, log, bfield, beam_energy_gev).unwrap()
    }

    /// The usual rule of thumb is E_c [keV] = 0.665 E² [GeV²] B [T].
    #[test]
    fn critical_energy() {
        let log = Logger::root(Discard, o!());
        assert_approx_eq!(state(&log, 1., 3.).critical_energy_ev(), 5985.231107887243, 1e-6);
        assert_approx_eq!(state(&log, 0.4, 2.).critical_energy_ev(), 0.665025 * 4. * 0.4 * 1e3, 0.1);
    }

    /// On axis at the critical energy, the X-ray Data Booklet gives
    /// 1.327e13 E² I H₂(1) with H₂(1) ≈ 1.47.
    #[test]
    fn on_axis_at_critical_energy() {
        let log = Logger::root(Discard, o!());
        let s = state(&log, 1., 3.);
        let f = s.flux_density(0., s.critical_energy_ev()).unwrap();
        const EXPECTED: f64 = 1.7348561941178832e14;
        assert_approx_eq!(f, EXPECTED, 1e-6 * EXPECTED);
    }

    #[test]
    fn off_axis_value() {
        let log = Logger::root(Discard, o!());
        let f = state(&log, 1., 3.).flux_density(1e-4, 1000.).unwrap();
        const EXPECTED: f64 = 1.0192595497855033e14;
        assert_approx_eq!(f, EXPECTED, 1e-6 * EXPECTED);
    }

    #[test]
    fn vanishes_without_field_or_energy() {
        let log = Logger::root(Discard, o!());
        assert_eq!(state(&log, 0., 3.).flux_density(1e-4, 1000.).unwrap(), 0.);
        assert_eq!(state(&log, 0., 3.).critical_energy_ev(), 0.);
        assert_eq!(state(&log, 1., 3.).flux_density(1e-4, 0.).unwrap(), 0.);
    }

    /// Well below the critical energy the on-axis density goes to zero as
    /// `y^{2/3}`, however small `y` gets.
    #[test]
    fn tiny_photon_energies() {
        let log = Logger::root(Discard, o!());
        let s = state(&log, 1., 3.);
        let mut last = s.flux_density(0., 1e-6).unwrap();
        assert!(last > 0.);

        for &e in &[1e-50, 1e-100, 1e-200, 1e-300, 5e-324] {
            let f = s.flux_density(0., e).unwrap();
            assert!(f.is_finite() && f >= 0. && f < last, "flux({:e}) = {:e}", e, f);
            last = f;
        }

        let f1 = s.flux_density(0., 1e-150).unwrap();
        let f2 = s.flux_density(0., 1e-153).unwrap();
        assert_approx_eq!(f1 / f2, 100., 1e-6);
    }

    #[test]
    fn huge_field() {
        let log = Logger::root(Discard, o!());
        let f = state(&log, 1e300, 3.).flux_density(0., 1000.).unwrap();
        assert!(f.is_finite() && f > 0.);
    }

    #[test]
    fn far_above_critical_energy_is_zero() {
        let log = Logger::root(Discard, o!());
        let s = state(&log, 1., 3.);
        assert_eq!(s.flux_density(0., 2000. * s.critical_energy_ev()).unwrap(), 0.);
        assert_eq!(s.flux_density(1., 1000.).unwrap(), 0.);
    }

    #[test]
    fn invalid_arguments() {
        let log = Logger::root(Discard, o!());
        assert!(DipoleState::new(&CODATA_2018, &log, -1., 3.).is_err());
        assert!(DipoleState::new(&CODATA_2018, &log, 1., 0.).is_err());
        assert!(DipoleState::new(&CODATA_2018, &log, 1., -3.).is_err());

        let s = state(&log, 1., 3.);
        assert!(s.flux_density(0., -1.).is_err());
        assert!(s.flux_density(::std::f64::NAN, 1.).is_err());
    }
}
