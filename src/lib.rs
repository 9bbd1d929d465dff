// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/*! Closed-form estimates of synchrotron radiation from undulators and bending
magnets.

A full radiation simulation integrates electron trajectories through a
magnetic field and then integrates the radiated fields over those
trajectories. That is slow. This crate evaluates the classic analytic
results instead, so that the output of such a simulation can be
sanity-checked, or approximated when a rough number is all that is needed:

- the undulator deflection parameter *K* for a given peak field and period
  ([`RadiationCalculator::undulator_k`]);
- the spectral-angular flux density of bending-magnet radiation
  ([`RadiationCalculator::dipole_spectrum`]);
- the spectral-angular flux density of a planar undulator, including its
  harmonic structure ([`RadiationCalculator::undulator_flux`]).

Results can be gathered into a [`Spectrum`] over photon energy or a
[`FluxMap`] over observation angles, and those can be scaled, summed, and
(for maps) rebinned.

## Units

Everything is SI except where the synchrotron community has settled on
something else:

| Quantity | Unit |
|---|---|
| magnetic field | tesla |
| undulator period | meters |
| beam energy | GeV |
| angles | radians |
| photon energy | eV |
| flux density | photons / s / mrad² / 0.1% bandwidth |

Flux densities are computed for the beam current configured on the
calculator, which is 1 ampere unless
[`RadiationCalculator::with_beam_current`] says otherwise; they scale
linearly with the current.

The undulator field is taken to be vertical, so that the electron wiggles in
the horizontal plane. Horizontal observation angles are therefore in the
wiggle plane.

*/

#![deny(missing_docs)]

#[cfg(test)] #[macro_use] extern crate assert_approx_eq;
#[macro_use] extern crate slog;

use slog::Logger;

mod bessel;
pub mod dipole;
pub mod errors;
pub mod flux_map;
pub mod spectrum;
pub mod undulator;

pub use errors::{Error, Result};
pub use flux_map::FluxMap;
pub use spectrum::Spectrum;
pub use undulator::HarmonicPeak;

pub use std::f64::consts::PI;

/// Two times pi, as an `f64`.
pub const TWO_PI: f64 = 2. * PI;

/// The relative bandwidth that flux densities are normalized to.
pub const RELATIVE_BANDWIDTH: f64 = 1e-3;

/// Converts a quantity per square radian to one per square milliradian.
pub const PER_MRAD2: f64 = 1e-6;


/// The fundamental constants that the formulae depend on, in SI units.
#[derive(Copy,Clone,Debug,PartialEq)]
pub struct PhysicalConstants {
    /// The elementary charge, in coulombs.
    pub elementary_charge: f64,

    /// The electron rest mass, in kilograms.
    pub electron_mass: f64,

    /// The speed of light, in meters per second.
    pub speed_of_light: f64,

    /// The reduced Planck constant, in joule-seconds.
    pub hbar: f64,

    /// The fine-structure constant, dimensionless.
    pub fine_structure: f64,
}

/// The 2018 CODATA recommended values.
pub const CODATA_2018: PhysicalConstants = PhysicalConstants {
    elementary_charge: 1.602176634e-19,
    electron_mass: 9.1093837015e-31,
    speed_of_light: 299792458.,
    hbar: 1.054571817e-34,
    fine_structure: 7.2973525693e-3,
};

impl Default for PhysicalConstants {
    fn default() -> Self {
        CODATA_2018
    }
}

impl PhysicalConstants {
    /// The electron rest energy, in eV.
    pub fn electron_rest_energy_ev(&self) -> f64 {
        self.electron_mass * self.speed_of_light * self.speed_of_light / self.elementary_charge
    }

    /// `h c`, in eV meters. Dividing this by a wavelength in meters gives a
    /// photon energy in eV.
    pub fn hc_ev_m(&self) -> f64 {
        TWO_PI * self.hbar * self.speed_of_light / self.elementary_charge
    }

    /// The Lorentz factor of an electron with the given total energy.
    ///
    /// The energy must exceed the electron rest energy, about 0.511 MeV.
    pub fn lorentz_factor(&self, beam_energy_gev: f64) -> Result<f64> {
        let beam_energy_gev = errors::require_positive("beam_energy_gev", beam_energy_gev)?;
        let gamma = beam_energy_gev * 1e9 / self.electron_rest_energy_ev();

        if gamma > 1. {
            Ok(gamma)
        } else {
            Err(Error::InvalidArgument {
                name: "beam_energy_gev",
                value: beam_energy_gev,
                requirement: "above the electron rest energy",
            })
        }
    }
}


/// Evaluates the radiation formulae.
///
/// A calculator is immutable once built: the builder-style `with_*` methods
/// consume it and return a reconfigured copy. Every evaluation is a pure
/// function of its arguments and this configuration, so one calculator can
/// be shared freely between threads.
#[derive(Clone, Debug)]
pub struct RadiationCalculator {
    constants: PhysicalConstants,
    beam_current: f64,
    harmonic_window: u32,
    logger: Logger,
}

impl Default for RadiationCalculator {
    fn default() -> Self {
        RadiationCalculator::new()
    }
}

impl RadiationCalculator {
    /// Create a calculator using CODATA 2018 constants, a 1 A beam, and a
    /// harmonic window of two neighbours on each side. Diagnostics are
    /// discarded.
    pub fn new() -> Self {
        RadiationCalculator {
            constants: CODATA_2018,
            beam_current: 1.,
            harmonic_window: 2,
            logger: Logger::root(slog::Discard, o!()),
        }
    }

    /// Send trace-level diagnostics of intermediate quantities to `logger`.
    ///
    /// Trace records are only compiled in with the `max_level_trace` feature.
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Set the electron beam current, in amperes, that flux densities are
    /// computed for.
    pub fn with_beam_current(mut self, amperes: f64) -> Result<Self> {
        self.beam_current = errors::require_positive("beam_current", amperes)?;
        Ok(self)
    }

    /// Set how many neighbouring harmonics on either side of the one nearest
    /// to the photon energy are summed in [`Self::undulator_flux`].
    pub fn with_harmonic_window(mut self, neighbours: u32) -> Self {
        self.harmonic_window = neighbours;
        self
    }

    /// The physical constants in use.
    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    /// The configured beam current, in amperes.
    pub fn beam_current(&self) -> f64 {
        self.beam_current
    }

    /// The configured harmonic window.
    pub fn harmonic_window(&self) -> u32 {
        self.harmonic_window
    }

    /// Compute the undulator deflection parameter *K* for a peak field
    /// `bfield_max` (tesla) and period `period` (meters).
    ///
    /// `K = e B λ / (2π m c)`, or about `93.37 B λ`.
    pub fn undulator_k(&self, bfield_max: f64, period: f64) -> Result<f64> {
        undulator::deflection_parameter(&self.constants, bfield_max, period)
    }

    /// Compute the critical photon energy, in eV, of a bending magnet of
    /// field `bfield` (tesla) for a beam of energy `beam_energy_gev`.
    pub fn dipole_critical_energy(&self, bfield: f64, beam_energy_gev: f64) -> Result<f64> {
        Ok(dipole::DipoleState::new(&self.constants, &self.logger, bfield, beam_energy_gev)?
           .critical_energy_ev())
    }

    /// Compute the bending-magnet flux density at photon energy `energy_ev`
    /// and vertical observation angle `angle` (radians out of the orbit
    /// plane).
    ///
    /// The result is in photons / s / mrad² / 0.1% BW for the configured
    /// beam current. It vanishes when `bfield` or `energy_ev` is zero and is
    /// symmetric in `angle`.
    pub fn dipole_spectrum(&self, bfield: f64, beam_energy_gev: f64, angle: f64,
                           energy_ev: f64) -> Result<f64> {
        let flux = dipole::DipoleState::new(&self.constants, &self.logger, bfield, beam_energy_gev)?
            .flux_density(angle, energy_ev)?;
        Ok(flux * self.beam_current)
    }

    /// Evaluate [`Self::dipole_spectrum`] over a list of photon energies.
    pub fn dipole_spectrum_over(&self, bfield: f64, beam_energy_gev: f64, angle: f64,
                                energies_ev: &[f64]) -> Result<Spectrum> {
        let state = dipole::DipoleState::new(&self.constants, &self.logger, bfield, beam_energy_gev)?;

        energies_ev.iter()
            .map(|&e| -> Result<(f64, f64)> {
                Ok((e, state.flux_density(angle, e)? * self.beam_current))
            })
            .collect()
    }

    /// Compute the photon energy, in eV, of undulator harmonic `harmonic`
    /// as seen at observation angles `angle_v` and `angle_h`.
    pub fn undulator_harmonic_energy(&self, bfield: f64, period: f64, beam_energy_gev: f64,
                                     angle_v: f64, angle_h: f64, harmonic: u32) -> Result<f64> {
        undulator::Resonance::new(&self.constants, bfield, period, beam_energy_gev, angle_v, angle_h)?
            .harmonic_energy(harmonic)
    }

    /// Compute the flux density of a planar undulator at photon energy
    /// `energy_ev` and observation angles `angle_v` and `angle_h`.
    ///
    /// `bfield` is the peak field in tesla, `period` the period in meters,
    /// and `n_periods` the number of periods. The result is in photons / s /
    /// mrad² / 0.1% BW for the configured beam current. At a harmonic peak
    /// it grows as `n_periods²`, and the peak width shrinks as
    /// `1 / n_periods`.
    pub fn undulator_flux(&self, bfield: f64, period: f64, n_periods: f64, beam_energy_gev: f64,
                          angle_v: f64, angle_h: f64, energy_ev: f64) -> Result<f64> {
        let flux = self.undulator_state(bfield, period, n_periods, beam_energy_gev, angle_v, angle_h)?
            .flux_density(energy_ev, self.harmonic_window)?;
        Ok(flux * self.beam_current)
    }

    /// Compute the on-axis photon energy and flux density at the peak of
    /// undulator harmonic `harmonic`.
    pub fn undulator_harmonic_peak(&self, bfield: f64, period: f64, n_periods: f64,
                                   beam_energy_gev: f64, harmonic: u32) -> Result<HarmonicPeak> {
        let state = self.undulator_state(bfield, period, n_periods, beam_energy_gev, 0., 0.)?;
        let energy_ev = state.resonance().harmonic_energy(harmonic)?;
        let flux = state.flux_density(energy_ev, self.harmonic_window)? * self.beam_current;

        Ok(HarmonicPeak { harmonic, energy_ev, flux })
    }

    /// Evaluate [`Self::undulator_flux`] over a list of photon energies.
    pub fn undulator_spectrum_over(&self, bfield: f64, period: f64, n_periods: f64,
                                   beam_energy_gev: f64, angle_v: f64, angle_h: f64,
                                   energies_ev: &[f64]) -> Result<Spectrum> {
        let state = self.undulator_state(bfield, period, n_periods, beam_energy_gev, angle_v, angle_h)?;

        energies_ev.iter()
            .map(|&e| -> Result<(f64, f64)> {
                Ok((e, state.flux_density(e, self.harmonic_window)? * self.beam_current))
            })
            .collect()
    }

    /// Evaluate [`Self::undulator_flux`] at one photon energy over a grid of
    /// horizontal angles `angles_h` and vertical angles `angles_v`.
    pub fn undulator_flux_map(&self, bfield: f64, period: f64, n_periods: f64,
                              beam_energy_gev: f64, angles_h: &[f64], angles_v: &[f64],
                              energy_ev: f64) -> Result<FluxMap> {
        FluxMap::from_fn(angles_h, angles_v, |angle_h, angle_v| {
            self.undulator_flux(bfield, period, n_periods, beam_energy_gev, angle_v, angle_h, energy_ev)
        })
    }

    fn undulator_state(&self, bfield: f64, period: f64, n_periods: f64, beam_energy_gev: f64,
                       angle_v: f64, angle_h: f64) -> Result<undulator::UndulatorState<'_>> {
        let resonance = undulator::Resonance::new(&self.constants, bfield, period, beam_energy_gev,
                                                  angle_v, angle_h)?;
        undulator::UndulatorState::new(&self.constants, &self.logger, resonance, n_periods)
    }
}


/// Compute the undulator deflection parameter with a default calculator.
/// See [`RadiationCalculator::undulator_k`].
pub fn undulator_k(bfield_max: f64, period: f64) -> Result<f64> {
    RadiationCalculator::new().undulator_k(bfield_max, period)
}

/// Compute a bending-magnet flux density for a 1 A beam. See
/// [`RadiationCalculator::dipole_spectrum`].
pub fn dipole_spectrum(bfield: f64, beam_energy_gev: f64, angle: f64, energy_ev: f64) -> Result<f64> {
    RadiationCalculator::new().dipole_spectrum(bfield, beam_energy_gev, angle, energy_ev)
}

/// Compute an undulator flux density for a 1 A beam. See
/// [`RadiationCalculator::undulator_flux`].
pub fn undulator_flux(bfield: f64, period: f64, n_periods: f64, beam_energy_gev: f64,
                      angle_v: f64, angle_h: f64, energy_ev: f64) -> Result<f64> {
    RadiationCalculator::new().undulator_flux(bfield, period, n_periods, beam_energy_gev,
                                              angle_v, angle_h, energy_ev)
}
