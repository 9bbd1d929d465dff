// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/// Tabulate synchrotron radiation estimates as tab-separated text.
///
/// For instance, `tabulate undulator -b 1 -p 0.02 -n 100 -e 3 --emin 500
/// --emax 8000` prints a spectrum of the first few undulator harmonics.

use clap::{crate_version, value_parser, Arg, ArgAction, ArgMatches, Command};
use sr_estimates::{RadiationCalculator, Result, Spectrum};
use sr_estimates_test_support::{default_log, log_grid};
use std::process;


fn float_arg(name: &'static str, short: char, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .short(short)
        .help(help)
        .value_parser(value_parser!(f64))
        .required(true)
}

fn grid_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("emin")
            .long("emin")
            .help("The lowest photon energy to tabulate, in eV")
            .value_parser(value_parser!(f64))
            .required(true))
        .arg(Arg::new("emax")
             .long("emax")
             .help("The highest photon energy to tabulate, in eV")
             .value_parser(value_parser!(f64))
             .required(true))
        .arg(Arg::new("points")
             .long("points")
             .help("The number of log-spaced photon energies")
             .value_parser(value_parser!(usize))
             .default_value("200"))
}

fn angle_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .value_parser(value_parser!(f64))
        .allow_negative_numbers(true)
        .default_value("0")
}


fn cli() -> Command {
    Command::new("tabulate")
        .version(crate_version!())
        .about("Tabulate closed-form synchrotron radiation estimates")
        .subcommand_required(true)
        .arg(Arg::new("current")
             .long("current")
             .short('I')
             .global(true)
             .help("The beam current, in amperes")
             .value_parser(value_parser!(f64))
             .default_value("1"))
        .arg(Arg::new("verbose")
             .long("verbose")
             .short('v')
             .global(true)
             .help("Log intermediate quantities (needs the max_level_trace feature)")
             .action(ArgAction::SetTrue))
        .subcommand(Command::new("k")
                    .about("Print the undulator deflection parameter")
                    .arg(float_arg("bfield", 'b', "The peak magnetic field, in tesla"))
                    .arg(float_arg("period", 'p', "The undulator period, in meters")))
        .subcommand(grid_args(
            Command::new("dipole")
                .about("Tabulate a bending-magnet spectrum")
                .arg(float_arg("bfield", 'b', "The bending field, in tesla"))
                .arg(float_arg("energy", 'e', "The beam energy, in GeV"))
                .arg(angle_arg("angle", "The vertical observation angle, in radians"))))
        .subcommand(grid_args(
            Command::new("undulator")
                .about("Tabulate a planar undulator spectrum")
                .arg(float_arg("bfield", 'b', "The peak magnetic field, in tesla"))
                .arg(float_arg("period", 'p', "The undulator period, in meters"))
                .arg(float_arg("periods", 'n', "The number of periods"))
                .arg(float_arg("energy", 'e', "The beam energy, in GeV"))
                .arg(angle_arg("angle-v", "The vertical observation angle, in radians"))
                .arg(angle_arg("angle-h", "The horizontal observation angle, in radians"))
                .arg(Arg::new("window")
                     .long("window")
                     .help("How many neighbouring harmonics to sum on each side")
                     .value_parser(value_parser!(u32))
                     .default_value("2"))))
}


fn float(m: &ArgMatches, name: &str) -> f64 {
    // Required or defaulted, so always present.
    *m.get_one::<f64>(name).unwrap()
}

fn energies(m: &ArgMatches) -> Vec<f64> {
    log_grid(float(m, "emin"), float(m, "emax"), *m.get_one::<usize>("points").unwrap())
}

fn print_spectrum(spectrum: &Spectrum) {
    println!("# energy_ev\tflux");

    for (e, f) in spectrum {
        println!("{:.8e}\t{:.8e}", e, f);
    }
}


fn run(matches: &ArgMatches) -> Result<()> {
    let mut calc = RadiationCalculator::new()
        .with_beam_current(float(matches, "current"))?;

    if matches.get_flag("verbose") {
        calc = calc.with_logger(default_log());
    }

    match matches.subcommand() {
        Some(("k", m)) => {
            println!("{:.16e}", calc.undulator_k(float(m, "bfield"), float(m, "period"))?);
        },

        Some(("dipole", m)) => {
            let (b, e) = (float(m, "bfield"), float(m, "energy"));
            println!("# critical energy: {:.6e} eV", calc.dipole_critical_energy(b, e)?);
            print_spectrum(&calc.dipole_spectrum_over(b, e, float(m, "angle"), &energies(m))?);
        },

        Some(("undulator", m)) => {
            calc = calc.with_harmonic_window(*m.get_one::<u32>("window").unwrap());
            let (b, p, n, e) = (float(m, "bfield"), float(m, "period"), float(m, "periods"),
                                float(m, "energy"));
            let (av, ah) = (float(m, "angle-v"), float(m, "angle-h"));

            println!("# K = {:.6}", calc.undulator_k(b, p)?);
            println!("# fundamental: {:.6e} eV", calc.undulator_harmonic_energy(b, p, e, av, ah, 1)?);
            print_spectrum(&calc.undulator_spectrum_over(b, p, n, e, av, ah, &energies(m))?);
        },

        _ => unreachable!(),
    }

    Ok(())
}


fn main() {
    let matches = cli().get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
