// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/*! Bessel functions needed by the radiation formulae.

The heavy lifting is done by Cephes through the `special_fun` crate. Cephes
provides the first-kind functions `J_ν` and `I_ν` for real order, but only
offers the modified function of the second kind, `K_n`, for integer order.
The bending-magnet spectrum needs `K_1/3` and `K_2/3`, so we build them from
the reflection formula

```text
K_ν(x) = π/2 (I_{-ν}(x) - I_ν(x)) / sin(νπ)
```

The two `I` terms both grow like `e^x` while their difference decays like
`e^{-x}`, so the reflection loses roughly `2x / ln(10)` digits to
cancellation. Above `ASYMPTOTIC_THRESHOLD` we switch to the Hankel
asymptotic expansion, whose smallest term there is below one part in 10^8
and which only gets better with growing `x`. The two error budgets are
about equal at the crossover.

Near zero `K_ν` diverges like `x^{-ν}`, so the radiation formulae work with
`x K_ν(x)` instead, which goes to zero and is evaluated from the leading
terms of the series below `SMALL_ARGUMENT`.

Cephes reports underflows in `J_ν` by printing to standard output, so the
sums over `J_n` stay within the orders that `significant_order` says are
worth evaluating.

*/

use special_fun::FloatSpecial;
use std::f64;
use std::f64::consts::PI;


/// Where we switch from the reflection formula to the asymptotic series.
const ASYMPTOTIC_THRESHOLD: f64 = 8.;

/// Cap on the number of asymptotic terms. The series is summed only until
/// its terms stop shrinking, which happens well before this.
const MAX_ASYMPTOTIC_TERMS: usize = 64;

/// Below this argument `x K_ν(x)` comes from the two leading series terms,
/// which are good to `O(x²)`.
const SMALL_ARGUMENT: f64 = 1e-6;

/// Power-series bounds on `J_n(x)` below this are negligible.
const LN_NEGLIGIBLE: f64 = -69.; // about 1e-30

/// Past the turning point `n ≈ x`, `J_n(x)` decays like an Airy function
/// over a scale of `x^{1/3}`. Twelve of those scales take it down by about
/// 1e-17.
const TURNING_POINT_WIDTHS: f64 = 12.;
const ORDER_MARGIN: f64 = 12.;


/// Compute the modified Bessel function of the second kind, `K_ν(x)`, for a
/// fractional order `0 < ν < 1` and argument `x > 0`.
///
/// At `x = 0` the function diverges; callers are expected to guard against
/// that case themselves since the physically meaningful limit depends on
/// what is multiplying it.
pub fn bessel_k_fractional(nu: f64, x: f64) -> f64 {
    if x >= ASYMPTOTIC_THRESHOLD {
        bessel_k_asymptotic(nu, x)
    } else {
        0.5 * PI * (x.besseli(-nu) - x.besseli(nu)) / (nu * PI).sin()
    }
}


/// Compute `x K_ν(x)` for `0 < ν < 1` and `x ≥ 0`. Unlike `K_ν` itself
/// this is finite everywhere, vanishing at `x = 0`.
pub fn scaled_bessel_k_fractional(nu: f64, x: f64) -> f64 {
    if x == 0. {
        return 0.;
    }

    if x >= SMALL_ARGUMENT {
        return x * bessel_k_fractional(nu, x);
    }

    // The reflection formula with the leading term of each I, multiplied
    // through by x so that nothing overflows.
    // Halving x first would lose the smallest subnormals.
    let lead = 2. * 0.5_f64.powf(1. - nu) * x.powf(1. - nu) / (1. - nu).gamma();
    let next = x * 0.5_f64.powf(nu) * x.powf(nu) / (1. + nu).gamma();
    0.5 * PI * (lead - next) / (nu * PI).sin()
}


/// The Hankel expansion
///
/// ```text
/// K_ν(x) ~ sqrt(π / 2x) e^{-x} Σ_k a_k(ν) / x^k
/// a_k(ν) = (4ν² - 1)(4ν² - 9)...(4ν² - (2k-1)²) / (k! 8^k)
/// ```
///
/// The series is asymptotic, so we stop at the smallest term.
fn bessel_k_asymptotic(nu: f64, x: f64) -> f64 {
    let mu = 4. * nu * nu;
    let mut term = 1_f64;
    let mut sum = 1_f64;

    for k in 1..MAX_ASYMPTOTIC_TERMS {
        let odd = (2 * k - 1) as f64;
        let next = term * (mu - odd * odd) / (8. * k as f64 * x);

        if next.abs() >= term.abs() {
            break;
        }

        term = next;
        sum += term;

        if term.abs() < f64::EPSILON * sum.abs() {
            break;
        }
    }

    (PI / (2. * x)).sqrt() * (-x).exp() * sum
}


/// Compute the Bessel function of the first kind, `J_n(x)`, for any integer
/// order and any real argument.
///
/// Cephes wants a non-negative order and argument, so we apply
/// `J_{-n}(x) = (-1)^n J_n(x)` and `J_n(-x) = (-1)^n J_n(x)` ourselves.
#[allow(non_snake_case)]
pub fn Jn(n: i64, x: f64) -> f64 {
    let m = n.abs();

    if x == 0. {
        return if m == 0 { 1. } else { 0. };
    }

    let odd = m % 2 == 1;
    let mut sign = 1.;

    if n < 0 && odd {
        sign = -sign;
    }

    if x < 0. && odd {
        sign = -sign;
    }

    sign * x.abs().besselj(m as f64)
}


/// The highest order `n` for which `J_n(x)` is worth evaluating. Beyond it
/// the value is negligible and falls off monotonically with `n`.
///
/// We take the smaller of two limits. One is the power-series bound
/// `|J_n(x)| ≤ (x/2)^n / n!`, which is tight for small `x`; the other is a
/// fixed number of Airy widths past the turning point, for large `x`.
pub fn significant_order(x: f64) -> i64 {
    let x = x.abs();

    if x == 0. {
        return 0;
    }

    let airy_limit = (x + TURNING_POINT_WIDTHS * x.cbrt() + ORDER_MARGIN).ceil();
    let ln_half_x = (0.5 * x).ln();
    let mut order = 0_f64;
    let mut ln_bound = 0_f64;

    loop {
        let next = order + 1.;

        if next > airy_limit {
            break;
        }

        let next_ln_bound = ln_bound + ln_half_x - next.ln();

        if next > x && next_ln_bound < LN_NEGLIGIBLE {
            break;
        }

        order = next;
        ln_bound = next_ln_bound;
    }

    order as i64
}
