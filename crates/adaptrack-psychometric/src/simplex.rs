//! Nelder-Mead simplex minimizer.
//!
//! Derivative-free minimization of an arbitrary scalar objective over a small
//! real vector. Coefficients are the standard ones (reflection 1, expansion 2,
//! contraction 0.5, shrink 0.5); the search stops when both the spread of
//! objective values and the spread of vertices fall below tolerance, or when
//! the iteration/evaluation budget of `200 * n` is used up.

use core::cmp::Ordering;

const RHO: f64 = 1.0;
const CHI: f64 = 2.0;
const PSI: f64 = 0.5;
const SIGMA: f64 = 0.5;

const PERTURBATION: f64 = 1.05;
const ZERO_PERTURBATION: f64 = 0.00025;

/// Stopping criteria for [`minimize_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplexOptions {
    pub function_tolerance: f64,
    pub x_tolerance: f64,
    /// Per-dimension budget; the actual caps are this times `n`.
    pub iterations_per_dimension: usize,
    pub evaluations_per_dimension: usize,
}

impl Default for SimplexOptions {
    fn default() -> Self {
        Self {
            function_tolerance: 1e-4,
            x_tolerance: 1e-4,
            iterations_per_dimension: 200,
            evaluations_per_dimension: 200,
        }
    }
}

/// Minimize `f` from `start` with default options. Returns the best vertex.
pub fn minimize<F>(f: F, start: &[f64]) -> Vec<f64>
where
    F: FnMut(&[f64]) -> f64,
{
    minimize_with(f, start, SimplexOptions::default())
}

pub fn minimize_with<F>(mut f: F, start: &[f64], options: SimplexOptions) -> Vec<f64>
where
    F: FnMut(&[f64]) -> f64,
{
    let n = start.len();
    if n == 0 {
        return Vec::new();
    }

    let mut simplex = initial_simplex(start);
    let mut values: Vec<f64> = simplex.iter().map(|v| f(v)).collect();
    sort_by_value(&mut simplex, &mut values);

    let max_evaluations = options.evaluations_per_dimension * n;
    let max_iterations = options.iterations_per_dimension * n;
    let mut evaluations = n + 1;
    let mut iterations = 1;

    while evaluations < max_evaluations && iterations < max_iterations {
        if converged(&simplex, &values, &options) {
            break;
        }

        // Centroid of every vertex but the worst.
        let mut centroid = vec![0.0; n];
        for (i, c) in centroid.iter_mut().enumerate() {
            for vertex in &simplex[..n] {
                *c += vertex[i];
            }
            *c /= n as f64;
        }

        let worst = simplex[n].clone();
        let reflection = affine(&centroid, &worst, 1.0 + RHO, RHO);
        let reflection_value = f(&reflection);
        evaluations += 1;

        if reflection_value < values[0] {
            let expansion = affine(&centroid, &worst, 1.0 + RHO * CHI, RHO * CHI);
            let expansion_value = f(&expansion);
            evaluations += 1;
            if expansion_value < reflection_value {
                simplex[n] = expansion;
                values[n] = expansion_value;
            } else {
                simplex[n] = reflection;
                values[n] = reflection_value;
            }
        } else if reflection_value < values[n - 1] {
            simplex[n] = reflection;
            values[n] = reflection_value;
        } else {
            let shrink = if reflection_value < values[n] {
                let outside = affine(&centroid, &worst, 1.0 + PSI * RHO, PSI * RHO);
                let outside_value = f(&outside);
                evaluations += 1;
                if outside_value <= reflection_value {
                    simplex[n] = outside;
                    values[n] = outside_value;
                    false
                } else {
                    true
                }
            } else {
                let inside: Vec<f64> = centroid
                    .iter()
                    .zip(&worst)
                    .map(|(c, w)| (1.0 - PSI) * c + PSI * w)
                    .collect();
                let inside_value = f(&inside);
                evaluations += 1;
                if inside_value < values[n] {
                    simplex[n] = inside;
                    values[n] = inside_value;
                    false
                } else {
                    true
                }
            };

            if shrink {
                let best = simplex[0].clone();
                for j in 1..=n {
                    for (x, b) in simplex[j].iter_mut().zip(&best) {
                        *x = b + SIGMA * (*x - b);
                    }
                    values[j] = f(&simplex[j]);
                }
                evaluations += n;
            }
        }

        sort_by_value(&mut simplex, &mut values);
        iterations += 1;
    }

    simplex.swap_remove(0)
}

/// `n + 1` vertices: the start, then one vertex per coordinate nudged by 5%
/// (or to a small offset when the coordinate is exactly zero).
fn initial_simplex(start: &[f64]) -> Vec<Vec<f64>> {
    let mut simplex = Vec::with_capacity(start.len() + 1);
    simplex.push(start.to_vec());
    for i in 0..start.len() {
        let mut vertex = start.to_vec();
        if vertex[i] != 0.0 {
            vertex[i] *= PERTURBATION;
        } else {
            vertex[i] = ZERO_PERTURBATION;
        }
        simplex.push(vertex);
    }
    simplex
}

/// `a * centroid - b * worst`, the shared form of reflection, expansion and
/// outside contraction.
fn affine(centroid: &[f64], worst: &[f64], a: f64, b: f64) -> Vec<f64> {
    centroid
        .iter()
        .zip(worst)
        .map(|(c, w)| a * c - b * w)
        .collect()
}

fn converged(simplex: &[Vec<f64>], values: &[f64], options: &SimplexOptions) -> bool {
    let best = &simplex[0];
    let value_range = values[values.len() - 1] - values[0];

    let mut max_delta_x: f64 = 0.0;
    for vertex in &simplex[1..] {
        for (x, b) in vertex.iter().zip(best) {
            max_delta_x = max_delta_x.max((x - b).abs());
        }
    }
    let max_x = best.iter().fold(0.0_f64, |m, &x| m.max(x));

    value_range <= tolerance(options.function_tolerance, values[0])
        && max_delta_x <= tolerance(options.x_tolerance, max_x)
}

/// Tolerance widened to ten ulps of `x` when `x` is large.
fn tolerance(base: f64, x: f64) -> f64 {
    let abs = x.abs();
    let next = f64::from_bits(abs.to_bits() + 1);
    base.max(10.0 * (next - abs))
}

fn sort_by_value(simplex: &mut Vec<Vec<f64>>, values: &mut Vec<f64>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));
    *simplex = order.iter().map(|&i| simplex[i].clone()).collect();
    *values = order.iter().map(|&i| values[i]).collect();
}
