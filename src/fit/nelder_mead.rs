//! Nelder–Mead simplex minimization.
//!
//! The fit objective is a black box (it runs a density-matrix simulation per
//! sweep angle), so we use a derivative-free simplex search:
//!
//! 1. initialize a simplex of n+1 vertices around the starting point
//! 2. order vertices by objective value
//! 3. try reflection, then expansion / contraction, else shrink toward best
//! 4. stop when the simplex diameter and objective spread fall below tolerance
//!
//! The search is deterministic given the same starting point and objective.
//! There is no convergence guarantee beyond local behavior; result quality
//! depends on the initial guess.

use crate::error::AppError;

/// Simplex search settings.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    pub max_iters: usize,
    /// Convergence tolerance on the simplex diameter (max distance to best vertex).
    pub x_tol: f64,
    /// Convergence tolerance on the spread of objective values across vertices.
    pub f_tol: f64,
    /// Reflection coefficient.
    pub alpha: f64,
    /// Expansion coefficient.
    pub gamma: f64,
    /// Contraction coefficient.
    pub rho: f64,
    /// Shrink coefficient.
    pub sigma: f64,
    /// Absolute perturbation used to build the initial simplex.
    pub init_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iters: 400,
            x_tol: 1e-5,
            f_tol: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            init_step: 0.05,
        }
    }
}

/// Result of a simplex search.
#[derive(Debug, Clone)]
pub struct Minimum {
    pub x: Vec<f64>,
    pub fval: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub converged: bool,
}

/// Minimize `f` starting from `x0`.
pub fn minimize<F>(f: F, x0: &[f64], cfg: &NelderMeadConfig) -> Result<Minimum, AppError>
where
    F: Fn(&[f64]) -> f64,
{
    if x0.is_empty() {
        return Err(AppError::new(2, "Empty starting point for minimization."));
    }
    if cfg.max_iters == 0 {
        return Err(AppError::new(2, "max_iters must be > 0."));
    }

    let n = x0.len();
    let mut evaluations = 0usize;
    let mut eval = |x: &[f64]| {
        evaluations += 1;
        let v = f(x);
        if v.is_nan() { f64::INFINITY } else { v }
    };

    // Initial simplex: x0 plus one vertex per dimension, offset by init_step.
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(x0.to_vec());
    for i in 0..n {
        let mut vertex = x0.to_vec();
        vertex[i] += cfg.init_step;
        simplex.push(vertex);
    }
    let mut fvals: Vec<f64> = simplex.iter().map(|v| eval(v)).collect();

    let mut iterations = 0usize;
    let mut converged = false;

    while iterations < cfg.max_iters {
        // Order vertices by objective value (best first).
        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| fvals[a].partial_cmp(&fvals[b]).unwrap_or(std::cmp::Ordering::Equal));

        let best = order[0];
        let worst = order[n];
        let second_worst = order[n - 1];

        if simplex_diameter(&simplex, best) < cfg.x_tol
            && (fvals[worst] - fvals[best]).abs() < cfg.f_tol
        {
            converged = true;
            break;
        }

        // Centroid of all vertices except the worst.
        let mut centroid = vec![0.0; n];
        for &i in &order[..n] {
            for (c, v) in centroid.iter_mut().zip(simplex[i].iter()) {
                *c += v;
            }
        }
        for c in centroid.iter_mut() {
            *c /= n as f64;
        }

        let reflected = affine(&centroid, &simplex[worst], -cfg.alpha);
        let f_reflected = eval(&reflected);

        if f_reflected < fvals[best] {
            // The reflected point is the new best; try going further.
            let expanded = affine(&centroid, &reflected, cfg.gamma);
            let f_expanded = eval(&expanded);
            if f_expanded < f_reflected {
                simplex[worst] = expanded;
                fvals[worst] = f_expanded;
            } else {
                simplex[worst] = reflected;
                fvals[worst] = f_reflected;
            }
        } else if f_reflected < fvals[second_worst] {
            simplex[worst] = reflected;
            fvals[worst] = f_reflected;
        } else {
            // Contract toward the better of (worst, reflected).
            let contracted = if f_reflected < fvals[worst] {
                affine(&centroid, &reflected, cfg.rho)
            } else {
                affine(&centroid, &simplex[worst], cfg.rho)
            };
            let f_contracted = eval(&contracted);

            if f_contracted < fvals[worst].min(f_reflected) {
                simplex[worst] = contracted;
                fvals[worst] = f_contracted;
            } else {
                // Shrink all vertices toward the best.
                let anchor = simplex[best].clone();
                for i in 0..=n {
                    if i == best {
                        continue;
                    }
                    for (v, a) in simplex[i].iter_mut().zip(anchor.iter()) {
                        *v = a + cfg.sigma * (*v - a);
                    }
                    fvals[i] = eval(&simplex[i]);
                }
            }
        }

        iterations += 1;
    }

    // Return the best vertex regardless of how we stopped.
    let best = (0..=n)
        .min_by(|&a, &b| fvals[a].partial_cmp(&fvals[b]).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or(0);

    if !fvals[best].is_finite() {
        return Err(AppError::new(4, "Minimization produced a non-finite objective value."));
    }

    Ok(Minimum {
        x: simplex[best].clone(),
        fval: fvals[best],
        iterations,
        evaluations,
        converged,
    })
}

/// `centroid + t * (point - centroid)`, the simplex move primitive.
fn affine(centroid: &[f64], point: &[f64], t: f64) -> Vec<f64> {
    centroid
        .iter()
        .zip(point.iter())
        .map(|(&c, &p)| c + t * (p - c))
        .collect()
}

fn simplex_diameter(simplex: &[Vec<f64>], best: usize) -> f64 {
    let anchor = &simplex[best];
    simplex
        .iter()
        .map(|v| {
            v.iter()
                .zip(anchor.iter())
                .map(|(a, b)| (a - b) * (a - b))
                .sum::<f64>()
                .sqrt()
        })
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimizes_shifted_quadratic() {
        let f = |x: &[f64]| (x[0] - 1.5).powi(2) + (x[1] + 2.0).powi(2);
        let cfg = NelderMeadConfig {
            max_iters: 500,
            ..NelderMeadConfig::default()
        };
        let min = minimize(f, &[0.0, 0.0], &cfg).unwrap();
        assert!(min.converged, "should converge on a smooth quadratic");
        assert!((min.x[0] - 1.5).abs() < 1e-3, "x0={}", min.x[0]);
        assert!((min.x[1] + 2.0).abs() < 1e-3, "x1={}", min.x[1]);
        assert!(min.fval < 1e-6);
    }

    #[test]
    fn respects_flat_penalty_wall() {
        // A wall at x<0 mimicking the objective's soft constraint; the search
        // must settle near the boundary minimum rather than diverge.
        let f = |x: &[f64]| {
            if x[0] < 0.0 {
                1000.0
            } else {
                x[0] + 1.0
            }
        };
        let cfg = NelderMeadConfig {
            max_iters: 1000,
            ..NelderMeadConfig::default()
        };
        let min = minimize(f, &[0.3], &cfg).unwrap();
        assert!(min.x[0] >= 0.0);
        assert!(min.x[0] < 0.05, "x={}", min.x[0]);
    }

    #[test]
    fn rejects_empty_start() {
        assert!(minimize(|_| 0.0, &[], &NelderMeadConfig::default()).is_err());
    }

    #[test]
    fn iteration_cap_reports_not_converged() {
        let f = |x: &[f64]| (x[0] - 4.0).powi(2);
        let cfg = NelderMeadConfig {
            max_iters: 2,
            ..NelderMeadConfig::default()
        };
        let min = minimize(f, &[0.0], &cfg).unwrap();
        assert!(!min.converged);
        assert_eq!(min.iterations, 2);
    }
}
