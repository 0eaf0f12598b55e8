//! Derivative-free minimization for model estimation.
//!
//! A bounded Nelder-Mead simplex search; the SARIMA fit minimizes its
//! conditional sum of squares with this.

/// Tuning knobs for the simplex search.
#[derive(Debug, Clone)]
pub struct SimplexOptions {
    pub max_iter: usize,
    pub tolerance: f64,
    /// Reflection coefficient.
    pub alpha: f64,
    /// Expansion coefficient.
    pub gamma: f64,
    /// Contraction coefficient.
    pub rho: f64,
    /// Shrinkage coefficient.
    pub sigma: f64,
    /// Relative step used to seed the initial simplex.
    pub initial_step: f64,
}

impl Default for SimplexOptions {
    fn default() -> Self {
        Self {
            max_iter: 2000,
            tolerance: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

/// Outcome of a simplex search.
#[derive(Debug, Clone)]
pub struct SimplexOutcome {
    pub point: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Minimize `objective` starting from `initial`, clamping every candidate to
/// `bounds` when given.
pub fn minimize<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    options: SimplexOptions,
) -> SimplexOutcome
where
    F: Fn(&[f64]) -> f64,
{
    let dim = initial.len();
    if dim == 0 {
        return SimplexOutcome {
            point: vec![],
            value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let clamp = |point: &[f64]| -> Vec<f64> {
        match bounds {
            None => point.to_vec(),
            Some(b) => point
                .iter()
                .enumerate()
                .map(|(i, &x)| if i < b.len() { x.clamp(b[i].0, b[i].1) } else { x })
                .collect(),
        }
    };

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
    simplex.push(clamp(initial));
    for i in 0..dim {
        let mut vertex = initial.to_vec();
        let step = if initial[i].abs() > 1e-10 {
            options.initial_step * initial[i].abs()
        } else {
            options.initial_step
        };
        vertex[i] += step;
        simplex.push(clamp(&vertex));
    }

    let mut values: Vec<f64> = simplex.iter().map(|v| objective(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < options.max_iter {
        iterations += 1;

        let mut order: Vec<usize> = (0..=dim).collect();
        order.sort_by(|&a, &b| {
            values[a]
                .partial_cmp(&values[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let best = order[0];
        let worst = order[dim];
        let second_worst = order[dim - 1];

        if values[worst] - values[best] < options.tolerance {
            converged = true;
            break;
        }

        // centroid of everything but the worst vertex
        let mut centroid = vec![0.0; dim];
        for (i, vertex) in simplex.iter().enumerate() {
            if i != worst {
                for (c, x) in centroid.iter_mut().zip(vertex) {
                    *c += x;
                }
            }
        }
        for c in &mut centroid {
            *c /= dim as f64;
        }

        let max_spread = simplex
            .iter()
            .map(|v| {
                v.iter()
                    .zip(&centroid)
                    .map(|(x, c)| (x - c).powi(2))
                    .sum::<f64>()
                    .sqrt()
            })
            .fold(0.0, f64::max);
        if max_spread < options.tolerance {
            converged = true;
            break;
        }

        let blend = |from: &[f64], toward: &[f64], factor: f64| -> Vec<f64> {
            from.iter()
                .zip(toward)
                .map(|(f, t)| f + factor * (t - f))
                .collect()
        };

        // reflection
        let reflected = clamp(&blend(&centroid, &simplex[worst], -options.alpha));
        let reflected_value = objective(&reflected);

        if reflected_value < values[second_worst] && reflected_value >= values[best] {
            simplex[worst] = reflected;
            values[worst] = reflected_value;
            continue;
        }

        if reflected_value < values[best] {
            // expansion
            let expanded = clamp(&blend(&centroid, &reflected, options.gamma));
            let expanded_value = objective(&expanded);
            if expanded_value < reflected_value {
                simplex[worst] = expanded;
                values[worst] = expanded_value;
            } else {
                simplex[worst] = reflected;
                values[worst] = reflected_value;
            }
            continue;
        }

        // contraction, outside toward the reflection or inside toward the
        // worst vertex
        let (target, threshold) = if reflected_value < values[worst] {
            (reflected.clone(), reflected_value)
        } else {
            (simplex[worst].clone(), values[worst])
        };
        let contracted = clamp(&blend(&centroid, &target, options.rho));
        let contracted_value = objective(&contracted);
        if contracted_value <= threshold {
            simplex[worst] = contracted;
            values[worst] = contracted_value;
            continue;
        }

        // shrink toward the best vertex
        let anchor = simplex[best].clone();
        for i in 0..=dim {
            if i != best {
                simplex[i] = clamp(&blend(&anchor, &simplex[i], options.sigma));
                values[i] = objective(&simplex[i]);
            }
        }
    }

    let best = values
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0);

    SimplexOutcome {
        point: simplex[best].clone(),
        value: values[best],
        iterations,
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn quadratic_bowl() {
        let outcome = minimize(
            |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
            &[0.0, 0.0],
            None,
            SimplexOptions::default(),
        );

        assert!(outcome.converged);
        assert_approx_eq!(outcome.point[0], 2.0, 1e-3);
        assert_approx_eq!(outcome.point[1], 3.0, 1e-3);
    }

    #[test]
    fn respects_bounds() {
        // minimum of (x-5)^2 constrained to [0, 3] sits on the boundary
        let outcome = minimize(
            |x| (x[0] - 5.0).powi(2),
            &[1.0],
            Some(&[(0.0, 3.0)]),
            SimplexOptions::default(),
        );
        assert_approx_eq!(outcome.point[0], 3.0, 1e-3);
    }

    #[test]
    fn rosenbrock_valley() {
        let options = SimplexOptions {
            max_iter: 5000,
            tolerance: 1e-10,
            ..Default::default()
        };
        let outcome = minimize(
            |x| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0].powi(2)).powi(2),
            &[0.0, 0.0],
            None,
            options,
        );
        assert_approx_eq!(outcome.point[0], 1.0, 1e-2);
        assert_approx_eq!(outcome.point[1], 1.0, 1e-2);
    }

    #[test]
    fn empty_initial_point() {
        let outcome = minimize(|_| 0.0, &[], None, SimplexOptions::default());
        assert!(!outcome.converged);
        assert!(outcome.value.is_nan());
    }

    #[test]
    fn starting_at_the_optimum() {
        let outcome = minimize(
            |x| (x[0] - 2.0).powi(2),
            &[2.0],
            None,
            SimplexOptions::default(),
        );
        assert!(outcome.converged);
        assert_approx_eq!(outcome.point[0], 2.0, 1e-3);
    }
}
