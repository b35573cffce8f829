use crate::error::SimplifyError;
use crate::expr::Expr;
use crate::registry::SymbolRegistry;
use crate::symbol::Symbol;
use log::trace;

/// The default upper bound on the number of terms an expression may expand to.
pub const DEFAULT_MAX_TERMS: usize = 10_000;

/// Configuration of the [`Simplifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplifierConfig {
    /// The symbols to collect terms by, outermost first.
    pub collect_symbols: Vec<Symbol>,
    /// The maximum number of terms an expression may expand to.
    pub max_terms: usize,
}

impl Default for SimplifierConfig {
    /// Collects by the time step first, then by the quaternion components.
    fn default() -> Self {
        let mut collect_symbols = vec![Symbol::TimeStep];
        collect_symbols.extend(SymbolRegistry::quaternion_symbols());
        Self {
            collect_symbols,
            max_terms: DEFAULT_MAX_TERMS,
        }
    }
}

impl SimplifierConfig {
    /// Replaces the collection order.
    pub fn with_collect_symbols<I>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = Symbol>,
    {
        self.collect_symbols = symbols.into_iter().collect();
        self
    }

    /// Replaces the term limit.
    pub fn with_max_terms(mut self, max_terms: usize) -> Self {
        self.max_terms = max_terms;
        self
    }
}

/// Reduces the size of generated expressions.
///
/// The expression is expanded, its terms are grouped by the powers of the
/// configured symbols and the grouped form is cleaned up by the general
/// simplification rules, factoring out coefficients shared by every term of
/// a group.
#[derive(Debug, Clone, Default)]
pub struct Simplifier {
    config: SimplifierConfig,
}

impl Simplifier {
    pub fn new(config: SimplifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimplifierConfig {
        &self.config
    }

    /// Simplifies the expression.
    pub fn simplify(&self, expr: &Expr) -> Result<Expr, SimplifyError> {
        let expanded = expr.expand();
        if expanded.len() > self.config.max_terms {
            return Err(SimplifyError::TooManyTerms {
                terms: expanded.len(),
                limit: self.config.max_terms,
            });
        }

        let collected = expanded.collect(&self.config.collect_symbols);
        let simplified = factor_common_coefficients(&collected.simplified());

        trace!(
            "Simplified {} terms from {} to {} operations",
            expanded.len(),
            expanded.to_expr().operation_count(),
            simplified.operation_count()
        );
        Ok(simplified)
    }
}

/// Pulls a coefficient shared by all terms of a sum in front of it, e.g.
/// `0.5·a - 0.5·b` becomes `0.5·(a - b)` and `-a - b` becomes `-(a + b)`.
///
/// Only applies when all coefficients have the same magnitude, so dividing
/// them out is exact.
fn factor_common_coefficients(expr: &Expr) -> Expr {
    match expr {
        Expr::Constant(_) | Expr::Symbol(_) => expr.clone(),
        Expr::Power(base, exponent) => factor_common_coefficients(base).pow(*exponent),
        Expr::Product(factors) => {
            Expr::product(factors.iter().map(factor_common_coefficients).collect())
        }
        Expr::Sum(terms) => {
            let terms: Vec<Expr> = terms.iter().map(factor_common_coefficients).collect();
            let split: Vec<(f64, Expr)> = terms.iter().map(Expr::split_coefficient).collect();

            let Some(magnitude) = split.first().map(|(c, _)| c.abs()) else {
                return Expr::sum(terms);
            };
            let all_negative = split.iter().all(|(c, _)| *c < 0.0);
            let shared = split.iter().all(|(c, _)| c.abs() == magnitude);
            if !shared || (magnitude == 1.0 && !all_negative) {
                return Expr::sum(terms);
            }

            let common = if all_negative { -magnitude } else { magnitude };
            let inner = split
                .into_iter()
                .map(|(c, rest)| Expr::constant(c / common) * rest)
                .collect();
            Expr::constant(common) * Expr::sum(inner)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::covariance::propagate_registry_covariance;
    use crate::transition::TransitionModel;

    fn x(i: usize) -> Expr {
        Expr::symbol(Symbol::State(i))
    }

    fn w(i: usize) -> Expr {
        Expr::symbol(Symbol::Rate(i))
    }

    fn dt() -> Expr {
        Expr::symbol(Symbol::TimeStep)
    }

    #[test]
    fn test_default_collection_order() {
        let config = SimplifierConfig::default();
        assert_eq!(
            config.collect_symbols,
            vec![
                Symbol::TimeStep,
                Symbol::State(0),
                Symbol::State(1),
                Symbol::State(2),
                Symbol::State(3)
            ]
        );
    }

    #[test]
    fn test_collects_time_step_and_shared_coefficient() {
        // x0 + 0.5·dT·x1·x4 - 0.5·dT·x1·w0 → x0 + 0.5·dT·x1·(x4 - w0)
        let e = x(0) + Expr::constant(0.5) * dt() * x(1) * x(4)
            - Expr::constant(0.5) * dt() * x(1) * w(0);
        let simplified = Simplifier::default().simplify(&e).expect("within limits");

        assert_eq!(simplified.expand(), e.expand());
        assert!(simplified.operation_count() < e.expand().to_expr().operation_count());
        assert_eq!(
            simplified,
            Expr::sum(vec![
                x(0),
                Expr::product(vec![
                    Expr::constant(0.5),
                    dt(),
                    x(1),
                    Expr::sum(vec![x(4), -w(0)])
                ])
            ])
        );
        assert_eq!(simplified.to_string(), "x[0] + 0.5*dT*x[1]*(x[4] - w[0])");
    }

    #[test]
    fn test_preserves_generated_equations() {
        let registry = SymbolRegistry::new();
        let model = TransitionModel::assemble(&registry);
        let px = propagate_registry_covariance(&registry, &model);
        let simplifier = Simplifier::default();

        for e in model.next_state.iter().chain(px.iter()) {
            let simplified = simplifier.simplify(e).expect("within limits");
            assert_eq!(simplified.expand(), e.expand());
            assert!(simplified.operation_count() <= e.expand().to_expr().operation_count());
        }
    }

    #[test]
    fn test_factors_out_shared_negation() {
        let e = -(x(4) * dt()) - w(0) * dt();
        let simplified = Simplifier::default().simplify(&e).expect("within limits");
        assert_eq!(simplified.expand(), e.expand());
        assert_eq!(simplified.to_string(), "-dT*(x[4] + w[0])");
    }

    #[test]
    fn test_term_limit() {
        let e = x(0) + x(1) + x(2);
        let simplifier = Simplifier::new(SimplifierConfig::default().with_max_terms(2));
        assert_eq!(
            simplifier.simplify(&e),
            Err(SimplifyError::TooManyTerms { terms: 3, limit: 2 })
        );
    }

    #[test]
    fn test_without_collection_only_cleans_up() {
        let e = x(1) * x(1) + x(1) * x(1);
        let simplifier =
            Simplifier::new(SimplifierConfig::default().with_collect_symbols(Vec::new()));
        let simplified = simplifier.simplify(&e).expect("within limits");
        assert_eq!(simplified, Expr::constant(2.0) * x(1).pow(2));
    }
}
