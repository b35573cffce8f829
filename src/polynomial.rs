use crate::expr::Expr;
use crate::num_traits::Evaluable;
use crate::symbol::Symbol;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// A product of symbols raised to positive integer powers.
///
/// Factors are kept sorted by symbol and every exponent is at least one,
/// so two monomials are equal exactly when they denote the same product.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Monomial {
    factors: Vec<(Symbol, u32)>,
}

impl Monomial {
    /// The empty product.
    pub const fn one() -> Self {
        Self {
            factors: Vec::new(),
        }
    }

    /// A single symbol to the first power.
    pub fn symbol(symbol: Symbol) -> Self {
        Self {
            factors: vec![(symbol, 1)],
        }
    }

    /// The sorted `(symbol, exponent)` factors.
    pub fn factors(&self) -> &[(Symbol, u32)] {
        &self.factors
    }

    /// The exponent of `symbol` in this monomial, zero if absent.
    pub fn exponent_of(&self, symbol: Symbol) -> u32 {
        self.factors
            .binary_search_by(|(s, _)| s.cmp(&symbol))
            .map(|i| self.factors[i].1)
            .unwrap_or(0)
    }

    /// Returns this monomial with `symbol` removed entirely.
    fn without(&self, symbol: Symbol) -> Self {
        Self {
            factors: self
                .factors
                .iter()
                .copied()
                .filter(|(s, _)| *s != symbol)
                .collect(),
        }
    }

    fn multiply(&self, rhs: &Monomial) -> Monomial {
        let mut factors = Vec::with_capacity(self.factors.len() + rhs.factors.len());
        let (mut i, mut j) = (0, 0);
        while i < self.factors.len() && j < rhs.factors.len() {
            let (ls, le) = self.factors[i];
            let (rs, re) = rhs.factors[j];
            match ls.cmp(&rs) {
                core::cmp::Ordering::Less => {
                    factors.push((ls, le));
                    i += 1;
                }
                core::cmp::Ordering::Greater => {
                    factors.push((rs, re));
                    j += 1;
                }
                core::cmp::Ordering::Equal => {
                    factors.push((ls, le + re));
                    i += 1;
                    j += 1;
                }
            }
        }
        factors.extend_from_slice(&self.factors[i..]);
        factors.extend_from_slice(&rhs.factors[j..]);
        Monomial { factors }
    }

    fn to_expr(&self) -> Expr {
        self.factors
            .iter()
            .map(|&(s, e)| Expr::symbol(s).pow(e))
            .fold(Expr::constant(1.0), |acc, f| acc * f)
    }
}

/// A polynomial in canonical, fully expanded form.
///
/// Terms are stored in monomial order and terms whose coefficients cancel
/// are removed, so an identically zero polynomial has no terms at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polynomial {
    terms: BTreeMap<Monomial, f64>,
}

impl Polynomial {
    /// The zero polynomial.
    pub fn zero() -> Self {
        Self::default()
    }

    /// A constant polynomial.
    pub fn constant(value: f64) -> Self {
        let mut poly = Self::zero();
        poly.add_term(Monomial::one(), value);
        poly
    }

    /// A polynomial consisting of a single symbol.
    pub fn symbol(symbol: Symbol) -> Self {
        let mut poly = Self::zero();
        poly.add_term(Monomial::symbol(symbol), 1.0);
        poly
    }

    /// Returns `true` if no term survived expansion.
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// The number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if the polynomial has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterates the `(monomial, coefficient)` terms in canonical order.
    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, f64)> {
        self.terms.iter().map(|(m, c)| (m, *c))
    }

    /// The coefficient of the given monomial, zero if absent.
    pub fn coefficient(&self, monomial: &Monomial) -> f64 {
        self.terms.get(monomial).copied().unwrap_or(0.0)
    }

    /// Adds `coefficient · monomial`, dropping the term if it cancels.
    pub fn add_term(&mut self, monomial: Monomial, coefficient: f64) {
        if coefficient == 0.0 {
            return;
        }
        match self.terms.entry(monomial) {
            Entry::Vacant(entry) => {
                entry.insert(coefficient);
            }
            Entry::Occupied(mut entry) => {
                *entry.get_mut() += coefficient;
                if *entry.get() == 0.0 {
                    entry.remove();
                }
            }
        }
    }

    /// Adds another polynomial in place.
    pub fn add_assign(&mut self, rhs: &Polynomial) {
        for (monomial, coefficient) in rhs.terms() {
            self.add_term(monomial.clone(), coefficient);
        }
    }

    /// Multiplies two polynomials.
    pub fn multiply(&self, rhs: &Polynomial) -> Polynomial {
        let mut product = Polynomial::zero();
        for (lm, lc) in self.terms() {
            for (rm, rc) in rhs.terms() {
                product.add_term(lm.multiply(rm), lc * rc);
            }
        }
        product
    }

    /// Multiplies every coefficient by `factor`.
    pub fn scale(&self, factor: f64) -> Polynomial {
        let mut scaled = Polynomial::zero();
        for (monomial, coefficient) in self.terms() {
            scaled.add_term(monomial.clone(), coefficient * factor);
        }
        scaled
    }

    /// Raises the polynomial to a natural power.
    pub fn pow(&self, exponent: u32) -> Polynomial {
        (0..exponent).fold(Polynomial::constant(1.0), |acc, _| acc.multiply(self))
    }

    /// The highest exponent of `symbol` over all terms.
    pub fn degree_in(&self, symbol: Symbol) -> u32 {
        self.terms
            .keys()
            .map(|m| m.exponent_of(symbol))
            .max()
            .unwrap_or(0)
    }

    /// Returns `true` if any term references `symbol`.
    pub fn contains(&self, symbol: Symbol) -> bool {
        self.degree_in(symbol) > 0
    }

    /// The partial derivative with respect to `symbol`.
    pub fn derivative(&self, symbol: Symbol) -> Polynomial {
        let mut derivative = Polynomial::zero();
        for (monomial, coefficient) in self.terms() {
            let exponent = monomial.exponent_of(symbol);
            if exponent == 0 {
                continue;
            }
            let mut reduced = monomial.without(symbol);
            if exponent > 1 {
                reduced = reduced.multiply(&Monomial {
                    factors: vec![(symbol, exponent - 1)],
                });
            }
            derivative.add_term(reduced, coefficient * exponent as f64);
        }
        derivative
    }

    /// Splits the polynomial by the power of `symbol`, i.e. `p = Σ symbolᵏ · pₖ`
    /// where no `pₖ` references `symbol`. Entries are ordered by ascending `k`.
    pub fn split_by_power(&self, symbol: Symbol) -> BTreeMap<u32, Polynomial> {
        let mut parts: BTreeMap<u32, Polynomial> = BTreeMap::new();
        for (monomial, coefficient) in self.terms() {
            let exponent = monomial.exponent_of(symbol);
            parts
                .entry(exponent)
                .or_default()
                .add_term(monomial.without(symbol), coefficient);
        }
        parts
    }

    /// Evaluates the polynomial with the values provided by `lookup`.
    pub fn evaluate<T, F>(&self, lookup: &F) -> T
    where
        T: Evaluable,
        F: Fn(Symbol) -> T,
    {
        self.terms().fold(T::zero(), |acc, (monomial, coefficient)| {
            let product = monomial
                .factors()
                .iter()
                .fold(T::from_coefficient(coefficient), |p, &(s, e)| {
                    let value = lookup(s);
                    (0..e).fold(p, |p, _| p * value)
                });
            acc + product
        })
    }

    /// Converts the polynomial into a flat sum of products in canonical term order.
    pub fn to_expr(&self) -> Expr {
        let terms: Vec<Expr> = self
            .terms()
            .map(|(monomial, coefficient)| Expr::constant(coefficient) * monomial.to_expr())
            .collect();
        Expr::sum(terms)
    }

    /// Groups the terms by the powers of `symbols`, outermost symbol first.
    ///
    /// `p = Σₖ s₀ᵏ · pₖ` is built recursively, each `pₖ` being collected with
    /// respect to the remaining symbols. Symbols the polynomial does not
    /// reference are skipped.
    pub fn collect(&self, symbols: &[Symbol]) -> Expr {
        let Some((&first, rest)) = symbols.split_first() else {
            return self.to_expr();
        };

        if !self.contains(first) {
            return self.collect(rest);
        }

        let parts = self.split_by_power(first);
        let terms: Vec<Expr> = parts
            .into_iter()
            .map(|(exponent, part)| {
                let inner = part.collect(rest);
                if exponent == 0 {
                    inner
                } else {
                    Expr::symbol(first).pow(exponent) * inner
                }
            })
            .collect();
        Expr::sum(terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn x(i: usize) -> Polynomial {
        Polynomial::symbol(Symbol::State(i))
    }

    fn dt() -> Polynomial {
        Polynomial::symbol(Symbol::TimeStep)
    }

    #[test]
    fn test_cancellation_removes_terms() {
        let mut p = x(0).scale(0.5);
        p.add_assign(&x(0).scale(-0.5));
        assert!(p.is_zero());
        assert_eq!(p.len(), 0);
    }

    #[test]
    fn test_multiply_merges_exponents() {
        let p = x(1).multiply(&x(1)).multiply(&dt());
        assert_eq!(p.len(), 1);
        assert_eq!(p.degree_in(Symbol::State(1)), 2);
        assert_eq!(p.degree_in(Symbol::TimeStep), 1);
        assert_eq!(p.degree_in(Symbol::State(0)), 0);
    }

    #[test]
    fn test_binomial_square() {
        // (x0 + x1)² = x0² + 2·x0·x1 + x1²
        let mut sum = x(0);
        sum.add_assign(&x(1));
        let square = sum.pow(2);
        assert_eq!(square.len(), 3);

        let mixed = Monomial::symbol(Symbol::State(0)).multiply(&Monomial::symbol(Symbol::State(1)));
        assert_eq!(square.coefficient(&mixed), 2.0);
    }

    #[test]
    fn test_derivative() {
        // d/dx0 (3·x0²·dT + x1) = 6·x0·dT
        let mut p = x(0).multiply(&x(0)).multiply(&dt()).scale(3.0);
        p.add_assign(&x(1));
        let d = p.derivative(Symbol::State(0));

        let expected = x(0).multiply(&dt()).scale(6.0);
        assert_eq!(d, expected);
        assert!(p.derivative(Symbol::Rate(0)).is_zero());
    }

    #[test]
    fn test_evaluate() {
        let mut p = x(0).multiply(&dt()).scale(0.5);
        p.add_assign(&Polynomial::constant(1.0));
        let value: f64 = p.evaluate(&|s| match s {
            Symbol::State(0) => 4.0,
            Symbol::TimeStep => 0.1,
            _ => 0.0,
        });
        assert_abs_diff_eq!(value, 1.2, epsilon = 1e-12);
    }

    #[test]
    fn test_split_by_power() {
        let mut p = x(0).multiply(&dt());
        p.add_assign(&x(1));
        p.add_assign(&dt().multiply(&dt()));
        let parts = p.split_by_power(Symbol::TimeStep);
        assert_eq!(parts.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(parts[&0], x(1));
        assert_eq!(parts[&1], x(0));
        assert_eq!(parts[&2], Polynomial::constant(1.0));
    }

    #[test]
    fn test_collect_preserves_value() {
        let mut p = x(0).multiply(&dt()).scale(-0.5);
        p.add_assign(&x(1).multiply(&dt()).scale(0.5));
        p.add_assign(&x(2));
        let collected = p.collect(&[Symbol::TimeStep, Symbol::State(0)]);
        assert_eq!(collected.expand(), p);
    }
}
