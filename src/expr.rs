use crate::num_traits::Evaluable;
use crate::polynomial::Polynomial;
use crate::symbol::Symbol;
use core::fmt::{Display, Formatter};
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use num_traits::{One, Zero};

/// A symbolic scalar expression.
///
/// Sums and products are n-ary. The constructors [`Expr::sum`] and
/// [`Expr::product`] (and the arithmetic operators, which use them) flatten
/// nested nodes and fold numeric constants, so `0 + e`, `1 · e` and `0 · e`
/// never survive construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric constant.
    Constant(f64),
    /// A symbolic placeholder.
    Symbol(Symbol),
    /// The sum of all terms.
    Sum(Vec<Expr>),
    /// The product of all factors.
    Product(Vec<Expr>),
    /// A base raised to a natural power of at least two.
    Power(Box<Expr>, u32),
}

impl Expr {
    /// A numeric constant.
    #[inline(always)]
    pub const fn constant(value: f64) -> Self {
        Expr::Constant(value)
    }

    /// A symbolic placeholder.
    #[inline(always)]
    pub const fn symbol(symbol: Symbol) -> Self {
        Expr::Symbol(symbol)
    }

    /// Builds the sum of `terms`, flattening nested sums and folding constants.
    pub fn sum(terms: Vec<Expr>) -> Self {
        let mut constant = 0.0;
        let mut flat = Vec::with_capacity(terms.len());
        for term in terms {
            match term {
                Expr::Constant(c) => constant += c,
                Expr::Sum(inner) => {
                    for t in inner {
                        match t {
                            Expr::Constant(c) => constant += c,
                            other => flat.push(other),
                        }
                    }
                }
                other => flat.push(other),
            }
        }

        if constant != 0.0 {
            flat.push(Expr::Constant(constant));
        }

        match flat.len() {
            0 => Expr::Constant(0.0),
            1 => flat.pop().unwrap_or(Expr::Constant(0.0)),
            _ => Expr::Sum(flat),
        }
    }

    /// Builds the product of `factors`, flattening nested products and folding
    /// constants into a single leading coefficient.
    pub fn product(factors: Vec<Expr>) -> Self {
        let mut coefficient = 1.0;
        let mut flat = Vec::with_capacity(factors.len());
        for factor in factors {
            match factor {
                Expr::Constant(c) => coefficient *= c,
                Expr::Product(inner) => {
                    for f in inner {
                        match f {
                            Expr::Constant(c) => coefficient *= c,
                            other => flat.push(other),
                        }
                    }
                }
                other => flat.push(other),
            }
        }

        if coefficient == 0.0 {
            return Expr::Constant(0.0);
        }

        if flat.is_empty() {
            return Expr::Constant(coefficient);
        }

        if coefficient != 1.0 {
            flat.insert(0, Expr::Constant(coefficient));
        }

        match flat.len() {
            1 => flat.pop().unwrap_or(Expr::Constant(coefficient)),
            _ => Expr::Product(flat),
        }
    }

    /// Raises the expression to a natural power.
    pub fn pow(self, exponent: u32) -> Self {
        match (self, exponent) {
            (_, 0) => Expr::Constant(1.0),
            (base, 1) => base,
            (Expr::Constant(c), e) => Expr::Constant(c.powi(e as i32)),
            (Expr::Power(base, k), e) => Expr::Power(base, k * e),
            (base, e) => Expr::Power(Box::new(base), e),
        }
    }

    /// Expands the expression into canonical polynomial form.
    pub fn expand(&self) -> Polynomial {
        match self {
            Expr::Constant(c) => Polynomial::constant(*c),
            Expr::Symbol(s) => Polynomial::symbol(*s),
            Expr::Sum(terms) => terms.iter().fold(Polynomial::zero(), |mut acc, t| {
                acc.add_assign(&t.expand());
                acc
            }),
            Expr::Product(factors) => factors
                .iter()
                .fold(Polynomial::constant(1.0), |acc, f| acc.multiply(&f.expand())),
            Expr::Power(base, exponent) => base.expand().pow(*exponent),
        }
    }

    /// Evaluates the expression with the values provided by `lookup`.
    pub fn evaluate<T, F>(&self, lookup: &F) -> T
    where
        T: Evaluable,
        F: Fn(Symbol) -> T,
    {
        match self {
            Expr::Constant(c) => T::from_coefficient(*c),
            Expr::Symbol(s) => lookup(*s),
            Expr::Sum(terms) => terms
                .iter()
                .fold(T::zero(), |acc, t| acc + t.evaluate(lookup)),
            Expr::Product(factors) => factors
                .iter()
                .fold(T::one(), |acc, f| acc * f.evaluate(lookup)),
            Expr::Power(base, exponent) => {
                let value = base.evaluate(lookup);
                (0..*exponent).fold(T::one(), |acc, _| acc * value)
            }
        }
    }

    /// Replaces every symbol for which `replacement` returns a value.
    pub fn substitute<F>(&self, replacement: &F) -> Expr
    where
        F: Fn(Symbol) -> Option<Expr>,
    {
        match self {
            Expr::Constant(c) => Expr::Constant(*c),
            Expr::Symbol(s) => replacement(*s).unwrap_or(Expr::Symbol(*s)),
            Expr::Sum(terms) => Expr::sum(terms.iter().map(|t| t.substitute(replacement)).collect()),
            Expr::Product(factors) => {
                Expr::product(factors.iter().map(|f| f.substitute(replacement)).collect())
            }
            Expr::Power(base, exponent) => base.substitute(replacement).pow(*exponent),
        }
    }

    /// The number of binary arithmetic operations needed to compute the
    /// expression as written, with powers counted as repeated multiplication.
    ///
    /// A leading `-1` coefficient is free, as it is written as a sign.
    pub fn operation_count(&self) -> usize {
        match self {
            Expr::Constant(_) | Expr::Symbol(_) => 0,
            Expr::Product(factors) => {
                let negation = matches!(factors.first(), Some(Expr::Constant(c)) if *c == -1.0);
                factors.len().saturating_sub(1 + negation as usize)
                    + factors.iter().map(Expr::operation_count).sum::<usize>()
            }
            Expr::Sum(children) => {
                children.len().saturating_sub(1)
                    + children.iter().map(Expr::operation_count).sum::<usize>()
            }
            Expr::Power(base, exponent) => {
                (*exponent as usize).saturating_sub(1) * (1 + base.operation_count())
            }
        }
    }

    /// Applies the general simplification rules bottom-up.
    ///
    /// Nested sums and products are flattened and constants folded, repeated
    /// symbol factors of a product are merged into powers, and terms of a sum
    /// that differ only by their numeric coefficient are combined.
    pub fn simplified(&self) -> Expr {
        match self {
            Expr::Constant(_) | Expr::Symbol(_) => self.clone(),
            Expr::Power(base, exponent) => base.simplified().pow(*exponent),
            Expr::Product(factors) => {
                let product = Expr::product(factors.iter().map(Expr::simplified).collect());
                merge_symbol_powers(product)
            }
            Expr::Sum(terms) => {
                let sum = Expr::sum(terms.iter().map(Expr::simplified).collect());
                combine_like_terms(sum)
            }
        }
    }

    /// Splits the expression into its numeric coefficient and the remaining factor.
    pub(crate) fn split_coefficient(&self) -> (f64, Expr) {
        match self {
            Expr::Constant(c) => (*c, Expr::Constant(1.0)),
            Expr::Product(factors) => match factors.first() {
                Some(Expr::Constant(c)) => (*c, Expr::product(factors[1..].to_vec())),
                _ => (1.0, self.clone()),
            },
            _ => (1.0, self.clone()),
        }
    }
}

fn merge_symbol_powers(product: Expr) -> Expr {
    let Expr::Product(factors) = product else {
        return product;
    };

    let mut powers: Vec<(Symbol, u32)> = Vec::new();
    let mut others = Vec::new();
    for factor in factors {
        let (symbol, exponent) = match &factor {
            Expr::Symbol(s) => (*s, 1),
            Expr::Power(base, e) => match base.as_ref() {
                Expr::Symbol(s) => (*s, *e),
                _ => {
                    others.push(factor);
                    continue;
                }
            },
            _ => {
                others.push(factor);
                continue;
            }
        };

        match powers.iter_mut().find(|(s, _)| *s == symbol) {
            Some((_, e)) => *e += exponent,
            None => powers.push((symbol, exponent)),
        }
    }

    powers.sort_by_key(|(s, _)| *s);
    let mut merged = Vec::with_capacity(others.len() + powers.len());
    let mut rest = others.into_iter().peekable();
    if let Some(Expr::Constant(_)) = rest.peek() {
        merged.extend(rest.next());
    }
    merged.extend(powers.into_iter().map(|(s, e)| Expr::symbol(s).pow(e)));
    merged.extend(rest);
    Expr::product(merged)
}

fn combine_like_terms(sum: Expr) -> Expr {
    let Expr::Sum(terms) = sum else {
        return sum;
    };

    let mut combined: Vec<(f64, Expr)> = Vec::with_capacity(terms.len());
    for term in terms {
        let (coefficient, rest) = term.split_coefficient();
        match combined.iter_mut().find(|(_, r)| *r == rest) {
            Some((c, _)) => *c += coefficient,
            None => combined.push((coefficient, rest)),
        }
    }

    Expr::sum(
        combined
            .into_iter()
            .filter(|(c, _)| *c != 0.0)
            .map(|(c, rest)| Expr::constant(c) * rest)
            .collect(),
    )
}

impl Zero for Expr {
    #[inline]
    fn zero() -> Self {
        Expr::Constant(0.0)
    }

    /// Structural test; an expression that only cancels after expansion is not detected.
    #[inline]
    fn is_zero(&self) -> bool {
        matches!(self, Expr::Constant(c) if *c == 0.0)
    }
}

impl One for Expr {
    #[inline]
    fn one() -> Self {
        Expr::Constant(1.0)
    }
}

impl From<Symbol> for Expr {
    #[inline]
    fn from(value: Symbol) -> Self {
        Expr::Symbol(value)
    }
}

impl From<f64> for Expr {
    #[inline]
    fn from(value: f64) -> Self {
        Expr::Constant(value)
    }
}

impl Add<Expr> for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Self::Output {
        Expr::sum(vec![self, rhs])
    }
}

impl Sub<Expr> for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Self::Output {
        Expr::sum(vec![self, -rhs])
    }
}

impl Mul<Expr> for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Self::Output {
        Expr::product(vec![self, rhs])
    }
}

impl AddAssign<Expr> for Expr {
    fn add_assign(&mut self, rhs: Expr) {
        let lhs = core::mem::replace(self, Expr::zero());
        *self = lhs + rhs;
    }
}

impl SubAssign<Expr> for Expr {
    fn sub_assign(&mut self, rhs: Expr) {
        let lhs = core::mem::replace(self, Expr::zero());
        *self = lhs - rhs;
    }
}

impl MulAssign<Expr> for Expr {
    fn mul_assign(&mut self, rhs: Expr) {
        let lhs = core::mem::replace(self, Expr::zero());
        *self = lhs * rhs;
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Self::Output {
        Expr::product(vec![Expr::Constant(-1.0), self])
    }
}

/// Renders the expression in C syntax with flat indexing.
impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(&crate::emit::ExpressionWriter::default().render(self))
    }
}
