use crate::error::{GenerateError, SimplifyError};
use crate::expr::Expr;
use crate::simplify::{Simplifier, SimplifierConfig};
use crate::symbol::Symbol;
use log::trace;
use nalgebra::SMatrix;

/// How matrix elements are addressed in the generated code.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum IndexStyle {
    /// Row-major flat indexing, e.g. `P[8]` for row 1, column 1 of a 7×7 matrix.
    #[default]
    Flat,
    /// Two-dimensional indexing, e.g. `P[1][1]`. Vectors keep a single index.
    RowColumn,
}

/// Renders expressions as C-style arithmetic.
///
/// Only `+`, `-`, `*` and parentheses are used; powers are written out as
/// repeated multiplication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpressionWriter {
    index_style: IndexStyle,
    float_suffix: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Position {
    Term,
    Factor,
}

impl ExpressionWriter {
    pub fn new(index_style: IndexStyle, float_suffix: impl Into<String>) -> Self {
        Self {
            index_style,
            float_suffix: float_suffix.into(),
        }
    }

    /// Renders the expression.
    pub fn render(&self, expr: &Expr) -> String {
        let mut out = String::new();
        self.render_into(expr, Position::Term, &mut out);
        out
    }

    /// Renders a symbol in the configured index style.
    pub fn render_symbol(&self, symbol: Symbol) -> String {
        match (self.index_style, symbol) {
            (IndexStyle::RowColumn, Symbol::Covariance(r, c) | Symbol::ProcessNoise(r, c)) => {
                format!("{}[{r}][{c}]", symbol.base_name())
            }
            _ => symbol.to_string(),
        }
    }

    /// Renders a numeric constant; the result always carries a decimal point.
    pub fn render_constant(&self, value: f64) -> String {
        let digits = if value.fract() == 0.0 && value.abs() < 1e16 {
            format!("{value:.1}")
        } else {
            format!("{value}")
        };
        digits + &self.float_suffix
    }

    /// Renders the assignment target `destination[..]` for an entry of a
    /// matrix with `cols` columns.
    pub fn render_target(&self, destination: &str, row: usize, col: usize, cols: usize) -> String {
        match self.index_style {
            IndexStyle::Flat => format!("{destination}[{}]", row * cols + col),
            IndexStyle::RowColumn if cols == 1 => format!("{destination}[{row}]"),
            IndexStyle::RowColumn => format!("{destination}[{row}][{col}]"),
        }
    }

    fn render_into(&self, expr: &Expr, position: Position, out: &mut String) {
        match expr {
            Expr::Constant(c) => {
                let text = self.render_constant(*c);
                self.push_wrapped(text, position == Position::Factor && *c < 0.0, out);
            }
            Expr::Symbol(s) => out.push_str(&self.render_symbol(*s)),
            Expr::Sum(terms) => {
                let mut text = String::new();
                self.render_sum(terms, &mut text);
                self.push_wrapped(text, position == Position::Factor, out);
            }
            Expr::Product(factors) => {
                let mut text = String::new();
                self.render_product(factors, &mut text);
                let negative = text.starts_with('-');
                self.push_wrapped(text, position == Position::Factor && negative, out);
            }
            Expr::Power(base, exponent) => {
                for i in 0..*exponent {
                    if i > 0 {
                        out.push('*');
                    }
                    self.render_into(base, Position::Factor, out);
                }
            }
        }
    }

    fn render_sum(&self, terms: &[Expr], out: &mut String) {
        for (i, term) in terms.iter().enumerate() {
            let (negative, magnitude) = split_sign(term);
            match (i, negative) {
                (0, true) => out.push('-'),
                (0, false) => {}
                (_, true) => out.push_str(" - "),
                (_, false) => out.push_str(" + "),
            }
            self.render_into(&magnitude, Position::Term, out);
        }
    }

    fn render_product(&self, factors: &[Expr], out: &mut String) {
        let factors = match factors.first() {
            Some(Expr::Constant(c)) if *c == -1.0 => {
                out.push('-');
                &factors[1..]
            }
            Some(Expr::Constant(c)) if *c == 1.0 => &factors[1..],
            Some(Expr::Constant(c)) => {
                out.push_str(&self.render_constant(*c));
                if factors.len() > 1 {
                    out.push('*');
                }
                &factors[1..]
            }
            _ => factors,
        };

        for (i, factor) in factors.iter().enumerate() {
            if i > 0 {
                out.push('*');
            }
            self.render_into(factor, Position::Factor, out);
        }
    }

    fn push_wrapped(&self, text: String, wrap: bool, out: &mut String) {
        if wrap {
            out.push('(');
            out.push_str(&text);
            out.push(')');
        } else {
            out.push_str(&text);
        }
    }
}

/// Splits a negative coefficient off a term so it can be written as a subtraction.
fn split_sign(term: &Expr) -> (bool, Expr) {
    match term {
        Expr::Constant(c) if *c < 0.0 => (true, Expr::constant(-c)),
        Expr::Product(factors) => match factors.first() {
            Some(Expr::Constant(c)) if *c < 0.0 => {
                let mut positive = Vec::with_capacity(factors.len());
                positive.push(Expr::constant(-c));
                positive.extend(factors[1..].iter().cloned());
                (true, Expr::product(positive))
            }
            _ => (false, term.clone()),
        },
        _ => (false, term.clone()),
    }
}

/// Configuration of the [`CodeEmitter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitterConfig {
    /// How matrix elements are addressed.
    pub index_style: IndexStyle,
    /// Appended to every numeric constant, e.g. `F` for C `float` literals.
    pub float_suffix: String,
    /// The simplification applied to every entry, or `None` to emit the fully
    /// expanded form.
    pub simplifier: Option<SimplifierConfig>,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            index_style: IndexStyle::Flat,
            float_suffix: String::new(),
            simplifier: Some(SimplifierConfig::default()),
        }
    }
}

impl EmitterConfig {
    pub fn with_index_style(mut self, index_style: IndexStyle) -> Self {
        self.index_style = index_style;
        self
    }

    pub fn with_float_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.float_suffix = suffix.into();
        self
    }

    pub fn with_simplifier(mut self, config: SimplifierConfig) -> Self {
        self.simplifier = Some(config);
        self
    }

    pub fn without_simplification(mut self) -> Self {
        self.simplifier = None;
        self
    }
}

/// Turns symbolic matrices into blocks of C-style assignment statements.
#[derive(Debug, Clone)]
pub struct CodeEmitter {
    writer: ExpressionWriter,
    simplifier: Option<Simplifier>,
}

impl CodeEmitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self {
            writer: ExpressionWriter::new(config.index_style, config.float_suffix),
            simplifier: config.simplifier.map(Simplifier::new),
        }
    }

    /// Emits one `destination[index] = expr;` line per entry in row-major
    /// order, preceded by a `// comment` line.
    pub fn emit<const R: usize, const C: usize>(
        &self,
        destination: &str,
        comment: &str,
        matrix: &SMatrix<Expr, R, C>,
    ) -> Result<String, GenerateError> {
        let mut block = format!("// {comment}\n");
        for row in 0..R {
            for col in 0..C {
                let index = row * C + col;
                let rhs = self
                    .prepare(&matrix[(row, col)])
                    .map_err(|source| GenerateError::Simplify {
                        destination: destination.to_string(),
                        index,
                        source,
                    })?;

                let target = self.writer.render_target(destination, row, col, C);
                let statement = format!("{target} = {};", self.writer.render(&rhs));
                trace!("{statement}");

                block.push_str(&statement);
                block.push('\n');
            }
        }
        Ok(block)
    }

    fn prepare(&self, entry: &Expr) -> Result<Expr, SimplifyError> {
        match &self.simplifier {
            Some(simplifier) => simplifier.simplify(entry),
            None => Ok(entry.expand().to_expr()),
        }
    }
}

impl Default for CodeEmitter {
    fn default() -> Self {
        Self::new(EmitterConfig::default())
    }
}
