use crate::error::TypeError;
use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::hash::{Hash, Hasher};

/// A word type.
///
/// Equality is structural and variant-specific: a [`ColoredType`] never equals
/// a [`ComplexType`] even when their skeletons match. Argument and member
/// lists are sorted on construction, so the order in which they were supplied
/// does not affect equality, hashing or the string form.
///
/// The string form is the vocabulary key shared with other tools and is kept
/// exactly as they print it: arguments and combination members are never
/// parenthesized, and colors are quoted only in multi-argument colored types.
/// Different structures can therefore print alike; they still compare unequal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordType {
    Atomic(AtomicType),
    Modal(ModalType),
    Complex(ComplexType),
    Colored(ColoredType),
    Combinator(CombinatorType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomicType {
    name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalType {
    modality: String,
    inner: Box<WordType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexType {
    arguments: Vec<WordType>,
    result: Box<WordType>,
}

/// A complex type whose arguments each carry a color (a dependency label).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColoredType {
    arguments: Vec<WordType>,
    colors: Vec<String>,
    result: Box<WordType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinatorType {
    types: Vec<WordType>,
    combinator: String,
}

impl AtomicType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ModalType {
    pub fn new(inner: WordType, modality: impl Into<String>) -> Self {
        Self {
            modality: modality.into(),
            inner: Box::new(inner),
        }
    }

    pub fn modality(&self) -> &str {
        &self.modality
    }

    pub fn inner(&self) -> &WordType {
        &self.inner
    }
}

impl ComplexType {
    pub fn new(arguments: Vec<WordType>, result: WordType) -> Result<Self, TypeError> {
        if arguments.is_empty() {
            return Err(TypeError::EmptyArguments);
        }
        Ok(Self::sorted(arguments, result))
    }

    fn sorted(mut arguments: Vec<WordType>, result: WordType) -> Self {
        arguments.sort_by_cached_key(WordType::canonical_key);
        Self {
            arguments,
            result: Box::new(result),
        }
    }

    pub fn arguments(&self) -> &[WordType] {
        &self.arguments
    }

    pub fn result(&self) -> &WordType {
        &self.result
    }
}

impl ColoredType {
    pub fn new(
        arguments: Vec<WordType>,
        colors: Vec<String>,
        result: WordType,
    ) -> Result<Self, TypeError> {
        if arguments.is_empty() {
            return Err(TypeError::EmptyArguments);
        }
        if colors.is_empty() {
            return Err(TypeError::EmptyColors);
        }
        if arguments.len() != colors.len() {
            return Err(TypeError::ColorCountMismatch {
                arguments: arguments.len(),
                colors: colors.len(),
            });
        }

        // Arguments and colors are sorted as pairs so each argument keeps its color.
        let mut pairs: Vec<(WordType, String)> = arguments.into_iter().zip(colors).collect();
        pairs.sort_by_cached_key(|(arg, color)| {
            let (mut key, structure) = arg.canonical_key();
            key.push_str(&quoted(color));
            (key, structure, color.clone())
        });
        let (arguments, colors) = pairs.into_iter().unzip();

        Ok(Self {
            arguments,
            colors,
            result: Box::new(result),
        })
    }

    pub fn arguments(&self) -> &[WordType] {
        &self.arguments
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn result(&self) -> &WordType {
        &self.result
    }

    /// Argument/color pairs in canonical order.
    pub fn colored_arguments(&self) -> impl Iterator<Item = (&WordType, &str)> {
        self.arguments
            .iter()
            .zip(self.colors.iter().map(String::as_str))
    }
}

impl CombinatorType {
    pub fn new(types: Vec<WordType>, combinator: impl Into<String>) -> Result<Self, TypeError> {
        if types.is_empty() {
            return Err(TypeError::EmptyCombinator);
        }
        Ok(Self::sorted(types, combinator.into()))
    }

    fn sorted(mut types: Vec<WordType>, combinator: String) -> Self {
        types.sort_by_cached_key(WordType::canonical_key);
        Self { types, combinator }
    }

    pub fn types(&self) -> &[WordType] {
        &self.types
    }

    pub fn combinator(&self) -> &str {
        &self.combinator
    }
}

impl WordType {
    pub fn atomic(name: impl Into<String>) -> Self {
        WordType::Atomic(AtomicType::new(name))
    }

    pub fn modal(inner: WordType, modality: impl Into<String>) -> Self {
        WordType::Modal(ModalType::new(inner, modality))
    }

    pub fn complex(arguments: Vec<WordType>, result: WordType) -> Result<Self, TypeError> {
        ComplexType::new(arguments, result).map(WordType::Complex)
    }

    pub fn colored(
        arguments: Vec<WordType>,
        colors: Vec<String>,
        result: WordType,
    ) -> Result<Self, TypeError> {
        ColoredType::new(arguments, colors, result).map(WordType::Colored)
    }

    pub fn combinator(types: Vec<WordType>, combinator: impl Into<String>) -> Result<Self, TypeError> {
        CombinatorType::new(types, combinator).map(WordType::Combinator)
    }

    /// Number of argument slots, computed from the structure.
    pub fn arity(&self) -> usize {
        match self {
            WordType::Atomic(_) => 0,
            WordType::Modal(m) => m.inner.arity(),
            WordType::Complex(c) => 1 + max_arity(&c.arguments) + c.result.arity(),
            WordType::Colored(c) => 1 + max_arity(&c.arguments) + c.result.arity(),
            WordType::Combinator(c) => max_arity(&c.types),
        }
    }

    /// Erases all colors, keeping the structure. Atomic types map to themselves.
    pub fn decolor(&self) -> WordType {
        match self {
            WordType::Atomic(_) => self.clone(),
            WordType::Modal(m) => WordType::modal(m.inner.decolor(), m.modality.clone()),
            WordType::Complex(c) => WordType::Complex(ComplexType::sorted(
                c.arguments.iter().map(WordType::decolor).collect(),
                c.result.decolor(),
            )),
            WordType::Colored(c) => WordType::Complex(ComplexType::sorted(
                c.arguments.iter().map(WordType::decolor).collect(),
                c.result.decolor(),
            )),
            WordType::Combinator(c) => WordType::Combinator(CombinatorType::sorted(
                c.types.iter().map(WordType::decolor).collect(),
                c.combinator.clone(),
            )),
        }
    }

    /// Names of every atomic type reachable from this one.
    pub fn retrieve_atomic(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_atomic(&mut names);
        names
    }

    fn collect_atomic(&self, names: &mut BTreeSet<String>) {
        match self {
            WordType::Atomic(a) => {
                names.insert(a.name.clone());
            }
            WordType::Modal(m) => m.inner.collect_atomic(names),
            WordType::Complex(c) => {
                c.arguments.iter().for_each(|a| a.collect_atomic(names));
                c.result.collect_atomic(names);
            }
            WordType::Colored(c) => {
                c.arguments.iter().for_each(|a| a.collect_atomic(names));
                c.result.collect_atomic(names);
            }
            WordType::Combinator(c) => c.types.iter().for_each(|t| t.collect_atomic(names)),
        }
    }

    pub fn is_atomic(&self) -> bool {
        matches!(self, WordType::Atomic(_))
    }

    pub fn is_colored(&self) -> bool {
        matches!(self, WordType::Colored(_))
    }

    /// Sort key: the string form, then the full structure for types that
    /// print alike.
    fn canonical_key(&self) -> (String, String) {
        (self.to_string(), format!("{:?}", self))
    }
}

fn max_arity(types: &[WordType]) -> usize {
    types.iter().map(WordType::arity).max().unwrap_or(0)
}

/// Quotes `s` the way Python's `repr` quotes a string.
fn quoted(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn write_joined(f: &mut fmt::Formatter<'_>, types: &[WordType], separator: &str) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", ty)?;
    }
    Ok(())
}

impl fmt::Display for WordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordType::Atomic(a) => f.write_str(&a.name),
            WordType::Modal(m) if m.inner.arity() > 0 => write!(f, "{}({})", m.modality, m.inner),
            WordType::Modal(m) => write!(f, "{}{}", m.modality, m.inner),
            WordType::Complex(c) => {
                if let [arg] = c.arguments.as_slice() {
                    write!(f, "{}", arg)?;
                } else {
                    f.write_str("(")?;
                    write_joined(f, &c.arguments, ", ")?;
                    f.write_str(")")?;
                }
                write!(f, " → {}", c.result)
            }
            WordType::Colored(c) => {
                if let ([arg], [color]) = (c.arguments.as_slice(), c.colors.as_slice()) {
                    write!(f, "{{{}: {}}}", arg, color)?;
                } else {
                    f.write_str("(")?;
                    for (i, (arg, color)) in c.colored_arguments().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{{{}: {}}}", arg, quoted(color))?;
                    }
                    f.write_str(")")?;
                }
                write!(f, " → {}", c.result)
            }
            WordType::Combinator(c) => write_joined(f, &c.types, &format!(" {} ", c.combinator)),
        }
    }
}

impl Hash for WordType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl From<AtomicType> for WordType {
    fn from(t: AtomicType) -> Self {
        WordType::Atomic(t)
    }
}

impl From<ModalType> for WordType {
    fn from(t: ModalType) -> Self {
        WordType::Modal(t)
    }
}

impl From<ComplexType> for WordType {
    fn from(t: ComplexType) -> Self {
        WordType::Complex(t)
    }
}

impl From<ColoredType> for WordType {
    fn from(t: ColoredType) -> Self {
        WordType::Colored(t)
    }
}

impl From<CombinatorType> for WordType {
    fn from(t: CombinatorType) -> Self {
        WordType::Combinator(t)
    }
}

/// Folds argument groups around `result` from the right, producing a chain of
/// colored types: `[(X), (Y)]` with colors `[(su), (obj1)]` gives
/// `{X: su} → {Y: obj1} → result`.
pub fn compose(
    base_types: &[Vec<WordType>],
    base_colors: &[Vec<String>],
    result: WordType,
) -> Result<WordType, TypeError> {
    if base_types.len() != base_colors.len() {
        return Err(TypeError::UnevenComposition {
            types: base_types.len(),
            colors: base_colors.len(),
        });
    }

    base_types
        .iter()
        .zip(base_colors)
        .rev()
        .try_fold(result, |acc, (arguments, colors)| {
            WordType::colored(arguments.clone(), colors.clone(), acc)
        })
}

pub fn decolor(ty: &WordType) -> WordType {
    ty.decolor()
}

/// Union of the atomic names of several types.
pub fn retrieve_atomic_all<'a>(types: impl IntoIterator<Item = &'a WordType>) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for ty in types {
        ty.collect_atomic(&mut names);
    }
    names
}
