//! Reads word types back from their string form, e.g. `({NP: 'su'}, {NP: 'obj1'}) → S`.
//!
//! Modalities and combinators are free-form strings, so the parser has to be
//! told which ones to expect. Arrows associate to the right and bind looser
//! than combinators, which bind looser than modalities.
//!
//! The string form does not bracket arguments or combination members, so some
//! types cannot be recovered from text:
//! - a single functional argument, `A → B → C`, reads as the curried `A → (B → C)`;
//! - a combination with a functional member, `NP ∧ NP → S`, reads as a function
//!   taking the combination;
//! - a single-member combination prints like its member;
//! - a modality over a zero-arity combination, `◇NP ∨ PP`, reads as a
//!   combination with a modal member.

use lassy_types::{TypeError, WordType};
use nom::{
    branch::alt,
    bytes::complete::{escaped, tag, take_while1},
    character::complete::{char, multispace0, none_of, one_of},
    combinator::{map, opt},
    error::{Error, ErrorKind},
    multi::separated_list1,
    sequence::{delimited, pair, tuple},
    IResult,
};

use crate::error::ParseError;

/// Symbols the parser recognises besides atoms, arrows and brackets.
#[derive(Debug, Clone)]
pub struct TypeGrammar {
    modalities: Vec<String>,
    combinators: Vec<String>,
}

impl Default for TypeGrammar {
    fn default() -> Self {
        Self {
            modalities: vec!["□".to_string(), "◇".to_string()],
            combinators: vec!["∧".to_string(), "∨".to_string()],
        }
    }
}

/// Parsed shape before the type constructors validate it.
#[derive(Debug)]
enum Raw {
    Atom(String),
    Modal(String, Box<Raw>),
    Combo(String, Vec<Raw>),
    Arrow(Vec<Arg>, Box<Raw>),
    /// Argument tuple; only valid left of an arrow.
    Group(Vec<Arg>),
}

#[derive(Debug)]
struct Arg {
    ty: Raw,
    color: Option<String>,
}

enum BuildError {
    Shape(&'static str),
    Type(TypeError),
}

impl From<TypeError> for BuildError {
    fn from(e: TypeError) -> Self {
        BuildError::Type(e)
    }
}

fn is_atom_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

fn is_color_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-')
}

/// A color between `quote` characters, with backslash escapes.
fn quoted_color<'a>(quote: char) -> impl FnMut(&'a str) -> IResult<&'a str, String> {
    let stop = if quote == '"' { "\\\"" } else { "\\'" };
    move |i: &'a str| {
        let (i, body) = delimited(
            char(quote),
            opt(escaped(none_of(stop), '\\', one_of("\\'\"ntr"))),
            char(quote),
        )(i)?;
        Ok((i, unescape(body.unwrap_or_default())))
    }
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn color(i: &str) -> IResult<&str, String> {
    alt((
        quoted_color('\''),
        quoted_color('"'),
        map(take_while1(is_color_char), str::to_string),
    ))(i)
}

impl TypeGrammar {
    /// A grammar without modalities or combinators.
    pub fn empty() -> Self {
        Self {
            modalities: Vec::new(),
            combinators: Vec::new(),
        }
    }

    pub fn with_modality(mut self, modality: impl Into<String>) -> Self {
        self.modalities.push(modality.into());
        self
    }

    pub fn with_combinator(mut self, combinator: impl Into<String>) -> Self {
        self.combinators.push(combinator.into());
        self
    }

    pub fn parse(&self, input: &str) -> Result<WordType, ParseError> {
        let syntax_error = |message: String| ParseError::Type {
            input: input.to_string(),
            message,
        };

        let (rest, raw) = self
            .ty(input.trim())
            .map_err(|e| syntax_error(e.to_string()))?;
        if !rest.is_empty() {
            return Err(syntax_error(format!("unexpected trailing input '{}'", rest)));
        }

        raw.build().map_err(|e| match e {
            BuildError::Shape(message) => syntax_error(message.to_string()),
            BuildError::Type(source) => ParseError::InvalidType {
                input: input.to_string(),
                source,
            },
        })
    }

    fn ty<'a>(&self, i: &'a str) -> IResult<&'a str, Raw> {
        let (i, lhs) = self.combo(i)?;
        let arrow: IResult<&'a str, &'a str> = delimited(multispace0, tag("→"), multispace0)(i);
        match arrow {
            Ok((i, _)) => {
                let (i, result) = self.ty(i)?;
                let args = match lhs {
                    Raw::Group(args) => args,
                    single => vec![Arg { ty: single, color: None }],
                };
                Ok((i, Raw::Arrow(args, Box::new(result))))
            }
            Err(_) => Ok((i, lhs)),
        }
    }

    fn combo<'a>(&self, i: &'a str) -> IResult<&'a str, Raw> {
        let (mut i, first) = self.unary(i)?;
        let mut items = vec![first];
        let mut symbol: Option<&str> = None;

        while let Some((rest, sym)) = self.combinator_symbol(i) {
            if symbol.is_some_and(|s| s != sym) {
                // One combination prints with a single symbol
                return Err(nom::Err::Failure(Error::new(i, ErrorKind::Verify)));
            }
            let (rest, item) = self.unary(rest)?;
            symbol = Some(sym);
            items.push(item);
            i = rest;
        }

        match symbol {
            Some(sym) => Ok((i, Raw::Combo(sym.to_string(), items))),
            None => Ok((i, items.remove(0))),
        }
    }

    fn combinator_symbol<'a, 'g>(&'g self, i: &'a str) -> Option<(&'a str, &'g str)> {
        let rest = i.trim_start();
        self.combinators.iter().find_map(|c| {
            rest.strip_prefix(c.as_str())
                .map(|after| (after.trim_start(), c.as_str()))
        })
    }

    fn unary<'a>(&self, i: &'a str) -> IResult<&'a str, Raw> {
        for modality in &self.modalities {
            if let Ok((rest, _)) = tag::<_, _, Error<&str>>(modality.as_str())(i) {
                let (rest, inner) = self.unary(rest)?;
                return Ok((rest, Raw::Modal(modality.clone(), Box::new(inner))));
            }
        }
        self.primary(i)
    }

    fn primary<'a>(&self, i: &'a str) -> IResult<&'a str, Raw> {
        alt((
            |i: &'a str| self.group(i),
            map(|i: &'a str| self.colored_arg(i), |arg| Raw::Group(vec![arg])),
            map(take_while1(is_atom_char), |s: &'a str| Raw::Atom(s.to_string())),
        ))(i)
    }

    fn group<'a>(&self, i: &'a str) -> IResult<&'a str, Raw> {
        let (i, mut args) = delimited(
            pair(char('('), multispace0),
            separated_list1(
                tuple((multispace0, char(','), multispace0)),
                |i: &'a str| self.arg(i),
            ),
            pair(multispace0, char(')')),
        )(i)?;

        if args.len() == 1 && args[0].color.is_none() {
            return Ok((i, args.remove(0).ty));
        }
        Ok((i, Raw::Group(args)))
    }

    fn arg<'a>(&self, i: &'a str) -> IResult<&'a str, Arg> {
        alt((
            |i: &'a str| self.colored_arg(i),
            map(|i: &'a str| self.ty(i), |ty| Arg { ty, color: None }),
        ))(i)
    }

    fn colored_arg<'a>(&self, i: &'a str) -> IResult<&'a str, Arg> {
        let (i, _) = pair(char('{'), multispace0)(i)?;
        let (i, ty) = self.ty(i)?;
        let (i, _) = tuple((multispace0, char(':'), multispace0))(i)?;
        let (i, color) = color(i)?;
        let (i, _) = pair(multispace0, char('}'))(i)?;
        Ok((
            i,
            Arg {
                ty,
                color: Some(color),
            },
        ))
    }
}

impl Raw {
    fn build(self) -> Result<WordType, BuildError> {
        match self {
            Raw::Atom(name) => Ok(WordType::atomic(name)),
            Raw::Modal(modality, inner) => Ok(WordType::modal(inner.build()?, modality)),
            Raw::Combo(symbol, items) => {
                let types = items
                    .into_iter()
                    .map(Raw::build)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(WordType::combinator(types, symbol)?)
            }
            Raw::Arrow(args, result) => {
                let result = result.build()?;
                let colored = args.iter().filter(|a| a.color.is_some()).count();
                if colored == 0 {
                    let args = args
                        .into_iter()
                        .map(|a| a.ty.build())
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(WordType::complex(args, result)?)
                } else if colored == args.len() {
                    let mut types = Vec::with_capacity(args.len());
                    let mut colors = Vec::with_capacity(args.len());
                    for arg in args {
                        types.push(arg.ty.build()?);
                        colors.extend(arg.color);
                    }
                    Ok(WordType::colored(types, colors, result)?)
                } else {
                    Err(BuildError::Shape("arguments must be all colored or all plain"))
                }
            }
            Raw::Group(_) => Err(BuildError::Shape("argument tuple must be followed by '→'")),
        }
    }
}
