use super::ast::*;
use super::escape::unescape;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "selector.pest"]
pub struct SelectorParser;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Pest error: {0}")]
    Pest(#[from] Box<pest::error::Error<Rule>>),
    #[error("Unknown rule: {0:?}")]
    UnknownRule(Rule),
    #[error("Invalid nth argument: {0}")]
    InvalidNth(String),
}

pub fn parse(input: &str) -> Result<SelectorList, ParseError> {
    let mut pairs = SelectorParser::parse(Rule::selector_list, input).map_err(Box::new)?;
    let mut list = SelectorList {
        selectors: Vec::new(),
    };

    if let Some(pair) = pairs.next() {
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::complex_selector => list.selectors.push(parse_complex(inner)?),
                Rule::EOI => {}
                other => return Err(ParseError::UnknownRule(other)),
            }
        }
    }

    Ok(list)
}

fn parse_complex(pair: Pair<Rule>) -> Result<ComplexSelector, ParseError> {
    let mut parts = Vec::new();
    let mut pending = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::combinator => pending = Some(parse_combinator(inner)?),
            Rule::compound_selector => parts.push(SelectorPart {
                combinator: pending.take(),
                compound: parse_compound(inner)?,
            }),
            other => return Err(ParseError::UnknownRule(other)),
        }
    }

    Ok(ComplexSelector { parts })
}

fn parse_combinator(pair: Pair<Rule>) -> Result<Combinator, ParseError> {
    let inner = pair
        .into_inner()
        .next()
        .ok_or(ParseError::UnknownRule(Rule::combinator))?;
    match inner.as_rule() {
        Rule::child => Ok(Combinator::Child),
        Rule::next_sibling => Ok(Combinator::NextSibling),
        Rule::subsequent_sibling => Ok(Combinator::SubsequentSibling),
        Rule::descendant => Ok(Combinator::Descendant),
        other => Err(ParseError::UnknownRule(other)),
    }
}

fn parse_compound(pair: Pair<Rule>) -> Result<CompoundSelector, ParseError> {
    let mut compound = CompoundSelector::default();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::type_selector => compound.type_selector = Some(parse_type(inner)?),
            Rule::id_selector => compound.subclasses.push(SimpleSelector::Id(ident_of(inner))),
            Rule::class_selector => compound.subclasses.push(SimpleSelector::Class(ident_of(inner))),
            Rule::attribute_selector => compound
                .subclasses
                .push(SimpleSelector::Attribute(parse_attribute(inner)?)),
            Rule::pseudo_class => compound
                .subclasses
                .push(SimpleSelector::Pseudo(parse_pseudo(inner)?)),
            other => return Err(ParseError::UnknownRule(other)),
        }
    }

    Ok(compound)
}

fn parse_type(pair: Pair<Rule>) -> Result<TypeSelector, ParseError> {
    let inner = pair
        .into_inner()
        .next()
        .ok_or(ParseError::UnknownRule(Rule::type_selector))?;
    match inner.as_rule() {
        Rule::universal => Ok(TypeSelector::Universal),
        Rule::tag_name => Ok(TypeSelector::Tag(unescape(inner.as_str()).to_ascii_lowercase())),
        other => Err(ParseError::UnknownRule(other)),
    }
}

/// Decoded identifier following a `#` or `.` sigil.
fn ident_of(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|ident| unescape(ident.as_str()))
        .unwrap_or_default()
}

fn parse_attribute(pair: Pair<Rule>) -> Result<AttributeSelector, ParseError> {
    let mut name = String::new();
    let mut operator = None;
    let mut value = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::attr_name => name = unescape(inner.as_str()).to_ascii_lowercase(),
            Rule::attr_operator => operator = AttributeOperator::from_token(inner.as_str()),
            Rule::string => {
                let content = inner.into_inner().next().map(|c| c.as_str()).unwrap_or("");
                value = Some(unescape(content));
            }
            Rule::ident => value = Some(unescape(inner.as_str())),
            other => return Err(ParseError::UnknownRule(other)),
        }
    }

    let matcher = match (operator, value) {
        (Some(op), Some(value)) => Some((op, value)),
        (None, None) => None,
        _ => return Err(ParseError::UnknownRule(Rule::attribute_selector)),
    };

    Ok(AttributeSelector { name, matcher })
}

fn parse_pseudo(pair: Pair<Rule>) -> Result<PseudoClass, ParseError> {
    let inner = pair
        .into_inner()
        .next()
        .ok_or(ParseError::UnknownRule(Rule::pseudo_class))?;

    match inner.as_rule() {
        Rule::keyword_pseudo => match inner.as_str().to_ascii_lowercase().as_str() {
            "first-child" => Ok(PseudoClass::FirstChild),
            "last-child" => Ok(PseudoClass::LastChild),
            "only-child" => Ok(PseudoClass::OnlyChild),
            "first-of-type" => Ok(PseudoClass::FirstOfType),
            "last-of-type" => Ok(PseudoClass::LastOfType),
            "only-of-type" => Ok(PseudoClass::OnlyOfType),
            _ => Err(ParseError::UnknownRule(Rule::keyword_pseudo)),
        },
        Rule::nth_pseudo => {
            let mut name = String::new();
            let mut nth = None;
            for part in inner.into_inner() {
                match part.as_rule() {
                    Rule::nth_name => name = part.as_str().to_ascii_lowercase(),
                    Rule::nth_arg => nth = Some(parse_nth(part.as_str())?),
                    other => return Err(ParseError::UnknownRule(other)),
                }
            }
            let nth = nth.ok_or(ParseError::UnknownRule(Rule::nth_arg))?;
            match name.as_str() {
                "nth-child" => Ok(PseudoClass::NthChild(nth)),
                "nth-last-child" => Ok(PseudoClass::NthLastChild(nth)),
                "nth-of-type" => Ok(PseudoClass::NthOfType(nth)),
                "nth-last-of-type" => Ok(PseudoClass::NthLastOfType(nth)),
                _ => Err(ParseError::UnknownRule(Rule::nth_name)),
            }
        }
        other => Err(ParseError::UnknownRule(other)),
    }
}

fn parse_nth(arg: &str) -> Result<Nth, ParseError> {
    match arg.to_ascii_lowercase().as_str() {
        "odd" => Ok(Nth::Odd),
        "even" => Ok(Nth::Even),
        digits => digits
            .parse::<usize>()
            .map(Nth::Index)
            .map_err(|_| ParseError::InvalidNth(arg.to_string())),
    }
}
