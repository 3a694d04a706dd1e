//! CSS selector matching for the in-memory tree
//!
//! Supports selector lists (`a, b`) of complex selectors. Each compound is an
//! optional tag (or `*`) followed by any number of `#id`, `.class`, `[attr]`
//! and `[attr=value]` parts. Compounds are joined by descendant (whitespace),
//! child (`>`), adjacent sibling (`+`) and general sibling (`~`) combinators.
//! Pseudo-classes and other attribute operators fail to parse and therefore
//! match nothing.

use std::iter::Peekable;
use std::str::Chars;

/// Tree access needed to match a selector against an element
pub trait ElementAdapter {
    type Handle: Copy + Eq;

    fn tag_name(&self, element: Self::Handle) -> &str;

    fn element_id(&self, element: Self::Handle) -> Option<&str>;

    fn has_class(&self, element: Self::Handle, class: &str) -> bool;

    fn attr(&self, element: Self::Handle, name: &str) -> Option<&str>;

    /// Ancestors of `element`, nearest first
    fn element_ancestors(&self, element: Self::Handle) -> Vec<Self::Handle>;

    /// Siblings before `element`, nearest first
    fn preceding_siblings(&self, element: Self::Handle) -> Vec<Self::Handle>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Universal,
    Type(String),
    Id(String),
    Class(String),
    Attribute {
        name: String,
        /// `None` matches presence only
        value: Option<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    pub simples: Vec<SimpleSelector>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

/// Compounds joined by combinators, left to right
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplexSelector {
    pub first: CompoundSelector,
    pub rest: Vec<(Combinator, CompoundSelector)>,
}

/// Comma-separated selectors; an element matches if any of them does
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    /// Parse a selector list, `None` if any part of it is unsupported
    pub fn parse(input: &str) -> Option<SelectorList> {
        let mut chars = input.chars().peekable();
        let mut selectors = Vec::new();

        loop {
            selectors.push(parse_complex(&mut chars)?);
            match chars.next() {
                None => break,
                Some(',') => continue,
                Some(_) => return None,
            }
        }

        Some(SelectorList { selectors })
    }

    pub fn matches<A: ElementAdapter>(&self, adapter: &A, element: A::Handle) -> bool {
        self.selectors
            .iter()
            .any(|selector| selector.matches(adapter, element))
    }
}

impl ComplexSelector {
    pub fn matches<A: ElementAdapter>(&self, adapter: &A, element: A::Handle) -> bool {
        self.matches_from(adapter, element, self.rest.len())
    }

    /// Match `element` against compound `index` (0 is `first`) and, right to
    /// left, everything before it. Backtracks over every candidate ancestor or
    /// sibling.
    fn matches_from<A: ElementAdapter>(&self, adapter: &A, element: A::Handle, index: usize) -> bool {
        let Some(left) = index.checked_sub(1) else {
            return self.first.matches(adapter, element);
        };
        let Some((combinator, compound)) = self.rest.get(left) else {
            return false;
        };
        if !compound.matches(adapter, element) {
            return false;
        }

        match combinator {
            Combinator::Descendant => adapter
                .element_ancestors(element)
                .into_iter()
                .any(|ancestor| self.matches_from(adapter, ancestor, left)),
            Combinator::Child => adapter
                .element_ancestors(element)
                .first()
                .is_some_and(|parent| self.matches_from(adapter, *parent, left)),
            Combinator::AdjacentSibling => adapter
                .preceding_siblings(element)
                .first()
                .is_some_and(|sibling| self.matches_from(adapter, *sibling, left)),
            Combinator::GeneralSibling => adapter
                .preceding_siblings(element)
                .into_iter()
                .any(|sibling| self.matches_from(adapter, sibling, left)),
        }
    }
}

impl CompoundSelector {
    pub fn matches<A: ElementAdapter>(&self, adapter: &A, element: A::Handle) -> bool {
        self.simples.iter().all(|simple| match simple {
            SimpleSelector::Universal => true,
            SimpleSelector::Type(name) => adapter.tag_name(element).eq_ignore_ascii_case(name),
            SimpleSelector::Id(id) => adapter.element_id(element) == Some(id.as_str()),
            SimpleSelector::Class(class) => adapter.has_class(element, class),
            SimpleSelector::Attribute { name, value: None } => adapter.attr(element, name).is_some(),
            SimpleSelector::Attribute { name, value: Some(expected) } => {
                adapter.attr(element, name) == Some(expected.as_str())
            }
        })
    }
}

fn parse_complex(chars: &mut Peekable<Chars>) -> Option<ComplexSelector> {
    skip_whitespace(chars);
    let first = parse_compound(chars)?;
    let mut rest = Vec::new();

    loop {
        let saw_whitespace = skip_whitespace(chars);
        let combinator = match chars.peek() {
            None | Some(',') => break,
            Some('>') => Combinator::Child,
            Some('+') => Combinator::AdjacentSibling,
            Some('~') => Combinator::GeneralSibling,
            Some(_) if saw_whitespace => Combinator::Descendant,
            Some(_) => return None,
        };
        if combinator != Combinator::Descendant {
            chars.next();
            skip_whitespace(chars);
        }
        rest.push((combinator, parse_compound(chars)?));
    }

    Some(ComplexSelector { first, rest })
}

fn parse_compound(chars: &mut Peekable<Chars>) -> Option<CompoundSelector> {
    let mut simples = Vec::new();

    let tag = take_ident(chars);
    if !tag.is_empty() {
        simples.push(SimpleSelector::Type(tag.to_ascii_lowercase()));
    } else if chars.peek() == Some(&'*') {
        chars.next();
        simples.push(SimpleSelector::Universal);
    }

    loop {
        match chars.peek() {
            Some('#') => {
                chars.next();
                simples.push(SimpleSelector::Id(non_empty(take_ident(chars))?));
            }
            Some('.') => {
                chars.next();
                simples.push(SimpleSelector::Class(non_empty(take_ident(chars))?));
            }
            Some('[') => {
                chars.next();
                simples.push(parse_attribute(chars)?);
            }
            _ => break,
        }
    }

    (!simples.is_empty()).then_some(CompoundSelector { simples })
}

/// Returns whether any whitespace was skipped
fn skip_whitespace(chars: &mut Peekable<Chars>) -> bool {
    let mut skipped = false;
    while chars.next_if(|c| c.is_whitespace()).is_some() {
        skipped = true;
    }
    skipped
}

fn take_ident(chars: &mut Peekable<Chars>) -> String {
    let mut ident = String::new();
    while let Some(c) = chars.next_if(|&c| c.is_alphanumeric() || c == '-' || c == '_') {
        ident.push(c);
    }
    ident
}

fn non_empty(ident: String) -> Option<String> {
    (!ident.is_empty()).then_some(ident)
}

fn parse_attribute(chars: &mut Peekable<Chars>) -> Option<SimpleSelector> {
    let mut body = String::new();
    let mut quote = None;
    let mut closed = false;
    for c in chars.by_ref() {
        match (quote, c) {
            (None, ']') => {
                closed = true;
                break;
            }
            (None, '"' | '\'') => quote = Some(c),
            (Some(open), _) if open == c => quote = None,
            _ => {}
        }
        body.push(c);
    }
    if !closed {
        return None;
    }

    let (name, value) = match body.split_once('=') {
        Some((name, value)) => (name.trim(), Some(unquote(value.trim())?)),
        None => (body.trim(), None),
    };

    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
        return None;
    }

    Some(SimpleSelector::Attribute {
        name: name.to_string(),
        value,
    })
}

fn unquote(value: &str) -> Option<String> {
    for quote in ['"', '\''] {
        if let Some(rest) = value.strip_prefix(quote) {
            return rest.strip_suffix(quote).map(str::to_string);
        }
    }
    if value.is_empty() || value.contains(char::is_whitespace) {
        return None;
    }
    Some(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str) -> SimpleSelector {
        SimpleSelector::Class(name.to_string())
    }

    fn compound(simples: Vec<SimpleSelector>) -> CompoundSelector {
        CompoundSelector { simples }
    }

    #[test]
    fn test_parse_attribute_presence() {
        let list = SelectorList::parse("[data-popper-arrow]").unwrap();
        assert_eq!(
            list.selectors[0].first,
            compound(vec![SimpleSelector::Attribute {
                name: "data-popper-arrow".to_string(),
                value: None
            }])
        );
        assert!(list.selectors[0].rest.is_empty());
    }

    #[test]
    fn test_parse_compound() {
        let list = SelectorList::parse("DIV#tip.arrow.small[data-side='top']").unwrap();
        assert_eq!(
            list.selectors[0].first,
            compound(vec![
                SimpleSelector::Type("div".to_string()),
                SimpleSelector::Id("tip".to_string()),
                class("arrow"),
                class("small"),
                SimpleSelector::Attribute {
                    name: "data-side".to_string(),
                    value: Some("top".to_string())
                },
            ])
        );
    }

    #[test]
    fn test_parse_combinators() {
        let list = SelectorList::parse(".tooltip > .arrow").unwrap();
        assert_eq!(list.selectors[0].first, compound(vec![class("tooltip")]));
        assert_eq!(list.selectors[0].rest, vec![(Combinator::Child, compound(vec![class("arrow")]))]);

        let list = SelectorList::parse("  div   .arrow ").unwrap();
        assert_eq!(list.selectors[0].rest[0].0, Combinator::Descendant);

        let list = SelectorList::parse("p+span~ .arrow").unwrap();
        let combinators: Vec<Combinator> = list.selectors[0].rest.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            combinators,
            vec![Combinator::AdjacentSibling, Combinator::GeneralSibling]
        );
    }

    #[test]
    fn test_parse_list() {
        let list = SelectorList::parse(".caret, [data-arrow='a,b'] , span").unwrap();
        assert_eq!(list.selectors.len(), 3);
        assert_eq!(list.selectors[2].first, compound(vec![SimpleSelector::Type("span".to_string())]));
    }

    #[test]
    fn test_parse_rejects_unsupported() {
        assert!(SelectorList::parse("").is_none());
        assert!(SelectorList::parse(".a,").is_none());
        assert!(SelectorList::parse("div >").is_none());
        assert!(SelectorList::parse("> div").is_none());
        assert!(SelectorList::parse("a:hover").is_none());
        assert!(SelectorList::parse("a :hover").is_none());
        assert!(SelectorList::parse("[data-x").is_none());
        assert!(SelectorList::parse("[=x]").is_none());
        assert!(SelectorList::parse("[data-x~=y]").is_none());
    }
}
