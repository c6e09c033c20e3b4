//! Combination operators for `ColumnSelector`: `+` (add) and `>>` (shift onto
//! an operator).
//!
//! The right-hand side of `+` can be several kinds of things. `Operand` names
//! them explicitly and `ColumnSelector::combine` matches on it exhaustively.
//! Precedence, in order:
//! 1. `None` is the identity.
//! 2. A graph node absorbs the selector.
//! 3. A wildcard on the left absorbs anything.
//! 4. A wildcard selector on the right absorbs the left.
//! 5. Otherwise names, subgroups and tags are concatenated.
//!
//! Adding plain names (or a list of names and groups) rebuilds the selector
//! from its names and subgroups only, so its tags are not carried over.

use std::convert::Infallible;
use std::ops::{Add, Shr};

use super::graph::{GraphNode, Operator};
use super::tags::Tag;
use super::{ColumnGroup, ColumnSelector, GroupedName, WILDCARD};

/// The right-hand side of a selector addition.
#[derive(Debug, Clone)]
pub enum Operand<N = Infallible> {
    None,
    Selector(ColumnSelector),
    Node(N),
    Tag(Tag),
    Name(String),
    Names(Vec<String>),
    /// A list mixing plain names and name tuples; each tuple becomes a subgroup.
    Entries(Vec<GroupedName>),
}

/// The result of a selector addition: a selector, unless a graph node was
/// involved.
#[derive(Debug, Clone, PartialEq)]
pub enum Combined<N = Infallible> {
    Selector(ColumnSelector),
    Node(N),
}

impl Combined<Infallible> {
    pub fn into_selector(self) -> ColumnSelector {
        match self {
            Combined::Selector(selector) => selector,
            Combined::Node(never) => match never {},
        }
    }
}

impl<N> Combined<N> {
    pub fn selector(&self) -> Option<&ColumnSelector> {
        match self {
            Combined::Selector(selector) => Some(selector),
            Combined::Node(_) => None,
        }
    }

    pub fn node(self) -> Option<N> {
        match self {
            Combined::Selector(_) => None,
            Combined::Node(node) => Some(node),
        }
    }
}

impl ColumnSelector {
    /// `self + other`.
    ///
    /// Duplicates are kept here; the `names` and `tags` views de-duplicate.
    pub fn combine<N: GraphNode>(self, other: Operand<N>) -> Combined<N> {
        match other {
            Operand::None => Combined::Selector(self),
            Operand::Node(node) => Combined::Node(node.absorb(self)),
            _ if self.all => Combined::Selector(self),
            Operand::Selector(other) if other.all => Combined::Selector(other),
            Operand::Selector(other) => {
                let mut names = self.names;
                names.extend(other.names);
                let mut subgroups = self.subgroups;
                subgroups.extend(other.subgroups);
                let mut tags = self.tags;
                tags.extend(other.tags);
                Combined::Selector(ColumnSelector::from_parts(names, subgroups, tags))
            }
            Operand::Tag(tag) => {
                let mut tags = self.tags;
                tags.push(tag);
                Combined::Selector(ColumnSelector::from_parts(self.names, self.subgroups, tags))
            }
            Operand::Name(name) => self.combine(Operand::Names(vec![name])),
            Operand::Names(extra) => {
                let mut names = self.names;
                names.extend(extra);
                Combined::Selector(ColumnSelector::from_parts(names, self.subgroups, Vec::new()))
            }
            Operand::Entries(entries) => {
                let mut names = self.names;
                let mut subgroups = self.subgroups;
                for entry in entries {
                    match entry {
                        GroupedName::Name(name) => names.push(name),
                        // `+` can't fail, so a wildcard tuple widens the whole
                        // selection the same way a bare "*" does.
                        GroupedName::Group(group) if group.iter().any(|name| name == WILDCARD) => {
                            log::warn!("Group {:?} contains the wildcard; selecting every column", group);
                            return Combined::Selector(ColumnSelector::all());
                        }
                        GroupedName::Group(group) => subgroups.push(ColumnGroup::from_names(group)),
                    }
                }
                Combined::Selector(ColumnSelector::from_parts(names, subgroups, Vec::new()))
            }
        }
    }

    /// `other + self` where `other` isn't a selector. Applies the same
    /// left-to-right rule with the selector on the left.
    pub fn radd<N: GraphNode>(self, other: Operand<N>) -> Combined<N> {
        self.combine(other)
    }

    /// `self >> operator`: creates a node from this selection and pipes it
    /// through `operator`.
    pub fn shift<O: Operator>(self, operator: O) -> O::Node {
        let node = operator.create_node(self);
        operator.pipe(node)
    }

    /// `self >> O`, for an operator that hasn't been instantiated yet.
    pub fn shift_default<O: Operator + Default>(self) -> O::Node {
        self.shift(O::default())
    }
}

//==================================================================================
// Operand conversions
//==================================================================================

impl<N> From<ColumnSelector> for Operand<N> {
    fn from(selector: ColumnSelector) -> Self {
        Operand::Selector(selector)
    }
}

impl<N> From<Option<ColumnSelector>> for Operand<N> {
    fn from(selector: Option<ColumnSelector>) -> Self {
        match selector {
            Some(selector) => Operand::Selector(selector),
            None => Operand::None,
        }
    }
}

impl<N> From<Tag> for Operand<N> {
    fn from(tag: Tag) -> Self {
        Operand::Tag(tag)
    }
}

impl<N> From<&str> for Operand<N> {
    fn from(name: &str) -> Self {
        Operand::Name(name.to_string())
    }
}

impl<N> From<String> for Operand<N> {
    fn from(name: String) -> Self {
        Operand::Name(name)
    }
}

impl<N> From<Vec<String>> for Operand<N> {
    fn from(names: Vec<String>) -> Self {
        Operand::Names(names)
    }
}

impl<N> From<Vec<&str>> for Operand<N> {
    fn from(names: Vec<&str>) -> Self {
        Operand::Names(names.into_iter().map(str::to_string).collect())
    }
}

impl<N> From<Vec<GroupedName>> for Operand<N> {
    fn from(entries: Vec<GroupedName>) -> Self {
        Operand::Entries(entries)
    }
}

impl<N> From<&[&str]> for Operand<N> {
    fn from(names: &[&str]) -> Self {
        Operand::Names(names.iter().map(|name| name.to_string()).collect())
    }
}

//==================================================================================
// std::ops
//==================================================================================

impl<T: Into<Operand>> Add<T> for ColumnSelector {
    type Output = ColumnSelector;

    fn add(self, rhs: T) -> ColumnSelector {
        self.combine(rhs.into()).into_selector()
    }
}

macro_rules! impl_reflected_add {
    ($($lhs:ty),+ $(,)?) => {
        $(
            impl Add<ColumnSelector> for $lhs {
                type Output = ColumnSelector;

                fn add(self, rhs: ColumnSelector) -> ColumnSelector {
                    rhs.radd(Operand::from(self)).into_selector()
                }
            }
        )+
    };
}

impl_reflected_add!(&str, String, Vec<String>, Vec<&str>, Vec<GroupedName>, Tag);

impl<O: Operator> Shr<O> for ColumnSelector {
    type Output = O::Node;

    fn shr(self, operator: O) -> O::Node {
        self.shift(operator)
    }
}
