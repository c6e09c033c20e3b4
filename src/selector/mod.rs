//! This module defines `ColumnSelector`, the algebra used to describe which
//! columns flow into which transformation step.
//!
//! A selector is built while a pipeline is being declared, before any concrete
//! schema is known. It holds:
//! * plain column names,
//! * tags, expanded into names by the schema at resolve time,
//! * subgroups (`ColumnGroup`), multi-column units such as feature crosses,
//! * or the wildcard (`all`), meaning every column of whatever schema it's
//!   resolved against.
//!
//! Nesting is limited to one level by construction: a `ColumnSelector` owns
//! `ColumnGroup`s and a `ColumnGroup` can't own anything but names and tags.
//! Every combining operation returns a new selector.

use std::hash::Hash;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::error::MerlinError;

//==================================================================================
// 1. Module Declarations
//==================================================================================

pub mod graph;
pub mod ops;
pub mod schema;
pub mod tags;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================

pub use graph::{GraphNode, Operator};
pub use ops::{Combined, Operand};
pub use schema::SchemaLike;
pub use tags::Tag;

/// The name that stands for "every column" when constructing a selector.
pub const WILDCARD: &str = "*";

//==================================================================================
// 3. ColumnGroup (leaf)
//==================================================================================

/// A group of columns meant to be used together (e.g. a feature cross), rather
/// than selected independently.
///
/// Deserialization goes through `ColumnGroup::new`, so a serialized wildcard
/// group is rejected the same way the builder rejects it.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(try_from = "GroupRepr")]
pub struct ColumnGroup {
    names: Vec<String>,
    tags: Vec<Tag>,
}

impl ColumnGroup {
    pub fn new<I, S>(names: I) -> Result<Self, MerlinError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.iter().any(|name| name == WILDCARD) {
            return Err(MerlinError::WildcardSubgroup);
        }
        Ok(Self {
            names,
            tags: Vec::new(),
        })
    }

    /// Callers have already ruled out the wildcard.
    pub(crate) fn from_names(names: Vec<String>) -> Self {
        Self {
            names,
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Tag>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn own_names(&self) -> &[String] {
        &self.names
    }

    /// Names in this group, duplicates removed keeping the first occurrence.
    pub fn names(&self) -> Vec<String> {
        dedup_preserving_order(self.names.iter().cloned())
    }

    pub fn tags(&self) -> Vec<Tag> {
        dedup_preserving_order(self.tags.iter().cloned())
    }

    /// This group viewed as a root selector with the same names and tags.
    pub fn to_selector(&self) -> ColumnSelector {
        ColumnSelector {
            names: self.names.clone(),
            tags: self.tags.clone(),
            subgroups: Vec::new(),
            all: false,
        }
    }

    /// Narrows this group to the columns of `schema`, as a unit.
    pub fn resolve<S: SchemaLike>(&self, schema: &S) -> ColumnGroup {
        ColumnGroup {
            names: schema.apply(&self.to_selector()).column_names(),
            tags: Vec::new(),
        }
    }
}

/// Groups compare by their own names, in order. Tags aren't part of a group's
/// identity.
impl PartialEq for ColumnGroup {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names
    }
}

impl Eq for ColumnGroup {}

/// Anything that can become a subgroup of a root selector.
pub trait IntoColumnGroup {
    fn into_column_group(self) -> Result<ColumnGroup, MerlinError>;
}

impl IntoColumnGroup for ColumnGroup {
    fn into_column_group(self) -> Result<ColumnGroup, MerlinError> {
        Ok(self)
    }
}

/// A selector can only become a group if it is a leaf: no subgroups, no wildcard.
impl IntoColumnGroup for ColumnSelector {
    fn into_column_group(self) -> Result<ColumnGroup, MerlinError> {
        if self.all {
            return Err(MerlinError::WildcardSubgroup);
        }
        if !self.subgroups.is_empty() {
            return Err(MerlinError::NestedSubgroups);
        }
        Ok(ColumnGroup {
            names: self.names,
            tags: self.tags,
        })
    }
}

impl<S: Into<String>> IntoColumnGroup for Vec<S> {
    fn into_column_group(self) -> Result<ColumnGroup, MerlinError> {
        ColumnGroup::new(self)
    }
}

impl<S: Into<String>, const N: usize> IntoColumnGroup for [S; N] {
    fn into_column_group(self) -> Result<ColumnGroup, MerlinError> {
        ColumnGroup::new(self)
    }
}

//==================================================================================
// 4. ColumnSelector (root)
//==================================================================================

/// One element of a selector's construction list: a plain name, a tuple of
/// names forming a group, or another selector used as a group.
#[derive(Debug, Clone)]
pub enum SelectorEntry {
    Name(String),
    Group(Vec<String>),
    Selector(ColumnSelector),
}

impl From<&str> for SelectorEntry {
    fn from(name: &str) -> Self {
        SelectorEntry::Name(name.to_string())
    }
}

impl From<String> for SelectorEntry {
    fn from(name: String) -> Self {
        SelectorEntry::Name(name)
    }
}

impl From<Vec<&str>> for SelectorEntry {
    fn from(names: Vec<&str>) -> Self {
        SelectorEntry::Group(names.into_iter().map(str::to_string).collect())
    }
}

impl From<ColumnSelector> for SelectorEntry {
    fn from(selector: ColumnSelector) -> Self {
        SelectorEntry::Selector(selector)
    }
}

/// A name as seen by `grouped_names`: either a plain name or a whole group.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum GroupedName {
    Name(String),
    Group(Vec<String>),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(from = "SelectorRepr")]
pub struct ColumnSelector {
    names: Vec<String>,
    tags: Vec<Tag>,
    subgroups: Vec<ColumnGroup>,
    all: bool,
}

impl ColumnSelector {
    /// A selector over plain column names. A `"*"` among them makes this the
    /// wildcard selector.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_parts(names.into_iter().map(Into::into).collect(), Vec::new(), Vec::new())
    }

    /// The wildcard selector.
    pub fn all() -> Self {
        Self {
            names: Vec::new(),
            tags: Vec::new(),
            subgroups: Vec::new(),
            all: true,
        }
    }

    pub fn from_tags<I, T>(tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Tag>,
    {
        Self::default().with_tags(tags)
    }

    /// Builds a selector from a mixed list of names, name tuples and selectors.
    ///
    /// # Errors
    /// `NestedSubgroups` if a selector entry has subgroups of its own.
    pub fn from_entries<I, E>(entries: I) -> Result<Self, MerlinError>
    where
        I: IntoIterator<Item = E>,
        E: Into<SelectorEntry>,
    {
        let mut names = Vec::new();
        let mut subgroups = Vec::new();
        for entry in entries {
            match entry.into() {
                SelectorEntry::Name(name) => names.push(name),
                SelectorEntry::Group(group) => subgroups.push(ColumnGroup::new(group)?),
                SelectorEntry::Selector(selector) => subgroups.push(selector.into_column_group()?),
            }
        }
        Ok(Self::from_parts(names, subgroups, Vec::new()))
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Tag>,
    {
        if !self.all {
            self.tags.extend(tags.into_iter().map(Into::into));
        }
        self
    }

    /// Appends subgroups.
    ///
    /// # Errors
    /// `NestedSubgroups` if any of them is a selector with subgroups.
    pub fn with_subgroups<I, G>(mut self, subgroups: I) -> Result<Self, MerlinError>
    where
        I: IntoIterator<Item = G>,
        G: IntoColumnGroup,
    {
        let groups = subgroups
            .into_iter()
            .map(IntoColumnGroup::into_column_group)
            .collect::<Result<Vec<_>, _>>()?;
        if !self.all {
            self.subgroups.extend(groups);
        }
        Ok(self)
    }

    /// The one constructor everything funnels through. Keeps the wildcard
    /// marker out of `names`.
    pub(crate) fn from_parts(names: Vec<String>, subgroups: Vec<ColumnGroup>, tags: Vec<Tag>) -> Self {
        if names.iter().any(|name| name == WILDCARD) {
            return Self::all();
        }
        Self {
            names,
            tags,
            subgroups,
            all: false,
        }
    }

    //==============================================================================
    // Views
    //==============================================================================

    pub fn is_all(&self) -> bool {
        self.all
    }

    /// True when this selector selects nothing: not the wildcard, and no names,
    /// subgroups or tags.
    pub fn is_empty(&self) -> bool {
        !(self.all || !self.names.is_empty() || !self.subgroups.is_empty() || !self.tags.is_empty())
    }

    /// Names requested directly at this level, as declared.
    pub fn own_names(&self) -> &[String] {
        &self.names
    }

    pub fn subgroups(&self) -> &[ColumnGroup] {
        &self.subgroups
    }

    /// Own names followed by each subgroup's names, duplicates removed keeping
    /// the first occurrence.
    pub fn names(&self) -> Vec<String> {
        let subgroup_names = self.subgroups.iter().flat_map(|group| group.names());
        dedup_preserving_order(self.names.iter().cloned().chain(subgroup_names))
    }

    /// Tags in insertion order, de-duplicated.
    pub fn tags(&self) -> Vec<Tag> {
        dedup_preserving_order(self.tags.iter().cloned())
    }

    /// Own names as-is, each subgroup as a single unit.
    pub fn grouped_names(&self) -> Vec<GroupedName> {
        let plain = self.names.iter().cloned().map(GroupedName::Name);
        let groups = self.subgroups.iter().map(|group| GroupedName::Group(group.names()));
        dedup_preserving_order(plain.chain(groups))
    }

    //==============================================================================
    // Schema-driven operations
    //==============================================================================

    /// Narrows this selector to the names that exist in `schema`, in the
    /// schema's order, with tags expanded into names.
    ///
    /// Root names/tags and each subgroup are resolved separately so that tag
    /// expansion never breaks a group apart.
    pub fn resolve<S: SchemaLike>(&self, schema: &S) -> ColumnSelector {
        if self.all {
            return ColumnSelector {
                names: schema.column_names(),
                tags: Vec::new(),
                subgroups: Vec::new(),
                all: false,
            };
        }

        let root = ColumnSelector {
            names: self.names.clone(),
            tags: self.tags(),
            subgroups: Vec::new(),
            all: false,
        };
        let resolved = ColumnSelector {
            names: schema.apply(&root).column_names(),
            tags: Vec::new(),
            subgroups: self.subgroups.iter().map(|group| group.resolve(schema)).collect(),
            all: false,
        };
        log::debug!(
            "Resolved selector {:?} to {:?}",
            self.grouped_names(),
            resolved.grouped_names()
        );
        resolved
    }

    /// This selector minus whatever `other` selects.
    ///
    /// Plain names are compared against `other`'s own names only. A subgroup is
    /// dropped if `other` has an equal subgroup or names every one of its
    /// columns directly. Tags are not carried into the result.
    ///
    /// A wildcard has nothing concrete to subtract from, so it yields `other`;
    /// resolve the wildcard first when a true complement is needed.
    pub fn filter_columns(&self, other: &ColumnSelector) -> ColumnSelector {
        if self.all {
            return other.clone();
        }

        let remaining_names: Vec<String> = self
            .names
            .iter()
            .filter(|name| !other.names.contains(*name))
            .cloned()
            .collect();

        let remaining_groups: Vec<ColumnGroup> = self
            .subgroups
            .iter()
            .filter(|group| {
                let equal = other.subgroups.contains(*group);
                let covered = group.names.iter().all(|name| other.names.contains(name));
                !equal && !covered
            })
            .cloned()
            .collect();

        ColumnSelector::from_parts(remaining_names, remaining_groups, Vec::new())
    }
}

/// Selectors compare by declared construction order. Two wildcards are always
/// equal; a wildcard never equals a non-wildcard.
impl PartialEq for ColumnSelector {
    fn eq(&self, other: &Self) -> bool {
        match (self.all, other.all) {
            (true, true) => true,
            (false, false) => self.names == other.names && self.subgroups == other.subgroups,
            _ => false,
        }
    }
}

impl Eq for ColumnSelector {}

impl From<&str> for ColumnSelector {
    fn from(name: &str) -> Self {
        ColumnSelector::new([name])
    }
}

impl From<Vec<&str>> for ColumnSelector {
    fn from(names: Vec<&str>) -> Self {
        ColumnSelector::new(names)
    }
}

impl From<Vec<String>> for ColumnSelector {
    fn from(names: Vec<String>) -> Self {
        ColumnSelector::new(names)
    }
}

impl From<&str> for GroupedName {
    fn from(name: &str) -> Self {
        GroupedName::Name(name.to_string())
    }
}

impl From<Vec<&str>> for GroupedName {
    fn from(names: Vec<&str>) -> Self {
        GroupedName::Group(names.into_iter().map(str::to_string).collect())
    }
}

//==================================================================================
// 5. Serialization
//==================================================================================

#[derive(Deserialize)]
struct GroupRepr {
    names: Vec<String>,
    #[serde(default)]
    tags: Vec<Tag>,
}

impl TryFrom<GroupRepr> for ColumnGroup {
    type Error = MerlinError;

    fn try_from(repr: GroupRepr) -> Result<Self, Self::Error> {
        Ok(ColumnGroup::new(repr.names)?.with_tags(repr.tags))
    }
}

/// The wire shape of a selector. Subgroups are validated as they are read
/// (see `GroupRepr`); the rest goes through `from_parts`, so the wildcard
/// still forces everything else empty.
#[derive(Deserialize)]
struct SelectorRepr {
    #[serde(default)]
    names: Vec<String>,
    #[serde(default)]
    tags: Vec<Tag>,
    #[serde(default)]
    subgroups: Vec<ColumnGroup>,
    #[serde(default)]
    all: bool,
}

impl From<SelectorRepr> for ColumnSelector {
    fn from(repr: SelectorRepr) -> Self {
        if repr.all {
            return ColumnSelector::all();
        }
        ColumnSelector::from_parts(repr.names, repr.subgroups, repr.tags)
    }
}

//==================================================================================
// 6. Helpers
//==================================================================================

fn dedup_preserving_order<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
