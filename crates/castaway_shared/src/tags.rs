//! Hierarchical gameplay tags.
//!
//! Tags are dot-separated names such as `Tool.Axe.Stone`. A tag satisfies a
//! requirement for itself or for any of its parents, so an effect tagged
//! `Tool.Axe` meets a resource that only requires `Tool`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A single hierarchical gameplay tag.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameplayTag(String);

impl GameplayTag {
    /// Creates a tag from its dotted name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the dotted name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this tag is `other` or one of its descendants.
    #[must_use]
    pub fn matches(&self, other: &GameplayTag) -> bool {
        match self.0.strip_prefix(other.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('.'),
            None => false,
        }
    }
}

impl fmt::Display for GameplayTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameplayTag {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// An ordered set of gameplay tags.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagContainer {
    tags: BTreeSet<GameplayTag>,
}

impl TagContainer {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tag. Returns false if it was already present.
    pub fn insert(&mut self, tag: GameplayTag) -> bool {
        self.tags.insert(tag)
    }

    /// Number of tags in the container.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns true if the container holds no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterates tags in order.
    pub fn iter(&self) -> impl Iterator<Item = &GameplayTag> {
        self.tags.iter()
    }

    /// Returns true if any held tag matches `required` (hierarchically).
    #[must_use]
    pub fn has_tag(&self, required: &GameplayTag) -> bool {
        self.tags.iter().any(|tag| tag.matches(required))
    }

    /// Returns true if every tag in `required` is matched. An empty
    /// requirement is always met.
    #[must_use]
    pub fn has_all(&self, required: &TagContainer) -> bool {
        required.iter().all(|tag| self.has_tag(tag))
    }

    /// Required tags this container does not match.
    #[must_use]
    pub fn missing(&self, required: &TagContainer) -> Vec<GameplayTag> {
        required
            .iter()
            .filter(|tag| !self.has_tag(tag))
            .cloned()
            .collect()
    }
}

impl<T: Into<GameplayTag>> FromIterator<T> for TagContainer {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for TagContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, tag) in self.tags.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{tag}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hierarchical_match() {
        let axe = GameplayTag::new("Tool.Axe");
        assert!(axe.matches(&GameplayTag::new("Tool")));
        assert!(axe.matches(&GameplayTag::new("Tool.Axe")));
        assert!(!axe.matches(&GameplayTag::new("Tool.Axe.Stone")));
        // Prefix of a segment is not a parent
        assert!(!GameplayTag::new("Toolbox").matches(&GameplayTag::new("Tool")));
    }

    #[test]
    fn test_has_all() {
        let source: TagContainer = ["Chop", "Tool.Axe"].into_iter().collect();
        let needs_chop: TagContainer = ["Chop"].into_iter().collect();
        let needs_mine: TagContainer = ["Mine"].into_iter().collect();

        assert!(source.has_all(&needs_chop));
        assert!(source.has_all(&TagContainer::new()));
        assert!(!source.has_all(&needs_mine));
        assert_eq!(source.missing(&needs_mine), vec![GameplayTag::new("Mine")]);
    }

    #[test]
    fn test_toml_list_form() {
        #[derive(Deserialize)]
        struct Holder {
            tags: TagContainer,
        }
        let holder: Holder = toml::from_str(r#"tags = ["Mine", "Tool.Pickaxe"]"#).unwrap();
        assert_eq!(holder.tags.len(), 2);
        assert_eq!(holder.tags.to_string(), "{Mine, Tool.Pickaxe}");
    }
}
