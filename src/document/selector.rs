//! Layer selection.

use std::collections::BTreeSet;

use super::model::Layer;
use crate::error::{LottieError, LottieResult};

/// Legacy wildcard token accepted by [`LayerSelector::from_names`].
pub const WILDCARD_TOKEN: &str = "all";

/// Chooses which layers a transform applies to.
///
/// Names are not unique, so `Named` matches every layer carrying one of the
/// names. Layers without a name never match `Named`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LayerSelector {
    /// Every layer, at every depth.
    #[default]
    All,
    /// Layers whose name is in the set.
    Named(BTreeSet<String>),
}

impl LayerSelector {
    /// Selects layers by exact name. An empty name list is rejected.
    pub fn named<I, S>(names: I) -> LottieResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(LottieError::invalid_selector("no layer names given"));
        }
        Ok(Self::Named(names))
    }

    /// Builds a selector from a caller-supplied name list where the token
    /// `"all"` means every layer.
    pub fn from_names<I, S>(names: I) -> LottieResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.iter().any(|n| n == WILDCARD_TOKEN) {
            return Ok(Self::All);
        }
        Self::named(names)
    }

    pub fn matches(&self, layer: &Layer) -> bool {
        match self {
            Self::All => true,
            Self::Named(names) => layer
                .name
                .as_ref()
                .is_some_and(|name| names.contains(name)),
        }
    }
}
