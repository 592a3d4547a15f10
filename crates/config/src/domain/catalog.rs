//! Category table and size guides

use serde::{Deserialize, Serialize};

/// Catalog category with the free-text aliases that point at it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    /// Catalog id, e.g. `c:tee`
    pub id: String,
    /// Display label
    pub label: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Size chart chosen by category id substring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeGuide {
    /// Substrings of the product's category id selecting this guide
    #[serde(default, rename = "match")]
    pub matches: Vec<String>,
    pub sizes: String,
    #[serde(default)]
    pub tip: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeGuides {
    #[serde(default)]
    pub guides: Vec<SizeGuide>,
    pub default: SizeGuide,
}

impl SizeGuides {
    /// Guide for a category id; the default guide when nothing matches
    pub fn for_category(&self, category_id: &str) -> &SizeGuide {
        let category_id = category_id.to_lowercase();
        self.guides
            .iter()
            .find(|g| g.matches.iter().any(|m| category_id.contains(m.as_str())))
            .unwrap_or(&self.default)
    }

    /// Tip for a guide, inheriting the default tip when it has none
    pub fn tip_for<'a>(&'a self, guide: &'a SizeGuide) -> Option<&'a str> {
        guide.tip.as_deref().or(self.default.tip.as_deref())
    }
}
