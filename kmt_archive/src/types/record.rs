//! Reaction records extracted from the archive's XML payloads.

use serde::{Deserialize, Serialize};

use super::DetailLinkRef;

/// Structure identifiers for one molecule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    /// SMILES string for the molecule, if the payload carried one.
    pub smiles: Option<String>,
}

/// One `<molecule>` block of a reaction payload.
///
/// Every field is optional on its own: a block missing its role still keeps
/// its name and structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoleculeComponent {
    /// Role in the reaction (e.g. "reactant", "product", "catalyst").
    pub role: Option<String>,

    /// Human-readable molecule name.
    pub name: Option<String>,

    pub structure: Structure,
}

/// What the text extractor recovered from a single payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedReaction {
    pub reaction_smiles: Option<String>,
    pub components: Vec<MoleculeComponent>,
}

impl ExtractedReaction {
    /// True when neither a reaction SMILES nor any molecule was found.
    pub fn is_empty(&self) -> bool {
        self.reaction_smiles.is_none() && self.components.is_empty()
    }
}

/// A fully resolved reaction detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionRecord {
    /// Detail page the record was resolved from.
    pub url: DetailLinkRef,

    /// Reaction SMILES (`reactants>agents>products`), if present.
    pub reaction_smiles: Option<String>,

    /// Participating molecules in payload order.
    pub components: Vec<MoleculeComponent>,
}

impl ReactionRecord {
    pub fn new(url: DetailLinkRef, extracted: ExtractedReaction) -> Self {
        Self {
            url,
            reaction_smiles: extracted.reaction_smiles,
            components: extracted.components,
        }
    }

    /// Reaction SMILES shortened to `max_chars` characters for display,
    /// or `N/A` when the record has none or it is empty.
    pub fn smiles_preview(&self, max_chars: usize) -> String {
        match self.reaction_smiles.as_deref().filter(|s| !s.is_empty()) {
            Some(smiles) if smiles.chars().count() > max_chars => {
                let head: String = smiles.chars().take(max_chars).collect();
                format!("{}...", head)
            }
            Some(smiles) => smiles.to_string(),
            None => "N/A".to_string(),
        }
    }
}
