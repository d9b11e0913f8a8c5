//! Tolerant extraction of reaction data from archive XML payloads.
//!
//! The payloads are not guaranteed to be well-formed XML (stray `&` and
//! unbalanced tags occur), so values are pulled out by matching known tag
//! pairs instead of parsing the document.

use kmt_archive::types::{ExtractedReaction, MoleculeComponent, Structure};
use std::borrow::Cow;

use regex::{Captures, Regex};

const REACTION_TAG: &str = "reactionSmiles";
const MOLECULE_TAG: &str = "molecule";
const ROLE_TAG: &str = "role";
const NAME_TAG: &str = "name";
const SMILES_TAG: &str = "smiles";

/// Compiled tag-pair patterns for one extraction pass.
struct ReactionPatterns {
    reaction: Regex,
    molecule: Regex,
    role: Regex,
    name: Regex,
    smiles: Regex,
    legacy_entity: Regex,
}

impl ReactionPatterns {
    fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            reaction: tag_pair(REACTION_TAG)?,
            molecule: tag_pair(MOLECULE_TAG)?,
            role: tag_pair(ROLE_TAG)?,
            name: tag_pair(NAME_TAG)?,
            smiles: tag_pair(SMILES_TAG)?,
            legacy_entity: Regex::new(r"&(?:(amp|lt|gt|quot)(;?)|#(?:0+|[xX]0+);)")?,
        })
    }
}

/// `<tag>…</tag>` with a lazy, multi-line inner capture.
fn tag_pair(tag: &str) -> Result<Regex, regex::Error> {
    let tag = regex::escape(tag);
    Regex::new(&format!(r"(?s)<{tag}>(.*?)</{tag}>"))
}

/// Pulls the reaction SMILES and molecule list out of `raw`.
///
/// Never fails: anything that cannot be matched comes back as `None` or an
/// empty component list.
pub fn extract(raw: &str) -> ExtractedReaction {
    match ReactionPatterns::new() {
        Ok(patterns) => extract_with(&patterns, raw),
        Err(e) => {
            tracing::warn!("Extraction patterns failed to compile: {}", e);
            ExtractedReaction::default()
        }
    }
}

fn extract_with(patterns: &ReactionPatterns, raw: &str) -> ExtractedReaction {
    let reaction_smiles = first_value(patterns, &patterns.reaction, raw);

    let components = patterns
        .molecule
        .captures_iter(raw)
        .filter_map(|cap| cap.get(1))
        .map(|block| {
            let block = block.as_str();
            MoleculeComponent {
                role: first_value(patterns, &patterns.role, block),
                name: first_value(patterns, &patterns.name, block),
                structure: Structure {
                    smiles: first_value(patterns, &patterns.smiles, block),
                },
            }
        })
        .collect();

    ExtractedReaction {
        reaction_smiles,
        components,
    }
}

/// Trimmed, entity-decoded body of the first match of `pattern`.
fn first_value(
    patterns: &ReactionPatterns,
    pattern: &Regex,
    haystack: &str,
) -> Option<String> {
    let inner = pattern.captures(haystack)?.get(1)?;
    let normalized = normalize_legacy_entities(&patterns.legacy_entity, inner.as_str().trim());
    Some(html_escape::decode_html_entities(&normalized).into_owned())
}

/// Rewrites entities browsers accept but `html_escape` leaves alone.
///
/// `&gt`, `&lt`, `&amp` and `&quot` without their semicolon get one, and a
/// NUL character reference becomes U+FFFD.
fn normalize_legacy_entities<'a>(legacy: &Regex, value: &'a str) -> Cow<'a, str> {
    legacy.replace_all(value, |cap: &Captures| match (cap.get(1), cap.get(2)) {
        (Some(name), Some(semicolon)) if semicolon.as_str().is_empty() => {
            format!("&{};", name.as_str())
        }
        (Some(_), _) => cap[0].to_string(),
        (None, _) => "\u{FFFD}".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_molecule_payload() {
        let xml = "<reactionSmiles>A+B&gt;C</reactionSmiles><molecule><role>reactant</role><name>A</name><smiles>CC</smiles></molecule>";
        let result = extract(xml);
        assert_eq!(result.reaction_smiles.as_deref(), Some("A+B>C"));
        assert_eq!(
            result.components,
            vec![MoleculeComponent {
                role: Some("reactant".into()),
                name: Some("A".into()),
                structure: Structure {
                    smiles: Some("CC".into())
                },
            }]
        );
    }

    #[test]
    fn components_keep_source_order_and_null_missing_fields() {
        let xml = r#"<?xml version="1.0"?>
<reaction>
  <reactionSmiles>
      CC(=O)O.OCC&gt;&gt;CC(=O)OCC
  </reactionSmiles>
  <molecule>
    <role>reactant</role>
    <name>acetic acid</name>
    <smiles>CC(=O)O</smiles>
  </molecule>
  <molecule>
    <name>ethanol</name>
  </molecule>
  <molecule>
    <role>product</role>
    <smiles>CC(=O)OCC</smiles>
  </molecule>
</reaction>"#;
        let result = extract(xml);
        assert_eq!(
            result.reaction_smiles.as_deref(),
            Some("CC(=O)O.OCC>>CC(=O)OCC")
        );
        assert_eq!(result.components.len(), 3);

        assert_eq!(result.components[0].name.as_deref(), Some("acetic acid"));

        assert_eq!(result.components[1].role, None);
        assert_eq!(result.components[1].name.as_deref(), Some("ethanol"));
        assert_eq!(result.components[1].structure.smiles, None);

        assert_eq!(result.components[2].role.as_deref(), Some("product"));
        assert_eq!(result.components[2].name, None);
        assert_eq!(
            result.components[2].structure.smiles.as_deref(),
            Some("CC(=O)OCC")
        );
    }

    #[test]
    fn missing_reaction_tag_yields_none() {
        let result = extract("<molecule><name>water</name></molecule>");
        assert_eq!(result.reaction_smiles, None);
        assert_eq!(result.components.len(), 1);
    }

    #[test]
    fn entities_without_semicolon_are_decoded() {
        let result = extract("<reactionSmiles>A&gtB</reactionSmiles>");
        assert_eq!(result.reaction_smiles.as_deref(), Some("A>B"));

        let result =
            extract("<molecule><name>a&ampb &lt c</name><smiles>C&#0;</smiles></molecule>");
        assert_eq!(result.components[0].name.as_deref(), Some("a&b < c"));
        assert_eq!(
            result.components[0].structure.smiles.as_deref(),
            Some("C\u{FFFD}")
        );
    }

    #[test]
    fn escaped_entities_are_decoded_once() {
        let result = extract("<reactionSmiles>&amp;gt; &amp;gt</reactionSmiles>");
        assert_eq!(result.reaction_smiles.as_deref(), Some("&gt; &gt"));
    }

    #[test]
    fn entities_are_decoded_after_trimming() {
        let xml = "<molecule><name>  N,N&#45;dimethyl &amp; co  </name><smiles>[O&#x2D;]</smiles></molecule>";
        let result = extract(xml);
        assert_eq!(
            result.components[0].name.as_deref(),
            Some("N,N-dimethyl & co")
        );
        assert_eq!(
            result.components[0].structure.smiles.as_deref(),
            Some("[O-]")
        );
    }

    #[test]
    fn only_first_reaction_tag_is_used() {
        let xml = "<reactionSmiles>first</reactionSmiles><reactionSmiles>second</reactionSmiles>";
        assert_eq!(extract(xml).reaction_smiles.as_deref(), Some("first"));
    }

    #[test]
    fn nested_blocks_are_captured_once() {
        let xml = "<molecule><molecule><name>inner</name></molecule><name>outer</name></molecule>";
        let result = extract(xml);
        assert_eq!(result.components.len(), 1);
        assert_eq!(result.components[0].name.as_deref(), Some("inner"));
    }

    #[test]
    fn malformed_input_yields_empty_result() {
        for raw in [
            "",
            "no tags at all",
            "<reactionSmiles>never closed",
            "<molecule><name>x</name>",
            "</molecule><molecule",
            "\u{0}\u{1}\u{fffd}garbage<<>>&&;;",
        ] {
            let result = extract(raw);
            assert_eq!(result, ExtractedReaction::default(), "input: {:?}", raw);
        }
    }

    #[test]
    fn empty_tags_yield_empty_strings() {
        let result = extract("<reactionSmiles></reactionSmiles><molecule><role> </role></molecule>");
        assert_eq!(result.reaction_smiles.as_deref(), Some(""));
        assert_eq!(result.components[0].role.as_deref(), Some(""));
    }
}
