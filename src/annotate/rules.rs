//! Property-based color rules.
//!
//! Rules pair a property key/value with a color. During annotation the rules
//! are evaluated top to bottom against the effective model's properties, and
//! the first fully-specified rule whose property matches exactly decides the
//! node color. Later matches never override earlier ones, so declaration
//! order is the priority order.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::color::Color;
use crate::core::DepvizError;

/// One color rule.
///
/// All three fields must be present for the rule to take part in matching;
/// partially-specified rules (possible through the config file) are skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorRule {
    /// Property key to look up in the effective model
    pub property: Option<String>,
    /// Required property value, compared for exact equality
    pub value: Option<String>,
    /// Color applied on match
    pub color: Option<String>,
}

impl ColorRule {
    pub fn new(
        property: impl Into<String>,
        value: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            property: Some(property.into()),
            value: Some(value.into()),
            color: Some(color.into()),
        }
    }

    /// Parse the command line form `property=value:#RRGGBB`.
    ///
    /// The color part is everything after the last `:` so property values
    /// may themselves contain colons.
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = || DepvizError::InvalidColorRule {
            rule: spec.to_string(),
        };

        let (matcher, color) = spec.rsplit_once(':').ok_or_else(invalid)?;
        let (property, value) = matcher.split_once('=').ok_or_else(invalid)?;
        if property.is_empty() || color.is_empty() {
            return Err(invalid().into());
        }
        Ok(Self::new(property, value, color))
    }

    fn is_complete(&self) -> bool {
        self.property.is_some() && self.value.is_some() && self.color.is_some()
    }
}

/// Find the color for a property set.
///
/// Returns the color of the first complete rule, in declaration order, whose
/// property is present with exactly the expected value. A matching rule with
/// an unparseable color literal is an error; the annotation layer degrades
/// it to "no annotation" for the coordinate.
pub fn match_color(
    rules: &[ColorRule],
    properties: &BTreeMap<String, String>,
) -> Result<Option<Color>> {
    for rule in rules {
        if !rule.is_complete() {
            continue;
        }
        let (property, value, color) = (
            rule.property.as_deref().unwrap_or_default(),
            rule.value.as_deref().unwrap_or_default(),
            rule.color.as_deref().unwrap_or_default(),
        );
        if properties.get(property).is_some_and(|actual| actual == value) {
            return Color::decode(color).map(Some);
        }
    }
    Ok(None)
}
