//! Effective model resolution: parent chain assembly and interpolation.

use anyhow::Result;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};

use super::{Descriptor, DescriptorSource};
use crate::core::DepvizError;
use crate::tree::Coordinate;

/// Parent chains longer than this are treated as broken metadata.
const MAX_PARENT_DEPTH: usize = 32;

/// Interpolation passes before a value is considered non-converging.
const MAX_INTERPOLATION_PASSES: usize = 10;

/// The merged, interpolated view of a project's descriptor chain.
///
/// This is what the annotation layer consumes: the child's values with
/// everything missing filled in from its ancestors, and all `${...}`
/// placeholders expanded where possible.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveModel {
    pub coordinate: Coordinate,
    /// Project web site, already interpolated
    pub url: Option<String>,
    /// Union of the chain's properties, child values winning
    pub properties: BTreeMap<String, String>,
}

/// Resolves a coordinate to its [`EffectiveModel`].
///
/// The parent chain is walked iteratively with a visited set and a depth
/// cap, so cyclic or absurdly deep parent declarations surface as
/// [`DepvizError::Resolution`] instead of blowing the stack. Each resolver
/// call is independent; memoization happens one layer up in the annotation
/// cache.
pub struct MetadataResolver {
    source: Box<dyn DescriptorSource>,
    placeholder: Regex,
}

impl MetadataResolver {
    pub fn new(source: Box<dyn DescriptorSource>) -> Self {
        Self {
            source,
            // The pattern is fixed and known-good
            placeholder: Regex::new(r"\$\{([^}]+)\}").unwrap(),
        }
    }

    /// Resolve the effective model for `coordinate`.
    ///
    /// Returns `Ok(None)` when the repository has no descriptor for the
    /// coordinate at all. Any failure along the parent chain (missing or
    /// malformed ancestor, cyclic or too-deep chain, non-converging
    /// interpolation) is a [`DepvizError::Resolution`] for this coordinate.
    pub fn resolve(&self, coordinate: &Coordinate) -> Result<Option<EffectiveModel>> {
        let Some(descriptor) = self.source.fetch(coordinate)? else {
            return Ok(None);
        };

        let chain = self.collect_chain(coordinate, descriptor)?;
        let model = Self::merge_chain(coordinate, &chain);
        let model = self.interpolate_model(model)?;
        Ok(Some(model))
    }

    /// Walk the parent declarations, child first.
    fn collect_chain(
        &self,
        coordinate: &Coordinate,
        descriptor: Descriptor,
    ) -> Result<Vec<Descriptor>> {
        let mut visited: HashSet<Coordinate> = HashSet::new();
        visited.insert(coordinate.clone());

        let mut chain = vec![descriptor];
        loop {
            let next = match &chain[chain.len() - 1].project.parent {
                Some(parent) => parent.coordinate(),
                None => break,
            };

            if !visited.insert(next.clone()) {
                return Err(DepvizError::Resolution {
                    coordinate: coordinate.to_string(),
                    reason: format!("parent chain cycles back to '{next}'"),
                }
                .into());
            }
            if chain.len() >= MAX_PARENT_DEPTH {
                return Err(DepvizError::Resolution {
                    coordinate: coordinate.to_string(),
                    reason: format!("parent chain exceeds {MAX_PARENT_DEPTH} ancestors"),
                }
                .into());
            }

            let parent = self.source.fetch(&next)?.ok_or_else(|| DepvizError::Resolution {
                coordinate: coordinate.to_string(),
                reason: format!("parent descriptor '{next}' not found"),
            })?;
            tracing::trace!("{}: inheriting from parent {}", coordinate, next);
            chain.push(parent);
        }
        Ok(chain)
    }

    /// Merge the chain into a single model, the child's values winning.
    ///
    /// `chain` is ordered child first. Properties are merged oldest ancestor
    /// first so nearer descriptors override; the URL falls back through the
    /// chain until some level defines it.
    fn merge_chain(coordinate: &Coordinate, chain: &[Descriptor]) -> EffectiveModel {
        let mut properties = BTreeMap::new();
        for descriptor in chain.iter().rev() {
            properties.extend(
                descriptor.properties.iter().map(|(k, v)| (k.clone(), v.clone())),
            );
        }

        let url = chain.iter().find_map(|d| d.project.url.clone());

        EffectiveModel {
            coordinate: coordinate.clone(),
            url,
            properties,
        }
    }

    /// Expand `${...}` placeholders in the URL and all property values.
    fn interpolate_model(&self, model: EffectiveModel) -> Result<EffectiveModel> {
        let EffectiveModel {
            coordinate,
            url,
            properties,
        } = model;

        let mut interpolated = BTreeMap::new();
        for (key, value) in &properties {
            interpolated
                .insert(key.clone(), self.interpolate(value, &properties, &coordinate)?);
        }

        let url = match url {
            Some(url) => Some(self.interpolate(&url, &properties, &coordinate)?),
            None => None,
        };

        Ok(EffectiveModel {
            coordinate,
            url,
            properties: interpolated,
        })
    }

    /// Expand placeholders in a single value.
    ///
    /// Unknown keys stay as literal `${...}` text. A value that keeps
    /// changing after [`MAX_INTERPOLATION_PASSES`] passes, or that expands a
    /// key to itself, is reported as a resolution failure.
    fn interpolate(
        &self,
        input: &str,
        properties: &BTreeMap<String, String>,
        coordinate: &Coordinate,
    ) -> Result<String> {
        let mut current = input.to_string();
        for _ in 0..MAX_INTERPOLATION_PASSES {
            let mut replaced = false;
            let next = self
                .placeholder
                .replace_all(&current, |caps: &regex::Captures<'_>| {
                    let key = &caps[1];
                    if let Some(value) = builtin_value(key, coordinate) {
                        replaced = true;
                        value
                    } else if let Some(value) = properties.get(key) {
                        replaced = true;
                        value.clone()
                    } else {
                        caps[0].to_string()
                    }
                })
                .into_owned();

            if !replaced {
                // Leftover placeholders are unknown keys, kept verbatim
                return Ok(next);
            }
            if next == current {
                return Err(DepvizError::Resolution {
                    coordinate: coordinate.to_string(),
                    reason: format!("self-referential property expansion in '{input}'"),
                }
                .into());
            }
            current = next;
        }

        Err(DepvizError::Resolution {
            coordinate: coordinate.to_string(),
            reason: format!(
                "property expansion of '{input}' did not converge after {MAX_INTERPOLATION_PASSES} passes"
            ),
        }
        .into())
    }
}

/// Built-in placeholder values derived from the coordinate being resolved.
fn builtin_value(key: &str, coordinate: &Coordinate) -> Option<String> {
    match key {
        "project.groupId" => Some(coordinate.group.clone()),
        "project.artifactId" => Some(coordinate.artifact.clone()),
        "project.version" => Some(coordinate.version.clone()),
        _ => None,
    }
}
