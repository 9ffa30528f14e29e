//! Annotation lookup: the run-scoped memoizing cache.
//!
//! Every node that survives filtering gets an [`AnnotationData`]: an optional
//! project URL and an optional color. Deriving one is comparatively costly
//! (descriptor fetches along the whole parent chain plus interpolation), and
//! the same coordinate routinely appears in several trees, so the cache
//! guarantees each coordinate is resolved at most once per run.
//!
//! The cache is created fresh for every run and never shared between runs.
//! Resolution failures are not cached as errors: they are logged and recorded
//! as an empty annotation, which also prevents re-resolving a broken
//! coordinate over and over within the run.

pub mod color;
pub mod rules;
mod url;

pub use color::Color;
pub use rules::ColorRule;
pub use url::{MetadataUrlResolver, ReactorUrlResolver, UrlResolver};

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::descriptor::MetadataResolver;
use crate::tree::Coordinate;

/// Annotation data derived for one coordinate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationData {
    /// Project web site, if the effective model declares one
    pub url: Option<String>,
    /// Color decided by the first matching color rule, if any
    pub color: Option<Color>,
}

/// Memoized per-coordinate annotation lookup.
///
/// Interior mutability keeps `lookup` callable through shared references,
/// which the URL resolvers rely on; the whole run is single threaded so a
/// `RefCell` is all the synchronization needed.
pub struct AnnotationCache {
    resolver: MetadataResolver,
    rules: Vec<ColorRule>,
    entries: RefCell<HashMap<Coordinate, AnnotationData>>,
    resolutions: Cell<usize>,
}

impl AnnotationCache {
    pub fn new(resolver: MetadataResolver, rules: Vec<ColorRule>) -> Self {
        Self {
            resolver,
            rules,
            entries: RefCell::new(HashMap::new()),
            resolutions: Cell::new(0),
        }
    }

    /// Annotation data for `coordinate`, resolving it on first access.
    pub fn lookup(&self, coordinate: &Coordinate) -> AnnotationData {
        if let Some(data) = self.entries.borrow().get(coordinate) {
            return data.clone();
        }

        let data = self.resolve_annotation(coordinate);
        self.resolutions.set(self.resolutions.get() + 1);
        self.entries.borrow_mut().insert(coordinate.clone(), data.clone());
        data
    }

    /// How many coordinates have been resolved (not served from memory).
    pub fn resolution_count(&self) -> usize {
        self.resolutions.get()
    }

    fn resolve_annotation(&self, coordinate: &Coordinate) -> AnnotationData {
        let model = match self.resolver.resolve(coordinate) {
            Ok(Some(model)) => model,
            Ok(None) => {
                tracing::debug!("{}: no descriptor, rendering without annotation", coordinate);
                return AnnotationData::default();
            }
            Err(e) => {
                tracing::debug!("{}: {e:#}, rendering without annotation", coordinate);
                return AnnotationData::default();
            }
        };

        match rules::match_color(&self.rules, &model.properties) {
            Ok(color) => AnnotationData {
                url: model.url,
                color,
            },
            Err(e) => {
                tracing::debug!("{}: {e:#}, rendering without annotation", coordinate);
                AnnotationData::default()
            }
        }
    }
}
