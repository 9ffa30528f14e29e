//! Node hyperlink resolution.
//!
//! Rendering asks one question per node: "where should clicking this node
//! go?" The answer differs between a plain render (use whatever the
//! descriptor declares) and a site report (modules of the build link to
//! their sibling report pages). The [`UrlResolver`] trait is that seam.

use std::collections::HashMap;

use super::AnnotationCache;
use crate::tree::Coordinate;

/// Decides the hyperlink attached to a rendered node, if any.
pub trait UrlResolver {
    fn resolve_url(&self, coordinate: &Coordinate) -> Option<String>;
}

/// Links every node to the URL from its effective descriptor model.
pub struct MetadataUrlResolver<'a> {
    cache: &'a AnnotationCache,
}

impl<'a> MetadataUrlResolver<'a> {
    pub fn new(cache: &'a AnnotationCache) -> Self {
        Self { cache }
    }
}

impl UrlResolver for MetadataUrlResolver<'_> {
    fn resolve_url(&self, coordinate: &Coordinate) -> Option<String> {
        self.cache.lookup(coordinate).url
    }
}

/// Prefers generated report pages for build modules, falling back to
/// descriptor URLs for everything else.
pub struct ReactorUrlResolver<'a> {
    cache: &'a AnnotationCache,
    pages: HashMap<Coordinate, String>,
}

impl<'a> ReactorUrlResolver<'a> {
    pub fn new(cache: &'a AnnotationCache, pages: HashMap<Coordinate, String>) -> Self {
        Self { cache, pages }
    }
}

impl UrlResolver for ReactorUrlResolver<'_> {
    fn resolve_url(&self, coordinate: &Coordinate) -> Option<String> {
        self.pages
            .get(coordinate)
            .cloned()
            .or_else(|| self.cache.lookup(coordinate).url)
    }
}
