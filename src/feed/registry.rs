//! Matching a feed URL to the adapter that understands it.
//!
//! Two strategies exist. [`get_parser`] hard-codes the known sources as
//! substring checks. [`Registry::discover`] asks each registered adapter's
//! `can_parse` predicate in registration order. When more than one adapter
//! claims a URL, the first registered wins; the rest are reported in the log and
//! otherwise ignored.
use crate::adapters::{earthporn, nablog, EarthPornAdapter, NaBlogAdapter};
use crate::config::SelectionMode;
use crate::feed::Adapter;

/// A registered feed source.
#[derive(Clone, Copy)]
pub struct AdapterSpec {
    pub name: &'static str,
    pub can_parse: fn(&str) -> bool,
    pub build: fn(&str) -> Box<dyn Adapter>,
}

impl std::fmt::Debug for AdapterSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterSpec").field("name", &self.name).finish()
    }
}

fn build_nablog(url: &str) -> Box<dyn Adapter> {
    Box::new(NaBlogAdapter::new(url))
}

fn build_earthporn(url: &str) -> Box<dyn Adapter> {
    Box::new(EarthPornAdapter::new(url))
}

const BUILTIN: [AdapterSpec; 2] = [
    AdapterSpec {
        name: "nablog",
        can_parse: nablog::can_parse,
        build: build_nablog,
    },
    AdapterSpec {
        name: "earthporn",
        can_parse: earthporn::can_parse,
        build: build_earthporn,
    },
];

/// Static dispatch on well-known URL fragments.
pub fn get_parser(url: &str) -> Option<Box<dyn Adapter>> {
    if nablog::can_parse(url) {
        return Some(build_nablog(url));
    }
    if earthporn::can_parse(url) {
        return Some(build_earthporn(url));
    }
    None
}

/// Picks an adapter for `url` using the configured strategy.
pub fn select_adapter(url: &str, mode: SelectionMode) -> Option<Box<dyn Adapter>> {
    match mode {
        SelectionMode::Static => get_parser(url),
        SelectionMode::Discovery => Registry::default().discover(url),
    }
}

/// An ordered list of adapters queried through their `can_parse` predicates.
#[derive(Debug, Clone)]
pub struct Registry {
    specs: Vec<AdapterSpec>,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            specs: BUILTIN.to_vec(),
        }
    }
}

impl Registry {
    pub fn empty() -> Self {
        Self { specs: Vec::new() }
    }

    /// Appends an adapter; it is consulted after everything registered before it.
    pub fn register(&mut self, spec: AdapterSpec) -> &mut Self {
        self.specs.push(spec);
        self
    }

    fn matching<'a>(&'a self, url: &'a str) -> impl Iterator<Item = &'a AdapterSpec> + 'a {
        self.specs.iter().filter(move |spec| (spec.can_parse)(url))
    }

    /// Builds the first adapter whose predicate accepts `url`.
    pub fn discover(&self, url: &str) -> Option<Box<dyn Adapter>> {
        let mut matching = self.matching(url);
        let chosen = matching.next()?;

        let others: Vec<_> = matching.map(|spec| spec.name).collect();
        if !others.is_empty() {
            tracing::warn!(
                url = %url,
                chosen = chosen.name,
                also_claimed_by = ?others,
                "Several adapters claim this URL, using the first registered"
            );
        }

        tracing::debug!(url = %url, adapter = chosen.name, "Adapter selected");
        Some((chosen.build)(url))
    }
}
