//! Content declarations and the per-page template registry.

use std::collections::hash_map::Entry;
use std::fmt;
use std::future::Future;
use std::ptr;
use std::sync::Arc;

use futures_util::FutureExt;
use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::page::PageClass;

use super::context::ContentContext;
use super::template::{ContentFactory, ContentTemplate, TemplateParams};
use super::value::FactoryOutput;

// ============================================================================
// ContentDsl
// ============================================================================

/// One declared content accessor, not yet bound to a page.
pub struct ContentDefinition {
    name: String,
    params: TemplateParams,
    factory: ContentFactory,
}

impl fmt::Debug for ContentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentDefinition")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl ContentDefinition {
    /// Declared name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared options.
    #[inline]
    #[must_use]
    pub fn params(&self) -> &TemplateParams {
        &self.params
    }
}

/// Collects the content declarations of one page class.
///
/// # Example
///
/// ```ignore
/// fn declare(dsl: &mut ContentDsl) {
///     dsl.content("heading", TemplateParams::new(), |ctx| async move {
///         Ok(ctx.find("h1").await?.into())
///     });
/// }
/// ```
#[derive(Debug, Default)]
pub struct ContentDsl {
    definitions: Vec<ContentDefinition>,
}

impl ContentDsl {
    /// Creates an empty declaration list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a content accessor.
    pub fn content<F, Fut>(
        &mut self,
        name: impl Into<String>,
        params: TemplateParams,
        factory: F,
    ) -> &mut Self
    where
        F: Fn(ContentContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<FactoryOutput>> + Send + 'static,
    {
        let factory: ContentFactory = Arc::new(move |context| factory(context).boxed());
        self.definitions.push(ContentDefinition {
            name: name.into(),
            params,
            factory,
        });
        self
    }

    /// Declarations in the order they were made.
    #[must_use]
    pub fn definitions(&self) -> &[ContentDefinition] {
        &self.definitions
    }

    fn into_definitions(self) -> Vec<ContentDefinition> {
        self.definitions
    }
}

// ============================================================================
// TemplateRegistry
// ============================================================================

/// Content templates of one page, keyed by name.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: FxHashMap<String, Arc<ContentTemplate>>,
}

impl TemplateRegistry {
    /// Collects the templates declared from `start` up to, not including,
    /// `stop`.
    ///
    /// Walking goes subclass first, so a name declared by a more derived
    /// class shadows the same name further up. Within one class, a later
    /// declaration replaces an earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] naming both classes if `stop` is
    /// neither `start` nor one of its ancestors.
    pub fn build(start: &'static PageClass, stop: &'static PageClass) -> Result<Self> {
        if !stop.is_assignable_from(start) {
            return Err(Error::invalid_argument(format!(
                "{stop} is not a superclass of {start}"
            )));
        }

        let mut templates: FxHashMap<String, Arc<ContentTemplate>> = FxHashMap::default();

        for class in start.ancestors().take_while(|class| !ptr::eq(*class, stop)) {
            let Some(declare) = class.content_declaration() else {
                continue;
            };

            let mut dsl = ContentDsl::new();
            declare(&mut dsl);

            let mut level: FxHashMap<String, ContentDefinition> = FxHashMap::default();
            for definition in dsl.into_definitions() {
                let name = definition.name.clone();
                if level.insert(name.clone(), definition).is_some() {
                    warn!(page = %class, %name, "Content declared twice, keeping the later declaration");
                }
            }

            for (name, definition) in level {
                match templates.entry(name) {
                    Entry::Occupied(existing) => {
                        trace!(
                            page = %class,
                            name = %existing.key(),
                            "Content shadowed by subclass"
                        );
                    }
                    Entry::Vacant(slot) => {
                        debug!(page = %class, name = %slot.key(), "Registered content");
                        let template = ContentTemplate::new(
                            slot.key().clone(),
                            class,
                            definition.params,
                            definition.factory,
                        );
                        slot.insert(Arc::new(template));
                    }
                }
            }
        }

        Ok(Self { templates })
    }

    /// Template named `name`.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<ContentTemplate>> {
        self.templates.get(name)
    }

    /// Returns `true` if a template named `name` exists.
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Template names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.templates.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Number of templates.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns `true` if no templates were declared.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::page::PAGE;

    fn value(v: serde_json::Value) -> impl Future<Output = Result<FactoryOutput>> {
        async move { Ok(FactoryOutput::Value(v)) }
    }

    fn declare_base(dsl: &mut ContentDsl) {
        dsl.content("title", TemplateParams::new(), |_| value(json!("base")))
            .content("footer", TemplateParams::new(), |_| value(json!("footer")));
    }

    fn declare_derived(dsl: &mut ContentDsl) {
        dsl.content("title", TemplateParams::new().cache(true), |_| {
            value(json!("derived"))
        });
    }

    fn declare_twice(dsl: &mut ContentDsl) {
        dsl.content("x", TemplateParams::new(), |_| value(json!(1)))
            .content("x", TemplateParams::new().required(false), |_| value(json!(2)));
    }

    static BASE: PageClass = PageClass::new("BasePage").content(declare_base);
    static DERIVED: PageClass = PageClass::new("DerivedPage")
        .extends(&BASE)
        .content(declare_derived);
    static UNRELATED: PageClass = PageClass::new("UnrelatedPage");
    static TWICE: PageClass = PageClass::new("TwicePage").content(declare_twice);

    #[test]
    fn test_subclass_wins() {
        let registry = TemplateRegistry::build(&DERIVED, &PAGE).unwrap();
        let title = registry.get("title").unwrap();
        assert!(ptr::eq(title.owner(), &DERIVED));
        assert!(title.params().is_cached());
        assert_eq!(registry.names(), vec!["footer", "title"]);
    }

    #[test]
    fn test_boundary_is_excluded() {
        let registry = TemplateRegistry::build(&DERIVED, &BASE).unwrap();
        assert_eq!(registry.names(), vec!["title"]);

        let registry = TemplateRegistry::build(&DERIVED, &DERIVED).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_invalid_bound_names_both_classes() {
        let err = TemplateRegistry::build(&DERIVED, &UNRELATED).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, Error::InvalidArgument { .. }));
        assert!(message.contains("UnrelatedPage"));
        assert!(message.contains("DerivedPage"));

        assert!(TemplateRegistry::build(&BASE, &DERIVED).is_err());
    }

    #[test]
    fn test_same_level_redeclaration_keeps_last() {
        let registry = TemplateRegistry::build(&TWICE, &PAGE).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(!registry.get("x").unwrap().params().is_required());
    }

    #[test]
    fn test_display_names_owner() {
        let registry = TemplateRegistry::build(&DERIVED, &PAGE).unwrap();
        assert_eq!(
            registry.get("footer").unwrap().to_string(),
            "content template 'footer' defined by BasePage"
        );
    }

    #[test]
    fn test_dsl_keeps_declaration_order() {
        let mut dsl = ContentDsl::new();
        declare_base(&mut dsl);
        let names: Vec<_> = dsl.definitions().iter().map(ContentDefinition::name).collect();
        assert_eq!(names, vec!["title", "footer"]);
    }
}
