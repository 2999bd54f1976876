//! Static page class metadata.

use std::fmt;
use std::ptr;

use crate::content::ContentDsl;

/// Function declaring the content of one page class.
pub type ContentDeclaration = fn(&mut ContentDsl);

/// Root of every page class hierarchy.
pub static PAGE: PageClass = PageClass::root("Page");

/// Compile-time description of a page object class.
///
/// Page classes are `static` items linked to their parent, so the class
/// hierarchy is walked without reflection.
///
/// # Example
///
/// ```ignore
/// static LOGIN: PageClass = PageClass::new("LoginPage")
///     .url("login")
///     .content(declare_login);
///
/// static ADMIN_LOGIN: PageClass = PageClass::new("AdminLoginPage")
///     .extends(&LOGIN)
///     .url("admin/login");
/// ```
pub struct PageClass {
    name: &'static str,
    parent: Option<&'static PageClass>,
    url: Option<&'static str>,
    content: Option<ContentDeclaration>,
}

impl PageClass {
    /// A class without a parent.
    #[must_use]
    pub const fn root(name: &'static str) -> Self {
        Self {
            name,
            parent: None,
            url: None,
            content: None,
        }
    }

    /// A class extending [`PAGE`].
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            parent: Some(&PAGE),
            url: None,
            content: None,
        }
    }

    /// Sets the parent class.
    #[must_use]
    pub const fn extends(mut self, parent: &'static PageClass) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the URL the class is navigated to.
    #[must_use]
    pub const fn url(mut self, url: &'static str) -> Self {
        self.url = Some(url);
        self
    }

    /// Sets the content declaration function.
    #[must_use]
    pub const fn content(mut self, declare: ContentDeclaration) -> Self {
        self.content = Some(declare);
        self
    }

    /// Class name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Parent class.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<&'static PageClass> {
        self.parent
    }

    /// URL declared by this class or the nearest ancestor declaring one.
    #[must_use]
    pub fn page_url(&self) -> Option<&'static str> {
        self.url.or_else(|| self.parent.and_then(PageClass::page_url))
    }

    /// Content declared by this class itself.
    #[inline]
    #[must_use]
    pub fn content_declaration(&self) -> Option<ContentDeclaration> {
        self.content
    }

    /// This class followed by its ancestors, nearest first.
    pub fn ancestors(&'static self) -> impl Iterator<Item = &'static PageClass> {
        std::iter::successors(Some(self), |class| class.parent)
    }

    /// Returns `true` if `other` is this class or one of its subclasses.
    #[must_use]
    pub fn is_assignable_from(&'static self, other: &'static PageClass) -> bool {
        other.ancestors().any(|class| ptr::eq(class, self))
    }
}

impl fmt::Debug for PageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageClass")
            .field("name", &self.name)
            .field("parent", &self.parent.map(PageClass::name))
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for PageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// ============================================================================
// Tests
// ============================================================================
