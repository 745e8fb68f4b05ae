//! Tabs of the merchant admin page.
//!
//! Each feature contributes one [`TabItem`] through a [`TabExpander`]. The
//! [`TabRegistry`] invokes its expanders in registration order and builds the
//! [`TabsView`] for a page; expanders never see or mutate each other's tabs.

use std::sync::Arc;

use serde::Serialize;

/// One named section of the merchant admin page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabItem {
    pub name: String,
    pub title: String,
    pub template: String,
}

impl TabItem {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            template: template.into(),
        }
    }
}

/// Ordered tabs of one rendered page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TabsView {
    tabs: Vec<TabItem>,
}

impl TabsView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the view with `tab` appended.
    #[must_use]
    pub fn with_tab(mut self, tab: TabItem) -> Self {
        self.tabs.push(tab);
        self
    }

    pub fn tabs(&self) -> &[TabItem] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&TabItem> {
        self.tabs.iter().find(|tab| tab.name == name)
    }
}

/// Contributes a tab to the merchant admin page.
pub trait TabExpander: Send + Sync + 'static {
    fn tab(&self) -> TabItem;

    /// Appends this expander's tab to `view`.
    fn expand(&self, view: TabsView) -> TabsView {
        view.with_tab(self.tab())
    }
}

impl<F> TabExpander for F
where
    F: Fn() -> TabItem + Send + Sync + 'static,
{
    fn tab(&self) -> TabItem {
        self()
    }
}

/// The "Users" tab listing a merchant's users.
#[derive(Debug, Clone, Copy, Default)]
pub struct MerchantUserTabExpander;

impl MerchantUserTabExpander {
    pub const NAME: &'static str = "merchant-user";
    pub const TITLE: &'static str = "Users";
    pub const TEMPLATE: &'static str = "@MerchantUserGui/_partials/merchant-user-tab.twig";
}

impl TabExpander for MerchantUserTabExpander {
    fn tab(&self) -> TabItem {
        TabItem::new(Self::NAME, Self::TITLE, Self::TEMPLATE)
    }
}

/// Ordered list of tab expanders used to compose the page.
#[derive(Clone, Default)]
pub struct TabRegistry {
    expanders: Vec<Arc<dyn TabExpander>>,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the tabs this service provides.
    pub fn with_default_tabs() -> Self {
        Self::new().register(MerchantUserTabExpander)
    }

    #[must_use]
    pub fn register(mut self, expander: impl TabExpander) -> Self {
        self.expanders.push(Arc::new(expander));
        self
    }

    pub fn len(&self) -> usize {
        self.expanders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanders.is_empty()
    }

    /// Runs every expander in registration order.
    pub fn compose(&self) -> TabsView {
        self.expanders
            .iter()
            .fold(TabsView::new(), |view, expander| expander.expand(view))
    }
}

impl std::fmt::Debug for TabRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabRegistry")
            .field("expanders", &self.expanders.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expanding_empty_view_adds_users_tab() {
        let view = MerchantUserTabExpander.expand(TabsView::new());

        assert_eq!(view.len(), 1);
        let tab = &view.tabs()[0];
        assert_eq!(tab.name, "merchant-user");
        assert_eq!(tab.title, "Users");
        assert_eq!(
            tab.template,
            "@MerchantUserGui/_partials/merchant-user-tab.twig"
        );
    }

    #[test]
    fn expand_appends_after_existing_tabs() {
        let view = TabsView::new().with_tab(TabItem::new("general", "General", "general.twig"));
        let view = MerchantUserTabExpander.expand(view);

        let names: Vec<_> = view.tabs().iter().map(|tab| tab.name.as_str()).collect();
        assert_eq!(names, ["general", "merchant-user"]);
    }

    #[test]
    fn expand_is_repeatable() {
        let first = MerchantUserTabExpander.expand(TabsView::new());
        let second = MerchantUserTabExpander.expand(TabsView::new());
        assert_eq!(first, second);
    }

    #[test]
    fn registry_composes_in_registration_order() {
        let registry = TabRegistry::new()
            .register(|| TabItem::new("general", "General", "general.twig"))
            .register(MerchantUserTabExpander)
            .register(|| TabItem::new("legal", "Legal", "legal.twig"));

        let view = registry.compose();
        let names: Vec<_> = view.tabs().iter().map(|tab| tab.name.as_str()).collect();
        assert_eq!(names, ["general", "merchant-user", "legal"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn default_registry_has_users_tab() {
        let view = TabRegistry::with_default_tabs().compose();
        assert_eq!(view.len(), 1);
        assert!(view.find(MerchantUserTabExpander::NAME).is_some());
        assert!(TabRegistry::new().compose().is_empty());
    }

    #[test]
    fn view_serializes_tabs() {
        let json = serde_json::to_value(TabRegistry::with_default_tabs().compose())
            .expect("serialize");
        assert_eq!(json["tabs"][0]["name"], "merchant-user");
        assert_eq!(json["tabs"][0]["title"], "Users");
    }
}
