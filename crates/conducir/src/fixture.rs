//! Fixture registry and per-scenario injection scope.
//!
//! A [`FixtureRegistry`] maps fixture names to factories and is built
//! explicitly per run, then handed by reference into the runner. Nothing
//! here is ambient or global. Each scenario gets its own [`FixtureContext`]:
//! factories run at most once per scenario, results are cached so repeated
//! requests yield the same instance, and the whole scope is torn down when
//! the scenario completes regardless of outcome.
//!
//! Factories may request other fixtures through the context; a declared
//! cycle fails fast instead of recursing forever. Cross-cutting hooks are an
//! explicit ordered list attached at setup time and run before every
//! scenario body.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;

use crate::page::PageHandle;
use crate::page_object::PageObject;
use crate::result::{ConducirError, ConducirResult};

/// A fixture value, type-erased for the registry
pub type FixtureValue = Arc<dyn Any + Send + Sync>;

/// Factory producing one fixture value inside a scenario scope
pub type FixtureFactory =
    Arc<dyn for<'a> Fn(&'a FixtureContext) -> BoxFuture<'a, ConducirResult<FixtureValue>> + Send + Sync>;

/// Cross-cutting hook run before every scenario body
pub type FixtureHook =
    Arc<dyn for<'a> Fn(&'a FixtureContext) -> BoxFuture<'a, ConducirResult<()>> + Send + Sync>;

/// Per-run registry of fixture factories and auto-applied hooks
#[derive(Default)]
pub struct FixtureRegistry {
    factories: HashMap<&'static str, FixtureFactory>,
    hooks: Vec<(&'static str, FixtureHook)>,
}

impl std::fmt::Debug for FixtureRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureRegistry")
            .field("fixtures", &self.factories.keys().collect::<Vec<_>>())
            .field("hooks", &self.hooks.iter().map(|(n, _)| n).collect::<Vec<_>>())
            .finish()
    }
}

impl FixtureRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under a fixture name.
    ///
    /// Registering the same name again replaces the previous factory.
    pub fn register<F>(&mut self, name: &'static str, factory: F)
    where
        F: for<'a> Fn(&'a FixtureContext) -> BoxFuture<'a, ConducirResult<FixtureValue>>
            + Send
            + Sync
            + 'static,
    {
        let _ = self.factories.insert(name, Arc::new(factory));
    }

    /// Register the canonical factory for a page object type: bind it to
    /// the scenario's page handle.
    pub fn register_page<P>(&mut self)
    where
        P: PageObject + Send + Sync + 'static,
    {
        self.register(P::NAME, |ctx| {
            let value: FixtureValue = Arc::new(P::bind(ctx.page()));
            Box::pin(async move { Ok(value) })
        });
    }

    /// Append a cross-cutting hook. Hooks run in registration order before
    /// every scenario body.
    pub fn add_hook<F>(&mut self, name: &'static str, hook: F)
    where
        F: for<'a> Fn(&'a FixtureContext) -> BoxFuture<'a, ConducirResult<()>>
            + Send
            + Sync
            + 'static,
    {
        self.hooks.push((name, Arc::new(hook)));
    }

    /// Whether a fixture name is registered
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Number of registered fixtures
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    fn factory(&self, name: &str) -> Option<FixtureFactory> {
        self.factories.get(name).cloned()
    }

    fn hooks(&self) -> &[(&'static str, FixtureHook)] {
        &self.hooks
    }
}

/// Per-scenario fixture scope: one page handle, one instance cache
pub struct FixtureContext {
    scenario: String,
    page: PageHandle,
    registry: Arc<FixtureRegistry>,
    cache: Mutex<HashMap<&'static str, FixtureValue>>,
    building: Mutex<Vec<&'static str>>,
}

impl std::fmt::Debug for FixtureContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureContext")
            .field("scenario", &self.scenario)
            .field("page", &self.page)
            .finish_non_exhaustive()
    }
}

impl FixtureContext {
    /// Open a fixture scope for one scenario
    #[must_use]
    pub fn new(
        scenario: impl Into<String>,
        page: PageHandle,
        registry: Arc<FixtureRegistry>,
    ) -> Self {
        Self {
            scenario: scenario.into(),
            page,
            registry,
            cache: Mutex::new(HashMap::new()),
            building: Mutex::new(Vec::new()),
        }
    }

    /// Name of the scenario this scope belongs to
    #[must_use]
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// The scenario's page handle
    #[must_use]
    pub const fn page(&self) -> &PageHandle {
        &self.page
    }

    /// Request a fixture by name, building it on first use.
    ///
    /// # Errors
    ///
    /// Fails when the name is unregistered, the factory fails, the built
    /// value has a different type, or a dependency cycle is declared.
    pub async fn fixture<T>(&self, name: &'static str) -> ConducirResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        if let Some(value) = self.cached(name) {
            return Self::downcast(name, value);
        }

        self.enter(name)?;
        let factory = self.registry.factory(name);
        let built = match factory {
            Some(factory) => factory(self).await,
            None => Err(ConducirError::Fixture {
                name: name.to_string(),
                message: "not registered".to_string(),
            }),
        };
        self.leave(name);

        let value = built?;
        let mut cache = self.cache.lock().expect("fixture cache poisoned");
        // a concurrent builder may have won the race; keep the first instance
        let value = cache.entry(name).or_insert(value).clone();
        drop(cache);
        Self::downcast(name, value)
    }

    /// Request a page object fixture by its canonical name
    ///
    /// # Errors
    ///
    /// Same failure modes as [`FixtureContext::fixture`].
    pub async fn page_object<P>(&self) -> ConducirResult<Arc<P>>
    where
        P: PageObject + Send + Sync + 'static,
    {
        self.fixture(P::NAME).await
    }

    /// Run every auto-applied hook in registration order
    ///
    /// # Errors
    ///
    /// Propagates the first hook failure.
    pub async fn run_hooks(&self) -> ConducirResult<()> {
        let hooks: Vec<(&'static str, FixtureHook)> = self.registry.hooks().to_vec();
        for (name, hook) in hooks {
            tracing::debug!(hook = name, scenario = %self.scenario, "running hook");
            hook(self).await.map_err(|e| ConducirError::Fixture {
                name: name.to_string(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Release every fixture and tear the page down.
    ///
    /// # Errors
    ///
    /// Propagates page teardown failure; the cache is cleared regardless.
    pub async fn teardown(&self) -> ConducirResult<()> {
        self.cache.lock().expect("fixture cache poisoned").clear();
        self.page.close().await
    }

    fn cached(&self, name: &str) -> Option<FixtureValue> {
        self.cache
            .lock()
            .expect("fixture cache poisoned")
            .get(name)
            .cloned()
    }

    fn enter(&self, name: &'static str) -> ConducirResult<()> {
        let mut building = self.building.lock().expect("fixture stack poisoned");
        if building.contains(&name) {
            let mut chain: Vec<&str> = building.clone();
            chain.push(name);
            return Err(ConducirError::FixtureCycle {
                chain: chain.join(" -> "),
            });
        }
        building.push(name);
        Ok(())
    }

    fn leave(&self, name: &'static str) {
        let mut building = self.building.lock().expect("fixture stack poisoned");
        if let Some(pos) = building.iter().rposition(|n| *n == name) {
            let _ = building.remove(pos);
        }
    }

    fn downcast<T>(name: &'static str, value: FixtureValue) -> ConducirResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        value
            .downcast::<T>()
            .map_err(|_| ConducirError::Fixture {
                name: name.to_string(),
                message: format!(
                    "registered value is not a {}",
                    std::any::type_name::<T>()
                ),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::{AriaRole, Locator};
    use crate::sim::sim_page;

    #[derive(Debug)]
    struct SearchPage {
        #[allow(dead_code)]
        search: Locator,
        page: PageHandle,
    }

    impl PageObject for SearchPage {
        const NAME: &'static str = "search-page";

        fn bind(page: &PageHandle) -> Self {
            Self {
                search: page.by_role(AriaRole::Textbox, "Search"),
                page: page.clone(),
            }
        }
    }

    fn registry_with_page() -> Arc<FixtureRegistry> {
        let mut registry = FixtureRegistry::new();
        registry.register_page::<SearchPage>();
        Arc::new(registry)
    }

    fn context(registry: &Arc<FixtureRegistry>) -> FixtureContext {
        let (page, _driver) = sim_page();
        FixtureContext::new("probe scenario", page, registry.clone())
    }

    mod registry_tests {
        use super::*;

        #[test]
        fn test_register_and_lookup() {
            let mut registry = FixtureRegistry::new();
            assert!(registry.is_empty());
            registry.register_page::<SearchPage>();
            assert!(registry.is_registered("search-page"));
            assert_eq!(registry.len(), 1);
        }

        #[test]
        fn test_reregistering_replaces() {
            let mut registry = FixtureRegistry::new();
            registry.register_page::<SearchPage>();
            registry.register_page::<SearchPage>();
            assert_eq!(registry.len(), 1);
        }
    }

    mod context_tests {
        use super::*;

        #[tokio::test]
        async fn test_same_name_twice_yields_same_instance() {
            let registry = registry_with_page();
            let ctx = context(&registry);

            let first = ctx.page_object::<SearchPage>().await.unwrap();
            let second = ctx.page_object::<SearchPage>().await.unwrap();
            assert!(Arc::ptr_eq(&first, &second));
        }

        #[tokio::test]
        async fn test_two_scenarios_get_independent_instances() {
            let registry = registry_with_page();
            let ctx_a = context(&registry);
            let ctx_b = context(&registry);

            let a = ctx_a.page_object::<SearchPage>().await.unwrap();
            let b = ctx_b.page_object::<SearchPage>().await.unwrap();
            assert!(!Arc::ptr_eq(&a, &b));

            // tearing one scenario down leaves the other's page usable
            ctx_a.teardown().await.unwrap();
            assert!(a.page.is_closed());
            assert!(!b.page.is_closed());
        }

        #[tokio::test]
        async fn test_teardown_invalidates_held_handles() {
            let registry = registry_with_page();
            let ctx = context(&registry);

            let page_object = ctx.page_object::<SearchPage>().await.unwrap();
            ctx.teardown().await.unwrap();
            assert!(matches!(
                page_object.page.current_url().await,
                Err(ConducirError::PageClosed)
            ));
        }

        #[tokio::test]
        async fn test_unregistered_fixture_fails() {
            let registry = Arc::new(FixtureRegistry::new());
            let ctx = context(&registry);

            let err = ctx.fixture::<SearchPage>("missing").await.unwrap_err();
            assert!(matches!(err, ConducirError::Fixture { .. }));
        }

        #[tokio::test]
        async fn test_type_mismatch_fails() {
            let registry = registry_with_page();
            let ctx = context(&registry);

            let err = ctx.fixture::<String>("search-page").await.unwrap_err();
            match err {
                ConducirError::Fixture { message, .. } => {
                    assert!(message.contains("String"));
                }
                other => panic!("expected fixture error, got {other:?}"),
            }
        }
    }

    mod dependency_tests {
        use super::*;

        async fn base_value(_ctx: &FixtureContext) -> ConducirResult<FixtureValue> {
            Ok(Arc::new(21_u64) as FixtureValue)
        }

        async fn doubled_value(ctx: &FixtureContext) -> ConducirResult<FixtureValue> {
            let base = ctx.fixture::<u64>("base").await?;
            Ok(Arc::new(*base * 2) as FixtureValue)
        }

        async fn wants_b(ctx: &FixtureContext) -> ConducirResult<FixtureValue> {
            let _ = ctx.fixture::<u64>("b").await?;
            Ok(Arc::new(0_u64) as FixtureValue)
        }

        async fn wants_a(ctx: &FixtureContext) -> ConducirResult<FixtureValue> {
            let _ = ctx.fixture::<u64>("a").await?;
            Ok(Arc::new(0_u64) as FixtureValue)
        }

        #[tokio::test]
        async fn test_fixture_may_depend_on_another() {
            let mut registry = FixtureRegistry::new();
            registry.register("base", |ctx| Box::pin(base_value(ctx)));
            registry.register("doubled", |ctx| Box::pin(doubled_value(ctx)));
            let registry = Arc::new(registry);
            let ctx = context(&registry);

            let doubled = ctx.fixture::<u64>("doubled").await.unwrap();
            assert_eq!(*doubled, 42);
        }

        #[tokio::test]
        async fn test_declared_cycle_fails_fast() {
            let mut registry = FixtureRegistry::new();
            registry.register("a", |ctx| Box::pin(wants_b(ctx)));
            registry.register("b", |ctx| Box::pin(wants_a(ctx)));
            let registry = Arc::new(registry);
            let ctx = context(&registry);

            let err = ctx.fixture::<u64>("a").await.unwrap_err();
            match err {
                ConducirError::FixtureCycle { chain } => {
                    assert!(chain.contains("a -> b -> a"));
                }
                other => panic!("expected cycle error, got {other:?}"),
            }
        }
    }

    mod hook_tests {
        use super::*;
        use std::sync::atomic::{AtomicUsize, Ordering};

        #[tokio::test]
        async fn test_hooks_run_in_registration_order() {
            static ORDER: AtomicUsize = AtomicUsize::new(0);

            let mut registry = FixtureRegistry::new();
            registry.add_hook("first", |_ctx| {
                Box::pin(async {
                    let seen = ORDER.fetch_add(1, Ordering::SeqCst);
                    assert_eq!(seen, 0);
                    Ok(())
                })
            });
            registry.add_hook("second", |_ctx| {
                Box::pin(async {
                    let seen = ORDER.fetch_add(1, Ordering::SeqCst);
                    assert_eq!(seen, 1);
                    Ok(())
                })
            });
            let registry = Arc::new(registry);
            let ctx = context(&registry);

            ctx.run_hooks().await.unwrap();
            assert_eq!(ORDER.load(Ordering::SeqCst), 2);
        }

        #[tokio::test]
        async fn test_failing_hook_names_itself() {
            let mut registry = FixtureRegistry::new();
            registry.add_hook("diagnostics", |_ctx| {
                Box::pin(async { Err(ConducirError::PageClosed) })
            });
            let registry = Arc::new(registry);
            let ctx = context(&registry);

            let err = ctx.run_hooks().await.unwrap_err();
            match err {
                ConducirError::Fixture { name, .. } => assert_eq!(name, "diagnostics"),
                other => panic!("expected fixture error, got {other:?}"),
            }
        }
    }
}
