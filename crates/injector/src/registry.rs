//! Registry: mapping от сгенерированного ключа к [`Binding`]
//!
//! `Registry` это shared handle: клоны указывают на те же binding. Есть один
//! process-wide default registry для удобных вызовов (`bind`, `resolve`),
//! и любое количество независимых registry, которые передаются явно.
//!
//! Lock никогда не удерживается во время создания экземпляра, поэтому
//! provider может сам разрешать другие зависимости.

use std::{
    any::Any,
    collections::HashMap,
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::{
    binding::{Binding, BindingSource},
    config::RegistryConfig,
    error::{InjectError, Result},
    key::{GeneratedKey, Key},
    option::{BindOption, KeyOption},
};

/// Статистика registry для диагностики
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub name: String,
    pub binding_count: usize,
    pub registrations: u64,
    pub total_resolutions: u64,
    pub failed_resolutions: u64,
}

#[derive(Default)]
struct Counters {
    registrations: AtomicU64,
    total_resolutions: AtomicU64,
    failed_resolutions: AtomicU64,
}

struct RegistryInner {
    config: RegistryConfig,
    bindings: RwLock<HashMap<GeneratedKey, Arc<dyn Binding>>>,
    counters: Counters,
}

/// Контейнер binding
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

impl Registry {
    /// Новый пустой registry
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::with_config(RegistryConfig::named(name))
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                config,
                bindings: RwLock::new(HashMap::new()),
                counters: Counters::default(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.inner.config
    }

    /// Оба handle указывают на один и тот же registry
    pub fn same_as(&self, other: &Registry) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn len(&self) -> usize {
        self.inner.bindings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.bindings.read().is_empty()
    }

    pub fn contains(&self, key: &GeneratedKey) -> bool {
        self.inner.bindings.read().contains_key(key)
    }

    /// Получить binding по ключу; lock отпускается до возврата
    pub fn lookup(&self, key: &GeneratedKey) -> Option<Arc<dyn Binding>> {
        self.inner.bindings.read().get(key).cloned()
    }

    /// Удалить все binding
    pub fn clear(&self) {
        self.inner.bindings.write().clear();
        debug!("Registry {} cleared", self.name());
    }

    pub fn stats(&self) -> RegistryStats {
        let counters = &self.inner.counters;
        RegistryStats {
            name: self.name().to_string(),
            binding_count: self.len(),
            registrations: counters.registrations.load(Ordering::Relaxed),
            total_resolutions: counters.total_resolutions.load(Ordering::Relaxed),
            failed_resolutions: counters.failed_resolutions.load(Ordering::Relaxed),
        }
    }

    fn store(&self, key: GeneratedKey, binding: Arc<dyn Binding>, chaining: bool) {
        let replaced = self.inner.bindings.write().insert(key.clone(), binding);
        if replaced.is_some() && !chaining && self.inner.config.warn_on_overwrite {
            warn!("Binding for {} is already registered in {}, overwriting", key, self.name());
        }
        self.inner.counters.registrations.fetch_add(1, Ordering::Relaxed);
        debug!("Registered {} in {}", key, self.name());
    }

    /// Зарегистрировать source в этом registry (опции могут перенаправить)
    pub fn bind<T, S>(&self, source: S, options: &[BindOption]) -> Result<()>
    where
        S: BindingSource<T>,
    {
        bind_in(self.clone(), source, options)
    }

    pub fn must_bind<T, S>(&self, source: S, options: &[BindOption])
    where
        S: BindingSource<T>,
    {
        if let Err(e) = self.bind(source, options) {
            panic!("{}", e);
        }
    }

    /// Разрешить `T` из этого registry (опции могут перенаправить)
    pub fn resolve<T>(&self, options: &[KeyOption]) -> Result<T>
    where
        T: Any,
    {
        resolve_in(self.clone(), options)
    }

    pub fn must_resolve<T>(&self, options: &[KeyOption]) -> T
    where
        T: Any,
    {
        match self.resolve(options) {
            Ok(instance) => instance,
            Err(e) => panic!("{}", e),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("name", &self.name())
            .field("bindings", &self.len())
            .finish()
    }
}

/// Регистрация: key → registry → previous → binding → опции → store
fn bind_in<T, S>(start: Registry, source: S, options: &[BindOption]) -> Result<()>
where
    S: BindingSource<T>,
{
    let mut key = source.key();
    let mut registry = start;
    for option in options {
        key = option.key(key);
        registry = option.registry(registry);
    }

    let generated = key.generate();
    let chaining = source.is_chaining();
    let previous = if chaining {
        registry.lookup(&generated)
    } else {
        None
    };

    let mut binding = source.binding(previous)?;
    for option in options {
        binding = option.binding(binding)?;
    }

    registry.store(generated, binding, chaining);
    Ok(())
}

fn resolve_in<T: Any>(start: Registry, options: &[KeyOption]) -> Result<T> {
    let mut key = Key::of::<T>();
    let mut registry = start;
    for option in options {
        key = option.key(key);
        registry = option.registry(registry);
    }

    let generated = key.generate();
    let counters = &registry.inner.counters;
    counters.total_resolutions.fetch_add(1, Ordering::Relaxed);

    let result = registry
        .lookup(&generated)
        .ok_or_else(|| InjectError::NotFound {
            key: generated.to_string(),
        })
        .and_then(|binding| binding.instance(true))
        .and_then(|instance| {
            instance
                .downcast::<T>()
                .map_err(|actual| InjectError::InvalidBinding {
                    key: generated.to_string(),
                    actual,
                })
        });

    match &result {
        Ok(_) => debug!("Resolved {} from {}", generated, registry.name()),
        Err(e) => {
            counters.failed_resolutions.fetch_add(1, Ordering::Relaxed);
            debug!("Failed to resolve {} from {}: {}", generated, registry.name(), e);
        }
    }
    result
}

static DEFAULT_REGISTRY: Lazy<RwLock<Registry>> =
    Lazy::new(|| RwLock::new(Registry::named("default")));

/// Handle на текущий process-wide registry
///
/// После [`reset`] ранее полученные handle продолжают указывать на старый registry.
pub fn default_registry() -> Registry {
    DEFAULT_REGISTRY.read().clone()
}

/// Заменить process-wide registry пустым
pub fn reset() {
    *DEFAULT_REGISTRY.write() = Registry::named("default");
    debug!("Default registry reset");
}

/// Новый независимый registry, невидимый для default
pub fn new_registry() -> Registry {
    Registry::new()
}

/// Зарегистрировать source в default registry
///
/// ```
/// use injector::{as_instance, bind, resolve, with_annotation, annotated_with};
///
/// bind(as_instance::<String, _>("primary"), &[with_annotation("db")]).unwrap();
/// let url: String = resolve(&[annotated_with("db")]).unwrap();
/// assert_eq!(url, "primary");
/// ```
pub fn bind<T, S>(source: S, options: &[BindOption]) -> Result<()>
where
    S: BindingSource<T>,
{
    bind_in(default_registry(), source, options)
}

/// Как [`bind`], но panic при ошибке
pub fn must_bind<T, S>(source: S, options: &[BindOption])
where
    S: BindingSource<T>,
{
    default_registry().must_bind(source, options)
}

/// Разрешить `T` из default registry
pub fn resolve<T: Any>(options: &[KeyOption]) -> Result<T> {
    resolve_in(default_registry(), options)
}

/// Как [`resolve`], но panic при ошибке
pub fn must_resolve<T: Any>(options: &[KeyOption]) -> T {
    default_registry().must_resolve(options)
}
