//! Опции регистрации и разрешения
//!
//! Опции применяются слева направо: каждая может поменять ключ, registry
//! назначения и (только при регистрации) сам binding.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::{
    binding::Binding,
    error::Result,
    instance::Instance,
    key::Key,
    registry::Registry,
};

/// Опция, влияющая только на ключ и registry
#[derive(Debug, Clone)]
pub enum KeyOption {
    /// Заменить аннотацию ключа
    Annotation(String),
    /// Использовать указанный registry вместо default
    Registry(Registry),
}

impl KeyOption {
    pub fn key(&self, key: Key) -> Key {
        match self {
            KeyOption::Annotation(annotation) => key.annotated(annotation.clone()),
            KeyOption::Registry(_) => key,
        }
    }

    pub fn registry(&self, registry: Registry) -> Registry {
        match self {
            KeyOption::Registry(custom) => custom.clone(),
            KeyOption::Annotation(_) => registry,
        }
    }
}

/// Опция регистрации
#[derive(Debug, Clone)]
pub enum BindOption {
    /// Кэшировать первый полностью инициализированный экземпляр
    Singleton,
    Key(KeyOption),
}

impl BindOption {
    pub fn key(&self, key: Key) -> Key {
        match self {
            BindOption::Key(option) => option.key(key),
            BindOption::Singleton => key,
        }
    }

    pub fn registry(&self, registry: Registry) -> Registry {
        match self {
            BindOption::Key(option) => option.registry(registry),
            BindOption::Singleton => registry,
        }
    }

    pub fn binding(&self, binding: Arc<dyn Binding>) -> Result<Arc<dyn Binding>> {
        match self {
            BindOption::Singleton => Ok(Arc::new(SingletonBinding::new(binding))),
            BindOption::Key(_) => Ok(binding),
        }
    }
}

impl From<KeyOption> for BindOption {
    fn from(option: KeyOption) -> Self {
        BindOption::Key(option)
    }
}

/// Экземпляр создаётся один раз, дальше отдаётся из кэша
pub fn as_singleton() -> BindOption {
    BindOption::Singleton
}

/// Зарегистрировать binding под аннотацией
///
/// Для разрешения нужен [`annotated_with`] с тем же именем.
pub fn with_annotation(annotation: impl Into<String>) -> BindOption {
    BindOption::Key(KeyOption::Annotation(annotation.into()))
}

/// Зарегистрировать binding в отдельном registry вместо default
pub fn with_registry(registry: Registry) -> BindOption {
    BindOption::Key(KeyOption::Registry(registry))
}

/// Разрешить binding, зарегистрированный через [`with_annotation`]
pub fn annotated_with(annotation: impl Into<String>) -> KeyOption {
    KeyOption::Annotation(annotation.into())
}

/// Разрешить binding из указанного registry
pub fn from_registry(registry: Registry) -> KeyOption {
    KeyOption::Registry(registry)
}

/// Binding, который кэширует первый результат `instance(true)`
///
/// Probe вызовы (`initialize == false`) до первой инициализации идут в parent
/// и не кэшируются.
pub struct SingletonBinding {
    parent: Arc<dyn Binding>,
    singleton: OnceCell<Instance>,
}

impl SingletonBinding {
    pub fn new(parent: Arc<dyn Binding>) -> Self {
        Self {
            parent,
            singleton: OnceCell::new(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.singleton.get().is_some()
    }
}

impl Binding for SingletonBinding {
    fn instance(&self, initialize: bool) -> Result<Instance> {
        if let Some(cached) = self.singleton.get() {
            return Ok(cached.clone());
        }

        let instance = self.parent.instance(initialize)?;
        if !initialize {
            return Ok(instance);
        }

        // При гонке выигрывает первый сохранённый экземпляр
        let cached = self.singleton.get_or_init(|| instance);
        debug!("Singleton cached for {}", cached.type_name());
        Ok(cached.clone())
    }
}
