//! Generic dependency injection container
//!
//! Registry связывает абстрактный тип (обычно `Arc<dyn Trait>`) со стратегией
//! создания экземпляра:
//!
//! - [`as_value`], [`as_reference`], [`as_provider`], [`as_instance`]: базовые source
//! - [`in_collection`], [`in_map`]: сборка нескольких регистраций в `Vec` / `HashMap`
//! - [`as_singleton`], [`with_annotation`], [`with_registry`]: опции регистрации
//! - [`annotated_with`], [`from_registry`]: опции разрешения
//!
//! ```
//! use std::sync::Arc;
//! use injector::{as_reference, as_singleton, Initializable, Registry};
//!
//! trait Storage: Send + Sync {
//!     fn url(&self) -> &str;
//! }
//!
//! #[derive(Default)]
//! struct Postgres {
//!     url: String,
//! }
//!
//! impl Initializable for Postgres {
//!     fn init(&mut self) {
//!         self.url = "postgres://localhost".to_string();
//!     }
//! }
//!
//! impl Storage for Postgres {
//!     fn url(&self) -> &str {
//!         &self.url
//!     }
//! }
//!
//! injector::initializable!(Postgres);
//! injector::implements!(Postgres => dyn Storage);
//!
//! let registry = Registry::new();
//! registry
//!     .bind(as_reference::<dyn Storage, Postgres>(), &[as_singleton()])
//!     .unwrap();
//!
//! let storage: Arc<dyn Storage> = registry.resolve(&[]).unwrap();
//! assert_eq!(storage.url(), "postgres://localhost");
//! ```
//!
//! Разрешение незарегистрированного ключа всегда возвращает
//! [`InjectError::NotFound`]; zero-value fallback нет.

#[macro_use]
mod macros;

pub mod binding;
pub mod chain;
pub mod config;
pub mod error;
pub mod instance;
pub mod key;
pub mod option;
pub mod registry;

pub use binding::{
    as_binding, as_instance, as_provider, as_reference, as_value, AsAny, Binding, BindingSource,
    Source,
};
pub use chain::{in_collection, in_map, CollectionBinding, CollectionSource, MapBinding, MapSource};
pub use config::RegistryConfig;
pub use error::{BoxError, InjectError, Result};
pub use instance::{Initializable, Injectable, Instance, Upcast};
pub use key::{GeneratedKey, Key, TypeDescriptor};
pub use option::{
    annotated_with, as_singleton, from_registry, with_annotation, with_registry, BindOption,
    KeyOption, SingletonBinding,
};
pub use registry::{
    bind, default_registry, must_bind, must_resolve, new_registry, reset, resolve, Registry,
    RegistryStats,
};
