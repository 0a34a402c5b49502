//! Binding и четыре базовые стратегии создания экземпляров
//!
//! - **value**: `Default` значение типа `S`, конвертированное в `T`
//! - **reference**: `Arc<R>` handle, отданный как `Arc<I>`
//! - **provider**: пользовательская factory функция
//! - **instance**: готовый экземпляр, отдаётся как есть
//!
//! Value и reference source проверяют тип при регистрации (probe без `init`).
//! Provider и instance source не проверяются, чтобы не вызывать provider
//! во время регистрации.

use std::{any::Any, marker::PhantomData, sync::Arc};

use crate::{
    error::{BoxError, InjectError, Result},
    instance::{construct, Injectable, Instance, Upcast},
    key::Key,
};

/// Конвертация `Arc<Self>` в `Arc<dyn Any>` для downcast хранимых binding
pub trait AsAny: Any + Send + Sync {
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Отложенная factory, которая производит экземпляр
///
/// При `initialize == false` binding должен вернуть дешёвый probe экземпляр,
/// пригодный только для проверки типа, без side effects инициализации.
pub trait Binding: AsAny {
    fn instance(&self, initialize: bool) -> Result<Instance>;
}

/// Стратегия регистрации: стартовый [`Key`] плюс [`Binding`]
///
/// Source используется один раз в момент регистрации.
pub trait BindingSource<T> {
    fn key(&self) -> Key;

    /// Построить binding; `previous` передаётся только chaining source
    fn binding(self, previous: Option<Arc<dyn Binding>>) -> Result<Arc<dyn Binding>>;

    /// Нужно ли перед регистрацией найти уже сохранённый binding
    fn is_chaining(&self) -> bool {
        false
    }
}

/// Проверить probe экземпляр binding против `T`
pub(crate) fn probe<T: Any>(binding: &dyn Binding) -> Result<()> {
    let instance = binding.instance(false)?;
    if instance.is::<T>() {
        Ok(())
    } else {
        Err(InjectError::mismatch::<T>(instance.type_name()))
    }
}

/// Базовый source для всех четырёх стратегий
pub struct Source<T> {
    binding: Arc<dyn Binding>,
    probe: bool,
    _target: PhantomData<fn() -> T>,
}

impl<T: Any> Source<T> {
    fn probed(binding: Arc<dyn Binding>) -> Self {
        Self {
            binding,
            probe: true,
            _target: PhantomData,
        }
    }

    fn trusted(binding: Arc<dyn Binding>) -> Self {
        Self {
            binding,
            probe: false,
            _target: PhantomData,
        }
    }
}

impl<T: Any> BindingSource<T> for Source<T> {
    fn key(&self) -> Key {
        Key::of::<T>()
    }

    fn binding(self, _previous: Option<Arc<dyn Binding>>) -> Result<Arc<dyn Binding>> {
        if self.probe {
            probe::<T>(self.binding.as_ref())?;
        }
        Ok(self.binding)
    }
}

struct ValueBinding<T, S> {
    _types: PhantomData<fn() -> (T, S)>,
}

impl<T, S> Binding for ValueBinding<T, S>
where
    T: Clone + Send + Sync + 'static,
    S: Injectable + Into<T>,
{
    fn instance(&self, initialize: bool) -> Result<Instance> {
        let value: S = construct(initialize);
        Ok(Instance::new(value.into()))
    }
}

/// Связать `T` со значением `S`, созданным через `Default`
///
/// Каждое разрешение создаёт новое значение и вызывает `init`, если он есть.
pub fn as_value<T, S>() -> Source<T>
where
    T: Clone + Send + Sync + 'static,
    S: Injectable + Into<T>,
{
    Source::probed(Arc::new(ValueBinding::<T, S> {
        _types: PhantomData,
    }))
}

struct ReferenceBinding<I: ?Sized, R> {
    _types: PhantomData<fn() -> (Arc<I>, R)>,
}

impl<I, R> Binding for ReferenceBinding<I, R>
where
    I: ?Sized + Send + Sync + 'static,
    R: Injectable + Upcast<I>,
{
    fn instance(&self, initialize: bool) -> Result<Instance> {
        let handle: Arc<I> = <R as Upcast<I>>::upcast(Arc::new(construct::<R>(initialize)));
        Ok(Instance::new(handle))
    }
}

/// Связать `Arc<I>` с новым `Arc<R>` handle
///
/// Разрешается как `Arc<I>`; без singleton каждый вызов даёт новый handle.
pub fn as_reference<I, R>() -> Source<Arc<I>>
where
    I: ?Sized + Send + Sync + 'static,
    R: Injectable + Upcast<I>,
{
    Source::probed(Arc::new(ReferenceBinding::<I, R> {
        _types: PhantomData,
    }))
}

struct ProviderBinding<T, F> {
    provider: F,
    _target: PhantomData<fn() -> T>,
}

impl<T, S, E, F> Binding for ProviderBinding<T, F>
where
    T: Clone + Send + Sync + 'static,
    F: Fn() -> Result<S, E> + Send + Sync + 'static,
    S: Into<T>,
    E: Into<BoxError>,
{
    fn instance(&self, _initialize: bool) -> Result<Instance> {
        let value = (self.provider)().map_err(|e| InjectError::Provider {
            service_type: std::any::type_name::<T>(),
            source: e.into(),
        })?;
        Ok(Instance::new(value.into()))
    }
}

/// Связать `T` с factory функцией; вызывается при каждом разрешении
pub fn as_provider<T, S, E, F>(provider: F) -> Source<T>
where
    T: Clone + Send + Sync + 'static,
    F: Fn() -> Result<S, E> + Send + Sync + 'static,
    S: Into<T>,
    E: Into<BoxError>,
{
    Source::trusted(Arc::new(ProviderBinding::<T, F> {
        provider,
        _target: PhantomData,
    }))
}

struct InstanceBinding<T> {
    instance: T,
}

impl<T> Binding for InstanceBinding<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn instance(&self, _initialize: bool) -> Result<Instance> {
        Ok(Instance::new(self.instance.clone()))
    }
}

/// Связать `T` с уже готовым экземпляром
pub fn as_instance<T, S>(instance: S) -> Source<T>
where
    T: Clone + Send + Sync + 'static,
    S: Into<T>,
{
    Source::trusted(Arc::new(InstanceBinding::<T> {
        instance: instance.into(),
    }))
}

/// Связать `T` с собственной реализацией [`Binding`]; тип проверяется probe
pub fn as_binding<T, B>(binding: B) -> Source<T>
where
    T: Any,
    B: Binding,
{
    Source::probed(Arc::new(binding))
}
