//! Chaining source: сборка нескольких регистраций в `Vec<T>` или `HashMap<K, T>`
//!
//! Каждая регистрация создаёт новый head узел, который ссылается на
//! предыдущий head как на `previous`. Существующие узлы не меняются, поэтому
//! промежуточные цепочки можно безопасно разделять.

use std::{any::Any, collections::HashMap, hash::Hash, marker::PhantomData, sync::Arc};

use crate::{
    binding::{Binding, BindingSource},
    error::{InjectError, Result},
    instance::Instance,
    key::Key,
};

/// Извлечь из хранимого binding узел цепочки нужной формы
fn previous_node<N: Any + Send + Sync>(previous: Option<Arc<dyn Binding>>) -> Option<Arc<N>> {
    previous.and_then(|binding| binding.into_any().downcast::<N>().ok())
}

fn resolve_current<T: Any>(binding: &dyn Binding, initialize: bool) -> Result<T> {
    binding
        .instance(initialize)?
        .downcast::<T>()
        .map_err(InjectError::mismatch::<T>)
}

/// Узел цепочки для упорядоченной коллекции
pub struct CollectionBinding<T> {
    previous: Option<Arc<CollectionBinding<T>>>,
    current: Arc<dyn Binding>,
    _target: PhantomData<fn() -> T>,
}

impl<T> CollectionBinding<T> {
    /// Узлы от самого старого к текущему
    fn nodes(&self) -> Vec<&CollectionBinding<T>> {
        let mut nodes = vec![self];
        let mut cursor = self.previous.as_deref();
        while let Some(node) = cursor {
            nodes.push(node);
            cursor = node.previous.as_deref();
        }
        nodes.reverse();
        nodes
    }
}

// Длинная цепочка освобождается в цикле, а не через вложенный drop
impl<T> Drop for CollectionBinding<T> {
    fn drop(&mut self) {
        let mut previous = self.previous.take();
        while let Some(node) = previous {
            match Arc::try_unwrap(node) {
                Ok(mut node) => previous = node.previous.take(),
                Err(_) => break,
            }
        }
    }
}

impl<T> Binding for CollectionBinding<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn instance(&self, initialize: bool) -> Result<Instance> {
        // Probe проверяет только тип, поэтому previous не трогаем
        if !initialize {
            let current = resolve_current::<T>(self.current.as_ref(), false)?;
            return Ok(Instance::new(vec![current]));
        }

        let result = self
            .nodes()
            .into_iter()
            .map(|node| resolve_current::<T>(node.current.as_ref(), true))
            .collect::<Result<Vec<T>>>()?;
        Ok(Instance::new(result))
    }
}

/// Source, добавляющий binding в коллекцию `Vec<T>`
pub struct CollectionSource<T, S> {
    source: S,
    _target: PhantomData<fn() -> T>,
}

impl<T, S> BindingSource<Vec<T>> for CollectionSource<T, S>
where
    T: Clone + Send + Sync + 'static,
    S: BindingSource<T>,
{
    fn key(&self) -> Key {
        Key::collection_of::<T>()
    }

    fn binding(self, previous: Option<Arc<dyn Binding>>) -> Result<Arc<dyn Binding>> {
        let current = self.source.binding(None)?;
        Ok(Arc::new(CollectionBinding::<T> {
            previous: previous_node(previous),
            current,
            _target: PhantomData,
        }))
    }

    fn is_chaining(&self) -> bool {
        true
    }
}

/// Добавить binding в упорядоченную коллекцию `T`
///
/// Разрешается как `Vec<T>` в порядке регистрации.
pub fn in_collection<T, S>(source: S) -> CollectionSource<T, S>
where
    T: Clone + Send + Sync + 'static,
    S: BindingSource<T>,
{
    CollectionSource {
        source,
        _target: PhantomData,
    }
}

/// Узел цепочки для словаря
pub struct MapBinding<K, T> {
    previous: Option<Arc<MapBinding<K, T>>>,
    key: K,
    current: Arc<dyn Binding>,
    _target: PhantomData<fn() -> T>,
}

impl<K, T> MapBinding<K, T> {
    fn nodes(&self) -> Vec<&MapBinding<K, T>> {
        let mut nodes = vec![self];
        let mut cursor = self.previous.as_deref();
        while let Some(node) = cursor {
            nodes.push(node);
            cursor = node.previous.as_deref();
        }
        nodes.reverse();
        nodes
    }
}

impl<K, T> Drop for MapBinding<K, T> {
    fn drop(&mut self) {
        let mut previous = self.previous.take();
        while let Some(node) = previous {
            match Arc::try_unwrap(node) {
                Ok(mut node) => previous = node.previous.take(),
                Err(_) => break,
            }
        }
    }
}

impl<K, T> Binding for MapBinding<K, T>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    fn instance(&self, initialize: bool) -> Result<Instance> {
        let mut result = HashMap::new();
        if !initialize {
            let current = resolve_current::<T>(self.current.as_ref(), false)?;
            result.insert(self.key.clone(), current);
            return Ok(Instance::new(result));
        }

        // Более поздняя регистрация перезаписывает тот же ключ
        for node in self.nodes() {
            let current = resolve_current::<T>(node.current.as_ref(), true)?;
            result.insert(node.key.clone(), current);
        }
        Ok(Instance::new(result))
    }
}

/// Source, добавляющий binding в словарь `HashMap<K, T>`
pub struct MapSource<K, T, S> {
    key: K,
    source: S,
    _target: PhantomData<fn() -> T>,
}

impl<K, T, S> BindingSource<HashMap<K, T>> for MapSource<K, T, S>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
    S: BindingSource<T>,
{
    fn key(&self) -> Key {
        Key::map_of::<K, T>()
    }

    fn binding(self, previous: Option<Arc<dyn Binding>>) -> Result<Arc<dyn Binding>> {
        let current = self.source.binding(None)?;
        Ok(Arc::new(MapBinding::<K, T> {
            previous: previous_node(previous),
            key: self.key,
            current,
            _target: PhantomData,
        }))
    }

    fn is_chaining(&self) -> bool {
        true
    }
}

/// Добавить binding в словарь под ключом `key`
///
/// Разрешается как `HashMap<K, T>`; повторная регистрация под тем же ключом
/// заменяет только эту запись.
pub fn in_map<K, T, S>(key: K, source: S) -> MapSource<K, T, S>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
    S: BindingSource<T>,
{
    MapSource {
        key,
        source,
        _target: PhantomData,
    }
}
