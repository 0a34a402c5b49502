//! Ключи для binding внутри [`Registry`](crate::Registry)
//!
//! Ключ состоит из аннотации и "отпечатка" типа. Пустая аннотация не
//! отличается от её отсутствия: такой ключ генерируется в чистый тип.

use std::{
    any::TypeId,
    collections::HashMap,
    fmt,
    hash::{Hash, Hasher},
};

/// Reified тип, под которым хранится binding
///
/// Сравнение и хэширование идут только по [`TypeId`], имя нужно для диагностики.
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
}

impl TypeDescriptor {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Ключ binding: аннотация плюс тип
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    pub annotation: String,
    pub descriptor: TypeDescriptor,
}

impl Key {
    pub fn new(descriptor: TypeDescriptor) -> Self {
        Self {
            annotation: String::new(),
            descriptor,
        }
    }

    /// Ключ для обычного binding типа `T`
    pub fn of<T: 'static>() -> Self {
        Self::new(TypeDescriptor::of::<T>())
    }

    /// Ключ для упорядоченной коллекции `T`, разрешается как `Vec<T>`
    pub fn collection_of<T: 'static>() -> Self {
        Self::new(TypeDescriptor::of::<Vec<T>>())
    }

    /// Ключ для словаря `K -> T`, разрешается как `HashMap<K, T>`
    pub fn map_of<K: 'static, T: 'static>() -> Self {
        Self::new(TypeDescriptor::of::<HashMap<K, T>>())
    }

    /// Тот же тип с новой аннотацией
    pub fn annotated(self, annotation: impl Into<String>) -> Self {
        Self {
            annotation: annotation.into(),
            descriptor: self.descriptor,
        }
    }

    /// Финальный ключ для lookup в registry
    pub fn generate(&self) -> GeneratedKey {
        if self.annotation.is_empty() {
            GeneratedKey::Type(self.descriptor)
        } else {
            GeneratedKey::Annotated(self.annotation.clone(), self.descriptor)
        }
    }
}

/// Сгенерированный токен, под которым binding лежит в registry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GeneratedKey {
    Type(TypeDescriptor),
    Annotated(String, TypeDescriptor),
}

impl GeneratedKey {
    pub fn descriptor(&self) -> TypeDescriptor {
        match self {
            GeneratedKey::Type(descriptor) | GeneratedKey::Annotated(_, descriptor) => *descriptor,
        }
    }
}

impl fmt::Display for GeneratedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratedKey::Type(descriptor) => write!(f, "\"{}\"", descriptor),
            GeneratedKey::Annotated(annotation, descriptor) => {
                write!(f, "\"{}\" annotated with \"{}\"", descriptor, annotation)
            }
        }
    }
}
