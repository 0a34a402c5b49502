//! Type-erased экземпляры и capability traits для создаваемых типов
//!
//! Binding отдаёт [`Instance`], а финальная проверка типа происходит через
//! `downcast` при регистрации (probe) и при разрешении.

use std::{any::Any, fmt, sync::Arc};

/// Object-safe часть, которая позволяет клонировать значение без знания типа
trait ErasedValue: Any + Send + Sync {
    fn clone_erased(&self) -> Box<dyn ErasedValue>;
    fn type_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<V> ErasedValue for V
where
    V: Any + Clone + Send + Sync,
{
    fn clone_erased(&self) -> Box<dyn ErasedValue> {
        Box::new(self.clone())
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<V>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Экземпляр, произведённый [`Binding`](crate::Binding)
///
/// Clone клонирует внутреннее значение, поэтому для `Arc` handle идентичность
/// сохраняется, а для обычных значений получается копия.
pub struct Instance {
    value: Box<dyn ErasedValue>,
}

impl Instance {
    pub fn new<V>(value: V) -> Self
    where
        V: Any + Clone + Send + Sync,
    {
        Self {
            value: Box::new(value),
        }
    }

    /// Capability check против ожидаемого типа
    pub fn is<V: Any>(&self) -> bool {
        self.value.as_any().is::<V>()
    }

    pub fn type_name(&self) -> &'static str {
        self.value.type_name()
    }

    pub fn downcast_ref<V: Any>(&self) -> Option<&V> {
        self.value.as_any().downcast_ref::<V>()
    }

    /// Извлечь значение; при несовпадении возвращает имя фактического типа
    pub fn downcast<V: Any>(self) -> Result<V, &'static str> {
        let actual = self.type_name();
        self.value
            .into_any()
            .downcast::<V>()
            .map(|boxed| *boxed)
            .map_err(|_| actual)
    }
}

impl Clone for Instance {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone_erased(),
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.type_name())
            .finish()
    }
}

/// Одноразовая настройка сразу после создания экземпляра
pub trait Initializable {
    fn init(&mut self);
}

/// Тип, который контейнер умеет создавать сам (value и reference binding)
///
/// Экземпляр строится через `Default`, затем, если тип отдаёт
/// [`Initializable`] capability, вызывается `init` ровно один раз.
pub trait Injectable: Default + Send + Sync + 'static {
    fn initializable(&mut self) -> Option<&mut dyn Initializable> {
        None
    }
}

/// Конвертация shared handle конкретного типа в handle интерфейса
///
/// Для одного и того же типа реализована автоматически; для `dyn Trait`
/// используйте [`implements!`](crate::implements).
pub trait Upcast<I: ?Sized> {
    fn upcast(self: Arc<Self>) -> Arc<I>;
}

impl<T: ?Sized> Upcast<T> for T {
    fn upcast(self: Arc<Self>) -> Arc<T> {
        self
    }
}

/// Создать экземпляр, опционально запустив его `init`
pub(crate) fn construct<S: Injectable>(initialize: bool) -> S {
    let mut value = S::default();
    if initialize {
        if let Some(initializable) = value.initializable() {
            initializable.init();
        }
    }
    value
}

crate::injectable!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String
);

impl<T: Send + Sync + 'static> Injectable for Vec<T> {}

impl<T: Send + Sync + 'static> Injectable for Option<T> {}
