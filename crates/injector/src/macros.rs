//! Макросы для устранения boilerplate при объявлении injectable типов

/// Объявить типы injectable без шага инициализации
///
/// ```
/// #[derive(Default)]
/// struct Plain;
///
/// injector::injectable!(Plain);
/// ```
#[macro_export]
macro_rules! injectable {
    ($($type:ty),+ $(,)?) => {
        $(
            impl $crate::Injectable for $type {}
        )+
    };
}

/// Объявить типы injectable, у которых есть [`Initializable::init`](crate::Initializable)
///
/// `init` будет вызван один раз сразу после создания через `Default`.
#[macro_export]
macro_rules! initializable {
    ($($type:ty),+ $(,)?) => {
        $(
            impl $crate::Injectable for $type {
                fn initializable(&mut self) -> ::std::option::Option<&mut dyn $crate::Initializable> {
                    ::std::option::Option::Some(self)
                }
            }
        )+
    };
}

/// Связать конкретный тип с интерфейсом `Arc<dyn Trait>`
///
/// Генерирует [`Upcast`](crate::Upcast) для reference binding и `From` для
/// value / provider / instance binding.
///
/// ```
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// #[derive(Default)]
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".to_string()
///     }
/// }
///
/// injector::implements!(English => dyn Greeter);
///
/// let greeter: Arc<dyn Greeter> = English.into();
/// assert_eq!(greeter.greet(), "hello");
/// ```
#[macro_export]
macro_rules! implements {
    ($concrete:ty => $($interface:ty),+ $(,)?) => {
        $(
            impl $crate::Upcast<$interface> for $concrete {
                fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$interface> {
                    self
                }
            }

            impl ::std::convert::From<$concrete> for ::std::sync::Arc<$interface> {
                fn from(value: $concrete) -> Self {
                    ::std::sync::Arc::new(value)
                }
            }
        )+
    };
}
