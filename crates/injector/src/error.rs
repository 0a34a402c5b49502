//! Ошибки контейнера
//!
//! Все операции `bind` / `resolve` возвращают [`InjectError`]; `must_*`
//! варианты превращают её в panic с тем же текстом.

use thiserror::Error;

/// Ошибка, которую отдаёт поставщик (provider) экземпляра
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Основной error type для всех операций регистрации и разрешения
#[derive(Debug, Error)]
pub enum InjectError {
    /// Экземпляр, полученный от binding, не соответствует ожидаемому типу
    #[error("binding is not possible for \"{expected}\" and \"{actual}\"")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// Provider функция вернула ошибку
    #[error("provider for {service_type} failed: {source}")]
    Provider {
        service_type: &'static str,
        #[source]
        source: BoxError,
    },

    /// Для сгенерированного ключа ничего не зарегистрировано
    #[error("binding not found for key {key}")]
    NotFound { key: String },

    /// Binding зарегистрирован под ключом, тип которого не совпадает с результатом
    #[error("invalid binding is defined for key {key}: produced {actual}")]
    InvalidBinding { key: String, actual: &'static str },

    /// Ошибки загрузки конфигурации
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl InjectError {
    pub(crate) fn mismatch<Expected: ?Sized>(actual: &'static str) -> Self {
        InjectError::TypeMismatch {
            expected: std::any::type_name::<Expected>(),
            actual,
        }
    }

    /// Ошибка говорит об отсутствии binding
    pub fn is_not_found(&self) -> bool {
        matches!(self, InjectError::NotFound { .. })
    }
}

pub type Result<T, E = InjectError> = std::result::Result<T, E>;
