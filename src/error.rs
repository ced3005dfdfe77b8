use thiserror::Error;

#[derive(Error, Debug)]
pub enum GazeError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка uinput: {0}")]
    Uinput(#[from] uinput::Error),

    #[error("Окно не найдено: {0}")]
    WindowNotFound(String),

    #[error("Не удалось получить геометрию окна: {0}")]
    WindowQuery(String),

    #[error("Ошибка вывода событий: {0}")]
    Actuator(String),

    #[error("Ошибка источника взгляда: {0}")]
    GazeSource(String),

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl GazeError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(GazeError::DeviceNotFound(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, GazeError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! gaze_error {
    (window_query, $($arg:tt)*) => {
        $crate::error::GazeError::WindowQuery(format!($($arg)*))
    };
    (actuator, $($arg:tt)*) => {
        $crate::error::GazeError::Actuator(format!($($arg)*))
    };
    (gaze_source, $($arg:tt)*) => {
        $crate::error::GazeError::GazeSource(format!($($arg)*))
    };
    (permission, $($arg:tt)*) => {
        $crate::error::GazeError::Permission(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::GazeError::Internal(format!($($arg)*))
    };
}
