use crate::error::{GazeError, Result};
use crate::gaze_error;
use crate::services::mode_controller::{Mode, TerminationTrigger};
use crate::utils::xdotool;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use tracing::{info, warn};

/// Проверить доступ к ресурсам, которые нужны выбранному режиму
pub fn check_permissions(mode: Mode) -> Result<()> {
    info!("Проверка прав доступа для режима {}...", mode);

    // Поиск окна и курсор работают через xdotool во всех режимах
    check_xdotool()?;

    if mode.termination_trigger() == TerminationTrigger::Hotkey {
        check_input_devices_access()?;
    }

    if mode.injects_keys() {
        check_uinput_access()?;
    }

    check_not_root();

    info!("Проверка прав доступа завершена успешно");
    Ok(())
}

fn check_xdotool() -> Result<()> {
    match xdotool::run(&["version"]) {
        Ok(version) => {
            info!("Найден {}", version);
            Ok(())
        }
        Err(e) => Err(GazeError::ServiceUnavailable(format!(
            "xdotool недоступен: {}. Установите пакет xdotool",
            e
        ))),
    }
}

fn check_input_devices_access() -> Result<()> {
    let input_dir = "/dev/input";

    if !std::path::Path::new(input_dir).exists() {
        return Err(gaze_error!(permission, "Директория {} не существует", input_dir));
    }

    match fs::read_dir(input_dir) {
        Ok(_) => {
            info!("Доступ к {} подтвержден", input_dir);
            Ok(())
        }
        Err(e) => Err(GazeError::Permission(format!(
            "Нет доступа к {}: {}. Добавьте пользователя в группу 'input'",
            input_dir, e
        ))),
    }
}

fn check_uinput_access() -> Result<()> {
    let uinput_device = "/dev/uinput";

    if !std::path::Path::new(uinput_device).exists() {
        warn!("{} не существует, возможно модуль uinput не загружен", uinput_device);
        return Ok(()); // Не критичная ошибка, модуль может быть загружен позже
    }

    let metadata = fs::metadata(uinput_device).map_err(|e| {
        GazeError::Permission(format!(
            "Не удалось проверить права доступа к {}: {}",
            uinput_device, e
        ))
    })?;

    if !mode_allows_access(metadata.permissions().mode()) {
        return Err(gaze_error!(
            permission,
            "Нет прав доступа к {}. Добавьте пользователя в группу 'uinput' или 'input'",
            uinput_device
        ));
    }

    info!("Доступ к {} подтвержден", uinput_device);
    Ok(())
}

/// Доступ есть, если файл открыт группе или всем (обычно 660 или 666)
fn mode_allows_access(mode: u32) -> bool {
    mode & 0o006 != 0 || mode & 0o060 != 0
}

fn check_not_root() {
    match std::env::var("USER") {
        Ok(user) if user == "root" => {
            warn!("⚠️  Приложение запущено от имени root!");
            warn!("   Рекомендуется добавить пользователя в группы 'input' и 'uinput'");
            warn!("   sudo usermod -a -G input,uinput $USER");
        }
        Ok(user) => {
            info!("Приложение запущено от имени пользователя: {}", user);
        }
        Err(_) => {
            warn!("Не удалось определить пользователя");
        }
    }
}
