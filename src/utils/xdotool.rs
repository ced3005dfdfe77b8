use crate::error::Result;
use crate::gaze_error;
use std::collections::HashMap;
use std::process::Command;
use tracing::debug;

/// Запустить xdotool и вернуть stdout без завершающих пробелов
pub fn run(args: &[&str]) -> Result<String> {
    let output = Command::new("xdotool").args(args).output().map_err(|e| {
        debug!("xdotool не найден или не работает: {}", e);
        gaze_error!(internal, "xdotool не найден: {}", e)
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(gaze_error!(
            internal,
            "xdotool {} вернул ошибку: {}",
            args.first().copied().unwrap_or_default(),
            stderr.trim()
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Разбор вывода `--shell`: строки вида `KEY=value`
pub fn parse_shell_vars(output: &str) -> HashMap<&str, &str> {
    output
        .lines()
        .filter_map(|line| line.trim().split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
        .collect()
}

/// Достать целочисленную переменную из разобранного `--shell` вывода
pub fn shell_int(vars: &HashMap<&str, &str>, key: &str) -> Option<i32> {
    vars.get(key).and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_geometry_output() {
        let output = "WINDOW=60817415\nX=120\nY=64\nWIDTH=854\nHEIGHT=480\nSCREEN=0\n";
        let vars = parse_shell_vars(output);
        assert_eq!(shell_int(&vars, "X"), Some(120));
        assert_eq!(shell_int(&vars, "HEIGHT"), Some(480));
        assert_eq!(vars.get("WINDOW"), Some(&"60817415"));
    }

    #[test]
    fn test_parse_ignores_garbage() {
        let vars = parse_shell_vars("warning: something\nX=-5\nY=abc");
        assert_eq!(shell_int(&vars, "X"), Some(-5));
        assert_eq!(shell_int(&vars, "Y"), None);
        assert_eq!(shell_int(&vars, "Z"), None);
    }
}
