use crate::events::KeyCode;
use evdev::KeyCode as Evdev;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Преобразование имён клавиш из конфигурации в evdev коды.
/// Нужны клавиша движения вперёд и клавиша завершения.
pub struct KeyNames;

static KEY_NAME_TO_CODE: Lazy<HashMap<&'static str, Evdev>> = Lazy::new(|| {
    let mut map = HashMap::new();

    // Буквенные клавиши
    let letters = [
        ("a", Evdev::KEY_A), ("b", Evdev::KEY_B), ("c", Evdev::KEY_C), ("d", Evdev::KEY_D),
        ("e", Evdev::KEY_E), ("f", Evdev::KEY_F), ("g", Evdev::KEY_G), ("h", Evdev::KEY_H),
        ("i", Evdev::KEY_I), ("j", Evdev::KEY_J), ("k", Evdev::KEY_K), ("l", Evdev::KEY_L),
        ("m", Evdev::KEY_M), ("n", Evdev::KEY_N), ("o", Evdev::KEY_O), ("p", Evdev::KEY_P),
        ("q", Evdev::KEY_Q), ("r", Evdev::KEY_R), ("s", Evdev::KEY_S), ("t", Evdev::KEY_T),
        ("u", Evdev::KEY_U), ("v", Evdev::KEY_V), ("w", Evdev::KEY_W), ("x", Evdev::KEY_X),
        ("y", Evdev::KEY_Y), ("z", Evdev::KEY_Z),
    ];
    map.extend(letters);

    // Цифровые клавиши (верхний ряд)
    let digits = [
        ("1", Evdev::KEY_1), ("2", Evdev::KEY_2), ("3", Evdev::KEY_3), ("4", Evdev::KEY_4),
        ("5", Evdev::KEY_5), ("6", Evdev::KEY_6), ("7", Evdev::KEY_7), ("8", Evdev::KEY_8),
        ("9", Evdev::KEY_9), ("0", Evdev::KEY_0),
    ];
    map.extend(digits);

    // Пунктуация: "." по умолчанию завершает работу
    map.insert(".", Evdev::KEY_DOT);
    map.insert("dot", Evdev::KEY_DOT);
    map.insert("period", Evdev::KEY_DOT);
    map.insert(",", Evdev::KEY_COMMA);
    map.insert("comma", Evdev::KEY_COMMA);
    map.insert("/", Evdev::KEY_SLASH);
    map.insert(";", Evdev::KEY_SEMICOLON);
    map.insert("-", Evdev::KEY_MINUS);
    map.insert("=", Evdev::KEY_EQUAL);

    // Специальные клавиши
    map.insert("space", Evdev::KEY_SPACE);
    map.insert("enter", Evdev::KEY_ENTER);
    map.insert("escape", Evdev::KEY_ESC);
    map.insert("tab", Evdev::KEY_TAB);
    map.insert("shift", Evdev::KEY_LEFTSHIFT);
    map.insert("ctrl", Evdev::KEY_LEFTCTRL);

    // Стрелки
    map.insert("up", Evdev::KEY_UP);
    map.insert("down", Evdev::KEY_DOWN);
    map.insert("left", Evdev::KEY_LEFT);
    map.insert("right", Evdev::KEY_RIGHT);

    map
});

impl KeyNames {
    /// Получить код клавиши по её имени (регистронезависимо)
    pub fn resolve(key_name: &str) -> Option<KeyCode> {
        let normalized = key_name.trim().to_lowercase();
        KEY_NAME_TO_CODE.get(normalized.as_str()).map(|&key| key.into())
    }

    /// Вариант для evdev опроса состояния клавиатуры
    pub fn resolve_evdev(key_name: &str) -> Option<Evdev> {
        Self::resolve(key_name).map(|code| Evdev::new(code.value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_key() {
        assert_eq!(KeyNames::resolve("w"), Some(KeyCode::new(17)));
        assert_eq!(KeyNames::resolve("W"), Some(KeyCode::new(17)));
    }

    #[test]
    fn test_quit_key_aliases() {
        let dot = KeyNames::resolve(".");
        assert!(dot.is_some());
        assert_eq!(dot, KeyNames::resolve("period"));
        assert_eq!(KeyNames::resolve_evdev("dot"), Some(Evdev::KEY_DOT));
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(KeyNames::resolve("hyper"), None);
        assert_eq!(KeyNames::resolve(""), None);
    }
}
