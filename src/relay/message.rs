/// Одно сообщение реле: тип и тело.
///
/// Оба поля — непрозрачные строки, схема на этом уровне не проверяется.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: String,
    pub body: String,
}

impl Message {
    pub fn new(kind: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            body: body.into(),
        }
    }

    /// Разбирает полезную нагрузку проводного формата `"<kind>:<body>"`.
    ///
    /// Разделителем считается ПЕРВОЕ двоеточие: тело может содержать
    /// свои двоеточия. Нагрузка без разделителя считается некорректной,
    /// возвращается `None` — вызывающая сторона её молча отбрасывает.
    pub fn decode(payload: &str) -> Option<Self> {
        let (kind, body) = payload.split_once(':')?;
        Some(Self::new(kind, body))
    }

    /// Кодирует сообщение обратно в проводной формат `kind:body`.
    pub fn encode(&self) -> String {
        format!("{}:{}", self.kind, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Тест проверяет разбор обычной нагрузки `kind:body`.
    #[test]
    fn test_decode_simple_payload() {
        let msg = Message::decode("metadata:NowPlaying=X").expect("valid payload");

        assert_eq!(msg.kind, "metadata");
        assert_eq!(msg.body, "NowPlaying=X");
    }

    /// Тест проверяет, что разделителем служит только первое двоеточие,
    /// а тело сохраняет остальные.
    #[test]
    fn test_decode_splits_on_first_colon_only() {
        let msg = Message::decode("clock:12:34:56").expect("valid payload");

        assert_eq!(msg.kind, "clock");
        assert_eq!(msg.body, "12:34:56");
    }

    /// Тест проверяет, что нагрузка без разделителя отбрасывается.
    #[test]
    fn test_decode_without_separator_is_malformed() {
        assert_eq!(Message::decode("no separator here"), None);
        assert_eq!(Message::decode(""), None);
    }

    /// Тест проверяет разбор нагрузки с пустым телом.
    #[test]
    fn test_decode_empty_body() {
        let msg = Message::decode("ping:").expect("valid payload");

        assert_eq!(msg.kind, "ping");
        assert_eq!(msg.body, "");
    }

    /// Тест проверяет, что encode восстанавливает исходную нагрузку.
    #[test]
    fn test_encode_matches_wire_format() {
        let msg = Message::new("metadata", "NowPlaying=X");
        assert_eq!(msg.encode(), "metadata:NowPlaying=X");

        let decoded = Message::decode(&msg.encode()).unwrap();
        assert_eq!(decoded, msg);
    }
}
