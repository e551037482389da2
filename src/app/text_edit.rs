/// 한 줄 입력 버퍼. `cursor`는 항상 UTF-8 문자 경계의 바이트 인덱스
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    /// 커서를 끝에 둔 채로 생성
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.len();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert_char(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = self.prev_char_start(self.cursor);
        self.value.remove(prev);
        self.cursor = prev;
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.prev_char_start(self.cursor);
    }

    pub fn right(&mut self) {
        if let Some(c) = self.value[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    /// 커서 앞 단어 삭제 (Ctrl+W). 경로 구분자에서 멈춘다.
    pub fn delete_prev_word(&mut self) {
        let end = self.cursor;
        let mut pos = end;

        while pos > 0 {
            let prev = self.prev_char_start(pos);
            if !Self::is_word_delimiter(self.char_at(prev)) {
                break;
            }
            pos = prev;
        }
        while pos > 0 {
            let prev = self.prev_char_start(pos);
            if Self::is_word_delimiter(self.char_at(prev)) {
                break;
            }
            pos = prev;
        }

        self.value.replace_range(pos..end, "");
        self.cursor = pos;
    }

    /// 커서 앞 전체 삭제 (Ctrl+U)
    pub fn clear_to_start(&mut self) {
        self.value.replace_range(..self.cursor, "");
        self.cursor = 0;
    }

    fn char_at(&self, byte: usize) -> char {
        self.value[byte..].chars().next().unwrap_or_default()
    }

    fn prev_char_start(&self, pos: usize) -> usize {
        self.value[..pos]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn is_word_delimiter(ch: char) -> bool {
        ch.is_whitespace() || matches!(ch, '/' | '\\' | '.' | '-' | '_')
    }
}
