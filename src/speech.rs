/// Keyboard stand-in for a speech recognizer.
///
/// Typed characters grow a cumulative transcript the way a recognizer's
/// partial results do. `publish_partials` decides whether every keystroke
/// is an update or only completed words are.
#[derive(Debug, Clone)]
pub struct TranscriptBuffer {
    text: String,
    listening: bool,
    publish_partials: bool,
}

impl Default for TranscriptBuffer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TranscriptBuffer {
    pub fn new(publish_partials: bool) -> Self {
        Self {
            text: String::new(),
            listening: true,
            publish_partials,
        }
    }

    pub fn set_publish_partials(&mut self, publish: bool) {
        self.publish_partials = publish;
    }

    /// Append a character. Returns the transcript to publish, if any.
    pub fn push(&mut self, c: char) -> Option<&str> {
        if !self.listening {
            return None;
        }
        let boundary = c.is_whitespace();
        if boundary {
            if self.text.is_empty() || self.text.ends_with(' ') {
                return None;
            }
            self.text.push(' ');
            // the finished word is what a recognizer would now report
            return (!self.publish_partials).then_some(self.text.as_str());
        }
        self.text.push(c);
        self.publish_partials.then_some(self.text.as_str())
    }

    /// Remove the last character of the current word.
    pub fn backspace(&mut self) -> Option<&str> {
        if !self.listening || self.text.is_empty() || self.text.ends_with(' ') {
            return None;
        }
        self.text.pop();
        if self.text.is_empty() || self.text.ends_with(' ') {
            return None;
        }
        self.publish_partials.then_some(self.text.as_str())
    }

    pub fn toggle_listening(&mut self) -> bool {
        self.listening = !self.listening;
        self.listening
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}
