use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleKind {
    /// Verbatim device output
    Raw,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleLine {
    pub kind: ConsoleKind,
    pub text: String,
}

/// Append-only scrollback shown in the console panel.
#[derive(Debug)]
pub struct Console {
    lines: VecDeque<ConsoleLine>,
    max_lines: usize,
}

impl Console {
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(max_lines.min(1024)),
            max_lines,
        }
    }

    pub fn push_raw(&mut self, text: impl Into<String>) {
        self.push(ConsoleKind::Raw, text.into());
    }

    pub fn push_info(&mut self, text: impl Into<String>) {
        self.push(ConsoleKind::Info, text.into());
    }

    pub fn push_error(&mut self, text: impl Into<String>) {
        self.push(ConsoleKind::Error, text.into());
    }

    fn push(&mut self, kind: ConsoleKind, text: String) {
        self.lines.push_back(ConsoleLine { kind, text });
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &ConsoleLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_oldest_lines_past_limit() {
        let mut console = Console::new(2);
        console.push_raw("a");
        console.push_info("b");
        console.push_error("c");

        let lines: Vec<_> = console.lines().cloned().collect();
        assert_eq!(
            lines,
            vec![
                ConsoleLine { kind: ConsoleKind::Info, text: "b".into() },
                ConsoleLine { kind: ConsoleKind::Error, text: "c".into() },
            ]
        );
    }
}
