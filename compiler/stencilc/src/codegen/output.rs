//! Indentation-aware output buffer.

/// Generated code for one unit.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    /// Current indentation level.
    indent: usize,
    output: String,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer whose lines start at `level`.
    pub fn with_indent(level: usize) -> Self {
        OutputBuffer {
            indent: level,
            output: String::with_capacity(1024),
        }
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn outdent(&mut self) {
        debug_assert!(self.indent > 0, "outdent called with zero indent");
        self.indent = self.indent.saturating_sub(1);
    }

    pub fn level(&self) -> usize {
        self.indent
    }

    /// Write one line at the current indentation.
    pub fn writeln(&mut self, line: &str) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
        self.output.push_str(line);
        self.output.push('\n');
    }

    pub fn newline(&mut self) {
        self.output.push('\n');
    }

    /// Append already indented text.
    pub fn push_raw(&mut self, text: &str) {
        self.output.push_str(text);
    }

    pub fn as_str(&self) -> &str {
        &self.output
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_indent_outdent() {
        let mut out = OutputBuffer::new();
        out.writeln("if x {");
        out.indent();
        out.writeln("a();");
        out.indent();
        out.writeln("b();");
        out.outdent();
        out.outdent();
        out.writeln("}");
        assert_eq!(out.take_output(), "if x {\n    a();\n        b();\n}\n");
        assert!(out.is_empty());
    }

    #[test]
    fn test_starting_level() {
        let mut out = OutputBuffer::with_indent(2);
        out.writeln("x");
        assert_eq!(out.level(), 2);
        assert_eq!(out.as_str(), "        x\n");
    }
}
