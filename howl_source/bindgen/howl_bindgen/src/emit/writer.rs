//! Indentation-aware text builder for generated code.

/// Small structured writer over a `String`. Tracks the current indent level
/// so emitters state nesting instead of counting spaces, which keeps braces
/// and bodies aligned even when blocks are built from helper functions.
pub struct CodeWriter {
    out: String,
    indent: usize,
    unit: &'static str,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::with_unit("    ")
    }

    pub fn with_unit(unit: &'static str) -> Self {
        Self {
            out: String::with_capacity(4096),
            indent: 0,
            unit,
        }
    }

    /// One indented line.
    pub fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str(self.unit);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Appends text verbatim, no indent, no newline.
    pub fn raw(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// `text` then an opening brace on its own line, indenting the body.
    pub fn open(&mut self, text: &str) {
        if !text.is_empty() {
            self.line(text);
        }
        self.line("{");
        self.indent += 1;
    }

    /// Dedents and closes the block; `suffix` lands right after the brace
    /// (`;` for type definitions, empty otherwise).
    pub fn close(&mut self, suffix: &str) {
        debug_assert!(self.indent > 0, "unbalanced close");
        self.indent -= 1;
        self.line(&format!("}}{suffix}"));
    }

    pub fn push_indent(&mut self) {
        self.indent += 1;
    }

    pub fn pop_indent(&mut self) {
        debug_assert!(self.indent > 0, "unbalanced pop_indent");
        self.indent -= 1;
    }

    pub fn finish(self) -> String {
        debug_assert!(self.indent == 0, "unbalanced blocks at finish");
        self.out
    }
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_nest_and_align() {
        let mut w = CodeWriter::new();
        w.open("void f()");
        w.line("int x = 1;");
        w.open("if (x)");
        w.line("x += 1;");
        w.close("");
        w.close("");
        assert_eq!(
            w.finish(),
            "void f()\n{\n    int x = 1;\n    if (x)\n    {\n        x += 1;\n    }\n}\n"
        );
    }

    #[test]
    fn close_suffix_lands_on_the_brace() {
        let mut w = CodeWriter::new();
        w.open("struct Params");
        w.line("int a;");
        w.close(";");
        assert_eq!(w.finish(), "struct Params\n{\n    int a;\n};\n");
    }

    #[test]
    fn open_with_empty_header_emits_only_the_brace() {
        let mut w = CodeWriter::new();
        w.open("");
        w.line("x;");
        w.close("");
        assert_eq!(w.finish(), "{\n    x;\n}\n");
    }
}
