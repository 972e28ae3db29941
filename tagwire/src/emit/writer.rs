//! An indentation-aware line accumulator, replacing the original
//! generator's flat `lines = append(lines, fmt.Sprintf(...))` style
//! (`examples/original_source/codon.go:496-572`) with something that
//! tracks nesting so callers don't have to hand-compute tab counts.

pub struct CodeWriter {
	lines: Vec<String>,
	indent: usize,
}

impl CodeWriter {
	pub fn new() -> Self {
		Self { lines: Vec::new(), indent: 0 }
	}

	pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
		let pad = "\t".repeat(self.indent);
		self.lines.push(format!("{pad}{}", text.as_ref()));
		self
	}

	pub fn blank(&mut self) -> &mut Self {
		self.lines.push(String::new());
		self
	}

	/// Opens a brace-delimited block: writes `header {`, indents, runs
	/// `body`, dedents, writes the closing `}`.
	pub fn block(&mut self, header: impl AsRef<str>, body: impl FnOnce(&mut Self)) -> &mut Self {
		self.line(format!("{} {{", header.as_ref()));
		self.indent += 1;
		body(self);
		self.indent -= 1;
		self.line("}")
	}

	/// Writes a `case <header>:` line then indents its body — Go
	/// `switch` cases fall out at the next `case`/`default`, unlike a
	/// brace-delimited [`Self::block`], so no closing line is emitted.
	pub fn case(&mut self, header: impl AsRef<str>, body: impl FnOnce(&mut Self)) -> &mut Self {
		self.line(format!("case {}:", header.as_ref()));
		self.indent += 1;
		body(self);
		self.indent -= 1;
		self
	}

	/// Writes a `default:` line then indents its body, the `case`-less
	/// terminal branch of a `switch`.
	pub fn default_branch(&mut self, body: impl FnOnce(&mut Self)) -> &mut Self {
		self.line("default:");
		self.indent += 1;
		body(self);
		self.indent -= 1;
		self
	}

	pub fn finish(self) -> String {
		let mut text = self.lines.join("\n");
		text.push('\n');
		text
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
	fn block_indents_its_body_by_one_tab() {
		let mut w = CodeWriter::new();
		w.block("func Foo()", |w| {
			w.line("return nil");
		});
		assert_eq!(w.finish(), "func Foo() {\n\treturn nil\n}\n");
	}

	#[test]
	fn case_indents_without_a_closing_brace() {
		let mut w = CodeWriter::new();
		w.block("switch x", |w| {
			w.case("1", |w| {
				w.line("y()");
			});
		});
		assert_eq!(w.finish(), "switch x {\n\tcase 1:\n\t\ty()\n}\n");
	}

	#[test]
	fn nested_blocks_indent_cumulatively() {
		let mut w = CodeWriter::new();
		w.block("func Foo()", |w| {
			w.block("if true", |w| {
				w.line("x()");
			});
		});
		assert_eq!(w.finish(), "func Foo() {\n\tif true {\n\t\tx()\n\t}\n}\n");
	}
}
