use crate::diag::Flag;
use crate::symbols::Symbols;
use std::fmt::Write;

/// Listing text, built line by line as pass two streams over the source.
pub struct Listing {
    text: String,
}

impl Listing {
    pub fn new() -> Listing {
        Listing {
            text: String::new(),
        }
    }

    pub fn source_line(&mut self, line: &str) {
        let _ = writeln!(self.text, "\t\t{}", line);
    }

    pub fn assignment(&mut self, word: u32, flag: Option<Flag>) {
        let _ = writeln!(self.text, "\t{:06o} {}", word, flag_char(flag));
    }

    pub fn word(&mut self, location: u32, word: u32, flag: Option<Flag>) {
        let _ = writeln!(self.text, "{:06o}: {:06o} {}", location, word, flag_char(flag));
    }

    /// A diagnostic, repeated in the listing where it occurred.
    pub fn note(&mut self, message: &str) {
        let _ = writeln!(self.text, "{}", message);
    }

    pub fn finish(mut self, labels: &str) -> String {
        let _ = write!(self.text, "\nLabels:\n{}", labels);
        self.text
    }
}

fn flag_char(flag: Option<Flag>) -> char {
    flag.map_or(' ', Flag::code)
}

/// Global labels sorted by name, relocated by the final base, `r` marking
/// the relocatable ones. Local labels are not dumped.
pub fn label_dump(syms: &Symbols) -> String {
    let base = syms.base();
    let mut out = String::new();
    for (name, word) in syms.globals() {
        let flags = if word.is_reloc() { "r" } else { "" };
        let _ = writeln!(out, "{:<8} 0{:06o} {}", name, word.relocate(base), flags);
    }
    out
}
