//! The two-pass driver.
//!
//! Pass one populates the symbol and relative-label tables and writes no
//! memory. The location counter is then rewound (nothing else resets) and
//! pass two repeats the same parse, writing each statement's word into the
//! image and reporting diagnostics with file and line context. Parsing
//! never aborts the run: a line that fails to parse is dropped with the
//! `?` flag and assembly continues on the next line.

use crate::diag::{Diagnostic, Flag};
use crate::expr::{self, Eval};
use crate::listing::{self, Listing};
use crate::parser::{As7Parser, Rule};
use crate::symbols::{SetLabel, Symbols};
use a7file::Image;
use pdp7::constants::WORD_MASK;
use pdp7::Word;
use pest::iterators::Pair;
use pest::Parser;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Pass {
    First,
    Second,
}

impl Pass {
    fn number(self) -> u32 {
        match self {
            Pass::First => 1,
            Pass::Second => 2,
        }
    }
}

/// One input file: its name (for diagnostics and label scoping) and text.
pub struct Source {
    pub name: String,
    pub text: String,
}

impl Source {
    pub fn new(name: &str, text: &str) -> Source {
        Source {
            name: name.to_owned(),
            text: text.to_owned(),
        }
    }
}

#[derive(Default)]
pub struct Options {
    /// Build the streamed listing (the `list` output format).
    pub listing: bool,
    /// Trace passes and emitted words on standard error.
    pub debug: bool,
}

pub struct Output {
    pub image: Image,
    /// Present when [`Options::listing`] was set.
    pub listing: Option<String>,
    /// The label dump, reused by the name-list side-car file.
    pub labels: String,
    /// Final magnitude of the relocation base `..`.
    pub base: u32,
    pub diagnostics: Vec<Diagnostic>,
}

impl Output {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

pub fn assemble(sources: &[Source], options: &Options) -> Output {
    let mut driver = Driver {
        syms: Symbols::new(),
        image: Image::new(),
        listing: if options.listing {
            Some(Listing::new())
        } else {
            None
        },
        diags: Vec::new(),
        debug: options.debug,
    };

    driver.run(Pass::First, sources);
    driver.syms.rewind();
    driver.run(Pass::Second, sources);

    let labels = listing::label_dump(&driver.syms);
    let listing = driver.listing.take().map(|l| l.finish(&labels));
    Output {
        image: driver.image,
        listing,
        labels,
        base: driver.syms.base(),
        diagnostics: driver.diags,
    }
}

struct Driver {
    syms: Symbols,
    image: Image,
    listing: Option<Listing>,
    diags: Vec<Diagnostic>,
    debug: bool,
}

impl Driver {
    fn run(&mut self, pass: Pass, sources: &[Source]) {
        for (file, source) in sources.iter().enumerate() {
            if self.debug {
                eprintln!("as7: pass {}: {}", pass.number(), source.name);
            }
            for (index, text) in source.text.lines().enumerate() {
                self.line(pass, file, &source.name, index as u32 + 1, text);
            }
        }
    }

    fn line(&mut self, pass: Pass, file: usize, fname: &str, number: u32, text: &str) {
        if pass == Pass::Second {
            if let Some(listing) = &mut self.listing {
                listing.source_line(text);
            }
        }

        let line = match As7Parser::parse(Rule::line, text) {
            Ok(mut pairs) => pairs.next().unwrap(),
            Err(_) => {
                self.report(pass, fname, number, Flag::Syntax, "unparsable statement");
                return;
            }
        };

        for part in line.into_inner() {
            match part.as_rule() {
                Rule::directive => self.directive(pass, file, fname, number, part),
                Rule::stmts => self.statements(pass, file, fname, number, text, part),
                Rule::EOI => {}
                _ => unreachable!(),
            }
        }
    }

    fn directive(&mut self, pass: Pass, file: usize, fname: &str, number: u32, pair: Pair<Rule>) {
        let body = pair.into_inner().next().unwrap().as_str();
        let mut words = body
            .split(|c| c == ' ' || c == '\t' || c == ',')
            .filter(|word| !word.is_empty());
        match (words.next(), words.next(), words.next()) {
            (Some("local"), Some(symbol), None) => self.syms.declare_local(file, symbol),
            _ => self.report(pass, fname, number, Flag::Syntax, "unrecognised directive"),
        }
    }

    fn statements(
        &mut self,
        pass: Pass,
        file: usize,
        fname: &str,
        number: u32,
        text: &str,
        pair: Pair<Rule>,
    ) {
        for stmt in pair.into_inner() {
            match stmt.as_rule() {
                Rule::label_def => {
                    let label = stmt.into_inner().next().unwrap().as_str();
                    self.define_label(pass, file, fname, number, label);
                }
                Rule::assign => self.assign(pass, file, fname, number, stmt),
                Rule::expr => self.emit(pass, file, fname, number, text, stmt),
                Rule::semi => {}
                _ => unreachable!(),
            }
        }
    }

    fn define_label(&mut self, pass: Pass, file: usize, fname: &str, number: u32, label: &str) {
        let dot = self.syms.dot();
        if label.bytes().all(|b| b.is_ascii_digit()) {
            // relative labels collect every definition, on pass one only
            if pass == Pass::First {
                self.syms.note_relative(file, label, dot);
            }
            return;
        }
        match self.syms.set_label(file, label, dot) {
            SetLabel::Defined | SetLabel::Unchanged => {}
            SetLabel::Conflict(_) => {
                if pass == Pass::Second {
                    self.warn(fname, number, format!("label {} redefined", label));
                }
            }
        }
    }

    fn assign(&mut self, pass: Pass, file: usize, fname: &str, number: u32, pair: Pair<Rule>) {
        let mut pairs = pair.into_inner();
        let target = pairs.next().unwrap().as_str().to_owned();
        let eval = expr::evaluate(pairs.next().unwrap(), &self.syms, file, pass);
        let flag = self.report_eval(pass, fname, number, &eval);

        let mut word = eval.word;
        if target == "." {
            // the location counter never loses its relocation bit
            word = Word::new(word.mag(), word.is_reloc() || self.syms.dot().is_reloc());
        }
        self.syms.set_var(&target, word);

        if pass == Pass::Second {
            if let Some(listing) = &mut self.listing {
                listing.assignment(word.mag(), flag);
            }
        }
    }

    fn emit(
        &mut self,
        pass: Pass,
        file: usize,
        fname: &str,
        number: u32,
        text: &str,
        pair: Pair<Rule>,
    ) {
        let eval = expr::evaluate(pair, &self.syms, file, pass);
        let flag = self.report_eval(pass, fname, number, &eval);

        if pass == Pass::Second {
            let base = self.syms.base();
            let dot = self.syms.dot();
            let location = i64::from(dot.signed_mag())
                + if dot.is_reloc() { i64::from(base) } else { 0 };
            if location < 0 {
                self.report(pass, fname, number, Flag::BelowBase, "location below base");
            } else {
                let location = location as u32 & WORD_MASK;
                let word = eval.word.relocate(base);
                if self.debug {
                    eprintln!("as7: {:06o}: {:06o}  {}", location, word, text);
                }
                self.image.set(location, word, text);
                if let Some(listing) = &mut self.listing {
                    listing.word(location, word, flag);
                }
            }
        }

        let dot = self.syms.dot();
        self.syms.set_var(".", dot.add(Word::absolute(1)));
    }

    fn report_eval(&mut self, pass: Pass, fname: &str, number: u32, eval: &Eval) -> Option<Flag> {
        for (flag, message) in &eval.errors {
            self.report(pass, fname, number, *flag, message);
        }
        eval.errors.first().map(|(flag, _)| *flag)
    }

    fn report(&mut self, pass: Pass, fname: &str, number: u32, flag: Flag, message: &str) {
        if pass != Pass::Second {
            return;
        }
        let diag = Diagnostic::error(fname, number, flag, message.to_owned());
        if let Some(listing) = &mut self.listing {
            listing.note(&diag.to_string());
        }
        self.diags.push(diag);
    }

    fn warn(&mut self, fname: &str, number: u32, message: String) {
        let diag = Diagnostic::warning(fname, number, message);
        if let Some(listing) = &mut self.listing {
            listing.note(&diag.to_string());
        }
        self.diags.push(diag);
    }
}
