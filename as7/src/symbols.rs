use pdp7::constants::DEFAULT_BASE;
use pdp7::{Word, MNEMONICS};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Outcome of a label definition.
pub enum SetLabel {
    Defined,
    /// Redefinition with the value already stored.
    Unchanged,
    /// Redefinition with a different value; the stored one wins.
    Conflict(Word),
}

/// Every name table of one assembly run.
///
/// Variables (assignment targets and the predefined mnemonics, including
/// `.` and `..`) are global. Labels are global unless the file declared
/// them local with `.local` or they begin with `L`; local tables are keyed
/// by the index of the source file in the input list. Relative labels keep
/// the ordered list of every location they were defined at.
pub struct Symbols {
    vars: HashMap<String, Word>,
    globals: BTreeMap<String, Word>,
    locals: HashMap<(usize, String), Word>,
    local_names: HashSet<(usize, String)>,
    relative: HashMap<(usize, String), Vec<Word>>,
}

impl Symbols {
    pub fn new() -> Symbols {
        let mut vars = HashMap::new();
        for &(name, value) in MNEMONICS {
            vars.insert(name.to_owned(), Word::absolute(value));
        }
        vars.insert(".".to_owned(), Word::relocatable(0));
        vars.insert("..".to_owned(), Word::absolute(DEFAULT_BASE));
        Symbols {
            vars,
            globals: BTreeMap::new(),
            locals: HashMap::new(),
            local_names: HashSet::new(),
            relative: HashMap::new(),
        }
    }

    /// Rewind the location counter for the next pass. Nothing else resets.
    pub fn rewind(&mut self) {
        self.set_var(".", Word::relocatable(0));
    }

    pub fn dot(&self) -> Word {
        self.vars["."]
    }

    /// Current magnitude of the relocation base `..`.
    pub fn base(&self) -> u32 {
        self.vars[".."].mag()
    }

    pub fn set_var(&mut self, name: &str, value: Word) {
        self.vars.insert(name.to_owned(), value);
    }

    /// Expression lookup: variables first, then labels.
    pub fn lookup(&self, file: usize, name: &str) -> Option<Word> {
        self.vars
            .get(name)
            .copied()
            .or_else(|| self.label(file, name))
    }

    /// The file's local entry shadows the global one.
    pub fn label(&self, file: usize, name: &str) -> Option<Word> {
        self.locals
            .get(&(file, name.to_owned()))
            .copied()
            .or_else(|| self.globals.get(name).copied())
    }

    pub fn declare_local(&mut self, file: usize, name: &str) {
        self.local_names.insert((file, name.to_owned()));
    }

    fn is_local(&self, file: usize, name: &str) -> bool {
        name.starts_with('L') || self.local_names.contains(&(file, name.to_owned()))
    }

    pub fn set_label(&mut self, file: usize, name: &str, value: Word) -> SetLabel {
        if self.is_local(file, name) {
            let key = (file, name.to_owned());
            match self.locals.get(&key) {
                None => {
                    self.locals.insert(key, value);
                    SetLabel::Defined
                }
                Some(&old) if old == value => SetLabel::Unchanged,
                Some(&old) => SetLabel::Conflict(old),
            }
        } else {
            match self.globals.get(name) {
                None => {
                    self.globals.insert(name.to_owned(), value);
                    SetLabel::Defined
                }
                Some(&old) if old == value => SetLabel::Unchanged,
                Some(&old) => SetLabel::Conflict(old),
            }
        }
    }

    /// Record one more definition of a numeric label (pass one only).
    pub fn note_relative(&mut self, file: usize, name: &str, location: Word) {
        self.relative
            .entry((file, name.to_owned()))
            .or_insert_with(Vec::new)
            .push(location);
    }

    /// Resolve `Nf`/`Nb`: the nearest definition strictly after (`forward`)
    /// or strictly before the current location counter.
    pub fn relative(&self, file: usize, name: &str, forward: bool, dot: Word) -> Option<Word> {
        let locations = self.relative.get(&(file, name.to_owned()))?;
        let found = if forward {
            locations
                .iter()
                .filter(|location| location.mag() > dot.mag())
                .min_by_key(|location| location.mag())
        } else {
            locations
                .iter()
                .filter(|location| location.mag() < dot.mag())
                .max_by_key(|location| location.mag())
        };
        found.copied()
    }

    /// Global labels in name order, for the label dump.
    pub fn globals(&self) -> impl Iterator<Item = (&str, Word)> {
        self.globals.iter().map(|(name, &word)| (name.as_str(), word))
    }
}
