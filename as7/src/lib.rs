//! Two-pass assembler for Ken Thompson's PDP-7 assembly notation, as used
//! by the first edition of Unix.
//!
//! The entry point is [`assemble`], which runs both passes over a list of
//! [`Source`] files and returns the populated memory [`Image`](a7file::Image)
//! together with every diagnostic, the rendered label dump, and (on request)
//! the streamed listing. The caller picks an encoder from the [a7file] crate
//! to materialise the image.
//!
//! # The notation
//!
//! Source is line oriented. A line holds labels, assignments and bare
//! expressions, separated by `;`; a `"` starts a comment running to the end
//! of the line. Commas count as blanks. A line beginning with a tab and a
//! dot is a directive; the only one is `.local NAME`, which makes `NAME` a
//! file-local label (names starting with `L` are local without any
//! declaration).
//!
//! Expressions have no precedence: they are folded left to right from
//! whitespace-separated *syllables*, where a bare blank joins with bitwise
//! OR. The whole instruction encoding relies on that, e.g.
//!
//! ```text
//! lac i 010    " lac | i | 010: indirect load of cell 8
//! ```
//!
//! The syllable forms are:
//!
//!  Form   | Value
//! --------|--------------------------------------------------------------
//! `<c`    | the character `c` shifted into the high half (`ord(c) << 9`)
//! `c>`    | `ord(c)`
//! `>c`    | `ord(c)` (alias of `c>`)
//! `name`  | variable, else label (a file-local entry shadows the global)
//! `Nf`    | next definition of the numeric label `N:` after here
//! `Nb`    | previous definition of the numeric label `N:` before here
//! `017`   | integer; a leading `0` makes it octal, 18-bit wraparound
//!
//! Explicit `+` and `-` join syllables with masked 18-bit arithmetic. A
//! value derived from a location is *relocatable* and keeps that tag
//! through `|` and `+`; subtracting two relocatables yields an absolute
//! value, and `absolute - relocatable` is the `A` error.
//!
//! Numeric labels (`1:`, `2:`, ...) may be redefined freely; alphabetic
//! labels may not change value, and redefinition is reported (non-fatally)
//! on pass two. Assigning to `.` moves the location counter; `..` is the
//! relocation base added to every relocatable value when it is emitted,
//! `0o10000` unless reassigned.
//!
//! # Output formats
//!
//!  Format  | Content
//! ---------|-------------------------------------------------------------
//! `a7out`  | `location: word` octal text dump with source lines
//! `list`   | pass-two listing with per-statement words, flags and labels
//! `ptr`    | paper-tape frames from `..` to the highest populated cell
//! `rim`    | `ptr` plus the RIM loader's trailing halt-and-start word

mod diag;
mod driver;
mod expr;
mod listing;
mod parser;
mod symbols;

#[cfg(test)]
mod test;

pub use diag::{Diagnostic, Flag, Severity};
pub use driver::{assemble, Options, Output, Source};
