//! Left-to-right fold over the syllables of one expression.
//!
//! There is no precedence. Syllables are joined by an explicit `+` or `-`
//! or by bare whitespace, which means bitwise OR; the whole instruction
//! encoding of the notation rests on that (`lac x` is `lac | x`). The
//! relocation tag follows the values through the fold.

use crate::diag::Flag;
use crate::driver::Pass;
use crate::parser::Rule;
use crate::symbols::Symbols;
use matches::debug_assert_matches;
use pdp7::constants::{CHAR_SHIFT, WORD_MASK};
use pdp7::Word;
use pest::iterators::Pair;

pub struct Eval {
    pub word: Word,
    pub errors: Vec<(Flag, String)>,
}

pub fn evaluate(pair: Pair<Rule>, syms: &Symbols, file: usize, pass: Pass) -> Eval {
    debug_assert_matches!(pair.as_rule(), Rule::expr);

    let mut errors = Vec::new();
    let mut pairs = pair.into_inner();
    let mut word = syllable(pairs.next().unwrap(), syms, file, pass, &mut errors);

    for joined in pairs {
        debug_assert_matches!(joined.as_rule(), Rule::op_syl);
        let mut inner = joined.into_inner();
        let first = inner.next().unwrap();
        let (op, operand) = if first.as_rule() == Rule::sign {
            (
                first.as_str().chars().next().unwrap(),
                inner.next().unwrap(),
            )
        } else {
            ('|', first)
        };
        let operand = syllable(operand, syms, file, pass, &mut errors);

        word = match op {
            '|' => word.or(operand),
            '+' => word.add(operand),
            '-' => word.sub(operand).unwrap_or_else(|| {
                errors.push((Flag::RelocMix, "absolute value minus relative".to_owned()));
                Word::absolute(word.mag().wrapping_sub(operand.mag()) & WORD_MASK)
            }),
            _ => unreachable!(),
        };
    }

    Eval { word, errors }
}

fn syllable(
    pair: Pair<Rule>,
    syms: &Symbols,
    file: usize,
    pass: Pass,
    errors: &mut Vec<(Flag, String)>,
) -> Word {
    debug_assert_matches!(pair.as_rule(), Rule::syllable);

    let inner = pair.into_inner().next().unwrap();
    let text = inner.as_str();
    match inner.as_rule() {
        Rule::char_hi => Word::absolute(char_at(text, 1) << CHAR_SHIFT),
        Rule::char_lo => Word::absolute(char_at(text, 0)),
        Rule::char_bare => Word::absolute(char_at(text, 1)),
        Rule::ident => match syms.lookup(file, text) {
            Some(word) => word,
            None => {
                // forward references resolve when pass two repeats the code
                if pass == Pass::Second {
                    errors.push((Flag::Undefined, format!("{} undefined", text)));
                }
                Word::absolute(0)
            }
        },
        Rule::rel_ref => {
            let mut parts = inner.into_inner();
            let digits = parts.next().unwrap().as_str();
            let forward = parts.next().unwrap().as_str() == "f";
            match syms.relative(file, digits, forward, syms.dot()) {
                Some(word) => word,
                None => {
                    if pass == Pass::Second {
                        errors.push((
                            Flag::Undefined,
                            format!("{}{} undefined", digits, if forward { 'f' } else { 'b' }),
                        ));
                    }
                    Word::absolute(0)
                }
            }
        }
        Rule::number => {
            let parsed = if text.starts_with('0') {
                u64::from_str_radix(text, 8)
            } else {
                text.parse::<u64>()
            };
            match parsed {
                Ok(value) => Word::absolute((value & u64::from(WORD_MASK)) as u32),
                Err(_) => {
                    errors.push((Flag::Syntax, format!("bad constant {}", text)));
                    Word::absolute(0)
                }
            }
        }
        _ => unreachable!(),
    }
}

fn char_at(text: &str, index: usize) -> u32 {
    text.chars().nth(index).unwrap() as u32
}
