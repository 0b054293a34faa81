use crate::diag::Flag;
use crate::driver::{assemble, Options, Output, Source};
use pdp7::constants::DEFAULT_BASE;


fn asm(text: &str) -> Output {
    asm_files(&[("test.s", text)])
}

fn asm_files(files: &[(&str, &str)]) -> Output {
    let sources: Vec<Source> = files
        .iter()
        .map(|&(name, text)| Source::new(name, text))
        .collect();
    assemble(&sources, &Options::default())
}

fn asm_listing(text: &str) -> Output {
    let options = Options {
        listing: true,
        debug: false,
    };
    assemble(&[Source::new("test.s", text)], &options)
}

#[test]
fn assignment_then_reference() {
    let result = asm("x = 5; lac x");

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.image.len(), 1);
    assert_eq!(result.image.get(DEFAULT_BASE), Some(0o200005));
}

#[test]
fn label_reference_is_relocated() {
    let result = asm("foo: lac foo");

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.image.get(0o10000), Some(0o210000));
}

#[test]
fn forward_relative_reference() {
    let result = asm("1:
hlt
jmp 1f
1:
hlt");

    assert!(result.diagnostics.is_empty());
    // the jmp sits one word in and targets the cell after it
    assert_eq!(result.image.get(0o10001), Some(0o610002));
    assert_eq!(result.image.get(0o10000), Some(0o740040));
    assert_eq!(result.image.get(0o10002), Some(0o740040));
}

#[test]
fn relative_label_lists_resolve_by_direction() {
    let result = asm("1:
hlt
1:
lac 1b
lac 1f
1:");

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.image.get(0o10001), Some(0o210000));
    assert_eq!(result.image.get(0o10002), Some(0o210003));
}

#[test]
fn character_literals() {
    let result = asm("<A
A>
>A");

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.image.get(0o10000), Some(0o101000));
    assert_eq!(result.image.get(0o10001), Some(0o101));
    assert_eq!(result.image.get(0o10002), Some(0o101));
}

#[test]
fn assigning_the_location_counter_keeps_it_relocatable() {
    let result = asm(". = 7; hlt");

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.image.len(), 1);
    assert_eq!(result.image.get(DEFAULT_BASE + 7), Some(0o740040));
}

#[test]
fn relocatable_minus_relocatable_is_absolute() {
    let result = asm("foo: bar: bar - foo");

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.image.get(DEFAULT_BASE), Some(0));
}

#[test]
fn absolute_minus_relocatable_is_an_error() {
    let result = asm("foo: 3 - foo");

    assert!(result.has_errors());
    assert_eq!(result.diagnostics[0].flag(), Some(Flag::RelocMix));
}

#[test]
fn several_labels_bind_to_the_same_location() {
    let result = asm("a: b: c: hlt");

    assert!(result.diagnostics.is_empty());
    assert!(result.labels.contains("a        0010000 r\n"));
    assert!(result.labels.contains("b        0010000 r\n"));
    assert!(result.labels.contains("c        0010000 r\n"));
}

#[test]
fn labels_may_follow_a_statement_separator() {
    let result = asm("hlt; two: hlt");

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.labels, "two      0010001 r\n");
}

#[test]
fn comments_and_blank_lines_emit_nothing() {
    let result = asm("\" just a remark

   \" another one");

    assert!(result.diagnostics.is_empty());
    assert!(result.image.is_empty());
}

#[test]
fn empty_input_assembles_cleanly() {
    let result = asm("");

    assert!(result.diagnostics.is_empty());
    assert!(result.image.is_empty());
    assert!(result.labels.is_empty());
    assert_eq!(result.base, DEFAULT_BASE);
}

#[test]
fn leading_zero_selects_octal() {
    let result = asm("010; 10; 8");

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.image.get(DEFAULT_BASE), Some(8));
    assert_eq!(result.image.get(DEFAULT_BASE + 1), Some(10));
    assert_eq!(result.image.get(DEFAULT_BASE + 2), Some(8));
}

#[test]
fn undefined_symbol_is_reported_once() {
    let result = asm("lac nowhere");

    assert!(result.has_errors());
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].flag(), Some(Flag::Undefined));
    assert_eq!(result.diagnostics[0].to_string(), "test.s:1: nowhere undefined");
    // the missing syllable contributes zero
    assert_eq!(result.image.get(DEFAULT_BASE), Some(0o200000));
}

#[test]
fn forward_variable_reference_resolves_on_pass_two() {
    let result = asm("lac x
x = 5");

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.image.get(DEFAULT_BASE), Some(0o200005));
}

#[test]
fn duplicate_label_is_a_warning_and_keeps_the_first_value() {
    let result = asm("foo: hlt
foo: hlt");

    assert_eq!(result.diagnostics.len(), 1);
    assert!(!result.diagnostics[0].is_error());
    assert!(!result.has_errors());
    assert_eq!(result.labels, "foo      0010000 r\n");
}

#[test]
fn leading_l_makes_a_label_file_local() {
    let result = asm_files(&[("one.s", "Lx: jmp Lx"), ("two.s", "Lx: jmp Lx")]);

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.image.get(0o10000), Some(0o610000));
    assert_eq!(result.image.get(0o10001), Some(0o610001));
    assert!(result.labels.is_empty());
}

#[test]
fn local_directive_scopes_a_label_to_its_file() {
    let result = asm_files(&[
        ("one.s", "\t.local here\nhere: jmp here"),
        ("two.s", "here: hlt"),
    ]);

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.image.get(0o10000), Some(0o610000));
    assert_eq!(result.image.get(0o10001), Some(0o740040));
    // only the global definition from the second file is dumped
    assert_eq!(result.labels, "here     0010001 r\n");
}

#[test]
fn unknown_directive_is_a_syntax_error() {
    let result = asm("\t.globl foo");

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].flag(), Some(Flag::Syntax));
}

#[test]
fn unparsable_line_is_dropped_and_assembly_continues() {
    let result = asm("???
hlt");

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].flag(), Some(Flag::Syntax));
    // the bad line emitted nothing, so the next word lands at the base
    assert_eq!(result.image.get(DEFAULT_BASE), Some(0o740040));
}

#[test]
fn storing_below_the_base_is_refused() {
    let result = asm(". = . - 0100000
hlt");

    assert!(result.has_errors());
    assert_eq!(result.diagnostics[0].flag(), Some(Flag::BelowBase));
    assert!(result.image.is_empty());
}

#[test]
fn base_reassignment_carries_over_into_pass_two() {
    // ".." is not rewound between passes, so pass two relocates with the
    // value pass one ended with, from the first statement on
    let result = asm("lac 0
.. = 020000
lac 1");

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.base, 0o20000);
    assert_eq!(result.image.len(), 2);
    assert_eq!(result.image.get(0o20000), Some(0o200000));
    assert_eq!(result.image.get(0o20001), Some(0o200001));
}

#[test]
fn reassembly_is_identical() {
    let text = "foo: lac foo
jmp 1f
1:
hlt";
    let first = asm(text);
    let second = asm(text);

    assert_eq!(first.image, second.image);
    assert_eq!(first.labels, second.labels);
}

#[test]
fn listing_streams_lines_words_and_labels() {
    let result = asm_listing("x = 5; lac x");

    assert_eq!(
        result.listing.unwrap(),
        "\t\tx = 5; lac x\n\
         \t000005  \n\
         010000: 200005  \n\
         \nLabels:\n"
    );
}

#[test]
fn listing_flags_mark_the_failing_statement() {
    let result = asm_listing("lac nowhere");

    let listing = result.listing.unwrap();
    assert!(listing.contains("010000: 200000 U\n"));
    assert!(listing.contains("test.s:1: nowhere undefined\n"));
}
