#[macro_use]
extern crate clap;

use a7file::WriteImageExt;
use as7::{assemble, Options, Output, Source};
use clap::{App, Arg};
use std::fs::File;
use std::io::prelude::*;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Debug)]
enum IOErrorContext {
    ReadInput,
    WriteOutput,
}

#[derive(Debug)]
enum Error {
    Io(std::io::Error, IOErrorContext, PathBuf),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err, context, path) => writeln!(
                f,
                "{} file \"{}\" failed: {}",
                match context {
                    IOErrorContext::ReadInput => "Reading input",
                    IOErrorContext::WriteOutput => "Writing output",
                },
                path.display(),
                err
            ),
        }
    }
}

fn main() {
    // Parse command line arguments
    let matches = App::new("as7")
        .version(crate_version!())
        .about("Assembles PDP-7 sources written in the original Unix notation")
        .arg(
            Arg::with_name("debug")
                .short("d")
                .long("debug")
                .help("Enables internal tracing on standard error"),
        )
        .arg(
            Arg::with_name("format")
                .short("f")
                .long("format")
                .takes_value(true)
                .value_name("FORMAT")
                .possible_values(&["a7out", "list", "ptr", "rim"])
                .default_value("a7out")
                .help("Selects the output format"),
        )
        .arg(
            Arg::with_name("namelist")
                .short("n")
                .long("namelist")
                .help("Additionally writes a name-list file"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("PATH")
                .default_value("a.out")
                .help("Sets the output file to write to"),
        )
        .arg(
            Arg::with_name("FILES")
                .help("Sets the source files to assemble")
                .required(true)
                .multiple(true),
        )
        .get_matches();

    let format = matches.value_of("format").unwrap();
    let output = Path::new(matches.value_of("output").unwrap());
    let namelist = matches.is_present("namelist");
    let debug = matches.is_present("debug");
    let files: Vec<&str> = matches.values_of("FILES").unwrap().collect();

    match as7(&files, format, output, namelist, debug) {
        Ok(clean) => {
            if !clean {
                std::process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}

fn as7(
    files: &[&str],
    format: &str,
    output: &Path,
    namelist: bool,
    debug: bool,
) -> Result<bool, Error> {
    // Read every input file up front; both passes see the same list
    let mut sources = Vec::with_capacity(files.len());
    for file in files {
        let path = Path::new(file);
        let mut text = String::new();
        File::open(path)
            .and_then(|mut input| input.read_to_string(&mut text))
            .map_err(|err| Error::Io(err, IOErrorContext::ReadInput, path.to_owned()))?;
        sources.push(Source {
            name: (*file).to_owned(),
            text,
        });
    }

    let options = Options {
        listing: format == "list",
        debug,
    };
    let result = assemble(&sources, &options);

    for diagnostic in &result.diagnostics {
        eprintln!("{}", diagnostic);
    }

    write_output(format, output, &result)
        .map_err(|err| Error::Io(err, IOErrorContext::WriteOutput, output.to_owned()))?;

    if namelist {
        let path = output.with_extension("nm");
        File::create(&path)
            .and_then(|mut file| file.write_all(result.labels.as_bytes()))
            .map_err(|err| Error::Io(err, IOErrorContext::WriteOutput, path))?;
    }

    Ok(!result.has_errors())
}

fn write_output(format: &str, path: &Path, result: &Output) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    match format {
        "a7out" => writer.write_dump(&result.image)?,
        "list" => {
            if let Some(listing) = &result.listing {
                writer.write_all(listing.as_bytes())?;
            }
        }
        "ptr" => writer.write_ptr(&result.image, result.base)?,
        "rim" => writer.write_rim(&result.image, result.base)?,
        _ => unreachable!(),
    }
    writer.flush()
}
