//! Command line front end: scan an input file against a pattern catalog and
//! print the matches.

use std::fs;

use clap::{App, Arg};

use descan::{ContextBuilder, Result};

fn main() -> Result<()> {
    env_logger::init();

    let args = App::new("descan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scans a file for the patterns of a pattern definition file")
        .arg(
            Arg::with_name("INPUT")
                .help("Path of the input file to scan")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("patterns")
                .short("p")
                .long("patterns")
                .value_name("FILE")
                .help("Path of the pattern definition file")
                .takes_value(true),
        )
        .get_matches();

    let pattern_path = args.value_of("patterns").unwrap_or("patterns.json");
    let input_path = args.value_of("INPUT").unwrap();

    let ctxt = ContextBuilder::new()
        .add_patterns_file(pattern_path)?
        .build();
    let input = fs::read_to_string(input_path)?;

    let mut scanner = ctxt.scanner();
    let mut matches = scanner.update(&input);
    matches.extend(scanner.complete());

    for m in &matches {
        println!("{} {} {} {}", m.pattern_id(), m.name(), m.pos(), m.text());
    }
    Ok(())
}
