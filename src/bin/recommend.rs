extern crate getopts;
extern crate neighborec;

use std::env;
use std::error::Error;
use std::io::prelude::*;
use std::io::{stdin, stdout};
use std::process;

use getopts::Options;

use neighborec::errors::CfError;
use neighborec::io;
use neighborec::recommend;
use neighborec::similarity::Mode;
use neighborec::stats::{DataDictionary, Ratings, Renaming};

fn main() {

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("i", "inputfile", "Input file name (required). The input must contain a user, \
        item and integer rating per line, separated by tabs; a trailing timestamp field is \
        ignored.", "PATH");
    opts.optopt("m", "mode", "Neighborhood mode (required), either 'user' or 'item'.", "MODE");
    opts.optopt("k", "neighbors", "Neighborhood size (optional, defaults to 10).", "NUMBER");
    opts.optopt("n", "num-recommendations", "Number of items to recommend (optional, defaults \
        to 10).", "NUMBER");
    opts.optflag("h", "help", "Print this help menu");

    let matches = match opts.parse(&args[1..]) {
        Ok(matches) => matches,
        Err(failure) => {
            let hint = failure.to_string();
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    if matches.opt_present("h") {
        return print_usage_and_exit(&program, opts, None);
    }

    if !matches.opt_present("i") || !matches.opt_present("m") {
        return print_usage_and_exit(
            &program,
            opts,
            Some("Please specify an inputfile via --inputfile and a mode via --mode."),
        );
    }

    let ratings_path = matches.opt_str("i").unwrap();
    let raw_mode = matches.opt_str("m").unwrap();

    let num_neighbors: usize = match matches.opt_get_default("k", 10) {
        Ok(num_neighbors) => num_neighbors,
        Err(failure) => {
            let hint = format!("Problem with option 'k': {}", failure.to_string());
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    if num_neighbors < 1 {
        return print_usage_and_exit(
            &program,
            opts,
            Some("Please use a neighborhood size of at least 1."),
        );
    }

    let how_many: usize = match matches.opt_get_default("n", 10) {
        Ok(how_many) => how_many,
        Err(failure) => {
            let hint = format!("Problem with option 'n': {}", failure.to_string());
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    if let Err(failure) = recommend_interactively(&ratings_path, &raw_mode, num_neighbors, how_many) {
        eprintln!("Recommendation failed: {}", failure);
        process::exit(1);
    }
}

fn print_usage_and_exit(
    program: &str,
    opts: Options,
    hint: Option<&str>
) {

    if let Some(hint) = hint {
        eprintln!("\n{}\n", hint);
    }

    let brief = format!("Usage: {} [options]", program);
    eprint!("{}", opts.usage(&brief));
}

fn recommend_interactively(
    ratings_path: &str,
    raw_mode: &str,
    num_neighbors: usize,
    how_many: usize,
) -> Result<(), Box<Error>> {

    let mode = Mode::parse(raw_mode)?;

    println!("Reading {}...", ratings_path);

    let triples = io::read_ratings(ratings_path)?;
    let data_dict = DataDictionary::from(triples.iter());

    println!(
        "Found {} ratings from {} users for {} items.",
        data_dict.num_ratings(),
        data_dict.num_users(),
        data_dict.num_items(),
    );

    let ratings = Ratings::from_triples(&triples, &data_dict)?;

    print!("Please enter user id :");
    stdout().flush()?;

    let mut raw_user = String::new();
    stdin().read_line(&mut raw_user)?;
    let raw_user = raw_user.trim();

    let user = data_dict.user_index(raw_user)
        .ok_or_else(|| CfError::UnknownEntity(raw_user.to_string()))?;

    let recommendations = recommend::recommend(&ratings, mode, user, num_neighbors, how_many)?;

    let renaming = Renaming::from(data_dict);

    println!("Recommendations :");
    for (position, item_index) in recommendations.iter().enumerate() {
        println!("{:2}. {}", position + 1, renaming.item_name(*item_index));
    }

    Ok(())
}
