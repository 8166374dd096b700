/**
 * neighborec
 * Copyright (C) 2019 the neighborec developers
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

extern crate getopts;
extern crate neighborec;
extern crate num_cpus;

use std::env;
use std::error::Error;
use std::process;

use getopts::Options;

use neighborec::eval;
use neighborec::io;
use neighborec::similarity::Mode;
use neighborec::stats::{DataDictionary, Ratings, Renaming};
use neighborec::utils;

fn main() {

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("i", "inputfile", "Input file name (required). The input consists of explicit \
        ratings that users gave to items. The input file must contain a user, item and integer \
        rating per line, separated by tabs; a trailing timestamp field is ignored.", "PATH");
    opts.optopt("m", "mode", "Neighborhood mode (required), either 'user' for user-based \
        Pearson correlation or 'item' for item-based adjusted cosine similarity.", "MODE");
    opts.optopt("f", "folds", "Number of folds for cross-validation (optional, 5 or 10, \
        defaults to 5).", "NUMBER");
    opts.optopt("k", "neighbors", "Neighborhood size (optional, one of 10, 20, ..., 80, \
        defaults to 10).", "NUMBER");
    opts.optopt("o", "outputfile", "Output file name (optional). If set, the full prediction \
        table is additionally written to this path as JSON lines.", "PATH");
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

    if !matches.opt_present("i") {
        return print_usage_and_exit(
            &program,
            opts,
            Some("Please specify an inputfile via --inputfile."),
        );
    }

    if !matches.opt_present("m") {
        return print_usage_and_exit(
            &program,
            opts,
            Some("Please specify a mode via --mode, either 'user' or 'item'."),
        );
    }

    let ratings_path = matches.opt_str("i").unwrap();
    let raw_mode = matches.opt_str("m").unwrap();
    let predictions_path = matches.opt_str("o");

    let num_folds: usize = match matches.opt_get_default("f", 5) {
        Ok(num_folds) => num_folds,
        Err(failure) => {
            let hint = format!("Problem with option 'f': {}", failure.to_string());
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    if num_folds != 5 && num_folds != 10 {
        return print_usage_and_exit(&program, opts, Some("Please use 5 or 10 folds."));
    }

    let num_neighbors: usize = match matches.opt_get_default("k", 10) {
        Ok(num_neighbors) => num_neighbors,
        Err(failure) => {
            let hint = format!("Problem with option 'k': {}", failure.to_string());
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    if num_neighbors % 10 != 0 || num_neighbors < 10 || num_neighbors > 80 {
        return print_usage_and_exit(
            &program,
            opts,
            Some("Please use a neighborhood size of 10, 20, ..., 80."),
        );
    }

    let outcome = evaluate(
        &ratings_path,
        &raw_mode,
        num_folds,
        num_neighbors,
        predictions_path,
    );

    if let Err(failure) = outcome {
        eprintln!("Evaluation failed: {}", failure);
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

fn evaluate(
    ratings_path: &str,
    raw_mode: &str,
    num_folds: usize,
    num_neighbors: usize,
    predictions_path: Option<String>,
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

    let predictions = neighborec::cross_validate(
        &ratings,
        mode,
        num_folds,
        num_neighbors,
        num_cpus::get(),
    )?;

    let mae = eval::mean_absolute_error(mode.ground_truth(&ratings), &predictions)?;

    println!(
        "model = {} | k-fold = {} | k-near = {} | mae = {}",
        mode, num_folds, num_neighbors, utils::round_to(mae, 4),
    );

    if predictions_path.is_some() {
        // Build reverse index, make sure we consume the data dictionary
        let renaming: Renaming = data_dict.into();

        println!("Writing predictions...");
        io::write_predictions(&predictions, mode, &renaming, predictions_path)?;
    }

    Ok(())
}
