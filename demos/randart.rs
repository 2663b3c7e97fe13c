use clap::{Arg, ArgAction, Command};
use rand::Rng;
use randart::builder::Recipe;
use randart::{open, render, save};

fn main() -> anyhow::Result<()> {
    let matches = Command::new("Randart")
        .about("Procedural art from random math expression trees")
        .version("0.1")
        .arg(
            Arg::new("output")
                .required(true)
                .short('o')
                .long("output")
                .action(ArgAction::Set)
                .num_args(1..2)
                .help("Output file `*.png`")
        )
        .arg(
            Arg::new("width")
                .short('W')
                .long("width")
                .action(ArgAction::Set)
                .num_args(1..2)
                .help("Image width in pixels (default 350)")
        )
        .arg(
            Arg::new("height")
                .short('H')
                .long("height")
                .action(ArgAction::Set)
                .num_args(1..2)
                .help("Image height in pixels (default 350)")
        )
        .arg(
            Arg::new("seed")
                .short('s')
                .long("seed")
                .action(ArgAction::Set)
                .num_args(1..2)
                .help("Seed for the random generator (default: fresh entropy)")
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .action(ArgAction::Set)
                .num_args(1..2)
                .help("Input recipe file `*.art` (overrides size and seed)")
        )
        .arg(
            Arg::new("recipe")
                .short('r')
                .long("recipe")
                .action(ArgAction::Set)
                .num_args(1..2)
                .help("Save the generation recipe to a file `*.art`")
        )
        .arg(
            Arg::new("sequential")
                .long("sequential")
                .action(ArgAction::SetTrue)
                .help("Render on a single thread with row progress")
        )
        .arg(
            Arg::new("formulas")
                .long("formulas")
                .action(ArgAction::SetTrue)
                .help("Print the channel formulas to stderr")
        )
        .get_matches();

    let out_file = matches.get_one::<String>("output")
        .expect("required by clap");

    let recipe = if let Some(file) = matches.get_one::<String>("input") {
        open(file)?
    } else {
        let width: u32 = match matches.get_one::<String>("width") {
            Some(w) => w.parse()?,
            None => 350,
        };
        let height: u32 = match matches.get_one::<String>("height") {
            Some(h) => h.parse()?,
            None => 350,
        };
        let seed: u64 = match matches.get_one::<String>("seed") {
            Some(s) => s.parse()?,
            None => rand::thread_rng().gen(),
        };
        Recipe::new(seed, [width, height])
    };
    eprintln!("seed: {}", recipe.seed);

    if let Some(file) = matches.get_one::<String>("recipe") {
        save(file, &recipe)?;
    }

    let color = recipe.color()?;
    if matches.get_flag("formulas") {
        for (name, expr) in ["red", "green", "blue"].iter().zip(&color) {
            eprintln!("{}: {}", name, expr);
        }
    }

    if matches.get_flag("sequential") {
        render::gen(&color, out_file, recipe.size)?;
    } else {
        render::par_gen(&color, out_file, recipe.size)?;
    }
    Ok(())
}
