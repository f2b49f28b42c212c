extern crate clap;
extern crate env_logger;
extern crate fractgen;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use fractgen::{parse_constants, Generator, Registry, RenderError};
use num::Complex;
use std::fmt::Display;
use std::process;
use std::str::FromStr;

/// Split "left<separator>right" and parse both halves.
fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    let (left, right) = s.split_once(separator)?;
    Some((left.parse().ok()?, right.parse().ok()?))
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    parse_pair(s, ',').map(|(re, im)| Complex::new(re, im))
}

/// Validate a pair, then hand both halves to `accept` for any range
/// checks.
fn validate_pair<T, P>(s: &str, separator: char, accept: P, err: &str) -> Result<(), String>
where
    T: FromStr,
    P: Fn(&T, &T) -> bool,
{
    match parse_pair::<T>(s, separator) {
        Some((l, r)) if accept(&l, &r) => Ok(()),
        _ => Err(err.to_string()),
    }
}

fn validate_range<T>(s: &str, low: T, high: T, what: &str) -> Result<(), String>
where
    T: FromStr + PartialOrd + Display,
{
    match s.parse::<T>() {
        Ok(i) if i >= low && i <= high => Ok(()),
        Ok(_) => Err(format!("{} must be between {} and {}", what, low, high)),
        Err(_) => Err(format!("Could not parse {}", what)),
    }
}

fn validate_zoom(s: &str) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(z) if z.is_finite() && z > 0.0 => Ok(()),
        Ok(_) => Err("Zoom must be a positive number".to_string()),
        Err(_) => Err("Could not parse zoom".to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const CENTER: &str = "center";
const ZOOM: &str = "zoom";
const FRACTAL: &str = "fractal";
const PALETTE: &str = "palette";
const CONSTANTS: &str = "constants";
const ITERATIONS: &str = "iterations";
const SAMPLES: &str = "samples";
const THREADS: &str = "threads";
const LIST: &str = "list";

fn args<'a>(default_threads: &'a str) -> ArgMatches<'a> {
    App::new("fractgen")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Supersampled escape-time fractal renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required_unless(LIST)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file; the format follows the extension"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| {
                    validate_pair::<u32, _>(
                        &s,
                        'x',
                        |w, h| *w > 0 && *h > 0,
                        "Image size must be WIDTHxHEIGHT, each at least 1",
                    )
                })
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(CENTER)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0,0")
                .validator(|s| {
                    validate_pair::<f64, _>(&s, ',', |_, _| true, "Could not parse center point")
                })
                .help("Point of the complex plane at the center of the image"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .default_value("1")
                .validator(|s| validate_zoom(&s))
                .help("Zoom factor; at 1 the shorter side of the image spans 2 units"),
        )
        .arg(
            Arg::with_name(FRACTAL)
                .long(FRACTAL)
                .short("f")
                .takes_value(true)
                .default_value("mandelbrot")
                .help("Fractal function"),
        )
        .arg(
            Arg::with_name(PALETTE)
                .long(PALETTE)
                .short("p")
                .takes_value(true)
                .default_value("default")
                .help("Colouring function"),
        )
        .arg(
            Arg::with_name(CONSTANTS)
                .long(CONSTANTS)
                .short("k")
                .takes_value(true)
                .allow_hyphen_values(true)
                .help("Comma-separated constants for the fractal function"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("128")
                .validator(|s| validate_range(&s, 1, 1_000_000, "iteration count"))
                .help("Iteration cap for the fractal function"),
        )
        .arg(
            Arg::with_name(SAMPLES)
                .long(SAMPLES)
                .short("a")
                .takes_value(true)
                .default_value("1")
                .validator(|s| validate_range(&s, 1, 16, "sample count"))
                .help("Samples per pixel along each axis"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value(default_threads)
                .validator(|s| validate_range(&s, 1, 1024, "thread count"))
                .help("Number of threads to use in the generator"),
        )
        .arg(
            Arg::with_name(LIST)
                .long(LIST)
                .short("l")
                .help("List the available fractals and colourings, then exit"),
        )
        .get_matches()
}

fn list(registry: &Registry) {
    for name in registry.names() {
        if let Some(family) = registry.get(name) {
            let colourings: Vec<&str> = family.colourings.keys().cloned().collect();
            println!(
                "{} ({} constants): {}",
                name,
                family.constants,
                colourings.join(", ")
            );
        }
    }
}

fn run(matches: &ArgMatches, registry: &Registry) -> Result<(), RenderError> {
    // Everything but the fractal, colouring and constants has been
    // checked by clap's validators by now.
    let (width, height) = parse_pair::<usize>(matches.value_of(SIZE).unwrap_or_default(), 'x')
        .expect("Error parsing image dimensions");
    let center = parse_complex(matches.value_of(CENTER).unwrap_or_default())
        .expect("Error parsing center point");
    let zoom = f64::from_str(matches.value_of(ZOOM).unwrap_or_default()).expect("Error parsing zoom");
    let iterations = usize::from_str(matches.value_of(ITERATIONS).unwrap_or_default())
        .expect("Error parsing iteration count");
    let samples = usize::from_str(matches.value_of(SAMPLES).unwrap_or_default())
        .expect("Error parsing sample count");
    let threads = usize::from_str(matches.value_of(THREADS).unwrap_or_default())
        .expect("Error parsing thread count");

    let constants = parse_constants(matches.value_of(CONSTANTS).unwrap_or(""));
    let point_fn = registry.resolve(
        matches.value_of(FRACTAL).unwrap_or_default(),
        matches.value_of(PALETTE).unwrap_or_default(),
        &constants,
    )?;

    let mut generator = Generator::new(width, height, threads, iterations, center, zoom)?;
    let (upper_left, lower_right) = generator.mapper().bounds();
    info!("Plane region {} to {}", upper_left, lower_right);
    generator.generate(&*point_fn, samples)?;

    let output = matches.value_of(OUTPUT).unwrap_or_default();
    generator
        .framebuffer()
        .save(output)
        .map_err(|e| RenderError::Image(e.to_string()))?;
    info!("Wrote {}", output);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let default_threads = num_cpus::get().to_string();
    let matches = args(&default_threads);
    let registry = Registry::new();

    if matches.is_present(LIST) {
        list(&registry);
        return;
    }

    if let Err(e) = run(&matches, &registry) {
        eprintln!("Render failure: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_parse() {
        assert_eq!(parse_pair::<usize>("640x480", 'x'), Some((640, 480)));
        assert_eq!(parse_pair::<usize>("640x", 'x'), None);
        assert_eq!(parse_pair::<usize>("640", 'x'), None);
        assert_eq!(parse_complex("-0.5,0.25"), Some(Complex::new(-0.5, 0.25)));
    }

    #[test]
    fn sizes_must_be_positive() {
        let size = |s: &str| validate_pair::<u32, _>(s, 'x', |w, h| *w > 0 && *h > 0, "bad size");
        assert!(size("1x1").is_ok());
        assert!(size("0x10").is_err());
        assert!(size("10x0").is_err());
        assert!(size("tenxten").is_err());
    }

    #[test]
    fn ranges_name_what_was_wrong() {
        assert_eq!(validate_range("4", 1, 16, "sample count"), Ok(()));
        assert_eq!(
            validate_range("17", 1, 16, "sample count"),
            Err("sample count must be between 1 and 16".to_string())
        );
        assert_eq!(
            validate_range("lots", 1, 16, "sample count"),
            Err("Could not parse sample count".to_string())
        );
    }
}
