//! Loads front-end parameter files and prints them.
//!
//! `vio-params <file.yaml>` prints the loaded parameters.
//! `vio-params <a.yaml> <b.yaml>` compares two files and prints both when
//! they differ.
//!
//! `-` in place of a path stands for the built-in defaults.

use anyhow::{bail, Context, Result};
use vio_frontend_params::{FrontEndParams, ParametersTrait};

fn load(arg: &str) -> Result<FrontEndParams> {
    if arg == "-" {
        return Ok(FrontEndParams::default());
    }
    FrontEndParams::parse_yaml(arg).with_context(|| format!("loading {}", arg))
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_nanos()
        .parse_default_env()
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [path] => {
            load(path)?.print();
            Ok(())
        }
        [left, right] => {
            let a = load(left)?;
            let b = load(right)?;
            if a.equals_default_tol(&b) {
                log::info!("{} and {} hold the same parameters", left, right);
                Ok(())
            } else {
                a.print();
                b.print();
                bail!("{} and {} differ", left, right)
            }
        }
        _ => bail!("usage: vio-params <params.yaml|-> [other.yaml|-]"),
    }
}
