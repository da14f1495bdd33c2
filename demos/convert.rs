//! Convert a palette or gradient file to another format.
//!
//! ```text
//! cargo run --example convert -- colors.aco colors.ase
//! cargo run --example convert -- colors.pal colors.txt gimp-gpl
//! ```
//!
//! Without a coder name, the output format is chosen from the extension
//! of the output file.  Set `RUST_LOG=debug` to see which coders were
//! tried and what was lost in the conversion.

use std::{env, fs, error::Error, path::Path};
use swatch_codec::{default_registry, Model};

type Err = Box<dyn Error>;

fn init_logging() {
    let mut builder = env_logger::Builder::new();
    match env::var("RUST_LOG") {
        Ok(filter) => { builder.parse_filters(&filter); }
        Err(_) => { builder.filter_level(log::LevelFilter::Info); }
    }
    builder.init();
}

fn describe(model: &Model) -> String {
    match model {
        Model::Palette(p) => {
            format!("palette {:?} ({} colors, {} groups, read as {})",
                    p.name, p.color_count(), p.groups.len(),
                    p.format.unwrap_or("?"))
        }
        Model::Gradients(g) => format!("{} gradients", g.len()),
    }
}

fn main() -> Result<(), Err> {
    init_logging();
    let args: Vec<String> = env::args().skip(1).collect();
    let (input, output) = match args.as_slice() {
        [i, o, ..] => (Path::new(i), Path::new(o)),
        _ => return Err("usage: convert INPUT OUTPUT [CODER]".into()),
    };
    let registry = default_registry();
    let model = registry.decode_path(input, None)?;
    log::info!("{}: {}", input.display(), describe(&model));
    let bytes = match args.get(2) {
        Some(coder) => registry.encode(&model, coder)?,
        None => {
            let ext = output.extension().and_then(|e| e.to_str())
                .ok_or("the output file has no extension")?;
            registry.encode_for_extension(&model, ext)?
        }
    };
    fs::write(output, bytes)?;
    log::info!("wrote {}", output.display());
    Ok(())
}
