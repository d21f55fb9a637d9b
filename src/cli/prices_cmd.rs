use anyhow::Result;

use crate::cli::output::{self, OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::cost::pricing::{rows, PriceCategory};

pub fn run(category: Option<String>, opts: &OutputOptions) -> Result<()> {
    let category = match category.as_deref() {
        None | Some("all") => None,
        Some(id) => match PriceCategory::from_id(id) {
            Some(c) => Some(c),
            None => {
                eprintln!("Unknown category: '{}' (expected storage|compute|dbu)", id);
                std::process::exit(1);
            }
        },
    };

    let rows = rows(category);
    match opts.format {
        OutputFormat::Text => println!("{}", renderer::render_prices(&rows, opts.use_color)),
        OutputFormat::Json => output::print_json(&rows, opts.pretty)?,
    }
    Ok(())
}
