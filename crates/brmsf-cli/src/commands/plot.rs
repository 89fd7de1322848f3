use crate::cli::PlotArgs;
use crate::config::build_plot_config;
use crate::error::{CliError, Result};
use crate::plot;
use brmsf::core::io::table::CsvTableFile;
use tracing::info;

pub async fn run(args: PlotArgs) -> Result<()> {
    let config = build_plot_config(&args)?;

    info!("Reading result table from {:?}", &args.input);
    let table = CsvTableFile::read_from_path(&args.input).map_err(|e| CliError::FileParsing {
        path: args.input.clone(),
        source: e.into(),
    })?;
    info!(
        "Table holds {} row(s) of kind {:?}.",
        table.len(),
        table.kind()
    );

    plot::render_svg(&table, &config, &args.output)?;
    println!("✓ Plot written to: {}", args.output.display());
    Ok(())
}
