//! `xmatch match`: load, cross-match, write.

use anyhow::Context;
use celestial_xmatch::table::csv::{read_table_from_path, write_table, CsvOptions};
use celestial_xmatch::{
    cross_match, CollisionPolicy, CrossMatchConfig, CrossMatchOutput, NonMatchPolicy, Table,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::cli::{Cli, CollisionArg, MatchArgs, ModeArg, OutputFormat};

pub fn run(args: &MatchArgs, cli: &Cli) -> anyhow::Result<()> {
    let config = resolve_config(args)?;
    if cli.verbose {
        log::debug!("Configuration:\n{}", config.to_json_pretty()?);
    }

    let options = CsvOptions::default().with_delimiter(args.delimiter);
    let left = load_table(&args.left, &options)?;
    let right = load_table(&args.right, &options)?;

    let output = cross_match(&left, &right, &config).with_context(|| {
        format!(
            "Cross-match of {:?} against {:?} failed",
            args.left, args.right
        )
    })?;

    write_output(&output, args, &options)?;
    if args.summary {
        eprintln!("{}", output.summary);
    }
    Ok(())
}

fn resolve_config(args: &MatchArgs) -> anyhow::Result<CrossMatchConfig> {
    if let Some(path) = &args.config {
        return CrossMatchConfig::from_path(path)
            .with_context(|| format!("Failed to load configuration {:?}", path));
    }

    let (Some(threshold), Some(collision)) = (args.threshold, args.collision) else {
        anyhow::bail!("--threshold and --collision are required without --config");
    };
    let policy = match collision {
        CollisionArg::Reject => CollisionPolicy::Reject,
        CollisionArg::Prefix => CollisionPolicy::prefix(&args.left_tag, &args.right_tag),
        CollisionArg::Suffix => CollisionPolicy::suffix(&args.left_tag, &args.right_tag),
    };

    let mut config = CrossMatchConfig::nearest(
        &args.ra_left,
        &args.dec_left,
        &args.ra_right,
        &args.dec_right,
        threshold,
        policy,
    );
    if let ModeArg::Radius = args.mode {
        let Some(max) = args.max_separation else {
            anyhow::bail!("--mode radius requires --max-separation");
        };
        config = config.with_radius(max);
    }
    if args.keep_unmatched {
        config = config.with_non_match_policy(NonMatchPolicy::KeepWithNulls);
    }
    config.validate()?;
    Ok(config)
}

fn load_table(path: &Path, options: &CsvOptions) -> anyhow::Result<Table> {
    let table = read_table_from_path(path, options)
        .with_context(|| format!("Failed to read table {:?}", path))?;
    log::info!(
        "Loaded {:?}: {} rows, {} columns",
        path,
        table.len(),
        table.schema().len()
    );
    Ok(table)
}

fn write_output(
    output: &CrossMatchOutput,
    args: &MatchArgs,
    options: &CsvOptions,
) -> anyhow::Result<()> {
    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {:?}", path))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    match args.format {
        OutputFormat::Csv => write_table(&output.joined, writer, options)?,
        OutputFormat::Json => {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, &output.joined)?;
            writeln!(writer)?;
            writer.flush()?;
        }
    }

    if let Some(path) = &args.output {
        log::info!("Wrote {} rows to {:?}", output.joined.len(), path);
    }
    Ok(())
}
