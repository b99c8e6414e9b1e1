//! `xmatch inspect`: show what a table loads as.

use anyhow::Context;
use celestial_xmatch::table::csv::{read_table_from_path, CsvOptions};
use celestial_xmatch::Table;

use crate::cli::{Cli, InspectArgs};

pub fn run(args: &InspectArgs, _cli: &Cli) -> anyhow::Result<()> {
    let options = CsvOptions::default().with_delimiter(args.delimiter);
    let table = read_table_from_path(&args.path, &options)
        .with_context(|| format!("Failed to read table {:?}", args.path))?;

    println!("=== {} ===", args.path.display());
    println!("Rows: {}", table.len());
    println!("Columns: {}", table.schema().len());
    for column in table.schema().columns() {
        println!("  {:<24} {}", column.name, column.ty);
    }

    if let Some(n) = args.head {
        print_head(&table, n, args.delimiter)?;
    }
    Ok(())
}

fn print_head(table: &Table, n: usize, delimiter: char) -> anyhow::Result<()> {
    let mut head = Table::new(table.schema().clone());
    for row in table.rows().iter().take(n) {
        head.push_row(row.clone())?;
    }
    println!();
    print!("{}", head.to_delimited(delimiter)?);
    Ok(())
}
