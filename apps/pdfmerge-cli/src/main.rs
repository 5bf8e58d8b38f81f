//! PDF merge command line tool
//!
//! Drives the same merge list as the browser front end:
//!
//! ```text
//! pdfmerge cover.pdf report.pdf#1-3,5 :blank appendix.pdf! -o bundle
//! ```

mod item_arg;
mod plan;

use anyhow::Result;
use clap::Parser;
use item_arg::{ItemArg, PageSizeArg, SplitArg};
use pdfmerge_core::{format_bytes, resolve_output_name, AssembleOptions, PageSize};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "pdfmerge")]
#[command(version, about = "Merge PDF files, page ranges and blank pages into one PDF")]
struct Args {
    /// Items in merge order: PATH, PATH#RANGE, PATH! (reversed) or :blank
    #[arg(required = true, value_name = "ITEM")]
    items: Vec<ItemArg>,

    /// Output file name; ".pdf" is appended when missing
    #[arg(short, long)]
    output: Option<String>,

    /// Reverse the order of all items before merging
    #[arg(long)]
    reverse_order: bool,

    /// Split item I (1-based) after N pages, applied in order
    #[arg(long = "split", value_name = "I:N")]
    splits: Vec<SplitArg>,

    /// Size in points of a leading blank page
    #[arg(long, value_name = "WxH")]
    page_size: Option<PageSizeArg>,

    /// Write streams without compressing them
    #[arg(long)]
    no_compress: bool,

    /// Print the merge plan without writing anything
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Output goes to stdout, logs to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut list = plan::build_list(&args.items)?;
    plan::apply_splits(&mut list, &args.splits)?;
    if args.reverse_order {
        plan::reverse_order(&mut list)?;
    }

    if args.dry_run {
        print!("{}", plan::describe(&list));
        return Ok(());
    }

    let options = AssembleOptions {
        blank_page_size: args
            .page_size
            .map(|s| PageSize::new(s.width, s.height))
            .unwrap_or_default(),
        compress: !args.no_compress,
    };

    let today = chrono::Local::now().date_naive();
    let output = PathBuf::from(resolve_output_name(
        args.output.as_deref().unwrap_or(""),
        today,
    ));

    let report = plan::write_merged(&list, &options, &output)?;
    tracing::info!(
        items = report.items,
        blank_pages = report.blank_pages,
        skipped = report.skipped_items,
        "Merge complete"
    );
    println!(
        "Wrote {} ({} pages, {})",
        output.display(),
        report.pages,
        format_bytes(report.output_size_bytes)
    );

    Ok(())
}
