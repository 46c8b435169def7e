use std::process::ExitCode;

use anyhow::Result;
use awl::cli::{AppContext, Cli};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Build a context once, pass everywhere
    let ctx = cli.context();
    init_tracing(&ctx);

    let color = !ctx.no_color;
    miette::set_hook(Box::new(move |_| {
        Box::new(miette::MietteHandlerOpts::new().color(color).context_lines(2).build())
    }))?;

    if let Some(shell) = cli.completions {
        awl::completion::write(shell, &mut std::io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    awl::sync_run(&cli, &ctx)
}

/// RUST_LOG wins; otherwise the crate logs at warn, or error/debug
/// under --quiet/--verbose. Dependencies stay at warn.
fn init_tracing(ctx: &AppContext) {
    let level = match (ctx.quiet, ctx.verbose) {
        (true, _) => "error",
        (_, true) => "debug",
        _ => "warn",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,awl={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(!ctx.no_color)
        .init();
}
