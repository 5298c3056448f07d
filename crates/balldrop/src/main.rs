#![forbid(unsafe_code)]

//! `balldrop` command-line entry point.

use std::io::{self, Write};

use anyhow::Context;
use balldrop::cli::{Cli, Command, CurveArgs, CycloidArgs, DropTimeArgs, PostArgs};
use balldrop::{logging, pipeline, ManifestHost, RunConfig};
use droptrack::Point;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    logging::init(cli.log_level(), cli.log_json)?;

    let config = cli.run_config().context("loading run configuration")?;
    tracing::debug!(?config, "resolved configuration");

    match &cli.command {
        Command::Curve(args) => curve(&config, args),
        Command::Cycloid(args) => cycloid(&config, args),
        Command::Pre(_) => {
            let mut host = ManifestHost::new(&config.output.dir);
            pipeline::pre_process(&config, &mut host).context("pre-processing failed")?;
            println!("{}", host.model_path().display());
            Ok(())
        }
        Command::Post(PostArgs { skip_reduce, .. }) => {
            let mut host = ManifestHost::new(&config.output.dir);
            let drop = pipeline::post_process(&config, &mut host, !skip_reduce)
                .context("post-processing failed")?;
            println!("{}", host.post_path().display());
            if let Some(drop) = drop {
                println!("{}", drop.format(config.output.decimals));
            }
            Ok(())
        }
        Command::DropTime(args) => drop_time(config, args),
    }
}

fn curve(config: &RunConfig, args: &CurveArgs) -> anyhow::Result<()> {
    let (control, curve) = pipeline::track_curve(config)?;
    let points = if args.control {
        control.points().to_vec()
    } else {
        curve
    };
    emit(&points, args.output.as_deref())
}

fn cycloid(config: &RunConfig, args: &CycloidArgs) -> anyhow::Result<()> {
    emit(&pipeline::cycloid_curve(config), args.output.as_deref())
}

fn drop_time(mut config: RunConfig, args: &DropTimeArgs) -> anyhow::Result<()> {
    if let Some(output) = &args.output {
        config.output.drop_time.clone_from(output);
    }
    let report = args
        .report
        .clone()
        .unwrap_or_else(|| config.report_path());
    let drop = pipeline::reduce_drop_time(&config, &report)
        .with_context(|| format!("reducing {}", report.display()))?;
    println!("{}", drop.format(config.output.decimals));
    Ok(())
}

fn emit(points: &[Point], output: Option<&std::path::Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => pipeline::write_csv(path, points)?,
        None => io::stdout()
            .lock()
            .write_all(pipeline::points_csv(points).as_bytes())
            .context("writing to stdout")?,
    }
    Ok(())
}
