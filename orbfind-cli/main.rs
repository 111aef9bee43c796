use std::path::PathBuf;
use std::time::Instant;

use orbfind_cli::render::{draw_keypoints, draw_matches, load_image};
use orbfind_cli::{LocatorConfig, LocatorBuilder};

const USAGE: &str = "usage: orbfind <query> <scene> [--top N] [--config FILE] [--preset NAME] [--out FILE] [--keypoints PREFIX]";

#[derive(Debug)]
struct Args {
    query: PathBuf,
    scene: PathBuf,
    top: Option<usize>,
    config: Option<PathBuf>,
    preset: Option<String>,
    out: PathBuf,
    keypoints: Option<String>,
}

fn parse_args() -> Result<Args, Box<dyn std::error::Error>> {
    let mut positional = Vec::new();
    let mut top = None;
    let mut config = None;
    let mut preset = None;
    let mut out = PathBuf::from("matches.png");
    let mut keypoints = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut value = || args.next().ok_or_else(|| format!("missing value for {arg}\n{USAGE}"));
        match arg.as_str() {
            "--top" => top = Some(value()?.parse()?),
            "--config" => config = Some(PathBuf::from(value()?)),
            "--preset" => preset = Some(value()?),
            "--out" => out = PathBuf::from(value()?),
            "--keypoints" => keypoints = Some(value()?),
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let [query, scene]: [PathBuf; 2] = positional
        .try_into()
        .map_err(|_| USAGE.to_string())?;
    Ok(Args {
        query,
        scene,
        top,
        config,
        preset,
        out,
        keypoints,
    })
}

fn load_config(args: &Args) -> Result<LocatorConfig, Box<dyn std::error::Error>> {
    let mut cfg = match (&args.config, &args.preset) {
        #[cfg(feature = "serde")]
        (Some(path), _) => LocatorConfig::load(path)?,
        #[cfg(not(feature = "serde"))]
        (Some(_), _) => return Err("config files need the `serde` feature".into()),
        (None, Some(name)) => LocatorConfig::preset(name).ok_or_else(|| format!("unknown preset: {name}"))?,
        (None, None) => LocatorConfig::default(),
    };
    if let Some(top) = args.top {
        cfg.top_n = top;
    }
    Ok(cfg)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_timed();

    let args = parse_args()?;
    let cfg = load_config(&args)?;
    log::debug!("{}", cfg.summary());

    let query = load_image(&args.query)?;
    let scene = load_image(&args.scene)?;
    let locator = LocatorBuilder::from_config(cfg).build()?;

    let t0 = Instant::now();
    let found = locator.locate(&query, &scene)?;
    let elapsed = t0.elapsed();

    println!("Number of features in first image: {}", found.query.len());
    println!("Number of features in second image: {}", found.scene.len());
    println!("\nTotal matched features: {}", found.total_matches);
    println!("\nDisplaying top {} matches.", found.matches.len());
    println!("Time taken: {:.2?}", elapsed);

    if let Some(prefix) = &args.keypoints {
        draw_keypoints(&query, found.query.keypoints()).save(format!("{prefix}_query.png"))?;
        draw_keypoints(&scene, found.scene.keypoints()).save(format!("{prefix}_scene.png"))?;
        println!("Saved keypoint images as {prefix}_query.png and {prefix}_scene.png");
    }

    draw_matches(&query, &scene, &found).save(&args.out)?;
    println!("Saved match image as {}", args.out.display());
    Ok(())
}
