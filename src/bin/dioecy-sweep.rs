use anyhow::{Context, Result};
use clap::Parser;

use dioecy_sweep::cli::{log_settings, Args};
use dioecy_sweep::export;
use dioecy_sweep::{single_run, sweep};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    let config = args.config();
    log_settings(&config, args.onerun);

    if args.onerun {
        println!("{}", single_run(&config));
        return Ok(());
    }

    let result = sweep(&config)?;
    let stem = export::output_stem(config.variant, config.regime, &config.params);

    let bmp = args.output_dir.join(format!("{}.bmp", stem));
    export::save_bitmap(&bmp, &result.labels, args.magnify)
        .with_context(|| format!("failed to write {}", bmp.display()))?;
    log::info!("Saved {}", bmp.display());

    if let Some(female) = &result.female {
        let txt = args.output_dir.join(format!("{}.txt", stem));
        export::save_female_tsv(&txt, female)
            .with_context(|| format!("failed to write {}", txt.display()))?;
        log::info!("Saved {}", txt.display());
    }
    Ok(())
}
