use std::time::Instant;

use anyhow::Context;
use serde_json::json;

use matrix_spectra::io::density_out::write_density_file;
use matrix_spectra::model::monte_carlo::{estimate, SpectralDensityConfig};

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(v) => v.trim().parse().map_err(|e| anyhow::anyhow!("invalid {key}={v}: {e}")),
        Err(_) => Ok(default),
    }
}

fn config_from_env() -> anyhow::Result<SpectralDensityConfig> {
    let d = SpectralDensityConfig::default();
    let seed = match std::env::var("SEED") {
        Ok(v) => Some(v.trim().parse().with_context(|| format!("invalid SEED={v}"))?),
        Err(_) => None,
    };
    Ok(SpectralDensityConfig {
        matrix_size: env_or("MATRIX_SIZE", d.matrix_size)?,
        trials: env_or("TRIALS", d.trials)?,
        lower: env_or("DOMAIN_LOWER", d.lower)?,
        upper: env_or("DOMAIN_UPPER", d.upper)?,
        bins: env_or("BINS", d.bins)?,
        diagonal_std_dev: d.diagonal_std_dev,
        off_diagonal_std_dev: d.off_diagonal_std_dev,
        seed,
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cfg = config_from_env()?;
    cfg.check().context("invalid configuration")?;
    let out = std::env::var("OUT").unwrap_or_else(|_| "eigenvalues.dat".to_string());
    tracing::info!(?cfg, %out, "starting spectral density estimate");

    let start = Instant::now();
    let density = estimate(&cfg)?;
    let elapsed = start.elapsed().as_secs_f64();

    let path = write_density_file(&out, &density.points)?;

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "config": cfg,
            "elapsed_s": elapsed,
            "eigenvalues": density.eigenvalues,
            "out_of_domain": density.out_of_domain,
            "output": path,
        }))?
    );
    Ok(())
}
