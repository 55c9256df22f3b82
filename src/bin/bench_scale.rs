use torus_life::scaling::{self, ScalingConfig, ScalingSample};

fn parse_args() -> ScalingConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = ScalingConfig::default();
    let next_arg = |i: usize, flag: &str| -> usize {
        args.get(i)
            .and_then(|value| value.parse().ok())
            .unwrap_or_else(|| {
                eprintln!("{flag} requires a positive integer");
                std::process::exit(2);
            })
    };
    let mut i = 1;
    while i < args.len() {
        i += 1;
        match args[i - 1].as_str() {
            "--rows" => config.rows = next_arg(i, "--rows"),
            "--columns" => config.columns = next_arg(i, "--columns"),
            "--max-workers" => config.max_workers = next_arg(i, "--max-workers"),
            "--seed" => config.seed = next_arg(i, "--seed") as u64,
            "--threads" => config.thread_count = Some(next_arg(i, "--threads")),
            other => {
                eprintln!(
                    "unknown argument: {other}\nusage: bench_scale [--rows N] [--columns N] [--max-workers N] [--seed N] [--threads N]"
                );
                std::process::exit(2);
            }
        }
        i += 1;
    }
    config
}

fn print_table(title: &str, samples: &[ScalingSample]) {
    println!("{title}");
    println!(
        "{:<8} {:>14} {:>12} {:>10} {:>12}",
        "Workers", "Grid", "Time(ms)", "Speedup", "Population"
    );
    println!("{}", "-".repeat(60));

    let baseline_ms = samples
        .first()
        .map(|s| s.elapsed.as_secs_f64() * 1000.0)
        .unwrap_or(0.0);
    for sample in samples {
        let ms = sample.elapsed.as_secs_f64() * 1000.0;
        let speedup = if ms > 0.0 { baseline_ms / ms } else { 0.0 };
        println!(
            "{:<8} {:>14} {:>12.3} {:>9.2}x {:>12}",
            sample.workers,
            format!("{}x{}", sample.rows, sample.columns),
            ms,
            speedup,
            sample.population
        );
    }
    println!();
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let config = parse_args();

    let result = scaling::strong_scaling(&config).and_then(|strong| {
        print_table("Strong scaling:", &strong);
        scaling::weak_scaling(&config)
    });
    match result {
        Ok(weak) => print_table("Weak scaling:", &weak),
        Err(err) => {
            eprintln!("bench_scale: {err}");
            std::process::exit(1);
        }
    }
}
