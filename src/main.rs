//! The `eenet` binary: wires `eenet-graph`, `eenet-estimation` and
//! `eenet-io` into a runnable single-chain CLI (§5 — "the `eenet` binary
//! runs exactly one chain per invocation"). Two subcommands: `estimate`
//! runs Algorithm S + Algorithm EE and writes θ/Σ Δz traces; `simulate`
//! draws samples from a fixed θ and writes statistic rows and optional
//! graph snapshots.

use std::process::exit;

use clap::{crate_version, App, Arg, ArgMatches, SubCommand};
use log::{info, warn};

use eenet_estimation::sampler::{Basic, Ifd, Sampler, Tnt};
use eenet_estimation::{run_algorithm_ee, run_algorithm_s, seeded, simulate as run_simulation, SimulationConfig};
use eenet_graph::effects::EffectRegistry;
use eenet_graph::{AttributeStore, Chain, EeError, Result, TwoPathStorage};
use eenet_io::{attributes as attr_io, pajek, trace, Config};

/// The decay parameter used when `structParams`/`attrParams` binds an
/// alternating effect without an explicit `lambda=`, matching the worked
/// example in the spec (S2 uses λ=2).
const DEFAULT_LAMBDA: f64 = 2.0;

fn main() {
    let matches = App::new("eenet")
        .version(crate_version!())
        .about("Equilibrium Expectation estimation and simulation of ERGMs")
        .arg(
            Arg::with_name("two-path-storage")
                .long("two-path-storage")
                .takes_value(true)
                .possible_values(&["dense", "hash"])
                .default_value("hash")
                .help("Backing storage for the two-path caches (§4.2)"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .default_value("0")
                .help("Deterministic RNG seed for this chain (§5, §9)"),
        )
        .arg(
            Arg::with_name("experimental")
                .long("experimental")
                .help("Allow the unverified BipartiteAltK4CyclesA statistic (§9 Open Question)"),
        )
        .subcommand(
            SubCommand::with_name("estimate")
                .about("Run Algorithm S then Algorithm EE and write parameter traces")
                .arg(
                    Arg::with_name("config")
                        .long("config")
                        .takes_value(true)
                        .required(true)
                        .help("Path to the key/value configuration file"),
                ),
        )
        .subcommand(
            SubCommand::with_name("simulate")
                .about("Draw samples from a fixed theta and write statistic traces and graph snapshots")
                .arg(
                    Arg::with_name("config")
                        .long("config")
                        .takes_value(true)
                        .required(true)
                        .help("Path to the key/value configuration file"),
                )
                .arg(
                    Arg::with_name("theta-file")
                        .long("theta-file")
                        .takes_value(true)
                        .required(true)
                        .help("Theta trace file to read the fixed parameter vector from (its last row is used)"),
                ),
        )
        .get_matches();

    env_logger::init_from_env(env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"));

    let outcome = match matches.subcommand() {
        ("estimate", Some(sub)) => run_estimate(&matches, sub),
        ("simulate", Some(sub)) => run_simulate(&matches, sub),
        _ => {
            eprintln!("expected a subcommand: 'estimate' or 'simulate' (see --help)");
            exit(2);
        }
    };

    if let Err(e) = outcome {
        eprintln!("error: {e}");
        exit(1);
    }
}

fn two_path_storage(matches: &ArgMatches<'_>) -> TwoPathStorage {
    match matches.value_of("two-path-storage").unwrap_or("hash") {
        "dense" => TwoPathStorage::Dense,
        _ => TwoPathStorage::Hash,
    }
}

fn load_chain(matches: &ArgMatches<'_>, config: &Config) -> Result<Chain> {
    let shape = config.graph_shape();
    let arclist_file = config
        .arclist_file
        .as_ref()
        .ok_or_else(|| EeError::Config("config is missing 'arclistFile'".to_string()))?;
    let graph = pajek::read_graph(arclist_file, shape)?;

    let mut attributes = AttributeStore::new();
    let n = shape.number_of_nodes as usize;
    if let Some(path) = &config.binattr_file {
        attr_io::read_binary_attributes(path, &mut attributes, n)?;
    }
    if let Some(path) = &config.catattr_file {
        attr_io::read_categorical_attributes(path, &mut attributes, n)?;
    }
    if let Some(path) = &config.contattr_file {
        attr_io::read_continuous_attributes(path, &mut attributes, n)?;
    }
    if let Some(path) = &config.setattr_file {
        attr_io::read_set_attributes(path, &mut attributes, n)?;
    }

    let experimental = matches.is_present("experimental");
    let registry = EffectRegistry::build(&config.effect_specs(), DEFAULT_LAMBDA, experimental, &attributes)?;

    Ok(Chain::new(graph, two_path_storage(matches), attributes, registry))
}

fn build_sampler(chain: &Chain, config: &Config) -> Box<dyn Sampler> {
    let sampler_config = config.sampler_config();
    if config.use_ifd_sampler {
        Box::new(Ifd::new(chain, sampler_config, config.ifd_k, config.aca_ee))
    } else if config.use_tnt_sampler {
        Box::new(Tnt::new(chain, sampler_config))
    } else {
        Box::new(Basic::new(sampler_config))
    }
}

fn effect_names(chain: &Chain) -> Vec<&str> {
    chain.registry().names().collect()
}

fn run_estimate(matches: &ArgMatches<'_>, sub: &ArgMatches<'_>) -> Result<()> {
    let config = Config::from_file(
        sub.value_of("config")
            .expect("clap enforces --config is present"),
    )?;
    let mut chain = load_chain(matches, &config)?;
    let mut sampler = build_sampler(&chain, &config);
    let mut rng = seeded(matches.value_of("seed").unwrap_or("0").parse().unwrap_or(0));
    let estimator_config = config.estimator_config();

    let names: Vec<String> = effect_names(&chain).into_iter().map(str::to_string).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();

    let mut theta_writer = config
        .theta_file_prefix
        .as_ref()
        .map(|prefix| trace::TraceWriter::create(format!("{prefix}.txt"), &name_refs, true))
        .transpose()?;
    let mut dz_writer = config
        .dz_a_file_prefix
        .as_ref()
        .map(|prefix| trace::TraceWriter::create(format!("{prefix}.txt"), &name_refs, true))
        .transpose()?;

    info!("running Algorithm S warm-up for {} outer steps", estimator_config.s_steps);
    let initial_theta = vec![0.0; chain.registry().len()];
    let theta_after_s = run_algorithm_s(&mut chain, sampler.as_mut(), &mut rng, initial_theta, &estimator_config, None)?;

    info!("running Algorithm EE for {} outer steps", estimator_config.ee_steps);
    let mut callback = |record: &eenet_estimation::TraceRecord| -> Result<()> {
        if let Some(w) = theta_writer.as_mut() {
            w.write_row(record.t, &record.theta, Some(record.acceptance_rate))?;
        }
        if let Some(w) = dz_writer.as_mut() {
            w.write_row(record.t, &record.mean_delta_z, Some(record.acceptance_rate))?;
        }
        Ok(())
    };
    let outcome = run_algorithm_ee(
        &mut chain,
        sampler.as_mut(),
        &mut rng,
        theta_after_s,
        &estimator_config,
        Some(&mut callback),
    )?;

    if let Some(w) = theta_writer.as_mut() {
        w.flush()?;
    }
    if let Some(w) = dz_writer.as_mut() {
        w.flush()?;
    }

    if outcome.converged {
        info!("chain converged: theta = {:?}", outcome.theta);
    } else {
        warn!(
            "chain did not converge (t-ratios {:?}); flagged Unconverged, not treated as a failure",
            outcome.t_ratios
        );
    }

    Ok(())
}

fn run_simulate(matches: &ArgMatches<'_>, sub: &ArgMatches<'_>) -> Result<()> {
    let config = Config::from_file(
        sub.value_of("config")
            .expect("clap enforces --config is present"),
    )?;
    let mut chain = load_chain(matches, &config)?;
    let theta = trace::read_last_theta(
        sub.value_of("theta-file").expect("clap enforces --theta-file is present"),
        chain.registry().len(),
    )?;

    let mut sampler = build_sampler(&chain, &config);
    let mut rng = seeded(matches.value_of("seed").unwrap_or("0").parse().unwrap_or(0));

    let names: Vec<String> = effect_names(&chain).into_iter().map(str::to_string).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut stats_writer = config
        .observed_stats_file_prefix
        .as_ref()
        .map(|prefix| trace::TraceWriter::create(format!("{prefix}.txt"), &name_refs, false))
        .transpose()?;

    let sim_config = SimulationConfig {
        burnin: config.burnin,
        interval: config.interval,
        sample_size: config.sample_size,
    };

    info!(
        "simulating {} samples (burnin {}, interval {})",
        sim_config.sample_size, sim_config.burnin, sim_config.interval
    );

    run_simulation(&mut chain, sampler.as_mut(), &theta, &mut rng, &sim_config, |chain, index| {
        if let Some(w) = stats_writer.as_mut() {
            w.write_row(index, chain.statistics(), None)?;
        }
        if let Some(prefix) = &config.sim_net_file_prefix {
            pajek::write_graph(trace::snapshot_path(prefix, index), chain.graph())?;
        }
        Ok(())
    })?;

    if let Some(w) = stats_writer.as_mut() {
        w.flush()?;
    }

    Ok(())
}
