use clap::Parser;
use log::info;

use lqm_rs::builder::ModelBuilder;
use lqm_rs::component::ComponentRegistry;
use lqm_rs::expression::{CmpOp, Event, Sign};
use lqm_rs::fixed::reduce_fixed;
use lqm_rs::mdd::MddConfig;
use lqm_rs::model::LogicalModel;
use lqm_rs::reducer::ModelReducer;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Components to eliminate (indices in the original model).
    #[arg(long, value_name = "INT")]
    remove: Vec<usize>,

    /// Remove outputs and pseudo-outputs.
    #[arg(long)]
    outputs: bool,

    /// Propagate fixed components.
    #[arg(long)]
    fixed: bool,

    /// Move fixed components out of the core.
    #[arg(long, requires = "fixed")]
    purge: bool,

    /// Print the functions as a DOT graph.
    #[arg(long)]
    dot: bool,

    /// Unique table size (in bits).
    #[arg(long, value_name = "INT", default_value = "10")]
    size: usize,
}

/// A small signalling cascade with a multivalued kinase.
fn build_model(config: MddConfig) -> color_eyre::Result<LogicalModel> {
    let mut registry = ComponentRegistry::new();
    for id in ["Signal", "Receptor", "Kinase", "Phosphatase", "Target", "Reporter"] {
        registry.register(id);
    }
    registry.set_max_value("Kinase", 2)?;

    let mut builder = ModelBuilder::with_config(registry, config);
    builder.add_rule("Signal", None, [Event::Constant(1)])?;
    builder.add_rule("Receptor", Some(Sign::Positive), [Event::ident("Signal")])?;
    builder.add_rule("Receptor", Some(Sign::Negative), [Event::ident("Target")])?;
    builder.add_rule("Kinase", None, [Event::ident("Receptor")])?;
    builder.add_rule(
        "Phosphatase",
        None,
        [Event::compare("Kinase", CmpOp::Eq, 2), Event::ident("Target"), Event::Not, Event::And],
    )?;
    builder.add_rule(
        "Target",
        None,
        [Event::compare("Kinase", CmpOp::Ge, 1), Event::ident("Phosphatase"), Event::Not, Event::And],
    )?;
    builder.add_rule("Reporter", None, [Event::ident("Target")])?;
    Ok(builder.build()?)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Cli::parse();
    println!("args = {:?}", args);

    let model = build_model(MddConfig::default().with_storage_bits(args.size))?;
    println!("mdd = {:?}", model.manager());
    println!("Original model:\n{}", model);

    let mut model = model;
    if !args.remove.is_empty() || args.outputs {
        let mut reducer = ModelReducer::new(&model);
        for &index in &args.remove {
            info!("Removing component {}", index);
            reducer.remove(index)?;
        }
        if args.outputs {
            let count = reducer.remove_pseudo_outputs()?;
            info!("Removed {} pseudo-outputs", count);
        }
        model = reducer.model()?;
    }
    if args.fixed {
        model = reduce_fixed(&model, args.purge)?;
    }

    println!("Reduced model:\n{}", model);
    let extra: Vec<&str> = model.extra_components().iter().map(|c| c.id.as_str()).collect();
    println!("Extra components: {:?}", extra);

    if args.dot {
        println!("{}", model.manager().to_dot(model.functions())?);
    }

    println!(
        "Cache: {} hits, {} misses",
        model.manager().cache_hits(),
        model.manager().cache_misses()
    );
    Ok(())
}
