use std::error::Error;
use vpc_subnet_plan::apply_graph;
use vpc_subnet_plan::aws::ShellRunner;
use vpc_subnet_plan::config::{Config, Mode};
use vpc_subnet_plan::graph::build_network_graph;
use vpc_subnet_plan::make_provisioner;
use vpc_subnet_plan::output::{graph_print, plan_print, state_print};
use vpc_subnet_plan::plan_network;
use vpc_subnet_plan::resolve_zones;

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    log4rs::init_file("log4rs.yml", Default::default())?;
    dotenv::dotenv().ok();
    //
    log::info!("#Start main()");

    let config = Config::from_env()?;
    let zones = resolve_zones(&config, &mut ShellRunner)?;
    let plan = plan_network(&config.name_prefix, config.vpc_cidr, &zones)?;
    plan_print(&plan);

    let graph = build_network_graph(&plan)?;
    graph_print(&graph);

    if config.mode == Mode::Apply {
        let mut provisioner = make_provisioner(&config);
        let (summary, state) = apply_graph(&config, &graph, provisioner.as_mut())?;
        log::info!(
            "#End apply: {} created, {} finished, {} unchanged",
            summary.created.len(),
            summary.finished.len(),
            summary.skipped.len()
        );
        state_print(&state);
    }

    Ok(())
}
