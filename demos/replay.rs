use std::{env, error::Error};

use gridreplay::{viz, Driver, ReplayConfig, Scenario, ThreadPacer};
use log::{debug, info};

/// Usage: `replay [config.json] [scenario.json]`
fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);

    let mut config = match args.next() {
        Some(path) => ReplayConfig::load(path)?,
        None => ReplayConfig::default(),
    };
    if let Some(path) = args.next() {
        config = config.with_scenario(&Scenario::load(path)?);
    }

    let grid = config.grid();
    let driver = Driver::new(&config, ThreadPacer);
    let (handle, tx) = viz::init(grid.clone(), config.max_steps, driver.stop_handle());

    // the logger is installed by viz::init, so load afterwards to see the outcome in the Logs tab
    let table = config.policy(&grid);
    let mut agent = config.agent();
    debug!("initial layout:\n{}", grid.render_ascii(Some(agent.position())));

    let mut driver = driver.with_observer(move |frame| {
        let _ = tx.send(frame);
    });
    let status = driver.run(&mut agent, &grid, &table);
    info!("final status: {status:?}; press q to exit");

    match handle.join() {
        Ok(result) => result?,
        Err(_) => return Err("viz thread panicked".into()),
    }
    Ok(())
}
