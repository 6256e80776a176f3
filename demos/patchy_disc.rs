use pdmc::{Config, Simulation};

fn main() {
    let config = Config::default();
    let mut simulation = Simulation::new(config).expect("failed to build simulation");
    simulation.run().expect("simulation failed");

    println!("\nComplete!");
}
