use anyhow::{Context, Result};
use rand::{rngs::StdRng, SeedableRng};
use vehicle_core::{Agent, Flock, Point, QuadTree, Vector2};
use vehicle_shared::{AgentSnapshot, Position, RunReport, Scenario};

use crate::scenario;

/// Builds the flock described by `scenario`, seeded from `scenario.seed`.
pub fn spawn(scenario: &Scenario, rng: &mut StdRng) -> Flock {
    let steering = &scenario.steering;
    let params = scenario::steering_params(steering);
    let mut flock =
        Flock::new(scenario::flock_config(&scenario.flock)).with_edges(scenario::edges(scenario));

    for _ in 0..scenario.agent_count {
        let mut agent = Agent::random(
            scenario.width,
            scenario.height,
            steering.max_speed,
            steering.max_force,
            rng,
        )
        .with_params(params);
        if let Some(mass) = steering.mass {
            agent = agent.with_mass(mass);
        }
        flock.add_agent(agent);
    }

    flock
}

/// Runs `scenario` to completion and summarizes the final state.
///
/// Each tick every agent flocks, arrives at the target when one is set and
/// follows the path when one is set.
pub fn run(scenario: &Scenario) -> Result<RunReport> {
    scenario::validate(scenario)?;
    let world = scenario::world(scenario)?;
    let mut index = QuadTree::with_capacity(world, scenario.quadtree_capacity)
        .context("Invalid quadtree capacity")?;

    let mut rng = StdRng::seed_from_u64(scenario.seed);
    let mut flock = spawn(scenario, &mut rng);
    let config = flock.config;
    let path_weight = scenario.flock.path_weight;
    let target = scenario.target.map(scenario::to_vector);
    let path = scenario.path.as_ref().map(scenario::build_path);

    log::info!(
        "Running {} agents for {} ticks (seed {})",
        flock.len(),
        scenario.ticks,
        scenario.seed
    );

    let steer = |agent: &Agent, roster: &[Agent]| {
        let mut force = agent.flock(roster, &config);
        if let Some(target) = target {
            force += agent.arrive(target) * config.seek_weight;
        }
        if let Some(path) = &path {
            force += agent.follow_path(path) * path_weight;
        }
        force
    };

    for tick in 0..scenario.ticks {
        flock.tick_with(&steer);
        if tick % 100 == 0 {
            log::debug!("tick {}: centroid {:?}", tick, centroid(flock.agents()));
        }
    }

    let mut unindexed = 0;
    for agent in flock.agents() {
        if !index.insert(Point::from(agent.position)) {
            unindexed += 1;
        }
    }
    if unindexed > 0 {
        log::warn!("{} agents ended outside the world", unindexed);
    }

    let agents: Vec<AgentSnapshot> = flock.agents().iter().map(snapshot).collect();
    let mean_speed = if agents.is_empty() {
        0.0
    } else {
        agents.iter().map(|a| a.speed).sum::<f32>() / agents.len() as f32
    };
    let center = centroid(flock.agents());

    Ok(RunReport {
        ticks: scenario.ticks,
        seed: scenario.seed,
        centroid: Position::new(center.x, center.y),
        mean_speed,
        quadtree_nodes: index.node_count(),
        quadtree_depth: index.depth(),
        unindexed,
        agents,
    })
}

fn snapshot(agent: &Agent) -> AgentSnapshot {
    AgentSnapshot {
        position: Position::new(agent.position.x, agent.position.y),
        heading: agent.velocity.heading(),
        speed: agent.velocity.magnitude(),
    }
}

fn centroid(agents: &[Agent]) -> Vector2 {
    if agents.is_empty() {
        return Vector2::zero();
    }
    let sum = agents
        .iter()
        .fold(Vector2::zero(), |sum, agent| sum + agent.position);
    sum / agents.len() as f32
}
