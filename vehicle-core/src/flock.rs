use alloc::vec::Vec;

#[cfg(feature = "std")]
use rand::Rng;

use crate::agent::{Agent, Edges};
use crate::vector::Vector2;

/// Weights for combining the group behaviors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockConfig {
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    /// Weight of the seek toward the target passed to `tick_with_target`.
    pub seek_weight: f32,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            separation_weight: 1.5,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            seek_weight: 1.0,
        }
    }
}

fn target_force(
    agent: &Agent,
    roster: &[Agent],
    config: &FlockConfig,
    target: Option<Vector2>,
) -> Vector2 {
    let group = agent.flock(roster, config);
    match target {
        Some(target) => group + agent.seek(target) * config.seek_weight,
        None => group,
    }
}

#[cfg(feature = "parallel")]
fn compute_forces<F>(agents: &[Agent], steer: &F) -> Vec<Vector2>
where
    F: Fn(&Agent, &[Agent]) -> Vector2 + Sync,
{
    use rayon::prelude::*;
    agents.par_iter().map(|agent| steer(agent, agents)).collect()
}

#[cfg(not(feature = "parallel"))]
fn compute_forces<F>(agents: &[Agent], steer: &F) -> Vec<Vector2>
where
    F: Fn(&Agent, &[Agent]) -> Vector2 + Sync,
{
    agents.iter().map(|agent| steer(agent, agents)).collect()
}

/// A growable group of agents ticked together.
#[derive(Debug, Clone, Default)]
pub struct Flock {
    agents: Vec<Agent>,
    pub config: FlockConfig,
    pub edges: Edges,
}

impl Flock {
    pub fn new(config: FlockConfig) -> Self {
        Self {
            agents: Vec::new(),
            config,
            edges: Edges::Open,
        }
    }

    /// `count` agents scattered over `width x height`, wrapping at its edges.
    #[cfg(feature = "std")]
    pub fn random<R: Rng + ?Sized>(
        config: FlockConfig,
        count: usize,
        width: f32,
        height: f32,
        max_speed: f32,
        max_force: f32,
        rng: &mut R,
    ) -> Self {
        let agents = (0..count)
            .map(|_| Agent::random(width, height, max_speed, max_force, &mut *rng))
            .collect();

        Self {
            agents,
            config,
            edges: Edges::Wrap {
                width,
                height,
                margin: 0.0,
            },
        }
    }

    pub fn with_edges(mut self, edges: Edges) -> Self {
        self.edges = edges;
        self
    }

    pub fn add_agent(&mut self, agent: Agent) {
        self.agents.push(agent);
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn tick(&mut self) {
        self.tick_with_target(None);
    }

    /// Flocks and, when `target` is set, seeks it with `seek_weight`.
    pub fn tick_with_target(&mut self, target: Option<Vector2>) {
        let config = self.config;
        self.tick_with(|agent, roster| target_force(agent, roster, &config, target));
    }

    /// Runs one tick with `steer` computing each agent's force.
    ///
    /// Every force is computed against the roster as it was when the tick
    /// started; agents move only after all forces are known.
    pub fn tick_with<F>(&mut self, steer: F)
    where
        F: Fn(&Agent, &[Agent]) -> Vector2 + Sync,
    {
        let forces = compute_forces(&self.agents, &steer);
        log::trace!("applying {} steering forces", forces.len());

        let edges = self.edges;
        for (agent, force) in self.agents.iter_mut().zip(forces) {
            agent.apply_force(force);
            agent.update();
            edges.apply(agent);
        }
    }
}

/// A flock of at most `N` agents that never allocates.
#[derive(Debug, Clone)]
pub struct FixedFlock<const N: usize> {
    agents: heapless::Vec<Agent, N>,
    pub config: FlockConfig,
    pub edges: Edges,
}

impl<const N: usize> Default for FixedFlock<N> {
    fn default() -> Self {
        Self::new(FlockConfig::default())
    }
}

impl<const N: usize> FixedFlock<N> {
    pub fn new(config: FlockConfig) -> Self {
        Self {
            agents: heapless::Vec::new(),
            config,
            edges: Edges::Open,
        }
    }

    pub fn with_edges(mut self, edges: Edges) -> Self {
        self.edges = edges;
        self
    }

    /// Hands the agent back when the flock is full.
    pub fn add_agent(&mut self, agent: Agent) -> Result<(), Agent> {
        self.agents.push(agent)
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn tick(&mut self) {
        self.tick_with_target(None);
    }

    pub fn tick_with_target(&mut self, target: Option<Vector2>) {
        let config = self.config;
        self.tick_with(|agent, roster| target_force(agent, roster, &config, target));
    }

    pub fn tick_with<F>(&mut self, steer: F)
    where
        F: Fn(&Agent, &[Agent]) -> Vector2,
    {
        let mut forces = heapless::Vec::<Vector2, N>::new();
        for agent in self.agents.iter() {
            // cannot overflow: one force per agent
            let _ = forces.push(steer(agent, self.agents.as_slice()));
        }

        let edges = self.edges;
        for (agent, force) in self.agents.iter_mut().zip(forces) {
            agent.apply_force(force);
            agent.update();
            edges.apply(agent);
        }
    }
}
