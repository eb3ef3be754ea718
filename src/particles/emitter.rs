use glam::Vec2;

use crate::errors::Result;
use crate::particles::particle::{Particle, ParticleMut};
use crate::particles::plugin::{EmitterPlugin, PluginChain, PluginId};
use crate::pool::{IndexedSet, Pool, PoolHandle};
use crate::resources::{Color, Geometry, Material};
use crate::scene::NodeKey;
use crate::scene::graph::SceneGraph;
use crate::scene::node::{Node, NodeKind};
use crate::settings::EmitterConfig;

/// Spawn parameters of an emitter. Plugins may change them at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitterParams {
    /// Spawn attempts per update, rounded up. Zero or negative stops spawning.
    pub emission_rate: f32,
    /// Lifetime in seconds assigned to each new particle.
    pub lifetime: f32,
}

impl From<&EmitterConfig> for EmitterParams {
    fn from(config: &EmitterConfig) -> Self {
        Self {
            emission_rate: config.emission_rate,
            lifetime: config.lifetime,
        }
    }
}

/// Number of pool acquisitions attempted for one update.
#[must_use]
pub fn spawn_attempts(emission_rate: f32) -> usize {
    if emission_rate.is_finite() && emission_rate > 0.0 {
        emission_rate.ceil() as usize
    } else {
        0
    }
}

/// Pooled particle system.
///
/// Owns a scene node of kind [`NodeKind::Emitter`] and a fixed pool of
/// particles, each bound to its own pre-built quad node. Live particles are
/// children of the emitter node, free ones are detached, so the regular
/// scene traversal only ever sees live particles.
///
/// # Update order
///
/// 1. `update_global` on every plugin
/// 2. spawn up to `ceil(emission_rate)` particles (stops early when the pool
///    is exhausted); each is attached, reset and passed to `initialize`
/// 3. advance every live particle: expired ones go back to the pool, the
///    rest integrate `velocity += acceleration; position += velocity` and are
///    passed to `update`
/// 4. `update_end_global` on every plugin
#[derive(Debug)]
pub struct ParticleEmitter {
    node: NodeKey,
    params: EmitterParams,
    pool: Pool<Particle>,
    live: IndexedSet<PoolHandle>,
    plugins: PluginChain,
    material: Material,
    particle_anchor: Vec2,
}

impl ParticleEmitter {
    /// Builds the emitter node and every particle node in `graph`.
    ///
    /// The emitter node is left detached; attach it where it should render.
    pub fn new(graph: &mut SceneGraph, config: &EmitterConfig, material: Material) -> Result<Self> {
        config.validate()?;

        let node = graph.insert(Node::with_kind(
            "Emitter",
            NodeKind::Emitter,
            Geometry::new(),
            None,
        ));

        let [width, height] = config.particle_size;
        let particle_anchor = Vec2::new(width, height) * 0.5;
        let pool = Pool::new(config.pool_size, |_| {
            let mut particle_node = Node::with_kind(
                "Particle",
                NodeKind::Particle,
                Geometry::quad(width, height),
                Some(material.clone()),
            );
            particle_node.transform.anchor = particle_anchor;
            Particle::new(graph.insert(particle_node))
        });

        log::debug!(
            "Created emitter {node:?} with {} pooled particles (rate {}, lifetime {})",
            config.pool_size,
            config.emission_rate,
            config.lifetime
        );

        Ok(Self {
            node,
            params: EmitterParams::from(config),
            pool,
            live: IndexedSet::with_capacity(config.pool_size),
            plugins: PluginChain::new(),
            material,
            particle_anchor,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn node(&self) -> NodeKey {
        self.node
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> &EmitterParams {
        &self.params
    }

    #[inline]
    pub fn params_mut(&mut self) -> &mut EmitterParams {
        &mut self.params
    }

    #[inline]
    #[must_use]
    pub fn material(&self) -> &Material {
        &self.material
    }

    #[inline]
    #[must_use]
    pub fn pool(&self) -> &Pool<Particle> {
        &self.pool
    }

    #[inline]
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Live particles in live-set order.
    pub fn live_particles(&self) -> impl Iterator<Item = &Particle> {
        self.live.iter().filter_map(|&handle| self.pool.get_ref(handle))
    }

    #[inline]
    #[must_use]
    pub fn plugins(&self) -> &PluginChain {
        &self.plugins
    }

    // ========================================================================
    // Plugins
    // ========================================================================

    pub fn add_plugin(&mut self, plugin: impl EmitterPlugin + 'static) -> PluginId {
        self.plugins.push(Box::new(plugin))
    }

    pub fn remove_plugin(&mut self, id: PluginId) -> bool {
        self.plugins.remove(id)
    }

    // ========================================================================
    // Simulation
    // ========================================================================

    /// Advances the system by `dt` seconds.
    pub fn update(&mut self, dt: f32, graph: &mut SceneGraph) {
        self.plugins
            .run(&mut self.params, self.node, |plugin, ctx| plugin.update_global(ctx, dt));

        self.spawn(graph);
        self.simulate(dt, graph);

        self.plugins.run(&mut self.params, self.node, |plugin, ctx| {
            plugin.update_end_global(ctx, dt);
        });
    }

    fn spawn(&mut self, graph: &mut SceneGraph) {
        for _ in 0..spawn_attempts(self.params.emission_rate) {
            let Some(handle) = self.pool.get() else {
                log::debug!(
                    "Particle pool exhausted ({} in use), skipping remaining spawns",
                    self.pool.in_use()
                );
                break;
            };
            let Some(particle) = self.pool.get_mut(handle) else {
                continue;
            };
            let key = particle.node();
            if let Err(err) = graph.add_child(self.node, key) {
                // The slot goes back on top of the free stack; retrying would
                // hand out the same dead node.
                log::error!("Failed to attach particle node: {err}");
                self.pool.put(handle);
                break;
            }
            let Some(node) = graph.get_mut(key) else {
                continue;
            };

            particle.respawn(self.params.lifetime);
            node.transform.reset();
            node.transform.anchor = self.particle_anchor;
            node.visible = true;
            node.alpha = 1.0;
            node.tint = Color::WHITE;

            let mut view = ParticleMut { particle, node };
            self.plugins.run(&mut self.params, self.node, |plugin, ctx| {
                plugin.initialize(ctx, &mut view);
            });
            self.live.add(handle);
        }
    }

    fn simulate(&mut self, dt: f32, graph: &mut SceneGraph) {
        // Backwards so swap-removal only moves already-visited handles.
        for index in (0..self.live.len()).rev() {
            let handle = self.live.as_slice()[index];
            let Some(particle) = self.pool.get_mut(handle) else {
                self.live.remove(handle);
                continue;
            };

            particle.elapsed_time += dt;
            if particle.elapsed_time >= particle.lifetime {
                self.live.remove(handle);
                self.release(handle, graph);
                continue;
            }

            particle.velocity += particle.acceleration;
            let Some(node) = graph.get_mut(particle.node()) else {
                continue;
            };
            node.transform.position += particle.velocity;

            let mut view = ParticleMut { particle, node };
            self.plugins.run(&mut self.params, self.node, |plugin, ctx| {
                plugin.update(ctx, &mut view, dt);
            });
        }
    }

    fn release(&mut self, handle: PoolHandle, graph: &mut SceneGraph) {
        if let Some(particle) = self.pool.put(handle) {
            particle.is_alive = false;
            graph.detach(particle.node());
        }
    }

    /// Returns every live particle to the pool.
    pub fn clear(&mut self, graph: &mut SceneGraph) {
        while let Some(&handle) = self.live.as_slice().last() {
            self.live.remove(handle);
            self.release(handle, graph);
        }
    }

    /// Removes the emitter node and every pooled particle node from `graph`.
    pub fn destroy(mut self, graph: &mut SceneGraph) {
        self.clear(graph);
        graph.destroy(self.node);
        for particle in self.pool.iter_all() {
            graph.destroy(particle.node());
        }
    }
}
