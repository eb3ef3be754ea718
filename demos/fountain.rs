//! Headless particle fountain.
//!
//! Runs a few seconds of simulated frames against a [`RecordingRenderer`] and
//! logs what each frame submitted. Set `RUST_LOG=debug` (or `trace`) to see
//! the library's own logging.
//!
//! ```text
//! cargo run --example fountain
//! ```

use canopy::particles::plugins::{
    AlphaOverLife, ConstantAcceleration, EmissionFade, RandomVelocity, ScaleOverLife, Spin,
};
use canopy::renderer::DrawCommand;
use canopy::settings::{EmitterConfig, SceneSettings};
use canopy::{Color, Material, RecordingRenderer, Scene, Shader, ShapeKind};
use glam::Vec2;

const FRAME_DT: f32 = 1.0 / 60.0;
const FRAMES: usize = 240;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = match std::env::args().nth(1) {
        Some(path) => SceneSettings::from_json_file(path)?,
        None => SceneSettings::default(),
    };
    let mut scene = Scene::with_settings(settings)?;

    let ground = Material::new("ground", Shader::new("flat"));
    let water = Material::new("water", Shader::new("sprite"));

    scene
        .build_node("Ground")
        .shape(
            ShapeKind::Rect {
                width: 320.0,
                height: 16.0,
            },
            ground,
        )
        .with_position(0.0, -8.0)
        .with_tint(Color::new(0.3, 0.6, 0.2))
        .build()?;

    let basin = scene
        .build_node("Basin")
        .with_position(160.0, 0.0)
        .build()?;

    let config = EmitterConfig {
        pool_size: 512,
        emission_rate: 6.0,
        lifetime: 1.5,
        particle_size: [3.0, 3.0],
    };
    let fountain = scene.add_emitter(&config, water, Some(basin))?;
    if let Some(emitter) = scene.emitter_mut(fountain) {
        emitter.add_plugin(RandomVelocity::new(
            Vec2::new(-0.6, 3.0),
            Vec2::new(0.6, 4.0),
            2024,
        ));
        emitter.add_plugin(ConstantAcceleration(Vec2::new(0.0, -0.08)));
        emitter.add_plugin(Spin {
            radians_per_second: 3.0,
        });
        emitter.add_plugin(ScaleOverLife {
            start: 1.0,
            end: 0.4,
        });
        emitter.add_plugin(AlphaOverLife {
            start: 1.0,
            end: 0.0,
        });
        emitter.add_plugin(EmissionFade::new(3.0));
    }

    let mut renderer = RecordingRenderer::new();
    for frame in 0..FRAMES {
        renderer.clear();
        scene.update(FRAME_DT, &mut renderer);

        if frame % 30 == 0 {
            let batched: usize = renderer.batches().map(|(_, members)| members.len()).sum();
            let singles = renderer.drawn_nodes().count();
            let live = scene.emitter(fountain).map_or(0, |e| e.live_count());
            log::info!("frame {frame:>3}: {live:>3} live particles, {batched} batched, {singles} single draws");
        }
    }

    let last_depth = renderer
        .commands()
        .iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::Node { depth, .. } => Some(*depth),
            _ => None,
        })
        .fold(f64::NEG_INFINITY, f64::max);
    println!(
        "Simulated {FRAMES} frames; {} nodes in scene, deepest single at depth {last_depth:.4}",
        scene.graph().len()
    );
    Ok(())
}
