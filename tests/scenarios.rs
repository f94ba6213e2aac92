//! End-to-end runs of the effects through the driver, on the software
//! surface, with a hand-cranked frame scheduler.

// Integration tests link every dependency of the library; most are wasm-only.
#![allow(unused_crate_dependencies)]

use portfolio_fx::components::particle_fx::{
	AnimationDriver, Bounds, DriverState, Effect, EffectsConfig, FrameScheduler, PixelSurface, Preset,
	StaticEnvironment, trail_capacity,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Counts requests and cancellations; frames only happen when a test calls
/// `on_frame`.
#[derive(Default)]
struct ManualScheduler {
	requested: u32,
	cancelled: u32,
}

impl FrameScheduler for ManualScheduler {
	type Handle = u32;

	fn request_frame(&mut self) -> Option<u32> {
		self.requested += 1;
		Some(self.requested)
	}

	fn cancel_frame(&mut self, _handle: u32) {
		self.cancelled += 1;
	}
}

type TestDriver = AnimationDriver<PixelSurface, StaticEnvironment, ManualScheduler>;

fn effect(preset: Preset, config: &EffectsConfig) -> Box<dyn Effect> {
	preset.build_with_rng(config, StdRng::seed_from_u64(42))
}

fn mounted(preset: Preset, config: &EffectsConfig, env: StaticEnvironment) -> TestDriver {
	let mut driver = AnimationDriver::new(effect(preset, config), env, ManualScheduler::default());
	driver.mount(Ok(PixelSurface::new(1, 1)), 0.0);
	driver
}

fn twinkle_config(count: usize) -> EffectsConfig {
	let mut config = EffectsConfig::default();
	config.twinkle.count = count;
	config
}

#[test]
fn twinkle_stays_in_bounds_for_a_thousand_steps() {
	let bounds = Bounds::new(800.0, 600.0);
	let mut fx = effect(Preset::IconTwinkle, &twinkle_config(40));
	fx.populate(bounds, 0.0);
	assert_eq!(fx.particles().len(), 40);

	for i in 0..1000 {
		fx.step(i as f64 * 16.0);
		assert_eq!(fx.particles().len(), 40);
		for p in fx.particles() {
			assert!(bounds.contains(p.x, p.y), "step {i}: ({}, {}) escaped", p.x, p.y);
		}
	}
}

#[test]
fn starfield_stays_in_bounds() {
	let bounds = Bounds::new(320.0, 200.0);
	let mut fx = effect(Preset::Starfield, &EffectsConfig::default());
	fx.populate(bounds, 0.0);
	for i in 0..500 {
		fx.step(i as f64 * 33.0);
	}
	assert!(fx.particles().iter().all(|p| bounds.contains(p.x, p.y)));
}

#[test]
fn opacity_never_leaves_its_range() {
	let config = EffectsConfig::default();
	let range = config.twinkle.opacity;
	let mut fx = effect(Preset::IconTwinkle, &config);
	fx.populate(Bounds::new(400.0, 300.0), 0.0);
	for i in 0..2000 {
		fx.step(i as f64 * 16.0);
		for p in fx.particles() {
			assert!(range.contains(p.opacity), "opacity {} at step {i}", p.opacity);
		}
	}
}

#[test]
fn sparkle_lives_exactly_its_ttl() {
	let config = EffectsConfig::default();
	assert_eq!(config.sparkles.ttl_ms, 750.0);
	let mut fx = effect(Preset::SparkleTrail, &config);
	fx.populate(Bounds::new(600.0, 120.0), 0.0);

	fx.step(0.0);
	assert_eq!(fx.particles().len(), 1);
	let born_at_zero = |fx: &dyn Effect| fx.particles().iter().any(|p| p.created_at == 0.0);

	fx.step(749.0);
	assert!(born_at_zero(fx.as_ref()));
	fx.step(751.0);
	assert!(!born_at_zero(fx.as_ref()));
}

#[test]
fn trail_never_exceeds_capacity() {
	let config = EffectsConfig::default();
	let cap = trail_capacity(config.sparkles.ttl_ms, config.sparkles.spawn_interval_ms);
	assert_eq!(cap, 4);

	let mut fx = effect(Preset::SparkleTrail, &config);
	fx.populate(Bounds::new(600.0, 120.0), 0.0);
	let mut t = 0.0;
	while t < 20_000.0 {
		fx.step(t);
		assert!(fx.particles().len() <= cap, "{} live at {t}", fx.particles().len());
		t += 7.0;
	}
}

#[test]
fn trail_after_one_second_has_a_few_sparkles() {
	let mut fx = effect(Preset::SparkleTrail, &EffectsConfig::default());
	fx.populate(Bounds::new(600.0, 120.0), 0.0);
	let mut t = 0.0;
	while t < 1000.0 {
		fx.step(t);
		t += 16.0;
	}
	fx.step(1000.0);
	let live = fx.particles().len();
	assert!((2..=4).contains(&live), "{live} live sparkles");
}

#[test]
fn rendering_twice_without_stepping_is_idempotent() {
	for preset in [Preset::IconTwinkle, Preset::SparkleTrail] {
		let mut fx = effect(preset, &EffectsConfig::default());
		fx.populate(Bounds::new(160.0, 120.0), 0.0);
		fx.step(0.0);
		fx.step(300.0);

		let mut surface = PixelSurface::new(160, 120);
		fx.render(&mut surface);
		let first = surface.pixels().to_vec();
		fx.render(&mut surface);
		assert_eq!(surface.pixels(), first.as_slice(), "{preset:?}");
		assert_eq!(surface.save_depth(), 0);
		if preset == Preset::IconTwinkle {
			assert!(!surface.is_blank());
		}
	}
}

#[test]
fn dispose_is_terminal() {
	let mut driver = mounted(
		Preset::IconTwinkle,
		&EffectsConfig::default(),
		StaticEnvironment::new(200.0, 100.0),
	);
	driver.on_frame(16.0);
	let frames = driver.frames_rendered();
	driver.dispose();
	assert_eq!(driver.state(), DriverState::Disposed);
	assert!(!driver.has_pending_frame());
	assert_eq!(driver.scheduler().cancelled, 1);
	let requested = driver.scheduler().requested;

	driver.environment_mut().size = Bounds::new(640.0, 480.0);
	driver.resize(40.0);
	driver.environment_mut().visible = false;
	driver.sync_environment();
	driver.environment_mut().visible = true;
	driver.sync_environment();
	assert!(!driver.on_frame(50.0));
	driver.mount(Ok(PixelSurface::new(1, 1)), 60.0);

	assert_eq!(driver.state(), DriverState::Disposed);
	assert_eq!(driver.frames_rendered(), frames);
	assert_eq!(driver.scheduler().requested, requested);
	assert!(driver.effect().particles().is_empty());
	assert!(driver.surface().is_none());
}

#[test]
fn disabled_effect_never_touches_pixels() {
	let mut config = EffectsConfig::default();
	config.starfield.motion.disabled = true;
	let mut driver = mounted(Preset::Starfield, &config, StaticEnvironment::new(64.0, 48.0));
	assert_eq!(driver.state(), DriverState::Paused);
	assert!(!driver.has_pending_frame());

	for i in 1..=60 {
		assert!(!driver.on_frame(i as f64 * 16.0));
	}
	driver.sync_environment();
	let surface = driver.surface().unwrap();
	assert!(surface.is_blank());
	assert_eq!(surface.draw_calls(), 0);
	assert_eq!(driver.frames_rendered(), 0);
}

#[test]
fn global_switch_pauses_and_resumes() {
	let mut driver = mounted(
		Preset::Starfield,
		&EffectsConfig::default(),
		StaticEnvironment::new(64.0, 48.0),
	);
	assert!(driver.on_frame(0.0));

	driver.environment_mut().disabled = true;
	driver.sync_environment();
	assert_eq!(driver.state(), DriverState::Paused);
	let draws = driver.surface().unwrap().draw_calls();
	assert!(!driver.on_frame(100.0));
	assert_eq!(driver.surface().unwrap().draw_calls(), draws);

	driver.environment_mut().disabled = false;
	driver.sync_environment();
	assert_eq!(driver.state(), DriverState::Running);
	assert!(driver.on_frame(200.0));
}

#[test]
fn reduced_motion_keeps_the_loop_idle() {
	let mut env = StaticEnvironment::new(64.0, 48.0);
	env.reduced_motion = true;
	let driver = mounted(Preset::SparkleTrail, &EffectsConfig::default(), env);
	assert_eq!(driver.state(), DriverState::Paused);
	assert_eq!(driver.scheduler().requested, 0);
}

#[test]
fn zero_size_mount_populates_on_first_real_resize() {
	let mut driver = mounted(
		Preset::IconTwinkle,
		&twinkle_config(40),
		StaticEnvironment::new(0.0, 0.0),
	);
	assert_eq!(driver.state(), DriverState::Running);
	assert!(driver.effect().particles().is_empty());

	driver.environment_mut().size = Bounds::new(300.0, 200.0);
	driver.resize(10.0);
	assert_eq!(driver.effect().particles().len(), 40);
	assert_eq!(driver.surface().unwrap().width(), 300);

	// Later resizes fold glyphs into the new bounds instead of respawning.
	let before: Vec<f64> = driver.effect().particles().iter().map(|p| p.size).collect();
	driver.environment_mut().size = Bounds::new(100.0, 50.0);
	driver.resize(20.0);
	let after: Vec<f64> = driver.effect().particles().iter().map(|p| p.size).collect();
	assert_eq!(before, after);
	let small = Bounds::new(100.0, 50.0);
	assert!(driver.effect().particles().iter().all(|p| small.contains(p.x, p.y)));
}

#[test]
fn starfield_regenerates_on_resize() {
	let mut driver = mounted(
		Preset::Starfield,
		&EffectsConfig::default(),
		StaticEnvironment::new(800.0, 600.0),
	);
	let count = driver.effect().particles().len();
	assert_eq!(count, 350 + 80);

	driver.environment_mut().size = Bounds::new(200.0, 100.0);
	driver.resize(16.0);
	let small = Bounds::new(200.0, 100.0);
	assert_eq!(driver.effect().particles().len(), count);
	assert!(driver.effect().particles().iter().all(|p| small.contains(p.x, p.y)));
}

#[test]
fn config_from_json_drives_the_effect() {
	let config = EffectsConfig::from_json(
		r##"{ "twinkle": { "count": 12, "color": "#ff0000" }, "sparkles": { "motion": { "low_performance": true } } }"##,
	)
	.unwrap();
	let mut fx = effect(Preset::IconTwinkle, &config);
	fx.populate(Bounds::new(100.0, 100.0), 0.0);
	assert_eq!(fx.particles().len(), 12);
	assert!(fx.particles().iter().all(|p| (p.color.r, p.color.g, p.color.b) == (255, 0, 0)));
}
