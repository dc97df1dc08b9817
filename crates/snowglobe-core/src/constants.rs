// Shared tuning constants used by the core and the web frontend.

// Tree dimensions used by the globe layout
pub const TREE_HEIGHT: f32 = 420.0;
pub const TREE_WIDTH: f32 = 280.0;

// Procedural point sets
pub const PARTICLE_COUNT: usize = 350;
pub const PARTICLE_HEIGHT_EXPONENT: f32 = 0.8; // biases dust toward the wide base
pub const PARTICLE_SPREAD: f32 = 0.9; // fraction of the cone width a particle may reach
pub const PARTICLE_BRIGHT_RATIO: f32 = 0.2;
pub const PARTICLE_FLASH_RATIO: f32 = 0.4;
pub const PARTICLE_ANIM_OFFSET_MAX_SEC: f32 = 5.0;
pub const SPIRAL_LOOPS: usize = 7;
pub const SPIRAL_STEPS_PER_LOOP: usize = 35;
pub const ORNAMENT_RADIUS_FACTOR: f32 = 1.1; // ornaments hang just outside the cone

// (drop below apex, angle in radians)
pub const ORNAMENT_ANCHORS: [(f32, f32); 15] = [
    (150.0, 0.0),
    (150.0, 2.1),
    (150.0, 4.2),
    (240.0, 1.0),
    (240.0, 3.1),
    (240.0, 5.2),
    (320.0, 0.5),
    (320.0, 2.6),
    (320.0, 4.7),
    (400.0, 1.5),
    (400.0, 3.6),
    (400.0, 5.7),
    (480.0, 0.2),
    (480.0, 2.3),
    (480.0, 4.4),
];

// Projection
pub const FOCAL_DISTANCE: f32 = 1000.0;
pub const DEPTH_FADE_OFFSET: f32 = 200.0;
pub const DEPTH_FADE_SPAN: f32 = 400.0;
pub const PARTICLE_MIN_ALPHA: f32 = 0.1;
pub const BEAD_CULL_Z: f32 = -50.0;
pub const ORNAMENT_MIN_OPACITY: f32 = 0.2;

// Inertia (per-frame units)
pub const TARGET_ANGULAR_VELOCITY: f32 = 0.02;
pub const ACCELERATION_BLEND: f32 = 0.05;
pub const DECELERATION_FACTOR: f32 = 0.98;
pub const VELOCITY_SNAP_EPSILON: f32 = 1e-4;
pub const ANGLE_ADVANCE_EPSILON: f32 = 1e-5;

// Ornament interaction
pub const SHAKE_DURATION_MS: u64 = 500;
pub const SHAKE_MAX_ANGLE_RAD: f32 = 0.35;
pub const SHAKE_WOBBLES: f32 = 3.0;
pub const ORNAMENT_HIT_HALF_EXTENT: f32 = 10.0;

// Snowfall
pub const SNOWFLAKE_COUNT: usize = 150;

// Melody scheduling
pub const MELODY_BPM: f32 = 140.0;
pub const SCHEDULE_AHEAD_SEC: f64 = 0.1;
pub const SCHEDULER_INTERVAL_MS: i32 = 100;
pub const MELODY_START_DELAY_SEC: f64 = 0.1;
pub const NOTE_PEAK_GAIN: f32 = 0.15;
pub const NOTE_SUSTAIN_GAIN: f32 = 0.1;
pub const NOTE_ATTACK_SEC: f64 = 0.05;
pub const NOTE_SUSTAIN_FRACTION: f64 = 0.8;

// Chime
pub const CHIME_PARTIALS_HZ: [f32; 4] = [2000.0, 2600.0, 3200.0, 4100.0];
pub const CHIME_JITTER_HZ: f32 = 25.0;
pub const CHIME_PEAK_GAIN: f32 = 0.1;
pub const CHIME_PEAK_STEP: f32 = 0.015; // each higher partial is quieter
pub const CHIME_ATTACK_SEC: f64 = 0.01;
pub const CHIME_DECAY_MIN_SEC: f64 = 2.5;
pub const CHIME_DECAY_JITTER_SEC: f64 = 1.0;
pub const CHIME_FLOOR_GAIN: f32 = 0.001;
pub const CHIME_STOP_SEC: f64 = 4.0;
