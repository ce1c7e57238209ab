pub mod cards;
pub mod equity;
pub mod features;
pub mod node;
pub mod pipeline;
pub mod play;
pub mod ranges;
pub mod retrieve;
pub mod solver;
pub mod store;
pub mod tags;

/// dimensional analysis types
pub type Chips = f32;
pub type BigBlinds = f32;
pub type Equity = f32;
pub type Probability = f32;
pub type Similarity = f32;

/// feature geometry shared with the indexing side.
/// the retriever depends on bit-exact reproduction of this layout,
/// so it is a structural constant rather than configuration.
pub const FEATURE_DIMS: usize = 71;

/// matches below this cosine score are carried as approximations
pub const SIM_APPROX_THRESHOLD: Similarity = 0.9;

/// trait for random generation, mainly (strictly?) for testing
pub trait Arbitrary {
    fn random() -> Self;
}

/// initialize terminal logging for embedders and integration harnesses.
/// the core itself never writes to stdout; it only emits log records.
pub fn init() {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    simplelog::TermLogger::init(
        log::LevelFilter::Debug,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .expect("logger initialized at most once");
}
