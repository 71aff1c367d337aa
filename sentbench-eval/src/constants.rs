//! Evaluation defaults and environment overrides
//!
//! This module centralizes values used throughout the runner so that they can
//! be tuned from the environment without touching configuration files.

use std::env;

/// Default number of untimed calls per provider before measuring
pub const DEFAULT_WARMUP_RUNS: usize = 1;

/// Text used for warm-up calls
pub const WARMUP_TEXT: &str = "Hello World";

/// Environment variable overriding the warm-up run count
pub const ENV_WARMUP_RUNS: &str = "SENTBENCH_WARMUP_RUNS";

/// Environment variable capping the number of corpus records
pub const ENV_CORPUS_LIMIT: &str = "SENTBENCH_CORPUS_LIMIT";

/// Environment variable pointing at a Python interpreter
pub const ENV_PYTHON_PATH: &str = "SENTBENCH_PYTHON_PATH";

/// Environment variable carrying the language code to command providers
pub const ENV_LANG: &str = "SENTBENCH_LANG";

/// Sample paragraph for trying providers side by side
pub const SAMPLE_TEXT: &str = "The black-and-yellow broadbill (Eurylaimus ochromalus) is a species of bird in Eurylaimidae, the typical broadbill family. It is small, with a black head, breastband, and upperparts, a white neckband, yellow streaking on the back and wings, and wine-pink underparts that turn yellow towards the belly. The beak is bright blue, with a green tip to the upper mandible and black edges. The black breastband is incomplete in females. The black-and-yellow broadbill occurs in Brunei, Indonesia, Malaysia, Myanmar, Singapore, and Thailand, in lowland forests up to an elevation of 1,220 m (4,000 ft). It is mainly insectivorous, but also eats molluscs and some fruit. It breeds during the dry season with both sexes helping build a large, untidy nest from moss, fungal mycelia, and leaves. The clutch is usually 2–3 eggs, and sometimes includes a fourth runt egg. They are incubated by both sexes. The species is listed as near-threatened by the IUCN due to a decline in its population caused by habitat loss. (Full article...)";

/// Get the number of warm-up runs from the environment
pub fn warmup_runs_override() -> Option<usize> {
    env::var(ENV_WARMUP_RUNS).ok().and_then(|v| v.trim().parse().ok())
}

/// Get the corpus record limit from the environment
pub fn corpus_limit_override() -> Option<usize> {
    env::var(ENV_CORPUS_LIMIT)
        .ok()
        .and_then(|v| v.trim().parse().ok())
}
