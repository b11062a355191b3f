// Compression-Based Degeneracy Detection
//
// A sequence can pass every adjacency check and still carry almost no
// information: a single color bouncing forever, or the full cycle repeated
// verbatim. This module flags such sequences using a general-purpose
// compressor (zlib/DEFLATE) as an information-content proxy.
//
// Signals, evaluated in priority order:
// 1. Global compression ratio  C(bytes) / |bytes|        (low = repetitive)
// 2. Entropy estimate          same ratio, read as density (low = poor)
// 3. Entropy plateau           run of near-identical overlapping windows,
//                              measured by Normalized Compression Distance
//
// Foundation:
// Li, M., Chen, X., Li, X., Ma, B., & Vitanyi, P. (2004). The similarity
// metric. IEEE Transactions on Information Theory, 50(12).
//
// All figures are heuristics. The entropy estimate is deliberately the raw
// compression ratio, not symbol-frequency Shannon entropy; thresholds are
// calibrated against that definition.

mod config;
mod metrics;
mod verdict;
mod windows;

pub use config::{ConfigError, DegeneracyConfig};
pub use metrics::{compress_size, compression_ratio, entropy_estimate, ncd, sequence_to_bytes};
pub use verdict::{detect_degeneracy, DegeneracyMetrics, DegeneracyTrigger};
pub use windows::{analyze_windows, detect_entropy_plateau, longest_similar_run};
