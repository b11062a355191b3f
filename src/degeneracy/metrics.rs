// Compressed-size primitives: ratio, entropy proxy, NCD

use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

/// Size in bytes of `data` after zlib compression at the default level
///
/// An encoder error is logged and the raw length is returned.
pub fn compress_size(data: &[u8]) -> usize {
    let sink = Vec::with_capacity(data.len() / 2 + 16);
    let mut encoder = ZlibEncoder::new(sink, Compression::default());
    match encoder.write_all(data).and_then(|()| encoder.finish()) {
        Ok(compressed) => compressed.len(),
        Err(e) => {
            tracing::warn!(error = %e, len = data.len(), "zlib compression failed, using raw length");
            data.len()
        }
    }
}

/// One byte per color index
///
/// Canonical indices are 0..6; larger values are truncated to their low byte.
pub fn sequence_to_bytes(sequence: &[usize]) -> Vec<u8> {
    sequence.iter().map(|&i| (i & 0xff) as u8).collect()
}

/// `C(data) / |data|`, or 0.0 for empty input
///
/// Lower means more compressible, i.e. more repetitive. Short inputs can
/// exceed 1.0 because of the zlib header and checksum.
pub fn compression_ratio(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    compress_size(data) as f64 / data.len() as f64
}

/// Information-density proxy: the compression ratio itself
///
/// Higher means more random. This is not Shannon entropy over symbol
/// frequencies and must not be "corrected" to it; the degeneracy thresholds
/// are calibrated against this definition.
pub fn entropy_estimate(data: &[u8]) -> f64 {
    compression_ratio(data)
}

/// Normalized Compression Distance
///
/// `NCD(x, y) = (C(xy) - min(C(x), C(y))) / max(C(x), C(y))`
///
/// Near 0 for near-identical inputs, near 1 for unrelated ones. Compressor
/// overhead can push it slightly outside `[0, 1]`.
pub fn ncd(x: &[u8], y: &[u8]) -> f64 {
    let c_x = compress_size(x);
    let c_y = compress_size(y);

    let mut xy = Vec::with_capacity(x.len() + y.len());
    xy.extend_from_slice(x);
    xy.extend_from_slice(y);
    let c_xy = compress_size(&xy);

    let denominator = c_x.max(c_y);
    if denominator == 0 {
        return 0.0;
    }
    (c_xy as f64 - c_x.min(c_y) as f64) / denominator as f64
}
