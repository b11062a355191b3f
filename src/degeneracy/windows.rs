// Sliding-window NCD and plateau detection

use super::metrics::ncd;

/// Split `data` into half-overlapping windows and score each consecutive pair
///
/// Returns the windows and one NCD per adjacent window pair. Input shorter
/// than two windows is returned as a single window with no scores; empty
/// input yields no windows at all.
///
/// # Example
/// ```
/// use codex_canon::degeneracy::analyze_windows;
///
/// let data: Vec<u8> = (0..100).collect();
/// let (windows, ncds) = analyze_windows(&data, 20);
/// assert_eq!(windows.len(), 9); // step 10: starts 0, 10, ..., 80
/// assert_eq!(ncds.len(), 8);
/// ```
pub fn analyze_windows(data: &[u8], window_size: usize) -> (Vec<&[u8]>, Vec<f64>) {
    if data.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let window_size = window_size.max(1);
    if data.len() < window_size * 2 {
        return (vec![data], Vec::new());
    }

    let step = (window_size / 2).max(1);
    let windows: Vec<&[u8]> = (0..)
        .step_by(step)
        .take_while(|start| start + window_size <= data.len())
        .map(|start| &data[start..start + window_size])
        .collect();

    let ncds = windows.windows(2).map(|pair| ncd(pair[0], pair[1])).collect();

    (windows, ncds)
}

/// Length of the longest run of consecutive scores below `threshold`
pub fn longest_similar_run(ncds: &[f64], threshold: f64) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for &score in ncds {
        if score < threshold {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// True when at least `min_consecutive` consecutive scores fall below `threshold`
pub fn detect_entropy_plateau(ncds: &[f64], threshold: f64, min_consecutive: usize) -> bool {
    longest_similar_run(ncds, threshold) >= min_consecutive.max(1)
}
