use log::debug;
use rand::Rng;

use crate::error::{Error, Result};
use crate::severity::SeveritySampler;

/// Combine per-year claim counts with claim severities into one aggregate
/// loss per year.
///
/// All severities are requested from `draw` in a single batch of
/// `sum(counts)` values, then consumed in contiguous blocks in ascending
/// year order: year `i` takes the next `counts[i]` draws. Years with no
/// claims consume nothing and stay at exactly 0. `draw` is not called at
/// all when no claims occurred.
pub fn aggregate<F>(counts: &[u64], draw: F) -> Result<Vec<f64>>
where
    F: FnOnce(usize) -> Vec<f64>,
{
    let mut losses = vec![0.0; counts.len()];
    let total_claims = counts.iter().map(|&c| c as usize).sum::<usize>();
    if total_claims == 0 {
        debug!("no claims across {} simulated years", counts.len());
        return Ok(losses);
    }

    let severities = draw(total_claims);
    if severities.len() != total_claims {
        return Err(Error::SeverityBatch { expected: total_claims, actual: severities.len() });
    }

    let mut start = 0;
    for (loss, &count) in losses.iter_mut().zip(counts) {
        if count == 0 {
            continue;
        }
        let end = start + count as usize;
        *loss = severities[start..end].iter().sum();
        start = end;
    }
    debug_assert_eq!(start, total_claims);

    debug!(
        "aggregated {total_claims} claims into {} simulated years",
        counts.len()
    );
    Ok(losses)
}

/// [`aggregate`] with severities drawn from `sampler`.
pub fn aggregate_with<R: Rng + ?Sized>(
    counts: &[u64],
    sampler: &SeveritySampler,
    rng: &mut R,
) -> Result<Vec<f64>> {
    aggregate(counts, |n| sampler.sample(n, rng))
}
