use rand::Rng;
use rand::rngs::SmallRng;

use crate::engine::filter::LengthRange;

/// A random run of decimal digits with a length drawn from `range`.
/// Returns `None` when digit strings are switched off.
pub fn digit_string(range: LengthRange, rng: &mut SmallRng) -> Option<String> {
    let (min, max) = range.bounds()?;
    let len = rng.gen_range(min..=max);
    Some(
        (0..len)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect(),
    )
}
