//! Starting points for multi-instance solvers.

use std::fmt::Display;

use crate::error::{Error, Result};
use crate::image::Image;

/// Return `count` independent deep copies of `image`.
///
/// `count` may be any integer type. A count of zero yields an empty vector.
///
/// # Errors
///
/// Returns [`Error::InvalidCount`] if `count` is negative or does not fit
/// in `usize`.
pub fn replicate<C>(image: &Image, count: C) -> Result<Vec<Image>>
where
    C: TryInto<usize> + Display + Copy,
{
    let n: usize = count.try_into().map_err(|_| Error::InvalidCount {
        count: count.to_string(),
    })?;

    Ok(vec![image.clone(); n])
}
