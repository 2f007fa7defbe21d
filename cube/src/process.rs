//! Line-parallel cube processing.
//!
//! Every `(band, line)` row of the input is handed to a processor together
//! with the matching output row. Rows are independent and land in disjoint
//! output regions, so they are distributed over the rayon thread pool with
//! no synchronization beyond whatever the processor itself captures.

use crate::image::{Cube, CubeError};
use crate::size::CubeSize;
use ndarray::{Array3, ArrayView1, ArrayViewMut1, Axis};
use rayon::prelude::*;

/// Position of a row inside the cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineIndex {
    /// 0-based band index
    pub band: usize,
    /// 1-based line number
    pub line: usize,
}

impl LineIndex {
    /// 1-based sample number for the `i`-th element of the row
    #[inline]
    pub fn sample(&self, i: usize) -> usize {
        i + 1
    }
}

/// Run `processor` over every row of `input`, writing into `output`.
///
/// Returns one processor result per row, ordered band-major then by line.
///
/// # Errors
/// `CubeError::DimensionMismatch` when `output` is not shaped like `input`.
pub fn process_by_line<R, F>(
    input: &Cube,
    output: &mut Array3<f64>,
    processor: F,
) -> Result<Vec<R>, CubeError>
where
    R: Send,
    F: Fn(LineIndex, ArrayView1<'_, f64>, ArrayViewMut1<'_, f64>) -> R + Send + Sync,
{
    let expected = input.size();
    let found = CubeSize::from_shape(output.dim());
    if expected != found {
        return Err(CubeError::DimensionMismatch { expected, found });
    }

    let mut results = Vec::with_capacity(expected.bands * expected.lines);
    for (band, (mut out_band, in_band)) in output
        .axis_iter_mut(Axis(0))
        .zip(input.data.axis_iter(Axis(0)))
        .enumerate()
    {
        let band_results: Vec<R> = out_band
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .zip(in_band.axis_iter(Axis(0)))
            .enumerate()
            .map(|(line_idx, (out_row, in_row))| {
                let index = LineIndex {
                    band,
                    line: line_idx + 1,
                };
                processor(index, in_row, out_row)
            })
            .collect();
        results.extend(band_results);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_map_to_matching_output() {
        let size = CubeSize::new(4, 3, 2);
        let mut input = Cube::new(size);
        for ((b, l, s), v) in input.data.indexed_iter_mut() {
            *v = (b * 100 + l * 10 + s) as f64;
        }
        let mut output = size.zeros();

        let rows = process_by_line(&input, &mut output, |index, inp, mut out| {
            for (o, i) in out.iter_mut().zip(inp.iter()) {
                *o = i * 2.0;
            }
            index
        })
        .unwrap();

        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0], LineIndex { band: 0, line: 1 });
        assert_eq!(rows[5], LineIndex { band: 1, line: 3 });
        assert_eq!(output[[1, 2, 3]], 2.0 * 123.0);
        assert_eq!(output[[0, 1, 0]], 20.0);
    }

    #[test]
    fn test_sample_numbers_are_one_based() {
        let index = LineIndex { band: 0, line: 1 };
        assert_eq!(index.sample(0), 1);
        assert_eq!(index.sample(9), 10);
    }

    #[test]
    fn test_mismatched_output_rejected() {
        let input = Cube::new(CubeSize::new(4, 3, 1));
        let mut output = CubeSize::new(4, 2, 1).zeros();
        let err = process_by_line(&input, &mut output, |_, _, _| ()).unwrap_err();
        assert!(matches!(err, CubeError::DimensionMismatch { .. }));
    }
}
