//! Sliding-window assembly of sub-window features

use bandpower_core::{config_error, BandpowerResult};
use ndarray::{s, Array2};

use crate::config::ExtractionConfig;

/// Stacks consecutive sub-windows into one output sample
///
/// The sub-window feature matrix is tiled `sub_window_numb` times
/// vertically. Block `b` (0-based) is then shifted left by `b` columns, so
/// output column `j` holds sub-windows `j, j + 1, ..., j + sub_window_numb - 1`.
/// The last `b` columns of block `b` have no successor to shift in and keep
/// the tiled value; the mask always excludes those trailing samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowAssembler {
    sub_window_numb: usize,
}

impl WindowAssembler {
    pub fn new(sub_window_numb: usize) -> BandpowerResult<Self> {
        if sub_window_numb == 0 {
            return Err(config_error!("a window must hold at least one sub-window"));
        }
        Ok(Self { sub_window_numb })
    }

    pub fn from_config(config: &ExtractionConfig) -> BandpowerResult<Self> {
        Self::new(config.sub_window_count())
    }

    pub fn sub_window_numb(&self) -> usize {
        self.sub_window_numb
    }

    /// Trailing columns of the output with at least one stale block
    pub fn stale_columns(&self) -> usize {
        self.sub_window_numb - 1
    }

    /// Assemble `(rows · sub_window_numb) × columns` from `rows × columns`
    pub fn assemble(&self, sub_window_features: &Array2<f64>) -> Array2<f64> {
        let (rows, columns) = sub_window_features.dim();
        let mut windows = Array2::zeros((rows * self.sub_window_numb, columns));

        for b in 0..self.sub_window_numb {
            let mut block = windows.slice_mut(s![b * rows..(b + 1) * rows, ..]);
            block.assign(sub_window_features);

            let shifted = columns.saturating_sub(b);
            if b > 0 && shifted > 0 {
                block
                    .slice_mut(s![.., ..shifted])
                    .assign(&sub_window_features.slice(s![.., b..]));
            }
        }

        windows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_window_layout() {
        let features = array![[0.0, 1.0, 2.0, 3.0, 4.0], [10.0, 11.0, 12.0, 13.0, 14.0]];
        let windows = WindowAssembler::new(3).unwrap().assemble(&features);

        assert_eq!(windows.dim(), (6, 5));
        assert_eq!(
            windows,
            array![
                [0.0, 1.0, 2.0, 3.0, 4.0],
                [10.0, 11.0, 12.0, 13.0, 14.0],
                [1.0, 2.0, 3.0, 4.0, 4.0],
                [11.0, 12.0, 13.0, 14.0, 14.0],
                [2.0, 3.0, 4.0, 3.0, 4.0],
                [12.0, 13.0, 14.0, 13.0, 14.0],
            ]
        );
    }

    #[test]
    fn test_single_sub_window_is_identity() {
        let features = array![[1.0, 2.0], [3.0, 4.0]];
        let windows = WindowAssembler::new(1).unwrap().assemble(&features);
        assert_eq!(windows, features);
    }

    #[test]
    fn test_fewer_columns_than_blocks() {
        let features = array![[5.0, 6.0]];
        let windows = WindowAssembler::new(4).unwrap().assemble(&features);
        assert_eq!(windows, array![[5.0, 6.0], [6.0, 6.0], [5.0, 6.0], [5.0, 6.0]]);
    }

    #[test]
    fn test_from_config() {
        let assembler = WindowAssembler::from_config(&ExtractionConfig::default()).unwrap();
        assert_eq!(assembler.sub_window_numb(), 4);
        assert_eq!(assembler.stale_columns(), 3);
        assert!(WindowAssembler::new(0).is_err());
    }
}
