use crate::domain::model::BaselinePoint;
use crate::utils::error::{RankingError, Result};

/// Returned for ranks above the first breakpoint, where the baseline gives
/// no usable figure.
pub const ABOVE_TOP_TIER: i64 = -1;

/// Piece-wise linear sales curve over the baseline breakpoints.
#[derive(Debug, Clone)]
pub struct SalesEstimator {
    breakpoints: Vec<BaselinePoint>,
}

impl SalesEstimator {
    pub fn new(mut breakpoints: Vec<BaselinePoint>) -> Result<Self> {
        if breakpoints.is_empty() {
            return Err(RankingError::EmptyBaseline);
        }
        breakpoints.sort_by_key(|p| p.rank);
        Ok(Self { breakpoints })
    }

    pub fn max_rank(&self) -> u32 {
        self.breakpoints[self.breakpoints.len() - 1].rank
    }

    /// Estimated sales for `rank`.
    ///
    /// An exact breakpoint always returns its recorded value, including the
    /// first one. Ranks before the first breakpoint give [`ABOVE_TOP_TIER`].
    pub fn estimate(&self, rank: u32) -> Result<i64> {
        let max = self.max_rank();
        if rank < 1 || rank > max {
            return Err(RankingError::RankOutOfRange { rank, max });
        }

        if let Some(point) = self.breakpoints.iter().find(|p| p.rank == rank) {
            return Ok(point.sales);
        }

        if rank <= self.breakpoints[0].rank {
            return Ok(ABOVE_TOP_TIER);
        }

        for pair in self.breakpoints.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if lo.rank < rank && rank < hi.rank {
                return Ok(interpolate(lo, hi, rank));
            }
        }

        Ok(self.breakpoints[self.breakpoints.len() - 1].sales)
    }
}

// v1 + (v2 - v1) * (rank - r1) / (r2 - r1), truncated toward zero as a whole.
fn interpolate(lo: BaselinePoint, hi: BaselinePoint, rank: u32) -> i64 {
    let span = i128::from(hi.rank - lo.rank);
    let offset = i128::from(rank - lo.rank);
    let v1 = i128::from(lo.sales);
    let v2 = i128::from(hi.sales);
    ((v1 * span + (v2 - v1) * offset) / span) as i64
}
