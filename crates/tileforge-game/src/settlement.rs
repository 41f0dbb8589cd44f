//! Round settlement: turning penalties into a zero-sum budget transfer.
//!
//! Every pair of players settles their penalty difference directly: the one
//! with the lower penalty collects the difference from the other. Summed
//! over all opponents, a player's change is `Σ_other (p_other − p_self)`,
//! which collapses to `total − n · p_self`. The changes always sum to zero.

/// Budget change for each player, in the order of `penalties`.
pub fn budget_deltas(penalties: &[i64]) -> Vec<i64> {
    let total: i64 = penalties.iter().sum();
    let n = penalties.len() as i64;
    penalties.iter().map(|penalty| total - n * penalty).collect()
}
