//! Win/loss streaks.

use rust_decimal::Decimal;

use super::types::{MaxStreaks, Streak, StreakKind};
use crate::domain::trade::Trade;

/// Streak as of the latest trade.
///
/// Expects trades sorted oldest first and scans from the newest trade
/// backward. Open trades are skipped. A break-even trade ends the run.
pub fn current_streak(trades: &[Trade]) -> Streak {
    let mut pnls = trades.iter().rev().filter_map(|t| t.pnl_percentage);

    let kind = match pnls.next() {
        Some(p) if p > Decimal::ZERO => StreakKind::Win,
        Some(p) if p < Decimal::ZERO => StreakKind::Loss,
        _ => return Streak::default(),
    };

    let same_side = |p: &Decimal| match kind {
        StreakKind::Win => *p > Decimal::ZERO,
        StreakKind::Loss => *p < Decimal::ZERO,
        StreakKind::None => false,
    };
    let length = 1 + pnls.take_while(same_side).count() as u64;

    Streak { kind, length }
}

/// Longest runs of winners and losers, scanning oldest first.
///
/// Only an opposite outcome resets a run; open and break-even trades
/// leave it untouched.
pub fn max_consecutive(trades: &[Trade]) -> MaxStreaks {
    let mut max_wins = 0u64;
    let mut max_losses = 0u64;
    let mut current_wins = 0u64;
    let mut current_losses = 0u64;

    for trade in trades {
        if trade.is_winner() {
            current_wins += 1;
            current_losses = 0;
            max_wins = max_wins.max(current_wins);
        } else if trade.is_loser() {
            current_losses += 1;
            current_wins = 0;
            max_losses = max_losses.max(current_losses);
        }
    }

    MaxStreaks {
        wins: max_wins,
        losses: max_losses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::{Symbol, Timestamp};
    use crate::domain::trade::Position;

    fn trades(pnls: &[Option<i64>]) -> Vec<Trade> {
        pnls.iter()
            .enumerate()
            .map(|(i, pnl)| Trade {
                timestamp: Timestamp::from_unix(1_700_000_000 + i as i64 * 60).unwrap(),
                symbol: Symbol::new("SOL"),
                position: Position::Long,
                entry_price: Decimal::ONE,
                close_price: Decimal::ONE,
                pnl_percentage: pnl.map(Decimal::from),
                cumulative_roi: Decimal::ZERO,
                account_value: Decimal::ONE,
                trailing_stop: None,
            })
            .collect()
    }

    #[test]
    fn current_win_streak_counts_from_newest() {
        let streak = current_streak(&trades(&[Some(-1), Some(2), Some(3), Some(1)]));
        assert_eq!(
            streak,
            Streak {
                kind: StreakKind::Win,
                length: 3
            }
        );
    }

    #[test]
    fn current_loss_streak_skips_open_trades() {
        let streak = current_streak(&trades(&[Some(4), Some(-1), Some(-2), None]));
        assert_eq!(
            streak,
            Streak {
                kind: StreakKind::Loss,
                length: 2
            }
        );
    }

    #[test]
    fn break_even_ends_the_run() {
        let streak = current_streak(&trades(&[Some(1), Some(0), Some(2)]));
        assert_eq!(streak.length, 1);

        let flat = current_streak(&trades(&[Some(1), Some(0)]));
        assert_eq!(flat, Streak::default());
    }

    #[test]
    fn no_trades_no_streak() {
        assert_eq!(current_streak(&[]), Streak::default());
        assert_eq!(max_consecutive(&[]), MaxStreaks::default());
    }

    #[test]
    fn max_streaks_are_historical() {
        // W W W L L W L W W
        let list = trades(&[
            Some(1),
            Some(1),
            Some(1),
            Some(-1),
            Some(-1),
            Some(1),
            Some(-1),
            Some(1),
            Some(1),
        ]);
        assert_eq!(max_consecutive(&list), MaxStreaks { wins: 3, losses: 2 });
        assert_eq!(current_streak(&list).length, 2);
    }

    #[test]
    fn break_even_does_not_reset_max_streak() {
        let list = trades(&[Some(1), Some(0), Some(1), None, Some(1)]);
        assert_eq!(max_consecutive(&list).wins, 3);
    }
}
