use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Amount, Bet, Sport};

/// Net result of all bets dated on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitPoint {
    pub date: NaiveDate,
    pub profit: Amount,
    /// Running total up to and including this day
    pub cumulative: Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SportCount {
    pub sport: Sport,
    pub count: usize,
}

/// Group bets by day (ascending) and accumulate their profit.
/// The last cumulative value equals `BetStats::profit` over the same bets.
pub fn profit_over_time(bets: &[Bet]) -> Vec<ProfitPoint> {
    let mut by_day: BTreeMap<NaiveDate, Amount> = BTreeMap::new();
    for bet in bets {
        *by_day.entry(bet.date.date_naive()).or_insert(0.0) += bet.profit();
    }

    let mut cumulative = 0.0;
    by_day
        .into_iter()
        .map(|(date, profit)| {
            cumulative += profit;
            ProfitPoint {
                date,
                profit,
                cumulative,
            }
        })
        .collect()
}

/// Number of bets per sport, in `Sport::ALL` order, skipping empty sports.
pub fn sport_distribution(bets: &[Bet]) -> Vec<SportCount> {
    Sport::ALL
        .iter()
        .map(|&sport| SportCount {
            sport,
            count: bets.iter().filter(|bet| bet.sport == sport).count(),
        })
        .filter(|entry| entry.count > 0)
        .collect()
}

pub fn average_odd(bets: &[Bet]) -> f64 {
    if bets.is_empty() {
        return 0.0;
    }
    bets.iter().map(|bet| bet.odd).sum::<f64>() / bets.len() as f64
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::domain::{BetStats, BetStatus, BetType, NewBet};

    fn at(date: &str) -> DateTime<Utc> {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc()
    }

    fn make_bet(sport: Sport, date: &str, amount: Amount, odd: f64, status: BetStatus) -> Bet {
        let mut bet = Bet::from_new(NewBet::new(sport, BetType::Single, odd, amount, at(date)));
        bet.status = status;
        bet
    }

    #[test]
    fn test_profit_over_time_groups_and_sorts_days() {
        let bets = vec![
            make_bet(Sport::Soccer, "2024-02-02", 10.0, 3.0, BetStatus::Won),
            make_bet(Sport::Soccer, "2024-02-01", 50.0, 2.0, BetStatus::Lost),
            make_bet(Sport::Tennis, "2024-02-02", 20.0, 1.5, BetStatus::Lost),
        ];

        let points = profit_over_time(&bets);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date.to_string(), "2024-02-01");
        assert_eq!(points[0].profit, -50.0);
        assert_eq!(points[1].profit, 0.0);
        assert_eq!(points[1].cumulative, -50.0);
        assert_eq!(points[1].cumulative, BetStats::compute(&bets).profit);
    }

    #[test]
    fn test_sport_distribution_skips_empty_sports() {
        let bets = vec![
            make_bet(Sport::Tennis, "2024-02-01", 10.0, 2.0, BetStatus::Won),
            make_bet(Sport::Soccer, "2024-02-01", 10.0, 2.0, BetStatus::Won),
            make_bet(Sport::Tennis, "2024-02-03", 10.0, 2.0, BetStatus::Lost),
        ];

        let distribution = sport_distribution(&bets);

        assert_eq!(
            distribution,
            vec![
                SportCount {
                    sport: Sport::Soccer,
                    count: 1
                },
                SportCount {
                    sport: Sport::Tennis,
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn test_average_odd() {
        assert_eq!(average_odd(&[]), 0.0);
        let bets = vec![
            make_bet(Sport::Other, "2024-02-01", 10.0, 1.5, BetStatus::Pending),
            make_bet(Sport::Other, "2024-02-01", 10.0, 2.5, BetStatus::Pending),
        ];
        assert_eq!(average_odd(&bets), 2.0);
    }
}
