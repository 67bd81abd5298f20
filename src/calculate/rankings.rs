//! TOP-N player rankings.

use crate::models::{PlayerRecord, Rankings};

/// Direction of a ranked list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Rank the eligible players by `key` and keep the first `limit`.
///
/// The sort is stable, so players with equal keys keep their input order.
pub fn rank_by<E, K>(
    players: &[PlayerRecord],
    limit: usize,
    order: SortOrder,
    eligible: E,
    key: K,
) -> Vec<PlayerRecord>
where
    E: Fn(&PlayerRecord) -> bool,
    K: Fn(&PlayerRecord) -> f64,
{
    let mut ranked: Vec<&PlayerRecord> = players.iter().filter(|p| eligible(*p)).collect();
    ranked.sort_by(|a, b| match order {
        SortOrder::Ascending => key(*a).total_cmp(&key(*b)),
        SortOrder::Descending => key(*b).total_cmp(&key(*a)),
    });
    ranked.into_iter().take(limit).cloned().collect()
}

fn anyone(_: &PlayerRecord) -> bool {
    true
}

fn played_a_match(p: &PlayerRecord) -> bool {
    p.matches_played > 0
}

fn played_a_quarter(p: &PlayerRecord) -> bool {
    p.quarters_played > 0
}

/// The six leaderboards.
///
/// Count lists rank every player. Rate lists leave out players whose rate
/// has no denominator: match win rate and turnovers need a match played,
/// quarter win rate needs a quarter played.
pub fn compute_rankings(players: &[PlayerRecord], limit: usize) -> Rankings {
    use SortOrder::*;

    Rankings {
        top_scorers: rank_by(players, limit, Descending, anyone, |p| p.goals as f64),
        top_assisters: rank_by(players, limit, Descending, anyone, |p| p.assists as f64),
        top_mom: rank_by(players, limit, Descending, anyone, |p| p.mom as f64),
        top_match_win_rate: rank_by(players, limit, Descending, played_a_match, |p| {
            p.match_win_rate
        }),
        top_quarter_win_rate: rank_by(players, limit, Descending, played_a_quarter, |p| {
            p.quarter_win_rate
        }),
        fewest_turnovers: rank_by(players, limit, Ascending, played_a_match, |p| {
            p.turnovers_per_match
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Team;

    fn player(id: u32, goals: u32, matches_played: u32, match_win_rate: f64) -> PlayerRecord {
        PlayerRecord {
            id,
            name: format!("P{}", id),
            team: Team::Chungdong,
            matches_played,
            quarters_played: matches_played * 2,
            goals,
            assists: 0,
            mom: 0,
            match_win_rate,
            quarter_win_rate: match_win_rate,
            turnovers: 0,
            turnovers_per_match: 0.0,
            turnovers_per_quarter: 0.0,
            average_rating: 0.0,
            rated_matches: 0,
        }
    }

    fn ids(list: &[PlayerRecord]) -> Vec<u32> {
        list.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_lists_capped_at_limit() {
        let players: Vec<PlayerRecord> = (1..=8).map(|id| player(id, id, 1, 50.0)).collect();
        let rankings = compute_rankings(&players, 5);

        assert_eq!(rankings.top_scorers.len(), 5);
        assert_eq!(ids(&rankings.top_scorers), vec![8, 7, 6, 5, 4]);
        assert!(rankings.top_mom.len() <= 5);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let players = vec![
            player(1, 2, 1, 0.0),
            player(2, 3, 1, 0.0),
            player(3, 2, 1, 0.0),
            player(4, 3, 1, 0.0),
        ];
        let rankings = compute_rankings(&players, 5);
        assert_eq!(ids(&rankings.top_scorers), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_win_rate_list_excludes_non_participants() {
        let players = vec![
            player(1, 0, 0, 0.0),
            player(2, 0, 3, 0.0),
            player(3, 0, 2, 75.0),
        ];
        let rankings = compute_rankings(&players, 5);

        assert_eq!(ids(&rankings.top_match_win_rate), vec![3, 2]);
        assert_eq!(ids(&rankings.top_quarter_win_rate), vec![3, 2]);
        // Count lists still include everyone.
        assert_eq!(rankings.top_scorers.len(), 3);
    }

    #[test]
    fn test_fewest_turnovers_ascending() {
        let mut a = player(1, 0, 2, 0.0);
        a.turnovers_per_match = 2.5;
        let mut b = player(2, 0, 2, 0.0);
        b.turnovers_per_match = 0.5;
        let mut c = player(3, 0, 2, 0.0);
        c.turnovers_per_match = 1.0;
        let idle = player(4, 0, 0, 0.0);

        let rankings = compute_rankings(&[a, b, c, idle], 5);
        let list = &rankings.fewest_turnovers;

        assert_eq!(ids(list), vec![2, 3, 1]);
        assert!(list
            .windows(2)
            .all(|w| w[0].turnovers_per_match <= w[1].turnovers_per_match));
    }

    #[test]
    fn test_descending_lists_sorted() {
        let players: Vec<PlayerRecord> = [30.0, 90.0, 60.0, 10.0, 100.0, 45.0]
            .iter()
            .enumerate()
            .map(|(i, &rate)| player(i as u32 + 1, 0, 1, rate))
            .collect();
        let list = compute_rankings(&players, 5).top_match_win_rate;

        assert_eq!(list.len(), 5);
        assert!(list
            .windows(2)
            .all(|w| w[0].match_win_rate >= w[1].match_win_rate));
        assert_eq!(list[0].id, 5);
    }

    #[test]
    fn test_empty_players() {
        let rankings = compute_rankings(&[], 5);
        assert_eq!(rankings, Rankings::default());
    }

    #[test]
    fn test_rank_by_limit_zero() {
        let players = vec![player(1, 1, 1, 0.0)];
        assert!(rank_by(&players, 0, SortOrder::Descending, anyone, |p| p.goals as f64).is_empty());
    }
}
