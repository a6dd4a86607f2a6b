mod common;

use std::collections::HashSet;

use anyhow::Result;
use betbook::application::{BetbookService, LedgerError};
use betbook::domain::{BetFilter, BetStatus, BetType, NewBet, Sport};
use common::{new_bet, parse_date, settled_bet, test_service};

#[tokio::test]
async fn test_add_bet_appends_pending_bet_with_unique_id() -> Result<()> {
    let service = BetbookService::in_memory();
    let ledger = service.bets();

    let mut ids = HashSet::new();
    for i in 0..5 {
        let before = ledger.len();
        let bet = ledger
            .add_bet(new_bet(Sport::Soccer, 10.0 + i as f64, 1.9, "2024-04-01"))
            .await?;

        let bets = ledger.bets();
        assert_eq!(bets.len(), before + 1);
        assert_eq!(bets.last().unwrap(), &bet);
        assert_eq!(bet.status, BetStatus::Pending);
        assert!(ids.insert(bet.id.clone()), "id {} reused", bet.id);
    }

    Ok(())
}

#[tokio::test]
async fn test_add_bet_keeps_insertion_order() -> Result<()> {
    let service = BetbookService::in_memory();
    let ledger = service.bets();

    let late = ledger
        .add_bet(new_bet(Sport::Tennis, 10.0, 2.0, "2024-06-01"))
        .await?;
    let early = ledger
        .add_bet(new_bet(Sport::Tennis, 10.0, 2.0, "2024-01-01"))
        .await?;

    let ids: Vec<String> = ledger.bets().into_iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![late.id, early.id]);
    Ok(())
}

#[tokio::test]
async fn test_add_bet_rejects_invalid_input() -> Result<()> {
    let service = BetbookService::in_memory();
    let ledger = service.bets();

    let result = ledger
        .add_bet(new_bet(Sport::Soccer, 0.0, 2.0, "2024-04-01"))
        .await;
    assert!(matches!(result, Err(LedgerError::InvalidAmount(_))));

    let result = ledger
        .add_bet(new_bet(Sport::Soccer, -5.0, 2.0, "2024-04-01"))
        .await;
    assert!(matches!(result, Err(LedgerError::InvalidAmount(_))));

    let result = ledger
        .add_bet(new_bet(Sport::Soccer, 10.0, 1.0, "2024-04-01"))
        .await;
    assert!(matches!(result, Err(LedgerError::InvalidOdd { .. })));

    let result = ledger
        .add_bet(new_bet(Sport::Soccer, 10.0, f64::NAN, "2024-04-01"))
        .await;
    assert!(matches!(result, Err(LedgerError::InvalidOdd { .. })));

    // The minimum odd itself is allowed
    ledger
        .add_bet(new_bet(Sport::Soccer, 10.0, 1.01, "2024-04-01"))
        .await?;

    assert_eq!(ledger.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_won_bet_profit() -> Result<()> {
    let service = BetbookService::in_memory();
    let bet = settled_bet(
        &service,
        new_bet(Sport::Basketball, 100.0, 2.0, "2024-04-01"),
        BetStatus::Won,
    )
    .await?;

    let stats = service.bets().get_stats(None);
    assert_eq!(bet.status, BetStatus::Won);
    assert_eq!(stats.total_winnings, 200.0);
    assert_eq!(stats.profit, 100.0);
    assert_eq!(stats.win_rate, 100.0);
    Ok(())
}

#[tokio::test]
async fn test_lost_bet_profit() -> Result<()> {
    let service = BetbookService::in_memory();
    settled_bet(
        &service,
        new_bet(Sport::Basketball, 100.0, 2.0, "2024-04-01"),
        BetStatus::Lost,
    )
    .await?;

    let stats = service.bets().get_stats(None);
    assert_eq!(stats.total_winnings, 0.0);
    assert_eq!(stats.profit, -100.0);
    assert_eq!(stats.total_lost, 1);
    Ok(())
}

#[tokio::test]
async fn test_update_status_changes_only_status() -> Result<()> {
    let service = BetbookService::in_memory();
    let ledger = service.bets();

    let original = ledger
        .add_bet(
            NewBet::new(
                Sport::Volleyball,
                BetType::Multiple,
                3.4,
                15.0,
                parse_date("2024-04-01"),
            )
            .with_description("three-leg parlay"),
        )
        .await?;

    let updated = ledger.update_bet_status(&original.id, BetStatus::Lost).await?;

    assert_eq!(updated.status, BetStatus::Lost);
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.date, original.date);
    assert_eq!(updated.sport, original.sport);
    assert_eq!(updated.bet_type, original.bet_type);
    assert_eq!(updated.odd, original.odd);
    assert_eq!(updated.amount, original.amount);
    assert_eq!(updated.description, original.description);
    assert_eq!(ledger.get_bet(&original.id), Some(updated));
    Ok(())
}

#[tokio::test]
async fn test_settled_bet_cannot_be_settled_again() -> Result<()> {
    let service = BetbookService::in_memory();
    let bet = settled_bet(
        &service,
        new_bet(Sport::Soccer, 20.0, 1.5, "2024-04-01"),
        BetStatus::Won,
    )
    .await?;

    let result = service
        .bets()
        .update_bet_status(&bet.id, BetStatus::Lost)
        .await;
    assert!(matches!(
        result,
        Err(LedgerError::InvalidStatusTransition {
            from: BetStatus::Won,
            to: BetStatus::Lost,
            ..
        })
    ));

    let pending = service
        .bets()
        .add_bet(new_bet(Sport::Soccer, 20.0, 1.5, "2024-04-01"))
        .await?;
    let result = service
        .bets()
        .update_bet_status(&pending.id, BetStatus::Pending)
        .await;
    assert!(matches!(
        result,
        Err(LedgerError::InvalidStatusTransition { .. })
    ));

    assert_eq!(service.bets().get_bet(&bet.id).unwrap().status, BetStatus::Won);
    Ok(())
}

#[tokio::test]
async fn test_unknown_id_is_reported() -> Result<()> {
    let service = BetbookService::in_memory();
    let ledger = service.bets();
    ledger
        .add_bet(new_bet(Sport::Other, 5.0, 2.0, "2024-04-01"))
        .await?;

    let result = ledger.update_bet_status("missing", BetStatus::Won).await;
    assert!(matches!(result, Err(LedgerError::BetNotFound(id)) if id == "missing"));

    let result = ledger.delete_bet("missing").await;
    assert!(matches!(result, Err(LedgerError::BetNotFound(_))));

    assert_eq!(ledger.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_delete_bet() -> Result<()> {
    let service = BetbookService::in_memory();
    let ledger = service.bets();

    let keep = ledger
        .add_bet(new_bet(Sport::Tennis, 5.0, 2.0, "2024-04-01"))
        .await?;
    let drop = ledger
        .add_bet(new_bet(Sport::Tennis, 7.0, 2.0, "2024-04-02"))
        .await?;

    let removed = ledger.delete_bet(&drop.id).await?;

    assert_eq!(removed, drop);
    assert_eq!(ledger.bets(), vec![keep]);
    Ok(())
}

#[tokio::test]
async fn test_filters() -> Result<()> {
    let service = BetbookService::in_memory();

    settled_bet(
        &service,
        new_bet(Sport::Soccer, 10.0, 2.0, "2024-01-10"),
        BetStatus::Won,
    )
    .await?;
    settled_bet(
        &service,
        new_bet(Sport::Tennis, 10.0, 2.0, "2024-01-15"),
        BetStatus::Lost,
    )
    .await?;
    settled_bet(
        &service,
        new_bet(Sport::Soccer, 10.0, 2.0, "2024-01-20"),
        BetStatus::Pending,
    )
    .await?;
    settled_bet(
        &service,
        new_bet(Sport::Soccer, 10.0, 2.0, "2024-01-25"),
        BetStatus::Lost,
    )
    .await?;

    let ledger = service.bets();
    assert_eq!(ledger.get_bets_by_status(BetStatus::Lost).len(), 2);
    assert_eq!(ledger.get_bets_by_status(BetStatus::Pending).len(), 1);
    assert_eq!(ledger.get_bets_by_sport(Sport::Soccer).len(), 3);
    assert!(ledger.get_bets_by_sport(Sport::Volleyball).is_empty());

    let history = ledger.filter_bets(&BetFilter {
        sport: Some(Sport::Soccer),
        settled_only: true,
        ..Default::default()
    });
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|bet| bet.status != BetStatus::Pending));

    // Queries never mutate
    assert_eq!(ledger.len(), 4);
    Ok(())
}

#[tokio::test]
async fn test_date_range_is_inclusive() -> Result<()> {
    let service = BetbookService::in_memory();
    let ledger = service.bets();

    for date in ["2024-03-01", "2024-03-05", "2024-03-10", "2024-03-11"] {
        ledger
            .add_bet(new_bet(Sport::Soccer, 10.0, 2.0, date))
            .await?;
    }

    let in_range = ledger.get_bets_by_date_range(parse_date("2024-03-01"), parse_date("2024-03-10"));
    let dates: Vec<String> = in_range
        .iter()
        .map(|bet| bet.date.date_naive().to_string())
        .collect();

    assert_eq!(dates, vec!["2024-03-01", "2024-03-05", "2024-03-10"]);

    let single_day =
        ledger.get_bets_by_date_range(parse_date("2024-03-05"), parse_date("2024-03-05"));
    assert_eq!(single_day.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_stats_over_subset() -> Result<()> {
    let service = BetbookService::in_memory();
    settled_bet(
        &service,
        new_bet(Sport::Soccer, 100.0, 2.0, "2024-01-10"),
        BetStatus::Won,
    )
    .await?;
    settled_bet(
        &service,
        new_bet(Sport::Tennis, 50.0, 3.0, "2024-01-11"),
        BetStatus::Lost,
    )
    .await?;

    let ledger = service.bets();
    let tennis = ledger.get_bets_by_sport(Sport::Tennis);
    let subset = ledger.get_stats(Some(tennis.as_slice()));
    assert_eq!(subset.total_bets, 1);
    assert_eq!(subset.profit, -50.0);
    assert_eq!(subset.win_rate, 0.0);

    let full = ledger.get_stats(None);
    assert_eq!(full.total_bets, 2);
    assert_eq!(full.win_rate, 50.0);
    assert_eq!(full.profit, 50.0);

    // Pure: same answer twice
    assert_eq!(ledger.get_stats(None), full);
    Ok(())
}

#[tokio::test]
async fn test_clear_and_reset_zero_the_stats() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let ledger = service.bets();

    for _ in 0..3 {
        settled_bet(
            &service,
            new_bet(Sport::Soccer, 10.0, 2.0, "2024-01-10"),
            BetStatus::Won,
        )
        .await?;
    }

    assert_eq!(ledger.clear_bets().await?, 3);
    let stats = ledger.get_stats(None);
    assert_eq!(stats.total_bets, 0);
    assert_eq!(stats.win_rate, 0.0);
    assert_eq!(stats.profit, 0.0);

    ledger
        .add_bet(new_bet(Sport::Soccer, 10.0, 2.0, "2024-01-10"))
        .await?;
    assert_eq!(ledger.reset_bets().await?, 1);
    assert!(ledger.is_empty());
    assert_eq!(ledger.get_stats(None).win_rate, 0.0);
    Ok(())
}
