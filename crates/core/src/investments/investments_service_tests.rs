#[cfg(test)]
mod tests {
    use crate::assets::{Asset, AssetCategory, AssetService, NewAsset, RiskLevel};
    use crate::errors::Error;
    use crate::fx::{Currency, DisplayContext};
    use crate::investments::investments_traits::InvestmentRepositoryTrait;
    use crate::investments::{
        FixedOutcome, InvestmentError, InvestmentRequest, InvestmentService,
        InvestmentServiceTrait, InvestmentStatus, SettlementReason,
    };
    use crate::testing::{
        InMemoryAssetRepository, InMemoryInvestmentRepository, InMemoryWalletRepository,
    };
    use crate::wallets::{
        PaymentMethod, TransactionType, WalletService, WalletServiceTrait,
    };
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    struct Harness {
        service: InvestmentService,
        wallets: Arc<WalletService>,
        wallet_repository: Arc<InMemoryWalletRepository>,
        investment_repository: Arc<InMemoryInvestmentRepository>,
        asset: Asset,
    }

    fn make_asset() -> Asset {
        let mut asset = NewAsset {
            symbol: "BTC".to_string(),
            name: "Bitcoin".to_string(),
            category: AssetCategory::Crypto,
            current_price: dec!(100),
            min_investment: dec!(10),
            max_investment: dec!(1000),
            return_rates: BTreeMap::from([(1, dec!(0.5)), (3, dec!(1.5))]),
            allowed_durations: vec![1, 3],
            risk_level: RiskLevel::High,
            display_order: 1,
        }
        .into_asset(Utc::now());
        asset.id = "asset-1".to_string();
        asset
    }

    fn harness_with_factor(factor: Decimal) -> Harness {
        let wallet_repository = Arc::new(InMemoryWalletRepository::new());
        let wallets = Arc::new(WalletService::new(wallet_repository.clone()));
        let asset = make_asset();
        let assets = Arc::new(AssetService::new(Arc::new(
            InMemoryAssetRepository::with_assets(vec![asset.clone()]),
        )));
        let investment_repository = Arc::new(InMemoryInvestmentRepository::new());
        let service = InvestmentService::new(
            investment_repository.clone(),
            assets,
            wallets.clone(),
            Arc::new(FixedOutcome(factor)),
        );
        Harness {
            service,
            wallets,
            wallet_repository,
            investment_repository,
            asset,
        }
    }

    fn usd_ctx() -> DisplayContext {
        DisplayContext::new(Currency::base())
    }

    fn kes_ctx() -> DisplayContext {
        DisplayContext::new(Currency {
            code: "KES".to_string(),
            name: "Kenyan Shilling".to_string(),
            symbol: "KSh".to_string(),
            exchange_rate: dec!(160),
            is_active: true,
        })
    }

    fn request(amount: Decimal, duration_hours: u32) -> InvestmentRequest {
        InvestmentRequest {
            user_id: "u1".to_string(),
            asset_id: "asset-1".to_string(),
            amount,
            duration_hours,
        }
    }

    async fn fund(harness: &Harness, amount: Decimal) {
        harness
            .wallets
            .deposit("u1", amount, PaymentMethod::Wallet)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_open_locks_funds_and_records_entry() {
        let harness = harness_with_factor(dec!(1.0));
        fund(&harness, dec!(100)).await;

        let investment = harness
            .service
            .open(request(dec!(50), 3), &usd_ctx())
            .await
            .unwrap();

        assert_eq!(investment.status, InvestmentStatus::Active);
        assert_eq!(investment.invested_amount, dec!(50));
        assert_eq!(investment.entry_price, harness.asset.current_price);
        assert_eq!(investment.expected_return_rate, dec!(1.5));
        assert_eq!(investment.end_time, investment.start_time + Duration::hours(3));

        let wallet = harness.wallets.get_wallet("u1").unwrap().unwrap();
        assert_eq!(wallet.available, dec!(50));
        assert_eq!(wallet.locked, dec!(50));

        let entries = harness.wallet_repository.transactions();
        let investment_entries: Vec<_> = entries
            .iter()
            .filter(|t| t.transaction_type == TransactionType::Investment)
            .collect();
        assert_eq!(investment_entries.len(), 1);
        assert_eq!(investment_entries[0].amount, dec!(-50));
    }

    #[tokio::test]
    async fn test_open_converts_display_amount_to_base() {
        let harness = harness_with_factor(dec!(1.0));
        fund(&harness, dec!(100)).await;

        // 8000 KES at 160 KES/USD is 50 USD.
        let investment = harness
            .service
            .open(request(dec!(8000), 3), &kes_ctx())
            .await
            .unwrap();

        assert_eq!(investment.invested_amount, dec!(50));
        let wallet = harness.wallets.get_wallet("u1").unwrap().unwrap();
        assert_eq!(wallet.locked, dec!(50));
    }

    #[tokio::test]
    async fn test_open_below_minimum_leaves_wallet_untouched() {
        let harness = harness_with_factor(dec!(1.0));
        fund(&harness, dec!(100)).await;

        let err = harness
            .service
            .open(request(dec!(5), 3), &usd_ctx())
            .await
            .unwrap_err();
        match err {
            Error::Investment(InvestmentError::BelowMinimum { minimum, currency }) => {
                assert_eq!(minimum, dec!(10.00));
                assert_eq!(currency, "USD");
            }
            other => panic!("expected BelowMinimum, got {other}"),
        }

        let wallet = harness.wallets.get_wallet("u1").unwrap().unwrap();
        assert_eq!(wallet.available, dec!(100));
        assert_eq!(wallet.locked, Decimal::ZERO);
        assert_eq!(harness.wallet_repository.transaction_count(), 1);
        assert!(harness.service.list_active("u1").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_below_minimum_message_carries_display_currency() {
        let harness = harness_with_factor(dec!(1.0));
        fund(&harness, dec!(100)).await;

        // 100 KES is 0.625 USD, under the 10 USD minimum.
        let err = harness
            .service
            .open(request(dec!(100), 3), &kes_ctx())
            .await
            .unwrap_err();
        match err {
            Error::Investment(InvestmentError::BelowMinimum { minimum, currency }) => {
                assert_eq!(minimum, dec!(1600.00));
                assert_eq!(currency, "KES");
            }
            other => panic!("expected BelowMinimum, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_open_above_maximum_is_rejected() {
        let harness = harness_with_factor(dec!(1.0));
        fund(&harness, dec!(5000)).await;

        let err = harness
            .service
            .open(request(dec!(2000), 3), &usd_ctx())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Investment(InvestmentError::AboveMaximum { .. })
        ));

        let wallet = harness.wallets.get_wallet("u1").unwrap().unwrap();
        assert_eq!(wallet.locked, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_open_rejects_unsupported_duration() {
        let harness = harness_with_factor(dec!(1.0));
        fund(&harness, dec!(100)).await;

        let err = harness
            .service
            .open(request(dec!(50), 7), &usd_ctx())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Investment(InvestmentError::InvalidDuration {
                duration_hours: 7,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_open_propagates_insufficient_funds() {
        let harness = harness_with_factor(dec!(1.0));
        fund(&harness, dec!(20)).await;

        let err = harness
            .service
            .open(request(dec!(50), 3), &usd_ctx())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(crate::wallets::LedgerError::InsufficientFunds { .. })
        ));
    }

    #[tokio::test]
    async fn test_open_rolls_back_lock_when_insert_fails() {
        let harness = harness_with_factor(dec!(1.0));
        fund(&harness, dec!(100)).await;
        harness.investment_repository.fail_next_inserts(true);

        let result = harness.service.open(request(dec!(50), 3), &usd_ctx()).await;
        assert!(result.is_err());

        let wallet = harness.wallets.get_wallet("u1").unwrap().unwrap();
        assert_eq!(wallet.available, dec!(100));
        assert_eq!(wallet.locked, Decimal::ZERO);

        // deposit, lock, compensating adjustment
        let entries = harness.wallet_repository.transactions();
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[2].transaction_type,
            TransactionType::Adjustment
        );
    }

    #[tokio::test]
    async fn test_settle_applies_expected_profit_with_pinned_factor() {
        let harness = harness_with_factor(dec!(1.0));
        fund(&harness, dec!(100)).await;

        let investment = harness
            .service
            .open(request(dec!(50), 3), &usd_ctx())
            .await
            .unwrap();

        // 50 at 1.5% is 0.75 expected; the pinned factor keeps it exact.
        let profit = harness.service.settle(&investment.id).await.unwrap();
        assert_eq!(profit, dec!(0.75));

        let wallet = harness.wallets.get_wallet("u1").unwrap().unwrap();
        assert_eq!(wallet.locked, Decimal::ZERO);
        assert_eq!(wallet.available, dec!(100.75));

        let settled = harness
            .investment_repository
            .get_by_id(&investment.id)
            .unwrap();
        assert_eq!(settled.status, InvestmentStatus::Completed);
        assert_eq!(settled.profit_loss, dec!(0.75));
        assert_eq!(settled.settlement_reason, Some(SettlementReason::Matured));
        assert!(settled.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_settle_twice_fails_without_double_credit() {
        let harness = harness_with_factor(dec!(1.0));
        fund(&harness, dec!(100)).await;

        let investment = harness
            .service
            .open(request(dec!(50), 3), &usd_ctx())
            .await
            .unwrap();
        harness.service.settle(&investment.id).await.unwrap();

        let err = harness.service.settle(&investment.id).await.unwrap_err();
        match err {
            Error::Investment(InvestmentError::NotActive { status, .. }) => {
                assert_eq!(status, "completed");
            }
            other => panic!("expected NotActive, got {other}"),
        }

        let wallet = harness.wallets.get_wallet("u1").unwrap().unwrap();
        assert_eq!(wallet.available, dec!(100.75));
    }

    #[tokio::test]
    async fn test_loss_factor_settles_below_expected() {
        let harness = harness_with_factor(dec!(0.8));
        fund(&harness, dec!(100)).await;

        let investment = harness
            .service
            .open(request(dec!(50), 3), &usd_ctx())
            .await
            .unwrap();
        let profit = harness.service.settle(&investment.id).await.unwrap();
        assert_eq!(profit, dec!(0.600));

        let wallet = harness.wallets.get_wallet("u1").unwrap().unwrap();
        assert_eq!(wallet.available, dec!(100.600));
    }

    #[tokio::test]
    async fn test_withdraw_early_uses_manual_reason() {
        let harness = harness_with_factor(dec!(1.0));
        fund(&harness, dec!(100)).await;

        let investment = harness
            .service
            .open(request(dec!(50), 3), &usd_ctx())
            .await
            .unwrap();
        harness.service.withdraw_early(&investment.id).await.unwrap();

        let settled = harness
            .investment_repository
            .get_by_id(&investment.id)
            .unwrap();
        assert_eq!(settled.settlement_reason, Some(SettlementReason::Manual));
    }

    #[tokio::test]
    async fn test_approve_close_uses_admin_reason() {
        let harness = harness_with_factor(dec!(1.0));
        fund(&harness, dec!(100)).await;

        let investment = harness
            .service
            .open(request(dec!(50), 3), &usd_ctx())
            .await
            .unwrap();
        harness.service.approve_close(&investment.id).await.unwrap();

        let settled = harness
            .investment_repository
            .get_by_id(&investment.id)
            .unwrap();
        assert_eq!(
            settled.settlement_reason,
            Some(SettlementReason::AdminApproved)
        );
    }

    #[tokio::test]
    async fn test_cancel_releases_funds_with_zero_profit() {
        let harness = harness_with_factor(dec!(1.0));
        fund(&harness, dec!(100)).await;

        let investment = harness
            .service
            .open(request(dec!(50), 3), &usd_ctx())
            .await
            .unwrap();
        harness.service.cancel(&investment.id).await.unwrap();

        let wallet = harness.wallets.get_wallet("u1").unwrap().unwrap();
        assert_eq!(wallet.available, dec!(100));
        assert_eq!(wallet.locked, Decimal::ZERO);

        let cancelled = harness
            .investment_repository
            .get_by_id(&investment.id)
            .unwrap();
        assert_eq!(cancelled.status, InvestmentStatus::Cancelled);
        assert_eq!(cancelled.profit_loss, Decimal::ZERO);

        // Cancelled positions cannot be settled afterwards.
        assert!(harness.service.settle(&investment.id).await.is_err());
    }

    #[tokio::test]
    async fn test_is_matured_tracks_end_time() {
        let harness = harness_with_factor(dec!(1.0));
        fund(&harness, dec!(100)).await;

        let investment = harness
            .service
            .open(request(dec!(50), 3), &usd_ctx())
            .await
            .unwrap();

        assert!(!harness.service.is_matured(&investment, Utc::now()));
        assert!(harness
            .service
            .is_matured(&investment, investment.end_time + Duration::seconds(1)));
    }

    #[tokio::test]
    async fn test_sweep_settles_only_matured_investments() {
        let harness = harness_with_factor(dec!(1.0));
        fund(&harness, dec!(100)).await;

        let short = harness
            .service
            .open(request(dec!(30), 1), &usd_ctx())
            .await
            .unwrap();
        let long = harness
            .service
            .open(request(dec!(40), 3), &usd_ctx())
            .await
            .unwrap();

        let summary = harness
            .service
            .sweep_matured(short.end_time + Duration::seconds(1))
            .await
            .unwrap();
        assert_eq!(summary.settled, 1);
        assert_eq!(summary.failed, 0);

        assert_eq!(
            harness
                .investment_repository
                .get_by_id(&short.id)
                .unwrap()
                .status,
            InvestmentStatus::Completed
        );
        assert_eq!(
            harness
                .investment_repository
                .get_by_id(&long.id)
                .unwrap()
                .status,
            InvestmentStatus::Active
        );
    }

    #[tokio::test]
    async fn test_locked_balance_reconciles_with_open_investments() {
        let harness = harness_with_factor(dec!(1.0));
        fund(&harness, dec!(200)).await;

        let first = harness
            .service
            .open(request(dec!(50), 3), &usd_ctx())
            .await
            .unwrap();
        harness
            .service
            .open(request(dec!(30), 1), &usd_ctx())
            .await
            .unwrap();

        let wallet = harness.wallets.get_wallet("u1").unwrap().unwrap();
        assert_eq!(wallet.locked, dec!(80));
        assert_eq!(
            harness.service.total_open_invested("u1").unwrap(),
            wallet.locked
        );

        harness.service.settle(&first.id).await.unwrap();

        let wallet = harness.wallets.get_wallet("u1").unwrap().unwrap();
        assert_eq!(wallet.locked, dec!(30));
        assert_eq!(
            harness.service.total_open_invested("u1").unwrap(),
            wallet.locked
        );
    }

    #[tokio::test]
    async fn test_history_lists_terminal_investments() {
        let harness = harness_with_factor(dec!(1.0));
        fund(&harness, dec!(200)).await;

        let first = harness
            .service
            .open(request(dec!(50), 3), &usd_ctx())
            .await
            .unwrap();
        let second = harness
            .service
            .open(request(dec!(30), 3), &usd_ctx())
            .await
            .unwrap();
        harness.service.settle(&first.id).await.unwrap();
        harness.service.cancel(&second.id).await.unwrap();

        let history = harness.service.list_history("u1").unwrap();
        assert_eq!(history.len(), 2);
        assert!(harness.service.list_active("u1").unwrap().is_empty());
    }
}
