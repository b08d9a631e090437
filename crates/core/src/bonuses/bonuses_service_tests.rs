#[cfg(test)]
mod tests {
    use crate::bonuses::{BonusError, BonusService, BonusServiceTrait, BonusType, NewBonus};
    use crate::errors::Error;
    use crate::testing::{InMemoryBonusRepository, InMemoryWalletRepository};
    use crate::wallets::{TransactionType, WalletService, WalletServiceTrait};
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn service() -> (BonusService, Arc<WalletService>) {
        let wallets = Arc::new(WalletService::new(Arc::new(
            InMemoryWalletRepository::new(),
        )));
        let service = BonusService::new(Arc::new(InMemoryBonusRepository::new()), wallets.clone());
        (service, wallets)
    }

    fn welcome_bonus(amount: Decimal) -> NewBonus {
        NewBonus {
            user_id: "u1".to_string(),
            title: "Welcome bonus".to_string(),
            description: "One-time signup credit".to_string(),
            amount,
            bonus_type: BonusType::Welcome,
            expires_at: None,
        }
    }

    #[tokio::test]
    async fn test_grant_validates_amount() {
        let (service, _) = service();
        assert!(service.grant(welcome_bonus(Decimal::ZERO)).await.is_err());
        assert!(service.grant(welcome_bonus(dec!(-10))).await.is_err());
    }

    #[tokio::test]
    async fn test_claim_credits_wallet_once() {
        let (service, wallets) = service();
        let bonus = service.grant(welcome_bonus(dec!(500))).await.unwrap();

        let transaction = service.claim("u1", &bonus.id).await.unwrap();
        assert_eq!(transaction.transaction_type, TransactionType::Bonus);
        assert_eq!(transaction.amount, dec!(500));

        let wallet = wallets.get_wallet("u1").unwrap().unwrap();
        assert_eq!(wallet.available, dec!(500));
        assert_eq!(wallet.bonus_claimed, dec!(500));

        // Second claim fails and credits nothing.
        let err = service.claim("u1", &bonus.id).await.unwrap_err();
        assert!(matches!(err, Error::Bonus(BonusError::AlreadyClaimed(_))));
        let wallet = wallets.get_wallet("u1").unwrap().unwrap();
        assert_eq!(wallet.available, dec!(500));
    }

    #[tokio::test]
    async fn test_claim_rejects_expired_bonus() {
        let (service, wallets) = service();
        let mut new_bonus = welcome_bonus(dec!(100));
        new_bonus.expires_at = Some(Utc::now() - Duration::hours(1));
        let bonus = service.grant(new_bonus).await.unwrap();

        let err = service.claim("u1", &bonus.id).await.unwrap_err();
        assert!(matches!(err, Error::Bonus(BonusError::Expired(_))));
        assert!(wallets.get_wallet("u1").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_claim_rejects_other_users_bonus() {
        let (service, _) = service();
        let bonus = service.grant(welcome_bonus(dec!(100))).await.unwrap();

        let err = service.claim("u2", &bonus.id).await.unwrap_err();
        assert!(matches!(err, Error::Bonus(BonusError::AlreadyClaimed(_))));
    }

    #[tokio::test]
    async fn test_list_available_hides_claimed_and_expired() {
        let (service, _) = service();
        let claimable = service.grant(welcome_bonus(dec!(100))).await.unwrap();
        let mut expiring = welcome_bonus(dec!(50));
        expiring.title = "Flash promo".to_string();
        expiring.expires_at = Some(Utc::now() - Duration::minutes(5));
        service.grant(expiring).await.unwrap();

        let available = service.list_available("u1").unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, claimable.id);

        service.claim("u1", &claimable.id).await.unwrap();
        assert!(service.list_available("u1").unwrap().is_empty());
        assert_eq!(service.total_claimed("u1").unwrap(), dec!(100));
    }
}
