//! Demo account shown to every player.

use platform_host::HOUR_MS;

use crate::ledger::{Ledger, Transaction, TransactionKind};

/// Starting balance of the demo account.
pub const DEMO_BALANCE: i64 = 47_500;

/// The eight demo history rows, timestamped relative to `now`, newest first.
pub fn demo_transactions(now: u64) -> Vec<Transaction> {
    use TransactionKind::{Credit, Debit};

    let row = |id: &str, kind, amount, description: &str, from: &str, hours_ago: u64| {
        let timestamp = now.saturating_sub(hours_ago * HOUR_MS);
        Transaction::new(id, kind, amount, description, from, timestamp)
    };
    vec![
        row("1", Credit, 15_000, "Mission Ransomware - TechCorp", "Mission Control", 2)
            .for_mission("MISSION_001"),
        row("2", Credit, 2_500, "Infiltration Base de Données", "Mission Control", 6)
            .for_mission("MISSION_002"),
        row("3", Debit, 3_200, "Achat Network Scanner Elite", "HackShop", 12),
        row("4", Credit, 5_000, "Attaque DDoS Coordonnée", "Mission Control", 24)
            .for_mission("MISSION_003"),
        row("5", Debit, 2_500, "Achat BruteCracker Pro", "HackShop", 36),
        row("6", Credit, 1_000, "Ingénierie Sociale - PhishCorp", "Mission Control", 48)
            .for_mission("MISSION_004"),
        row("7", Credit, 25_000, "Paiement Ransomware Bitcoin", "Crypto Exchange", 72),
        row("8", Debit, 1_800, "Achat SQL Injection Kit", "HackShop", 96),
    ]
}

/// [`DEMO_BALANCE`] with [`demo_transactions`].
pub fn demo_ledger(now: u64) -> Ledger {
    Ledger::new(DEMO_BALANCE, demo_transactions(now))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use platform_host::DAY_MS;

    use crate::{Period, TransactionIcon};

    #[test]
    fn demo_week_totals() {
        let now = 30 * DAY_MS;
        let ledger = demo_ledger(now);
        assert_eq!(ledger.transactions().len(), 8);
        assert_eq!(ledger.total_income(Period::Week, now), 48_500);
        assert_eq!(ledger.total_expenses(Period::Week, now), 7_500);
        assert!((ledger.usd_estimate() - 4_750.0).abs() < 1e-9);
    }

    #[test]
    fn shop_purchases_show_the_cart_icon() {
        let purchases = demo_transactions(DAY_MS * 10)
            .into_iter()
            .filter(|t| t.from == "HackShop")
            .map(|t| t.icon())
            .collect::<Vec<_>>();
        assert_eq!(purchases, vec![TransactionIcon::Purchase; 3]);
    }
}
