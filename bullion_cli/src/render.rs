//! Plain-text rendering for the terminal.

use bullion_core::audit::AuditEntry;
use bullion_core::calculations::{Bill, Metal};
use bullion_core::dashboard::Dashboard;
use bullion_core::health::HealthReport;
use bullion_core::purity::PurityTable;
use bullion_core::settings::ShopSettings;
use bullion_core::{Transaction, User};

const RULE: &str = "═══════════════════════════════════════";

pub fn bill(shop: &str, tx: &Transaction, bill: &Bill, currency: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{RULE}\n  {} BILL - {}\n{RULE}\n\n", tx.metal.display_name().to_uppercase(), shop));
    out.push_str("Input:\n");
    out.push_str(&format!("  Weight:         {} g\n", tx.weight.0));
    out.push_str(&format!("  Price per gram: {:.2} {currency}\n", tx.price_per_gram.0));
    match tx.metal {
        Metal::Gold => out.push_str(&format!("  Purity:         {} (x{})\n", tx.purity, bill.purity_factor)),
        Metal::Silver => out.push_str(&format!("  Purity:         {}%\n", tx.purity)),
    }
    out.push('\n');
    out.push_str("Breakdown:\n");
    out.push_str(&format!("  Base value:      {:>12} {currency}\n", bill.base_value));
    out.push_str(&format!("  Purity adjusted: {:>12} {currency}\n", bill.purity_adjusted_value));
    out.push_str(&format!(
        "  Service charge:  {:>12} {currency}  ({})\n",
        bill.service_charge_amount, tx.service_charge_rate
    ));
    out.push_str(&format!("  Tax:             {:>12} {currency}  ({})\n", bill.tax_amount, tx.tax_rate));
    out.push('\n');
    out.push_str(&format!("{RULE}\n  TOTAL: {} {currency}   (transaction #{})\n{RULE}\n", bill.final_total, tx.id));
    out
}

pub fn history(transactions: &[&Transaction], currency: &str) -> String {
    if transactions.is_empty() {
        return "No transactions recorded.\n".to_string();
    }
    let mut out = format!(
        "{:>5}  {:<6}  {:>10}  {:>10}  {:<8}  {:>7}  {:>7}  {:>12}  {}\n",
        "ID", "Type", "Weight(g)", "Price/g", "Purity", "Svc %", "Tax %", "Total", "Timestamp"
    );
    for t in transactions {
        out.push_str(&format!(
            "{:>5}  {:<6}  {:>10}  {:>10.2}  {:<8}  {:>7}  {:>7}  {:>12}  {}\n",
            t.id,
            t.metal.display_name(),
            t.weight.0,
            t.price_per_gram.0,
            t.purity,
            t.service_charge_rate.0,
            t.tax_rate.0,
            format!("{} {currency}", t.total),
            t.timestamp.format("%Y-%m-%d %H:%M:%S"),
        ));
    }
    out
}

pub fn purities(table: &PurityTable) -> String {
    let mut out = String::from("Gold purity grades:\n");
    for grade in table.grades() {
        out.push_str(&format!("  {:<6} x{}\n", grade.label, grade.factor));
    }
    out.push_str("Silver purity is entered as a percentage (0-100).\n");
    out
}

pub fn users(users: &[&User]) -> String {
    let mut out = format!("{:>4}  {:<20}  {:<24}  {:<30}  {}\n", "ID", "Username", "Name", "Email", "Role");
    for u in users {
        out.push_str(&format!(
            "{:>4}  {:<20}  {:<24}  {:<30}  {}\n",
            u.id,
            u.username,
            u.full_name(),
            u.email,
            u.role
        ));
    }
    out
}

pub fn audit(entries: &[&AuditEntry]) -> String {
    if entries.is_empty() {
        return "Audit log is empty.\n".to_string();
    }
    let mut out = String::new();
    for e in entries {
        out.push_str(&format!(
            "{}  #{:<4} {:<20} {:<24} {}\n",
            e.timestamp.format("%Y-%m-%d %H:%M:%S"),
            e.id,
            e.username,
            e.action,
            e.details.as_deref().unwrap_or("")
        ));
    }
    out
}

pub fn settings(settings: &ShopSettings, saved: bool) -> String {
    format!(
        "Currency: {}\nTheme:    {}\n{}\n",
        settings.currency,
        settings.theme,
        if saved { "(saved settings)" } else { "(configuration defaults)" }
    )
}

pub fn dashboard(user: &User, dashboard: &Dashboard) -> String {
    let mut out = format!("{RULE}\n  Welcome, {} ({})\n{RULE}\n", user.full_name(), user.role);
    match dashboard {
        Dashboard::Admin { total_users, system } => {
            out.push_str(&format!("  Total users:     {}\n", total_users));
            out.push_str(&format!("  CPU cores:       {}\n", system.cpu_cores));
            out.push_str(&format!("  CPU utilization: {:.1}%\n", system.cpu_utilization));
            out.push_str(&format!("  System health:   {}\n", system.status));
        }
        Dashboard::Manager {
            gold_transactions,
            silver_transactions,
        } => {
            out.push_str(&format!("  Gold bills:   {}\n", gold_transactions));
            out.push_str(&format!("  Silver bills: {}\n", silver_transactions));
        }
        Dashboard::Customer { username, email, .. } => {
            out.push_str(&format!("  Username: {}\n", username));
            out.push_str(&format!("  Email:    {}\n", email));
        }
    }
    out
}

pub fn health(report: &HealthReport) -> String {
    format!(
        "Status:  {}\nMessage: {}\nVersion: {}\nTime:    {}\n",
        report.status,
        report.message,
        report.version,
        report.timestamp.to_rfc3339()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bullion_core::calculations::{BillRequest, GoldBillInput};
    use bullion_core::units::{Grams, Percent, PricePerGram};
    use bullion_core::{record_bill, Ledger};

    #[test]
    fn test_bill_rendering() {
        let mut ledger = Ledger::new("Test Shop");
        let request = BillRequest::Gold(GoldBillInput {
            weight: Grams(10.0),
            price_per_gram: PricePerGram(60.0),
            purity: "24K".to_string(),
            service_charge_rate: Percent(5.0),
            tax_rate: Percent(3.0),
        });
        let (tx, computed) = record_bill(&mut ledger, &request, &PurityTable::default()).unwrap();
        let text = bill("Test Shop", &tx, &computed, "USD");
        assert!(text.contains("GOLD BILL - Test Shop"));
        assert!(text.contains("648.90 USD"));
        assert!(text.contains("transaction #1"));
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(history(&[], "USD"), "No transactions recorded.\n");
    }

    #[test]
    fn test_purities_lists_table() {
        let text = purities(&PurityTable::default());
        assert!(text.contains("22K"));
        assert!(text.contains("0.916"));
    }
}
