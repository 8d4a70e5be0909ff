//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Control-account codes used by the posting core.
    #[serde(default)]
    pub accounts: AccountsConfig,
    /// Posting defaults.
    #[serde(default)]
    pub posting: PostingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

/// Chart-of-accounts codes for the control and fallback accounts the
/// posting core writes to.
///
/// These are resolved to account ids at posting time; a code that does not
/// resolve to an active account fails the posting outright. There is no
/// implicit fallback to any account id.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountsConfig {
    /// Accounts Payable control account.
    #[serde(default = "default_accounts_payable")]
    pub accounts_payable: String,
    /// Accounts Receivable control account.
    #[serde(default = "default_accounts_receivable")]
    pub accounts_receivable: String,
    /// Cash account credited by disbursements.
    #[serde(default = "default_cash")]
    pub cash: String,
    /// Sales tax payable account.
    #[serde(default = "default_sales_tax_payable")]
    pub sales_tax_payable: String,
    /// Expense account used when a line item carries no account.
    #[serde(default = "default_fallback_expense")]
    pub fallback_expense: String,
    /// Revenue account used when a line item carries no account.
    #[serde(default = "default_fallback_revenue")]
    pub fallback_revenue: String,
    /// Income account credited by payable write-offs.
    #[serde(default = "default_write_off_income")]
    pub write_off_income: String,
    /// Bad-debt expense account debited by receivable write-offs/discounts.
    #[serde(default = "default_bad_debt_expense")]
    pub bad_debt_expense: String,
}

fn default_accounts_payable() -> String {
    "2001".to_string()
}

fn default_accounts_receivable() -> String {
    "1002".to_string()
}

fn default_cash() -> String {
    "1001".to_string()
}

fn default_sales_tax_payable() -> String {
    "2108".to_string()
}

fn default_fallback_expense() -> String {
    "5403".to_string()
}

fn default_fallback_revenue() -> String {
    "4001".to_string()
}

fn default_write_off_income() -> String {
    "4309".to_string()
}

fn default_bad_debt_expense() -> String {
    "5409".to_string()
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            accounts_payable: default_accounts_payable(),
            accounts_receivable: default_accounts_receivable(),
            cash: default_cash(),
            sales_tax_payable: default_sales_tax_payable(),
            fallback_expense: default_fallback_expense(),
            fallback_revenue: default_fallback_revenue(),
            write_off_income: default_write_off_income(),
            bad_debt_expense: default_bad_debt_expense(),
        }
    }
}

/// Posting defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct PostingConfig {
    /// Default tax rate (percent) applied when a document omits one.
    #[serde(default = "default_tax_rate")]
    pub default_tax_rate: Decimal,
}

fn default_tax_rate() -> Decimal {
    Decimal::new(12, 0)
}

impl Default for PostingConfig {
    fn default() -> Self {
        Self {
            default_tax_rate: default_tax_rate(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FINLEDGER").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_accounts_config_defaults() {
        let accounts = AccountsConfig::default();
        assert_eq!(accounts.accounts_payable, "2001");
        assert_eq!(accounts.accounts_receivable, "1002");
        assert_eq!(accounts.cash, "1001");
        assert_eq!(accounts.sales_tax_payable, "2108");
        assert_eq!(accounts.fallback_expense, "5403");
        assert_eq!(accounts.fallback_revenue, "4001");
        assert_eq!(accounts.write_off_income, "4309");
        assert_eq!(accounts.bad_debt_expense, "5409");
    }

    #[test]
    fn test_posting_defaults() {
        let posting = PostingConfig::default();
        assert_eq!(posting.default_tax_rate, dec!(12));
    }
}
