//! Database seeder for Finledger development and testing.
//!
//! Seeds the chart of accounts, users with long-lived dev sessions, a few
//! vendors and customers, and an active budget for the current fiscal year.
//!
//! Usage: cargo run --bin seeder

use chrono::{Datelike, Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use finledger_db::entities::{
    budget_items, budgets, chart_of_accounts, customers,
    sea_orm_active_enums::{AccountType, BudgetStatus},
    sessions, users, vendors,
};

/// Fixed dev session tokens, one per seeded user.
const ADMIN_TOKEN: &str = "00000000-0000-0000-0000-0000000000a1";
const STAFF_TOKEN: &str = "00000000-0000-0000-0000-0000000000b1";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = finledger_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding chart of accounts...");
    seed_accounts(&db).await;

    println!("Seeding users and sessions...");
    seed_users(&db).await;

    println!("Seeding vendors and customers...");
    seed_parties(&db).await;

    println!("Seeding budget...");
    seed_budget(&db).await;

    println!("Seeding complete!");
}

/// Seeds the control and fallback accounts the posting core resolves by
/// code, plus a few operating accounts for line items.
async fn seed_accounts(db: &DatabaseConnection) {
    let accounts = [
        ("1001", "Cash", AccountType::Asset),
        ("1002", "Accounts Receivable", AccountType::Asset),
        ("2001", "Accounts Payable", AccountType::Liability),
        ("2108", "Sales Tax Payable", AccountType::Liability),
        ("4001", "Sales Revenue", AccountType::Revenue),
        ("4002", "Service Revenue", AccountType::Revenue),
        ("4309", "Write Off Income", AccountType::Revenue),
        ("5101", "Office Supplies", AccountType::Expense),
        ("5201", "Utilities", AccountType::Expense),
        ("5403", "General Expense", AccountType::Expense),
        ("5409", "Bad Debt Expense", AccountType::Expense),
    ];

    for (code, name, account_type) in accounts {
        let existing = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::AccountCode.eq(code))
            .one(db)
            .await
            .ok()
            .flatten();
        if existing.is_some() {
            continue;
        }

        let now = Utc::now().into();
        let account = chart_of_accounts::ActiveModel {
            account_code: Set(code.to_string()),
            account_name: Set(name.to_string()),
            account_type: Set(account_type),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        if let Err(e) = account.insert(db).await {
            eprintln!("Failed to insert account {code}: {e}");
        } else {
            println!("  Created account {code} {name}");
        }
    }
}

/// Seeds an admin and a staff user, each with a fixed long-lived session
/// token for local API calls.
async fn seed_users(db: &DatabaseConnection) {
    let seeds = [
        ("admin", "admin@finledger.dev", "Admin User", "admin", ADMIN_TOKEN),
        ("staff", "staff@finledger.dev", "Staff User", "staff", STAFF_TOKEN),
    ];

    for (username, email, full_name, role, token) in seeds {
        let now = Utc::now();
        let user = match users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(db)
            .await
            .ok()
            .flatten()
        {
            Some(user) => {
                println!("  User {username} already exists, skipping...");
                user
            }
            None => {
                let user = users::ActiveModel {
                    username: Set(username.to_string()),
                    email: Set(email.to_string()),
                    full_name: Set(full_name.to_string()),
                    role: Set(role.to_string()),
                    is_active: Set(true),
                    last_login: Set(Some(now.into())),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                    ..Default::default()
                }
                .insert(db)
                .await
                .expect("Failed to insert user");
                println!("  Created user {username} ({role})");
                user
            }
        };

        let token = Uuid::parse_str(token).expect("valid seed token");
        let existing = sessions::Entity::find()
            .filter(sessions::Column::Token.eq(token))
            .one(db)
            .await
            .ok()
            .flatten();
        if existing.is_none() {
            let session = sessions::ActiveModel {
                token: Set(token),
                user_id: Set(user.id),
                expires_at: Set((now + Duration::days(365)).into()),
                created_at: Set(now.into()),
                ..Default::default()
            };
            if let Err(e) = session.insert(db).await {
                eprintln!("Failed to insert session for {username}: {e}");
            } else {
                println!("  Created dev session for {username}: {token}");
            }
        }
    }
}

/// Seeds a sample vendor and customer.
async fn seed_parties(db: &DatabaseConnection) {
    let now = Utc::now().into();

    let vendor_exists = vendors::Entity::find()
        .filter(vendors::Column::VendorName.eq("Acme Supplies"))
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some();
    if !vendor_exists {
        let vendor = vendors::ActiveModel {
            vendor_name: Set("Acme Supplies".to_string()),
            email: Set(Some("billing@acme.example".to_string())),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        if let Err(e) = vendor.insert(db).await {
            eprintln!("Failed to insert vendor: {e}");
        } else {
            println!("  Created vendor Acme Supplies");
        }
    }

    let customer_exists = customers::Entity::find()
        .filter(customers::Column::CustomerName.eq("Globex Corp"))
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some();
    if !customer_exists {
        let customer = customers::ActiveModel {
            customer_name: Set("Globex Corp".to_string()),
            email: Set(Some("ap@globex.example".to_string())),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        if let Err(e) = customer.insert(db).await {
            eprintln!("Failed to insert customer: {e}");
        } else {
            println!("  Created customer Globex Corp");
        }
    }
}

/// Seeds an active budget for the current fiscal year with ceilings on
/// the seeded expense accounts.
async fn seed_budget(db: &DatabaseConnection) {
    let fiscal_year = Utc::now().date_naive().year();
    let existing = budgets::Entity::find()
        .filter(budgets::Column::FiscalYear.eq(fiscal_year))
        .one(db)
        .await
        .ok()
        .flatten();
    if existing.is_some() {
        println!("  Budget for {fiscal_year} already exists, skipping...");
        return;
    }

    let now = Utc::now().into();
    let budget = budgets::ActiveModel {
        budget_name: Set(format!("Operating Budget {fiscal_year}")),
        fiscal_year: Set(fiscal_year),
        status: Set(BudgetStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert budget");

    let ceilings = [
        ("5101", Decimal::new(50_000, 0)),
        ("5201", Decimal::new(30_000, 0)),
        ("5403", Decimal::new(100_000, 0)),
    ];
    for (code, budgeted) in ceilings {
        let Some(account) = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::AccountCode.eq(code))
            .one(db)
            .await
            .ok()
            .flatten()
        else {
            eprintln!("Account {code} missing, budget item skipped");
            continue;
        };

        let item = budget_items::ActiveModel {
            budget_id: Set(budget.id),
            account_id: Set(account.id),
            budgeted_amount: Set(budgeted),
            actual_amount: Set(Decimal::ZERO),
            variance: Set(budgeted),
            updated_at: Set(now),
            ..Default::default()
        };
        if let Err(e) = item.insert(db).await {
            eprintln!("Failed to insert budget item for {code}: {e}");
        } else {
            println!("  Budgeted {budgeted} for account {code}");
        }
    }
    println!("  Created budget for {fiscal_year}");
}
