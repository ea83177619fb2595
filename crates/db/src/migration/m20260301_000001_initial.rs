//! Initial database migration.
//!
//! Creates the ledger tables: header, calendar, master data, batches,
//! general ledger master, exchange rates and ledger flags.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: LEDGER HEADER & CALENDAR
        // ============================================================
        db.execute_unprepared(LEDGERS_SQL).await?;
        db.execute_unprepared(ACCOUNTING_PERIODS_SQL).await?;

        // ============================================================
        // PART 2: MASTER DATA
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(COST_CENTRES_SQL).await?;
        db.execute_unprepared(EXCHANGE_RATES_SQL).await?;

        // ============================================================
        // PART 3: BATCHES
        // ============================================================
        db.execute_unprepared(BATCHES_SQL).await?;
        db.execute_unprepared(JOURNAL_LINES_SQL).await?;

        // ============================================================
        // PART 4: GENERAL LEDGER MASTER
        // ============================================================
        db.execute_unprepared(GLM_SQL).await?;

        // ============================================================
        // PART 5: FLAGS & TRIGGERS
        // ============================================================
        db.execute_unprepared(LEDGER_FLAGS_SQL).await?;
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const LEDGERS_SQL: &str = r"
CREATE TABLE ledgers (
    number                          INTEGER PRIMARY KEY,
    name                            VARCHAR(255) NOT NULL,
    base_currency                   VARCHAR(3) NOT NULL,
    current_financial_year          INTEGER NOT NULL,
    current_period                  INTEGER NOT NULL,
    number_of_accounting_periods    INTEGER NOT NULL,
    number_fwd_posting_periods      INTEGER NOT NULL DEFAULT 0,
    provisional_year_end            BOOLEAN NOT NULL DEFAULT false,
    last_batch_number               INTEGER NOT NULL DEFAULT 0,
    retained_earnings_account       VARCHAR(20) NOT NULL,
    forex_gains_losses_account      VARCHAR(20) NOT NULL,
    ich_clearing_account            VARCHAR(20) NOT NULL,
    standard_cost_centre            VARCHAR(20) NOT NULL,
    created_at                      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at                      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_period_counts CHECK (
        number_of_accounting_periods BETWEEN 1 AND 20
        AND number_fwd_posting_periods BETWEEN 0 AND 8
    ),
    CONSTRAINT chk_current_period CHECK (
        current_period BETWEEN 1 AND number_of_accounting_periods
    )
);
";

const ACCOUNTING_PERIODS_SQL: &str = r"
CREATE TABLE accounting_periods (
    ledger_number   INTEGER NOT NULL REFERENCES ledgers(number) ON DELETE CASCADE,
    period_number   INTEGER NOT NULL,
    name            VARCHAR(50) NOT NULL,
    start_date      DATE NOT NULL,
    end_date        DATE NOT NULL,
    status          VARCHAR(10) NOT NULL DEFAULT 'open',

    PRIMARY KEY (ledger_number, period_number),
    CONSTRAINT chk_period_status CHECK (status IN ('open', 'closed')),
    CONSTRAINT chk_period_dates CHECK (start_date <= end_date)
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    ledger_number       INTEGER NOT NULL REFERENCES ledgers(number) ON DELETE CASCADE,
    code                VARCHAR(20) NOT NULL,
    name                VARCHAR(255) NOT NULL,
    kind                VARCHAR(20) NOT NULL,
    foreign_currency    VARCHAR(3),
    is_suspense         BOOLEAN NOT NULL DEFAULT false,
    is_active           BOOLEAN NOT NULL DEFAULT true,

    PRIMARY KEY (ledger_number, code),
    CONSTRAINT chk_account_kind CHECK (
        kind IN ('asset', 'liability', 'equity', 'income', 'expense')
    )
);
";

const COST_CENTRES_SQL: &str = r"
CREATE TABLE cost_centres (
    ledger_number   INTEGER NOT NULL REFERENCES ledgers(number) ON DELETE CASCADE,
    code            VARCHAR(20) NOT NULL,
    name            VARCHAR(255) NOT NULL,
    kind            VARCHAR(10) NOT NULL DEFAULT 'local',
    reallocate_to   VARCHAR(20),
    is_active       BOOLEAN NOT NULL DEFAULT true,

    PRIMARY KEY (ledger_number, code),
    CONSTRAINT chk_cost_centre_kind CHECK (kind IN ('local', 'foreign'))
);
";

const EXCHANGE_RATES_SQL: &str = r"
CREATE TABLE exchange_rates (
    ledger_number   INTEGER NOT NULL REFERENCES ledgers(number) ON DELETE CASCADE,
    from_currency   VARCHAR(3) NOT NULL,
    to_currency     VARCHAR(3) NOT NULL,
    rate_type       VARCHAR(10) NOT NULL,
    effective_date  DATE NOT NULL,
    rate            NUMERIC(18, 10) NOT NULL,

    PRIMARY KEY (ledger_number, from_currency, to_currency, rate_type, effective_date),
    CONSTRAINT chk_rate_positive CHECK (rate > 0),
    CONSTRAINT chk_rate_type CHECK (rate_type IN ('daily', 'corporate'))
);

CREATE INDEX idx_exchange_rates_lookup
    ON exchange_rates(ledger_number, from_currency, to_currency, effective_date DESC);
";

const BATCHES_SQL: &str = r"
CREATE TABLE batches (
    ledger_number   INTEGER NOT NULL REFERENCES ledgers(number) ON DELETE CASCADE,
    batch_number    INTEGER NOT NULL,
    kind            VARCHAR(10) NOT NULL,
    origin          VARCHAR(20) NOT NULL DEFAULT 'manual',
    year            INTEGER NOT NULL,
    period          INTEGER NOT NULL,
    description     TEXT NOT NULL DEFAULT '',
    status          VARCHAR(10) NOT NULL DEFAULT 'unposted',

    PRIMARY KEY (ledger_number, batch_number),
    CONSTRAINT chk_batch_kind CHECK (kind IN ('gl', 'gift', 'ap')),
    CONSTRAINT chk_batch_status CHECK (status IN ('unposted', 'posted', 'cancelled'))
);

CREATE INDEX idx_batches_period
    ON batches(ledger_number, year, period)
    WHERE status = 'unposted';
";

const JOURNAL_LINES_SQL: &str = r"
CREATE TABLE journal_lines (
    ledger_number       INTEGER NOT NULL,
    batch_number        INTEGER NOT NULL,
    line_number         INTEGER NOT NULL,
    account_code        VARCHAR(20) NOT NULL,
    cost_centre_code    VARCHAR(20) NOT NULL,
    entry_type          VARCHAR(6) NOT NULL,
    amount              NUMERIC(19, 2) NOT NULL,
    foreign_amount      NUMERIC(19, 2),
    narrative           TEXT,

    PRIMARY KEY (ledger_number, batch_number, line_number),
    FOREIGN KEY (ledger_number, batch_number)
        REFERENCES batches(ledger_number, batch_number) ON DELETE CASCADE,
    CONSTRAINT chk_entry_type CHECK (entry_type IN ('debit', 'credit')),
    CONSTRAINT chk_amount_positive CHECK (amount > 0)
);
";

const GLM_SQL: &str = r"
CREATE TABLE glm (
    ledger_number       INTEGER NOT NULL REFERENCES ledgers(number) ON DELETE CASCADE,
    year                INTEGER NOT NULL,
    account_code        VARCHAR(20) NOT NULL,
    cost_centre_code    VARCHAR(20) NOT NULL,
    start_balance       NUMERIC(19, 2) NOT NULL DEFAULT 0,
    start_foreign       NUMERIC(19, 2) NOT NULL DEFAULT 0,

    PRIMARY KEY (ledger_number, year, account_code, cost_centre_code)
);

CREATE TABLE glm_periods (
    ledger_number       INTEGER NOT NULL,
    year                INTEGER NOT NULL,
    account_code        VARCHAR(20) NOT NULL,
    cost_centre_code    VARCHAR(20) NOT NULL,
    period_number       INTEGER NOT NULL,
    closing_balance     NUMERIC(19, 2) NOT NULL DEFAULT 0,
    closing_foreign     NUMERIC(19, 2) NOT NULL DEFAULT 0,

    PRIMARY KEY (ledger_number, year, account_code, cost_centre_code, period_number),
    FOREIGN KEY (ledger_number, year, account_code, cost_centre_code)
        REFERENCES glm(ledger_number, year, account_code, cost_centre_code) ON DELETE CASCADE
);
";

const LEDGER_FLAGS_SQL: &str = r"
CREATE TABLE ledger_flags (
    ledger_number   INTEGER NOT NULL REFERENCES ledgers(number) ON DELETE CASCADE,
    flag            VARCHAR(50) NOT NULL,

    PRIMARY KEY (ledger_number, flag)
);
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION update_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_ledgers_updated_at
    BEFORE UPDATE ON ledgers
    FOR EACH ROW EXECUTE FUNCTION update_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS ledger_flags CASCADE;
DROP TABLE IF EXISTS glm_periods CASCADE;
DROP TABLE IF EXISTS glm CASCADE;
DROP TABLE IF EXISTS journal_lines CASCADE;
DROP TABLE IF EXISTS batches CASCADE;
DROP TABLE IF EXISTS exchange_rates CASCADE;
DROP TABLE IF EXISTS cost_centres CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS accounting_periods CASCADE;
DROP TABLE IF EXISTS ledgers CASCADE;
DROP FUNCTION IF EXISTS update_updated_at() CASCADE;
";
